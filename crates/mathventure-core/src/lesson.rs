//! The built-in cylinder lesson.
//!
//! Screens 1–8 form the core table. The quiz (intro, one screen per
//! question, results) is registered late, after the core screens, so a
//! different question set can be slotted in without touching the table.

use crate::config::MathventureConfig;
use crate::evaluator::AssessmentEvaluator;
use crate::geometry::Cylinder;
use crate::model::{ChoiceOption, ExpectedAnswer, Question, QuestionId, QuestionSet};
use crate::navigator::{Navigator, ScreenTable};
use crate::report::QuizReport;
use crate::screens;
use crate::store::{LearnerProfile, SharedStore};
use crate::traits::ScreenHost;

/// Screen counting down into the quiz; retakes return here.
pub const QUIZ_INTRO_SCREEN: usize = 9;
/// First quiz question screen.
pub const FIRST_QUIZ_SCREEN: usize = 10;
/// Screen the adaptive check's "ahead" path leads to.
pub const TOWER_SCREEN: usize = 7;

/// Question numbers within the adaptive-check set.
pub const CHECK_CSA: QuestionId = 1;
pub const CHECK_TSA_PARTS: QuestionId = 2;
pub const CHECK_TOWER: QuestionId = 3;

/// Weak-spot tags logged by the adaptive check.
pub const TOPIC_CSA: &str = "cylinder_csa";
pub const TOPIC_TSA_CONCEPT: &str = "cylinder_tsa_concept";

/// State shared by every screen of a session.
///
/// Only `checks` logs weak spots. Both evaluators read the log at
/// construction, and a single writer keeps the whole-value store from
/// losing entries.
pub struct LessonContext {
    pub config: MathventureConfig,
    pub profile: LearnerProfile,
    pub quiz_set: QuestionSet,
    pub quiz: AssessmentEvaluator,
    pub checks_set: QuestionSet,
    pub checks: AssessmentEvaluator,
}

impl LessonContext {
    /// Context for the built-in lesson and compact quiz.
    pub fn new(config: MathventureConfig, store: SharedStore) -> Self {
        Self::with_quiz(config, store, compact_quiz())
    }

    /// Context whose quiz screens use `quiz_set`.
    pub fn with_quiz(config: MathventureConfig, store: SharedStore, quiz_set: QuestionSet) -> Self {
        let checks_set = adaptive_checks();
        let quiz = AssessmentEvaluator::for_set(&quiz_set, store.clone());
        let checks = AssessmentEvaluator::for_set(&checks_set, store.clone());
        Self {
            config,
            profile: LearnerProfile::new(store),
            quiz_set,
            quiz,
            checks_set,
            checks,
        }
    }

    /// The learner's name or the friendly fallback.
    pub fn learner_name(&self) -> String {
        self.profile.display_name()
    }

    pub fn weak_spots(&self) -> &[String] {
        self.checks.weak_spots()
    }

    /// Grade the current quiz answers.
    pub fn quiz_report(&self) -> QuizReport {
        QuizReport::build(
            &self.quiz_set,
            &self.quiz,
            self.profile.name(),
            self.weak_spots().to_vec(),
        )
    }
}

/// Results screen index for a quiz with `set.questions.len()` questions.
pub fn results_screen_for(set: &QuestionSet) -> usize {
    FIRST_QUIZ_SCREEN + set.questions.len()
}

/// Static table for the core lesson screens 1–8.
pub fn core_screens() -> ScreenTable<LessonContext> {
    ScreenTable::new()
        .with(1, screens::intro::definition())
        .with(2, screens::sticker::definition())
        .with(3, screens::video::dabba_explainer())
        .with(4, screens::video::cylinder_concept())
        .with(5, screens::simulation::definition())
        .with(6, screens::adaptive::definition())
        .with(TOWER_SCREEN, screens::tower::definition())
        .with(8, screens::beaker::definition())
}

/// Append the quiz intro, one screen per question, and the results screen.
pub fn register_quiz_screens(nav: &mut Navigator<LessonContext>, set: &QuestionSet) {
    nav.register_screen(QUIZ_INTRO_SCREEN, screens::quiz::intro_definition());
    for (offset, question) in set.questions.iter().enumerate() {
        nav.register_screen(
            FIRST_QUIZ_SCREEN + offset,
            screens::quiz::question_definition(question.clone(), offset + 1, set.questions.len()),
        );
    }
    nav.register_screen(results_screen_for(set), screens::quiz::results_definition());
}

/// A navigator over the whole lesson for `ctx`'s quiz set.
pub fn lesson_navigator(
    ctx: &LessonContext,
    host: Box<dyn ScreenHost>,
) -> Navigator<LessonContext> {
    let mut nav = Navigator::new(core_screens(), host);
    register_quiz_screens(&mut nav, &ctx.quiz_set);
    nav
}

/// The five-question compact quiz (set id `quiz`).
pub fn compact_quiz() -> QuestionSet {
    let options = |labels: [&str; 4]| {
        ["A", "B", "C", "D"]
            .iter()
            .zip(labels)
            .map(|(token, label)| ChoiceOption::new(*token, label))
            .collect::<Vec<_>>()
    };

    QuestionSet {
        id: "quiz".into(),
        name: "Cylinder Quiz".into(),
        description: "Five quick questions on cylinder volume and surface area".into(),
        questions: vec![
            Question {
                id: 1,
                title: "Cylinder in a Cube".into(),
                prompt: "A cylinder fits exactly inside a cube of side 10 cm. \
                         What is the volume of the cylinder?"
                    .into(),
                topic: "cylinder_volume".into(),
                options: options(["100π cm³", "200π cm³", "250π cm³", "500π cm³"]),
                expected: ExpectedAnswer::choice("C"),
                unit: None,
                hint: Some("The cylinder's diameter and height both equal the cube's side.".into()),
                solution: Some("r = 5 cm, h = 10 cm, so V = π × 5² × 10 = 250π cm³.".into()),
            },
            Question {
                id: 2,
                title: "Water Tank Transfer".into(),
                prompt: "A full tank has radius r and height h. Its water is poured into \
                         an empty tank with radius 2r and height h/2. What happens?"
                    .into(),
                topic: "volume_reasoning".into(),
                options: options([
                    "The second tank overflows",
                    "The water fills exactly half the second tank",
                    "The water fills the second tank exactly",
                    "The water fills a quarter of the second tank",
                ]),
                expected: ExpectedAnswer::choice("B"),
                unit: None,
                hint: Some("Compare πr²h with π(2r)²(h/2).".into()),
                solution: Some("The second tank holds 2πr²h, twice the water poured in.".into()),
            },
            Question {
                id: 3,
                title: "Surface Area Components".into(),
                prompt: "Which of these is NOT part of a closed cylinder's total surface area?"
                    .into(),
                topic: "tsa_components".into(),
                options: options(["Curved side", "Top circle", "Bottom circle", "Diagonal face"]),
                expected: ExpectedAnswer::choice("D"),
                unit: None,
                hint: Some("Peel the cylinder apart: what pieces do you get?".into()),
                solution: Some("TSA = curved side + top + bottom. A cylinder has no diagonal face.".into()),
            },
            Question {
                id: 4,
                title: "Curved Surface Area Calculation".into(),
                prompt: "Find the curved surface area of a cylinder with r = 7 cm and \
                         h = 10 cm. Use π = 3.14."
                    .into(),
                topic: "cylinder_csa".into(),
                options: vec![],
                expected: ExpectedAnswer::numeric(439.6, 0.1),
                unit: Some("cm²".into()),
                hint: Some("Only the curved side counts: 2πrh.".into()),
                solution: Some("CSA = 2 × 3.14 × 7 × 10 = 439.6 cm².".into()),
            },
            Question {
                id: 5,
                title: "Tin Can Surface Area".into(),
                prompt: "A closed tin can has r = 3.5 cm and h = 14 cm. Find its total \
                         surface area. Use π = 22/7."
                    .into(),
                topic: "cylinder_tsa".into(),
                options: vec![],
                expected: ExpectedAnswer::numeric(385.0, 0.1),
                unit: Some("cm²".into()),
                hint: Some("TSA = 2πr(h + r).".into()),
                solution: Some("TSA = 2 × 22/7 × 3.5 × (14 + 3.5) = 385 cm².".into()),
            },
        ],
    }
}

/// Inline checks asked during the lesson (set id `checks`).
pub fn adaptive_checks() -> QuestionSet {
    let csa = Cylinder::new(7.0, 10.0).curved_surface_area();
    let tower = tower_cylinder().curved_surface_area();

    QuestionSet {
        id: "checks".into(),
        name: "Adaptive checks".into(),
        description: "Questions asked inside the lesson screens".into(),
        questions: vec![
            Question {
                id: CHECK_CSA,
                title: "Curved surface area".into(),
                prompt: "A cylinder has r = 7 cm and h = 10 cm. What is its curved surface area?"
                    .into(),
                topic: TOPIC_CSA.into(),
                options: vec![],
                expected: ExpectedAnswer::numeric(csa, 0.5),
                unit: Some("cm²".into()),
                hint: Some(
                    "Hint: only the side counts. Unroll it into a rectangle of 2πr × h.".into(),
                ),
                solution: Some(format!(
                    "Let's solve it together: CSA = 2πrh = 2 × π × 7 × 10 ≈ {csa:.2} cm²."
                )),
            },
            Question {
                id: CHECK_TSA_PARTS,
                title: "Total surface area parts".into(),
                prompt: "Which parts make up the total surface area of a closed cylinder?".into(),
                topic: TOPIC_TSA_CONCEPT.into(),
                options: vec![
                    ChoiceOption::new("side-only", "Only the curved side"),
                    ChoiceOption::new("top-bottom-only", "Only the top and bottom"),
                    ChoiceOption::new("side-top-bottom", "Side + top + bottom"),
                ],
                expected: ExpectedAnswer::choice("side-top-bottom"),
                unit: None,
                hint: None,
                solution: None,
            },
            Question {
                id: CHECK_TOWER,
                title: "Water tower".into(),
                prompt: "A cylindrical tower has r = 7 m and h = 72 m. How much curved \
                         surface needs paint?"
                    .into(),
                // Misses here never become weak spots.
                topic: String::new(),
                options: vec![],
                expected: ExpectedAnswer::numeric(tower, 0.5),
                unit: Some("m²".into()),
                hint: Some("Not quite. Think curved surface only: use 2πrh.".into()),
                solution: Some(format!("CSA = 2 × π × 7 × 72 ≈ {tower:.2} m².")),
            },
        ],
    }
}

/// The tower from screen 7, in metres.
pub fn tower_cylinder() -> Cylinder {
    Cylinder::new(7.0, 72.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnswerValue;
    use crate::parser::validate_question_set;
    use crate::store::MemoryStore;

    #[test]
    fn compact_quiz_answer_key() {
        let table = compact_quiz().answer_table();
        assert_eq!(table.len(), 5);
        assert!(table.get(1).unwrap().matches(&"C".into()));
        assert!(table.get(2).unwrap().matches(&"B".into()));
        assert!(table.get(3).unwrap().matches(&"D".into()));
        assert!(table.get(4).unwrap().matches(&AnswerValue::Number(439.6)));
        assert!(table.get(5).unwrap().matches(&AnswerValue::Number(385.0)));
        assert!(!table.get(4).unwrap().matches(&AnswerValue::Number(439.82)));
    }

    #[test]
    fn built_in_sets_validate_cleanly() {
        assert!(validate_question_set(&compact_quiz()).is_empty());
        assert!(validate_question_set(&adaptive_checks()).is_empty());
    }

    #[test]
    fn adaptive_checks_use_wider_tolerance() {
        let table = adaptive_checks().answer_table();
        let csa = table.get(CHECK_CSA).unwrap();
        assert!(csa.matches(&AnswerValue::Number(439.4)));
        assert!(!csa.matches(&AnswerValue::Number(439.2)));
        assert!(table
            .get(CHECK_TOWER)
            .unwrap()
            .matches(&AnswerValue::Number(3166.7)));
    }

    #[test]
    fn context_uses_distinct_answer_keys() {
        let store = MemoryStore::shared();
        let mut ctx = LessonContext::new(MathventureConfig::default(), store.clone());
        ctx.quiz.record_answer(1, "C".into());
        ctx.checks.record_answer(CHECK_CSA, AnswerValue::Number(439.8));
        assert!(store.get("quiz_answers").unwrap().is_some());
        assert!(store.get("checks_answers").unwrap().is_some());
        assert_eq!(results_screen_for(&ctx.quiz_set), 15);
    }

    #[test]
    fn quiz_report_carries_learner_and_weak_spots() {
        let store = MemoryStore::shared();
        let mut ctx = LessonContext::new(MathventureConfig::default(), store);
        ctx.profile.set_name("Asha").unwrap();
        ctx.checks.log_weak_spot(TOPIC_CSA);
        ctx.quiz.record_answer(3, "D".into());

        let report = ctx.quiz_report();
        assert_eq!(report.learner.as_deref(), Some("Asha"));
        assert_eq!(report.weak_spots, vec![TOPIC_CSA.to_string()]);
        assert_eq!(report.score.correct, 1);
    }
}
