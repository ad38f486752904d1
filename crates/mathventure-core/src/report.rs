//! Quiz report types with JSON persistence and progress comparison.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::evaluator::{AssessmentEvaluator, QuizScore};
use crate::model::{AnswerValue, QuestionId, QuestionSet};
use crate::statistics::{improvements, score_message, strengths};

/// A graded quiz attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Learner display name, if one was captured.
    #[serde(default)]
    pub learner: Option<String>,
    /// Summary of the question set.
    pub question_set: QuestionSetSummary,
    /// One entry per question, in question order.
    pub outcomes: Vec<QuestionOutcome>,
    pub score: QuizScore,
    /// Encouragement for the score.
    pub message: String,
    /// Titles of correctly answered questions.
    pub strengths: Vec<String>,
    /// Titles of questions to revisit.
    pub improvements: Vec<String>,
    /// Topics logged as weak spots during the session.
    #[serde(default)]
    pub weak_spots: Vec<String>,
}

/// Summary of a question set (without the full question definitions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSetSummary {
    pub id: String,
    pub name: String,
    pub question_count: usize,
}

/// How one question went.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub id: QuestionId,
    pub title: String,
    #[serde(default)]
    pub topic: String,
    /// The learner's answer; `None` if left blank.
    pub answer: Option<AnswerValue>,
    pub expected: AnswerValue,
    pub correct: bool,
}

impl QuizReport {
    /// Grade the evaluator's current answers against `set`.
    pub fn build(
        set: &QuestionSet,
        evaluator: &AssessmentEvaluator,
        learner: Option<String>,
        weak_spots: Vec<String>,
    ) -> Self {
        let outcomes = set
            .questions
            .iter()
            .map(|q| QuestionOutcome {
                id: q.id,
                title: q.title.clone(),
                topic: q.topic.clone(),
                answer: evaluator.answer(q.id).cloned(),
                expected: q.expected.value.clone(),
                correct: evaluator.is_correct(q.id),
            })
            .collect();
        let score = evaluator.score();

        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            learner,
            question_set: QuestionSetSummary {
                id: set.id.clone(),
                name: set.name.clone(),
                question_count: set.questions.len(),
            },
            outcomes,
            score,
            message: score_message(score).to_string(),
            strengths: strengths(set, evaluator),
            improvements: improvements(set, evaluator),
            weak_spots,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: QuizReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Compare this attempt against an earlier one.
    pub fn compare(&self, baseline: &QuizReport) -> ProgressReport {
        let outcome_map = |report: &QuizReport| -> BTreeMap<QuestionId, (String, bool)> {
            report
                .outcomes
                .iter()
                .map(|o| (o.id, (o.title.clone(), o.correct)))
                .collect()
        };

        let baseline_outcomes = outcome_map(baseline);
        let current_outcomes = outcome_map(self);

        let mut newly_correct = Vec::new();
        let mut newly_incorrect = Vec::new();
        let mut unchanged = 0usize;
        let mut new_questions = 0usize;

        for (&id, (title, current)) in &current_outcomes {
            match baseline_outcomes.get(&id) {
                Some((_, before)) if before == current => unchanged += 1,
                Some(_) => {
                    let change = QuestionChange {
                        id,
                        title: title.clone(),
                    };
                    if *current {
                        newly_correct.push(change);
                    } else {
                        newly_incorrect.push(change);
                    }
                }
                None => new_questions += 1,
            }
        }

        let removed_questions = baseline_outcomes
            .keys()
            .filter(|id| !current_outcomes.contains_key(id))
            .count();

        ProgressReport {
            baseline_score: baseline.score,
            current_score: self.score,
            newly_correct,
            newly_incorrect,
            unchanged,
            new_questions,
            removed_questions,
        }
    }
}

/// Result of comparing two quiz attempts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    pub baseline_score: QuizScore,
    pub current_score: QuizScore,
    /// Questions missed before and answered correctly now.
    pub newly_correct: Vec<QuestionChange>,
    /// Questions answered correctly before and missed now.
    pub newly_incorrect: Vec<QuestionChange>,
    /// Questions with the same outcome in both attempts.
    pub unchanged: usize,
    /// Questions in current but not baseline.
    pub new_questions: usize,
    /// Questions in baseline but not current.
    pub removed_questions: usize,
}

/// A question whose outcome flipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionChange {
    pub id: QuestionId,
    pub title: String,
}

impl ProgressReport {
    /// Format the progress report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Score:** {}/{} → {}/{}\n\n",
            self.baseline_score.correct,
            self.baseline_score.total,
            self.current_score.correct,
            self.current_score.total
        ));
        md.push_str(&format!(
            "**Summary:** {} newly correct, {} newly incorrect, {} unchanged\n\n",
            self.newly_correct.len(),
            self.newly_incorrect.len(),
            self.unchanged
        ));

        let mut section = |heading: &str, changes: &[QuestionChange]| {
            if changes.is_empty() {
                return;
            }
            md.push_str(&format!("### {heading}\n\n"));
            md.push_str("| Question | Title |\n");
            md.push_str("|----------|-------|\n");
            for c in changes {
                md.push_str(&format!("| {} | {} |\n", c.id, c.title));
            }
            md.push('\n');
        };
        section("Newly correct", &self.newly_correct);
        section("Newly incorrect", &self.newly_incorrect);

        md
    }

    /// Returns true if any previously correct question is now wrong.
    pub fn has_regressions(&self) -> bool {
        !self.newly_incorrect.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lesson::compact_quiz;
    use crate::store::MemoryStore;

    fn report_for(answers: &[(QuestionId, AnswerValue)]) -> QuizReport {
        let set = compact_quiz();
        let mut eval = AssessmentEvaluator::for_set(&set, MemoryStore::shared());
        for (id, value) in answers {
            eval.record_answer(*id, value.clone());
        }
        QuizReport::build(&set, &eval, Some("Asha".into()), vec![])
    }

    #[test]
    fn build_grades_every_question() {
        let report = report_for(&[(1, "C".into()), (4, AnswerValue::Number(439.6))]);
        assert_eq!(report.score, QuizScore { correct: 2, total: 5 });
        assert_eq!(report.message, "📚 Not bad! Keep practicing!");
        assert_eq!(report.outcomes.len(), 5);
        assert!(report.outcomes[0].correct);
        assert_eq!(report.outcomes[1].answer, None);
        assert_eq!(report.strengths.len(), 2);
        assert_eq!(report.improvements.len(), 3);
    }

    #[test]
    fn compare_identical_reports() {
        let answers: [(QuestionId, AnswerValue); 1] = [(1, "C".into())];
        let report = report_for(&answers).compare(&report_for(&answers));
        assert!(report.newly_correct.is_empty());
        assert!(report.newly_incorrect.is_empty());
        assert_eq!(report.unchanged, 5);
    }

    #[test]
    fn compare_detects_flips() {
        let baseline = report_for(&[(1, "C".into()), (2, "A".into())]);
        let current = report_for(&[(1, "A".into()), (2, "B".into())]);

        let progress = current.compare(&baseline);
        assert_eq!(progress.newly_correct.len(), 1);
        assert_eq!(progress.newly_correct[0].title, "Water Tank Transfer");
        assert_eq!(progress.newly_incorrect[0].id, 1);
        assert!(progress.has_regressions());
    }

    #[test]
    fn compare_with_new_and_removed() {
        let baseline = report_for(&[]);
        let mut current = report_for(&[]);
        current.outcomes.retain(|o| o.id != 5);
        current.outcomes.push(QuestionOutcome {
            id: 6,
            title: "Extra".into(),
            topic: String::new(),
            answer: None,
            expected: "A".into(),
            correct: false,
        });

        let progress = current.compare(&baseline);
        assert_eq!(progress.new_questions, 1);
        assert_eq!(progress.removed_questions, 1);
    }

    #[test]
    fn json_roundtrip() {
        let report = report_for(&[(5, AnswerValue::Number(385.0))]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        report.save_json(&path).unwrap();
        let loaded = QuizReport::load_json(&path).unwrap();

        assert_eq!(loaded.question_set.id, "quiz");
        assert_eq!(loaded.learner.as_deref(), Some("Asha"));
        assert!(loaded.outcomes[4].correct);
    }

    #[test]
    fn markdown_output() {
        let baseline = report_for(&[(1, "C".into())]);
        let current = report_for(&[]);
        let md = current.compare(&baseline).to_markdown();
        assert!(md.contains("Newly incorrect"));
        assert!(md.contains("Cylinder in a Cube"));
        assert!(md.contains("1/5 → 0/5"));
    }
}
