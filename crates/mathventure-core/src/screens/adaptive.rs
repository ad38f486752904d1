//! Screen 6: adaptive check with tiered remediation.
//!
//! Q1 (typed CSA) walks the remediation tiers: first miss shows a hint and
//! blocks retries while the helper bot "flies over", second miss stages the
//! worked solution, third miss logs a weak spot and closes the question.
//! Q2 (TSA parts) logs a weak spot on any wrong choice. Once both are
//! settled the learner picks "deeper" or "ahead".

use std::time::Instant;

use crate::evaluator::{Judgement, RemediationTier};
use crate::lesson::{LessonContext, CHECK_CSA, CHECK_TSA_PARTS, TOPIC_TSA_CONCEPT, TOWER_SCREEN};
use crate::model::Question;
use crate::navigator::ScreenDefinition;
use crate::reveal::{RevealTransition, StagedReveal};
use crate::traits::{ScreenBehavior, ScreenEvent, ScreenInput};

use super::boxed;

const MARKUP: &str = "\
✅ Quick check
Q1. A cylinder has r = 7 cm and h = 10 cm. What is its curved surface area (cm²)?
    enter <number>
Q2. Which parts make up the total surface area of a closed cylinder?
    pick side-only | top-bottom-only | side-top-bottom";

pub fn definition() -> ScreenDefinition<LessonContext> {
    ScreenDefinition::static_markup(MARKUP).with_behavior(|ctx: &mut LessonContext, _| {
        let q1 = ctx
            .checks_set
            .question(CHECK_CSA)
            .cloned()
            .ok_or_else(|| crate::error::BehaviorError::Missing {
                screen: 6,
                what: format!("check question {CHECK_CSA}"),
            })?;
        boxed(AdaptiveCheck {
            q1,
            q1_settled: false,
            q2_settled: false,
            path_offered: false,
            reveal: StagedReveal::new(),
        })
    })
}

struct AdaptiveCheck {
    q1: Question,
    /// Answered correctly, or closed after the weak-spot tier.
    q1_settled: bool,
    q2_settled: bool,
    path_offered: bool,
    reveal: StagedReveal,
}

impl AdaptiveCheck {
    fn handle_q1(&mut self, ctx: &mut LessonContext, raw: &str, now: Instant) -> Vec<ScreenEvent> {
        if self.q1_settled {
            return vec![ScreenEvent::info("Q1 is done. Try Q2!")];
        }
        if !self.reveal.accepts_answers() {
            return vec![ScreenEvent::info("Hold on, help is on the way! 🤖")];
        }
        let value = match self.q1.parse_answer(raw) {
            Ok(value) => value,
            Err(e) => return vec![ScreenEvent::bad(e.to_string())],
        };

        match ctx.checks.submit(self.q1.id, value, &self.q1.topic) {
            Judgement::Correct => {
                self.q1_settled = true;
                self.reveal.cancel();
                let mut events = vec![ScreenEvent::good("Great job! ✅")];
                events.extend(self.offer_path(ctx));
                events
            }
            Judgement::Incorrect { tier, .. } => match tier {
                RemediationTier::Hint => {
                    self.reveal.begin_hint(now, ctx.config.hint_delay());
                    let mut events = vec![ScreenEvent::info("Let me give you a hint! 🤖")];
                    if let Some(hint) = &self.q1.hint {
                        events.push(ScreenEvent::info(hint.clone()));
                    }
                    events
                }
                RemediationTier::WorkedSolution => {
                    self.reveal.begin_reveal(now, ctx.config.solution_delay());
                    let mut events = vec![ScreenEvent::info("Let me help here! 🤖")];
                    if self.reveal.deadline().is_none() {
                        events.extend(self.solution());
                    }
                    events
                }
                RemediationTier::WeakSpot => {
                    self.q1_settled = true;
                    let mut events = vec![ScreenEvent::bad(
                        "We will revisit this later. Moving on for now.",
                    )];
                    events.extend(self.offer_path(ctx));
                    events
                }
            },
        }
    }

    fn handle_q2(&mut self, ctx: &mut LessonContext, choice: &str) -> Vec<ScreenEvent> {
        let Some(question) = ctx.checks_set.question(CHECK_TSA_PARTS) else {
            return Vec::new();
        };
        let value = match question.parse_answer(choice) {
            Ok(value) => value,
            Err(_) => return vec![ScreenEvent::bad("Please choose an option.")],
        };

        ctx.checks.record_answer(CHECK_TSA_PARTS, value);
        if ctx.checks.is_correct(CHECK_TSA_PARTS) {
            self.q2_settled = true;
            let mut events = vec![ScreenEvent::good(
                "Correct! TSA includes side + top + bottom. ✅",
            )];
            events.extend(self.offer_path(ctx));
            return events;
        }

        ctx.checks.attempt(CHECK_TSA_PARTS);
        ctx.checks.log_weak_spot(TOPIC_TSA_CONCEPT);
        let missing = match choice {
            "side-only" => "You're missing the top and bottom circles!",
            _ => "You're missing the curved side!",
        };
        vec![ScreenEvent::bad(missing)]
    }

    fn offer_path(&mut self, ctx: &LessonContext) -> Option<ScreenEvent> {
        if self.path_offered || !(self.q1_settled && self.q2_settled) {
            return None;
        }
        self.path_offered = true;
        Some(ScreenEvent::good(format!(
            "Awesome, {}! Choose your path: Go Deeper or Move Ahead.",
            ctx.learner_name()
        )))
    }

    fn solution(&self) -> Vec<ScreenEvent> {
        self.q1
            .solution
            .iter()
            .map(|s| ScreenEvent::info(s.clone()))
            .collect()
    }
}

impl ScreenBehavior<LessonContext> for AdaptiveCheck {
    fn on_input(
        &mut self,
        ctx: &mut LessonContext,
        input: &ScreenInput,
        now: Instant,
    ) -> Vec<ScreenEvent> {
        match input {
            ScreenInput::Enter { text } => self.handle_q1(ctx, text, now),
            ScreenInput::Select { choice } => self.handle_q2(ctx, choice),
            ScreenInput::Action { name } if self.path_offered => match name.as_str() {
                "ahead" => vec![ScreenEvent::go_to(TOWER_SCREEN)],
                "deeper" => vec![ScreenEvent::info("Challenge coming up next!")],
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.reveal.deadline()
    }

    fn on_timer(&mut self, _ctx: &mut LessonContext, now: Instant) -> Vec<ScreenEvent> {
        match self.reveal.poll(now) {
            Some(RevealTransition::RetryAllowed) => {
                vec![ScreenEvent::info("Ready to help! 🤖 Give Q1 another try.")]
            }
            Some(RevealTransition::SolutionShown) => self.solution(),
            None => Vec::new(),
        }
    }

    fn dispose(&mut self) {
        self.reveal.cancel();
    }
}
