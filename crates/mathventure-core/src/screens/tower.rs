//! Screen 7: how much paint does the water tower need?

use std::time::Instant;

use crate::evaluator::Judgement;
use crate::lesson::{tower_cylinder, LessonContext, CHECK_TOWER};
use crate::model::Question;
use crate::navigator::ScreenDefinition;
use crate::reveal::Delay;
use crate::traits::{ScreenBehavior, ScreenEvent, ScreenInput};

use super::boxed;

const MARKUP: &str = "\
🗼 The town's water tower needs a fresh coat of paint.
Can you work out how much surface needs painting?

  pick yes | no";

pub fn definition() -> ScreenDefinition<LessonContext> {
    ScreenDefinition::static_markup(MARKUP).with_behavior(|ctx: &mut LessonContext, _| {
        let question = ctx.checks_set.question(CHECK_TOWER).cloned().ok_or_else(|| {
            crate::error::BehaviorError::Missing {
                screen: crate::lesson::TOWER_SCREEN,
                what: format!("check question {CHECK_TOWER}"),
            }
        })?;
        boxed(TowerScreen {
            question,
            started: false,
            nudge: Delay::default(),
        })
    })
}

struct TowerScreen {
    question: Question,
    started: bool,
    nudge: Delay,
}

impl TowerScreen {
    fn start(&mut self) -> Vec<ScreenEvent> {
        self.started = true;
        self.nudge.cancel();
        vec![ScreenEvent::info(format!(
            "{} Answer in m².",
            self.question.prompt
        ))]
    }

    fn check(&mut self, ctx: &mut LessonContext, raw: &str) -> Vec<ScreenEvent> {
        let value = match self.question.parse_answer(raw) {
            Ok(value) => value,
            Err(e) => return vec![ScreenEvent::bad(e.to_string())],
        };
        let csa = tower_cylinder().curved_surface_area();
        match ctx.checks.submit(self.question.id, value, &self.question.topic) {
            Judgement::Correct => vec![ScreenEvent::good(format!(
                "Great! CSA = 2πrh = {csa:.2} m²."
            ))],
            Judgement::Incorrect { attempt: 1, .. } => self
                .question
                .hint
                .iter()
                .map(|h| ScreenEvent::bad(h.clone()))
                .collect(),
            Judgement::Incorrect { .. } => self
                .question
                .solution
                .iter()
                .map(|s| ScreenEvent::bad(s.clone()))
                .collect(),
        }
    }
}

impl ScreenBehavior<LessonContext> for TowerScreen {
    fn on_input(
        &mut self,
        ctx: &mut LessonContext,
        input: &ScreenInput,
        now: Instant,
    ) -> Vec<ScreenEvent> {
        match input {
            ScreenInput::Select { choice } if !self.started => match choice.as_str() {
                "yes" => self.start(),
                "no" => {
                    if !self.nudge.is_pending() {
                        self.nudge.schedule(now, ctx.config.nudge_delay());
                    }
                    vec![ScreenEvent::info(
                        "No worries, let's try it together! 💪",
                    )]
                }
                _ => vec![ScreenEvent::bad("Please answer yes or no.")],
            },
            ScreenInput::Enter { text } if self.started => self.check(ctx, text),
            ScreenInput::Enter { .. } => {
                vec![ScreenEvent::info("Answer yes or no first!")]
            }
            _ => Vec::new(),
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.nudge.deadline()
    }

    fn on_timer(&mut self, _ctx: &mut LessonContext, now: Instant) -> Vec<ScreenEvent> {
        if self.nudge.fire(now) && !self.started {
            self.start()
        } else {
            Vec::new()
        }
    }

    fn dispose(&mut self) {
        self.nudge.cancel();
    }
}
