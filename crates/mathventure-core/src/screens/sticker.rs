//! Screen 2: what shape is the dabba's sticker when peeled off?

use std::time::Instant;

use crate::lesson::LessonContext;
use crate::navigator::ScreenDefinition;
use crate::traits::{ScreenBehavior, ScreenEvent, ScreenInput};

use super::boxed;

const MARKUP: &str = "\
🥫 Peel the sticker off a cylindrical dabba and spread it flat.
What shape do you get?

  pick square | rectangle | circle | something-else";

const CORRECT: &str = "rectangle";

pub fn definition() -> ScreenDefinition<LessonContext> {
    ScreenDefinition::static_markup(MARKUP)
        .with_behavior(|_: &mut LessonContext, _| boxed(StickerScreen { solved: false }))
}

struct StickerScreen {
    solved: bool,
}

fn feedback_for(choice: &str) -> &'static str {
    match choice {
        "rectangle" => {
            "🎉 Perfect! You got it right! When you peel the sticker off a cylindrical dabba \
             and spread it flat, it becomes a rectangle! 🌟"
        }
        "square" => {
            "Close! Think about the shape - a cylinder has height and circumference. \
             When flattened, what does that make? 🤔"
        }
        "circle" => {
            "Good thinking! But remember, we're peeling off the sticker (the label) and \
             spreading it flat, not the top or bottom! 🔍"
        }
        "something-else" => {
            "Interesting choice! But let's think about this - when you unroll a cylinder's \
             label, what shape do you get? 📐"
        }
        _ => "Please select an option! 🎯",
    }
}

impl ScreenBehavior<LessonContext> for StickerScreen {
    fn on_input(
        &mut self,
        _ctx: &mut LessonContext,
        input: &ScreenInput,
        _now: Instant,
    ) -> Vec<ScreenEvent> {
        let ScreenInput::Select { choice } = input else {
            return Vec::new();
        };
        let message = feedback_for(choice);
        if choice == CORRECT {
            self.solved = true;
            vec![
                ScreenEvent::good(message),
                ScreenEvent::info("Rectangle: 2πr × h"),
            ]
        } else {
            vec![ScreenEvent::bad(message)]
        }
    }

    fn dispose(&mut self) {
        tracing::debug!(solved = self.solved, "sticker screen closed");
    }
}
