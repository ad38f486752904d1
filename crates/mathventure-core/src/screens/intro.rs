//! Screen 1: intro video and learner name capture.

use std::time::Instant;

use crate::error::InputError;
use crate::lesson::LessonContext;
use crate::navigator::ScreenDefinition;
use crate::traits::{ScreenBehavior, ScreenEvent, ScreenInput};

use super::{boxed, VideoPlayer};

const MARKUP: &str = "\
🎬 Welcome to the Math Adventure!
Watch the intro video, then tell us your name.

  play | replay        control the video
  enter <your name>    save your name";

pub fn definition() -> ScreenDefinition<LessonContext> {
    ScreenDefinition::static_markup(MARKUP).with_behavior(|ctx: &mut LessonContext, _| {
        boxed(IntroScreen {
            video: VideoPlayer::default(),
            max_name_len: ctx.config.learner_name_max_len,
        })
    })
}

struct IntroScreen {
    video: VideoPlayer,
    max_name_len: usize,
}

impl IntroScreen {
    fn validate_name(&self, raw: &str) -> Result<String, InputError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(InputError::Empty);
        }
        if name.chars().count() > self.max_name_len {
            return Err(InputError::TooLong {
                max: self.max_name_len,
            });
        }
        Ok(name.to_string())
    }
}

impl ScreenBehavior<LessonContext> for IntroScreen {
    fn on_input(
        &mut self,
        ctx: &mut LessonContext,
        input: &ScreenInput,
        _now: Instant,
    ) -> Vec<ScreenEvent> {
        match input {
            ScreenInput::Media { event } => self
                .video
                .handle(event, "Now tell us your name to begin the adventure!"),
            ScreenInput::Enter { text } => match self.validate_name(text) {
                Ok(name) => {
                    if let Err(e) = ctx.profile.set_name(&name) {
                        tracing::warn!("could not save learner name: {e}");
                    }
                    vec![
                        ScreenEvent::good(format!("Nice to meet you, {name}! 🎉")),
                        ScreenEvent::next(),
                    ]
                }
                Err(e) => vec![ScreenEvent::bad(e.to_string())],
            },
            _ => Vec::new(),
        }
    }

    fn dispose(&mut self) {
        self.video.stop();
    }
}
