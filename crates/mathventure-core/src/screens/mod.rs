//! Behaviors for the built-in lesson screens.
//!
//! Each submodule exposes a `definition()` returning the screen's markup
//! and behavior factory. Behaviors keep their timers as deadlines
//! ([`crate::reveal`]) and cancel them in `dispose`.

pub mod adaptive;
pub mod beaker;
pub mod intro;
pub mod quiz;
pub mod simulation;
pub mod sticker;
pub mod tower;
pub mod video;

use crate::error::BehaviorError;
use crate::lesson::LessonContext;
use crate::traits::{MediaEvent, ScreenBehavior, ScreenEvent};

/// Boxed behavior as returned by a screen factory.
pub type BoxedBehavior = Box<dyn ScreenBehavior<LessonContext>>;

fn boxed<B>(behavior: B) -> Result<BoxedBehavior, BehaviorError>
where
    B: ScreenBehavior<LessonContext> + 'static,
{
    Ok(Box::new(behavior))
}

/// Playback state of an embedded video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Playback {
    #[default]
    Idle,
    Playing,
    Paused,
    Ended,
    /// The media failed; manual navigation stays available.
    Failed,
}

/// Tracks one video element and turns its events into learner feedback.
#[derive(Debug, Default)]
pub struct VideoPlayer {
    state: Playback,
}

impl VideoPlayer {
    pub fn state(&self) -> Playback {
        self.state
    }

    pub fn has_ended(&self) -> bool {
        self.state == Playback::Ended
    }

    /// Apply a media event. `ended_message` is shown when playback finishes.
    pub fn handle(&mut self, event: &MediaEvent, ended_message: &str) -> Vec<ScreenEvent> {
        match event {
            MediaEvent::Play => {
                self.state = Playback::Playing;
                vec![ScreenEvent::info("▶ Playing...")]
            }
            MediaEvent::Replay => {
                self.state = Playback::Playing;
                vec![ScreenEvent::info("🔁 Replaying from the start.")]
            }
            MediaEvent::Pause => {
                if self.state == Playback::Playing {
                    self.state = Playback::Paused;
                }
                Vec::new()
            }
            MediaEvent::Ended => {
                self.state = Playback::Ended;
                vec![ScreenEvent::good(ended_message)]
            }
            MediaEvent::Error(reason) => {
                tracing::warn!("video failed: {reason}");
                self.state = Playback::Failed;
                vec![ScreenEvent::notice(format!(
                    "The video could not be played ({reason}). Use Next to continue."
                ))]
            }
        }
    }

    pub fn stop(&mut self) {
        if self.state == Playback::Playing {
            self.state = Playback::Paused;
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_player_lifecycle() {
        let mut player = VideoPlayer::default();
        player.handle(&MediaEvent::Play, "done");
        assert_eq!(player.state(), Playback::Playing);
        player.handle(&MediaEvent::Pause, "done");
        assert_eq!(player.state(), Playback::Paused);
        let events = player.handle(&MediaEvent::Ended, "done");
        assert!(player.has_ended());
        assert_eq!(events, vec![ScreenEvent::good("done")]);
    }

    #[test]
    fn video_error_is_a_notice() {
        let mut player = VideoPlayer::default();
        let events = player.handle(&MediaEvent::Error("404".into()), "done");
        assert_eq!(player.state(), Playback::Failed);
        assert!(matches!(&events[0], ScreenEvent::Notice(m) if m.contains("404")));
    }
}
