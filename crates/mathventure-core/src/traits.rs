//! Core trait definitions for screen behaviors and the display host.
//!
//! A [`ScreenBehavior`] is the interactive logic attached to one screen while
//! it is active. A [`ScreenHost`] is whatever shows markup to the learner
//! (a terminal, a test recorder, a web page).

use std::path::PathBuf;
use std::time::Instant;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Learner input
// ---------------------------------------------------------------------------

/// A discrete input event routed to the active screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScreenInput {
    /// An option was clicked (`"rectangle"`, `"C"`, `"side-top-bottom"`).
    Select { choice: String },
    /// Free text was submitted (a name or a number).
    Enter { text: String },
    /// A slider moved.
    Adjust { control: String, value: f64 },
    /// A toggle button was pressed.
    Toggle { control: String },
    /// A named button without a payload ("fill", "retake", "ahead").
    Action { name: String },
    /// A media element fired a lifecycle event.
    Media { event: MediaEvent },
}

impl ScreenInput {
    pub fn select(choice: impl Into<String>) -> Self {
        ScreenInput::Select {
            choice: choice.into(),
        }
    }

    pub fn enter(text: impl Into<String>) -> Self {
        ScreenInput::Enter { text: text.into() }
    }

    pub fn adjust(control: impl Into<String>, value: f64) -> Self {
        ScreenInput::Adjust {
            control: control.into(),
            value,
        }
    }

    pub fn toggle(control: impl Into<String>) -> Self {
        ScreenInput::Toggle {
            control: control.into(),
        }
    }

    pub fn action(name: impl Into<String>) -> Self {
        ScreenInput::Action { name: name.into() }
    }

    pub fn media(event: MediaEvent) -> Self {
        ScreenInput::Media { event }
    }
}

/// Playback lifecycle of a media element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaEvent {
    Play,
    Replay,
    Pause,
    Ended,
    Error(String),
}

// ---------------------------------------------------------------------------
// Behavior output
// ---------------------------------------------------------------------------

/// How feedback should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Good,
    Bad,
    Info,
}

/// A navigation request raised by a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavRequest {
    Next,
    Previous,
    GoTo(usize),
}

/// Something a behavior wants shown or done after handling an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScreenEvent {
    /// Inline feedback next to the interaction.
    Feedback { tone: Tone, message: String },
    /// A platform capability notice (media failed, speech unavailable).
    Notice(String),
    /// Ask the navigator to move.
    Navigate(NavRequest),
}

impl ScreenEvent {
    pub fn good(message: impl Into<String>) -> Self {
        ScreenEvent::Feedback {
            tone: Tone::Good,
            message: message.into(),
        }
    }

    pub fn bad(message: impl Into<String>) -> Self {
        ScreenEvent::Feedback {
            tone: Tone::Bad,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        ScreenEvent::Feedback {
            tone: Tone::Info,
            message: message.into(),
        }
    }

    pub fn notice(message: impl Into<String>) -> Self {
        ScreenEvent::Notice(message.into())
    }

    pub fn go_to(screen: usize) -> Self {
        ScreenEvent::Navigate(NavRequest::GoTo(screen))
    }

    pub fn next() -> Self {
        ScreenEvent::Navigate(NavRequest::Next)
    }

    /// The feedback message, if this is a feedback event.
    pub fn message(&self) -> Option<&str> {
        match self {
            ScreenEvent::Feedback { message, .. } => Some(message),
            ScreenEvent::Notice(message) => Some(message),
            ScreenEvent::Navigate(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Screen behavior
// ---------------------------------------------------------------------------

/// Interactive logic attached to the active screen.
///
/// Construction is the initialize step: a factory builds the behavior once
/// the screen's markup is displayed. `C` is the lesson context shared by all
/// screens (answers, learner profile).
pub trait ScreenBehavior<C> {
    /// Handle one input event.
    fn on_input(&mut self, _ctx: &mut C, _input: &ScreenInput, _now: Instant) -> Vec<ScreenEvent> {
        Vec::new()
    }

    /// When this behavior next wants [`ScreenBehavior::on_timer`] called.
    fn next_deadline(&self) -> Option<Instant> {
        None
    }

    /// Fire any scheduled transitions that are due at `now`.
    fn on_timer(&mut self, _ctx: &mut C, _now: Instant) -> Vec<ScreenEvent> {
        Vec::new()
    }

    /// Release every timer and listener this behavior registered.
    ///
    /// Called exactly once, before the next screen is built. Must be safe
    /// after a partial initialization.
    fn dispose(&mut self);
}

// ---------------------------------------------------------------------------
// Display host
// ---------------------------------------------------------------------------

/// Per-screen optional resources resolved by naming convention.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenResources {
    pub stylesheet: Option<PathBuf>,
    pub script: Option<PathBuf>,
}

/// Pager affordances for the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerState {
    pub current: usize,
    pub total: usize,
    pub previous_enabled: bool,
    pub next_enabled: bool,
}

impl PagerState {
    pub fn new(current: usize, total: usize) -> Self {
        Self {
            current,
            total,
            previous_enabled: current > 1,
            next_enabled: current < total,
        }
    }

    pub fn label(&self) -> String {
        format!("Screen {} of {}", self.current, self.total)
    }
}

/// Receives everything the navigator wants displayed.
pub trait ScreenHost {
    /// Replace the displayed screen.
    fn render(&mut self, screen: usize, markup: &str, resources: &ScreenResources);

    /// Refresh previous/next buttons and the position label.
    fn update_pager(&mut self, pager: &PagerState);

    /// Show feedback and notices raised by the active behavior.
    fn show(&mut self, _events: &[ScreenEvent]) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pager_at_boundaries() {
        let first = PagerState::new(1, 8);
        assert!(!first.previous_enabled);
        assert!(first.next_enabled);

        let last = PagerState::new(8, 8);
        assert!(last.previous_enabled);
        assert!(!last.next_enabled);
        assert_eq!(last.label(), "Screen 8 of 8");
    }

    #[test]
    fn screen_input_json_shape() {
        let json = serde_json::to_string(&ScreenInput::adjust("r", 5.0)).unwrap();
        assert_eq!(json, r#"{"type":"adjust","control":"r","value":5.0}"#);
    }
}
