//! Short-lived state machines for staged reveals.
//!
//! Screens that "show a hint, wait, then allow a retry" or count down before
//! moving on keep one of these instead of chaining timers. Each exposes its
//! next deadline so the owning behavior can report it to the navigator, and
//! `cancel` drops whatever is pending when the behavior is disposed.

use std::time::{Duration, Instant};

/// Phase of a hint / solution reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    /// Nothing pending; the learner may answer.
    Idle,
    /// A hint is playing; retries unlock at `until`.
    Hinting { until: Instant },
    /// The worked solution is being staged; it appears at `until`.
    Revealing { until: Instant },
    /// The worked solution is visible.
    Revealed,
}

/// A transition fired by [`StagedReveal::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealTransition {
    RetryAllowed,
    SolutionShown,
}

/// `Idle → Hinting → Idle` and `→ Revealing → Revealed`.
#[derive(Debug, Clone)]
pub struct StagedReveal {
    phase: RevealPhase,
}

impl Default for StagedReveal {
    fn default() -> Self {
        Self::new()
    }
}

impl StagedReveal {
    pub fn new() -> Self {
        Self {
            phase: RevealPhase::Idle,
        }
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    /// Whether the learner may submit right now.
    pub fn accepts_answers(&self) -> bool {
        matches!(self.phase, RevealPhase::Idle | RevealPhase::Revealed)
    }

    /// Start showing a hint that blocks retries for `delay`.
    pub fn begin_hint(&mut self, now: Instant, delay: Duration) {
        self.phase = RevealPhase::Hinting { until: now + delay };
    }

    /// Stage the worked solution to appear after `delay`.
    pub fn begin_reveal(&mut self, now: Instant, delay: Duration) {
        self.phase = if delay.is_zero() {
            RevealPhase::Revealed
        } else {
            RevealPhase::Revealing { until: now + delay }
        };
    }

    /// Fire the pending transition if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<RevealTransition> {
        match self.phase {
            RevealPhase::Hinting { until } if now >= until => {
                self.phase = RevealPhase::Idle;
                Some(RevealTransition::RetryAllowed)
            }
            RevealPhase::Revealing { until } if now >= until => {
                self.phase = RevealPhase::Revealed;
                Some(RevealTransition::SolutionShown)
            }
            _ => None,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self.phase {
            RevealPhase::Hinting { until } | RevealPhase::Revealing { until } => Some(until),
            RevealPhase::Idle | RevealPhase::Revealed => None,
        }
    }

    /// Drop any pending transition.
    pub fn cancel(&mut self) {
        if self.deadline().is_some() {
            self.phase = RevealPhase::Idle;
        }
    }
}

/// A one-shot delay, e.g. "advance one second after submitting".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delay {
    due: Option<Instant>,
}

impl Delay {
    pub fn schedule(&mut self, now: Instant, after: Duration) {
        self.due = Some(now + after);
    }

    /// True exactly once, when the delay has elapsed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.due
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }
}

/// Counts down in fixed intervals.
#[derive(Debug, Clone)]
pub struct Countdown {
    remaining: u32,
    interval: Duration,
    next_tick: Option<Instant>,
}

impl Countdown {
    pub fn start(now: Instant, from: u32, interval: Duration) -> Self {
        Self {
            remaining: from,
            interval,
            next_tick: (from > 0).then(|| now + interval),
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.next_tick
    }

    /// Apply every tick due by `now`; returns how many fired.
    pub fn tick(&mut self, now: Instant) -> u32 {
        let mut fired = 0;
        while let Some(at) = self.next_tick {
            if now < at {
                break;
            }
            self.remaining -= 1;
            fired += 1;
            self.next_tick = (self.remaining > 0).then(|| at + self.interval);
        }
        fired
    }

    pub fn cancel(&mut self) {
        self.next_tick = None;
    }
}
