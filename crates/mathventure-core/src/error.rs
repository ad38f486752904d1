//! Error types for the lesson core.
//!
//! Most of these are recovered locally (logged and degraded) rather than
//! surfaced to the learner. `InputError` is the exception: it carries the
//! inline message shown next to a rejected submission.

use thiserror::Error;

/// Errors raised while moving between screens.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    /// The requested screen is outside `1..=total`.
    #[error("screen {requested} is out of range (1..={total})")]
    OutOfRange { requested: usize, total: usize },

    /// The lesson has no screens registered.
    #[error("no screens registered")]
    EmptyLesson,
}

/// A screen behavior failed to set itself up.
#[derive(Debug, Error)]
pub enum BehaviorError {
    /// An element or resource the behavior depends on is missing.
    #[error("screen {screen}: missing {what}")]
    Missing { screen: usize, what: String },

    /// Construction panicked or failed for another reason.
    #[error("screen {screen}: {message}")]
    Failed { screen: usize, message: String },
}

/// Errors from the durable backup store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be encoded or decoded.
    #[error("store encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The store lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
}

/// Learner input that fails basic validity checks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Nothing was entered.
    #[error("Please enter an answer before submitting.")]
    Empty,

    /// A number was required.
    #[error("Please enter a number ({unit}).")]
    NotANumber { unit: String },

    /// A non-negative number was required.
    #[error("Please enter a valid positive number.")]
    Negative,

    /// No option was chosen.
    #[error("Please choose an option.")]
    NoSelection,

    /// The choice is not one of the offered options.
    #[error("'{0}' is not one of the options.")]
    UnknownOption(String),

    /// Text exceeds the allowed length.
    #[error("Please keep it under {max} characters.")]
    TooLong { max: usize },
}

impl InputError {
    /// Convenience constructor for [`InputError::NotANumber`].
    pub fn not_a_number(unit: impl Into<String>) -> Self {
        InputError::NotANumber { unit: unit.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_error_message() {
        let err = NavigationError::OutOfRange {
            requested: 0,
            total: 8,
        };
        assert_eq!(err.to_string(), "screen 0 is out of range (1..=8)");
    }

    #[test]
    fn input_error_messages_are_learner_facing() {
        assert_eq!(
            InputError::not_a_number("in cm²").to_string(),
            "Please enter a number (in cm²)."
        );
        assert_eq!(
            InputError::TooLong { max: 30 }.to_string(),
            "Please keep it under 30 characters."
        );
    }
}
