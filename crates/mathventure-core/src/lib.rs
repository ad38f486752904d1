//! mathventure-core — lesson navigation, answer evaluation, and the
//! built-in cylinder lesson.
//!
//! The [`navigator`] sequences screens and owns the one live
//! [`traits::ScreenBehavior`]. The [`evaluator`] judges answers against a
//! [`model::CorrectAnswerTable`] and mirrors them to a [`store::BackupStore`].
//! Everything the CLI and report crates build on lives here.

pub mod config;
pub mod error;
pub mod evaluator;
pub mod geometry;
pub mod lesson;
pub mod model;
pub mod navigator;
pub mod parser;
pub mod report;
pub mod reveal;
pub mod screens;
pub mod statistics;
pub mod store;
pub mod traits;
