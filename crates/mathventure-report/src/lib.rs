//! mathventure-report — render graded quiz attempts for teachers and parents.
//!
//! JSON persistence lives on [`mathventure_core::report::QuizReport`]
//! itself; this crate adds the self-contained HTML view.

pub mod html;

pub use html::{generate_html, write_html_report};
