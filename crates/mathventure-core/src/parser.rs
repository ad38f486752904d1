//! TOML question-set parser.
//!
//! Loads question sets from TOML files and directories, and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{
    AnswerRule, AnswerValue, ChoiceOption, ExpectedAnswer, Question, QuestionId, QuestionSet,
};

/// Intermediate TOML structure for parsing question-set files.
#[derive(Debug, Deserialize)]
struct TomlQuestionFile {
    question_set: TomlQuestionSetHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlQuestionSetHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: QuestionId,
    #[serde(default)]
    title: String,
    prompt: String,
    #[serde(default)]
    topic: String,
    answer: AnswerValue,
    #[serde(default)]
    tolerance: Option<f64>,
    #[serde(default)]
    options: Vec<TomlOption>,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default)]
    hint: Option<String>,
    #[serde(default)]
    solution: Option<String>,
}

/// Options may be bare tokens or `{ token, label }` tables.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TomlOption {
    Token(String),
    Labelled { token: String, label: String },
}

impl From<TomlOption> for ChoiceOption {
    fn from(option: TomlOption) -> Self {
        match option {
            TomlOption::Token(token) => ChoiceOption::new(token.clone(), token),
            TomlOption::Labelled { token, label } => ChoiceOption::new(token, label),
        }
    }
}

/// Parse a single TOML file into a `QuestionSet`.
pub fn parse_question_set(path: &Path) -> Result<QuestionSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question set file: {}", path.display()))?;

    parse_question_set_str(&content, path)
}

/// Parse a TOML string into a `QuestionSet` (useful for testing).
pub fn parse_question_set_str(content: &str, source_path: &Path) -> Result<QuestionSet> {
    let parsed: TomlQuestionFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            let expected = match (&q.answer, q.tolerance) {
                // Numeric answers without a tolerance compare exactly; validation flags it.
                (AnswerValue::Number(n), tolerance) => {
                    ExpectedAnswer::numeric(*n, tolerance.unwrap_or(0.0))
                }
                (AnswerValue::Choice(token), _) => ExpectedAnswer::choice(token.clone()),
            };
            let title = if q.title.is_empty() {
                format!("Question {}", q.id)
            } else {
                q.title
            };
            Question {
                id: q.id,
                title,
                prompt: q.prompt,
                topic: q.topic,
                options: q.options.into_iter().map(ChoiceOption::from).collect(),
                expected,
                unit: q.unit,
                hint: q.hint,
                solution: q.solution,
            }
        })
        .collect();

    Ok(QuestionSet {
        id: parsed.question_set.id,
        name: parsed.question_set.name,
        description: parsed.question_set.description,
        questions,
    })
}

/// Recursively load all `.toml` question-set files from a directory.
pub fn load_question_directory(dir: &Path) -> Result<Vec<QuestionSet>> {
    let mut sets = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            sets.extend(load_question_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_question_set(&path) {
                Ok(set) => sets.push(set),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    sets.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(sets)
}

/// Load a single file or every set under a directory.
pub fn load_question_sets(path: &Path) -> Result<Vec<QuestionSet>> {
    if path.is_dir() {
        load_question_directory(path)
    } else {
        Ok(vec![parse_question_set(path)?])
    }
}

/// A warning from question-set validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question id (if applicable).
    pub question_id: Option<QuestionId>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn for_question(id: QuestionId, message: impl Into<String>) -> Self {
        Self {
            question_id: Some(id),
            message: message.into(),
        }
    }
}

/// Validate a question set for common issues.
pub fn validate_question_set(set: &QuestionSet) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if set.questions.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "question set has no questions".into(),
        });
    }

    let mut seen_ids = HashSet::new();
    for q in &set.questions {
        if !seen_ids.insert(q.id) {
            warnings.push(ValidationWarning::for_question(
                q.id,
                format!("duplicate question id: {}", q.id),
            ));
        }
    }

    for q in &set.questions {
        if q.prompt.trim().is_empty() {
            warnings.push(ValidationWarning::for_question(q.id, "prompt is empty"));
        }

        match (q.expected.rule, &q.expected.value) {
            (AnswerRule::AbsoluteTolerance { epsilon }, _) if epsilon == 0.0 => {
                warnings.push(ValidationWarning::for_question(
                    q.id,
                    "numeric answer has no tolerance; only an exact value will be accepted",
                ));
            }
            (AnswerRule::AbsoluteTolerance { epsilon }, _) if epsilon < 0.0 || epsilon.is_nan() => {
                warnings.push(ValidationWarning::for_question(
                    q.id,
                    format!("tolerance must be positive, got {epsilon}"),
                ));
            }
            (AnswerRule::ExactMatch, AnswerValue::Choice(token))
                if !q.options.is_empty() && !q.options.iter().any(|o| &o.token == token) =>
            {
                warnings.push(ValidationWarning::for_question(
                    q.id,
                    format!("answer '{token}' is not among the options"),
                ));
            }
            _ => {}
        }
    }

    warnings
}
