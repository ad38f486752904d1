//! Core data model types for mathventure.
//!
//! Questions, expected answers and the comparison rules used to judge them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Question numbers are 1-based and unique within a question set.
pub type QuestionId = u32;

/// A learner's answer: a discrete choice token or a numeric measurement.
///
/// Serialized untagged so a stored answer record is a flat JSON object such
/// as `{"1":"C","4":439.6}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Number(f64),
    Choice(String),
}

impl AnswerValue {
    pub fn choice(token: impl Into<String>) -> Self {
        AnswerValue::Choice(token.into())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(n) => Some(*n),
            AnswerValue::Choice(_) => None,
        }
    }

    pub fn as_choice(&self) -> Option<&str> {
        match self {
            AnswerValue::Choice(s) => Some(s),
            AnswerValue::Number(_) => None,
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Number(n) => write!(f, "{n}"),
            AnswerValue::Choice(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for AnswerValue {
    fn from(n: f64) -> Self {
        AnswerValue::Number(n)
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        AnswerValue::Choice(s.to_string())
    }
}

/// How a recorded answer is compared with the expected one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerRule {
    /// Case-sensitive equality.
    ExactMatch,
    /// `|recorded - expected| <= epsilon`.
    AbsoluteTolerance { epsilon: f64 },
}

/// Expected value for one question plus its comparison rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedAnswer {
    pub value: AnswerValue,
    pub rule: AnswerRule,
}

impl ExpectedAnswer {
    /// A discrete choice compared by exact match.
    pub fn choice(token: impl Into<String>) -> Self {
        Self {
            value: AnswerValue::Choice(token.into()),
            rule: AnswerRule::ExactMatch,
        }
    }

    /// A numeric value compared within `epsilon`.
    pub fn numeric(value: f64, epsilon: f64) -> Self {
        Self {
            value: AnswerValue::Number(value),
            rule: AnswerRule::AbsoluteTolerance { epsilon },
        }
    }

    /// Whether `recorded` satisfies this expectation.
    ///
    /// A value of the wrong kind (a choice for a numeric question or the
    /// reverse) never matches.
    pub fn matches(&self, recorded: &AnswerValue) -> bool {
        match (self.rule, &self.value, recorded) {
            (AnswerRule::ExactMatch, expected, recorded) => expected == recorded,
            (
                AnswerRule::AbsoluteTolerance { epsilon },
                AnswerValue::Number(expected),
                AnswerValue::Number(recorded),
            ) => (recorded - expected).abs() <= epsilon,
            (AnswerRule::AbsoluteTolerance { .. }, _, _) => false,
        }
    }
}

/// Immutable question-number → expected answer mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrectAnswerTable {
    entries: BTreeMap<QuestionId, ExpectedAnswer>,
}

impl CorrectAnswerTable {
    pub fn new(entries: impl IntoIterator<Item = (QuestionId, ExpectedAnswer)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, id: QuestionId) -> Option<&ExpectedAnswer> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Question ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = QuestionId> + '_ {
        self.entries.keys().copied()
    }
}

/// One selectable option of a discrete question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// Token recorded when this option is chosen (e.g. "C").
    pub token: String,
    /// Text shown to the learner.
    pub label: String,
}

impl ChoiceOption {
    pub fn new(token: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            label: label.into(),
        }
    }
}

/// A single assessment question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    /// Short title used in results ("Tin Can Surface Area").
    pub title: String,
    /// The question as posed to the learner.
    pub prompt: String,
    /// Weak-spot tag recorded after repeated misses.
    #[serde(default)]
    pub topic: String,
    /// Options for discrete questions; empty for numeric entry.
    #[serde(default)]
    pub options: Vec<ChoiceOption>,
    pub expected: ExpectedAnswer,
    /// Unit shown with numeric entry ("cm²").
    #[serde(default)]
    pub unit: Option<String>,
    /// Tier-1 remediation: nudge without revealing the method.
    #[serde(default)]
    pub hint: Option<String>,
    /// Tier-2 remediation: the fully worked solution.
    #[serde(default)]
    pub solution: Option<String>,
}

impl Question {
    pub fn is_numeric(&self) -> bool {
        matches!(self.expected.rule, AnswerRule::AbsoluteTolerance { .. })
    }

    /// Validate raw learner text and turn it into an [`AnswerValue`].
    ///
    /// Discrete questions accept only one of the option tokens; numeric
    /// questions accept any non-negative number.
    pub fn parse_answer(&self, raw: &str) -> Result<AnswerValue, InputError> {
        if self.is_numeric() {
            let unit = self.unit.as_deref().unwrap_or("a number");
            parse_non_negative(raw, unit).map(AnswerValue::Number)
        } else {
            let token = raw.trim();
            if token.is_empty() {
                return Err(InputError::NoSelection);
            }
            if !self.options.is_empty() && !self.options.iter().any(|o| o.token == token) {
                return Err(InputError::UnknownOption(token.to_string()));
            }
            Ok(AnswerValue::Choice(token.to_string()))
        }
    }
}

/// A named, ordered collection of questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionSet {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl QuestionSet {
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Build the answer key for this set.
    pub fn answer_table(&self) -> CorrectAnswerTable {
        CorrectAnswerTable::new(self.questions.iter().map(|q| (q.id, q.expected.clone())))
    }

    /// Backup-store key under which this set's answers are mirrored.
    pub fn answers_key(&self) -> String {
        format!("{}_answers", self.id)
    }
}

/// Parse a number, rejecting empty text and non-numeric input.
pub fn parse_number(raw: &str, unit: &str) -> Result<f64, InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputError::Empty);
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(InputError::not_a_number(unit)),
    }
}

/// Like [`parse_number`] but also rejects negative values.
pub fn parse_non_negative(raw: &str, unit: &str) -> Result<f64, InputError> {
    let n = parse_number(raw, unit)?;
    if n < 0.0 {
        return Err(InputError::Negative);
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_tolerance_is_inclusive() {
        let expected = ExpectedAnswer::numeric(439.82, 0.5);
        assert!(expected.matches(&AnswerValue::Number(439.4)));
        assert!(!expected.matches(&AnswerValue::Number(439.2)));
        assert!(expected.matches(&AnswerValue::Number(440.32)));
    }

    #[test]
    fn exact_match_is_case_sensitive() {
        let expected = ExpectedAnswer::choice("side-top-bottom");
        assert!(expected.matches(&"side-top-bottom".into()));
        assert!(!expected.matches(&"side-only".into()));
        assert!(!expected.matches(&"Side-Top-Bottom".into()));
    }

    #[test]
    fn mismatched_kinds_never_match() {
        assert!(!ExpectedAnswer::numeric(385.0, 0.1).matches(&"385".into()));
        assert!(!ExpectedAnswer::choice("C").matches(&AnswerValue::Number(3.0)));
    }

    #[test]
    fn answer_record_serializes_flat() {
        let mut record = BTreeMap::new();
        record.insert(1u32, AnswerValue::choice("C"));
        record.insert(4u32, AnswerValue::Number(439.6));
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"1":"C","4":439.6}"#);

        let back: BTreeMap<QuestionId, AnswerValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn parse_number_rejects_bad_input() {
        assert_eq!(parse_number("  ", "cm²"), Err(InputError::Empty));
        assert_eq!(
            parse_number("abc", "cm²"),
            Err(InputError::not_a_number("cm²"))
        );
        assert_eq!(parse_non_negative("-4", "cm²"), Err(InputError::Negative));
        assert_eq!(parse_number(" 12.5 ", "cm²"), Ok(12.5));
    }

    #[test]
    fn question_parse_answer_checks_options() {
        let q = Question {
            id: 1,
            title: "t".into(),
            prompt: "p".into(),
            topic: String::new(),
            options: vec![ChoiceOption::new("A", "a"), ChoiceOption::new("B", "b")],
            expected: ExpectedAnswer::choice("B"),
            unit: None,
            hint: None,
            solution: None,
        };
        assert_eq!(q.parse_answer(" B "), Ok(AnswerValue::choice("B")));
        assert_eq!(
            q.parse_answer("Z"),
            Err(InputError::UnknownOption("Z".into()))
        );
        assert_eq!(q.parse_answer(""), Err(InputError::NoSelection));
    }
}
