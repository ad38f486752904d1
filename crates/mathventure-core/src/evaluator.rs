//! Assessment evaluator.
//!
//! Records learner answers, judges them against a [`CorrectAnswerTable`],
//! counts attempts for tiered remediation, and keeps the weak-spot log.
//!
//! The in-memory answer record is authoritative. Every change is mirrored to
//! the backup store, but the store is only read back once, when the evaluator
//! is constructed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{AnswerValue, CorrectAnswerTable, QuestionId, QuestionSet};
use crate::store::{SharedStore, WEAK_SPOTS_KEY};

/// Remediation step for a question answered wrongly `n` times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemediationTier {
    /// First miss: nudge without revealing the method.
    Hint,
    /// Second miss: show the fully worked solution.
    WorkedSolution,
    /// Third miss and beyond: log a weak spot and move on.
    WeakSpot,
}

impl RemediationTier {
    /// Tier for the given 1-based wrong-attempt count. Zero has no tier.
    pub fn for_attempt(attempt: u32) -> Option<Self> {
        match attempt {
            0 => None,
            1 => Some(RemediationTier::Hint),
            2 => Some(RemediationTier::WorkedSolution),
            _ => Some(RemediationTier::WeakSpot),
        }
    }
}

/// Number of correct answers out of the questions in the answer key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizScore {
    pub correct: usize,
    pub total: usize,
}

impl QuizScore {
    /// Fraction correct in `0.0..=1.0`; an empty quiz scores zero.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }

    pub fn is_perfect(&self) -> bool {
        self.total > 0 && self.correct == self.total
    }
}

/// Outcome of [`AssessmentEvaluator::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Judgement {
    Correct,
    /// Wrong, with the remediation tier reached by this miss.
    Incorrect { attempt: u32, tier: RemediationTier },
}

/// Records answers for one quiz attempt and judges them.
pub struct AssessmentEvaluator {
    table: CorrectAnswerTable,
    answers: BTreeMap<QuestionId, AnswerValue>,
    attempts: BTreeMap<QuestionId, u32>,
    weak_spots: Vec<String>,
    store: SharedStore,
    answers_key: String,
}

impl AssessmentEvaluator {
    /// Create an evaluator and seed it from the backup store.
    ///
    /// Stored answers are merged over the (empty) defaults. A malformed
    /// payload is discarded and the evaluator starts empty.
    pub fn new(
        table: CorrectAnswerTable,
        store: SharedStore,
        answers_key: impl Into<String>,
    ) -> Self {
        let answers_key = answers_key.into();
        let answers: BTreeMap<QuestionId, AnswerValue> =
            restore(&store, &answers_key).unwrap_or_default();
        let weak_spots = restore::<Vec<String>>(&store, WEAK_SPOTS_KEY).unwrap_or_default();

        tracing::debug!(
            key = %answers_key,
            restored = answers.len(),
            weak_spots = weak_spots.len(),
            "evaluator ready"
        );

        Self {
            table,
            answers,
            attempts: BTreeMap::new(),
            weak_spots,
            store,
            answers_key,
        }
    }

    /// Evaluator for a question set, mirrored under the set's answers key.
    pub fn for_set(set: &QuestionSet, store: SharedStore) -> Self {
        Self::new(set.answer_table(), store, set.answers_key())
    }

    pub fn table(&self) -> &CorrectAnswerTable {
        &self.table
    }

    /// Store `value` under `question`, replacing any earlier answer.
    ///
    /// No validation happens here; callers reject malformed input first.
    pub fn record_answer(&mut self, question: QuestionId, value: AnswerValue) {
        tracing::debug!(question, %value, "answer recorded");
        self.answers.insert(question, value);
        self.persist_answers();
    }

    pub fn answer(&self, question: QuestionId) -> Option<&AnswerValue> {
        self.answers.get(&question)
    }

    pub fn answers(&self) -> &BTreeMap<QuestionId, AnswerValue> {
        &self.answers
    }

    /// Whether the recorded answer satisfies the answer key.
    ///
    /// Unanswered and unknown questions are simply incorrect.
    pub fn is_correct(&self, question: QuestionId) -> bool {
        match (self.answers.get(&question), self.table.get(question)) {
            (Some(recorded), Some(expected)) => expected.matches(recorded),
            _ => false,
        }
    }

    /// Correct answers out of every question in the answer key.
    pub fn score(&self) -> QuizScore {
        let correct = self.table.ids().filter(|&id| self.is_correct(id)).count();
        QuizScore {
            correct,
            total: self.table.len(),
        }
    }

    /// Increment and return the attempt counter for `question`.
    pub fn attempt(&mut self, question: QuestionId) -> u32 {
        let count = self.attempts.entry(question).or_insert(0);
        *count += 1;
        *count
    }

    /// Attempts counted so far for `question`.
    pub fn attempts(&self, question: QuestionId) -> u32 {
        self.attempts.get(&question).copied().unwrap_or(0)
    }

    /// Record, judge and, on a miss, advance the remediation tier.
    ///
    /// When the weak-spot tier is reached `topic` is logged.
    pub fn submit(&mut self, question: QuestionId, value: AnswerValue, topic: &str) -> Judgement {
        self.record_answer(question, value);
        if self.is_correct(question) {
            return Judgement::Correct;
        }
        let attempt = self.attempt(question);
        let tier = RemediationTier::for_attempt(attempt).unwrap_or(RemediationTier::Hint);
        if tier == RemediationTier::WeakSpot && !topic.is_empty() {
            self.log_weak_spot(topic);
        }
        Judgement::Incorrect { attempt, tier }
    }

    /// Append `topic` to the weak-spot log unless already present.
    pub fn log_weak_spot(&mut self, topic: &str) {
        if self.weak_spots.iter().any(|t| t == topic) {
            return;
        }
        tracing::info!(topic, "weak spot logged");
        self.weak_spots.push(topic.to_string());
        self.persist(WEAK_SPOTS_KEY, &self.weak_spots);
    }

    pub fn weak_spots(&self) -> &[String] {
        &self.weak_spots
    }

    /// Clear answers and attempt counters for a retake.
    ///
    /// The weak-spot log outlives individual attempts and is kept.
    pub fn reset(&mut self) {
        self.answers.clear();
        self.attempts.clear();
        if let Err(e) = self.store.remove(&self.answers_key) {
            tracing::warn!(key = %self.answers_key, "failed to clear stored answers: {e}");
        }
        tracing::debug!(key = %self.answers_key, "evaluator reset");
    }

    fn persist_answers(&self) {
        self.persist(&self.answers_key, &self.answers);
    }

    fn persist<T: Serialize>(&self, key: &str, value: &T) {
        let result = serde_json::to_string(value)
            .map_err(crate::error::StoreError::from)
            .and_then(|json| self.store.set(key, &json));
        if let Err(e) = result {
            tracing::warn!(key, "backup write failed: {e}");
        }
    }
}

fn restore<T: serde::de::DeserializeOwned>(store: &SharedStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, "backup read failed: {e}");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, "discarding malformed backup: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ExpectedAnswer;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn five_question_table() -> CorrectAnswerTable {
        CorrectAnswerTable::new([
            (1, ExpectedAnswer::choice("C")),
            (2, ExpectedAnswer::choice("B")),
            (3, ExpectedAnswer::choice("D")),
            (4, ExpectedAnswer::numeric(439.6, 0.1)),
            (5, ExpectedAnswer::numeric(385.0, 0.1)),
        ])
    }

    fn evaluator_with(store: SharedStore) -> AssessmentEvaluator {
        AssessmentEvaluator::new(five_question_table(), store, "quiz_answers")
    }

    #[test]
    fn record_then_check() {
        let mut eval = evaluator_with(MemoryStore::shared());
        eval.record_answer(4, AnswerValue::Number(439.65));
        assert!(eval.is_correct(4));
        eval.record_answer(4, AnswerValue::Number(439.8));
        assert!(!eval.is_correct(4));
    }

    #[test]
    fn unanswered_is_incorrect() {
        let eval = evaluator_with(MemoryStore::shared());
        assert!(!eval.is_correct(1));
        assert!(!eval.is_correct(99));
    }

    #[test]
    fn score_counts_unanswered_as_wrong() {
        let mut eval = evaluator_with(MemoryStore::shared());
        eval.record_answer(1, "C".into());
        eval.record_answer(2, "B".into());
        eval.record_answer(4, AnswerValue::Number(439.6));
        eval.record_answer(3, "A".into());
        assert_eq!(eval.score(), QuizScore { correct: 3, total: 5 });
    }

    #[test]
    fn answers_are_mirrored_to_store() {
        let store = MemoryStore::shared();
        let mut eval = evaluator_with(Arc::clone(&store));
        eval.record_answer(1, "C".into());
        eval.record_answer(5, AnswerValue::Number(385.0));
        assert_eq!(
            store.get("quiz_answers").unwrap().as_deref(),
            Some(r#"{"1":"C","5":385.0}"#)
        );
    }

    #[test]
    fn restores_answers_on_construction() {
        let store: SharedStore = Arc::new(MemoryStore::with_entries([(
            "quiz_answers",
            r#"{"1":"C","4":439.6}"#,
        )]));
        let eval = evaluator_with(store);
        assert!(eval.is_correct(1));
        assert!(eval.is_correct(4));
        assert_eq!(eval.score().correct, 2);
    }

    #[test]
    fn malformed_backup_starts_empty() {
        let store: SharedStore = Arc::new(MemoryStore::with_entries([
            ("quiz_answers", "definitely not json"),
            (WEAK_SPOTS_KEY, "{broken"),
        ]));
        let eval = evaluator_with(store);
        assert!(eval.answers().is_empty());
        assert!(eval.weak_spots().is_empty());
    }

    #[test]
    fn attempts_walk_the_remediation_tiers() {
        let mut eval = evaluator_with(MemoryStore::shared());
        let tiers: Vec<_> = (0..3)
            .map(|_| RemediationTier::for_attempt(eval.attempt(4)))
            .collect();
        assert_eq!(
            tiers,
            vec![
                Some(RemediationTier::Hint),
                Some(RemediationTier::WorkedSolution),
                Some(RemediationTier::WeakSpot),
            ]
        );
        assert_eq!(eval.attempts(4), 3);
    }

    #[test]
    fn submit_logs_weak_spot_on_third_miss() {
        let mut eval = evaluator_with(MemoryStore::shared());
        for expected_attempt in 1..=3 {
            let judgement = eval.submit(4, AnswerValue::Number(100.0), "cylinder_csa");
            assert!(matches!(
                judgement,
                Judgement::Incorrect { attempt, .. } if attempt == expected_attempt
            ));
        }
        assert_eq!(eval.weak_spots(), ["cylinder_csa".to_string()]);

        eval.submit(4, AnswerValue::Number(100.0), "cylinder_csa");
        assert_eq!(eval.weak_spots().len(), 1, "weak spots are deduplicated");
        assert_eq!(
            eval.submit(4, AnswerValue::Number(439.6), "cylinder_csa"),
            Judgement::Correct
        );
    }

    #[test]
    fn reset_keeps_weak_spots() {
        let store = MemoryStore::shared();
        let mut eval = evaluator_with(Arc::clone(&store));
        eval.log_weak_spot("cylinder_tsa_concept");
        eval.record_answer(1, "C".into());
        eval.attempt(1);

        eval.reset();

        assert!(eval.answers().is_empty());
        assert_eq!(eval.attempts(1), 0);
        assert_eq!(eval.weak_spots(), ["cylinder_tsa_concept".to_string()]);
        assert_eq!(store.get("quiz_answers").unwrap(), None);
        assert!(store.get(WEAK_SPOTS_KEY).unwrap().is_some());
    }
}
