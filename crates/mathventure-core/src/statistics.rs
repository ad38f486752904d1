//! Score messages and per-question breakdowns for the results screen.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::evaluator::{AssessmentEvaluator, QuizScore};
use crate::model::{QuestionId, QuestionSet};

/// Steps on the message ladder; a perfect score is the top step.
const LADDER_STEPS: usize = 5;

/// Encouragement for a score, from the top of the ladder down.
const MESSAGES: [&str; LADDER_STEPS + 1] = [
    "📖 Let's review the basics together!",
    "💪 You're getting there! Don't give up!",
    "📚 Not bad! Keep practicing!",
    "👍 Good job! You have a solid foundation!",
    "🌟 Excellent! You really understand cylinders!",
    "🎉 Perfect! You're a cylinder expert!",
];

/// Ladder step for a score: the correct count on a five-question quiz,
/// scaled by percentage for other totals.
pub fn ladder_step(score: QuizScore) -> usize {
    if score.total == 0 {
        return 0;
    }
    (score.correct.min(score.total) * LADDER_STEPS) / score.total
}

/// The results-screen message for a score.
pub fn score_message(score: QuizScore) -> &'static str {
    MESSAGES[ladder_step(score)]
}

/// Titles of correctly answered questions, in question order.
pub fn strengths(set: &QuestionSet, evaluator: &AssessmentEvaluator) -> Vec<String> {
    set.questions
        .iter()
        .filter(|q| evaluator.is_correct(q.id))
        .map(|q| q.title.clone())
        .collect()
}

/// Titles of questions answered wrongly or left blank, in question order.
pub fn improvements(set: &QuestionSet, evaluator: &AssessmentEvaluator) -> Vec<String> {
    set.questions
        .iter()
        .filter(|q| !evaluator.is_correct(q.id))
        .map(|q| q.title.clone())
        .collect()
}

/// Correct / total per topic tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicStats {
    pub correct: usize,
    pub total: usize,
}

impl TopicStats {
    pub fn rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

/// Group outcomes by question topic. Untagged questions are skipped.
pub fn topic_breakdown(
    set: &QuestionSet,
    evaluator: &AssessmentEvaluator,
) -> BTreeMap<String, TopicStats> {
    let mut topics: BTreeMap<String, TopicStats> = BTreeMap::new();
    for q in set.questions.iter().filter(|q| !q.topic.is_empty()) {
        let entry = topics.entry(q.topic.clone()).or_default();
        entry.total += 1;
        if evaluator.is_correct(q.id) {
            entry.correct += 1;
        }
    }
    topics
}

/// Questions that have no recorded answer yet.
pub fn unanswered(set: &QuestionSet, evaluator: &AssessmentEvaluator) -> Vec<QuestionId> {
    set.questions
        .iter()
        .filter(|q| evaluator.answer(q.id).is_none())
        .map(|q| q.id)
        .collect()
}
