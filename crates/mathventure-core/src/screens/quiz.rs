//! Quiz screens: countdown intro, one screen per question, results.

use std::fmt::Write as _;
use std::time::{Duration, Instant};

use crate::lesson::{LessonContext, FIRST_QUIZ_SCREEN, QUIZ_INTRO_SCREEN};
use crate::model::Question;
use crate::report::QuestionOutcome;
use crate::navigator::ScreenDefinition;
use crate::reveal::{Countdown, Delay};
use crate::statistics::{improvements, score_message, strengths};
use crate::traits::{ScreenBehavior, ScreenEvent, ScreenInput};

use super::boxed;

const INTRO_MARKUP: &str = "\
🏁 Quiz time!
Quick questions about cylinders. Get ready...

  start";

const RESULTS_MARKUP: &str = "\
🏆 Quiz results

  show | retake";

// ---------------------------------------------------------------------------
// Intro countdown
// ---------------------------------------------------------------------------

pub fn intro_definition() -> ScreenDefinition<LessonContext> {
    ScreenDefinition::static_markup(INTRO_MARKUP).with_behavior(|ctx: &mut LessonContext, now| {
        let countdown = Countdown::start(now, ctx.config.countdown_secs, Duration::from_secs(1));
        let mut launch = Delay::default();
        if countdown.is_finished() {
            launch.schedule(now, Duration::ZERO);
        }
        boxed(QuizIntro { countdown, launch })
    })
}

struct QuizIntro {
    countdown: Countdown,
    /// Due once the countdown has run out.
    launch: Delay,
}

impl QuizIntro {
    fn begin(&mut self) -> Vec<ScreenEvent> {
        self.countdown.cancel();
        self.launch.cancel();
        vec![ScreenEvent::go_to(FIRST_QUIZ_SCREEN)]
    }
}

impl ScreenBehavior<LessonContext> for QuizIntro {
    fn on_input(
        &mut self,
        _ctx: &mut LessonContext,
        input: &ScreenInput,
        _now: Instant,
    ) -> Vec<ScreenEvent> {
        match input {
            ScreenInput::Action { name } if name == "start" => self.begin(),
            _ => Vec::new(),
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.countdown.deadline().or(self.launch.deadline())
    }

    fn on_timer(&mut self, _ctx: &mut LessonContext, now: Instant) -> Vec<ScreenEvent> {
        if self.launch.fire(now) {
            return self.begin();
        }
        if self.countdown.tick(now) == 0 {
            return Vec::new();
        }
        match self.countdown.remaining() {
            0 => self.begin(),
            left => vec![ScreenEvent::info(format!("Starting in {left}..."))],
        }
    }

    fn dispose(&mut self) {
        self.countdown.cancel();
        self.launch.cancel();
    }
}

// ---------------------------------------------------------------------------
// Question screens
// ---------------------------------------------------------------------------

/// Screen for `question`, shown as number `position` of `count`.
pub fn question_definition(
    question: Question,
    position: usize,
    count: usize,
) -> ScreenDefinition<LessonContext> {
    ScreenDefinition::static_markup(question_markup(&question, position, count)).with_behavior(
        move |_: &mut LessonContext, _| {
            boxed(QuizQuestion {
                question: question.clone(),
                advance: Delay::default(),
            })
        },
    )
}

fn question_markup(question: &Question, position: usize, count: usize) -> String {
    let mut out = format!(
        "Question {position} of {count}: {}\n\n{}\n\n",
        question.title, question.prompt
    );
    if question.is_numeric() {
        let unit = question.unit.as_deref().unwrap_or("number");
        let _ = write!(out, "  enter <answer in {unit}>");
    } else {
        for option in &question.options {
            let _ = writeln!(out, "  {}) {}", option.token, option.label);
        }
        let tokens: Vec<&str> = question.options.iter().map(|o| o.token.as_str()).collect();
        let _ = write!(out, "\n  pick {}", tokens.join(" | "));
    }
    out
}

/// Answers may be changed on a revisit; only a numeric answer that is
/// waiting to advance is locked.
struct QuizQuestion {
    question: Question,
    advance: Delay,
}

impl ScreenBehavior<LessonContext> for QuizQuestion {
    fn on_input(
        &mut self,
        ctx: &mut LessonContext,
        input: &ScreenInput,
        now: Instant,
    ) -> Vec<ScreenEvent> {
        let raw = match input {
            ScreenInput::Select { choice } => choice,
            ScreenInput::Enter { text } => text,
            _ => return Vec::new(),
        };
        if self.advance.is_pending() {
            return vec![ScreenEvent::info("You've already answered this one.")];
        }
        let value = match self.question.parse_answer(raw) {
            Ok(value) => value,
            Err(e) => return vec![ScreenEvent::bad(e.to_string())],
        };

        ctx.quiz.record_answer(self.question.id, value);
        tracing::debug!(question = self.question.id, "quiz answer recorded");

        if self.question.is_numeric() {
            self.advance.schedule(now, ctx.config.answer_advance_delay());
            vec![ScreenEvent::good("Answer Submitted ✓")]
        } else {
            vec![ScreenEvent::next()]
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.advance.deadline()
    }

    fn on_timer(&mut self, _ctx: &mut LessonContext, now: Instant) -> Vec<ScreenEvent> {
        if self.advance.fire(now) {
            vec![ScreenEvent::next()]
        } else {
            Vec::new()
        }
    }

    fn dispose(&mut self) {
        self.advance.cancel();
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

pub fn results_definition() -> ScreenDefinition<LessonContext> {
    ScreenDefinition::static_markup(RESULTS_MARKUP).with_behavior(|_: &mut LessonContext, now| {
        let mut summary = Delay::default();
        summary.schedule(now, Duration::ZERO);
        boxed(QuizResults { summary })
    })
}

struct QuizResults {
    summary: Delay,
}

fn summarize(ctx: &LessonContext) -> Vec<ScreenEvent> {
    let score = ctx.quiz.score();
    let mut events = vec![
        ScreenEvent::info(format!("Your score: {}/{}", score.correct, score.total)),
        ScreenEvent::info(score_message(score)),
    ];

    let good = strengths(&ctx.quiz_set, &ctx.quiz);
    if good.is_empty() {
        events.push(ScreenEvent::info("Keep practicing to discover your strengths!"));
    } else {
        events.push(ScreenEvent::good(format!("Strengths: {}", good.join(", "))));
    }

    let todo = improvements(&ctx.quiz_set, &ctx.quiz);
    if todo.is_empty() {
        events.push(ScreenEvent::good("Perfect! No areas need improvement!"));
    } else {
        events.push(ScreenEvent::bad(format!("Work on: {}", todo.join(", "))));
    }

    events.extend(ctx.quiz_report().outcomes.iter().map(outcome_line));
    events
}

fn outcome_line(outcome: &QuestionOutcome) -> ScreenEvent {
    let answer = outcome
        .answer
        .as_ref()
        .map_or_else(|| "Not answered".to_string(), ToString::to_string);
    let line = format!(
        "{} {}: Your answer: {answer} | Correct answer: {}",
        if outcome.correct { "✅" } else { "❌" },
        outcome.title,
        outcome.expected
    );
    if outcome.correct {
        ScreenEvent::good(line)
    } else {
        ScreenEvent::bad(line)
    }
}

impl ScreenBehavior<LessonContext> for QuizResults {
    fn on_input(
        &mut self,
        ctx: &mut LessonContext,
        input: &ScreenInput,
        _now: Instant,
    ) -> Vec<ScreenEvent> {
        let ScreenInput::Action { name } = input else {
            return Vec::new();
        };
        match name.as_str() {
            "show" => {
                self.summary.cancel();
                summarize(ctx)
            }
            "retake" => {
                tracing::info!("quiz retake requested");
                ctx.quiz.reset();
                vec![ScreenEvent::go_to(QUIZ_INTRO_SCREEN)]
            }
            _ => Vec::new(),
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.summary.deadline()
    }

    fn on_timer(&mut self, ctx: &mut LessonContext, now: Instant) -> Vec<ScreenEvent> {
        if self.summary.fire(now) {
            summarize(ctx)
        } else {
            Vec::new()
        }
    }

    fn dispose(&mut self) {
        self.summary.cancel();
    }
}
