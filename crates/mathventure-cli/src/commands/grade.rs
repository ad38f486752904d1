//! The `mathventure grade` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use mathventure_core::evaluator::AssessmentEvaluator;
use mathventure_core::lesson::compact_quiz;
use mathventure_core::model::{AnswerValue, QuestionId, QuestionSet};
use mathventure_core::parser::parse_question_set;
use mathventure_core::report::QuizReport;
use mathventure_core::statistics::topic_breakdown;
use mathventure_core::store::MemoryStore;
use mathventure_report::html::write_html_report;

pub fn execute(
    answers: String,
    question_set: Option<PathBuf>,
    learner: Option<String>,
    output: Option<PathBuf>,
    format: String,
) -> Result<()> {
    let set = match question_set {
        Some(path) => parse_question_set(&path)?,
        None => compact_quiz(),
    };

    // Grading never touches the learner's saved session.
    let mut evaluator = AssessmentEvaluator::for_set(&set, MemoryStore::shared());
    for (id, value) in parse_answers(&set, &answers)? {
        evaluator.record_answer(id, value);
    }

    let report = QuizReport::build(&set, &evaluator, learner, Vec::new());
    print_summary(&report);
    print_topics(&set, &evaluator);

    let Some(output) = output else {
        return Ok(());
    };

    std::fs::create_dir_all(&output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");

    let formats: Vec<&str> = if format == "all" {
        vec!["json", "html"]
    } else {
        format.split(',').map(str::trim).collect()
    };

    for fmt in &formats {
        match *fmt {
            "json" => {
                let path = output.join(format!("report-{timestamp}.json"));
                report.save_json(&path)?;
                eprintln!("Results saved to: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("report-{timestamp}.html"));
                write_html_report(&report, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }

    Ok(())
}

/// Parse `"1=C, 4=439.6"` against the questions of `set`.
fn parse_answers(set: &QuestionSet, spec: &str) -> Result<Vec<(QuestionId, AnswerValue)>> {
    spec.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (id, raw) = pair
                .split_once('=')
                .with_context(|| format!("expected <question>=<answer>, got '{pair}'"))?;
            let id: QuestionId = id
                .trim()
                .parse()
                .with_context(|| format!("invalid question number '{}'", id.trim()))?;
            let question = set
                .question(id)
                .with_context(|| format!("question {id} is not in set '{}'", set.id))?;
            let value = question
                .parse_answer(raw)
                .with_context(|| format!("question {id}"))?;
            Ok((id, value))
        })
        .collect()
}

fn print_summary(report: &QuizReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Answer", "Expected", "Result"]);

    for o in &report.outcomes {
        let answer = o
            .answer
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "-".to_string());
        let result = match (&o.answer, o.correct) {
            (_, true) => "correct",
            (None, false) => "unanswered",
            (Some(_), false) => "wrong",
        };
        table.add_row(vec![
            Cell::new(o.id),
            Cell::new(&o.title),
            Cell::new(answer),
            Cell::new(o.expected.to_string()),
            Cell::new(result),
        ]);
    }

    println!("{table}");
    println!(
        "Score: {}/{}  {}",
        report.score.correct, report.score.total, report.message
    );
}

fn print_topics(set: &QuestionSet, evaluator: &AssessmentEvaluator) {
    use comfy_table::{Cell, Table};

    let topics = topic_breakdown(set, evaluator);
    if topics.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Topic", "Correct", "Rate"]);
    for (topic, stats) in &topics {
        table.add_row(vec![
            Cell::new(topic),
            Cell::new(format!("{}/{}", stats.correct, stats.total)),
            Cell::new(format!("{:.0}%", stats.rate() * 100.0)),
        ]);
    }
    println!("{table}");
}
