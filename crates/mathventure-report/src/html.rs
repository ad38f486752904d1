//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use anyhow::Result;
use std::collections::BTreeMap;
use std::path::Path;

use mathventure_core::model::AnswerValue;
use mathventure_core::report::{QuestionOutcome, QuizReport};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn answer_text(answer: Option<&AnswerValue>) -> String {
    match answer {
        Some(value) => html_escape(&value.to_string()),
        None => "-".to_string(),
    }
}

/// Generate an HTML report from a graded quiz attempt.
pub fn generate_html(report: &QuizReport) -> String {
    let mut html = String::new();
    let learner = report.learner.as_deref().unwrap_or("Learner");

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>mathventure report — {}</title>\n",
        html_escape(&report.question_set.name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}'s quiz report</h1>\n", html_escape(learner)));
    html.push_str(&format!(
        "<p class=\"meta\">Question set: <strong>{}</strong> | {} questions | {}</p>\n",
        html_escape(&report.question_set.name),
        report.question_set.question_count,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Score
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Score</h2>\n");
    html.push_str(&format!(
        "<p class=\"score\">{}/{}</p>\n<p>{}</p>\n",
        report.score.correct,
        report.score.total,
        html_escape(&report.message)
    ));

    let topics = topic_rates(&report.outcomes);
    if !topics.is_empty() {
        html.push_str(&generate_bar_chart(&topics));
    }

    html.push_str("<h3>Strengths</h3>\n");
    html.push_str(&list_or(
        &report.strengths,
        "Keep practicing to discover your strengths!",
    ));
    html.push_str("<h3>To improve</h3>\n");
    html.push_str(&list_or(
        &report.improvements,
        "Perfect! No areas need improvement!",
    ));
    if !report.weak_spots.is_empty() {
        html.push_str("<h3>Weak spots</h3>\n");
        html.push_str(&list_or(&report.weak_spots, ""));
    }
    html.push_str("</section>\n");

    // Per-question results
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Questions</h2>\n");
    html.push_str("<table class=\"results-table\">\n");
    html.push_str("<thead><tr><th>#</th><th>Question</th><th>Topic</th><th>Answer</th><th>Expected</th><th>Result</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for o in &report.outcomes {
        let (class, text) = match (&o.answer, o.correct) {
            (_, true) => ("pass", "✓"),
            (None, false) => ("skip", "unanswered"),
            (Some(_), false) => ("fail", "✗"),
        };
        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            class,
            o.id,
            html_escape(&o.title),
            html_escape(&o.topic),
            answer_text(o.answer.as_ref()),
            answer_text(Some(&o.expected)),
            text
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(report)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &QuizReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

fn list_or(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        return format!("<p class=\"meta\">{}</p>\n", html_escape(empty));
    }
    let mut out = String::from("<ul>\n");
    for item in items {
        out.push_str(&format!("  <li>{}</li>\n", html_escape(item)));
    }
    out.push_str("</ul>\n");
    out
}

/// Fraction correct per topic. Questions without a topic are skipped.
fn topic_rates(outcomes: &[QuestionOutcome]) -> BTreeMap<&str, f64> {
    let mut counts: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for o in outcomes.iter().filter(|o| !o.topic.is_empty()) {
        let entry = counts.entry(o.topic.as_str()).or_default();
        entry.1 += 1;
        if o.correct {
            entry.0 += 1;
        }
    }
    counts
        .into_iter()
        .map(|(topic, (correct, total))| (topic, correct as f64 / total as f64))
        .collect()
}

fn generate_bar_chart(topics: &BTreeMap<&str, f64>) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 200;

    let total_height = topics.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, (topic, rate)) in topics.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = (*rate * max_width as f64) as usize;

        let color = if *rate >= 0.8 {
            "#22c55e"
        } else if *rate >= 0.5 {
            "#eab308"
        } else {
            "#ef4444"
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(topic)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.0}%</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            rate * 100.0
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; --skip: #f3f4f6; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; --skip: #1f2937; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.score { font-size: 2.5rem; font-weight: bold; margin: 0.5rem 0; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
.skip { background: var(--skip); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use mathventure_core::evaluator::QuizScore;
    use mathventure_core::report::QuestionSetSummary;

    fn make_test_report() -> QuizReport {
        QuizReport {
            id: uuid::Uuid::nil(),
            created_at: chrono::Utc::now(),
            learner: Some("Ravi <3".into()),
            question_set: QuestionSetSummary {
                id: "quiz".into(),
                name: "Cylinder Quiz".into(),
                question_count: 2,
            },
            outcomes: vec![
                QuestionOutcome {
                    id: 1,
                    title: "Cylinder in a Cube".into(),
                    topic: "cylinder_volume".into(),
                    answer: Some(AnswerValue::choice("C")),
                    expected: AnswerValue::choice("C"),
                    correct: true,
                },
                QuestionOutcome {
                    id: 4,
                    title: "Curved Surface Area Calculation".into(),
                    topic: "cylinder_csa".into(),
                    answer: None,
                    expected: AnswerValue::Number(439.6),
                    correct: false,
                },
            ],
            score: QuizScore {
                correct: 1,
                total: 2,
            },
            message: "Good effort! Review the concepts and try again!".into(),
            strengths: vec!["Cylinder in a Cube".into()],
            improvements: vec!["Curved Surface Area Calculation".into()],
            weak_spots: vec!["cylinder_csa".into()],
        }
    }

    #[test]
    fn html_report_contains_required_elements() {
        let report = make_test_report();
        let html = generate_html(&report);

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("Cylinder Quiz"));
        assert!(html.contains("Ravi &lt;3's quiz report"));
        assert!(html.contains("<p class=\"score\">1/2</p>"));
        assert!(html.contains("unanswered"));
        assert!(html.contains("439.6"));
        assert!(html.contains("<h3>Weak spots</h3>"));
    }

    #[test]
    fn topic_chart_has_one_bar_per_topic() {
        let report = make_test_report();
        let rates = topic_rates(&report.outcomes);
        assert_eq!(rates.get("cylinder_volume"), Some(&1.0));
        assert_eq!(rates.get("cylinder_csa"), Some(&0.0));

        let svg = generate_bar_chart(&rates);
        assert_eq!(svg.matches("<rect").count(), 2);
    }

    #[test]
    fn html_report_write_to_file() {
        let report = make_test_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/report.html");

        write_html_report(&report, &path).unwrap();
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
