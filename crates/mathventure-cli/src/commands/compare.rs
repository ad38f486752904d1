//! The `mathventure compare` command.

use std::path::PathBuf;

use anyhow::Result;

use mathventure_core::report::QuizReport;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    fail_on_regression: bool,
    format: String,
) -> Result<()> {
    let baseline = QuizReport::load_json(&baseline_path)?;
    let current = QuizReport::load_json(&current_path)?;

    let report = current.compare(&baseline);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!(
                "Score: {}/{} -> {}/{}",
                report.baseline_score.correct,
                report.baseline_score.total,
                report.current_score.correct,
                report.current_score.total
            );
            println!(
                "Comparison: {} newly correct, {} newly incorrect, {} unchanged",
                report.newly_correct.len(),
                report.newly_incorrect.len(),
                report.unchanged
            );

            if !report.newly_correct.is_empty() {
                println!("\nNewly correct:");
                for q in &report.newly_correct {
                    println!("  {} {}", q.id, q.title);
                }
            }

            if !report.newly_incorrect.is_empty() {
                println!("\nNewly incorrect:");
                for q in &report.newly_incorrect {
                    println!("  {} {}", q.id, q.title);
                }
            }

            if report.new_questions > 0 {
                println!("\n{} new question(s)", report.new_questions);
            }
            if report.removed_questions > 0 {
                println!("{} removed question(s)", report.removed_questions);
            }
        }
    }

    if fail_on_regression && report.has_regressions() {
        std::process::exit(1);
    }

    Ok(())
}
