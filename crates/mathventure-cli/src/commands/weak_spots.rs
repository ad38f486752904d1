//! The `mathventure weak-spots` command.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use mathventure_core::config::load_config_from;
use mathventure_core::lesson::LessonContext;
use mathventure_core::store::JsonFileStore;

#[derive(Serialize)]
struct WeakSpotSummary {
    learner: Option<String>,
    weak_spots: Vec<String>,
}

pub fn execute(config_path: Option<PathBuf>, json: bool) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = JsonFileStore::shared(config.store_path.clone());
    let ctx = LessonContext::new(config, store);

    let summary = WeakSpotSummary {
        learner: ctx.profile.name(),
        weak_spots: ctx.weak_spots().to_vec(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Learner: {}", ctx.learner_name());
    if summary.weak_spots.is_empty() {
        println!("No weak spots logged yet.");
    } else {
        println!("Weak spots to revisit:");
        for topic in &summary.weak_spots {
            println!("  - {topic}");
        }
    }
    Ok(())
}
