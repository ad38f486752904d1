//! The `mathventure reset` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use mathventure_core::config::load_config_from;
use mathventure_core::lesson::{adaptive_checks, compact_quiz};
use mathventure_core::store::{BackupStore, JsonFileStore, LEARNER_NAME_KEY, WEAK_SPOTS_KEY};

pub fn execute(config_path: Option<PathBuf>, all: bool) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = JsonFileStore::new(&config.store_path);

    let mut keys = vec![
        compact_quiz().answers_key(),
        adaptive_checks().answers_key(),
        WEAK_SPOTS_KEY.to_string(),
    ];
    if all {
        keys.push(LEARNER_NAME_KEY.to_string());
    }

    for key in &keys {
        store
            .remove(key)
            .with_context(|| format!("failed to clear '{key}' in {}", store.path().display()))?;
    }

    println!(
        "Cleared {} from {}",
        keys.join(", "),
        store.path().display()
    );
    Ok(())
}
