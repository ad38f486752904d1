//! Session configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level mathventure configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MathventureConfig {
    /// JSON file backing the durable backup store.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    /// Root for per-screen `styles/` and `scripts/` resources.
    #[serde(default)]
    pub assets_dir: Option<PathBuf>,
    /// How long a hint plays before a retry is allowed.
    #[serde(default = "default_hint_delay")]
    pub hint_delay_ms: u64,
    /// Delay before the "solve together" walkthrough appears.
    #[serde(default = "default_solution_delay")]
    pub solution_delay_ms: u64,
    /// Pause between submitting a typed quiz answer and the next question.
    #[serde(default = "default_answer_advance_delay")]
    pub answer_advance_delay_ms: u64,
    /// Delay before the tower question starts after a "no".
    #[serde(default = "default_nudge_delay")]
    pub nudge_delay_ms: u64,
    /// Delay before the beaker explanation appears.
    #[serde(default = "default_explanation_delay")]
    pub explanation_delay_ms: u64,
    /// Delay before the simulation nudge appears.
    #[serde(default = "default_sim_hint_delay")]
    pub sim_hint_delay_ms: u64,
    /// Quiz intro countdown length in seconds.
    #[serde(default = "default_countdown")]
    pub countdown_secs: u32,
    /// Longest accepted learner name.
    #[serde(default = "default_name_max_len")]
    pub learner_name_max_len: usize,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./.mathventure/store.json")
}
fn default_hint_delay() -> u64 {
    2000
}
fn default_solution_delay() -> u64 {
    2000
}
fn default_answer_advance_delay() -> u64 {
    1000
}
fn default_nudge_delay() -> u64 {
    1200
}
fn default_explanation_delay() -> u64 {
    2500
}
fn default_sim_hint_delay() -> u64 {
    600
}
fn default_countdown() -> u32 {
    5
}
fn default_name_max_len() -> usize {
    30
}

impl Default for MathventureConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            assets_dir: None,
            hint_delay_ms: default_hint_delay(),
            solution_delay_ms: default_solution_delay(),
            answer_advance_delay_ms: default_answer_advance_delay(),
            nudge_delay_ms: default_nudge_delay(),
            explanation_delay_ms: default_explanation_delay(),
            sim_hint_delay_ms: default_sim_hint_delay(),
            countdown_secs: default_countdown(),
            learner_name_max_len: default_name_max_len(),
        }
    }
}

impl MathventureConfig {
    pub fn hint_delay(&self) -> Duration {
        Duration::from_millis(self.hint_delay_ms)
    }

    pub fn solution_delay(&self) -> Duration {
        Duration::from_millis(self.solution_delay_ms)
    }

    pub fn answer_advance_delay(&self) -> Duration {
        Duration::from_millis(self.answer_advance_delay_ms)
    }

    pub fn nudge_delay(&self) -> Duration {
        Duration::from_millis(self.nudge_delay_ms)
    }

    pub fn explanation_delay(&self) -> Duration {
        Duration::from_millis(self.explanation_delay_ms)
    }

    pub fn sim_hint_delay(&self) -> Duration {
        Duration::from_millis(self.sim_hint_delay_ms)
    }

    /// The same config with every staged delay and the countdown set to
    /// zero, for scripted sessions.
    pub fn without_delays(self) -> Self {
        Self {
            hint_delay_ms: 0,
            solution_delay_ms: 0,
            answer_advance_delay_ms: 0,
            nudge_delay_ms: 0,
            explanation_delay_ms: 0,
            sim_hint_delay_ms: 0,
            countdown_secs: 0,
            ..self
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `mathventure.toml` in the current directory
/// 2. `~/.config/mathventure/config.toml`
///
/// `MATHVENTURE_STORE` overrides the store path.
pub fn load_config() -> Result<MathventureConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<MathventureConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("mathventure.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<MathventureConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => MathventureConfig::default(),
    };

    if let Ok(store) = std::env::var("MATHVENTURE_STORE") {
        config.store_path = PathBuf::from(store);
    }

    config.store_path = resolve_path(&config.store_path);
    config.assets_dir = config.assets_dir.as_deref().map(resolve_path);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("mathventure"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_MATHVENTURE_TEST_VAR", "lessons");
        assert_eq!(resolve_env_vars("${_MATHVENTURE_TEST_VAR}"), "lessons");
        assert_eq!(
            resolve_env_vars("/srv/${_MATHVENTURE_TEST_VAR}/store.json"),
            "/srv/lessons/store.json"
        );
        std::env::remove_var("_MATHVENTURE_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = MathventureConfig::default();
        assert_eq!(config.countdown_secs, 5);
        assert_eq!(config.hint_delay(), Duration::from_secs(2));
        assert_eq!(config.learner_name_max_len, 30);
    }

    #[test]
    fn without_delays_keeps_paths() {
        let config = MathventureConfig {
            store_path: PathBuf::from("/tmp/mv/store.json"),
            ..MathventureConfig::default()
        }
        .without_delays();
        assert_eq!(config.store_path, PathBuf::from("/tmp/mv/store.json"));
        assert_eq!(config.countdown_secs, 0);
        assert_eq!(config.explanation_delay(), Duration::ZERO);
    }

    #[test]
    fn parse_partial_config() {
        let toml_str = r#"
store_path = "/tmp/mv/store.json"
assets_dir = "web"
countdown_secs = 3
"#;
        let config: MathventureConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.store_path, PathBuf::from("/tmp/mv/store.json"));
        assert_eq!(config.assets_dir, Some(PathBuf::from("web")));
        assert_eq!(config.countdown_secs, 3);
        assert_eq!(config.explanation_delay_ms, 2500);
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let result = load_config_from(Some(Path::new("/nonexistent/mathventure.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn load_explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mathventure.toml");
        std::fs::write(&path, "hint_delay_ms = 50\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.hint_delay_ms, 50);
    }
}
