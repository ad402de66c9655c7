//! drillbook configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use drillbook_core::classify::{Classifier, Keywords};
use drillbook_core::grade::{Grader, DEFAULT_SHORT_ANSWER_THRESHOLD};
use drillbook_core::selection::DEFAULT_SAMPLE_SEED;
use drillbook_store::{BlobStore, NotebookStore, ProgressStore, DEFAULT_EXPIRY_DAYS};

/// Top-level drillbook configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrillbookConfig {
    /// Where progress and notebooks are written.
    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,
    /// Where banks are looked up by name.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Saved progress older than this many days is ignored.
    #[serde(default = "default_expiry_days")]
    pub progress_expiry_days: i64,
    /// Minimum similarity for a short answer to be accepted.
    #[serde(default = "default_threshold")]
    pub short_answer_threshold: f64,
    /// Seed for sampling limited practice sessions.
    #[serde(default = "default_seed")]
    pub sample_seed: u64,
    /// Question cap for practice sessions when `--limit` is not given.
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    /// Classifier keyword lists.
    #[serde(default)]
    pub keywords: Keywords,
}

fn default_store_dir() -> PathBuf {
    PathBuf::from("./.drillbook")
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("./banks")
}
fn default_expiry_days() -> i64 {
    DEFAULT_EXPIRY_DAYS
}
fn default_threshold() -> f64 {
    DEFAULT_SHORT_ANSWER_THRESHOLD
}
fn default_seed() -> u64 {
    DEFAULT_SAMPLE_SEED
}
fn default_limit() -> usize {
    20
}

impl Default for DrillbookConfig {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            data_dir: default_data_dir(),
            progress_expiry_days: default_expiry_days(),
            short_answer_threshold: default_threshold(),
            sample_seed: default_seed(),
            default_limit: default_limit(),
            keywords: Keywords::default(),
        }
    }
}

impl DrillbookConfig {
    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.keywords.clone())
    }

    pub fn grader(&self) -> Grader {
        Grader::with_threshold(self.short_answer_threshold)
    }

    pub fn progress_store(&self) -> ProgressStore {
        ProgressStore::new(BlobStore::new(&self.store_dir))
            .with_expiry_days(self.progress_expiry_days)
    }

    pub fn notebook_store(&self) -> NotebookStore {
        NotebookStore::new(BlobStore::new(&self.store_dir))
    }

    /// Resolve a bank argument: an existing path as given, otherwise a name
    /// under `data_dir`, with or without its extension.
    pub fn resolve_bank(&self, bank: &Path) -> Result<PathBuf> {
        if bank.exists() {
            return Ok(bank.to_path_buf());
        }
        let in_data_dir = self.data_dir.join(bank);
        if in_data_dir.exists() {
            return Ok(in_data_dir);
        }
        for ext in ["xlsx", "xls", "ods", "toml"] {
            let candidate = in_data_dir.with_extension(ext);
            if candidate.exists() {
                return Ok(candidate);
            }
        }
        anyhow::bail!("question bank not found: {}", bank.display())
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

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `drillbook.toml` in the current directory
/// 2. `~/.config/drillbook/config.toml`
///
/// Environment variable overrides: `DRILLBOOK_STORE_DIR`, `DRILLBOOK_THRESHOLD`.
pub fn load_config_from(path: Option<&Path>) -> Result<DrillbookConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("drillbook.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<DrillbookConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => DrillbookConfig::default(),
    };

    // Apply env var overrides
    if let Ok(dir) = std::env::var("DRILLBOOK_STORE_DIR") {
        config.store_dir = PathBuf::from(dir);
    }
    if let Ok(threshold) = std::env::var("DRILLBOOK_THRESHOLD") {
        config.short_answer_threshold = threshold
            .trim()
            .parse()
            .with_context(|| format!("invalid DRILLBOOK_THRESHOLD: {threshold}"))?;
    }

    config.store_dir = resolve_path(&config.store_dir);
    config.data_dir = resolve_path(&config.data_dir);

    anyhow::ensure!(
        (0.0..=1.0).contains(&config.short_answer_threshold),
        "short_answer_threshold must be between 0.0 and 1.0"
    );

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("drillbook"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_DRILLBOOK_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_DRILLBOOK_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_DRILLBOOK_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no_vars"), "no_vars");
        std::env::remove_var("_DRILLBOOK_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = DrillbookConfig::default();
        assert_eq!(config.progress_expiry_days, 30);
        assert_eq!(config.sample_seed, 42);
        assert_eq!(config.default_limit, 20);
        assert!((config.short_answer_threshold - 0.70).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_partial_config() {
        let toml_str = r#"
store_dir = "/tmp/drill"
short_answer_threshold = 0.8

[keywords]
essay = ["discuss"]
"#;
        let config: DrillbookConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.store_dir, PathBuf::from("/tmp/drill"));
        assert_eq!(config.default_limit, 20);
        assert_eq!(config.keywords.essay, vec!["discuss".to_string()]);
        assert!(!config.keywords.judgment.is_empty());
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let err = load_config_from(Some(Path::new("/nonexistent/drillbook.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drillbook.toml");
        std::fs::write(&path, "sample_seed = 7\ndefault_limit = 5\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.sample_seed, 7);
        assert_eq!(config.default_limit, 5);
    }

    #[test]
    fn resolve_bank_by_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("geo.toml"), "").unwrap();
        let config = DrillbookConfig {
            data_dir: dir.path().to_path_buf(),
            ..DrillbookConfig::default()
        };
        assert_eq!(
            config.resolve_bank(Path::new("geo")).unwrap(),
            dir.path().join("geo.toml")
        );
        assert!(config.resolve_bank(Path::new("missing")).is_err());
    }
}
