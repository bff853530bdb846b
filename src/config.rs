//! Miner configuration: defaults, `lineage.toml` loading and validation.
//!
//! Values come from three layers, later ones winning: built-in defaults,
//! a TOML file (`--config`, or `lineage.toml` at the repository root),
//! and command-line overrides applied by the caller.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{MineError, MineResult};

/// File name looked up at the repository root when `--config` is absent.
pub const CONFIG_FILE: &str = "lineage.toml";

const SECONDS_PER_DAY: f64 = 86_400.0;

/// How a single file change turns into a contribution weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightMode {
    /// Lines added plus lines removed.
    Churn,
    /// Lines added only.
    Added,
}

impl WeightMode {
    pub fn weight(self, added: usize, removed: usize) -> u64 {
        match self {
            WeightMode::Churn => (added + removed) as u64,
            WeightMode::Added => added as u64,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MinerConfig {
    /// Knowledge half-life in days.
    pub half_life_days: f64,
    pub weight: WeightMode,
    /// Relatedness contributed by co-change strength (0..=1 per pair).
    pub co_change_weight: f64,
    /// Relatedness contributed by sharing a parent directory.
    pub directory_weight: f64,
    /// Commits touching more files than this are ignored for co-change.
    pub max_commit_files: usize,
    /// Potential-authorship estimates below this are dropped.
    pub min_estimate: f64,
    /// Glob patterns (repository-relative) excluded from every miner.
    pub exclude: Vec<String>,
    pub include_tests: bool,
    /// Walk only the first-parent chain and count merge commits.
    pub first_parent: bool,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            half_life_days: 180.0,
            weight: WeightMode::Churn,
            co_change_weight: 1.0,
            directory_weight: 0.5,
            max_commit_files: 50,
            min_estimate: 0.01,
            exclude: Vec::new(),
            include_tests: false,
            first_parent: false,
        }
    }
}

impl MinerConfig {
    /// Load from an explicit file, or from `lineage.toml` under `repo_root`
    /// if it exists, or fall back to defaults.
    pub fn load(explicit: Option<&Path>, repo_root: &Path) -> MineResult<Self> {
        let path: PathBuf = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let candidate = repo_root.join(CONFIG_FILE);
                if !candidate.is_file() {
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let text = fs::read_to_string(&path)
            .map_err(|e| MineError::Config(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml(&text)
            .map_err(|e| MineError::Config(format!("{}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> MineResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| MineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> MineResult<()> {
        if !(self.half_life_days.is_finite() && self.half_life_days > 0.0) {
            return Err(MineError::Config(format!(
                "half_life_days must be a positive number, got {}",
                self.half_life_days
            )));
        }
        for (name, value) in [
            ("co_change_weight", self.co_change_weight),
            ("directory_weight", self.directory_weight),
            ("min_estimate", self.min_estimate),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(MineError::Config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.max_commit_files < 2 {
            return Err(MineError::Config(
                "max_commit_files must be at least 2".to_string(),
            ));
        }
        Ok(())
    }

    pub fn half_life_secs(&self) -> f64 {
        self.half_life_days * SECONDS_PER_DAY
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
