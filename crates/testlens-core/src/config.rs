//! Analysis configuration.
//!
//! Thresholds default to the conventional Classical Test Theory values and
//! can be overridden from a TOML file or environment variables.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::discrimination::DEFAULT_GROUP_FRACTION;

/// Thresholds that decide when a question is flagged for review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewThresholds {
    /// Flag questions whose difficulty index is above this (too easy).
    #[serde(default = "default_max_difficulty")]
    pub max_difficulty: f64,
    /// Flag questions whose difficulty index is below this (too hard).
    #[serde(default = "default_min_difficulty")]
    pub min_difficulty: f64,
    /// Flag questions whose discrimination index is defined and below this.
    #[serde(default = "default_min_discrimination")]
    pub min_discrimination: f64,
    /// Whether questions nobody attempted are flagged.
    #[serde(default = "default_true")]
    pub flag_unattempted: bool,
}

fn default_max_difficulty() -> f64 {
    0.90
}
fn default_min_difficulty() -> f64 {
    0.15
}
fn default_min_discrimination() -> f64 {
    0.20
}
fn default_true() -> bool {
    true
}

impl Default for ReviewThresholds {
    fn default() -> Self {
        Self {
            max_difficulty: default_max_difficulty(),
            min_difficulty: default_min_difficulty(),
            min_discrimination: default_min_discrimination(),
            flag_unattempted: true,
        }
    }
}

/// Top-level testlens configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Fraction of the class in each of the upper and lower groups.
    #[serde(default = "default_group_fraction")]
    pub group_fraction: f64,
    /// Item review thresholds.
    #[serde(default)]
    pub review: ReviewThresholds,
    /// Group accuracy at or above which a strength is reported.
    #[serde(default = "default_strength_threshold")]
    pub strength_threshold: f64,
    /// Group accuracy at or below which a weakness is reported.
    #[serde(default = "default_weakness_threshold")]
    pub weakness_threshold: f64,
    /// Score fraction counted as a pass in class summaries.
    #[serde(default = "default_pass_fraction")]
    pub pass_fraction: f64,
}

fn default_group_fraction() -> f64 {
    DEFAULT_GROUP_FRACTION
}
fn default_strength_threshold() -> f64 {
    0.80
}
fn default_weakness_threshold() -> f64 {
    0.60
}
fn default_pass_fraction() -> f64 {
    0.50
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            group_fraction: default_group_fraction(),
            review: ReviewThresholds::default(),
            strength_threshold: default_strength_threshold(),
            weakness_threshold: default_weakness_threshold(),
            pass_fraction: default_pass_fraction(),
        }
    }
}

impl AnalysisConfig {
    /// Check that every threshold is in range and that strengths and
    /// weaknesses cannot overlap.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.group_fraction > 0.0 && self.group_fraction <= 0.5,
            "group_fraction must be in (0, 0.5], got {}",
            self.group_fraction
        );
        for (name, value) in [
            ("strength_threshold", self.strength_threshold),
            ("weakness_threshold", self.weakness_threshold),
            ("pass_fraction", self.pass_fraction),
            ("review.max_difficulty", self.review.max_difficulty),
            ("review.min_difficulty", self.review.min_difficulty),
        ] {
            anyhow::ensure!(
                (0.0..=1.0).contains(&value),
                "{name} must be between 0 and 1, got {value}"
            );
        }
        anyhow::ensure!(
            (-1.0..=1.0).contains(&self.review.min_discrimination),
            "review.min_discrimination must be between -1 and 1, got {}",
            self.review.min_discrimination
        );
        anyhow::ensure!(
            self.weakness_threshold < self.strength_threshold,
            "weakness_threshold ({}) must be below strength_threshold ({})",
            self.weakness_threshold,
            self.strength_threshold
        );
        Ok(())
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `testlens.toml` in the current directory
/// 2. `~/.config/testlens/config.toml`
///
/// Environment variable overrides: `TESTLENS_STRENGTH_THRESHOLD`,
/// `TESTLENS_WEAKNESS_THRESHOLD`, `TESTLENS_GROUP_FRACTION`,
/// `TESTLENS_PASS_FRACTION`.
pub fn load_config() -> Result<AnalysisConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<AnalysisConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("testlens.toml");
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
            tracing::debug!("loaded config from {}", path.display());
            toml::from_str::<AnalysisConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => AnalysisConfig::default(),
    };

    apply_env_overrides(&mut config)?;
    config.validate()?;

    Ok(config)
}

fn apply_env_overrides(config: &mut AnalysisConfig) -> Result<()> {
    let overrides: [(&str, &mut f64); 4] = [
        ("TESTLENS_STRENGTH_THRESHOLD", &mut config.strength_threshold),
        ("TESTLENS_WEAKNESS_THRESHOLD", &mut config.weakness_threshold),
        ("TESTLENS_GROUP_FRACTION", &mut config.group_fraction),
        ("TESTLENS_PASS_FRACTION", &mut config.pass_fraction),
    ];
    for (var, slot) in overrides {
        if let Ok(raw) = std::env::var(var) {
            *slot = raw
                .trim()
                .parse()
                .with_context(|| format!("invalid value for {var}: '{raw}'"))?;
        }
    }
    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("testlens"))
}
