//! Threshold configuration, loadable from `pytidy.toml`

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// Advisory thresholds used by the quality rules and recommendations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityThresholds {
    /// Maximum function span in lines before "too long" fires
    #[serde(default = "default_max_function_length")]
    pub max_function_length: usize,

    /// Cyclomatic complexity above which a function is flagged
    #[serde(default = "default_max_complexity")]
    pub max_complexity: u32,

    /// Maximum parameter count before "too many parameters" fires
    #[serde(default = "default_max_parameters")]
    pub max_parameters: usize,

    /// Maximum line length in characters
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,

    /// Average complexity above which structural simplification is suggested
    #[serde(default = "default_average_complexity_limit")]
    pub average_complexity_limit: f64,

    /// Function docstring coverage target, percent
    #[serde(default = "default_function_coverage_target")]
    pub function_coverage_target: f64,

    /// Class docstring coverage target, percent
    #[serde(default = "default_class_coverage_target")]
    pub class_coverage_target: f64,
}

fn default_max_function_length() -> usize {
    50
}

fn default_max_complexity() -> u32 {
    10
}

fn default_max_parameters() -> usize {
    5
}

fn default_max_line_length() -> usize {
    88
}

fn default_average_complexity_limit() -> f64 {
    7.0
}

fn default_function_coverage_target() -> f64 {
    80.0
}

fn default_class_coverage_target() -> f64 {
    90.0
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            max_function_length: default_max_function_length(),
            max_complexity: default_max_complexity(),
            max_parameters: default_max_parameters(),
            max_line_length: default_max_line_length(),
            average_complexity_limit: default_average_complexity_limit(),
            function_coverage_target: default_function_coverage_target(),
            class_coverage_target: default_class_coverage_target(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PytidyConfig {
    #[serde(default)]
    pub thresholds: QualityThresholds,
}

impl PytidyConfig {
    /// Parse a config file; missing keys fall back to defaults
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load `pytidy.toml` from the current directory, or defaults
    pub fn load() -> Self {
        let candidate = Path::new("pytidy.toml");
        if candidate.exists() {
            match Self::from_path(candidate) {
                Ok(config) => return config,
                Err(e) => log::warn!("ignoring unreadable pytidy.toml: {e}"),
            }
        }
        Self::default()
    }
}

static CONFIG: OnceLock<PytidyConfig> = OnceLock::new();

/// Process-wide config, loaded once
pub fn get() -> &'static PytidyConfig {
    CONFIG.get_or_init(PytidyConfig::load)
}
