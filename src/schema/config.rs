//! Configuration types for Lattice Life grids and modes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default number of sample points that must fall inside a circle for a cell to count.
fn default_sample_threshold() -> u8 {
    1
}

/// Largest radius the circle cache may be warmed to.
pub const MAX_WARM_RADIUS: u32 = 4096;

/// Default tick interval for the automation driver.
fn default_tick_interval_ms() -> u64 {
    100
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of columns in the on-screen grid.
    pub columns: usize,
    /// Number of rows in the on-screen grid.
    pub rows: usize,
    /// Which display mode drives the grid.
    #[serde(default)]
    pub mode: DisplayMode,
    /// Rule variants for the life automaton and LifeHash.
    #[serde(default)]
    pub rules: RuleVariants,
    /// Radial growth parameters.
    #[serde(default)]
    pub latix: LatixConfig,
    /// Automation interval. Scheduling only; the core never sleeps.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            columns: 48,
            rows: 64,
            mode: DisplayMode::default(),
            rules: RuleVariants::default(),
            latix: LatixConfig::default(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

/// The three ways a grid can be driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Toroidal Conway-style automaton.
    #[default]
    Life,
    /// Deterministic hash-seeded pattern.
    LifeHash,
    /// Radial ink-spreading selections.
    Latix,
}

/// Rule variant flags for the generation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RuleVariants {
    /// Birth also on exactly 6 neighbors (B36/S23).
    #[serde(default)]
    pub high_life: bool,
    /// Survival also when the neighbor count exceeds 3.
    #[serde(default)]
    pub over_populate: bool,
}

impl RuleVariants {
    /// Plain Conway rules (B3/S23).
    pub const CONWAY: Self = Self {
        high_life: false,
        over_populate: false,
    };

    /// HighLife rules (B36/S23).
    pub const HIGH_LIFE: Self = Self {
        high_life: true,
        over_populate: false,
    };
}

/// Radial growth (Latix) parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatixConfig {
    /// Skip cells already covered by a younger selection's disc.
    pub occlusion: bool,
    /// Sample points (out of 5) required for a cell to be inside a circle.
    #[serde(default = "default_sample_threshold")]
    pub sample_threshold: u8,
    /// Radius up to which the circle cache is warmed in the background (0 disables).
    #[serde(default)]
    pub warm_radius: u32,
    /// Standard deviation of the per-channel colour jitter.
    pub jitter: f32,
    /// Seed for colour jitter. `None` seeds from entropy.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl Default for LatixConfig {
    fn default() -> Self {
        Self {
            occlusion: true,
            sample_threshold: default_sample_threshold(),
            warm_radius: 256,
            jitter: 12.0,
            rng_seed: None,
        }
    }
}

impl SimulationConfig {
    /// Load and validate a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Get total cell count (columns * rows).
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.columns * self.rows
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if i32::try_from(self.columns).is_err() || i32::try_from(self.rows).is_err() {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.latix.sample_threshold == 0 || self.latix.sample_threshold > 5 {
            return Err(ConfigError::InvalidSampleThreshold(
                self.latix.sample_threshold,
            ));
        }
        if self.latix.warm_radius > MAX_WARM_RADIUS {
            return Err(ConfigError::InvalidWarmRadius(self.latix.warm_radius));
        }
        if !self.latix.jitter.is_finite() || self.latix.jitter < 0.0 {
            return Err(ConfigError::InvalidJitter);
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidTickInterval);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid dimensions (columns, rows) must be non-zero and fit in i32")]
    InvalidDimensions,
    #[error("Sample threshold must be between 1 and 5, got {0}")]
    InvalidSampleThreshold(u8),
    #[error("Warm radius must be at most {max}, got {0}", max = MAX_WARM_RADIUS)]
    InvalidWarmRadius(u32),
    #[error("Colour jitter must be finite and non-negative")]
    InvalidJitter,
    #[error("Random seed density must be within [0, 1], got {0}")]
    InvalidDensity(f32),
    #[error("Tick interval must be positive")]
    InvalidTickInterval,
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let config = SimulationConfig {
            columns: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDimensions)
        ));
    }

    #[test]
    fn test_sample_threshold_bounds() {
        let mut config = SimulationConfig::default();
        config.latix.sample_threshold = 6;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSampleThreshold(6))
        ));
        config.latix.sample_threshold = 5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_warm_radius_bounds() {
        let mut config = SimulationConfig::default();
        config.latix.warm_radius = MAX_WARM_RADIUS;
        assert!(config.validate().is_ok());
        config.latix.warm_radius = u32::MAX;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWarmRadius(u32::MAX))
        ));
    }

    #[test]
    fn test_load_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"columns": 20, "rows": 30, "mode": "latix",
                "rules": {{"high_life": true}},
                "latix": {{"occlusion": false, "jitter": 0.0}}}}"#
        )
        .unwrap();

        let config = SimulationConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.columns, 20);
        assert_eq!(config.rows, 30);
        assert_eq!(config.mode, DisplayMode::Latix);
        assert_eq!(config.rules, RuleVariants::HIGH_LIFE);
        assert!(!config.latix.occlusion);
        assert_eq!(config.latix.sample_threshold, 1);
        assert_eq!(config.tick_interval_ms, 100);
    }

    #[test]
    fn test_load_rejects_invalid_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"columns": 0, "rows": 30}}"#).unwrap();
        assert!(matches!(
            SimulationConfig::from_json_file(file.path()),
            Err(ConfigError::InvalidDimensions)
        ));
    }
}
