//! Simulation configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `alembic.ron` file (if exists)
//! 3. Environment variables prefixed with `ALEMBIC_`
//!
//! Example environment variable: `ALEMBIC_THERMAL_DETAIL=true`

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Grid size, random seed and engine tuning for one [`crate::World`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Grid width in cells
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
    /// Seed for the world's random stream (catalog jitter and every tick)
    pub seed: u64,
    /// Recursion ceiling for a single directional step
    pub max_step_depth: u32,
    /// Use measured conductivity / heat capacity instead of unit constants
    pub thermal_detail: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 240,
            height: 160,
            seed: 0,
            max_step_depth: 8,
            thermal_detail: false,
        }
    }
}

impl SimConfig {
    /// Load configuration with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. `alembic.ron` file (if exists)
    /// 3. Environment variables prefixed with `ALEMBIC_` (highest priority)
    pub fn load() -> SimResult<Self> {
        let defaults = Self::default();
        let builder = Config::builder()
            // Layer 1: Compiled defaults
            .set_default("width", defaults.width as i64)?
            .set_default("height", defaults.height as i64)?
            .set_default("seed", defaults.seed as i64)?
            .set_default("max_step_depth", i64::from(defaults.max_step_depth))?
            .set_default("thermal_detail", defaults.thermal_detail)?
            // Layer 2: Config file (optional, won't error if missing)
            .add_source(
                File::with_name("alembic")
                    .format(FileFormat::Ron)
                    .required(false),
            )
            // Layer 3: Environment variables (ALEMBIC_WIDTH, ALEMBIC_SEED, etc.)
            .add_source(
                Environment::with_prefix("ALEMBIC")
                    .prefix_separator("_")
                    .separator("__"),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a RON document; missing fields keep their defaults.
    pub fn from_ron_str(source: &str) -> SimResult<Self> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Grid dimensions must be non-zero and addressable with `i32` coordinates
    pub fn validate(&self) -> SimResult<()> {
        let limit = i32::MAX as usize;
        if self.width == 0 || self.height == 0 || self.width > limit || self.height > limit {
            return Err(SimError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert_eq!(config.width, 240);
        assert_eq!(config.height, 160);
        assert_eq!(config.seed, 0);
        assert_eq!(config.max_step_depth, 8);
        assert!(!config.thermal_detail);
    }

    #[test]
    fn test_load_config_with_defaults() {
        // Should load defaults when no config file exists
        let config = SimConfig::load().expect("Failed to load config");
        assert!(config.width > 0);
        assert!(config.height > 0);
    }

    #[test]
    fn test_load_reads_single_underscore_env_vars() {
        // Only this test touches ALEMBIC_* variables
        unsafe {
            std::env::set_var("ALEMBIC_THERMAL_DETAIL", "true");
            std::env::set_var("ALEMBIC_MAX_STEP_DEPTH", "3");
        }
        let config = SimConfig::load();
        unsafe {
            std::env::remove_var("ALEMBIC_THERMAL_DETAIL");
            std::env::remove_var("ALEMBIC_MAX_STEP_DEPTH");
        }

        let config = config.expect("Failed to load config");
        assert!(config.thermal_detail);
        assert_eq!(config.max_step_depth, 3);
    }

    #[test]
    fn test_from_ron_partial_document() {
        let config = SimConfig::from_ron_str("(width: 32, height: 16, thermal_detail: true)")
            .expect("valid RON");
        assert_eq!(config.width, 32);
        assert_eq!(config.height, 16);
        assert!(config.thermal_detail);
        assert_eq!(config.max_step_depth, 8);
    }

    #[test]
    fn test_from_ron_rejects_garbage() {
        assert!(matches!(
            SimConfig::from_ron_str("(width: \"wide\")"),
            Err(SimError::Ron(_))
        ));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let config = SimConfig {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidDimensions {
                width: 0,
                height: 160
            })
        ));
    }
}
