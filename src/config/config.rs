// src/config/config.rs
use crate::types::Uint256;
use crate::utils::error::PowError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Consensus parameters consumed by the validation core
///
/// Supplied by the embedding node's parameter loading; this crate only
/// reads them. Both intervals are consensus-critical: changing either
/// on a live chain is a hard fork.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusParams {
    /// Number of consecutive heights sharing one memory-hard seed
    #[serde(default = "default_epoch_length")]
    pub epoch_length: u32,

    /// Seconds between Odo shape changes; the Odo key is the block
    /// timestamp rounded down to a multiple of this interval
    #[serde(default = "default_odo_shapechange_interval")]
    pub odo_shapechange_interval: u32,

    /// Seed the memory-hard cache is built from for epoch 0 heights
    /// (hex, display order)
    #[serde(default)]
    pub initial_seed: Uint256,
}

/// Top-level configuration for the validation core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Consensus parameters
    pub consensus: ConsensusParams,
}

fn default_epoch_length() -> u32 {
    2048
}

fn default_odo_shapechange_interval() -> u32 {
    // 10 days, the interval the reference chain ships with.
    864_000
}

impl Default for ConsensusParams {
    fn default() -> Self {
        ConsensusParams {
            epoch_length: default_epoch_length(),
            odo_shapechange_interval: default_odo_shapechange_interval(),
            initial_seed: Uint256::ZERO,
        }
    }
}

impl ConsensusParams {
    /// Rejects parameter values the seed arithmetic cannot work with
    pub fn validate(&self) -> Result<(), PowError> {
        if self.epoch_length == 0 {
            return Err(PowError::Config("epoch_length must be nonzero".into()));
        }
        if self.odo_shapechange_interval == 0 {
            return Err(PowError::Config(
                "odo_shapechange_interval must be nonzero".into(),
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(Config)` - Successfully loaded and validated configuration
    /// * `Err(PowError)` - If the file couldn't be read, parsed or validated
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, PowError> {
        let path = path.into();
        let config_str = std::fs::read_to_string(&path).map_err(|e| {
            PowError::Config(format!("Failed to read config at {}: {}", path.display(), e))
        })?;

        let config: Config = toml::from_str(&config_str)
            .map_err(|e| PowError::Config(format!("Invalid config format: {}", e)))?;
        config.consensus.validate()?;
        Ok(config)
    }

    /// Generates a commented TOML configuration template
    pub fn generate_template() -> String {
        let mut template = String::new();
        template.push_str("# multipow configuration\n\n");
        template.push_str("[consensus]\n");
        template.push_str("# Heights per memory-hard seed epoch\n");
        template.push_str("epoch_length = 2048\n");
        template.push_str("# Odo shape change interval in seconds\n");
        template.push_str("odo_shapechange_interval = 864000\n");
        template.push_str("# Epoch-0 seed for the memory-hard cache (hex, display order)\n");
        template.push_str(
            "initial_seed = \"0000000000000000000000000000000000000000000000000000000000000000\"\n",
        );
        template
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_parses_back_with_defaults() {
        let config: Config = toml::from_str(&Config::generate_template())
            .expect("generated template must be valid TOML");
        assert_eq!(config.consensus.epoch_length, 2048);
        assert_eq!(config.consensus.odo_shapechange_interval, 864_000);
        assert_eq!(config.consensus.initial_seed, Uint256::ZERO);
        config.consensus.validate().unwrap();
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: Config = toml::from_str("[consensus]\nepoch_length = 100\n").unwrap();
        assert_eq!(config.consensus.epoch_length, 100);
        assert_eq!(
            config.consensus.odo_shapechange_interval,
            default_odo_shapechange_interval()
        );
    }

    #[test]
    fn zero_intervals_are_rejected() {
        let params = ConsensusParams {
            epoch_length: 0,
            ..ConsensusParams::default()
        };
        assert!(params.validate().is_err());

        let params = ConsensusParams {
            odo_shapechange_interval: 0,
            ..ConsensusParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn initial_seed_round_trips_through_toml() {
        let seed_hex = "00000000000000000000000000000000000000000000000000000000000000ff";
        let raw = format!("[consensus]\ninitial_seed = \"{}\"\n", seed_hex);
        let config: Config = toml::from_str(&raw).unwrap();
        assert_eq!(config.consensus.initial_seed.to_string(), seed_hex);
    }
}
