//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::BorcaConfig;
use std::collections::BTreeSet;
use std::path::Path;

/// The file name looked up when a directory is given to [`load_config`].
pub const CONFIG_FILE_NAME: &str = "borca.toml";

/// Loads and validates a configuration file.
///
/// `path` may name the file itself or a directory containing `borca.toml`.
pub fn load_config(path: &Path) -> Result<BorcaConfig, ConfigError> {
    let config_path = if path.is_dir() {
        path.join(CONFIG_FILE_NAME)
    } else {
        path.to_path_buf()
    };
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<BorcaConfig, ConfigError> {
    let config: BorcaConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &BorcaConfig) -> Result<(), ConfigError> {
    let arch = &config.arch;
    if !(1..=8).contains(&arch.lut_k) {
        return Err(ConfigError::ValidationError(format!(
            "arch.lut_k must be in 1..=8, got {}",
            arch.lut_k
        )));
    }
    if arch.grid_x == 0 || arch.grid_y == 0 {
        return Err(ConfigError::ValidationError(
            "arch.grid_x and arch.grid_y must be at least 1".to_string(),
        ));
    }

    let sb = &config.switchbox;
    if sb.wires_per_side == 0 || sb.horizontal_wires() == 0 {
        return Err(ConfigError::ValidationError(
            "switchbox wire counts must be at least 1".to_string(),
        ));
    }
    if !sb.pip_delay_ns.is_finite() || sb.pip_delay_ns < 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "switchbox.pip_delay_ns must be a non-negative number, got {}",
            sb.pip_delay_ns
        )));
    }

    let mut seen = BTreeSet::new();
    for entry in &config.bitstream.params {
        if !seen.insert((entry.cell_type.as_str(), entry.parameter.as_str())) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate bitstream parameter {}.{}",
                entry.cell_type, entry.parameter
            )));
        }
        if entry.write && entry.numeric && !entry.width.is_some_and(|w| w > 0) {
            return Err(ConfigError::ValidationError(format!(
                "numeric bitstream parameter {}.{} needs a positive width",
                entry.cell_type, entry.parameter
            )));
        }
    }
    Ok(())
}
