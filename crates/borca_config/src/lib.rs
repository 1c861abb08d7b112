//! Parsing and validation of `borca.toml` configuration files.
//!
//! Produces a strongly-typed [`BorcaConfig`] describing the grid, the switch
//! box, the packing stages, and the bitstream parameter table. Every section
//! is optional; missing values fall back to the stock Borca device.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
