//! Parsing and validation of `eqgen.toml` generator configuration files.
//!
//! Every section is optional. The defaults reproduce the fixed constants the
//! generators were designed around: seed 1, 25 modules per run, a 96-pin
//! budget, and a 20-unit proof timeout.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, validate_config, CONFIG_FILE_NAME};
pub use types::*;
