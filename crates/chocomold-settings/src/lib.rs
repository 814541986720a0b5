//! ChocoMold Settings Crate
//!
//! Mold parameters, pattern-pipeline settings, and configuration file persistence.

pub mod config;
pub mod error;

pub use config::{BaseStyle, Config, MoldParameters, PatternSettings};
pub use error::{ConfigError, SettingsError, SettingsResult};
