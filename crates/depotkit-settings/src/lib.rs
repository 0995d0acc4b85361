//! DepotKit Settings Crate
//!
//! Handles editor configuration: file formats, defaults and validation.

pub mod config;
pub mod error;

pub use config::{
    default_config_path, AisleSettings, Config, EnvironmentSettings, GlobalParams, LengthUnit,
    PhysicsSettings, SnappingSettings,
};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
