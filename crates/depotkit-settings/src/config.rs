//! Configuration and settings management for DepotKit
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats stored in platform-specific directories.
//!
//! Configuration is organized into logical sections:
//! - Global warehouse parameters (areas, channels, shelf layers, unit)
//! - Environment (usable floor space)
//! - Aisle drawing (width, hit radii, history depth)
//! - Snapping thresholds
//! - Physics constants for support resolution and settling

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
pub use depotkit_core::units::LengthUnit;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = "depotkit";
const CONFIG_FILE: &str = "config.toml";

/// Warehouse-wide parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalParams {
    /// Number of storage areas
    pub area_count: u32,
    /// Number of channels per area
    pub channel_count: u32,
    /// Number of layers on a shelf
    pub layer_count: u32,
    /// Number of cells per layer
    pub cell_count: u32,
    /// Display unit
    pub unit: LengthUnit,
}

impl Default for GlobalParams {
    fn default() -> Self {
        Self {
            area_count: 4,
            channel_count: 2,
            layer_count: 5,
            cell_count: 20,
            unit: LengthUnit::Meters,
        }
    }
}

/// Usable floor space, centred on the origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentSettings {
    /// Extent along X
    pub space_length: f64,
    /// Extent along Z
    pub space_width: f64,
}

impl Default for EnvironmentSettings {
    fn default() -> Self {
        Self {
            space_length: 50.0,
            space_width: 50.0,
        }
    }
}

impl EnvironmentSettings {
    /// Half extents `(x, z)` used to clamp dragged objects.
    pub fn half_extents(&self) -> (f64, f64) {
        (self.space_length / 2.0, self.space_width / 2.0)
    }
}

/// Aisle drawing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AisleSettings {
    /// Width given to newly committed aisles
    pub default_width: f64,
    /// Radius of a rendered vertex marker; hit testing uses twice this
    pub point_radius: f64,
    /// Maximum distance for right-click vertex deletion
    pub delete_radius: f64,
    /// Number of undo snapshots kept
    pub history_capacity: usize,
}

impl Default for AisleSettings {
    fn default() -> Self {
        Self {
            default_width: 2.0,
            point_radius: 0.4,
            delete_radius: 2.0,
            history_capacity: 50,
        }
    }
}

impl AisleSettings {
    /// Radius within which a click adopts an existing vertex.
    pub fn hit_radius(&self) -> f64 {
        self.point_radius * 2.0
    }
}

/// Edge snapping settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnappingSettings {
    /// Enable snapping while dragging shelves and parts
    pub enabled: bool,
    /// Part edge snap distance in world units
    pub part_threshold: f64,
    /// Shelf edge snap distance, in configured units
    pub shelf_threshold: f64,
}

impl Default for SnappingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            part_threshold: 0.3,
            shelf_threshold: 0.1,
        }
    }
}

impl SnappingSettings {
    /// Shelf snap distance in world units for the given display unit.
    pub fn shelf_threshold_world(&self, unit: LengthUnit) -> f64 {
        self.shelf_threshold * unit.scale()
    }
}

/// Constants for support resolution and gravity settling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Distance an unsupported object drops per tick
    pub fall_step: f64,
    /// Gap between a shelf layer's nominal height and its board top
    pub layer_offset: f64,
    /// Tolerance for "below the bottom face" and "already at rest"
    pub support_epsilon: f64,
    /// Gap under which a top face and a bottom face count as touching
    pub contact_tolerance: f64,
    /// Fraction of the half-extent sum used for footprint overlap
    pub overlap_shrink: f64,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            fall_step: 0.02,
            layer_offset: 0.06,
            support_epsilon: 0.01,
            contact_tolerance: 0.1,
            overlap_shrink: 0.8,
        }
    }
}

/// Complete editor configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Warehouse parameters
    pub global: GlobalParams,
    /// Floor space
    pub environment: EnvironmentSettings,
    /// Aisle drawing
    pub aisle: AisleSettings,
    /// Snapping
    pub snapping: SnappingSettings,
    /// Physics constants
    pub physics: PhysicsSettings,
}

enum ConfigFormat {
    Json,
    Toml,
}

fn format_for(path: &Path) -> SettingsResult<ConfigFormat> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(ConfigFormat::Json),
        Some("toml") => Ok(ConfigFormat::Toml),
        other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("<none>").to_string()).into()),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_for(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load config from file, falling back to defaults when it does not exist
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_for(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.global.layer_count == 0 {
            return Err(ConfigError::out_of_range("global.layer_count", 0));
        }

        if self.environment.space_length <= 0.0 {
            return Err(ConfigError::out_of_range(
                "environment.space_length",
                self.environment.space_length,
            ));
        }
        if self.environment.space_width <= 0.0 {
            return Err(ConfigError::out_of_range(
                "environment.space_width",
                self.environment.space_width,
            ));
        }

        if self.aisle.default_width <= 0.0 {
            return Err(ConfigError::out_of_range(
                "aisle.default_width",
                self.aisle.default_width,
            ));
        }
        if self.aisle.point_radius <= 0.0 {
            return Err(ConfigError::out_of_range(
                "aisle.point_radius",
                self.aisle.point_radius,
            ));
        }
        if self.aisle.delete_radius <= 0.0 {
            return Err(ConfigError::out_of_range(
                "aisle.delete_radius",
                self.aisle.delete_radius,
            ));
        }
        // One entry is the baseline; undo needs at least one more.
        if self.aisle.history_capacity < 2 {
            return Err(ConfigError::out_of_range(
                "aisle.history_capacity",
                self.aisle.history_capacity,
            ));
        }

        if self.snapping.part_threshold < 0.0 {
            return Err(ConfigError::out_of_range(
                "snapping.part_threshold",
                self.snapping.part_threshold,
            ));
        }
        if self.snapping.shelf_threshold < 0.0 {
            return Err(ConfigError::out_of_range(
                "snapping.shelf_threshold",
                self.snapping.shelf_threshold,
            ));
        }

        if self.physics.fall_step <= 0.0 {
            return Err(ConfigError::out_of_range(
                "physics.fall_step",
                self.physics.fall_step,
            ));
        }
        if self.physics.overlap_shrink <= 0.0 || self.physics.overlap_shrink > 1.0 {
            return Err(ConfigError::out_of_range(
                "physics.overlap_shrink",
                self.physics.overlap_shrink,
            ));
        }

        Ok(())
    }
}

/// Platform config file location (`<config dir>/depotkit/config.toml`).
pub fn default_config_path() -> SettingsResult<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| {
        SettingsError::ConfigDirectory("no configuration directory on this platform".to_string())
    })?;
    Ok(base.join(CONFIG_DIR).join(CONFIG_FILE))
}
