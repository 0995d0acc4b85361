//! Save and load of warehouse layout files.
//!
//! A layout file is a JSON document holding the global parameters, the floor
//! size, every shelf and part, the aisles and optionally an export of the
//! cargo.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use depotkit_core::{LayoutError, Point2D, Vec3};
use depotkit_settings::{EnvironmentSettings, GlobalParams};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::aisle::{aisles_from_records, Aisle, AisleRecord};
use crate::objects::{Footprint, ObjectKind, PartKind, PlacedObject, ShelfSpec, SkuSpec};
use crate::registry::ObjectRegistry;

/// Layout file format version
const FILE_FORMAT_VERSION: &str = "1.0";

/// Complete layout file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutFile {
    pub version: String,
    pub metadata: LayoutMetadata,
    #[serde(default)]
    pub global: GlobalParams,
    #[serde(default)]
    pub environment: EnvironmentSettings,
    #[serde(default)]
    pub shelves: Vec<ShelfData>,
    #[serde(default)]
    pub parts: Vec<PartData>,
    #[serde(default)]
    pub aisles: Vec<AisleRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cargos: Vec<CargoData>,
}

/// Layout metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutMetadata {
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
}

/// Serialized shelf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShelfData {
    #[serde(default)]
    pub name: String,
    pub position: Point2D,
    #[serde(default)]
    pub rotation: f64,
    pub layer_count: u32,
}

/// Serialized part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartData {
    pub part_type: PartKind,
    #[serde(default)]
    pub name: String,
    pub position: Point2D,
    #[serde(default)]
    pub rotation: f64,
    /// Footprint override; the part type's default when absent.
    #[serde(default)]
    pub footprint: Option<Footprint>,
}

/// Serialized cargo. `position.y` is the height of the bottom face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CargoData {
    pub sku: SkuSpec,
    pub position: Vec3,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub db_id: Option<String>,
}

impl LayoutFile {
    /// Create a new, empty layout
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            version: FILE_FORMAT_VERSION.to_string(),
            metadata: LayoutMetadata {
                name: name.into(),
                created: now,
                modified: now,
                description: String::new(),
            },
            global: GlobalParams::default(),
            environment: EnvironmentSettings::default(),
            shelves: Vec::new(),
            parts: Vec::new(),
            aisles: Vec::new(),
            cargos: Vec::new(),
        }
    }

    /// Save layout to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize layout")?;

        std::fs::write(path.as_ref(), json).context("Failed to write layout file")?;

        Ok(())
    }

    /// Load layout from file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read layout file")?;

        let mut layout: LayoutFile =
            serde_json::from_str(&content).context("Failed to parse layout file")?;
        layout.check_version()?;

        layout.metadata.modified = Utc::now();

        Ok(layout)
    }

    fn check_version(&self) -> Result<(), LayoutError> {
        let major = |v: &str| v.split('.').next().map(str::to_string);
        if major(&self.version) != major(FILE_FORMAT_VERSION) {
            return Err(LayoutError::UnsupportedVersion(self.version.clone()));
        }
        Ok(())
    }

    /// Builds a layout from the editor state.
    pub fn capture(
        name: impl Into<String>,
        global: &GlobalParams,
        environment: &EnvironmentSettings,
        registry: &ObjectRegistry,
        aisles: &[Aisle],
        include_cargo: bool,
    ) -> Self {
        let mut layout = Self::new(name);
        layout.global = global.clone();
        layout.environment = environment.clone();

        for object in registry.iter() {
            match &object.kind {
                ObjectKind::Shelf(spec) => layout.shelves.push(ShelfData {
                    name: object.name.clone(),
                    position: object.ground(),
                    rotation: object.rotation,
                    layer_count: spec.layer_count,
                }),
                ObjectKind::Part(kind) => layout.parts.push(PartData {
                    part_type: *kind,
                    name: object.name.clone(),
                    position: object.ground(),
                    rotation: object.rotation,
                    footprint: (object.footprint != kind.default_footprint()).then_some(object.footprint),
                }),
                ObjectKind::Cargo(info) if include_cargo => layout.cargos.push(CargoData {
                    sku: SkuSpec {
                        id: info.sku_id.clone(),
                        name: object.name.clone(),
                        width: Some(object.footprint.width),
                        height: Some(object.footprint.height),
                        length: Some(object.footprint.depth),
                        weight: Some(info.weight),
                    },
                    position: object.position.with_y(object.bottom()),
                    rotation: object.rotation,
                    db_id: info.db_id.clone(),
                }),
                ObjectKind::Cargo(_) => {}
            }
        }

        layout.aisles = aisles.iter().map(Aisle::to_record).collect();
        layout
    }

    /// Inserts the layout's objects into `registry` and returns its aisles.
    ///
    /// Cargo is inserted ungrounded at its stored height so the caller can
    /// settle it.
    pub fn restore(&self, registry: &mut ObjectRegistry) -> Vec<Aisle> {
        for shelf in &self.shelves {
            let id = registry.generate_id();
            let name = if shelf.name.is_empty() {
                format!("Shelf {}", id.0)
            } else {
                shelf.name.clone()
            };
            registry.insert(
                PlacedObject::shelf(id, name, shelf.position, ShelfSpec::new(shelf.layer_count))
                    .with_rotation(shelf.rotation),
            );
        }

        for part in &self.parts {
            let footprint = part
                .footprint
                .filter(Footprint::is_valid)
                .unwrap_or_else(|| part.part_type.default_footprint());
            let id = registry.generate_id();
            let name = if part.name.is_empty() {
                part.part_type.label().to_string()
            } else {
                part.name.clone()
            };
            registry.insert(
                PlacedObject::part(id, name, part.part_type, part.position, footprint).with_rotation(part.rotation),
            );
        }

        for cargo in &self.cargos {
            let id = registry.generate_id();
            let mut object =
                PlacedObject::cargo(id, &cargo.sku, cargo.position, cargo.db_id.clone()).with_rotation(cargo.rotation);
            object.support.grounded = false;
            registry.insert(object);
        }

        aisles_from_records(&self.aisles)
    }
}
