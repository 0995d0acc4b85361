//! Placed objects: shelves, structural parts and cargo.
//!
//! Positions are box centres in world space. Footprints are measured in the
//! object's own frame: `width` along local X, `depth` along local Z.

use depotkit_core::{Bounds2D, Point2D, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Depth of a shelf (local X).
pub const SHELF_DEPTH: f64 = 1.0;
/// Run length of a shelf (local Z).
pub const SHELF_WIDTH: f64 = 2.0;
/// Height added per shelf layer.
pub const SHELF_LAYER_HEIGHT: f64 = 0.6;
/// Height of a shelf's base and top clearance.
pub const SHELF_BASE_HEIGHT: f64 = 1.5;

/// Minimum length of a wall drawn from a line.
pub const MIN_WALL_LENGTH: f64 = 0.5;

/// Stable identifier of a placed object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Box dimensions of an object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub width: f64,
    pub depth: f64,
    pub height: f64,
}

impl Footprint {
    pub const fn new(width: f64, depth: f64, height: f64) -> Self {
        Self {
            width,
            depth,
            height,
        }
    }

    /// Half extents along local X and Z.
    pub fn half_extents(&self) -> (f64, f64) {
        (self.width / 2.0, self.depth / 2.0)
    }

    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.depth > 0.0 && self.height > 0.0
    }
}

/// Structural part types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartKind {
    Dock,
    Wall,
    Staircase,
    Elevator,
    Restroom,
    Office,
}

impl PartKind {
    pub const ALL: [PartKind; 6] = [
        PartKind::Dock,
        PartKind::Wall,
        PartKind::Staircase,
        PartKind::Elevator,
        PartKind::Restroom,
        PartKind::Office,
    ];

    /// Footprint given to a newly placed part.
    pub fn default_footprint(&self) -> Footprint {
        match self {
            Self::Dock => Footprint::new(4.0, 0.3, 3.5),
            Self::Wall => Footprint::new(6.0, 0.2, 3.0),
            Self::Staircase => Footprint::new(3.0, 4.0, 3.0),
            Self::Elevator => Footprint::new(3.0, 3.0, 4.0),
            Self::Restroom => Footprint::new(4.0, 3.0, 3.0),
            Self::Office => Footprint::new(6.0, 4.0, 3.0),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Dock => "Dock",
            Self::Wall => "Wall",
            Self::Staircase => "Staircase",
            Self::Elevator => "Elevator",
            Self::Restroom => "Restroom",
            Self::Office => "Office",
        }
    }
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for PartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dock" => Ok(Self::Dock),
            "wall" => Ok(Self::Wall),
            "staircase" | "stairs" => Ok(Self::Staircase),
            "elevator" => Ok(Self::Elevator),
            "restroom" => Ok(Self::Restroom),
            "office" => Ok(Self::Office),
            _ => Err(format!("Unknown part type: {}", s)),
        }
    }
}

/// Shelf parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelfSpec {
    pub layer_count: u32,
}

impl ShelfSpec {
    pub fn new(layer_count: u32) -> Self {
        Self {
            layer_count: layer_count.max(1),
        }
    }

    /// Overall shelf height for the layer count.
    pub fn height(&self) -> f64 {
        self.layer_count as f64 * SHELF_LAYER_HEIGHT + SHELF_BASE_HEIGHT
    }

    pub fn footprint(&self) -> Footprint {
        Footprint::new(SHELF_DEPTH, SHELF_WIDTH, self.height())
    }
}

/// Stock keeping unit used to create cargo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuSpec {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    /// Extent along Z.
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub weight: Option<f64>,
}

impl SkuSpec {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            width: None,
            height: None,
            length: None,
            weight: None,
        }
    }

    pub fn with_size(mut self, width: f64, height: f64, length: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self.length = Some(length);
        self
    }

    /// Box size, with 0.3 x 0.2 x 0.5 defaults for missing dimensions.
    pub fn footprint(&self) -> Footprint {
        Footprint::new(
            self.width.filter(|w| *w > 0.0).unwrap_or(0.3),
            self.length.filter(|l| *l > 0.0).unwrap_or(0.5),
            self.height.filter(|h| *h > 0.0).unwrap_or(0.2),
        )
    }

    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            "Cargo".to_string()
        } else {
            self.name.clone()
        }
    }
}

/// Cargo-specific data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CargoInfo {
    pub sku_id: String,
    /// Backend record id, once the create call has completed.
    pub db_id: Option<String>,
    pub weight: f64,
}

/// What an object is.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    Shelf(ShelfSpec),
    Part(PartKind),
    Cargo(CargoInfo),
}

/// Resting state of an object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupportState {
    pub grounded: bool,
    pub velocity_y: f64,
}

impl Default for SupportState {
    fn default() -> Self {
        Self {
            grounded: true,
            velocity_y: 0.0,
        }
    }
}

/// An object in the warehouse.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedObject {
    pub id: ObjectId,
    pub name: String,
    pub kind: ObjectKind,
    /// Box centre.
    pub position: Vec3,
    /// Rotation about the vertical axis, radians.
    pub rotation: f64,
    pub footprint: Footprint,
    pub support: SupportState,
    pub selected: bool,
    pub is_dragging: bool,
    pub being_deleted: bool,
}

impl PlacedObject {
    fn base(id: ObjectId, name: String, kind: ObjectKind, position: Vec3, footprint: Footprint) -> Self {
        Self {
            id,
            name,
            kind,
            position,
            rotation: 0.0,
            footprint,
            support: SupportState::default(),
            selected: false,
            is_dragging: false,
            being_deleted: false,
        }
    }

    /// A shelf standing on the floor at `at`.
    pub fn shelf(id: ObjectId, name: impl Into<String>, at: Point2D, spec: ShelfSpec) -> Self {
        let footprint = spec.footprint();
        let position = Vec3::new(at.x, footprint.height / 2.0, at.z);
        Self::base(id, name.into(), ObjectKind::Shelf(spec), position, footprint)
    }

    /// A structural part standing on the floor at `at`.
    pub fn part(id: ObjectId, name: impl Into<String>, kind: PartKind, at: Point2D, footprint: Footprint) -> Self {
        let position = Vec3::new(at.x, footprint.height / 2.0, at.z);
        Self::base(id, name.into(), ObjectKind::Part(kind), position, footprint)
    }

    /// Cargo whose bottom face sits at `base`.
    pub fn cargo(id: ObjectId, sku: &SkuSpec, base: Vec3, db_id: Option<String>) -> Self {
        let footprint = sku.footprint();
        let position = base.with_y(base.y + footprint.height / 2.0);
        let info = CargoInfo {
            sku_id: sku.id.clone(),
            db_id,
            weight: sku.weight.unwrap_or(1.0),
        };
        Self::base(id, sku.display_name(), ObjectKind::Cargo(info), position, footprint)
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn is_cargo(&self) -> bool {
        matches!(self.kind, ObjectKind::Cargo(_))
    }

    pub fn is_shelf(&self) -> bool {
        matches!(self.kind, ObjectKind::Shelf(_))
    }

    pub fn is_part(&self) -> bool {
        matches!(self.kind, ObjectKind::Part(_))
    }

    pub fn cargo_info(&self) -> Option<&CargoInfo> {
        match &self.kind {
            ObjectKind::Cargo(info) => Some(info),
            _ => None,
        }
    }

    pub fn cargo_info_mut(&mut self) -> Option<&mut CargoInfo> {
        match &mut self.kind {
            ObjectKind::Cargo(info) => Some(info),
            _ => None,
        }
    }

    pub fn shelf_spec(&self) -> Option<&ShelfSpec> {
        match &self.kind {
            ObjectKind::Shelf(spec) => Some(spec),
            _ => None,
        }
    }

    pub fn part_kind(&self) -> Option<PartKind> {
        match self.kind {
            ObjectKind::Part(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn db_id(&self) -> Option<&str> {
        self.cargo_info().and_then(|c| c.db_id.as_deref())
    }

    pub fn bottom(&self) -> f64 {
        self.position.y - self.footprint.height / 2.0
    }

    pub fn top(&self) -> f64 {
        self.position.y + self.footprint.height / 2.0
    }

    /// Centre height when the bottom face rests at `support_y`.
    pub fn resting_y(&self, support_y: f64) -> f64 {
        support_y + self.footprint.height / 2.0
    }

    pub fn ground(&self) -> Point2D {
        self.position.ground()
    }

    /// Axis-aligned floor bounds at the current position.
    pub fn bounds(&self) -> Bounds2D {
        self.bounds_at(self.ground())
    }

    /// Axis-aligned floor bounds if the object were centred at `at`.
    pub fn bounds_at(&self, at: Point2D) -> Bounds2D {
        Bounds2D::rotated(at, self.footprint.width, self.footprint.depth, self.rotation)
    }
}

/// Builds a wall spanning the line `start`-`end`.
///
/// Returns `None` for lines shorter than [`MIN_WALL_LENGTH`].
pub fn wall_from_line(id: ObjectId, name: impl Into<String>, start: Point2D, end: Point2D) -> Option<PlacedObject> {
    let dx = end.x - start.x;
    let dz = end.z - start.z;
    let length = (dx * dx + dz * dz).sqrt();
    if length < MIN_WALL_LENGTH {
        return None;
    }
    let centre = Point2D::new(start.x + dx / 2.0, start.z + dz / 2.0);
    let base = PartKind::Wall.default_footprint();
    let footprint = Footprint::new(length, base.depth, base.height);
    Some(PlacedObject::part(id, name, PartKind::Wall, centre, footprint).with_rotation(-dz.atan2(dx)))
}
