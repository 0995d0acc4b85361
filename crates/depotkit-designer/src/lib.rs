//! # DepotKit Designer
//!
//! Warehouse layout editing: aisle centre lines drawn as a path graph,
//! shelves and parts placed on the floor, and cargo that stacks and settles
//! under gravity.
//!
//! ## Core Components
//!
//! ### Aisles
//! - **Path Graph**: polylines with extend, split and merge rules plus
//!   snapshot undo/redo
//! - **Aisle Editor**: the aisle mode session, hover and selection, preview
//! - **Aisles**: committed width extrusions of paths
//!
//! ### Objects
//! - **Registry**: every placed shelf, part and cargo
//! - **Support Resolver**: highest surface under a footprint
//! - **Cascade**: re-settles stacks when their base moves or goes away
//! - **Gravity**: per-tick fall of unsupported objects
//! - **Drag, Placement, Reposition**: pointer sessions with edge snapping
//!
//! ### Collaborators
//! - **Scene**: rendering and ray casting, with an in-memory [`HeadlessScene`]
//! - **Store**: backend records, with an in-memory [`MemoryStore`]
//! - **Persistence**: ordered fire-and-forget writes on a tokio task
//!
//! ## Architecture
//!
//! ```text
//! WarehouseEditor
//!   ├── AisleEditor ── PathGraph ── PathHistory
//!   ├── ObjectRegistry
//!   │     ├── SupportResolver
//!   │     ├── CascadeEngine
//!   │     └── GravityController
//!   ├── Drag / Placement / Reposition sessions
//!   ├── Scene (rendering)
//!   └── PersistQueue ──> PersistWorker ──> Store
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use depotkit_designer::{HeadlessScene, WarehouseEditor};
//! use depotkit_settings::Config;
//!
//! let (mut editor, worker) = WarehouseEditor::new(Config::default(), HeadlessScene::new());
//! worker.spawn(store);
//!
//! editor.enter_aisle_mode();
//! editor.aisle_primary_click(Point2D::new(0.0, 0.0));
//! editor.aisle_primary_click(Point2D::new(5.0, 0.0));
//! editor.exit_aisle_mode();
//! ```

pub mod aisle;
pub mod aisle_editor;
pub mod cascade;
pub mod drag;
pub mod editor;
pub mod gravity;
pub mod keyboard;
pub mod objects;
pub mod path_graph;
pub mod persistence;
pub mod placement;
pub mod registry;
pub mod scene;
pub mod serialization;
pub mod snapping;
pub mod store;
pub mod support;

pub use aisle::{aisles_from_records, Aisle, AisleGeometry, AisleRecord};
pub use aisle_editor::{AisleEditor, AislePreview, EscapeOutcome, MarkerState, SecondaryOutcome};
pub use cascade::CascadeEngine;
pub use drag::{DragContext, DragEnd, DragKind, DragSession};
pub use editor::{PointerModifiers, TickReport, WarehouseEditor};
pub use gravity::{GravityController, Landing, SettleOutcome};
pub use keyboard::{map_key, EditorAction, Key, KeyContext, KeyInput};
pub use objects::{
    CargoInfo, Footprint, ObjectId, ObjectKind, PartKind, PlacedObject, ShelfSpec, SkuSpec,
};
pub use path_graph::{ClickOutcome, DrawHint, DrawingStart, Path, PathGraph, PathGraphState, PointHit};
pub use persistence::{PendingWrite, PersistEvent, PersistOp, PersistOutcome, PersistQueue, PersistWorker};
pub use placement::{PlacementKind, PlacementPosition, PlacementSession, RepositionSession};
pub use registry::ObjectRegistry;
pub use scene::{CameraState, HeadlessScene, PointerRay, RayHit, Scene, SceneKey, SceneNode};
pub use serialization::LayoutFile;
pub use store::{CargoPose, CargoRecord, MemoryStore, Store};
pub use support::{Support, SupportResolver, SupportSource};
