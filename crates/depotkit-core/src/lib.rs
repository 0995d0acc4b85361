//! # DepotKit Core
//!
//! Core types shared by the DepotKit crates: floor-plane and world-space
//! geometry, length units, and the error taxonomy used at the persistence and
//! file boundaries.

pub mod error;
pub mod geometry;
pub mod units;

pub use error::{Error, LayoutError, Result, StoreError};
pub use geometry::{
    footprints_overlap, rotated_extent, snap_to_grid, to_local_frame, wrap_angle, Bounds2D,
    Point2D, Vec3, HALF_GRID, VERTEX_EPSILON,
};
pub use units::{format_length, LengthUnit};
