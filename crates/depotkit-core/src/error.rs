//! Error handling for DepotKit
//!
//! Editing operations on the path graph and the object registry never fail:
//! bad indices are no-ops and degenerate input produces a hint. The types here
//! cover the edges of the system instead:
//! - Store errors (persistence collaborator)
//! - Layout errors (invalid aisle/layout data)
//! - IO and JSON failures when reading or writing layout files
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Persistence error type
///
/// Returned by the store collaborator. The editor never rolls local state back
/// on these; they are logged and surfaced through the persistence queue.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The backend could not be reached
    #[error("Store unreachable: {message}")]
    Unreachable {
        /// Transport level description.
        message: String,
    },

    /// The backend answered but refused the request
    #[error("Store rejected request ({status}): {message}")]
    Rejected {
        /// Status code reported by the backend.
        status: u16,
        /// Message reported by the backend.
        message: String,
    },

    /// The referenced record does not exist
    #[error("Record not found: {id}")]
    NotFound {
        /// Identifier that was looked up.
        id: String,
    },

    /// A record could not be encoded or decoded
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// The persistence queue has shut down
    #[error("Persistence queue closed")]
    Closed,
}

/// Layout data error type
///
/// Raised when persisted aisle or layout data violates its invariants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// An aisle path needs at least two points
    #[error("Aisle {index} has {points} point(s); at least 2 are required")]
    PathTooShort {
        /// Index of the aisle in the document.
        index: usize,
        /// Number of points found.
        points: usize,
    },

    /// Aisle width must be positive
    #[error("Aisle {index} has non-positive width {width}")]
    NonPositiveWidth {
        /// Index of the aisle in the document.
        index: usize,
        /// Offending width.
        width: f64,
    },

    /// Object dimensions must be positive
    #[error("Object '{name}' has invalid dimensions")]
    InvalidDimensions {
        /// Display name of the object.
        name: String,
    },

    /// The document was written by an unknown format version
    #[error("Unsupported layout version: {0}")]
    UnsupportedVersion(String),
}

/// Main error type for DepotKit
#[derive(Error, Debug)]
pub enum Error {
    /// Persistence error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Layout data error
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// True for failures of the persistence collaborator
    pub fn is_store_error(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

/// Result type alias for DepotKit operations
pub type Result<T> = std::result::Result<T, Error>;
