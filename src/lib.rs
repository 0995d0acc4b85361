//! # DepotKit
//!
//! A warehouse layout designer:
//! - Aisle centre lines drawn as polylines, merged and split as they are edited
//! - Shelves and structural parts placed on the floor with edge snapping
//! - Cargo stacked on shelves and on each other, settling under gravity
//! - Fire-and-forget persistence of cargo and aisle configuration
//!
//! ## Architecture
//!
//! DepotKit is organized as a workspace with multiple crates:
//!
//! 1. **depotkit-core** - Geometry, length units, error types
//! 2. **depotkit-settings** - Editor configuration, file formats, validation
//! 3. **depotkit-designer** - Path graph, physics, sessions, scene/store seams, layout files
//! 4. **depotkit** - Binary with the layout checker and logging bootstrap

pub mod cli;

pub use depotkit_core::{format_length, Error, LayoutError, LengthUnit, Point2D, Result, StoreError, Vec3};
pub use depotkit_designer as designer;
pub use depotkit_designer::{
    HeadlessScene, LayoutFile, MemoryStore, PersistQueue, PersistWorker, Scene, Store, WarehouseEditor,
};
pub use depotkit_settings::{default_config_path, Config, ConfigError, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    /// Human readable, multi-line
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    init_logging_with(LogFormat::Pretty)
}

/// Initialize logging in the given format.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging_with(format: LogFormat) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_line_number(true)
                .pretty();

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .json()
                .with_current_span(false)
                .with_span_list(true);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
    }

    Ok(())
}
