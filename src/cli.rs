//! Command line interface.
//!
//! `depotkit check <layout.json>` loads a layout into a headless editor,
//! lets every cargo settle and reports what it found. `depotkit init-config`
//! writes a default configuration file.

use crate::LogFormat;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use depotkit_core::format_length;
use depotkit_designer::{HeadlessScene, LayoutFile, MemoryStore, WarehouseEditor};
use depotkit_settings::{default_config_path, Config};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default tick budget for `check`: enough for a fall of 20 m.
pub const DEFAULT_MAX_TICKS: usize = 1000;

#[derive(Debug, Parser)]
#[command(name = "depotkit", version, about = "Warehouse layout designer")]
pub struct Cli {
    /// Configuration file (JSON or TOML). Defaults to the platform config path.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load a layout, settle its cargo and report the result.
    Check {
        /// Layout file to check.
        layout: PathBuf,

        /// Write the settled layout here.
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Maximum gravity ticks to run.
        #[arg(long, default_value_t = DEFAULT_MAX_TICKS)]
        max_ticks: usize,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Write a default configuration file.
    InitConfig {
        /// Destination; `.json` or `.toml`. Defaults to the platform config path.
        path: Option<PathBuf>,

        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Outcome of `check`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    pub name: String,
    pub shelves: usize,
    pub parts: usize,
    pub cargo: usize,
    pub aisles: usize,
    /// Aisle records that could not be loaded.
    pub skipped_aisles: usize,
    /// Total centre line length of the aisles, world units.
    pub aisle_length: f64,
    /// Cargo that moved before coming to rest.
    pub settled: usize,
    /// Cargo still falling when the tick budget ran out.
    pub still_falling: usize,
    pub ticks: usize,
}

impl CheckReport {
    pub fn is_stable(&self) -> bool {
        self.still_falling == 0
    }
}

/// Runs the parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Check {
            layout,
            output,
            max_ticks,
            json,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let report = check_layout(config.clone(), &layout, output.as_deref(), max_ticks)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report, &config);
            }
            if !report.is_stable() {
                anyhow::bail!(
                    "{} cargo still falling after {} ticks",
                    report.still_falling,
                    report.ticks
                );
            }
            Ok(())
        }
        Command::InitConfig { path, force } => {
            let path = match path.or(cli.config) {
                Some(path) => path,
                None => default_config_path()?,
            };
            init_config(&path, force)?;
            println!("Wrote {}", path.display());
            Ok(())
        }
    }
}

/// Loads the configuration from `path`, or from the platform default path
/// when it exists.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => match default_config_path() {
            Ok(path) => Config::load_or_default(&path)
                .with_context(|| format!("Failed to load config {}", path.display())),
            Err(e) => {
                tracing::debug!("No default config location: {}", e);
                Ok(Config::default())
            }
        },
    }
}

/// Loads `layout_path` into a headless editor and settles it.
///
/// Must run inside a tokio runtime: the editor's persistence worker is
/// spawned against an in-memory store.
pub fn check_layout(config: Config, layout_path: &Path, output: Option<&Path>, max_ticks: usize) -> Result<CheckReport> {
    let layout = LayoutFile::load_from_file(layout_path)
        .with_context(|| format!("Failed to load layout {}", layout_path.display()))?;
    tracing::info!("Checking layout '{}' from {}", layout.metadata.name, layout_path.display());

    let (mut editor, worker) = WarehouseEditor::new(config, HeadlessScene::new());
    worker.spawn(Arc::new(MemoryStore::new()));
    editor.load_layout(&layout);

    let mut ticks = 0;
    let mut settled = std::collections::HashSet::new();
    while !editor.gravity().is_idle() && ticks < max_ticks {
        for landing in editor.tick().landings {
            settled.insert(landing.id);
        }
        ticks += 1;
    }

    let registry = editor.registry();
    let report = CheckReport {
        name: layout.metadata.name.clone(),
        shelves: registry.shelves().count(),
        parts: registry.parts().count(),
        cargo: registry.cargos().count(),
        aisles: editor.aisles().len(),
        skipped_aisles: layout.aisles.len().saturating_sub(editor.aisles().len()),
        aisle_length: editor.aisles().iter().map(|a| a.path.length()).sum(),
        settled: settled.len(),
        still_falling: editor.gravity().falling_count(),
        ticks,
    };

    if let Some(output) = output {
        let mut settled_layout = editor.export_layout(&layout.metadata.name, true);
        settled_layout.metadata.created = layout.metadata.created;
        settled_layout.metadata.description = layout.metadata.description.clone();
        settled_layout
            .save_to_file(output)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        tracing::info!("Wrote settled layout to {}", output.display());
    }

    Ok(report)
}

/// Writes a default configuration file to `path`.
pub fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    Config::default()
        .save_to_file(path)
        .with_context(|| format!("Failed to write config {}", path.display()))
}

fn print_report(report: &CheckReport, config: &Config) {
    let unit = config.global.unit;
    println!("Layout: {}", report.name);
    println!("  Shelves: {}", report.shelves);
    println!("  Parts:   {}", report.parts);
    println!("  Cargo:   {} ({} settled)", report.cargo, report.settled);
    println!(
        "  Aisles:  {} (total {})",
        report.aisles,
        format_length(report.aisle_length, unit)
    );
    if report.skipped_aisles > 0 {
        println!("  Skipped {} invalid aisle record(s)", report.skipped_aisles);
    }
    if report.is_stable() {
        println!("Stable after {} tick(s)", report.ticks);
    } else {
        println!("{} cargo still falling after {} tick(s)", report.still_falling, report.ticks);
    }
}
