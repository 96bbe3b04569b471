//! Application entry point for the balloons and static electricity viewer.
//!
//! This binary parses the command line, installs a `tracing` subscriber,
//! builds the [`SystemModel`] from an optional JSON configuration, and
//! delegates all interactive logic and rendering to [`Viewer`] from the
//! `viewer` module.
//!
//! # Usage
//!
//! ```bash
//! # Default layout
//! balloons-view
//!
//! # Custom configuration, verbose engine logs
//! balloons-view --config balloons.json --log-level debug
//! ```

mod viewer;

use std::path::PathBuf;

use balloons_core::{SimConfig, SystemModel};
use clap::Parser;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use viewer::Viewer;

/// Balloons and static electricity viewer
#[derive(Parser, Debug)]
#[command(name = "balloons-view")]
#[command(author, version, about = "Interactive balloons and static electricity toy", long_about = None)]
struct Cli {
    /// JSON configuration file; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

/// Reads the configuration, falling back to defaults when the file cannot
/// be used.
fn load_config(path: Option<&PathBuf>) -> SimConfig {
    let Some(path) = path else {
        return SimConfig::default();
    };
    match SimConfig::from_file(path) {
        Ok(config) => {
            info!(path = %path.display(), "loaded configuration");
            config
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "falling back to default configuration");
            SimConfig::default()
        }
    }
}

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if logging cannot be installed, the model cannot be built, or
///   eframe fails to create the native window or event loop.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("balloons-view v{}", env!("CARGO_PKG_VERSION"));

    let model = SystemModel::new(load_config(cli.config.as_ref()))?;
    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Balloons and Static Electricity",
        options,
        Box::new(|_cc| Ok(Box::new(Viewer::new(model)))),
    )
    .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
