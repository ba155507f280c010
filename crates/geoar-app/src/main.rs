//! geoar: proximity AR overlay demos
//!
//! Usage:
//!   geoar overlay                 # terminal AR view around Berlin Mitte
//!   geoar overlay --lat 48.85 --lng 2.35
//!   geoar sync --duration-secs 120

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use geoar_config::GeoArConfig;
use geoar_oui::GeoPoint;

const DEFAULT_LAT: f64 = 52.5200;
const DEFAULT_LNG: f64 = 13.4050;

/// Proximity AR overlay engine with paired-device sync
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to geoar.toml (defaults to $GEOAR_CONFIG, then the platform config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Terminal AR view with simulated sensors and messages
    Overlay {
        #[arg(long, default_value_t = DEFAULT_LAT, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, default_value_t = DEFAULT_LNG, allow_negative_numbers = true)]
        lng: f64,
        /// Where to write logs while the terminal is in use
        #[arg(long, default_value = "geoar.log")]
        log_file: PathBuf,
    },
    /// Headless paired-device sync against a logging bridge
    Sync {
        #[arg(long, default_value_t = DEFAULT_LAT, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, default_value_t = DEFAULT_LNG, allow_negative_numbers = true)]
        lng: f64,
        /// How long to run before shutting down
        #[arg(long, default_value_t = 60)]
        duration_secs: u64,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = GeoArConfig::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Command::Overlay { lat, lng, log_file } => {
            geoar_app::logging::init_file(&config.logging.level, &log_file)?;
            let summary = geoar_app::run_overlay(&config, GeoPoint::new(lat, lng)).await?;
            println!(
                "{} frames drawn, {} skipped, {} events",
                summary.frames_drawn, summary.frames_skipped, summary.events
            );
        }
        Command::Sync {
            lat,
            lng,
            duration_secs,
        } => {
            geoar_app::logging::init_stderr(&config.logging.level);
            let report = geoar_app::run_sync(
                &config,
                GeoPoint::new(lat, lng),
                Duration::from_secs(duration_secs),
            )
            .await?;
            println!(
                "{} batches sent over {} steps",
                report.batches_sent, report.steps_walked
            );
        }
    }

    Ok(())
}
