//! Convoy Coordination CLI
//!
//! A command-line tool for evaluating convoy merges, inspecting convoy
//! capacity, and resolving place names to coordinates.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use convoy_lib::merge::{DEFAULT_MAX_EXTRA_MINUTES, DEFAULT_SAME_DEST_RADIUS_KM};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Convoy Coordination CLI
#[derive(Parser)]
#[command(name = "convoy")]
#[command(author, version, about = "CLI for the Convoy Coordination system", long_about = None)]
pub struct Cli {
    /// Routing service URL (overrides CONVOY_OSRM_URL)
    #[arg(long)]
    pub osrm_url: Option<String>,

    /// Geocoding service URL (overrides CONVOY_GEOCODE_URL)
    #[arg(long)]
    pub geocode_url: Option<String>,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate whether two convoys should merge
    Merge {
        /// Convoy A snapshot (JSON file)
        convoy_a: PathBuf,

        /// Convoy B snapshot (JSON file)
        convoy_b: PathBuf,

        /// Maximum acceptable extra travel time in minutes
        #[arg(long, default_value_t = DEFAULT_MAX_EXTRA_MINUTES)]
        max_extra_minutes: f64,

        /// Destination proximity threshold in kilometers
        #[arg(long = "radius-km", default_value_t = DEFAULT_SAME_DEST_RADIUS_KM)]
        same_dest_radius_km: f64,
    },

    /// Show a convoy's load and spare capacity
    Capacity {
        /// Convoy snapshot (JSON file)
        convoy: PathBuf,
    },

    /// Great-circle distance between two coordinates
    Distance {
        lat1: f64,
        lon1: f64,
        lat2: f64,
        lon2: f64,
    },

    /// Resolve an address to coordinates
    Geocode {
        /// Address or place name
        address: String,
    },

    /// Resolve coordinates to a human-readable address
    ReverseGeocode { lat: f64, lon: f64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();

    let settings = config::CliConfig::load()?;
    let osrm_url = cli.osrm_url.clone().unwrap_or_else(|| settings.osrm_url.clone());
    let geocode_url = cli
        .geocode_url
        .clone()
        .unwrap_or_else(|| settings.geocode_url.clone());

    match &cli.command {
        Commands::Merge {
            convoy_a,
            convoy_b,
            max_extra_minutes,
            same_dest_radius_km,
        } => {
            commands::merge::run(
                convoy_a,
                convoy_b,
                *max_extra_minutes,
                *same_dest_radius_km,
                &osrm_url,
                settings.request_timeout_secs,
                cli.format,
            )
            .await
        }
        Commands::Capacity { convoy } => commands::capacity::run(convoy, cli.format),
        Commands::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
        } => commands::geo::distance(*lat1, *lon1, *lat2, *lon2, cli.format),
        Commands::Geocode { address } => {
            commands::geo::geocode(address, &geocode_url, cli.format).await
        }
        Commands::ReverseGeocode { lat, lon } => {
            commands::geo::reverse_geocode(*lat, *lon, &geocode_url, cli.format).await
        }
    }
}
