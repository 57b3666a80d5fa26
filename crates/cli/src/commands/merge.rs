//! Merge evaluation command

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use convoy_lib::merge::FUEL_SAVINGS_LITERS_PER_KM;
use convoy_lib::models::Convoy;
use convoy_lib::routing::OsrmClient;
use convoy_lib::{MergeEngine, MergeOptions, MergeVerdict};
use std::path::Path;
use std::time::Duration;

use crate::output::{self, OutputFormat};

#[allow(clippy::too_many_arguments)]
pub async fn run(
    convoy_a: &Path,
    convoy_b: &Path,
    max_extra_minutes: f64,
    same_dest_radius_km: f64,
    osrm_url: &str,
    request_timeout_secs: u64,
    format: OutputFormat,
) -> Result<()> {
    let a = load_convoy(convoy_a)?;
    let b = load_convoy(convoy_b)?;

    let oracle = OsrmClient::with_timeout(osrm_url, Duration::from_secs(request_timeout_secs))?;
    let engine = MergeEngine::new(oracle);
    let options = MergeOptions {
        max_extra_minutes,
        same_dest_radius_km,
        fuel_savings_per_km: FUEL_SAVINGS_LITERS_PER_KM,
    };

    let verdict = engine.evaluate(&a, &b, &options).await;

    match format {
        OutputFormat::Json => output::print_json(&verdict),
        OutputFormat::Table => print_verdict(&a, &b, &verdict),
    }

    Ok(())
}

/// Load and validate a convoy snapshot from a JSON file
fn load_convoy(path: &Path) -> Result<Convoy> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read convoy file {}", path.display()))?;
    let convoy: Convoy = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse convoy file {}", path.display()))?;
    convoy
        .validate()
        .map_err(|err| anyhow!("Invalid convoy snapshot {}: {}", path.display(), err))?;
    Ok(convoy)
}

fn print_verdict(a: &Convoy, b: &Convoy, verdict: &MergeVerdict) {
    if verdict.can_merge {
        output::print_success(&format!(
            "Convoys '{}' and '{}' can merge",
            a.name, b.name
        ));
    } else {
        output::print_error(&format!(
            "Convoys '{}' and '{}' should not merge",
            a.name, b.name
        ));
    }

    println!("  {:<22} {}", "reason:".dimmed(), verdict.reason);
    println!("  {:<22} {}", "scenario:".dimmed(), verdict.scenario);
    if let Some(extra) = verdict.extra_minutes {
        println!("  {:<22} {:.2} min", "extra time:".dimmed(), extra);
    }
    println!(
        "  {:<22} {:.2} km",
        "destination gap:".dimmed(),
        verdict.dest_distance_km
    );
    if let Some(fuel) = verdict.fuel_savings_liters {
        println!("  {:<22} {:.2} L", "fuel savings:".dimmed(), fuel);
    }
    println!(
        "  {:<22} {:.2} kg",
        "spare capacity A:".dimmed(),
        verdict.spare_capacity_a_kg
    );
    println!(
        "  {:<22} {:.2} kg",
        "spare capacity B:".dimmed(),
        verdict.spare_capacity_b_kg
    );
}
