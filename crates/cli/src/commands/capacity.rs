//! Convoy capacity summary command

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use convoy_lib::capacity;
use convoy_lib::models::Convoy;
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;

use crate::output::{self, OutputFormat};

#[derive(Tabled, Serialize)]
struct VehicleRow {
    registration: String,
    #[tabled(rename = "type")]
    vehicle_type: String,
    load_kg: f64,
    capacity_kg: f64,
    status: String,
    driver: String,
}

pub fn run(path: &Path, format: OutputFormat) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read convoy file {}", path.display()))?;
    let convoy: Convoy = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse convoy file {}", path.display()))?;
    convoy
        .validate()
        .map_err(|err| anyhow!("Invalid convoy snapshot {}: {}", path.display(), err))?;

    let total_capacity = capacity::total_capacity_kg(&convoy);
    let spare = capacity::spare_capacity_kg(&convoy);

    if let OutputFormat::Json = format {
        output::print_json(&serde_json::json!({
            "id": convoy.id,
            "name": convoy.name,
            "priority": convoy.priority,
            "vehicle_count": convoy.vehicles.len(),
            "total_load_kg": convoy.total_load_kg,
            "total_capacity_kg": total_capacity,
            "spare_capacity_kg": spare,
        }));
        return Ok(());
    }

    println!("{} ({})", convoy.name.bold(), convoy.priority);
    println!("  {:<18} {:.2} kg", "total load:".dimmed(), convoy.total_load_kg);
    println!("  {:<18} {:.2} kg", "total capacity:".dimmed(), total_capacity);
    println!("  {:<18} {:.2} kg", "spare capacity:".dimmed(), spare);
    if spare < 0.0 {
        output::print_warning("Convoy is overloaded");
    }
    println!();

    let rows: Vec<VehicleRow> = convoy
        .vehicles
        .iter()
        .map(|v| VehicleRow {
            registration: v.registration_number.clone(),
            vehicle_type: v.vehicle_type.to_string(),
            load_kg: v.load_weight_kg,
            capacity_kg: v.capacity_kg,
            status: v.current_status.to_string(),
            driver: v.driver_name.clone(),
        })
        .collect();
    output::print_table(&rows, format);

    Ok(())
}
