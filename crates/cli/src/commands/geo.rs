//! Distance and geocoding commands

use anyhow::Result;
use colored::Colorize;
use convoy_lib::geo::distance_km;
use convoy_lib::geocode::GeocodeClient;
use convoy_lib::models::Coordinate;

use crate::output::{self, OutputFormat};

pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64, format: OutputFormat) -> Result<()> {
    let km = distance_km(Coordinate::new(lat1, lon1), Coordinate::new(lat2, lon2));

    match format {
        OutputFormat::Json => output::print_json(&serde_json::json!({ "distance_km": km })),
        OutputFormat::Table => println!("{:.2} km", km),
    }
    Ok(())
}

pub async fn geocode(address: &str, geocode_url: &str, format: OutputFormat) -> Result<()> {
    let client = GeocodeClient::new(geocode_url)?;

    match client.geocode(address).await? {
        Some(place) => match format {
            OutputFormat::Json => output::print_json(&serde_json::json!({
                "address": address,
                "lat": place.coordinate.lat,
                "lon": place.coordinate.lon,
                "display_name": place.display_name,
            })),
            OutputFormat::Table => {
                output::print_success(&format!(
                    "{} -> ({:.6}, {:.6})",
                    address, place.coordinate.lat, place.coordinate.lon
                ));
                if let Some(display_name) = place.display_name {
                    println!("  {}", display_name.dimmed());
                }
            }
        },
        None => output::print_warning(&format!("No coordinates found for '{}'", address)),
    }
    Ok(())
}

pub async fn reverse_geocode(
    lat: f64,
    lon: f64,
    geocode_url: &str,
    format: OutputFormat,
) -> Result<()> {
    let client = GeocodeClient::new(geocode_url)?;

    match client.reverse(lat, lon).await? {
        Some(address) => match format {
            OutputFormat::Json => output::print_json(&serde_json::json!({
                "lat": lat,
                "lon": lon,
                "address": address.formatted,
                "details": {
                    "road": address.road,
                    "city": address.city,
                    "state": address.state,
                    "country": address.country,
                    "postcode": address.postcode,
                },
            })),
            OutputFormat::Table => {
                output::print_success(&format!(
                    "({:.6}, {:.6}) -> {}",
                    lat,
                    lon,
                    address.formatted.as_deref().unwrap_or("(unnamed)")
                ));
                for (label, value) in [
                    ("road", &address.road),
                    ("city", &address.city),
                    ("state", &address.state),
                    ("country", &address.country),
                    ("postcode", &address.postcode),
                ] {
                    if let Some(value) = value {
                        println!("  {:<10} {}", format!("{}:", label).dimmed(), value);
                    }
                }
            }
        },
        None => output::print_warning(&format!("No address found for ({}, {})", lat, lon)),
    }
    Ok(())
}
