//! Core data models for convoy coordination

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A WGS84 coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Returns true if the pair lies within valid WGS84 ranges.
    /// NaN fails the range check.
    pub fn in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Convoy movement priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

/// Vehicle classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    Truck,
    Tanker,
    Trailer,
    Jeep,
    Ambulance,
    Recovery,
}

impl std::fmt::Display for VehicleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VehicleType::Truck => write!(f, "truck"),
            VehicleType::Tanker => write!(f, "tanker"),
            VehicleType::Trailer => write!(f, "trailer"),
            VehicleType::Jeep => write!(f, "jeep"),
            VehicleType::Ambulance => write!(f, "ambulance"),
            VehicleType::Recovery => write!(f, "recovery"),
        }
    }
}

/// Cargo classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadType {
    Ammunition,
    Fuel,
    Rations,
    Medical,
    Equipment,
    Personnel,
}

/// Operational status of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Active,
    Standby,
    Maintenance,
    Breakdown,
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VehicleStatus::Active => write!(f, "active"),
            VehicleStatus::Standby => write!(f, "standby"),
            VehicleStatus::Maintenance => write!(f, "maintenance"),
            VehicleStatus::Breakdown => write!(f, "breakdown"),
        }
    }
}

/// A single vehicle within a convoy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: u64,
    pub vehicle_type: VehicleType,
    /// Unique within the owning convoy
    pub registration_number: String,
    pub load_type: LoadType,
    /// Current cargo weight in kilograms
    pub load_weight_kg: f64,
    /// Maximum payload in kilograms
    pub capacity_kg: f64,
    pub driver_name: String,
    pub current_status: VehicleStatus,
}

/// An immutable convoy snapshot as handed to the core by the persistence
/// collaborator. The core never mutates or stores these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Convoy {
    pub id: u64,
    pub name: String,
    pub source: Coordinate,
    pub destination: Coordinate,
    pub priority: Priority,
    pub vehicles: Vec<Vehicle>,
    /// Sum of vehicle loads, fixed at snapshot construction
    pub total_load_kg: f64,
}

impl Convoy {
    /// Build a snapshot with `total_load_kg` derived from the vehicle list
    pub fn new(
        id: u64,
        name: impl Into<String>,
        source: Coordinate,
        destination: Coordinate,
        priority: Priority,
        vehicles: Vec<Vehicle>,
    ) -> Self {
        let total_load_kg = vehicles.iter().map(|v| v.load_weight_kg).sum();
        Self {
            id,
            name: name.into(),
            source,
            destination,
            priority,
            vehicles,
            total_load_kg,
        }
    }

    /// Caller-side snapshot validation.
    ///
    /// The merge engine assumes well-formed inputs and does not re-validate;
    /// callers must reject bad snapshots before invoking it.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if !self.source.in_range() {
            return Err(SnapshotError::CoordinateOutOfRange {
                which: "source",
                lat: self.source.lat,
                lon: self.source.lon,
            });
        }
        if !self.destination.in_range() {
            return Err(SnapshotError::CoordinateOutOfRange {
                which: "destination",
                lat: self.destination.lat,
                lon: self.destination.lon,
            });
        }

        let mut seen = std::collections::HashSet::new();
        for vehicle in &self.vehicles {
            if vehicle.load_weight_kg < 0.0 || vehicle.load_weight_kg.is_nan() {
                return Err(SnapshotError::NegativeLoad {
                    registration: vehicle.registration_number.clone(),
                });
            }
            if vehicle.capacity_kg < 0.0 || vehicle.capacity_kg.is_nan() {
                return Err(SnapshotError::NegativeCapacity {
                    registration: vehicle.registration_number.clone(),
                });
            }
            if !seen.insert(vehicle.registration_number.as_str()) {
                return Err(SnapshotError::DuplicateRegistration {
                    registration: vehicle.registration_number.clone(),
                });
            }
        }

        let computed: f64 = self.vehicles.iter().map(|v| v.load_weight_kg).sum();
        if (computed - self.total_load_kg).abs() > 0.01 {
            return Err(SnapshotError::LoadMismatch {
                declared: self.total_load_kg,
                computed,
            });
        }

        Ok(())
    }
}

/// Rejection reasons for malformed convoy snapshots
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("{which} coordinate ({lat}, {lon}) is outside valid WGS84 ranges")]
    CoordinateOutOfRange {
        which: &'static str,
        lat: f64,
        lon: f64,
    },

    #[error("vehicle {registration} has a negative load weight")]
    NegativeLoad { registration: String },

    #[error("vehicle {registration} has a negative capacity")]
    NegativeCapacity { registration: String },

    #[error("registration {registration} appears more than once in the convoy")]
    DuplicateRegistration { registration: String },

    #[error("declared total load {declared} kg does not match vehicle sum {computed} kg")]
    LoadMismatch { declared: f64, computed: f64 },
}
