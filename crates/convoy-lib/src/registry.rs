//! In-memory convoy registry
//!
//! The narrow CRUD collaborator the engine's callers go through. Snapshots
//! handed out are clones; nothing the engine holds can observe later
//! mutation. A real deployment swaps this for a persistence service with
//! the same surface.

use dashmap::DashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

use crate::models::{Convoy, Coordinate, Priority, Vehicle};

/// Registry failure modes
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("convoy {0} not found")]
    ConvoyNotFound(u64),

    #[error("registration {registration} already exists in convoy {convoy_id}")]
    DuplicateRegistration { convoy_id: u64, registration: String },
}

/// Listing row for a stored convoy
#[derive(Debug, Clone, Serialize)]
pub struct ConvoySummary {
    pub id: u64,
    pub name: String,
    pub priority: Priority,
    pub vehicle_count: usize,
    pub source: Coordinate,
    pub destination: Coordinate,
    pub created_at: i64,
}

#[derive(Debug, Clone)]
struct StoredConvoy {
    convoy: Convoy,
    created_at: i64,
}

/// Concurrent in-memory convoy store
#[derive(Debug, Default)]
pub struct ConvoyRegistry {
    convoys: DashMap<u64, StoredConvoy>,
    next_convoy_id: AtomicU64,
    next_vehicle_id: AtomicU64,
}

impl ConvoyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a convoy, assigning it a fresh identifier and deriving
    /// `total_load_kg` from its vehicles. Returns the assigned id.
    pub fn create(&self, mut convoy: Convoy) -> u64 {
        let id = self.next_convoy_id.fetch_add(1, Ordering::Relaxed) + 1;
        convoy.id = id;
        convoy.total_load_kg = convoy.vehicles.iter().map(|v| v.load_weight_kg).sum();
        for vehicle in &mut convoy.vehicles {
            vehicle.id = self.next_vehicle_id.fetch_add(1, Ordering::Relaxed) + 1;
        }

        self.convoys.insert(
            id,
            StoredConvoy {
                convoy,
                created_at: chrono::Utc::now().timestamp(),
            },
        );
        id
    }

    /// Snapshot of a stored convoy
    pub fn get(&self, id: u64) -> Option<Convoy> {
        self.convoys.get(&id).map(|entry| entry.convoy.clone())
    }

    /// All stored convoys, newest first
    pub fn list(&self) -> Vec<ConvoySummary> {
        let mut rows: Vec<ConvoySummary> = self
            .convoys
            .iter()
            .map(|entry| ConvoySummary {
                id: entry.convoy.id,
                name: entry.convoy.name.clone(),
                priority: entry.convoy.priority,
                vehicle_count: entry.convoy.vehicles.len(),
                source: entry.convoy.source,
                destination: entry.convoy.destination,
                created_at: entry.created_at,
            })
            .collect();
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        rows
    }

    /// Remove a convoy, returning its final snapshot
    pub fn remove(&self, id: u64) -> Option<Convoy> {
        self.convoys.remove(&id).map(|(_, stored)| stored.convoy)
    }

    /// Add a vehicle to an existing convoy. Rejects a registration number
    /// already present in that convoy; recomputes the convoy's total load.
    pub fn add_vehicle(&self, convoy_id: u64, mut vehicle: Vehicle) -> Result<u64, RegistryError> {
        let mut entry = self
            .convoys
            .get_mut(&convoy_id)
            .ok_or(RegistryError::ConvoyNotFound(convoy_id))?;

        let duplicate = entry
            .convoy
            .vehicles
            .iter()
            .any(|v| v.registration_number == vehicle.registration_number);
        if duplicate {
            return Err(RegistryError::DuplicateRegistration {
                convoy_id,
                registration: vehicle.registration_number,
            });
        }

        let vehicle_id = self.next_vehicle_id.fetch_add(1, Ordering::Relaxed) + 1;
        vehicle.id = vehicle_id;
        entry.convoy.total_load_kg += vehicle.load_weight_kg;
        entry.convoy.vehicles.push(vehicle);
        Ok(vehicle_id)
    }

    pub fn len(&self) -> usize {
        self.convoys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.convoys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LoadType, VehicleStatus, VehicleType};

    fn vehicle(registration: &str, load: f64, capacity: f64) -> Vehicle {
        Vehicle {
            id: 0,
            vehicle_type: VehicleType::Truck,
            registration_number: registration.to_string(),
            load_type: LoadType::Rations,
            load_weight_kg: load,
            capacity_kg: capacity,
            driver_name: "Driver".to_string(),
            current_status: VehicleStatus::Active,
        }
    }

    fn convoy(name: &str, vehicles: Vec<Vehicle>) -> Convoy {
        Convoy::new(
            0,
            name,
            Coordinate::new(28.61, 77.21),
            Coordinate::new(19.07, 72.88),
            Priority::Medium,
            vehicles,
        )
    }

    #[test]
    fn test_create_assigns_ids_and_derives_load() {
        let registry = ConvoyRegistry::new();
        let id = registry.create(convoy(
            "Alpha",
            vec![vehicle("MH-01", 500.0, 3000.0), vehicle("MH-02", 250.0, 2000.0)],
        ));

        let stored = registry.get(id).unwrap();
        assert_eq!(stored.id, id);
        assert!((stored.total_load_kg - 750.0).abs() < f64::EPSILON);
        assert!(stored.vehicles.iter().all(|v| v.id > 0));
    }

    #[test]
    fn test_add_vehicle_rejects_duplicate_registration() {
        let registry = ConvoyRegistry::new();
        let id = registry.create(convoy("Alpha", vec![vehicle("MH-01", 500.0, 3000.0)]));

        let err = registry
            .add_vehicle(id, vehicle("MH-01", 100.0, 1000.0))
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateRegistration { .. }));

        // The rejected vehicle must not have changed the stored convoy
        let stored = registry.get(id).unwrap();
        assert_eq!(stored.vehicles.len(), 1);
        assert!((stored.total_load_kg - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_add_vehicle_recomputes_total_load() {
        let registry = ConvoyRegistry::new();
        let id = registry.create(convoy("Alpha", vec![vehicle("MH-01", 500.0, 3000.0)]));

        registry
            .add_vehicle(id, vehicle("MH-02", 300.0, 2000.0))
            .unwrap();

        let stored = registry.get(id).unwrap();
        assert_eq!(stored.vehicles.len(), 2);
        assert!((stored.total_load_kg - 800.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_add_vehicle_unknown_convoy() {
        let registry = ConvoyRegistry::new();
        assert!(matches!(
            registry.add_vehicle(42, vehicle("MH-01", 0.0, 100.0)),
            Err(RegistryError::ConvoyNotFound(42))
        ));
    }

    #[test]
    fn test_remove_returns_snapshot() {
        let registry = ConvoyRegistry::new();
        let id = registry.create(convoy("Alpha", vec![]));
        assert_eq!(registry.remove(id).unwrap().name, "Alpha");
        assert!(registry.get(id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_list_newest_first() {
        let registry = ConvoyRegistry::new();
        let first = registry.create(convoy("Alpha", vec![]));
        let second = registry.create(convoy("Bravo", vec![]));

        let rows = registry.list();
        assert_eq!(rows.len(), 2);
        // Same-second creations fall back to id ordering, newest first
        assert_eq!(rows[0].id, second);
        assert_eq!(rows[1].id, first);
    }

    #[test]
    fn test_snapshots_are_isolated_from_later_mutation() {
        let registry = ConvoyRegistry::new();
        let id = registry.create(convoy("Alpha", vec![vehicle("MH-01", 500.0, 3000.0)]));

        let snapshot = registry.get(id).unwrap();
        registry
            .add_vehicle(id, vehicle("MH-02", 300.0, 2000.0))
            .unwrap();

        assert_eq!(snapshot.vehicles.len(), 1);
        assert_eq!(registry.get(id).unwrap().vehicles.len(), 2);
    }
}
