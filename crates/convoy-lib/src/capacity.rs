//! Spare capacity and absorption analysis
//!
//! Pure computations over convoy snapshots; no side effects.

use crate::models::Convoy;

/// Sum of all vehicle payload capacities in kilograms
pub fn total_capacity_kg(convoy: &Convoy) -> f64 {
    convoy.vehicles.iter().map(|v| v.capacity_kg).sum()
}

/// Spare capacity in kilograms: total capacity minus current load.
///
/// Negative when the convoy is already overloaded.
pub fn spare_capacity_kg(convoy: &Convoy) -> f64 {
    total_capacity_kg(convoy) - convoy.total_load_kg
}

/// Whether `host` can take on the whole of `guest`'s load
pub fn can_absorb(host: &Convoy, guest: &Convoy) -> bool {
    spare_capacity_kg(host) >= guest.total_load_kg
}
