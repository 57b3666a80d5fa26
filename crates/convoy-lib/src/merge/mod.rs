//! Merge feasibility and detour evaluation
//!
//! Decides whether two already-planned convoys should be merged into one:
//! - capacity-constrained absorption analysis
//! - destination proximity gating on great-circle distance
//! - detour costing of both absorption directions via the routing oracle

mod engine;
mod verdict;

pub use engine::{
    MergeEngine, MergeOptions, DEFAULT_MAX_EXTRA_MINUTES, DEFAULT_SAME_DEST_RADIUS_KM,
    FUEL_SAVINGS_LITERS_PER_KM,
};
pub use verdict::{MergeScenario, MergeVerdict};
