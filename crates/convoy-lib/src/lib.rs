//! Convoy coordination library
//!
//! This crate provides the core functionality for:
//! - Merge feasibility and detour evaluation between convoy pairs
//! - Spare capacity and absorption analysis
//! - Great-circle geometry
//! - Routing oracle and geocoding clients
//! - In-memory convoy registry and transient token store

pub mod capacity;
pub mod geo;
pub mod geocode;
pub mod merge;
pub mod models;
pub mod registry;
pub mod routing;
pub mod tokens;

pub use merge::{MergeEngine, MergeOptions, MergeScenario, MergeVerdict};
pub use models::*;
pub use routing::{OsrmClient, RouteOracle, RouteSummary, RoutingError};
