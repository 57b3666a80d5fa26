//! Merge verdict types
//!
//! A verdict is the engine's only output. Business outcomes (not enough
//! capacity, destinations too far, detour too costly) are ordinary
//! `can_merge = false` verdicts with a reason string, never errors.

use serde::{Deserialize, Serialize};

/// Which convoy absorbs the other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeScenario {
    /// Convoy A detours to pick up convoy B's load
    #[serde(rename = "A_picks_B")]
    APicksB,
    /// Convoy B detours to pick up convoy A's load
    #[serde(rename = "B_picks_A")]
    BPicksA,
    /// No absorption direction selected
    #[serde(rename = "none")]
    None,
}

impl std::fmt::Display for MergeScenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergeScenario::APicksB => write!(f, "A_picks_B"),
            MergeScenario::BPicksA => write!(f, "B_picks_A"),
            MergeScenario::None => write!(f, "none"),
        }
    }
}

/// Outcome of one merge evaluation. Produced fresh per request, never stored.
///
/// Numeric fields are rounded to two decimals for presentation; the raw
/// values drive the decision before rounding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeVerdict {
    pub can_merge: bool,
    pub reason: String,
    pub scenario: MergeScenario,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_minutes: Option<f64>,
    pub dest_distance_km: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_savings_liters: Option<f64>,
    pub spare_capacity_a_kg: f64,
    pub spare_capacity_b_kg: f64,
    /// Unix timestamp of the evaluation
    pub evaluated_at: i64,
}

/// Round to two decimals for presentation
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl MergeVerdict {
    fn base(dest_distance_km: f64, spare_a_kg: f64, spare_b_kg: f64) -> Self {
        Self {
            can_merge: false,
            reason: String::new(),
            scenario: MergeScenario::None,
            extra_minutes: None,
            dest_distance_km: round2(dest_distance_km),
            fuel_savings_liters: None,
            spare_capacity_a_kg: round2(spare_a_kg),
            spare_capacity_b_kg: round2(spare_b_kg),
            evaluated_at: chrono::Utc::now().timestamp(),
        }
    }

    pub(crate) fn no_spare_capacity(
        dest_distance_km: f64,
        spare_a_kg: f64,
        spare_b_kg: f64,
        load_a_kg: f64,
        load_b_kg: f64,
    ) -> Self {
        let mut verdict = Self::base(dest_distance_km, spare_a_kg, spare_b_kg);
        verdict.reason = format!(
            "No convoy has enough spare capacity to absorb the other \
             (convoy A load {:.2} kg, convoy B load {:.2} kg)",
            load_a_kg, load_b_kg
        );
        verdict
    }

    pub(crate) fn destinations_too_far(
        dest_distance_km: f64,
        radius_km: f64,
        spare_a_kg: f64,
        spare_b_kg: f64,
    ) -> Self {
        let mut verdict = Self::base(dest_distance_km, spare_a_kg, spare_b_kg);
        verdict.reason = format!(
            "Destinations too far apart ({:.2} km) > threshold {:.1} km",
            dest_distance_km, radius_km
        );
        verdict
    }

    pub(crate) fn no_costable_detour(
        dest_distance_km: f64,
        spare_a_kg: f64,
        spare_b_kg: f64,
    ) -> Self {
        let mut verdict = Self::base(dest_distance_km, spare_a_kg, spare_b_kg);
        verdict.reason = "Could not calculate detour durations or no capacity".to_string();
        verdict
    }

    pub(crate) fn feasible(
        scenario: MergeScenario,
        extra_minutes: f64,
        dest_distance_km: f64,
        fuel_savings_liters: f64,
        spare_a_kg: f64,
        spare_b_kg: f64,
    ) -> Self {
        let mut verdict = Self::base(dest_distance_km, spare_a_kg, spare_b_kg);
        verdict.can_merge = true;
        verdict.reason = format!(
            "{} feasible with extra time {:.1} min",
            scenario, extra_minutes
        );
        verdict.scenario = scenario;
        verdict.extra_minutes = Some(round2(extra_minutes));
        verdict.fuel_savings_liters = Some(round2(fuel_savings_liters));
        verdict
    }

    pub(crate) fn over_threshold(
        scenario: MergeScenario,
        extra_minutes: f64,
        max_extra_minutes: f64,
        dest_distance_km: f64,
        spare_a_kg: f64,
        spare_b_kg: f64,
    ) -> Self {
        let mut verdict = Self::base(dest_distance_km, spare_a_kg, spare_b_kg);
        verdict.reason = format!(
            "Best scenario {} costs extra {:.1} min > allowed {:.1} min",
            scenario, extra_minutes, max_extra_minutes
        );
        verdict.extra_minutes = Some(round2(extra_minutes));
        verdict
    }

    pub(crate) fn fault(message: &str) -> Self {
        let mut verdict = Self::base(0.0, 0.0, 0.0);
        verdict.reason = format!("Error: {}", message);
        verdict
    }
}
