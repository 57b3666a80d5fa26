//! Merge decision engine
//!
//! Orchestrates capacity analysis, destination proximity, and oracle-costed
//! detours into a single verdict. Stateless between calls: the verdict is a
//! function of the two snapshots and the oracle's live answers, so repeated
//! evaluations may legitimately differ as traffic data changes.

use tracing::{debug, warn};

use super::verdict::{MergeScenario, MergeVerdict};
use crate::capacity;
use crate::geo;
use crate::models::Convoy;
use crate::routing::RouteOracle;

/// Default ceiling on acceptable detour cost
pub const DEFAULT_MAX_EXTRA_MINUTES: f64 = 30.0;

/// Default radius within which two destinations count as "the same place"
pub const DEFAULT_SAME_DEST_RADIUS_KM: f64 = 5.0;

/// Fuel savings proxy applied to the destination distance.
///
/// Inherited calibration; override via [`MergeOptions`] rather than editing.
pub const FUEL_SAVINGS_LITERS_PER_KM: f64 = 0.3;

/// Caller-tunable evaluation thresholds
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Maximum acceptable extra travel time for the detour, in minutes
    pub max_extra_minutes: f64,
    /// Destinations further apart than this are never merged, in kilometers
    pub same_dest_radius_km: f64,
    /// Liters of fuel saved per kilometer of shared destination distance
    pub fuel_savings_per_km: f64,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            max_extra_minutes: DEFAULT_MAX_EXTRA_MINUTES,
            same_dest_radius_km: DEFAULT_SAME_DEST_RADIUS_KM,
            fuel_savings_per_km: FUEL_SAVINGS_LITERS_PER_KM,
        }
    }
}

/// Evaluates whether two convoys should merge
pub struct MergeEngine<O> {
    oracle: O,
}

impl<O: RouteOracle> MergeEngine<O> {
    pub fn new(oracle: O) -> Self {
        Self { oracle }
    }

    /// The travel-time source this engine queries
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Evaluate a merge of `a` and `b` under the given options.
    ///
    /// Always returns a verdict: business outcomes are `can_merge = false`
    /// with a reason, and any unexpected internal fault is surfaced the same
    /// way, carrying the fault message as the reason.
    pub async fn evaluate(&self, a: &Convoy, b: &Convoy, options: &MergeOptions) -> MergeVerdict {
        match self.try_evaluate(a, b, options).await {
            Ok(verdict) => verdict,
            Err(err) => {
                warn!(error = %err, "Merge evaluation fault");
                MergeVerdict::fault(&err.to_string())
            }
        }
    }

    async fn try_evaluate(
        &self,
        a: &Convoy,
        b: &Convoy,
        options: &MergeOptions,
    ) -> anyhow::Result<MergeVerdict> {
        let spare_a = capacity::spare_capacity_kg(a);
        let spare_b = capacity::spare_capacity_kg(b);
        let a_can_absorb_b = capacity::can_absorb(a, b);
        let b_can_absorb_a = capacity::can_absorb(b, a);

        // Pure geometry, so it is computed up front and reported on every
        // verdict; neither gate's outcome depends on evaluation order.
        let dest_distance_km = geo::distance_km(a.destination, b.destination);

        if !a_can_absorb_b && !b_can_absorb_a {
            debug!(
                convoy_a = %a.name,
                convoy_b = %b.name,
                spare_a_kg = spare_a,
                spare_b_kg = spare_b,
                "Capacity gate: neither convoy can absorb the other"
            );
            return Ok(MergeVerdict::no_spare_capacity(
                dest_distance_km,
                spare_a,
                spare_b,
                a.total_load_kg,
                b.total_load_kg,
            ));
        }

        if dest_distance_km > options.same_dest_radius_km {
            debug!(
                convoy_a = %a.name,
                convoy_b = %b.name,
                dest_distance_km,
                radius_km = options.same_dest_radius_km,
                "Distance gate: destinations too far apart"
            );
            return Ok(MergeVerdict::destinations_too_far(
                dest_distance_km,
                options.same_dest_radius_km,
                spare_a,
                spare_b,
            ));
        }

        // Both directions' direct and pickup legs are independent; run them
        // concurrently. An infeasible direction issues no requests at all.
        let (extra_a, extra_b) = tokio::join!(
            self.detour_minutes(a_can_absorb_b, a, b),
            self.detour_minutes(b_can_absorb_a, b, a),
        );

        // Fixed candidate order: A_picks_B is evaluated first and wins ties.
        let mut candidates = Vec::new();
        if let Some(extra) = extra_a {
            candidates.push((MergeScenario::APicksB, extra));
        }
        if let Some(extra) = extra_b {
            candidates.push((MergeScenario::BPicksA, extra));
        }

        let (scenario, extra_minutes) = match select_best(&candidates) {
            Some(best) => best,
            None => {
                return Ok(MergeVerdict::no_costable_detour(
                    dest_distance_km,
                    spare_a,
                    spare_b,
                ))
            }
        };

        if extra_minutes <= options.max_extra_minutes {
            let fuel_savings = dest_distance_km * options.fuel_savings_per_km;
            Ok(MergeVerdict::feasible(
                scenario,
                extra_minutes,
                dest_distance_km,
                fuel_savings,
                spare_a,
                spare_b,
            ))
        } else {
            Ok(MergeVerdict::over_threshold(
                scenario,
                extra_minutes,
                options.max_extra_minutes,
                dest_distance_km,
                spare_a,
                spare_b,
            ))
        }
    }

    /// Cost one absorption direction: host detours via guest's source.
    ///
    /// Returns None when the direction is capacity-infeasible or either
    /// oracle query fails. An unknown cost excludes the candidate, it is
    /// never treated as zero.
    async fn detour_minutes(&self, feasible: bool, host: &Convoy, guest: &Convoy) -> Option<f64> {
        if !feasible {
            return None;
        }

        let direct_waypoints = [host.source, host.destination];
        let pickup_waypoints = [host.source, guest.source, host.destination];

        let (direct, pickup) = tokio::join!(
            self.oracle.route(&direct_waypoints),
            self.oracle.route(&pickup_waypoints),
        );

        match (direct, pickup) {
            (Ok(direct), Ok(pickup)) => {
                Some((pickup.duration_secs - direct.duration_secs) / 60.0)
            }
            (Err(err), _) | (_, Err(err)) => {
                warn!(
                    host = %host.name,
                    guest = %guest.name,
                    error = %err,
                    "Detour cost unavailable, excluding direction"
                );
                None
            }
        }
    }
}

/// Stable minimum over the ordered candidate list: strict less-than keeps
/// the earlier candidate on an exact tie.
fn select_best(candidates: &[(MergeScenario, f64)]) -> Option<(MergeScenario, f64)> {
    candidates
        .iter()
        .copied()
        .reduce(|best, candidate| if candidate.1 < best.1 { candidate } else { best })
}
