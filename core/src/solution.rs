//! Output schema handed back from the solver/plan-validation collaborators
//! (§6). The core only assembles and passes these through; it never
//! constructs a [`Solution`] itself except as an empty shell before handing
//! off to a collaborator.

use crate::models::{Amount, Cost, MatrixIndex, Profile};

/// One stop on a route: an ordered reference into the job/vehicle sequences,
/// resolved by the solver or the plan-validation collaborator.
#[derive(Clone, Debug)]
pub struct Step {
    pub job_id: Option<String>,
    pub location: MatrixIndex,
    pub arrival: i64,
    pub departure: i64,
}

/// A violation of a soft or hard constraint recorded against a step or route
/// by the plan-validation collaborator.
#[derive(Clone, Debug)]
pub struct Violation {
    pub job_id: Option<String>,
    pub code: String,
    pub description: String,
}

/// One vehicle's route in the returned solution.
#[derive(Clone, Debug)]
pub struct Route {
    pub vehicle_id: String,
    pub steps: Vec<Step>,
    pub cost: Cost,
    pub service: i64,
    pub duration: i64,
    pub waiting: i64,
    pub priority: i32,
    pub delivered: Amount,
    pub picked_up: Amount,
    pub profile: Profile,
    pub description: String,
    pub violations: Vec<Violation>,
    /// Populated by a routing adapter's `add_route_info` when geometry was
    /// requested; zero otherwise.
    pub distance: u64,
}

/// Aggregated totals across all routes plus the three phase timings C6
/// records.
#[derive(Clone, Debug, Default)]
pub struct Summary {
    pub total_cost: Cost,
    pub total_distance: u64,
    pub unassigned_job_ids: Vec<String>,
    pub loading_time_ms: u64,
    pub solving_time_ms: u64,
    pub routing_time_ms: u64,
}

/// What `solve`/`check` return: one route per used vehicle, plus aggregate
/// totals and timings.
#[derive(Clone, Debug, Default)]
pub struct Solution {
    pub routes: Vec<Route>,
    pub summary: Summary,
}
