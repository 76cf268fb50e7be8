//! Problem dispatcher (C6, §4.6): selects CVRP vs VRPTW, hands the prepared
//! instance to the solver collaborator, and records phase timings.

use crate::errors::{CoreError, CoreResult};
use crate::instance::Instance;
use crate::models::StepKind;
use crate::routing::RoutingAdapter;
use crate::solution::Solution;
use std::collections::HashMap;
use std::time::Instant;

/// Which variant the dispatcher selects, based solely on `has_TW` (§4.6).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProblemVariant {
    Cvrp,
    Vrptw,
}

/// Selects CVRP or VRPTW for `instance`.
pub fn select_variant(instance: &Instance) -> ProblemVariant {
    if instance.has_tw() {
        ProblemVariant::Vrptw
    } else {
        ProblemVariant::Cvrp
    }
}

/// Tunable exploration parameters threaded straight through to the solver
/// collaborator; this crate does not interpret them.
#[derive(Clone, Debug, Default)]
pub struct HeuristicParams {
    pub exploration_level: u32,
    pub params: HashMap<String, String>,
}

/// The solver collaborator (§1, §6 — out of scope here): consumes a
/// read-only instance and the selected variant, returns a solution.
pub trait Solver {
    fn solve(&self, instance: &Instance, variant: ProblemVariant, heuristic_params: &HeuristicParams) -> CoreResult<Solution>;
}

/// A vehicle's pre-planned step, resolved from its `id` to a rank within the
/// instance's job sequence (`None` for a break).
#[derive(Clone, Debug)]
pub struct RankedStep {
    pub kind: StepKind,
    pub job_rank: Option<usize>,
}

/// The plan-validation collaborator (§1, §6 — out of scope here): resolves a
/// fixed route plan into ETAs and violations.
pub trait PlanValidator {
    fn validate(&self, instance: &Instance, ranked_steps: &[Vec<RankedStep>]) -> CoreResult<Solution>;
}

/// Orchestrates `solve`/`check` over a fully assembled [`Instance`] (C6). The
/// geometry precheck already ran during [`crate::instance::InstanceBuilder::build`];
/// everything else happens here.
pub struct Dispatcher<'a> {
    instance: &'a Instance,
}

impl<'a> Dispatcher<'a> {
    pub fn new(instance: &'a Instance) -> Self {
        Self { instance }
    }

    /// Selects CVRP/VRPTW, hands off to `solver`, and — if geometry was
    /// requested — enriches every returned route via the matching adapter in
    /// `routing_adapters`, accumulating total distance. Records
    /// loading/solving/routing timings in milliseconds; `loading_time_ms` is
    /// supplied by the caller since instance assembly happens before a
    /// `Dispatcher` exists.
    pub fn solve(
        &self,
        solver: &dyn Solver,
        heuristic_params: &HeuristicParams,
        routing_adapters: &[Box<dyn RoutingAdapter>],
        loading_time_ms: u64,
    ) -> CoreResult<Solution> {
        let variant = select_variant(self.instance);
        log::debug!("dispatching {:?} over {} jobs, {} vehicles", variant, self.instance.jobs().len(), self.instance.vehicles().len());

        let solving_started = Instant::now();
        let mut solution = solver.solve(self.instance, variant, heuristic_params)?;
        let solving_time_ms = solving_started.elapsed().as_millis() as u64;
        log::debug!("solving finished in {}ms, {} routes returned", solving_time_ms, solution.routes.len());

        let routing_started = Instant::now();
        let mut total_distance = 0u64;
        if self.instance.geometry_requested() {
            for route in &mut solution.routes {
                if let Some(adapter) = routing_adapters.iter().find(|adapter| adapter.profile() == route.profile) {
                    adapter.add_route_info(route)?;
                }
                total_distance += route.distance;
            }
        }
        let routing_time_ms = routing_started.elapsed().as_millis() as u64;

        solution.summary.total_distance = total_distance;
        solution.summary.loading_time_ms = loading_time_ms;
        solution.summary.solving_time_ms = solving_time_ms;
        solution.summary.routing_time_ms = routing_time_ms;

        Ok(solution)
    }

    /// Resolves every vehicle's pre-planned step list into ranks — refusing
    /// unknown or duplicate step ids — and hands off to `plan_validator`.
    /// Fails with [`CoreError::Input`] if no plan-validation collaborator is
    /// available (the implementation was built without its dependency).
    pub fn check(&self, plan_validator: Option<&dyn PlanValidator>, loading_time_ms: u64) -> CoreResult<Solution> {
        let plan_validator = plan_validator
            .ok_or_else(|| CoreError::input("plan-validation collaborator is not available in this build"))?;

        let ranked = self
            .instance
            .vehicles()
            .iter()
            .map(|vehicle| resolve_steps(self.instance, &vehicle.steps))
            .collect::<CoreResult<Vec<_>>>()?;

        let solving_started = Instant::now();
        let mut solution = plan_validator.validate(self.instance, &ranked)?;
        let solving_time_ms = solving_started.elapsed().as_millis() as u64;

        solution.summary.loading_time_ms = loading_time_ms;
        solution.summary.solving_time_ms = solving_time_ms;
        solution.summary.routing_time_ms = 0;

        Ok(solution)
    }
}

fn resolve_steps(instance: &Instance, steps: &[crate::models::VehicleStep]) -> CoreResult<Vec<RankedStep>> {
    let mut seen = hashbrown::HashSet::new();
    steps
        .iter()
        .map(|step| {
            if step.kind == StepKind::Break {
                return Ok(RankedStep { kind: step.kind, job_rank: None });
            }
            if !seen.insert(step.id.clone()) {
                return Err(CoreError::input(format!("duplicate step id '{}' in a vehicle's plan", step.id)));
            }
            let rank = instance
                .jobs()
                .iter()
                .position(|job| job.id == step.id)
                .ok_or_else(|| CoreError::input(format!("unknown step id '{}' in a vehicle's plan", step.id)))?;
            Ok(RankedStep { kind: step.kind, job_rank: Some(rank) })
        })
        .collect()
}

#[cfg(test)]
#[path = "../tests/unit/dispatcher_test.rs"]
mod dispatcher_test;
