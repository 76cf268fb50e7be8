//! Vehicles and their pre-planned step lists (§3).

use super::common::{Amount, Profile, Skills, TimeWindow};
use super::location::Location;

/// What a pre-planned [`VehicleStep`] refers to; consulted only by the
/// plan-validation collaborator (`check`, C6), never by the solver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepKind {
    Job,
    Pickup,
    Delivery,
    Break,
}

/// One entry of a vehicle's pre-planned step list, referencing a job (or
/// shipment half, or break) by id.
#[derive(Clone, Debug)]
pub struct VehicleStep {
    pub id: String,
    pub kind: StepKind,
}

/// A vehicle available to serve jobs.
#[derive(Clone, Debug)]
pub struct Vehicle {
    pub id: String,
    pub start: Option<Location>,
    pub end: Option<Location>,
    pub capacity: Amount,
    pub skills: Skills,
    pub time_window: TimeWindow,
    pub profile: Profile,
    pub steps: Vec<VehicleStep>,
}

impl Vehicle {
    /// A vehicle with no start/end, default (unconstrained) time window, no
    /// skills and no pre-planned steps — the caller fills in what applies.
    pub fn new(id: impl Into<String>, profile: impl Into<Profile>, amount_size: usize) -> Self {
        Self {
            id: id.into(),
            start: None,
            end: None,
            capacity: vec![0; amount_size],
            skills: Skills::default(),
            time_window: TimeWindow::default(),
            profile: profile.into(),
            steps: Vec::new(),
        }
    }
}
