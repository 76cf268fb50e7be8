//! Jobs and shipments (§3).

use super::common::{Amount, Skills, TimeWindow, Timestamp};
use super::location::Location;

/// Distinguishes a standalone job from one half of a shipment pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobKind {
    Single,
    Pickup,
    Delivery,
}

/// A unit of work a vehicle can be routed to. Pickup and delivery amount
/// vectors must have length `amount_size`, the instance-wide dimensionality
/// (enforced by [`crate::instance::InstanceBuilder`], not here).
#[derive(Clone, Debug)]
pub struct Job {
    pub id: String,
    pub kind: JobKind,
    pub location: Location,
    pub pickup: Amount,
    pub delivery: Amount,
    pub skills: Skills,
    pub priority: i32,
    pub time_windows: Vec<TimeWindow>,
    pub service_duration: Timestamp,
}

impl Job {
    /// A single (non-shipment) job with no pickup/delivery amount, skills or
    /// time windows — the caller is expected to fill in what applies.
    pub fn new(id: impl Into<String>, kind: JobKind, location: Location, amount_size: usize) -> Self {
        Self {
            id: id.into(),
            kind,
            location,
            pickup: vec![0; amount_size],
            delivery: vec![0; amount_size],
            skills: Skills::default(),
            priority: 0,
            time_windows: Vec::new(),
            service_duration: 0,
        }
    }
}

/// A (Pickup-job, Delivery-job) pair that must be served by the same vehicle,
/// pickup before delivery.
///
/// Once ingested via [`crate::instance::InstanceBuilder::add_shipment`], the
/// pickup and delivery are stored at consecutive positions in the instance's
/// job sequence — downstream components locate the partner via that
/// adjacency rather than a side table.
#[derive(Clone, Debug)]
pub struct Shipment {
    pub pickup: Job,
    pub delivery: Job,
}

impl Shipment {
    /// Validates the cross-job invariants a shipment must satisfy: matching
    /// priority, matching skills, correct kinds, and the pickup's *pickup*
    /// amount equalling the delivery's *delivery* amount. Returns a
    /// human-readable reason on violation; callers convert it into a
    /// [`crate::errors::CoreError::Input`].
    pub fn validate(&self) -> Result<(), String> {
        if self.pickup.kind != JobKind::Pickup {
            return Err(format!("shipment '{}' pickup half must have kind Pickup", self.pickup.id));
        }
        if self.delivery.kind != JobKind::Delivery {
            return Err(format!("shipment '{}' delivery half must have kind Delivery", self.delivery.id));
        }
        if self.pickup.priority != self.delivery.priority {
            return Err(format!("shipment ({}, {}) has mismatched priorities", self.pickup.id, self.delivery.id));
        }
        if self.pickup.skills != self.delivery.skills {
            return Err(format!("shipment ({}, {}) has mismatched skill sets", self.pickup.id, self.delivery.id));
        }
        if self.pickup.pickup != self.delivery.delivery {
            return Err(format!(
                "shipment ({}, {}) pickup amount does not match delivery amount",
                self.pickup.id, self.delivery.id
            ));
        }
        Ok(())
    }
}
