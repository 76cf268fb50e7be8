//! Vehicle↔job and vehicle↔vehicle compatibility derivation (C5, §4.5).
//!
//! Both tables are computed once, over the fully-assembled instance, and are
//! read-only afterwards. The per-vehicle rows are independent of one
//! another, so they are computed with `rayon`'s data-parallel iterators
//! rather than the OS-thread worker pool C3 uses — there is no blocking I/O
//! here to justify the latter.

use crate::instance::Instance;
use crate::models::{Job, JobKind, TimeWindow, Vehicle};
use rayon::prelude::*;

/// The two read-only tables C5 produces.
pub struct Compatibility {
    /// `vj[v][j]`: whether vehicle `v` can ever serve job `j`.
    vj: Vec<Vec<bool>>,
    /// `vv[v1][v2]`: whether some job is compatible with both vehicles.
    vv: Vec<Vec<bool>>,
}

impl Compatibility {
    pub fn empty() -> Self {
        Self { vj: Vec::new(), vv: Vec::new() }
    }

    pub fn vehicle_ok_with_job(&self, v: usize, j: usize) -> bool {
        self.vj[v][j]
    }

    pub fn vehicle_ok_with_vehicle(&self, v1: usize, v2: usize) -> bool {
        self.vv[v1][v2]
    }
}

/// Builds both compatibility tables for `instance`.
pub fn build(instance: &Instance) -> Compatibility {
    let vj = build_vehicle_job(instance);
    let vv = build_vehicle_vehicle(&vj, instance.jobs().len());
    Compatibility { vj, vv }
}

fn build_vehicle_job(instance: &Instance) -> Vec<Vec<bool>> {
    let jobs = instance.jobs();
    let vehicles = instance.vehicles();

    (0..vehicles.len())
        .into_par_iter()
        .map(|v| vehicle_row(instance, &vehicles[v], jobs))
        .collect()
}

fn vehicle_row(instance: &Instance, vehicle: &Vehicle, jobs: &[Job]) -> Vec<bool> {
    let mut row = vec![true; jobs.len()];

    let mut j = 0;
    while j < jobs.len() {
        let job = &jobs[j];
        match job.kind {
            JobKind::Pickup => {
                let delivery = &jobs[j + 1];
                let bit = skills_ok(instance, job, vehicle)
                    && capacity_ok(job, vehicle)
                    && (!instance.has_tw() || shipment_tw_ok(instance, vehicle, job, delivery));
                row[j] = bit;
                row[j + 1] = bit;
                j += 2;
            }
            JobKind::Single => {
                row[j] = skills_ok(instance, job, vehicle)
                    && capacity_ok(job, vehicle)
                    && (!instance.has_tw() || single_tw_ok(vehicle, job));
                j += 1;
            }
            JobKind::Delivery => unreachable!("a Delivery job must immediately follow its Pickup (P1)"),
        }
    }

    row
}

fn skills_ok(instance: &Instance, job: &Job, vehicle: &Vehicle) -> bool {
    !instance.has_skills() || job.skills.is_subset(&vehicle.skills)
}

fn capacity_ok(job: &Job, vehicle: &Vehicle) -> bool {
    job.pickup.iter().zip(vehicle.capacity.iter()).all(|(demand, capacity)| demand <= capacity)
        && job.delivery.iter().zip(vehicle.capacity.iter()).all(|(demand, capacity)| demand <= capacity)
}

/// Feasible start times for `windows`, falling back to `fallback` (the
/// vehicle's own window) when the job declares none — an unconstrained job
/// can start whenever the vehicle is available.
fn effective_windows<'a>(windows: &'a [TimeWindow], fallback: &'a TimeWindow) -> &'a [TimeWindow] {
    if windows.is_empty() {
        std::slice::from_ref(fallback)
    } else {
        windows
    }
}

fn single_tw_ok(vehicle: &Vehicle, job: &Job) -> bool {
    effective_windows(&job.time_windows, &vehicle.time_window).iter().any(|window| {
        let earliest = window.start.max(vehicle.time_window.start);
        let latest = window.end.min(vehicle.time_window.end);
        earliest < latest && earliest + job.service_duration <= vehicle.time_window.end
    })
}

fn shipment_tw_ok(instance: &Instance, vehicle: &Vehicle, pickup: &Job, delivery: &Job) -> bool {
    let travel = pickup
        .location
        .index
        .zip(delivery.location.index)
        .and_then(|(from, to)| instance.matrix(&vehicle.profile).map(|matrix| matrix.get(from, to) as i64))
        .unwrap_or(0);

    let pickup_windows = effective_windows(&pickup.time_windows, &vehicle.time_window);
    let delivery_windows = effective_windows(&delivery.time_windows, &vehicle.time_window);

    pickup_windows.iter().any(|pickup_window| {
        let pickup_earliest = pickup_window.start.max(vehicle.time_window.start);
        let pickup_latest = pickup_window.end.min(vehicle.time_window.end);
        if pickup_earliest >= pickup_latest {
            return false;
        }
        let arrival_at_delivery = pickup_earliest + pickup.service_duration + travel;

        delivery_windows.iter().any(|delivery_window| {
            let delivery_earliest = delivery_window.start.max(arrival_at_delivery);
            let delivery_latest = delivery_window.end.min(vehicle.time_window.end);
            delivery_earliest < delivery_latest && delivery_earliest + delivery.service_duration <= vehicle.time_window.end
        })
    })
}

fn build_vehicle_vehicle(vj: &[Vec<bool>], job_count: usize) -> Vec<Vec<bool>> {
    let vehicle_count = vj.len();
    (0..vehicle_count)
        .into_par_iter()
        .map(|v1| {
            (0..vehicle_count)
                .map(|v2| {
                    v1 == v2 || (0..job_count).any(|j| vj[v1][j] && vj[v2][j])
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
#[path = "../tests/unit/compatibility_test.rs"]
mod compatibility_test;
