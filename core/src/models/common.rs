//! Scalar and small value types shared across the data model.

use hashbrown::HashSet;

/// Opaque routing cost: seconds or meters, never interpreted by this crate.
pub type Cost = u64;

/// Seconds since a caller-chosen epoch.
pub type Timestamp = i64;

/// Position of a [`crate::models::Location`] within a cost matrix.
pub type MatrixIndex = usize;

/// A named routing configuration (travel mode / engine); each distinct value
/// requires its own cost matrix.
pub type Profile = String;

/// A fixed-length vector of non-negative integers modeling multi-dimensional
/// goods (capacity, pickup amount, delivery amount).
pub type Amount = Vec<u64>;

/// A tag set; a vehicle serves a job iff the job's skills are a subset of the
/// vehicle's.
pub type Skills = HashSet<String>;

/// A half-open interval `[start, end)` constraining when service may begin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl TimeWindow {
    /// Creates a new time window. Panics if `start > end`, mirroring the
    /// caller-data assumption the rest of the core makes about well-formed
    /// windows.
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        assert!(start <= end, "time window start must not exceed its end");
        Self { start, end }
    }

    /// Whether `other` overlaps this window.
    pub fn intersects(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether `timestamp` falls within `[start, end)`.
    pub fn contains(&self, timestamp: Timestamp) -> bool {
        self.start <= timestamp && timestamp < self.end
    }
}

impl Default for TimeWindow {
    /// An effectively unconstrained window, used as the default for jobs and
    /// vehicles that do not declare one. `has_TW` is false only while every
    /// ingested entity still carries this default.
    fn default() -> Self {
        Self { start: 0, end: Timestamp::MAX }
    }
}
