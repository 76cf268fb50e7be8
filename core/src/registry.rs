//! Location deduplication and matrix-index assignment (C1, §4.1).

use crate::models::Location;
use hashbrown::{HashMap, HashSet};

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct CoordKey(u64, u64);

impl From<(f64, f64)> for CoordKey {
    fn from((lon, lat): (f64, f64)) -> Self {
        CoordKey(lon.to_bits(), lat.to_bits())
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Regime {
    Implicit,
    Explicit,
}

/// Deduplicates locations and assigns (or reconciles) their matrix indices.
///
/// The regime — implicit indices assigned by ingestion order, or explicit
/// indices the caller supplies — is fixed by the first call to [`intern`].
/// Mixing the two within one instance is rejected by
/// [`crate::instance::InstanceBuilder`] before it ever reaches the registry.
///
/// [`intern`]: LocationRegistry::intern
#[derive(Default)]
pub struct LocationRegistry {
    locations: Vec<Location>,
    index_of_coord: HashMap<CoordKey, usize>,
    seen_explicit: HashSet<usize>,
    regime: Option<Regime>,
}

impl LocationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `location`, stamping it with its resolved matrix index and
    /// returning that index.
    ///
    /// - Implicit regime: looks the location up by coordinate; on a hit,
    ///   stamps the stored index onto `location`; on a miss, appends it and
    ///   assigns it the next dense index.
    /// - Explicit regime: records the location (deduplicated by its own
    ///   index) so the matrix manager can compute a matrix over the known
    ///   locations, but never overwrites the caller-supplied index.
    pub fn intern(&mut self, location: &mut Location) -> usize {
        match location.index {
            Some(explicit) => {
                self.regime.get_or_insert(Regime::Explicit);
                if self.seen_explicit.insert(explicit) {
                    self.locations.push(location.clone());
                }
                explicit
            }
            None => {
                self.regime.get_or_insert(Regime::Implicit);
                let coordinate =
                    location.coordinate.expect("a location without an explicit index must carry coordinates");
                let key = CoordKey::from(coordinate);
                let index = *self.index_of_coord.entry(key).or_insert_with(|| {
                    let index = self.locations.len();
                    self.locations.push(Location { coordinate: Some(coordinate), index: Some(index) });
                    index
                });
                location.index = Some(index);
                index
            }
        }
    }

    /// Whether the instance is in explicit-index mode (`false` before the
    /// first ingestion, and for the lifetime of an implicit-mode instance).
    pub fn is_explicit(&self) -> bool {
        matches!(self.regime, Some(Regime::Explicit))
    }

    /// All known locations, in the order they were first interned — this is
    /// also the order the routing backend receives them in, and thus the
    /// position space of the dense matrix it returns.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }
}

#[cfg(test)]
#[path = "../tests/unit/registry_test.rs"]
mod registry_test;
