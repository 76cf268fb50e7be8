//! Per-profile cost matrix construction, parallel fetch and overflow
//! validation (C3, §4.3, §5).

use crate::errors::{CoreError, CoreResult};
use crate::models::{Cost, Location, Matrix, Profile};
use crate::routing::{create_adapter, RouterKind, ServerConfig};
use hashbrown::{HashMap, HashSet};
use std::sync::Mutex;

/// Per-profile vehicle endpoints used by the overflow check (§4.3): the
/// matrix indices of vehicles whose `start`/`end` uses this profile.
#[derive(Default, Clone)]
pub struct ProfileEndpoints {
    pub starts: Vec<usize>,
    pub ends: Vec<usize>,
}

/// Everything the matrix build needs beyond the matrices themselves: the
/// known locations (in backend position order), the set of matrix indices
/// actually referenced, and the per-profile vehicle endpoints the overflow
/// check sums over.
pub struct MatrixBuildContext<'a> {
    pub profiles: &'a [Profile],
    pub locations: &'a [Location],
    pub explicit_indices: bool,
    pub max_matrices_used_index: usize,
    pub used_indices: &'a HashSet<usize>,
    pub job_indices: &'a [usize],
    pub endpoints_by_profile: &'a HashMap<Profile, ProfileEndpoints>,
    pub router: RouterKind,
    pub servers: &'a HashMap<String, ServerConfig>,
    pub nb_thread: usize,
}

/// Holds a matrix per profile, either user-supplied or fetched via a routing
/// adapter, and the cost bound derived from each during the overflow check.
#[derive(Default)]
pub struct MatrixManager {
    matrices: HashMap<Profile, Matrix>,
    cost_bounds: HashMap<Profile, Cost>,
}

impl MatrixManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user-supplied matrix for `profile`, skipping it during
    /// [`build`](Self::build).
    pub fn set_matrix(&mut self, profile: Profile, matrix: Matrix) {
        self.matrices.insert(profile, matrix);
    }

    pub fn has_matrix(&self, profile: &str) -> bool {
        self.matrices.contains_key(profile)
    }

    pub fn matrix(&self, profile: &str) -> Option<&Matrix> {
        self.matrices.get(profile)
    }

    pub fn cost_bound(&self, profile: &str) -> Option<Cost> {
        self.cost_bounds.get(profile).copied()
    }

    /// Builds every profile's matrix that was not already user-supplied,
    /// using at most `min(nb_thread, pending profiles)` worker threads, then
    /// validates and overflow-checks every profile (user-supplied or built).
    ///
    /// Workers are bucketed round-robin over `ctx.profiles`; the first
    /// exception raised by any worker is captured behind a mutex and
    /// rethrown here once every worker has joined — workers never abort the
    /// process and are always joined regardless of outcome (§5).
    pub fn build(&mut self, ctx: &MatrixBuildContext) -> CoreResult<()> {
        if !self.matrices.is_empty() && !ctx.explicit_indices {
            // A user-supplied matrix only makes sense when matrix indices are
            // meaningful across ingestions, i.e. in explicit-index mode.
            return Err(CoreError::input(
                "a custom matrix was supplied but the instance uses implicit location indices",
            ));
        }

        let pending: Vec<Profile> =
            ctx.profiles.iter().filter(|profile| !self.matrices.contains_key(profile.as_str())).cloned().collect();
        let fetched_profiles: HashSet<Profile> = pending.iter().cloned().collect();

        if !pending.is_empty() {
            let fetched = fetch_in_parallel(&pending, ctx)?;
            for (profile, matrix) in fetched {
                self.matrices.insert(profile, matrix);
            }
        }

        for profile in ctx.profiles {
            let matrix = self
                .matrices
                .remove(profile)
                .ok_or_else(|| CoreError::input(format!("no matrix available for profile '{}'", profile)))?;

            // Only a matrix freshly fetched from a routing backend is dense by
            // backend position and needs remapping (§4.3 step 2). A
            // caller-supplied matrix is already indexed by the caller's
            // explicit indices and must be left untouched.
            let matrix = if ctx.explicit_indices && fetched_profiles.contains(profile) {
                remap_to_explicit(&matrix, ctx.locations, ctx.max_matrices_used_index)
            } else {
                matrix
            };

            if matrix.dimension <= ctx.max_matrices_used_index {
                return Err(CoreError::input(format!(
                    "matrix for profile '{}' has dimension {} which does not exceed the maximum used index {}",
                    profile, matrix.dimension, ctx.max_matrices_used_index
                )));
            }

            let endpoints = ctx.endpoints_by_profile.get(profile).cloned().unwrap_or_default();
            let bound = check_cost_bound(&matrix, ctx.used_indices, &endpoints.starts, &endpoints.ends, ctx.job_indices)?;
            self.cost_bounds.insert(profile.clone(), bound);

            self.matrices.insert(profile.clone(), matrix);
        }

        Ok(())
    }
}

fn fetch_in_parallel(pending: &[Profile], ctx: &MatrixBuildContext) -> CoreResult<Vec<(Profile, Matrix)>> {
    // §4.3: K = min(nb_thread, |P|), where P ranges over every distinct
    // profile in the instance, not just the ones still pending a fetch.
    let requested = if ctx.nb_thread == 0 { num_cpus::get() } else { ctx.nb_thread };
    let worker_count = requested.max(1).min(ctx.profiles.len());
    let mut buckets: Vec<Vec<&Profile>> = (0..worker_count).map(|_| Vec::new()).collect();
    for (index, profile) in pending.iter().enumerate() {
        buckets[index % worker_count].push(profile);
    }

    let error_slot: Mutex<Option<CoreError>> = Mutex::new(None);
    let results: Mutex<Vec<(Profile, Matrix)>> = Mutex::new(Vec::new());

    std::thread::scope(|scope| {
        let handles: Vec<_> = buckets
            .into_iter()
            .map(|bucket| {
                let error_slot = &error_slot;
                let results = &results;
                scope.spawn(move || {
                    for profile in bucket {
                        if error_slot.lock().unwrap().is_some() {
                            break;
                        }
                        match fetch_one(profile, ctx.locations, ctx.router, ctx.servers) {
                            Ok(matrix) => results.lock().unwrap().push((profile.clone(), matrix)),
                            Err(err) => {
                                let mut slot = error_slot.lock().unwrap();
                                if slot.is_none() {
                                    *slot = Some(err);
                                }
                                break;
                            }
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            // Matrix-worker panics are not a modeled failure mode here; a
            // panicking worker still lets its siblings finish and join.
            let _ = handle.join();
        }
    });

    if let Some(err) = error_slot.into_inner().unwrap() {
        return Err(err);
    }

    Ok(results.into_inner().unwrap())
}

fn fetch_one(
    profile: &str,
    locations: &[Location],
    router: RouterKind,
    servers: &HashMap<String, ServerConfig>,
) -> CoreResult<Matrix> {
    log::debug!("fetching matrix for profile '{}' ({} locations)", profile, locations.len());
    let adapter = create_adapter(router, profile, servers)?;
    let matrix = adapter.get_matrix(locations)?;
    log::debug!("matrix for profile '{}' ready, dimension {}", profile, matrix.dimension);
    Ok(matrix)
}

/// Remaps a matrix indexed by backend position into one indexed by
/// user-supplied matrix index: entry `[i'][j']` for user indices `i', j'`
/// equals the backend's `[i][j]` for the locations that carry them; entries
/// for index pairs with no corresponding location are left at zero
/// (unreachable, per §4.3).
fn remap_to_explicit(dense: &Matrix, locations: &[Location], max_matrices_used_index: usize) -> Matrix {
    let dimension = max_matrices_used_index + 1;
    let mut remapped = Matrix::new(dimension);
    for (i, location_i) in locations.iter().enumerate() {
        let user_i = match location_i.index {
            Some(index) => index,
            None => continue,
        };
        for (j, location_j) in locations.iter().enumerate() {
            let user_j = match location_j.index {
                Some(index) => index,
                None => continue,
            };
            remapped.set(user_i, user_j, dense.get(i, j));
        }
    }
    remapped
}

/// Bounds the worst-case route cost the solver's numeric invariants rely on
/// (§4.3). Fails with [`CoreError::Internal`] rather than wrapping if any
/// intermediate sum would exceed [`Cost`]'s range.
pub fn check_cost_bound(
    matrix: &Matrix,
    used_indices: &HashSet<usize>,
    vehicle_starts: &[usize],
    vehicle_ends: &[usize],
    job_indices: &[usize],
) -> CoreResult<Cost> {
    let row_max = |i: usize| used_indices.iter().map(|&j| matrix.get(i, j)).max().unwrap_or(0);
    let col_max = |j: usize| used_indices.iter().map(|&i| matrix.get(i, j)).max().unwrap_or(0);

    let mut total: Cost = 0;
    for &start in vehicle_starts {
        total = checked_add(total, row_max(start))?;
    }

    let job_row_sum = job_indices.iter().try_fold(0u64, |acc, &j| checked_add(acc, row_max(j)))?;
    let job_col_sum = job_indices.iter().try_fold(0u64, |acc, &j| checked_add(acc, col_max(j)))?;
    total = checked_add(total, job_row_sum.max(job_col_sum))?;

    for &end in vehicle_ends {
        total = checked_add(total, col_max(end))?;
    }

    Ok(total)
}

fn checked_add(a: Cost, b: Cost) -> CoreResult<Cost> {
    a.checked_add(b).ok_or_else(|| CoreError::internal("cost bound computation overflowed the cost representation's range"))
}

#[cfg(test)]
#[path = "../tests/unit/matrix_manager_test.rs"]
mod matrix_manager_test;
