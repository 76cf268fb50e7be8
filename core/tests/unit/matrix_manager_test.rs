use super::*;
use crate::models::Location;
use crate::routing::RouterKind;
use proptest::prelude::*;

fn locations(n: usize) -> Vec<Location> {
    (0..n).map(|i| Location::from_index_and_coordinate(i, i as f64, i as f64)).collect()
}

#[test]
fn checked_cost_bound_sums_row_and_col_maxima() {
    let mut matrix = Matrix::new(3);
    // start(0) -> *, jobs {1}, end(2) -> *
    matrix.set(0, 1, 5);
    matrix.set(1, 2, 7);
    matrix.set(2, 1, 3);

    let used: HashSet<usize> = [0usize, 1, 2].into_iter().collect();
    let bound = check_cost_bound(&matrix, &used, &[0], &[2], &[1]).unwrap();

    // row_max(0) = 5; job row/col sums over {1}: row_max(1)=7, col_max(1)=5(from 0->1) vs 3(from 2->1) => max 5
    // so job_sum = max(7, 5) = 7; col_max(2) = 7 (from 1->2)
    assert_eq!(bound, 5 + 7 + 7);
}

#[test]
fn checked_cost_bound_fails_on_overflow_instead_of_wrapping() {
    let mut matrix = Matrix::new(2);
    matrix.set(0, 1, u64::MAX);
    matrix.set(1, 0, u64::MAX);

    let used: HashSet<usize> = [0usize, 1].into_iter().collect();
    let result = check_cost_bound(&matrix, &used, &[0, 0], &[], &[1]);

    assert!(matches!(result, Err(CoreError::Internal(_))));
}

#[test]
fn build_rejects_matrix_smaller_than_max_used_index() {
    let mut manager = MatrixManager::new();
    manager.set_matrix("car".to_string(), Matrix::new(2));

    let locations = locations(3);
    let used: HashSet<usize> = [0usize, 1, 2].into_iter().collect();
    let endpoints: HashMap<Profile, ProfileEndpoints> = HashMap::new();
    let servers = HashMap::new();

    let ctx = MatrixBuildContext {
        profiles: &["car".to_string()],
        locations: &locations,
        explicit_indices: true,
        max_matrices_used_index: 2,
        used_indices: &used,
        job_indices: &[1, 2],
        endpoints_by_profile: &endpoints,
        router: RouterKind::Osrm,
        servers: &servers,
        nb_thread: 1,
    };

    let result = manager.build(&ctx);
    assert!(matches!(result, Err(CoreError::Input(_))));
}

#[test]
fn build_accepts_user_supplied_matrix_and_computes_cost_bound() {
    let mut manager = MatrixManager::new();
    let mut matrix = Matrix::new(3);
    matrix.set(0, 1, 10);
    matrix.set(1, 2, 20);
    manager.set_matrix("car".to_string(), matrix);

    let locations = locations(3);
    let used: HashSet<usize> = [0usize, 1, 2].into_iter().collect();
    let mut endpoints: HashMap<Profile, ProfileEndpoints> = HashMap::new();
    endpoints.insert("car".to_string(), ProfileEndpoints { starts: vec![0], ends: vec![2] });
    let servers = HashMap::new();

    let ctx = MatrixBuildContext {
        profiles: &["car".to_string()],
        locations: &locations,
        explicit_indices: true,
        max_matrices_used_index: 2,
        used_indices: &used,
        job_indices: &[1],
        endpoints_by_profile: &endpoints,
        router: RouterKind::Osrm,
        servers: &servers,
        nb_thread: 1,
    };

    manager.build(&ctx).unwrap();
    assert!(manager.matrix("car").is_some());
    assert!(manager.cost_bound("car").is_some());
}

#[test]
fn build_leaves_user_supplied_matrix_unremapped_when_insertion_order_differs_from_index() {
    // locations are interned in an order that does not match their
    // user-supplied indices: position 0 carries index 5, position 1 carries
    // index 2. A user-supplied matrix is already indexed by those explicit
    // indices, not by backend/insertion position, so `build` must leave it
    // untouched rather than running it through `remap_to_explicit`.
    let mut manager = MatrixManager::new();
    let mut matrix = Matrix::new(6);
    matrix.set(5, 2, 42);
    manager.set_matrix("car".to_string(), matrix);

    let locations = vec![
        Location::from_index_and_coordinate(5, 5.0, 5.0),
        Location::from_index_and_coordinate(2, 2.0, 2.0),
    ];
    let used: HashSet<usize> = [2usize, 5].into_iter().collect();
    let mut endpoints: HashMap<Profile, ProfileEndpoints> = HashMap::new();
    endpoints.insert("car".to_string(), ProfileEndpoints { starts: vec![5], ends: vec![2] });
    let servers = HashMap::new();

    let ctx = MatrixBuildContext {
        profiles: &["car".to_string()],
        locations: &locations,
        explicit_indices: true,
        max_matrices_used_index: 5,
        used_indices: &used,
        job_indices: &[],
        endpoints_by_profile: &endpoints,
        router: RouterKind::Osrm,
        servers: &servers,
        nb_thread: 1,
    };

    manager.build(&ctx).unwrap();
    let built = manager.matrix("car").unwrap();
    assert_eq!(built.dimension, 6);
    assert_eq!(built.get(5, 2), 42);
}

#[test]
fn build_rejects_custom_matrix_in_implicit_mode() {
    let mut manager = MatrixManager::new();
    manager.set_matrix("car".to_string(), Matrix::new(3));

    let locations = locations(3);
    let used: HashSet<usize> = [0usize, 1, 2].into_iter().collect();
    let endpoints: HashMap<Profile, ProfileEndpoints> = HashMap::new();
    let servers = HashMap::new();

    let ctx = MatrixBuildContext {
        profiles: &["car".to_string()],
        locations: &locations,
        explicit_indices: false,
        max_matrices_used_index: 2,
        used_indices: &used,
        job_indices: &[1],
        endpoints_by_profile: &endpoints,
        router: RouterKind::Osrm,
        servers: &servers,
        nb_thread: 1,
    };

    let result = manager.build(&ctx);
    assert!(matches!(result, Err(CoreError::Input(_))));
}

#[test]
fn nb_thread_zero_defaults_to_available_parallelism_not_a_hang() {
    let mut manager = MatrixManager::new();
    let locations = locations(2);
    let used: HashSet<usize> = [0usize, 1].into_iter().collect();
    let endpoints: HashMap<Profile, ProfileEndpoints> = HashMap::new();
    let servers = HashMap::new();

    let ctx = MatrixBuildContext {
        profiles: &["car".to_string(), "bike".to_string()],
        locations: &locations,
        explicit_indices: true,
        max_matrices_used_index: 1,
        used_indices: &used,
        job_indices: &[1],
        endpoints_by_profile: &endpoints,
        router: RouterKind::Osrm,
        servers: &servers,
        nb_thread: 0,
    };

    // no server configured for either profile: both buckets fail fast with
    // an InputError rather than hanging, regardless of worker_count.
    let result = manager.build(&ctx);
    assert!(matches!(result, Err(CoreError::Input(_))));
}

proptest! {
    /// `checked_add` (P6) never panics and never wraps: it returns the exact
    /// mathematical sum whenever that sum fits in a `Cost`, and an
    /// `InternalError` otherwise — for any pair of operands, not just the
    /// hand-picked `u64::MAX` case above.
    #[test]
    fn checked_add_matches_wrapping_sum_iff_no_overflow(a in any::<u64>(), b in any::<u64>()) {
        match a.checked_add(b) {
            Some(expected) => prop_assert_eq!(checked_add(a, b).unwrap(), expected),
            None => prop_assert!(matches!(checked_add(a, b), Err(CoreError::Internal(_)))),
        }
    }
}
