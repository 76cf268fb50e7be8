use super::*;
use crate::models::Location;
use proptest::prelude::*;

#[test]
fn implicit_regime_assigns_dense_prefix_and_dedups_by_coordinate() {
    let mut registry = LocationRegistry::new();

    let mut a = Location::from_coordinate(1.0, 2.0);
    let mut b = Location::from_coordinate(3.0, 4.0);
    let mut a_again = Location::from_coordinate(1.0, 2.0);

    assert_eq!(registry.intern(&mut a), 0);
    assert_eq!(registry.intern(&mut b), 1);
    assert_eq!(registry.intern(&mut a_again), 0);

    assert_eq!(a.index, Some(0));
    assert_eq!(a_again.index, Some(0));
    assert_eq!(b.index, Some(1));
    assert_eq!(registry.locations().len(), 2);
    assert!(!registry.is_explicit());
}

#[test]
fn explicit_regime_never_overwrites_caller_supplied_index() {
    let mut registry = LocationRegistry::new();

    let mut first = Location::from_index(5);
    let mut second = Location::from_index(7);
    let mut repeat = Location::from_index(5);

    assert_eq!(registry.intern(&mut first), 5);
    assert_eq!(registry.intern(&mut second), 7);
    assert_eq!(registry.intern(&mut repeat), 5);

    assert_eq!(first.index, Some(5));
    assert_eq!(repeat.index, Some(5));
    // deduplicated: repeat did not add a second entry for index 5
    assert_eq!(registry.locations().len(), 2);
    assert!(registry.is_explicit());
}

proptest! {
    /// Interning the same coordinate pair any number of times in the
    /// implicit regime always resolves to the index assigned on first sight.
    #[test]
    fn implicit_intern_is_idempotent_on_coordinate(lon in -180.0..180.0, lat in -90.0..90.0, repeats in 1usize..8) {
        let mut registry = LocationRegistry::new();
        let mut first = Location::from_coordinate(lon, lat);
        let first_index = registry.intern(&mut first);

        for _ in 0..repeats {
            let mut again = Location::from_coordinate(lon, lat);
            prop_assert_eq!(registry.intern(&mut again), first_index);
        }
        prop_assert_eq!(registry.locations().len(), 1);
    }

    /// Interning the same caller-supplied index any number of times in the
    /// explicit regime always resolves to that same index, regardless of
    /// whatever coordinates ride along with it.
    #[test]
    fn explicit_intern_is_idempotent_on_index(index in 0usize..10_000, lon in -180.0..180.0, lat in -90.0..90.0) {
        let mut registry = LocationRegistry::new();
        let mut first = Location::from_index(index);
        registry.intern(&mut first);

        let mut again = Location::from_index_and_coordinate(index, lon, lat);
        prop_assert_eq!(registry.intern(&mut again), index);
        prop_assert_eq!(registry.locations().len(), 1);
    }
}
