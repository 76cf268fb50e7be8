//! Location identity (C1's unit of work).

use super::common::MatrixIndex;

/// An opaque identity with an optional coordinate pair and an optional
/// matrix index.
///
/// Two locations compare equal when either (a) both carry the same
/// user-supplied index, or (b) both carry identical coordinates — an
/// inclusive or, checked independently of one another. This equality is
/// used only for deduplication inside [`crate::registry::LocationRegistry`];
/// elsewhere locations are addressed by their resolved [`MatrixIndex`].
#[derive(Clone, Debug)]
pub struct Location {
    pub coordinate: Option<(f64, f64)>,
    pub index: Option<MatrixIndex>,
}

impl Location {
    /// A location known only by coordinates; its matrix index is assigned by
    /// the registry during ingestion (implicit-index regime).
    pub fn from_coordinate(lon: f64, lat: f64) -> Self {
        Self { coordinate: Some((lon, lat)), index: None }
    }

    /// A location known by a caller-supplied matrix index (explicit-index
    /// regime), with optional coordinates for routing backends that need
    /// them.
    pub fn from_index(index: MatrixIndex) -> Self {
        Self { coordinate: None, index: Some(index) }
    }

    /// A location known by a caller-supplied matrix index, carrying
    /// coordinates too (needed if the core must still query a routing
    /// backend for this location).
    pub fn from_index_and_coordinate(index: MatrixIndex, lon: f64, lat: f64) -> Self {
        Self { coordinate: Some((lon, lat)), index: Some(index) }
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        let same_index = matches!((self.index, other.index), (Some(a), Some(b)) if a == b);
        let same_coordinate = matches!((self.coordinate, other.coordinate), (Some(a), Some(b)) if a == b);
        same_index || same_coordinate
    }
}

impl Eq for Location {}
