//! In-process OSRM backend, available only when this crate is built with the
//! `libosrm` feature. Construction fails with [`CoreError::Routing`] when the
//! feature is absent, matching §4.2's "not compiled in" contract.

use super::RoutingAdapter;
use crate::errors::{CoreError, CoreResult};
use crate::models::{Location, Matrix};

pub struct LibOsrmAdapter {
    profile: String,
}

impl LibOsrmAdapter {
    #[cfg(feature = "libosrm")]
    pub fn new(profile: &str) -> CoreResult<Self> {
        Ok(Self { profile: profile.to_string() })
    }

    #[cfg(not(feature = "libosrm"))]
    pub fn new(profile: &str) -> CoreResult<Self> {
        Err(CoreError::routing(format!(
            "in-process osrm backend requested for profile '{}' but this build lacks the 'libosrm' feature",
            profile
        )))
    }
}

impl RoutingAdapter for LibOsrmAdapter {
    fn profile(&self) -> &str {
        &self.profile
    }

    #[cfg(feature = "libosrm")]
    fn get_matrix(&self, _locations: &[Location]) -> CoreResult<Matrix> {
        // TODO: link against libosrm and call its C++ table API directly;
        // until then the in-process backend builds but cannot serve requests.
        Err(CoreError::routing(format!(
            "in-process osrm backend for profile '{}' has no native bindings wired up yet",
            self.profile
        )))
    }

    #[cfg(not(feature = "libosrm"))]
    fn get_matrix(&self, _locations: &[Location]) -> CoreResult<Matrix> {
        unreachable!("LibOsrmAdapter::new fails before an instance without the 'libosrm' feature can exist")
    }
}
