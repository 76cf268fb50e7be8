//! Pluggable routing backend adapters (C2, §4.2).
//!
//! Each variant owns a profile name and is constructed once, at matrix-build
//! time; the instance owns it for its lifetime. `get_matrix` must be safe to
//! call concurrently across distinct adapter instances — the matrix manager
//! (C3) relies on this to fetch several profiles' matrices in parallel.

mod osrm;
pub use self::osrm::OsrmAdapter;

mod ors;
pub use self::ors::OrsAdapter;

mod valhalla;
pub use self::valhalla::ValhallaAdapter;

mod libosrm;
pub use self::libosrm::LibOsrmAdapter;

use crate::errors::{CoreError, CoreResult};
use crate::models::{Location, Matrix};
use crate::solution::Route;
use hashbrown::HashMap;

/// Capability interface every routing backend implements.
pub trait RoutingAdapter: Send + Sync {
    /// The profile this adapter was constructed for.
    fn profile(&self) -> &str;

    /// Computes a dense matrix, indexed by position in `locations` (not by
    /// matrix index — the matrix manager remaps it if the instance uses
    /// explicit indices).
    fn get_matrix(&self, locations: &[Location]) -> CoreResult<Matrix>;

    /// Enriches `route` with geometry and distance. The default does
    /// nothing; only backends that support route geometry override it.
    fn add_route_info(&self, route: &mut Route) -> CoreResult<()> {
        let _ = route;
        Ok(())
    }
}

/// `(host, port)` pair identifying one routing server for one profile.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Which routing engine backs every profile not covered by a user-supplied
/// matrix (§6's `router` configuration option).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouterKind {
    Osrm,
    LibOsrm,
    Ors,
    Valhalla,
}

/// Constructs the adapter for `profile` under `router`. Fails with
/// [`CoreError::Input`] when a server descriptor is missing, or with
/// [`CoreError::Routing`] when the in-process backend was requested but this
/// build does not carry it.
pub fn create_adapter(
    router: RouterKind,
    profile: &str,
    servers: &HashMap<String, ServerConfig>,
) -> CoreResult<Box<dyn RoutingAdapter>> {
    match router {
        RouterKind::Osrm => Ok(Box::new(OsrmAdapter::new(profile, lookup_server(servers, profile)?))),
        RouterKind::Ors => Ok(Box::new(OrsAdapter::new(profile, lookup_server(servers, profile)?))),
        RouterKind::Valhalla => Ok(Box::new(ValhallaAdapter::new(profile, lookup_server(servers, profile)?))),
        RouterKind::LibOsrm => LibOsrmAdapter::new(profile).map(|adapter| Box::new(adapter) as Box<dyn RoutingAdapter>),
    }
}

fn lookup_server<'a>(servers: &'a HashMap<String, ServerConfig>, profile: &str) -> CoreResult<&'a ServerConfig> {
    servers
        .get(profile)
        .ok_or_else(|| CoreError::input(format!("no server configured for profile '{}'", profile)))
}
