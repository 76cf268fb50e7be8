//! Input-assembly and problem-preparation core for a Vehicle Routing Problem
//! solver.
//!
//! Given jobs, shipments and vehicles — each possibly carrying coordinates,
//! capacities, skills and time windows — this crate normalizes the input,
//! materializes one cost matrix per routing profile, validates numeric
//! soundness, and derives the compatibility structures an optimization stage
//! needs before it starts searching for routes. The solver itself, route
//! geometry enrichment beyond what a routing adapter provides, and
//! plan-level ETA computation are external collaborators this crate only
//! hands off to (see [`dispatcher`]).

pub mod compatibility;
pub mod dispatcher;
pub mod errors;
pub mod instance;
pub mod matrix_manager;
pub mod models;
pub mod registry;
pub mod routing;
pub mod solution;

pub use errors::{CoreError, CoreResult};
pub use instance::{Config, Instance, InstanceBuilder};
