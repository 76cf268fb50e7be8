//! Data model for the input assembly core (§3): locations, jobs, shipments,
//! vehicles and the cost matrix they are indexed against.

mod common;
pub use self::common::*;

mod location;
pub use self::location::Location;

mod job;
pub use self::job::{Job, JobKind, Shipment};

mod vehicle;
pub use self::vehicle::{StepKind, Vehicle, VehicleStep};

mod matrix;
pub use self::matrix::Matrix;
