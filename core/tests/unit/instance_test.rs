use super::*;
use crate::models::{Job, JobKind, Location, Matrix, Shipment, Vehicle};
use crate::routing::RouterKind;

fn config(geometry: bool) -> Config {
    Config { amount_size: 1, servers: HashMap::new(), router: RouterKind::Osrm, geometry }
}

fn job_with_coord(id: &str, lon: f64, lat: f64) -> Job {
    Job::new(id, JobKind::Single, Location::from_coordinate(lon, lat), 1)
}

fn vehicle_with_coord(id: &str, lon: f64, lat: f64) -> Vehicle {
    let mut vehicle = Vehicle::new(id, "car", 1);
    vehicle.start = Some(Location::from_coordinate(lon, lat));
    vehicle
}

fn supply_identity_matrix(builder: &mut InstanceBuilder, dimension: usize) {
    builder.set_matrix("car", Matrix::new(dimension));
}

#[test]
fn duplicate_single_job_id_is_rejected() {
    let mut builder = InstanceBuilder::new(config(false));
    builder.add_job(job_with_coord("j1", 0.0, 0.0)).unwrap();
    let result = builder.add_job(job_with_coord("j1", 1.0, 1.0));
    assert!(matches!(result, Err(CoreError::Input(_))));
}

#[test]
fn amount_length_mismatch_is_rejected() {
    let mut builder = InstanceBuilder::new(config(false));
    let mut job = job_with_coord("j1", 0.0, 0.0);
    job.pickup = vec![1, 2];
    let result = builder.add_job(job);
    assert!(matches!(result, Err(CoreError::Input(_))));
}

#[test]
fn mixed_skill_declarations_are_rejected() {
    let mut builder = InstanceBuilder::new(config(false));
    builder.add_job(job_with_coord("j1", 0.0, 0.0)).unwrap();

    let mut with_skills = job_with_coord("j2", 1.0, 1.0);
    with_skills.skills.insert("A".to_string());
    let result = builder.add_job(with_skills);

    match result {
        Err(CoreError::Input(message)) => assert_eq!(message, "Missing skills."),
        other => panic!("expected Missing skills. error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn mixed_location_index_conventions_are_rejected() {
    let mut builder = InstanceBuilder::new(config(false));
    builder.add_job(Job::new("j1", JobKind::Single, Location::from_index(5), 1)).unwrap();
    builder.add_job(Job::new("j2", JobKind::Single, Location::from_index(7), 1)).unwrap();
    builder.add_job(Job::new("j3", JobKind::Single, Location::from_index(12), 1)).unwrap();

    // scenario 5: an implicit-mode vehicle ingested after explicit-mode jobs
    let result = builder.add_vehicle(vehicle_with_coord("v1", 0.0, 0.0));

    match result {
        Err(CoreError::Input(message)) => assert_eq!(message, "Missing location index."),
        other => panic!("expected Missing location index. error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn shipment_halves_land_at_consecutive_positions() {
    let mut builder = InstanceBuilder::new(config(false));
    builder.add_job(job_with_coord("single", 0.0, 0.0)).unwrap();

    let mut pickup = Job::new("p1", JobKind::Pickup, Location::from_coordinate(1.0, 1.0), 1);
    let mut delivery = Job::new("d1", JobKind::Delivery, Location::from_coordinate(2.0, 2.0), 1);
    pickup.pickup = vec![3];
    delivery.delivery = vec![3];

    builder.add_shipment(Shipment { pickup, delivery }).unwrap();

    supply_identity_matrix(&mut builder, 3);
    let instance = builder.build(1).unwrap();

    assert_eq!(instance.jobs().len(), 3);
    assert_eq!(instance.jobs()[1].id, "p1");
    assert_eq!(instance.jobs()[2].id, "d1");
    assert_eq!(instance.jobs()[1].kind, JobKind::Pickup);
    assert_eq!(instance.jobs()[2].kind, JobKind::Delivery);
}

#[test]
fn shipment_with_mismatched_amounts_is_rejected() {
    let mut builder = InstanceBuilder::new(config(false));
    let mut pickup = Job::new("p1", JobKind::Pickup, Location::from_coordinate(1.0, 1.0), 1);
    pickup.pickup = vec![3];
    let mut delivery = Job::new("d1", JobKind::Delivery, Location::from_coordinate(2.0, 2.0), 1);
    delivery.delivery = vec![2];

    let result = builder.add_shipment(Shipment { pickup, delivery });
    assert!(matches!(result, Err(CoreError::Input(_))));
}

#[test]
fn geometry_precheck_fails_before_any_matrix_fetch() {
    let mut builder = InstanceBuilder::new(config(true));
    builder.add_job(Job::new("j1", JobKind::Single, Location::from_index(0), 1)).unwrap();
    let mut vehicle = Vehicle::new("v1", "car", 1);
    vehicle.start = Some(Location::from_index(1));
    builder.add_vehicle(vehicle).unwrap();

    let result = builder.build(1);
    assert!(matches!(result, Err(CoreError::Input(_))));
}

#[test]
fn homogeneous_flags_reflect_shared_locations_and_profiles() {
    let mut builder = InstanceBuilder::new(config(false));
    builder.add_job(job_with_coord("j1", 0.0, 0.0)).unwrap();
    builder.add_vehicle(vehicle_with_coord("v1", 5.0, 5.0)).unwrap();
    builder.add_vehicle(vehicle_with_coord("v2", 5.0, 5.0)).unwrap();

    supply_identity_matrix(&mut builder, 2);
    let instance = builder.build(1).unwrap();

    assert!(instance.has_homogeneous_locations());
    assert!(instance.has_homogeneous_profiles());
}
