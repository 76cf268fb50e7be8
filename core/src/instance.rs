//! Instance assembly (C4, §4.4): ingests jobs, shipments and vehicles,
//! enforces structural invariants, and produces the read-only [`Instance`]
//! the remaining components operate on.

use crate::compatibility::{self, Compatibility};
use crate::errors::{CoreError, CoreResult};
use crate::matrix_manager::{MatrixBuildContext, MatrixManager, ProfileEndpoints};
use crate::models::{Cost, Job, JobKind, Location, Matrix, Profile, Shipment, Vehicle};
use crate::registry::LocationRegistry;
use crate::routing::{RouterKind, ServerConfig};
use hashbrown::{HashMap, HashSet};

/// Configuration recognized by [`InstanceBuilder::new`] (§6).
#[derive(Clone)]
pub struct Config {
    pub amount_size: usize,
    pub servers: HashMap<String, ServerConfig>,
    pub router: RouterKind,
    pub geometry: bool,
}

/// Incrementally assembles an [`Instance`]. Entities are append-only:
/// nothing ingested before a failing call is un-ingested, useful for
/// incremental caller diagnostics even though the instance is not expected
/// to be reused after a failure (§7).
pub struct InstanceBuilder {
    config: Config,
    has_custom_location_index: Option<bool>,
    has_skills: Option<bool>,
    has_tw: bool,
    has_jobs: bool,
    has_shipments: bool,
    jobs: Vec<Job>,
    vehicles: Vec<Vehicle>,
    single_ids: HashSet<String>,
    pickup_ids: HashSet<String>,
    delivery_ids: HashSet<String>,
    vehicle_ids: HashSet<String>,
    registry: LocationRegistry,
    matrices_used_index: HashSet<usize>,
    max_matrices_used_index: usize,
    matrix_manager: MatrixManager,
    profiles: Vec<Profile>,
    homogeneous_locations: bool,
    first_vehicle_endpoints: Option<(Option<usize>, Option<usize>)>,
    homogeneous_profiles: bool,
    first_profile: Option<Profile>,
}

impl InstanceBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            has_custom_location_index: None,
            has_skills: None,
            has_tw: false,
            has_jobs: false,
            has_shipments: false,
            jobs: Vec::new(),
            vehicles: Vec::new(),
            single_ids: HashSet::new(),
            pickup_ids: HashSet::new(),
            delivery_ids: HashSet::new(),
            vehicle_ids: HashSet::new(),
            registry: LocationRegistry::new(),
            matrices_used_index: HashSet::new(),
            max_matrices_used_index: 0,
            matrix_manager: MatrixManager::new(),
            profiles: Vec::new(),
            homogeneous_locations: true,
            first_vehicle_endpoints: None,
            homogeneous_profiles: true,
            first_profile: None,
        }
    }

    /// Registers a user-supplied matrix for `profile`, exempting it from the
    /// matrix manager's parallel fetch (§4.4's `set_matrix`).
    pub fn set_matrix(&mut self, profile: impl Into<Profile>, matrix: Matrix) {
        self.matrix_manager.set_matrix(profile.into(), matrix);
    }

    /// Ingests a single (non-shipment) job.
    pub fn add_job(&mut self, mut job: Job) -> CoreResult<&mut Self> {
        if job.kind != JobKind::Single {
            return Err(CoreError::input(format!("job '{}' must have kind Single to be added via add_job", job.id)));
        }
        self.check_amount(&job.pickup, &job.id)?;
        self.check_amount(&job.delivery, &job.id)?;
        self.check_skills_flag(!job.skills.is_empty())?;
        self.check_location_index_flag(job.location.index.is_some())?;
        insert_unique_id(&mut self.single_ids, &job.id)?;

        self.has_tw = self.has_tw || job.time_windows.iter().any(|tw| *tw != Default::default());
        self.intern_and_track(&mut job.location);
        self.has_jobs = true;
        self.jobs.push(job);

        Ok(self)
    }

    /// Ingests a (pickup, delivery) shipment; the two halves land at
    /// consecutive positions in the job sequence (P1).
    pub fn add_shipment(&mut self, mut shipment: Shipment) -> CoreResult<&mut Self> {
        shipment.validate().map_err(CoreError::input)?;

        self.check_amount(&shipment.pickup.pickup, &shipment.pickup.id)?;
        self.check_amount(&shipment.pickup.delivery, &shipment.pickup.id)?;
        self.check_amount(&shipment.delivery.pickup, &shipment.delivery.id)?;
        self.check_amount(&shipment.delivery.delivery, &shipment.delivery.id)?;

        self.check_skills_flag(!shipment.pickup.skills.is_empty())?;
        self.check_location_index_flag(shipment.pickup.location.index.is_some())?;
        self.check_location_index_flag(shipment.delivery.location.index.is_some())?;

        insert_unique_id(&mut self.pickup_ids, &shipment.pickup.id)?;
        insert_unique_id(&mut self.delivery_ids, &shipment.delivery.id)?;

        self.has_tw = self.has_tw
            || shipment.pickup.time_windows.iter().any(|tw| *tw != Default::default())
            || shipment.delivery.time_windows.iter().any(|tw| *tw != Default::default());

        self.intern_and_track(&mut shipment.pickup.location);
        self.intern_and_track(&mut shipment.delivery.location);

        self.has_shipments = true;
        self.jobs.push(shipment.pickup);
        self.jobs.push(shipment.delivery);

        Ok(self)
    }

    /// Ingests a vehicle.
    pub fn add_vehicle(&mut self, mut vehicle: Vehicle) -> CoreResult<&mut Self> {
        self.check_amount(&vehicle.capacity, &vehicle.id)?;
        self.check_skills_flag(!vehicle.skills.is_empty())?;

        if let (Some(start), Some(end)) = (&vehicle.start, &vehicle.end) {
            if start.index.is_some() != end.index.is_some() {
                return Err(CoreError::input(format!(
                    "vehicle '{}' start and end locations disagree on using an explicit matrix index",
                    vehicle.id
                )));
            }
        }
        let vehicle_has_explicit_index =
            vehicle.start.as_ref().map(|l| l.index.is_some()).or_else(|| vehicle.end.as_ref().map(|l| l.index.is_some()));
        if let Some(explicit) = vehicle_has_explicit_index {
            self.check_location_index_flag(explicit)?;
        }

        insert_unique_id(&mut self.vehicle_ids, &vehicle.id)?;

        self.has_tw = self.has_tw || vehicle.time_window != Default::default();

        let start_index = vehicle.start.as_mut().map(|location| self.intern_and_track(location));
        let end_index = vehicle.end.as_mut().map(|location| self.intern_and_track(location));

        match &self.first_vehicle_endpoints {
            None => self.first_vehicle_endpoints = Some((start_index, end_index)),
            Some(first) => {
                if *first != (start_index, end_index) {
                    self.homogeneous_locations = false;
                }
            }
        }

        match &self.first_profile {
            None => {
                self.first_profile = Some(vehicle.profile.clone());
            }
            Some(first) => {
                if *first != vehicle.profile {
                    self.homogeneous_profiles = false;
                }
            }
        }
        if !self.profiles.contains(&vehicle.profile) {
            self.profiles.push(vehicle.profile.clone());
        }

        self.vehicles.push(vehicle);

        Ok(self)
    }

    /// Fetches/validates matrices, derives compatibility tables, and returns
    /// the finished, read-only instance.
    pub fn build(mut self, nb_thread: usize) -> CoreResult<Instance> {
        if self.config.geometry && self.registry.locations().iter().any(|location| location.coordinate.is_none()) {
            return Err(CoreError::input("geometry requested but at least one location lacks coordinates"));
        }

        let explicit_indices = self.registry.is_explicit();
        let locations = self.registry.locations().to_vec();

        let mut job_indices: Vec<usize> = self
            .jobs
            .iter()
            .map(|job| job.location.index.expect("every ingested job location carries a resolved matrix index"))
            .collect();
        job_indices.sort_unstable();
        job_indices.dedup();

        let mut endpoints_by_profile: HashMap<Profile, ProfileEndpoints> = HashMap::new();
        for vehicle in &self.vehicles {
            let entry = endpoints_by_profile.entry(vehicle.profile.clone()).or_default();
            if let Some(index) = vehicle.start.as_ref().and_then(|l| l.index) {
                entry.starts.push(index);
            }
            if let Some(index) = vehicle.end.as_ref().and_then(|l| l.index) {
                entry.ends.push(index);
            }
        }

        let ctx = MatrixBuildContext {
            profiles: &self.profiles,
            locations: &locations,
            explicit_indices,
            max_matrices_used_index: self.max_matrices_used_index,
            used_indices: &self.matrices_used_index,
            job_indices: &job_indices,
            endpoints_by_profile: &endpoints_by_profile,
            router: self.config.router,
            servers: &self.config.servers,
            nb_thread,
        };
        self.matrix_manager.build(&ctx)?;

        let has_skills = self.has_skills.unwrap_or(false);
        let has_custom_location_index = self.has_custom_location_index.unwrap_or(false);

        let mut instance = Instance {
            jobs: self.jobs,
            vehicles: self.vehicles,
            amount_size: self.config.amount_size,
            has_custom_location_index,
            has_skills,
            has_tw: self.has_tw,
            has_jobs: self.has_jobs,
            has_shipments: self.has_shipments,
            homogeneous_locations: self.homogeneous_locations,
            homogeneous_profiles: self.homogeneous_profiles,
            max_matrices_used_index: self.max_matrices_used_index,
            profiles: self.profiles,
            locations,
            matrices: self.matrix_manager,
            geometry: self.config.geometry,
            compatibility: Compatibility::empty(),
        };

        instance.compatibility = compatibility::build(&instance);

        Ok(instance)
    }

    fn check_amount(&self, amount: &[u64], owner_id: &str) -> CoreResult<()> {
        if amount.len() != self.config.amount_size {
            return Err(CoreError::input(format!(
                "'{}' has an amount vector of length {}, expected {}",
                owner_id,
                amount.len(),
                self.config.amount_size
            )));
        }
        Ok(())
    }

    fn check_skills_flag(&mut self, has_skills: bool) -> CoreResult<()> {
        match self.has_skills {
            None => {
                self.has_skills = Some(has_skills);
                Ok(())
            }
            Some(expected) if expected == has_skills => Ok(()),
            Some(_) => Err(CoreError::input("Missing skills.")),
        }
    }

    fn check_location_index_flag(&mut self, has_explicit_index: bool) -> CoreResult<()> {
        match self.has_custom_location_index {
            None => {
                self.has_custom_location_index = Some(has_explicit_index);
                Ok(())
            }
            Some(expected) if expected == has_explicit_index => Ok(()),
            Some(_) => Err(CoreError::input("Missing location index.")),
        }
    }

    fn intern_and_track(&mut self, location: &mut Location) -> usize {
        let index = self.registry.intern(location);
        self.matrices_used_index.insert(index);
        self.max_matrices_used_index = self.max_matrices_used_index.max(index);
        index
    }
}

fn insert_unique_id(ids: &mut HashSet<String>, id: &str) -> CoreResult<()> {
    if !ids.insert(id.to_string()) {
        return Err(CoreError::input(format!("duplicate id '{}'", id)));
    }
    Ok(())
}

/// The fully-assembled, read-only problem instance the dispatcher (C6) and
/// solver collaborator consume.
pub struct Instance {
    jobs: Vec<Job>,
    vehicles: Vec<Vehicle>,
    amount_size: usize,
    has_custom_location_index: bool,
    has_skills: bool,
    has_tw: bool,
    has_jobs: bool,
    has_shipments: bool,
    homogeneous_locations: bool,
    homogeneous_profiles: bool,
    max_matrices_used_index: usize,
    profiles: Vec<Profile>,
    locations: Vec<Location>,
    matrices: MatrixManager,
    geometry: bool,
    compatibility: Compatibility,
}

impl Instance {
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn amount_size(&self) -> usize {
        self.amount_size
    }

    pub fn has_custom_location_index(&self) -> bool {
        self.has_custom_location_index
    }

    pub fn has_skills(&self) -> bool {
        self.has_skills
    }

    pub fn has_tw(&self) -> bool {
        self.has_tw
    }

    pub fn has_jobs(&self) -> bool {
        self.has_jobs
    }

    pub fn has_shipments(&self) -> bool {
        self.has_shipments
    }

    pub fn has_homogeneous_locations(&self) -> bool {
        self.homogeneous_locations
    }

    pub fn has_homogeneous_profiles(&self) -> bool {
        self.homogeneous_profiles
    }

    pub fn max_matrices_used_index(&self) -> usize {
        self.max_matrices_used_index
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn geometry_requested(&self) -> bool {
        self.geometry
    }

    pub fn matrix(&self, profile: &str) -> Option<&Matrix> {
        self.matrices.matrix(profile)
    }

    /// The cost bound the overflow check (§4.3) derived for `profile` —
    /// surfaced here as an explicit limit for the solver rather than
    /// discarded, resolving spec.md's §9 open question.
    pub fn cost_bound(&self, profile: &str) -> Option<Cost> {
        self.matrices.cost_bound(profile)
    }

    /// Whether `v1` and `v2` can be substituted for one another by the
    /// solver's inter-route moves (C5's `VV` table).
    pub fn vehicle_ok_with_vehicle(&self, v1: usize, v2: usize) -> bool {
        self.compatibility.vehicle_ok_with_vehicle(v1, v2)
    }

    /// Whether vehicle `v` can ever serve job `j` (C5's `VJ` table).
    pub fn vehicle_ok_with_job(&self, v: usize, j: usize) -> bool {
        self.compatibility.vehicle_ok_with_job(v, j)
    }
}

#[cfg(test)]
#[path = "../tests/unit/instance_test.rs"]
mod instance_test;
