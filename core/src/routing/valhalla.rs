//! HTTP adapter for a Valhalla `sources_to_targets` service.

use super::{RoutingAdapter, ServerConfig};
use crate::errors::{CoreError, CoreResult};
use crate::models::{Location, Matrix};
use serde::{Deserialize, Serialize};

pub struct ValhallaAdapter {
    profile: String,
    base_url: String,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct LatLon {
    lat: f64,
    lon: f64,
}

#[derive(Serialize)]
struct MatrixRequest<'a> {
    sources: &'a [LatLon],
    targets: &'a [LatLon],
    costing: &'a str,
}

#[derive(Deserialize)]
struct Cell {
    time: Option<f64>,
}

#[derive(Deserialize)]
struct MatrixResponse {
    sources_to_targets: Option<Vec<Vec<Cell>>>,
}

impl ValhallaAdapter {
    pub fn new(profile: &str, server: &ServerConfig) -> Self {
        Self { profile: profile.to_string(), base_url: server.base_url(), client: reqwest::blocking::Client::new() }
    }
}

impl RoutingAdapter for ValhallaAdapter {
    fn profile(&self) -> &str {
        &self.profile
    }

    fn get_matrix(&self, locations: &[Location]) -> CoreResult<Matrix> {
        let points = locations
            .iter()
            .map(|location| {
                location
                    .coordinate
                    .map(|(lon, lat)| LatLon { lat, lon })
                    .ok_or_else(|| CoreError::input("location missing coordinates for valhalla routing"))
            })
            .collect::<CoreResult<Vec<_>>>()?;

        let url = format!("{}/sources_to_targets", self.base_url);
        let request = MatrixRequest { sources: &points, targets: &points, costing: &self.profile };

        let response = self.client.post(&url).json(&request).send().map_err(|err| {
            CoreError::routing(format!("valhalla request failed for profile '{}': {}", self.profile, err))
        })?;

        let body: MatrixResponse = response.json().map_err(|err| {
            CoreError::routing(format!("valhalla response malformed for profile '{}': {}", self.profile, err))
        })?;

        let rows = body.sources_to_targets.ok_or_else(|| {
            CoreError::routing(format!("valhalla response missing sources_to_targets for profile '{}'", self.profile))
        })?;

        let n = locations.len();
        let mut matrix = Matrix::new(n);
        for (i, row) in rows.into_iter().enumerate() {
            for (j, cell) in row.into_iter().enumerate() {
                let time = cell.time.ok_or_else(|| {
                    CoreError::routing(format!("valhalla table has an unreachable entry [{}][{}]", i, j))
                })?;
                matrix.set(i, j, time.round() as u64);
            }
        }

        Ok(matrix)
    }
}
