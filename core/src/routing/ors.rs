//! HTTP adapter for an OpenRouteService (ORS) `matrix` service.

use super::{RoutingAdapter, ServerConfig};
use crate::errors::{CoreError, CoreResult};
use crate::models::{Location, Matrix};
use serde::{Deserialize, Serialize};

pub struct OrsAdapter {
    profile: String,
    base_url: String,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct MatrixRequest {
    locations: Vec<[f64; 2]>,
    metrics: Vec<&'static str>,
}

#[derive(Deserialize)]
struct MatrixResponse {
    durations: Option<Vec<Vec<Option<f64>>>>,
}

impl OrsAdapter {
    pub fn new(profile: &str, server: &ServerConfig) -> Self {
        Self { profile: profile.to_string(), base_url: server.base_url(), client: reqwest::blocking::Client::new() }
    }
}

impl RoutingAdapter for OrsAdapter {
    fn profile(&self) -> &str {
        &self.profile
    }

    fn get_matrix(&self, locations: &[Location]) -> CoreResult<Matrix> {
        let coordinates = locations
            .iter()
            .map(|location| {
                location
                    .coordinate
                    .map(|(lon, lat)| [lon, lat])
                    .ok_or_else(|| CoreError::input("location missing coordinates for ors routing"))
            })
            .collect::<CoreResult<Vec<_>>>()?;

        let url = format!("{}/v2/matrix/{}", self.base_url, self.profile);
        let request = MatrixRequest { locations: coordinates, metrics: vec!["duration"] };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .map_err(|err| CoreError::routing(format!("ors request failed for profile '{}': {}", self.profile, err)))?;

        let body: MatrixResponse = response
            .json()
            .map_err(|err| CoreError::routing(format!("ors response malformed for profile '{}': {}", self.profile, err)))?;

        let durations = body
            .durations
            .ok_or_else(|| CoreError::routing(format!("ors response missing durations for profile '{}'", self.profile)))?;

        let n = locations.len();
        let mut matrix = Matrix::new(n);
        for (i, row) in durations.into_iter().enumerate() {
            for (j, value) in row.into_iter().enumerate() {
                let value =
                    value.ok_or_else(|| CoreError::routing(format!("ors table has an unreachable entry [{}][{}]", i, j)))?;
                matrix.set(i, j, value.round() as u64);
            }
        }

        Ok(matrix)
    }
}
