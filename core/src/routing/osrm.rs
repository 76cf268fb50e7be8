//! HTTP adapter for an OSRM `table` service.

use super::{RoutingAdapter, ServerConfig};
use crate::errors::{CoreError, CoreResult};
use crate::models::{Location, Matrix};
use serde::Deserialize;

pub struct OsrmAdapter {
    profile: String,
    base_url: String,
    client: reqwest::blocking::Client,
}

#[derive(Deserialize)]
struct TableResponse {
    code: String,
    durations: Option<Vec<Vec<Option<f64>>>>,
}

impl OsrmAdapter {
    pub fn new(profile: &str, server: &ServerConfig) -> Self {
        Self { profile: profile.to_string(), base_url: server.base_url(), client: reqwest::blocking::Client::new() }
    }

    fn coordinates_param(locations: &[Location]) -> CoreResult<String> {
        let parts = locations
            .iter()
            .map(|location| {
                location
                    .coordinate
                    .map(|(lon, lat)| format!("{},{}", lon, lat))
                    .ok_or_else(|| CoreError::input("location missing coordinates for osrm routing"))
            })
            .collect::<CoreResult<Vec<_>>>()?;
        Ok(parts.join(";"))
    }
}

impl RoutingAdapter for OsrmAdapter {
    fn profile(&self) -> &str {
        &self.profile
    }

    fn get_matrix(&self, locations: &[Location]) -> CoreResult<Matrix> {
        let coordinates = Self::coordinates_param(locations)?;
        let url = format!("{}/table/v1/{}/{}?annotations=duration", self.base_url, self.profile, coordinates);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|err| CoreError::routing(format!("osrm request failed for profile '{}': {}", self.profile, err)))?;

        let table: TableResponse = response
            .json()
            .map_err(|err| CoreError::routing(format!("osrm response malformed for profile '{}': {}", self.profile, err)))?;

        if table.code != "Ok" {
            return Err(CoreError::routing(format!("osrm returned code '{}' for profile '{}'", table.code, self.profile)));
        }

        let durations = table
            .durations
            .ok_or_else(|| CoreError::routing(format!("osrm response missing durations for profile '{}'", self.profile)))?;

        let n = locations.len();
        let mut matrix = Matrix::new(n);
        for (i, row) in durations.into_iter().enumerate() {
            for (j, value) in row.into_iter().enumerate() {
                let value = value
                    .ok_or_else(|| CoreError::routing(format!("osrm table has an unreachable entry [{}][{}]", i, j)))?;
                matrix.set(i, j, value.round() as u64);
            }
        }

        Ok(matrix)
    }
}
