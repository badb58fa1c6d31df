use serde::Deserialize;

use crate::core::config::GeocodingConfig;
use crate::core::error::{AppError, Result};
use crate::shared::constants::MAX_LOCATION_NAME_LENGTH;
use crate::shared::geo::GeoPoint;

/// Nominatim reverse lookup response
#[derive(Debug, Deserialize)]
pub struct NominatimReverseResponse {
    pub display_name: Option<String>,
    pub address: Option<NominatimAddress>,
    /// Present instead of a result when nothing is found at the point
    pub error: Option<String>,
}

/// Nominatim address components
#[derive(Debug, Default, Deserialize)]
pub struct NominatimAddress {
    pub road: Option<String>,
    pub house_number: Option<String>,
    pub neighbourhood: Option<String>,
    pub suburb: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
}

impl NominatimAddress {
    /// Get city, falling back to town or village
    pub fn get_city(&self) -> Option<String> {
        self.city
            .clone()
            .or_else(|| self.town.clone())
            .or_else(|| self.village.clone())
    }

    /// Short "street number, district, city" label
    pub fn short_label(&self) -> Option<String> {
        let street = match (&self.road, &self.house_number) {
            (Some(road), Some(number)) => Some(format!("{} {}", road, number)),
            (Some(road), None) => Some(road.clone()),
            _ => None,
        };
        let district = self.suburb.clone().or_else(|| self.neighbourhood.clone());

        let parts: Vec<String> = [street, district, self.get_city()]
            .into_iter()
            .flatten()
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

impl NominatimReverseResponse {
    /// Human-readable place name for a report
    pub fn location_name(self) -> Option<String> {
        if self.error.is_some() {
            return None;
        }
        self.address
            .as_ref()
            .and_then(NominatimAddress::short_label)
            .or(self.display_name)
            .map(|name| truncate_chars(name, MAX_LOCATION_NAME_LENGTH as usize))
    }
}

/// Cut `s` to at most `max` characters, never splitting a character
fn truncate_chars(mut s: String, max: usize) -> String {
    if let Some((idx, _)) = s.char_indices().nth(max) {
        s.truncate(idx);
    }
    s
}

/// Service for reverse geocoding report coordinates using Nominatim
pub struct GeocodingService {
    client: reqwest::Client,
    base_url: String,
    enabled: bool,
}

impl GeocodingService {
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            enabled: config.enabled,
        })
    }

    /// Place name at `point`, or `None` when disabled or nothing is found
    pub async fn reverse(&self, point: GeoPoint) -> Result<Option<String>> {
        if !self.enabled {
            return Ok(None);
        }

        let url = format!(
            "{}/reverse?format=json&lat={}&lon={}&zoom=18&addressdetails=1",
            self.base_url,
            urlencoding::encode(&point.lat.to_string()),
            urlencoding::encode(&point.lng.to_string())
        );

        tracing::debug!("Reverse geocoding {} -> {}", point, url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::error!("Nominatim request failed: {:?}", e);
            AppError::ExternalServiceError(format!("Nominatim request failed: {}", e))
        })?;

        if !response.status().is_success() {
            tracing::warn!("Nominatim returned status: {}", response.status());
            return Ok(None);
        }

        let body: NominatimReverseResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Nominatim response: {:?}", e);
            AppError::ExternalServiceError(format!("Failed to parse Nominatim response: {}", e))
        })?;

        Ok(body.location_name())
    }
}
