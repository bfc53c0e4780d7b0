//! Forward geocoding: place name to coordinates.
//! The default backend is Nominatim (OpenStreetMap), which needs no API key.

use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;
use reqwest::{Client, header::USER_AGENT};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    config::GeocoderConfig,
    error::{WeatherError, truncate_body},
    model::{GeoResult, PlaceQuery},
};

const SERVICE: &str = "Nominatim";

#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Best match for `query`, or `None` when nothing matches.
    async fn geocode(&self, query: &str) -> Result<Option<GeoResult>, WeatherError>;
}

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    base_url: String,
    user_agent: String,
    http: Client,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
            http: Client::new(),
        }
    }
}

// Nominatim sends coordinates as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<GeoResult>, WeatherError> {
        let url = format!("{}/search", self.base_url);
        debug!(%url, query, "geocoding");

        let res = self
            .http
            .get(&url)
            .header(USER_AGENT, &self.user_agent)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| WeatherError::network(SERVICE, e))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| WeatherError::network(SERVICE, e))?;

        if !status.is_success() {
            return Err(WeatherError::Api {
                service: SERVICE,
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let places: Vec<NominatimPlace> = serde_json::from_str(&body)
            .map_err(|e| WeatherError::malformed(SERVICE, e))?;

        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };

        let latitude = parse_coordinate(&place.lat, "lat")?;
        let longitude = parse_coordinate(&place.lon, "lon")?;

        info!(
            place = place.display_name.as_deref().unwrap_or(query),
            latitude, longitude, "geocoded place"
        );
        Ok(Some(GeoResult {
            latitude,
            longitude,
        }))
    }
}

fn parse_coordinate(raw: &str, field: &str) -> Result<f64, WeatherError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| WeatherError::malformed(SERVICE, format!("invalid {field} value '{raw}'")))
}

/// Turns a place query into coordinates, treating "no match" as an error.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    geocoder: Arc<dyn Geocoder>,
}

impl LocationResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self { geocoder }
    }

    pub async fn resolve(&self, place: &PlaceQuery) -> Result<GeoResult, WeatherError> {
        self.geocoder
            .geocode(place.as_str())
            .await?
            .ok_or_else(|| WeatherError::NotFound(place.to_string()))
    }
}
