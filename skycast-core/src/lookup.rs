//! One full lookup: geocode, timezone, current conditions and forecast.

use std::sync::Arc;

use chrono::Utc;
use tokio::task;
use tracing::{info, warn};

use crate::{
    config::{Config, QueryBy},
    error::WeatherError,
    forecast::FORECAST_DAYS,
    geocode::{LocationResolver, NominatimGeocoder},
    model::{GeoResult, PlaceQuery, TimezoneId, WeatherQuery, WeatherSnapshot},
    provider::{WeatherProvider, provider_from_config},
    timezone::timezone_for,
};

#[derive(Debug, Clone)]
pub struct WeatherService {
    resolver: LocationResolver,
    provider: Arc<dyn WeatherProvider>,
    query_by: QueryBy,
}

impl WeatherService {
    pub fn new(
        resolver: LocationResolver,
        provider: Arc<dyn WeatherProvider>,
        query_by: QueryBy,
    ) -> Self {
        Self {
            resolver,
            provider,
            query_by,
        }
    }

    /// Nominatim + OpenWeather, as configured.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let geocoder = NominatimGeocoder::new(&config.geocoder);
        let provider = provider_from_config(config)?;
        Ok(Self::new(
            LocationResolver::new(Arc::new(geocoder)),
            provider,
            config.openweather.query_by,
        ))
    }

    /// Either every part succeeds and a snapshot comes back, or nothing does.
    pub async fn lookup(&self, place: &PlaceQuery) -> Result<WeatherSnapshot, WeatherError> {
        let result = self.lookup_inner(place).await;
        if let Err(err) = &result {
            warn!(%place, error = %err, "weather lookup failed");
        }
        result
    }

    async fn lookup_inner(&self, place: &PlaceQuery) -> Result<WeatherSnapshot, WeatherError> {
        let location = self.resolver.resolve(place).await?;
        let timezone = self.timezone_of(place, location).await;

        let query = match self.query_by {
            QueryBy::Name => WeatherQuery::Name(place.to_string()),
            QueryBy::Coordinates => WeatherQuery::Coordinates(location),
        };

        let current = self.provider.fetch_current(&query).await?;
        let mut forecast = self.provider.fetch_forecast(&query).await?;
        forecast.truncate(FORECAST_DAYS);

        info!(%place, days = forecast.len(), "weather lookup complete");

        Ok(WeatherSnapshot {
            query: place.to_string(),
            location,
            timezone,
            current,
            forecast,
            fetched_at: Utc::now(),
        })
    }

    /// The boundary search is CPU-bound and its first call loads the dataset,
    /// so it runs on the blocking pool.
    async fn timezone_of(&self, place: &PlaceQuery, location: GeoResult) -> Option<TimezoneId> {
        let (lat, lng) = (location.latitude, location.longitude);
        let search = task::spawn_blocking(move || timezone_for(lat, lng));
        let timezone = match search.await {
            Ok(zone) => zone,
            Err(err) => {
                warn!(%place, error = %err, "timezone search did not finish");
                None
            }
        };
        if timezone.is_none() {
            info!(%place, "no timezone covers the resolved point");
        }
        timezone
    }
}
