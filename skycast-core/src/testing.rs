//! In-memory geocoder and weather provider for unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use tokio::sync::Semaphore;

use crate::{
    error::WeatherError,
    geocode::Geocoder,
    model::{CurrentConditions, DailyForecastEntry, GeoResult, WeatherQuery},
    provider::WeatherProvider,
};

pub(crate) const PARIS: GeoResult = GeoResult {
    latitude: 48.8566,
    longitude: 2.3522,
};

#[derive(Debug)]
pub(crate) struct FakeGeocoder {
    result: Option<GeoResult>,
    gate: Option<Arc<Semaphore>>,
}

impl FakeGeocoder {
    pub(crate) fn paris() -> Self {
        Self {
            result: Some(PARIS),
            gate: None,
        }
    }

    pub(crate) fn empty() -> Self {
        Self {
            result: None,
            gate: None,
        }
    }

    /// Blocks each call until a permit is added to `gate`.
    pub(crate) fn gated(result: GeoResult, gate: Arc<Semaphore>) -> Self {
        Self {
            result: Some(result),
            gate: Some(gate),
        }
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn geocode(&self, _query: &str) -> Result<Option<GeoResult>, WeatherError> {
        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|e| WeatherError::malformed("fake", e))?;
            permit.forget();
        }
        Ok(self.result)
    }
}

#[derive(Debug)]
pub(crate) struct FakeProvider {
    current: CurrentConditions,
    forecast: Option<Vec<DailyForecastEntry>>,
    calls: Arc<Mutex<Vec<&'static str>>>,
    queries: Arc<Mutex<Vec<WeatherQuery>>>,
}

impl FakeProvider {
    pub(crate) fn ok(current: CurrentConditions, forecast: Vec<DailyForecastEntry>) -> Self {
        Self {
            current,
            forecast: Some(forecast),
            calls: Arc::default(),
            queries: Arc::default(),
        }
    }

    /// Current conditions succeed, the forecast call fails.
    pub(crate) fn forecast_fails(current: CurrentConditions) -> Self {
        Self {
            current,
            forecast: None,
            calls: Arc::default(),
            queries: Arc::default(),
        }
    }

    pub(crate) fn calls(&self) -> Arc<Mutex<Vec<&'static str>>> {
        Arc::clone(&self.calls)
    }

    pub(crate) fn queries(&self) -> Arc<Mutex<Vec<WeatherQuery>>> {
        Arc::clone(&self.queries)
    }

    fn record(&self, call: &'static str, query: &WeatherQuery) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.clone());
        }
    }
}

#[async_trait]
impl WeatherProvider for FakeProvider {
    async fn fetch_current(&self, query: &WeatherQuery) -> Result<CurrentConditions, WeatherError> {
        self.record("current", query);
        Ok(self.current.clone())
    }

    async fn fetch_forecast(
        &self,
        query: &WeatherQuery,
    ) -> Result<Vec<DailyForecastEntry>, WeatherError> {
        self.record("forecast", query);
        self.forecast
            .clone()
            .ok_or_else(|| WeatherError::malformed("fake", "forecast unavailable"))
    }
}

pub(crate) fn paris_current() -> CurrentConditions {
    CurrentConditions {
        temperature_c: 15.2,
        feels_like_c: 14.37,
        humidity_pct: 60,
        pressure_hpa: 1021,
        wind_speed_mps: 3.6,
        description: "clear sky".to_string(),
        icon: "01d".to_string(),
        visibility_m: 10000,
        cloudiness_pct: 0,
    }
}

/// Consecutive days from Monday 2024-05-06.
pub(crate) fn week_of_days(count: u64) -> Vec<DailyForecastEntry> {
    let start = NaiveDate::from_ymd_opt(2024, 5, 6).expect("valid date");
    (0..count)
        .map(|offset| {
            let date = start + Days::new(offset);
            DailyForecastEntry {
                day: date.format("%a").to_string(),
                date,
                temperature_c: 10.0 + offset as f64,
                description: "light rain".to_string(),
                icon: "10d".to_string(),
            }
        })
        .collect()
}
