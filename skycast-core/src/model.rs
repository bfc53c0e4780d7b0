use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WeatherError;

/// A non-empty, trimmed place name typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceQuery(String);

impl PlaceQuery {
    pub fn parse(input: &str) -> Result<Self, WeatherError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(WeatherError::InvalidInput);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlaceQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoResult {
    pub latitude: f64,
    pub longitude: f64,
}

/// IANA zone name such as "Europe/London".
pub type TimezoneId = String;

/// How the weather API is addressed.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    Name(String),
    Coordinates(GeoResult),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    pub wind_speed_mps: f64,
    pub description: String,
    pub icon: String,
    pub visibility_m: u32,
    pub cloudiness_pct: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecastEntry {
    /// Abbreviated weekday, e.g. "Mon".
    pub day: String,
    pub date: NaiveDate,
    pub temperature_c: f64,
    pub description: String,
    pub icon: String,
}

/// Everything one successful lookup produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub query: String,
    pub location: GeoResult,
    pub timezone: Option<TimezoneId>,
    pub current: CurrentConditions,
    pub forecast: Vec<DailyForecastEntry>,
    pub fetched_at: DateTime<Utc>,
}
