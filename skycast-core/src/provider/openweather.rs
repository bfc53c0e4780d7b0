use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    error::{WeatherError, truncate_body},
    forecast::{ForecastSample, midday_entries},
    model::{CurrentConditions, DailyForecastEntry, WeatherQuery},
};

use super::WeatherProvider;

const SERVICE: &str = "OpenWeather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// GET `/data/2.5/{endpoint}` in metric units and decode the body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &WeatherQuery,
    ) -> Result<T, WeatherError> {
        let url = format!("{}/data/2.5/{endpoint}", self.base_url);

        let mut params: Vec<(&str, String)> = match query {
            WeatherQuery::Name(name) => vec![("q", name.clone())],
            WeatherQuery::Coordinates(geo) => vec![
                ("lat", geo.latitude.to_string()),
                ("lon", geo.longitude.to_string()),
            ],
        };
        params.push(("appid", self.api_key.clone()));
        params.push(("units", "metric".to_string()));

        debug!(%url, ?query, "requesting OpenWeather {endpoint}");

        let res = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| WeatherError::network(SERVICE, e))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| WeatherError::network(SERVICE, e))?;

        if status == StatusCode::NOT_FOUND {
            return Err(WeatherError::NotFound(describe(query)));
        }
        if !status.is_success() {
            return Err(WeatherError::Api {
                service: SERVICE,
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| WeatherError::malformed(SERVICE, e))
    }
}

fn describe(query: &WeatherQuery) -> String {
    match query {
        WeatherQuery::Name(name) => name.clone(),
        WeatherQuery::Coordinates(geo) => format!("{}, {}", geo.latitude, geo.longitude),
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwClouds {
    all: u8,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    clouds: OwClouds,
    visibility: u32,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

fn first_weather(weather: Vec<OwWeather>) -> Result<OwWeather, WeatherError> {
    weather
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::malformed(SERVICE, "empty `weather` array"))
}

impl TryFrom<OwCurrentResponse> for CurrentConditions {
    type Error = WeatherError;

    fn try_from(raw: OwCurrentResponse) -> Result<Self, Self::Error> {
        let weather = first_weather(raw.weather)?;
        Ok(CurrentConditions {
            temperature_c: raw.main.temp,
            feels_like_c: raw.main.feels_like,
            humidity_pct: raw.main.humidity,
            pressure_hpa: raw.main.pressure,
            wind_speed_mps: raw.wind.speed,
            description: weather.description,
            icon: weather.icon,
            visibility_m: raw.visibility,
            cloudiness_pct: raw.clouds.all,
        })
    }
}

impl TryFrom<OwForecastEntry> for ForecastSample {
    type Error = WeatherError;

    fn try_from(raw: OwForecastEntry) -> Result<Self, Self::Error> {
        let timestamp = NaiveDateTime::parse_from_str(&raw.dt_txt, "%Y-%m-%d %H:%M:%S")
            .map_err(|e| {
                WeatherError::malformed(SERVICE, format!("bad dt_txt '{}': {e}", raw.dt_txt))
            })?;
        let weather = first_weather(raw.weather)?;
        Ok(ForecastSample {
            timestamp,
            temperature_c: raw.main.temp,
            description: weather.description,
            icon: weather.icon,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_current(&self, query: &WeatherQuery) -> Result<CurrentConditions, WeatherError> {
        let parsed: OwCurrentResponse = self.get_json("weather", query).await?;
        CurrentConditions::try_from(parsed)
    }

    async fn fetch_forecast(
        &self,
        query: &WeatherQuery,
    ) -> Result<Vec<DailyForecastEntry>, WeatherError> {
        let parsed: OwForecastResponse = self.get_json("forecast", query).await?;

        let samples = parsed
            .list
            .into_iter()
            .map(ForecastSample::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let days = midday_entries(&samples);
        debug!(samples = samples.len(), days = days.len(), "reduced forecast feed");
        Ok(days)
    }
}
