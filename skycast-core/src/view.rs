//! Render model: the strings a front end puts into its fixed layout.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    controller::{AppState, Notice},
    forecast::FORECAST_DAYS,
    model::{DailyForecastEntry, GeoResult},
    timezone::{local_clock, zone_label},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastCard {
    pub day: String,
    pub date: String,
    pub temperature: String,
    pub description: String,
    pub icon: Option<String>,
}

impl ForecastCard {
    fn placeholder() -> Self {
        Self {
            day: "---".into(),
            date: "MM/DD".into(),
            temperature: "--°C".into(),
            description: "---".into(),
            icon: None,
        }
    }

    fn from_entry(entry: &DailyForecastEntry) -> Self {
        Self {
            day: entry.day.clone(),
            date: entry.date.format("%m/%d").to_string(),
            temperature: celsius(entry.temperature_c),
            description: capitalize(&entry.description),
            icon: Some(entry.icon.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayModel {
    pub clock: String,
    pub timezone: String,
    pub coordinates: String,
    pub temperature: String,
    pub description: String,
    pub icon: Option<String>,
    pub humidity: String,
    pub pressure: String,
    pub wind: String,
    pub feels_like: String,
    pub visibility: String,
    pub cloudiness: String,
    pub forecast: Vec<ForecastCard>,
    pub notice: Option<Notice>,
    pub search_enabled: bool,
}

impl DisplayModel {
    fn placeholder(state: &AppState) -> Self {
        Self {
            clock: String::new(),
            timezone: "Timezone".into(),
            coordinates: "Latitude, Longitude".into(),
            temperature: "--°C".into(),
            description: "Enter a city name".into(),
            icon: None,
            humidity: "--%".into(),
            pressure: "--hPa".into(),
            wind: "--m/s".into(),
            feels_like: "--°C".into(),
            visibility: "--m".into(),
            cloudiness: "--%".into(),
            forecast: vec![ForecastCard::placeholder(); FORECAST_DAYS],
            notice: state.notice.clone(),
            search_enabled: state.search_enabled,
        }
    }
}

/// Build the display strings for `state`; `now` drives the local clock.
pub fn render(state: &AppState, now: DateTime<Utc>) -> DisplayModel {
    let mut model = DisplayModel::placeholder(state);
    let Some(snap) = &state.snapshot else {
        return model;
    };

    if let Some(zone) = &snap.timezone {
        model.timezone = zone_label(zone);
        model.clock = local_clock(zone, now).unwrap_or_default();
    } else {
        model.timezone = "Unknown timezone".into();
    }
    model.coordinates = coordinates(&snap.location);

    let current = &snap.current;
    model.temperature = celsius(current.temperature_c);
    model.description = capitalize(&current.description);
    model.icon = Some(current.icon.clone());
    model.humidity = format!("{}%", current.humidity_pct);
    model.pressure = format!("{} hPa", current.pressure_hpa);
    model.wind = format!("{} m/s", current.wind_speed_mps);
    model.feels_like = celsius(current.feels_like_c);
    model.visibility = format!("{:.1} km", f64::from(current.visibility_m) / 1000.0);
    model.cloudiness = format!("{}%", current.cloudiness_pct);

    for (card, entry) in model.forecast.iter_mut().zip(&snap.forecast) {
        *card = ForecastCard::from_entry(entry);
    }

    model
}

fn celsius(value: f64) -> String {
    format!("{value:.1}°C")
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

fn coordinates(geo: &GeoResult) -> String {
    let ns = if geo.latitude < 0.0 { 'S' } else { 'N' };
    let ew = if geo.longitude < 0.0 { 'W' } else { 'E' };
    let lat = round4(geo.latitude.abs());
    let lng = round4(geo.longitude.abs());
    format!("{lat}°{ns}, {lng}°{ew}")
}

impl fmt::Display for DisplayModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}  {}", self.clock, self.timezone)?;
        writeln!(f, "{}", self.coordinates)?;
        writeln!(f)?;
        writeln!(f, "  {}  {}", self.temperature, self.description)?;
        writeln!(f)?;
        writeln!(
            f,
            "  Humidity    {:<12}Pressure    {}",
            self.humidity, self.pressure
        )?;
        writeln!(
            f,
            "  Wind Speed  {:<12}Feels Like  {}",
            self.wind, self.feels_like
        )?;
        writeln!(
            f,
            "  Visibility  {:<12}Cloudiness  {}",
            self.visibility, self.cloudiness
        )?;
        writeln!(f)?;
        writeln!(f, "5-DAY FORECAST")?;
        for card in &self.forecast {
            writeln!(
                f,
                "  {:<4}{:<7}{:>8}  {}",
                card.day, card.date, card.temperature, card.description
            )?;
        }
        if let Some(notice) = &self.notice {
            writeln!(f)?;
            writeln!(f, "[{}] {}", notice.title, notice.message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::WeatherSnapshot,
        testing::{PARIS, paris_current, week_of_days},
    };
    use chrono::TimeZone;

    fn noon_utc() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 6, 12, 0, 0)
            .single()
            .expect("valid instant")
    }

    fn state_with(snapshot: WeatherSnapshot) -> AppState {
        AppState {
            snapshot: Some(snapshot),
            ..AppState::default()
        }
    }

    fn paris_snapshot(days: u64) -> WeatherSnapshot {
        WeatherSnapshot {
            query: "Paris".into(),
            location: PARIS,
            timezone: Some("Europe/Paris".into()),
            current: paris_current(),
            forecast: week_of_days(days),
            fetched_at: noon_utc(),
        }
    }

    #[test]
    fn initial_state_shows_placeholders() {
        let model = render(&AppState::default(), noon_utc());

        assert_eq!(model.temperature, "--°C");
        assert_eq!(model.description, "Enter a city name");
        assert_eq!(model.timezone, "Timezone");
        assert_eq!(model.coordinates, "Latitude, Longitude");
        assert_eq!(model.forecast.len(), FORECAST_DAYS);
        assert!(model.forecast.iter().all(|c| c.date == "MM/DD"));
        assert!(model.search_enabled);
    }

    #[test]
    fn paris_snapshot_renders_display_strings() {
        let model = render(&state_with(paris_snapshot(5)), noon_utc());

        assert_eq!(model.temperature, "15.2°C");
        assert_eq!(model.humidity, "60%");
        assert_eq!(model.description, "Clear sky");
        assert_eq!(model.pressure, "1021 hPa");
        assert_eq!(model.wind, "3.6 m/s");
        assert_eq!(model.feels_like, "14.4°C");
        assert_eq!(model.visibility, "10.0 km");
        assert_eq!(model.cloudiness, "0%");
        assert_eq!(model.coordinates, "48.8566°N, 2.3522°E");
        assert_eq!(model.timezone, "Paris");
        // CEST is UTC+2 in May.
        assert_eq!(model.clock, "02:00 PM");
        assert_eq!(model.icon.as_deref(), Some("01d"));
    }

    #[test]
    fn forecast_cards_follow_entries() {
        let model = render(&state_with(paris_snapshot(5)), noon_utc());

        let first = &model.forecast[0];
        assert_eq!(first.day, "Mon");
        assert_eq!(first.date, "05/06");
        assert_eq!(first.temperature, "10.0°C");
        assert_eq!(first.description, "Light rain");
        assert_eq!(model.forecast[4].day, "Fri");
    }

    #[test]
    fn short_forecast_leaves_placeholder_cards() {
        let model = render(&state_with(paris_snapshot(3)), noon_utc());

        assert_eq!(model.forecast[2].day, "Wed");
        assert_eq!(model.forecast[3], ForecastCard::placeholder());
        assert_eq!(model.forecast[4], ForecastCard::placeholder());
    }

    #[test]
    fn missing_timezone_is_labelled() {
        let mut snap = paris_snapshot(1);
        snap.timezone = None;
        let model = render(&state_with(snap), noon_utc());

        assert_eq!(model.timezone, "Unknown timezone");
        assert_eq!(model.clock, "");
    }

    #[test]
    fn southern_and_western_coordinates() {
        let geo = GeoResult {
            latitude: -33.868_82,
            longitude: -70.5,
        };
        assert_eq!(coordinates(&geo), "33.8688°S, 70.5°W");
    }

    #[test]
    fn capitalize_first_letter_only() {
        assert_eq!(capitalize("clear sky"), "Clear sky");
        assert_eq!(capitalize("OVERCAST clouds"), "Overcast clouds");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn notice_is_carried_into_display() {
        let state = AppState {
            notice: Some(Notice {
                title: "Not Found".into(),
                message: "nope".into(),
            }),
            ..AppState::default()
        };
        let text = render(&state, noon_utc()).to_string();
        assert!(text.contains("[Not Found] nope"));
        assert!(text.contains("5-DAY FORECAST"));
    }
}
