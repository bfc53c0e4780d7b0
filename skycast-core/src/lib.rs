//! Core library for the `skycast` weather lookup.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Geocoding, offline timezone lookup and the OpenWeather provider
//! - The lookup pipeline and the controller that owns application state
//! - A render model for front ends
//!
//! It is used by `skycast-cli`, but a GUI front end can drive the same
//! [`Controller`] and [`render`] function.

pub mod config;
pub mod controller;
pub mod error;
pub mod forecast;
pub mod geocode;
pub mod icon;
pub mod lookup;
pub mod model;
pub mod provider;
pub mod timezone;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{Config, GeocoderConfig, OpenWeatherConfig, QueryBy};
pub use controller::{AppState, Controller, LookupEvent, Notice, SubmitOutcome};
pub use error::{NetworkErrorKind, WeatherError};
pub use geocode::{Geocoder, LocationResolver, NominatimGeocoder};
pub use icon::IconFetcher;
pub use lookup::WeatherService;
pub use model::{
    CurrentConditions, DailyForecastEntry, GeoResult, PlaceQuery, TimezoneId, WeatherQuery,
    WeatherSnapshot,
};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
pub use timezone::timezone_for;
pub use view::{DisplayModel, ForecastCard, render};
