use crate::{
    config::Config,
    error::WeatherError,
    model::{CurrentConditions, DailyForecastEntry, WeatherQuery},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Source of current conditions and daily forecasts.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_current(&self, query: &WeatherQuery) -> Result<CurrentConditions, WeatherError>;

    /// One entry per day that has a midday sample, in feed order.
    async fn fetch_forecast(
        &self,
        query: &WeatherQuery,
    ) -> Result<Vec<DailyForecastEntry>, WeatherError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.api_key()?;
    Ok(Arc::new(OpenWeatherProvider::new(api_key, &config.openweather.base_url)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_with_stored_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        assert!(provider_from_config(&cfg).is_ok());
    }
}
