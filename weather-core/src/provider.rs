use crate::{
    Config,
    error::LoadError,
    model::{UnitsSystem, WeatherPayload, WeatherTarget},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of weather payloads.
///
/// Success yields the parsed body unchanged; a failure reported by the API
/// comes back as `LoadError::Api` carrying the API's own message.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch(
        &self,
        target: &WeatherTarget,
        units: UnitsSystem,
    ) -> Result<WeatherPayload, LoadError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherProvider> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured.\n\
             Hint: run `weather configure` or set WEATHER_API_KEY."
        )
    })?;

    let provider = match config.base_url.as_deref() {
        Some(base) => OpenWeatherProvider::with_base_url(api_key, base)
            .map_err(|e| anyhow::anyhow!("Invalid base_url '{base}' in config: {e}"))?,
        None => OpenWeatherProvider::new(api_key),
    };

    Ok(provider)
}
