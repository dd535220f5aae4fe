use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::{
    error::LoadError,
    model::{UnitsSystem, WeatherPayload, WeatherTarget},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// OpenWeather "current weather" endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Same provider against another endpoint (proxies, test servers).
    pub fn with_base_url(api_key: String, base_url: &str) -> Result<Self, LoadError> {
        Url::parse(base_url)?;

        Ok(Self {
            api_key,
            base_url: base_url.to_string(),
            http: Client::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full request URL: `q` or `lat`/`lon`, then `units`, then `appid`.
    pub fn request_url(
        &self,
        target: &WeatherTarget,
        units: UnitsSystem,
    ) -> Result<Url, LoadError> {
        let mut url = Url::parse(&self.base_url)?;
        {
            let mut query = url.query_pairs_mut();
            query.clear();
            match target {
                WeatherTarget::City(name) => {
                    query.append_pair("q", name);
                }
                WeatherTarget::Coordinates(coords) => {
                    query.append_pair("lat", &format_coordinate(coords.latitude));
                    query.append_pair("lon", &format_coordinate(coords.longitude));
                }
            }
            query.append_pair("units", units.as_str());
            query.append_pair("appid", &self.api_key);
        }
        Ok(url)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch(
        &self,
        target: &WeatherTarget,
        units: UnitsSystem,
    ) -> Result<WeatherPayload, LoadError> {
        let url = self.request_url(target, units)?;
        tracing::debug!(?target, %units, "Requesting OpenWeather current weather");

        // The URL carries the API key; keep it out of error messages.
        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| LoadError::Network(e.without_url()))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| LoadError::Network(e.without_url()))?;
        let parsed: Value = serde_json::from_str(&body)?;

        if status.is_success() {
            return Ok(WeatherPayload::new(parsed));
        }

        let message = parsed
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| format!("Weather request failed with status {status}"));

        tracing::debug!(%status, %message, "OpenWeather reported a failure");
        Err(LoadError::Api(message))
    }
}

/// Plain decimal, always with a fractional part: `40.7`, `-74.0`, `0.000001`.
fn format_coordinate(value: f64) -> String {
    let text = value.to_string();
    if text.contains('.') { text } else { format!("{text}.0") }
}
