use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Measurement convention sent to the API as the `units` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitsSystem {
    Metric,
    #[default]
    Imperial,
    /// Kelvin / metres per second.
    Standard,
}

impl UnitsSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitsSystem::Metric => "metric",
            UnitsSystem::Imperial => "imperial",
            UnitsSystem::Standard => "standard",
        }
    }

    pub const fn all() -> &'static [UnitsSystem] {
        &[UnitsSystem::Metric, UnitsSystem::Imperial, UnitsSystem::Standard]
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            UnitsSystem::Metric => "°C",
            UnitsSystem::Imperial => "°F",
            UnitsSystem::Standard => "K",
        }
    }

    pub fn wind_speed_symbol(&self) -> &'static str {
        match self {
            UnitsSystem::Imperial => "mph",
            UnitsSystem::Metric | UnitsSystem::Standard => "m/s",
        }
    }
}

impl fmt::Display for UnitsSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitsSystem {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        match lower.as_str() {
            "metric" => Ok(UnitsSystem::Metric),
            "imperial" => Ok(UnitsSystem::Imperial),
            "standard" => Ok(UnitsSystem::Standard),
            _ => Err(anyhow::anyhow!(
                "Unknown units system '{value}'. Supported: metric, imperial, standard."
            )),
        }
    }
}

impl FromStr for UnitsSystem {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnitsSystem::try_from(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// What a single weather request asks for. City and coordinates are exclusive.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherTarget {
    City(String),
    Coordinates(Coordinates),
}

impl WeatherTarget {
    /// Empty (or whitespace-only) query text means "use the device position".
    pub fn select(query: &str, position: Coordinates) -> Self {
        let query = query.trim();
        if query.is_empty() {
            WeatherTarget::Coordinates(position)
        } else {
            WeatherTarget::City(query.to_string())
        }
    }
}

/// Response body of a successful weather request, kept exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherPayload(Value);

impl WeatherPayload {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }

    pub fn into_json(self) -> Value {
        self.0
    }

    /// `message` field of the body, as sent by the API on failures.
    pub fn message(&self) -> Option<&str> {
        self.0.get("message").and_then(Value::as_str)
    }

    pub fn summary(&self) -> WeatherSummary {
        WeatherSummary::from_payload(self)
    }
}

/// What the controller shows. Exactly one variant is active at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    #[default]
    Loading,
    /// `units` is the system the payload was fetched in.
    Success { weather: WeatherPayload, units: UnitsSystem },
    Error { message: String },
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn weather(&self) -> Option<&WeatherPayload> {
        match self {
            ViewState::Success { weather, .. } => Some(weather),
            _ => None,
        }
    }

    /// Units of the displayed payload; `None` unless loaded.
    pub fn units(&self) -> Option<UnitsSystem> {
        match self {
            ViewState::Success { units, .. } => Some(*units),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ViewState::Error { message } => Some(message),
            _ => None,
        }
    }
}

/// Display-oriented view over an OpenWeather "current weather" payload.
///
/// Every field is optional: the payload stays opaque to the controller and a
/// missing field only means there is nothing to show for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherSummary {
    pub location_name: Option<String>,
    pub country: Option<String>,
    pub condition: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub temperature: Option<f64>,
    pub feels_like: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub humidity_pct: Option<u8>,
    pub pressure_hpa: Option<f64>,
    pub wind_speed: Option<f64>,
    pub observation_time: Option<DateTime<Utc>>,
}

impl WeatherSummary {
    pub fn from_payload(payload: &WeatherPayload) -> Self {
        let parsed: OwCurrent = match serde_json::from_value(payload.as_json().clone()) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!("Payload does not match the current weather shape: {}", e);
                return Self::default();
            }
        };

        let first = parsed.weather.into_iter().next().unwrap_or_default();
        let main = parsed.main.unwrap_or_default();

        Self {
            location_name: parsed.name.filter(|n| !n.is_empty()),
            country: parsed.sys.and_then(|s| s.country),
            condition: first.main,
            description: first.description,
            icon: first.icon,
            temperature: main.temp,
            feels_like: main.feels_like,
            temp_min: main.temp_min,
            temp_max: main.temp_max,
            humidity_pct: main.humidity,
            pressure_hpa: main.pressure,
            wind_speed: parsed.wind.and_then(|w| w.speed),
            observation_time: parsed.dt.and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
        }
    }

    /// "Paris, FR", "Paris" or `None`.
    pub fn place(&self) -> Option<String> {
        match (&self.location_name, &self.country) {
            (Some(name), Some(country)) => Some(format!("{name}, {country}")),
            (Some(name), None) => Some(name.clone()),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct OwMain {
    temp: Option<f64>,
    feels_like: Option<f64>,
    temp_min: Option<f64>,
    temp_max: Option<f64>,
    pressure: Option<f64>,
    humidity: Option<u8>,
}

#[derive(Debug, Default, Deserialize)]
struct OwWeather {
    main: Option<String>,
    description: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrent {
    name: Option<String>,
    dt: Option<i64>,
    main: Option<OwMain>,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: Option<OwWind>,
    sys: Option<OwSys>,
}
