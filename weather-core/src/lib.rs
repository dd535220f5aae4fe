//! Core library for the `weather` app.
//!
//! This crate defines:
//! - The load controller (permission → position → fetch → view state)
//! - Seams for the location service and the weather provider
//! - Configuration & credentials handling
//! - Shared domain models (units, targets, payloads, view state)
//!
//! It is used by `weather-cli`, but any front end that can render a
//! [`ViewState`] can drive it.

pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod location;
pub mod model;
pub mod provider;

pub use config::Config;
pub use controller::{LoadSettings, WeatherLoadController};
pub use error::LoadError;
pub use location::{ConfiguredLocation, LocationService, PermissionStatus};
pub use model::{
    Coordinates, UnitsSystem, ViewState, WeatherPayload, WeatherSummary, WeatherTarget,
};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
