//! Plain-text rendering of the controller's view state.

use chrono::Local;
use weather_core::{UnitsSystem, ViewState, WeatherSummary};

pub const HELP: &str = "\
Type a city name to search (empty line = current location).
Commands: :units <metric|imperial|standard>  :reload  :clear  :help  :quit";

pub fn render_state(state: &ViewState) -> String {
    match state {
        ViewState::Loading => "Loading...".to_string(),
        ViewState::Error { message } => format!("Error: {message}\n(:reload to try again)"),
        ViewState::Success { weather, units } => render_summary(&weather.summary(), *units),
    }
}

fn render_summary(summary: &WeatherSummary, units: UnitsSystem) -> String {
    let temp = units.temperature_symbol();
    let mut lines = Vec::new();

    lines.push(summary.place().unwrap_or_else(|| "Unknown location".to_string()));

    if let Some(t) = summary.temperature {
        let description = summary
            .description
            .as_deref()
            .or(summary.condition.as_deref())
            .unwrap_or("");
        lines.push(format!("{t:.0}{temp}  {description}").trim_end().to_string());
    }

    let mut details = Vec::new();
    if let Some(v) = summary.feels_like {
        details.push(format!("Feels like: {v:.0}{temp}"));
    }
    if let (Some(lo), Some(hi)) = (summary.temp_min, summary.temp_max) {
        details.push(format!("Low/High: {lo:.0}{temp} / {hi:.0}{temp}"));
    }
    if let Some(v) = summary.humidity_pct {
        details.push(format!("Humidity: {v}%"));
    }
    if let Some(v) = summary.wind_speed {
        details.push(format!("Wind speed: {v:.1} {}", units.wind_speed_symbol()));
    }
    if let Some(v) = summary.pressure_hpa {
        details.push(format!("Pressure: {v:.0} hPa"));
    }
    if let Some(at) = summary.observation_time {
        details.push(format!("Observed: {}", at.with_timezone(&Local).format("%Y-%m-%d %H:%M")));
    }

    lines.extend(details.into_iter().map(|d| format!("  {d}")));
    lines.join("\n")
}
