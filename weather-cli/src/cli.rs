use std::sync::Arc;

use anyhow::{Context, anyhow};
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use weather_core::{
    Config, ConfiguredLocation, Coordinates, LoadSettings, UnitsSystem, ViewState,
    WeatherLoadController, provider::provider_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key, default units and location.
    Configure,

    /// Show current weather once.
    Show {
        /// City name; the configured location is used when absent.
        city: Option<String>,

        #[command(flatten)]
        load: LoadArgs,
    },

    /// Interactive session: type a city to search, `:help` for commands.
    Watch {
        #[command(flatten)]
        load: LoadArgs,
    },
}

/// Per-run overrides of the stored config.
#[derive(Debug, Args)]
pub struct LoadArgs {
    /// Units system: metric, imperial or standard.
    #[arg(long)]
    pub units: Option<UnitsSystem>,

    /// Latitude of the current position.
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude of the current position.
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,
}

impl LoadArgs {
    fn build_controller(&self, config: &Config) -> anyhow::Result<WeatherLoadController> {
        let provider = provider_from_config(config)?;

        let coordinates = match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => config.location,
        };

        let mut settings = LoadSettings::from(config);
        if let Some(units) = self.units {
            settings.units = units;
        }

        Ok(WeatherLoadController::new(
            Arc::new(provider),
            Arc::new(ConfiguredLocation::new(coordinates)),
            settings,
        ))
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, load } => show(city, &load).await,
            Command::Watch { load } => watch(&load).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key.trim().to_string());
    }

    let start = UnitsSystem::all()
        .iter()
        .position(|u| *u == config.units())
        .unwrap_or_default();
    let units = inquire::Select::new("Default units:", UnitsSystem::all().to_vec())
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read units")?;
    config.units = Some(units);

    let set_location = inquire::Confirm::new("Set the location used when no city is given?")
        .with_default(config.location.is_none())
        .prompt()
        .context("Failed to read answer")?;
    if set_location {
        let latitude = inquire::CustomType::<f64>::new("Latitude:")
            .with_error_message("Please type a number, e.g. 40.7")
            .prompt()
            .context("Failed to read latitude")?;
        let longitude = inquire::CustomType::<f64>::new("Longitude:")
            .with_error_message("Please type a number, e.g. -74.0")
            .prompt()
            .context("Failed to read longitude")?;
        config.location = Some(Coordinates::new(latitude, longitude));
    }

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

async fn show(city: Option<String>, load: &LoadArgs) -> anyhow::Result<()> {
    let config = Config::load()?;
    let controller = load.build_controller(&config)?;

    match city {
        Some(city) => controller.submit_query(city).await,
        None => controller.mount().await,
    }

    match controller.view_state() {
        ViewState::Error { message } => Err(anyhow!(message)),
        state => {
            println!("{}", render::render_state(&state));
            Ok(())
        }
    }
}

async fn watch(load: &LoadArgs) -> anyhow::Result<()> {
    let config = Config::load()?;
    let controller = load.build_controller(&config)?;

    let printer = tokio::spawn({
        let mut rx = controller.subscribe();
        async move {
            while rx.changed().await.is_ok() {
                let state = rx.borrow_and_update().clone();
                println!("{}", render::render_state(&state));
            }
        }
    });

    println!("{}", render::HELP);
    spawn_reload(&controller);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        match parse_input(&line) {
            Input::Quit => break,
            Input::Help => println!("{}", render::HELP),
            Input::Reload => spawn_reload(&controller),
            Input::Clear => controller.clear_query(),
            Input::Units(units) => {
                let controller = controller.clone();
                tokio::spawn(async move { controller.set_units_system(units).await });
            }
            Input::Query(text) => controller.set_query_text(text),
            Input::Invalid(reason) => eprintln!("{reason}"),
        }
    }

    printer.abort();
    Ok(())
}

fn spawn_reload(controller: &WeatherLoadController) {
    let controller = controller.clone();
    tokio::spawn(async move { controller.reload().await });
}

/// One line typed in `watch` mode.
#[derive(Debug, PartialEq)]
enum Input {
    Quit,
    Help,
    Reload,
    Clear,
    Units(UnitsSystem),
    Query(String),
    Invalid(String),
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    let Some(command) = line.strip_prefix(':') else {
        return Input::Query(line.to_string());
    };

    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("q" | "quit"), _) => Input::Quit,
        (Some("h" | "help"), _) => Input::Help,
        (Some("r" | "reload"), _) => Input::Reload,
        (Some("c" | "clear"), _) => Input::Clear,
        (Some("u" | "units"), Some(value)) => match UnitsSystem::try_from(value) {
            Ok(units) => Input::Units(units),
            Err(e) => Input::Invalid(e.to_string()),
        },
        (Some("u" | "units"), None) => {
            Input::Invalid("Usage: :units <metric|imperial|standard>".to_string())
        }
        _ => Input::Invalid(format!("Unknown command ':{command}'. Type :help.")),
    }
}
