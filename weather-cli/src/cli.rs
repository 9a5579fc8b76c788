use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use inquire::{InquireError, Password, Text};
use tokio::{sync::watch, task::JoinHandle};
use tracing::debug;
use weather_core::{
    Config, LookupOutcome, OpenWeatherProvider, ViewModel, WeatherSession,
    provider::provider_from_config,
};

use crate::render::{LOADING_MESSAGE, render_view};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather and forecast for a city")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct Credentials {
    /// OpenWeather API key; overrides the configured one.
    #[arg(long)]
    api_key: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show current weather and forecast for a city.
    Show {
        /// City name.
        city: String,

        #[command(flatten)]
        credentials: Credentials,
    },

    /// Search cities one after another; Esc or Ctrl-C quits.
    Interactive {
        #[command(flatten)]
        credentials: Credentials,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, credentials } => {
                let session = open_session(credentials)?;
                show(&session, &city).await
            }
            Command::Interactive { credentials } => {
                let session = open_session(credentials)?;
                interactive(&session).await
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key);
    if !config.is_configured() {
        anyhow::bail!("API key must not be empty");
    }

    let path = config.save()?;
    println!("Saved API key to {}", path.display());

    Ok(())
}

fn open_session(credentials: Credentials) -> anyhow::Result<WeatherSession<OpenWeatherProvider>> {
    let mut config = Config::load()?;
    if let Some(api_key) = credentials.api_key {
        config.set_api_key(api_key);
    }

    let provider = provider_from_config(&config)?;
    debug!(base_url = provider.base_url(), "using OpenWeather");

    Ok(WeatherSession::new(provider))
}

/// Print the loading line each time the overlay goes up.
fn spawn_overlay(rx: watch::Receiver<ViewModel>) -> JoinHandle<()> {
    watch_overlay(rx, || eprintln!("{LOADING_MESSAGE}"))
}

/// Calls `on_raise` whenever `loading` turns on, including when it is
/// already on by the time the task first looks.
fn watch_overlay(
    mut rx: watch::Receiver<ViewModel>,
    on_raise: impl Fn() + Send + 'static,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut shown = false;
        loop {
            let loading = rx.borrow_and_update().loading;
            if loading && !shown {
                on_raise();
            }
            shown = loading;

            if rx.changed().await.is_err() {
                break;
            }
        }
    })
}

async fn show(session: &WeatherSession<OpenWeatherProvider>, city: &str) -> anyhow::Result<()> {
    let overlay = spawn_overlay(session.subscribe());

    let outcome = session.lookup(city).await;
    overlay.abort();

    match outcome {
        LookupOutcome::Rejected => anyhow::bail!("City name must not be empty"),
        LookupOutcome::Failed => {
            anyhow::bail!("Could not fetch weather for '{}'; see the log above", city.trim())
        }
        _ => println!("{}", render_view(&session.view())),
    }

    Ok(())
}

async fn interactive(session: &WeatherSession<OpenWeatherProvider>) -> anyhow::Result<()> {
    let overlay = spawn_overlay(session.subscribe());
    println!("{}\n", render_view(&session.view()));

    loop {
        let input = match Text::new("City:").prompt() {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => {
                overlay.abort();
                return Err(err).context("Failed to read city name");
            }
        };

        if session.lookup(&input).await != LookupOutcome::Rejected {
            println!("{}\n", render_view(&session.view()));
        }
    }

    overlay.abort();
    Ok(())
}
