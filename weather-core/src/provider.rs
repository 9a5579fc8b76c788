use crate::{
    Config,
    model::{CurrentLookup, ForecastSample, LookupQuery},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{error::Error as _, fmt::Debug};
use thiserror::Error;

pub mod openweather;

/// Failures that never reached a usable provider answer.
///
/// A city the provider does not know is *not* an error; see [`CurrentLookup::NotFound`].
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to {endpoint} failed")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed {endpoint} response")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed forecast timestamp '{value}'")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("{endpoint} response has no {field}")]
    Incomplete {
        endpoint: &'static str,
        field: &'static str,
    },

    #[error("{endpoint} request rejected with code {code}: {message}")]
    Api {
        endpoint: &'static str,
        code: String,
        message: String,
    },
}

impl ProviderError {
    /// The error and all of its sources, joined with `": "`.
    pub fn chain(&self) -> String {
        let mut out = self.to_string();
        let mut source = self.source();
        while let Some(err) = source {
            out.push_str(": ");
            out.push_str(&err.to_string());
            source = err.source();
        }
        out
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions, or [`CurrentLookup::NotFound`] when the city is unknown.
    async fn current(&self, query: &LookupQuery) -> Result<CurrentLookup, ProviderError>;

    /// The full forecast list, in the order the provider returns it.
    async fn forecast(&self, query: &LookupQuery) -> Result<Vec<ForecastSample>, ProviderError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherProvider> {
    let api_key = config.api_key()?;

    let provider = match config.base_url.as_deref() {
        Some(base_url) => OpenWeatherProvider::new(api_key.to_owned()).with_base_url(base_url),
        None => OpenWeatherProvider::new(api_key.to_owned()),
    };

    Ok(provider)
}
