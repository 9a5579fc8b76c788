//! Core library for the `weather` city lookup.
//!
//! This crate defines:
//! - Shared domain models (queries, current conditions, forecast entries)
//! - Condition-code icon classification and midday forecast selection
//! - A view model with pure render functions
//! - Abstraction over the weather provider, with an OpenWeather client
//! - The lookup session that drives the view
//! - Configuration & credentials handling
//!
//! It is used by `weather-cli`, but any front-end that can draw a [`ViewModel`] can reuse it.

pub mod config;
pub mod forecast;
pub mod icon;
pub mod model;
pub mod provider;
pub mod session;
pub mod view;

pub use config::Config;
pub use icon::{IconId, classify};
pub use model::{CurrentConditions, CurrentLookup, ForecastEntry, ForecastSample, LookupQuery};
pub use provider::{ProviderError, WeatherProvider, openweather::OpenWeatherProvider};
pub use session::{Clock, FixedClock, LookupOutcome, SystemClock, WeatherSession};
pub use view::{CurrentView, ForecastCard, Panel, ViewModel};
