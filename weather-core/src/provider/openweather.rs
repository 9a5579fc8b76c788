use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::model::{CurrentConditions, CurrentLookup, ForecastSample, LookupQuery};

use super::{ProviderError, WeatherProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

const CURRENT: &str = "weather";
const FORECAST: &str = "forecast";
const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

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

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `{base}/{endpoint}` and return the body regardless of HTTP status;
    /// the provider reports "not found" inside the body.
    async fn fetch(&self, endpoint: &'static str, query: &LookupQuery) -> Result<String, ProviderError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        debug!(%url, city = %query, "requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", query.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|source| ProviderError::Transport { endpoint, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| ProviderError::Transport { endpoint, source })?;

        debug!(%status, endpoint, bytes = body.len(), "OpenWeather responded");

        Ok(body)
    }
}

/// `cod` and `message` are present on every response, success or not.
/// `cod` is a number on `/weather` and a string on `/forecast`.
#[derive(Debug, Deserialize)]
struct OwEnvelope {
    cod: Option<Value>,
    message: Option<Value>,
}

impl OwEnvelope {
    fn is_ok(&self) -> bool {
        match &self.cod {
            Some(Value::Number(n)) => n.as_i64() == Some(200),
            Some(Value::String(s)) => s == "200",
            _ => false,
        }
    }

    fn code(&self) -> String {
        match &self.cod {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "missing".to_string(),
        }
    }

    fn message(&self) -> String {
        match &self.message {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    #[serde(default)]
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: i64,
    #[serde(default)]
    main: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: Option<i64>,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

fn decode<'a, T: Deserialize<'a>>(endpoint: &'static str, body: &'a str) -> Result<T, ProviderError> {
    serde_json::from_str(body).map_err(|source| ProviderError::Decode { endpoint, source })
}

pub(crate) fn parse_current(body: &str) -> Result<CurrentLookup, ProviderError> {
    let envelope: OwEnvelope = decode(CURRENT, body)?;
    if !envelope.is_ok() {
        return Ok(CurrentLookup::NotFound {
            message: envelope.message(),
        });
    }

    let parsed: OwCurrentResponse = decode(CURRENT, body)?;

    let condition = parsed
        .weather
        .into_iter()
        .next()
        .ok_or(ProviderError::Incomplete {
            endpoint: CURRENT,
            field: "weather condition",
        })?;

    Ok(CurrentLookup::Found(CurrentConditions {
        city_name: parsed.name,
        temperature_celsius: parsed.main.temp,
        condition_label: condition.main,
        condition_code: condition.id,
        humidity_percent: parsed.main.humidity,
        wind_speed_mps: parsed.wind.speed,
        observed_at: parsed.dt.and_then(|ts| DateTime::from_timestamp(ts, 0)),
    }))
}

pub(crate) fn parse_forecast(body: &str) -> Result<Vec<ForecastSample>, ProviderError> {
    let envelope: OwEnvelope = decode(FORECAST, body)?;
    if !envelope.is_ok() {
        return Err(ProviderError::Api {
            endpoint: FORECAST,
            code: envelope.code(),
            message: envelope.message(),
        });
    }

    let parsed: OwForecastResponse = decode(FORECAST, body)?;

    parsed
        .list
        .into_iter()
        .map(|entry| -> Result<ForecastSample, ProviderError> {
            let timestamp = NaiveDateTime::parse_from_str(&entry.dt_txt, DT_TXT_FORMAT).map_err(
                |source| ProviderError::Timestamp {
                    value: entry.dt_txt.clone(),
                    source,
                },
            )?;

            Ok(ForecastSample {
                timestamp,
                condition_code: entry.weather.first().map(|w| w.id),
                temperature_celsius: entry.main.temp,
            })
        })
        .collect()
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, query: &LookupQuery) -> Result<CurrentLookup, ProviderError> {
        let body = self.fetch(CURRENT, query).await?;
        parse_current(&body)
    }

    async fn forecast(&self, query: &LookupQuery) -> Result<Vec<ForecastSample>, ProviderError> {
        let body = self.fetch(FORECAST, query).await?;
        parse_forecast(&body)
    }
}
