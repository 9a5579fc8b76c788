use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when a lookup is attempted with a blank city name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("city name must not be empty")]
pub struct EmptyQuery;

/// A trimmed, non-empty city name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupQuery(String);

impl LookupQuery {
    pub fn parse(raw: &str) -> Result<Self, EmptyQuery> {
        let city = raw.trim();
        if city.is_empty() {
            return Err(EmptyQuery);
        }
        Ok(Self(city.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LookupQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for LookupQuery {
    type Error = EmptyQuery;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

/// Current conditions for one city, as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub city_name: String,
    pub temperature_celsius: f64,
    pub condition_label: String,
    pub condition_code: i64,
    pub humidity_percent: u8,
    pub wind_speed_mps: f64,
    pub observed_at: Option<DateTime<Utc>>,
}

/// Result of a current-conditions request that reached the provider.
#[derive(Debug, Clone, PartialEq)]
pub enum CurrentLookup {
    Found(CurrentConditions),
    /// The provider answered, but does not know the city.
    NotFound { message: String },
}

/// One raw item of the provider's forecast list (fixed 3-hour slots, UTC).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub timestamp: NaiveDateTime,
    /// Absent when the provider sent no weather condition for the slot.
    pub condition_code: Option<i64>,
    pub temperature_celsius: f64,
}

/// The representative forecast for one future calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub date: NaiveDate,
    pub condition_code: i64,
    pub temperature_celsius: f64,
}
