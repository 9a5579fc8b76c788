//! Condition code → display icon.
//!
//! Codes follow OpenWeather's grouping: 2xx thunderstorm, 3xx drizzle,
//! 5xx rain, 6xx snow, 7xx atmosphere, 800 clear, 80x clouds.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconId {
    Thunderstorm,
    Drizzle,
    Rain,
    Snow,
    Atmosphere,
    Clear,
    Clouds,
}

impl IconId {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconId::Thunderstorm => "thunderstorm",
            IconId::Drizzle => "drizzle",
            IconId::Rain => "rain",
            IconId::Snow => "snow",
            IconId::Atmosphere => "atmosphere",
            IconId::Clear => "clear",
            IconId::Clouds => "clouds",
        }
    }

    /// File name of the matching asset under `assets/weather/`.
    pub fn asset_file(&self) -> String {
        format!("{}.svg", self.as_str())
    }

    /// Single-glyph stand-in for terminals.
    pub fn glyph(&self) -> &'static str {
        match self {
            IconId::Thunderstorm => "⛈",
            IconId::Drizzle => "🌦",
            IconId::Rain => "🌧",
            IconId::Snow => "❄",
            IconId::Atmosphere => "🌫",
            IconId::Clear => "☀",
            IconId::Clouds => "☁",
        }
    }

    pub const fn all() -> &'static [IconId] {
        &[
            IconId::Thunderstorm,
            IconId::Drizzle,
            IconId::Rain,
            IconId::Snow,
            IconId::Atmosphere,
            IconId::Clear,
            IconId::Clouds,
        ]
    }
}

impl std::fmt::Display for IconId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a condition code to its icon. Total: anything unmatched is clouds.
pub fn classify(code: i64) -> IconId {
    match code {
        ..=232 => IconId::Thunderstorm,
        ..=321 => IconId::Drizzle,
        ..=531 => IconId::Rain,
        ..=622 => IconId::Snow,
        ..=781 => IconId::Atmosphere,
        800 => IconId::Clear,
        _ => IconId::Clouds,
    }
}
