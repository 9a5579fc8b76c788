//! View model and render functions.
//!
//! Rendering is pure: domain values go in, display-ready text comes out.
//! Whoever draws the view (terminal, web page, tests) only reads a [`ViewModel`].

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    icon::{IconId, classify},
    model::{CurrentConditions, ForecastEntry},
};

/// The mutually exclusive panel currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Panel {
    /// Nothing searched yet.
    #[default]
    Prompt,
    Results,
    NotFound,
}

/// Rendered current conditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentView {
    pub city: String,
    pub temperature: String,
    pub condition: String,
    pub humidity: String,
    pub wind_speed: String,
    pub date: String,
    pub icon: IconId,
}

/// One rendered forecast day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastCard {
    pub date: String,
    pub icon: IconId,
    pub temperature: String,
}

/// Everything a front-end needs to draw the widget.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewModel {
    pub panel: Panel,
    /// Loading overlay; orthogonal to `panel`.
    pub loading: bool,
    pub current: Option<CurrentView>,
    pub forecast: Vec<ForecastCard>,
}

impl ViewModel {
    pub fn show(&mut self, panel: Panel) {
        self.panel = panel;
    }
}

/// Nearest whole degree, halves rounding up: `15.7` → `"16 °C"`, `-2.5` → `"-2 °C"`.
pub fn format_temperature(celsius: f64) -> String {
    format!("{} °C", (celsius + 0.5).floor() as i64)
}

pub fn format_humidity(percent: u8) -> String {
    format!("{percent}%")
}

pub fn format_wind_speed(mps: f64) -> String {
    format!("{mps} M/s")
}

/// `"Sun, 18 Oct"`.
pub fn format_current_date(date: NaiveDate) -> String {
    date.format("%a, %d %b").to_string()
}

/// `"Oct 19"`.
pub fn format_forecast_date(date: NaiveDate) -> String {
    format!("{} {:02}", date.format("%b"), date.day())
}

pub fn render_current(conditions: &CurrentConditions, today: NaiveDate) -> CurrentView {
    CurrentView {
        city: conditions.city_name.clone(),
        temperature: format_temperature(conditions.temperature_celsius),
        condition: conditions.condition_label.clone(),
        humidity: format_humidity(conditions.humidity_percent),
        wind_speed: format_wind_speed(conditions.wind_speed_mps),
        date: format_current_date(today),
        icon: classify(conditions.condition_code),
    }
}

pub fn render_forecast(entries: &[ForecastEntry]) -> Vec<ForecastCard> {
    entries
        .iter()
        .map(|e| ForecastCard {
            date: format_forecast_date(e.date),
            icon: classify(e.condition_code),
            temperature: format_temperature(e.temperature_celsius),
        })
        .collect()
}
