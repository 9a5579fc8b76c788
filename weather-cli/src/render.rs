//! Terminal drawing of the core view model.

use weather_core::{CurrentView, ForecastCard, Panel, ViewModel};

pub const PROMPT_MESSAGE: &str = "Search City\nFind out the weather conditions of the city";
pub const NOT_FOUND_MESSAGE: &str = "City Not Found\nPlease check the spelling and try again";
pub const LOADING_MESSAGE: &str = "Loading…";

/// The visible panel as plain text. The loading overlay is drawn separately.
pub fn render_view(view: &ViewModel) -> String {
    match view.panel {
        Panel::Prompt => PROMPT_MESSAGE.to_string(),
        Panel::NotFound => NOT_FOUND_MESSAGE.to_string(),
        Panel::Results => {
            let mut out = String::new();
            if let Some(current) = &view.current {
                out.push_str(&render_current(current));
            }
            if !view.forecast.is_empty() {
                out.push('\n');
                out.push_str(&render_forecast(&view.forecast));
            }
            out
        }
    }
}

fn render_current(current: &CurrentView) -> String {
    [
        format!("{}  {}", current.city, current.date),
        format!("{} {}  {}", current.icon.glyph(), current.temperature, current.condition),
        format!("Humidity {}  Wind Speed {}", current.humidity, current.wind_speed),
    ]
    .into_iter()
    .map(|line| line + "\n")
    .collect()
}

fn render_forecast(cards: &[ForecastCard]) -> String {
    cards
        .iter()
        .map(|card| format!("{:<7} {} {:>6}\n", card.date, card.icon.glyph(), card.temperature))
        .collect()
}
