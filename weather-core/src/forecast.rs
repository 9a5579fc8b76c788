use chrono::{NaiveDate, NaiveDateTime, Timelike};
use thiserror::Error;

use crate::model::{ForecastEntry, ForecastSample};

/// A selected midday slot came without a weather condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("forecast for {date} has no weather condition")]
pub struct MissingCondition {
    pub date: NaiveDate,
}

/// Hour of the slot used as the representative sample for a day.
pub const MIDDAY_HOUR: u32 = 12;

fn is_midday(ts: &NaiveDateTime) -> bool {
    ts.hour() == MIDDAY_HOUR && ts.minute() == 0 && ts.second() == 0
}

/// Pick the midday sample of every day other than `today`, in input order.
///
/// Only the selected samples need a condition code; other slots may lack one.
pub fn select_midday(
    samples: &[ForecastSample],
    today: NaiveDate,
) -> Result<Vec<ForecastEntry>, MissingCondition> {
    samples
        .iter()
        .filter(|s| is_midday(&s.timestamp) && s.timestamp.date() != today)
        .map(|s| -> Result<ForecastEntry, MissingCondition> {
            let date = s.timestamp.date();
            Ok(ForecastEntry {
                date,
                condition_code: s.condition_code.ok_or(MissingCondition { date })?,
                temperature_celsius: s.temperature_celsius,
            })
        })
        .collect()
}
