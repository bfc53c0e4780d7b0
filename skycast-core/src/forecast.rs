//! Reduction of the 3-hourly forecast feed to one entry per day.

use chrono::{NaiveDateTime, Timelike};

use crate::model::DailyForecastEntry;

/// One point of the 3-hour forecast feed.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSample {
    pub timestamp: NaiveDateTime,
    pub temperature_c: f64,
    pub description: String,
    pub icon: String,
}

/// Number of daily cards the display has room for.
pub const FORECAST_DAYS: usize = 5;

fn is_midday(ts: &NaiveDateTime) -> bool {
    ts.hour() == 12 && ts.minute() == 0 && ts.second() == 0 && ts.nanosecond() == 0
}

/// Keep the 12:00:00 sample of every date, in the order dates first appear.
///
/// Dates with no midday sample are left out. If a date carries several
/// midday samples the last one wins, but the date keeps its first position.
pub fn midday_entries(samples: &[ForecastSample]) -> Vec<DailyForecastEntry> {
    let mut days: Vec<DailyForecastEntry> = Vec::new();

    for sample in samples.iter().filter(|s| is_midday(&s.timestamp)) {
        let date = sample.timestamp.date();
        let entry = DailyForecastEntry {
            day: date.format("%a").to_string(),
            date,
            temperature_c: sample.temperature_c,
            description: sample.description.clone(),
            icon: sample.icon.clone(),
        };

        match days.iter_mut().find(|d| d.date == date) {
            Some(existing) => *existing = entry,
            None => days.push(entry),
        }
    }

    days
}
