//! Seven-day stress forecast and risk classification
//!
//! The forecast extends the current score along the recent trend:
//!
//! ```text
//! trend     = (latest - earliest) / samples        over the last 3 days
//! predicted = round(clamp(current + trend × i + noise, 1, 10))
//! confidence = max(60, 95 - 5 × i)
//! ```
//!
//! for `i` in 1..=7 days ahead. Noise comes from a [`NoiseSource`] so the
//! sequence can be pinned in tests.

use crate::models::{ForecastEntry, HistoricalDayRecord, RiskLevel};
use crate::noise::NoiseSource;
use crate::scoring::{MAX_SCORE, MIN_SCORE};
use chrono::{Datelike, Local, Weekday};

/// Days in the forecast horizon
pub const FORECAST_DAYS: usize = 7;

/// History samples used to estimate the trend
pub const TREND_WINDOW: usize = 3;

/// Confidence for the first forecast day before decay
pub const BASE_CONFIDENCE: u8 = 95;

/// Confidence lost per day ahead
pub const CONFIDENCE_DECAY_PER_DAY: u8 = 5;

/// Confidence floor
pub const MIN_CONFIDENCE: u8 = 60;

/// A full forecast horizon, soonest day first
pub type Forecast = [ForecastEntry; FORECAST_DAYS];

/// Slope of the stress score over the last few history entries
///
/// Returns 0 when fewer than two samples are available.
pub fn trend(history: &[HistoricalDayRecord]) -> f64 {
    let start = history.len().saturating_sub(TREND_WINDOW);
    let recent = &history[start..];

    match (recent.first(), recent.last()) {
        (Some(earliest), Some(latest)) if recent.len() > 1 => {
            (latest.stress_score as f64 - earliest.stress_score as f64) / recent.len() as f64
        }
        _ => 0.0,
    }
}

/// Confidence for a prediction `days_ahead` days out
pub fn confidence_for_day(days_ahead: usize) -> u8 {
    let decay = (CONFIDENCE_DECAY_PER_DAY as usize).saturating_mul(days_ahead);
    let confidence = (BASE_CONFIDENCE as usize).saturating_sub(decay);
    confidence.max(MIN_CONFIDENCE as usize) as u8
}

/// Weekday `days_ahead` days after `today`
pub fn weekday_after(today: Weekday, days_ahead: usize) -> Weekday {
    (0..days_ahead % 7).fold(today, |day, _| day.succ())
}

/// Forecast the next seven days starting after `today`
pub fn forecast_from<N>(
    today: Weekday,
    history: &[HistoricalDayRecord],
    current_score: u8,
    noise: &mut N,
) -> Forecast
where
    N: NoiseSource + ?Sized,
{
    let current = current_score.clamp(MIN_SCORE, MAX_SCORE) as f64;
    let slope = trend(history);

    let forecast: Forecast = std::array::from_fn(|index| {
        let days_ahead = index + 1;
        let raw = current + slope * days_ahead as f64 + noise.sample();
        let clamped = if raw.is_nan() {
            current
        } else {
            raw.clamp(MIN_SCORE as f64, MAX_SCORE as f64)
        };

        ForecastEntry {
            day_label: weekday_after(today, days_ahead).to_string(),
            predicted_score: clamped.round() as u8,
            confidence_percent: confidence_for_day(days_ahead),
        }
    });

    tracing::debug!(
        current_score,
        trend = slope,
        samples = history.len().min(TREND_WINDOW),
        "Generated stress forecast"
    );

    forecast
}

/// Forecast the next seven days starting after the local current date
pub fn forecast<N>(history: &[HistoricalDayRecord], current_score: u8, noise: &mut N) -> Forecast
where
    N: NoiseSource + ?Sized,
{
    forecast_from(Local::now().weekday(), history, current_score, noise)
}

/// Mean predicted score across the forecast
///
/// Summed as integers so boundary means such as exactly 7.0 stay exact.
pub fn average_predicted(forecast: &[ForecastEntry]) -> Option<f64> {
    if forecast.is_empty() {
        return None;
    }
    let total: u32 = forecast.iter().map(|entry| entry.predicted_score as u32).sum();
    Some(total as f64 / forecast.len() as f64)
}

/// Classify the forecast by its mean predicted score
///
/// An empty forecast carries no risk signal and classifies as low.
pub fn classify_risk(forecast: &[ForecastEntry]) -> RiskLevel {
    average_predicted(forecast)
        .map(RiskLevel::from_average)
        .unwrap_or(RiskLevel::Low)
}
