//! Stress model facade
//!
//! `StressModel` holds the scoring weights and exposes scoring, forecasting,
//! risk classification and recommendations as one object.

use crate::forecast::{self, Forecast};
use crate::models::{ForecastEntry, HistoricalDayRecord, LifestyleMetrics, Recommendation, RiskLevel};
use crate::noise::NoiseSource;
use crate::recommendations;
use crate::scoring::{self, ScoreBreakdown, ScoringWeights};
use chrono::Weekday;

/// Core stress model: scoring, forecasting, risk and recommendations
///
/// Holds only immutable coefficients, so one instance can be shared
/// freely. Every operation is a pure function of its arguments apart from
/// the noise drawn by [`StressModel::forecast`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StressModel {
    weights: ScoringWeights,
}

impl StressModel {
    /// Create a model with the default weights
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a model with custom weights
    pub fn with_weights(weights: ScoringWeights) -> Self {
        StressModel { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Current stress score (1-10)
    pub fn score_current(&self, metrics: &LifestyleMetrics) -> u8 {
        scoring::score_current(metrics, &self.weights)
    }

    /// Current stress score with per-factor contributions
    pub fn score_breakdown(&self, metrics: &LifestyleMetrics) -> ScoreBreakdown {
        scoring::score_breakdown(metrics, &self.weights)
    }

    /// Seven-day forecast starting after the local current date
    pub fn forecast<N>(
        &self,
        history: &[HistoricalDayRecord],
        current_score: u8,
        noise: &mut N,
    ) -> Forecast
    where
        N: NoiseSource + ?Sized,
    {
        forecast::forecast(history, current_score, noise)
    }

    /// Seven-day forecast starting after `today`
    pub fn forecast_from<N>(
        &self,
        today: Weekday,
        history: &[HistoricalDayRecord],
        current_score: u8,
        noise: &mut N,
    ) -> Forecast
    where
        N: NoiseSource + ?Sized,
    {
        forecast::forecast_from(today, history, current_score, noise)
    }

    /// Risk level of a forecast
    pub fn classify_risk(&self, forecast: &[ForecastEntry]) -> RiskLevel {
        forecast::classify_risk(forecast)
    }

    /// Recommendations for the given metrics and forecast
    pub fn recommend(
        &self,
        metrics: &LifestyleMetrics,
        forecast: &[ForecastEntry],
    ) -> Vec<Recommendation> {
        recommendations::recommend(metrics, forecast)
    }
}
