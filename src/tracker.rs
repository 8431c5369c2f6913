//! Session state that keeps derived values in step with the inputs
//!
//! Every metric edit recomputes the stress score, today's history record,
//! the forecast and the recommendations, in that order. The new state is
//! assembled in full before it replaces the old one, so callers never see
//! a score from one edit next to a forecast from another.

use crate::error::Result;
use crate::export::StressReport;
use crate::forecast::{self, Forecast};
use crate::history::StressHistory;
use crate::model::StressModel;
use crate::models::{
    HistoricalDayRecord, LifestyleMetrics, MetricKind, Recommendation, RiskLevel, TODAY_LABEL,
};
use crate::noise::NoiseSource;
use crate::scoring::ScoreBreakdown;
use chrono::{Datelike, Local, Utc, Weekday};

/// Derived values for one set of metrics
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerState {
    pub metrics: LifestyleMetrics,
    pub breakdown: ScoreBreakdown,
    pub history: StressHistory,
    pub forecast: Forecast,
    pub risk_level: RiskLevel,
    pub recommendations: Vec<Recommendation>,
}

impl TrackerState {
    /// Current stress score (1-10)
    pub fn stress_score(&self) -> u8 {
        self.breakdown.score
    }
}

/// Owns the metrics and everything derived from them
pub struct StressTracker {
    model: StressModel,
    noise: Box<dyn NoiseSource>,
    today: Weekday,
    state: TrackerState,
}

impl StressTracker {
    /// Start a session for the local current weekday
    pub fn new(
        model: StressModel,
        metrics: LifestyleMetrics,
        history: StressHistory,
        noise: Box<dyn NoiseSource>,
    ) -> Result<Self> {
        Self::starting_on(model, Local::now().weekday(), metrics, history, noise)
    }

    /// Start a session for an explicit weekday
    pub fn starting_on(
        model: StressModel,
        today: Weekday,
        metrics: LifestyleMetrics,
        history: StressHistory,
        mut noise: Box<dyn NoiseSource>,
    ) -> Result<Self> {
        metrics.validate()?;
        let state = compute_state(&model, today, metrics.clamped(), history, noise.as_mut())?;
        Ok(Self {
            model,
            noise,
            today,
            state,
        })
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn metrics(&self) -> &LifestyleMetrics {
        &self.state.metrics
    }

    pub fn stress_score(&self) -> u8 {
        self.state.stress_score()
    }

    pub fn history(&self) -> &StressHistory {
        &self.state.history
    }

    pub fn today(&self) -> Weekday {
        self.today
    }

    /// Edit one metric and recompute
    ///
    /// On error the previous state is left untouched.
    pub fn update(&mut self, kind: MetricKind, value: f64) -> Result<&TrackerState> {
        let mut metrics = self.state.metrics;
        metrics.set(kind, value)?;
        self.replace_metrics(metrics)
    }

    /// Replace all metrics and recompute
    pub fn set_metrics(&mut self, metrics: LifestyleMetrics) -> Result<&TrackerState> {
        metrics.validate()?;
        self.replace_metrics(metrics.clamped())
    }

    /// Recompute with the current metrics, drawing fresh forecast noise
    pub fn refresh(&mut self) -> Result<&TrackerState> {
        self.replace_metrics(self.state.metrics)
    }

    /// Commit today into the history under its weekday name and move on
    /// to the next day, keeping the current metrics as its starting point
    pub fn close_day(&mut self) -> Result<HistoricalDayRecord> {
        let mut history = self.state.history.clone();
        let closed = history.close_day(self.today.to_string())?;

        let next_day = self.today.succ();
        let state = compute_state(
            &self.model,
            next_day,
            self.state.metrics,
            history,
            self.noise.as_mut(),
        )?;
        self.today = next_day;
        self.state = state;
        Ok(closed)
    }

    /// Snapshot of the current state for display or export
    pub fn report(&self) -> StressReport {
        let forecast = self.state.forecast.to_vec();
        StressReport {
            generated_at: Utc::now(),
            metrics: self.state.metrics,
            stress_score: self.state.stress_score(),
            breakdown: self.state.breakdown.clone(),
            history: self.state.history.records(),
            average_predicted: forecast::average_predicted(&forecast),
            forecast,
            risk_level: self.state.risk_level,
            recommendations: self.state.recommendations.clone(),
        }
    }

    /// End the session, handing back the history for persistence
    pub fn into_history(self) -> StressHistory {
        self.state.history
    }

    fn replace_metrics(&mut self, metrics: LifestyleMetrics) -> Result<&TrackerState> {
        let state = compute_state(
            &self.model,
            self.today,
            metrics,
            self.state.history.clone(),
            self.noise.as_mut(),
        )?;
        self.state = state;
        Ok(&self.state)
    }
}

/// Score, record, forecast and recommend, in that order
fn compute_state(
    model: &StressModel,
    today: Weekday,
    metrics: LifestyleMetrics,
    mut history: StressHistory,
    noise: &mut dyn NoiseSource,
) -> Result<TrackerState> {
    let breakdown = model.score_breakdown(&metrics);
    let score = breakdown.score;

    history.set_today(HistoricalDayRecord::from_metrics(TODAY_LABEL, score, &metrics))?;

    let records = history.records();
    let forecast = model.forecast_from(today, &records, score, noise);
    let risk_level = model.classify_risk(&forecast);
    let recommendations = model.recommend(&metrics, &forecast);

    tracing::info!(
        score,
        risk = %risk_level,
        recommendations = recommendations.len(),
        "Recomputed stress state"
    );

    Ok(TrackerState {
        metrics,
        breakdown,
        history,
        forecast,
        risk_level,
        recommendations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecommendationCategory;
    use crate::noise::NoNoise;

    fn record(label: &str, score: u8) -> HistoricalDayRecord {
        HistoricalDayRecord {
            label: label.to_string(),
            stress_score: score,
            sleep_hours: 7.0,
            exercise_sessions: 3.0,
            work_hours: 8.0,
        }
    }

    fn tracker(metrics: LifestyleMetrics, history: StressHistory) -> StressTracker {
        StressTracker::starting_on(
            StressModel::new(),
            Weekday::Mon,
            metrics,
            history,
            Box::new(NoNoise),
        )
        .unwrap()
    }

    #[test]
    fn test_initial_state_is_fully_derived() {
        let metrics = LifestyleMetrics::new(8.0, 4.0, 7.0, 1.0, 3.0).unwrap();
        let tracker = tracker(metrics, StressHistory::default());

        let state = tracker.state();
        assert_eq!(state.stress_score(), StressModel::new().score_current(&metrics));
        assert_eq!(state.history.today().unwrap().stress_score, state.stress_score());
        assert_eq!(state.forecast.len(), 7);
        assert_eq!(state.forecast[0].day_label, "Tue");
        assert!(state.recommendations.is_empty());
    }

    #[test]
    fn test_update_recomputes_everything() {
        let metrics = LifestyleMetrics::new(8.0, 4.0, 7.0, 1.0, 3.0).unwrap();
        let mut tracker = tracker(metrics, StressHistory::default());
        let before = tracker.stress_score();

        let state = tracker.update(MetricKind::Sleep, 3.0).unwrap();
        assert!(state.stress_score() > before);
        assert_eq!(state.history.today().unwrap().sleep_hours, 3.0);
        assert_eq!(state.history.today().unwrap().stress_score, state.stress_score());
        assert_eq!(
            state.recommendations.iter().map(|r| r.category).collect::<Vec<_>>(),
            vec![RecommendationCategory::Sleep]
        );
        // Today is replaced, never stacked
        assert_eq!(state.history.len(), 1);
    }

    #[test]
    fn test_failed_update_keeps_previous_state() {
        let mut tracker = tracker(LifestyleMetrics::default(), StressHistory::default());
        let before = tracker.state().clone();

        assert!(tracker.update(MetricKind::Work, f64::NAN).is_err());
        assert_eq!(tracker.state(), &before);
    }

    #[test]
    fn test_out_of_domain_update_is_clamped() {
        let mut tracker = tracker(LifestyleMetrics::default(), StressHistory::default());
        tracker.update(MetricKind::Caffeine, 40.0).unwrap();
        assert_eq!(tracker.metrics().caffeine_cups, 5.0);
    }

    #[test]
    fn test_history_trend_feeds_forecast() {
        let history =
            StressHistory::with_records(7, vec![record("Fri", 2), record("Sat", 3)]).unwrap();
        // Scores 10 today: trend over [2, 3, 10] = 8 / 3
        let metrics = LifestyleMetrics::new(0.0, 0.0, 14.0, 5.0, 0.0).unwrap();
        let tracker = tracker(metrics, history);

        let state = tracker.state();
        assert_eq!(state.stress_score(), 10);
        assert!(state.forecast.iter().all(|e| e.predicted_score == 10));
        assert_eq!(state.risk_level, RiskLevel::High);
        assert_eq!(state.recommendations[0].category, RecommendationCategory::Warning);
    }

    #[test]
    fn test_close_day_advances_weekday() {
        let mut tracker = tracker(LifestyleMetrics::default(), StressHistory::default());
        let score = tracker.stress_score();

        let closed = tracker.close_day().unwrap();
        assert_eq!(closed.label, "Mon");
        assert_eq!(closed.stress_score, score);
        assert_eq!(tracker.today(), Weekday::Tue);
        assert_eq!(tracker.state().forecast[0].day_label, "Wed");

        let records = tracker.history().records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].label, "Mon");
        assert_eq!(records[1].label, TODAY_LABEL);
    }

    #[test]
    fn test_report_matches_state() {
        let tracker = tracker(
            LifestyleMetrics::new(5.0, 2.0, 9.0, 3.0, 1.0).unwrap(),
            StressHistory::default(),
        );
        let report = tracker.report();
        assert_eq!(report.stress_score, tracker.stress_score());
        assert_eq!(report.forecast, tracker.state().forecast.to_vec());
        assert_eq!(report.history.len(), 1);
        assert_eq!(report.recommendations, tracker.state().recommendations);
        assert!(report.average_predicted.is_some());
    }

    #[test]
    fn test_into_history_keeps_today() {
        let tracker = tracker(LifestyleMetrics::default(), StressHistory::default());
        let history = tracker.into_history();
        assert!(history.today().is_some());
    }
}
