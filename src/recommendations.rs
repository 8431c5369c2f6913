//! Recommendation rules over the current metrics and forecast
//!
//! Each rule fires independently. Output order is fixed: warning, sleep,
//! exercise, work.

use crate::models::{ForecastEntry, LifestyleMetrics, Recommendation, RecommendationCategory};

/// Predicted score at which a forecast day counts as high stress
pub const HIGH_STRESS_SCORE: u8 = 7;

/// High-stress forecast days needed to raise the warning
pub const HIGH_STRESS_DAY_THRESHOLD: usize = 3;

/// Sleep below this many hours triggers the sleep recommendation
pub const MIN_HEALTHY_SLEEP_HOURS: f64 = 6.0;

/// Fewer weekly sessions than this triggers the exercise recommendation
pub const MIN_EXERCISE_SESSIONS: f64 = 3.0;

/// Working more hours than this triggers the work recommendation
pub const MAX_HEALTHY_WORK_HOURS: f64 = 8.0;

/// Number of forecast days at or above the high-stress score
pub fn high_stress_days(forecast: &[ForecastEntry]) -> usize {
    forecast
        .iter()
        .filter(|entry| entry.predicted_score >= HIGH_STRESS_SCORE)
        .count()
}

/// Derive recommendations from today's metrics and the forecast
pub fn recommend(metrics: &LifestyleMetrics, forecast: &[ForecastEntry]) -> Vec<Recommendation> {
    let rules = [
        (
            RecommendationCategory::Warning,
            high_stress_days(forecast) >= HIGH_STRESS_DAY_THRESHOLD,
        ),
        (
            RecommendationCategory::Sleep,
            metrics.sleep_hours < MIN_HEALTHY_SLEEP_HOURS,
        ),
        (
            RecommendationCategory::Exercise,
            metrics.exercise_sessions < MIN_EXERCISE_SESSIONS,
        ),
        (
            RecommendationCategory::Work,
            metrics.work_hours > MAX_HEALTHY_WORK_HOURS,
        ),
    ];

    let recommendations: Vec<Recommendation> = rules
        .into_iter()
        .filter(|(_, fired)| *fired)
        .map(|(category, _)| Recommendation::from(category))
        .collect();

    tracing::debug!(count = recommendations.len(), "Derived recommendations");

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forecast_with(scores: &[u8]) -> Vec<ForecastEntry> {
        scores
            .iter()
            .map(|&score| ForecastEntry {
                day_label: "Mon".to_string(),
                predicted_score: score,
                confidence_percent: 90,
            })
            .collect()
    }

    fn metrics(sleep: f64, exercise: f64, work: f64) -> LifestyleMetrics {
        LifestyleMetrics {
            sleep_hours: sleep,
            exercise_sessions: exercise,
            work_hours: work,
            caffeine_cups: 1.0,
            social_hours: 3.0,
        }
    }

    fn categories(recs: &[Recommendation]) -> Vec<RecommendationCategory> {
        recs.iter().map(|r| r.category).collect()
    }

    #[test]
    fn test_healthy_week_has_no_recommendations() {
        let forecast = forecast_with(&[7, 7, 5, 5, 5, 5, 5]);
        assert!(recommend(&metrics(8.0, 4.0, 7.0), &forecast).is_empty());
    }

    #[test]
    fn test_short_sleep_only() {
        let forecast = forecast_with(&[4; 7]);
        let recs = recommend(&metrics(5.0, 4.0, 7.0), &forecast);
        assert_eq!(categories(&recs), vec![RecommendationCategory::Sleep]);
        assert_eq!(recs[0].title, "Improve Sleep Quality");
    }

    #[test]
    fn test_warning_needs_three_high_days() {
        let two = forecast_with(&[9, 9, 6, 6, 6, 6, 6]);
        assert!(recommend(&metrics(8.0, 4.0, 7.0), &two).is_empty());

        let three = forecast_with(&[9, 6, 7, 6, 6, 6, 10]);
        let recs = recommend(&metrics(8.0, 4.0, 7.0), &three);
        assert_eq!(categories(&recs), vec![RecommendationCategory::Warning]);
        assert_eq!(recs[0].title, "High Stress Pattern Detected");
    }

    #[test]
    fn test_all_rules_fire_in_order() {
        let forecast = forecast_with(&[8; 7]);
        let recs = recommend(&metrics(4.0, 1.0, 11.0), &forecast);
        assert_eq!(
            categories(&recs),
            vec![
                RecommendationCategory::Warning,
                RecommendationCategory::Sleep,
                RecommendationCategory::Exercise,
                RecommendationCategory::Work,
            ]
        );
    }

    #[test]
    fn test_thresholds_are_strict() {
        let forecast = forecast_with(&[5; 7]);
        // exactly 6h sleep, 3 sessions, 8h work: nothing fires
        assert!(recommend(&metrics(6.0, 3.0, 8.0), &forecast).is_empty());

        let recs = recommend(&metrics(5.5, 2.0, 9.0), &forecast);
        assert_eq!(
            categories(&recs),
            vec![
                RecommendationCategory::Sleep,
                RecommendationCategory::Exercise,
                RecommendationCategory::Work,
            ]
        );
    }

    #[test]
    fn test_high_stress_days_count() {
        assert_eq!(high_stress_days(&forecast_with(&[6, 7, 8, 2, 10, 1, 7])), 4);
        assert_eq!(high_stress_days(&[]), 0);
    }
}
