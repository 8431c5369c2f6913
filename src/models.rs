//! Core data types for the stress model
//!
//! Lifestyle inputs, the rolling day history and the forecast and
//! recommendation outputs that the presentation layer consumes.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Label carried by the history record of the day being edited
pub const TODAY_LABEL: &str = "Today";

/// Errors raised when metric input violates its contract
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricValidationError {
    #[error("{metric} must be a finite number, got {value}")]
    NonFinite { metric: MetricKind, value: f64 },
}

/// The five user-editable lifestyle metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Sleep,
    Exercise,
    Work,
    Caffeine,
    Social,
}

impl MetricKind {
    /// All metrics in scoring order
    pub const ALL: [MetricKind; 5] = [
        MetricKind::Sleep,
        MetricKind::Exercise,
        MetricKind::Work,
        MetricKind::Caffeine,
        MetricKind::Social,
    ];

    /// Valid input domain (inclusive)
    pub fn domain(&self) -> (f64, f64) {
        match self {
            MetricKind::Sleep => (0.0, 12.0),
            MetricKind::Exercise => (0.0, 7.0),
            MetricKind::Work => (0.0, 14.0),
            MetricKind::Caffeine => (0.0, 5.0),
            MetricKind::Social => (0.0, 10.0),
        }
    }

    /// Input granularity used by sliders and forms
    pub fn step(&self) -> f64 {
        match self {
            MetricKind::Sleep | MetricKind::Caffeine | MetricKind::Social => 0.5,
            MetricKind::Exercise | MetricKind::Work => 1.0,
        }
    }

    /// Range the raw value is divided by when normalizing to [0, 1]
    ///
    /// Work saturates at 12 hours and caffeine at 5 cups even though the
    /// work domain extends to 14.
    pub fn normalization_range(&self) -> f64 {
        match self {
            MetricKind::Sleep | MetricKind::Exercise | MetricKind::Social => 10.0,
            MetricKind::Work => 12.0,
            MetricKind::Caffeine => 5.0,
        }
    }

    /// Unit shown next to values
    pub fn unit(&self) -> &'static str {
        match self {
            MetricKind::Sleep | MetricKind::Work | MetricKind::Social => "hours",
            MetricKind::Exercise => "sessions/week",
            MetricKind::Caffeine => "cups",
        }
    }

    /// Clamp a value into this metric's domain
    pub fn clamp(&self, value: f64) -> f64 {
        let (min, max) = self.domain();
        value.clamp(min, max)
    }

    /// Round a value to the nearest input step
    pub fn snap_to_step(&self, value: f64) -> f64 {
        let step = self.step();
        (value / step).round() * step
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricKind::Sleep => write!(f, "Sleep"),
            MetricKind::Exercise => write!(f, "Exercise"),
            MetricKind::Work => write!(f, "Work"),
            MetricKind::Caffeine => write!(f, "Caffeine"),
            MetricKind::Social => write!(f, "Social time"),
        }
    }
}

/// Current-day lifestyle input
///
/// The stress score is not part of this type: it is always derived from
/// these five fields and never set by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LifestyleMetrics {
    /// Hours slept last night (0-12)
    pub sleep_hours: f64,

    /// Exercise sessions per week (0-7)
    pub exercise_sessions: f64,

    /// Hours worked (0-14)
    pub work_hours: f64,

    /// Cups of coffee or equivalent (0-5)
    pub caffeine_cups: f64,

    /// Hours spent socializing (0-10)
    pub social_hours: f64,
}

impl Default for LifestyleMetrics {
    fn default() -> Self {
        Self {
            sleep_hours: 7.0,
            exercise_sessions: 3.0,
            work_hours: 8.0,
            caffeine_cups: 2.0,
            social_hours: 3.0,
        }
    }
}

impl LifestyleMetrics {
    /// Create metrics from raw input, clamping each field into its domain
    ///
    /// Non-finite values are rejected rather than clamped.
    pub fn new(
        sleep_hours: f64,
        exercise_sessions: f64,
        work_hours: f64,
        caffeine_cups: f64,
        social_hours: f64,
    ) -> Result<Self, MetricValidationError> {
        let raw = Self {
            sleep_hours,
            exercise_sessions,
            work_hours,
            caffeine_cups,
            social_hours,
        };
        raw.validate()?;
        Ok(raw.clamped())
    }

    /// Read a single metric
    pub fn get(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::Sleep => self.sleep_hours,
            MetricKind::Exercise => self.exercise_sessions,
            MetricKind::Work => self.work_hours,
            MetricKind::Caffeine => self.caffeine_cups,
            MetricKind::Social => self.social_hours,
        }
    }

    /// Apply a single edit, clamped into the metric's domain
    pub fn set(&mut self, kind: MetricKind, value: f64) -> Result<(), MetricValidationError> {
        if !value.is_finite() {
            return Err(MetricValidationError::NonFinite {
                metric: kind,
                value,
            });
        }

        let clamped = kind.clamp(value);
        if clamped != value {
            tracing::warn!(metric = %kind, value, clamped, "Metric outside its domain, clamping");
        }

        match kind {
            MetricKind::Sleep => self.sleep_hours = clamped,
            MetricKind::Exercise => self.exercise_sessions = clamped,
            MetricKind::Work => self.work_hours = clamped,
            MetricKind::Caffeine => self.caffeine_cups = clamped,
            MetricKind::Social => self.social_hours = clamped,
        }
        Ok(())
    }

    /// Reject NaN and infinite fields
    pub fn validate(&self) -> Result<(), MetricValidationError> {
        for kind in MetricKind::ALL {
            let value = self.get(kind);
            if !value.is_finite() {
                return Err(MetricValidationError::NonFinite {
                    metric: kind,
                    value,
                });
            }
        }
        Ok(())
    }

    /// Copy with every field clamped into its domain
    pub fn clamped(&self) -> Self {
        let mut out = *self;
        for kind in MetricKind::ALL {
            let value = self.get(kind);
            let clamped = kind.clamp(value);
            if clamped != value {
                tracing::warn!(metric = %kind, value, clamped, "Metric outside its domain, clamping");
            }
            match kind {
                MetricKind::Sleep => out.sleep_hours = clamped,
                MetricKind::Exercise => out.exercise_sessions = clamped,
                MetricKind::Work => out.work_hours = clamped,
                MetricKind::Caffeine => out.caffeine_cups = clamped,
                MetricKind::Social => out.social_hours = clamped,
            }
        }
        out
    }

    /// Copy with every field rounded to its input step
    pub fn snapped(&self) -> Self {
        Self {
            sleep_hours: MetricKind::Sleep.snap_to_step(self.sleep_hours),
            exercise_sessions: MetricKind::Exercise.snap_to_step(self.exercise_sessions),
            work_hours: MetricKind::Work.snap_to_step(self.work_hours),
            caffeine_cups: MetricKind::Caffeine.snap_to_step(self.caffeine_cups),
            social_hours: MetricKind::Social.snap_to_step(self.social_hours),
        }
    }
}

/// One day in the stress history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalDayRecord {
    /// Day label (weekday name, date, or "Today")
    pub label: String,

    /// Derived stress score for that day (1-10)
    pub stress_score: u8,

    pub sleep_hours: f64,
    pub exercise_sessions: f64,
    pub work_hours: f64,
}

impl HistoricalDayRecord {
    /// Snapshot a day's metrics together with its derived score
    pub fn from_metrics(label: impl Into<String>, stress_score: u8, metrics: &LifestyleMetrics) -> Self {
        Self {
            label: label.into(),
            stress_score,
            sleep_hours: metrics.sleep_hours,
            exercise_sessions: metrics.exercise_sessions,
            work_hours: metrics.work_hours,
        }
    }

    /// Same record under a different label
    pub fn relabeled(&self, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..self.clone()
        }
    }
}

/// Predicted stress for one day of the forecast horizon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Weekday name the prediction applies to
    pub day_label: String,

    /// Predicted stress score (1-10)
    pub predicted_score: u8,

    /// Confidence in the prediction (60-95)
    pub confidence_percent: u8,
}

/// Coarse classification of the average forecasted stress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Classify a mean predicted score
    pub fn from_average(average: f64) -> Self {
        if average >= 7.0 {
            RiskLevel::High
        } else if average >= 5.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Stress is expected to stay manageable this week",
            RiskLevel::Medium => "Moderate stress expected, keep an eye on recovery",
            RiskLevel::High => "High stress expected, plan rest and support now",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

/// Recommendation categories, in the order they are emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationCategory {
    Warning,
    Sleep,
    Exercise,
    Work,
}

impl RecommendationCategory {
    pub fn title(&self) -> &'static str {
        match self {
            RecommendationCategory::Warning => "High Stress Pattern Detected",
            RecommendationCategory::Sleep => "Improve Sleep Quality",
            RecommendationCategory::Exercise => "Increase Physical Activity",
            RecommendationCategory::Work => "Work-Life Balance",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RecommendationCategory::Warning => {
                "Your forecast shows several high-stress days ahead. Schedule relaxation time and consider lightening your commitments."
            }
            RecommendationCategory::Sleep => {
                "Aim for 7-9 hours of sleep. Keep a consistent bedtime and avoid screens before bed."
            }
            RecommendationCategory::Exercise => {
                "Try to exercise at least 3 times a week. Even a short walk helps lower stress."
            }
            RecommendationCategory::Work => {
                "You are working long hours. Take regular breaks and set clear boundaries between work and personal time."
            }
        }
    }
}

impl fmt::Display for RecommendationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecommendationCategory::Warning => write!(f, "warning"),
            RecommendationCategory::Sleep => write!(f, "sleep"),
            RecommendationCategory::Exercise => write!(f, "exercise"),
            RecommendationCategory::Work => write!(f, "work"),
        }
    }
}

/// Actionable advice derived from metrics and forecast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: RecommendationCategory,
    pub title: String,
    pub description: String,
}

impl From<RecommendationCategory> for Recommendation {
    fn from(category: RecommendationCategory) -> Self {
        Self {
            category,
            title: category.title().to_string(),
            description: category.description().to_string(),
        }
    }
}
