//! Weighted-factor stress scoring
//!
//! The score is a transparent linear model rather than a trained one, so
//! every point of it can be traced back to a single lifestyle factor.
//!
//! # Model
//!
//! Each metric is normalized to its position in a fixed range,
//! `clamp(value / range, 0, 1)`, and contributes `weight × normalized × 10`
//! on top of a baseline of 5:
//!
//! | Factor   | Range | Weight |
//! |----------|-------|--------|
//! | Sleep    | 10 h  | −0.8   |
//! | Exercise | 10    | −0.6   |
//! | Work     | 12 h  | +0.7   |
//! | Caffeine | 5     | +0.4   |
//! | Social   | 10 h  | −0.5   |
//!
//! Negative weights mark protective factors: more sleep, exercise and
//! social time lower the score. The result is rounded and clamped to 1-10.

use crate::error::StressCastError;
use crate::models::{LifestyleMetrics, MetricKind};
use serde::{Deserialize, Serialize};

/// Lowest possible stress score
pub const MIN_SCORE: u8 = 1;

/// Highest possible stress score
pub const MAX_SCORE: u8 = 10;

/// Scale applied to every weighted, normalized factor
const FACTOR_SCALE: f64 = 10.0;

/// Linear model coefficients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Score before any factor is applied
    pub baseline: f64,
    pub sleep: f64,
    pub exercise: f64,
    pub work: f64,
    pub caffeine: f64,
    pub social: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            baseline: 5.0,
            sleep: -0.8,
            exercise: -0.6,
            work: 0.7,
            caffeine: 0.4,
            social: -0.5,
        }
    }
}

impl ScoringWeights {
    /// Weight applied to a metric
    pub fn weight(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::Sleep => self.sleep,
            MetricKind::Exercise => self.exercise,
            MetricKind::Work => self.work,
            MetricKind::Caffeine => self.caffeine,
            MetricKind::Social => self.social,
        }
    }

    /// Every coefficient must be a finite number
    pub fn validate(&self) -> Result<(), StressCastError> {
        if !self.baseline.is_finite() {
            return Err(StressCastError::Configuration(format!(
                "scoring baseline must be finite, got {}",
                self.baseline
            )));
        }
        for kind in MetricKind::ALL {
            let weight = self.weight(kind);
            if !weight.is_finite() {
                return Err(StressCastError::Configuration(format!(
                    "{} weight must be finite, got {}",
                    kind, weight
                )));
            }
        }
        Ok(())
    }
}

/// One factor's share of the score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorContribution {
    pub metric: MetricKind,

    /// Raw metric value as scored
    pub value: f64,

    /// Position of the value in the metric's normalization range (0-1)
    pub normalized: f64,

    pub weight: f64,

    /// Points added to (or removed from) the baseline
    pub contribution: f64,
}

impl FactorContribution {
    /// Shortfall from the top of the range (0-1)
    ///
    /// For protective factors this reads as "how much sleep/exercise/social
    /// time is missing".
    pub fn deficit(&self) -> f64 {
        1.0 - self.normalized
    }
}

/// Full explanation of a stress score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Contributions in scoring order
    pub factors: Vec<FactorContribution>,

    /// Unrounded, unclamped model output
    pub raw_score: f64,

    /// Final score (1-10)
    pub score: u8,
}

impl ScoreBreakdown {
    /// Factor pushing the score upwards the most, if any does
    pub fn main_stressor(&self) -> Option<&FactorContribution> {
        self.factors
            .iter()
            .filter(|f| f.contribution > 0.0)
            .max_by(|a, b| a.contribution.total_cmp(&b.contribution))
    }

    /// Factor pulling the score downwards the most, if any does
    pub fn main_relief(&self) -> Option<&FactorContribution> {
        self.factors
            .iter()
            .filter(|f| f.contribution < 0.0)
            .min_by(|a, b| a.contribution.total_cmp(&b.contribution))
    }
}

/// Normalize a metric to [0, 1]; non-finite results count as 0
pub fn normalize(kind: MetricKind, value: f64) -> f64 {
    let normalized = (value / kind.normalization_range()).clamp(0.0, 1.0);
    if normalized.is_nan() {
        0.0
    } else {
        normalized
    }
}

/// Round and clamp a raw model output into the score range
pub fn to_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return MIN_SCORE;
    }
    raw.round().clamp(MIN_SCORE as f64, MAX_SCORE as f64) as u8
}

/// Score the metrics and explain every factor
pub fn score_breakdown(metrics: &LifestyleMetrics, weights: &ScoringWeights) -> ScoreBreakdown {
    let factors: Vec<FactorContribution> = MetricKind::ALL
        .iter()
        .map(|&kind| {
            let value = metrics.get(kind);
            let normalized = normalize(kind, value);
            let weight = weights.weight(kind);
            FactorContribution {
                metric: kind,
                value,
                normalized,
                weight,
                contribution: weight * normalized * FACTOR_SCALE,
            }
        })
        .collect();

    let raw_score = weights.baseline + factors.iter().map(|f| f.contribution).sum::<f64>();
    let score = to_score(raw_score);

    tracing::debug!(raw_score, score, "Scored lifestyle metrics");

    ScoreBreakdown {
        factors,
        raw_score,
        score,
    }
}

/// Current stress score (1-10) from lifestyle metrics
///
/// Never fails: any numeric input, however extreme, lands in range.
pub fn score_current(metrics: &LifestyleMetrics, weights: &ScoringWeights) -> u8 {
    score_breakdown(metrics, weights).score
}
