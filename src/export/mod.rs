use crate::models::{
    ForecastEntry, HistoricalDayRecord, LifestyleMetrics, Recommendation, RiskLevel,
};
use crate::scoring::ScoreBreakdown;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub mod csv;
pub mod json;
pub mod text;

/// Export format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
    Text,
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "text" | "txt" => Ok(ExportFormat::Text),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] ::csv::Error),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Everything the display layer needs after one recompute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressReport {
    pub generated_at: DateTime<Utc>,
    pub metrics: LifestyleMetrics,
    pub stress_score: u8,
    pub breakdown: ScoreBreakdown,
    pub history: Vec<HistoricalDayRecord>,
    pub forecast: Vec<ForecastEntry>,
    pub average_predicted: Option<f64>,
    pub risk_level: RiskLevel,
    pub recommendations: Vec<Recommendation>,
}

/// Write a report in the requested format
pub fn export_report<P: AsRef<Path>>(
    report: &StressReport,
    format: ExportFormat,
    output_path: P,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Json => json::export_stress_report(report, &output_path)?,
        ExportFormat::Csv => csv::export_forecast(&report.forecast, &output_path)?,
        ExportFormat::Text => text::export_stress_report(report, &output_path)?,
    }

    tracing::info!(
        format = ?format,
        path = %output_path.as_ref().display(),
        "Exported stress report"
    );
    Ok(())
}

/// Write history records, oldest first, in the requested format
pub fn export_history<P: AsRef<Path>>(
    history: &[HistoricalDayRecord],
    format: ExportFormat,
    output_path: P,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Json => json::export_json(&history, &output_path)?,
        ExportFormat::Csv => csv::export_history(history, &output_path)?,
        ExportFormat::Text => text::export_history(history, &output_path)?,
    }

    tracing::info!(
        format = ?format,
        days = history.len(),
        path = %output_path.as_ref().display(),
        "Exported stress history"
    );
    Ok(())
}
