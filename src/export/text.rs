use super::{ExportError, StressReport};
use crate::models::HistoricalDayRecord;
use std::io::Write;
use std::path::Path;

const RULE_WIDTH: usize = 40;

/// Export stress report to human-readable text format
pub fn export_stress_report<P: AsRef<Path>>(
    report: &StressReport,
    output_path: P,
) -> Result<(), ExportError> {
    let mut file = std::fs::File::create(output_path)?;
    write_stress_report(report, &mut file)
}

/// Export history records to human-readable text format
pub fn export_history<P: AsRef<Path>>(
    history: &[HistoricalDayRecord],
    output_path: P,
) -> Result<(), ExportError> {
    let mut file = std::fs::File::create(output_path)?;
    write_history(history, &mut file)
}

/// One line per day, oldest first
pub fn write_history<W: Write>(history: &[HistoricalDayRecord], out: &mut W) -> Result<(), ExportError> {
    writeln!(out, "RECENT DAYS")?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    for day in history {
        writeln!(out, "{:<10} {:>2}/10", day.label, day.stress_score)?;
    }
    Ok(())
}

/// Render the text report into any writer
pub fn write_stress_report<W: Write>(report: &StressReport, out: &mut W) -> Result<(), ExportError> {
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "STRESS REPORT")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out)?;
    writeln!(out, "Generated: {}", report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
    writeln!(out)?;

    writeln!(out, "CURRENT STRESS")?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    writeln!(out, "Stress Score: {}/10", report.stress_score)?;
    for factor in &report.breakdown.factors {
        writeln!(
            out,
            "  {:<12} {:>5.1} {:<14} {:+.1}",
            factor.metric.to_string(),
            factor.value,
            factor.metric.unit(),
            factor.contribution
        )?;
    }
    writeln!(out)?;

    if !report.history.is_empty() {
        write_history(&report.history, out)?;
        writeln!(out)?;
    }

    writeln!(out, "7-DAY FORECAST")?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    for entry in &report.forecast {
        writeln!(
            out,
            "{:<4} {:>2}/10  ({}% confidence)",
            entry.day_label, entry.predicted_score, entry.confidence_percent
        )?;
    }
    if let Some(average) = report.average_predicted {
        writeln!(out, "Average: {:.1}", average)?;
    }
    writeln!(
        out,
        "Risk Level: {} ({})",
        report.risk_level,
        report.risk_level.description()
    )?;
    writeln!(out)?;

    if !report.recommendations.is_empty() {
        writeln!(out, "RECOMMENDATIONS")?;
        writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
        for recommendation in &report.recommendations {
            writeln!(out, "• {}", recommendation.title)?;
            writeln!(out, "  {}", recommendation.description)?;
        }
    }

    Ok(())
}
