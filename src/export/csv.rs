use super::ExportError;
use crate::models::{ForecastEntry, HistoricalDayRecord};
use std::path::Path;

/// Export the forecast as CSV, one row per day (suitable for charting)
pub fn export_forecast<P: AsRef<Path>>(
    forecast: &[ForecastEntry],
    output_path: P,
) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(output_path)?;
    for entry in forecast {
        writer.serialize(entry)?;
    }
    writer.flush()?;
    Ok(())
}

/// Export history records as CSV, oldest first
pub fn export_history<P: AsRef<Path>>(
    history: &[HistoricalDayRecord],
    output_path: P,
) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(output_path)?;
    for record in history {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
