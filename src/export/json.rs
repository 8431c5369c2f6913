use super::{ExportError, StressReport};
use std::io::Write;
use std::path::Path;

/// Export stress report to JSON format
pub fn export_stress_report<P: AsRef<Path>>(
    report: &StressReport,
    output_path: P,
) -> Result<(), ExportError> {
    export_json(report, output_path)
}

/// Export any serializable data structure to JSON
pub fn export_json<T, P>(data: &T, output_path: P) -> Result<(), ExportError>
where
    T: serde::Serialize,
    P: AsRef<Path>,
{
    let json_data = serde_json::to_string_pretty(data)
        .map_err(|e| ExportError::SerializationError(e.to_string()))?;

    let mut file = std::fs::File::create(output_path)?;
    file.write_all(json_data.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::test_support::sample_report;
    use tempfile::NamedTempFile;

    #[test]
    fn test_export_stress_report() {
        let report = sample_report();

        let temp_file = NamedTempFile::new().unwrap();
        export_stress_report(&report, temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("\"risk_level\": \"high\""));
        assert!(content.contains("\"category\": \"warning\""));
        assert!(content.contains("\"day_label\": \"Tue\""));

        let parsed: StressReport = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.forecast.len(), 7);
        assert_eq!(parsed.recommendations, report.recommendations);
    }

    #[test]
    fn test_export_json_generic() {
        #[derive(serde::Serialize)]
        struct TestData {
            name: String,
            value: u32,
        }

        let data = TestData {
            name: "test".to_string(),
            value: 42,
        };

        let temp_file = NamedTempFile::new().unwrap();
        export_json(&data, temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("\"name\": \"test\""));
        assert!(content.contains("\"value\": 42"));
    }
}
