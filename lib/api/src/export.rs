//! Result export as CSV or JSON

use rasarx_core::{Error, ResponseKind, Result};
use rasarx_rasar::{Metric, MetricRow, RasarReport};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    #[default]
    Json,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(Error::InvalidConfiguration(format!(
                "unknown output format '{}'",
                other
            ))),
        }
    }
}

/// Render metric rows as CSV: `id` then the schema fields of `kind`.
///
/// Undefined statistics are written as `NaN`.
pub fn to_csv(rows: &[MetricRow], kind: ResponseKind) -> Result<String> {
    let schema = Metric::schema(kind);
    let mut writer = csv::Writer::from_writer(Vec::new());

    let header = std::iter::once("id").chain(schema.iter().map(|m| m.label()));
    writer.write_record(header).map_err(io::Error::from)?;
    for row in rows {
        let mut record = Vec::with_capacity(schema.len() + 1);
        record.push(row.id.clone());
        record.extend(schema.iter().map(|m| row.metrics.get(*m).to_string()));
        writer.write_record(&record).map_err(io::Error::from)?;
    }

    let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| Error::Parse(e.to_string()))
}

/// Write a report into `dir`, returning the created files.
///
/// CSV produces `train.csv` and `test.csv`; JSON produces `rasar_report.json`.
pub fn write_report(dir: &Path, report: &RasarReport, format: OutputFormat) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let written = match format {
        OutputFormat::Csv => {
            let train = dir.join("train.csv");
            let test = dir.join("test.csv");
            fs::write(&train, to_csv(&report.train, report.response_kind)?)?;
            fs::write(&test, to_csv(&report.test, report.response_kind)?)?;
            vec![train, test]
        }
        OutputFormat::Json => {
            let path = dir.join("rasar_report.json");
            let json = serde_json::to_string_pretty(report).map_err(|e| Error::Parse(e.to_string()))?;
            fs::write(&path, json)?;
            vec![path]
        }
    };
    info!(files = written.len(), dir = %dir.display(), "report written");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rasarx_rasar::RasarMetrics;
    use rasarx_similarity::Kernel;

    fn row(id: &str, kind: ResponseKind) -> MetricRow {
        let metrics = RasarMetrics {
            ra_function: 2.5,
            sd_activity: f64::NAN,
            ..RasarMetrics::default()
        };
        MetricRow::new(id.to_string(), kind, metrics)
    }

    fn report() -> RasarReport {
        RasarReport {
            kernel: Kernel::Gaussian,
            response_kind: ResponseKind::Continuous,
            ctc: 2,
            features: vec!["a".to_string()],
            train: vec![row("r1", ResponseKind::Continuous), row("r2", ResponseKind::Continuous)],
            test: vec![row("q1", ResponseKind::Continuous)],
        }
    }

    #[test]
    fn test_csv_header_and_nan() {
        let csv = to_csv(&[row("q1", ResponseKind::Continuous)], ResponseKind::Continuous).unwrap();
        let mut lines = csv.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("id,RA_function,SD_Activity,CV_Activity"));
        assert!(header.contains("Standard_Error (SE)"));
        assert_eq!(header.split(',').count(), 18);

        let line = lines.next().unwrap();
        assert!(line.starts_with("q1,2.5,NaN,"));
    }

    #[test]
    fn test_binary_csv_omits_activity_dispersion() {
        let csv = to_csv(&[row("q1", ResponseKind::Binary)], ResponseKind::Binary).unwrap();
        let header = csv.lines().next().unwrap();
        assert_eq!(header.split(',').count(), 15);
        assert!(!header.contains("SD_Activity"));
    }

    #[test]
    fn test_write_csv_report() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_report(dir.path(), &report(), OutputFormat::Csv).unwrap();
        assert_eq!(files.len(), 2);
        let train = fs::read_to_string(dir.path().join("train.csv")).unwrap();
        assert_eq!(train.lines().count(), 3);
    }

    #[test]
    fn test_write_json_report() {
        let dir = tempfile::tempdir().unwrap();
        write_report(dir.path(), &report(), OutputFormat::Json).unwrap();
        let text = fs::read_to_string(dir.path().join("rasar_report.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["test"][0]["id"], "q1");
        assert!(value["test"][0]["SD_Activity"].is_null());
        assert_eq!(value["response_kind"], "continuous");
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert!("xlsx".parse::<OutputFormat>().is_err());
    }
}
