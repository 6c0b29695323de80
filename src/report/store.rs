use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::classify::classifier::{Classification, ClassificationOutcome};
use crate::matching::engine::{BestMatches, MatchResult};
use crate::parsing::dataset::FunctionSets;
use crate::parsing::table::FunctionTable;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write CSV table: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Report format version for compatibility checking
pub const REPORT_VERSION: &str = "1.0.0";

pub const MATCHES_FILE: &str = "matches.csv";
pub const MAPPED_FILE: &str = "test_mapped.csv";
pub const UNMAPPED_FILE: &str = "test_unmapped.csv";
pub const REPORT_FILE: &str = "report.json";
pub const TRAIN_FILE: &str = "train.csv";
pub const IDEAL_FILE: &str = "ideal.csv";

/// Serializable report format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportData {
    pub version: String,
    pub generated_at: String,
    pub matches: Vec<MatchResult>,
    pub mapped: Vec<Classification>,
    pub unmapped: Vec<Classification>,
}

impl ReportData {
    #[must_use]
    pub fn new(matches: &BestMatches, outcome: &ClassificationOutcome) -> Self {
        Self {
            version: REPORT_VERSION.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            matches: matches.as_slice().to_vec(),
            mapped: outcome.mapped.clone(),
            unmapped: outcome.unmapped.clone(),
        }
    }
}

/// Paths of the files written by [`write_report`]
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub matches: PathBuf,
    pub mapped: PathBuf,
    pub unmapped: PathBuf,
    pub report: PathBuf,
}

impl ReportPaths {
    fn in_dir(dir: &Path) -> Self {
        Self {
            matches: dir.join(MATCHES_FILE),
            mapped: dir.join(MAPPED_FILE),
            unmapped: dir.join(UNMAPPED_FILE),
            report: dir.join(REPORT_FILE),
        }
    }
}

/// Paths of the files written by [`write_function_tables`]
#[derive(Debug, Clone)]
pub struct TablePaths {
    pub train: PathBuf,
    pub ideal: PathBuf,
}

#[derive(Serialize)]
struct MatchRow<'a> {
    training_function: &'a str,
    ideal_function: &'a str,
    total_absolute_deviation: f64,
    max_absolute_deviation: f64,
}

#[derive(Serialize)]
struct MappedRow<'a> {
    x: f64,
    y: f64,
    delta_y: f64,
    ideal_function: &'a str,
}

#[derive(Serialize)]
struct UnmappedRow {
    x: f64,
    y: f64,
}

const MATCH_HEADER: [&str; 4] = [
    "training_function",
    "ideal_function",
    "total_absolute_deviation",
    "max_absolute_deviation",
];
const MAPPED_HEADER: [&str; 4] = ["x", "y", "delta_y", "ideal_function"];
const UNMAPPED_HEADER: [&str; 2] = ["x", "y"];

/// CSV writer that emits `header` up front, so empty tables still carry one
fn table_writer(path: &Path, header: &[&str]) -> Result<csv::Writer<std::fs::File>, ReportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(header)?;
    Ok(writer)
}

/// Write one function table as `x, y1, y2, ...` with the original headers
fn write_function_table(path: &Path, table: &FunctionTable) -> Result<(), ReportError> {
    let header: Vec<&str> = std::iter::once(table.x_column.as_str())
        .chain(table.series.iter().map(|s| s.name.as_str()))
        .collect();
    let mut writer = table_writer(path, &header)?;

    let mut row = Vec::with_capacity(header.len());
    for i in 0..table.row_count() {
        row.clear();
        row.push(table.series[0].points[i].x);
        row.extend(table.series.iter().map(|s| s.points[i].y));
        writer.serialize(&row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Copy the validated training and ideal tables into `dir` as `train.csv`
/// and `ideal.csv`, creating the directory if needed. Existing files are
/// replaced.
///
/// # Errors
///
/// Returns `ReportError` if the directory or either file cannot be written.
pub fn write_function_tables(dir: &Path, sets: &FunctionSets) -> Result<TablePaths, ReportError> {
    std::fs::create_dir_all(dir)?;
    let paths = TablePaths {
        train: dir.join(TRAIN_FILE),
        ideal: dir.join(IDEAL_FILE),
    };

    write_function_table(&paths.train, &sets.train)?;
    write_function_table(&paths.ideal, &sets.ideal)?;

    info!(
        "Wrote {} training and {} ideal functions to {}",
        sets.train.series.len(),
        sets.ideal.series.len(),
        dir.display()
    );

    Ok(paths)
}

/// Write all result tables into `dir`, creating it if needed.
///
/// # Errors
///
/// Returns `ReportError` if the directory or any file cannot be written.
pub fn write_report(
    dir: &Path,
    matches: &BestMatches,
    outcome: &ClassificationOutcome,
) -> Result<ReportPaths, ReportError> {
    std::fs::create_dir_all(dir)?;
    let paths = ReportPaths::in_dir(dir);

    let mut writer = table_writer(&paths.matches, &MATCH_HEADER)?;
    for m in matches {
        writer.serialize(MatchRow {
            training_function: &m.reference_name,
            ideal_function: &m.candidate_name,
            total_absolute_deviation: m.total_absolute_deviation,
            max_absolute_deviation: m.max_absolute_deviation,
        })?;
    }
    writer.flush()?;

    let mut writer = table_writer(&paths.mapped, &MAPPED_HEADER)?;
    for c in &outcome.mapped {
        if let (Some(name), Some(delta_y)) = (c.candidate_name.as_deref(), c.deviation) {
            writer.serialize(MappedRow {
                x: c.x,
                y: c.y,
                delta_y,
                ideal_function: name,
            })?;
        }
    }
    writer.flush()?;

    let mut writer = table_writer(&paths.unmapped, &UNMAPPED_HEADER)?;
    for c in &outcome.unmapped {
        writer.serialize(UnmappedRow { x: c.x, y: c.y })?;
    }
    writer.flush()?;

    let data = ReportData::new(matches, outcome);
    std::fs::write(&paths.report, serde_json::to_string_pretty(&data)?)?;

    info!(
        "Wrote {} matches, {} mapped and {} unmapped points to {}",
        matches.len(),
        outcome.mapped.len(),
        outcome.unmapped.len(),
        dir.display()
    );

    Ok(paths)
}

/// Read back a `report.json` file.
///
/// # Errors
///
/// Returns `ReportError::Io` if the file cannot be read or
/// `ReportError::Json` if it is not a valid report.
pub fn load_report(path: &Path) -> Result<ReportData, ReportError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::series::Point;
    use crate::parsing::table::parse_table_text;

    fn sample() -> (BestMatches, ClassificationOutcome) {
        let matches = BestMatches::from_results(vec![MatchResult {
            reference_name: "y1".to_string(),
            candidate_name: "y13".to_string(),
            total_absolute_deviation: 33.5,
            max_absolute_deviation: 0.5,
        }])
        .unwrap();
        let outcome = ClassificationOutcome {
            mapped: vec![Classification::mapped(Point::new(1.0, 2.0), "y13", 0.25)],
            unmapped: vec![Classification::unmapped(Point::new(3.0, 40.0))],
        };
        (matches, outcome)
    }

    #[test]
    fn test_write_report_files() {
        let dir = tempfile::tempdir().unwrap();
        let (matches, outcome) = sample();

        let paths = write_report(dir.path(), &matches, &outcome).unwrap();

        let matches_csv = std::fs::read_to_string(&paths.matches).unwrap();
        assert!(matches_csv.starts_with(
            "training_function,ideal_function,total_absolute_deviation,max_absolute_deviation"
        ));
        assert!(matches_csv.contains("y1,y13,33.5,0.5"));

        let mapped_csv = std::fs::read_to_string(&paths.mapped).unwrap();
        assert!(mapped_csv.starts_with("x,y,delta_y,ideal_function"));
        assert!(mapped_csv.contains("1.0,2.0,0.25,y13"));

        let unmapped_csv = std::fs::read_to_string(&paths.unmapped).unwrap();
        assert_eq!(unmapped_csv.lines().collect::<Vec<_>>(), vec!["x,y", "3.0,40.0"]);
    }

    #[test]
    fn test_report_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let (matches, outcome) = sample();

        let paths = write_report(dir.path(), &matches, &outcome).unwrap();
        let data = load_report(&paths.report).unwrap();

        assert_eq!(data.version, REPORT_VERSION);
        assert_eq!(data.matches, matches.as_slice());
        assert_eq!(data.mapped, outcome.mapped);
        assert_eq!(data.unmapped, outcome.unmapped);
        assert!(chrono::DateTime::parse_from_rfc3339(&data.generated_at).is_ok());
    }

    #[test]
    fn test_empty_tables_keep_header() {
        let dir = tempfile::tempdir().unwrap();
        let (matches, _) = sample();

        let paths = write_report(dir.path(), &matches, &ClassificationOutcome::default()).unwrap();
        let mapped_csv = std::fs::read_to_string(&paths.mapped).unwrap();
        assert_eq!(mapped_csv.trim_end(), "x,y,delta_y,ideal_function");
    }

    #[test]
    fn test_existing_files_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let (matches, outcome) = sample();
        std::fs::write(dir.path().join(UNMAPPED_FILE), "stale").unwrap();

        write_report(dir.path(), &matches, &outcome).unwrap();
        let unmapped_csv = std::fs::read_to_string(dir.path().join(UNMAPPED_FILE)).unwrap();
        assert!(!unmapped_csv.contains("stale"));
    }

    #[test]
    fn test_write_function_tables() {
        let dir = tempfile::tempdir().unwrap();
        let sets = FunctionSets {
            train: parse_table_text("x,y1\n-1,0.5\n1,1.5\n", b',').unwrap(),
            ideal: parse_table_text("x,y1,y2\n-1,0,2\n1,1,-2\n", b',').unwrap(),
        };
        std::fs::write(dir.path().join(IDEAL_FILE), "stale").unwrap();

        let paths = write_function_tables(dir.path(), &sets).unwrap();

        let train_csv = std::fs::read_to_string(&paths.train).unwrap();
        assert_eq!(train_csv.lines().collect::<Vec<_>>(), vec!["x,y1", "-1.0,0.5", "1.0,1.5"]);

        let ideal_csv = std::fs::read_to_string(&paths.ideal).unwrap();
        assert_eq!(
            ideal_csv.lines().collect::<Vec<_>>(),
            vec!["x,y1,y2", "-1.0,0.0,2.0", "1.0,1.0,-2.0"]
        );

        // The copy parses back into the same table
        assert_eq!(parse_table_text(&ideal_csv, b',').unwrap(), sets.ideal);
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("run1");
        let (matches, outcome) = sample();

        let paths = write_report(&nested, &matches, &outcome).unwrap();
        assert!(paths.report.exists());
    }
}
