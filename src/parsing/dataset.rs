use std::path::Path;

use tracing::info;

use crate::core::series::Point;
use crate::parsing::table::{parse_table_file, FunctionTable, ParseError};

/// Default number of training functions (y columns in the train table)
pub const DEFAULT_REFERENCE_SERIES: usize = 4;

/// Default number of ideal functions (y columns in the ideal table)
pub const DEFAULT_CANDIDATE_SERIES: usize = 50;

/// Expected shape of the input tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetLayout {
    pub reference_series: usize,
    pub candidate_series: usize,
}

impl Default for DatasetLayout {
    fn default() -> Self {
        Self {
            reference_series: DEFAULT_REFERENCE_SERIES,
            candidate_series: DEFAULT_CANDIDATE_SERIES,
        }
    }
}

/// Training and ideal tables, validated against a layout
#[derive(Debug, Clone)]
pub struct FunctionSets {
    pub train: FunctionTable,
    pub ideal: FunctionTable,
}

impl FunctionSets {
    /// Load and validate the training and ideal tables.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if either file is missing or malformed, or
    /// `ParseError::ColumnCount` if a table does not match `layout`.
    pub fn load(train: &Path, ideal: &Path, layout: DatasetLayout) -> Result<Self, ParseError> {
        let train = load_checked(train, layout.reference_series + 1)?;
        let ideal = load_checked(ideal, layout.candidate_series + 1)?;
        info!(
            "Loaded {} training and {} ideal functions",
            train.series.len(),
            ideal.series.len()
        );
        Ok(Self { train, ideal })
    }
}

/// Load a two-column `x, y` table of test points.
///
/// # Errors
///
/// Returns a `ParseError` if the file is missing or malformed, or
/// `ParseError::ColumnCount` if it does not have exactly two columns.
pub fn load_observations(path: &Path) -> Result<Vec<Point>, ParseError> {
    let table = load_checked(path, 2)?;
    info!("Loaded {} test points", table.row_count());
    Ok(table.points().to_vec())
}

fn load_checked(path: &Path, expected_columns: usize) -> Result<FunctionTable, ParseError> {
    let table = parse_table_file(path, b',')?;
    check_column_count(&table, path, expected_columns)?;
    Ok(table)
}

/// Validate that `table` has exactly `expected` columns including x.
///
/// # Errors
///
/// Returns `ParseError::ColumnCount` on mismatch.
pub fn check_column_count(
    table: &FunctionTable,
    path: &Path,
    expected: usize,
) -> Result<(), ParseError> {
    let found = table.column_count();
    if found == expected {
        Ok(())
    } else {
        let file = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Err(ParseError::ColumnCount {
            file,
            expected,
            found,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_function_sets() {
        let dir = tempfile::tempdir().unwrap();
        let train = write_file(dir.path(), "train.csv", "x,y1\n0,1\n1,2\n");
        let ideal = write_file(dir.path(), "ideal.csv", "x,y1,y2\n0,1,5\n1,2,6\n");
        let layout = DatasetLayout {
            reference_series: 1,
            candidate_series: 2,
        };

        let sets = FunctionSets::load(&train, &ideal, layout).unwrap();
        assert_eq!(sets.train.series.len(), 1);
        assert_eq!(sets.ideal.series.len(), 2);
    }

    #[test]
    fn test_wrong_column_count() {
        let dir = tempfile::tempdir().unwrap();
        let train = write_file(dir.path(), "train.csv", "x,y1,y2\n0,1,1\n");
        let ideal = write_file(dir.path(), "ideal.csv", "x,y1\n0,1\n");

        let err = FunctionSets::load(&train, &ideal, DatasetLayout::default()).unwrap_err();
        match err {
            ParseError::ColumnCount {
                file,
                expected,
                found,
            } => {
                assert_eq!(file, "train.csv");
                assert_eq!(expected, 5);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_observations() {
        let dir = tempfile::tempdir().unwrap();
        let test = write_file(dir.path(), "test.csv", "x,y\n0.5,1\n-2,3.5\n");

        let points = load_observations(&test).unwrap();
        assert_eq!(points, vec![Point::new(0.5, 1.0), Point::new(-2.0, 3.5)]);
    }

    #[test]
    fn test_observations_need_two_columns() {
        let dir = tempfile::tempdir().unwrap();
        let test = write_file(dir.path(), "test.csv", "x,y,z\n0,1,2\n");

        let err = load_observations(&test).unwrap_err();
        assert!(matches!(err, ParseError::ColumnCount { expected: 2, found: 3, .. }));
    }

    #[test]
    fn test_default_layout() {
        let layout = DatasetLayout::default();
        assert_eq!(layout.reference_series, 4);
        assert_eq!(layout.candidate_series, 50);
    }
}
