use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::core::series::{Point, Series};
use crate::utils::validation::{check_row_limit, find_duplicate, parse_finite, MAX_ROWS};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Data set not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid table format: {0}")]
    InvalidFormat(String),

    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("Invalid format for {file}: expected {expected} columns, found {found}")]
    ColumnCount {
        file: String,
        expected: usize,
        found: usize,
    },

    #[error("{0}")]
    TooManyRows(String),
}

/// A table with one x column and one or more y columns.
///
/// Each y column becomes a [`Series`] whose points share the table's x values.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionTable {
    /// Header of the first column
    pub x_column: String,

    /// One series per y column, in column order
    pub series: Vec<Series>,
}

impl FunctionTable {
    /// Total number of columns including x
    #[must_use]
    pub fn column_count(&self) -> usize {
        1 + self.series.len()
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.series.first().map_or(0, Series::len)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.name == name)
    }

    /// Points of the first y column; used for two-column test data
    #[must_use]
    pub fn points(&self) -> &[Point] {
        self.series.first().map_or(&[], |s| s.points.as_slice())
    }
}

/// Parse a delimited file with a header row: `x, y1, y2, ...`
///
/// The file is streamed record by record, so the row cap bounds memory use.
///
/// # Errors
///
/// Returns `ParseError::NotFound` if the file does not exist, `ParseError::Csv`
/// if it cannot be opened or read, or any error from [`parse_table_text`].
pub fn parse_table_file(path: &Path, delimiter: u8) -> Result<FunctionTable, ParseError> {
    if !path.exists() {
        return Err(ParseError::NotFound(path.to_path_buf()));
    }
    let reader = reader_builder(delimiter).from_path(path)?;
    let table = read_table(reader, MAX_ROWS)?;
    debug!(
        "Read {} rows x {} columns from {}",
        table.row_count(),
        table.column_count(),
        path.display()
    );
    Ok(table)
}

/// Parse delimited text with a header row: `x, y1, y2, ...`
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if there are fewer than two columns,
/// no data rows, or a cell is not a finite number; `ParseError::DuplicateColumn`
/// for repeated headers; `ParseError::Csv` for ragged rows; or
/// `ParseError::TooManyRows` if the row limit is exceeded.
pub fn parse_table_text(text: &str, delimiter: u8) -> Result<FunctionTable, ParseError> {
    read_table(reader_builder(delimiter).from_reader(text.as_bytes()), MAX_ROWS)
}

fn reader_builder(delimiter: u8) -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.delimiter(delimiter).trim(csv::Trim::All);
    builder
}

fn read_table<R: Read>(
    mut reader: csv::Reader<R>,
    max_rows: usize,
) -> Result<FunctionTable, ParseError> {
    let headers = reader.headers()?.clone();
    if headers.len() < 2 {
        return Err(ParseError::InvalidFormat(format!(
            "Expected an x column and at least one y column, found {} column(s)",
            headers.len()
        )));
    }
    if let Some(dup) = find_duplicate(headers.iter()) {
        return Err(ParseError::DuplicateColumn(dup.to_string()));
    }

    let names: Vec<&str> = headers.iter().skip(1).collect();
    let mut columns: Vec<Vec<Point>> = vec![Vec::new(); names.len()];
    let mut rows = 0usize;

    for record in reader.records() {
        let record = record?;
        // Line numbers in errors are 1-based for user friendliness
        let line_num = record.position().map_or(rows + 2, |p| p.line() as usize);

        if let Some(msg) = check_row_limit(rows, max_rows) {
            return Err(ParseError::TooManyRows(msg));
        }

        let mut cells = record.iter();
        let x_cell = cells.next().unwrap_or_default();
        let x = parse_finite(x_cell).ok_or_else(|| {
            ParseError::InvalidFormat(format!(
                "Invalid x value on line {line_num}: '{x_cell}'"
            ))
        })?;

        for ((cell, name), column) in cells.zip(&names).zip(columns.iter_mut()) {
            let y = parse_finite(cell).ok_or_else(|| {
                ParseError::InvalidFormat(format!(
                    "Invalid value on line {line_num}, column '{name}': '{cell}'"
                ))
            })?;
            column.push(Point::new(x, y));
        }

        rows += 1;
    }

    if rows == 0 {
        return Err(ParseError::InvalidFormat(
            "No data rows found in table".to_string(),
        ));
    }

    let series = names
        .into_iter()
        .zip(columns)
        .map(|(name, points)| Series::new(name, points))
        .collect();

    Ok(FunctionTable {
        x_column: headers[0].to_string(),
        series,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_table_text() {
        let csv = "x,y1,y2\n-1.0,2.5,3\n0.0,1.5,-3\n1.0,0.5,0.25\n";

        let table = parse_table_text(csv, b',').unwrap();
        assert_eq!(table.x_column, "x");
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.row_count(), 3);

        let y2 = table.get("y2").unwrap();
        assert_eq!(y2.points[0], Point::new(-1.0, 3.0));
        assert_eq!(y2.points[2], Point::new(1.0, 0.25));
        assert_eq!(table.series[0].name, "y1");
    }

    #[test]
    fn test_parse_tab_delimited_with_spaces() {
        let tsv = "x\ty\n 1.5 \t 2 \n";
        let table = parse_table_text(tsv, b'\t').unwrap();
        assert_eq!(table.points(), &[Point::new(1.5, 2.0)]);
    }

    #[test]
    fn test_single_column_rejected() {
        let err = parse_table_text("x\n1\n2\n", b',').unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat(_)));
    }

    #[test]
    fn test_no_rows_rejected() {
        let err = parse_table_text("x,y\n", b',').unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat(_)));
    }

    #[test]
    fn test_non_numeric_value() {
        let err = parse_table_text("x,y1\n1,abc\n", b',').unwrap_err();
        match err {
            ParseError::InvalidFormat(msg) => {
                assert!(msg.contains("line 2"), "{msg}");
                assert!(msg.contains("y1"), "{msg}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_finite_value() {
        let err = parse_table_text("x,y1\n1,NaN\n", b',').unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat(_)));
    }

    #[test]
    fn test_duplicate_column() {
        let err = parse_table_text("x,y1,y1\n1,2,3\n", b',').unwrap_err();
        assert!(matches!(err, ParseError::DuplicateColumn(name) if name == "y1"));
    }

    #[test]
    fn test_ragged_row() {
        let err = parse_table_text("x,y1,y2\n1,2\n", b',').unwrap_err();
        assert!(matches!(err, ParseError::Csv(_)));
    }

    #[test]
    fn test_row_limit() {
        let text = "x,y1\n0,1\n1,2\n2,3\n";

        let table = read_table(reader_builder(b',').from_reader(text.as_bytes()), 3).unwrap();
        assert_eq!(table.row_count(), 3);

        let err = read_table(reader_builder(b',').from_reader(text.as_bytes()), 2).unwrap_err();
        match err {
            ParseError::TooManyRows(msg) => assert!(msg.contains("maximum of 2"), "{msg}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_table_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ideal.csv");
        std::fs::write(&path, "x,y1,y2\n-0.5,1,2\n0.5,3,4\n").unwrap();

        let table = parse_table_file(&path, b',').unwrap();
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.get("y2").unwrap().points[1], Point::new(0.5, 4.0));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_table_file(Path::new("/nonexistent/train.csv"), b',').unwrap_err();
        assert!(matches!(err, ParseError::NotFound(_)));
    }
}
