//! Readers for the tabular input files.
//!
//! All inputs are comma-separated with a header row. The first column holds
//! x values and each further column one function's y values:
//!
//! | File        | Columns                 |
//! |-------------|-------------------------|
//! | `train.csv` | `x, y1 .. y4`           |
//! | `ideal.csv` | `x, y1 .. y50`          |
//! | `test.csv`  | `x, y`                  |
//!
//! The expected counts can be changed through [`DatasetLayout`].
//!
//! ## Example
//!
//! ```rust
//! use ideal_match::parsing::table::parse_table_text;
//!
//! let table = parse_table_text("x,y1,y2\n0,1,2\n1,3,4\n", b',').unwrap();
//! assert_eq!(table.series.len(), 2);
//! assert_eq!(table.get("y2").unwrap().points[1].y, 4.0);
//! ```

pub mod dataset;
pub mod table;

pub use dataset::{load_observations, DatasetLayout, FunctionSets};
pub use table::{parse_table_file, parse_table_text, FunctionTable, ParseError};
