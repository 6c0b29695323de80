//! Persistence of matching and classification results.
//!
//! A run writes the validated inputs and its results into one output directory:
//!
//! - `train.csv`, `ideal.csv`: copies of the training and ideal tables
//! - `matches.csv`: selected ideal function per training function
//! - `test_mapped.csv`: test points with their assigned ideal function
//! - `test_unmapped.csv`: test points no ideal function admitted
//! - `report.json`: all of the above plus run metadata
//!
//! Existing files are replaced.

pub mod store;

pub use store::{
    load_report, write_function_tables, write_report, ReportData, ReportError, ReportPaths,
    TablePaths, REPORT_VERSION,
};
