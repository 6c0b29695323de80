//! Command-line interface for ideal-match.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **match**: Select the best ideal function for each training function
//! - **classify**: Run the full pipeline and assign test points to the selected functions
//!
//! ## Usage
//!
//! ```text
//! # Best ideal function per training function
//! ideal-match match --train train.csv --ideal ideal.csv
//!
//! # Also list the three closest candidates per training function
//! ideal-match match --train train.csv --ideal ideal.csv --top 3
//!
//! # Classify test points and persist all result tables
//! ideal-match classify --train train.csv --ideal ideal.csv --test test.csv --output-dir results
//!
//! # JSON output for scripting
//! ideal-match classify --train train.csv --ideal ideal.csv --test test.csv --format json
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::parsing::dataset::{DatasetLayout, DEFAULT_CANDIDATE_SERIES, DEFAULT_REFERENCE_SERIES};

pub mod classify;
pub mod matching;

#[derive(Parser)]
#[command(name = "ideal-match")]
#[command(version)]
#[command(about = "Match training functions to ideal functions and classify test points")]
#[command(
    long_about = "ideal-match selects, for each training function, the ideal function with the smallest sum of absolute deviations.\n\nTest points are then assigned to a selected ideal function when their deviation from it is at most the function's maximum training deviation times sqrt(2)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Select the best ideal function for each training function
    Match(matching::MatchArgs),

    /// Assign test points to the selected ideal functions
    Classify(classify::ClassifyArgs),
}

/// Input tables shared by all commands
#[derive(clap::Args, Debug, Clone)]
pub struct InputArgs {
    /// Training data CSV (x, y1..yN)
    #[arg(long)]
    pub train: PathBuf,

    /// Ideal functions CSV (x, y1..yM)
    #[arg(long)]
    pub ideal: PathBuf,

    /// Number of training functions expected in the training table
    #[arg(long, default_value_t = DEFAULT_REFERENCE_SERIES)]
    pub references: usize,

    /// Number of ideal functions expected in the ideal table
    #[arg(long, default_value_t = DEFAULT_CANDIDATE_SERIES)]
    pub candidates: usize,
}

impl InputArgs {
    #[must_use]
    pub fn layout(&self) -> DatasetLayout {
        DatasetLayout {
            reference_series: self.references,
            candidate_series: self.candidates,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
