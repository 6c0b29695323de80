//! # ideal-match
//!
//! A library for choosing the best-fitting "ideal" functions for a set of
//! training functions, and for classifying test points against them.
//!
//! The input is three tables: training data (`x, y1..y4`), a pool of ideal
//! functions (`x, y1..y50`) sampled on the same x grid, and test points (`x, y`).
//!
//! ## Stages
//!
//! 1. **Matching**: for every training function, the ideal function with the
//!    smallest sum of absolute deviations is selected. Its maximum absolute
//!    deviation is kept alongside.
//! 2. **Classification**: each test point is assigned to the selected ideal
//!    function it deviates least from, provided that deviation is at most the
//!    function's maximum training deviation times √2. Points no function admits
//!    are reported as unmapped.
//!
//! Both stages are pure and all-or-nothing: an error aborts the whole pass.
//!
//! ## Example
//!
//! ```rust
//! use ideal_match::{classify_points, find_best_matches, Point, Series, SeriesIndex};
//!
//! let train = vec![Series::new("y1", vec![Point::new(0.0, 0.1), Point::new(1.0, 0.9)])];
//! let ideal = vec![
//!     Series::new("y1", vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]),
//!     Series::new("y2", vec![Point::new(0.0, 5.0), Point::new(1.0, 5.0)]),
//! ];
//!
//! let matches = find_best_matches(&train, &ideal).unwrap();
//! let index = SeriesIndex::new(&ideal);
//! let outcome = classify_points(&[Point::new(1.0, 1.1), Point::new(0.0, 3.0)], &index, &matches).unwrap();
//!
//! assert_eq!(outcome.mapped.len(), 1);
//! assert_eq!(outcome.unmapped.len(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Shared point and series types
//! - [`matching`]: Best-fit selection of ideal functions
//! - [`classify`]: Assignment of test points to selected functions
//! - [`parsing`]: CSV table readers with shape validation
//! - [`report`]: Persistence of input and result tables
//! - [`plot`]: SVG line charts of the training and selected ideal functions
//! - [`cli`]: Command-line interface implementation

pub mod classify;
pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod plot;
pub mod report;
pub mod utils;

// Re-export commonly used types for convenience
pub use classify::{
    classify_points, CandidateLookup, Classification, ClassificationOutcome, ClassifierConfig,
    ClassifyError, PointClassifier, SeriesIndex,
};
pub use core::series::{Point, Series};
pub use matching::{find_best_matches, BestMatches, MatchError, MatchResult, MatchingEngine};
