//! Best-fit selection of ideal functions for training functions.
//!
//! - [`MatchingEngine`]: Scores a candidate pool against reference series
//! - [`DeviationScore`]: Total and maximum absolute deviation of one pair
//! - [`BestMatches`]: The selected candidate per reference, keyed by name
//!
//! ## Selection
//!
//! Every candidate is compared with the reference position by position.
//! The candidate with the smallest sum of absolute deviations is selected;
//! among equal sums the one earliest in the pool wins. The maximum absolute
//! deviation of the selected pair is kept, since the classifier derives its
//! tolerance from it.
//!
//! ## Example
//!
//! ```rust
//! use ideal_match::{find_best_matches, Point, Series};
//!
//! let train = Series::new("y1", vec![Point::new(1.0, 2.0), Point::new(2.0, 3.0)]);
//! let ideal = vec![
//!     Series::new("y1", vec![Point::new(1.0, 2.0), Point::new(2.0, 3.0)]),
//!     Series::new("y2", vec![Point::new(1.0, 3.0), Point::new(2.0, 4.0)]),
//! ];
//!
//! let matches = find_best_matches(&[train], &ideal).unwrap();
//! assert_eq!(matches.get("y1").unwrap().candidate_name, "y1");
//! ```

pub mod engine;
pub mod scoring;

pub use engine::{find_best_matches, BestMatches, MatchError, MatchResult, MatchingEngine};
pub use scoring::DeviationScore;
