//! Assignment of test points to the selected ideal functions.
//!
//! Each test point `(x, y)` is compared against every ideal function chosen
//! by the [`matching`](crate::matching) stage:
//!
//! 1. Look up the ideal function's value at exactly `x`
//! 2. Compute the deviation `|y - ideal(x)|`
//! 3. The function is eligible when the deviation is at most the function's
//!    maximum training deviation times √2 (inclusive)
//! 4. The eligible function with the smallest deviation is assigned; an exact
//!    tie keeps the function of the earlier training series
//!
//! Points with no eligible function are reported as unmapped. A missing
//! lookup value is an error rather than an unmapped point, since it means the
//! test data does not share the ideal functions' x grid.

pub mod classifier;
pub mod lookup;

pub use classifier::{
    classify_points, Classification, ClassificationOutcome, ClassifierConfig, ClassifyError,
    PointClassifier, DEFAULT_TOLERANCE_FACTOR,
};
pub use lookup::{CandidateLookup, SeriesIndex};
