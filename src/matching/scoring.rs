use serde::{Deserialize, Serialize};

use crate::core::series::Series;
use crate::matching::engine::MatchError;

/// Deviation statistics between a training series and an ideal series,
/// compared position by position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviationScore {
    /// Sum of |reference.y[i] - candidate.y[i]| over all positions.
    /// This is the selection criterion: lower is a better fit.
    pub total_absolute_deviation: f64,

    /// Largest single |reference.y[i] - candidate.y[i]|
    pub max_absolute_deviation: f64,
}

impl DeviationScore {
    /// Score `candidate` against `reference`.
    ///
    /// Series are aligned by index, not by x value.
    ///
    /// # Errors
    ///
    /// Returns `MatchError::ShapeMismatch` if the series differ in length.
    pub fn calculate(reference: &Series, candidate: &Series) -> Result<Self, MatchError> {
        if reference.len() != candidate.len() {
            return Err(MatchError::ShapeMismatch {
                reference: reference.name.clone(),
                reference_len: reference.len(),
                candidate: candidate.name.clone(),
                candidate_len: candidate.len(),
            });
        }

        let (total, max) = reference.ys().zip(candidate.ys()).fold(
            (0.0_f64, 0.0_f64),
            |(total, max), (r, c)| {
                let deviation = absolute_deviation(r, c);
                (total + deviation, max.max(deviation))
            },
        );

        Ok(Self {
            total_absolute_deviation: total,
            max_absolute_deviation: max,
        })
    }
}

#[inline]
pub(crate) fn absolute_deviation(a: f64, b: f64) -> f64 {
    (a - b).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::series::Point;

    fn series(name: &str, ys: &[f64]) -> Series {
        let points = ys
            .iter()
            .enumerate()
            .map(|(i, &y)| Point::new(i as f64, y))
            .collect();
        Series::new(name, points)
    }

    #[test]
    fn test_identical_series_scores_zero() {
        let a = series("y1", &[2.0, 3.0, -1.5]);
        let score = DeviationScore::calculate(&a, &a.clone()).unwrap();
        assert_eq!(score.total_absolute_deviation, 0.0);
        assert_eq!(score.max_absolute_deviation, 0.0);
    }

    #[test]
    fn test_absolute_not_squared() {
        // Deviations 1, 3, 2 -> sum 6 (squared would be 14)
        let reference = series("y1", &[0.0, 0.0, 0.0]);
        let candidate = series("y7", &[1.0, -3.0, 2.0]);
        let score = DeviationScore::calculate(&reference, &candidate).unwrap();
        assert!((score.total_absolute_deviation - 6.0).abs() < 1e-12);
        assert!((score.max_absolute_deviation - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_shape_mismatch() {
        let reference = series("y1", &[1.0, 2.0]);
        let candidate = series("y2", &[1.0]);
        let err = DeviationScore::calculate(&reference, &candidate).unwrap_err();
        assert!(matches!(
            err,
            MatchError::ShapeMismatch {
                reference_len: 2,
                candidate_len: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_series_scores_zero() {
        let a = series("y1", &[]);
        let b = series("y2", &[]);
        let score = DeviationScore::calculate(&a, &b).unwrap();
        assert_eq!(score.total_absolute_deviation, 0.0);
        assert_eq!(score.max_absolute_deviation, 0.0);
    }
}
