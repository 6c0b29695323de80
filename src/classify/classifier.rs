use std::f64::consts::SQRT_2;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::classify::lookup::CandidateLookup;
use crate::core::series::Point;
use crate::matching::engine::BestMatches;
use crate::matching::scoring::absolute_deviation;

/// Default multiplier applied to a match's maximum deviation to get the
/// classification tolerance.
pub const DEFAULT_TOLERANCE_FACTOR: f64 = SQRT_2;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifyError {
    #[error("No value for x = {x} in ideal function '{candidate}'")]
    LookupFailure { candidate: String, x: f64 },
}

/// Configuration for the point classifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierConfig {
    /// A point is eligible for a candidate when its deviation is at most
    /// `max_absolute_deviation * tolerance_factor`.
    pub tolerance_factor: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            tolerance_factor: DEFAULT_TOLERANCE_FACTOR,
        }
    }
}

/// Outcome for a single test point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub x: f64,
    pub y: f64,

    /// Assigned ideal function, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_name: Option<String>,

    /// |y - ideal(x)| for the assigned function
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deviation: Option<f64>,
}

impl Classification {
    #[must_use]
    pub fn mapped(point: Point, candidate_name: impl Into<String>, deviation: f64) -> Self {
        Self {
            x: point.x,
            y: point.y,
            candidate_name: Some(candidate_name.into()),
            deviation: Some(deviation),
        }
    }

    #[must_use]
    pub fn unmapped(point: Point) -> Self {
        Self {
            x: point.x,
            y: point.y,
            candidate_name: None,
            deviation: None,
        }
    }

    #[must_use]
    pub fn is_mapped(&self) -> bool {
        self.candidate_name.is_some()
    }
}

/// Test points partitioned into mapped and unmapped, each in input order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationOutcome {
    pub mapped: Vec<Classification>,
    pub unmapped: Vec<Classification>,
}

impl ClassificationOutcome {
    #[must_use]
    pub fn total(&self) -> usize {
        self.mapped.len() + self.unmapped.len()
    }
}

/// Assigns test points to the ideal functions chosen by the matcher
pub struct PointClassifier<'a, L: CandidateLookup + ?Sized> {
    lookup: &'a L,
    matches: &'a BestMatches,
    config: ClassifierConfig,
}

impl<'a, L: CandidateLookup + ?Sized> PointClassifier<'a, L> {
    /// Create a classifier with the default tolerance factor (√2)
    pub fn new(lookup: &'a L, matches: &'a BestMatches) -> Self {
        Self::with_config(lookup, matches, ClassifierConfig::default())
    }

    pub fn with_config(lookup: &'a L, matches: &'a BestMatches, config: ClassifierConfig) -> Self {
        Self {
            lookup,
            matches,
            config,
        }
    }

    /// Classify a single point.
    ///
    /// Every selected candidate is checked; among those within tolerance the
    /// smallest deviation wins, and on an exact tie the earlier reference keeps it.
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError::LookupFailure` if a selected candidate has no
    /// value at `point.x`.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn classify_point(&self, point: Point) -> Result<Classification, ClassifyError> {
        let mut best: Option<(&str, f64)> = None;

        for result in self.matches {
            let candidate_y = self
                .lookup
                .lookup(&result.candidate_name, point.x)
                .ok_or_else(|| ClassifyError::LookupFailure {
                    candidate: result.candidate_name.clone(),
                    x: point.x,
                })?;

            let deviation = absolute_deviation(point.y, candidate_y);
            let tolerance = result.max_absolute_deviation * self.config.tolerance_factor;
            // NaN deviations fail this test and never become eligible
            if !(deviation <= tolerance) {
                continue;
            }

            if best.map_or(true, |(_, current)| deviation < current) {
                best = Some((result.candidate_name.as_str(), deviation));
            }
        }

        Ok(match best {
            Some((name, deviation)) => Classification::mapped(point, name, deviation),
            None => Classification::unmapped(point),
        })
    }

    /// Classify all points, preserving input order within each partition.
    ///
    /// The pass is atomic: any lookup failure discards all results.
    ///
    /// # Errors
    ///
    /// Returns the first `ClassifyError::LookupFailure` encountered.
    pub fn classify(&self, observations: &[Point]) -> Result<ClassificationOutcome, ClassifyError> {
        let classified = observations
            .iter()
            .map(|&point| self.classify_point(point))
            .collect::<Result<Vec<_>, _>>()?;

        let (mapped, unmapped): (Vec<_>, Vec<_>) =
            classified.into_iter().partition(Classification::is_mapped);

        debug!(
            "Tolerance factor {:.6} over {} selected functions",
            self.config.tolerance_factor,
            self.matches.len()
        );
        info!(
            "Classified {} test points: {} mapped, {} unmapped",
            observations.len(),
            mapped.len(),
            unmapped.len()
        );

        Ok(ClassificationOutcome { mapped, unmapped })
    }
}

/// Convenience wrapper around [`PointClassifier::classify`] with default config.
///
/// # Errors
///
/// See [`PointClassifier::classify`].
pub fn classify_points<L: CandidateLookup + ?Sized>(
    observations: &[Point],
    lookup: &L,
    matches: &BestMatches,
) -> Result<ClassificationOutcome, ClassifyError> {
    PointClassifier::new(lookup, matches).classify(observations)
}
