use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::series::Series;
use crate::matching::scoring::DeviationScore;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    #[error(
        "Series length mismatch: reference '{reference}' has {reference_len} points \
         but candidate '{candidate}' has {candidate_len}"
    )]
    ShapeMismatch {
        reference: String,
        reference_len: usize,
        candidate: String,
        candidate_len: usize,
    },

    #[error("Empty input: no {0} series provided")]
    EmptyInput(&'static str),

    #[error("Duplicate reference series name: {0}")]
    DuplicateReference(String),
}

/// The ideal function selected for one training function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Name of the training (reference) series
    pub reference_name: String,

    /// Name of the selected ideal (candidate) series
    pub candidate_name: String,

    /// Sum of absolute deviations between the two series
    pub total_absolute_deviation: f64,

    /// Largest absolute deviation between the two series
    pub max_absolute_deviation: f64,
}

impl MatchResult {
    pub fn new(reference: &Series, candidate: &Series, score: DeviationScore) -> Self {
        Self {
            reference_name: reference.name.clone(),
            candidate_name: candidate.name.clone(),
            total_absolute_deviation: score.total_absolute_deviation,
            max_absolute_deviation: score.max_absolute_deviation,
        }
    }
}

/// Best matches keyed by reference name, iterated in reference order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BestMatches {
    results: Vec<MatchResult>,

    /// Index: reference name -> position in `results`
    by_reference: HashMap<String, usize>,
}

impl BestMatches {
    /// Build the mapping from results in reference enumeration order.
    ///
    /// # Errors
    ///
    /// Returns `MatchError::DuplicateReference` if two results share a reference name.
    pub fn from_results(results: Vec<MatchResult>) -> Result<Self, MatchError> {
        let mut by_reference = HashMap::with_capacity(results.len());
        for (i, result) in results.iter().enumerate() {
            if by_reference
                .insert(result.reference_name.clone(), i)
                .is_some()
            {
                return Err(MatchError::DuplicateReference(
                    result.reference_name.clone(),
                ));
            }
        }
        Ok(Self {
            results,
            by_reference,
        })
    }

    #[must_use]
    pub fn get(&self, reference_name: &str) -> Option<&MatchResult> {
        self.by_reference
            .get(reference_name)
            .map(|&i| &self.results[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatchResult> {
        self.results.iter()
    }

    /// Selected candidate names in reference order (may repeat)
    pub fn candidate_names(&self) -> impl Iterator<Item = &str> {
        self.results.iter().map(|r| r.candidate_name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[MatchResult] {
        &self.results
    }
}

impl<'a> IntoIterator for &'a BestMatches {
    type Item = &'a MatchResult;
    type IntoIter = std::slice::Iter<'a, MatchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One candidate's score against a reference, with its pool position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    pub candidate_name: String,
    pub pool_index: usize,
    pub score: DeviationScore,
}

/// Selects the best-fitting candidate series for each reference series
pub struct MatchingEngine<'a> {
    candidates: &'a [Series],
}

impl<'a> MatchingEngine<'a> {
    #[must_use]
    pub fn new(candidates: &'a [Series]) -> Self {
        Self { candidates }
    }

    /// Score every candidate against `reference`, ascending by total deviation.
    ///
    /// The sort is stable, so equal scores keep candidate pool order.
    ///
    /// # Errors
    ///
    /// Returns `MatchError::EmptyInput` for an empty pool or
    /// `MatchError::ShapeMismatch` if any candidate differs in length.
    pub fn rank_candidates(&self, reference: &Series) -> Result<Vec<RankedCandidate>, MatchError> {
        if self.candidates.is_empty() {
            return Err(MatchError::EmptyInput("candidate"));
        }

        let mut ranked = self
            .candidates
            .iter()
            .enumerate()
            .map(|(pool_index, candidate)| {
                DeviationScore::calculate(reference, candidate).map(|score| RankedCandidate {
                    candidate_name: candidate.name.clone(),
                    pool_index,
                    score,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        ranked.sort_by(|a, b| {
            a.score
                .total_absolute_deviation
                .total_cmp(&b.score.total_absolute_deviation)
        });

        Ok(ranked)
    }

    /// Find the candidate with the lowest total absolute deviation from `reference`.
    ///
    /// On equal scores the candidate earliest in the pool wins.
    ///
    /// # Errors
    ///
    /// Returns `MatchError::EmptyInput` for an empty pool or
    /// `MatchError::ShapeMismatch` if any candidate differs in length.
    pub fn best_match(&self, reference: &Series) -> Result<MatchResult, MatchError> {
        let mut best: Option<(&Series, DeviationScore)> = None;

        for candidate in self.candidates {
            let score = DeviationScore::calculate(reference, candidate)?;
            let replace = match &best {
                None => true,
                Some((_, current)) => {
                    score
                        .total_absolute_deviation
                        .total_cmp(&current.total_absolute_deviation)
                        == Ordering::Less
                }
            };
            if replace {
                best = Some((candidate, score));
            }
        }

        let (candidate, score) = best.ok_or(MatchError::EmptyInput("candidate"))?;
        Ok(MatchResult::new(reference, candidate, score))
    }

    /// Select the best candidate for every reference series.
    ///
    /// The whole pass fails if any pair fails; no partial mapping is returned.
    ///
    /// # Errors
    ///
    /// Returns `MatchError::EmptyInput` if either input is empty,
    /// `MatchError::ShapeMismatch` on a length mismatch, or
    /// `MatchError::DuplicateReference` if reference names repeat.
    pub fn find_best_matches(&self, references: &[Series]) -> Result<BestMatches, MatchError> {
        if references.is_empty() {
            return Err(MatchError::EmptyInput("reference"));
        }
        if self.candidates.is_empty() {
            return Err(MatchError::EmptyInput("candidate"));
        }

        let results = references
            .iter()
            .map(|reference| {
                let result = self.best_match(reference)?;
                debug!(
                    "{} -> {} (total deviation {:.6}, max deviation {:.6})",
                    result.reference_name,
                    result.candidate_name,
                    result.total_absolute_deviation,
                    result.max_absolute_deviation
                );
                Ok(result)
            })
            .collect::<Result<Vec<_>, MatchError>>()?;

        let matches = BestMatches::from_results(results)?;
        info!(
            "Matched {} reference series against {} candidates",
            matches.len(),
            self.candidates.len()
        );
        Ok(matches)
    }
}

/// Convenience wrapper around [`MatchingEngine::find_best_matches`].
///
/// # Errors
///
/// See [`MatchingEngine::find_best_matches`].
pub fn find_best_matches(
    references: &[Series],
    candidates: &[Series],
) -> Result<BestMatches, MatchError> {
    MatchingEngine::new(candidates).find_best_matches(references)
}
