use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::warn;

use crate::core::series::Series;

/// Resolves the y value of a named candidate series at an exact x coordinate
pub trait CandidateLookup {
    fn lookup(&self, candidate_name: &str, x: f64) -> Option<f64>;
}

/// Map key for exact x equality. `-0.0` and `0.0` compare equal as floats,
/// so both are folded onto the same key.
#[inline]
fn x_key(x: f64) -> u64 {
    if x == 0.0 {
        0.0_f64.to_bits()
    } else {
        x.to_bits()
    }
}

/// Hash index over a set of candidate series: name -> (x -> y)
#[derive(Debug, Default)]
pub struct SeriesIndex {
    by_name: HashMap<String, HashMap<u64, f64>>,
}

impl SeriesIndex {
    /// Index every series. If a series repeats an x value the first
    /// occurrence is kept, matching a first-row lookup in the source table.
    ///
    /// Names are unique keys: when two series share a name, the first one is
    /// indexed and later ones are ignored whole (never merged point by point).
    pub fn new<'a>(series: impl IntoIterator<Item = &'a Series>) -> Self {
        let mut by_name: HashMap<String, HashMap<u64, f64>> = HashMap::new();
        for s in series {
            match by_name.entry(s.name.clone()) {
                Entry::Occupied(_) => {
                    warn!("Ignoring repeated candidate series '{}'", s.name);
                }
                Entry::Vacant(slot) => {
                    let values = slot.insert(HashMap::with_capacity(s.points.len()));
                    for point in &s.points {
                        values.entry(x_key(point.x)).or_insert(point.y);
                    }
                }
            }
        }
        Self { by_name }
    }

    #[must_use]
    pub fn contains(&self, candidate_name: &str) -> bool {
        self.by_name.contains_key(candidate_name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl CandidateLookup for SeriesIndex {
    fn lookup(&self, candidate_name: &str, x: f64) -> Option<f64> {
        self.by_name
            .get(candidate_name)
            .and_then(|values| values.get(&x_key(x)))
            .copied()
    }
}

impl<F> CandidateLookup for F
where
    F: Fn(&str, f64) -> Option<f64>,
{
    fn lookup(&self, candidate_name: &str, x: f64) -> Option<f64> {
        self(candidate_name, x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::series::Point;

    #[test]
    fn test_exact_lookup() {
        let series = vec![
            Series::new("y1", vec![Point::new(-1.0, 5.0), Point::new(0.5, 6.0)]),
            Series::new("y2", vec![Point::new(-1.0, 7.0)]),
        ];
        let index = SeriesIndex::new(&series);

        assert_eq!(index.len(), 2);
        assert_eq!(index.lookup("y1", 0.5), Some(6.0));
        assert_eq!(index.lookup("y2", -1.0), Some(7.0));
        assert_eq!(index.lookup("y2", 0.5), None);
        assert_eq!(index.lookup("y3", -1.0), None);
        // No tolerance: a nearby x is not a match
        assert_eq!(index.lookup("y1", 0.500_000_1), None);
    }

    #[test]
    fn test_signed_zero() {
        let series = vec![Series::new("y1", vec![Point::new(-0.0, 3.0)])];
        let index = SeriesIndex::new(&series);
        assert_eq!(index.lookup("y1", 0.0), Some(3.0));
    }

    #[test]
    fn test_duplicate_x_keeps_first() {
        let series = vec![Series::new(
            "y1",
            vec![Point::new(1.0, 10.0), Point::new(1.0, 20.0)],
        )];
        let index = SeriesIndex::new(&series);
        assert_eq!(index.lookup("y1", 1.0), Some(10.0));
    }

    #[test]
    fn test_repeated_name_keeps_first_series() {
        let series = vec![
            Series::new("y1", vec![Point::new(1.0, 10.0)]),
            Series::new("y1", vec![Point::new(1.0, 99.0), Point::new(2.0, 20.0)]),
        ];
        let index = SeriesIndex::new(&series);

        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup("y1", 1.0), Some(10.0));
        // The second series contributes nothing, not even its extra x values
        assert_eq!(index.lookup("y1", 2.0), None);
    }

    #[test]
    fn test_closure_lookup() {
        let lookup = |name: &str, x: f64| (name == "y1").then_some(x * 2.0);
        assert_eq!(lookup.lookup("y1", 2.0), Some(4.0));
        assert_eq!(lookup.lookup("y2", 2.0), None);
    }
}
