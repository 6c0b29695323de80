use serde::{Deserialize, Serialize};

/// A single (x, y) sample. Observations to be classified are bare points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// A named, ordered sequence of points.
///
/// Training functions, ideal functions and the test data set are all
/// represented by this one type; only the role a series plays differs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Column name in the source table (e.g. `y1`)
    pub name: String,

    /// Samples in source order
    pub points: Vec<Point>,
}

impl Series {
    pub fn new(name: impl Into<String>, points: Vec<Point>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    /// Zip an x column and a y column into a series.
    ///
    /// Returns `None` if the columns have different lengths.
    #[must_use]
    pub fn from_columns(name: impl Into<String>, xs: &[f64], ys: &[f64]) -> Option<Self> {
        if xs.len() != ys.len() {
            return None;
        }
        let points = xs
            .iter()
            .zip(ys)
            .map(|(&x, &y)| Point::new(x, y))
            .collect();
        Some(Self::new(name, points))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn xs(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.x)
    }

    pub fn ys(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.y)
    }
}
