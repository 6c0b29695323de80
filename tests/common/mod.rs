//! Synthetic data sets shaped like the real inputs: 4 training functions,
//! 50 ideal functions and a two-column test table on a shared x grid.

#![allow(dead_code)]

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Training function i is a noisy copy of ideal function `SELECTED[i]`
pub const SELECTED: [usize; 4] = [13, 31, 15, 10];

pub const IDEAL_COUNT: usize = 50;

/// x grid: -5.0, -4.5, ..., 5.0
pub fn grid() -> Vec<f64> {
    (0..=20).map(|i| -5.0 + 0.5 * f64::from(i)).collect()
}

/// Ideal function k; any two differ by at least 1.5 at every x on the grid
pub fn ideal(k: usize, x: f64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let k = k as f64;
    k * x / 10.0 + 2.0 * k
}

/// Deterministic noise in [-0.5, 0.5]
pub fn noise(row: usize, column: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let phase = row as f64 * 1.7 + column as f64;
    0.5 * phase.sin()
}

pub fn train_csv() -> String {
    let mut out = String::from("x,y1,y2,y3,y4\n");
    for (row, x) in grid().into_iter().enumerate() {
        write!(out, "{x}").unwrap();
        for (column, &k) in SELECTED.iter().enumerate() {
            write!(out, ",{}", ideal(k, x) + noise(row, column)).unwrap();
        }
        out.push('\n');
    }
    out
}

pub fn ideal_csv() -> String {
    let mut out = String::from("x");
    for k in 1..=IDEAL_COUNT {
        write!(out, ",y{k}").unwrap();
    }
    out.push('\n');
    for x in grid() {
        write!(out, "{x}").unwrap();
        for k in 1..=IDEAL_COUNT {
            write!(out, ",{}", ideal(k, x)).unwrap();
        }
        out.push('\n');
    }
    out
}

/// Every even grid point sits close to ideal 13, every odd one far from everything
pub fn test_csv() -> String {
    let mut out = String::from("x,y\n");
    for (i, x) in grid().into_iter().enumerate() {
        let y = if i % 2 == 0 { ideal(13, x) + 0.1 } else { 1000.0 };
        writeln!(out, "{x},{y}").unwrap();
    }
    out
}

pub fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

pub struct Inputs {
    pub train: PathBuf,
    pub ideal: PathBuf,
    pub test: PathBuf,
}

pub fn write_inputs(dir: &Path) -> Inputs {
    Inputs {
        train: write(dir, "train.csv", &train_csv()),
        ideal: write(dir, "ideal.csv", &ideal_csv()),
        test: write(dir, "test.csv", &test_csv()),
    }
}
