//! Line charts of the training functions and of the selected ideal functions.
//!
//! Charts are rendered as SVG with `plotters`:
//!
//! - `train_data.svg`: every training function over x
//! - `matched_ideal_data.svg`: the ideal function chosen for each training function

pub mod chart;

pub use chart::{
    plot_matched_ideal, plot_training, write_charts, ChartPaths, PlotError, MATCHED_CHART_FILE,
    TRAIN_CHART_FILE,
};
