use std::ops::Range;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::series::Point;
use crate::matching::engine::BestMatches;
use crate::parsing::dataset::FunctionSets;
use crate::parsing::table::FunctionTable;

pub const TRAIN_CHART_FILE: &str = "train_data.svg";
pub const MATCHED_CHART_FILE: &str = "matched_ideal_data.svg";

const CHART_SIZE: (u32, u32) = (1024, 768);
const MAX_LBL_WIDTH: usize = 80;

const PALETTE: [RGBColor; 8] = [
    RED,
    GREEN,
    BLUE,
    BLACK,
    MAGENTA,
    CYAN,
    RGBColor(255, 165, 0), // Orange
    RGBColor(128, 0, 128), // Purple
];

#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create chart directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error drawing chart: {0}")]
    Draw(#[from] DrawingAreaErrorKind<std::io::Error>),

    #[error("Ideal function '{0}' not found")]
    MissingSeries(String),

    #[error("Nothing to plot for chart '{0}'")]
    Empty(String),
}

/// Paths of the files written by [`write_charts`]
#[derive(Debug, Clone)]
pub struct ChartPaths {
    pub train: PathBuf,
    pub matched: PathBuf,
}

/// One labelled line on a chart
struct ChartLine<'a> {
    label: String,
    points: &'a [Point],
}

/// Titles and axis descriptions of a chart
struct ChartText<'a> {
    title: &'a str,
    x_desc: &'a str,
    y_desc: &'a str,
}

/// Draw the training functions into `dir/train_data.svg`.
///
/// # Errors
///
/// Returns `PlotError::Empty` if the table has no points, or
/// `PlotError::Draw` if the chart cannot be rendered or written.
pub fn plot_training(dir: &Path, train: &FunctionTable) -> Result<PathBuf, PlotError> {
    let lines: Vec<ChartLine<'_>> = train
        .series
        .iter()
        .map(|s| ChartLine {
            label: format!("Train {}", s.name),
            points: &s.points,
        })
        .collect();

    let path = dir.join(TRAIN_CHART_FILE);
    draw_lines(
        &path,
        &ChartText {
            title: "Training functions",
            x_desc: "x",
            y_desc: "Training y",
        },
        &lines,
    )?;
    Ok(path)
}

/// Draw the ideal function selected for each training function into
/// `dir/matched_ideal_data.svg`, in training order.
///
/// # Errors
///
/// Returns `PlotError::MissingSeries` if a selected function is not in
/// `ideal`, `PlotError::Empty` if there is nothing to draw, or
/// `PlotError::Draw` if the chart cannot be rendered or written.
pub fn plot_matched_ideal(
    dir: &Path,
    ideal: &FunctionTable,
    matches: &BestMatches,
) -> Result<PathBuf, PlotError> {
    let lines = matches
        .iter()
        .map(|m| {
            let series = ideal
                .get(&m.candidate_name)
                .ok_or_else(|| PlotError::MissingSeries(m.candidate_name.clone()))?;
            Ok(ChartLine {
                label: format!("Ideal {} (best match to {})", m.candidate_name, m.reference_name),
                points: &series.points,
            })
        })
        .collect::<Result<Vec<_>, PlotError>>()?;

    let path = dir.join(MATCHED_CHART_FILE);
    draw_lines(
        &path,
        &ChartText {
            title: "Selected ideal functions",
            x_desc: "x",
            y_desc: "Ideal y",
        },
        &lines,
    )?;
    Ok(path)
}

/// Render both charts into `dir`, creating it if needed. Existing files are
/// replaced.
///
/// # Errors
///
/// See [`plot_training`] and [`plot_matched_ideal`].
pub fn write_charts(
    dir: &Path,
    sets: &FunctionSets,
    matches: &BestMatches,
) -> Result<ChartPaths, PlotError> {
    std::fs::create_dir_all(dir)?;
    let train = plot_training(dir, &sets.train)?;
    let matched = plot_matched_ideal(dir, &sets.ideal, matches)?;
    info!("Wrote charts to {}", dir.display());
    Ok(ChartPaths { train, matched })
}

/// Data bounds over all lines, padded so no line sits on the frame
fn bounds(lines: &[ChartLine<'_>]) -> Option<(Range<f64>, Range<f64>)> {
    let mut points = lines.iter().flat_map(|l| l.points.iter());
    let first = points.next()?;
    let (mut x_min, mut x_max, mut y_min, mut y_max) = (first.x, first.x, first.y, first.y);
    for p in points {
        x_min = x_min.min(p.x);
        x_max = x_max.max(p.x);
        y_min = y_min.min(p.y);
        y_max = y_max.max(p.y);
    }
    Some((pad(x_min, x_max, 0.0), pad(y_min, y_max, 0.05)))
}

fn pad(min: f64, max: f64, fraction: f64) -> Range<f64> {
    let span = max - min;
    if span > 0.0 {
        (min - span * fraction)..(max + span * fraction)
    } else {
        (min - 1.0)..(max + 1.0)
    }
}

fn draw_lines(path: &Path, text: &ChartText<'_>, lines: &[ChartLine<'_>]) -> Result<(), PlotError> {
    let (x_range, y_range) = bounds(lines).ok_or_else(|| PlotError::Empty(text.title.to_string()))?;
    debug!(
        "Drawing {} lines to {} (x {:?}, y {:?})",
        lines.len(),
        path.display(),
        x_range,
        y_range
    );

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(text.title, ("sans-serif", 20).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(text.x_desc)
        .y_desc(text.y_desc)
        .label_style(("sans-serif", 12))
        .draw()?;

    for (line, color) in lines.iter().zip(PALETTE.iter().cycle()) {
        let style = ShapeStyle::from(color).stroke_width(2);
        chart
            .draw_series(LineSeries::new(line.points.iter().map(|p| (p.x, p.y)), style))?
            .label(shorten(&line.label))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    }

    chart
        .configure_series_labels()
        .label_font(("sans-serif", 12))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Shorten a legend label and add `...` if too long
fn shorten(label: &str) -> String {
    if label.chars().count() > MAX_LBL_WIDTH {
        let mut s: String = label.chars().take(MAX_LBL_WIDTH - 3).collect();
        s.push_str("...");
        s
    } else {
        label.to_string()
    }
}
