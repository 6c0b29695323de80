use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::classify::classifier::{
    ClassificationOutcome, ClassifierConfig, PointClassifier, DEFAULT_TOLERANCE_FACTOR,
};
use crate::classify::lookup::SeriesIndex;
use crate::cli::matching::print_match_table;
use crate::cli::{InputArgs, OutputFormat};
use crate::matching::engine::{BestMatches, MatchingEngine};
use crate::parsing::dataset::{load_observations, FunctionSets};
use crate::plot::chart::write_charts;
use crate::report::store::{write_function_tables, write_report};

#[derive(Args)]
pub struct ClassifyArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Test data CSV (x, y)
    #[arg(long)]
    pub test: PathBuf,

    /// Directory to write train.csv, ideal.csv, matches.csv, test_mapped.csv,
    /// test_unmapped.csv and report.json
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Directory to write train_data.svg and matched_ideal_data.svg
    #[arg(long)]
    pub plot_dir: Option<PathBuf>,

    /// Multiplier on each ideal function's maximum training deviation
    #[arg(long, default_value_t = DEFAULT_TOLERANCE_FACTOR)]
    pub tolerance_factor: f64,
}

/// Execute classify subcommand
///
/// # Errors
///
/// Returns an error if any input cannot be loaded, matching or classification
/// fails, or the report or charts cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ClassifyArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    if !args.tolerance_factor.is_finite() || args.tolerance_factor < 0.0 {
        anyhow::bail!(
            "--tolerance-factor must be a non-negative number, got {}",
            args.tolerance_factor
        );
    }

    info!("Step 1: Loading training, ideal and test data");
    let sets = FunctionSets::load(&args.input.train, &args.input.ideal, args.input.layout())
        .context("Error loading the training and ideal data sets")?;
    let observations = load_observations(&args.test).context("Error loading the test data set")?;

    info!("Step 2: Finding the best ideal function for each training function");
    let matches = MatchingEngine::new(&sets.ideal.series).find_best_matches(&sets.train.series)?;

    info!("Step 3: Mapping test points to the selected ideal functions");
    let index = SeriesIndex::new(&sets.ideal.series);
    let config = ClassifierConfig {
        tolerance_factor: args.tolerance_factor,
    };
    let outcome = PointClassifier::with_config(&index, &matches, config)
        .classify(&observations)
        .context("Test data does not share the ideal functions' x values")?;

    if let Some(dir) = &args.output_dir {
        info!("Step 4: Writing data sets and results to {}", dir.display());
        write_function_tables(dir, &sets)
            .and_then(|_| write_report(dir, &matches, &outcome))
            .with_context(|| format!("Error writing results to {}", dir.display()))?;
    }

    if let Some(dir) = &args.plot_dir {
        info!("Step 5: Drawing charts to {}", dir.display());
        write_charts(dir, &sets, &matches)
            .with_context(|| format!("Error drawing charts to {}", dir.display()))?;
    }

    match format {
        OutputFormat::Text => print_text_results(&matches, &outcome, verbose),
        OutputFormat::Json => print_json_results(&matches, &outcome)?,
        OutputFormat::Tsv => print_tsv_results(&outcome),
    }

    Ok(())
}

fn print_text_results(matches: &BestMatches, outcome: &ClassificationOutcome, verbose: bool) {
    println!("Classification Results");
    println!("{}", "=".repeat(60));
    print_match_table(matches);

    println!("\nTest points: {}", outcome.total());
    println!("  Mapped:   {}", outcome.mapped.len());
    println!("  Unmapped: {}", outcome.unmapped.len());

    if verbose {
        println!("\nMapped points:");
        for c in &outcome.mapped {
            println!(
                "  ({:.4}, {:.4}) -> {} (delta {:.6})",
                c.x,
                c.y,
                c.candidate_name.as_deref().unwrap_or("-"),
                c.deviation.unwrap_or_default()
            );
        }
    }
}

fn print_json_results(matches: &BestMatches, outcome: &ClassificationOutcome) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "matches": matches.as_slice(),
        "summary": {
            "total": outcome.total(),
            "mapped": outcome.mapped.len(),
            "unmapped": outcome.unmapped.len(),
        },
        "mapped": outcome.mapped,
        "unmapped": outcome.unmapped,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_results(outcome: &ClassificationOutcome) {
    println!("x\ty\tdelta_y\tideal_function");
    for c in outcome.mapped.iter().chain(&outcome.unmapped) {
        let delta = c.deviation.map(|d| format!("{d:.6}")).unwrap_or_default();
        println!(
            "{}\t{}\t{}\t{}",
            c.x,
            c.y,
            delta,
            c.candidate_name.as_deref().unwrap_or("")
        );
    }
}
