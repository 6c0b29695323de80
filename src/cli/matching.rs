use anyhow::Context;
use clap::Args;

use crate::cli::{InputArgs, OutputFormat};
use crate::matching::engine::{BestMatches, MatchingEngine, RankedCandidate};
use crate::parsing::dataset::FunctionSets;

#[derive(Args)]
pub struct MatchArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Also show the N best-ranked ideal functions per training function
    #[arg(long)]
    pub top: Option<usize>,
}

/// Execute match subcommand
///
/// # Errors
///
/// Returns an error if the inputs cannot be loaded or matching fails.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: MatchArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let sets = FunctionSets::load(&args.input.train, &args.input.ideal, args.input.layout())
        .context("Error loading the training and ideal data sets")?;

    if verbose {
        eprintln!(
            "Loaded {} training functions and {} ideal functions ({} rows)",
            sets.train.series.len(),
            sets.ideal.series.len(),
            sets.ideal.row_count()
        );
    }

    let engine = MatchingEngine::new(&sets.ideal.series);
    let matches = engine.find_best_matches(&sets.train.series)?;

    let rankings = match args.top {
        Some(n) => sets
            .train
            .series
            .iter()
            .map(|reference| -> anyhow::Result<_> {
                let mut ranked = engine.rank_candidates(reference)?;
                ranked.truncate(n);
                Ok((reference.name.clone(), ranked))
            })
            .collect::<anyhow::Result<Vec<_>>>()?,
        None => Vec::new(),
    };

    match format {
        OutputFormat::Text => print_text_results(&matches, &rankings),
        OutputFormat::Json => print_json_results(&matches, &rankings)?,
        OutputFormat::Tsv => print_tsv_results(&matches),
    }

    Ok(())
}

pub(crate) fn print_match_table(matches: &BestMatches) {
    println!(
        "{:<12} {:<12} {:>18} {:>16}",
        "Training", "Ideal", "Total deviation", "Max deviation"
    );
    for m in matches {
        println!(
            "{:<12} {:<12} {:>18.6} {:>16.6}",
            m.reference_name, m.candidate_name, m.total_absolute_deviation, m.max_absolute_deviation
        );
    }
}

fn print_text_results(matches: &BestMatches, rankings: &[(String, Vec<RankedCandidate>)]) {
    println!("Best Matching Ideal Functions");
    println!("{}", "=".repeat(60));
    print_match_table(matches);

    for (reference, ranked) in rankings {
        println!("\nTop candidates for {reference}:");
        for (rank, candidate) in ranked.iter().enumerate() {
            println!(
                "  {:>3}. {:<12} total {:.6}  max {:.6}",
                rank + 1,
                candidate.candidate_name,
                candidate.score.total_absolute_deviation,
                candidate.score.max_absolute_deviation
            );
        }
    }
}

fn print_json_results(
    matches: &BestMatches,
    rankings: &[(String, Vec<RankedCandidate>)],
) -> anyhow::Result<()> {
    let mut output = serde_json::json!({
        "matches": matches.as_slice(),
    });

    if !rankings.is_empty() {
        let ranked: serde_json::Map<String, serde_json::Value> = rankings
            .iter()
            .map(|(reference, ranked)| {
                serde_json::to_value(ranked).map(|value| (reference.clone(), value))
            })
            .collect::<Result<_, serde_json::Error>>()?;
        output["rankings"] = serde_json::Value::Object(ranked);
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_results(matches: &BestMatches) {
    println!("training_function\tideal_function\ttotal_absolute_deviation\tmax_absolute_deviation");
    for m in matches {
        println!(
            "{}\t{}\t{:.6}\t{:.6}",
            m.reference_name, m.candidate_name, m.total_absolute_deviation, m.max_absolute_deviation
        );
    }
}
