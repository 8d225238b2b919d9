use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use shirushi_core::ShirushiError;
use shirushi_trainer::data::load_conll;
use shirushi_trainer::eval::{run_scorer, write_eval_file};

/// Score a predictions corpus against a gold corpus with the external
/// evaluation script.
#[derive(Parser, Debug)]
#[command(name = "evaluate")]
struct Args {
    /// Gold corpus in token-per-line format.
    #[arg(long)]
    gold: PathBuf,

    /// Predictions in the same layout as the gold corpus.
    #[arg(long)]
    predictions: PathBuf,

    /// Path of the external scoring script.
    #[arg(long)]
    script: PathBuf,

    /// Where the formatted evaluation file is written.
    #[arg(long, default_value = "evaluation/pred.txt")]
    eval_file: PathBuf,

    /// Where the scorer report is written.
    #[arg(long, default_value = "evaluation/eval.txt")]
    report: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let gold = load_conll(&args.gold).with_context(|| format!("loading gold {:?}", args.gold))?;
    let pred = load_conll(&args.predictions)
        .with_context(|| format!("loading predictions {:?}", args.predictions))?;

    if gold.len() != pred.len() {
        return Err(ShirushiError::LengthMismatch {
            context: "gold/prediction corpora",
            expected: gold.len(),
            found: pred.len(),
        }
        .into());
    }

    let tokens: Vec<Vec<String>> = gold.iter().map(|s| s.tokens.clone()).collect();
    let gold_labels: Vec<Vec<String>> = gold.iter().map(|s| s.labels.clone()).collect();
    let pred_labels: Vec<Vec<String>> = pred.iter().map(|s| s.labels.clone()).collect();

    if let Some(dir) = args.eval_file.parent() {
        std::fs::create_dir_all(dir)?;
    }
    if let Some(dir) = args.report.parent() {
        std::fs::create_dir_all(dir)?;
    }

    write_eval_file(&args.eval_file, &tokens, &gold_labels, &pred_labels)?;
    let report = run_scorer(&args.script, &args.eval_file, &args.report)?;
    println!("{report}");

    Ok(())
}
