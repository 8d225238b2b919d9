use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use shirushi_core::{LabelEncoder, TokenizerConfig};
use shirushi_trainer::data::load_conll;

/// Fit the tokenizer and label encoder on a training corpus and persist
/// both as JSON artifacts for training and inference.
#[derive(Parser, Debug)]
#[command(name = "prepare")]
struct Args {
    /// Training corpus in token-per-line format.
    #[arg(long)]
    corpus: PathBuf,

    /// Directory the fitted artifacts are written to.
    #[arg(long, default_value = "artifacts")]
    output: PathBuf,

    /// Fixed sequence length after padding/truncation.
    #[arg(long, default_value_t = 32)]
    max_seq_len: usize,

    /// Fixed word length for character ids.
    #[arg(long, default_value_t = 16)]
    max_word_len: usize,

    /// Skip the character-level vocabulary.
    #[arg(long)]
    no_char_level: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let sentences = load_conll(&args.corpus)
        .with_context(|| format!("loading corpus {:?}", args.corpus))?;
    tracing::info!(sentences = sentences.len(), "loaded training corpus");

    let texts: Vec<String> = sentences.iter().map(|s| s.tokens.join(" ")).collect();
    let labels: Vec<Vec<String>> = sentences.iter().map(|s| s.labels.clone()).collect();

    let tokenizer = TokenizerConfig::new()
        .with_char_level(!args.no_char_level)
        .fit(&texts, args.max_seq_len, args.max_word_len);
    let encoder = LabelEncoder::fit(&labels, Some(args.max_seq_len), 0)?;

    std::fs::create_dir_all(&args.output)?;
    let tokenizer_path = args.output.join("tokenizer.json");
    let labels_path = args.output.join("labels.json");
    tokenizer.save(&tokenizer_path)?;
    encoder.save(&labels_path)?;

    tracing::info!(
        word_vocab = tokenizer.vocab_size(),
        char_vocab = tokenizer.char_vocab_size(),
        classes = encoder.num_classes(),
        ?tokenizer_path,
        ?labels_path,
        "fitted artifacts written"
    );

    Ok(())
}
