//! Evaluation-file formatting and the external scorer subprocess.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use shirushi_core::ShirushiError;

/// Write the line-oriented evaluation file consumed by the scorer:
/// one `token gold predicted` line per token, a blank line after each
/// sequence.
///
/// The three batches and every per-sequence triple must be parallel; a
/// mismatch is an error rather than silent truncation.
pub fn write_eval_file<P: AsRef<Path>>(
    path: P,
    sentences: &[Vec<String>],
    gold: &[Vec<String>],
    pred: &[Vec<String>],
) -> Result<()> {
    check_len("gold batch", sentences.len(), gold.len())?;
    check_len("prediction batch", sentences.len(), pred.len())?;

    let file = File::create(path.as_ref())
        .with_context(|| format!("creating eval file {:?}", path.as_ref()))?;
    let mut writer = BufWriter::new(file);

    for ((tokens, labels), predictions) in sentences.iter().zip(gold).zip(pred) {
        check_len("gold sequence", tokens.len(), labels.len())?;
        check_len("prediction sequence", tokens.len(), predictions.len())?;

        for ((token, label), prediction) in tokens.iter().zip(labels).zip(predictions) {
            writeln!(writer, "{token} {label} {prediction}")?;
        }
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}

fn check_len(context: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(ShirushiError::LengthMismatch {
            context,
            expected,
            found,
        }
        .into());
    }
    Ok(())
}

/// Run the external scoring script with `eval_file` as its standard input,
/// capture its report to `output_file` and return it.
pub fn run_scorer(script: &Path, eval_file: &Path, output_file: &Path) -> Result<String> {
    let stdin = File::open(eval_file)
        .with_context(|| format!("opening eval file {eval_file:?}"))?;

    let output = Command::new(script)
        .stdin(Stdio::from(stdin))
        .output()
        .with_context(|| format!("running scorer {script:?}"))?;

    if !output.status.success() {
        return Err(ShirushiError::Scorer {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
        .into());
    }

    let report = String::from_utf8_lossy(&output.stdout).into_owned();
    std::fs::write(output_file, &report)
        .with_context(|| format!("writing scorer report {output_file:?}"))?;

    tracing::info!(?output_file, "scorer report written");

    Ok(report)
}
