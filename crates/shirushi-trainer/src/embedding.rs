//! Pretrained embedding matrices over a fitted word vocabulary.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{bail, Context, Result};
use shirushi_core::Vocab;

/// Build a `(vocab_size, dim)` embedding matrix from a GloVe-format text
/// file (`word v1 v2 ... vd` per line).
///
/// Rows for vocabulary words without a pretrained vector are filled with
/// seeded random values in `[0, 1)`, so the matrix is reproducible for a
/// given corpus, embedding file and seed.
pub fn glove_embedding_matrix<P: AsRef<Path>>(
    path: P,
    vocab: &Vocab,
    seed: u64,
) -> Result<Vec<Vec<f32>>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening embeddings {path:?}"))?;
    let reader = BufReader::new(file);

    let mut pretrained: Vec<(String, Vec<f32>)> = Vec::new();
    let mut dim = 0usize;

    for line in reader.lines() {
        let line = line?;
        let mut fields = line.split_whitespace();
        let Some(word) = fields.next() else { continue };
        let vector: Vec<f32> = fields
            .map(str::parse)
            .collect::<std::result::Result<_, _>>()
            .with_context(|| format!("parsing embedding vector for {word:?}"))?;
        if vector.is_empty() {
            continue;
        }
        if dim == 0 {
            dim = vector.len();
        } else if vector.len() != dim {
            bail!(
                "inconsistent embedding dimension for {word:?}: {} != {dim}",
                vector.len()
            );
        }
        pretrained.push((word.to_string(), vector));
    }

    if dim == 0 {
        bail!("no embedding vectors found in {path:?}");
    }

    let rows = vocab.len();
    let mut rng = oorandom::Rand32::new(seed);
    let mut matrix: Vec<Vec<f32>> = (0..rows)
        .map(|_| (0..dim).map(|_| rng.rand_float()).collect())
        .collect();

    let mut covered = 0usize;
    for (word, vector) in &pretrained {
        if let Some(id) = vocab.get(word) {
            if let Some(row) = matrix.get_mut(id as usize) {
                row.clone_from(vector);
                covered += 1;
            }
        }
    }

    tracing::debug!(
        rows,
        dim,
        covered,
        pretrained = pretrained.len(),
        "built embedding matrix"
    );

    Ok(matrix)
}
