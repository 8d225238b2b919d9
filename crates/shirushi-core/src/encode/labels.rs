//! # Sequential Label Encoder
//!
//! Vocabulary and fixed-length encoding for per-token labels, plus the
//! inverse mapping used at inference time to turn predicted class ids back
//! into label strings.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::encode::vocab::TokenId;
use crate::error::{Result, ShirushiError};

/// Internal sentinel marking padded positions before the mask is derived.
/// Distinct from every valid class id.
const PAD_SENTINEL: TokenId = -1;

/// A fitted encoder for per-token label sequences.
///
/// Class ids are dense and 0-based, assigned over the lexicographically
/// sorted set of distinct labels so the index-to-label mapping is stable
/// across fits on the same label set. Labels have no out-of-vocabulary
/// handling: an unseen label at transform time is an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
    index: HashMap<String, TokenId>,
    max_seq_len: usize,
    pad_value: TokenId,
}

impl LabelEncoder {
    /// Fit on a nested list of per-sequence labels.
    ///
    /// When `max_seq_len` is `None` the longest observed sequence sets the
    /// fixed output length. `pad_value` is the value written into padded
    /// positions of the encoded array after the mask is derived.
    pub fn fit<S: AsRef<str>>(
        labels: &[Vec<S>],
        max_seq_len: Option<usize>,
        pad_value: TokenId,
    ) -> Result<Self> {
        let distinct: BTreeSet<&str> = labels
            .iter()
            .flat_map(|seq| seq.iter().map(AsRef::as_ref))
            .collect();
        if distinct.is_empty() {
            return Err(ShirushiError::EmptyCorpus);
        }

        let classes: Vec<String> = distinct.into_iter().map(str::to_string).collect();
        let index = classes
            .iter()
            .enumerate()
            .map(|(i, label)| (label.clone(), i as TokenId))
            .collect();

        let max_seq_len = match max_seq_len {
            Some(len) => len,
            None => labels
                .iter()
                .map(Vec::len)
                .max()
                .ok_or(ShirushiError::EmptyCorpus)?,
        };

        tracing::debug!(
            num_classes = classes.len(),
            max_seq_len,
            "fitted label encoder"
        );

        Ok(Self {
            classes,
            index,
            max_seq_len,
            pad_value,
        })
    }

    /// Encode label sequences to `(encoded, mask)`, both of shape
    /// `(batch, max_seq_len)`.
    ///
    /// Sequences are post-padded and post-truncated. The mask is 1 at real
    /// positions; padded positions carry the configured `pad_value`.
    pub fn transform<S: AsRef<str>>(
        &self,
        labels: &[Vec<S>],
    ) -> Result<(Vec<Vec<TokenId>>, Vec<Vec<TokenId>>)> {
        let mut encoded = Vec::with_capacity(labels.len());
        let mut masks = Vec::with_capacity(labels.len());

        for seq in labels {
            let mut row: Vec<TokenId> = seq
                .iter()
                .map(|label| {
                    self.index
                        .get(label.as_ref())
                        .copied()
                        .ok_or_else(|| ShirushiError::UnknownLabel {
                            label: label.as_ref().to_string(),
                        })
                })
                .collect::<Result<_>>()?;
            row.truncate(self.max_seq_len);
            row.resize(self.max_seq_len, PAD_SENTINEL);

            let mask: Vec<TokenId> = row
                .iter()
                .map(|&id| TokenId::from(id != PAD_SENTINEL))
                .collect();
            for id in row.iter_mut() {
                if *id == PAD_SENTINEL {
                    *id = self.pad_value;
                }
            }

            encoded.push(row);
            masks.push(mask);
        }

        Ok((encoded, masks))
    }

    /// Decode predicted class ids back into label strings.
    ///
    /// For each row only mask-nonzero positions are kept; without a mask
    /// every position is treated as real. Must be called on the same
    /// fitted instance that produced the training-time encoding.
    pub fn inverse_transform(
        &self,
        preds: &[Vec<TokenId>],
        mask: Option<&[Vec<TokenId>]>,
    ) -> Result<Vec<Vec<String>>> {
        if let Some(mask) = mask {
            if mask.len() != preds.len() {
                return Err(ShirushiError::LengthMismatch {
                    context: "decode mask batch",
                    expected: preds.len(),
                    found: mask.len(),
                });
            }
        }

        let mut rows = Vec::with_capacity(preds.len());
        for (i, pred) in preds.iter().enumerate() {
            let row_mask = mask.map(|m| &m[i]);
            if let Some(row_mask) = row_mask {
                if row_mask.len() != pred.len() {
                    return Err(ShirushiError::LengthMismatch {
                        context: "decode mask row",
                        expected: pred.len(),
                        found: row_mask.len(),
                    });
                }
            }

            let mut labels = Vec::new();
            for (j, &id) in pred.iter().enumerate() {
                if let Some(row_mask) = row_mask {
                    if row_mask[j] == 0 {
                        continue;
                    }
                }
                let label = usize::try_from(id)
                    .ok()
                    .and_then(|idx| self.classes.get(idx))
                    .ok_or(ShirushiError::UnknownLabelIndex {
                        index: id,
                        num_classes: self.classes.len(),
                    })?;
                labels.push(label.clone());
            }
            rows.push(labels);
        }

        Ok(rows)
    }

    /// Distinct labels in id order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn max_seq_len(&self) -> usize {
        self.max_seq_len
    }

    pub fn pad_value(&self) -> TokenId {
        self.pad_value
    }

    /// Persist the fitted state as JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Load fitted state persisted with [`LabelEncoder::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
