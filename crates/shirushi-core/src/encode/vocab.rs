//! Fitted token vocabularies with reserved padding and out-of-vocabulary ids.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Element type of all encoded arrays.
pub type TokenId = i32;

/// A token-to-index mapping built from a training corpus.
///
/// Index 0 is always the padding token and index 1 the out-of-vocabulary
/// token. Real tokens are assigned from 2 upwards, ordered by descending
/// corpus frequency with ties broken by first appearance, so refitting on
/// the same corpus reproduces the same mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vocab {
    index: HashMap<String, TokenId>,
    pad_token: String,
    oov_token: String,
}

impl Vocab {
    /// Reserved index for padding positions.
    pub const PAD_ID: TokenId = 0;
    /// Reserved index for tokens unseen during fit.
    pub const OOV_ID: TokenId = 1;

    /// Build a vocabulary from `(token, count)` pairs listed in first-seen
    /// order. The pad token is assigned last and overrides any counted
    /// token with the same spelling.
    pub fn from_counts(
        counts: Vec<(String, usize)>,
        pad_token: impl Into<String>,
        oov_token: impl Into<String>,
    ) -> Self {
        let pad_token = pad_token.into();
        let oov_token = oov_token.into();

        let mut ordered = counts;
        ordered.sort_by(|a, b| b.1.cmp(&a.1));

        let mut index = HashMap::with_capacity(ordered.len() + 2);
        index.insert(oov_token.clone(), Self::OOV_ID);
        let mut next = Self::OOV_ID + 1;
        for (token, _) in ordered {
            if index.contains_key(&token) {
                continue;
            }
            index.insert(token, next);
            next += 1;
        }
        index.insert(pad_token.clone(), Self::PAD_ID);

        Self {
            index,
            pad_token,
            oov_token,
        }
    }

    /// Look up a token, falling back to the OOV index for unseen tokens.
    pub fn id(&self, token: &str) -> TokenId {
        self.index.get(token).copied().unwrap_or(Self::OOV_ID)
    }

    /// Look up a token without OOV fallback.
    pub fn get(&self, token: &str) -> Option<TokenId> {
        self.index.get(token).copied()
    }

    /// Number of entries, padding and OOV tokens included.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the vocabulary holds no entries.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Iterate over `(token, id)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, TokenId)> {
        self.index.iter().map(|(t, &i)| (t.as_str(), i))
    }

    pub fn pad_token(&self) -> &str {
        &self.pad_token
    }

    pub fn oov_token(&self) -> &str {
        &self.oov_token
    }
}

/// Accumulates token counts while remembering first-seen order.
#[derive(Debug, Default)]
pub(crate) struct TokenCounter {
    order: Vec<String>,
    counts: HashMap<String, usize>,
}

impl TokenCounter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, token: &str) {
        match self.counts.get_mut(token) {
            Some(count) => *count += 1,
            None => {
                self.order.push(token.to_string());
                self.counts.insert(token.to_string(), 1);
            }
        }
    }

    pub(crate) fn into_counts(mut self) -> Vec<(String, usize)> {
        self.order
            .drain(..)
            .map(|token| {
                let count = self.counts[&token];
                (token, count)
            })
            .collect()
    }
}
