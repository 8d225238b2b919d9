//! # Word and Character Tokenizer
//!
//! Turns preprocessed text into fixed-shape integer arrays a sequence model
//! can consume, and recovers the original surface tokens so predictions can
//! be aligned back to user text.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::encode::vocab::{TokenCounter, TokenId, Vocab};
use crate::error::Result;

/// Configuration for an unfit tokenizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenizerConfig {
    /// Build a secondary character vocabulary and emit char-id arrays.
    pub char_level: bool,
    /// Token standing in for words unseen during fit.
    pub oov_token: String,
    /// Token reserved at index 0 for padding positions.
    pub pad_token: String,
    /// Characters replaced by spaces before whitespace splitting.
    pub filters: String,
    /// Case-fold words before vocabulary fit and lookup. The character
    /// vocabulary always operates on cased text.
    pub lower: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            char_level: true,
            oov_token: "[UNK]".to_string(),
            pad_token: "[PAD]".to_string(),
            filters: String::new(),
            lower: true,
        }
    }
}

impl TokenizerConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the character-level vocabulary.
    pub fn with_char_level(mut self, enabled: bool) -> Self {
        self.char_level = enabled;
        self
    }

    /// Set the out-of-vocabulary token.
    pub fn with_oov_token(mut self, token: impl Into<String>) -> Self {
        self.oov_token = token.into();
        self
    }

    /// Set the padding token.
    pub fn with_pad_token(mut self, token: impl Into<String>) -> Self {
        self.pad_token = token.into();
        self
    }

    /// Set the characters stripped to whitespace before splitting.
    pub fn with_filters(mut self, filters: impl Into<String>) -> Self {
        self.filters = filters.into();
        self
    }

    /// Enable or disable word-level case folding.
    pub fn with_lower(mut self, lower: bool) -> Self {
        self.lower = lower;
        self
    }

    /// Fit a tokenizer on a training corpus. See [`Tokenizer::fit`].
    pub fn fit<S: AsRef<str>>(
        self,
        texts: &[S],
        max_seq_len: usize,
        max_word_len: usize,
    ) -> Tokenizer {
        Tokenizer::fit(self, texts, max_seq_len, max_word_len)
    }
}

/// Fixed-shape encoded batch produced by [`Tokenizer::transform`].
#[derive(Debug, Clone, PartialEq)]
pub struct Encoding {
    /// Word indices, shape `(batch, max_seq_len)`.
    pub word_ids: Vec<Vec<TokenId>>,
    /// Character indices, shape `(batch, max_seq_len, max_word_len)`.
    /// Present only for char-level tokenizers.
    pub char_ids: Option<Vec<Vec<Vec<TokenId>>>>,
    /// Validity mask, 1 where `word_ids` holds real content, 0 at padding.
    pub mask: Vec<Vec<TokenId>>,
}

impl Encoding {
    /// Number of sequences in the batch.
    pub fn batch_size(&self) -> usize {
        self.word_ids.len()
    }
}

/// A fitted tokenizer holding immutable word and character vocabularies.
///
/// Constructed through [`Tokenizer::fit`]; all other operations are
/// read-only and safe to share across threads. Refitting means building a
/// new value, there is no merge of vocabularies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tokenizer {
    config: TokenizerConfig,
    words: Vocab,
    chars: Option<Vocab>,
    max_seq_len: usize,
    max_word_len: usize,
}

impl Tokenizer {
    /// Build word (and optionally character) vocabularies from `texts` and
    /// fix the output dimensions.
    ///
    /// Word tokens are filter-substituted, whitespace-split and lowered
    /// when configured. The character vocabulary is built over every
    /// character of the raw texts, always cased.
    pub fn fit<S: AsRef<str>>(
        config: TokenizerConfig,
        texts: &[S],
        max_seq_len: usize,
        max_word_len: usize,
    ) -> Self {
        let mut word_counter = TokenCounter::new();
        let mut char_counter = TokenCounter::new();

        for text in texts {
            let filtered = substitute_filters(text.as_ref(), &config.filters);
            for token in filtered.split_whitespace() {
                if config.lower {
                    word_counter.add(&token.to_lowercase());
                } else {
                    word_counter.add(token);
                }
            }
            if config.char_level {
                let mut buf = [0u8; 4];
                for ch in text.as_ref().chars() {
                    char_counter.add(ch.encode_utf8(&mut buf));
                }
            }
        }

        let words = Vocab::from_counts(
            word_counter.into_counts(),
            &config.pad_token,
            &config.oov_token,
        );
        let chars = config.char_level.then(|| {
            Vocab::from_counts(
                char_counter.into_counts(),
                &config.pad_token,
                &config.oov_token,
            )
        });

        tracing::debug!(
            word_vocab = words.len(),
            char_vocab = chars.as_ref().map(Vocab::len),
            max_seq_len,
            max_word_len,
            "fitted tokenizer"
        );

        Self {
            config,
            words,
            chars,
            max_seq_len,
            max_word_len,
        }
    }

    /// Recover the surface tokens of `text` as the model will see them:
    /// filter-substituted, whitespace-split and truncated to the sequence
    /// limit, but with the original casing intact.
    pub fn original_tokens(&self, text: &str) -> Vec<String> {
        substitute_filters(text, &self.config.filters)
            .split_whitespace()
            .take(self.max_seq_len)
            .map(str::to_string)
            .collect()
    }

    /// Encode a single text as a one-element batch.
    pub fn transform_text(&self, text: &str) -> Encoding {
        self.transform(&[text])
    }

    /// Encode a batch of raw texts.
    ///
    /// Each text is filter-substituted and whitespace-split, then encoded
    /// to word ids (unseen words map to the OOV index), post-padded or
    /// post-truncated to `max_seq_len`. For char-level tokenizers every
    /// word, padding placeholders included, is encoded to char ids padded
    /// to `max_word_len`.
    pub fn transform<S: AsRef<str>>(&self, texts: &[S]) -> Encoding {
        let sequences: Vec<Vec<String>> = texts
            .iter()
            .map(|text| {
                substitute_filters(text.as_ref(), &self.config.filters)
                    .split_whitespace()
                    .map(str::to_string)
                    .collect()
            })
            .collect();
        self.encode_sequences(&sequences)
    }

    /// Encode a batch of pre-tokenized word sequences.
    ///
    /// Filters are not applied; tokens are used as given (lowered for the
    /// word lookup when configured).
    pub fn transform_tokens(&self, sequences: &[Vec<String>]) -> Encoding {
        self.encode_sequences(sequences)
    }

    fn encode_sequences(&self, sequences: &[Vec<String>]) -> Encoding {
        let mut word_ids = Vec::with_capacity(sequences.len());
        let mut mask = Vec::with_capacity(sequences.len());

        for tokens in sequences {
            let row: Vec<TokenId> = tokens
                .iter()
                .map(|token| {
                    if self.config.lower {
                        self.words.id(&token.to_lowercase())
                    } else {
                        self.words.id(token)
                    }
                })
                .collect();
            let row = pad_row(row, self.max_seq_len, Vocab::PAD_ID);
            mask.push(derive_mask(&row));
            word_ids.push(row);
        }

        let char_ids = self.chars.as_ref().map(|chars| {
            sequences
                .iter()
                .map(|tokens| {
                    // Pad the word list itself with empty placeholders; an
                    // empty word encodes to an all-pad char row.
                    let mut padded: Vec<&str> =
                        tokens.iter().take(self.max_seq_len).map(String::as_str).collect();
                    padded.resize(self.max_seq_len, "");

                    padded
                        .iter()
                        .map(|word| {
                            let mut buf = [0u8; 4];
                            let ids: Vec<TokenId> = word
                                .chars()
                                .map(|ch| chars.id(ch.encode_utf8(&mut buf)))
                                .collect();
                            pad_row(ids, self.max_word_len, Vocab::PAD_ID)
                        })
                        .collect()
                })
                .collect()
        });

        Encoding {
            word_ids,
            char_ids,
            mask,
        }
    }

    /// Word vocabulary size, padding and OOV included.
    pub fn vocab_size(&self) -> usize {
        self.words.len()
    }

    /// Character vocabulary size, if char-level is enabled.
    pub fn char_vocab_size(&self) -> Option<usize> {
        self.chars.as_ref().map(Vocab::len)
    }

    pub fn word_vocab(&self) -> &Vocab {
        &self.words
    }

    pub fn char_vocab(&self) -> Option<&Vocab> {
        self.chars.as_ref()
    }

    pub fn max_seq_len(&self) -> usize {
        self.max_seq_len
    }

    pub fn max_word_len(&self) -> usize {
        self.max_word_len
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Persist the fitted state as JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Load fitted state persisted with [`Tokenizer::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Replace every filtered character with a space.
fn substitute_filters(text: &str, filters: &str) -> String {
    if filters.is_empty() {
        return text.to_string();
    }
    text.chars()
        .map(|c| if filters.contains(c) { ' ' } else { c })
        .collect()
}

/// Post-truncate and post-pad a row to a fixed length.
fn pad_row(mut ids: Vec<TokenId>, len: usize, pad: TokenId) -> Vec<TokenId> {
    ids.truncate(len);
    ids.resize(len, pad);
    ids
}

fn derive_mask(row: &[TokenId]) -> Vec<TokenId> {
    row.iter()
        .map(|&id| TokenId::from(id != Vocab::PAD_ID))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word_only() -> TokenizerConfig {
        TokenizerConfig::new().with_char_level(false)
    }

    #[test]
    fn transform_pads_and_masks() {
        let tok = word_only().fit(&["EU rejects German call"], 5, 16);

        let enc = tok.transform_text("EU rejects");
        // Singleton counts keep first-seen order: eu=2, rejects=3.
        assert_eq!(enc.word_ids, vec![vec![2, 3, 0, 0, 0]]);
        assert_eq!(enc.mask, vec![vec![1, 1, 0, 0, 0]]);
        assert!(enc.char_ids.is_none());
    }

    #[test]
    fn transform_truncates_long_input() {
        let tok = word_only().fit(&["a b c d e f"], 3, 16);
        let enc = tok.transform_text("a b c d e f");
        assert_eq!(enc.word_ids[0].len(), 3);
        assert_eq!(enc.word_ids[0], vec![2, 3, 4]);
        assert_eq!(enc.mask[0], vec![1, 1, 1]);
    }

    #[test]
    fn second_dimension_is_always_max_seq_len() {
        let tok = word_only().fit(&["one two three"], 4, 16);
        for text in ["", "one", "one two three", "one two three one two"] {
            let enc = tok.transform_text(text);
            assert_eq!(enc.word_ids[0].len(), 4);
            assert_eq!(enc.mask[0].len(), 4);
        }
    }

    #[test]
    fn unseen_word_maps_to_oov() {
        let tok = word_only().fit(&["known words only"], 4, 16);
        let enc = tok.transform_text("gibberish known");
        assert_eq!(enc.word_ids[0][0], Vocab::OOV_ID);
        assert_eq!(enc.word_ids[0][1], 2);
    }

    #[test]
    fn mask_matches_nonzero_positions() {
        let tok = word_only().fit(&["a b c"], 6, 16);
        let enc = tok.transform(&["a b", "c", "a b c a"]);
        for (row, mask) in enc.word_ids.iter().zip(&enc.mask) {
            for (&id, &m) in row.iter().zip(mask) {
                assert_eq!(m, TokenId::from(id != Vocab::PAD_ID));
            }
        }
    }

    #[test]
    fn word_lookup_is_case_folded() {
        let tok = word_only().fit(&["Hello World"], 3, 16);
        let upper = tok.transform_text("HELLO WORLD");
        let lower = tok.transform_text("hello world");
        assert_eq!(upper.word_ids, lower.word_ids);
    }

    #[test]
    fn char_ids_have_fixed_shape() {
        let tok = TokenizerConfig::new().fit(&["ab cd"], 3, 4);
        let enc = tok.transform_text("ab");
        let chars = enc.char_ids.unwrap();
        assert_eq!(chars.len(), 1);
        assert_eq!(chars[0].len(), 3);
        for word in &chars[0] {
            assert_eq!(word.len(), 4);
        }
    }

    #[test]
    fn placeholder_word_encodes_to_all_pad_chars() {
        let tok = TokenizerConfig::new().fit(&["ab cd"], 3, 4);
        let enc = tok.transform_text("ab");
        let chars = enc.char_ids.unwrap();
        // Positions past the real tokens are empty placeholders.
        assert_eq!(chars[0][1], vec![0, 0, 0, 0]);
        assert_eq!(chars[0][2], vec![0, 0, 0, 0]);
        // The word mask, not the char array, marks the padding.
        assert_eq!(enc.mask[0], vec![1, 0, 0]);
    }

    #[test]
    fn char_vocab_is_case_sensitive() {
        let tok = TokenizerConfig::new().fit(&["Ee"], 2, 2);
        let chars = tok.char_vocab().unwrap();
        assert_ne!(chars.id("E"), chars.id("e"));
        assert_ne!(chars.id("E"), Vocab::OOV_ID);
    }

    #[test]
    fn pretokenized_input_skips_filters() {
        let tok = TokenizerConfig::new()
            .with_filters(".")
            .fit(&["a.b c"], 4, 4);
        let enc = tok.transform_tokens(&[vec!["a.b".to_string(), "c".to_string()]]);
        // "a.b" was never split, so it is not in the word vocabulary.
        assert_eq!(enc.word_ids[0][0], Vocab::OOV_ID);
    }

    #[test]
    fn filters_replace_characters_with_spaces() {
        let tok = word_only().with_filters(",").fit(&["a,b"], 4, 4);
        let enc = tok.transform_text("a,b");
        assert_eq!(enc.word_ids[0][..2], [2, 3]);
    }

    #[test]
    fn original_tokens_keep_casing_and_truncate() {
        let tok = word_only().fit(&["x"], 2, 4);
        assert_eq!(
            tok.original_tokens("Alpha Beta Gamma"),
            vec!["Alpha", "Beta"]
        );
    }

    #[test]
    fn serde_roundtrip_preserves_fitted_state() {
        let tok = TokenizerConfig::new().fit(&["EU rejects German call"], 8, 12);
        let json = serde_json::to_string(&tok).unwrap();
        let back: Tokenizer = serde_json::from_str(&json).unwrap();
        assert_eq!(tok, back);
        assert_eq!(
            tok.transform_text("EU rejects"),
            back.transform_text("EU rejects")
        );
    }
}
