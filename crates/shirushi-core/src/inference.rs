//! # Inference Pipeline
//!
//! End-to-end tagging: preprocess, encode, predict through a model behind
//! the [`SequenceTagger`] boundary, decode and realign with the original
//! surface tokens.

use serde::{Deserialize, Serialize};

use crate::encode::labels::LabelEncoder;
use crate::encode::preprocess::TextPreprocessor;
use crate::encode::tokenizer::{Encoding, Tokenizer};
use crate::encode::vocab::TokenId;
use crate::error::{Result, ShirushiError};

/// The model boundary.
///
/// A consumer accepts the fixed shapes produced by
/// [`Tokenizer::transform`] and returns one class id per sequence position,
/// shape `(batch, max_seq_len)`, with the arg-max over classes already
/// taken.
pub trait SequenceTagger {
    /// Word vocabulary size the model's input layer was built for.
    fn word_vocab_size(&self) -> usize;

    /// Number of output classes the model was trained on.
    fn num_classes(&self) -> usize;

    /// Predict class ids for an encoded batch.
    fn predict(&self, encoding: &Encoding) -> Result<Vec<Vec<TokenId>>>;
}

/// A surface token paired with its predicted label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub token: String,
    pub label: String,
}

/// End-to-end NER prediction for raw text.
///
/// Owns a preprocessor, a fitted tokenizer, the fitted label encoder used
/// at training time and a model. All components are immutable once the
/// pipeline is built.
#[derive(Debug)]
pub struct NerPipeline<M> {
    preprocessor: TextPreprocessor,
    tokenizer: Tokenizer,
    labels: LabelEncoder,
    model: M,
}

impl<M: SequenceTagger> NerPipeline<M> {
    /// Assemble a pipeline, verifying that the fitted encoders match the
    /// model's expected dimensionality. A vocabulary/model mismatch is a
    /// correctness bug that would otherwise surface as silently wrong
    /// predictions, so it is rejected here.
    pub fn new(
        preprocessor: TextPreprocessor,
        tokenizer: Tokenizer,
        labels: LabelEncoder,
        model: M,
    ) -> Result<Self> {
        if tokenizer.vocab_size() != model.word_vocab_size() {
            return Err(ShirushiError::IncompatibleModel {
                what: "word vocabulary size",
                expected: model.word_vocab_size(),
                found: tokenizer.vocab_size(),
            });
        }
        if labels.num_classes() != model.num_classes() {
            return Err(ShirushiError::IncompatibleModel {
                what: "number of classes",
                expected: model.num_classes(),
                found: labels.num_classes(),
            });
        }

        Ok(Self {
            preprocessor,
            tokenizer,
            labels,
            model,
        })
    }

    /// Tag a single text, returning `(token, label)` pairs aligned with the
    /// original surface tokens.
    pub fn tag(&self, text: &str) -> Result<Vec<TaggedToken>> {
        let processed = self.preprocessor.apply(text);
        let encoding = self.tokenizer.transform_text(&processed);
        let tokens = self.tokenizer.original_tokens(&processed);

        let preds = self.model.predict(&encoding)?;
        let decoded = self.labels.inverse_transform(&preds, Some(&encoding.mask))?;
        let labels = decoded.into_iter().next().unwrap_or_default();

        if labels.len() != tokens.len() {
            return Err(ShirushiError::LengthMismatch {
                context: "token/label alignment",
                expected: tokens.len(),
                found: labels.len(),
            });
        }

        tracing::debug!(tokens = tokens.len(), "tagged text");

        Ok(tokens
            .into_iter()
            .zip(labels)
            .map(|(token, label)| TaggedToken { token, label })
            .collect())
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn labels(&self) -> &LabelEncoder {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::tokenizer::TokenizerConfig;

    /// Predicts the same class at every real position.
    #[derive(Debug)]
    struct ConstantTagger {
        vocab_size: usize,
        num_classes: usize,
        class: TokenId,
    }

    impl SequenceTagger for ConstantTagger {
        fn word_vocab_size(&self) -> usize {
            self.vocab_size
        }

        fn num_classes(&self) -> usize {
            self.num_classes
        }

        fn predict(&self, encoding: &Encoding) -> Result<Vec<Vec<TokenId>>> {
            Ok(encoding
                .word_ids
                .iter()
                .map(|row| row.iter().map(|_| self.class).collect())
                .collect())
        }
    }

    fn fitted() -> (TextPreprocessor, Tokenizer, LabelEncoder) {
        let preprocessor = TextPreprocessor::new().unwrap();
        let tokenizer = TokenizerConfig::new()
            .with_char_level(false)
            .fit(&["EU rejects German call"], 8, 16);
        let labels: Vec<Vec<String>> = vec![
            vec!["B-ORG".into(), "O".into(), "B-MISC".into(), "O".into()],
        ];
        let encoder = LabelEncoder::fit(&labels, Some(8), 0).unwrap();
        (preprocessor, tokenizer, encoder)
    }

    #[test]
    fn tags_align_with_surface_tokens() {
        let (pre, tok, enc) = fitted();
        let model = ConstantTagger {
            vocab_size: tok.vocab_size(),
            num_classes: enc.num_classes(),
            class: 2, // "O"
        };
        let pipeline = NerPipeline::new(pre, tok, enc, model).unwrap();

        let tagged = pipeline.tag("EU rejects German call.").unwrap();
        let tokens: Vec<&str> = tagged.iter().map(|t| t.token.as_str()).collect();
        assert_eq!(tokens, vec!["EU", "rejects", "German", "call", "."]);
        assert!(tagged.iter().all(|t| t.label == "O"));
    }

    #[test]
    fn vocab_size_mismatch_is_rejected() {
        let (pre, tok, enc) = fitted();
        let model = ConstantTagger {
            vocab_size: tok.vocab_size() + 1,
            num_classes: enc.num_classes(),
            class: 0,
        };
        let err = NerPipeline::new(pre, tok, enc, model).unwrap_err();
        assert!(matches!(err, ShirushiError::IncompatibleModel { .. }));
    }

    #[test]
    fn class_count_mismatch_is_rejected() {
        let (pre, tok, enc) = fitted();
        let model = ConstantTagger {
            vocab_size: tok.vocab_size(),
            num_classes: enc.num_classes() + 2,
            class: 0,
        };
        let err = NerPipeline::new(pre, tok, enc, model).unwrap_err();
        assert!(matches!(
            err,
            ShirushiError::IncompatibleModel {
                what: "number of classes",
                ..
            }
        ));
    }
}
