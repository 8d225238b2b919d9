//! # Shirushi Core
//!
//! Deterministic text-to-tensor encoding for named-entity recognition:
//! preprocessing, dual-level (word + character) tokenization, label
//! encoding and the index-to-label decode path used at inference time.
//! The neural model itself lives behind the [`SequenceTagger`] boundary.
//!
//! ## Quick Start
//!
//! ```rust
//! use shirushi_core::{TextPreprocessor, TokenizerConfig};
//!
//! let pre = TextPreprocessor::new().unwrap();
//! let text = pre.apply("EU rejects German call.");
//!
//! let tokenizer = TokenizerConfig::new()
//!     .with_char_level(false)
//!     .fit(&[text.as_str()], 8, 16);
//! let encoding = tokenizer.transform_text(&text);
//!
//! assert_eq!(encoding.word_ids[0].len(), 8);
//! assert_eq!(encoding.mask[0][..5], [1, 1, 1, 1, 1]);
//! ```
pub mod encode;
pub mod error;
pub mod inference;

// Re-export primary API
pub use encode::{
    Encoding, LabelEncoder, PreprocessorConfig, TextPreprocessor, TokenId, Tokenizer,
    TokenizerConfig, Vocab, DEFAULT_PUNCTUATION,
};
pub use error::{Result, ShirushiError};
pub use inference::{NerPipeline, SequenceTagger, TaggedToken};
