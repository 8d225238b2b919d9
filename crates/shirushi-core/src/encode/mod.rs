//! Text-to-tensor encoding: preprocessing, tokenization and label encoding.

pub mod labels;
pub mod preprocess;
pub mod tokenizer;
pub mod vocab;

pub use labels::LabelEncoder;
pub use preprocess::{PreprocessorConfig, TextPreprocessor, DEFAULT_PUNCTUATION};
pub use tokenizer::{Encoding, Tokenizer, TokenizerConfig};
pub use vocab::{TokenId, Vocab};
