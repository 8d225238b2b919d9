//! # Shirushi Trainer
//!
//! Training-support glue around the core encoders: CoNLL-style corpus
//! loading, pretrained embedding matrices, evaluation-file formatting and
//! the external scorer subprocess.

pub mod data;
pub mod embedding;
pub mod eval;

pub use data::{load_conll, Sentence};
pub use embedding::glove_embedding_matrix;
pub use eval::{run_scorer, write_eval_file};
