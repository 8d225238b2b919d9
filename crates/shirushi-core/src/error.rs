use thiserror::Error;

/// Errors that can occur during Shirushi core operations.
#[derive(Debug, Error)]
pub enum ShirushiError {
    /// Fitting was attempted on an empty corpus or label set.
    #[error("cannot fit on empty input")]
    EmptyCorpus,

    /// A label was encountered at transform time that was never seen during fit.
    #[error("unknown label: {label:?}")]
    UnknownLabel {
        /// The offending label string.
        label: String,
    },

    /// A predicted class index has no corresponding label in the vocabulary.
    #[error("label index {index} out of range for {num_classes} classes")]
    UnknownLabelIndex { index: i32, num_classes: usize },

    /// Parallel sequences that must be aligned have different lengths.
    #[error("length mismatch in {context}: expected {expected}, found {found}")]
    LengthMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },

    /// The model's expected dimensionality does not match the fitted encoders.
    #[error("incompatible model: {what} is {found}, model expects {expected}")]
    IncompatibleModel {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// A regex pattern failed to compile (configured punctuation set).
    #[error("regex compilation error: {0}")]
    RegexError(#[from] regex::Error),

    /// File I/O failed while persisting or loading fitted state.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Fitted state could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The external scoring script failed.
    #[error("scorer exited with {status}: {stderr}")]
    Scorer { status: String, stderr: String },
}

/// Result type alias for Shirushi operations.
pub type Result<T> = std::result::Result<T, ShirushiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = ShirushiError::UnknownLabel {
            label: "B-XYZ".into(),
        };
        assert!(err.to_string().contains("B-XYZ"));

        let err = ShirushiError::LengthMismatch {
            context: "eval file",
            expected: 3,
            found: 2,
        };
        assert_eq!(
            err.to_string(),
            "length mismatch in eval file: expected 3, found 2"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ShirushiError>();
    }
}
