//! # Text Preprocessor
//!
//! Normalizes raw text into a whitespace-tokenizable form by separating
//! contraction suffixes and punctuation into their own tokens.

use regex::Regex;

use crate::error::Result;

/// Default punctuation set separated from surrounding text.
pub const DEFAULT_PUNCTUATION: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~";

/// Configuration for the text preprocessor.
#[derive(Debug, Clone)]
pub struct PreprocessorConfig {
    /// Insert a space before possessive/contraction suffixes.
    pub separate_apostrophes: bool,
    /// Insert a space between punctuation and adjacent text.
    pub separate_punctuation: bool,
    /// Characters treated as punctuation, one per char.
    pub punctuation: String,
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        Self {
            separate_apostrophes: true,
            separate_punctuation: true,
            punctuation: DEFAULT_PUNCTUATION.to_string(),
        }
    }
}

impl PreprocessorConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable apostrophe separation.
    pub fn with_apostrophes(mut self, enabled: bool) -> Self {
        self.separate_apostrophes = enabled;
        self
    }

    /// Enable or disable punctuation separation.
    pub fn with_punctuation_split(mut self, enabled: bool) -> Self {
        self.separate_punctuation = enabled;
        self
    }

    /// Replace the punctuation character set.
    pub fn with_punctuation(mut self, punctuation: impl Into<String>) -> Self {
        self.punctuation = punctuation.into();
        self
    }
}

/// Pure, stateless text-to-text transform preparing raw input for
/// whitespace tokenization.
///
/// Apostrophe separation runs first, punctuation separation second, so
/// `Peter's book, isn't it?` becomes `Peter 's book , is n't it ?`.
/// Applying the transform to already-separated text is a no-op.
#[derive(Debug, Clone)]
pub struct TextPreprocessor {
    config: PreprocessorConfig,
    apostrophes: Regex,
    punct_before: Option<Regex>,
    punct_after: Option<Regex>,
}

impl TextPreprocessor {
    /// Create a preprocessor with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(PreprocessorConfig::default())
    }

    /// Create a preprocessor with the given configuration.
    ///
    /// Compiles the separation patterns up front; fails only if the
    /// configured punctuation set produces an invalid character class.
    pub fn with_config(config: PreprocessorConfig) -> Result<Self> {
        let class = escaped_class(&config.punctuation);

        // Suffix must be followed by punctuation, a space or end of string.
        let apostrophes = Regex::new(&format!(
            r"(?i)([a-z])('|'s|'ll|'m|'re|'ve|'d|n't)([{class} ]|$)"
        ))?;

        let (punct_before, punct_after) = if config.punctuation.is_empty() {
            (None, None)
        } else {
            (
                Some(Regex::new(&format!(r"(\S)([{class}])"))?),
                Some(Regex::new(&format!(r"([{class}])(\S)"))?),
            )
        };

        Ok(Self {
            config,
            apostrophes,
            punct_before,
            punct_after,
        })
    }

    /// Apply the configured separation steps to a single string.
    pub fn apply(&self, text: &str) -> String {
        let mut out = text.to_string();

        if self.config.separate_apostrophes {
            out = self
                .apostrophes
                .replace_all(&out, "${1} ${2}${3}")
                .into_owned();
        }

        if self.config.separate_punctuation {
            if let Some(re) = &self.punct_before {
                out = re.replace_all(&out, "${1} ${2}").into_owned();
            }
            if let Some(re) = &self.punct_after {
                out = re.replace_all(&out, "${1} ${2}").into_owned();
            }
        }

        out
    }

    /// Apply the separation steps to every element of a batch.
    pub fn apply_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<String> {
        texts.iter().map(|t| self.apply(t.as_ref())).collect()
    }

    /// The configuration this preprocessor was built with.
    pub fn config(&self) -> &PreprocessorConfig {
        &self.config
    }
}

/// Escape every character for use inside a regex character class.
fn escaped_class(chars: &str) -> String {
    chars
        .chars()
        .map(|c| regex::escape(&c.to_string()))
        .collect()
}
