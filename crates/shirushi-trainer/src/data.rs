//! Corpus loading for token-per-line tagged data.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Document boundary marker line in CoNLL-style corpora, skipped on read.
const DOCSTART_LINE: &str = "-DOCSTART- -X- -X- O";

/// A single sentence: parallel token and label sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub tokens: Vec<String>,
    pub labels: Vec<String>,
}

impl Sentence {
    pub fn new(tokens: Vec<String>, labels: Vec<String>) -> Self {
        Self { tokens, labels }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Load a whitespace-delimited tagged corpus.
///
/// Each line holds one token: the first field is the surface token, the
/// last field its label. A blank line ends the current sentence and the
/// document boundary marker is skipped.
pub fn load_conll<P: AsRef<Path>>(path: P) -> std::io::Result<Vec<Sentence>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut sentences = Vec::new();
    let mut tokens = Vec::new();
    let mut labels = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim_end();

        if line.trim().is_empty() {
            if !tokens.is_empty() {
                sentences.push(Sentence::new(
                    std::mem::take(&mut tokens),
                    std::mem::take(&mut labels),
                ));
            }
            continue;
        }

        if line == DOCSTART_LINE {
            continue;
        }

        let mut fields = line.split_whitespace();
        let token = match fields.next() {
            Some(token) => token.to_string(),
            None => continue,
        };
        let label = fields.last().unwrap_or(&token).to_string();

        tokens.push(token);
        labels.push(label);
    }

    // Flush a trailing sentence with no final blank line.
    if !tokens.is_empty() {
        sentences.push(Sentence::new(tokens, labels));
    }

    Ok(sentences)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn corpus(content: &str) -> Vec<Sentence> {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        load_conll(file.path()).unwrap()
    }

    #[test]
    fn splits_sentences_on_blank_lines() {
        let sentences = corpus("EU NNP B-ORG\nrejects VBZ O\n\ncall NN O\n");
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].tokens, vec!["EU", "rejects"]);
        assert_eq!(sentences[0].labels, vec!["B-ORG", "O"]);
        assert_eq!(sentences[1].tokens, vec!["call"]);
    }

    #[test]
    fn skips_docstart_marker() {
        let sentences = corpus("-DOCSTART- -X- -X- O\n\nEU NNP B-ORG\n");
        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].tokens, vec!["EU"]);
    }

    #[test]
    fn last_field_is_the_label() {
        let sentences = corpus("German JJ B-NP B-MISC\n");
        assert_eq!(sentences[0].labels, vec!["B-MISC"]);
    }

    #[test]
    fn flushes_trailing_sentence_without_blank_line() {
        let sentences = corpus("a x O\nb x O");
        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].len(), 2);
    }

    #[test]
    fn single_field_line_uses_token_as_label() {
        let sentences = corpus("lonely\n");
        assert_eq!(sentences[0].tokens, vec!["lonely"]);
        assert_eq!(sentences[0].labels, vec!["lonely"]);
    }
}
