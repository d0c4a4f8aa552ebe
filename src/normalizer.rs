//! Text normalization applied before vectorization
//!
//! The three steps run in a fixed order: header strip, stopword removal,
//! lemmatization. Stopwords are matched on whitespace-split tokens before the
//! lemmatizer sees them, so the order cannot be changed without changing the
//! ids the model receives.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::lemmatizer::Lemmatizer;
use crate::models::{EmailInput, NormalizedText};
use crate::stopwords::StopwordSet;

/// Header prefix stripped from the start of an email body
pub const SUBJECT_PREFIX: &str = "Subject:";

/// Characters removed when the subject prefix is present (prefix plus one)
const SUBJECT_STRIP_CHARS: usize = 9;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Remove a leading `Subject:` header and surrounding whitespace
pub fn strip_header(text: &str) -> &str {
    if text.starts_with(SUBJECT_PREFIX) {
        let rest = text
            .char_indices()
            .nth(SUBJECT_STRIP_CHARS)
            .map(|(idx, _)| &text[idx..])
            .unwrap_or("");
        rest.trim()
    } else {
        text.trim()
    }
}

/// Splits on runs of whitespace, never on punctuation
fn whitespace_tokens(text: &str) -> impl Iterator<Item = &str> {
    WHITESPACE.split(text).filter(|token| !token.is_empty())
}

pub struct Normalizer {
    stopwords: StopwordSet,
    lemmatizer: Box<dyn Lemmatizer>,
}

impl Normalizer {
    pub fn new(stopwords: StopwordSet, lemmatizer: impl Lemmatizer + 'static) -> Self {
        Self {
            stopwords,
            lemmatizer: Box::new(lemmatizer),
        }
    }

    /// Run the full normalization recipe
    pub fn normalize(&self, input: &EmailInput) -> NormalizedText {
        let text = match input {
            EmailInput::Text(text) => text,
            EmailInput::Malformed => {
                tracing::debug!("Malformed email input normalized to empty text");
                return NormalizedText::default();
            }
        };

        let stripped = strip_header(text);
        let filtered = self.remove_stopwords(&EmailInput::Text(stripped.to_string()));
        let lemmatized = self.lemmatize_text(&filtered);

        tracing::debug!(
            input_chars = text.chars().count(),
            tokens = lemmatized.split(' ').filter(|t| !t.is_empty()).count(),
            "Normalized email text"
        );
        NormalizedText::new(lemmatized)
    }

    /// Drop tokens whose lowercase form is a stopword, keeping order and case
    pub fn remove_stopwords(&self, input: &EmailInput) -> String {
        let Some(sentence) = input.as_text() else {
            return String::new();
        };

        sentence
            .split_whitespace()
            .filter(|word| !self.stopwords.contains(&word.to_lowercase()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Replace every whitespace token with its lemma
    pub fn lemmatize_text(&self, text: &str) -> String {
        whitespace_tokens(text)
            .map(|token| self.lemmatizer.lemmatize(token))
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string()
    }
}
