use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of token ids fed to the model for every email
pub const MAX_SEQUENCE_LENGTH: usize = 1000;

/// Vocabulary size bound the tokenizer was fitted with
pub const MAX_VOCABULARY_WORDS: usize = 5000;

/// Raw email text as handed to the pipeline.
///
/// `Malformed` stands for input that is not text at all (a JSON number, a
/// missing field). It is accepted and normalizes to the empty string instead
/// of failing the prediction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailInput {
    Text(String),
    Malformed,
}

impl EmailInput {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            EmailInput::Text(text) => Some(text),
            EmailInput::Malformed => None,
        }
    }
}

impl From<&str> for EmailInput {
    fn from(text: &str) -> Self {
        EmailInput::Text(text.to_string())
    }
}

impl From<String> for EmailInput {
    fn from(text: String) -> Self {
        EmailInput::Text(text)
    }
}

impl<T: Into<EmailInput>> From<Option<T>> for EmailInput {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(EmailInput::Malformed)
    }
}

impl From<&serde_json::Value> for EmailInput {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(text) => EmailInput::Text(text.clone()),
            _ => EmailInput::Malformed,
        }
    }
}

/// Text after header stripping, stopword removal and lemmatization
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fixed-length, pre-padded token id sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedSequence(Vec<u32>);

impl EncodedSequence {
    /// Wraps ids that have already been padded to their final length
    pub(crate) fn from_padded(ids: Vec<u32>) -> Self {
        Self(ids)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of positions holding a real token id
    pub fn token_count(&self) -> usize {
        self.0.iter().filter(|&&id| id != 0).count()
    }
}

/// Per-class model output, index 0 = not spam, index 1 = spam
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityVector([f64; 2]);

impl ProbabilityVector {
    pub fn new(not_spam: f64, spam: f64) -> Self {
        Self([not_spam, spam])
    }

    pub fn as_array(&self) -> &[f64; 2] {
        &self.0
    }

    pub fn get(&self, class: usize) -> f64 {
        self.0[class]
    }
}

impl From<[f64; 2]> for ProbabilityVector {
    fn from(probs: [f64; 2]) -> Self {
        Self(probs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpamLabel {
    #[serde(rename = "Spam")]
    Spam,
    #[serde(rename = "Not Spam")]
    NotSpam,
}

impl SpamLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpamLabel::Spam => "Spam",
            SpamLabel::NotSpam => "Not Spam",
        }
    }
}

impl fmt::Display for SpamLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final decision returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub is_spam: bool,
    /// Probability of the predicted class as a percentage, two decimals
    pub confidence: f64,
    pub label: SpamLabel,
}
