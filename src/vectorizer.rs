//! Token vocabulary and fixed-length sequence encoding

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::{Result, SpamError};
use crate::models::{EncodedSequence, NormalizedText, MAX_SEQUENCE_LENGTH, MAX_VOCABULARY_WORDS};

/// Characters Keras' tokenizer replaces with the split string by default
pub const DEFAULT_FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

/// A fitted token-to-id mapping together with its tokenization convention
pub trait Vocabulary: Send + Sync {
    /// Split text the same way the vocabulary was fitted
    fn tokenize(&self, text: &str) -> Vec<String>;

    /// Id for `token`, or `None` when the token must be dropped
    fn lookup(&self, token: &str) -> Option<u32>;

    fn text_to_ids(&self, text: &str) -> Vec<u32> {
        self.tokenize(text)
            .iter()
            .filter_map(|token| self.lookup(token))
            .collect()
    }
}

/// Vocabulary exported from a Keras `Tokenizer`
#[derive(Debug, Clone)]
pub struct KerasVocabulary {
    word_index: HashMap<String, u32>,
    num_words: Option<usize>,
    filters: HashSet<char>,
    lower: bool,
    split: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VocabularyFile {
    Keras(KerasTokenizerJson),
    Plain(HashMap<String, u32>),
}

#[derive(Deserialize)]
struct KerasTokenizerJson {
    #[serde(default)]
    class_name: Option<String>,
    config: KerasTokenizerConfig,
}

#[derive(Deserialize)]
struct KerasTokenizerConfig {
    #[serde(default)]
    num_words: Option<usize>,
    #[serde(default = "default_filters")]
    filters: String,
    #[serde(default = "default_lower")]
    lower: bool,
    #[serde(default = "default_split")]
    split: String,
    #[serde(default)]
    char_level: bool,
    #[serde(default)]
    oov_token: Option<String>,
    /// Keras stores this as a JSON document inside a string
    word_index: serde_json::Value,
}

fn default_filters() -> String {
    DEFAULT_FILTERS.to_string()
}

fn default_lower() -> bool {
    true
}

fn default_split() -> String {
    " ".to_string()
}

impl KerasVocabulary {
    /// Vocabulary with Keras' default tokenization settings
    pub fn from_word_index(word_index: HashMap<String, u32>, num_words: Option<usize>) -> Self {
        Self {
            word_index,
            num_words,
            filters: DEFAULT_FILTERS.chars().collect(),
            lower: true,
            split: default_split(),
        }
    }

    /// Load a `Tokenizer.to_json()` export or a plain `{"token": id}` object
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SpamError::VocabularyError(format!("Failed to read {:?}: {}", path, e))
        })?;
        let vocab = Self::from_json(&content)?;

        tracing::info!(
            "Loaded vocabulary from {:?} ({} tokens, bound {:?})",
            path,
            vocab.word_index.len(),
            vocab.num_words
        );
        Ok(vocab)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let file: VocabularyFile = serde_json::from_str(content)
            .map_err(|e| SpamError::VocabularyError(format!("Unrecognized vocabulary file: {}", e)))?;

        let vocab = match file {
            VocabularyFile::Plain(word_index) => {
                Self::from_word_index(word_index, Some(MAX_VOCABULARY_WORDS))
            }
            VocabularyFile::Keras(tokenizer) => Self::from_keras(tokenizer)?,
        };

        vocab.validate()?;
        Ok(vocab)
    }

    fn from_keras(tokenizer: KerasTokenizerJson) -> Result<Self> {
        if let Some(class_name) = tokenizer.class_name.as_deref() {
            if class_name != "Tokenizer" {
                return Err(SpamError::VocabularyError(format!(
                    "Expected a Keras Tokenizer export, found '{}'",
                    class_name
                )));
            }
        }

        let config = tokenizer.config;
        if config.char_level {
            return Err(SpamError::VocabularyError(
                "Character-level tokenizers are not supported".to_string(),
            ));
        }
        if let Some(oov) = &config.oov_token {
            tracing::warn!(
                "Vocabulary defines oov_token '{}'; unknown tokens are dropped instead",
                oov
            );
        }

        let word_index: HashMap<String, u32> = match config.word_index {
            serde_json::Value::String(encoded) => serde_json::from_str(&encoded),
            other => serde_json::from_value(other),
        }
        .map_err(|e| SpamError::VocabularyError(format!("Invalid word_index: {}", e)))?;

        Ok(Self {
            word_index,
            num_words: config.num_words.or(Some(MAX_VOCABULARY_WORDS)),
            filters: config.filters.chars().collect(),
            lower: config.lower,
            split: config.split,
        })
    }

    fn validate(&self) -> Result<()> {
        if self.split.is_empty() {
            return Err(SpamError::VocabularyError(
                "Split string must not be empty".to_string(),
            ));
        }
        if self.word_index.is_empty() {
            return Err(SpamError::VocabularyError("Word index is empty".to_string()));
        }
        if let Some((token, _)) = self.word_index.iter().find(|(_, id)| **id == 0) {
            return Err(SpamError::VocabularyError(format!(
                "Token '{}' has id 0, which is reserved for padding",
                token
            )));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.word_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word_index.is_empty()
    }
}

impl Vocabulary for KerasVocabulary {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let text = if self.lower {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        let mut translated = String::with_capacity(text.len());
        for c in text.chars() {
            if self.filters.contains(&c) {
                translated.push_str(&self.split);
            } else {
                translated.push(c);
            }
        }

        translated
            .split(self.split.as_str())
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn lookup(&self, token: &str) -> Option<u32> {
        let id = *self.word_index.get(token)?;
        match self.num_words {
            Some(bound) if bound > 0 && id as usize >= bound => None,
            _ => Some(id),
        }
    }
}

/// Left-pad with zeros or keep only the last `max_len` ids
pub fn pad_sequence(ids: &[u32], max_len: usize) -> Vec<u32> {
    if ids.len() >= max_len {
        return ids[ids.len() - max_len..].to_vec();
    }

    let mut padded = vec![0; max_len - ids.len()];
    padded.extend_from_slice(ids);
    padded
}

/// Turns normalized text into the fixed-width id sequence the model expects
#[derive(Debug, Clone, Copy)]
pub struct Vectorizer {
    max_len: usize,
}

impl Default for Vectorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Vectorizer {
    pub fn new() -> Self {
        Self::with_max_len(MAX_SEQUENCE_LENGTH)
    }

    pub fn with_max_len(max_len: usize) -> Self {
        Self { max_len }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn encode(&self, text: &NormalizedText, vocab: &dyn Vocabulary) -> EncodedSequence {
        let ids = vocab.text_to_ids(text.as_str());
        if ids.len() > self.max_len {
            tracing::debug!(
                "Truncating {} token ids to the last {}",
                ids.len(),
                self.max_len
            );
        }
        EncodedSequence::from_padded(pad_sequence(&ids, self.max_len))
    }
}
