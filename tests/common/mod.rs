//! Common test utilities and fixtures
#![allow(dead_code)]

use email_spam_filter::classifier::SequenceClassifier;
use email_spam_filter::error::Result;
use email_spam_filter::models::{EncodedSequence, ProbabilityVector};
use email_spam_filter::{
    KerasVocabulary, Normalizer, SpamPipeline, StopwordSet, WordNetLemmatizer,
};
use mockall::mock;
use serde_json::json;
use std::path::Path;

/// Slice of WordNet's noun index, license header included
pub const NOUN_INDEX: &str = "  1 This software and database is being provided to you, the LICENSEE, by\n  2 Princeton University under the following license.\n\
account n 3 3 @ ~ + 3 1 13358549\n\
deal n 5 3 @ ~ + 5 1 01110274\n\
email n 2 1 @ 2 0 06279326\n\
goose n 3 3 @ ~ %p 3 0 01855672\n\
meeting n 4 4 @ ~ + 4 2 08307589\n\
money n 3 3 @ ~ ; 3 1 13384557\n\
offer n 4 3 @ ~ + 4 1 07162194\n\
prize n 3 3 @ ~ + 3 0 06696483\n\
report n 7 4 @ ~ + 7 2 07217924\n\
winner n 4 3 @ ~ + 4 0 10782940\n";

pub const NOUN_EXCEPTIONS: &str = "geese goose\n";

/// Ids below 100 are ham words, ids from 100 up are spam words
pub const WORD_INDEX: &[(&str, u32)] = &[
    ("meeting", 2),
    ("report", 3),
    ("account", 4),
    ("goose", 5),
    ("free", 100),
    ("money", 101),
    ("prize", 102),
    ("winner", 103),
    ("deal", 104),
    ("offer", 105),
];

pub fn create_lemmatizer() -> WordNetLemmatizer {
    WordNetLemmatizer::from_sources(NOUN_INDEX, NOUN_EXCEPTIONS)
}

pub fn create_normalizer() -> Normalizer {
    Normalizer::new(StopwordSet::english(), create_lemmatizer())
}

pub fn create_vocabulary() -> KerasVocabulary {
    KerasVocabulary::from_word_index(
        WORD_INDEX.iter().map(|(w, id)| (w.to_string(), *id)).collect(),
        Some(5000),
    )
}

/// Keras `Tokenizer.to_json()` export of [`WORD_INDEX`]
pub fn keras_tokenizer_json() -> String {
    let word_index: serde_json::Map<String, serde_json::Value> = WORD_INDEX
        .iter()
        .map(|(w, id)| (w.to_string(), json!(id)))
        .collect();

    json!({
        "class_name": "Tokenizer",
        "config": {
            "num_words": 5000,
            "filters": "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n",
            "lower": true,
            "split": " ",
            "char_level": false,
            "oov_token": null,
            "document_count": 42,
            "word_index": serde_json::Value::Object(word_index).to_string(),
        }
    })
    .to_string()
}

/// Lay out an NLTK data root with WordNet (and optionally stopwords)
pub fn write_nltk_data(root: &Path, stopwords: Option<&str>) {
    let wordnet = root.join("corpora").join("wordnet");
    std::fs::create_dir_all(&wordnet).unwrap();
    std::fs::write(wordnet.join("index.noun"), NOUN_INDEX).unwrap();
    std::fs::write(wordnet.join("noun.exc"), NOUN_EXCEPTIONS).unwrap();

    if let Some(words) = stopwords {
        let dir = root.join("corpora").join("stopwords");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("english"), words).unwrap();
    }
}

/// Deterministic stand-in for the trained model: the spam probability is the
/// share of known tokens whose id is at least 100
pub struct KeywordClassifier;

impl SequenceClassifier for KeywordClassifier {
    fn predict(&self, sequence: &EncodedSequence) -> Result<ProbabilityVector> {
        let known: Vec<u32> = sequence
            .as_slice()
            .iter()
            .copied()
            .filter(|&id| id != 0)
            .collect();
        if known.is_empty() {
            return Ok(ProbabilityVector::new(0.75, 0.25));
        }

        let spam = known.iter().filter(|&&id| id >= 100).count() as f64 / known.len() as f64;
        Ok(ProbabilityVector::new(1.0 - spam, spam))
    }
}

/// Always returns the same probabilities
pub struct FixedClassifier(pub ProbabilityVector);

impl SequenceClassifier for FixedClassifier {
    fn predict(&self, _sequence: &EncodedSequence) -> Result<ProbabilityVector> {
        Ok(self.0)
    }
}

mock! {
    pub Classifier {}

    impl SequenceClassifier for Classifier {
        fn predict(&self, sequence: &EncodedSequence) -> Result<ProbabilityVector>;
    }
}

pub fn create_pipeline(classifier: impl SequenceClassifier + 'static) -> SpamPipeline {
    SpamPipeline::new(create_normalizer(), create_vocabulary(), classifier)
}
