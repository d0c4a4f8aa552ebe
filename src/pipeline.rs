//! End-to-end prediction: normalize → encode → classify → decide
//!
//! A [`SpamPipeline`] owns every loaded resource. It is built once, before
//! any prediction runs, and is `Send + Sync` so a server can share it behind
//! an `Arc` without locking.

use crate::classifier::SequenceClassifier;
use crate::config::Config;
use crate::decision::decide;
use crate::error::{Result, SpamError};
use crate::models::{
    ClassificationResult, EmailInput, EncodedSequence, NormalizedText, ProbabilityVector,
};
use crate::normalizer::Normalizer;
use crate::resources::{ensure_resources_available, LinguisticResources};
use crate::vectorizer::{KerasVocabulary, Vectorizer, Vocabulary};

pub struct SpamPipeline {
    normalizer: Normalizer,
    vocabulary: Box<dyn Vocabulary>,
    vectorizer: Vectorizer,
    classifier: Box<dyn SequenceClassifier>,
}

impl SpamPipeline {
    pub fn new(
        normalizer: Normalizer,
        vocabulary: impl Vocabulary + 'static,
        classifier: impl SequenceClassifier + 'static,
    ) -> Self {
        Self {
            normalizer,
            vocabulary: Box::new(vocabulary),
            vectorizer: Vectorizer::new(),
            classifier: Box::new(classifier),
        }
    }

    /// Load every resource named by `config`; any failure aborts startup
    pub fn from_config(config: &Config) -> Result<Self> {
        let paths = ensure_resources_available(&config.resources)?;
        let normalizer = LinguisticResources::load(&paths)?.into_normalizer();
        let vocabulary = KerasVocabulary::load(&config.artifacts.vocabulary_path)?;
        let classifier = load_classifier(config)?;

        tracing::info!("Spam pipeline ready");
        Ok(Self {
            normalizer,
            vocabulary: Box::new(vocabulary),
            vectorizer: Vectorizer::new(),
            classifier,
        })
    }

    pub fn normalize(&self, input: &EmailInput) -> NormalizedText {
        self.normalizer.normalize(input)
    }

    pub fn encode(&self, text: &NormalizedText) -> EncodedSequence {
        self.vectorizer.encode(text, self.vocabulary.as_ref())
    }

    pub fn classify(&self, sequence: &EncodedSequence) -> Result<ProbabilityVector> {
        self.classifier.predict(sequence)
    }

    /// Classify one email
    pub fn predict(&self, input: &EmailInput) -> Result<ClassificationResult> {
        let normalized = self.normalize(input);
        let sequence = self.encode(&normalized);
        tracing::debug!(
            known_tokens = sequence.token_count(),
            "Encoded email into {} ids",
            sequence.len()
        );

        let probs = self.classify(&sequence)?;
        let result = decide(&probs);
        tracing::debug!(
            probs = ?probs.as_array(),
            label = %result.label,
            confidence = result.confidence,
            "Classified email"
        );
        Ok(result)
    }

    /// Classify caller-supplied text; absent text is rejected before any stage runs
    pub fn predict_text(&self, text: Option<&str>) -> Result<ClassificationResult> {
        let text = text.ok_or(SpamError::MissingInput)?;
        self.predict(&EmailInput::from(text))
    }
}

#[cfg(feature = "onnx")]
fn load_classifier(config: &Config) -> Result<Box<dyn SequenceClassifier>> {
    let classifier = crate::classifier::OnnxSequenceClassifier::load(
        &config.artifacts.model_path,
        config.artifacts.model_input_type,
        config.artifacts.intra_threads,
    )?;
    Ok(Box::new(classifier))
}

#[cfg(not(feature = "onnx"))]
fn load_classifier(config: &Config) -> Result<Box<dyn SequenceClassifier>> {
    Err(SpamError::ModelLoad(format!(
        "Cannot load {}: built without the `onnx` feature",
        config.artifacts.model_path.display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lemmatizer::WordNetLemmatizer;
    use crate::models::{SpamLabel, MAX_SEQUENCE_LENGTH};
    use crate::stopwords::StopwordSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Scores by the share of known tokens that are spam ids (>= 100)
    struct ThresholdClassifier {
        calls: Arc<AtomicUsize>,
    }

    impl SequenceClassifier for ThresholdClassifier {
        fn predict(&self, sequence: &EncodedSequence) -> Result<ProbabilityVector> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(sequence.len(), MAX_SEQUENCE_LENGTH);

            let known: Vec<u32> = sequence.as_slice().iter().copied().filter(|&id| id != 0).collect();
            if known.is_empty() {
                return Ok(ProbabilityVector::new(0.8, 0.2));
            }
            let spam = known.iter().filter(|&&id| id >= 100).count() as f64 / known.len() as f64;
            Ok(ProbabilityVector::new(1.0 - spam, spam))
        }
    }

    fn pipeline() -> (SpamPipeline, Arc<AtomicUsize>) {
        let lemmatizer = WordNetLemmatizer::from_sources(
            "prize n 1 0 1 0 1\nmeeting n 1 0 1 0 1\n",
            "",
        );
        let normalizer = Normalizer::new(StopwordSet::english(), lemmatizer);
        let vocabulary = KerasVocabulary::from_word_index(
            [("meeting", 2u32), ("agenda", 3), ("free", 100), ("prize", 101)]
                .iter()
                .map(|(w, id)| (w.to_string(), *id))
                .collect(),
            Some(5000),
        );
        let calls = Arc::new(AtomicUsize::new(0));
        let classifier = ThresholdClassifier {
            calls: Arc::clone(&calls),
        };
        (SpamPipeline::new(normalizer, vocabulary, classifier), calls)
    }

    #[test]
    fn test_spam_email() {
        let (pipeline, _) = pipeline();
        let result = pipeline
            .predict(&"Subject: FREE prizes for the winner".into())
            .unwrap();
        assert!(result.is_spam);
        assert_eq!(result.label, SpamLabel::Spam);
        assert_eq!(result.confidence, 100.0);
    }

    #[test]
    fn test_ham_email() {
        let (pipeline, _) = pipeline();
        let result = pipeline
            .predict(&"Subject: meetings agenda for tomorrow".into())
            .unwrap();
        assert!(!result.is_spam);
        assert_eq!(result.label, SpamLabel::NotSpam);
        assert_eq!(result.confidence, 100.0);
    }

    #[test]
    fn test_malformed_input_still_classified() {
        let (pipeline, calls) = pipeline();
        let result = pipeline.predict(&EmailInput::Malformed).unwrap();
        assert!(!result.is_spam);
        assert_eq!(result.confidence, 80.0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_missing_input_runs_no_stage() {
        let (pipeline, calls) = pipeline();
        let err = pipeline.predict_text(None).unwrap_err();
        assert!(matches!(err, SpamError::MissingInput));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_stages_exposed() {
        let (pipeline, _) = pipeline();
        let normalized = pipeline.normalize(&"Subject: the FREE prizes".into());
        assert_eq!(normalized.as_str(), "FREE prize");

        let encoded = pipeline.encode(&normalized);
        assert_eq!(&encoded.as_slice()[998..], &[100, 101]);

        let probs = pipeline.classify(&encoded).unwrap();
        assert_eq!(probs.as_array(), &[0.0, 1.0]);
        assert_eq!(decide(&probs).label, SpamLabel::Spam);
    }

    #[test]
    fn test_from_config_fails_without_resources() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let mut config = Config::default();
        config.resources.search_paths = vec![temp_dir.path().to_path_buf()];

        let err = SpamPipeline::from_config(&config).err().unwrap();
        assert!(err.is_fatal_startup());
    }

    #[test]
    fn test_pipeline_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SpamPipeline>();
    }
}
