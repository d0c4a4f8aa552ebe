//! Email Spam Filter
//!
//! Classifies a single email body as spam or not spam with a pretrained
//! sequence model, returning a label and a confidence percentage.
//!
//! # Overview
//!
//! Prediction is a fixed chain of pure stages:
//! - **Normalization**: strip a `Subject:` header, drop English stopwords,
//!   lemmatize every token with WordNet
//! - **Vectorization**: map tokens to vocabulary ids and pre-pad/pre-truncate
//!   to exactly 1000 ids
//! - **Classification**: score the ids with the trained model
//! - **Decision**: round the class probabilities, pick the winner, report
//!   its probability as the confidence
//!
//! All resources are loaded once up front and shared read-only afterwards.
//!
//! # Example Usage
//!
//! ```no_run
//! use email_spam_filter::{config::Config, models::EmailInput, SpamPipeline};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml".as_ref()).await?;
//!     let pipeline = SpamPipeline::from_config(&config)?;
//!
//!     let result = pipeline.predict(&EmailInput::from("Subject: You won a FREE cruise"))?;
//!     println!("{} ({}%)", result.label, result.confidence);
//!     Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`classifier`] - Model adapter trait and the ONNX backend (`onnx` feature)
//! - [`cli`] - Command-line interface helpers
//! - [`config`] - Configuration management
//! - [`decision`] - Probability-to-label decision rule
//! - [`error`] - Error types and result aliases
//! - [`lemmatizer`] - WordNet noun lemmatizer
//! - [`models`] - Core data structures
//! - [`normalizer`] - Header strip, stopword removal and lemmatization
//! - [`pipeline`] - End-to-end prediction
//! - [`resources`] - Linguistic resource discovery and loading
//! - [`server`] - HTTP prediction API
//! - [`stopwords`] - English stopword set
//! - [`vectorizer`] - Token vocabulary and sequence padding

pub mod classifier;
pub mod cli;
pub mod config;
pub mod decision;
pub mod error;
pub mod lemmatizer;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod resources;
pub mod server;
pub mod stopwords;
pub mod vectorizer;

// Re-export commonly used types for convenience
pub use error::{Result, SpamError};

// Core data models
pub use models::{
    ClassificationResult, EmailInput, EncodedSequence, NormalizedText, ProbabilityVector,
    SpamLabel,
};

// Pipeline stages
pub use classifier::SequenceClassifier;
pub use decision::decide;
pub use lemmatizer::{Lemmatizer, WordNetLemmatizer};
pub use normalizer::Normalizer;
pub use pipeline::SpamPipeline;
pub use stopwords::StopwordSet;
pub use vectorizer::{KerasVocabulary, Vectorizer, Vocabulary};

#[cfg(feature = "onnx")]
pub use classifier::OnnxSequenceClassifier;

// Config types
pub use config::{ArtifactConfig, Config, ResourceConfig, ServerConfig};
