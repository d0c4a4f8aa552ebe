//! Linguistic resource discovery and loading
//!
//! Startup happens in two phases. [`ensure_resources_available`] resolves
//! every file the normalizer needs and fails with the full list of searched
//! locations if anything is missing. [`LinguisticResources::load`] then reads
//! the resolved files once. Nothing is fetched or retried.
//!
//! Data roots follow the NLTK layout:
//!
//! ```text
//! <root>/corpora/wordnet/index.noun
//! <root>/corpora/wordnet/noun.exc
//! <root>/corpora/stopwords/english
//! ```

use std::path::{Path, PathBuf};

use crate::config::ResourceConfig;
use crate::error::{Result, SpamError};
use crate::lemmatizer::{WordNetLemmatizer, NOUN_EXCEPTIONS_FILE, NOUN_INDEX_FILE};
use crate::normalizer::Normalizer;
use crate::stopwords::StopwordSet;

const WORDNET_DIR: &str = "corpora/wordnet";
const STOPWORDS_FILE: &str = "corpora/stopwords/english";

/// Resolved locations of every linguistic resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePaths {
    pub wordnet_dir: PathBuf,
    /// `None` when the bundled stopword list is used
    pub stopwords_file: Option<PathBuf>,
}

/// Resolve resource locations without loading them
pub fn ensure_resources_available(config: &ResourceConfig) -> Result<ResourcePaths> {
    let wordnet_dir = find_in_roots(&config.search_paths, WORDNET_DIR, |dir| {
        dir.join(NOUN_INDEX_FILE).is_file() && dir.join(NOUN_EXCEPTIONS_FILE).is_file()
    })
    .ok_or_else(|| SpamError::ResourceUnavailable {
        resource: "wordnet".to_string(),
        searched: candidates(&config.search_paths, WORDNET_DIR),
    })?;

    let stopwords_file = if config.bundled_stopwords {
        None
    } else {
        let file = find_in_roots(&config.search_paths, STOPWORDS_FILE, |path| path.is_file())
            .ok_or_else(|| SpamError::ResourceUnavailable {
                resource: "stopwords".to_string(),
                searched: candidates(&config.search_paths, STOPWORDS_FILE),
            })?;
        Some(file)
    };

    tracing::debug!("Resolved WordNet at {:?}", wordnet_dir);
    Ok(ResourcePaths {
        wordnet_dir,
        stopwords_file,
    })
}

fn find_in_roots(
    roots: &[PathBuf],
    relative: &str,
    present: impl Fn(&Path) -> bool,
) -> Option<PathBuf> {
    candidates(roots, relative)
        .into_iter()
        .find(|candidate| present(candidate))
}

fn candidates(roots: &[PathBuf], relative: &str) -> Vec<PathBuf> {
    roots.iter().map(|root| root.join(relative)).collect()
}

/// Stopword set and lemmatizer, loaded once and shared read-only
pub struct LinguisticResources {
    pub stopwords: StopwordSet,
    pub lemmatizer: WordNetLemmatizer,
}

impl LinguisticResources {
    pub fn load(paths: &ResourcePaths) -> Result<Self> {
        let stopwords = match &paths.stopwords_file {
            Some(file) => StopwordSet::load(file)?,
            None => StopwordSet::english(),
        };
        let lemmatizer = WordNetLemmatizer::load(&paths.wordnet_dir)?;

        Ok(Self {
            stopwords,
            lemmatizer,
        })
    }

    pub fn into_normalizer(self) -> Normalizer {
        Normalizer::new(self.stopwords, self.lemmatizer)
    }
}
