//! Dictionary-based lemmatization
//!
//! [`WordNetLemmatizer`] reproduces WordNet's `morphy` for nouns: the
//! exception list is consulted first, then suffix detachment rules are applied
//! until a candidate appears in the noun index. Lookups are case-sensitive, so
//! `"EMAILS"` is returned untouched while `"emails"` becomes `"email"`.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::{Result, SpamError};

/// File names inside a WordNet dictionary directory
pub const NOUN_INDEX_FILE: &str = "index.noun";
pub const NOUN_EXCEPTIONS_FILE: &str = "noun.exc";

/// Noun detachment rules, in WordNet order
const NOUN_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

/// Maps a single token to its dictionary base form
pub trait Lemmatizer: Send + Sync {
    fn lemmatize(&self, word: &str) -> String;
}

/// Noun lemmatizer backed by WordNet's `index.noun` and `noun.exc`
#[derive(Debug, Clone, Default)]
pub struct WordNetLemmatizer {
    nouns: HashSet<String>,
    exceptions: HashMap<String, Vec<String>>,
}

impl WordNetLemmatizer {
    /// Load from a WordNet dictionary directory
    pub fn load(dir: &Path) -> Result<Self> {
        let index_path = dir.join(NOUN_INDEX_FILE);
        let exc_path = dir.join(NOUN_EXCEPTIONS_FILE);

        let index = read_resource(&index_path)?;
        let exceptions = read_resource(&exc_path)?;

        let lemmatizer = Self::from_sources(&index, &exceptions);
        if lemmatizer.nouns.is_empty() {
            return Err(SpamError::ResourceParse {
                path: index_path,
                message: "no lemmas found in noun index".to_string(),
            });
        }

        tracing::info!(
            "Loaded WordNet nouns from {:?} ({} lemmas, {} exceptions)",
            dir,
            lemmatizer.nouns.len(),
            lemmatizer.exceptions.len()
        );
        Ok(lemmatizer)
    }

    /// Build from the raw contents of `index.noun` and `noun.exc`
    pub fn from_sources(index: &str, exceptions: &str) -> Self {
        // License header lines in the index start with a space
        let nouns = index
            .lines()
            .filter(|line| !line.starts_with(' '))
            .filter_map(|line| line.split_whitespace().next())
            .map(str::to_string)
            .collect();

        let exceptions = exceptions
            .lines()
            .filter_map(|line| {
                let mut terms = line.split_whitespace();
                let inflected = terms.next()?;
                Some((inflected.to_string(), terms.map(str::to_string).collect()))
            })
            .collect();

        Self { nouns, exceptions }
    }

    /// All base forms of `form` known to the noun index, in discovery order
    pub fn morphy(&self, form: &str) -> Vec<String> {
        if let Some(bases) = self.exceptions.get(form) {
            let candidates = std::iter::once(form.to_string()).chain(bases.iter().cloned());
            return self.known_nouns(candidates);
        }

        let mut forms = apply_rules(&[form.to_string()]);
        let results =
            self.known_nouns(std::iter::once(form.to_string()).chain(forms.iter().cloned()));
        if !results.is_empty() {
            return results;
        }

        while !forms.is_empty() {
            forms = apply_rules(&forms);
            let results = self.known_nouns(forms.iter().cloned());
            if !results.is_empty() {
                return results;
            }
        }

        Vec::new()
    }

    fn known_nouns(&self, candidates: impl Iterator<Item = String>) -> Vec<String> {
        let mut seen = HashSet::new();
        candidates
            .filter(|c| self.nouns.contains(c))
            .filter(|c| seen.insert(c.clone()))
            .collect()
    }
}

impl Lemmatizer for WordNetLemmatizer {
    fn lemmatize(&self, word: &str) -> String {
        self.morphy(word)
            .into_iter()
            .min_by_key(|lemma| lemma.chars().count())
            .unwrap_or_else(|| word.to_string())
    }
}

fn apply_rules(forms: &[String]) -> Vec<String> {
    forms
        .iter()
        .flat_map(|form| {
            NOUN_RULES.iter().filter_map(move |(suffix, replacement)| {
                form.strip_suffix(suffix)
                    .map(|stem| format!("{}{}", stem, replacement))
            })
        })
        .collect()
}

fn read_resource(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| SpamError::ResourceParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &str = "  1 This software and database is being provided to you, the LICENSEE,\n  2 by Princeton University under the following license.\n\
email n 2 1 @ 2 0 06279326 06279326\n\
glass n 7 4 @ ~ #p %p 7 1 04522168 03438257\n\
goose n 3 3 @ ~ %p 3 0 01855672 07644967\n\
man n 11 4 @ ~ #m %p 11 3 10287213\n\
money n 3 3 @ ~ ; 3 1 13384557\n\
city n 3 3 @ ~ #p 3 3 08524735\n\
wolf n 4 3 @ ~ %p 4 1 02114100\n\
box n 10 3 @ ~ + 10 2 02883344\n\
church n 4 4 @ ~ + 4 2 08080386\n\
a n 6 3 @ ~ %p 6 0 06831819\n\
as n 3 3 @ ~ %p 3 0 14632648\n";

    const EXCEPTIONS: &str = "geese goose\nmice mouse\nteeth tooth\n";

    fn lemmatizer() -> WordNetLemmatizer {
        WordNetLemmatizer::from_sources(INDEX, EXCEPTIONS)
    }

    #[test]
    fn test_license_header_skipped() {
        let lem = lemmatizer();
        assert!(!lem.nouns.contains("1"));
        assert!(lem.nouns.contains("email"));
        assert_eq!(lem.nouns.len(), 11);
    }

    #[test]
    fn test_plural_rules() {
        let lem = lemmatizer();
        assert_eq!(lem.lemmatize("emails"), "email");
        assert_eq!(lem.lemmatize("glasses"), "glass");
        assert_eq!(lem.lemmatize("cities"), "city");
        assert_eq!(lem.lemmatize("wolves"), "wolf");
        assert_eq!(lem.lemmatize("boxes"), "box");
        assert_eq!(lem.lemmatize("churches"), "church");
        assert_eq!(lem.lemmatize("men"), "man");
    }

    #[test]
    fn test_exceptions() {
        let lem = lemmatizer();
        assert_eq!(lem.lemmatize("geese"), "goose");
        // Exception bases not in the index yield nothing, so the word is kept
        assert_eq!(lem.lemmatize("mice"), "mice");
    }

    #[test]
    fn test_known_lemma_unchanged() {
        let lem = lemmatizer();
        assert_eq!(lem.lemmatize("money"), "money");
        assert_eq!(lem.lemmatize("glass"), "glass");
    }

    #[test]
    fn test_case_sensitive() {
        let lem = lemmatizer();
        assert_eq!(lem.lemmatize("EMAILS"), "EMAILS");
        assert_eq!(lem.lemmatize("Emails"), "Emails");
    }

    #[test]
    fn test_unknown_and_punctuated_words_pass_through() {
        let lem = lemmatizer();
        assert_eq!(lem.lemmatize("viagra!!"), "viagra!!");
        assert_eq!(lem.lemmatize("emails,"), "emails,");
        assert_eq!(lem.lemmatize(""), "");
    }

    #[test]
    fn test_shortest_candidate_wins() {
        let lem = lemmatizer();
        // "as" is itself a noun and also detaches to "a"
        assert_eq!(lem.morphy("as"), vec!["as".to_string(), "a".to_string()]);
        assert_eq!(lem.lemmatize("as"), "a");
    }

    #[test]
    fn test_repeated_rule_application() {
        let lem = lemmatizer();
        // "emailss" -> "emails" (not a noun) -> "email"
        assert_eq!(lem.lemmatize("emailss"), "email");
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join(NOUN_INDEX_FILE), INDEX).unwrap();
        std::fs::write(dir.path().join(NOUN_EXCEPTIONS_FILE), EXCEPTIONS).unwrap();

        let lem = WordNetLemmatizer::load(dir.path()).unwrap();
        assert_eq!(lem.lemmatize("geese"), "goose");
    }

    #[test]
    fn test_load_missing_exceptions_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join(NOUN_INDEX_FILE), INDEX).unwrap();

        let err = WordNetLemmatizer::load(dir.path()).unwrap_err();
        assert!(matches!(err, SpamError::ResourceParse { .. }));
    }
}
