use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// Ordered, validated list of tracked search terms. Fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSet(Vec<String>);

impl KeywordSet {
    /// Build a keyword set, trimming each term.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the list is empty, a term is
    /// blank, or two terms are equal ignoring case.
    pub fn new<I, S>(keywords: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut terms = Vec::new();

        for raw in keywords {
            let term = raw.as_ref().trim();
            if term.is_empty() {
                return Err(ConfigError::Validation(
                    "keywords must be non-empty".to_string(),
                ));
            }
            if !seen.insert(term.to_lowercase()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate keyword: '{term}'"
                )));
            }
            terms.push(term.to_string());
        }

        if terms.is_empty() {
            return Err(ConfigError::Validation(
                "at least one keyword must be configured".to_string(),
            ));
        }

        Ok(Self(terms))
    }

    /// Parse a comma-separated list such as `python, aws,cloud`.
    ///
    /// # Errors
    ///
    /// Same as [`KeywordSet::new`].
    pub fn from_csv(raw: &str) -> Result<Self, ConfigError> {
        Self::new(raw.split(','))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

#[derive(Debug, Deserialize)]
struct KeywordsFile {
    keywords: Vec<String>,
}

/// Load the keyword list from a YAML file of the form `keywords: [..]`.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_keywords_file(path: &Path) -> Result<KeywordSet, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::KeywordsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: KeywordsFile = serde_yaml::from_str(&content)?;
    KeywordSet::new(file.keywords)
}
