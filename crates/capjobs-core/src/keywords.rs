//! Keyword registry — the whitelist of collections the API may address.
//!
//! Built once from the `VALID_KEYWORDS` environment value and never mutated
//! afterwards, so it can be shared across request tasks without locking.

use crate::config::ConfigError;

/// Ordered list of queryable keywords, exactly as configured.
///
/// Membership is an exact, case-sensitive comparison: `Python` and `python`
/// are different keywords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRegistry {
    keywords: Vec<String>,
}

impl KeywordRegistry {
    /// Parse a comma and/or whitespace delimited keyword list.
    ///
    /// Entries are trimmed and empty entries are skipped. Repeated entries are
    /// kept, so the listing mirrors the configuration. An input with no
    /// keywords at all is rejected.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        Self::from_keywords(raw.split(|c: char| c == ',' || c.is_whitespace()))
    }

    /// Build a registry from already-split entries.
    pub fn from_keywords<I, S>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords: Vec<String> = entries
            .into_iter()
            .map(|entry| entry.as_ref().trim().to_string())
            .filter(|keyword| !keyword.is_empty())
            .collect();

        if keywords.is_empty() {
            return Err(ConfigError::NoKeywords);
        }

        Ok(Self { keywords })
    }

    pub fn is_valid(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    /// All keywords, in configured order.
    pub fn all(&self) -> &[String] {
        &self.keywords
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Always `false` for a successfully constructed registry.
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }
}

impl<'a> IntoIterator for &'a KeywordRegistry {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.keywords.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
