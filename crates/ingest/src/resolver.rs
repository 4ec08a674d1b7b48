//! Entity resolution: mapping raw names to canonical ids.

use std::collections::HashMap;

/// Maps a raw name as it appears in source data to a canonical name.
pub trait EntityResolver {
    fn resolve(&self, raw: &str) -> String;
}

/// Alias table resolver.
///
/// Lookup order:
/// 1. exact alias match on the trimmed input
/// 2. alias or canonical name equal after [`normalize`]
/// 3. the trimmed input itself
#[derive(Debug, Clone, Default)]
pub struct MappingTableResolver {
    exact: HashMap<String, String>,
    normalized: HashMap<String, String>,
}

impl MappingTableResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(alias, canonical)` pairs.
    pub fn from_pairs<I, A, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, C)>,
        A: Into<String>,
        C: Into<String>,
    {
        pairs
            .into_iter()
            .fold(Self::new(), |resolver, (alias, canonical)| {
                resolver.with_alias(alias, canonical)
            })
    }

    /// Register an alias. Later registrations win.
    pub fn with_alias(mut self, alias: impl Into<String>, canonical: impl Into<String>) -> Self {
        let alias = alias.into().trim().to_string();
        let canonical = canonical.into().trim().to_string();
        self.normalized
            .insert(normalize(&canonical), canonical.clone());
        self.normalized.insert(normalize(&alias), canonical.clone());
        self.exact.insert(alias, canonical);
        self
    }

    /// Number of registered aliases.
    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }
}

impl EntityResolver for MappingTableResolver {
    fn resolve(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        if let Some(canonical) = self.exact.get(trimmed) {
            return canonical.clone();
        }
        if let Some(canonical) = self.normalized.get(&normalize(trimmed)) {
            return canonical.clone();
        }
        trimmed.to_string()
    }
}

/// Lowercase, drop punctuation, collapse whitespace.
pub fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
