//! Verb phrase to [`Relation`] mapping.

use chainrisk_types::Relation;

/// Ordered phrase table. The first phrase contained in the text wins.
#[derive(Debug, Clone)]
pub struct RelationTable {
    entries: Vec<(String, Relation)>,
}

impl Default for RelationTable {
    fn default() -> Self {
        Self::empty()
            .with_phrase("Supplies", Relation::Supplies)
            .with_phrase("Delivers", Relation::Supplies)
            .with_phrase("Ships materials", Relation::Supplies)
            .with_phrase("Produces", Relation::Produces)
            .with_phrase("assembly", Relation::FinalAssembly)
    }
}

impl RelationTable {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a phrase. Matching is case-insensitive.
    pub fn with_phrase(mut self, phrase: impl Into<String>, relation: Relation) -> Self {
        self.entries.push((phrase.into().to_lowercase(), relation));
        self
    }

    /// Classify a verb phrase; unknown phrases map to [`Relation::Other`].
    pub fn classify(&self, text: &str) -> Relation {
        let text = text.to_lowercase();
        self.entries
            .iter()
            .find(|(phrase, _)| text.contains(phrase.as_str()))
            .map_or(Relation::Other, |(_, relation)| *relation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_phrases() {
        let table = RelationTable::default();
        assert_eq!(table.classify("Supplies"), Relation::Supplies);
        assert_eq!(table.classify("delivers"), Relation::Supplies);
        assert_eq!(table.classify("Ships materials"), Relation::Supplies);
        assert_eq!(table.classify("Produces circuit boards"), Relation::Produces);
        assert_eq!(table.classify("Final product assembly"), Relation::FinalAssembly);
        assert_eq!(table.classify("Audits"), Relation::Other);
    }

    #[test]
    fn test_first_match_wins() {
        let table = RelationTable::empty()
            .with_phrase("ships", Relation::Supplies)
            .with_phrase("ships parts", Relation::Produces);
        assert_eq!(table.classify("Ships parts"), Relation::Supplies);
    }
}
