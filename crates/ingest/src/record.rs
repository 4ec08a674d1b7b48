//! Pre-structured input records.

use serde::{Deserialize, Serialize};

/// One observation about a facility from some data source.
///
/// Every field except the name is optional; repeated records about the
/// same entity are merged by [`GraphBuilder`](crate::GraphBuilder).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    /// Raw facility name, resolved to a canonical id.
    pub facility_name: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub certification: Option<String>,
    /// "Tier 1", "Tier 2"... or "Brand".
    #[serde(default)]
    pub tier: Option<String>,
    /// Local risk in [0, 1].
    #[serde(default)]
    pub risk_score: Option<f64>,
    /// Inventory buffer in source units (months by default).
    #[serde(default)]
    pub buffer: Option<f64>,
    #[serde(default)]
    pub dependency_weight: Option<f64>,
    #[serde(default)]
    pub relation: Option<RelationRecord>,
}

/// A relationship from the record's facility to a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationRecord {
    /// Verb phrase, e.g. "Supplies" or "Ships materials".
    pub phrase: String,
    /// Raw target name.
    pub target: String,
    #[serde(default)]
    pub material: Option<String>,
}

impl SourceRecord {
    pub fn new(facility_name: impl Into<String>) -> Self {
        Self {
            facility_name: facility_name.into(),
            ..Default::default()
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_certification(mut self, certification: impl Into<String>) -> Self {
        self.certification = Some(certification.into());
        self
    }

    pub fn with_tier(mut self, tier: impl Into<String>) -> Self {
        self.tier = Some(tier.into());
        self
    }

    pub fn with_risk_score(mut self, risk_score: f64) -> Self {
        self.risk_score = Some(risk_score);
        self
    }

    pub fn with_buffer(mut self, buffer: f64) -> Self {
        self.buffer = Some(buffer);
        self
    }

    pub fn with_dependency_weight(mut self, weight: f64) -> Self {
        self.dependency_weight = Some(weight);
        self
    }

    /// Attach a relationship to `target`.
    pub fn with_relation(
        mut self,
        phrase: impl Into<String>,
        target: impl Into<String>,
        material: Option<&str>,
    ) -> Self {
        self.relation = Some(RelationRecord {
            phrase: phrase.into(),
            target: target.into(),
            material: material.map(str::to_string),
        });
        self
    }
}
