//! Record aggregation into a graph.

use crate::record::SourceRecord;
use crate::relation::RelationTable;
use crate::resolver::{EntityResolver, MappingTableResolver};
use crate::risk_mapping::RiskMapping;
use chainrisk_types::{AttributeValue, Edge, Graph, InvalidGraphError, Node, NodeId, NodeKind};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};

/// Days per source buffer unit (source data reports months).
pub const DEFAULT_DAYS_PER_BUFFER_UNIT: f64 = 30.0;

/// Certification values that mean "none".
const NO_CERTIFICATION: &str = "N/A";

/// Errors raised while ingesting records.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IngestError {
    #[error("Record has an empty facility name")]
    EmptyName,

    #[error("Relation from `{0}` has an empty target")]
    EmptyTarget(NodeId),

    #[error("Risk score of `{node}` is {value}, expected a value in [0, 1]")]
    ScoreOutOfRange { node: NodeId, value: f64 },

    #[error(transparent)]
    InvalidGraph(#[from] InvalidGraphError),
}

/// Aggregates [`SourceRecord`]s into a validated [`Graph`].
///
/// Names are resolved through the injected [`EntityResolver`], so variant
/// spellings of one facility collapse into a single node. Nodes keep the
/// order in which they were first seen, as an ingested facility or as a
/// relation target.
///
/// Assessment scores are kept as the `risk_score` attribute; a node's
/// `local_risk` is derived from its latest score by the [`RiskMapping`]
/// when the graph is built.
pub struct GraphBuilder<R = MappingTableResolver> {
    resolver: R,
    relations: RelationTable,
    days_per_buffer_unit: f64,
    risk_mapping: RiskMapping,
    nodes: Vec<Node>,
    scores: Vec<Option<f64>>,
    index: HashMap<NodeId, usize>,
    edges: Vec<Edge>,
}

impl<R: EntityResolver> GraphBuilder<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            relations: RelationTable::default(),
            days_per_buffer_unit: DEFAULT_DAYS_PER_BUFFER_UNIT,
            risk_mapping: RiskMapping::default(),
            nodes: Vec::new(),
            scores: Vec::new(),
            index: HashMap::new(),
            edges: Vec::new(),
        }
    }

    pub fn with_relations(mut self, relations: RelationTable) -> Self {
        self.relations = relations;
        self
    }

    pub fn with_days_per_buffer_unit(mut self, days: f64) -> Self {
        self.days_per_buffer_unit = days;
        self
    }

    pub fn with_risk_mapping(mut self, mapping: RiskMapping) -> Self {
        self.risk_mapping = mapping;
        self
    }

    /// Number of distinct nodes seen so far.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Merge one record.
    ///
    /// Scalar fields overwrite earlier values; certifications accumulate.
    /// Range checks are deferred to [`build`](Self::build).
    pub fn ingest(&mut self, record: &SourceRecord) -> Result<(), IngestError> {
        if record.facility_name.trim().is_empty() {
            return Err(IngestError::EmptyName);
        }
        let id = NodeId::new(self.resolver.resolve(&record.facility_name));
        let idx = self.node_index(&id);

        if let Some(tier) = &record.tier {
            let node = &mut self.nodes[idx];
            node.kind = kind_for_tier(tier);
            node.attributes
                .insert("tier".to_string(), AttributeValue::from(tier.as_str()));
        }
        if let Some(region) = &record.region {
            let region = self.resolver.resolve(region);
            self.nodes[idx]
                .attributes
                .insert("region".to_string(), AttributeValue::String(region));
        }
        if let Some(certification) = &record.certification {
            let certification = self.resolver.resolve(certification);
            if !certification.eq_ignore_ascii_case(NO_CERTIFICATION) {
                add_certification(&mut self.nodes[idx], certification);
            }
        }
        if let Some(score) = record.risk_score {
            if !(0.0..=1.0).contains(&score) {
                return Err(IngestError::ScoreOutOfRange {
                    node: id,
                    value: score,
                });
            }
            self.scores[idx] = Some(score);
            self.nodes[idx]
                .attributes
                .insert("risk_score".to_string(), AttributeValue::from(score));
        }
        if let Some(buffer) = record.buffer {
            self.nodes[idx].inventory_buffer = buffer * self.days_per_buffer_unit;
        }
        if let Some(weight) = record.dependency_weight {
            self.nodes[idx]
                .attributes
                .insert("dependency_weight".to_string(), AttributeValue::from(weight));
        }

        if let Some(relation) = &record.relation {
            if relation.target.trim().is_empty() {
                return Err(IngestError::EmptyTarget(id));
            }
            let target = NodeId::new(self.resolver.resolve(&relation.target));
            self.node_index(&target);

            let mut edge = Edge::new(id.clone(), target, self.relations.classify(&relation.phrase));
            if let Some(material) = &relation.material {
                edge = edge.with_attribute("material", material.as_str());
            }
            debug!(
                source = %edge.source,
                target = %edge.target,
                relation = %edge.relation,
                "Ingested relation"
            );
            self.edges.push(edge);
        }

        Ok(())
    }

    /// Merge every record in order.
    pub fn ingest_all<'a>(
        &mut self,
        records: impl IntoIterator<Item = &'a SourceRecord>,
    ) -> Result<(), IngestError> {
        records.into_iter().try_for_each(|r| self.ingest(r))
    }

    /// Validate and produce the graph.
    pub fn build(self) -> Result<Graph, IngestError> {
        let mapping = &self.risk_mapping;
        let nodes: Vec<Node> = self
            .nodes
            .into_iter()
            .zip(&self.scores)
            .map(|(node, &score)| node.with_local_risk(mapping.probability(score)))
            .collect();
        let graph = Graph::new(nodes, self.edges)?;
        info!(
            nodes = graph.len(),
            edges = graph.edge_count(),
            "Built supply-chain graph"
        );
        Ok(graph)
    }

    /// Index of `id`, creating a bare facility on first sight.
    fn node_index(&mut self, id: &NodeId) -> usize {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(Node::new(id.clone(), NodeKind::Facility));
        self.scores.push(None);
        self.index.insert(id.clone(), idx);
        idx
    }
}

/// "Brand" is an endpoint; "Tier 2" and deeper are suppliers.
fn kind_for_tier(tier: &str) -> NodeKind {
    let tier = tier.trim();
    if tier.eq_ignore_ascii_case("brand") {
        return NodeKind::Endpoint;
    }
    let level: Option<u32> = tier
        .chars()
        .filter(char::is_ascii_digit)
        .collect::<String>()
        .parse()
        .ok();
    match level {
        Some(level) if level >= 2 => NodeKind::Supplier,
        _ => NodeKind::Facility,
    }
}

fn add_certification(node: &mut Node, certification: String) {
    let mut set: BTreeSet<String> = match node.attributes.get("certifications") {
        Some(AttributeValue::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_owned))
            .collect(),
        _ => BTreeSet::new(),
    };
    set.insert(certification);
    node.attributes.insert(
        "certifications".to_string(),
        AttributeValue::from(set.into_iter().collect::<Vec<_>>()),
    );
}
