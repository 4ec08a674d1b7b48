//! Canned graphs with known analytic answers.

use crate::TestGraph;
use chainrisk_types::{Edge, Graph, Node, NodeKind, Relation};

/// `A -> B -> C`, every node failing locally with probability `p`.
///
/// With the default cascade policy the endpoint `C` fails with probability
/// `1 - (1 - p)^3`.
pub fn abc_chain(p: f64) -> Graph {
    TestGraph::new()
        .node("A", p)
        .node("B", p)
        .node("C", p)
        .edge("A", "B")
        .edge("B", "C")
        .build()
}

/// Linear chain `n0 -> n1 -> ... -> n{k-1}` with one risk per node.
pub fn chain(risks: &[f64]) -> Graph {
    let mut builder = TestGraph::new();
    for (i, &risk) in risks.iter().enumerate() {
        builder = builder.node(&format!("n{i}"), risk);
    }
    for i in 1..risks.len() {
        builder = builder.edge(&format!("n{}", i - 1), &format!("n{i}"));
    }
    builder.build()
}

/// `s -> {x, y} -> t`: two equally short paths from `s` to `t`.
pub fn diamond(risk: f64) -> Graph {
    TestGraph::new()
        .node("s", risk)
        .node("x", risk)
        .node("y", risk)
        .node("t", risk)
        .edge("s", "x")
        .edge("s", "y")
        .edge("x", "t")
        .edge("y", "t")
        .build()
}

/// Directed cycle `a -> b -> c -> a` feeding an endpoint `out` from `c`.
pub fn cycle_with_exit(risk: f64) -> Graph {
    TestGraph::new()
        .node("a", risk)
        .node("b", risk)
        .node("c", risk)
        .endpoint("out")
        .edge("a", "b")
        .edge("b", "c")
        .edge("c", "a")
        .edge("c", "out")
        .build()
}

/// Two components: a risky `x -> y` pair and a risk-free `a -> b -> dc`
/// chain ending at endpoint `dc`.
pub fn disconnected() -> Graph {
    TestGraph::new()
        .node("x", 0.9)
        .node("y", 0.9)
        .node("a", 0.0)
        .node("b", 0.0)
        .endpoint("dc")
        .edge("x", "y")
        .edge("a", "b")
        .edge("b", "dc")
        .build()
}

/// Name of the endpoint in [`reference_supply_chain`].
pub const REFERENCE_ENDPOINT: &str = "Brand A Distribution Center";

/// Small apparel supply chain with a component supplier, a yarn producer
/// (doubly linked to the mill), a textile mill and a brand distribution
/// center. Mirrors what the ingest pipeline builds from its sample records:
/// assessment scores of 0.8 and 0.78 both map to a 10% local failure
/// probability, and unscored nodes fail at the 2% base rate.
pub fn reference_supply_chain() -> Graph {
    let nodes = vec![
        Node::new("Foxconn Facility No. 3", NodeKind::Supplier)
            .with_local_risk(0.10)
            .with_attribute("risk_score", 0.8)
            .with_attribute("tier", "Tier 2")
            .with_attribute("region", "Vietnam")
            .with_attribute("certifications", vec!["OEKO-TEX".to_string()]),
        Node::new("Sunrise Textiles", NodeKind::Facility)
            .with_local_risk(0.10)
            .with_inventory_buffer(90.0)
            .with_attribute("risk_score", 0.78)
            .with_attribute("tier", "Tier 1")
            .with_attribute("region", "India")
            .with_attribute("certifications", vec!["GOTS".to_string()]),
        Node::new(REFERENCE_ENDPOINT, NodeKind::Endpoint)
            .with_local_risk(0.02)
            .with_attribute("tier", "Brand")
            .with_attribute("region", "US"),
        Node::new("Asia Components Ltd.", NodeKind::Supplier)
            .with_local_risk(0.02)
            .with_attribute("tier", "Tier 3")
            .with_attribute("region", "China")
            .with_attribute("certifications", vec!["ISO 9001".to_string()])
            .with_attribute("dependency_weight", 0.7),
    ];
    let edges = vec![
        Edge::supplies("Foxconn Facility No. 3", "Sunrise Textiles")
            .with_attribute("material", "100% cotton yarn"),
        Edge::supplies("Sunrise Textiles", REFERENCE_ENDPOINT)
            .with_attribute("material", "finished fabric"),
        Edge::supplies("Foxconn Facility No. 3", "Sunrise Textiles")
            .with_attribute("material", "materials"),
        Edge::new(
            "Asia Components Ltd.",
            "Foxconn Facility No. 3",
            Relation::Produces,
        )
        .with_attribute("material", "circuit boards"),
    ];
    Graph::new(nodes, edges).expect("reference supply chain should be valid")
}
