//! End-to-end structural analysis over shared fixtures.

use chainrisk_analysis::{AnalysisConfig, PathResult, StructuralAnalyzer, Threshold};
use chainrisk_test_helpers::fixtures::{self, REFERENCE_ENDPOINT};
use chainrisk_test_helpers::TestGraph;
use chainrisk_types::NodeId;

fn ids(items: &[NodeId]) -> Vec<&str> {
    items.iter().map(NodeId::as_str).collect()
}

#[test]
fn test_reference_chain_structure() {
    let graph = fixtures::reference_supply_chain();
    let analyzer = StructuralAnalyzer::new(&graph);
    let config = AnalysisConfig::new(Threshold::Percentile(75.0), Threshold::Percentile(75.0));
    let report = analyzer.analyze(&config).unwrap();

    // Asia -> Foxconn -> Sunrise -> DC: Sunrise and Foxconn carry paths.
    // Sunrise sits between 2 pairs, Foxconn between 2 pairs, scaled by 1/6.
    let sunrise = report
        .betweenness
        .iter()
        .find(|s| s.node.as_str() == "Sunrise Textiles")
        .unwrap();
    assert!((sunrise.score - 2.0 / 6.0).abs() < 1e-12);

    // Parallel yarn edges make the mill the in-degree leader.
    assert_eq!(report.in_degree[0].node.as_str(), "Sunrise Textiles");
    assert_eq!(report.in_degree[0].in_degree, 2);
    assert_eq!(ids(&report.hubs), vec!["Sunrise Textiles"]);

    let audit = analyzer.upstream_audit(REFERENCE_ENDPOINT).unwrap();
    assert_eq!(
        ids(&audit),
        vec!["Foxconn Facility No. 3", "Sunrise Textiles", "Asia Components Ltd."]
    );

    let path = analyzer
        .shortest_path("Asia Components Ltd.", REFERENCE_ENDPOINT)
        .unwrap();
    assert_eq!(path.hops(), Some(3));
}

#[test]
fn test_isolated_node_scores_zero_everywhere() {
    let graph = TestGraph::new()
        .node("a", 0.1)
        .node("b", 0.1)
        .node("c", 0.1)
        .node("lone", 0.1)
        .edge("a", "b")
        .edge("b", "c")
        .build();
    assert!(graph.is_isolated(graph.require("lone").unwrap()));
    assert!(!graph.is_isolated(graph.require("c").unwrap()));
    let config = AnalysisConfig::new(Threshold::Fixed(0.0), Threshold::Fixed(0.0));
    let report = StructuralAnalyzer::new(&graph).analyze(&config).unwrap();

    let lone_bc = report
        .betweenness
        .iter()
        .find(|s| s.node.as_str() == "lone")
        .unwrap();
    let lone_deg = report
        .in_degree
        .iter()
        .find(|s| s.node.as_str() == "lone")
        .unwrap();
    assert_eq!(lone_bc.score, 0.0);
    assert_eq!(lone_deg.in_degree, 0);
    assert!(!report.hubs.iter().any(|h| h.as_str() == "lone"));
    assert!(report
        .communities
        .communities
        .iter()
        .any(|c| ids(c) == vec!["lone"]));
}

#[test]
fn test_disconnected_query_reports_no_path() {
    let graph = fixtures::disconnected();
    let analyzer = StructuralAnalyzer::new(&graph);

    assert_eq!(analyzer.shortest_path("x", "dc").unwrap(), PathResult::NoPath);
    assert!(analyzer.shortest_path("a", "dc").unwrap().is_found());
}

#[test]
fn test_communities_partition_random_graphs() {
    for seed in 0..5 {
        let graph = TestGraph::random_dag(20, 0.15, 0.5, seed);
        let partition = StructuralAnalyzer::new(&graph).communities();

        let mut members: Vec<&str> = partition
            .communities
            .iter()
            .flat_map(|c| ids(c))
            .collect();
        members.sort_unstable();
        let mut expected: Vec<&str> = graph.nodes().iter().map(|n| n.id.as_str()).collect();
        expected.sort_unstable();
        assert_eq!(members, expected);
        assert!((-0.5..=1.0).contains(&partition.modularity));
    }
}

#[test]
fn test_analysis_is_deterministic() {
    let graph = TestGraph::random_dag(30, 0.1, 0.5, 99);
    let config = AnalysisConfig::new(Threshold::Percentile(90.0), Threshold::Percentile(90.0));
    let first = StructuralAnalyzer::new(&graph).analyze(&config).unwrap();
    let second = StructuralAnalyzer::new(&graph).analyze(&config).unwrap();
    assert_eq!(first, second);
}
