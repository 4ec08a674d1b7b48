//! Full engine pipeline over shared fixtures.

use chainrisk_analysis::{PathResult, Threshold};
use chainrisk_engine::{DisruptionReport, EngineConfig, EngineError, RiskEngine};
use chainrisk_simulation::CascadePolicy;
use chainrisk_test_helpers::{fixtures, TestGraph};
use chainrisk_types::{NodeId, UnknownNodeError};
use tracing_test::traced_test;

fn percentile_config(endpoint: &str, buffer_threshold: f64) -> EngineConfig {
    EngineConfig::new(
        endpoint,
        buffer_threshold,
        Threshold::Percentile(75.0),
        Threshold::Percentile(75.0),
    )
}

#[traced_test]
#[test]
fn test_reference_supply_chain_report() {
    let graph = fixtures::reference_supply_chain();
    let config = percentile_config(fixtures::REFERENCE_ENDPOINT, 180.0)
        .with_run_count(10_000)
        .with_seed(2024);
    let report = RiskEngine::new(&graph, config).unwrap().analyze().unwrap();
    report.print_summary();

    // Mill holds 90 of 180 days: half its risk is absorbed.
    let mill = report.risk.profiles.get("Sunrise Textiles").unwrap();
    assert_eq!(mill.damping_factor, 0.5);
    assert!((mill.effective_risk - 0.05).abs() < 1e-12);

    // Endpoint fails iff any of Asia, Foxconn, the mill or the DC itself
    // fails locally.
    let expected = 1.0 - 0.98 * 0.90 * 0.95 * 0.98;
    assert!((report.endpoint_disruption_probability() - expected).abs() < 0.02);
    assert!(report.confidence_interval().lower <= report.endpoint_disruption_probability());
    assert_eq!(report.master_seed(), 2024);

    assert_eq!(report.endpoint_upstream.len(), 3);
    assert_eq!(report.structural.hubs, vec![NodeId::from("Sunrise Textiles")]);
    assert_eq!(report.risk.propagated[0].node.as_str(), "Foxconn Facility No. 3");
}

#[test]
fn test_fully_buffered_node_is_damped_to_zero() {
    // threshold 10, buffer 10, local risk 0.8 -> damping 1, effective 0
    let graph = TestGraph::new()
        .buffered("mill", 0.8, 10.0)
        .endpoint("dc")
        .edge("mill", "dc")
        .build();
    let config = percentile_config("dc", 10.0).with_seed(1);
    let report = RiskEngine::new(&graph, config).unwrap().analyze().unwrap();

    let mill = report.risk.profiles.get("mill").unwrap();
    assert_eq!(mill.damping_factor, 1.0);
    assert_eq!(mill.effective_risk, 0.0);
    assert_eq!(report.endpoint_disruption_probability(), 0.0);
}

#[test]
fn test_abc_chain_through_engine() {
    let graph = fixtures::abc_chain(0.5);
    let config = percentile_config("C", 1.0)
        .with_run_count(10_000)
        .with_seed(42);
    let report = RiskEngine::new(&graph, config).unwrap().analyze().unwrap();

    assert!((report.endpoint_disruption_probability() - 0.875).abs() < 0.02);
}

#[test]
fn test_same_seed_same_report() {
    let graph = TestGraph::random_dag(30, 0.1, 0.4, 5);
    let endpoint = graph.id(graph.len() - 1).to_string();
    let config = percentile_config(&endpoint, 7.0).with_seed(77).with_threads(2);

    let a = RiskEngine::new(&graph, config.clone()).unwrap().analyze().unwrap();
    let b = RiskEngine::new(&graph, config.with_threads(1))
        .unwrap()
        .analyze()
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_cascade_policy_is_configurable() {
    let graph = fixtures::diamond(0.3);
    let base = percentile_config("t", 5.0).with_run_count(5000).with_seed(9);

    let any = RiskEngine::new(&graph, base.clone()).unwrap().analyze().unwrap();
    let all = RiskEngine::new(&graph, base.with_cascade_policy(CascadePolicy::AllUpstream))
        .unwrap()
        .analyze()
        .unwrap();

    assert!(all.endpoint_disruption_probability() <= any.endpoint_disruption_probability());
    assert_eq!(all.risk.simulation.policy, CascadePolicy::AllUpstream);
}

#[test]
fn test_top_n_truncates_rankings_only() {
    let graph = TestGraph::random_dag(15, 0.2, 0.4, 3);
    let endpoint = graph.id(14).to_string();
    let config = percentile_config(&endpoint, 7.0).with_seed(1).with_top_n(5);
    let report = RiskEngine::new(&graph, config).unwrap().analyze().unwrap();

    assert_eq!(report.structural.betweenness.len(), 5);
    assert_eq!(report.structural.in_degree.len(), 5);
    assert_eq!(report.risk.propagated.len(), 5);
    assert_eq!(report.risk.profiles.len(), 15);
    assert_eq!(report.risk.simulation.nodes.len(), 15);
}

#[test]
fn test_on_demand_queries() {
    let graph = fixtures::disconnected();
    let engine = RiskEngine::new(&graph, percentile_config("dc", 5.0)).unwrap();

    assert_eq!(engine.shortest_path("x", "dc").unwrap(), PathResult::NoPath);
    assert_eq!(
        engine.upstream_audit("dc").unwrap(),
        vec![NodeId::from("a"), NodeId::from("b")]
    );
    assert_eq!(engine.downstream_impact("x").unwrap(), vec![NodeId::from("y")]);
    assert_eq!(
        engine.upstream_audit("ghost"),
        Err(EngineError::UnknownNode(UnknownNodeError(NodeId::from("ghost"))))
    );
}

#[test]
fn test_report_serializes_round_trip() {
    let graph = fixtures::reference_supply_chain();
    let config = percentile_config(fixtures::REFERENCE_ENDPOINT, 90.0).with_seed(3);
    let report = RiskEngine::new(&graph, config).unwrap().analyze().unwrap();

    let json = serde_json::to_string(&report).unwrap();
    let parsed: DisruptionReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.endpoint, report.endpoint);
    assert_eq!(parsed.endpoint_upstream, report.endpoint_upstream);
    assert_eq!(parsed.structural.hubs, report.structural.hubs);
    assert_eq!(
        parsed.risk.simulation.endpoint_failures,
        report.risk.simulation.endpoint_failures
    );
    assert_eq!(parsed.master_seed(), 3);
}
