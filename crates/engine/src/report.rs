//! Consolidated disruption report.

use chainrisk_analysis::{NodeScore, StructuralReport};
use chainrisk_risk::RiskTable;
use chainrisk_simulation::{ConfidenceInterval, SimulationSummary};
use chainrisk_types::NodeId;
use serde::{Deserialize, Serialize};

/// Quantitative risk results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    /// Damping factor and effective risk per node, canonical order.
    pub profiles: RiskTable,
    /// Propagated risk, highest first.
    pub propagated: Vec<NodeScore>,
    /// Monte Carlo outcome for the endpoint.
    pub simulation: SimulationSummary,
}

/// Everything one engine invocation produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisruptionReport {
    /// The analysed endpoint.
    pub endpoint: NodeId,
    /// Ancestors of the endpoint, canonical order.
    pub endpoint_upstream: Vec<NodeId>,
    /// Centrality, classification and communities.
    pub structural: StructuralReport,
    /// Damping, propagation and simulation.
    pub risk: RiskReport,
}

impl DisruptionReport {
    /// Estimated probability that the endpoint is disrupted.
    pub fn endpoint_disruption_probability(&self) -> f64 {
        self.risk.simulation.endpoint_disruption_probability
    }

    /// 95% confidence interval of the estimate.
    pub fn confidence_interval(&self) -> ConfidenceInterval {
        self.risk.simulation.confidence_interval
    }

    /// Seed that reproduces this report.
    pub fn master_seed(&self) -> u64 {
        self.risk.simulation.master_seed
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        let sim = &self.risk.simulation;

        println!("\n═══════════════════════════════════════════");
        println!("       SUPPLY-CHAIN DISRUPTION REPORT      ");
        println!("═══════════════════════════════════════════");
        println!();
        println!("Endpoint: {}", self.endpoint);
        println!(
            "  Upstream entities: {}",
            self.endpoint_upstream.len()
        );
        for id in &self.endpoint_upstream {
            println!("    - {}", id);
        }
        println!();

        println!("Bottlenecks (betweenness):");
        for entry in &self.structural.betweenness {
            let marker = if self.structural.bottlenecks.contains(&entry.node) {
                " *"
            } else {
                ""
            };
            println!("  {:<40} {:.4}{}", entry.node.as_str(), entry.score, marker);
        }
        println!();

        println!("Hubs (in-degree):");
        for entry in &self.structural.in_degree {
            let marker = if self.structural.hubs.contains(&entry.node) {
                " *"
            } else {
                ""
            };
            println!(
                "  {:<40} {:>3} ({:.3}){}",
                entry.node.as_str(),
                entry.in_degree,
                entry.normalized,
                marker
            );
        }
        println!();

        let communities = &self.structural.communities;
        println!(
            "Communities: {} (modularity {:.4})",
            communities.len(),
            communities.modularity
        );
        for (i, members) in communities.non_trivial().enumerate() {
            let names: Vec<&str> = members.iter().map(NodeId::as_str).collect();
            println!("  [{}] {}", i + 1, names.join(", "));
        }
        println!();

        println!("Risk (local -> effective, propagated):");
        for entry in &self.risk.propagated {
            if let Some(profile) = self.risk.profiles.get(entry.node.as_str()) {
                println!(
                    "  {:<40} damping {:.2}  effective {:.4}  propagated {:.4}",
                    entry.node.as_str(),
                    profile.damping_factor,
                    profile.effective_risk,
                    entry.score
                );
            }
        }
        println!();

        println!("Simulation ({} runs, {:?}):", sim.runs, sim.policy);
        for node in sim.ranked_nodes() {
            println!(
                "  {:<40} P(local) {:.3}  P(disrupted) {:.3}",
                node.node.as_str(),
                node.local_failure_probability,
                node.disruption_probability
            );
        }
        println!();
        println!(
            "P(endpoint disrupted): {:.2}%  (95% CI {:.2}% .. {:.2}%, SE {:.4})",
            sim.endpoint_disruption_probability * 100.0,
            sim.confidence_interval.lower * 100.0,
            sim.confidence_interval.upper * 100.0,
            sim.standard_error
        );
        println!("Master seed: {}", sim.master_seed);
        println!("═══════════════════════════════════════════\n");
    }
}
