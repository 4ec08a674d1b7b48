//! Monte Carlo driver.
//!
//! Runs are split into fixed-size chunks. Each chunk runs sequentially on
//! one worker and yields integer partial sums; chunks are merged by
//! addition. Run `i` always uses `derive_run_seed(master, i)`, so the
//! aggregate is bit-identical for a fixed master seed whatever the worker
//! count.

use crate::cascade::{derive_run_seed, CascadePlan};
use crate::config::SimulationConfig;
use crate::summary::{ConfidenceInterval, NodeFrequency, SimulationSummary, Tally};
use chainrisk_types::{ConfigurationError, Graph, UnknownNodeError};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info};

/// Runs per chunk of work.
const CHUNK_SIZE: u64 = 256;

/// Errors raised before any run starts. Individual runs cannot fail.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    #[error(transparent)]
    UnknownNode(#[from] UnknownNodeError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Seeded cascade simulator over a borrowed graph.
pub struct MonteCarloSimulator<'g> {
    graph: &'g Graph,
    config: SimulationConfig,
}

impl<'g> MonteCarloSimulator<'g> {
    /// Fails if the configuration is unusable.
    pub fn new(graph: &'g Graph, config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        Ok(Self { graph, config })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Estimate the probability that `endpoint` is disrupted.
    ///
    /// `effective_risks` gives each node's local failure probability in
    /// canonical order and must cover every node.
    pub fn run(
        &self,
        effective_risks: &[f64],
        endpoint: &str,
    ) -> Result<SimulationSummary, SimulationError> {
        let endpoint_idx = self.graph.require(endpoint)?;
        self.check_risks(effective_risks)?;

        let master_seed = self.config.seed.unwrap_or_else(rand::random);
        let plan = CascadePlan::new(self.graph, endpoint_idx, self.config.policy);
        let runs = self.config.run_count;

        info!(
            endpoint,
            runs,
            master_seed,
            policy = ?self.config.policy,
            threads = ?self.config.threads,
            acyclic = plan.is_acyclic(),
            "Starting Monte Carlo simulation"
        );

        let started = Instant::now();
        let tally = match self.config.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("chainrisk-sim-{}", i))
                    .build()
                    .map_err(|e| ConfigurationError::WorkerPool(e.to_string()))?;
                pool.install(|| self.execute(&plan, effective_risks, master_seed))
            }
            None => self.execute(&plan, effective_risks, master_seed),
        };
        let elapsed = started.elapsed().as_secs_f64();

        let summary = self.summarize(tally, endpoint_idx, master_seed);

        chainrisk_metrics::record_simulation_completed(runs, summary.endpoint_failures, elapsed);
        chainrisk_metrics::set_endpoint_disruption_probability(
            summary.endpoint_disruption_probability,
        );
        info!(
            endpoint,
            probability = summary.endpoint_disruption_probability,
            standard_error = summary.standard_error,
            elapsed_secs = elapsed,
            "Monte Carlo simulation complete"
        );

        Ok(summary)
    }

    fn check_risks(&self, risks: &[f64]) -> Result<(), ConfigurationError> {
        if risks.len() != self.graph.len() {
            return Err(ConfigurationError::RiskTableMismatch {
                expected: self.graph.len(),
                actual: risks.len(),
            });
        }
        for (i, &value) in risks.iter().enumerate() {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigurationError::EffectiveRiskOutOfRange {
                    node: self.graph.id(i).clone(),
                    value,
                });
            }
        }
        Ok(())
    }

    fn execute(&self, plan: &CascadePlan, risks: &[f64], master_seed: u64) -> Tally {
        let runs = self.config.run_count;
        let n = self.graph.len();
        let chunks = runs.div_ceil(CHUNK_SIZE);
        debug!(chunks, chunk_size = CHUNK_SIZE, "Dispatching simulation chunks");

        (0..chunks)
            .into_par_iter()
            .map(|chunk| {
                let start = chunk * CHUNK_SIZE;
                let end = (start + CHUNK_SIZE).min(runs);
                let mut tally = Tally::new(n);
                for run_index in start..end {
                    let outcome = plan.run(risks, derive_run_seed(master_seed, run_index));
                    tally.record(&outcome);
                }
                tally
            })
            .reduce(|| Tally::new(n), Tally::merge)
    }

    fn summarize(&self, tally: Tally, endpoint: usize, master_seed: u64) -> SimulationSummary {
        let runs = tally.runs as f64;
        let probability = tally.endpoint_failures as f64 / runs;
        let standard_error = (probability * (1.0 - probability) / runs).sqrt();

        let nodes = (0..self.graph.len())
            .map(|i| NodeFrequency {
                node: self.graph.id(i).clone(),
                disruption_probability: tally.disrupted[i] as f64 / runs,
                local_failure_probability: tally.local[i] as f64 / runs,
            })
            .collect();

        SimulationSummary {
            endpoint: self.graph.id(endpoint).clone(),
            runs: tally.runs,
            endpoint_failures: tally.endpoint_failures,
            endpoint_disruption_probability: probability,
            standard_error,
            confidence_interval: ConfidenceInterval::normal_95(probability, standard_error),
            nodes,
            master_seed,
            policy: self.config.policy,
        }
    }
}
