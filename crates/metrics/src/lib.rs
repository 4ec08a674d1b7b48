//! Metrics facade for chainrisk.
//!
//! Provides a [`MetricsRecorder`] trait with domain-specific methods and default
//! no-op implementations. A global singleton recorder is accessed via
//! `recorder()`, and convenience free functions delegate to it.
//!
//! # Usage
//!
//! Callers record metrics via free functions:
//! ```ignore
//! chainrisk_metrics::record_simulation_completed(runs, endpoint_failures, latency_secs);
//! chainrisk_metrics::record_stage_latency("betweenness", latency_secs);
//! ```
//!
//! At startup, an embedding application may install a backend:
//! ```ignore
//! chainrisk_metrics::set_global_recorder(Box::new(MyPrometheusRecorder::new()));
//! ```
//!
//! Without one, every call is a no-op.

use std::sync::OnceLock;

// ═══════════════════════════════════════════════════════════════════════
// Trait
// ═══════════════════════════════════════════════════════════════════════

/// Domain-specific metrics recording trait.
///
/// All methods have default no-op implementations so backends only need
/// to override the metrics they care about.
#[allow(unused_variables)]
pub trait MetricsRecorder: Send + Sync + 'static {
    // ── Graph ────────────────────────────────────────────────────────

    /// Record a graph accepted for analysis.
    fn record_graph_loaded(&self, nodes: usize, edges: usize) {}

    /// Record a rejected input, labelled by error kind.
    fn record_validation_failure(&self, kind: &str) {}

    // ── Analysis ─────────────────────────────────────────────────────

    /// Record the latency of one analysis stage.
    fn record_stage_latency(&self, stage: &str, latency_secs: f64) {}

    /// Set the number of communities found in the last analysis.
    fn set_community_count(&self, count: usize) {}

    // ── Simulation ───────────────────────────────────────────────────

    /// Record a completed Monte Carlo simulation.
    fn record_simulation_completed(&self, runs: u64, endpoint_failures: u64, latency_secs: f64) {}

    /// Set the most recent endpoint disruption probability.
    fn set_endpoint_disruption_probability(&self, probability: f64) {}
}

// ═══════════════════════════════════════════════════════════════════════
// Global singleton
// ═══════════════════════════════════════════════════════════════════════

struct NoopRecorder;
impl MetricsRecorder for NoopRecorder {}

static RECORDER: OnceLock<Box<dyn MetricsRecorder>> = OnceLock::new();

/// Install a global metrics recorder.
///
/// Can only be called once. Subsequent calls are silently ignored.
pub fn set_global_recorder(recorder: Box<dyn MetricsRecorder>) {
    let _ = RECORDER.set(recorder);
}

/// Get the global metrics recorder.
///
/// Returns a no-op recorder if none has been installed.
#[inline]
fn recorder() -> &'static dyn MetricsRecorder {
    RECORDER.get().map(|r| r.as_ref()).unwrap_or(&NoopRecorder)
}

// ═══════════════════════════════════════════════════════════════════════
// Convenience free functions
// ═══════════════════════════════════════════════════════════════════════

// ── Graph ────────────────────────────────────────────────────────────

/// Record a graph accepted for analysis.
#[inline]
pub fn record_graph_loaded(nodes: usize, edges: usize) {
    recorder().record_graph_loaded(nodes, edges);
}

/// Record a rejected input, labelled by error kind.
#[inline]
pub fn record_validation_failure(kind: &str) {
    recorder().record_validation_failure(kind);
}

// ── Analysis ─────────────────────────────────────────────────────────

/// Record the latency of one analysis stage.
#[inline]
pub fn record_stage_latency(stage: &str, latency_secs: f64) {
    recorder().record_stage_latency(stage, latency_secs);
}

/// Set the number of communities found in the last analysis.
#[inline]
pub fn set_community_count(count: usize) {
    recorder().set_community_count(count);
}

// ── Simulation ───────────────────────────────────────────────────────

/// Record a completed Monte Carlo simulation.
#[inline]
pub fn record_simulation_completed(runs: u64, endpoint_failures: u64, latency_secs: f64) {
    recorder().record_simulation_completed(runs, endpoint_failures, latency_secs);
}

/// Set the most recent endpoint disruption probability.
#[inline]
pub fn set_endpoint_disruption_probability(probability: f64) {
    recorder().set_endpoint_disruption_probability(probability);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    struct Counting(Arc<AtomicU64>);

    impl MetricsRecorder for Counting {
        fn record_simulation_completed(&self, runs: u64, _failures: u64, _latency_secs: f64) {
            self.0.fetch_add(runs, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_installed_recorder_receives_calls() {
        let runs = Arc::new(AtomicU64::new(0));
        set_global_recorder(Box::new(Counting(runs.clone())));

        record_simulation_completed(500, 12, 0.01);
        record_simulation_completed(250, 3, 0.01);
        // Default no-op methods still callable.
        record_graph_loaded(4, 4);

        assert_eq!(runs.load(Ordering::Relaxed), 750);
    }
}
