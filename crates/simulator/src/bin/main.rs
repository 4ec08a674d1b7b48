//! chainrisk Simulator CLI
//!
//! Run a disruption analysis over a supply-chain graph.
//!
//! # Example
//!
//! ```bash
//! # Bundled sample chain, reproducible
//! chainrisk-sim --seed 42 --runs 10000
//!
//! # Serialized graph, buffer threshold of 60 days, parallel runs
//! chainrisk-sim --graph chain.json --endpoint "Brand A Distribution Center" \
//!     --buffer-threshold 60 --threads 8 --json-out report.json
//!
//! # Raw source records with an alias table
//! chainrisk-sim --records records.json --aliases aliases.json --endpoint DC
//! ```

use anyhow::{bail, Context, Result};
use chainrisk_analysis::Threshold;
use chainrisk_engine::{EngineConfig, RiskEngine, DEFAULT_RUN_COUNT};
use chainrisk_simulation::CascadePolicy;
use chainrisk_simulator::{write_report, GraphSource};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// chainrisk Simulator
///
/// Estimates how likely an endpoint is to be disrupted by failures
/// upstream of it. Reproducible when the same seed is used, regardless
/// of thread count.
#[derive(Parser, Debug)]
#[command(name = "chainrisk-sim")]
#[command(version, about, long_about = None)]
struct Args {
    /// Serialized graph (JSON with `nodes` and `edges`)
    #[arg(short = 'g', long, conflicts_with = "records")]
    graph: Option<PathBuf>,

    /// Source records (JSON array) to aggregate into a graph
    #[arg(short = 'r', long)]
    records: Option<PathBuf>,

    /// Alias table (JSON object, alias -> canonical name) for --records
    #[arg(long, requires = "records")]
    aliases: Option<PathBuf>,

    /// Endpoint to analyse. Required unless the bundled sample is used.
    #[arg(short = 'e', long)]
    endpoint: Option<String>,

    /// Buffer days at which a node's risk is fully absorbed
    #[arg(short = 'b', long, default_value = "90")]
    buffer_threshold: f64,

    /// Number of Monte Carlo runs
    #[arg(short = 'n', long, default_value_t = DEFAULT_RUN_COUNT)]
    runs: u64,

    /// Random seed for reproducible results. When omitted, a random seed is used.
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads for the simulation. Defaults to the global pool.
    #[arg(short = 't', long)]
    threads: Option<usize>,

    /// How failures cascade into a node
    #[arg(long, value_enum, default_value = "any")]
    policy: PolicyArg,

    /// Hub cut-off on normalized in-degree: `90%` for a percentile, `0.5` for a fixed value
    #[arg(long, default_value = "90%", value_parser = parse_threshold)]
    hub_threshold: Threshold,

    /// Bottleneck cut-off on betweenness: `90%` for a percentile, `0.1` for a fixed value
    #[arg(long, default_value = "90%", value_parser = parse_threshold)]
    bottleneck_threshold: Threshold,

    /// Keep only the top N entries of each ranking
    #[arg(long)]
    top: Option<usize>,

    /// Write the full report as JSON
    #[arg(short = 'o', long)]
    json_out: Option<PathBuf>,

    /// Skip the printed summary
    #[arg(short = 'q', long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    /// A node fails if any direct supplier fails
    Any,
    /// A node fails only if every direct supplier fails
    All,
}

impl From<PolicyArg> for CascadePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Any => CascadePolicy::AnyUpstream,
            PolicyArg::All => CascadePolicy::AllUpstream,
        }
    }
}

fn parse_threshold(raw: &str) -> Result<Threshold, String> {
    let raw = raw.trim();
    let (value, percentile) = match raw.strip_suffix('%') {
        Some(value) => (value, true),
        None => (raw, false),
    };
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid threshold '{}': {}", raw, e))?;
    Ok(if percentile {
        Threshold::Percentile(value)
    } else {
        Threshold::Fixed(value)
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,chainrisk_simulator=info")),
        )
        .init();

    let args = Args::parse();

    let source = match (&args.graph, &args.records) {
        (Some(path), _) => GraphSource::GraphJson(path.clone()),
        (None, Some(records)) => GraphSource::RecordsJson {
            records: records.clone(),
            aliases: args.aliases.clone(),
        },
        (None, None) => GraphSource::Sample,
    };

    let endpoint = match (&args.endpoint, source.default_endpoint()) {
        (Some(endpoint), _) => endpoint.clone(),
        (None, Some(endpoint)) => endpoint.to_string(),
        (None, None) => bail!("--endpoint is required with --graph or --records"),
    };

    let seed = args.seed.unwrap_or_else(rand::random);

    info!(
        endpoint = %endpoint,
        buffer_threshold = args.buffer_threshold,
        runs = args.runs,
        seed,
        threads = ?args.threads,
        policy = ?args.policy,
        "Starting analysis"
    );

    let graph = source.load().context("Failed to load graph")?;

    let mut config = EngineConfig::new(
        endpoint,
        args.buffer_threshold,
        args.hub_threshold,
        args.bottleneck_threshold,
    )
    .with_run_count(args.runs)
    .with_seed(seed)
    .with_cascade_policy(args.policy.into());
    if let Some(threads) = args.threads {
        config = config.with_threads(threads);
    }
    if let Some(n) = args.top {
        config = config.with_top_n(n);
    }

    let engine = RiskEngine::new(&graph, config).context("Invalid configuration")?;
    let report = engine.analyze().context("Analysis failed")?;

    if !args.quiet {
        report.print_summary();
    }

    if let Some(path) = &args.json_out {
        write_report(path, &report)?;
    }

    Ok(())
}
