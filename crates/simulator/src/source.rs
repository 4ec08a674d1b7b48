//! Graph inputs and report output.

use chainrisk_engine::{load_graph, DisruptionReport, EngineError};
use chainrisk_ingest::sample::{sample_records, sample_resolver, SAMPLE_ENDPOINT};
use chainrisk_ingest::{GraphBuilder, IngestError, MappingTableResolver, SourceRecord};
use chainrisk_types::{Graph, GraphData};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Errors reading inputs or writing the report.
#[derive(Debug, thiserror::Error)]
pub enum SimulatorError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize report: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Graph input.
#[derive(Debug, Clone)]
pub enum GraphSource {
    /// The bundled sample supply chain.
    Sample,
    /// A serialized graph (`{"nodes": [...], "edges": [...]}`).
    GraphJson(PathBuf),
    /// Source records to aggregate, with an optional alias table
    /// (`{"alias": "canonical", ...}`).
    RecordsJson {
        records: PathBuf,
        aliases: Option<PathBuf>,
    },
}

impl GraphSource {
    /// Load and validate the graph.
    pub fn load(&self) -> Result<Graph, SimulatorError> {
        let graph = match self {
            GraphSource::Sample => {
                let mut builder = GraphBuilder::new(sample_resolver());
                builder.ingest_all(&sample_records())?;
                builder.build()?
            }
            GraphSource::GraphJson(path) => {
                let data: GraphData = read_json(path)?;
                load_graph(data)?
            }
            GraphSource::RecordsJson { records, aliases } => {
                let resolver = match aliases {
                    Some(path) => {
                        let table: BTreeMap<String, String> = read_json(path)?;
                        MappingTableResolver::from_pairs(table)
                    }
                    None => MappingTableResolver::new(),
                };
                let records: Vec<SourceRecord> = read_json(records)?;
                let mut builder = GraphBuilder::new(resolver);
                builder.ingest_all(&records)?;
                builder.build()?
            }
        };
        info!(
            source = ?self,
            nodes = graph.len(),
            edges = graph.edge_count(),
            "Loaded graph"
        );
        Ok(graph)
    }

    /// Endpoint to analyse when the caller names none.
    pub fn default_endpoint(&self) -> Option<&'static str> {
        match self {
            GraphSource::Sample => Some(SAMPLE_ENDPOINT),
            _ => None,
        }
    }
}

/// Write the report as pretty-printed JSON.
pub fn write_report(path: &Path, report: &DisruptionReport) -> Result<(), SimulatorError> {
    let json = serde_json::to_string_pretty(report).map_err(SimulatorError::Serialize)?;
    std::fs::write(path, json).map_err(|source| SimulatorError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "Wrote report");
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, SimulatorError> {
    let text = std::fs::read_to_string(path).map_err(|source| SimulatorError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| SimulatorError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
