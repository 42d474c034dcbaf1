use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::info;

use super::graph::GeneNetwork;
use super::parse::{NetworkPayload, PathPayload, PathStats, PathTrace};

const DEMO_NETWORK: &str = include_str!("../../data/demo_network.json");

/// Files the explorer reads; `network` falls back to the bundled demo.
#[derive(Clone, Debug, Default)]
pub struct DataSources {
    pub network: Option<PathBuf>,
    pub neighbors: Option<PathBuf>,
    pub paths: Option<PathBuf>,
}

/// One tissue's traced path, already validated.
#[derive(Clone, Debug, Default)]
pub struct TracedPath {
    pub network: Option<GeneNetwork>,
    pub hops: usize,
    pub total_cost: f64,
}

impl TracedPath {
    fn from_trace(trace: Option<&PathTrace>) -> Result<Self> {
        let Some(trace) = trace else {
            return Ok(Self::default());
        };

        let network = GeneNetwork::from_path_trace(trace).context("invalid path trace")?;
        Ok(Self {
            hops: if network.is_some() { trace.hop_count() } else { 0 },
            network,
            total_cost: trace.total_cost,
        })
    }

    pub fn is_found(&self) -> bool {
        self.network.is_some()
    }
}

#[derive(Clone, Debug, Default)]
pub struct PathBundle {
    pub normal: TracedPath,
    pub tumor: TracedPath,
    pub stats: Option<PathStats>,
}

impl PathBundle {
    pub fn from_payload(payload: &PathPayload) -> Result<Self> {
        Ok(Self {
            normal: TracedPath::from_trace(payload.normal.as_ref()).context("normal tissue")?,
            tumor: TracedPath::from_trace(payload.tumor.as_ref()).context("tumor tissue")?,
            stats: payload.stats.clone(),
        })
    }
}

/// Everything the explorer can display, validated up front.
#[derive(Clone, Debug)]
pub struct NetworkBundle {
    pub full: GeneNetwork,
    pub neighbors: Option<GeneNetwork>,
    pub paths: Option<PathBundle>,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid JSON in {}", path.display()))
}

pub fn demo_payload() -> Result<NetworkPayload> {
    serde_json::from_str(DEMO_NETWORK).context("bundled demo network is not valid JSON")
}

pub fn load_bundle(sources: &DataSources) -> Result<NetworkBundle> {
    let payload = match &sources.network {
        Some(path) => read_json::<NetworkPayload>(path)?,
        None => demo_payload()?,
    };
    let full = GeneNetwork::from_payload(&payload).context("failed to build the network")?;
    info!(
        nodes = full.node_count(),
        edges = full.edge_count(),
        source = ?sources.network,
        "loaded network"
    );

    let neighbors = match &sources.neighbors {
        Some(path) => {
            let payload = read_json::<NetworkPayload>(path)?;
            let network = GeneNetwork::from_payload(&payload)
                .with_context(|| format!("failed to build the neighbor network from {}", path.display()))?;
            info!(nodes = network.node_count(), edges = network.edge_count(), "loaded neighbor network");
            Some(network)
        }
        None => None,
    };

    let paths = match &sources.paths {
        Some(path) => {
            let payload = read_json::<PathPayload>(path)?;
            let bundle = PathBundle::from_payload(&payload)
                .with_context(|| format!("failed to build path traces from {}", path.display()))?;
            info!(
                normal_found = bundle.normal.is_found(),
                tumor_found = bundle.tumor.is_found(),
                "loaded path traces"
            );
            Some(bundle)
        }
        None => None,
    };

    Ok(NetworkBundle {
        full,
        neighbors,
        paths,
    })
}
