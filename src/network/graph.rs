use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use super::error::ValidationError;
use super::parse::{NetworkPayload, NodeGroup, NodeKind, PathTrace, RawLink, RawNode, RewiringStatus};

pub const MIN_NODE_SIZE: f32 = 10.0;
pub const DEFAULT_NODE_SIZE: f32 = 16.0;
pub const HUB_NODE_SIZE: f32 = 24.0;
pub const DEFAULT_EDGE_WEIGHT: f32 = 0.5;

static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

/// Radius derived from rank (lower rank renders larger), then hub type, then the default.
pub fn node_size(rank: Option<u32>, kind: NodeKind) -> f32 {
    match rank.filter(|rank| *rank > 0) {
        Some(rank) => (20.0 - rank as f32 / 5.0).max(MIN_NODE_SIZE),
        None if kind == NodeKind::Hub => HUB_NODE_SIZE,
        None => DEFAULT_NODE_SIZE,
    }
}

pub fn normalize_weight(weight: Option<f32>) -> f32 {
    match weight {
        Some(weight) if weight.is_finite() && weight > 0.0 => weight.min(1.0),
        _ => DEFAULT_EDGE_WEIGHT,
    }
}

#[derive(Clone, Debug)]
pub struct GeneNode {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub group: NodeGroup,
    pub status: RewiringStatus,
    pub rank: Option<u32>,
    pub size: f32,
}

impl GeneNode {
    fn from_raw(raw: RawNode) -> Self {
        let kind = raw.kind.unwrap_or_default();
        let rank = raw.rank.filter(|rank| *rank > 0);
        Self {
            label: raw
                .label
                .filter(|label| !label.trim().is_empty())
                .unwrap_or_else(|| raw.id.clone()),
            size: node_size(rank, kind),
            id: raw.id,
            kind,
            group: raw.group.unwrap_or_default(),
            status: raw.status.unwrap_or_default(),
            rank,
        }
    }

    fn to_raw(&self) -> RawNode {
        RawNode {
            id: self.id.clone(),
            label: Some(self.label.clone()),
            kind: Some(self.kind),
            group: Some(self.group),
            status: Some(self.status),
            rank: self.rank,
        }
    }

    pub fn is_hub(&self) -> bool {
        self.kind == NodeKind::Hub
    }
}

#[derive(Clone, Debug)]
pub struct GeneEdge {
    pub id: String,
    pub source: usize,
    pub target: usize,
    pub weight: f32,
    pub status: RewiringStatus,
}

impl GeneEdge {
    pub fn touches(&self, index: usize) -> bool {
        self.source == index || self.target == index
    }

    pub fn other(&self, index: usize) -> Option<usize> {
        if self.source == index {
            Some(self.target)
        } else if self.target == index {
            Some(self.source)
        } else {
            None
        }
    }
}

/// Edge counts per rewiring status, read from the edges themselves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewiringSummary {
    pub total: usize,
    pub gained: usize,
    pub lost: usize,
    pub maintained: usize,
}

/// Validated, immutable gene network. Rebuilt rather than mutated.
#[derive(Clone, Debug)]
pub struct GeneNetwork {
    revision: u64,
    directed: bool,
    nodes: Vec<GeneNode>,
    edges: Vec<GeneEdge>,
    index_by_id: HashMap<String, usize>,
    incident: Vec<Vec<usize>>,
}

impl GeneNetwork {
    pub fn from_payload(payload: &NetworkPayload) -> Result<Self, ValidationError> {
        Self::build(payload.nodes.clone(), &payload.links, false)
    }

    /// Builds the directed path network, or `None` when the trace reports no path.
    pub fn from_path_trace(trace: &PathTrace) -> Result<Option<Self>, ValidationError> {
        if !trace.is_found() {
            return Ok(None);
        }

        let nodes = trace
            .nodes
            .iter()
            .cloned()
            .map(|stop| stop.into_node())
            .collect::<Vec<_>>();

        let links = match &trace.links {
            Some(links) if !links.is_empty() => links.clone(),
            _ => trace
                .nodes
                .windows(2)
                .map(|pair| RawLink {
                    source: pair[0].id().to_owned(),
                    target: pair[1].id().to_owned(),
                    weight: None,
                    status: None,
                })
                .collect(),
        };

        Self::build(nodes, &links, true).map(Some)
    }

    fn build(raw_nodes: Vec<RawNode>, links: &[RawLink], directed: bool) -> Result<Self, ValidationError> {
        let mut nodes = Vec::with_capacity(raw_nodes.len());
        let mut index_by_id = HashMap::with_capacity(raw_nodes.len());

        for (index, raw) in raw_nodes.into_iter().enumerate() {
            if raw.id.trim().is_empty() {
                return Err(ValidationError::EmptyNodeId { index });
            }
            if index_by_id.contains_key(&raw.id) {
                return Err(ValidationError::DuplicateNode { id: raw.id });
            }
            index_by_id.insert(raw.id.clone(), index);
            nodes.push(GeneNode::from_raw(raw));
        }

        let mut edges = Vec::with_capacity(links.len());
        let mut incident = vec![Vec::new(); nodes.len()];
        for (edge_index, link) in links.iter().enumerate() {
            let lookup = |endpoint: &str| {
                index_by_id
                    .get(endpoint)
                    .copied()
                    .ok_or_else(|| ValidationError::UnknownEndpoint {
                        edge: edge_index,
                        endpoint: endpoint.to_owned(),
                    })
            };
            let source = lookup(&link.source)?;
            let target = lookup(&link.target)?;

            incident[source].push(edge_index);
            if target != source {
                incident[target].push(edge_index);
            }

            edges.push(GeneEdge {
                id: format!("e{edge_index}"),
                source,
                target,
                weight: normalize_weight(link.weight),
                status: link.status.unwrap_or_default(),
            });
        }

        Ok(Self {
            revision: NEXT_REVISION.fetch_add(1, Ordering::Relaxed),
            directed,
            nodes,
            edges,
            index_by_id,
            incident,
        })
    }

    /// Process-unique identity; two builds never share a revision.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> &[GeneNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GeneEdge] {
        &self.edges
    }

    pub fn node(&self, index: usize) -> Option<&GeneNode> {
        self.nodes.get(index)
    }

    pub fn edge(&self, index: usize) -> Option<&GeneEdge> {
        self.edges.get(index)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn node_by_id(&self, id: &str) -> Option<&GeneNode> {
        self.index_of(id).and_then(|index| self.nodes.get(index))
    }

    pub fn incident_edges(&self, index: usize) -> &[usize] {
        self.incident.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn degree(&self, index: usize) -> usize {
        self.incident_edges(index).len()
    }

    /// Nodes sharing at least one edge with `index`, never `index` itself.
    pub fn neighbors(&self, index: usize) -> HashSet<usize> {
        self.incident_edges(index)
            .iter()
            .filter_map(|&edge| self.edges[edge].other(index))
            .filter(|&other| other != index)
            .collect()
    }

    /// Ranked nodes, most significant first.
    pub fn ranked_nodes(&self) -> Vec<usize> {
        let mut ranked = self
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| node.rank.map(|rank| (rank, index)))
            .collect::<Vec<_>>();
        ranked.sort_unstable();
        ranked.into_iter().map(|(_, index)| index).collect()
    }

    pub fn rewiring_summary(&self) -> RewiringSummary {
        let mut summary = RewiringSummary {
            total: self.edges.len(),
            ..RewiringSummary::default()
        };
        for edge in &self.edges {
            match edge.status {
                RewiringStatus::Gained => summary.gained += 1,
                RewiringStatus::Lost => summary.lost += 1,
                RewiringStatus::Maintained => summary.maintained += 1,
                RewiringStatus::Unchanged => {}
            }
        }
        summary
    }

    /// Focal gene, its direct neighbors and every edge among them.
    pub fn ego_network(&self, center_id: &str) -> Option<Self> {
        let center = self.index_of(center_id)?;
        let mut members = self.neighbors(center);
        members.insert(center);

        let mut ordered = members.iter().copied().collect::<Vec<_>>();
        ordered.sort_unstable_by_key(|&index| (index != center, index));

        let payload = NetworkPayload {
            nodes: ordered.iter().map(|&index| self.nodes[index].to_raw()).collect(),
            links: self
                .edges
                .iter()
                .filter(|edge| members.contains(&edge.source) && members.contains(&edge.target))
                .map(|edge| RawLink {
                    source: self.nodes[edge.source].id.clone(),
                    target: self.nodes[edge.target].id.clone(),
                    weight: Some(edge.weight),
                    status: Some(edge.status),
                })
                .collect(),
        };

        Self::from_payload(&payload).ok()
    }
}
