use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    #[default]
    Normal,
    Hub,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeGroup {
    Top,
    Candidate,
    #[default]
    Normal,
}

/// How an interaction changed between the normal and the tumor network.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewiringStatus {
    /// Present in normal tissue only.
    Lost,
    /// Present in tumor tissue only.
    Gained,
    /// Present in both.
    Maintained,
    #[default]
    #[serde(rename = "none")]
    Unchanged,
}

impl RewiringStatus {
    pub fn is_tagged(self) -> bool {
        self != Self::Unchanged
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Lost => "lost",
            Self::Gained => "gained",
            Self::Maintained => "maintained",
            Self::Unchanged => "none",
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RawNode {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<NodeKind>,
    #[serde(default)]
    pub group: Option<NodeGroup>,
    #[serde(default)]
    pub status: Option<RewiringStatus>,
    #[serde(default)]
    pub rank: Option<u32>,
}

impl RawNode {
    pub fn bare(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            kind: None,
            group: None,
            status: None,
            rank: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RawLink {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub weight: Option<f32>,
    #[serde(default)]
    pub status: Option<RewiringStatus>,
}

/// Node/link payload used by the full and ego views.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct NetworkPayload {
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    #[serde(default, alias = "edges")]
    pub links: Vec<RawLink>,
}

/// A path entry is either a bare gene id or a full node record.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PathStop {
    Id(String),
    Node(RawNode),
}

impl PathStop {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Node(node) => &node.id,
        }
    }

    pub fn into_node(self) -> RawNode {
        match self {
            Self::Id(id) => RawNode::bare(id),
            Self::Node(node) => node,
        }
    }
}

/// One traced path inside a single tissue network.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct PathTrace {
    #[serde(default)]
    pub found: Option<bool>,
    #[serde(default)]
    pub nodes: Vec<PathStop>,
    #[serde(default, alias = "edges")]
    pub links: Option<Vec<RawLink>>,
    #[serde(default)]
    pub total_cost: f64,
}

impl PathTrace {
    pub fn is_found(&self) -> bool {
        self.found.unwrap_or(true) && !self.nodes.is_empty()
    }

    pub fn hop_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct PathStats {
    #[serde(default)]
    pub cost_diff: f64,
    #[serde(default)]
    pub status: String,
}

/// Path payload carrying one trace per tissue context.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct PathPayload {
    #[serde(default)]
    pub normal: Option<PathTrace>,
    #[serde(default)]
    pub tumor: Option<PathTrace>,
    #[serde(default)]
    pub stats: Option<PathStats>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_payload_accepts_edges_alias_and_defaults() {
        let raw = r#"{
            "nodes": [{"id": "TP53", "type": "hub", "rank": 2}, {"id": "MDM2"}],
            "edges": [{"source": "TP53", "target": "MDM2"}]
        }"#;
        let payload: NetworkPayload = serde_json::from_str(raw).expect("valid payload");

        assert_eq!(payload.nodes[0].kind, Some(NodeKind::Hub));
        assert_eq!(payload.nodes[0].rank, Some(2));
        assert_eq!(payload.nodes[1].kind, None);
        assert_eq!(payload.links.len(), 1);
        assert_eq!(payload.links[0].weight, None);
    }

    #[test]
    fn status_none_maps_to_unchanged() {
        let link: RawLink = serde_json::from_str(
            r#"{"source": "A", "target": "B", "status": "none"}"#,
        )
        .expect("valid link");
        assert_eq!(link.status, Some(RewiringStatus::Unchanged));
        assert!(!RewiringStatus::Unchanged.is_tagged());
    }

    #[test]
    fn path_trace_accepts_ids_and_node_records() {
        let raw = r#"{
            "normal": {"found": true, "nodes": ["EGFR", {"id": "KRAS", "rank": 5}], "total_cost": 1.25},
            "tumor": {"found": false, "nodes": [], "total_cost": 0},
            "stats": {"cost_diff": -0.4, "status": "Shortcut in tumor"}
        }"#;
        let payload: PathPayload = serde_json::from_str(raw).expect("valid path payload");

        let normal = payload.normal.expect("normal trace");
        assert!(normal.is_found());
        assert_eq!(normal.hop_count(), 1);
        assert_eq!(normal.nodes[1].id(), "KRAS");
        assert!(!payload.tumor.expect("tumor trace").is_found());
        assert_eq!(payload.stats.expect("stats").status, "Shortcut in tumor");
    }

    #[test]
    fn missing_found_flag_with_nodes_counts_as_found() {
        let trace: PathTrace =
            serde_json::from_str(r#"{"nodes": ["A", "B"], "total_cost": 0.5}"#).expect("trace");
        assert!(trace.is_found());

        let empty: PathTrace = serde_json::from_str(r#"{"total_cost": 0.0}"#).expect("trace");
        assert!(!empty.is_found());
    }
}
