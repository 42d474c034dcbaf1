use std::collections::VecDeque;

use eframe::egui::{Vec2, vec2};
use serde::{Deserialize, Serialize};

use crate::network::GeneNetwork;

/// Horizontal breadth-first layering used for traced paths.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayeredLayoutConfig {
    /// Distance between consecutive depth layers along x.
    pub layer_gap: f32,
    /// Distance between nodes sharing a layer along y.
    pub node_gap: f32,
}

impl Default for LayeredLayoutConfig {
    fn default() -> Self {
        Self {
            layer_gap: 160.0,
            node_gap: 90.0,
        }
    }
}

/// Depth of every node from node 0 following edge direction.
/// Unreachable nodes get `None`.
pub(super) fn depths(network: &GeneNetwork) -> Vec<Option<usize>> {
    let mut depth = vec![None; network.node_count()];
    if network.is_empty() {
        return depth;
    }

    let mut queue = VecDeque::from([0_usize]);
    depth[0] = Some(0);
    while let Some(current) = queue.pop_front() {
        let next_depth = depth[current].map_or(0, |d| d + 1);
        for &edge_index in network.incident_edges(current) {
            let Some(edge) = network.edge(edge_index) else {
                continue;
            };
            let next = if network.is_directed() {
                if edge.source != current {
                    continue;
                }
                edge.target
            } else {
                match edge.other(current) {
                    Some(next) => next,
                    None => continue,
                }
            };

            if depth[next].is_none() {
                depth[next] = Some(next_depth);
                queue.push_back(next);
            }
        }
    }

    depth
}

pub(super) fn layered_positions(network: &GeneNetwork, config: &LayeredLayoutConfig) -> Vec<Vec2> {
    let depth = depths(network);
    let trailing = depth.iter().flatten().max().map_or(0, |max| max + 1);

    let mut layers: Vec<Vec<usize>> = vec![Vec::new(); trailing + 1];
    for (index, d) in depth.iter().enumerate() {
        layers[d.unwrap_or(trailing)].push(index);
    }
    while layers.last().is_some_and(Vec::is_empty) {
        layers.pop();
    }

    let width = layers.len().saturating_sub(1) as f32 * config.layer_gap;
    let mut positions = vec![Vec2::ZERO; network.node_count()];
    for (layer_index, layer) in layers.iter().enumerate() {
        let x = layer_index as f32 * config.layer_gap - width / 2.0;
        let height = layer.len().saturating_sub(1) as f32 * config.node_gap;
        for (slot, &node) in layer.iter().enumerate() {
            positions[node] = vec2(x, slot as f32 * config.node_gap - height / 2.0);
        }
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{PathStop, PathTrace, RawLink, RawNode};

    fn trace(ids: &[&str], links: Option<&[(&str, &str)]>) -> GeneNetwork {
        let trace = PathTrace {
            found: Some(true),
            nodes: ids.iter().map(|id| PathStop::Node(RawNode::bare(*id))).collect(),
            links: links.map(|links| {
                links
                    .iter()
                    .map(|(source, target)| RawLink {
                        source: (*source).to_owned(),
                        target: (*target).to_owned(),
                        weight: None,
                        status: None,
                    })
                    .collect()
            }),
            total_cost: 1.0,
        };
        GeneNetwork::from_path_trace(&trace)
            .expect("valid trace")
            .expect("path found")
    }

    #[test]
    fn chain_is_laid_out_left_to_right() {
        let network = trace(&["EGFR", "KRAS", "BRAF", "MAPK1"], None);
        let positions = layered_positions(&network, &LayeredLayoutConfig::default());

        assert!(positions.windows(2).all(|pair| pair[0].x < pair[1].x));
        assert!(positions.iter().all(|p| p.y == 0.0));
        assert!((positions[0].x + positions[3].x).abs() < 1e-3);
    }

    #[test]
    fn depth_follows_edge_direction() {
        let network = trace(&["A", "B", "C"], Some(&[("A", "B"), ("C", "B")]));
        assert_eq!(depths(&network), vec![Some(0), Some(1), None]);
    }

    #[test]
    fn unreachable_nodes_form_a_trailing_layer() {
        let network = trace(&["A", "B", "C", "D"], Some(&[("A", "B"), ("C", "D")]));
        let config = LayeredLayoutConfig::default();
        let positions = layered_positions(&network, &config);

        let c = network.index_of("C").expect("C");
        let d = network.index_of("D").expect("D");
        assert_eq!(positions[c].x, positions[d].x);
        assert!(positions[c].x > positions[1].x);
        assert!((positions[c].y - positions[d].y).abs() - config.node_gap < 1e-3);
    }
}
