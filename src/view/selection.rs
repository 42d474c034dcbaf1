use tracing::debug;

use super::state::{ViewMode, ViewState};
use crate::network::GeneNetwork;

/// What a selection request did to the state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionChange {
    /// Unknown id; nothing changed.
    Ignored,
    Selected(usize),
    Cleared,
}

pub fn select(network: &GeneNetwork, state: &mut ViewState, id: Option<&str>) -> SelectionChange {
    let Some(id) = id else {
        reset(state);
        return SelectionChange::Cleared;
    };
    let Some(index) = network.index_of(id) else {
        debug!(gene = id, "select ignored: gene not in network");
        return SelectionChange::Ignored;
    };

    select_index(network, state, index);
    SelectionChange::Selected(index)
}

pub(crate) fn select_index(network: &GeneNetwork, state: &mut ViewState, index: usize) {
    state.clear_selection();
    state.selected = Some(index);

    if state.mode != ViewMode::Full {
        return;
    }

    state.neighbors = network.neighbors(index);
    state.dimmed_nodes = (0..network.node_count())
        .filter(|&other| other != index && !state.neighbors.contains(&other))
        .collect();
    for (edge_index, edge) in network.edges().iter().enumerate() {
        if edge.touches(index) {
            state.highlighted_edges.insert(edge_index);
        } else {
            state.dimmed_edges.insert(edge_index);
        }
    }
}

pub fn reset(state: &mut ViewState) {
    state.clear_selection();
}

/// Sets the externally driven highlight. Returns the node to pulse, if any.
pub fn highlight(network: &GeneNetwork, state: &mut ViewState, id: Option<&str>) -> Option<usize> {
    let Some(id) = id else {
        state.highlighted = None;
        return None;
    };
    let Some(index) = network.index_of(id) else {
        debug!(gene = id, "highlight ignored: gene not in network");
        return None;
    };

    state.highlighted = Some(index);
    Some(index)
}

/// Records the hovered node. Returns `true` when it changed.
pub fn hover(network: &GeneNetwork, state: &mut ViewState, index: Option<usize>) -> bool {
    let index = index.filter(|&index| index < network.node_count());
    if state.hovered == index {
        return false;
    }
    state.hovered = index;
    true
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;
    use crate::network::{NetworkPayload, RawLink, RawNode};
    use crate::view::Tissue;

    fn network(ids: &[&str], links: &[(&str, &str, f32)]) -> GeneNetwork {
        let payload = NetworkPayload {
            nodes: ids.iter().map(|id| RawNode::bare(*id)).collect(),
            links: links
                .iter()
                .map(|(source, target, weight)| RawLink {
                    source: (*source).to_owned(),
                    target: (*target).to_owned(),
                    weight: Some(*weight),
                    status: None,
                })
                .collect(),
        };
        GeneNetwork::from_payload(&payload).expect("valid network")
    }

    fn abc() -> GeneNetwork {
        network(&["A", "B", "C"], &[("A", "B", 0.9), ("B", "C", 0.2)])
    }

    #[test]
    fn selecting_the_middle_node_keeps_everything_lit() {
        let network = abc();
        let mut state = ViewState::new(ViewMode::Full, Tissue::Normal);

        assert_eq!(select(&network, &mut state, Some("B")), SelectionChange::Selected(1));
        assert_eq!(state.neighbors, HashSet::from([0, 2]));
        assert!(state.dimmed_nodes.is_empty());
        assert!(state.dimmed_edges.is_empty());
        assert_eq!(state.highlighted_edges, HashSet::from([0, 1]));
    }

    #[test]
    fn selecting_a_leaf_dims_the_rest() {
        let network = abc();
        let mut state = ViewState::new(ViewMode::Full, Tissue::Tumor);

        select(&network, &mut state, Some("A"));
        assert_eq!(state.neighbors, HashSet::from([1]));
        assert_eq!(state.dimmed_nodes, HashSet::from([2]));
        assert_eq!(state.dimmed_edges, HashSet::from([1]));
        assert!(!state.neighbors.contains(&0));
        assert!(!state.dimmed_nodes.contains(&0));
    }

    #[test]
    fn unknown_gene_is_a_no_op() {
        let network = abc();
        let mut state = ViewState::new(ViewMode::Full, Tissue::Normal);
        select(&network, &mut state, Some("A"));
        let before = state.clone();

        assert_eq!(select(&network, &mut state, Some("Z")), SelectionChange::Ignored);
        assert_eq!(state, before);
        assert_eq!(highlight(&network, &mut state, Some("Z")), None);
        assert_eq!(state, before);
    }

    #[test]
    fn clearing_empties_derived_sets() {
        let network = abc();
        let mut state = ViewState::new(ViewMode::Full, Tissue::Normal);
        select(&network, &mut state, Some("C"));

        assert_eq!(select(&network, &mut state, None), SelectionChange::Cleared);
        assert_eq!(state.selected, None);
        assert!(state.neighbors.is_empty());
        assert!(state.dimmed_nodes.is_empty());
        assert!(state.dimmed_edges.is_empty());
        assert!(state.highlighted_edges.is_empty());
    }

    #[test]
    fn ego_and_path_modes_never_dim() {
        let network = abc();
        for mode in [ViewMode::Ego, ViewMode::Path] {
            let mut state = ViewState::new(mode, Tissue::Normal);
            select(&network, &mut state, Some("A"));
            assert_eq!(state.selected, Some(0));
            assert!(state.neighbors.is_empty());
            assert!(state.dimmed_nodes.is_empty());
            assert!(state.dimmed_edges.is_empty());
        }
    }

    #[test]
    fn highlight_is_independent_of_selection() {
        let network = abc();
        let mut state = ViewState::new(ViewMode::Full, Tissue::Normal);
        select(&network, &mut state, Some("A"));
        let dimmed = state.dimmed_nodes.clone();

        assert_eq!(highlight(&network, &mut state, Some("C")), Some(2));
        assert_eq!(state.highlighted, Some(2));
        assert_eq!(state.selected, Some(0));
        assert_eq!(state.dimmed_nodes, dimmed);

        assert_eq!(highlight(&network, &mut state, None), None);
        assert_eq!(state.highlighted, None);
    }

    #[test]
    fn hover_reports_changes_only() {
        let network = abc();
        let mut state = ViewState::default();
        assert!(hover(&network, &mut state, Some(1)));
        assert!(!hover(&network, &mut state, Some(1)));
        // Out-of-range indices count as leaving.
        assert!(hover(&network, &mut state, Some(9)));
        assert_eq!(state.hovered, None);
    }

    fn arbitrary_network() -> impl Strategy<Value = GeneNetwork> {
        (2usize..12)
            .prop_flat_map(|n| (Just(n), proptest::collection::vec((0..n, 0..n), 0..30)))
            .prop_map(|(n, pairs)| {
                let payload = NetworkPayload {
                    nodes: (0..n).map(|i| RawNode::bare(format!("G{i}"))).collect(),
                    links: pairs
                        .into_iter()
                        .map(|(a, b)| RawLink {
                            source: format!("G{a}"),
                            target: format!("G{b}"),
                            weight: None,
                            status: None,
                        })
                        .collect(),
                };
                GeneNetwork::from_payload(&payload).expect("generated ids exist")
            })
    }

    proptest! {
        #[test]
        fn neighbors_are_exactly_the_adjacent_nodes(network in arbitrary_network(), pick in any::<prop::sample::Index>()) {
            let index = pick.index(network.node_count());
            let id = network.nodes()[index].id.clone();
            let mut state = ViewState::new(ViewMode::Full, Tissue::Normal);
            select(&network, &mut state, Some(id.as_str()));

            let expected = network
                .edges()
                .iter()
                .filter_map(|edge| edge.other(index))
                .filter(|&other| other != index)
                .collect::<HashSet<_>>();
            prop_assert_eq!(&state.neighbors, &expected);
            prop_assert!(!state.neighbors.contains(&index));
            prop_assert!(!state.dimmed_nodes.contains(&index));
            prop_assert_eq!(state.dimmed_nodes.len() + state.neighbors.len() + 1, network.node_count());
        }
    }
}
