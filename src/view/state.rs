use std::collections::HashSet;
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Whole interaction network.
    #[default]
    Full,
    /// One gene and its direct neighbors.
    Ego,
    /// A traced path between two genes.
    Path,
}

impl ViewMode {
    pub const ALL: [Self; 3] = [Self::Full, Self::Ego, Self::Path];

    pub fn label(self) -> &'static str {
        match self {
            Self::Full => "Full network",
            Self::Ego => "Neighborhood",
            Self::Path => "Path",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Tissue {
    #[default]
    Normal,
    Tumor,
}

impl Tissue {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Tumor => "Tumor",
        }
    }
}

/// Interaction state of one mounted view. Node and edge references are
/// indices into the network the view was created for.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
    pub mode: ViewMode,
    pub tissue: Tissue,
    pub selected: Option<usize>,
    pub highlighted: Option<usize>,
    pub hovered: Option<usize>,
    pub neighbors: HashSet<usize>,
    pub dimmed_nodes: HashSet<usize>,
    pub dimmed_edges: HashSet<usize>,
    pub highlighted_edges: HashSet<usize>,
}

impl ViewState {
    pub fn new(mode: ViewMode, tissue: Tissue) -> Self {
        Self {
            mode,
            tissue,
            ..Self::default()
        }
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected == Some(index)
    }

    pub fn is_dimmed(&self, index: usize) -> bool {
        self.dimmed_nodes.contains(&index)
    }

    /// Drops the selection and everything derived from it.
    pub(crate) fn clear_selection(&mut self) {
        self.selected = None;
        self.neighbors.clear();
        self.dimmed_nodes.clear();
        self.dimmed_edges.clear();
        self.highlighted_edges.clear();
    }
}
