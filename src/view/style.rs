//! Render attributes derived from static node data and the current
//! [`ViewState`]. Everything here is pure; transient animation is layered on
//! top by the caller.

use eframe::egui::Color32;

use super::state::{Tissue, ViewMode, ViewState};
use crate::network::{GeneNetwork, MIN_NODE_SIZE, RewiringStatus};

pub const NORMAL_TISSUE: Color32 = Color32::from_rgb(0x00, 0xF0, 0xFF);
pub const TUMOR_TISSUE: Color32 = Color32::from_rgb(0xFF, 0x2D, 0x8D);
pub const LOST: Color32 = Color32::from_rgb(0x00, 0xF0, 0xFF);
pub const GAINED: Color32 = Color32::from_rgb(0xFF, 0x2D, 0x8D);
pub const MAINTAINED: Color32 = Color32::from_rgb(0x9B, 0x59, 0xD6);
pub const ACCENT: Color32 = Color32::from_rgb(0xFF, 0xD1, 0x66);

pub const HUB_RADIUS: f32 = 28.0;
pub const DIMMED_NODE_OPACITY: f32 = 0.2;
pub const DIMMED_EDGE_OPACITY: f32 = 0.1;
pub const EDGE_OPACITY: f32 = 0.6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeStyle {
    pub fill: Color32,
    pub radius: f32,
    pub opacity: f32,
    pub border_color: Color32,
    pub border_width: f32,
    pub bold_label: bool,
}

impl NodeStyle {
    pub fn fill_with_opacity(&self) -> Color32 {
        self.fill.gamma_multiply(self.opacity)
    }

    pub fn border_with_opacity(&self) -> Color32 {
        self.border_color.gamma_multiply(self.opacity)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStyle {
    pub color: Color32,
    pub width: f32,
    pub opacity: f32,
    pub highlighted: bool,
    pub directed: bool,
}

impl EdgeStyle {
    pub fn color_with_opacity(&self) -> Color32 {
        self.color.gamma_multiply(self.opacity)
    }
}

pub fn tissue_color(tissue: Tissue) -> Color32 {
    match tissue {
        Tissue::Normal => NORMAL_TISSUE,
        Tissue::Tumor => TUMOR_TISSUE,
    }
}

pub fn status_color(status: RewiringStatus) -> Option<Color32> {
    match status {
        RewiringStatus::Lost => Some(LOST),
        RewiringStatus::Gained => Some(GAINED),
        RewiringStatus::Maintained => Some(MAINTAINED),
        RewiringStatus::Unchanged => None,
    }
}

/// Status colors only apply in the neighborhood view.
pub fn base_color(status: RewiringStatus, state: &ViewState) -> Color32 {
    if state.mode == ViewMode::Ego
        && let Some(color) = status_color(status)
    {
        return color;
    }
    tissue_color(state.tissue)
}

pub fn edge_width(weight: f32, highlighted: bool) -> f32 {
    if highlighted {
        (weight * 4.0).max(2.0)
    } else {
        (weight * 3.0).max(1.0)
    }
}

pub fn resolve_node(network: &GeneNetwork, index: usize, state: &ViewState) -> NodeStyle {
    let Some(node) = network.node(index) else {
        let fill = tissue_color(state.tissue);
        return NodeStyle {
            fill,
            radius: MIN_NODE_SIZE,
            opacity: 1.0,
            border_color: fill,
            border_width: 1.0,
            bold_label: false,
        };
    };

    let base = base_color(node.status, state);
    let mut style = NodeStyle {
        fill: base,
        radius: node.size.max(MIN_NODE_SIZE),
        opacity: 1.0,
        border_color: base,
        border_width: 1.0,
        bold_label: false,
    };

    if node.is_hub() {
        style.radius = HUB_RADIUS;
        style.border_color = ACCENT;
        style.border_width = 3.0;
        style.bold_label = true;
    }

    if state.is_selected(index) {
        style.fill = ACCENT;
        style.border_color = ACCENT;
        style.border_width = 3.0;
    } else if state.mode == ViewMode::Full && state.neighbors.contains(&index) {
        style.border_color = base;
        style.border_width = 2.0;
    }

    if state.is_dimmed(index) {
        style.opacity = DIMMED_NODE_OPACITY;
    }

    style
}

pub fn resolve_edge(network: &GeneNetwork, index: usize, state: &ViewState) -> EdgeStyle {
    let Some(edge) = network.edge(index) else {
        return EdgeStyle {
            color: tissue_color(state.tissue),
            width: 1.0,
            opacity: EDGE_OPACITY,
            highlighted: false,
            directed: network.is_directed(),
        };
    };

    let highlighted = state.highlighted_edges.contains(&index);
    let (color, opacity) = if highlighted {
        (ACCENT, 1.0)
    } else if state.dimmed_edges.contains(&index) {
        (base_color(edge.status, state), DIMMED_EDGE_OPACITY)
    } else {
        (base_color(edge.status, state), EDGE_OPACITY)
    };

    EdgeStyle {
        color,
        width: edge_width(edge.weight, highlighted),
        opacity,
        highlighted,
        directed: network.is_directed(),
    }
}

/// Legend rows for the current mode.
pub fn legend(state: &ViewState) -> Vec<(&'static str, Color32)> {
    match state.mode {
        ViewMode::Ego => vec![
            ("Lost", LOST),
            ("Gained", GAINED),
            ("Maintained", MAINTAINED),
            ("Hub gene", ACCENT),
        ],
        ViewMode::Full | ViewMode::Path => vec![
            (state.tissue.label(), tissue_color(state.tissue)),
            ("Hub gene", ACCENT),
            ("Selected", ACCENT),
        ],
    }
}
