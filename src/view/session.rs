use eframe::egui::{Pos2, Rect, Vec2, vec2};
use tracing::debug;

use super::selection::{self, SelectionChange};
use super::state::{Tissue, ViewMode, ViewState};
use super::style::{self, EdgeStyle, NodeStyle};
use crate::animation::{AnimationOrchestrator, Camera, FlashToken, fit_camera};
use crate::layout::{LayoutEngine, LayoutStatus};
use crate::network::GeneNetwork;
use crate::settings::EngineSettings;

/// Notifications for whoever embeds the graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphEvent {
    NodeClicked(Option<String>),
}

/// External inputs a view is mounted with. They survive graph rebuilds and
/// are re-applied to every fresh [`ViewState`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewConfig {
    pub mode: ViewMode,
    pub tissue: Tissue,
    pub selected: Option<String>,
    pub highlighted: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FitTarget {
    Selection,
    Whole,
}

/// One mounted graph view: network, interaction state, layout and transient
/// animation, advanced once per frame by the drawing surface.
pub struct GraphSession {
    network: GeneNetwork,
    config: ViewConfig,
    state: ViewState,
    settings: EngineSettings,
    layout: LayoutEngine,
    animations: AnimationOrchestrator,
    viewport: Vec2,
    now: f64,
    pending_fit: Option<FitTarget>,
    pending_flash: Option<usize>,
    flash: Option<FlashToken>,
    events: Vec<GraphEvent>,
}

impl GraphSession {
    pub fn new(network: GeneNetwork, config: ViewConfig, settings: EngineSettings, seed: Option<u64>) -> Self {
        let mut session = Self {
            state: ViewState::new(config.mode, config.tissue),
            layout: LayoutEngine::new(settings.layout, seed),
            animations: AnimationOrchestrator::new(settings.animation),
            network,
            config,
            settings,
            viewport: vec2(1280.0, 800.0),
            now: 0.0,
            pending_fit: None,
            pending_flash: None,
            flash: None,
            events: Vec::new(),
        };
        session.layout.start(&session.network, session.config.mode);
        session.rebuild_state();
        session
    }

    pub fn network(&self) -> &GeneNetwork {
        &self.network
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn camera(&self) -> Camera {
        self.animations.camera()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.state
            .selected
            .and_then(|index| self.network.node(index))
            .map(|node| node.id.as_str())
    }

    /// Swaps in a rebuilt network. Layout restarts, transient effects stop and
    /// the external selection/highlight are applied to the fresh state.
    pub fn replace_network(&mut self, network: GeneNetwork, mode: ViewMode, tissue: Tissue) {
        let same_layout = network.revision() == self.network.revision() && mode == self.config.mode;
        self.network = network;
        self.config.mode = mode;
        self.config.tissue = tissue;
        self.animations.cancel_all();
        self.flash = None;

        if !same_layout {
            self.layout.start(&self.network, mode);
        }
        self.rebuild_state();
    }

    /// Tissue only changes colors; positions are kept.
    pub fn set_tissue(&mut self, tissue: Tissue) {
        if self.config.tissue == tissue {
            return;
        }
        self.config.tissue = tissue;
        let hovered = self.state.hovered;
        self.rebuild_state();
        self.state.hovered = hovered;
    }

    fn rebuild_state(&mut self) {
        self.state = ViewState::new(self.config.mode, self.config.tissue);
        self.pending_fit = Some(FitTarget::Whole);

        if let Some(id) = self.config.selected.clone()
            && let SelectionChange::Selected(_) =
                selection::select(&self.network, &mut self.state, Some(&id))
        {
            self.pending_fit = Some(FitTarget::Selection);
        }
        if let Some(id) = self.config.highlighted.clone() {
            self.pending_flash = selection::highlight(&self.network, &mut self.state, Some(&id));
        }
    }

    /// Selects a gene by id, or clears with `None`. Unknown ids do nothing.
    pub fn select(&mut self, id: Option<&str>) -> SelectionChange {
        let change = selection::select(&self.network, &mut self.state, id);
        match change {
            SelectionChange::Ignored => return change,
            SelectionChange::Selected(_) => {
                self.config.selected = id.map(str::to_owned);
                self.pending_fit = Some(FitTarget::Selection);
            }
            SelectionChange::Cleared => {
                self.config.selected = None;
                self.pending_fit = Some(FitTarget::Whole);
            }
        }
        self.animations
            .selection_changed(self.state.selected, self.state.hovered);
        change
    }

    /// Pulses a gene without touching selection or dimming.
    pub fn highlight(&mut self, id: Option<&str>) {
        if id.is_some_and(|id| self.network.index_of(id).is_none()) {
            debug!(gene = ?id, "highlight ignored: gene not in network");
            return;
        }

        self.config.highlighted = id.map(str::to_owned);
        if let Some(token) = self.flash.take() {
            self.animations.cancel_flash(token);
        }
        if let Some(index) = selection::highlight(&self.network, &mut self.state, id) {
            self.flash = Some(self.animations.start_flash(index, self.now, style::ACCENT));
        }
        self.pending_flash = None;
    }

    pub fn hover(&mut self, index: Option<usize>) {
        let previous = self.state.hovered;
        if !selection::hover(&self.network, &mut self.state, index) {
            return;
        }
        if let Some(previous) = previous {
            let keep = self.state.is_selected(previous);
            self.animations.hover_leave(previous, self.now, keep);
        }
        if let Some(current) = self.state.hovered {
            self.animations.hover_enter(current, self.now);
        }
    }

    /// Pointer click on a node. Empty canvas (`None`) or a stale index does
    /// nothing; clearing is left to [`reset`](Self::reset).
    pub fn click(&mut self, index: Option<usize>) {
        let Some(id) = index
            .and_then(|index| self.network.node(index))
            .map(|node| node.id.clone())
        else {
            return;
        };
        self.select(Some(&id));
        self.events.push(GraphEvent::NodeClicked(Some(id)));
    }

    /// Clears the selection, frames the whole graph and reports it.
    pub fn reset(&mut self) {
        self.select(None);
        self.events.push(GraphEvent::NodeClicked(None));
    }

    pub fn zoom_by(&mut self, factor: f32) {
        let rect = Rect::from_center_size(Pos2::ZERO, self.viewport);
        self.zoom_about(rect, rect.center(), factor);
    }

    pub fn zoom_about(&mut self, rect: Rect, anchor: Pos2, factor: f32) {
        let camera = self.settings.camera;
        self.animations
            .camera_mut()
            .zoom_about(rect, anchor, factor, &camera);
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.animations.camera_mut().pan += delta;
    }

    pub fn drain_events(&mut self) -> Vec<GraphEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn layout_progress(&self) -> Option<f32> {
        match self.layout.status() {
            LayoutStatus::Running { progress, .. } => Some(progress),
            _ => None,
        }
    }

    /// Advances layout and animation. Returns `true` when another frame is needed.
    pub fn frame(&mut self, now: f64, viewport: Vec2) -> bool {
        self.now = now;
        self.viewport = viewport;

        let status = self.layout.step();
        let settled = !matches!(status, LayoutStatus::Running { .. });

        if let Some(index) = self.pending_flash.take() {
            self.flash = Some(self.animations.start_flash(index, now, style::ACCENT));
        }

        if settled && let Some(target) = self.pending_fit.take() {
            self.fit(target);
        }

        let animating = self.animations.tick(now);
        animating || !settled || self.pending_fit.is_some()
    }

    fn fit(&mut self, target: FitTarget) {
        let Some(positions) = self.positions() else {
            return;
        };

        let camera = self.settings.camera;
        let (members, padding) = match (target, self.state.selected) {
            (FitTarget::Selection, Some(selected)) if self.state.mode == ViewMode::Full => {
                let mut members = vec![selected];
                members.extend(self.state.neighbors.iter().copied());
                (members, camera.neighborhood_padding)
            }
            (FitTarget::Selection, Some(selected)) => (vec![selected], camera.single_padding),
            _ => ((0..self.network.node_count()).collect(), camera.reset_padding),
        };

        let Some(bounds) = bounds_of(&self.network, positions, &members) else {
            return;
        };
        let target_camera = fit_camera(bounds, self.viewport, padding, &camera);
        debug!(?target, zoom = target_camera.zoom, "fitting camera");
        self.animations
            .fit_camera_to(target_camera, self.now, camera.fit_secs);
    }

    /// Current positions for this graph and mode, if a run has produced any.
    pub fn positions(&self) -> Option<&[Vec2]> {
        if !self.layout.matches(&self.network, self.config.mode) {
            return None;
        }
        self.layout
            .positions()
            .filter(|positions| positions.len() == self.network.node_count())
    }

    /// Resolved style plus any transient overlay.
    pub fn node_style(&self, index: usize) -> NodeStyle {
        let resolved = style::resolve_node(&self.network, index, &self.state);
        self.animations.node_overlay(index, self.now).apply(resolved)
    }

    pub fn edge_style(&self, index: usize) -> EdgeStyle {
        style::resolve_edge(&self.network, index, &self.state)
    }
}

fn bounds_of(network: &GeneNetwork, positions: &[Vec2], members: &[usize]) -> Option<Rect> {
    members
        .iter()
        .filter_map(|&index| {
            let position = positions.get(index)?;
            let radius = network.node(index).map_or(0.0, |node| node.size);
            Some(Rect::from_center_size(position.to_pos2(), Vec2::splat(radius * 2.0)))
        })
        .reduce(|a, b| a.union(b))
}
