use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use tracing::{info, warn};

use genenet_explorer::network::{DataSources, GeneNetwork, NetworkBundle, load_bundle};
use genenet_explorer::settings::EngineSettings;
use genenet_explorer::view::{GraphEvent, GraphSession, Tissue, ViewConfig, ViewMode};

mod graph;
mod render_utils;
mod ui;

type LoadResult = Result<NetworkBundle, String>;

/// How the explorer was launched; survives reloads.
#[derive(Clone, Debug)]
pub struct Launch {
    pub sources: DataSources,
    pub settings: EngineSettings,
    pub config: ViewConfig,
    pub seed: Option<u64>,
}

pub struct GeneNetworkApp {
    launch: Launch,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

/// Which network the canvas currently shows.
#[derive(Clone, Debug, PartialEq, Eq)]
enum NetworkKey {
    Full,
    /// `None` is the neighbor payload; `Some` is derived around a gene.
    Ego(Option<String>),
    Path(Tissue),
}

struct ViewModel {
    bundle: NetworkBundle,
    settings: EngineSettings,
    seed: Option<u64>,
    config: ViewConfig,
    session: Option<GraphSession>,
    session_key: Option<NetworkKey>,
    ego_center: Option<String>,
    search: String,
    ranking_hover: Option<String>,
    last_clicked: Option<Option<String>>,
}

impl GeneNetworkApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, launch: Launch) -> Self {
        let state = Self::start_load(launch.sources.clone());
        Self {
            launch,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(sources: DataSources) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_bundle(&sources).map_err(|error| {
                warn!("failed to load network data: {error:#}");
                format!("{error:#}")
            });
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(sources: DataSources) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(sources),
        }
    }

    fn ready(launch: &Launch, bundle: NetworkBundle, config: ViewConfig) -> AppState {
        AppState::Ready(Box::new(ViewModel::new(
            bundle,
            launch.settings,
            launch.seed,
            config,
        )))
    }
}

impl eframe::App for GeneNetworkApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(bundle)) => {
                        transition = Some(Self::ready(&self.launch, bundle, self.launch.config.clone()));
                    }
                    Ok(Err(error)) => transition = Some(AppState::Error(error)),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition =
                            Some(AppState::Error("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading gene network...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the gene network");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.launch.sources.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    info!("reloading network data");
                    self.reload_rx = Some(Self::spawn_load(self.launch.sources.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            let config = model.config.clone();
                            transition = Some(match result {
                                Ok(bundle) => Self::ready(&self.launch, bundle, config),
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}

impl ViewModel {
    fn new(bundle: NetworkBundle, settings: EngineSettings, seed: Option<u64>, config: ViewConfig) -> Self {
        let mut model = Self {
            ego_center: config.selected.clone(),
            bundle,
            settings,
            seed,
            config,
            session: None,
            session_key: None,
            search: String::new(),
            ranking_hover: None,
            last_clicked: None,
        };
        model.sync_session();
        model
    }

    fn network_key(&self) -> Option<NetworkKey> {
        match self.config.mode {
            ViewMode::Full => Some(NetworkKey::Full),
            ViewMode::Ego if self.bundle.neighbors.is_some() => Some(NetworkKey::Ego(None)),
            ViewMode::Ego => self
                .ego_center
                .clone()
                .map(|center| NetworkKey::Ego(Some(center))),
            ViewMode::Path => Some(NetworkKey::Path(self.config.tissue)),
        }
    }

    fn network_for(&self, key: &NetworkKey) -> Option<GeneNetwork> {
        match key {
            NetworkKey::Full => Some(self.bundle.full.clone()),
            NetworkKey::Ego(None) => self.bundle.neighbors.clone(),
            NetworkKey::Ego(Some(center)) => self.bundle.full.ego_network(center),
            NetworkKey::Path(tissue) => {
                let paths = self.bundle.paths.as_ref()?;
                let traced = match tissue {
                    Tissue::Normal => &paths.normal,
                    Tissue::Tumor => &paths.tumor,
                };
                traced.network.clone()
            }
        }
    }

    /// Builds, rebuilds or drops the session so it matches mode, tissue and
    /// the neighborhood center.
    fn sync_session(&mut self) {
        let key = self.network_key();
        if key == self.session_key {
            if let Some(session) = self.session.as_mut() {
                session.set_tissue(self.config.tissue);
            }
            return;
        }

        let network = key.as_ref().and_then(|key| self.network_for(key));
        match (network, self.session.as_mut()) {
            (Some(network), Some(session)) => {
                session.replace_network(network, self.config.mode, self.config.tissue);
            }
            (Some(network), None) => {
                self.session = Some(GraphSession::new(
                    network,
                    self.config.clone(),
                    self.settings,
                    self.seed,
                ));
            }
            (None, _) => self.session = None,
        }
        self.session_key = key;
    }

    fn set_mode(&mut self, mode: ViewMode) {
        if self.config.mode == mode {
            return;
        }
        if mode == ViewMode::Ego && self.config.selected.is_some() {
            self.ego_center = self.config.selected.clone();
        }
        self.config.mode = mode;
        self.sync_session();
    }

    fn set_tissue(&mut self, tissue: Tissue) {
        self.config.tissue = tissue;
        self.sync_session();
    }

    /// Selection coming from outside the canvas: search, rankings, startup.
    fn select_gene(&mut self, id: Option<String>) {
        if self.config.mode == ViewMode::Ego && id.is_some() {
            self.ego_center = id.clone();
        }
        self.config.selected = id;
        self.sync_session();
        if let Some(session) = self.session.as_mut() {
            session.select(self.config.selected.as_deref());
        }
    }

    fn highlight_gene(&mut self, id: Option<String>) {
        self.config.highlighted = id;
        if let Some(session) = self.session.as_mut() {
            session.highlight(self.config.highlighted.as_deref());
        }
    }

    fn handle_events(&mut self, events: Vec<GraphEvent>) {
        for event in events {
            match event {
                GraphEvent::NodeClicked(id) => {
                    info!(gene = ?id, "node clicked");
                    if let Some(id) = &id
                        && self.config.mode == ViewMode::Ego
                        && self.bundle.neighbors.is_none()
                    {
                        self.ego_center = Some(id.clone());
                    }
                    self.last_clicked = Some(id);
                }
            }
        }
        self.sync_session();
    }

    fn pull_session_config(&mut self) {
        if let Some(session) = &self.session {
            self.config.selected = session.config().selected.clone();
            self.config.highlighted = session.config().highlighted.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use genenet_explorer::network::{DataSources, load_bundle};

    use super::*;

    fn model(config: ViewConfig) -> ViewModel {
        let bundle = load_bundle(&DataSources::default()).expect("demo bundle");
        ViewModel::new(bundle, EngineSettings::default(), Some(1), config)
    }

    #[test]
    fn ego_without_payload_needs_a_center() {
        let mut model = model(ViewConfig::default());
        model.set_mode(ViewMode::Ego);
        assert!(model.session.is_none());

        model.select_gene(Some("TP53".to_owned()));
        let session = model.session.as_ref().expect("ego session");
        assert_eq!(session.network().nodes()[0].id, "TP53");
        assert_eq!(session.selected_id(), Some("TP53"));
    }

    #[test]
    fn selection_carries_into_neighborhood() {
        let mut model = model(ViewConfig {
            selected: Some("EGFR".to_owned()),
            ..ViewConfig::default()
        });
        model.set_mode(ViewMode::Ego);
        let session = model.session.as_ref().expect("ego session");
        assert_eq!(session.network().nodes()[0].id, "EGFR");
        assert!(session.state().dimmed_nodes.is_empty());
    }

    #[test]
    fn path_mode_without_traces_shows_nothing() {
        let mut model = model(ViewConfig::default());
        model.set_mode(ViewMode::Path);
        assert!(model.session.is_none());
        model.set_mode(ViewMode::Full);
        assert!(model.session.is_some());
    }

    #[test]
    fn tissue_switch_keeps_the_session() {
        let mut model = model(ViewConfig::default());
        let revision = model.session.as_ref().map(|s| s.network().revision());
        model.set_tissue(Tissue::Tumor);
        let session = model.session.as_ref().expect("session");
        assert_eq!(Some(session.network().revision()), revision);
        assert_eq!(session.state().tissue, Tissue::Tumor);
    }
}
