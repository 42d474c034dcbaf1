//! Node placement for the three view modes.
//!
//! A run is split into bounded chunks so it can advance a little every frame.
//! Each run carries the generation it was started under; a result whose
//! generation is not the engine's current one is dropped.

mod force;
mod layered;

use eframe::egui::Vec2;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::network::GeneNetwork;
use crate::view::ViewMode;

pub use force::ForceLayoutConfig;
pub use layered::LayeredLayoutConfig;

use force::ForceSimulation;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub full: ForceLayoutConfig,
    pub ego: ForceLayoutConfig,
    pub path: LayeredLayoutConfig,
    /// Force iterations run per frame.
    pub iterations_per_frame: usize,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            full: ForceLayoutConfig::full(),
            ego: ForceLayoutConfig::ego(),
            path: LayeredLayoutConfig::default(),
            iterations_per_frame: 40,
        }
    }
}

impl LayoutSettings {
    pub fn force_config(&self, mode: ViewMode) -> Option<&ForceLayoutConfig> {
        match mode {
            ViewMode::Full => Some(&self.full),
            ViewMode::Ego => Some(&self.ego),
            ViewMode::Path => None,
        }
    }
}

/// Finished positions tagged with the run that produced them.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutResult {
    pub generation: u64,
    pub revision: u64,
    pub mode: ViewMode,
    pub positions: Vec<Vec2>,
}

enum JobKind {
    Force(ForceSimulation),
    Layered(Vec<Vec2>),
}

/// An in-flight layout run.
pub struct LayoutJob {
    generation: u64,
    revision: u64,
    mode: ViewMode,
    kind: Option<JobKind>,
}

impl LayoutJob {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn positions(&self) -> &[Vec2] {
        match &self.kind {
            Some(JobKind::Force(simulation)) => simulation.positions(),
            Some(JobKind::Layered(positions)) => positions,
            None => &[],
        }
    }

    pub fn progress(&self) -> f32 {
        match &self.kind {
            Some(JobKind::Force(simulation)) => simulation.progress(),
            _ => 1.0,
        }
    }

    /// Advances by at most `budget` iterations. Yields the result exactly
    /// once, when the run completes.
    pub fn step(&mut self, budget: usize) -> Option<LayoutResult> {
        let done = match &mut self.kind {
            Some(JobKind::Force(simulation)) => simulation.advance(budget),
            Some(JobKind::Layered(_)) => true,
            None => return None,
        };
        if !done {
            return None;
        }

        let positions = match self.kind.take() {
            Some(JobKind::Force(simulation)) => simulation.into_positions(),
            Some(JobKind::Layered(positions)) => positions,
            None => return None,
        };
        Some(LayoutResult {
            generation: self.generation,
            revision: self.revision,
            mode: self.mode,
            positions,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LayoutStatus {
    Idle,
    Running { generation: u64, progress: f32 },
    Finished { generation: u64 },
}

pub struct LayoutEngine {
    settings: LayoutSettings,
    rng: StdRng,
    generation: u64,
    job: Option<LayoutJob>,
    committed: Option<LayoutResult>,
}

impl LayoutEngine {
    pub fn new(settings: LayoutSettings, seed: Option<u64>) -> Self {
        Self {
            settings,
            rng: seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64),
            generation: 0,
            job: None,
            committed: None,
        }
    }

    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts a run the caller drives. Any run the engine was driving itself
    /// is abandoned, and results from earlier generations become stale.
    pub fn start_detached(&mut self, network: &GeneNetwork, mode: ViewMode) -> LayoutJob {
        self.generation += 1;
        self.job = None;

        let kind = match self.settings.force_config(mode) {
            Some(config) => JobKind::Force(ForceSimulation::new(network, *config, &mut self.rng)),
            None => JobKind::Layered(layered::layered_positions(network, &self.settings.path)),
        };
        debug!(
            generation = self.generation,
            revision = network.revision(),
            ?mode,
            nodes = network.node_count(),
            "layout started"
        );

        LayoutJob {
            generation: self.generation,
            revision: network.revision(),
            mode,
            kind: Some(kind),
        }
    }

    pub fn start(&mut self, network: &GeneNetwork, mode: ViewMode) -> u64 {
        let job = self.start_detached(network, mode);
        let generation = job.generation;
        self.job = Some(job);
        generation
    }

    /// Runs one frame's worth of iterations of the engine-owned job.
    pub fn step(&mut self) -> LayoutStatus {
        let budget = self.settings.iterations_per_frame.max(1);
        let Some(job) = self.job.as_mut() else {
            return self.status();
        };

        match job.step(budget) {
            Some(result) => {
                self.job = None;
                let generation = result.generation;
                self.commit(result);
                LayoutStatus::Finished { generation }
            }
            None => LayoutStatus::Running {
                generation: job.generation,
                progress: job.progress(),
            },
        }
    }

    pub fn status(&self) -> LayoutStatus {
        if let Some(job) = &self.job {
            return LayoutStatus::Running {
                generation: job.generation,
                progress: job.progress(),
            };
        }
        match &self.committed {
            Some(result) if result.generation == self.generation => LayoutStatus::Finished {
                generation: result.generation,
            },
            _ => LayoutStatus::Idle,
        }
    }

    /// Applies a finished run. Returns `false` for results from an older run.
    pub fn commit(&mut self, result: LayoutResult) -> bool {
        if result.generation != self.generation {
            debug!(
                stale = result.generation,
                current = self.generation,
                "discarding stale layout result"
            );
            return false;
        }

        info!(
            generation = result.generation,
            mode = ?result.mode,
            nodes = result.positions.len(),
            "layout finished"
        );
        self.committed = Some(result);
        true
    }

    /// Positions of the current run: live while it iterates, committed once done.
    pub fn positions(&self) -> Option<&[Vec2]> {
        if let Some(job) = &self.job {
            return Some(job.positions());
        }
        self.committed
            .as_ref()
            .filter(|result| result.generation == self.generation)
            .map(|result| result.positions.as_slice())
    }

    /// Whether the visible positions belong to this graph and mode.
    pub fn matches(&self, network: &GeneNetwork, mode: ViewMode) -> bool {
        match (&self.job, &self.committed) {
            (Some(job), _) => job.revision == network.revision() && job.mode == mode,
            (None, Some(result)) => {
                result.generation == self.generation
                    && result.revision == network.revision()
                    && result.mode == mode
            }
            (None, None) => false,
        }
    }

    pub fn run_to_completion(&mut self) -> LayoutStatus {
        loop {
            match self.step() {
                LayoutStatus::Running { .. } => {}
                status => return status,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{NetworkPayload, RawLink, RawNode};

    fn network() -> GeneNetwork {
        let payload = NetworkPayload {
            nodes: ["A", "B", "C", "D"].into_iter().map(RawNode::bare).collect(),
            links: [("A", "B"), ("B", "C"), ("C", "D")]
                .into_iter()
                .map(|(source, target)| RawLink {
                    source: source.to_owned(),
                    target: target.to_owned(),
                    weight: Some(0.8),
                    status: None,
                })
                .collect(),
        };
        GeneNetwork::from_payload(&payload).expect("valid network")
    }

    fn quick_settings() -> LayoutSettings {
        let quick = ForceLayoutConfig {
            iterations: 30,
            ..ForceLayoutConfig::full()
        };
        LayoutSettings {
            full: quick,
            ego: quick,
            iterations_per_frame: 10,
            ..LayoutSettings::default()
        }
    }

    #[test]
    fn stale_run_is_never_applied() {
        let network = network();
        let mut engine = LayoutEngine::new(quick_settings(), Some(11));

        let mut run_a = engine.start_detached(&network, ViewMode::Full);
        let mut run_b = engine.start_detached(&network, ViewMode::Full);

        let result_b = loop {
            if let Some(result) = run_b.step(10) {
                break result;
            }
        };
        let b_positions = result_b.positions.clone();
        assert!(engine.commit(result_b));

        let result_a = loop {
            if let Some(result) = run_a.step(10) {
                break result;
            }
        };
        assert_ne!(result_a.positions, b_positions);
        assert!(!engine.commit(result_a));
        assert_eq!(engine.positions(), Some(b_positions.as_slice()));
    }

    #[test]
    fn restarting_abandons_the_running_job() {
        let network = network();
        let mut engine = LayoutEngine::new(quick_settings(), Some(5));

        let first = engine.start(&network, ViewMode::Full);
        assert!(matches!(engine.step(), LayoutStatus::Running { generation, .. } if generation == first));

        let second = engine.start(&network, ViewMode::Ego);
        assert_eq!(second, first + 1);
        assert_eq!(
            engine.run_to_completion(),
            LayoutStatus::Finished { generation: second }
        );
        assert!(engine.matches(&network, ViewMode::Ego));
        assert!(!engine.matches(&network, ViewMode::Full));
    }

    #[test]
    fn steps_are_bounded_per_frame() {
        let network = network();
        let mut engine = LayoutEngine::new(quick_settings(), Some(2));
        engine.start(&network, ViewMode::Full);

        let mut frames = 0;
        while let LayoutStatus::Running { .. } = engine.step() {
            frames += 1;
        }
        assert!(frames >= 1 && frames <= 3);
        assert_eq!(engine.positions().map(<[Vec2]>::len), Some(4));
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let network = network();
        let run = |seed| {
            let mut engine = LayoutEngine::new(quick_settings(), Some(seed));
            engine.start(&network, ViewMode::Full);
            engine.run_to_completion();
            engine.positions().map(<[Vec2]>::to_vec)
        };
        assert_eq!(run(3), run(3));
    }

    #[test]
    fn path_mode_finishes_in_one_step() {
        let network = network();
        let mut engine = LayoutEngine::new(LayoutSettings::default(), Some(1));
        let generation = engine.start(&network, ViewMode::Path);
        assert_eq!(engine.step(), LayoutStatus::Finished { generation });
        assert_eq!(engine.step(), LayoutStatus::Finished { generation });
    }
}
