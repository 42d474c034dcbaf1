use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::network::GeneNetwork;

/// Annealed force-directed parameters for one view mode.
///
/// Units are world pixels. Repulsion falls off with distance, springs pull
/// each edge toward `ideal_edge_length * (1.5 - weight)` with a stiffness of
/// `edge_elasticity * weight`, gravity pulls toward the origin per unit of
/// distance, and `temperature` caps how far any node moves per iteration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceLayoutConfig {
    pub iterations: usize,
    pub initial_temperature: f32,
    pub cooling_factor: f32,
    pub min_temperature: f32,
    pub node_repulsion: f32,
    pub node_overlap: f32,
    pub ideal_edge_length: f32,
    pub edge_elasticity: f32,
    pub gravity: f32,
    pub settle_threshold: f32,
}

impl ForceLayoutConfig {
    pub fn full() -> Self {
        Self {
            iterations: 800,
            initial_temperature: 200.0,
            cooling_factor: 0.95,
            min_temperature: 1.0,
            node_repulsion: 6000.0,
            node_overlap: 10.0,
            ideal_edge_length: 70.0,
            edge_elasticity: 0.45,
            gravity: 0.6,
            settle_threshold: 0.05,
        }
    }

    /// Wider spacing for a small neighborhood.
    pub fn ego() -> Self {
        Self {
            iterations: 600,
            node_repulsion: 8000.0,
            ideal_edge_length: 100.0,
            gravity: 0.4,
            ..Self::full()
        }
    }
}

impl Default for ForceLayoutConfig {
    fn default() -> Self {
        Self::full()
    }
}

pub(super) struct ForceSimulation {
    config: ForceLayoutConfig,
    positions: Vec<Vec2>,
    radii: Vec<f32>,
    edges: Vec<(usize, usize, f32)>,
    temperature: f32,
    iteration: usize,
    settled: bool,
}

impl ForceSimulation {
    pub(super) fn new(network: &GeneNetwork, config: ForceLayoutConfig, rng: &mut impl Rng) -> Self {
        let n = network.node_count();
        let spread = config.ideal_edge_length * (n.max(1) as f32).sqrt();
        let positions = (0..n)
            .map(|_| {
                let angle = rng.random_range(0.0..TAU);
                let radius = spread * rng.random::<f32>().sqrt();
                vec2(angle.cos(), angle.sin()) * radius
            })
            .collect();

        Self {
            positions,
            radii: network.nodes().iter().map(|node| node.size).collect(),
            edges: network
                .edges()
                .iter()
                .filter(|edge| edge.source != edge.target)
                .map(|edge| (edge.source, edge.target, edge.weight))
                .collect(),
            temperature: config.initial_temperature,
            iteration: 0,
            settled: n < 2,
            config,
        }
    }

    pub(super) fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    pub(super) fn into_positions(self) -> Vec<Vec2> {
        self.positions
    }

    pub(super) fn is_finished(&self) -> bool {
        self.settled || self.iteration >= self.config.iterations
    }

    pub(super) fn progress(&self) -> f32 {
        if self.is_finished() {
            1.0
        } else {
            self.iteration as f32 / self.config.iterations.max(1) as f32
        }
    }

    /// Runs at most `budget` iterations; returns `true` once the run is over.
    pub(super) fn advance(&mut self, budget: usize) -> bool {
        for _ in 0..budget {
            if self.is_finished() {
                break;
            }

            let max_move = self.iterate();
            self.iteration += 1;
            self.temperature =
                (self.temperature * self.config.cooling_factor).max(self.config.min_temperature);

            if self.temperature <= self.config.min_temperature
                && max_move < self.config.settle_threshold
            {
                self.settled = true;
            }
        }

        self.is_finished()
    }

    fn iterate(&mut self) -> f32 {
        let n = self.positions.len();
        let config = &self.config;
        let mut disp = vec![Vec2::ZERO; n];

        for i in 0..n {
            for j in (i + 1)..n {
                let delta = self.positions[i] - self.positions[j];
                let distance = delta.length();
                let direction = if distance > 0.0001 {
                    delta / distance
                } else {
                    let angle = ((i as f32) * 0.618_034 + (j as f32) * 0.414_214) * TAU;
                    vec2(angle.cos(), angle.sin())
                };
                let distance = distance.max(1.0);

                let mut push = config.node_repulsion / distance;
                let min_distance = self.radii[i] + self.radii[j] + config.node_overlap;
                if distance < min_distance {
                    push += (min_distance - distance) * 2.4;
                }

                disp[i] += direction * push;
                disp[j] -= direction * push;
            }
        }

        for &(from, to, weight) in &self.edges {
            let delta = self.positions[from] - self.positions[to];
            let distance = delta.length().max(0.5);
            let direction = delta / distance;

            let ideal_length = config.ideal_edge_length * (1.5 - weight);
            let pull = (distance - ideal_length) * config.edge_elasticity * weight;

            disp[from] -= direction * pull;
            disp[to] += direction * pull;
        }

        for (position, d) in self.positions.iter().zip(disp.iter_mut()) {
            *d -= *position * config.gravity;
        }

        let mut max_move = 0.0_f32;
        for (position, d) in self.positions.iter_mut().zip(&disp) {
            let length = d.length();
            if length > 0.0 {
                let step = length.min(self.temperature);
                *position += *d / length * step;
                max_move = max_move.max(step);
            }
        }

        max_move
    }
}
