use eframe::egui::{self, RichText, Ui};

use genenet_explorer::network::{NodeGroup, NodeKind};
use genenet_explorer::view::{Tissue, ViewMode};

use super::super::ViewModel;

fn kind_label(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Hub => "hub",
        NodeKind::Normal => "gene",
    }
}

fn group_label(group: NodeGroup) -> &'static str {
    match group {
        NodeGroup::Top => "top ranked",
        NodeGroup::Candidate => "candidate",
        NodeGroup::Normal => "other",
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        self.draw_selected_gene(ui);

        match self.config.mode {
            ViewMode::Ego => self.draw_rewiring(ui),
            ViewMode::Path => self.draw_path_info(ui),
            ViewMode::Full => {}
        }

        ui.separator();
        self.draw_rankings(ui);
    }

    fn draw_selected_gene(&self, ui: &mut Ui) {
        let Some(selected_id) = self.config.selected.as_deref() else {
            ui.label("Select a gene from the graph, search or rankings.");
            return;
        };

        let network = self
            .session
            .as_ref()
            .map(|session| session.network())
            .filter(|network| network.index_of(selected_id).is_some())
            .unwrap_or(&self.bundle.full);
        let Some(index) = network.index_of(selected_id) else {
            ui.label(format!("{selected_id} is not part of this network."));
            return;
        };
        let Some(node) = network.node(index) else {
            return;
        };

        ui.label(RichText::new(node.label.as_str()).strong());
        if node.label != node.id {
            ui.small(node.id.as_str());
        }
        ui.add_space(6.0);
        ui.label(format!("Type: {}", kind_label(node.kind)));
        ui.label(format!("Group: {}", group_label(node.group)));
        if let Some(rank) = node.rank {
            ui.label(format!("Rank: {rank}"));
        }
        ui.label(format!("Interactions: {}", network.degree(index)));
        if node.status.is_tagged() {
            ui.label(format!("Rewiring: {}", node.status.label()));
        }
    }

    fn draw_rewiring(&self, ui: &mut Ui) {
        let Some(session) = &self.session else {
            return;
        };

        let summary = session.network().rewiring_summary();
        ui.separator();
        ui.label(RichText::new("Rewiring").strong());
        ui.label(format!("Interactions: {}", summary.total));
        ui.label(format!("Gained in tumor: {}", summary.gained));
        ui.label(format!("Lost in tumor: {}", summary.lost));
        ui.label(format!("Maintained: {}", summary.maintained));
    }

    fn draw_path_info(&self, ui: &mut Ui) {
        ui.separator();
        ui.label(RichText::new("Signal path").strong());

        let Some(paths) = &self.bundle.paths else {
            ui.label("No path data loaded.");
            return;
        };

        let traced = match self.config.tissue {
            Tissue::Normal => &paths.normal,
            Tissue::Tumor => &paths.tumor,
        };
        if traced.is_found() {
            ui.label(format!("{} hops", traced.hops));
            ui.label(format!("Total cost: {:.3}", traced.total_cost));
        } else {
            ui.label(format!("No path found in {} tissue.", self.config.tissue.label().to_lowercase()));
        }

        if let Some(stats) = &paths.stats {
            ui.label(format!("Cost difference: {:+.3}", stats.cost_diff));
            if !stats.status.is_empty() {
                ui.label(format!("Status: {}", stats.status));
            }
        }
    }

    fn draw_rankings(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("Ranked genes").strong())
            .on_hover_text("Hover to flash a gene on the canvas, click to select it.");

        let ranked = self.bundle.full.ranked_nodes();
        if ranked.is_empty() {
            ui.label("No ranked genes in this network.");
            return;
        }

        let mut hovered = None;
        let mut clicked = None;
        egui::ScrollArea::vertical()
            .id_salt("ranked_genes_scroll")
            .auto_shrink([false, false])
            .show_rows(ui, 22.0, ranked.len(), |ui, row_range| {
                for row in row_range {
                    let Some(node) = ranked.get(row).and_then(|&index| self.bundle.full.node(index))
                    else {
                        continue;
                    };
                    let rank = node.rank.unwrap_or_default();
                    let selected = self.config.selected.as_deref() == Some(node.id.as_str());
                    let text = format!("#{rank}  {}", node.label);
                    let text = if selected {
                        RichText::new(text).strong()
                    } else {
                        RichText::new(text)
                    };

                    let response = ui.link(text).on_hover_text(node.id.as_str());
                    if response.hovered() {
                        hovered = Some(node.id.clone());
                    }
                    if response.clicked() {
                        clicked = Some(node.id.clone());
                    }
                }
            });

        if hovered != self.ranking_hover {
            self.ranking_hover = hovered.clone();
            self.highlight_gene(hovered);
        }
        if let Some(id) = clicked {
            self.select_gene(Some(id));
        }
    }
}
