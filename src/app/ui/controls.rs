use eframe::egui::{self, RichText, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use genenet_explorer::network::GeneNetwork;
use genenet_explorer::view::{Tissue, ViewMode, style};

use super::super::ViewModel;

const MAX_SEARCH_RESULTS: usize = 12;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Best fuzzy matches over labels and ids, highest score first.
pub(in crate::app) fn search_genes(network: &GeneNetwork, query: &str, limit: usize) -> Vec<usize> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default();
    let mut scored = network
        .nodes()
        .iter()
        .enumerate()
        .filter_map(|(index, node)| {
            let score = fuzzy_match_score(&matcher, &node.label, query)
                .max(fuzzy_match_score(&matcher, &node.id, query))?;
            Some((index, score))
        })
        .collect::<Vec<_>>();
    scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    scored.truncate(limit);
    scored.into_iter().map(|(index, _)| index).collect()
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.label(RichText::new("View").strong());
        let mut mode = self.config.mode;
        ui.horizontal_wrapped(|ui| {
            for candidate in ViewMode::ALL {
                ui.selectable_value(&mut mode, candidate, candidate.label());
            }
        });
        if mode != self.config.mode {
            self.set_mode(mode);
        }

        ui.label(RichText::new("Tissue").strong());
        let mut tissue = self.config.tissue;
        ui.horizontal(|ui| {
            ui.selectable_value(&mut tissue, Tissue::Normal, Tissue::Normal.label())
                .on_hover_text("Color nodes and choose the path for normal tissue.");
            ui.selectable_value(&mut tissue, Tissue::Tumor, Tissue::Tumor.label())
                .on_hover_text("Color nodes and choose the path for tumor tissue.");
        });
        if tissue != self.config.tissue {
            self.set_tissue(tissue);
        }

        ui.separator();
        ui.label("Search genes")
            .on_hover_text("Fuzzy match on gene symbol or id; click a result to select it.");
        ui.text_edit_singleline(&mut self.search);

        let mut picked = None;
        let matches = search_genes(&self.bundle.full, &self.search, MAX_SEARCH_RESULTS);
        for index in matches {
            let Some(node) = self.bundle.full.node(index) else {
                continue;
            };
            if ui.link(node.label.as_str()).on_hover_text(node.id.as_str()).clicked() {
                picked = Some(node.id.clone());
            }
        }
        if let Some(id) = picked {
            self.select_gene(Some(id));
        }

        ui.separator();
        ui.label(RichText::new("Camera").strong());
        ui.horizontal(|ui| {
            let camera = self.settings.camera;
            let enabled = self.session.is_some();
            if ui.add_enabled(enabled, egui::Button::new("Zoom in")).clicked()
                && let Some(session) = self.session.as_mut()
            {
                session.zoom_by(camera.zoom_in_step);
            }
            if ui.add_enabled(enabled, egui::Button::new("Zoom out")).clicked()
                && let Some(session) = self.session.as_mut()
            {
                session.zoom_by(camera.zoom_out_step);
            }
            if ui
                .add_enabled(enabled, egui::Button::new("Reset"))
                .on_hover_text("Clear the selection and fit the whole graph.")
                .clicked()
                && let Some(session) = self.session.as_mut()
            {
                session.reset();
            }
        });
        ui.small("Scroll to zoom, right or middle drag to pan.");

        if let Some(session) = &self.session {
            ui.separator();
            ui.label(RichText::new("Legend").strong());
            for (label, color) in style::legend(session.state()) {
                ui.horizontal(|ui| {
                    let (rect, _) = ui.allocate_exact_size(vec2(12.0, 12.0), egui::Sense::hover());
                    ui.painter().circle_filled(rect.center(), 6.0, color);
                    ui.label(label);
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use genenet_explorer::network::{NetworkPayload, RawLink, RawNode};

    use super::*;

    fn network() -> GeneNetwork {
        let mut payload = NetworkPayload::default();
        for id in ["TP53", "TP63", "EGFR"] {
            payload.nodes.push(RawNode::bare(id));
        }
        payload.links.push(RawLink {
            source: "TP53".to_owned(),
            target: "EGFR".to_owned(),
            weight: None,
            status: None,
        });
        GeneNetwork::from_payload(&payload).expect("valid network")
    }

    #[test]
    fn empty_query_matches_nothing() {
        assert!(search_genes(&network(), "   ", 10).is_empty());
    }

    #[test]
    fn search_is_case_insensitive_and_limited() {
        let network = network();
        let hits = search_genes(&network, "tp", 10);
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|&i| network.nodes()[i].id.starts_with("TP")));
        assert_eq!(search_genes(&network, "tp", 1).len(), 1);
    }
}
