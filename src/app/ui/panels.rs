use eframe::egui::{self, Align, Context, Layout};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn show(&mut self, ctx: &Context, reload_requested: &mut bool, is_reloading: bool) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("genenet-explorer");
                    ui.separator();
                    ui.label(self.config.mode.label());
                    if let Some(session) = &self.session {
                        ui.label(format!("nodes: {}", session.network().node_count()));
                        ui.label(format!("edges: {}", session.network().edge_count()));
                    }
                    let reload_button =
                        ui.add_enabled(!is_reloading, egui::Button::new("Reload data"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(progress) = self.session.as_ref().and_then(|s| s.layout_progress()) {
                            ui.add(
                                egui::ProgressBar::new(progress)
                                    .desired_width(120.0)
                                    .text("layout"),
                            );
                        }
                        if let Some(clicked) = &self.last_clicked {
                            ui.label(match clicked {
                                Some(id) => format!("last click: {id}"),
                                None => "last click: background".to_owned(),
                            });
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.draw_graph(ui));

        self.pull_session_config();
    }
}
