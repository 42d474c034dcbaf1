use eframe::egui::{self, Align2, Color32, FontId, Pos2, Sense, Stroke, Ui, vec2};

use genenet_explorer::view::ViewMode;

use super::super::ViewModel;
use super::super::render_utils::{circle_visible, draw_arrow_head, draw_background, edge_visible};
use super::interaction::{handle_graph_pan, handle_graph_zoom, hovered_index};

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let Some(session) = self.session.as_mut() else {
            ui.vertical_centered(|ui| {
                ui.add_space(120.0);
                match self.config.mode {
                    ViewMode::Ego => ui.label("Select a gene to explore its neighborhood."),
                    ViewMode::Path => ui.label("No path found for this tissue."),
                    ViewMode::Full => ui.label("No network loaded."),
                };
            });
            return;
        };

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        let now = ui.input(|input| input.time);

        let animating = session.frame(now, rect.size());
        handle_graph_zoom(session, ui, rect, &response);
        handle_graph_pan(session, &response);

        let camera = session.camera();
        draw_background(&painter, rect, camera.pan, camera.zoom);

        let Some(positions) = session.positions() else {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "Computing layout...",
                FontId::proportional(14.0),
                Color32::from_gray(200),
            );
            ui.ctx().request_repaint();
            return;
        };

        let network = session.network();
        let screen_positions = positions
            .iter()
            .map(|world| camera.world_to_screen(rect, *world))
            .collect::<Vec<Pos2>>();
        let node_styles = (0..network.node_count())
            .map(|index| session.node_style(index))
            .collect::<Vec<_>>();
        let screen_radii = node_styles
            .iter()
            .map(|style| (style.radius * camera.zoom).clamp(2.0, 90.0))
            .collect::<Vec<_>>();
        let visible_indices = (0..network.node_count())
            .filter(|&index| circle_visible(rect, screen_positions[index], screen_radii[index]))
            .collect::<Vec<_>>();

        let mut edge_order = (0..network.edge_count()).collect::<Vec<_>>();
        edge_order.sort_by_key(|&index| session.edge_style(index).highlighted);
        for index in edge_order {
            let Some(edge) = network.edge(index) else {
                continue;
            };
            let start = screen_positions[edge.source];
            let end = screen_positions[edge.target];
            if !edge_visible(rect, start, end, 4.0) {
                continue;
            }

            let style = session.edge_style(index);
            let width = (style.width * camera.zoom).clamp(0.5, 12.0);
            let color = style.color_with_opacity();
            painter.line_segment([start, end], Stroke::new(width, color));
            if style.directed {
                draw_arrow_head(
                    &painter,
                    start,
                    end,
                    screen_radii[edge.target],
                    (6.0 + width * 2.0).min(18.0),
                    color,
                );
            }
        }

        let state = session.state();
        let mut draw_order = visible_indices.clone();
        draw_order.sort_by_key(|&index| {
            (
                !state.is_dimmed(index),
                state.hovered == Some(index) || state.is_selected(index),
            )
        });

        for index in draw_order {
            let Some(node) = network.node(index) else {
                continue;
            };
            let style = node_styles[index];
            let position = screen_positions[index];
            let radius = screen_radii[index];

            painter.circle_filled(position, radius, style.fill_with_opacity());
            painter.circle_stroke(
                position,
                radius,
                Stroke::new(style.border_width, style.border_with_opacity()),
            );

            let show_label = camera.zoom > 0.55 || style.bold_label || state.is_selected(index);
            if show_label {
                let (font, alpha) = if style.bold_label {
                    (FontId::proportional(13.5), 1.0)
                } else {
                    (FontId::proportional(11.5), 0.85)
                };
                painter.text(
                    position + vec2(0.0, radius + 4.0),
                    Align2::CENTER_TOP,
                    node.label.as_str(),
                    font,
                    Color32::from_gray(235).gamma_multiply(alpha * style.opacity),
                );
            }
        }

        let hovered = if response.hovered() {
            hovered_index(ui, &visible_indices, &screen_positions, &screen_radii)
        } else {
            None
        };
        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        if let Some(index) = hovered
            && let Some(node) = network.node(index)
        {
            let mut info = format!("{}  |  degree {}", node.label, network.degree(index));
            if let Some(rank) = node.rank {
                info.push_str(&format!("  |  rank {rank}"));
            }
            if node.status.is_tagged() {
                info.push_str(&format!("  |  {}", node.status.label()));
            }
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                info,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        let clicked = response.clicked_by(egui::PointerButton::Primary);
        session.hover(hovered);
        if clicked {
            session.click(hovered);
        }

        if animating || response.dragged() {
            ui.ctx().request_repaint();
        }

        let events = session.drain_events();
        if !events.is_empty() {
            self.handle_events(events);
        }
    }
}
