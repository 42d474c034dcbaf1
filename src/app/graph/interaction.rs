use eframe::egui::{self, Pos2, Rect, Ui};

use genenet_explorer::view::GraphSession;

pub(in crate::app) fn handle_graph_zoom(
    session: &mut GraphSession,
    ui: &Ui,
    rect: Rect,
    response: &egui::Response,
) {
    if !response.hovered() {
        return;
    }

    let scroll = ui.input(|input| input.raw_scroll_delta.y);
    if scroll.abs() <= f32::EPSILON {
        return;
    }

    let pointer = ui
        .input(|input| input.pointer.hover_pos())
        .unwrap_or_else(|| rect.center());
    let sensitivity = session.settings().camera.wheel_sensitivity;
    let factor = (1.0 + scroll * sensitivity).clamp(0.85, 1.15);
    session.zoom_about(rect, pointer, factor);
}

pub(in crate::app) fn handle_graph_pan(session: &mut GraphSession, response: &egui::Response) {
    if response.dragged_by(egui::PointerButton::Secondary)
        || response.dragged_by(egui::PointerButton::Middle)
    {
        session.pan_by(response.drag_delta());
    }
}

/// Closest node whose circle contains the pointer.
pub(in crate::app) fn hovered_index(
    ui: &Ui,
    visible_indices: &[usize],
    screen_positions: &[Pos2],
    screen_radii: &[f32],
) -> Option<usize> {
    let pointer = ui.input(|input| input.pointer.hover_pos())?;
    visible_indices
        .iter()
        .filter_map(|&index| {
            let distance = screen_positions[index].distance(pointer);
            (distance <= screen_radii[index]).then_some((index, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}
