use eframe::egui::{Pos2, Rect, Vec2, vec2};
use serde::{Deserialize, Serialize};

use super::tween::Tween;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub fit_secs: f32,
    /// Padding around the selected node and its neighbors.
    pub neighborhood_padding: f32,
    /// Padding around a lone selected node.
    pub single_padding: f32,
    /// Padding when framing the whole graph.
    pub reset_padding: f32,
    pub zoom_in_step: f32,
    pub zoom_out_step: f32,
    pub wheel_sensitivity: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            min_zoom: 0.3,
            max_zoom: 3.0,
            fit_secs: 0.5,
            neighborhood_padding: 150.0,
            single_padding: 200.0,
            reset_padding: 30.0,
            zoom_in_step: 1.2,
            zoom_out_step: 0.8,
            wheel_sensitivity: 0.0018,
        }
    }
}

/// Screen offset of the world origin from the viewport center, plus scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub pan: Vec2,
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Camera {
    pub fn world_to_screen(&self, rect: Rect, world: Vec2) -> Pos2 {
        rect.center() + self.pan + world * self.zoom
    }

    pub fn screen_to_world(&self, rect: Rect, screen: Pos2) -> Vec2 {
        (screen - rect.center() - self.pan) / self.zoom
    }

    /// Scales by `factor` keeping the world point under `anchor` fixed.
    pub fn zoom_about(&mut self, rect: Rect, anchor: Pos2, factor: f32, settings: &CameraSettings) {
        let world_before = self.screen_to_world(rect, anchor);
        self.zoom = (self.zoom * factor).clamp(settings.min_zoom, settings.max_zoom);
        self.pan = anchor - rect.center() - world_before * self.zoom;
    }

    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            pan: self.pan + (other.pan - self.pan) * t,
            zoom: self.zoom + (other.zoom - self.zoom) * t,
        }
    }
}

/// Camera that frames `bounds` (world space) inside a viewport of `viewport` pixels.
pub fn fit_camera(bounds: Rect, viewport: Vec2, padding: f32, settings: &CameraSettings) -> Camera {
    let available = (viewport - vec2(padding, padding) * 2.0).max(vec2(1.0, 1.0));
    let size = bounds.size().max(vec2(1.0, 1.0));
    let zoom = (available.x / size.x)
        .min(available.y / size.y)
        .clamp(settings.min_zoom, settings.max_zoom);

    Camera {
        pan: -bounds.center().to_vec2() * zoom,
        zoom,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraTween {
    from: Camera,
    to: Camera,
    progress: Tween,
}

impl CameraTween {
    pub fn new(from: Camera, to: Camera, now: f64, duration: f32) -> Self {
        Self {
            from,
            to,
            progress: Tween::new(0.0, 1.0, now, duration),
        }
    }

    pub fn target(&self) -> Camera {
        self.to
    }

    pub fn camera(&self, now: f64) -> Camera {
        self.from.lerp(&self.to, self.progress.value(now))
    }

    pub fn is_finished(&self, now: f64) -> bool {
        self.progress.is_finished(now)
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;

    #[test]
    fn world_screen_round_trip() {
        let rect = Rect::from_min_size(Pos2::ZERO, vec2(800.0, 600.0));
        let camera = Camera {
            pan: vec2(30.0, -12.0),
            zoom: 1.7,
        };
        let world = vec2(-41.0, 88.0);
        let back = camera.screen_to_world(rect, camera.world_to_screen(rect, world));
        assert!((back - world).length() < 1e-3);
    }

    #[test]
    fn fit_centers_bounds_and_clamps_zoom() {
        let settings = CameraSettings::default();
        let bounds = Rect::from_min_max(pos2(100.0, 100.0), pos2(300.0, 200.0));
        let camera = fit_camera(bounds, vec2(1000.0, 800.0), 30.0, &settings);

        let rect = Rect::from_min_size(Pos2::ZERO, vec2(1000.0, 800.0));
        let center = camera.world_to_screen(rect, bounds.center().to_vec2());
        assert!((center - rect.center()).length() < 1e-3);
        assert_eq!(camera.zoom, settings.max_zoom);

        let huge = Rect::from_center_size(Pos2::ZERO, vec2(50_000.0, 50_000.0));
        assert_eq!(fit_camera(huge, vec2(1000.0, 800.0), 30.0, &settings).zoom, settings.min_zoom);
    }

    #[test]
    fn zoom_about_keeps_anchor_fixed() {
        let settings = CameraSettings::default();
        let rect = Rect::from_min_size(Pos2::ZERO, vec2(640.0, 480.0));
        let mut camera = Camera::default();
        let anchor = pos2(500.0, 100.0);
        let before = camera.screen_to_world(rect, anchor);

        camera.zoom_about(rect, anchor, 1.2, &settings);
        assert!((camera.screen_to_world(rect, anchor) - before).length() < 1e-3);
        assert!((camera.zoom - 1.2).abs() < 1e-6);
    }

    #[test]
    fn tween_reaches_target() {
        let to = Camera {
            pan: vec2(10.0, 10.0),
            zoom: 2.0,
        };
        let tween = CameraTween::new(Camera::default(), to, 1.0, 0.5);
        assert_eq!(tween.camera(1.0), Camera::default());
        assert_eq!(tween.camera(2.0), to);
        assert!(tween.is_finished(1.6));
    }
}
