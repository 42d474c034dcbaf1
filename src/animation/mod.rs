//! Short-lived visual transitions layered on top of resolved styles.
//!
//! Nothing here writes back into [`ViewState`](crate::view::ViewState); the
//! renderer asks for a per-node [`Overlay`] after style resolution.

mod camera;
mod flash;
mod hover;
mod tween;

use eframe::egui::Color32;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::view::NodeStyle;

pub use camera::{Camera, CameraSettings, CameraTween, fit_camera};
pub use flash::{FlashSequence, FlashStep, FlashToken};
pub use hover::HoverGrowth;
pub use tween::{Tween, ease_in_out};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    pub hover_scale: f32,
    pub hover_secs: f32,
    pub flash_scale: f32,
    pub flash_grow_secs: f32,
    pub flash_color_secs: f32,
    /// Accent/base pairs between grow and shrink.
    pub flash_alternations: usize,
    pub flash_shrink_secs: f32,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            hover_scale: 1.4,
            hover_secs: 0.2,
            flash_scale: 1.6,
            flash_grow_secs: 0.2,
            flash_color_secs: 0.15,
            flash_alternations: 2,
            flash_shrink_secs: 0.2,
        }
    }
}

/// Transient adjustment applied after style resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Overlay {
    pub scale: f32,
    pub fill: Option<Color32>,
}

impl Default for Overlay {
    fn default() -> Self {
        Self {
            scale: 1.0,
            fill: None,
        }
    }
}

impl Overlay {
    pub fn is_identity(&self) -> bool {
        self.scale == 1.0 && self.fill.is_none()
    }

    pub fn apply(&self, mut style: NodeStyle) -> NodeStyle {
        style.radius *= self.scale;
        if let Some(fill) = self.fill {
            style.fill = fill;
        }
        style
    }
}

#[derive(Debug)]
pub struct AnimationOrchestrator {
    settings: AnimationSettings,
    hover: HoverGrowth,
    flash: Option<FlashSequence>,
    next_token: u64,
    camera: Camera,
    camera_tween: Option<CameraTween>,
}

impl AnimationOrchestrator {
    pub fn new(settings: AnimationSettings) -> Self {
        Self {
            settings,
            hover: HoverGrowth::default(),
            flash: None,
            next_token: 1,
            camera: Camera::default(),
            camera_tween: None,
        }
    }

    pub fn settings(&self) -> &AnimationSettings {
        &self.settings
    }

    pub fn hover_enter(&mut self, node: usize, now: f64) {
        self.hover
            .enter(node, now, self.settings.hover_scale, self.settings.hover_secs);
    }

    pub fn hover_leave(&mut self, node: usize, now: f64, keep: bool) {
        self.hover.leave(node, now, self.settings.hover_secs, keep);
    }

    /// Selected or hovered nodes keep their growth; everything else snaps back.
    pub fn selection_changed(&mut self, selected: Option<usize>, hovered: Option<usize>) {
        self.hover
            .snap_back_except(|node| Some(node) == selected || Some(node) == hovered);
    }

    pub fn start_flash(&mut self, node: usize, now: f64, accent: Color32) -> FlashToken {
        let token = FlashToken(self.next_token);
        self.next_token += 1;
        if self.flash.is_some() {
            debug!(node, "replacing in-flight flash");
        }
        self.flash = Some(FlashSequence::new(node, token, now, accent, &self.settings));
        token
    }

    /// Stops the flash started under `token`. A stale token, from a run that
    /// already ended or was replaced, leaves the current flash alone.
    pub fn cancel_flash(&mut self, token: FlashToken) -> bool {
        if self.flash.as_ref().is_some_and(|flash| flash.token == token) {
            self.flash = None;
            return true;
        }
        false
    }

    pub fn camera(&self) -> Camera {
        self.camera
    }

    pub fn fit_camera_to(&mut self, target: Camera, now: f64, duration: f32) {
        self.camera_tween = Some(CameraTween::new(self.camera, target, now, duration));
    }

    /// Hands the camera to the user; any fit in flight stops where it is.
    pub fn camera_mut(&mut self) -> &mut Camera {
        if self.camera_tween.take().is_some() {
            debug!("user camera input cancelled fit");
        }
        &mut self.camera
    }

    /// Advances every animation. Returns `true` while anything still moves.
    pub fn tick(&mut self, now: f64) -> bool {
        let hovering = self.hover.tick(now);

        if let Some(tween) = self.camera_tween {
            self.camera = tween.camera(now);
            if tween.is_finished(now) {
                self.camera = tween.target();
                self.camera_tween = None;
            }
        }

        if self
            .flash
            .as_ref()
            .is_some_and(|flash| flash.overlay(now).is_none())
        {
            self.flash = None;
        }

        hovering || self.camera_tween.is_some() || self.flash.is_some()
    }

    pub fn node_overlay(&self, node: usize, now: f64) -> Overlay {
        let mut overlay = Overlay {
            scale: self.hover.scale(node, now),
            fill: None,
        };
        if let Some(flash) = self.flash.as_ref().filter(|flash| flash.node == node)
            && let Some(pulse) = flash.overlay(now)
        {
            overlay.scale = overlay.scale.max(pulse.scale);
            overlay.fill = pulse.fill;
        }
        overlay
    }

    /// Drops every transient effect; used when the graph is rebuilt.
    pub fn cancel_all(&mut self) {
        self.hover.clear();
        self.flash = None;
        self.camera_tween = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::style::ACCENT;

    fn style() -> NodeStyle {
        NodeStyle {
            fill: Color32::from_rgb(0, 240, 255),
            radius: 16.0,
            opacity: 1.0,
            border_color: Color32::from_rgb(0, 240, 255),
            border_width: 1.0,
            bold_label: false,
        }
    }

    #[test]
    fn flash_round_trip_restores_committed_style() {
        let mut animations = AnimationOrchestrator::new(AnimationSettings::default());
        let committed = style();
        animations.start_flash(2, 0.0, ACCENT);

        let mid = animations.node_overlay(2, 0.25).apply(committed);
        assert_eq!(mid.fill, ACCENT);
        assert!(mid.radius > committed.radius);

        let mut now = 0.0;
        while animations.tick(now) {
            now += 1.0 / 60.0;
        }
        assert!(animations.node_overlay(2, now).is_identity());
        assert_eq!(animations.node_overlay(2, now).apply(committed), committed);
    }

    #[test]
    fn new_flash_replaces_the_old_one() {
        let mut animations = AnimationOrchestrator::new(AnimationSettings::default());
        let first = animations.start_flash(1, 0.0, ACCENT);
        let second = animations.start_flash(3, 0.1, ACCENT);

        assert_ne!(first, second);
        assert!(animations.node_overlay(1, 0.3).is_identity());
        assert!(!animations.node_overlay(3, 0.3).is_identity());
    }

    #[test]
    fn cancelled_flash_leaves_no_overlay() {
        let mut animations = AnimationOrchestrator::new(AnimationSettings::default());
        let token = animations.start_flash(0, 0.0, ACCENT);
        assert!(animations.cancel_flash(token));
        assert!(animations.node_overlay(0, 0.25).is_identity());
        assert!(!animations.tick(0.25));
    }

    #[test]
    fn stale_token_cannot_cancel_a_newer_flash() {
        let mut animations = AnimationOrchestrator::new(AnimationSettings::default());
        let first = animations.start_flash(1, 0.0, ACCENT);
        animations.start_flash(1, 0.1, ACCENT);

        assert!(!animations.cancel_flash(first));
        assert_eq!(animations.node_overlay(1, 0.35).fill, Some(ACCENT));
    }

    #[test]
    fn user_input_cancels_camera_fit() {
        let mut animations = AnimationOrchestrator::new(AnimationSettings::default());
        let target = Camera {
            zoom: 2.5,
            ..Camera::default()
        };
        animations.fit_camera_to(target, 0.0, 0.5);
        assert!(animations.tick(0.25));

        animations.camera_mut().zoom *= 1.2;
        let zoom = animations.camera().zoom;
        assert!(!animations.tick(1.0));
        assert_eq!(animations.camera().zoom, zoom);
    }

    #[test]
    fn camera_fit_lands_on_target() {
        let mut animations = AnimationOrchestrator::new(AnimationSettings::default());
        let target = Camera {
            zoom: 0.5,
            ..Camera::default()
        };
        animations.fit_camera_to(target, 0.0, 0.5);
        assert!(!animations.tick(0.6));
        assert_eq!(animations.camera(), target);
    }

    #[test]
    fn hover_and_flash_combine_without_stacking() {
        let mut animations = AnimationOrchestrator::new(AnimationSettings::default());
        animations.hover_enter(5, 0.0);
        animations.start_flash(5, 0.0, ACCENT);
        let overlay = animations.node_overlay(5, 0.5);
        assert!((overlay.scale - 1.6).abs() < 1e-6);
    }
}
