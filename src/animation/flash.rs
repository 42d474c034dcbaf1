use eframe::egui::Color32;

use super::AnimationSettings;
use super::Overlay;
use super::tween::ease_in_out;

/// Identity of one flash run, handed back so the caller can cancel exactly
/// that run and not a later one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlashToken(pub(super) u64);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FlashStep {
    Grow { duration: f32 },
    Color { fill: Option<Color32>, duration: f32 },
    Shrink { duration: f32 },
}

impl FlashStep {
    fn duration(self) -> f32 {
        match self {
            Self::Grow { duration } | Self::Color { duration, .. } | Self::Shrink { duration } => {
                duration
            }
        }
    }
}

/// Grow, alternate accent/base fill, shrink, then nothing.
#[derive(Clone, Debug, PartialEq)]
pub struct FlashSequence {
    pub node: usize,
    pub token: FlashToken,
    started: f64,
    peak: f32,
    steps: Vec<FlashStep>,
}

impl FlashSequence {
    pub fn new(node: usize, token: FlashToken, now: f64, accent: Color32, settings: &AnimationSettings) -> Self {
        let mut steps = vec![FlashStep::Grow {
            duration: settings.flash_grow_secs,
        }];
        for _ in 0..settings.flash_alternations {
            steps.push(FlashStep::Color {
                fill: Some(accent),
                duration: settings.flash_color_secs,
            });
            steps.push(FlashStep::Color {
                fill: None,
                duration: settings.flash_color_secs,
            });
        }
        steps.push(FlashStep::Shrink {
            duration: settings.flash_shrink_secs,
        });

        Self {
            node,
            token,
            started: now,
            peak: settings.flash_scale,
            steps,
        }
    }

    /// Overlay at `now`, or `None` once every step has run.
    pub fn overlay(&self, now: f64) -> Option<Overlay> {
        let mut elapsed = (now - self.started).max(0.0) as f32;
        for step in &self.steps {
            let duration = step.duration();
            if elapsed < duration {
                let t = if duration > 0.0 {
                    ease_in_out(elapsed / duration)
                } else {
                    1.0
                };
                return Some(match *step {
                    FlashStep::Grow { .. } => Overlay {
                        scale: 1.0 + (self.peak - 1.0) * t,
                        fill: None,
                    },
                    FlashStep::Color { fill, .. } => Overlay {
                        scale: self.peak,
                        fill,
                    },
                    FlashStep::Shrink { .. } => Overlay {
                        scale: self.peak + (1.0 - self.peak) * t,
                        fill: None,
                    },
                });
            }
            elapsed -= duration;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence() -> FlashSequence {
        FlashSequence::new(4, FlashToken(1), 0.0, Color32::GOLD, &AnimationSettings::default())
    }

    #[test]
    fn default_sequence_shape() {
        let flash = sequence();
        assert_eq!(flash.steps.len(), 6);
        assert!(matches!(flash.steps[0], FlashStep::Grow { .. }));
        assert!(matches!(flash.steps[5], FlashStep::Shrink { .. }));
        let total = flash.steps.iter().map(|step| step.duration()).sum::<f32>();
        assert!((total - 1.0).abs() < 1e-5);
    }

    #[test]
    fn overlay_walks_through_the_steps() {
        let flash = sequence();
        let grown = flash.overlay(0.1).expect("growing");
        assert!(grown.scale > 1.0 && grown.scale < 1.6);

        assert_eq!(flash.overlay(0.25).and_then(|o| o.fill), Some(Color32::GOLD));
        assert_eq!(flash.overlay(0.4).and_then(|o| o.fill), None);
        assert_eq!(flash.overlay(0.55).and_then(|o| o.fill), Some(Color32::GOLD));
        assert!((flash.overlay(0.7).map_or(0.0, |o| o.scale) - 1.6).abs() < 1e-6);
    }

    #[test]
    fn overlay_is_gone_after_the_last_step() {
        let flash = sequence();
        assert!(flash.overlay(0.95).is_some());
        assert_eq!(flash.overlay(1.01), None);
    }
}
