use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::animation::{AnimationSettings, CameraSettings};
use crate::layout::{ForceLayoutConfig, LayoutSettings};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings JSON in {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("`{field}` must be {expected}, got {value}")]
    OutOfRange {
        field: String,
        expected: &'static str,
        value: f64,
    },
}

/// Tunables for layout, animation and camera. Every field has a default, so
/// a settings file only needs the values it overrides. Fields missing from a
/// partial `layout.ego` block take the full-mode defaults.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub layout: LayoutSettings,
    pub animation: AnimationSettings,
    pub camera: CameraSettings,
}

fn out_of_range(field: &str, expected: &'static str, value: f64) -> SettingsError {
    SettingsError::OutOfRange {
        field: field.to_owned(),
        expected,
        value,
    }
}

fn positive(field: &str, value: f32) -> Result<(), SettingsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(out_of_range(field, "a positive number", f64::from(value)))
    }
}

fn non_negative(field: &str, value: f32) -> Result<(), SettingsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(out_of_range(field, "zero or more", f64::from(value)))
    }
}

fn validate_force(mode: &str, config: &ForceLayoutConfig) -> Result<(), SettingsError> {
    let field = |name: &str| format!("layout.{mode}.{name}");

    if config.iterations == 0 {
        return Err(out_of_range(&field("iterations"), "at least 1", 0.0));
    }
    if !(config.cooling_factor > 0.0 && config.cooling_factor < 1.0) {
        return Err(out_of_range(
            &field("cooling_factor"),
            "between 0 and 1 (exclusive)",
            f64::from(config.cooling_factor),
        ));
    }
    positive(&field("initial_temperature"), config.initial_temperature)?;
    positive(&field("min_temperature"), config.min_temperature)?;
    positive(&field("ideal_edge_length"), config.ideal_edge_length)?;
    non_negative(&field("node_repulsion"), config.node_repulsion)?;
    non_negative(&field("node_overlap"), config.node_overlap)?;
    non_negative(&field("edge_elasticity"), config.edge_elasticity)?;
    non_negative(&field("gravity"), config.gravity)?;
    non_negative(&field("settle_threshold"), config.settle_threshold)
}

impl EngineSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_force("full", &self.layout.full)?;
        validate_force("ego", &self.layout.ego)?;
        positive("layout.path.layer_gap", self.layout.path.layer_gap)?;
        positive("layout.path.node_gap", self.layout.path.node_gap)?;
        if self.layout.iterations_per_frame == 0 {
            return Err(out_of_range("layout.iterations_per_frame", "at least 1", 0.0));
        }

        let animation = &self.animation;
        positive("animation.hover_scale", animation.hover_scale)?;
        positive("animation.flash_scale", animation.flash_scale)?;
        non_negative("animation.hover_secs", animation.hover_secs)?;
        non_negative("animation.flash_grow_secs", animation.flash_grow_secs)?;
        non_negative("animation.flash_color_secs", animation.flash_color_secs)?;
        non_negative("animation.flash_shrink_secs", animation.flash_shrink_secs)?;

        let camera = &self.camera;
        positive("camera.min_zoom", camera.min_zoom)?;
        if !(camera.max_zoom.is_finite() && camera.max_zoom >= camera.min_zoom) {
            return Err(out_of_range(
                "camera.max_zoom",
                "at least camera.min_zoom",
                f64::from(camera.max_zoom),
            ));
        }
        non_negative("camera.fit_secs", camera.fit_secs)?;
        non_negative("camera.neighborhood_padding", camera.neighborhood_padding)?;
        non_negative("camera.single_padding", camera.single_padding)?;
        non_negative("camera.reset_padding", camera.reset_padding)?;
        positive("camera.zoom_in_step", camera.zoom_in_step)?;
        positive("camera.zoom_out_step", camera.zoom_out_step)?;
        non_negative("camera.wheel_sensitivity", camera.wheel_sensitivity)
    }
}

pub fn load_settings(path: &Path) -> Result<EngineSettings, SettingsError> {
    let raw = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let settings: EngineSettings =
        serde_json::from_str(&raw).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    settings.validate()?;
    info!(path = %path.display(), "loaded engine settings");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        EngineSettings::default().validate().expect("defaults validate");
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let settings: EngineSettings =
            serde_json::from_str(r#"{"layout": {"ego": {"gravity": 0.1}}, "camera": {"max_zoom": 4.0}}"#)
                .expect("parses");

        assert_eq!(settings.layout.ego.gravity, 0.1);
        assert_eq!(settings.layout.ego.node_repulsion, ForceLayoutConfig::full().node_repulsion);
        assert_eq!(settings.layout.full, ForceLayoutConfig::full());
        assert_eq!(settings.camera.max_zoom, 4.0);
        assert_eq!(settings.camera.min_zoom, 0.3);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let mut settings = EngineSettings::default();
        settings.layout.full.cooling_factor = 1.2;
        let error = settings.validate().expect_err("cooling above 1");
        assert!(error.to_string().starts_with("`layout.full.cooling_factor`"));

        let mut settings = EngineSettings::default();
        settings.camera.max_zoom = 0.1;
        let error = settings.validate().expect_err("max below min");
        assert!(matches!(error, SettingsError::OutOfRange { ref field, .. } if field == "camera.max_zoom"));
    }

    #[test]
    fn load_reports_missing_file() {
        let error = load_settings(Path::new("/definitely/not/here.json")).expect_err("missing");
        assert!(matches!(error, SettingsError::Read { .. }));
    }
}
