// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Engine configuration.
//!
//! Every interaction threshold is a setting rather than a constant, because
//! touch targets need larger tolerances than a mouse does.

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::io::serialization;
use crate::zone::input::PointerKind;

/// A screen-pixel distance that depends on the kind of pointer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    pub mouse: f64,
    pub touch: f64,
}

impl Tolerance {
    pub const fn new(mouse: f64, touch: f64) -> Self {
        Self { mouse, touch }
    }

    /// Pens are as precise as a mouse.
    pub fn for_kind(&self, kind: PointerKind) -> f64 {
        match kind {
            PointerKind::Touch => self.touch,
            PointerKind::Mouse | PointerKind::Pen => self.mouse,
        }
    }
}

/// Tunable settings of a [`DrawZone`](crate::zone::DrawZone).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneConfig {
    /// Smallest zoom factor (image width / view box width).
    pub min_zoom: f64,
    /// Largest zoom factor.
    pub max_zoom: f64,
    /// Factor applied by a single zoom-in or zoom-out step.
    pub zoom_step: f64,
    /// Factor applied per wheel notch.
    pub wheel_zoom_step: f64,
    /// A marquee must be larger than this on screen, in both directions, to
    /// become an element.
    pub min_draft_size: Tolerance,
    /// How close to the first vertex a click must land to close a polygon.
    pub close_tolerance: Tolerance,
    /// Grab radius of resize and vertex handles.
    pub handle_tolerance: Tolerance,
    /// Size of a rectangle placed on pointer-down, as a fraction of the
    /// image, when there is neither a previous rectangle nor a template.
    pub default_rect_fraction: f64,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.2,
            max_zoom: 20.0,
            zoom_step: 1.2,
            wheel_zoom_step: 1.1,
            min_draft_size: Tolerance::new(4.0, 12.0),
            close_tolerance: Tolerance::new(8.0, 20.0),
            handle_tolerance: Tolerance::new(6.0, 16.0),
            default_rect_fraction: 0.2,
        }
    }
}

impl ZoneConfig {
    /// Check the settings for values the engine cannot work with.
    pub fn validate(&self) -> crate::error::Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.min_zoom) || !positive(self.max_zoom) {
            return Err(Error::InvalidConfig("zoom bounds must be positive".into()));
        }
        if self.min_zoom > self.max_zoom {
            return Err(Error::InvalidConfig(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.zoom_step > 1.0 && self.wheel_zoom_step > 1.0) {
            return Err(Error::InvalidConfig("zoom steps must be greater than 1".into()));
        }
        if !(self.default_rect_fraction > 0.0 && self.default_rect_fraction <= 1.0) {
            return Err(Error::InvalidConfig(
                "default_rect_fraction must be in (0, 1]".into(),
            ));
        }
        Ok(())
    }
}

/// Load and validate a configuration file (YAML or JSON, by extension).
pub fn load(path: &Path) -> Result<ZoneConfig> {
    let config: ZoneConfig = serialization::read_by_extension(path)?;
    config.validate()?;
    log::info!("Loaded configuration from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ZoneConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: ZoneConfig = serde_yaml::from_str("max_zoom: 8.0\nclose_tolerance:\n  mouse: 5.0\n  touch: 30.0\n").unwrap();
        assert_eq!(config.max_zoom, 8.0);
        assert_eq!(config.close_tolerance.for_kind(PointerKind::Touch), 30.0);
        assert_eq!(config.close_tolerance.for_kind(PointerKind::Pen), 5.0);
        assert_eq!(config.zoom_step, 1.2);
    }

    #[test]
    fn test_inverted_zoom_bounds_rejected() {
        let config = ZoneConfig {
            min_zoom: 4.0,
            max_zoom: 2.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_load_from_json_file() {
        let path = std::env::temp_dir().join(format!("drawzone-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"min_zoom": 0.5, "wheel_zoom_step": 1.05}"#).unwrap();

        let config = load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.min_zoom, 0.5);
        assert_eq!(config.wheel_zoom_step, 1.05);
    }
}
