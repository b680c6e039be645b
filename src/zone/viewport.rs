// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! View box and viewport controller.
//!
//! The view box is the window, in drawing-plane units, that is fitted into
//! the on-screen container. Zooming rescales it around a fixed point,
//! panning translates it. Panning is not clamped; only the zoom span is.

use serde::{Deserialize, Serialize};

use crate::config::ZoneConfig;
use crate::util::geometry::{Point, ScreenRect, Size, ViewTransform};

/// Visible window over the drawing plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    /// The view box exactly covering an image.
    pub fn covering(size: Size) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: size.width,
            height: size.height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Rescale by `factor` keeping `point` at the same screen position.
    /// `factor < 1` zooms in.
    pub fn zoomed_at(&self, point: Point, factor: f64) -> Self {
        Self {
            x: self.x - (point.x - self.x) * (factor - 1.0),
            y: self.y - (point.y - self.y) * (factor - 1.0),
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    pub fn panned(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Fit the view box into the container, preserving aspect ratio and
    /// centering along the slack axis. `None` for an empty container.
    pub fn screen_transform(&self, bounds: ScreenRect) -> Option<ViewTransform> {
        if bounds.is_empty() || !(self.width > 0.0 && self.height > 0.0) {
            return None;
        }
        let scale = (bounds.width / self.width).min(bounds.height / self.height);
        let pad_x = (bounds.width - self.width * scale) / 2.0;
        let pad_y = (bounds.height - self.height * scale) / 2.0;
        Some(ViewTransform {
            scale_x: scale,
            scale_y: scale,
            translate_x: bounds.left + pad_x - self.x * scale,
            translate_y: bounds.top + pad_y - self.y * scale,
        })
    }
}

/// Owns the view box over one image and enforces the zoom bounds.
#[derive(Debug, Clone)]
pub struct Viewport {
    image: Size,
    view_box: ViewBox,
    min_zoom: f64,
    max_zoom: f64,
    zoom_step: f64,
}

impl Viewport {
    pub fn new(image: Size, config: &ZoneConfig) -> Self {
        Self {
            image,
            view_box: ViewBox::covering(image),
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            zoom_step: config.zoom_step,
        }
    }

    pub fn view_box(&self) -> ViewBox {
        self.view_box
    }

    pub fn image_size(&self) -> Size {
        self.image
    }

    /// Current zoom factor relative to the image's native size.
    pub fn zoom(&self) -> f64 {
        self.image.width / self.view_box.width
    }

    /// Zoom around a drawing-plane point. A factor that would leave the
    /// zoom bounds is clamped. Returns the factor actually applied.
    pub fn zoom_at(&mut self, point: Point, factor: f64) -> f64 {
        if !(factor.is_finite() && factor > 0.0) {
            log::debug!("Ignoring zoom factor {}", factor);
            return 1.0;
        }
        let current = self.zoom();
        let target = (current / factor).clamp(self.min_zoom, self.max_zoom);
        let applied = current / target;
        if (applied - 1.0).abs() < f64::EPSILON {
            return 1.0;
        }
        self.view_box = self.view_box.zoomed_at(point, applied);
        log::trace!("Zoomed by {:.4} to {:.3}x", applied, target);
        applied
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.zoom_at(self.view_box.center(), 1.0 / self.zoom_step)
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.zoom_at(self.view_box.center(), self.zoom_step)
    }

    /// Translate the view box by a drawing-plane delta.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.view_box = self.view_box.panned(dx, dy);
    }

    pub fn reset(&mut self) {
        self.view_box = ViewBox::covering(self.image);
    }

    pub fn transform(&self, bounds: ScreenRect) -> Option<ViewTransform> {
        self.view_box.screen_transform(bounds)
    }
}
