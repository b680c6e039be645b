// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation document.
//!
//! The host-side record of one annotated image: where the image came from,
//! its native size, and the element list in image pixel space.

use super::{element::Element, mode::ShapeKind};
use serde::{Deserialize, Serialize};

/// Complete document data for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub image_source: String,
    pub image_width: u32,
    pub image_height: u32,
    #[serde(default)]
    pub shape: ShapeKind,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Document {
    /// Create an empty document for the given image.
    pub fn new(image_source: String, image_width: u32, image_height: u32) -> Self {
        Self {
            image_source,
            image_width,
            image_height,
            shape: ShapeKind::default(),
            elements: Vec::new(),
        }
    }
}
