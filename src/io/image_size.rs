// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Memoized image pixel sizes.
//!
//! The cache belongs to whoever creates it, usually the host for the
//! lifetime of one mounted surface. Nothing here is global.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::util::geometry::Size;

/// Image sizes keyed by source string.
#[derive(Debug, Default)]
pub struct ImageSizeCache {
    entries: HashMap<String, Size>,
}

impl ImageSizeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, source: &str) -> Option<Size> {
        self.entries.get(source).copied()
    }

    /// Return the cached size, probing the image header on a miss.
    /// A failed probe caches nothing.
    pub fn get_or_load(&mut self, source: &str) -> Result<Size> {
        if let Some(size) = self.get(source) {
            return Ok(size);
        }
        let (width, height) = image::image_dimensions(source).map_err(|cause| Error::ImageLoad {
            path: source.to_string(),
            cause,
        })?;
        let size = Size::new(f64::from(width), f64::from(height));
        log::debug!("Cached size of {}: {}x{}", source, width, height);
        self.entries.insert(source.to_string(), size);
        Ok(size)
    }

    /// Record a size learned elsewhere, e.g. from a full decode.
    pub fn insert(&mut self, source: impl Into<String>, size: Size) {
        self.entries.insert(source.into(), size);
    }

    pub fn evict(&mut self, source: &str) -> Option<Size> {
        self.entries.remove(source)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
