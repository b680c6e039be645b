// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing mode and shape kind.
//!
//! These are host configuration, not per-element state. They decide how new
//! elements are drafted and how existing ones are re-serialized.

use serde::{Deserialize, Serialize};

/// Global draw mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawMode {
    #[default]
    Draw,
    None,
}

/// Kind of shape drafted in [`DrawMode::Draw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Rect,
    Poly,
    None,
}
