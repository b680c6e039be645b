// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Raw pointer input as the host reports it.

use crate::util::geometry::ScreenPoint;

/// Identifier of one pointer (mouse, finger or pen) for the life of a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
    Pen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Held to pan instead of draw or edit.
    pub alt: bool,
}

/// One pointer sample in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub id: PointerId,
    pub kind: PointerKind,
    pub button: PointerButton,
    pub position: ScreenPoint,
    pub modifiers: Modifiers,
}

impl PointerInput {
    /// A primary-button mouse sample.
    pub fn mouse(x: f64, y: f64) -> Self {
        Self {
            id: PointerId(0),
            kind: PointerKind::Mouse,
            button: PointerButton::Primary,
            position: ScreenPoint::new(x, y),
            modifiers: Modifiers::default(),
        }
    }

    /// A finger sample with the given touch id.
    pub fn touch(id: u64, x: f64, y: f64) -> Self {
        Self {
            id: PointerId(id),
            kind: PointerKind::Touch,
            ..Self::mouse(x, y)
        }
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}
