// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar for mode, shape and view controls.

use drawzone::models::mode::{DrawMode, ShapeKind};
use drawzone::ZoneOptions;

/// View commands issued from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    ZoomIn,
    ZoomOut,
    ResetView,
}

/// Display the toolbar. Edits `options` in place and reports whether it changed.
pub fn show(ui: &mut egui::Ui, options: &mut ZoneOptions) -> (bool, ToolbarAction) {
    let before = options.clone();
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Mode:");
        ui.selectable_value(&mut options.mode, DrawMode::Draw, "✏ Draw");
        ui.selectable_value(&mut options.mode, DrawMode::None, "✋ Pan");

        ui.separator();

        ui.label("Shape:");
        ui.selectable_value(&mut options.shape, ShapeKind::Rect, "▭ Rectangle");
        ui.selectable_value(&mut options.shape, ShapeKind::Poly, "▱ Polygon");
        ui.selectable_value(&mut options.shape, ShapeKind::None, "⬆ Select");

        ui.separator();

        ui.checkbox(&mut options.draw_on_pointer_down, "Place on press");
        ui.checkbox(&mut options.disabled, "Lock");

        ui.separator();

        if ui.button("➕").on_hover_text("Zoom in").clicked() {
            action = ToolbarAction::ZoomIn;
        }
        if ui.button("➖").on_hover_text("Zoom out").clicked() {
            action = ToolbarAction::ZoomOut;
        }
        if ui.button("⟲").on_hover_text("Reset view").clicked() {
            action = ToolbarAction::ResetView;
        }

        ui.separator();

        let hint = if options.disabled {
            "Locked: drag to pan, scroll to zoom"
        } else {
            match (options.mode, options.shape) {
                (DrawMode::None, _) | (_, ShapeKind::None) => {
                    "Drag to pan, click a region to select it"
                }
                (DrawMode::Draw, ShapeKind::Rect) => {
                    "Drag to draw a rectangle, drag handles to resize"
                }
                (DrawMode::Draw, ShapeKind::Poly) => {
                    "Click to add vertices, click the first vertex or press Enter to close"
                }
            }
        };
        ui.label(egui::RichText::new(hint).italics().weak());
    });

    (*options != before, action)
}
