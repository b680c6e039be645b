// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Element properties panel.
//!
//! This module lists the drawn regions and lets the user select, relabel
//! or delete them. Edits are reported back as actions; the panel never
//! mutates the element list itself.

use drawzone::Element;

/// Actions triggered from the properties panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertiesAction {
    None,
    Select(String),
    Relabel(String, String),
    Delete(String),
}

/// Display the element list.
pub fn show(ui: &mut egui::Ui, elements: &[Element]) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    ui.heading("Regions");
    ui.separator();

    if elements.is_empty() {
        ui.label(egui::RichText::new("No regions drawn").weak());
        return action;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for (index, element) in elements.iter().enumerate() {
            ui.push_id(&element.id, |ui| {
                ui.horizontal(|ui| {
                    let title = if element.label.is_empty() {
                        format!("#{}", index + 1)
                    } else {
                        element.label.clone()
                    };
                    if ui.selectable_label(element.selected, title).clicked() {
                        action = PropertiesAction::Select(element.id.clone());
                    }
                    if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                        action = PropertiesAction::Delete(element.id.clone());
                    }
                });

                if element.selected {
                    let mut label = element.label.clone();
                    let edit = ui.text_edit_singleline(&mut label);
                    if edit.changed() {
                        action = PropertiesAction::Relabel(element.id.clone(), label);
                    }

                    let rect = element.rect();
                    ui.label(
                        egui::RichText::new(format!(
                            "{} points, {}x{} at ({}, {})",
                            element.points().len(),
                            rect.width,
                            rect.height,
                            rect.x,
                            rect.y
                        ))
                        .small()
                        .weak(),
                    );
                }
            });
            ui.separator();
        }
    });

    action
}
