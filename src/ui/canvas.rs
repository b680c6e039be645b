// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for image display and region drawing.
//!
//! This module forwards raw egui mouse, wheel and touch input to the
//! [`DrawZone`] engine and paints whatever state the engine holds. Nothing is
//! read back from what was painted.

use drawzone::models::element::Element;
use drawzone::models::mode::ShapeKind;
use drawzone::util::geometry::{Point, ScreenPoint, ScreenRect, ViewTransform};
use drawzone::zone::draft::Draft;
use drawzone::zone::input::{Modifiers, PointerButton, PointerId, PointerInput, PointerKind};
use drawzone::{DrawZone, ZoneEvent};

/// Mouse input always arrives under this id.
const MOUSE_POINTER: PointerId = PointerId(0);

/// Touch ids are shifted past the mouse id.
const TOUCH_ID_BASE: u64 = 1;

const ELEMENT_COLOR: egui::Color32 = egui::Color32::YELLOW;
const SELECTED_COLOR: egui::Color32 = egui::Color32::LIGHT_BLUE;
const DRAFT_COLOR: egui::Color32 = egui::Color32::WHITE;

/// Display the canvas, feed it input and return the engine's events.
pub fn show(
    ui: &mut egui::Ui,
    zone: &mut DrawZone,
    image_texture: Option<&egui::TextureHandle>,
) -> Vec<ZoneEvent> {
    // Set background color
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let (response, painter) =
        ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
    let area = response.rect;
    painter.rect_filled(area, 0.0, egui::Color32::from_gray(40));

    zone.set_screen_bounds(ScreenRect::new(
        f64::from(area.min.x),
        f64::from(area.min.y),
        f64::from(area.width()),
        f64::from(area.height()),
    ));

    let events = forward_input(ui, zone, area, response.hover_pos());

    let Some(transform) = zone.view_transform() else {
        painter.text(
            area.center(),
            egui::Align2::CENTER_CENTER,
            "Open an image to begin drawing regions",
            egui::FontId::proportional(16.0),
            egui::Color32::from_gray(180),
        );
        return events;
    };

    // Draw the image where the drawing plane lands on screen
    if let (Some(texture), Some(size)) = (image_texture, zone.image_size()) {
        let image_rect = egui::Rect::from_min_max(
            to_pos(transform.to_screen(Point::new(0.0, 0.0))),
            to_pos(transform.to_screen(Point::new(size.width, size.height))),
        );
        painter.image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );
    }

    let shape = zone.options().shape;
    for element in zone.elements() {
        draw_element(&painter, element, shape, &transform);
    }
    if let Some(draft) = zone.draft() {
        draw_draft(&painter, draft, &transform);
    }
    for (_, position) in zone.handles() {
        let center = to_pos(position);
        painter.circle_filled(center, 4.0, SELECTED_COLOR);
        painter.circle_stroke(center, 4.0, egui::Stroke::new(1.0, egui::Color32::BLACK));
    }

    events
}

/// Translate this frame's raw input into engine calls.
fn forward_input(
    ui: &egui::Ui,
    zone: &mut DrawZone,
    area: egui::Rect,
    hover: Option<egui::Pos2>,
) -> Vec<ZoneEvent> {
    let (raw_events, touching, scroll) =
        ui.input(|i| (i.events.clone(), i.any_touches(), i.raw_scroll_delta));
    let mut events = Vec::new();

    for event in raw_events {
        match event {
            // egui mirrors the first finger as mouse events; touches are
            // handled on their own below.
            egui::Event::PointerButton {
                pos,
                button,
                pressed,
                modifiers,
            } if !touching => {
                let Some(button) = map_button(button) else {
                    continue;
                };
                let input = PointerInput {
                    id: MOUSE_POINTER,
                    kind: PointerKind::Mouse,
                    button,
                    position: to_screen(pos),
                    modifiers: map_modifiers(modifiers),
                };
                if pressed && area.contains(pos) {
                    events.extend(zone.pointer_down(input));
                } else if !pressed {
                    events.extend(zone.pointer_up(input));
                }
            }
            egui::Event::PointerMoved(pos) if !touching => {
                let input = PointerInput::mouse(f64::from(pos.x), f64::from(pos.y));
                events.extend(zone.pointer_move(input));
            }
            egui::Event::PointerGone => {
                events.extend(zone.pointer_cancel(MOUSE_POINTER));
            }
            egui::Event::Touch { id, phase, pos, .. } => {
                let input =
                    PointerInput::touch(TOUCH_ID_BASE + id.0, f64::from(pos.x), f64::from(pos.y));
                match phase {
                    egui::TouchPhase::Start if area.contains(pos) => {
                        events.extend(zone.pointer_down(input));
                    }
                    egui::TouchPhase::Start => {}
                    egui::TouchPhase::Move => events.extend(zone.pointer_move(input)),
                    egui::TouchPhase::End => events.extend(zone.pointer_up(input)),
                    egui::TouchPhase::Cancel => events.extend(zone.pointer_cancel(input.id)),
                }
            }
            _ => {}
        }
    }

    if let Some(pos) = hover {
        if scroll.y != 0.0 {
            // egui reports scrolling up as positive
            zone.wheel(to_screen(pos), -f64::from(scroll.y));
        }
    }

    events
}

fn map_button(button: egui::PointerButton) -> Option<PointerButton> {
    match button {
        egui::PointerButton::Primary => Some(PointerButton::Primary),
        egui::PointerButton::Secondary => Some(PointerButton::Secondary),
        egui::PointerButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

fn map_modifiers(modifiers: egui::Modifiers) -> Modifiers {
    Modifiers { alt: modifiers.alt }
}

fn to_screen(pos: egui::Pos2) -> ScreenPoint {
    ScreenPoint::new(f64::from(pos.x), f64::from(pos.y))
}

fn to_pos(point: ScreenPoint) -> egui::Pos2 {
    egui::pos2(point.x as f32, point.y as f32)
}

/// Draw a committed element.
fn draw_element(
    painter: &egui::Painter,
    element: &Element,
    shape: ShapeKind,
    transform: &ViewTransform,
) {
    let color = if element.selected {
        SELECTED_COLOR
    } else {
        ELEMENT_COLOR
    };
    let stroke = egui::Stroke::new(2.0, color);

    let outline: Vec<egui::Pos2> = if element.is_rectangle(shape) {
        element
            .rect()
            .corners()
            .iter()
            .map(|p| to_pos(transform.to_screen(*p)))
            .collect()
    } else {
        element
            .points()
            .iter()
            .map(|p| to_pos(transform.to_screen(*p)))
            .collect()
    };
    painter.add(egui::Shape::closed_line(outline.clone(), stroke));

    if !element.label.is_empty() {
        if let Some(anchor) = outline.first() {
            painter.text(
                *anchor + egui::vec2(2.0, -2.0),
                egui::Align2::LEFT_BOTTOM,
                &element.label,
                egui::FontId::proportional(13.0),
                color,
            );
        }
    }
}

/// Draw the shape under construction.
fn draw_draft(painter: &egui::Painter, draft: &Draft, transform: &ViewTransform) {
    let stroke = egui::Stroke::new(1.5, DRAFT_COLOR);

    if let Some(overlay) = draft.overlay() {
        let rect = egui::Rect::from_two_pos(
            to_pos(transform.to_screen(overlay.min())),
            to_pos(transform.to_screen(overlay.max())),
        );
        painter.rect_stroke(rect, 0.0, stroke);
    }

    if let Draft::Polygon { vertices, .. } = draft {
        let points: Vec<egui::Pos2> = vertices
            .iter()
            .map(|p| to_pos(transform.to_screen(*p)))
            .collect();
        painter.add(egui::Shape::line(points.clone(), stroke));
        for point in &points {
            painter.circle_filled(*point, 4.0, DRAFT_COLOR);
            painter.circle_stroke(*point, 4.0, egui::Stroke::new(1.0, egui::Color32::BLACK));
        }
    }

    if let Some((from, to)) = draft.rubber_band() {
        painter.line_segment(
            [to_pos(transform.to_screen(from)), to_pos(transform.to_screen(to))],
            egui::Stroke::new(1.0, egui::Color32::from_gray(200)),
        );
    }
}
