// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The drawing surface engine.
//!
//! [`DrawZone`] turns raw pointer and wheel input into viewport changes and
//! element-list updates. It never renders and never reads geometry back from
//! a rendering: the element list and the view box are the only truth, and a
//! host draws whatever they say.
//!
//! Every handler returns the [`ZoneEvent`]s the host should act on. A
//! [`ZoneEvent::Changed`] list has always passed through
//! [`normalize`](crate::models::element::normalize).

pub mod draft;
pub mod gesture;
pub mod input;
pub mod viewport;

use crate::config::ZoneConfig;
use crate::models::element::{deselect_all, normalize, select, update, Element, ElementPatch};
use crate::models::mode::{DrawMode, ShapeKind};
use crate::util::geometry::{
    to_drawing_plane, InverseTransform, Point, Rect, ScreenPoint, ScreenRect, Size, ViewTransform,
};

use draft::{Draft, PolygonStep};
use gesture::{
    classify, drag_handle, handle_origin, handle_points, Drag, GestureState, Handle, HitTarget,
    Pinch,
};
use input::{Modifiers, PointerButton, PointerId, PointerInput};
use viewport::{ViewBox, Viewport};

/// Options supplied by the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneOptions {
    pub mode: DrawMode,
    pub shape: ShapeKind,
    /// Blocks every element mutation. Panning and zooming still work.
    pub disabled: bool,
    /// Place a default-sized rectangle on press instead of drawing a marquee.
    pub draw_on_pointer_down: bool,
    /// Size template for rectangles placed on press.
    pub initial_rect: Option<Rect>,
}

/// Notifications for the host.
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneEvent {
    /// The normalized element list after a mutation.
    Changed(Vec<Element>),
    /// A newly drawn rectangle became the default for press-to-place.
    DefaultRectChanged(Rect),
}

/// Interactive drawing surface over one image.
pub struct DrawZone {
    config: ZoneConfig,
    options: ZoneOptions,
    viewport: Option<Viewport>,
    bounds: Option<ScreenRect>,
    elements: Vec<Element>,
    draft: Option<Draft>,
    gesture: GestureState,
    last_rect_size: Option<Size>,
}

impl DrawZone {
    pub fn new(config: ZoneConfig) -> Self {
        Self {
            config,
            options: ZoneOptions::default(),
            viewport: None,
            bounds: None,
            elements: Vec::new(),
            draft: None,
            gesture: GestureState::default(),
            last_rect_size: None,
        }
    }

    /// Adopt a new image. Resets the view to cover it and drops any
    /// in-flight draft or gesture.
    pub fn set_image(&mut self, size: Size) {
        if size.is_empty() {
            log::warn!("Ignoring image with unusable size {:?}", size);
            self.viewport = None;
        } else {
            log::info!("Image set to {}x{}", size.width, size.height);
            self.viewport = Some(Viewport::new(size, &self.config));
        }
        self.draft = None;
        self.gesture = GestureState::default();
        self.last_rect_size = None;
    }

    pub fn clear_image(&mut self) {
        self.viewport = None;
        self.draft = None;
        self.gesture = GestureState::default();
    }

    /// Take the host's current element list.
    pub fn set_elements(&mut self, elements: Vec<Element>) {
        self.elements = elements;
    }

    pub fn set_options(&mut self, options: ZoneOptions) {
        let retargeted = options.mode != self.options.mode
            || options.shape != self.options.shape
            || options.disabled != self.options.disabled;
        if retargeted {
            log::debug!("Options changed, dropping draft");
            self.draft = None;
            self.gesture.end_drag();
        }
        self.options = options;
    }

    /// The container's on-screen box. Send it whenever the layout changes.
    pub fn set_screen_bounds(&mut self, bounds: ScreenRect) {
        self.bounds = Some(bounds);
    }

    pub fn config(&self) -> &ZoneConfig {
        &self.config
    }

    pub fn options(&self) -> &ZoneOptions {
        &self.options
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    pub fn image_size(&self) -> Option<Size> {
        self.viewport.as_ref().map(Viewport::image_size)
    }

    pub fn view_box(&self) -> Option<ViewBox> {
        self.viewport.as_ref().map(Viewport::view_box)
    }

    pub fn zoom(&self) -> Option<f64> {
        self.viewport.as_ref().map(Viewport::zoom)
    }

    /// Drawing plane to screen, when there is an image and a sized container.
    pub fn view_transform(&self) -> Option<ViewTransform> {
        self.viewport.as_ref()?.transform(self.bounds?)
    }

    pub fn is_multi_touch(&self) -> bool {
        self.gesture.multi_touch
    }

    /// Screen positions of the selected element's handles.
    pub fn handles(&self) -> Vec<(Handle, ScreenPoint)> {
        let Some(transform) = self.view_transform() else {
            return Vec::new();
        };
        self.elements
            .iter()
            .find(|e| e.selected)
            .map(|e| {
                handle_points(e, self.options.shape)
                    .into_iter()
                    .map(|(handle, p)| (handle, transform.to_screen(p)))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn zoom_at(&mut self, point: Point, factor: f64) -> f64 {
        self.viewport
            .as_mut()
            .map_or(1.0, |vp| vp.zoom_at(point, factor))
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.viewport.as_mut().map_or(1.0, Viewport::zoom_in)
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.viewport.as_mut().map_or(1.0, Viewport::zoom_out)
    }

    /// Translate the view by a drawing-plane delta.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        if let Some(vp) = self.viewport.as_mut() {
            vp.pan(dx, dy);
        }
    }

    pub fn reset_view(&mut self) {
        if let Some(vp) = self.viewport.as_mut() {
            vp.reset();
        }
    }

    /// Zoom around the pointer. Positive `delta_y` (scrolling down) zooms out.
    /// Returns the factor applied to the view box.
    pub fn wheel(&mut self, position: ScreenPoint, delta_y: f64) -> f64 {
        if delta_y == 0.0 {
            return 1.0;
        }
        let Some((_, inverse)) = self.transforms() else {
            return 1.0;
        };
        let step = self.config.wheel_zoom_step;
        let factor = if delta_y > 0.0 { step } else { 1.0 / step };
        self.zoom_at(to_drawing_plane(position, &inverse), factor)
    }

    pub fn pointer_down(&mut self, input: PointerInput) -> Vec<ZoneEvent> {
        let Some((transform, inverse)) = self.transforms() else {
            log::debug!("Ignoring press without an image or a sized container");
            return Vec::new();
        };
        self.gesture.pointers.insert(&input);
        if self.gesture.pointers.len() >= 2 {
            self.begin_pinch(&inverse);
            return Vec::new();
        }
        if input.button == PointerButton::Secondary {
            self.gesture.pointers.remove(input.id);
            return Vec::new();
        }

        let point = to_drawing_plane(input.position, &inverse);
        self.gesture.primary = Some(input.id);

        if input.button == PointerButton::Middle || input.modifiers.alt || self.options.disabled {
            self.start_pan(input.position);
            return Vec::new();
        }
        if matches!(self.draft, Some(Draft::Polygon { .. })) {
            return self.place_polygon_vertex(point, &input, &transform);
        }

        let tolerance = self.config.handle_tolerance.for_kind(input.kind);
        let target = classify(
            &self.elements,
            self.options.shape,
            &transform,
            input.position,
            point,
            tolerance,
        );
        match target {
            HitTarget::Handle { id, handle } => {
                if let Some(origin) = self.find(&id).map(|e| handle_origin(e, handle)) {
                    log::debug!("Resizing {} by {:?}", id, handle);
                    self.gesture.drag = Some(Drag::ResizeElement {
                        id,
                        handle,
                        start: point,
                        origin,
                    });
                }
                Vec::new()
            }
            HitTarget::Body(id) => {
                let mut events = Vec::new();
                if !self.find(&id).is_some_and(|e| e.selected) {
                    log::debug!("Selecting {}", id);
                    events = self.emit(select(&self.elements, &id));
                }
                if let Some(origin) = self.find(&id).map(|e| e.points().to_vec()) {
                    self.gesture.drag = Some(Drag::MoveElement {
                        id,
                        start: point,
                        origin,
                    });
                }
                events
            }
            HitTarget::Background => self.press_background(point, &input),
        }
    }

    pub fn pointer_move(&mut self, input: PointerInput) -> Vec<ZoneEvent> {
        let Some((_, inverse)) = self.transforms() else {
            return Vec::new();
        };
        let point = to_drawing_plane(input.position, &inverse);

        if !self.gesture.pointers.update(&input) {
            // Hover, or a late sample for a pointer that was already released.
            self.track_rubber_band(point, input.position);
            return Vec::new();
        }

        if let Some(pinch) = self.gesture.pinch.as_mut() {
            if pinch.involves(input.id) {
                let [a, b] = pinch.pointers;
                if let (Some(a), Some(b)) = (self.gesture.pointers.get(a), self.gesture.pointers.get(b)) {
                    let factor = pinch.advance(a.position.distance(b.position));
                    let center = pinch.center;
                    if let Some(vp) = self.viewport.as_mut() {
                        vp.zoom_at(center, factor);
                    }
                }
            }
            return Vec::new();
        }
        if self.gesture.multi_touch || !self.gesture.is_driving(input.id) {
            return Vec::new();
        }

        let Some(mut drag) = self.gesture.drag.take() else {
            self.track_rubber_band(point, input.position);
            return Vec::new();
        };
        let events = match &mut drag {
            Drag::PanView { last } => {
                let (dx, dy) = inverse.delta(input.position.x - last.x, input.position.y - last.y);
                *last = input.position;
                self.pan(-dx, -dy);
                Vec::new()
            }
            Drag::MoveElement { id, start, origin } => {
                let (dx, dy) = (point.x - start.x, point.y - start.y);
                let moved = origin.iter().map(|p| p.offset(dx, dy)).collect();
                self.replace_points(id.as_str(), moved)
            }
            Drag::ResizeElement {
                id,
                handle,
                start,
                origin,
            } => {
                let index = match *handle {
                    Handle::Corner(i) | Handle::Vertex(i) => i,
                };
                match origin.get(index) {
                    Some(grabbed) => {
                        let to = grabbed.offset(point.x - start.x, point.y - start.y);
                        let mut points = drag_handle(origin, *handle, to);
                        let two_corner = self.find(id.as_str()).is_some_and(|e| e.points().len() == 2);
                        if matches!(handle, Handle::Corner(_)) && two_corner {
                            if let Some(rect) = Rect::bounding(&points) {
                                points = vec![rect.min(), rect.max()];
                            }
                        }
                        self.replace_points(id.as_str(), points)
                    }
                    None => Vec::new(),
                }
            }
            Drag::DraftShape => {
                if let Some(draft) = self.draft.as_mut() {
                    draft.track(point, input.position);
                }
                Vec::new()
            }
        };
        self.gesture.drag = Some(drag);
        events
    }

    pub fn pointer_up(&mut self, input: PointerInput) -> Vec<ZoneEvent> {
        if self.gesture.pointers.remove(input.id).is_none() {
            log::trace!("Ignoring release of untracked pointer {:?}", input.id);
            return Vec::new();
        }

        if self.gesture.multi_touch {
            if self.gesture.pointers.len() < 2 {
                log::debug!("Pinch ended");
                self.gesture.pinch = None;
                self.gesture.multi_touch = false;
            } else if self.gesture.pinch.as_ref().is_some_and(|p| p.involves(input.id)) {
                self.gesture.pinch = None;
                if let Some((_, inverse)) = self.transforms() {
                    self.begin_pinch(&inverse);
                }
            }
            return Vec::new();
        }
        if !self.gesture.is_driving(input.id) {
            return Vec::new();
        }

        let drag = self.gesture.drag.take();
        self.gesture.end_drag();
        match drag {
            Some(Drag::DraftShape) => self.finish_marquee(&input),
            Some(Drag::MoveElement { id, .. }) => {
                log::debug!("Finished moving {}", id);
                Vec::new()
            }
            Some(Drag::ResizeElement { id, .. }) => {
                log::debug!("Finished resizing {}", id);
                self.resized_default_rect(&id)
            }
            Some(Drag::PanView { .. }) | None => Vec::new(),
        }
    }

    /// Cancel, leave and out all end a gesture exactly like a release at the
    /// pointer's last known position.
    pub fn pointer_cancel(&mut self, id: PointerId) -> Vec<ZoneEvent> {
        let Some(active) = self.gesture.pointers.get(id).copied() else {
            return Vec::new();
        };
        self.pointer_up(PointerInput {
            id,
            kind: active.kind,
            button: PointerButton::Primary,
            position: active.position,
            modifiers: Modifiers::default(),
        })
    }

    /// Discard the shape under construction.
    pub fn cancel_draft(&mut self) {
        if self.draft.take().is_some() {
            log::debug!("Draft cancelled");
        }
        if matches!(self.gesture.drag, Some(Drag::DraftShape)) {
            self.gesture.end_drag();
        }
    }

    /// Commit the polygon under construction if it has enough vertices.
    pub fn finish_polygon(&mut self) -> Vec<ZoneEvent> {
        let Some(vertices) = self.draft.as_mut().and_then(Draft::finish_polygon) else {
            return Vec::new();
        };
        self.draft = None;
        self.commit_new(vertices)
    }

    fn transforms(&self) -> Option<(ViewTransform, InverseTransform)> {
        let transform = self.view_transform()?;
        Some((transform, transform.inverse()?))
    }

    fn find(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    fn start_pan(&mut self, position: ScreenPoint) {
        self.gesture.drag = Some(Drag::PanView { last: position });
    }

    fn track_rubber_band(&mut self, point: Point, screen: ScreenPoint) {
        if let Some(draft @ Draft::Polygon { .. }) = self.draft.as_mut() {
            draft.track(point, screen);
        }
    }

    fn begin_pinch(&mut self, inverse: &InverseTransform) {
        if self.gesture.drag.is_some() {
            log::debug!("Second pointer down, abandoning {:?}", self.gesture.drag);
        }
        if matches!(self.draft, Some(Draft::Rect { .. })) {
            self.draft = None;
        }
        self.gesture.end_drag();
        self.gesture.multi_touch = true;
        if self.gesture.pinch.is_none() {
            if let Some((a, b)) = self.gesture.pointers.first_two() {
                self.gesture.pinch = Some(Pinch::begin(&a, &b, inverse));
            }
        }
    }

    fn press_background(&mut self, point: Point, input: &PointerInput) -> Vec<ZoneEvent> {
        let drawing = self.options.mode == DrawMode::Draw;
        if drawing && self.options.shape == ShapeKind::Rect && self.options.draw_on_pointer_down {
            return self.place_default_rect(point);
        }

        let mut events = Vec::new();
        if self.elements.iter().any(|e| e.selected) {
            events = self.emit(deselect_all(&self.elements));
        }
        match self.options.shape {
            ShapeKind::Rect if drawing => {
                self.draft = Some(Draft::rect(point, input.position));
                self.gesture.drag = Some(Drag::DraftShape);
            }
            ShapeKind::Poly if drawing => {
                log::debug!("Polygon started at ({:.1}, {:.1})", point.x, point.y);
                self.draft = Some(Draft::polygon(point));
            }
            _ => self.start_pan(input.position),
        }
        events
    }

    fn place_polygon_vertex(
        &mut self,
        point: Point,
        input: &PointerInput,
        transform: &ViewTransform,
    ) -> Vec<ZoneEvent> {
        let tolerance = self.config.close_tolerance.for_kind(input.kind);
        let Some(draft) = self.draft.as_mut() else {
            return Vec::new();
        };
        match draft.place_vertex(point, input.position, transform, tolerance) {
            PolygonStep::Appended => {
                log::trace!("Vertex at ({:.1}, {:.1})", point.x, point.y);
                Vec::new()
            }
            PolygonStep::Ignored => Vec::new(),
            PolygonStep::Closed(vertices) => {
                self.draft = None;
                self.commit_new(vertices)
            }
        }
    }

    /// Place a rectangle at the press point and keep dragging it.
    fn place_default_rect(&mut self, point: Point) -> Vec<ZoneEvent> {
        let size = self.default_rect_size();
        let events = self.commit_new(vec![point, point.offset(size.width, size.height)]);
        if let Some(created) = self.elements.iter().find(|e| e.selected) {
            self.gesture.drag = Some(Drag::MoveElement {
                id: created.id.clone(),
                start: point,
                origin: created.points().to_vec(),
            });
        }
        events
    }

    fn default_rect_size(&self) -> Size {
        if let Some(size) = self.last_rect_size {
            return size;
        }
        if let Some(template) = self.options.initial_rect.filter(|r| r.width > 0.0 && r.height > 0.0) {
            return template.size();
        }
        let image = self.image_size().unwrap_or_default();
        let fraction = self.config.default_rect_fraction;
        Size::new(image.width * fraction, image.height * fraction)
    }

    fn finish_marquee(&mut self, input: &PointerInput) -> Vec<ZoneEvent> {
        let Some(mut draft) = self.draft.take() else {
            return Vec::new();
        };
        if let Some((_, inverse)) = self.transforms() {
            draft.track(to_drawing_plane(input.position, &inverse), input.position);
        }
        let min_size = self.config.min_draft_size.for_kind(input.kind);
        let Some(corners) = draft.finish_rect(min_size) else {
            return Vec::new();
        };

        let mut events = self.commit_new(corners.to_vec());
        if let Some(rect) = self.elements.iter().find(|e| e.selected).map(Element::rect) {
            events.push(self.remember_default_rect(rect));
        }
        events
    }

    /// In press-to-place mode a resized rectangle sizes the next placement.
    fn resized_default_rect(&mut self, id: &str) -> Vec<ZoneEvent> {
        if !self.options.draw_on_pointer_down {
            return Vec::new();
        }
        let shape = self.options.shape;
        match self.find(id).filter(|e| e.is_rectangle(shape)).map(Element::rect) {
            Some(rect) => vec![self.remember_default_rect(rect)],
            None => Vec::new(),
        }
    }

    fn remember_default_rect(&mut self, rect: Rect) -> ZoneEvent {
        self.last_rect_size = Some(rect.size());
        ZoneEvent::DefaultRectChanged(rect)
    }

    /// Append a new, selected element and deselect everything else.
    fn commit_new(&mut self, points: Vec<Point>) -> Vec<ZoneEvent> {
        let mut element = Element::new(points);
        element.selected = true;
        log::info!("Committed element {} with {} points", element.id, element.points().len());
        let mut list = deselect_all(&self.elements);
        list.push(element);
        self.emit(list)
    }

    fn replace_points(&mut self, id: &str, points: Vec<Point>) -> Vec<ZoneEvent> {
        if self.find(id).is_none() {
            log::debug!("Element {} vanished mid-drag", id);
            return Vec::new();
        }
        let patch = ElementPatch {
            points: Some(points),
            ..Default::default()
        };
        let list = update(&self.elements, id, &patch);
        self.emit(list)
    }

    /// Normalize, adopt as the current snapshot and report it, unless nothing
    /// actually changed.
    fn emit(&mut self, list: Vec<Element>) -> Vec<ZoneEvent> {
        let normalized = normalize(&list, self.options.shape);
        if normalized == self.elements {
            return Vec::new();
        }
        self.elements = normalized.clone();
        vec![ZoneEvent::Changed(normalized)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone() -> DrawZone {
        let mut zone = DrawZone::new(ZoneConfig::default());
        zone.set_image(Size::new(1000.0, 500.0));
        zone.set_screen_bounds(ScreenRect::new(0.0, 0.0, 1000.0, 500.0));
        zone
    }

    fn with_options(options: ZoneOptions) -> DrawZone {
        let mut zone = zone();
        zone.set_options(options);
        zone
    }

    fn last_list(events: &[ZoneEvent]) -> Option<&Vec<Element>> {
        events.iter().rev().find_map(|e| match e {
            ZoneEvent::Changed(list) => Some(list),
            _ => None,
        })
    }

    fn click(zone: &mut DrawZone, x: f64, y: f64) -> Vec<ZoneEvent> {
        let mut events = zone.pointer_down(PointerInput::mouse(x, y));
        events.extend(zone.pointer_up(PointerInput::mouse(x, y)));
        events
    }

    fn boxes() -> Vec<Element> {
        vec![
            Element::new(vec![Point::new(10.0, 10.0), Point::new(50.0, 50.0)]).with_id("a"),
            Element::new(vec![Point::new(300.0, 300.0), Point::new(400.0, 400.0)]).with_id("b"),
        ]
    }

    #[test]
    fn test_marquee_commits_selected_rectangle() {
        let mut zone = zone();
        zone.set_elements(select(&boxes(), "b"));

        zone.pointer_down(PointerInput::mouse(100.0, 100.0));
        zone.pointer_move(PointerInput::mouse(160.0, 130.0));
        assert_eq!(
            zone.draft().and_then(Draft::overlay),
            Some(Rect::new(100.0, 100.0, 60.0, 30.0))
        );
        let events = zone.pointer_up(PointerInput::mouse(200.0, 150.5));

        let list = last_list(&events).unwrap();
        assert_eq!(list.len(), 3);
        let created = &list[2];
        assert!(created.selected);
        assert!(list[..2].iter().all(|e| !e.selected));
        assert_eq!(created.points(), &[Point::new(100.0, 100.0), Point::new(200.0, 151.0)]);
        assert!(events.contains(&ZoneEvent::DefaultRectChanged(Rect::new(100.0, 100.0, 100.0, 51.0))));
        assert!(zone.draft().is_none());
    }

    #[test]
    fn test_sub_threshold_marquee_produces_nothing() {
        let mut zone = zone();
        zone.pointer_down(PointerInput::mouse(100.0, 100.0));
        let events = zone.pointer_up(PointerInput::mouse(101.0, 101.0));
        assert!(events.is_empty());
        assert!(zone.elements().is_empty());
    }

    #[test]
    fn test_touch_uses_larger_marquee_threshold() {
        let mut zone = zone();
        zone.pointer_down(PointerInput::touch(5, 100.0, 100.0));
        let events = zone.pointer_up(PointerInput::touch(5, 108.0, 108.0));
        assert!(events.is_empty());

        zone.pointer_down(PointerInput::mouse(100.0, 100.0));
        let events = zone.pointer_up(PointerInput::mouse(108.0, 108.0));
        assert!(last_list(&events).is_some());
    }

    #[test]
    fn test_draw_on_pointer_down_places_template_and_follows_pointer() {
        let mut zone = with_options(ZoneOptions {
            draw_on_pointer_down: true,
            initial_rect: Some(Rect::new(0.0, 0.0, 50.0, 40.0)),
            ..Default::default()
        });

        let events = zone.pointer_down(PointerInput::mouse(10.0, 10.0));
        let list = last_list(&events).unwrap();
        assert_eq!(list[0].points(), &[Point::new(10.0, 10.0), Point::new(60.0, 50.0)]);

        // The placed box follows the pointer until release.
        let events = zone.pointer_move(PointerInput::mouse(20.0, 30.0));
        let list = last_list(&events).unwrap();
        assert_eq!(list[0].points(), &[Point::new(20.0, 30.0), Point::new(70.0, 70.0)]);
        zone.pointer_up(PointerInput::mouse(20.0, 30.0));

        let events = zone.pointer_down(PointerInput::mouse(500.0, 300.0));
        let list = last_list(&events).unwrap();
        assert_eq!(list.len(), 2);
        assert!(!list[0].selected);
        assert_eq!(list[1].rect(), Rect::new(500.0, 300.0, 50.0, 40.0));
    }

    #[test]
    fn test_draw_on_pointer_down_falls_back_to_image_fraction() {
        let mut zone = with_options(ZoneOptions {
            draw_on_pointer_down: true,
            ..Default::default()
        });
        let events = zone.pointer_down(PointerInput::mouse(0.0, 0.0));
        assert_eq!(last_list(&events).unwrap()[0].rect(), Rect::new(0.0, 0.0, 200.0, 100.0));
    }

    #[test]
    fn test_polygon_closes_on_first_vertex() {
        let mut zone = with_options(ZoneOptions {
            shape: ShapeKind::Poly,
            ..Default::default()
        });
        for (x, y) in [(100.0, 100.0), (200.0, 100.0), (200.0, 200.0), (100.0, 200.0)] {
            assert!(click(&mut zone, x, y).is_empty());
        }
        zone.pointer_move(PointerInput::mouse(150.0, 250.0));
        assert_eq!(
            zone.draft().and_then(Draft::rubber_band),
            Some((Point::new(100.0, 200.0), Point::new(150.0, 250.0)))
        );

        let events = click(&mut zone, 102.0, 102.0);
        let list = last_list(&events).unwrap();
        assert_eq!(
            list[0].points(),
            &[
                Point::new(100.0, 100.0),
                Point::new(200.0, 100.0),
                Point::new(200.0, 200.0),
                Point::new(100.0, 200.0),
            ]
        );
        assert!(list[0].selected);
        assert!(zone.draft().is_none());
    }

    #[test]
    fn test_polygon_vertices_can_land_on_existing_elements() {
        let mut zone = with_options(ZoneOptions {
            shape: ShapeKind::Poly,
            ..Default::default()
        });
        zone.set_elements(boxes());
        click(&mut zone, 200.0, 200.0);
        click(&mut zone, 350.0, 350.0);
        click(&mut zone, 200.0, 450.0);
        let events = zone.finish_polygon();
        let list = last_list(&events).unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[2].points().len(), 3);
        assert!(!list[1].selected);
    }

    #[test]
    fn test_cancel_draft_discards_polygon() {
        let mut zone = with_options(ZoneOptions {
            shape: ShapeKind::Poly,
            ..Default::default()
        });
        click(&mut zone, 10.0, 10.0);
        click(&mut zone, 90.0, 10.0);
        zone.cancel_draft();
        assert!(zone.draft().is_none());
        assert!(zone.finish_polygon().is_empty());
    }

    #[test]
    fn test_press_selects_then_drag_moves() {
        let mut zone = zone();
        zone.set_elements(boxes());

        let events = zone.pointer_down(PointerInput::mouse(20.0, 20.0));
        let list = last_list(&events).unwrap();
        assert!(list[0].selected && !list[1].selected);
        assert!(zone.draft().is_none());

        let events = zone.pointer_move(PointerInput::mouse(30.0, 25.0));
        let list = last_list(&events).unwrap();
        assert_eq!(list[0].points(), &[Point::new(20.0, 15.0), Point::new(60.0, 55.0)]);
        assert_eq!(list[0].rect(), Rect::new(20.0, 15.0, 40.0, 40.0));
        assert_eq!(list[1], boxes()[1]);

        assert!(zone.pointer_up(PointerInput::mouse(30.0, 25.0)).is_empty());
        // A late move for the released pointer does nothing.
        assert!(zone.pointer_move(PointerInput::mouse(90.0, 90.0)).is_empty());
        assert_eq!(zone.elements()[0].rect(), Rect::new(20.0, 15.0, 40.0, 40.0));
    }

    #[test]
    fn test_move_rounds_without_drift() {
        let mut zone = zone();
        zone.set_elements(select(&boxes(), "a"));
        zone.pointer_down(PointerInput::mouse(20.0, 20.0));
        for step in 1..=10 {
            zone.pointer_move(PointerInput::mouse(20.0 + 0.3 * f64::from(step), 20.0));
        }
        // 3.0 plane units in total, not ten rounded 0.3 steps.
        assert_eq!(zone.elements()[0].points()[0], Point::new(13.0, 10.0));
    }

    #[test]
    fn test_corner_drag_resizes_rectangle() {
        let mut zone = zone();
        zone.set_elements(select(&boxes(), "a"));

        assert!(zone.pointer_down(PointerInput::mouse(50.0, 50.0)).is_empty());
        let events = zone.pointer_move(PointerInput::mouse(70.0, 80.0));
        let list = last_list(&events).unwrap();
        assert_eq!(list[0].points(), &[Point::new(10.0, 10.0), Point::new(70.0, 80.0)]);

        // Dragging past the opposite corner flips the box cleanly.
        let events = zone.pointer_move(PointerInput::mouse(0.0, 5.0));
        let list = last_list(&events).unwrap();
        assert_eq!(list[0].rect(), Rect::new(0.0, 5.0, 10.0, 5.0));
    }

    #[test]
    fn test_vertex_drag_edits_polygon() {
        let mut zone = with_options(ZoneOptions {
            shape: ShapeKind::Poly,
            ..Default::default()
        });
        let mut tri = Element::new(vec![Point::new(100.0, 100.0), Point::new(200.0, 100.0), Point::new(150.0, 200.0)]).with_id("t");
        tri.selected = true;
        zone.set_elements(vec![tri]);

        zone.pointer_down(PointerInput::mouse(151.0, 199.0));
        let events = zone.pointer_move(PointerInput::mouse(161.0, 229.0));
        let list = last_list(&events).unwrap();
        assert_eq!(list[0].points()[2], Point::new(160.0, 230.0));
        assert_eq!(list[0].points()[0], Point::new(100.0, 100.0));
    }

    #[test]
    fn test_background_press_deselects() {
        let mut zone = with_options(ZoneOptions {
            mode: DrawMode::None,
            ..Default::default()
        });
        zone.set_elements(select(&boxes(), "b"));
        let events = zone.pointer_down(PointerInput::mouse(700.0, 50.0));
        let list = last_list(&events).unwrap();
        assert!(list.iter().all(|e| !e.selected));
        assert!(zone.draft().is_none());
    }

    #[test]
    fn test_pan_drag_and_cancel() {
        let mut zone = with_options(ZoneOptions {
            mode: DrawMode::None,
            ..Default::default()
        });
        zone.pointer_down(PointerInput::mouse(100.0, 100.0));
        zone.pointer_move(PointerInput::mouse(150.0, 80.0));
        let vb = zone.view_box().unwrap();
        assert_eq!((vb.x, vb.y), (-50.0, 20.0));

        zone.pointer_cancel(PointerId(0));
        zone.pointer_move(PointerInput::mouse(400.0, 400.0));
        assert_eq!(zone.view_box().unwrap(), vb);
    }

    #[test]
    fn test_middle_button_pans_in_draw_mode() {
        let mut zone = zone();
        zone.set_elements(boxes());
        zone.pointer_down(PointerInput::mouse(20.0, 20.0).with_button(PointerButton::Middle));
        zone.pointer_move(PointerInput::mouse(30.0, 20.0));
        assert_eq!(zone.view_box().unwrap().x, -10.0);
        assert!(zone.elements().iter().all(|e| !e.selected));
    }

    #[test]
    fn test_disabled_blocks_mutation_but_not_navigation() {
        let mut zone = with_options(ZoneOptions {
            disabled: true,
            ..Default::default()
        });
        zone.set_elements(boxes());
        assert!(zone.pointer_down(PointerInput::mouse(20.0, 20.0)).is_empty());
        assert!(zone.pointer_move(PointerInput::mouse(40.0, 20.0)).is_empty());
        assert!(zone.pointer_up(PointerInput::mouse(40.0, 20.0)).is_empty());
        assert_eq!(zone.view_box().unwrap().x, -20.0);
        assert_eq!(zone.elements(), boxes().as_slice());
    }

    #[test]
    fn test_secondary_button_ignored() {
        let mut zone = zone();
        let events = zone.pointer_down(PointerInput::mouse(10.0, 10.0).with_button(PointerButton::Secondary));
        assert!(events.is_empty());
        assert!(zone.draft().is_none());
        assert!(zone.pointer_up(PointerInput::mouse(10.0, 10.0)).is_empty());
    }

    #[test]
    fn test_pinch_compounds_per_step_ratios() {
        let mut zone = zone();
        zone.pointer_down(PointerInput::touch(1, 400.0, 250.0));
        zone.pointer_down(PointerInput::touch(2, 600.0, 250.0));
        assert!(zone.is_multi_touch());
        assert!(zone.draft().is_none());

        let mut expected = 1000.0;
        let mut previous_distance = 200.0;
        let mut previous_width = zone.view_box().unwrap().width;
        for x in [580.0, 560.0, 540.0, 520.0, 500.0] {
            assert!(zone.pointer_move(PointerInput::touch(2, x, 250.0)).is_empty());
            let distance = x - 400.0;
            expected *= previous_distance / distance;
            previous_distance = distance;

            let width = zone.view_box().unwrap().width;
            assert!(width > previous_width);
            assert!((width - expected).abs() < 1e-9);
            previous_width = width;
        }
        assert!((previous_width - 2000.0).abs() < 1e-9);

        // The pinch midpoint stays put on screen.
        let center = zone.view_transform().unwrap().to_screen(Point::new(500.0, 250.0));
        assert!((center.x - 500.0).abs() < 1e-9);

        zone.pointer_up(PointerInput::touch(2, 500.0, 250.0));
        assert!(!zone.is_multi_touch());
        assert!(zone.pointer_move(PointerInput::touch(1, 300.0, 300.0)).is_empty());
        assert!(zone.pointer_up(PointerInput::touch(1, 300.0, 300.0)).is_empty());
        assert!(zone.elements().is_empty());
    }

    #[test]
    fn test_wheel_zooms_around_pointer() {
        let mut zone = zone();
        let anchor = ScreenPoint::new(250.0, 100.0);
        let before = to_drawing_plane(anchor, &zone.view_transform().unwrap().inverse().unwrap());

        assert!(zone.wheel(anchor, -1.0) < 1.0);
        assert!(zone.zoom().unwrap() > 1.0);
        let after = zone.view_transform().unwrap().to_screen(before);
        assert!((after.x - anchor.x).abs() < 1e-9 && (after.y - anchor.y).abs() < 1e-9);

        zone.reset_view();
        assert_eq!(zone.zoom(), Some(1.0));
    }

    #[test]
    fn test_input_ignored_without_container() {
        let mut zone = DrawZone::new(ZoneConfig::default());
        zone.set_image(Size::new(100.0, 100.0));
        assert!(zone.pointer_down(PointerInput::mouse(10.0, 10.0)).is_empty());

        zone.set_screen_bounds(ScreenRect::new(0.0, 0.0, 0.0, 0.0));
        assert!(zone.pointer_down(PointerInput::mouse(10.0, 10.0)).is_empty());
        assert!(zone.view_transform().is_none());
        assert_eq!(zone.wheel(ScreenPoint::new(1.0, 1.0), 1.0), 1.0);
    }

    #[test]
    fn test_rect_mode_collapses_host_quads_on_commit() {
        let mut zone = zone();
        let quad = Element::new(vec![
            Point::new(10.0, 10.0),
            Point::new(50.0, 10.0),
            Point::new(50.0, 50.0),
            Point::new(10.0, 50.0),
        ])
        .with_id("q");
        zone.set_elements(vec![quad]);
        let events = zone.pointer_down(PointerInput::mouse(30.0, 30.0));
        let list = last_list(&events).unwrap();
        assert_eq!(list[0].points(), &[Point::new(10.0, 10.0), Point::new(50.0, 50.0)]);
        assert_eq!(zone.handles().len(), 4);
        assert_eq!(zone.handles()[1].0, Handle::Corner(1));
    }

    #[test]
    fn test_options_change_drops_draft() {
        let mut zone = zone();
        zone.pointer_down(PointerInput::mouse(10.0, 10.0));
        assert!(zone.draft().is_some());
        zone.set_options(ZoneOptions {
            shape: ShapeKind::Poly,
            ..Default::default()
        });
        assert!(zone.draft().is_none());
        assert!(zone.pointer_up(PointerInput::mouse(90.0, 90.0)).is_empty());
        assert!(zone.elements().is_empty());
    }

    #[test]
    fn test_resized_placement_sizes_next_placement() {
        let mut zone = with_options(ZoneOptions {
            draw_on_pointer_down: true,
            initial_rect: Some(Rect::new(0.0, 0.0, 50.0, 40.0)),
            ..Default::default()
        });
        zone.pointer_down(PointerInput::mouse(10.0, 10.0));
        zone.pointer_up(PointerInput::mouse(10.0, 10.0));

        // Grab the bottom-right corner of the placed box and stretch it.
        zone.pointer_down(PointerInput::mouse(60.0, 50.0));
        zone.pointer_move(PointerInput::mouse(110.0, 90.0));
        let events = zone.pointer_up(PointerInput::mouse(110.0, 90.0));
        assert_eq!(
            events,
            vec![ZoneEvent::DefaultRectChanged(Rect::new(10.0, 10.0, 100.0, 80.0))]
        );

        let events = zone.pointer_down(PointerInput::mouse(500.0, 300.0));
        let list = last_list(&events).unwrap();
        assert_eq!(list[1].rect(), Rect::new(500.0, 300.0, 100.0, 80.0));
    }

    #[test]
    fn test_resize_without_placement_mode_keeps_default() {
        let mut zone = zone();
        zone.set_elements(select(&boxes(), "a"));
        zone.pointer_down(PointerInput::mouse(50.0, 50.0));
        zone.pointer_move(PointerInput::mouse(70.0, 80.0));
        let events = zone.pointer_up(PointerInput::mouse(70.0, 80.0));
        assert!(events.is_empty());
    }

    #[test]
    fn test_selection_keeps_degenerate_host_elements() {
        let mut zone = zone();
        let dot = Element::new(vec![Point::new(700.0, 400.0)]).with_id("dot");
        zone.set_elements(vec![dot.clone(), boxes()[0].clone()]);

        let events = zone.pointer_down(PointerInput::mouse(20.0, 20.0));
        let list = last_list(&events).unwrap();
        let ids: Vec<&str> = list.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["dot", "a"]);
        assert_eq!(list[0], dot);
        assert!(list[1].selected);
    }

    #[test]
    fn test_alt_press_pans_instead_of_drawing() {
        let mut zone = zone();
        zone.set_elements(boxes());
        let alt = Modifiers { alt: true };

        assert!(zone.pointer_down(PointerInput::mouse(20.0, 20.0).with_modifiers(alt)).is_empty());
        assert!(zone.pointer_move(PointerInput::mouse(30.0, 40.0)).is_empty());
        let vb = zone.view_box().unwrap();
        assert_eq!((vb.x, vb.y), (-10.0, -20.0));

        assert!(zone.pointer_up(PointerInput::mouse(30.0, 40.0)).is_empty());
        assert!(zone.draft().is_none());
        assert_eq!(zone.elements(), boxes().as_slice());
    }

    #[test]
    fn test_lifting_a_pinch_finger_repinches_with_the_rest() {
        let mut zone = zone();
        zone.pointer_down(PointerInput::touch(1, 400.0, 250.0));
        zone.pointer_down(PointerInput::touch(2, 600.0, 250.0));
        zone.pointer_down(PointerInput::touch(3, 500.0, 100.0));

        // The third finger is not part of the first pinch.
        assert!(zone.pointer_move(PointerInput::touch(3, 500.0, 50.0)).is_empty());
        assert_eq!(zone.view_box().unwrap().width, 1000.0);
        zone.pointer_move(PointerInput::touch(3, 500.0, 100.0));

        zone.pointer_up(PointerInput::touch(2, 600.0, 250.0));
        assert!(zone.is_multi_touch());

        // Fingers 1 and 3 now pinch around their midpoint.
        zone.pointer_move(PointerInput::touch(3, 600.0, -50.0));
        let width = zone.view_box().unwrap().width;
        assert!((width - 500.0).abs() < 1e-9);
        let center = zone.view_transform().unwrap().to_screen(Point::new(450.0, 175.0));
        assert!((center.x - 450.0).abs() < 1e-9 && (center.y - 175.0).abs() < 1e-9);

        zone.pointer_up(PointerInput::touch(3, 600.0, -50.0));
        assert!(!zone.is_multi_touch());
    }

    #[test]
    fn test_cancel_mid_marquee_commits_like_release() {
        let mut zone = zone();
        zone.pointer_down(PointerInput::mouse(100.0, 100.0));
        zone.pointer_move(PointerInput::mouse(200.0, 150.0));

        let events = zone.pointer_cancel(PointerId(0));
        let list = last_list(&events).unwrap();
        assert_eq!(list[0].rect(), Rect::new(100.0, 100.0, 100.0, 50.0));
        assert!(zone.draft().is_none());
        assert!(zone.pointer_move(PointerInput::mouse(300.0, 300.0)).is_empty());
        assert!(zone.pointer_cancel(PointerId(0)).is_empty());
    }

    #[test]
    fn test_cancel_mid_move_ends_drag() {
        let mut zone = zone();
        zone.set_elements(boxes());
        zone.pointer_down(PointerInput::mouse(20.0, 20.0));
        zone.pointer_move(PointerInput::mouse(30.0, 25.0));

        assert!(zone.pointer_cancel(PointerId(0)).is_empty());
        assert!(zone.pointer_move(PointerInput::mouse(90.0, 90.0)).is_empty());
        assert_eq!(zone.elements()[0].rect(), Rect::new(20.0, 15.0, 40.0, 40.0));
    }
}
