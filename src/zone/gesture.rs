// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pointer bookkeeping and press classification.
//!
//! Replaces loose drag flags with one explicit record. Which kind of drag is
//! running, which pointer drives it and whether a pinch has taken over are all
//! visible in [`GestureState`].
//!
//! ```text
//! Idle -> PanView        (press on background with nothing to draw, middle button, alt)
//! Idle -> MoveElement    (press on an element body)
//! Idle -> ResizeElement  (press on a handle of the selected element)
//! Idle -> DraftShape     (press on background while drawing rectangles)
//! Any  -> Pinch          (a second pointer goes down)
//! Any  -> Idle           (release or cancel of the driving pointer)
//! ```

use crate::models::element::Element;
use crate::models::mode::ShapeKind;
use crate::util::geometry::{to_drawing_plane, InverseTransform, Point, ScreenPoint, ViewTransform};

use super::input::{PointerId, PointerInput, PointerKind};

/// Pointer distances below this are treated as this, to keep ratios finite.
const MIN_PINCH_DISTANCE: f64 = 0.001;

/// A pointer that is currently pressed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivePointer {
    pub id: PointerId,
    pub kind: PointerKind,
    pub position: ScreenPoint,
}

/// Pressed pointers in press order.
#[derive(Debug, Clone, Default)]
pub struct PointerCache {
    pointers: Vec<ActivePointer>,
}

impl PointerCache {
    /// Record a press. A repeated press of the same id replaces the entry.
    pub fn insert(&mut self, input: &PointerInput) {
        self.remove(input.id);
        self.pointers.push(ActivePointer {
            id: input.id,
            kind: input.kind,
            position: input.position,
        });
    }

    /// Update a pressed pointer's position. False if it is not pressed.
    pub fn update(&mut self, input: &PointerInput) -> bool {
        match self.pointers.iter_mut().find(|p| p.id == input.id) {
            Some(pointer) => {
                pointer.position = input.position;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: PointerId) -> Option<ActivePointer> {
        let index = self.pointers.iter().position(|p| p.id == id)?;
        Some(self.pointers.remove(index))
    }

    pub fn get(&self, id: PointerId) -> Option<&ActivePointer> {
        self.pointers.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    /// The two earliest pressed pointers.
    pub fn first_two(&self) -> Option<(ActivePointer, ActivePointer)> {
        match self.pointers.as_slice() {
            [a, b, ..] => Some((*a, *b)),
            _ => None,
        }
    }
}

/// A draggable control point of the selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    /// Rectangle corner, indexed top-left, top-right, bottom-right, bottom-left.
    Corner(usize),
    /// Polygon vertex index.
    Vertex(usize),
}

/// What a press landed on.
#[derive(Debug, Clone, PartialEq)]
pub enum HitTarget {
    Background,
    Body(String),
    Handle { id: String, handle: Handle },
}

/// Handles of an element with their drawing-plane positions.
pub fn handle_points(element: &Element, shape: ShapeKind) -> Vec<(Handle, Point)> {
    if element.is_rectangle(shape) {
        element
            .rect()
            .corners()
            .into_iter()
            .enumerate()
            .map(|(i, p)| (Handle::Corner(i), p))
            .collect()
    } else {
        element
            .points()
            .iter()
            .enumerate()
            .map(|(i, p)| (Handle::Vertex(i), *p))
            .collect()
    }
}

/// Classify a press: handles of the selected element first, then element
/// bodies from the topmost down, then the background. Handle distances are
/// in screen pixels.
pub fn classify(
    elements: &[Element],
    shape: ShapeKind,
    transform: &ViewTransform,
    screen: ScreenPoint,
    point: Point,
    tolerance: f64,
) -> HitTarget {
    if let Some(selected) = elements.iter().find(|e| e.selected) {
        let nearest = handle_points(selected, shape)
            .into_iter()
            .map(|(handle, p)| (handle, transform.to_screen(p).distance(screen)))
            .filter(|(_, d)| *d <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((handle, _)) = nearest {
            return HitTarget::Handle {
                id: selected.id.clone(),
                handle,
            };
        }
    }
    elements
        .iter()
        .rev()
        .find(|e| e.contains(point, shape))
        .map(|e| HitTarget::Body(e.id.clone()))
        .unwrap_or(HitTarget::Background)
}

/// Starting geometry of a handle drag: the four corners for a rectangle,
/// the vertices otherwise.
pub fn handle_origin(element: &Element, handle: Handle) -> Vec<Point> {
    match handle {
        Handle::Corner(_) => element.rect().corners().to_vec(),
        Handle::Vertex(_) => element.points().to_vec(),
    }
}

/// Move one handle to `to`. Dragging a rectangle corner also moves the two
/// neighbouring corners along the shared edge so the shape stays an
/// axis-aligned rectangle.
pub fn drag_handle(origin: &[Point], handle: Handle, to: Point) -> Vec<Point> {
    let mut points = origin.to_vec();
    match handle {
        Handle::Corner(i) if i < 4 && points.len() == 4 => {
            points[i] = to;
            for j in [(i + 1) % 4, (i + 3) % 4] {
                // Corners 0-1 share the top edge, 2-3 the bottom one.
                if i / 2 == j / 2 {
                    points[j].y = to.y;
                } else {
                    points[j].x = to.x;
                }
            }
        }
        Handle::Vertex(i) => {
            if let Some(p) = points.get_mut(i) {
                *p = to;
            }
        }
        Handle::Corner(_) => {}
    }
    points
}

/// Two-pointer zoom around a fixed drawing-plane midpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Pinch {
    pub pointers: [PointerId; 2],
    pub center: Point,
    last_distance: f64,
}

impl Pinch {
    pub fn begin(a: &ActivePointer, b: &ActivePointer, inverse: &InverseTransform) -> Self {
        Self {
            pointers: [a.id, b.id],
            center: to_drawing_plane(a.position.midpoint(b.position), inverse),
            last_distance: a.position.distance(b.position).max(MIN_PINCH_DISTANCE),
        }
    }

    pub fn involves(&self, id: PointerId) -> bool {
        self.pointers.contains(&id)
    }

    /// View box factor for a new pointer distance, relative to the previous
    /// sample rather than the gesture start. Spreading the fingers yields a
    /// factor below one (zoom in).
    pub fn advance(&mut self, distance: f64) -> f64 {
        let distance = distance.max(MIN_PINCH_DISTANCE);
        let factor = self.last_distance / distance;
        self.last_distance = distance;
        factor
    }
}

/// The active drag of the driving pointer.
#[derive(Debug, Clone, PartialEq)]
pub enum Drag {
    PanView {
        last: ScreenPoint,
    },
    MoveElement {
        id: String,
        start: Point,
        origin: Vec<Point>,
    },
    ResizeElement {
        id: String,
        handle: Handle,
        start: Point,
        origin: Vec<Point>,
    },
    DraftShape,
}

/// Everything transient about the pointers currently pressed.
#[derive(Debug, Clone, Default)]
pub struct GestureState {
    pub pointers: PointerCache,
    /// The pointer driving `drag`.
    pub primary: Option<PointerId>,
    pub drag: Option<Drag>,
    pub pinch: Option<Pinch>,
    /// Set while two or more pointers are down; single-pointer
    /// interpretation is suspended.
    pub multi_touch: bool,
}

impl GestureState {
    /// Forget the single-pointer drag without touching the pointer cache.
    pub fn end_drag(&mut self) {
        self.primary = None;
        self.drag = None;
    }

    pub fn is_driving(&self, id: PointerId) -> bool {
        self.primary == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::geometry::Rect;

    const IDENTITY: ViewTransform = ViewTransform {
        scale_x: 1.0,
        scale_y: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    fn rect_element(id: &str, x: f64, y: f64, size: f64) -> Element {
        Element::new(vec![Point::new(x, y), Point::new(x + size, y + size)]).with_id(id)
    }

    fn hit(elements: &[Element], x: f64, y: f64) -> HitTarget {
        classify(
            elements,
            ShapeKind::Rect,
            &IDENTITY,
            ScreenPoint::new(x, y),
            Point::new(x, y),
            6.0,
        )
    }

    #[test]
    fn test_pointer_cache_tracks_press_order() {
        let mut cache = PointerCache::default();
        cache.insert(&PointerInput::touch(7, 0.0, 0.0));
        cache.insert(&PointerInput::touch(3, 10.0, 0.0));
        cache.insert(&PointerInput::touch(9, 20.0, 0.0));

        let (a, b) = cache.first_two().unwrap();
        assert_eq!((a.id, b.id), (PointerId(7), PointerId(3)));

        assert!(cache.update(&PointerInput::touch(3, 11.0, 1.0)));
        assert!(!cache.update(&PointerInput::touch(4, 0.0, 0.0)));
        assert_eq!(cache.remove(PointerId(7)).map(|p| p.position.x), Some(0.0));
        assert_eq!(cache.get(PointerId(3)).unwrap().position, ScreenPoint::new(11.0, 1.0));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_classify_prefers_handles_then_topmost_body() {
        let mut elements = vec![rect_element("under", 0.0, 0.0, 100.0), rect_element("over", 50.0, 50.0, 100.0)];
        assert_eq!(hit(&elements, 75.0, 75.0), HitTarget::Body("over".into()));
        assert_eq!(hit(&elements, 10.0, 10.0), HitTarget::Body("under".into()));
        assert_eq!(hit(&elements, 300.0, 300.0), HitTarget::Background);

        elements[0].selected = true;
        assert_eq!(
            hit(&elements, 98.0, 103.0),
            HitTarget::Handle {
                id: "under".into(),
                handle: Handle::Corner(2)
            }
        );
    }

    #[test]
    fn test_polygon_handles_are_vertices() {
        let mut tri = Element::new(vec![Point::new(0.0, 0.0), Point::new(40.0, 0.0), Point::new(0.0, 40.0)]).with_id("t");
        tri.selected = true;
        assert_eq!(
            hit(&[tri], 39.0, 2.0),
            HitTarget::Handle {
                id: "t".into(),
                handle: Handle::Vertex(1)
            }
        );
    }

    #[test]
    fn test_corner_drag_keeps_rectangle() {
        let origin = Rect::new(10.0, 10.0, 20.0, 20.0).corners();
        let out = drag_handle(&origin, Handle::Corner(0), Point::new(5.0, 2.0));
        assert_eq!(
            out,
            vec![
                Point::new(5.0, 2.0),
                Point::new(30.0, 2.0),
                Point::new(30.0, 30.0),
                Point::new(5.0, 30.0),
            ]
        );

        let out = drag_handle(&origin, Handle::Corner(2), Point::new(40.0, 50.0));
        assert_eq!(out[1], Point::new(40.0, 10.0));
        assert_eq!(out[3], Point::new(10.0, 50.0));
    }

    #[test]
    fn test_vertex_drag_moves_one_point() {
        let origin = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(5.0, 8.0)];
        let out = drag_handle(&origin, Handle::Vertex(2), Point::new(6.0, 12.0));
        assert_eq!(&out[..2], &origin[..2]);
        assert_eq!(out[2], Point::new(6.0, 12.0));
    }

    #[test]
    fn test_pinch_factor_is_incremental() {
        let inverse = IDENTITY.inverse().unwrap();
        let a = ActivePointer {
            id: PointerId(1),
            kind: PointerKind::Touch,
            position: ScreenPoint::new(0.0, 0.0),
        };
        let b = ActivePointer {
            id: PointerId(2),
            position: ScreenPoint::new(100.0, 0.0),
            ..a
        };
        let mut pinch = Pinch::begin(&a, &b, &inverse);
        assert_eq!(pinch.center, Point::new(50.0, 0.0));
        assert!(pinch.involves(PointerId(2)));

        assert_eq!(pinch.advance(200.0), 0.5);
        // Relative to the previous sample, not to the 100 px start.
        assert_eq!(pinch.advance(400.0), 0.5);
        assert_eq!(pinch.advance(400.0), 1.0);
    }
}
