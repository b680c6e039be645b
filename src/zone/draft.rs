// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Shapes under construction.
//!
//! A draft is never part of the element list. A rectangle draft lives for a
//! single press-drag-release; a polygon draft collects one vertex per press
//! and lives until it is closed or cancelled.
//!
//! ```text
//! Idle -> Rect        (press on background, shape = rect)
//! Rect -> Idle        (release; committed if larger than the threshold)
//! Idle -> Polygon     (press on background, shape = poly)
//! Polygon -> Polygon  (press away from the first vertex: append)
//! Polygon -> Idle     (press near the first vertex with >= 3 vertices: commit)
//! ```

use crate::util::geometry::{Point, Rect, ScreenPoint, ViewTransform};

/// Fewest vertices a committed polygon may have.
pub const MIN_POLYGON_VERTICES: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum Draft {
    /// Marquee rectangle spanning `anchor` and `cursor`.
    Rect {
        anchor: Point,
        anchor_screen: ScreenPoint,
        cursor: Point,
        cursor_screen: ScreenPoint,
    },
    /// Committed vertices plus the live end of the rubber band.
    Polygon {
        vertices: Vec<Point>,
        cursor: Option<Point>,
    },
}

/// Outcome of a press while a polygon is being drafted.
#[derive(Debug, Clone, PartialEq)]
pub enum PolygonStep {
    Appended,
    /// The polygon was closed; the closing press itself is not a vertex.
    Closed(Vec<Point>),
    /// Near the first vertex but too few vertices to close.
    Ignored,
}

impl Draft {
    /// Start a zero-size marquee.
    pub fn rect(anchor: Point, anchor_screen: ScreenPoint) -> Self {
        Draft::Rect {
            anchor,
            anchor_screen,
            cursor: anchor,
            cursor_screen: anchor_screen,
        }
    }

    pub fn polygon(first: Point) -> Self {
        Draft::Polygon {
            vertices: vec![first],
            cursor: None,
        }
    }

    /// Follow the pointer. Moves the marquee corner or the rubber band end;
    /// committed polygon vertices are never touched.
    pub fn track(&mut self, point: Point, screen: ScreenPoint) {
        match self {
            Draft::Rect {
                cursor,
                cursor_screen,
                ..
            } => {
                *cursor = point;
                *cursor_screen = screen;
            }
            Draft::Polygon { cursor, .. } => *cursor = Some(point),
        }
    }

    /// The marquee overlay in drawing-plane space.
    pub fn overlay(&self) -> Option<Rect> {
        match self {
            Draft::Rect { anchor, cursor, .. } => Some(Rect::from_corners(*anchor, *cursor)),
            Draft::Polygon { .. } => None,
        }
    }

    /// The preview segment from the last vertex to the cursor.
    pub fn rubber_band(&self) -> Option<(Point, Point)> {
        match self {
            Draft::Polygon {
                vertices,
                cursor: Some(cursor),
            } => vertices.last().map(|last| (*last, *cursor)),
            _ => None,
        }
    }

    /// Finish a marquee. Returns the two opposite corners when the box is
    /// larger than `min_size` screen pixels in both directions.
    pub fn finish_rect(&self, min_size: f64) -> Option<[Point; 2]> {
        let Draft::Rect {
            anchor_screen,
            cursor_screen,
            ..
        } = self
        else {
            return None;
        };
        let width = (cursor_screen.x - anchor_screen.x).abs();
        let height = (cursor_screen.y - anchor_screen.y).abs();
        if width <= min_size || height <= min_size {
            log::debug!("Dropping {:.1}x{:.1} px marquee", width, height);
            return None;
        }
        let rect = self.overlay()?;
        Some([rect.min(), rect.max()])
    }

    /// Handle a press while drafting a polygon. The closing distance is
    /// measured on screen against the first vertex's current screen position,
    /// so it does not change with zoom.
    pub fn place_vertex(
        &mut self,
        point: Point,
        screen: ScreenPoint,
        transform: &ViewTransform,
        tolerance: f64,
    ) -> PolygonStep {
        let Draft::Polygon { vertices, cursor } = self else {
            return PolygonStep::Ignored;
        };
        let near_first = vertices
            .first()
            .is_some_and(|first| transform.to_screen(*first).distance(screen) <= tolerance);
        if near_first {
            if vertices.len() >= MIN_POLYGON_VERTICES {
                return PolygonStep::Closed(std::mem::take(vertices));
            }
            return PolygonStep::Ignored;
        }
        vertices.push(point);
        *cursor = Some(point);
        PolygonStep::Appended
    }

    /// Close the polygon without a click on the first vertex.
    pub fn finish_polygon(&mut self) -> Option<Vec<Point>> {
        match self {
            Draft::Polygon { vertices, .. } if vertices.len() >= MIN_POLYGON_VERTICES => {
                Some(std::mem::take(vertices))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDENTITY: ViewTransform = ViewTransform {
        scale_x: 1.0,
        scale_y: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    fn place(draft: &mut Draft, x: f64, y: f64) -> PolygonStep {
        draft.place_vertex(Point::new(x, y), ScreenPoint::new(x, y), &IDENTITY, 8.0)
    }

    #[test]
    fn test_polygon_closes_near_first_vertex() {
        let mut draft = Draft::polygon(Point::new(0.0, 0.0));
        assert_eq!(place(&mut draft, 10.0, 0.0), PolygonStep::Appended);
        assert_eq!(place(&mut draft, 10.0, 10.0), PolygonStep::Appended);
        assert_eq!(place(&mut draft, 0.0, 10.0), PolygonStep::Appended);

        let step = place(&mut draft, 2.0, 2.0);
        assert_eq!(
            step,
            PolygonStep::Closed(vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
                Point::new(0.0, 10.0),
            ])
        );
    }

    #[test]
    fn test_polygon_needs_three_vertices_to_close() {
        let mut draft = Draft::polygon(Point::new(0.0, 0.0));
        assert_eq!(place(&mut draft, 50.0, 0.0), PolygonStep::Appended);
        assert_eq!(place(&mut draft, 1.0, 1.0), PolygonStep::Ignored);
        assert!(draft.finish_polygon().is_none());

        assert_eq!(place(&mut draft, 50.0, 50.0), PolygonStep::Appended);
        assert_eq!(draft.finish_polygon().map(|v| v.len()), Some(3));
    }

    #[test]
    fn test_close_tolerance_is_in_screen_pixels() {
        let zoomed = ViewTransform {
            scale_x: 4.0,
            scale_y: 4.0,
            ..IDENTITY
        };
        let mut draft = Draft::Polygon {
            vertices: vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)],
            cursor: None,
        };
        // Three plane units from the first vertex are twelve screen pixels here.
        let step = draft.place_vertex(Point::new(3.0, 0.0), ScreenPoint::new(12.0, 0.0), &zoomed, 8.0);
        assert_eq!(step, PolygonStep::Appended);
    }

    #[test]
    fn test_rubber_band_follows_cursor_only() {
        let mut draft = Draft::polygon(Point::new(1.0, 1.0));
        assert!(draft.rubber_band().is_none());

        draft.track(Point::new(5.0, 6.0), ScreenPoint::new(5.0, 6.0));
        assert_eq!(draft.rubber_band(), Some((Point::new(1.0, 1.0), Point::new(5.0, 6.0))));
        let Draft::Polygon { vertices, .. } = &draft else {
            unreachable!()
        };
        assert_eq!(vertices.len(), 1);
    }

    #[test]
    fn test_marquee_overlay_spans_anchor_and_cursor() {
        let mut draft = Draft::rect(Point::new(40.0, 40.0), ScreenPoint::new(40.0, 40.0));
        assert_eq!(draft.overlay(), Some(Rect::new(40.0, 40.0, 0.0, 0.0)));

        draft.track(Point::new(10.0, 70.0), ScreenPoint::new(10.0, 70.0));
        assert_eq!(draft.overlay(), Some(Rect::new(10.0, 40.0, 30.0, 30.0)));
        assert_eq!(
            draft.finish_rect(4.0),
            Some([Point::new(10.0, 40.0), Point::new(40.0, 70.0)])
        );
    }

    #[test]
    fn test_sub_threshold_marquee_dropped() {
        let mut draft = Draft::rect(Point::new(100.0, 100.0), ScreenPoint::new(100.0, 100.0));
        draft.track(Point::new(101.0, 101.0), ScreenPoint::new(101.0, 101.0));
        assert!(draft.finish_rect(4.0).is_none());

        // A long thin sliver is still too small.
        draft.track(Point::new(300.0, 102.0), ScreenPoint::new(300.0, 102.0));
        assert!(draft.finish_rect(4.0).is_none());
    }
}
