// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Element data structures and the functional element-list operations.
//!
//! An element is a region of interest: two points encode an axis-aligned
//! rectangle by its opposite corners, three or more encode a polygon. The
//! bounding `rect` is always derived from `points` and cannot be set on its
//! own. Every list operation here returns a new list and leaves its input
//! untouched; the host owns the list.

use serde::{Deserialize, Serialize};

use super::mode::ShapeKind;
use crate::util::geometry::{point_in_polygon, Point, Rect};

/// Generate a fresh element identifier.
pub fn new_element_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A region of interest over the image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ElementRecord")]
pub struct Element {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub selected: bool,
    points: Vec<Point>,
    rect: Rect,
}

/// Wire form of an element. `rect` is ignored on input and re-derived.
#[derive(Deserialize)]
struct ElementRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    label: String,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    selected: bool,
    #[serde(default)]
    points: Vec<Point>,
}

impl From<ElementRecord> for Element {
    fn from(record: ElementRecord) -> Self {
        let mut element = Element::new(record.points);
        if let Some(id) = record.id.filter(|id| !id.is_empty()) {
            element.id = id;
        }
        element.label = record.label;
        element.color = record.color;
        element.selected = record.selected;
        element
    }
}

impl Element {
    /// Create an unselected, unlabeled element with a fresh id.
    pub fn new(points: Vec<Point>) -> Self {
        let rect = Rect::bounding(&points).unwrap_or_default();
        Self {
            id: new_element_id(),
            label: String::new(),
            color: None,
            selected: false,
            points,
            rect,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Replace the geometry, re-deriving the bounding box.
    pub fn set_points(&mut self, points: Vec<Point>) {
        self.rect = Rect::bounding(&points).unwrap_or_default();
        self.points = points;
    }

    /// Whether this element behaves as an axis-aligned rectangle: the
    /// two-corner encoding always does, and in rectangle mode so does a
    /// four-point polygon whose vertices are exactly its bounding corners.
    pub fn is_rectangle(&self, shape: ShapeKind) -> bool {
        match self.points.len() {
            2 => true,
            4 if shape == ShapeKind::Rect => {
                let (min, max) = (self.rect.min(), self.rect.max());
                self.points
                    .iter()
                    .all(|p| (p.x == min.x || p.x == max.x) && (p.y == min.y || p.y == max.y))
            }
            _ => false,
        }
    }

    /// Hit test against the element body.
    pub fn contains(&self, p: Point, shape: ShapeKind) -> bool {
        if self.is_rectangle(shape) {
            self.rect.contains(p)
        } else {
            point_in_polygon(p, &self.points)
        }
    }
}

/// Partial change applied by [`update`]. `points` wins over `rect`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    pub points: Option<Vec<Point>>,
    pub rect: Option<Rect>,
    pub label: Option<String>,
    pub color: Option<String>,
}

/// Select `id` exclusively. An unknown id leaves nothing selected.
pub fn select(elements: &[Element], id: &str) -> Vec<Element> {
    elements
        .iter()
        .map(|e| Element {
            selected: e.id == id,
            ..e.clone()
        })
        .collect()
}

pub fn deselect_all(elements: &[Element]) -> Vec<Element> {
    elements
        .iter()
        .map(|e| Element {
            selected: false,
            ..e.clone()
        })
        .collect()
}

/// Merge a partial change into the element with the given id.
pub fn update(elements: &[Element], id: &str, patch: &ElementPatch) -> Vec<Element> {
    elements
        .iter()
        .map(|e| {
            if e.id != id {
                return e.clone();
            }
            let mut next = e.clone();
            if let Some(points) = &patch.points {
                next.set_points(points.clone());
            } else if let Some(rect) = patch.rect {
                next.set_points(vec![rect.min(), rect.max()]);
            }
            if let Some(label) = &patch.label {
                next.label = label.clone();
            }
            if let Some(color) = &patch.color {
                next.color = Some(color.clone());
            }
            next
        })
        .collect()
}

/// The single exit gate for geometry reported to the host.
///
/// Points are rounded to integers and every `rect` is recomputed. Two-point
/// rectangles are written as min corner then max corner. In rectangle mode a
/// four-point polygon collapses the same way; in polygon mode polygons keep
/// all their points. Elements with fewer than two points belong to the host
/// and pass through with their points untouched.
pub fn normalize(elements: &[Element], shape: ShapeKind) -> Vec<Element> {
    elements
        .iter()
        .map(|e| {
            if e.points.len() < 2 {
                return Element {
                    rect: Rect::bounding(&e.points).unwrap_or_default(),
                    ..e.clone()
                };
            }
            let mut points: Vec<Point> = e.points.iter().map(|p| p.round()).collect();
            let rect = Rect::bounding(&points).unwrap_or_default();
            if points.len() == 2 || (shape == ShapeKind::Rect && points.len() == 4) {
                points = vec![rect.min(), rect.max()];
            }
            Element {
                points,
                rect,
                ..e.clone()
            }
        })
        .collect()
}
