//! Wire documents for annotation import and export.
//!
//! Two JSON shapes are exchanged, both in source-image coordinates:
//!
//! ```json
//! { "points":  [[1, 120.5, 88.0, "#ff0000"], ...],
//!   "lines":   [[1, 2, "#ff0000"], ...],
//!   "angles":  [[1, 2, 3, "#00ff00"], ...],
//!   "circles": [[4, 5, "#0000ff"], ...],
//!   "pivots":  [1, 3] }
//! ```
//!
//! and the pivot-only export `{ "pivots": [[1, 120.5, 88.0], ...] }`. A
//! document with exactly one top-level key is read as pivot-only.
//!
//! Import builds a complete new graph and only hands it back once every
//! entry has been validated, so a bad document never leaves a half-filled
//! graph behind.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::color_utils::Color;
use crate::format::error::FormatError;
use crate::geometry::Point;
use crate::model::{AnnotationGraph, PointIndex};
use crate::transform::CoordinateTransform;

/// Top-level keys of a full document.
pub const FULL_DOCUMENT_FIELDS: [&str; 5] = ["points", "lines", "angles", "circles", "pivots"];

/// Top-level key of a pivot-only document.
pub const PIVOT_DOCUMENT_FIELD: &str = "pivots";

/// `[index, x, y, color]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord(pub i64, pub f64, pub f64, pub String);

/// `[a, b, color]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRecord(pub i64, pub i64, pub String);

/// `[a, vertex, c, color]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleRecord(pub i64, pub i64, pub i64, pub String);

/// `[center, rim, color]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleRecord(pub i64, pub i64, pub String);

/// `[index, x, y]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotRecord(pub i64, pub f64, pub f64);

/// Every point and relation of an image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FullDocument {
    pub points: Vec<PointRecord>,
    pub lines: Vec<LineRecord>,
    pub angles: Vec<AngleRecord>,
    pub circles: Vec<CircleRecord>,
    pub pivots: Vec<i64>,
}

/// Positions of the pivot points only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PivotDocument {
    pub pivots: Vec<PivotRecord>,
}

/// A parsed document of either shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Full(FullDocument),
    Pivots(PivotDocument),
}

// ============================================================================
// Validation Helpers
// ============================================================================

fn point_index(value: i64) -> Result<PointIndex, FormatError> {
    match PointIndex::try_from(value) {
        Ok(index) if index > 0 => Ok(index),
        _ => Err(FormatError::InvalidIndex { index: value }),
    }
}

fn parse_color(text: &str) -> Result<Color, FormatError> {
    Color::from_hex(text).ok_or_else(|| FormatError::InvalidColor {
        value: text.to_string(),
    })
}

fn existing(graph: &AnnotationGraph, kind: &str, value: i64) -> Result<PointIndex, FormatError> {
    let index = point_index(value)?;
    if graph.contains_point(index) {
        Ok(index)
    } else {
        Err(FormatError::dangling(kind, index))
    }
}

fn insert_new_point(
    graph: &mut AnnotationGraph,
    index: PointIndex,
    position: Point,
    color: Color,
) -> Result<(), FormatError> {
    if graph.contains_point(index) {
        return Err(FormatError::invalid_format(format!(
            "duplicate point index {}",
            index
        )));
    }
    graph.insert_point(index, position, color);
    Ok(())
}

fn require_field(object: &Map<String, Value>, field: &str) -> Result<(), FormatError> {
    if object.contains_key(field) {
        Ok(())
    } else {
        Err(FormatError::missing_field(field))
    }
}

// ============================================================================
// Full Document
// ============================================================================

impl FullDocument {
    /// Capture a graph, converting positions to source coordinates.
    pub fn from_graph(graph: &AnnotationGraph, transform: &CoordinateTransform) -> Self {
        let points = graph
            .points()
            .map(|(index, p)| {
                let src = transform.display_to_source(p.position);
                PointRecord(i64::from(index), src.x, src.y, p.color.to_hex())
            })
            .collect();
        let lines = graph
            .lines()
            .map(|(key, color)| LineRecord(i64::from(key.a()), i64::from(key.b()), color.to_hex()))
            .collect();
        let angles = graph
            .angles()
            .map(|(key, color)| {
                AngleRecord(
                    i64::from(key.a()),
                    i64::from(key.vertex()),
                    i64::from(key.c()),
                    color.to_hex(),
                )
            })
            .collect();
        let circles = graph
            .circles()
            .map(|(key, color)| {
                CircleRecord(i64::from(key.center), i64::from(key.rim), color.to_hex())
            })
            .collect();
        let pivots = graph.pivots().map(i64::from).collect();

        Self {
            points,
            lines,
            angles,
            circles,
            pivots,
        }
    }

    /// Build a new graph from this document, converting positions to working
    /// coordinates.
    pub fn to_graph(&self, transform: &CoordinateTransform) -> Result<AnnotationGraph, FormatError> {
        let mut graph = AnnotationGraph::new();

        for PointRecord(index, x, y, color) in &self.points {
            let index = point_index(*index)?;
            let position = transform.source_to_display(Point::new(*x, *y));
            insert_new_point(&mut graph, index, position, parse_color(color)?)?;
        }

        for LineRecord(a, b, color) in &self.lines {
            let a = existing(&graph, "line", *a)?;
            let b = existing(&graph, "line", *b)?;
            if !graph.add_line(a, b, parse_color(color)?) {
                return Err(FormatError::invalid_format(format!(
                    "line ({}, {}) connects a point to itself",
                    a, b
                )));
            }
        }

        for AngleRecord(a, b, c, color) in &self.angles {
            let a = existing(&graph, "angle", *a)?;
            let b = existing(&graph, "angle", *b)?;
            let c = existing(&graph, "angle", *c)?;
            if !graph.add_angle(a, b, c, parse_color(color)?) {
                return Err(FormatError::invalid_format(format!(
                    "angle ({}, {}, {}) needs lines ({}, {}) and ({}, {})",
                    a, b, c, a, b, b, c
                )));
            }
        }

        for CircleRecord(center, rim, color) in &self.circles {
            let center = existing(&graph, "circle", *center)?;
            let rim = existing(&graph, "circle", *rim)?;
            if !graph.add_circle(center, rim, parse_color(color)?) {
                return Err(FormatError::invalid_format(format!(
                    "circle ({}, {}) has the same center and rim",
                    center, rim
                )));
            }
        }

        for index in &self.pivots {
            let index = existing(&graph, "pivot", *index)?;
            graph.add_pivot(index);
        }

        Ok(graph)
    }
}

// ============================================================================
// Pivot Document
// ============================================================================

impl PivotDocument {
    /// Capture the pivot points of a graph in source coordinates, by index.
    pub fn from_graph(graph: &AnnotationGraph, transform: &CoordinateTransform) -> Self {
        let pivots = graph
            .pivots()
            .filter_map(|index| {
                let src = transform.display_to_source(graph.position(index)?);
                Some(PivotRecord(i64::from(index), src.x, src.y))
            })
            .collect();
        Self { pivots }
    }

    /// Build a new graph holding one pivot point per entry, all in `color`.
    pub fn to_graph(
        &self,
        transform: &CoordinateTransform,
        color: Color,
    ) -> Result<AnnotationGraph, FormatError> {
        let mut graph = AnnotationGraph::new();
        for PivotRecord(index, x, y) in &self.pivots {
            let index = point_index(*index)?;
            let position = transform.source_to_display(Point::new(*x, *y));
            insert_new_point(&mut graph, index, position, color)?;
            graph.add_pivot(index);
        }
        Ok(graph)
    }
}

// ============================================================================
// Parsing and Files
// ============================================================================

impl Document {
    /// Parse either document shape from JSON text.
    pub fn from_json(json: &str) -> Result<Self, FormatError> {
        let value: Value = serde_json::from_str(json)?;
        let object = value
            .as_object()
            .ok_or_else(|| FormatError::invalid_format("expected a JSON object"))?;

        if object.len() == 1 {
            require_field(object, PIVOT_DOCUMENT_FIELD)?;
            Ok(Document::Pivots(serde_json::from_value(value)?))
        } else {
            for field in FULL_DOCUMENT_FIELDS {
                require_field(object, field)?;
            }
            Ok(Document::Full(serde_json::from_value(value)?))
        }
    }

    /// Read and parse a document file.
    pub fn read(path: &Path) -> Result<Self, FormatError> {
        let json = std::fs::read_to_string(path)?;
        let document = Self::from_json(&json)?;
        log::info!("Read annotation document {:?}", path);
        Ok(document)
    }

    /// Build a new graph. `color` is given to the points of a pivot-only
    /// document, which carries no colors.
    pub fn to_graph(
        &self,
        transform: &CoordinateTransform,
        color: Color,
    ) -> Result<AnnotationGraph, FormatError> {
        match self {
            Document::Full(doc) => doc.to_graph(transform),
            Document::Pivots(doc) => doc.to_graph(transform, color),
        }
    }
}

/// Serialize a document to pretty-printed JSON.
pub fn to_json<T: Serialize>(document: &T) -> Result<String, FormatError> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Write a document to `path`.
pub fn write<T: Serialize>(document: &T, path: &Path) -> Result<(), FormatError> {
    let json = to_json(document)?;
    std::fs::write(path, json)?;
    log::info!("Wrote annotation document {:?}", path);
    Ok(())
}
