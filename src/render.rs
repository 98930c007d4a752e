//! Renderer-facing scene description.
//!
//! The painting backend is not part of this crate. It receives a [`Scene`]:
//! flat lists of primitives with their effective color, label text and label
//! position already worked out, plus the pen and font sizes to use.
//!
//! A scene is built either in display space (working image, with hover and
//! highlight emphasis) or in source space (full-resolution image, no
//! emphasis, sizes scaled up so labels keep their on-screen proportions).

use crate::color_utils::Color;
use crate::config::StyleConfig;
use crate::geometry::{self, Point, Rect};
use crate::model::{
    AngleKey, AnnotationGraph, CircleKey, LabelMode, LineKey, PointIndex, SelectionTracker,
};
use crate::transform::CoordinateTransform;

/// Coordinate space a scene is built in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderSpace {
    /// Working image shown in the view
    Display,
    /// Full-resolution source image, for saving
    Source,
}

/// Pen and font sizes for one scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStyle {
    pub point_width: f64,
    pub line_width: f64,
    pub angle_width: f64,
    pub font_size: f64,
}

impl RenderStyle {
    fn from_config(style: &StyleConfig, factor: f64) -> Self {
        Self {
            point_width: style.point_width * factor,
            line_width: style.line_width * factor,
            angle_width: style.angle_width * factor,
            font_size: style.font_size * factor,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointPrimitive {
    pub index: PointIndex,
    pub position: Point,
    pub color: Color,
    pub label: String,
    pub label_anchor: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinePrimitive {
    pub key: LineKey,
    pub from: Point,
    pub to: Point,
    pub color: Color,
    /// Length in millimetres when pixel spacing is known, else in source pixels
    pub label: String,
    pub label_anchor: Point,
}

/// An arc at the vertex of an angle. Degrees follow the painter convention:
/// counterclockwise on screen, zero at three o'clock.
#[derive(Debug, Clone, PartialEq)]
pub struct AnglePrimitive {
    pub key: AngleKey,
    pub rect: Rect,
    pub start_degree: f64,
    pub sweep_degree: f64,
    pub color: Color,
    pub label: String,
    pub label_anchor: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CirclePrimitive {
    pub key: CircleKey,
    pub rect: Rect,
    pub color: Color,
}

/// Everything the painter draws over the image, in drawing order.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub space: RenderSpace,
    pub style: RenderStyle,
    pub points: Vec<PointPrimitive>,
    pub lines: Vec<LinePrimitive>,
    pub angles: Vec<AnglePrimitive>,
    pub circles: Vec<CirclePrimitive>,
}

impl Scene {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
            && self.lines.is_empty()
            && self.angles.is_empty()
            && self.circles.is_empty()
    }
}

/// State a scene is built from.
#[derive(Debug, Clone, Copy)]
pub struct SceneInput<'a> {
    pub graph: &'a AnnotationGraph,
    pub selection: &'a SelectionTracker,
    pub mode: LabelMode,
    pub transform: &'a CoordinateTransform,
    pub pixel_spacing: Option<(f64, f64)>,
    pub style: &'a StyleConfig,
}

/// Label for a segment between two source-space points.
pub fn distance_label(a: Point, b: Point, pixel_spacing: Option<(f64, f64)>) -> String {
    match pixel_spacing {
        Some((sx, sy)) => {
            let d = geometry::distance(a.scaled_xy(sx, sy), b.scaled_xy(sx, sy));
            format!("{:.2} mm", d)
        }
        None => format!("{:.2} px", geometry::distance(a, b)),
    }
}

/// Label for an angle in degrees.
pub fn degree_label(degree: f64) -> String {
    format!("{:.2}°", degree)
}

/// Build the scene for the current state.
pub fn build_scene(input: &SceneInput<'_>, space: RenderSpace) -> Scene {
    let emphasize = space == RenderSpace::Display;
    let factor = match space {
        RenderSpace::Display => 1.0,
        RenderSpace::Source => input.transform.to_source(),
    };
    let graph = input.graph;
    let selection = input.selection;
    let out = |p: Point| p.scaled(factor);

    let points = graph
        .points()
        .map(|(index, p)| {
            let color = if emphasize && selection.is_emphasized(index) {
                p.color.lighter()
            } else {
                p.color
            };
            PointPrimitive {
                index,
                position: out(p.position),
                color,
                label: index.to_string(),
                label_anchor: out(geometry::index_label_anchor(p.position)),
            }
        })
        .collect();

    let both_highlighted =
        |a: PointIndex, b: PointIndex| selection.is_highlighted(a) && selection.is_highlighted(b);

    let lines = graph
        .lines()
        .filter_map(|(key, color)| {
            let a = graph.position(key.a())?;
            let b = graph.position(key.b())?;
            let lit = emphasize && input.mode.highlights_lines() && both_highlighted(key.a(), key.b());
            let src_a = input.transform.display_to_source(a);
            let src_b = input.transform.display_to_source(b);
            Some(LinePrimitive {
                key,
                from: out(a),
                to: out(b),
                color: if lit { color.lighter() } else { color },
                label: distance_label(src_a, src_b, input.pixel_spacing),
                label_anchor: out(geometry::distance_label_anchor(a, b)),
            })
        })
        .collect();

    let angles = graph
        .angles()
        .filter_map(|(key, color)| {
            let a = graph.position(key.a())?;
            let b = graph.position(key.vertex())?;
            let c = graph.position(key.c())?;
            let degree = geometry::angle_degree(a, b, c);
            let arc_mid = geometry::arc_midpoint(a, b, c);
            Some(AnglePrimitive {
                key,
                rect: geometry::arc_bounding_rect(a, b, c).scaled(factor),
                start_degree: geometry::arc_start_degree(a, b, c),
                sweep_degree: degree,
                color,
                label: degree_label(degree),
                label_anchor: out(geometry::degree_label_anchor(b, arc_mid)),
            })
        })
        .collect();

    let circles = graph
        .circles()
        .filter_map(|(key, color)| {
            let center = graph.position(key.center)?;
            let rim = graph.position(key.rim)?;
            let lit = emphasize
                && input.mode.highlights_circles()
                && both_highlighted(key.center, key.rim);
            Some(CirclePrimitive {
                key,
                rect: geometry::circle_bounding_rect(center, rim).scaled(factor),
                color: if lit { color.lighter() } else { color },
            })
        })
        .collect();

    Scene {
        space,
        style: RenderStyle::from_config(input.style, factor),
        points,
        lines,
        angles,
        circles,
    }
}
