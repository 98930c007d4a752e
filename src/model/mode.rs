//! Editing modes and the pointer-event state machine that drives them.
//!
//! Each mode consumes one [`PointerEvent`] at a time and edits the
//! [`AnnotationGraph`] and [`SelectionTracker`] in place. A handler runs to
//! completion before the next event is looked at. Events a mode does not
//! care about (wrong kind, wrong button, not enough points selected yet) are
//! silently ignored: they mean "keep waiting", not failure.

use serde::{Deserialize, Serialize};

use crate::color_utils::Color;
use crate::geometry::{self, Point};
use crate::model::graph::AnnotationGraph;
use crate::model::keys::PointIndex;
use crate::model::selection::{SelectionSlot, SelectionTracker};

/// Editing modes available in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelMode {
    /// Place points, or recolor an existing one
    #[default]
    Point,
    /// Connect two points with a line
    Line,
    /// Mark the angle between two lines sharing a vertex
    Angle,
    /// Place a circle and drag out its radius
    Circle,
    /// Add the midpoint of an existing line
    Midpoint,
    /// Drop a perpendicular from a point onto an existing line
    Vertical,
    /// Drag a point to a new position
    Drag,
    /// Erase points
    ErasePoint,
}

impl LabelMode {
    /// Get the display name for this mode.
    pub fn name(&self) -> &'static str {
        match self {
            LabelMode::Point => "Point",
            LabelMode::Line => "Line",
            LabelMode::Angle => "Angle",
            LabelMode::Circle => "Circle",
            LabelMode::Midpoint => "Midpoint",
            LabelMode::Vertical => "Perpendicular",
            LabelMode::Drag => "Move Point",
            LabelMode::ErasePoint => "Erase Point",
        }
    }

    /// Get all modes in menu order.
    pub fn all() -> &'static [LabelMode] {
        &[
            LabelMode::Point,
            LabelMode::Line,
            LabelMode::Angle,
            LabelMode::Circle,
            LabelMode::Midpoint,
            LabelMode::Vertical,
            LabelMode::Drag,
            LabelMode::ErasePoint,
        ]
    }

    /// Whether lines between two highlighted points are drawn emphasized.
    pub fn highlights_lines(&self) -> bool {
        matches!(self, LabelMode::Angle | LabelMode::Vertical)
    }

    /// Whether circles between two highlighted points are drawn emphasized.
    pub fn highlights_circles(&self) -> bool {
        matches!(self, LabelMode::Circle)
    }
}

// ============================================================================
// Pointer Events
// ============================================================================

/// Kind of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Press,
    Move,
    Release,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

/// A pointer event in working (displayed image) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: EventKind,
    pub button: Option<MouseButton>,
    pub position: Point,
}

impl PointerEvent {
    pub fn press(position: Point) -> Self {
        Self {
            kind: EventKind::Press,
            button: Some(MouseButton::Left),
            position,
        }
    }

    pub fn press_right(position: Point) -> Self {
        Self {
            kind: EventKind::Press,
            button: Some(MouseButton::Right),
            position,
        }
    }

    pub fn moved(position: Point) -> Self {
        Self {
            kind: EventKind::Move,
            button: None,
            position,
        }
    }

    pub fn release(position: Point) -> Self {
        Self {
            kind: EventKind::Release,
            button: Some(MouseButton::Left),
            position,
        }
    }

    /// Left-button press, the event that triggers structural edits.
    pub fn is_primary_press(&self) -> bool {
        self.kind == EventKind::Press && self.button == Some(MouseButton::Left)
    }

    pub fn is_secondary_press(&self) -> bool {
        self.kind == EventKind::Press && self.button == Some(MouseButton::Right)
    }
}

// ============================================================================
// Handler Context
// ============================================================================

/// Per-event parameters the handlers need from the surrounding editor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeContext {
    /// Color given to anything created by this event
    pub color: Color,
    /// Rendered point diameter; also bounds how close a click must be
    pub point_width: f64,
    /// Keeps hit tests strict and offsets synthetic points
    pub eps: f64,
    /// Width of the working image
    pub width: f64,
    /// Height of the working image
    pub height: f64,
}

impl ModeContext {
    /// Radius within which a click picks an existing point.
    pub fn hit_radius(&self) -> f64 {
        self.point_width - self.eps
    }

    /// Whether a drag target keeps the whole point inside the image.
    pub fn in_bounds(&self, p: Point) -> bool {
        let half = self.point_width / 2.0;
        p.x >= half && p.x <= self.width - half && p.y >= half && p.y <= self.height - half
    }
}

/// Mutable view over the state one event may edit.
struct Gesture<'a> {
    graph: &'a mut AnnotationGraph,
    selection: &'a mut SelectionTracker,
    ctx: &'a ModeContext,
}

impl Gesture<'_> {
    fn nearest(&self, p: Point) -> Option<PointIndex> {
        self.graph.nearest_point(p, self.ctx.hit_radius())
    }

    /// Pick the point under the cursor, or create one there.
    fn resolve_or_create(&mut self, p: Point) -> Option<SelectionSlot> {
        match self.nearest(p) {
            Some(index) => Some(SelectionSlot::existing(index)),
            None => self
                .graph
                .add_point(p, self.ctx.color)
                .map(SelectionSlot::created),
        }
    }

    /// Toggle the point under the cursor, if there is one. Never creates.
    fn toggle_nearest(&mut self, p: Point) {
        if let Some(index) = self.nearest(p) {
            self.selection.toggle(SelectionSlot::existing(index));
        }
    }

    /// Drop the first selected point, keeping the rest.
    fn drop_first(&mut self) {
        if let Some(a) = self.selection.a() {
            self.selection.toggle(a);
        }
    }

    fn slot_indices(&self) -> (PointIndex, PointIndex, PointIndex) {
        let at = |slot: Option<SelectionSlot>| slot.map(|s| s.index).unwrap_or_default();
        (
            at(self.selection.a()),
            at(self.selection.b()),
            at(self.selection.c()),
        )
    }

    fn positions(&self, indices: [PointIndex; 3]) -> Option<[Point; 3]> {
        Some([
            self.graph.position(indices[0])?,
            self.graph.position(indices[1])?,
            self.graph.position(indices[2])?,
        ])
    }
}

/// Feed one pointer event to the handler of `mode`.
pub fn handle_event(
    mode: LabelMode,
    event: &PointerEvent,
    graph: &mut AnnotationGraph,
    selection: &mut SelectionTracker,
    ctx: &ModeContext,
) {
    let mut gesture = Gesture {
        graph,
        selection,
        ctx,
    };
    match mode {
        LabelMode::Point => handle_point(&mut gesture, event),
        LabelMode::Line => handle_line(&mut gesture, event),
        LabelMode::Angle => handle_angle(&mut gesture, event),
        LabelMode::Circle => handle_circle(&mut gesture, event),
        LabelMode::Midpoint => handle_midpoint(&mut gesture, event),
        LabelMode::Vertical => handle_vertical(&mut gesture, event),
        LabelMode::Drag => handle_drag(&mut gesture, event),
        LabelMode::ErasePoint => handle_erase_point(&mut gesture, event),
    }
}

/// Abort the gesture in progress: erase the points it created, then clear
/// selection, hover and highlight.
pub fn cancel_gesture(graph: &mut AnnotationGraph, selection: &mut SelectionTracker) {
    for index in selection.fresh_indices() {
        graph.erase_point(index);
        log::debug!("Cancelled gesture removed point {}", index);
    }
    selection.clear();
}

// ============================================================================
// Mode Handlers
// ============================================================================

fn handle_point(g: &mut Gesture<'_>, event: &PointerEvent) {
    if !event.is_primary_press() {
        return;
    }
    match g.nearest(event.position) {
        Some(index) => {
            g.graph.set_point_color(index, g.ctx.color);
        }
        None => {
            g.graph.add_point(event.position, g.ctx.color);
        }
    }
}

fn handle_line(g: &mut Gesture<'_>, event: &PointerEvent) {
    if !event.is_primary_press() {
        return;
    }
    let Some(slot) = g.resolve_or_create(event.position) else {
        return;
    };
    g.selection.toggle(slot);
    if g.selection.active_count() == 2 {
        let (a, b, _) = g.slot_indices();
        g.graph.add_line(a, b, g.ctx.color);
        g.selection.clear_with_hover(b);
    }
}

fn handle_angle(g: &mut Gesture<'_>, event: &PointerEvent) {
    if !event.is_primary_press() {
        return;
    }
    g.toggle_nearest(event.position);
    let (a, b, c) = g.slot_indices();
    match g.selection.active_count() {
        2 if !g.graph.has_line(a, b) => g.drop_first(),
        3 => {
            if g.graph.has_line(b, c) {
                g.graph.add_angle(a, b, c, g.ctx.color);
                g.selection.clear_with_hover(c);
            } else {
                g.selection.restart_with(SelectionSlot::existing(c));
            }
        }
        _ => {}
    }
}

fn handle_circle(g: &mut Gesture<'_>, event: &PointerEvent) {
    if event.is_primary_press() {
        match g.selection.active_count() {
            0 => {
                let Some(center) = g.resolve_or_create(event.position) else {
                    return;
                };
                let offset = 2.0 * g.ctx.eps;
                let rim = g
                    .graph
                    .add_point(event.position.offset(offset, offset), g.ctx.color);
                let Some(rim) = rim else {
                    if center.is_fresh() {
                        g.graph.erase_point(center.index);
                    }
                    return;
                };
                g.selection.toggle(center);
                g.selection.toggle(SelectionSlot::created(rim));
                g.graph.add_circle(center.index, rim, g.ctx.color);
            }
            2 => {
                let (_, rim, _) = g.slot_indices();
                g.selection.clear_with_hover(rim);
            }
            _ => {}
        }
    } else if event.kind == EventKind::Move
        && g.selection.active_count() == 2
        && g.ctx.in_bounds(event.position)
    {
        let (_, rim, _) = g.slot_indices();
        g.graph.move_point(rim, event.position);
    }
}

fn handle_midpoint(g: &mut Gesture<'_>, event: &PointerEvent) {
    if !event.is_primary_press() {
        return;
    }
    g.toggle_nearest(event.position);
    if g.selection.active_count() != 2 {
        return;
    }
    let (a, b, _) = g.slot_indices();
    let ends = g.graph.position(a).zip(g.graph.position(b));
    match ends {
        Some((pa, pb)) if g.graph.has_line(a, b) => {
            g.graph.add_point(geometry::midpoint(pa, pb), g.ctx.color);
            g.selection.clear_with_hover(b);
        }
        _ => g.drop_first(),
    }
}

fn handle_vertical(g: &mut Gesture<'_>, event: &PointerEvent) {
    if !event.is_primary_press() {
        return;
    }
    g.toggle_nearest(event.position);
    let (a, b, c) = g.slot_indices();
    match g.selection.active_count() {
        2 if !g.graph.has_line(a, b) => g.drop_first(),
        3 => {
            let Some([pa, pb, pc]) = g.positions([a, b, c]) else {
                return;
            };
            if geometry::is_collinear(pa, pb, pc) {
                if g.graph.has_line(b, c) {
                    g.drop_first();
                } else {
                    g.selection.restart_with(SelectionSlot::existing(c));
                }
                return;
            }
            let foot = geometry::foot_of_perpendicular(pa, pb, pc);
            let Some(d) = g.graph.add_point(foot, g.ctx.color) else {
                return;
            };
            if !geometry::is_on_segment(pa, pb, foot) {
                let nearer = if geometry::distance(pa, foot) < geometry::distance(pb, foot) {
                    a
                } else {
                    b
                };
                g.graph.add_line(nearer, d, g.ctx.color);
            }
            g.graph.add_line(c, d, g.ctx.color);
            g.selection.clear_with_hover(c);
        }
        _ => {}
    }
}

fn handle_drag(g: &mut Gesture<'_>, event: &PointerEvent) {
    let count = g.selection.active_count();
    match event.kind {
        EventKind::Press if event.is_primary_press() && count == 0 => {
            g.toggle_nearest(event.position);
        }
        EventKind::Move if count == 1 && g.ctx.in_bounds(event.position) => {
            let (a, _, _) = g.slot_indices();
            g.graph.move_point(a, event.position);
        }
        EventKind::Release if count == 1 => g.drop_first(),
        _ => {}
    }
}

fn handle_erase_point(g: &mut Gesture<'_>, event: &PointerEvent) {
    if !event.is_primary_press() {
        return;
    }
    if let Some(index) = g.nearest(event.position) {
        g.graph.erase_point(index);
        g.selection.forget(index);
    }
}

#[cfg(test)]
#[path = "mode_tests.rs"]
mod mode_tests;
