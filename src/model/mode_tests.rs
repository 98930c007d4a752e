use super::*;
use crate::model::keys::{AngleKey, CircleKey};

const EPS: f64 = 1e-3;

fn ctx() -> ModeContext {
    ModeContext {
        color: Color::RED,
        point_width: 10.0,
        eps: EPS,
        width: 500.0,
        height: 400.0,
    }
}

struct Harness {
    mode: LabelMode,
    graph: AnnotationGraph,
    selection: SelectionTracker,
    ctx: ModeContext,
}

impl Harness {
    fn new(mode: LabelMode) -> Self {
        Self {
            mode,
            graph: AnnotationGraph::new(),
            selection: SelectionTracker::new(),
            ctx: ctx(),
        }
    }

    fn with_points(mode: LabelMode, positions: &[(f64, f64)]) -> Self {
        let mut h = Self::new(mode);
        for (x, y) in positions {
            h.graph.add_point(Point::new(*x, *y), Color::BLUE);
        }
        h
    }

    fn send(&mut self, event: PointerEvent) {
        handle_event(
            self.mode,
            &event,
            &mut self.graph,
            &mut self.selection,
            &self.ctx,
        );
    }

    fn click(&mut self, x: f64, y: f64) {
        self.send(PointerEvent::press(Point::new(x, y)));
    }
}

// =============================================================
// Point mode
// =============================================================

#[test]
fn test_point_mode_creates_then_recolors() {
    let mut h = Harness::new(LabelMode::Point);
    h.click(50.0, 50.0);
    assert_eq!(h.graph.point_count(), 1);
    assert_eq!(h.graph.point(1).unwrap().color, Color::RED);

    h.ctx.color = Color::GREEN;
    h.click(53.0, 52.0);
    assert_eq!(h.graph.point_count(), 1);
    assert_eq!(h.graph.point(1).unwrap().color, Color::GREEN);
    assert_eq!(h.graph.position(1), Some(Point::new(50.0, 50.0)));
}

#[test]
fn test_point_mode_ignores_other_events() {
    let mut h = Harness::new(LabelMode::Point);
    h.send(PointerEvent::press_right(Point::new(50.0, 50.0)));
    h.send(PointerEvent::moved(Point::new(50.0, 50.0)));
    h.send(PointerEvent::release(Point::new(50.0, 50.0)));
    assert!(h.graph.is_empty());
}

// =============================================================
// Line mode
// =============================================================

#[test]
fn test_line_mode_connects_two_new_points() {
    let mut h = Harness::new(LabelMode::Line);
    h.click(50.0, 50.0);
    assert_eq!(h.selection.active_count(), 1);
    assert_eq!(h.selection.fresh_indices(), vec![1]);

    h.click(150.0, 50.0);
    assert!(h.graph.has_line(1, 2));
    assert_eq!(h.selection.active_count(), 0);
    assert_eq!(h.selection.hover(), Some(2));
}

#[test]
fn test_line_mode_reuses_existing_points() {
    let mut h = Harness::with_points(LabelMode::Line, &[(50.0, 50.0), (150.0, 50.0)]);
    h.click(51.0, 49.0);
    h.click(149.0, 51.0);
    assert_eq!(h.graph.point_count(), 2);
    assert_eq!(h.graph.line_color(1, 2), Some(Color::RED));
}

#[test]
fn test_line_mode_second_click_on_same_point_deselects() {
    let mut h = Harness::new(LabelMode::Line);
    h.click(50.0, 50.0);
    h.click(50.0, 50.0);
    assert_eq!(h.selection.active_count(), 0);
    assert_eq!(h.graph.point_count(), 1);
    assert_eq!(h.graph.lines().count(), 0);
}

#[test]
fn test_cancel_gesture_erases_fresh_points_only() {
    let mut h = Harness::with_points(LabelMode::Line, &[(50.0, 50.0)]);
    h.click(300.0, 300.0);
    assert_eq!(h.graph.point_count(), 2);

    cancel_gesture(&mut h.graph, &mut h.selection);
    assert_eq!(h.graph.point_count(), 1);
    assert!(h.graph.contains_point(1));
    assert_eq!(h.selection.active_count(), 0);

    // Pre-existing selections survive a cancel
    h.click(50.0, 50.0);
    cancel_gesture(&mut h.graph, &mut h.selection);
    assert!(h.graph.contains_point(1));
}

// =============================================================
// Angle mode
// =============================================================

fn right_angle_harness() -> Harness {
    let mut h = Harness::with_points(
        LabelMode::Angle,
        &[(100.0, 100.0), (200.0, 100.0), (200.0, 200.0), (300.0, 300.0)],
    );
    h.graph.add_line(1, 2, Color::BLUE);
    h.graph.add_line(2, 3, Color::BLUE);
    h
}

#[test]
fn test_angle_mode_marks_angle() {
    let mut h = right_angle_harness();
    h.click(100.0, 100.0);
    h.click(200.0, 100.0);
    assert_eq!(h.selection.active_count(), 2);
    h.click(200.0, 200.0);

    let key = AngleKey::new(1, 2, 3);
    assert_eq!(h.graph.angle_color(key), Some(Color::RED));
    assert!((h.graph.angle_degree(key).unwrap() - 90.0).abs() < 1e-9);
    assert_eq!(h.selection.active_count(), 0);
    assert_eq!(h.selection.hover(), Some(3));
}

#[test]
fn test_angle_mode_never_creates_points() {
    let mut h = right_angle_harness();
    h.click(400.0, 50.0);
    assert_eq!(h.graph.point_count(), 4);
    assert_eq!(h.selection.active_count(), 0);
}

#[test]
fn test_angle_mode_unconnected_pair_keeps_latest_pick() {
    let mut h = right_angle_harness();
    h.click(100.0, 100.0);
    h.click(300.0, 300.0);
    assert_eq!(h.selection.indices(), vec![4]);
}

#[test]
fn test_angle_mode_missing_second_arm_restarts_from_third() {
    let mut h = right_angle_harness();
    // Picks 2, 1, 3: the first arm (2, 1) exists but (1, 3) does not.
    h.click(200.0, 100.0);
    h.click(100.0, 100.0);
    h.click(200.0, 200.0);
    assert_eq!(h.graph.angles().count(), 0);
    assert_eq!(h.selection.indices(), vec![3]);
}

// =============================================================
// Circle mode
// =============================================================

#[test]
fn test_circle_mode_press_move_press() {
    let mut h = Harness::new(LabelMode::Circle);
    h.click(100.0, 100.0);
    assert_eq!(h.graph.point_count(), 2);
    let rim = h.graph.position(2).unwrap();
    assert!((rim.x - (100.0 + 2.0 * EPS)).abs() < 1e-12);
    assert!(h.graph.circle_color(CircleKey::new(1, 2)).is_some());
    assert_eq!(h.selection.active_count(), 2);

    h.send(PointerEvent::moved(Point::new(130.0, 140.0)));
    assert_eq!(h.graph.position(2), Some(Point::new(130.0, 140.0)));

    // Out of bounds: rim stays where it was
    h.send(PointerEvent::moved(Point::new(498.0, 140.0)));
    assert_eq!(h.graph.position(2), Some(Point::new(130.0, 140.0)));

    h.click(130.0, 140.0);
    assert_eq!(h.selection.active_count(), 0);
    assert_eq!(h.selection.hover(), Some(2));
    assert_eq!(h.graph.point_count(), 2);
}

#[test]
fn test_circle_mode_around_existing_center() {
    let mut h = Harness::with_points(LabelMode::Circle, &[(100.0, 100.0)]);
    h.click(102.0, 101.0);
    assert_eq!(h.graph.point_count(), 2);
    assert!(h.graph.circle_color(CircleKey::new(1, 2)).is_some());
    assert_eq!(h.selection.fresh_indices(), vec![2]);

    cancel_gesture(&mut h.graph, &mut h.selection);
    assert_eq!(h.graph.point_count(), 1);
    assert_eq!(h.graph.circles().count(), 0);
}

// =============================================================
// Midpoint mode
// =============================================================

#[test]
fn test_midpoint_mode_adds_midpoint_of_line() {
    let mut h = Harness::with_points(LabelMode::Midpoint, &[(100.0, 100.0), (200.0, 300.0)]);
    h.graph.add_line(1, 2, Color::BLUE);
    h.click(100.0, 100.0);
    h.click(200.0, 300.0);
    assert_eq!(h.graph.position(3), Some(Point::new(150.0, 200.0)));
    assert_eq!(h.selection.hover(), Some(2));
    assert_eq!(h.graph.lines().count(), 1);
}

#[test]
fn test_midpoint_mode_without_line_keeps_latest_pick() {
    let mut h = Harness::with_points(LabelMode::Midpoint, &[(100.0, 100.0), (200.0, 300.0)]);
    h.click(100.0, 100.0);
    h.click(200.0, 300.0);
    assert_eq!(h.graph.point_count(), 2);
    assert_eq!(h.selection.indices(), vec![2]);
}

// =============================================================
// Vertical mode
// =============================================================

#[test]
fn test_vertical_mode_foot_inside_segment() {
    let mut h = Harness::with_points(LabelMode::Vertical, &[(0.0, 0.0), (10.0, 0.0), (5.0, 5.0)]);
    h.graph.add_line(1, 2, Color::BLUE);
    h.click(0.0, 0.0);
    h.click(10.0, 0.0);
    h.click(5.0, 5.0);

    let foot = h.graph.position(4).unwrap();
    assert!((foot.x - 5.0).abs() < 1e-9);
    assert!(foot.y.abs() < 1e-9);
    assert!(h.graph.has_line(3, 4));
    assert!(!h.graph.has_line(1, 4));
    assert!(!h.graph.has_line(2, 4));
    assert_eq!(h.graph.lines().count(), 2);
    assert_eq!(h.selection.hover(), Some(3));
}

#[test]
fn test_vertical_mode_foot_outside_segment_connects_nearer_end() {
    let mut h = Harness::with_points(
        LabelMode::Vertical,
        &[(100.0, 100.0), (200.0, 100.0), (250.0, 150.0)],
    );
    h.graph.add_line(1, 2, Color::BLUE);
    h.click(100.0, 100.0);
    h.click(200.0, 100.0);
    h.click(250.0, 150.0);

    assert_eq!(h.graph.position(4), Some(Point::new(250.0, 100.0)));
    assert!(h.graph.has_line(2, 4));
    assert!(!h.graph.has_line(1, 4));
    assert!(h.graph.has_line(3, 4));
}

#[test]
fn test_vertical_mode_collinear_never_creates_foot() {
    let mut h = Harness::with_points(
        LabelMode::Vertical,
        &[(100.0, 100.0), (200.0, 100.0), (300.0, 100.0)],
    );
    h.graph.add_line(1, 2, Color::BLUE);
    h.click(100.0, 100.0);
    h.click(200.0, 100.0);
    h.click(300.0, 100.0);
    assert_eq!(h.graph.point_count(), 3);
    assert_eq!(h.selection.indices(), vec![3]);

    // With (b, c) connected, the selection slides forward to (b, c).
    let mut h = Harness::with_points(
        LabelMode::Vertical,
        &[(100.0, 100.0), (200.0, 100.0), (300.0, 100.0)],
    );
    h.graph.add_line(1, 2, Color::BLUE);
    h.graph.add_line(2, 3, Color::BLUE);
    h.click(100.0, 100.0);
    h.click(200.0, 100.0);
    h.click(300.0, 100.0);
    assert_eq!(h.graph.point_count(), 3);
    assert_eq!(h.selection.indices(), vec![2, 3]);
}

#[test]
fn test_vertical_mode_requires_base_line() {
    let mut h = Harness::with_points(LabelMode::Vertical, &[(100.0, 100.0), (200.0, 100.0)]);
    h.click(100.0, 100.0);
    h.click(200.0, 100.0);
    assert_eq!(h.selection.indices(), vec![2]);
}

// =============================================================
// Drag mode
// =============================================================

#[test]
fn test_drag_mode_moves_point_until_release() {
    let mut h = Harness::with_points(LabelMode::Drag, &[(100.0, 100.0)]);
    h.click(101.0, 101.0);
    assert_eq!(h.selection.indices(), vec![1]);

    h.send(PointerEvent::moved(Point::new(120.0, 90.0)));
    assert_eq!(h.graph.position(1), Some(Point::new(120.0, 90.0)));

    // Too close to the top edge
    h.send(PointerEvent::moved(Point::new(120.0, 2.0)));
    assert_eq!(h.graph.position(1), Some(Point::new(120.0, 90.0)));

    h.send(PointerEvent::release(Point::new(120.0, 2.0)));
    assert_eq!(h.selection.active_count(), 0);

    h.send(PointerEvent::moved(Point::new(200.0, 200.0)));
    assert_eq!(h.graph.position(1), Some(Point::new(120.0, 90.0)));
}

#[test]
fn test_drag_mode_press_on_empty_space_does_nothing() {
    let mut h = Harness::with_points(LabelMode::Drag, &[(100.0, 100.0)]);
    h.click(300.0, 300.0);
    assert_eq!(h.selection.active_count(), 0);
    assert_eq!(h.graph.point_count(), 1);
}

// =============================================================
// Erase mode
// =============================================================

#[test]
fn test_erase_mode_cascades() {
    let mut h = Harness::with_points(LabelMode::ErasePoint, &[(100.0, 100.0), (200.0, 100.0)]);
    h.graph.add_line(1, 2, Color::BLUE);
    h.graph.add_pivot(1);
    h.selection.set_hover(Some(1));

    h.click(100.0, 100.0);
    assert!(!h.graph.contains_point(1));
    assert_eq!(h.graph.lines().count(), 0);
    assert_eq!(h.graph.pivots().count(), 0);
    assert_eq!(h.selection.hover(), None);
    assert_eq!(h.graph.nearest_point(Point::new(100.0, 100.0), ctx().hit_radius()), None);
}

#[test]
fn test_creating_modes_stop_at_largest_index() {
    for mode in [LabelMode::Point, LabelMode::Line, LabelMode::Circle] {
        let mut h = Harness::with_points(mode, &[(100.0, 100.0)]);
        h.graph.relabel(1, i64::from(PointIndex::MAX)).unwrap();

        h.click(300.0, 300.0);
        assert_eq!(h.graph.point_count(), 1, "{:?}", mode);
        assert_eq!(h.selection.active_count(), 0, "{:?}", mode);
        assert!(h.graph.circles().next().is_none());
    }
}

#[test]
fn test_circle_around_existing_center_at_largest_index_adds_nothing() {
    let mut h = Harness::with_points(LabelMode::Circle, &[(100.0, 100.0)]);
    h.graph.relabel(1, i64::from(PointIndex::MAX)).unwrap();
    h.click(100.0, 100.0);
    assert_eq!(h.graph.point_count(), 1);
    assert_eq!(h.selection.active_count(), 0);
}

#[test]
fn test_mode_names_are_unique() {
    let names: std::collections::HashSet<_> = LabelMode::all().iter().map(|m| m.name()).collect();
    assert_eq!(names.len(), LabelMode::all().len());
}
