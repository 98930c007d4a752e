//! The annotation graph: points and the lines, angles and circles built on them.
//!
//! Relations are keyed by point indices only, so they never hold positions of
//! their own. Every mutation keeps the references closed: a relation exists
//! only while all the points it names exist, and an angle exists only while
//! both of its arms exist as lines.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::color_utils::Color;
use crate::geometry::{self, Point};
use crate::model::keys::{AngleKey, CircleKey, LineKey, PointIndex};

/// A labeled point: where it sits in working space and how it is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotatedPoint {
    pub position: Point,
    pub color: Color,
}

impl AnnotatedPoint {
    pub fn new(position: Point, color: Color) -> Self {
        Self { position, color }
    }
}

/// Reasons a point cannot be given a new index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelabelError {
    /// The requested index is zero or negative
    #[error("Point index must be a positive integer, got {0}")]
    InvalidTarget(i64),

    /// Another point already uses the requested index
    #[error("Point index {0} is already in use")]
    Conflict(PointIndex),

    /// The point being relabeled does not exist
    #[error("Point {0} does not exist")]
    MissingSource(PointIndex),
}

/// Storage for all annotation geometry on one image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationGraph {
    points: BTreeMap<PointIndex, AnnotatedPoint>,
    lines: BTreeMap<LineKey, Color>,
    angles: BTreeMap<AngleKey, Color>,
    circles: BTreeMap<CircleKey, Color>,
    pivots: BTreeSet<PointIndex>,
}

impl AnnotationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if there are no points (and therefore nothing else).
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Remove every point, relation and pivot.
    pub fn clear(&mut self) {
        self.points.clear();
        self.lines.clear();
        self.angles.clear();
        self.circles.clear();
        self.pivots.clear();
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn point(&self, index: PointIndex) -> Option<&AnnotatedPoint> {
        self.points.get(&index)
    }

    pub fn position(&self, index: PointIndex) -> Option<Point> {
        self.points.get(&index).map(|p| p.position)
    }

    pub fn contains_point(&self, index: PointIndex) -> bool {
        self.points.contains_key(&index)
    }

    /// Points in ascending index order.
    pub fn points(&self) -> impl Iterator<Item = (PointIndex, &AnnotatedPoint)> {
        self.points.iter().map(|(i, p)| (*i, p))
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn lines(&self) -> impl Iterator<Item = (LineKey, Color)> + '_ {
        self.lines.iter().map(|(k, c)| (*k, *c))
    }

    pub fn angles(&self) -> impl Iterator<Item = (AngleKey, Color)> + '_ {
        self.angles.iter().map(|(k, c)| (*k, *c))
    }

    pub fn circles(&self) -> impl Iterator<Item = (CircleKey, Color)> + '_ {
        self.circles.iter().map(|(k, c)| (*k, *c))
    }

    /// Pivot indices in ascending order.
    pub fn pivots(&self) -> impl Iterator<Item = PointIndex> + '_ {
        self.pivots.iter().copied()
    }

    pub fn is_pivot(&self, index: PointIndex) -> bool {
        self.pivots.contains(&index)
    }

    pub fn has_line(&self, a: PointIndex, b: PointIndex) -> bool {
        self.lines.contains_key(&LineKey::new(a, b))
    }

    pub fn line_color(&self, a: PointIndex, b: PointIndex) -> Option<Color> {
        self.lines.get(&LineKey::new(a, b)).copied()
    }

    pub fn angle_color(&self, key: AngleKey) -> Option<Color> {
        self.angles.get(&key).copied()
    }

    pub fn circle_color(&self, key: CircleKey) -> Option<Color> {
        self.circles.get(&key).copied()
    }

    /// Interior angle in degrees of a stored angle.
    pub fn angle_degree(&self, key: AngleKey) -> Option<f64> {
        if !self.angles.contains_key(&key) {
            return None;
        }
        let a = self.position(key.a())?;
        let b = self.position(key.vertex())?;
        let c = self.position(key.c())?;
        Some(geometry::angle_degree(a, b, c))
    }

    /// The index a newly added point receives, or `None` once the largest
    /// index is taken.
    pub fn next_index(&self) -> Option<PointIndex> {
        self.points.keys().next_back().copied().unwrap_or(0).checked_add(1)
    }

    /// Find the point closest to `position` among those strictly within `radius`.
    ///
    /// Ties keep the lower index.
    pub fn nearest_point(&self, position: Point, radius: f64) -> Option<PointIndex> {
        let mut best = radius;
        let mut index = None;
        for (i, p) in &self.points {
            let d = p.position.distance_to(&position);
            if d < best {
                best = d;
                index = Some(*i);
            }
        }
        index
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Add a point with the next free index and return that index.
    ///
    /// Returns `None`, leaving the graph untouched, when no index is left
    /// above the current maximum.
    pub fn add_point(&mut self, position: Point, color: Color) -> Option<PointIndex> {
        let Some(index) = self.next_index() else {
            log::warn!("No point index left above {}", PointIndex::MAX);
            return None;
        };
        self.points
            .insert(index, AnnotatedPoint::new(position, color));
        log::debug!(
            "Added point {} at ({:.1}, {:.1})",
            index,
            position.x,
            position.y
        );
        Some(index)
    }

    /// Store a point under an explicit index, replacing any point already there.
    ///
    /// Index zero is rejected.
    pub(crate) fn insert_point(&mut self, index: PointIndex, position: Point, color: Color) -> bool {
        if index == 0 {
            return false;
        }
        self.points
            .insert(index, AnnotatedPoint::new(position, color));
        true
    }

    /// Change a point's color. Returns false if the point does not exist.
    pub fn set_point_color(&mut self, index: PointIndex, color: Color) -> bool {
        match self.points.get_mut(&index) {
            Some(point) => {
                point.color = color;
                true
            }
            None => false,
        }
    }

    /// Move a point. Returns false if the point does not exist.
    pub fn move_point(&mut self, index: PointIndex, position: Point) -> bool {
        match self.points.get_mut(&index) {
            Some(point) => {
                point.position = position;
                true
            }
            None => false,
        }
    }

    /// Multiply every stored position by `factor`.
    pub fn scale_positions(&mut self, factor: f64) {
        for point in self.points.values_mut() {
            point.position = point.position.scaled(factor);
        }
    }

    /// Connect two existing, distinct points. Returns whether the line was stored.
    pub fn add_line(&mut self, a: PointIndex, b: PointIndex, color: Color) -> bool {
        if a == b || !self.contains_point(a) || !self.contains_point(b) {
            return false;
        }
        self.lines.insert(LineKey::new(a, b), color);
        log::debug!("Added line ({}, {})", a.min(b), a.max(b));
        true
    }

    /// Mark ∠abc. Both arms must already exist as lines.
    pub fn add_angle(&mut self, a: PointIndex, b: PointIndex, c: PointIndex, color: Color) -> bool {
        if !self.has_line(a, b) || !self.has_line(b, c) || a == c {
            return false;
        }
        let key = AngleKey::new(a, b, c);
        self.angles.insert(key, color);
        log::debug!("Added angle {:?}", key.as_tuple());
        true
    }

    /// Add a circle around `center` through `rim`. Both points must exist.
    pub fn add_circle(&mut self, center: PointIndex, rim: PointIndex, color: Color) -> bool {
        if center == rim || !self.contains_point(center) || !self.contains_point(rim) {
            return false;
        }
        self.circles.insert(CircleKey::new(center, rim), color);
        log::debug!("Added circle ({}, {})", center, rim);
        true
    }

    /// Remove a point together with every relation that names it.
    ///
    /// Returns false (and changes nothing) if the point does not exist.
    pub fn erase_point(&mut self, index: PointIndex) -> bool {
        if self.points.remove(&index).is_none() {
            return false;
        }
        self.lines.retain(|key, _| !key.contains(index));
        self.angles.retain(|key, _| !key.contains(index));
        self.circles.retain(|key, _| !key.contains(index));
        self.pivots.remove(&index);
        log::debug!("Erased point {}", index);
        true
    }

    /// Give point `old` the index `new`, rewriting every reference to it.
    ///
    /// Validation happens before anything is touched, so a failed relabel
    /// leaves the graph unchanged.
    pub fn relabel(&mut self, old: PointIndex, new: i64) -> Result<PointIndex, RelabelError> {
        if new <= 0 {
            return Err(RelabelError::InvalidTarget(new));
        }
        let new = PointIndex::try_from(new).map_err(|_| RelabelError::InvalidTarget(new))?;
        if self.points.contains_key(&new) {
            return Err(RelabelError::Conflict(new));
        }
        let point = self
            .points
            .remove(&old)
            .ok_or(RelabelError::MissingSource(old))?;
        self.points.insert(new, point);

        self.lines = std::mem::take(&mut self.lines)
            .into_iter()
            .map(|(key, color)| (key.relabeled(old, new), color))
            .collect();
        self.angles = std::mem::take(&mut self.angles)
            .into_iter()
            .map(|(key, color)| (key.relabeled(old, new), color))
            .collect();
        self.circles = std::mem::take(&mut self.circles)
            .into_iter()
            .map(|(key, color)| (key.relabeled(old, new), color))
            .collect();
        if self.pivots.remove(&old) {
            self.pivots.insert(new);
        }

        log::debug!("Relabeled point {} -> {}", old, new);
        Ok(new)
    }

    /// Flag an existing point as a pivot. Returns whether it is a pivot afterwards.
    pub fn add_pivot(&mut self, index: PointIndex) -> bool {
        if self.contains_point(index) {
            self.pivots.insert(index);
            true
        } else {
            false
        }
    }

    /// Flip pivot membership. Returns whether the point is a pivot afterwards.
    pub fn toggle_pivot(&mut self, index: PointIndex) -> bool {
        if self.pivots.remove(&index) {
            false
        } else {
            self.add_pivot(index)
        }
    }
}
