//! Display scaling and the mapping between working and source coordinates.
//!
//! The working image is the source image fitted into the viewport and then
//! scaled by the zoom level. Points are stored in working coordinates, so
//! whenever the working size changes every stored point is rescaled once.
//! Import, export and measurements go through [`CoordinateTransform`] to
//! reach source-image coordinates.

use crate::constants::{FRAME_WIDTH, zoom};
use crate::geometry::Point;
use crate::model::AnnotationGraph;

/// Integer pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Largest size with the aspect ratio of `source` that fits inside `bounds`.
///
/// Uses truncating integer arithmetic; never returns a zero dimension.
pub fn fit_keep_aspect(source: Size, bounds: Size) -> Size {
    if source.is_empty() {
        return Size::new(1, 1);
    }
    let sw = u64::from(source.width);
    let sh = u64::from(source.height);
    let bw = u64::from(bounds.width);
    let bh = u64::from(bounds.height);

    let rw = bh * sw / sh;
    let (w, h) = if rw <= bw { (rw, bh) } else { (bw, bw * sh / sw) };
    let clamp = |v: u64| u32::try_from(v).unwrap_or(u32::MAX).max(1);
    Size::new(clamp(w), clamp(h))
}

/// Zoom level in percent of the fitted image size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomLevel(u32);

impl ZoomLevel {
    /// Create a zoom level, clamped to the supported range.
    pub fn new(percent: u32) -> Self {
        Self(percent.clamp(zoom::MIN_PERCENT, zoom::MAX_PERCENT))
    }

    pub fn percent(&self) -> u32 {
        self.0
    }

    pub fn factor(&self) -> f64 {
        f64::from(self.0) / 100.0
    }

    pub fn zoomed_in(&self) -> Self {
        Self::new(self.0.saturating_add(zoom::STEP_PERCENT))
    }

    pub fn zoomed_out(&self) -> Self {
        Self::new(self.0.saturating_sub(zoom::STEP_PERCENT))
    }
}

impl Default for ZoomLevel {
    fn default() -> Self {
        Self(zoom::DEFAULT_PERCENT)
    }
}

/// Working image size for a viewport: the viewport minus its frame, scaled by
/// the zoom level, with the source fitted inside.
pub fn working_size(source: Size, viewport: Size, zoom: ZoomLevel) -> Size {
    let inner = |v: u32| f64::from(v.saturating_sub(2 * FRAME_WIDTH)) * zoom.factor();
    // Viewport sizes are far below u32::MAX, truncation toward zero is intended.
    let bounds = Size::new(inner(viewport.width) as u32, inner(viewport.height) as u32);
    fit_keep_aspect(source, bounds)
}

/// The two ratios tying stored points to the working and source images.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    /// Pending rescale of stored points (new working width / old working width)
    from_old: f64,
    /// Working to source scale (source width / working width)
    to_source: f64,
}

impl CoordinateTransform {
    /// Identity transform: working space equals source space.
    pub fn identity() -> Self {
        Self {
            from_old: 1.0,
            to_source: 1.0,
        }
    }

    pub fn from_old(&self) -> f64 {
        self.from_old
    }

    pub fn to_source(&self) -> f64 {
        self.to_source
    }

    pub fn display_to_source(&self, p: Point) -> Point {
        p.scaled(self.to_source)
    }

    pub fn source_to_display(&self, p: Point) -> Point {
        Point::new(p.x / self.to_source, p.y / self.to_source)
    }

    /// Record a change of working size from `old` to `new` for a source of
    /// width `source_width`. Points are not touched until [`Self::apply`].
    pub fn update(&mut self, source_width: u32, old: Size, new: Size) {
        if old.width == 0 || new.width == 0 {
            return;
        }
        self.from_old = f64::from(new.width) / f64::from(old.width);
        self.to_source = f64::from(source_width) / f64::from(new.width);
    }

    /// Rescale every stored point by the pending ratio, then reset it to 1.
    ///
    /// Applying twice is the same as applying once.
    pub fn apply(&mut self, graph: &mut AnnotationGraph) {
        if self.from_old != 1.0 {
            graph.scale_positions(self.from_old);
            log::debug!("Rescaled points by {:.4}", self.from_old);
        }
        self.from_old = 1.0;
    }
}

impl Default for CoordinateTransform {
    fn default() -> Self {
        Self::identity()
    }
}
