//! Global constants for the medmark annotation engine

/// Diameter of a rendered point, also the hit-test radius for point picking
pub const POINT_WIDTH: f64 = 10.0;

/// Stroke width for lines and circles
pub const LINE_WIDTH: f64 = 2.0;

/// Stroke width for angle arcs
pub const ANGLE_WIDTH: f64 = 2.0;

/// Label font size in points
pub const FONT_SIZE: f64 = 12.0;

/// Small distance used to keep hit tests strict and to offset synthetic points
pub const EPS: f64 = 1e-3;

/// Width of the frame drawn around the image view, subtracted on both sides
pub const FRAME_WIDTH: u32 = 1;

/// Tolerance on the sine of the angle between two directions for collinearity
pub const COLLINEAR_TOLERANCE: f64 = 1e-6;

/// Zoom constants (percent of the fitted image size)
pub mod zoom {
    /// Smallest zoom level
    pub const MIN_PERCENT: u32 = 50;
    /// Largest zoom level
    pub const MAX_PERCENT: u32 = 200;
    /// Increment applied by zoom in/out commands
    pub const STEP_PERCENT: u32 = 10;
    /// Zoom level of a fresh project
    pub const DEFAULT_PERCENT: u32 = 100;
}

/// Placement of text labels relative to the geometry they describe
pub mod label {
    /// Fraction of the shorter angle edge used as the arc radius
    pub const ARC_RADIUS_RATIO: f64 = 0.25;
    /// Upper bound on the arc radius in working pixels
    pub const ARC_RADIUS_MAX: f64 = 40.0;
    /// Offset of the index label from its point, along both axes
    pub const INDEX_OFFSET: f64 = 8.0;
    /// Perpendicular offset of a distance label from the line midpoint
    pub const DISTANCE_OFFSET: f64 = 10.0;
    /// Offset of a degree label past the arc midpoint, along the bisector
    pub const DEGREE_OFFSET: f64 = 10.0;
}
