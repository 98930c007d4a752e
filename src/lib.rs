//! medmark - landmark annotation for radiographic images
//!
//! Points, lines, angles and circles placed over a medical image, with
//! measurements in pixels or millimetres and JSON import/export.
//!
//! The [`editor::Editor`] drives everything: it turns pointer events into
//! edits of the [`model::AnnotationGraph`] under the active
//! [`model::LabelMode`], keeps stored points in step with the zoomed view,
//! and builds the [`render::Scene`] a painting backend draws.

pub mod color_utils;
pub mod config;
pub mod constants;
pub mod data;
pub mod editor;
pub mod format;
pub mod geometry;
pub mod model;
pub mod render;
pub mod transform;

pub use color_utils::Color;
pub use config::AppConfig;
pub use editor::{ContextTarget, Editor, EditorError, PointerOutcome};
pub use geometry::Point;
