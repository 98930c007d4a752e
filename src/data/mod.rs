//! Source images, the loaders that decode them and the point-detection seam.
//!
//! This module provides:
//! - `LoadedImage`: decoded pixels plus optional pixel spacing and metadata
//! - `SourceRegistry`: picks an `ImageSource` by file extension
//! - `PointDetector`: external landmark detection over a loaded image
//!
//! Raster formats and DICOM are registered by default.
//!
//! ## Adding New Formats
//!
//! To add support for a new format:
//!
//! 1. Implement `ImageSource` for it
//! 2. Register it with `SourceRegistry::register`

mod loaded;
mod loader;
pub mod loaders;

pub use loaded::LoadedImage;
pub use loader::{ImageSource, LoadError, PointDetector, SourceRegistry};
