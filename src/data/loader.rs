//! Trait-based image loading and point detection.
//!
//! Image decoding is pluggable: each format implements [`ImageSource`] and is
//! registered with a [`SourceRegistry`], which picks a source by file
//! extension. Raster formats and DICOM are built in.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use medmark::data::SourceRegistry;
//!
//! let registry = SourceRegistry::new();
//! let image = registry.load(Path::new("knee.png"))?;
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::data::LoadedImage;
use crate::geometry::Point;

/// Error type for loader operations.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file is missing, unreadable, or no source handles it
    #[error("Cannot read {path:?}: {reason}")]
    NotReadable { path: PathBuf, reason: String },

    /// The file was read but its contents could not be decoded
    #[error("Failed to decode {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The DICOM object could not be parsed or its pixel data decoded
    #[error("Invalid DICOM file {path:?}: {reason}")]
    Dicom { path: PathBuf, reason: String },
}

impl LoadError {
    /// Create a not-readable error.
    pub fn not_readable(path: &Path, reason: impl Into<String>) -> Self {
        Self::NotReadable {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Create a DICOM error.
    pub fn dicom(path: &Path, reason: impl Into<String>) -> Self {
        Self::Dicom {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Create a decode error.
    pub fn decode(path: &Path, source: image::ImageError) -> Self {
        Self::Decode {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Trait for image format loaders.
pub trait ImageSource: Send + Sync {
    /// Unique identifier for this source (e.g., "raster", "dicom").
    fn id(&self) -> &'static str;

    /// File extensions this source handles (lowercase, without dots).
    fn extensions(&self) -> &'static [&'static str];

    /// Read and decode the file at `path`.
    fn load(&self, path: &Path) -> Result<LoadedImage, LoadError>;
}

/// An external algorithm proposing landmark positions on an image.
pub trait PointDetector {
    /// Detected positions in source-image coordinates.
    fn detect(&self, image: &LoadedImage) -> Vec<Point>;
}

/// Registry of available image sources.
pub struct SourceRegistry {
    sources: Vec<Box<dyn ImageSource>>,
}

impl SourceRegistry {
    /// Create a new registry with the built-in raster and DICOM sources.
    pub fn new() -> Self {
        let mut registry = Self {
            sources: Vec::new(),
        };
        registry.register(Box::new(super::loaders::RasterLoader));
        registry.register(Box::new(super::loaders::DicomLoader));
        registry
    }

    /// Register a source. Later registrations win on shared extensions.
    pub fn register(&mut self, source: Box<dyn ImageSource>) {
        log::debug!("Registered image source '{}'", source.id());
        self.sources.insert(0, source);
    }

    /// Get all supported file extensions (for file filtering).
    pub fn supported_extensions(&self) -> Vec<&'static str> {
        let mut extensions: Vec<&'static str> = self
            .sources
            .iter()
            .flat_map(|s| s.extensions().iter().copied())
            .collect();
        extensions.sort();
        extensions.dedup();
        extensions
    }

    /// Check if a path has a supported extension.
    pub fn is_supported_file(&self, path: &Path) -> bool {
        self.source_for(path).is_some()
    }

    fn source_for(&self, path: &Path) -> Option<&dyn ImageSource> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        self.sources
            .iter()
            .find(|s| s.extensions().contains(&ext.as_str()))
            .map(|s| s.as_ref())
    }

    /// Load an image with the source registered for its extension.
    pub fn load(&self, path: &Path) -> Result<LoadedImage, LoadError> {
        let source = self
            .source_for(path)
            .ok_or_else(|| LoadError::not_readable(path, "unsupported file type"))?;
        let image = source.load(path)?;
        log::info!(
            "Loaded {:?} ({}x{}) with {} source",
            path,
            image.width(),
            image.height(),
            source.id()
        );
        Ok(image)
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageSource for SourceRegistry {
    fn id(&self) -> &'static str {
        "registry"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[]
    }

    fn load(&self, path: &Path) -> Result<LoadedImage, LoadError> {
        SourceRegistry::load(self, path)
    }
}
