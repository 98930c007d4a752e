//! Decoded source image and the paths derived from it.

use std::path::{Path, PathBuf};

use image::RgbaImage;

/// A decoded source image, as handed over by an [`super::ImageSource`].
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Full-resolution pixels
    pub pixels: RgbaImage,
    /// Physical size of one pixel (column, row), in millimetres
    pub pixel_spacing: Option<(f64, f64)>,
    /// Free-form description of the study, shown next to the image
    pub metadata: Option<String>,
    /// File the image was read from
    pub path: PathBuf,
    /// Whether the file was a DICOM object rather than a plain raster
    pub is_dicom: bool,
}

impl LoadedImage {
    /// Wrap decoded pixels read from `path`.
    pub fn new(pixels: RgbaImage, path: impl Into<PathBuf>) -> Self {
        Self {
            pixels,
            pixel_spacing: None,
            metadata: None,
            path: path.into(),
            is_dicom: false,
        }
    }

    pub fn with_pixel_spacing(mut self, column: f64, row: f64) -> Self {
        self.pixel_spacing = Some((column, row));
        self
    }

    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }

    pub fn as_dicom(mut self) -> Self {
        self.is_dicom = true;
        self
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Directory holding the image, offered as the start of the next file dialog.
    pub fn directory(&self) -> Option<&Path> {
        self.path.parent()
    }

    /// Default path for the full annotation export: `<stem>.json`.
    pub fn suggested_annotation_path(&self) -> PathBuf {
        self.sibling_with_suffix(".json")
    }

    /// Default path for the pivot-only export: `<stem>_pivots.json`.
    pub fn suggested_pivot_path(&self) -> PathBuf {
        self.sibling_with_suffix("_pivots.json")
    }

    /// Default path for the image with labels burned in.
    ///
    /// Raster sources are overwritten in place; DICOM sources get `<stem>.jpg`.
    pub fn suggested_render_path(&self) -> PathBuf {
        if self.is_dicom {
            self.sibling_with_suffix(".jpg")
        } else {
            self.path.clone()
        }
    }

    fn sibling_with_suffix(&self, suffix: &str) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string());
        self.path.with_file_name(format!("{}{}", stem, suffix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_at(path: &str) -> LoadedImage {
        LoadedImage::new(RgbaImage::new(4, 3), path)
    }

    #[test]
    fn test_dimensions() {
        let img = image_at("scan.png");
        assert_eq!(img.width(), 4);
        assert_eq!(img.height(), 3);
        assert_eq!(img.pixel_spacing, None);
    }

    #[test]
    fn test_suggested_paths() {
        let img = image_at("/data/knee/scan.png");
        assert_eq!(
            img.suggested_annotation_path(),
            PathBuf::from("/data/knee/scan.json")
        );
        assert_eq!(
            img.suggested_pivot_path(),
            PathBuf::from("/data/knee/scan_pivots.json")
        );
        assert_eq!(
            img.suggested_render_path(),
            PathBuf::from("/data/knee/scan.png")
        );
        assert_eq!(img.directory(), Some(Path::new("/data/knee")));
    }

    #[test]
    fn test_dicom_render_path_is_jpeg() {
        let img = image_at("/data/hip/study.dcm")
            .as_dicom()
            .with_pixel_spacing(0.2, 0.25)
            .with_metadata("Patient: anonymous");
        assert_eq!(
            img.suggested_render_path(),
            PathBuf::from("/data/hip/study.jpg")
        );
        assert_eq!(img.pixel_spacing, Some((0.2, 0.25)));
        assert_eq!(img.metadata.as_deref(), Some("Patient: anonymous"));
    }
}
