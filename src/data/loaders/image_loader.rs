//! Loader for standard raster formats (PNG, JPEG, BMP, TIFF, WebP).

use std::path::Path;

use crate::data::LoadedImage;
use crate::data::loader::{ImageSource, LoadError};

/// Loader for standard image formats.
///
/// Pixels are converted to RGBA. Raster files carry no physical pixel
/// spacing, so measurements on them are reported in pixels.
pub struct RasterLoader;

impl ImageSource for RasterLoader {
    fn id(&self) -> &'static str {
        "raster"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["png", "jpg", "jpeg", "bmp", "tiff", "tif", "webp"]
    }

    fn load(&self, path: &Path) -> Result<LoadedImage, LoadError> {
        if !path.is_file() {
            return Err(LoadError::not_readable(path, "no such file"));
        }

        let pixels = image::open(path)
            .map_err(|e| match e {
                image::ImageError::IoError(io) => LoadError::not_readable(path, io.to_string()),
                other => LoadError::decode(path, other),
            })?
            .to_rgba8();

        log::trace!(
            "RasterLoader: decoded {}x{} image",
            pixels.width(),
            pixels.height()
        );

        Ok(LoadedImage::new(pixels, path))
    }
}
