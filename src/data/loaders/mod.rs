//! Built-in image sources.

mod dicom_loader;
mod image_loader;

pub use dicom_loader::DicomLoader;
pub use image_loader::RasterLoader;
