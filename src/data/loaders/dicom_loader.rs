//! Loader for DICOM (`.dcm`) radiographs.
//!
//! The first frame is decoded to RGBA. PixelSpacing (0028,0030) becomes the
//! image's pixel spacing so lengths can be reported in millimetres, and the
//! patient and study tags are collected into the metadata text.

use std::path::Path;

use dicom_core::Tag;
use dicom_dictionary_std::tags;
use dicom_object::DefaultDicomObject;
use dicom_pixeldata::PixelDecoder;
use image::RgbaImage;

use crate::data::LoadedImage;
use crate::data::loader::{ImageSource, LoadError};

/// Tags shown in the metadata text, in display order.
const INFO_TAGS: [(&str, Tag); 7] = [
    ("Patient Name", tags::PATIENT_NAME),
    ("Patient ID", tags::PATIENT_ID),
    ("Sex", tags::PATIENT_SEX),
    ("Age", tags::PATIENT_AGE),
    ("Birth Date", tags::PATIENT_BIRTH_DATE),
    ("Study Date", tags::STUDY_DATE),
    ("Modality", tags::MODALITY),
];

/// Loader for DICOM files.
pub struct DicomLoader;

impl DicomLoader {
    fn decode_pixels(object: &DefaultDicomObject, path: &Path) -> Result<RgbaImage, LoadError> {
        let decoded = object
            .decode_pixel_data()
            .map_err(|e| LoadError::dicom(path, e.to_string()))?;
        let frame = decoded
            .to_dynamic_image(0)
            .map_err(|e| LoadError::dicom(path, e.to_string()))?
            .to_rgba8();

        // Rebuilt from raw bytes so the decoder's `image` version never leaks out
        let (width, height) = (frame.width(), frame.height());
        RgbaImage::from_raw(width, height, frame.into_raw())
            .ok_or_else(|| LoadError::dicom(path, "pixel buffer does not match frame size"))
    }

    /// `(column, row)` spacing in millimetres. The tag stores row spacing first.
    fn pixel_spacing(object: &DefaultDicomObject) -> Option<(f64, f64)> {
        let values = object.get(tags::PIXEL_SPACING)?.to_multi_float64().ok()?;
        match values.as_slice() {
            [row, column, ..] if *row > 0.0 && *column > 0.0 => Some((*column, *row)),
            _ => None,
        }
    }

    fn metadata(object: &DefaultDicomObject) -> Option<String> {
        let lines: Vec<String> = INFO_TAGS
            .iter()
            .filter_map(|(label, tag)| {
                let value = object.get(*tag)?.to_str().ok()?;
                let value = value.trim_end_matches(['\0', ' ']).trim();
                (!value.is_empty()).then(|| format!("{}: {}", label, value))
            })
            .collect();
        (!lines.is_empty()).then(|| lines.join("\n"))
    }
}

impl ImageSource for DicomLoader {
    fn id(&self) -> &'static str {
        "dicom"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["dcm"]
    }

    fn load(&self, path: &Path) -> Result<LoadedImage, LoadError> {
        if !path.is_file() {
            return Err(LoadError::not_readable(path, "no such file"));
        }

        let object =
            dicom_object::open_file(path).map_err(|e| LoadError::dicom(path, e.to_string()))?;
        let pixels = Self::decode_pixels(&object, path)?;

        let mut image = LoadedImage::new(pixels, path).as_dicom();
        match Self::pixel_spacing(&object) {
            Some((column, row)) => image = image.with_pixel_spacing(column, row),
            None => log::warn!("{:?} has no usable PixelSpacing, lengths stay in pixels", path),
        }
        if let Some(metadata) = Self::metadata(&object) {
            image = image.with_metadata(metadata);
        }

        log::trace!(
            "DicomLoader: decoded {}x{} frame, spacing {:?}",
            image.width(),
            image.height(),
            image.pixel_spacing
        );
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_core::{DataElement, PrimitiveValue, VR, dicom_value};
    use dicom_object::{FileMetaTableBuilder, InMemDicomObject};

    const EXPLICIT_VR_LE: &str = "1.2.840.10008.1.2.1";
    const CR_IMAGE_STORAGE: &str = "1.2.840.10008.5.1.4.1.1.1";

    /// Write a 6x4 8-bit monochrome radiograph.
    fn write_radiograph(path: &Path, spacing: Option<[&str; 2]>) {
        let (rows, columns) = (4_u16, 6_u16);
        let pixels: Vec<u8> = (0..rows * columns).map(|v| (v * 10) as u8).collect();

        let mut elements = vec![
            DataElement::new(tags::SOP_CLASS_UID, VR::UI, PrimitiveValue::from(CR_IMAGE_STORAGE)),
            DataElement::new(tags::SOP_INSTANCE_UID, VR::UI, PrimitiveValue::from("2.25.4242")),
            DataElement::new(tags::PATIENT_NAME, VR::PN, PrimitiveValue::from("Doe^Jane")),
            DataElement::new(tags::PATIENT_ID, VR::LO, PrimitiveValue::from("P-001")),
            DataElement::new(tags::MODALITY, VR::CS, PrimitiveValue::from("CR")),
            DataElement::new(tags::SAMPLES_PER_PIXEL, VR::US, PrimitiveValue::from(1_u16)),
            DataElement::new(
                tags::PHOTOMETRIC_INTERPRETATION,
                VR::CS,
                PrimitiveValue::from("MONOCHROME2"),
            ),
            DataElement::new(tags::ROWS, VR::US, PrimitiveValue::from(rows)),
            DataElement::new(tags::COLUMNS, VR::US, PrimitiveValue::from(columns)),
            DataElement::new(tags::BITS_ALLOCATED, VR::US, PrimitiveValue::from(8_u16)),
            DataElement::new(tags::BITS_STORED, VR::US, PrimitiveValue::from(8_u16)),
            DataElement::new(tags::HIGH_BIT, VR::US, PrimitiveValue::from(7_u16)),
            DataElement::new(tags::PIXEL_REPRESENTATION, VR::US, PrimitiveValue::from(0_u16)),
            DataElement::new(tags::PIXEL_DATA, VR::OB, PrimitiveValue::from(pixels)),
        ];
        if let Some([row, column]) = spacing {
            elements.push(DataElement::new(
                tags::PIXEL_SPACING,
                VR::DS,
                dicom_value!(Strs, [row, column]),
            ));
        }

        InMemDicomObject::from_element_iter(elements)
            .with_meta(
                FileMetaTableBuilder::new()
                    .transfer_syntax(EXPLICIT_VR_LE)
                    .media_storage_sop_class_uid(CR_IMAGE_STORAGE)
                    .media_storage_sop_instance_uid("2.25.4242"),
            )
            .unwrap()
            .write_to_file(path)
            .unwrap();
    }

    #[test]
    fn test_loader_metadata() {
        assert_eq!(DicomLoader.id(), "dicom");
        assert_eq!(DicomLoader.extensions(), &["dcm"]);
    }

    #[test]
    fn test_load_radiograph_with_spacing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("knee.dcm");
        write_radiograph(&path, Some(["0.2", "0.1"]));

        let image = DicomLoader.load(&path).unwrap();
        assert_eq!((image.width(), image.height()), (6, 4));
        assert!(image.is_dicom);
        // Row spacing comes first in the tag
        assert_eq!(image.pixel_spacing, Some((0.1, 0.2)));

        let metadata = image.metadata.as_deref().unwrap();
        assert!(metadata.contains("Patient Name: Doe^Jane"));
        assert!(metadata.contains("Patient ID: P-001"));
        assert!(metadata.contains("Modality: CR"));
        assert_eq!(image.suggested_render_path(), dir.path().join("knee.jpg"));
    }

    #[test]
    fn test_load_radiograph_without_spacing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.dcm");
        write_radiograph(&path, None);

        let image = DicomLoader.load(&path).unwrap();
        assert!(image.is_dicom);
        assert_eq!(image.pixel_spacing, None);
    }

    #[test]
    fn test_missing_file_is_not_readable() {
        let dir = tempfile::tempdir().unwrap();
        let err = DicomLoader.load(&dir.path().join("missing.dcm")).unwrap_err();
        assert!(matches!(err, LoadError::NotReadable { .. }));
    }

    #[test]
    fn test_garbage_is_dicom_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.dcm");
        std::fs::write(&path, b"not a dicom file").unwrap();
        let err = DicomLoader.load(&path).unwrap_err();
        assert!(matches!(err, LoadError::Dicom { .. }));
    }
}
