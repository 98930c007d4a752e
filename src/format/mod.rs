//! Annotation import and export.
//!
//! Annotations travel as JSON documents in source-image coordinates. See
//! [`document`] for the two document shapes and how import picks between
//! them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use medmark::format::{Document, FullDocument};
//!
//! let doc = FullDocument::from_graph(&graph, &transform);
//! medmark::format::write(&doc, path)?;
//!
//! let graph = Document::read(path)?.to_graph(&transform, default_color)?;
//! ```

pub mod document;
mod error;

pub use document::{
    AngleRecord, CircleRecord, Document, FullDocument, LineRecord, PivotDocument, PivotRecord,
    PointRecord, to_json, write,
};
pub use error::FormatError;

#[cfg(test)]
mod tests;
