//! Unit tests for annotation documents.
//!
//! These tests cover parsing of both document shapes, validation of bad
//! input, and export/import round trips through memory and files.
