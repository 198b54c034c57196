//! Utility functions shared across layers.
//!
//! - [`code_generator`] - Fingerprints, slot suffixes and candidate codes

pub mod code_generator;
