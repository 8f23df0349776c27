//! # tweaks-orm: record-type descriptors
//!
//! Describes what a record type exposes to the serialization layer: plain
//! columns, computed properties and relation accessors, together with the
//! relation objects the model actually declares. The optimizer reads these
//! descriptors to decide between select related and prefetch related.

pub mod error;
pub mod model;
pub mod relationships;

pub use error::*;
pub use model::*;
pub use relationships::*;
