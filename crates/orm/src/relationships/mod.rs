//! Relationships Module - relation descriptors and their classification

pub mod metadata;

pub use metadata::*;
