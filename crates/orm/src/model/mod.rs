//! Model metadata consumed by the serialization layer

pub mod meta;

pub use meta::*;
