//! # tweaks-serializers
//!
//! Serializer and field descriptors for the tweaks optimizer, plus the
//! representation tricks built on them:
//!
//! - **Dynamic fields**: `fields` / `include_fields` filters narrowed per
//!   nesting level, and on-demand fields hidden unless requested
//! - **Asymmetric related fields**: a primary key on write, the full related
//!   record on read when included
//! - **Context passing**: child serializers see the filters scoped to them
//!
//! Field kinds are tagged when a field is declared, so consumers such as the
//! optimizer match on [`FieldKind`] instead of inspecting types.

pub mod context;
pub mod error;
pub mod fields;
pub mod filters;
pub mod registry;
pub mod serializer;

pub use context::{pass_context, SerializationContext};
pub use error::{SerializerError, SerializerResult};
pub use fields::{AsymmetricRelatedField, Field, FieldKind, ManyRelatedField, RelatedFlavor, SerializerClass};
pub use filters::{filter_field_name, filter_fields, top_level_names, FieldFilter, FieldFilters, FIELD_SEPARATOR};
pub use registry::SerializerRegistry;
pub use serializer::{Serializer, SerializerBuilder, SerializerMeta};
