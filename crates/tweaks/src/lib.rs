//! # tweaks
//!
//! Works out, from the fields a serializer renders, which relations a
//! query should join (select related) and which it should fetch in batched
//! follow-up queries (prefetch related).
//!
//! This is the umbrella package re-exporting the tweaks crates.
//!
//! ```rust
//! use std::sync::Arc;
//! use tweaks::prelude::*;
//!
//! let post = ModelMeta::builder("Post")
//!     .column("title")
//!     .belongs_to("author", "User")
//!     .build()
//!     .unwrap();
//! let serializer = Serializer::builder("PostSerializer")
//!     .model(Arc::new(post))
//!     .field(Field::attribute("title"))
//!     .field(Field::primary_key_related("author"))
//!     .build()
//!     .unwrap();
//!
//! let (select_related, prefetch_related) = Optimizer::default().run(&serializer, "", false);
//! assert!(select_related.contains("author"));
//! assert!(prefetch_related.is_empty());
//! ```

// Re-export all sub-packages as modules
pub use tweaks_core as core;
pub use tweaks_optimizer as optimizer;
pub use tweaks_orm as orm;
pub use tweaks_serializers as serializers;
pub use tweaks_testing as testing;

// Re-export common types at root level for convenience
pub use tweaks_core::{init_tracing, ConfigError, TweaksConfig};
pub use tweaks_optimizer::{Optimizer, PathSet, RelatedPaths};
pub use tweaks_serializers::{SerializationContext, Serializer, SerializerError};

pub mod prelude;

/// Current version of tweaks
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version
pub fn version() -> &'static str {
    VERSION
}
