//! # Prelude
//!
//! ```rust
//! use tweaks::prelude::*;
//! ```

// Configuration
pub use crate::{init_tracing, ConfigError, TweaksConfig};
pub use tweaks_core::{LintConfig, LoggingConfig, OptimizerConfig};

// Model metadata
pub use tweaks_orm::{ModelMeta, RelationshipType};

// Serializers
pub use tweaks_serializers::{
    Field, FieldFilters, FieldKind, RelatedFlavor, SerializationContext, Serializer, SerializerClass,
    SerializerError, SerializerRegistry,
};

// Optimizer
pub use tweaks_optimizer::{OptimizationObserver, Optimizer, PathSet, RelatedPaths};

// Test utilities
pub use tweaks_testing::{DatabaseAccessLinter, TestError};

// JSON helper
pub use serde_json::json;
