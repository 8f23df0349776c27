//! # tweaks-optimizer
//!
//! Derives eager-loading directives from serializer declarations. Given a
//! root serializer, the [`Optimizer`] walks every field that will be rendered
//! and sorts the relations it touches into two sets of `__`-separated paths:
//!
//! - **select related**: to-one relations, joined into the root query
//! - **prefetch related**: to-many relations and everything below them,
//!   fetched with one extra query per relation
//!
//! Missing metadata never fails an optimization; the affected branch is
//! simply left unoptimized.

pub mod base;
pub mod classifier;
pub mod leaf;
pub mod nested;
pub mod observer;
pub mod optimizer;

pub use base::{clean_fields, Optimize, OptimizerScope, PathSet, RelatedPaths};
pub use classifier::{classify, FieldOptimizer};
pub use leaf::{
    LeafOptimizer, MethodFieldOptimizer, OwnName, PrimaryKeyRelatedOptimizer, RelatedFieldOptimizer, RelationName,
    SourceOptimizer, SourceRoot,
};
pub use nested::{
    AsymmetricRelatedOptimizer, AsymmetricTarget, ListChild, ListSerializerOptimizer, ManyRelatedChild,
    ManyRelatedOptimizer, NestedOptimizer, NestedSelf, NestedSerializerOptimizer, NestedSerializerResolver,
};
pub use observer::{NoopObserver, OptimizationObserver, TracingObserver};
pub use optimizer::Optimizer;
