//! Optimizers for fields that never recurse
//!
//! A leaf field touches at most one relation of its model. The variants only
//! differ in which attribute name they look up.

use tweaks_orm::ModelMeta;
use tweaks_serializers::Field;

use crate::base::{optimize_relation, Optimize, OptimizerScope, RelatedPaths};

/// Picks the model attribute a leaf field reads its relation from
pub trait RelationName {
    fn relation_name<'f>(&self, field: &'f Field, field_name: &'f str) -> &'f str;
}

/// Field with a dotted source: the first segment is the relation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceRoot;

impl RelationName for SourceRoot {
    fn relation_name<'f>(&self, field: &'f Field, _field_name: &'f str) -> &'f str {
        field.source_root()
    }
}

/// Field named after the relation it reads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OwnName;

impl RelationName for OwnName {
    fn relation_name<'f>(&self, _field: &'f Field, field_name: &'f str) -> &'f str {
        field_name
    }
}

/// Optimizer for a non-recursive relation field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafOptimizer<R> {
    scope: OptimizerScope,
    field_name: String,
    resolver: R,
}

impl<R: RelationName + Default> LeafOptimizer<R> {
    pub fn new(scope: OptimizerScope, field_name: impl Into<String>) -> Self {
        Self {
            scope,
            field_name: field_name.into(),
            resolver: R::default(),
        }
    }
}

impl<R> LeafOptimizer<R> {
    pub fn scope(&self) -> &OptimizerScope {
        &self.scope
    }
}

impl<R: RelationName> Optimize for LeafOptimizer<R> {
    fn optimize(&self, field: &Field, prefix: &str, model: &ModelMeta, to_prefetch: bool) -> RelatedPaths {
        let name = self.resolver.relation_name(field, &self.field_name);
        optimize_relation(name, prefix, model, to_prefetch)
    }
}

/// Dotted-source field, e.g. `author_name` reading `author.name`
pub type SourceOptimizer = LeafOptimizer<SourceRoot>;
/// Serializer method field named after a relation
pub type MethodFieldOptimizer = LeafOptimizer<OwnName>;
/// Primary key related field
pub type PrimaryKeyRelatedOptimizer = LeafOptimizer<OwnName>;
/// Plain related field
pub type RelatedFieldOptimizer = LeafOptimizer<OwnName>;
