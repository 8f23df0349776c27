//! Field classification
//!
//! Maps a declared field to the optimizer able to handle it.

use tweaks_orm::ModelMeta;
use tweaks_serializers::{Field, FieldKind, RelatedFlavor};

use crate::base::{Optimize, OptimizerScope, RelatedPaths};
use crate::leaf::{MethodFieldOptimizer, PrimaryKeyRelatedOptimizer, RelatedFieldOptimizer, SourceOptimizer};
use crate::nested::{
    AsymmetricRelatedOptimizer, ListSerializerOptimizer, ManyRelatedOptimizer, NestedSerializerOptimizer,
};

/// Optimizer selected for one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOptimizer {
    Source(SourceOptimizer),
    MethodField(MethodFieldOptimizer),
    PrimaryKeyRelated(PrimaryKeyRelatedOptimizer),
    Related(RelatedFieldOptimizer),
    Asymmetric(AsymmetricRelatedOptimizer),
    ListSerializer(ListSerializerOptimizer),
    NestedSerializer(NestedSerializerOptimizer),
    ManyRelated(ManyRelatedOptimizer),
}

impl FieldOptimizer {
    /// Filters and depth the optimizer was created with
    pub fn scope(&self) -> &OptimizerScope {
        match self {
            FieldOptimizer::Source(optimizer) => optimizer.scope(),
            FieldOptimizer::MethodField(optimizer) => optimizer.scope(),
            FieldOptimizer::PrimaryKeyRelated(optimizer) => optimizer.scope(),
            FieldOptimizer::Related(optimizer) => optimizer.scope(),
            FieldOptimizer::Asymmetric(optimizer) => optimizer.scope(),
            FieldOptimizer::ListSerializer(optimizer) => optimizer.scope(),
            FieldOptimizer::NestedSerializer(optimizer) => optimizer.scope(),
            FieldOptimizer::ManyRelated(optimizer) => optimizer.scope(),
        }
    }

    /// Whether this optimizer descends into a nested serializer
    pub fn is_recursive(&self) -> bool {
        matches!(
            self,
            FieldOptimizer::Asymmetric(_)
                | FieldOptimizer::ListSerializer(_)
                | FieldOptimizer::NestedSerializer(_)
                | FieldOptimizer::ManyRelated(_)
        )
    }
}

impl Optimize for FieldOptimizer {
    fn optimize(&self, field: &Field, prefix: &str, model: &ModelMeta, to_prefetch: bool) -> RelatedPaths {
        match self {
            FieldOptimizer::Source(optimizer) => optimizer.optimize(field, prefix, model, to_prefetch),
            FieldOptimizer::MethodField(optimizer) => optimizer.optimize(field, prefix, model, to_prefetch),
            FieldOptimizer::PrimaryKeyRelated(optimizer) => optimizer.optimize(field, prefix, model, to_prefetch),
            FieldOptimizer::Related(optimizer) => optimizer.optimize(field, prefix, model, to_prefetch),
            FieldOptimizer::Asymmetric(optimizer) => optimizer.optimize(field, prefix, model, to_prefetch),
            FieldOptimizer::ListSerializer(optimizer) => optimizer.optimize(field, prefix, model, to_prefetch),
            FieldOptimizer::NestedSerializer(optimizer) => optimizer.optimize(field, prefix, model, to_prefetch),
            FieldOptimizer::ManyRelated(optimizer) => optimizer.optimize(field, prefix, model, to_prefetch),
        }
    }
}

/// Select the optimizer for `field`, declared as `field_name`.
///
/// A dotted source wins over the field kind. Slug, hyperlinked and plain
/// attribute fields have no optimizer.
pub fn classify(field: &Field, field_name: &str, parent: &OptimizerScope) -> Option<FieldOptimizer> {
    let scope = parent.for_field(field_name);

    if field.has_dotted_source() {
        return Some(FieldOptimizer::Source(SourceOptimizer::new(scope, field_name)));
    }

    let optimizer = match field.kind() {
        FieldKind::Method => FieldOptimizer::MethodField(MethodFieldOptimizer::new(scope, field_name)),
        FieldKind::Related(RelatedFlavor::PrimaryKey) => {
            FieldOptimizer::PrimaryKeyRelated(PrimaryKeyRelatedOptimizer::new(scope, field_name))
        }
        FieldKind::Related(RelatedFlavor::Plain) => FieldOptimizer::Related(RelatedFieldOptimizer::new(scope, field_name)),
        FieldKind::Asymmetric(_) => FieldOptimizer::Asymmetric(AsymmetricRelatedOptimizer::new(scope)),
        FieldKind::List(_) => FieldOptimizer::ListSerializer(ListSerializerOptimizer::new(scope)),
        FieldKind::Nested(_) => FieldOptimizer::NestedSerializer(NestedSerializerOptimizer::new(scope)),
        FieldKind::ManyRelated(_) => FieldOptimizer::ManyRelated(ManyRelatedOptimizer::new(scope)),
        FieldKind::Attribute | FieldKind::Related(RelatedFlavor::Slug { .. } | RelatedFlavor::Hyperlinked { .. }) => {
            return None;
        }
    };

    Some(optimizer)
}
