//! Optimizers for fields wrapping another serializer
//!
//! All variants share one traversal; they only differ in how the nested
//! serializer is obtained from the field.

use std::sync::Arc;

use tweaks_orm::ModelMeta;
use tweaks_serializers::{Field, FieldKind, Serializer, FIELD_SEPARATOR};

use crate::base::{Optimize, OptimizerScope, RelatedPaths};

/// Obtains the serializer a field nests
pub trait NestedSerializerResolver {
    fn resolve_nested_serializer(&self, field: &Field) -> Option<Arc<Serializer>>;
}

/// Element serializer of a list field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListChild;

impl NestedSerializerResolver for ListChild {
    fn resolve_nested_serializer(&self, field: &Field) -> Option<Arc<Serializer>> {
        match field.kind() {
            FieldKind::List(child) => Some(Arc::clone(child)),
            _ => None,
        }
    }
}

/// The nested serializer field itself
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NestedSelf;

impl NestedSerializerResolver for NestedSelf {
    fn resolve_nested_serializer(&self, field: &Field) -> Option<Arc<Serializer>> {
        match field.kind() {
            FieldKind::Nested(serializer) => Some(Arc::clone(serializer)),
            _ => None,
        }
    }
}

/// Target serializer of an asymmetric related field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AsymmetricTarget;

impl NestedSerializerResolver for AsymmetricTarget {
    fn resolve_nested_serializer(&self, field: &Field) -> Option<Arc<Serializer>> {
        let FieldKind::Asymmetric(asymmetric) = field.kind() else {
            return None;
        };

        match asymmetric.serializer_class() {
            Ok(serializer) => Some(serializer),
            Err(err) => {
                tracing::debug!("Skipping '{}': {}", field.name(), err);
                None
            }
        }
    }
}

/// Serializer of a many related field's child relation, when it has one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManyRelatedChild;

impl NestedSerializerResolver for ManyRelatedChild {
    fn resolve_nested_serializer(&self, field: &Field) -> Option<Arc<Serializer>> {
        let FieldKind::ManyRelated(many) = field.kind() else {
            return None;
        };

        match many.serializer_class()? {
            Ok(serializer) => Some(serializer),
            Err(err) => {
                tracing::debug!("Skipping '{}': {}", field.name(), err);
                None
            }
        }
    }
}

/// Optimizer following a relation into a nested serializer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedOptimizer<R> {
    scope: OptimizerScope,
    resolver: R,
}

impl<R: NestedSerializerResolver + Default> NestedOptimizer<R> {
    pub fn new(scope: OptimizerScope) -> Self {
        Self {
            scope,
            resolver: R::default(),
        }
    }
}

impl<R> NestedOptimizer<R> {
    pub fn scope(&self) -> &OptimizerScope {
        &self.scope
    }
}

impl<R: NestedSerializerResolver> Optimize for NestedOptimizer<R> {
    fn optimize(&self, field: &Field, prefix: &str, model: &ModelMeta, to_prefetch: bool) -> RelatedPaths {
        let mut paths = RelatedPaths::new();

        let Some(serializer) = self.resolver.resolve_nested_serializer(field) else {
            return paths;
        };
        // Serializers without a model describe plain data, e.g. a JSON column
        let Some(nested_model) = serializer.model() else {
            return paths;
        };
        let Some(attribute) = model.attribute(field.source()) else {
            return paths;
        };
        if !model.check_in_fields(attribute) {
            return paths;
        }

        let path = format!("{}{}", prefix, field.source());
        let to_prefetch = to_prefetch || !attribute.is_related_object();
        paths.add(path.clone(), to_prefetch);

        if !self.scope.can_descend() {
            tracing::warn!(
                "Not following '{}' into '{}': nesting deeper than {} levels",
                path,
                serializer.name(),
                self.scope.max_depth
            );
            return paths;
        }

        let prefix = format!("{}{}", path, FIELD_SEPARATOR);
        let on_demand_fields = serializer.get_on_demand_fields();

        for child in self.scope.fields_to_handle(&serializer, &on_demand_fields) {
            if !nested_model.has_attribute(child.name()) {
                continue;
            }

            let Some(optimizer) = self.scope.get_optimizer(child, child.name()) else {
                tracing::trace!("No optimizer for '{}{}'", prefix, child.name());
                continue;
            };
            paths.merge(optimizer.optimize(child, &prefix, nested_model, to_prefetch));
        }

        paths
    }
}

/// Nested list serializer
pub type ListSerializerOptimizer = NestedOptimizer<ListChild>;
/// Nested single serializer
pub type NestedSerializerOptimizer = NestedOptimizer<NestedSelf>;
/// Asymmetric related field rendered through its target serializer
pub type AsymmetricRelatedOptimizer = NestedOptimizer<AsymmetricTarget>;
/// Many related field whose child relation has a serializer
pub type ManyRelatedOptimizer = NestedOptimizer<ManyRelatedChild>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::PathSet;
    use pretty_assertions::assert_eq;
    use tweaks_serializers::{FieldFilters, RelatedFlavor, SerializerClass, SerializerRegistry};

    fn paths(items: &[&str]) -> PathSet {
        items.iter().map(|item| item.to_string()).collect()
    }

    fn scope() -> OptimizerScope {
        OptimizerScope::root(FieldFilters::unrestricted(), 8).for_field("any")
    }

    fn user() -> Arc<ModelMeta> {
        Arc::new(
            ModelMeta::builder("User")
                .column("username")
                .has_one("profile", "Profile", "user")
                .build()
                .unwrap(),
        )
    }

    fn post() -> Arc<ModelMeta> {
        Arc::new(
            ModelMeta::builder("Post")
                .column("title")
                .property("summary")
                .belongs_to("author", "User")
                .has_many("comments", "Comment", "post")
                .many_to_many("tags", "Tag")
                .build()
                .unwrap(),
        )
    }

    fn user_serializer() -> Arc<Serializer> {
        Arc::new(
            Serializer::builder("UserSerializer")
                .model(user())
                .field(Field::attribute("username"))
                .field(Field::related("profile"))
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_nested_to_one_descends() {
        let field = Field::nested("author", user_serializer());
        let result = NestedSerializerOptimizer::new(scope()).optimize(&field, "", &post(), false);

        assert_eq!(result.select_related, paths(&["author", "author__profile"]));
        assert!(result.prefetch_related.is_empty());
    }

    #[test]
    fn test_to_prefetch_reaches_descendants() {
        let field = Field::nested("author", user_serializer());
        let result = NestedSerializerOptimizer::new(scope()).optimize(&field, "", &post(), true);

        assert!(result.select_related.is_empty());
        assert_eq!(result.prefetch_related, paths(&["author", "author__profile"]));
    }

    #[test]
    fn test_to_many_escalates_descendants() {
        let tag = Arc::new(
            ModelMeta::builder("Tag")
                .belongs_to("created_by", "User")
                .build()
                .unwrap(),
        );
        let tag_serializer = Arc::new(
            Serializer::builder("TagSerializer")
                .model(tag)
                .field(Field::primary_key_related("created_by"))
                .build()
                .unwrap(),
        );

        let field = Field::list("tags", tag_serializer);
        let result = ListSerializerOptimizer::new(scope()).optimize(&field, "", &post(), false);

        assert!(result.select_related.is_empty());
        assert_eq!(result.prefetch_related, paths(&["tags", "tags__created_by"]));
    }

    #[test]
    fn test_serializer_without_model_is_skipped() {
        let plain = Arc::new(
            Serializer::builder("MetadataSerializer")
                .field(Field::related("author"))
                .build()
                .unwrap(),
        );
        let field = Field::nested("author", plain);

        assert!(NestedSerializerOptimizer::new(scope()).optimize(&field, "", &post(), false).is_empty());
    }

    #[test]
    fn test_property_or_missing_attribute_is_skipped() {
        let scope = scope();
        let post = post();

        let property = Field::nested("summary", user_serializer());
        assert!(NestedSerializerOptimizer::new(scope.clone()).optimize(&property, "", &post, false).is_empty());

        let missing = Field::nested("editor", user_serializer());
        assert!(NestedSerializerOptimizer::new(scope).optimize(&missing, "", &post, false).is_empty());
    }

    #[test]
    fn test_source_names_the_relation() {
        let field = Field::nested("writer", user_serializer()).with_source("author");
        let result = NestedSerializerOptimizer::new(scope()).optimize(&field, "", &post(), false);

        assert_eq!(result.select_related, paths(&["author", "author__profile"]));
    }

    #[test]
    fn test_wrong_kind_resolves_nothing() {
        let field = Field::related("author");
        assert!(ListChild.resolve_nested_serializer(&field).is_none());
        assert!(NestedSelf.resolve_nested_serializer(&field).is_none());
        assert!(AsymmetricTarget.resolve_nested_serializer(&field).is_none());
        assert!(ManyRelatedChild.resolve_nested_serializer(&field).is_none());
    }

    #[test]
    fn test_many_related_without_serializer() {
        let field = Field::many_related("tags", FieldKind::Related(RelatedFlavor::PrimaryKey));
        assert!(ManyRelatedOptimizer::new(scope()).optimize(&field, "", &post(), false).is_empty());
    }

    #[test]
    fn test_asymmetric_lazy_target() {
        let registry = SerializerRegistry::new();
        let field = Field::asymmetric("author", SerializerClass::lazy("accounts.UserSerializer", &registry));
        let optimizer = AsymmetricRelatedOptimizer::new(scope());

        assert!(optimizer.optimize(&field, "", &post(), false).is_empty());

        registry.register("accounts.UserSerializer", user_serializer());
        let result = optimizer.optimize(&field, "", &post(), false);
        assert_eq!(result.select_related, paths(&["author", "author__profile"]));
    }

    #[test]
    fn test_depth_limit_stops_descent() {
        let shallow = OptimizerScope::root(FieldFilters::unrestricted(), 1).for_field("author");
        let field = Field::nested("author", user_serializer());
        let result = NestedSerializerOptimizer::new(shallow).optimize(&field, "", &post(), false);

        assert_eq!(result.select_related, paths(&["author"]));
    }
}
