//! Shared optimizer state and the `Optimize` contract

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use tweaks_orm::ModelMeta;
use tweaks_serializers::{Field, FieldFilters, FieldKind, Serializer};

use crate::classifier::{classify, FieldOptimizer};

/// Dotted relation paths (`comments__author`), ordered for stable output
pub type PathSet = BTreeSet<String>;

/// Relation paths collected for one serializer branch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedPaths {
    /// Paths fetched with a join in the parent query
    pub select_related: PathSet,
    /// Paths fetched with a separate batched query
    pub prefetch_related: PathSet,
}

impl RelatedPaths {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union `other` into these paths
    pub fn merge(&mut self, other: RelatedPaths) {
        self.select_related.extend(other.select_related);
        self.prefetch_related.extend(other.prefetch_related);
    }

    /// Add `path` as select related, or as prefetch related when `to_prefetch`
    pub fn add(&mut self, path: String, to_prefetch: bool) {
        if to_prefetch {
            self.prefetch_related.insert(path);
        } else {
            self.select_related.insert(path);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.select_related.is_empty() && self.prefetch_related.is_empty()
    }

    /// Drop select related paths that are also prefetched
    pub fn cleaned(self) -> Self {
        Self {
            select_related: clean_fields(&self.prefetch_related, &self.select_related),
            prefetch_related: self.prefetch_related,
        }
    }

    pub fn into_parts(self) -> (PathSet, PathSet) {
        (self.select_related, self.prefetch_related)
    }
}

/// Select related paths minus the prefetched ones.
///
/// Prefetching a path already loads it, so a path never keeps both strategies.
pub fn clean_fields(prefetch_set: &PathSet, select_set: &PathSet) -> PathSet {
    select_set.difference(prefetch_set).cloned().collect()
}

/// Contract of every field optimizer.
pub trait Optimize {
    /// Collect the relation paths `field` needs when serialized from `model`.
    ///
    /// `prefix` is the path of the parent relation including its trailing
    /// separator; `to_prefetch` forces to-one relations into prefetch related.
    fn optimize(&self, field: &Field, prefix: &str, model: &ModelMeta, to_prefetch: bool) -> RelatedPaths;
}

/// Field filters and nesting depth an optimizer works under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizerScope {
    pub filters: FieldFilters,
    /// Nesting level, the root serializer being 0
    pub depth: usize,
    pub max_depth: usize,
}

impl OptimizerScope {
    pub fn root(filters: FieldFilters, max_depth: usize) -> Self {
        Self {
            filters,
            depth: 0,
            max_depth,
        }
    }

    /// Scope of the optimizer handling `field_name`
    pub fn for_field(&self, field_name: &str) -> Self {
        Self {
            filters: self.filters.for_field(field_name),
            depth: self.depth + 1,
            max_depth: self.max_depth,
        }
    }

    /// Whether the fields of a nested serializer may still be followed
    pub fn can_descend(&self) -> bool {
        self.depth < self.max_depth
    }

    /// Ask the serializer whether `field_name` is rendered under this scope.
    ///
    /// Serializers without dynamic field support count as "not needed".
    pub fn check_if_needs_serialization(
        &self,
        serializer: &Serializer,
        field_name: &str,
        on_demand_fields: &HashSet<String>,
    ) -> bool {
        serializer
            .check_if_needs_serialization(
                field_name,
                self.filters.only_fields.as_ref(),
                self.filters.include_fields.as_ref(),
                on_demand_fields,
            )
            .unwrap_or(false)
    }

    /// Fields of `serializer` worth optimizing under this scope
    pub fn fields_to_handle<'s>(&self, serializer: &'s Serializer, on_demand_fields: &HashSet<String>) -> Vec<&'s Field> {
        serializer
            .fields()
            .iter()
            .filter(|field| self.check_if_needs_serialization(serializer, field.name(), on_demand_fields))
            .filter(|field| field.kind().is_relation_capable() || field.has_dotted_source())
            .filter(|field| match field.kind() {
                FieldKind::Asymmetric(_) => self.filters.includes(field.name()),
                _ => true,
            })
            .collect()
    }

    /// Optimizer for `field`, scoped to its children
    pub fn get_optimizer(&self, field: &Field, field_name: &str) -> Option<FieldOptimizer> {
        classify(field, field_name, self)
    }
}

/// Record `name` on `model` as a relation path under `prefix`.
///
/// To-one relations go to select related unless `to_prefetch`; to-many
/// relations are always prefetched. Anything else contributes nothing.
pub(crate) fn optimize_relation(name: &str, prefix: &str, model: &ModelMeta, to_prefetch: bool) -> RelatedPaths {
    let mut paths = RelatedPaths::new();

    match model.attribute(name) {
        Some(attribute) if attribute.is_related_object() => {
            paths.add(format!("{}{}", prefix, name), to_prefetch);
        }
        Some(attribute) if attribute.is_prefetch_object() => {
            paths.add(format!("{}{}", prefix, name), true);
        }
        _ => {
            tracing::trace!("'{}' is not a relation of '{}'", name, model.name());
        }
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn paths(items: &[&str]) -> PathSet {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn test_clean_fields() {
        let prefetch_set = paths(&["field1", "field2"]);
        let select_set = paths(&["field2", "field3"]);
        assert_eq!(clean_fields(&prefetch_set, &select_set), paths(&["field3"]));
    }

    #[test]
    fn test_related_paths_cleaned() {
        let related = RelatedPaths {
            select_related: paths(&["author", "comments"]),
            prefetch_related: paths(&["comments"]),
        };

        let (select, prefetch) = related.cleaned().into_parts();
        assert_eq!(select, paths(&["author"]));
        assert_eq!(prefetch, paths(&["comments"]));
    }

    #[test]
    fn test_merge_is_union() {
        let mut left = RelatedPaths::new();
        left.add("author".to_string(), false);

        let mut right = RelatedPaths::new();
        right.add("author".to_string(), false);
        right.add("tags".to_string(), true);

        left.merge(right);
        assert_eq!(left.select_related, paths(&["author"]));
        assert_eq!(left.prefetch_related, paths(&["tags"]));
    }

    #[test]
    fn test_scope_for_field() {
        let only: HashSet<String> = ["comments__author", "title"].iter().map(|s| s.to_string()).collect();
        let scope = OptimizerScope::root(FieldFilters::new(Some(only), None), 2);

        let child = scope.for_field("comments");
        assert_eq!(child.depth, 1);
        assert_eq!(child.filters.only_fields, Some(["author".to_string()].into_iter().collect()));
        assert_eq!(child.filters.include_fields, None);
        assert!(child.can_descend());
        assert!(!child.for_field("author").can_descend());
    }
}
