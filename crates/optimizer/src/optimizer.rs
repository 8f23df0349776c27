use std::fmt;
use std::sync::Arc;

use tweaks_core::OptimizerConfig;
use tweaks_serializers::{FieldFilter, FieldFilters, Serializer};

use crate::base::{Optimize, OptimizerScope, PathSet, RelatedPaths};
use crate::observer::{OptimizationObserver, TracingObserver};

/// Entry point of the serializer optimizer.
///
/// Walks the fields a serializer will render and works out which relations
/// should be joined (select related) and which should be fetched in a
/// separate batched query (prefetch related), so that serializing a list of
/// records does not issue one query per record and relation.
///
/// ```ignore
/// let optimizer = Optimizer::new(only_fields, include_fields);
/// let (select_related, prefetch_related) = optimizer.run(&PostSerializer, "", false);
/// ```
#[derive(Clone)]
pub struct Optimizer {
    filters: FieldFilters,
    max_depth: usize,
    force_prefetch: bool,
    observer: Arc<dyn OptimizationObserver>,
}

impl Optimizer {
    /// Create an optimizer for the given `fields` / `include_fields` filters
    pub fn new(only_fields: FieldFilter, include_fields: FieldFilter) -> Self {
        Self::from_config(&OptimizerConfig::default(), FieldFilters::new(only_fields, include_fields))
    }

    pub fn from_config(config: &OptimizerConfig, filters: FieldFilters) -> Self {
        Self {
            filters,
            max_depth: config.max_depth,
            force_prefetch: config.force_prefetch,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Follow at most `max_depth` levels of nested serializers
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Report results to `observer` instead of `tracing`
    pub fn with_observer(mut self, observer: Arc<dyn OptimizationObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn filters(&self) -> &FieldFilters {
        &self.filters
    }

    /// Collect paths for every field of `serializer`, without the final cleanup
    pub fn optimize(&self, serializer: &Serializer, prefix: &str, force_prefetch: bool) -> RelatedPaths {
        let force_prefetch = force_prefetch || self.force_prefetch;
        let mut paths = RelatedPaths::new();

        let Some(model) = serializer.model() else {
            tracing::trace!("'{}' has no model, nothing to optimize", serializer.name());
            return paths;
        };

        let scope = OptimizerScope::root(self.filters.clone(), self.max_depth);
        let on_demand_fields = serializer.get_on_demand_fields();

        for field in scope.fields_to_handle(serializer, &on_demand_fields) {
            let to_prefetch = force_prefetch || field.kind().is_to_many();

            let Some(optimizer) = scope.get_optimizer(field, field.name()) else {
                tracing::trace!("No optimizer for '{}{}'", prefix, field.name());
                continue;
            };
            paths.merge(optimizer.optimize(field, prefix, model, to_prefetch));
        }

        paths
    }

    /// Select related and prefetch related paths for `serializer`.
    ///
    /// The two sets are disjoint: a path that has to be prefetched is never
    /// also joined.
    pub fn plan(&self, serializer: &Serializer, prefix: &str, force_prefetch: bool) -> RelatedPaths {
        let paths = self.optimize(serializer, prefix, force_prefetch).cleaned();

        self.observer
            .on_optimized(serializer, &paths.select_related, &paths.prefetch_related);
        paths
    }

    /// Same as [`Optimizer::plan`], as a `(select_related, prefetch_related)` pair
    pub fn run(&self, serializer: &Serializer, prefix: &str, force_prefetch: bool) -> (PathSet, PathSet) {
        self.plan(serializer, prefix, force_prefetch).into_parts()
    }
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl fmt::Debug for Optimizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Optimizer")
            .field("filters", &self.filters)
            .field("max_depth", &self.max_depth)
            .field("force_prefetch", &self.force_prefetch)
            .finish_non_exhaustive()
    }
}
