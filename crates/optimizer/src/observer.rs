//! Reporting of optimization results

use tweaks_serializers::Serializer;

use crate::base::PathSet;

/// Receives the final paths of every optimizer run
pub trait OptimizationObserver: Send + Sync {
    fn on_optimized(&self, serializer: &Serializer, select_related: &PathSet, prefetch_related: &PathSet);
}

/// Writes results to `tracing` at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl OptimizationObserver for TracingObserver {
    fn on_optimized(&self, serializer: &Serializer, select_related: &PathSet, prefetch_related: &PathSet) {
        tracing::debug!(serializer = serializer.name(), "Select related fields: {:?}", select_related);
        tracing::debug!(serializer = serializer.name(), "Prefetch related fields: {:?}", prefetch_related);
    }
}

/// Discards results
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl OptimizationObserver for NoopObserver {
    fn on_optimized(&self, _serializer: &Serializer, _select_related: &PathSet, _prefetch_related: &PathSet) {}
}

impl<F> OptimizationObserver for F
where
    F: Fn(&Serializer, &PathSet, &PathSet) + Send + Sync,
{
    fn on_optimized(&self, serializer: &Serializer, select_related: &PathSet, prefetch_related: &PathSet) {
        self(serializer, select_related, prefetch_related)
    }
}
