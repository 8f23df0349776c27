//! Serializer Registry - lookup of serializers by dotted path
//!
//! Asymmetric fields may name their target serializer by path instead of
//! holding it, which lets two serializers refer to each other.

use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{SerializerError, SerializerResult};
use crate::serializer::Serializer;

/// Thread-safe map of serializer path -> serializer
#[derive(Clone, Default)]
pub struct SerializerRegistry {
    serializers: Arc<DashMap<String, Arc<Serializer>>>,
}

impl SerializerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a serializer under `path`, replacing any previous entry
    pub fn register(&self, path: impl Into<String>, serializer: Arc<Serializer>) {
        let path = path.into();
        tracing::debug!("Registering serializer '{}' as '{}'", serializer.name(), path);
        self.serializers.insert(path, serializer);
    }

    /// Get the serializer registered under `path`
    pub fn resolve(&self, path: &str) -> SerializerResult<Arc<Serializer>> {
        self.serializers
            .get(path)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| SerializerError::UnknownSerializer(path.to_string()))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.serializers.contains_key(path)
    }

    /// All registered paths, sorted
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.serializers.iter().map(|entry| entry.key().clone()).collect();
        paths.sort();
        paths
    }

    pub fn len(&self) -> usize {
        self.serializers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.serializers.is_empty()
    }
}

// Registered serializers can point back into the registry, so only paths are printed.
impl fmt::Debug for SerializerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializerRegistry").field("paths", &self.paths()).finish()
    }
}
