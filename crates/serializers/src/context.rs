//! Serialization context passed from a parent serializer to nested ones

use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::error::{SerializerError, SerializerResult};
use crate::filters::FieldFilters;

/// Query parameter carrying `only_fields`
pub const FIELDS_PARAM: &str = "fields";
/// Query parameter carrying `include_fields`
pub const INCLUDE_FIELDS_PARAM: &str = "include_fields";

/// Per-request rendering context
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SerializationContext {
    pub filters: FieldFilters,
    /// Everything else the caller wants nested serializers to see
    pub extra: Map<String, Value>,
}

impl SerializationContext {
    pub fn new(filters: FieldFilters) -> Self {
        Self {
            filters,
            extra: Map::new(),
        }
    }

    /// Build a context from a query string such as
    /// `fields=title,comments__body&include_fields=author`.
    ///
    /// Values are percent-decoded before being split on `,`. Unknown
    /// parameters are kept in `extra` as strings.
    pub fn from_query(query: &str) -> SerializerResult<Self> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query.trim_start_matches('?'))
            .map_err(|err| SerializerError::InvalidQuery(err.to_string()))?;

        let mut context = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                FIELDS_PARAM => context.filters.only_fields = Some(split_list(&value)),
                INCLUDE_FIELDS_PARAM => context.filters.include_fields = Some(split_list(&value)),
                _ => {
                    context.extra.insert(key, Value::String(value));
                }
            }
        }

        Ok(context)
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Whether `field_name` was requested through `include_fields`
    pub fn includes(&self, field_name: &str) -> bool {
        self.filters.includes(field_name)
    }
}

fn split_list(value: &str) -> HashSet<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Context for the serializer nested under `field_name`
pub fn pass_context(field_name: &str, context: &SerializationContext) -> SerializationContext {
    SerializationContext {
        filters: context.filters.for_field(field_name),
        extra: context.extra.clone(),
    }
}
