//! Dynamic field filtering
//!
//! Filters are sets of dotted field paths using `__` as the separator, e.g.
//! `comments__author`. Descending into a field narrows a filter to the
//! entries below that field.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// `None` means "no restriction".
pub type FieldFilter = Option<HashSet<String>>;

/// Separator between path segments in field filters and eager-load paths
pub const FIELD_SEPARATOR: &str = "__";

/// Entries of `fields` nested under `field_name`, with that prefix stripped.
pub fn filter_fields<I, S>(field_name: &str, fields: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let prefix = format!("{}{}", field_name, FIELD_SEPARATOR);
    fields
        .into_iter()
        .filter_map(|field| field.as_ref().strip_prefix(prefix.as_str()).map(str::to_string))
        .collect()
}

/// Narrow an optional filter to `field_name`; `None` stays `None`.
pub fn filter_field_name(field_name: &str, fields: Option<&HashSet<String>>) -> FieldFilter {
    fields.map(|fields| filter_fields(field_name, fields))
}

/// First path segment of every entry
pub fn top_level_names<I, S>(fields: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fields
        .into_iter()
        .filter_map(|field| field.as_ref().split(FIELD_SEPARATOR).next().map(str::to_string))
        .filter(|name| !name.is_empty())
        .collect()
}

/// The pair of filters a serializer is rendered or optimized under
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldFilters {
    /// Restrict which fields are serialized at all
    #[serde(rename = "fields")]
    pub only_fields: FieldFilter,
    /// Opt in to fields that are hidden by default
    pub include_fields: FieldFilter,
}

impl FieldFilters {
    pub fn new(only_fields: FieldFilter, include_fields: FieldFilter) -> Self {
        Self {
            only_fields,
            include_fields,
        }
    }

    /// Filters with no restriction and nothing explicitly included
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Filters scoped to the children of `field_name`
    pub fn for_field(&self, field_name: &str) -> Self {
        Self {
            only_fields: filter_field_name(field_name, self.only_fields.as_ref()),
            include_fields: filter_field_name(field_name, self.include_fields.as_ref()),
        }
    }

    /// Whether `field_name` itself is listed in `include_fields`.
    ///
    /// A nested entry such as `author__profile` does not include `author`.
    pub fn includes(&self, field_name: &str) -> bool {
        self.include_fields
            .as_ref()
            .map_or(false, |fields| fields.contains(field_name))
    }
}
