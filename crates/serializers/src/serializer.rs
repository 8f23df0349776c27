//! Serializer descriptors

use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;

use tweaks_orm::ModelMeta;

use crate::context::SerializationContext;
use crate::error::{SerializerError, SerializerResult};
use crate::fields::Field;
use crate::filters::top_level_names;

/// Model binding of a serializer
#[derive(Debug, Clone)]
pub struct SerializerMeta {
    pub model: Arc<ModelMeta>,
}

/// A declared serializer: ordered fields, an optional model, and the
/// dynamic field filtering capability.
#[derive(Debug, Clone)]
pub struct Serializer {
    name: String,
    meta: Option<SerializerMeta>,
    fields: Vec<Field>,
    on_demand_fields: HashSet<String>,
    dynamic_fields: bool,
}

impl Serializer {
    pub fn builder(name: impl Into<String>) -> SerializerBuilder {
        SerializerBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `None` for serializers describing plain data rather than a model
    pub fn meta(&self) -> Option<&SerializerMeta> {
        self.meta.as_ref()
    }

    pub fn model(&self) -> Option<&Arc<ModelMeta>> {
        self.meta.as_ref().map(|meta| &meta.model)
    }

    /// Declared fields, in declaration order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Fields left out unless requested through `include_fields`
    pub fn get_on_demand_fields(&self) -> HashSet<String> {
        self.on_demand_fields.clone()
    }

    pub fn supports_dynamic_fields(&self) -> bool {
        self.dynamic_fields
    }

    /// Whether `field_name` should be serialized under the given filters.
    ///
    /// `None` when the serializer does not support dynamic field filtering.
    pub fn check_if_needs_serialization(
        &self,
        field_name: &str,
        only_fields: Option<&HashSet<String>>,
        include_fields: Option<&HashSet<String>>,
        on_demand_fields: &HashSet<String>,
    ) -> Option<bool> {
        if !self.dynamic_fields {
            return None;
        }

        if let Some(only_fields) = only_fields {
            if !only_fields.is_empty() && !top_level_names(only_fields).contains(field_name) {
                return Some(false);
            }
        }

        if on_demand_fields.contains(field_name) {
            let included = include_fields.map_or(false, |fields| top_level_names(fields).contains(field_name));
            if !included {
                return Some(false);
            }
        }

        Some(true)
    }

    /// Render a record held as a JSON object
    pub fn to_representation(&self, record: &Value, context: &SerializationContext) -> SerializerResult<Value> {
        if !record.is_object() {
            return Err(SerializerError::invalid_value(self.name.as_str(), "an object"));
        }

        let on_demand_fields = self.get_on_demand_fields();
        let mut output = Map::new();

        for field in &self.fields {
            let visible = self
                .check_if_needs_serialization(
                    field.name(),
                    context.filters.only_fields.as_ref(),
                    context.filters.include_fields.as_ref(),
                    &on_demand_fields,
                )
                .unwrap_or(true);
            if !visible {
                continue;
            }

            let value = field.get_attribute(record).unwrap_or(&Value::Null);
            output.insert(field.name().to_string(), field.to_representation(value, context)?);
        }

        Ok(Value::Object(output))
    }
}

/// Builder for [`Serializer`]
#[derive(Debug)]
pub struct SerializerBuilder {
    name: String,
    model: Option<Arc<ModelMeta>>,
    fields: Vec<Field>,
    on_demand_fields: HashSet<String>,
    dynamic_fields: bool,
}

impl SerializerBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: None,
            fields: Vec::new(),
            on_demand_fields: HashSet::new(),
            dynamic_fields: true,
        }
    }

    /// Bind the serializer to a model
    pub fn model(mut self, model: Arc<ModelMeta>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Hide these fields unless they are requested through `include_fields`
    pub fn on_demand<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.on_demand_fields.extend(names.into_iter().map(Into::into));
        self
    }

    /// Opt out of dynamic field filtering
    pub fn static_fields(mut self) -> Self {
        self.dynamic_fields = false;
        self
    }

    pub fn build(self) -> SerializerResult<Serializer> {
        let mut seen = HashSet::with_capacity(self.fields.len());
        for field in &self.fields {
            if !seen.insert(field.name()) {
                return Err(SerializerError::DuplicateField {
                    serializer: self.name.clone(),
                    field: field.name().to_string(),
                });
            }
        }

        Ok(Serializer {
            name: self.name,
            meta: self.model.map(|model| SerializerMeta { model }),
            fields: self.fields,
            on_demand_fields: self.on_demand_fields,
            dynamic_fields: self.dynamic_fields,
        })
    }
}
