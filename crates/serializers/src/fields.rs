//! Field descriptors
//!
//! Every field carries its kind as a tag decided at construction time, so
//! nothing downstream needs to inspect field types.

use serde_json::Value;
use std::sync::Arc;

use crate::context::{pass_context, SerializationContext};
use crate::error::{SerializerError, SerializerResult};
use crate::registry::SerializerRegistry;
use crate::serializer::Serializer;

/// How a related field renders the related record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelatedFlavor {
    /// Primary key of the related record
    PrimaryKey,
    /// Generic relation field
    Plain,
    /// A unique attribute of the related record
    Slug { slug_field: String },
    /// URL of the related record
    Hyperlinked { view_name: String },
}

/// Kind of a declared field
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Plain value, never backed by a relation
    Attribute,
    /// Value computed by a serializer method
    Method,
    /// Single related record
    Related(RelatedFlavor),
    /// Primary key on write, nested representation on read
    Asymmetric(AsymmetricRelatedField),
    /// Collection of related records rendered by a child relation
    ManyRelated(ManyRelatedField),
    /// Nested serializer
    Nested(Arc<Serializer>),
    /// List of nested serializers; the element serializer is the child
    List(Arc<Serializer>),
}

impl FieldKind {
    /// Fields of this kind may touch a relation
    pub fn is_relation_capable(&self) -> bool {
        !matches!(self, FieldKind::Attribute)
    }

    /// Fields of this kind render a collection whatever the model says
    pub fn is_to_many(&self) -> bool {
        matches!(self, FieldKind::List(_) | FieldKind::ManyRelated(_))
    }
}

/// A declared serializer field
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    source: String,
    kind: FieldKind,
}

impl Field {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        Self {
            source: name.clone(),
            name,
            kind,
        }
    }

    pub fn attribute(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Attribute)
    }

    pub fn method(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Method)
    }

    pub fn primary_key_related(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Related(RelatedFlavor::PrimaryKey))
    }

    pub fn related(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Related(RelatedFlavor::Plain))
    }

    pub fn slug_related(name: impl Into<String>, slug_field: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::Related(RelatedFlavor::Slug {
                slug_field: slug_field.into(),
            }),
        )
    }

    pub fn hyperlinked_related(name: impl Into<String>, view_name: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::Related(RelatedFlavor::Hyperlinked {
                view_name: view_name.into(),
            }),
        )
    }

    pub fn asymmetric(name: impl Into<String>, serializer_class: SerializerClass) -> Self {
        Self::new(name, FieldKind::Asymmetric(AsymmetricRelatedField::new(serializer_class)))
    }

    pub fn many_related(name: impl Into<String>, child_relation: FieldKind) -> Self {
        Self::new(name, FieldKind::ManyRelated(ManyRelatedField::new(child_relation)))
    }

    pub fn nested(name: impl Into<String>, serializer: Arc<Serializer>) -> Self {
        Self::new(name, FieldKind::Nested(serializer))
    }

    pub fn list(name: impl Into<String>, child: Arc<Serializer>) -> Self {
        Self::new(name, FieldKind::List(child))
    }

    /// Read the value from a dotted attribute path instead of the field name
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Source walks through another object, e.g. `author.name`
    pub fn has_dotted_source(&self) -> bool {
        self.source.contains('.')
    }

    /// Leading attribute of the source path
    pub fn source_root(&self) -> &str {
        self.source.split('.').next().unwrap_or(&self.source)
    }

    /// Read this field's raw value out of a record by following `source`
    pub fn get_attribute<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        self.source
            .split('.')
            .try_fold(record, |value, segment| value.as_object()?.get(segment))
    }

    /// Render the raw value of this field
    pub fn to_representation(&self, value: &Value, context: &SerializationContext) -> SerializerResult<Value> {
        render_kind(&self.kind, &self.name, value, context)
    }
}

fn render_kind(kind: &FieldKind, name: &str, value: &Value, context: &SerializationContext) -> SerializerResult<Value> {
    match kind {
        FieldKind::Attribute | FieldKind::Method => Ok(value.clone()),
        FieldKind::Related(RelatedFlavor::PrimaryKey) => {
            if value.is_object() {
                primary_key(name, value)
            } else {
                Ok(value.clone())
            }
        }
        FieldKind::Related(RelatedFlavor::Slug { slug_field }) => match value {
            Value::Object(object) => Ok(object.get(slug_field).cloned().unwrap_or(Value::Null)),
            other => Ok(other.clone()),
        },
        FieldKind::Related(_) => Ok(value.clone()),
        FieldKind::Asymmetric(field) => field.to_representation(value, name, context),
        FieldKind::ManyRelated(field) => match value {
            Value::Null => Ok(Value::Array(Vec::new())),
            Value::Array(items) => items
                .iter()
                .map(|item| render_kind(&field.child_relation, name, item, context))
                .collect::<SerializerResult<Vec<_>>>()
                .map(Value::Array),
            _ => Err(SerializerError::invalid_value(name, "a list of related records")),
        },
        FieldKind::Nested(serializer) => {
            if value.is_null() {
                return Ok(Value::Null);
            }
            serializer.to_representation(value, &pass_context(name, context))
        }
        FieldKind::List(child) => match value {
            Value::Null => Ok(Value::Array(Vec::new())),
            Value::Array(items) => {
                let child_context = pass_context(name, context);
                items
                    .iter()
                    .map(|item| child.to_representation(item, &child_context))
                    .collect::<SerializerResult<Vec<_>>>()
                    .map(Value::Array)
            }
            _ => Err(SerializerError::invalid_value(name, "a list of records")),
        },
    }
}

fn primary_key(field_name: &str, value: &Value) -> SerializerResult<Value> {
    value
        .get("pk")
        .or_else(|| value.get("id"))
        .cloned()
        .ok_or_else(|| SerializerError::MissingPrimaryKey {
            field: field_name.to_string(),
        })
}

/// Target serializer of an asymmetric field
#[derive(Debug, Clone)]
pub enum SerializerClass {
    /// Serializer held directly
    Direct(Arc<Serializer>),
    /// Serializer looked up by path when first needed
    Lazy {
        path: String,
        registry: SerializerRegistry,
    },
}

impl SerializerClass {
    pub fn lazy(path: impl Into<String>, registry: &SerializerRegistry) -> Self {
        Self::Lazy {
            path: path.into(),
            registry: registry.clone(),
        }
    }
}

impl From<Arc<Serializer>> for SerializerClass {
    fn from(serializer: Arc<Serializer>) -> Self {
        Self::Direct(serializer)
    }
}

/// Related field taking a primary key on write and rendering the full
/// related record on read when the caller asks for it through
/// `include_fields`.
#[derive(Debug, Clone)]
pub struct AsymmetricRelatedField {
    serializer_class: SerializerClass,
}

impl AsymmetricRelatedField {
    pub fn new(serializer_class: SerializerClass) -> Self {
        Self { serializer_class }
    }

    /// The serializer used for the nested representation
    pub fn serializer_class(&self) -> SerializerResult<Arc<Serializer>> {
        match &self.serializer_class {
            SerializerClass::Direct(serializer) => Ok(Arc::clone(serializer)),
            SerializerClass::Lazy { path, registry } => registry.resolve(path),
        }
    }

    /// Nested representation when `field_name` is included, primary key otherwise
    pub fn to_representation(
        &self,
        value: &Value,
        field_name: &str,
        context: &SerializationContext,
    ) -> SerializerResult<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        if context.includes(field_name) {
            let serializer = self.serializer_class()?;
            return serializer.to_representation(value, &pass_context(field_name, context));
        }

        if value.is_object() {
            primary_key(field_name, value)
        } else {
            Ok(value.clone())
        }
    }
}

/// Collection of related records, each rendered by `child_relation`
#[derive(Debug, Clone)]
pub struct ManyRelatedField {
    pub child_relation: Box<FieldKind>,
}

impl ManyRelatedField {
    pub fn new(child_relation: FieldKind) -> Self {
        Self {
            child_relation: Box::new(child_relation),
        }
    }

    /// Serializer of the child relation, when it has one
    pub fn serializer_class(&self) -> Option<SerializerResult<Arc<Serializer>>> {
        match self.child_relation.as_ref() {
            FieldKind::Asymmetric(field) => Some(field.serializer_class()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::FieldFilters;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashSet;

    fn user_serializer() -> Arc<Serializer> {
        Arc::new(
            Serializer::builder("UserSerializer")
                .field(Field::attribute("id"))
                .field(Field::attribute("username"))
                .build()
                .unwrap(),
        )
    }

    fn include(names: &[&str]) -> SerializationContext {
        let include: HashSet<String> = names.iter().map(|name| name.to_string()).collect();
        SerializationContext::new(FieldFilters::new(None, Some(include)))
    }

    #[test]
    fn test_source_defaults_to_name() {
        let field = Field::related("author");
        assert_eq!(field.source(), "author");
        assert!(!field.has_dotted_source());
    }

    #[test]
    fn test_dotted_source() {
        let field = Field::attribute("author_name").with_source("author.profile.name");
        assert!(field.has_dotted_source());
        assert_eq!(field.source_root(), "author");

        let record = json!({"author": {"profile": {"name": "Ada"}}});
        assert_eq!(field.get_attribute(&record), Some(&json!("Ada")));
        assert_eq!(field.get_attribute(&json!({"author": null})), None);
    }

    #[test]
    fn test_kind_flags() {
        assert!(!FieldKind::Attribute.is_relation_capable());
        assert!(FieldKind::Method.is_relation_capable());
        assert!(FieldKind::List(user_serializer()).is_to_many());
        assert!(FieldKind::ManyRelated(ManyRelatedField::new(FieldKind::Related(RelatedFlavor::PrimaryKey))).is_to_many());
        assert!(!FieldKind::Nested(user_serializer()).is_to_many());
    }

    #[test]
    fn test_asymmetric_renders_primary_key_by_default() {
        let field = AsymmetricRelatedField::new(SerializerClass::Direct(user_serializer()));
        let value = json!({"pk": 3, "id": 3, "username": "ada"});

        let rendered = field.to_representation(&value, "author", &SerializationContext::default()).unwrap();
        assert_eq!(rendered, json!(3));
        assert_eq!(field.to_representation(&json!(9), "author", &SerializationContext::default()).unwrap(), json!(9));
    }

    #[test]
    fn test_asymmetric_renders_nested_when_included() {
        let field = AsymmetricRelatedField::new(SerializerClass::Direct(user_serializer()));
        let value = json!({"id": 3, "username": "ada", "password": "secret"});

        let rendered = field.to_representation(&value, "author", &include(&["author"])).unwrap();
        assert_eq!(rendered, json!({"id": 3, "username": "ada"}));
    }

    #[test]
    fn test_asymmetric_without_primary_key() {
        let field = AsymmetricRelatedField::new(SerializerClass::Direct(user_serializer()));
        let err = field
            .to_representation(&json!({"username": "ada"}), "author", &SerializationContext::default())
            .unwrap_err();
        assert_eq!(err, SerializerError::MissingPrimaryKey { field: "author".to_string() });
    }

    #[test]
    fn test_lazy_serializer_class() {
        let registry = SerializerRegistry::new();
        let field = AsymmetricRelatedField::new(SerializerClass::lazy("accounts.UserSerializer", &registry));

        assert!(field.serializer_class().is_err());
        registry.register("accounts.UserSerializer", user_serializer());
        assert_eq!(field.serializer_class().unwrap().name(), "UserSerializer");
    }

    #[test]
    fn test_many_related_serializer_class() {
        let plain = ManyRelatedField::new(FieldKind::Related(RelatedFlavor::PrimaryKey));
        assert!(plain.serializer_class().is_none());

        let asymmetric = ManyRelatedField::new(FieldKind::Asymmetric(AsymmetricRelatedField::new(
            SerializerClass::Direct(user_serializer()),
        )));
        assert!(matches!(asymmetric.serializer_class(), Some(Ok(_))));
    }

    #[test]
    fn test_many_related_renders_each_child() {
        let field = Field::many_related("tags", FieldKind::Related(RelatedFlavor::Slug { slug_field: "label".to_string() }));
        let value = json!([{"id": 1, "label": "rust"}, {"id": 2, "label": "orm"}]);

        assert_eq!(
            field.to_representation(&value, &SerializationContext::default()).unwrap(),
            json!(["rust", "orm"])
        );
        assert!(field.to_representation(&json!("rust"), &SerializationContext::default()).is_err());
    }
}
