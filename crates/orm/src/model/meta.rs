//! Model metadata - the attributes a record type exposes and the relations
//! it declares

use std::collections::HashMap;

use crate::error::{ModelError, ModelResult};
use crate::relationships::{RelationDescriptor, RelationKey, RelationshipType};

/// A named attribute on a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribute {
    /// Plain database column
    Column,
    /// Computed property, never backed by a relation
    Property,
    /// Relation accessor
    Relation(RelationDescriptor),
}

impl Attribute {
    pub fn as_relation(&self) -> Option<&RelationDescriptor> {
        match self {
            Attribute::Relation(relation) => Some(relation),
            _ => None,
        }
    }

    pub fn is_property(&self) -> bool {
        matches!(self, Attribute::Property)
    }

    /// Forward or reverse to-one relation
    pub fn is_related_object(&self) -> bool {
        self.as_relation().map_or(false, RelationDescriptor::is_related_object)
    }

    /// To-many relation in either direction
    pub fn is_prefetch_object(&self) -> bool {
        self.as_relation().map_or(false, RelationDescriptor::is_prefetch_object)
    }
}

/// Runtime description of a record type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelMeta {
    name: String,
    attributes: HashMap<String, Attribute>,
    /// Relation objects declared on the model, forward and reverse
    fields: Vec<RelationKey>,
}

impl ModelMeta {
    pub fn builder(name: impl Into<String>) -> ModelMetaBuilder {
        ModelMetaBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Look up an attribute, failing when it is not declared
    pub fn require_attribute(&self, name: &str) -> ModelResult<&Attribute> {
        self.attribute(name).ok_or_else(|| ModelError::UnknownAttribute {
            model: self.name.clone(),
            attribute: name.to_string(),
        })
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Relation accessor for `name`, if that attribute is one
    pub fn relation(&self, name: &str) -> Option<&RelationDescriptor> {
        self.attribute(name).and_then(Attribute::as_relation)
    }

    /// All relation objects declared on this model
    pub fn get_fields(&self) -> &[RelationKey] {
        &self.fields
    }

    /// Whether `attribute` is a relation genuinely declared on this model.
    ///
    /// Properties never qualify. A relation accessor qualifies only when its
    /// relation object is among the model's declared fields, which rules out
    /// accessors that merely share a name with a relation of another model.
    pub fn check_in_fields(&self, attribute: &Attribute) -> bool {
        match attribute {
            Attribute::Relation(relation) => self.fields.contains(&relation.key),
            Attribute::Column | Attribute::Property => false,
        }
    }
}

/// Builder for [`ModelMeta`]
#[derive(Debug)]
pub struct ModelMetaBuilder {
    name: String,
    attributes: Vec<(String, Attribute)>,
    fields: Vec<RelationKey>,
}

impl ModelMetaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Add a plain column
    pub fn column(mut self, name: &str) -> Self {
        self.attributes.push((name.to_string(), Attribute::Column));
        self
    }

    /// Add a computed property
    pub fn property(mut self, name: &str) -> Self {
        self.attributes.push((name.to_string(), Attribute::Property));
        self
    }

    /// Foreign key declared on this model
    pub fn belongs_to(self, name: &str, related_model: &str) -> Self {
        let key = RelationKey::forward(self.name.clone(), name);
        self.relation(name, RelationshipType::BelongsTo, related_model, key)
    }

    /// One-to-one field declared on this model
    pub fn one_to_one(self, name: &str, related_model: &str) -> Self {
        let key = RelationKey::forward(self.name.clone(), name);
        self.relation(name, RelationshipType::OneToOne, related_model, key)
    }

    /// Many-to-many field declared on this model
    pub fn many_to_many(self, name: &str, related_model: &str) -> Self {
        let key = RelationKey::forward(self.name.clone(), name);
        self.relation(name, RelationshipType::ManyToMany, related_model, key)
    }

    /// Reverse accessor of `related_model.foreign_key`, a foreign key
    pub fn has_many(self, name: &str, related_model: &str, foreign_key: &str) -> Self {
        let key = RelationKey::reverse(related_model, foreign_key);
        self.relation(name, RelationshipType::HasMany, related_model, key)
    }

    /// Reverse accessor of `related_model.field`, a one-to-one field
    pub fn has_one(self, name: &str, related_model: &str, field: &str) -> Self {
        let key = RelationKey::reverse(related_model, field);
        self.relation(name, RelationshipType::HasOne, related_model, key)
    }

    /// Reverse accessor of `related_model.field`, a many-to-many field
    pub fn many_to_many_reverse(self, name: &str, related_model: &str, field: &str) -> Self {
        let key = RelationKey::reverse(related_model, field);
        self.relation(name, RelationshipType::ManyToMany, related_model, key)
    }

    /// Add an arbitrary relation accessor and declare its relation object
    pub fn relation(
        mut self,
        name: &str,
        relationship_type: RelationshipType,
        related_model: &str,
        key: RelationKey,
    ) -> Self {
        self.fields.push(key.clone());
        self.attributes.push((
            name.to_string(),
            Attribute::Relation(RelationDescriptor::new(relationship_type, related_model, key)),
        ));
        self
    }

    /// Add an attribute without declaring any relation object for it
    pub fn attribute(mut self, name: &str, attribute: Attribute) -> Self {
        self.attributes.push((name.to_string(), attribute));
        self
    }

    pub fn build(self) -> ModelResult<ModelMeta> {
        let mut attributes = HashMap::with_capacity(self.attributes.len());

        for (name, attribute) in self.attributes {
            if let Attribute::Relation(ref relation) = attribute {
                if relation.related_model.is_empty() {
                    return Err(ModelError::InvalidRelation(format!(
                        "'{}.{}' does not name a related model",
                        self.name, name
                    )));
                }
            }

            if attributes.contains_key(&name) {
                return Err(ModelError::DuplicateAttribute {
                    model: self.name,
                    attribute: name,
                });
            }
            attributes.insert(name, attribute);
        }

        tracing::trace!("Built model metadata for '{}' ({} attributes)", self.name, attributes.len());

        Ok(ModelMeta {
            name: self.name,
            attributes,
            fields: self.fields,
        })
    }
}
