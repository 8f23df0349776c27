//! Relationship Metadata - classification of relation attributes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Defines the type of relationship between models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipType {
    /// Forward many-to-one relationship (foreign key on this model)
    BelongsTo,
    /// Forward one-to-one relationship
    OneToOne,
    /// Reverse side of a one-to-one relationship
    HasOne,
    /// Reverse side of a many-to-one relationship
    HasMany,
    /// Many-to-many relationship, either side
    ManyToMany,
}

impl RelationshipType {
    /// Returns true if this relationship resolves to at most one row,
    /// so it can be joined into the parent query
    pub fn is_to_one(self) -> bool {
        matches!(self, Self::BelongsTo | Self::OneToOne | Self::HasOne)
    }

    /// Returns true if this relationship returns a collection
    pub fn is_collection(self) -> bool {
        matches!(self, Self::HasMany | Self::ManyToMany)
    }
}

/// Which side of a relation a key refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationSide {
    Forward,
    Reverse,
}

/// Identity of the relation object behind an attribute.
///
/// A relation is always owned by the model declaring the foreign key (or the
/// many-to-many field); the reverse accessor on the other model points at the
/// same owner and field with `RelationSide::Reverse`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationKey {
    pub owner: String,
    pub field: String,
    pub side: RelationSide,
}

impl RelationKey {
    pub fn forward(owner: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            field: field.into(),
            side: RelationSide::Forward,
        }
    }

    pub fn reverse(owner: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            field: field.into(),
            side: RelationSide::Reverse,
        }
    }
}

impl fmt::Display for RelationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.side {
            RelationSide::Forward => write!(f, "{}.{}", self.owner, self.field),
            RelationSide::Reverse => write!(f, "{}.{} (reverse)", self.owner, self.field),
        }
    }
}

/// Relation accessor exposed by a model attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDescriptor {
    /// The type of relationship
    pub relationship_type: RelationshipType,
    /// The related model's type name
    pub related_model: String,
    /// The relation object this accessor resolves to
    pub key: RelationKey,
}

impl RelationDescriptor {
    pub fn new(relationship_type: RelationshipType, related_model: impl Into<String>, key: RelationKey) -> Self {
        Self {
            relationship_type,
            related_model: related_model.into(),
            key,
        }
    }

    /// Forward or reverse to-one accessor, a candidate for select related
    pub fn is_related_object(&self) -> bool {
        self.relationship_type.is_to_one()
    }

    /// To-many accessor in either direction, always prefetched
    pub fn is_prefetch_object(&self) -> bool {
        self.relationship_type.is_collection()
    }
}
