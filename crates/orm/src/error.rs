//! Error types for the ORM descriptors
//!
//! Descriptor construction is the only fallible operation in this crate;
//! lookups answer with `Option` and classification with `bool`.

use std::fmt;

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Error types for model descriptor operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Attribute is not declared on the model
    UnknownAttribute { model: String, attribute: String },
    /// Attribute declared twice on the same model
    DuplicateAttribute { model: String, attribute: String },
    /// Relationship declaration is incomplete
    InvalidRelation(String),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::UnknownAttribute { model, attribute } => {
                write!(f, "Model '{}' has no attribute '{}'", model, attribute)
            }
            ModelError::DuplicateAttribute { model, attribute } => {
                write!(f, "Attribute '{}' is declared twice on model '{}'", attribute, model)
            }
            ModelError::InvalidRelation(msg) => write!(f, "Invalid relationship: {}", msg),
        }
    }
}

impl std::error::Error for ModelError {}
