use thiserror::Error;

/// Result type alias for serializer operations
pub type SerializerResult<T> = Result<T, SerializerError>;

/// Errors raised while building serializers or rendering records
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializerError {
    #[error("No serializer registered under '{0}'")]
    UnknownSerializer(String),

    #[error("Field '{field}' is declared twice on serializer '{serializer}'")]
    DuplicateField { serializer: String, field: String },

    #[error("Related value for field '{field}' has no primary key")]
    MissingPrimaryKey { field: String },

    #[error("Invalid query string: {0}")]
    InvalidQuery(String),

    #[error("Field '{field}' expected {expected}")]
    InvalidValue { field: String, expected: String },
}

impl SerializerError {
    pub fn invalid_value(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            expected: expected.into(),
        }
    }
}
