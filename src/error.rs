//! Error types shared by every conversion in the crate.

use thiserror::Error;

use crate::convert::QuantityError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error represents a failed conversion between the generic configuration
/// representation and the structured resource model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("{field}: type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("{key}: invalid quantity {value:?}: {source}")]
    QuantityParse {
        key: String,
        value: String,
        #[source]
        source: QuantityError,
    },

    #[error("malformed identifier {id:?}: expected \"namespace/name\"")]
    MalformedIdentifier { id: String },
}

impl Error {
    /// Creates a type mismatch error.
    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Error::TypeMismatch {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Creates a quantity parse error for the entry `key`.
    pub fn quantity_parse(key: impl Into<String>, value: impl Into<String>, source: QuantityError) -> Self {
        Error::QuantityParse {
            key: key.into(),
            value: value.into(),
            source,
        }
    }

    /// Creates a malformed identifier error.
    pub fn malformed_identifier(id: impl Into<String>) -> Self {
        Error::MalformedIdentifier { id: id.into() }
    }
}
