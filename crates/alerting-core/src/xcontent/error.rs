use thiserror::Error;

use crate::model::ValidationError;

use super::token::{Token, XContentLocation};

/// Errors raised while decoding from a parser or encoding into a builder.
#[derive(Debug, Error)]
pub enum XContentError {
    /// The cursor is not on the token kind the caller required.
    #[error("failed to parse object: expecting token of type [{expected}] but found [{actual}] at {location}")]
    UnexpectedToken {
        expected: Token,
        actual: String,
        location: XContentLocation,
    },

    /// A field name outside the entity's allow-list.
    #[error("unexpected field: {field}, while parsing {entity} at {location}")]
    UnexpectedField {
        field: String,
        entity: &'static str,
        location: XContentLocation,
    },

    /// The same field name appeared twice in one object.
    #[error("duplicate field: {field}, while parsing {entity} at {location}")]
    DuplicateField {
        field: String,
        entity: &'static str,
        location: XContentLocation,
    },

    #[error("{entity} is missing required field [{field}]")]
    MissingField {
        field: &'static str,
        entity: &'static str,
    },

    /// A scalar read hit a token that cannot be read as the requested type.
    #[error("cannot read {token} as {expected} at {location}")]
    ValueType {
        expected: &'static str,
        token: String,
        location: XContentLocation,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// Unbalanced or misplaced writes on a builder.
    #[error("builder: {0}")]
    Builder(String),
}
