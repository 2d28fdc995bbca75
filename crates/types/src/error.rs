use thiserror::Error;

/// Errors raised while decoding wire payloads
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed json: {0}")]
    Json(String),

    #[error("unknown field `{field}`")]
    UnknownField { field: String },

    #[error("expected a json object")]
    NotAnObject,
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::Json(err.to_string())
    }
}

/// Errors raised by `Fee::validate`
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeeValidationError {
    #[error("{field} fee is invalid: {reason}")]
    InvalidCoins { field: &'static str, reason: String },

    #[error("all fees are zero")]
    AllZero,

    #[error("coin arithmetic failed: {0}")]
    Arithmetic(String),
}
