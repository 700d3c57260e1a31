//! Errors raised while setting up or running a skip list scorer

use std::io;

use thiserror::Error;

/// Invalid script parameters; fatal for the scoring session
#[derive(Debug, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("Missing parameter [{0}]")]
    MissingParameter(&'static str),

    #[error("invalid parameter [additionalFieldValue] needs to be a long (got {0:?})")]
    InvalidThreshold(String),

    #[error("invalid parameter [{name}]: {message}")]
    InvalidParameter { name: String, message: String },

    #[error("invalid parameter [data]: not valid base64 ({0})")]
    InvalidPayloadEncoding(String),

    #[error("Unknown script name {0}")]
    UnknownScript(String),
}

/// Malformed serialized bitmap
#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    #[error("truncated payload: {0}")]
    Truncated(String),

    #[error("invalid cookie {0:#x}")]
    InvalidCookie(u32),

    #[error("container count {0} exceeds 65536")]
    TooManyContainers(u32),

    #[error("container keys are not strictly ascending ({previous} then {key})")]
    UnorderedKeys { previous: u16, key: u16 },

    #[error("container {key}: {message}")]
    InvalidContainer { key: u16, message: String },
}

impl From<io::Error> for DecodeError {
    fn from(error: io::Error) -> Self {
        DecodeError::Truncated(error.to_string())
    }
}

/// Failure to read a field value for one document
#[derive(Debug, Error, PartialEq, Clone)]
pub enum FieldAccessError {
    #[error("field [{field}] does not hold {expected} values")]
    WrongType {
        field: String,
        expected: &'static str,
    },

    #[error("field [{0}] has no value")]
    NoValue(String),

    #[error("field [{field}]: cannot parse {value:?}")]
    Unparsable { field: String, value: String },
}
