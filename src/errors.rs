use thiserror::Error;

/// Main error type for requests against the creature database API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The requested resource does not exist
    #[error("{resource} not found")]
    NotFound { resource: String },
    /// The server answered with a non-success status
    #[error("unexpected status {status} for {resource}")]
    Status { resource: String, status: u16 },
    /// The request did not produce a response
    #[error("request for {resource} failed: {message}")]
    Transport { resource: String, message: String },
    /// The response body did not match the expected record shape
    #[error("could not decode {resource}: {message}")]
    Decode { resource: String, message: String },
    /// The record decoded but carries data outside the known vocabulary
    #[error("malformed {resource}: {details}")]
    MalformedData { resource: String, details: String },
    /// A reference embedded in a response could not be followed
    #[error(transparent)]
    Reference(#[from] ReferenceError),
    /// The request was abandoned because its view was torn down
    #[error("request cancelled")]
    Cancelled,
}

/// Errors related to resource reference URLs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    /// The reference does not follow the `.../<id>/` convention
    #[error("malformed reference {reference:?}: {reason}")]
    Malformed {
        reference: String,
        reason: &'static str,
    },
}

/// Errors related to loading and validating client configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("failed to read config file {path}: {message}")]
    Read { path: String, message: String },
    /// The config file is not valid RON
    #[error("failed to parse config file {path}: {message}")]
    Parse { path: String, message: String },
    /// A setting is out of range or unusable
    #[error("invalid {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl ApiError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}

/// Type alias for Results using ApiError
pub type ApiResult<T> = Result<T, ApiError>;

/// Type alias for Results using ReferenceError
pub type ReferenceResult<T> = Result<T, ReferenceError>;

/// Type alias for Results using ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
