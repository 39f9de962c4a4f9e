//! Error types for the SMS reader.
//!
//! Every caller-visible failure is a `SmsError`. Each variant maps onto a
//! closed `ErrorKind` whose string code travels across the bridge next to
//! the human-readable message.

use thiserror::Error;

use crate::constants::messages;

/// Convenience type alias for Results using SmsError.
pub type SmsResult<T> = Result<T, SmsError>;

/// Failure raised by a message store backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be opened or does not have the expected shape.
    #[error("message store unavailable: {0}")]
    Unavailable(String),

    /// The backend rejected or failed the query.
    #[error("message store query failed: {0}")]
    Database(String),
}

/// Unified error type covering all caller-visible failures.
#[derive(Error, Debug)]
pub enum SmsError {
    // -- Plugin call errors --
    /// Read access has not been authorized by the user.
    #[error("{}", messages::PERMISSION_DENIED)]
    PermissionDenied,

    /// The operation is part of the contract but intentionally absent.
    #[error("{0}")]
    NotImplemented(String),

    /// The message store failed while answering a query.
    #[error("{}", messages::QUERY_FAILED)]
    QueryFailure(#[source] StoreError),

    /// A permission prompt is already waiting for the host to answer.
    #[error("a permission request is already in progress")]
    PermissionRequestPending,

    /// SMS access is not available on the running platform.
    #[error("{0}")]
    UnsupportedPlatform(String),

    /// Call options could not be interpreted.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The bridge received a method name it does not know.
    #[error("method not implemented: {0}")]
    UnknownMethod(String),

    // -- Configuration errors --
    /// Failed to load or parse application configuration.
    #[error("configuration error: {0}")]
    Config(String),

    // -- File/IO errors --
    /// File system operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    // -- Generic --
    /// An unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),

    /// Wrapping anyhow errors for interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<serde_json::Error> for SmsError {
    fn from(e: serde_json::Error) -> Self {
        SmsError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for SmsError {
    fn from(e: toml::de::Error) -> Self {
        SmsError::Config(e.to_string())
    }
}

impl From<StoreError> for SmsError {
    fn from(e: StoreError) -> Self {
        SmsError::QueryFailure(e)
    }
}

impl SmsError {
    /// The closed error kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PermissionDenied => ErrorKind::PermissionDenied,
            Self::NotImplemented(_) | Self::UnknownMethod(_) => ErrorKind::NotImplemented,
            Self::QueryFailure(_) => ErrorKind::QueryFailure,
            Self::PermissionRequestPending => ErrorKind::RequestPending,
            Self::UnsupportedPlatform(_) => ErrorKind::Unavailable,
            Self::InvalidArgument(_) | Self::Serialization(_) => ErrorKind::InvalidArgument,
            Self::Config(_) | Self::Io(_) | Self::Internal(_) | Self::Other(_) => ErrorKind::Internal,
        }
    }
}

/// Closed set of error kinds exposed to bridge callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Read permission missing; recoverable by requesting permission.
    PermissionDenied,
    /// Intentionally absent feature or unknown method.
    #[serde(rename = "UNIMPLEMENTED")]
    NotImplemented,
    /// The store failed; the cause is attached.
    #[serde(rename = "QUERY_FAILED")]
    QueryFailure,
    /// Another permission prompt is pending.
    RequestPending,
    /// SMS reading is not supported here.
    Unavailable,
    /// Bad call options.
    InvalidArgument,
    /// Anything else.
    Internal,
}

impl ErrorKind {
    /// Stable string code for this kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::NotImplemented => "UNIMPLEMENTED",
            Self::QueryFailure => "QUERY_FAILED",
            Self::RequestPending => "REQUEST_PENDING",
            Self::Unavailable => "UNAVAILABLE",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::Internal => "INTERNAL",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
