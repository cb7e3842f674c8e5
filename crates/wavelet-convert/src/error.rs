//! Error types for wavelet conversion.
//!
//! Two kinds of failure leave a conversion session:
//! - fatal dispatch violations, where the stream producer broke the contract
//! - conversion failures, where the history itself cannot be converted
//!
//! Neither is retryable: shadow state is deterministic, so the same input
//! fails the same way again.

use thiserror::Error;
use wavelet_ops::{OpError, OpKind, WaveletOperation};

/// Errors raised by a translator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    #[error("Operation does not fit the shadow document: {0}")]
    Shadow(#[from] OpError),

    #[error("Cannot translate operation: {0}")]
    Unsupported(String),
}

/// Why a content operation could not be converted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionFailure {
    #[error("apply failed: {0}")]
    Apply(#[from] OpError),

    #[error("translation failed: {0}")]
    Translate(#[from] TranslateError),
}

/// Errors returned by the wavelet converter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    #[error("Unexpected {kind} operation: {operation}")]
    UnexpectedOperation {
        kind: OpKind,
        operation: Box<WaveletOperation>,
    },

    #[error("{operation}: more than one result: {first}, {second}")]
    DuplicateResult {
        operation: Box<WaveletOperation>,
        first: Box<WaveletOperation>,
        second: Box<WaveletOperation>,
    },

    #[error("No result: {operation}")]
    MissingResult { operation: Box<WaveletOperation> },

    #[error("Conversion session aborted by an earlier fatal error")]
    SessionAborted,

    #[error("Failed converting {operation}: {source}")]
    Conversion {
        operation: Box<WaveletOperation>,
        source: ConversionFailure,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ConvertError {
    /// Fatal errors are contract violations; they abort the session.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ConvertError::UnexpectedOperation { .. }
                | ConvertError::DuplicateResult { .. }
                | ConvertError::MissingResult { .. }
                | ConvertError::SessionAborted
        )
    }

    /// The wavelet operation being converted when the error occurred.
    pub fn operation(&self) -> Option<&WaveletOperation> {
        match self {
            ConvertError::UnexpectedOperation { operation, .. }
            | ConvertError::DuplicateResult { operation, .. }
            | ConvertError::MissingResult { operation }
            | ConvertError::Conversion { operation, .. } => Some(operation.as_ref()),
            ConvertError::SessionAborted | ConvertError::InvalidConfig(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConvertError {
    fn from(err: serde_json::Error) -> Self {
        ConvertError::InvalidConfig(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
