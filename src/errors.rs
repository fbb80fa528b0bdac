use thiserror::Error;

/// Errors raised by the codec. None of these are retried internally: the
/// codec is deterministic, so a retry without fixing the schema or input
/// would reproduce the same failure.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    #[error("schema mismatch at {path}: {reason}")]
    SchemaMismatch { path: String, reason: String },

    #[error("corrupt data: {0}")]
    CorruptData(String),

    #[error("precision loss at {path}: {reason}")]
    PrecisionLoss { path: String, reason: String },

    #[error("metadata encode/decode failed: {0}")]
    Metadata(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    pub fn mismatch(path: &str, reason: impl Into<String>) -> Self {
        CodecError::SchemaMismatch {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    pub fn precision(path: &str, reason: impl Into<String>) -> Self {
        CodecError::PrecisionLoss {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}
