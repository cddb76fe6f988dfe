//! Error types for Deepbrief

use crate::stage::StageId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("stage {stage} failed: {message}")]
    StageFailed { stage: StageId, message: String },

    #[error("stage {stage}: schema violation after {attempts} attempts: {message}")]
    SchemaViolation {
        stage: StageId,
        attempts: u32,
        message: String,
    },

    #[error("context store error: {0}")]
    ContextStore(String),

    #[error("run cancelled")]
    Cancelled,

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn stage_failed(stage: StageId, message: impl Into<String>) -> Self {
        Self::StageFailed {
            stage,
            message: message.into(),
        }
    }

    pub fn context_store(message: impl Into<String>) -> Self {
        Self::ContextStore(message.into())
    }

    /// The pipeline stage this error is attributable to, if any.
    pub fn stage(&self) -> Option<StageId> {
        match self {
            Self::StageFailed { stage, .. } => Some(*stage),
            Self::SchemaViolation { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
