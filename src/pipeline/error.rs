//! Pipeline Error Types

use thiserror::Error;

use crate::errors::CodecError;

/// Errors raised while starting a pipeline run or executing one of its stages
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A run is already active; concurrent runs are rejected, not queued
    #[error("A pipeline run is already in progress")]
    AlreadyRunning,

    /// Stage execution failed
    #[error("Stage '{stage}' execution failed: {message}")]
    Stage { stage: String, message: String },

    /// Snapshot import or export failed inside a stage
    #[error("Snapshot error: {0}")]
    Codec(#[from] CodecError),

    /// Report rendering or writing failed
    #[error("Report error: {0}")]
    Report(String),

    /// The run's cancellation token fired while the stage was suspended
    #[error("Stage '{stage}' cancelled")]
    Cancelled { stage: String },
}

impl PipelineError {
    pub fn stage<S: Into<String>, M: Into<String>>(stage: S, message: M) -> Self {
        Self::Stage {
            stage: stage.into(),
            message: message.into(),
        }
    }

    pub fn cancelled<S: Into<String>>(stage: S) -> Self {
        Self::Cancelled {
            stage: stage.into(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
