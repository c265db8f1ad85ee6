//! Pipeline Traits

use crate::models::RecordCounts;
use crate::pipeline::error::PipelineError;

/// What a stage reports back after a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageOutput {
    pub detail: String,
    pub counts: Option<RecordCounts>,
}

impl StageOutput {
    pub fn new<S: Into<String>>(detail: S) -> Self {
        Self {
            detail: detail.into(),
            counts: None,
        }
    }

    pub fn with_counts<S: Into<String>>(detail: S, counts: RecordCounts) -> Self {
        Self {
            detail: detail.into(),
            counts: Some(counts),
        }
    }
}

/// A stage of the load/edit/report pipeline.
///
/// Stages receive everything they touch (gate, persistence, barriers,
/// cancellation token) at construction, so `execute` takes no input.
#[async_trait::async_trait]
pub trait PipelineStage: Send + Sync {
    async fn execute(&self) -> Result<StageOutput, PipelineError>;

    /// Get the unique identifier for this stage
    fn stage_id(&self) -> &'static str;

    /// Get the human-readable name for this stage
    fn stage_name(&self) -> &'static str;
}
