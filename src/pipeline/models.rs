use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::RecordCounts;
use crate::pipeline::error::PipelineError;
use crate::pipeline::traits::StageOutput;

/// Whether the coordinator currently has a run in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineState {
    Idle,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineStatus {
    Running,
    /// Every stage completed
    Completed,
    /// At least one stage failed
    Failed,
    /// At least one stage was cancelled and none failed
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StageStatus {
    Pending,
    Completed,
    Failed { message: String },
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineStageExecution {
    pub id: String,
    pub name: String,
    pub status: StageStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub detail: Option<String>,
    pub counts: Option<RecordCounts>,
}

/// Structured report of one pipeline run, produced by the monitor once every
/// stage has terminated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineExecution {
    pub id: Uuid,
    pub status: PipelineStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Stages in launch order
    pub stages: Vec<PipelineStageExecution>,
}

impl PipelineExecution {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            status: PipelineStatus::Running,
            started_at: Utc::now(),
            completed_at: None,
            stages: Vec::new(),
        }
    }

    pub fn add_stage(&mut self, id: &str, name: &str) {
        self.stages.push(PipelineStageExecution {
            id: id.to_string(),
            name: name.to_string(),
            status: StageStatus::Pending,
            started_at: None,
            completed_at: None,
            detail: None,
            counts: None,
        });
    }

    pub fn stage(&self, id: &str) -> Option<&PipelineStageExecution> {
        self.stages.iter().find(|stage| stage.id == id)
    }

    fn stage_mut(&mut self, id: &str) -> Option<&mut PipelineStageExecution> {
        self.stages.iter_mut().find(|stage| stage.id == id)
    }

    /// Record how a stage terminated
    pub fn finish_stage(
        &mut self,
        id: &str,
        started_at: Option<DateTime<Utc>>,
        result: Result<StageOutput, PipelineError>,
    ) {
        let Some(stage) = self.stage_mut(id) else {
            return;
        };
        stage.started_at = started_at;
        stage.completed_at = Some(Utc::now());
        match result {
            Ok(output) => {
                stage.status = StageStatus::Completed;
                stage.detail = Some(output.detail);
                stage.counts = output.counts;
            }
            Err(err) if err.is_cancelled() => {
                stage.status = StageStatus::Cancelled;
                stage.detail = Some(err.to_string());
            }
            Err(err) => {
                stage.status = StageStatus::Failed {
                    message: err.to_string(),
                };
            }
        }
    }

    /// Derive the run status from the stage outcomes and stamp completion
    pub fn complete(&mut self) {
        let any_failed = self
            .stages
            .iter()
            .any(|stage| matches!(stage.status, StageStatus::Failed { .. }));
        let any_cancelled = self
            .stages
            .iter()
            .any(|stage| stage.status == StageStatus::Cancelled);

        self.status = if any_failed {
            PipelineStatus::Failed
        } else if any_cancelled {
            PipelineStatus::Cancelled
        } else {
            PipelineStatus::Completed
        };
        self.completed_at = Some(Utc::now());
    }

    pub fn is_success(&self) -> bool {
        self.status == PipelineStatus::Completed
    }

    pub fn failed_stages(&self) -> Vec<&PipelineStageExecution> {
        self.stages
            .iter()
            .filter(|stage| matches!(stage.status, StageStatus::Failed { .. }))
            .collect()
    }

    pub fn duration(&self) -> Option<chrono::Duration> {
        self.completed_at.map(|completed| completed - self.started_at)
    }
}
