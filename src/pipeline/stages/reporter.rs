//! Reporter stage
//!
//! Terminal stage: waits for the editor, then renders the HTML report from a
//! snapshot of the dataset.

use chrono::Utc;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::pipeline::barrier::OneShotBarrier;
use crate::pipeline::error::PipelineError;
use crate::pipeline::gate::DatasetGate;
use crate::pipeline::traits::{PipelineStage, StageOutput};
use crate::report::render_html;

pub struct ReporterStage {
    gate: DatasetGate,
    output: PathBuf,
    after_edit: OneShotBarrier,
    cancel: CancellationToken,
}

impl ReporterStage {
    pub fn new(
        gate: DatasetGate,
        output: PathBuf,
        after_edit: OneShotBarrier,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            gate,
            output,
            after_edit,
            cancel,
        }
    }
}

#[async_trait::async_trait]
impl PipelineStage for ReporterStage {
    async fn execute(&self) -> Result<StageOutput, PipelineError> {
        debug!("Reporter waiting on barrier '{}'", self.after_edit.name());
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(PipelineError::cancelled(self.stage_id())),
            _ = self.after_edit.wait() => {}
        }

        let snapshot = self.gate.snapshot().await;
        let html = render_html(&snapshot, Utc::now());
        tokio::fs::write(&self.output, html).await.map_err(|e| {
            PipelineError::Report(format!("failed to write {}: {e}", self.output.display()))
        })?;

        info!("HTML report written to {}", self.output.display());
        Ok(StageOutput::with_counts(
            format!("wrote {}", self.output.display()),
            snapshot.counts(),
        ))
    }

    fn stage_id(&self) -> &'static str {
        "reporter"
    }

    fn stage_name(&self) -> &'static str {
        "Reporter"
    }
}
