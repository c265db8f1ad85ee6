//! Loader stage
//!
//! Simulates slow storage, then replaces the dataset from the markup
//! snapshot if one exists. Releases the editor when it terminates.

use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::persistence::PersistenceService;
use crate::pipeline::error::PipelineError;
use crate::pipeline::gate::DatasetGate;
use crate::pipeline::traits::{PipelineStage, StageOutput};

pub struct LoaderStage {
    gate: DatasetGate,
    persistence: PersistenceService,
    delay: Duration,
    cancel: CancellationToken,
}

impl LoaderStage {
    pub fn new(
        gate: DatasetGate,
        persistence: PersistenceService,
        delay: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            gate,
            persistence,
            delay,
            cancel,
        }
    }
}

#[async_trait::async_trait]
impl PipelineStage for LoaderStage {
    async fn execute(&self) -> Result<StageOutput, PipelineError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(PipelineError::cancelled(self.stage_id())),
            _ = tokio::time::sleep(self.delay) => {}
        }

        if !self.persistence.markup_snapshot_exists().await? {
            info!("No markup snapshot found, dataset left untouched");
            return Ok(StageOutput::new("no markup snapshot, dataset unchanged"));
        }

        let snapshot = self.persistence.read_markup().await;
        let import = self.gate.write(|dataset| snapshot.apply(dataset)).await;
        let counts = import.into_result()?;

        info!("Loaded markup snapshot into dataset ({})", counts);
        Ok(StageOutput::with_counts("imported markup snapshot", counts))
    }

    fn stage_id(&self) -> &'static str {
        "loader"
    }

    fn stage_name(&self) -> &'static str {
        "Loader"
    }
}
