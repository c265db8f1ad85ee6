//! Pipeline Coordinator
//!
//! Launches the loader, editor and reporter stages concurrently and orders
//! them with two one-shot barriers:
//!
//! ```text
//! loader ──signal A──▶ editor ──signal B──▶ reporter
//! ```
//!
//! A monitor task joins all three stages, assembles the
//! [`PipelineExecution`] report and returns the coordinator to idle. Only
//! one run may be active at a time.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::persistence::PersistenceService;
use crate::pipeline::barrier::OneShotBarrier;
use crate::pipeline::error::PipelineError;
use crate::pipeline::gate::DatasetGate;
use crate::pipeline::models::{PipelineExecution, PipelineState};
use crate::pipeline::stages::{EditorStage, LoaderStage, ReporterStage};
use crate::pipeline::traits::{PipelineStage, StageOutput};

/// Clears the busy flag when the monitor finishes, however it finishes
struct BusyGuard {
    busy: Arc<AtomicBool>,
}

impl BusyGuard {
    fn try_acquire(busy: &Arc<AtomicBool>) -> Option<Self> {
        busy.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { busy: busy.clone() })
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Outcome of a single stage task
struct StageRun {
    started_at: DateTime<Utc>,
    result: Result<StageOutput, PipelineError>,
}

/// A launched stage: its identity plus the task running it
struct StageTask {
    id: &'static str,
    name: &'static str,
    handle: JoinHandle<StageRun>,
}

/// Handle to an in-flight pipeline run
#[derive(Debug)]
pub struct PipelineHandle {
    run_id: Uuid,
    cancel: CancellationToken,
    monitor: JoinHandle<PipelineExecution>,
}

impl PipelineHandle {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Ask every stage still suspended to stop. Stages that are cancelled
    /// still release their downstream barrier.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Wait for the monitor to join all stages and return the run report
    pub async fn wait(self) -> Result<PipelineExecution, PipelineError> {
        self.monitor
            .await
            .map_err(|e| PipelineError::stage("monitor", e.to_string()))
    }
}

pub struct PipelineCoordinator {
    gate: DatasetGate,
    persistence: PersistenceService,
    config: Config,
    busy: Arc<AtomicBool>,
}

impl PipelineCoordinator {
    pub fn new(gate: DatasetGate, config: Config) -> Self {
        let persistence = PersistenceService::new(config.storage.clone());
        Self {
            gate,
            persistence,
            config,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn gate(&self) -> &DatasetGate {
        &self.gate
    }

    pub fn state(&self) -> PipelineState {
        if self.busy.load(Ordering::Acquire) {
            PipelineState::Running
        } else {
            PipelineState::Idle
        }
    }

    /// Start a run and wait for its report
    pub async fn run_pipeline(&self) -> Result<PipelineExecution, PipelineError> {
        self.start_pipeline()?.wait().await
    }

    /// Start a run without waiting for it. Must be called from within a
    /// Tokio runtime.
    ///
    /// Returns [`PipelineError::AlreadyRunning`] while another run is active.
    pub fn start_pipeline(&self) -> Result<PipelineHandle, PipelineError> {
        let busy = BusyGuard::try_acquire(&self.busy).ok_or_else(|| {
            warn!("Rejected pipeline run: another run is in progress");
            PipelineError::AlreadyRunning
        })?;

        let run_id = Uuid::new_v4();
        let cancel = CancellationToken::new();
        let loaded = OneShotBarrier::new("loaded");
        let edited = OneShotBarrier::new("edited");

        info!("Starting pipeline run {}", run_id);

        let loader = LoaderStage::new(
            self.gate.clone(),
            self.persistence.clone(),
            self.config.pipeline.loader_delay,
            cancel.clone(),
        );
        let editor = EditorStage::new(
            self.gate.clone(),
            self.persistence.clone(),
            self.config.pipeline.marker_suffix.clone(),
            loaded.clone(),
            cancel.clone(),
        );
        let reporter = ReporterStage::new(
            self.gate.clone(),
            self.config.storage.pipeline_report_path(),
            edited.clone(),
            cancel.clone(),
        );

        let tasks = vec![
            spawn_stage(Arc::new(loader), Some(loaded)),
            spawn_stage(Arc::new(editor), Some(edited)),
            spawn_stage(Arc::new(reporter), None),
        ];
        let monitor = tokio::spawn(monitor(run_id, tasks, busy));

        Ok(PipelineHandle {
            run_id,
            cancel,
            monitor,
        })
    }
}

/// Run `stage` on its own task. `releases` is signalled when the task ends,
/// whether the stage succeeded, failed, was cancelled or panicked.
fn spawn_stage(stage: Arc<dyn PipelineStage>, releases: Option<OneShotBarrier>) -> StageTask {
    let id = stage.stage_id();
    let name = stage.stage_name();

    let handle = tokio::spawn(async move {
        let _release = releases.as_ref().map(OneShotBarrier::signal_on_drop);
        let started_at = Utc::now();
        info!("Stage '{}' started", stage.stage_name());

        let result = stage.execute().await;
        match &result {
            Ok(output) => info!("Stage '{}' completed: {}", stage.stage_name(), output.detail),
            Err(e) if e.is_cancelled() => warn!("Stage '{}' cancelled", stage.stage_name()),
            Err(e) => error!("Stage '{}' failed: {}", stage.stage_name(), e),
        }

        StageRun { started_at, result }
    });

    StageTask { id, name, handle }
}

async fn monitor(run_id: Uuid, tasks: Vec<StageTask>, busy: BusyGuard) -> PipelineExecution {
    let mut execution = PipelineExecution::new(run_id);
    for task in &tasks {
        execution.add_stage(task.id, task.name);
    }

    for task in tasks {
        match task.handle.await {
            Ok(run) => execution.finish_stage(task.id, Some(run.started_at), run.result),
            Err(join_error) => {
                let message = if join_error.is_panic() {
                    panic_message(join_error.into_panic())
                } else {
                    join_error.to_string()
                };
                error!("Stage '{}' terminated abnormally: {}", task.name, message);
                execution.finish_stage(
                    task.id,
                    None,
                    Err(PipelineError::stage(task.id, format!("panicked: {message}"))),
                );
            }
        }
    }

    execution.complete();
    drop(busy);
    info!(
        "Pipeline run {} finished with status {:?}",
        run_id, execution.status
    );
    execution
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
