//! Load/edit/report pipeline
//!
//! Three stages run as concurrent Tokio tasks against one shared dataset:
//!
//! 1. **Loader** replaces the dataset from the markup snapshot
//! 2. **Editor** marks records as edited and exports a new snapshot
//! 3. **Reporter** renders the HTML report
//!
//! Ordering comes from two [`OneShotBarrier`]s rather than from sequential
//! execution, and every dataset access goes through the [`DatasetGate`].

pub mod barrier;
pub mod coordinator;
pub mod error;
pub mod gate;
pub mod models;
pub mod stages;
pub mod traits;

pub use barrier::{OneShotBarrier, SignalOnDrop};
pub use coordinator::{PipelineCoordinator, PipelineHandle};
pub use error::PipelineError;
pub use gate::DatasetGate;
pub use models::{PipelineExecution, PipelineStageExecution, PipelineState, PipelineStatus, StageStatus};
pub use traits::{PipelineStage, StageOutput};
