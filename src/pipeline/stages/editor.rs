//! Editor stage
//!
//! Waits for the loader, marks the dataset as edited and exports the result
//! as a markup snapshot. Releases the reporter when it terminates.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::dataset::{Dataset, DatasetRecord};
use crate::models::{Film, Session};
use crate::persistence::PersistenceService;
use crate::pipeline::barrier::OneShotBarrier;
use crate::pipeline::error::PipelineError;
use crate::pipeline::gate::DatasetGate;
use crate::pipeline::traits::{PipelineStage, StageOutput};

/// What [`apply_marker`] changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerEdits {
    pub titles_marked: usize,
    pub price_marked: bool,
}

/// Append `suffix` to every film title not already carrying it, and to the
/// price of the first session.
///
/// Title marking is idempotent. The price suffix is appended on every call.
pub fn apply_marker(dataset: &mut Dataset, suffix: &str) -> MarkerEdits {
    let mut edits = MarkerEdits::default();

    for film in Film::sequence_mut(dataset) {
        if film.mark_title(suffix) {
            edits.titles_marked += 1;
        }
    }

    if let Some(session) = Session::sequence_mut(dataset).first_mut() {
        session.price.push_str(suffix);
        edits.price_marked = true;
    }

    edits
}

pub struct EditorStage {
    gate: DatasetGate,
    persistence: PersistenceService,
    marker_suffix: String,
    after_load: OneShotBarrier,
    cancel: CancellationToken,
}

impl EditorStage {
    pub fn new(
        gate: DatasetGate,
        persistence: PersistenceService,
        marker_suffix: String,
        after_load: OneShotBarrier,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            gate,
            persistence,
            marker_suffix,
            after_load,
            cancel,
        }
    }
}

#[async_trait::async_trait]
impl PipelineStage for EditorStage {
    async fn execute(&self) -> Result<StageOutput, PipelineError> {
        debug!("Editor waiting on barrier '{}'", self.after_load.name());
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(PipelineError::cancelled(self.stage_id())),
            _ = self.after_load.wait() => {}
        }

        let suffix = self.marker_suffix.as_str();
        let (edits, snapshot) = self
            .gate
            .write(|dataset| (apply_marker(dataset, suffix), dataset.clone()))
            .await;
        info!(
            "Marked {} film title(s), first session price marked: {}",
            edits.titles_marked, edits.price_marked
        );

        let counts = self.persistence.export_markup(&snapshot).await?;
        Ok(StageOutput::with_counts(
            format!(
                "marked {} title(s) and exported markup snapshot",
                edits.titles_marked
            ),
            counts,
        ))
    }

    fn stage_id(&self) -> &'static str {
        "editor"
    }

    fn stage_name(&self) -> &'static str {
        "Editor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_is_idempotent_for_titles() {
        let mut dataset = Dataset::new();
        dataset.append(Film::new("A", "", "", "", ""));
        dataset.append(Film::new("B (edited)", "", "", "", ""));

        let first = apply_marker(&mut dataset, " (edited)");
        assert_eq!(first.titles_marked, 1);
        assert!(!first.price_marked);

        let second = apply_marker(&mut dataset, " (edited)");
        assert_eq!(second.titles_marked, 0);

        let titles: Vec<_> = dataset.films().iter().map(|f| f.title.as_str()).collect();
        assert_eq!(titles, vec!["A (edited)", "B (edited)"]);
    }

    #[test]
    fn test_marker_touches_first_session_price_only() {
        let mut dataset = Dataset::new();
        dataset.append(Session::new("A", "15.12.2025", "18:00", "Hall 1", "350"));
        dataset.append(Session::new("A", "15.12.2025", "21:00", "Hall 1", "400"));

        let edits = apply_marker(&mut dataset, " (edited)");
        assert!(edits.price_marked);
        assert_eq!(dataset.sessions()[0].price, "350 (edited)");
        assert_eq!(dataset.sessions()[1].price, "400");
    }
}
