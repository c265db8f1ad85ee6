//! Snapshot persistence for the [`Dataset`]
//!
//! Two independent codecs translate the dataset to and from files:
//!
//! - [`text`]: a single delimited-text file holding all three kinds
//! - [`markup`]: one XML document per record kind
//!
//! Imports always read and decode completely before the dataset is touched,
//! so a failed import leaves the dataset as it was. The markup import works
//! kind by kind: a missing file empties that kind, a malformed file leaves
//! that kind untouched and is reported in [`MarkupImport::failures`].

use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::config::StorageConfig;
use crate::dataset::{Dataset, DatasetRecord};
use crate::errors::{CodecError, CodecResult};
use crate::models::{Film, RecordCounts, RecordKind, Session, Ticket};

pub mod markup;
pub mod text;

/// Outcome of a text snapshot import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextImportSummary {
    pub counts: RecordCounts,
    /// Record lines dropped for having too few fields
    pub skipped_lines: usize,
}

/// Decoded markup documents, not yet applied to a dataset.
///
/// A `None` sequence means that kind failed to load and must be left alone.
#[derive(Debug, Default)]
pub struct MarkupSnapshot {
    films: Option<Vec<Film>>,
    sessions: Option<Vec<Session>>,
    tickets: Option<Vec<Ticket>>,
    failures: Vec<(RecordKind, CodecError)>,
}

/// Outcome of a markup snapshot import
#[derive(Debug, Default)]
pub struct MarkupImport {
    /// Records now held per kind. Failed kinds report their untouched count.
    pub counts: RecordCounts,
    pub failures: Vec<(RecordKind, CodecError)>,
}

impl MarkupImport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Collapse into a `Result`, surfacing the first failed kind
    pub fn into_result(self) -> CodecResult<RecordCounts> {
        match self.failures.into_iter().next() {
            Some((_, err)) => Err(err),
            None => Ok(self.counts),
        }
    }
}

impl MarkupSnapshot {
    /// Replace every successfully decoded kind in `dataset`
    pub fn apply(self, dataset: &mut Dataset) -> MarkupImport {
        apply_kind(dataset, self.films);
        apply_kind(dataset, self.sessions);
        apply_kind(dataset, self.tickets);

        MarkupImport {
            counts: dataset.counts(),
            failures: self.failures,
        }
    }
}

fn apply_kind<R: DatasetRecord>(dataset: &mut Dataset, records: Option<Vec<R>>) {
    if let Some(records) = records {
        dataset.replace_all(records);
    }
}

/// File-backed import and export of the dataset
#[derive(Debug, Clone)]
pub struct PersistenceService {
    storage: StorageConfig,
}

impl PersistenceService {
    pub fn new(storage: StorageConfig) -> Self {
        Self { storage }
    }

    /// Write the whole dataset as a delimited-text snapshot
    pub async fn export_text(&self, dataset: &Dataset, path: impl AsRef<Path>) -> CodecResult<RecordCounts> {
        let path = path.as_ref();
        let content = text::encode(dataset);
        fs::write(path, content)
            .await
            .map_err(|e| CodecError::io(path, e))?;

        let counts = dataset.counts();
        info!("Exported text snapshot to {} ({})", path.display(), counts);
        Ok(counts)
    }

    /// Replace all three kinds from a delimited-text snapshot. On error the
    /// dataset is unchanged.
    pub async fn import_text(&self, path: impl AsRef<Path>, dataset: &mut Dataset) -> CodecResult<TextImportSummary> {
        let decoded = self.read_text(path.as_ref()).await?;
        *dataset = decoded.dataset;

        let summary = TextImportSummary {
            counts: dataset.counts(),
            skipped_lines: decoded.skipped_lines,
        };
        info!(
            "Imported text snapshot from {} ({}, {} line(s) skipped)",
            path.as_ref().display(),
            summary.counts,
            summary.skipped_lines
        );
        Ok(summary)
    }

    /// Read and decode a text snapshot without applying it
    pub async fn read_text(&self, path: &Path) -> CodecResult<text::TextDecoded> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| CodecError::io(path, e))?;
        let decoded = text::decode(&content);
        if decoded.skipped_lines > 0 {
            warn!(
                "Text snapshot {} had {} malformed line(s)",
                path.display(),
                decoded.skipped_lines
            );
        }
        Ok(decoded)
    }

    /// Write one markup document per kind. Stops at the first failed write;
    /// documents already written stay on disk.
    pub async fn export_markup(&self, dataset: &Dataset) -> CodecResult<RecordCounts> {
        self.write_kind(dataset.films()).await?;
        self.write_kind(dataset.sessions()).await?;
        self.write_kind(dataset.tickets()).await?;

        let counts = dataset.counts();
        info!(
            "Exported markup snapshot to {} ({})",
            self.storage.data_dir.display(),
            counts
        );
        Ok(counts)
    }

    /// Read every kind's markup document and apply the ones that decoded
    pub async fn import_markup(&self, dataset: &mut Dataset) -> MarkupImport {
        let import = self.read_markup().await.apply(dataset);
        if import.is_complete() {
            info!("Imported markup snapshot ({})", import.counts);
        } else {
            warn!(
                "Imported markup snapshot with {} failed kind(s) ({})",
                import.failures.len(),
                import.counts
            );
        }
        import
    }

    /// Read and decode every kind's markup document without applying it
    pub async fn read_markup(&self) -> MarkupSnapshot {
        let mut snapshot = MarkupSnapshot::default();
        snapshot.films = self.read_kind_into(&mut snapshot.failures).await;
        snapshot.sessions = self.read_kind_into(&mut snapshot.failures).await;
        snapshot.tickets = self.read_kind_into(&mut snapshot.failures).await;
        snapshot
    }

    /// True when at least one markup document exists. A path that cannot
    /// be checked is an error, not a missing document.
    pub async fn markup_snapshot_exists(&self) -> CodecResult<bool> {
        for kind in RecordKind::ALL {
            let path = self.storage.markup_path(kind);
            if fs::try_exists(&path)
                .await
                .map_err(|e| CodecError::io(&path, e))?
            {
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn write_kind<R: DatasetRecord>(&self, records: &[R]) -> CodecResult<()> {
        let path = self.storage.markup_path(R::KIND);
        let document = markup::encode(records).map_err(|e| CodecError::io(&path, e))?;
        fs::write(&path, document)
            .await
            .map_err(|e| CodecError::io(&path, e))?;
        debug!("Wrote {} {} record(s) to {}", records.len(), R::KIND, path.display());
        Ok(())
    }

    async fn read_kind_into<R: DatasetRecord>(
        &self,
        failures: &mut Vec<(RecordKind, CodecError)>,
    ) -> Option<Vec<R>> {
        match self.read_kind::<R>().await {
            Ok(records) => Some(records),
            Err(err) => {
                warn!("Failed to import {} markup: {}", R::KIND, err);
                failures.push((R::KIND, err));
                None
            }
        }
    }

    async fn read_kind<R: DatasetRecord>(&self) -> CodecResult<Vec<R>> {
        let path = self.storage.markup_path(R::KIND);
        match fs::read_to_string(&path).await {
            Ok(content) => {
                let records = markup::decode::<R>(&content, &path)?;
                debug!("Read {} {} record(s) from {}", records.len(), R::KIND, path.display());
                Ok(records)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No {} markup at {}, treating as empty", R::KIND, path.display());
                Ok(Vec::new())
            }
            Err(e) if e.kind() == ErrorKind::InvalidData => Err(CodecError::parse(&path, e)),
            Err(e) => Err(CodecError::io(&path, e)),
        }
    }
}
