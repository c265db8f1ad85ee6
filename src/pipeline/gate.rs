//! Serialized access to the shared [`Dataset`]

use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use crate::dataset::Dataset;

/// The only path to the dataset while a pipeline run is active. Every
/// operation holds the lock for its whole duration, so stage reads and writes
/// never interleave.
#[derive(Debug, Clone, Default)]
pub struct DatasetGate {
    inner: Arc<Mutex<Dataset>>,
}

impl DatasetGate {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            inner: Arc::new(Mutex::new(dataset)),
        }
    }

    pub async fn read<T>(&self, f: impl FnOnce(&Dataset) -> T) -> T {
        let dataset = self.inner.lock().await;
        f(&dataset)
    }

    pub async fn write<T>(&self, f: impl FnOnce(&mut Dataset) -> T) -> T {
        let mut dataset = self.inner.lock().await;
        f(&mut dataset)
    }

    /// Owned copy of the current dataset
    pub async fn snapshot(&self) -> Dataset {
        self.inner.lock().await.clone()
    }

    /// Hold the lock across several operations
    pub async fn lock(&self) -> MutexGuard<'_, Dataset> {
        self.inner.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Film;

    #[tokio::test]
    async fn test_concurrent_writes_are_serialized() {
        let gate = DatasetGate::default();
        let writers: Vec<_> = (0..16)
            .map(|i| {
                let gate = gate.clone();
                tokio::spawn(async move {
                    gate.write(|dataset| dataset.append(Film::new(format!("F{i}"), "", "", "", "")))
                        .await
                })
            })
            .collect();
        for writer in writers {
            writer.await.unwrap();
        }

        assert_eq!(gate.read(|dataset| dataset.films().len()).await, 16);
    }

    #[tokio::test]
    async fn test_snapshot_is_detached() {
        let gate = DatasetGate::default();
        let before = gate.snapshot().await;
        gate.write(|dataset| dataset.append(Film::new("A", "", "", "", ""))).await;

        assert!(before.is_empty());
        assert_eq!(gate.lock().await.films().len(), 1);
    }
}
