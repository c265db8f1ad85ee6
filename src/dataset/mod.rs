//! Shared in-memory dataset of films, sessions and tickets
//!
//! The dataset performs no locking of its own. While a pipeline run is
//! active, every access must go through the
//! [`DatasetGate`](crate::pipeline::DatasetGate).

use serde::{Deserialize, Serialize};

use crate::errors::DatasetError;
use crate::models::{Film, Record, RecordCounts, RecordKind, Session, Ticket};

/// Three independent ordered sequences, one per record kind. Insertion order
/// is preserved and duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    films: Vec<Film>,
    sessions: Vec<Session>,
    tickets: Vec<Ticket>,
}

/// Records that can be stored in a [`Dataset`]
pub trait DatasetRecord: Record {
    fn sequence(dataset: &Dataset) -> &Vec<Self>;
    fn sequence_mut(dataset: &mut Dataset) -> &mut Vec<Self>;
}

impl DatasetRecord for Film {
    fn sequence(dataset: &Dataset) -> &Vec<Self> {
        &dataset.films
    }

    fn sequence_mut(dataset: &mut Dataset) -> &mut Vec<Self> {
        &mut dataset.films
    }
}

impl DatasetRecord for Session {
    fn sequence(dataset: &Dataset) -> &Vec<Self> {
        &dataset.sessions
    }

    fn sequence_mut(dataset: &mut Dataset) -> &mut Vec<Self> {
        &mut dataset.sessions
    }
}

impl DatasetRecord for Ticket {
    fn sequence(dataset: &Dataset) -> &Vec<Self> {
        &dataset.tickets
    }

    fn sequence_mut(dataset: &mut Dataset) -> &mut Vec<Self> {
        &mut dataset.tickets
    }
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records of kind `R`, in insertion order
    pub fn list_all<R: DatasetRecord>(&self) -> &[R] {
        R::sequence(self)
    }

    pub fn films(&self) -> &[Film] {
        &self.films
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn append<R: DatasetRecord>(&mut self, record: R) {
        R::sequence_mut(self).push(record);
    }

    /// Replace every record of kind `R`. The new sequence is built before it
    /// is swapped in, so its length always equals `records.len()`.
    pub fn replace_all<R: DatasetRecord>(&mut self, records: Vec<R>) {
        *R::sequence_mut(self) = records;
    }

    pub fn update_at<R: DatasetRecord>(&mut self, index: usize, record: R) -> Result<(), DatasetError> {
        let sequence = R::sequence_mut(self);
        let len = sequence.len();
        let slot = sequence.get_mut(index).ok_or(DatasetError::IndexOutOfRange {
            kind: R::KIND,
            index,
            len,
        })?;
        *slot = record;
        Ok(())
    }

    pub fn remove_at<R: DatasetRecord>(&mut self, index: usize) -> Result<R, DatasetError> {
        let sequence = R::sequence_mut(self);
        if index >= sequence.len() {
            return Err(DatasetError::IndexOutOfRange {
                kind: R::KIND,
                index,
                len: sequence.len(),
            });
        }
        Ok(sequence.remove(index))
    }

    pub fn count(&self, kind: RecordKind) -> usize {
        match kind {
            RecordKind::Film => self.films.len(),
            RecordKind::Session => self.sessions.len(),
            RecordKind::Ticket => self.tickets.len(),
        }
    }

    pub fn counts(&self) -> RecordCounts {
        RecordCounts {
            films: self.films.len(),
            sessions: self.sessions.len(),
            tickets: self.tickets.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts().total() == 0
    }

    pub fn sold_tickets(&self) -> usize {
        self.tickets.iter().filter(|t| t.is_sold()).count()
    }

    pub fn reserved_tickets(&self) -> usize {
        self.tickets.iter().filter(|t| t.is_reserved()).count()
    }
}
