//! Record types held by the [`Dataset`](crate::dataset::Dataset)
//!
//! Every field is opaque text: years, prices and durations are never parsed.
//! Sessions reference films, and tickets reference sessions, by display name
//! only. Renaming a film therefore orphans its sessions and tickets.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod film;
pub mod session;
pub mod ticket;

pub use film::Film;
pub use session::Session;
pub use ticket::{Ticket, TicketStatus};

/// The three record kinds a dataset holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Film,
    Session,
    Ticket,
}

impl RecordKind {
    /// All kinds in snapshot and report order
    pub const ALL: [RecordKind; 3] = [RecordKind::Film, RecordKind::Session, RecordKind::Ticket];

    /// Element name of a single record in markup snapshots
    pub fn element_name(self) -> &'static str {
        match self {
            RecordKind::Film => "film",
            RecordKind::Session => "session",
            RecordKind::Ticket => "ticket",
        }
    }

    /// Element name of the record list in markup snapshots
    pub fn list_name(self) -> &'static str {
        match self {
            RecordKind::Film => "films",
            RecordKind::Session => "sessions",
            RecordKind::Ticket => "tickets",
        }
    }

    /// Section name used by text snapshot headers
    pub fn section_name(self) -> &'static str {
        match self {
            RecordKind::Film => "FILMS",
            RecordKind::Session => "SESSIONS",
            RecordKind::Ticket => "TICKETS",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_name())
    }
}

/// A flat record with a fixed, ordered set of text fields.
///
/// Both snapshot codecs are written once against this trait: the markup codec
/// uses [`Record::FIELDS`] as attribute names, and the text codec uses its
/// length as the minimum field count of an accepted line.
pub trait Record: Clone + fmt::Debug + Send + Sync + 'static {
    const KIND: RecordKind;

    /// Field names in wire order
    const FIELDS: &'static [&'static str];

    /// Field values in the same order as [`Record::FIELDS`]
    fn field_values(&self) -> Vec<String>;

    /// Build a record from wire values. Returns `None` when fewer than
    /// `FIELDS.len()` values are supplied; extra values are ignored.
    fn from_field_values(values: &[&str]) -> Option<Self>;
}

/// Per-kind record counts, returned by imports and used by reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordCounts {
    pub films: usize,
    pub sessions: usize,
    pub tickets: usize,
}

impl RecordCounts {
    pub fn total(&self) -> usize {
        self.films + self.sessions + self.tickets
    }
}

impl fmt::Display for RecordCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "films={} sessions={} tickets={}",
            self.films, self.sessions, self.tickets
        )
    }
}
