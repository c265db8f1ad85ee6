use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Record, RecordKind};

/// On-disk marker for a ticket that has not been sold
pub const NO_SALE_TIME: &str = "-";

/// Ticket status. Imported labels outside the three known values are kept
/// verbatim in `Other` so they round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketStatus {
    Free,
    Sold,
    Reserved,
    Other(String),
}

impl TicketStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TicketStatus::Free => "Free",
            TicketStatus::Sold => "Sold",
            TicketStatus::Reserved => "Reserved",
            TicketStatus::Other(label) => label,
        }
    }
}

impl From<&str> for TicketStatus {
    fn from(label: &str) -> Self {
        match label {
            "Free" => TicketStatus::Free,
            "Sold" => TicketStatus::Sold,
            "Reserved" => TicketStatus::Reserved,
            other => TicketStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Display key of the session ("film title time")
    pub session_key: String,
    pub seat: String,
    pub status: TicketStatus,
    pub sale_time: Option<String>,
}

impl Ticket {
    pub fn new(
        session_key: impl Into<String>,
        seat: impl Into<String>,
        status: TicketStatus,
        sale_time: Option<String>,
    ) -> Self {
        Self {
            session_key: session_key.into(),
            seat: seat.into(),
            status,
            sale_time,
        }
    }

    pub fn is_sold(&self) -> bool {
        self.status == TicketStatus::Sold
    }

    pub fn is_reserved(&self) -> bool {
        self.status == TicketStatus::Reserved
    }

    pub fn sale_time_label(&self) -> &str {
        self.sale_time.as_deref().unwrap_or(NO_SALE_TIME)
    }
}

impl Record for Ticket {
    const KIND: RecordKind = RecordKind::Ticket;
    const FIELDS: &'static [&'static str] = &["session", "seat", "status", "saleTime"];

    fn field_values(&self) -> Vec<String> {
        vec![
            self.session_key.clone(),
            self.seat.clone(),
            self.status.as_str().to_string(),
            self.sale_time_label().to_string(),
        ]
    }

    fn from_field_values(values: &[&str]) -> Option<Self> {
        match values {
            [session, seat, status, sale_time, ..] => {
                let sale_time = (*sale_time != NO_SALE_TIME).then(|| sale_time.to_string());
                Some(Self::new(*session, *seat, TicketStatus::from(*status), sale_time))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sale_time_sentinel() {
        let ticket = Ticket::from_field_values(&["Heat 18:00", "A1", "Free", "-"]).unwrap();
        assert_eq!(ticket.sale_time, None);
        assert_eq!(ticket.field_values()[3], "-");

        let ticket = Ticket::from_field_values(&["Heat 18:00", "A2", "Sold", "14:30"]).unwrap();
        assert_eq!(ticket.sale_time.as_deref(), Some("14:30"));
        assert!(ticket.is_sold());
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let ticket = Ticket::from_field_values(&["Heat 18:00", "A3", "Продан", "-"]).unwrap();
        assert_eq!(ticket.status, TicketStatus::Other("Продан".to_string()));
        assert_eq!(ticket.field_values()[2], "Продан");
        assert!(!ticket.is_sold());
    }
}
