use serde::{Deserialize, Serialize};

use super::{Record, RecordKind};

/// A screening of a film, referenced by the film's display title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub film_title: String,
    pub date: String,
    pub time: String,
    pub hall: String,
    pub price: String,
}

impl Session {
    pub fn new(
        film_title: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
        hall: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            film_title: film_title.into(),
            date: date.into(),
            time: time.into(),
            hall: hall.into(),
            price: price.into(),
        }
    }

    /// Display key tickets use to refer to this session
    pub fn ticket_key(&self) -> String {
        format!("{} {}", self.film_title, self.time)
    }

    /// One-line summary used by the printable report
    pub fn summary(&self) -> String {
        format!("{} - {} {}", self.film_title, self.date, self.time)
    }
}

impl Record for Session {
    const KIND: RecordKind = RecordKind::Session;
    const FIELDS: &'static [&'static str] = &["film", "date", "time", "hall", "price"];

    fn field_values(&self) -> Vec<String> {
        vec![
            self.film_title.clone(),
            self.date.clone(),
            self.time.clone(),
            self.hall.clone(),
            self.price.clone(),
        ]
    }

    fn from_field_values(values: &[&str]) -> Option<Self> {
        match values {
            [film, date, time, hall, price, ..] => {
                Some(Self::new(*film, *date, *time, *hall, *price))
            }
            _ => None,
        }
    }
}
