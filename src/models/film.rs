use serde::{Deserialize, Serialize};

use super::{Record, RecordKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Film {
    pub title: String,
    pub director: String,
    pub year: String,
    pub genre: String,
    pub duration: String,
}

impl Film {
    pub fn new(
        title: impl Into<String>,
        director: impl Into<String>,
        year: impl Into<String>,
        genre: impl Into<String>,
        duration: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            director: director.into(),
            year: year.into(),
            genre: genre.into(),
            duration: duration.into(),
        }
    }

    /// Append `suffix` to the title unless it already ends with it.
    /// Returns true when the title changed.
    pub fn mark_title(&mut self, suffix: &str) -> bool {
        if self.title.ends_with(suffix) {
            return false;
        }
        self.title.push_str(suffix);
        true
    }
}

impl Record for Film {
    const KIND: RecordKind = RecordKind::Film;
    const FIELDS: &'static [&'static str] = &["title", "director", "year", "genre", "duration"];

    fn field_values(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.director.clone(),
            self.year.clone(),
            self.genre.clone(),
            self.duration.clone(),
        ]
    }

    fn from_field_values(values: &[&str]) -> Option<Self> {
        match values {
            [title, director, year, genre, duration, ..] => {
                Some(Self::new(*title, *director, *year, *genre, *duration))
            }
            _ => None,
        }
    }
}
