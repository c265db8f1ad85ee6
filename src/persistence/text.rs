//! Delimited-text snapshot codec
//!
//! ```text
//! === FILMS ===
//! Heat|Michael Mann|1995|Crime|170 min|
//!
//! === SESSIONS ===
//! Heat|15.12.2025|18:00|Hall 1|350|
//!
//! === TICKETS ===
//! Heat 18:00|A1|Sold|14:30|
//! ```
//!
//! Fields are not escaped. A value containing `|` or a line break corrupts
//! the record boundary. Every record line carries at least one `|`, so a
//! header is a `===` line without one.

use tracing::{debug, warn};

use crate::dataset::{Dataset, DatasetRecord};
use crate::models::{Film, Record, RecordKind, Session, Ticket};

pub const DELIMITER: char = '|';
const HEADER_MARKER: &str = "===";

/// Result of decoding a text snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextDecoded {
    pub dataset: Dataset,
    /// Record lines dropped for having too few fields
    pub skipped_lines: usize,
}

pub fn encode(dataset: &Dataset) -> String {
    let mut out = String::new();
    write_section(&mut out, dataset.films());
    out.push('\n');
    write_section(&mut out, dataset.sessions());
    out.push('\n');
    write_section(&mut out, dataset.tickets());
    out
}

fn write_section<R: Record>(out: &mut String, records: &[R]) {
    out.push_str(&format!(
        "{HEADER_MARKER} {} {HEADER_MARKER}\n",
        R::KIND.section_name()
    ));
    for record in records {
        for value in record.field_values() {
            out.push_str(&value);
            out.push(DELIMITER);
        }
        out.push('\n');
    }
}

/// Decode a text snapshot. Never fails: lines before the first header and
/// lines under unknown headers are ignored, short record lines are dropped
/// and counted.
pub fn decode(content: &str) -> TextDecoded {
    let mut decoded = TextDecoded::default();
    let mut films = Vec::new();
    let mut sessions = Vec::new();
    let mut tickets = Vec::new();
    let mut section: Option<RecordKind> = None;

    for (line_no, line) in content.lines().enumerate() {
        if is_header(line) {
            section = section_kind(line);
            if section.is_none() {
                debug!("Ignoring unknown text snapshot section: {}", line);
            }
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }
        let Some(kind) = section else {
            continue;
        };

        let body = line.strip_suffix(DELIMITER).unwrap_or(line);
        let values: Vec<&str> = body.split(DELIMITER).collect();
        let accepted = match kind {
            RecordKind::Film => accept::<Film>(&values, &mut films),
            RecordKind::Session => accept::<Session>(&values, &mut sessions),
            RecordKind::Ticket => accept::<Ticket>(&values, &mut tickets),
        };
        if !accepted {
            warn!(
                "Dropping {} line {}: expected at least {} fields, found {}",
                kind,
                line_no + 1,
                field_count(kind),
                values.len()
            );
            decoded.skipped_lines += 1;
        }
    }

    decoded.dataset.replace_all(films);
    decoded.dataset.replace_all(sessions);
    decoded.dataset.replace_all(tickets);
    decoded
}

fn accept<R: DatasetRecord>(values: &[&str], into: &mut Vec<R>) -> bool {
    match R::from_field_values(values) {
        Some(record) => {
            into.push(record);
            true
        }
        None => false,
    }
}

fn field_count(kind: RecordKind) -> usize {
    match kind {
        RecordKind::Film => Film::FIELDS.len(),
        RecordKind::Session => Session::FIELDS.len(),
        RecordKind::Ticket => Ticket::FIELDS.len(),
    }
}

fn is_header(line: &str) -> bool {
    line.starts_with(HEADER_MARKER) && !line.contains(DELIMITER)
}

/// Section headers are matched by name containment. The legacy Russian
/// section names are accepted so older snapshots still load.
fn section_kind(header: &str) -> Option<RecordKind> {
    if header.contains("FILMS") || header.contains("ФИЛЬМЫ") {
        Some(RecordKind::Film)
    } else if header.contains("SESSIONS") || header.contains("СЕАНСЫ") {
        Some(RecordKind::Session)
    } else if header.contains("TICKETS") || header.contains("БИЛЕТЫ") {
        Some(RecordKind::Ticket)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RecordCounts, TicketStatus};
    use rstest::rstest;

    #[test]
    fn test_encode_layout() {
        let mut dataset = Dataset::new();
        dataset.append(Film::new("Heat", "Michael Mann", "1995", "Crime", "170 min"));
        dataset.append(Ticket::new("Heat 18:00", "A1", TicketStatus::Free, None));

        let text = encode(&dataset);
        assert_eq!(
            text,
            "=== FILMS ===\n\
             Heat|Michael Mann|1995|Crime|170 min|\n\
             \n\
             === SESSIONS ===\n\
             \n\
             === TICKETS ===\n\
             Heat 18:00|A1|Free|-|\n"
        );
    }

    #[test]
    fn test_short_line_is_dropped() {
        let content = "=== FILMS ===\nHeat|Michael Mann|1995|Crime|170 min|\nAlien|Ridley Scott|\n";
        let decoded = decode(content);
        assert_eq!(decoded.dataset.films().len(), 1);
        assert_eq!(decoded.dataset.films()[0].title, "Heat");
        assert_eq!(decoded.skipped_lines, 1);
    }

    #[test]
    fn test_lines_before_first_header_are_ignored() {
        let content = "cinema export\nHeat|Michael Mann|1995|Crime|170 min|\n=== TICKETS ===\nHeat 18:00|A1|Sold|14:30|\n";
        let decoded = decode(content);
        assert_eq!(decoded.dataset.counts(), RecordCounts { films: 0, sessions: 0, tickets: 1 });
        assert_eq!(decoded.skipped_lines, 0);
    }

    #[test]
    fn test_trailing_delimiter_is_optional() {
        let decoded = decode("=== SESSIONS ===\nHeat|15.12.2025|18:00|Hall 1|350\n");
        assert_eq!(decoded.dataset.sessions()[0].price, "350");
    }

    #[test]
    fn test_empty_trailing_fields_survive() {
        let mut dataset = Dataset::new();
        dataset.append(Film::new("Heat", "", "", "", ""));
        let decoded = decode(&encode(&dataset));
        assert_eq!(decoded.dataset, dataset);
    }

    #[test]
    fn test_record_starting_with_header_marker_round_trips() {
        let mut dataset = Dataset::new();
        dataset.append(Film::new("=== Sequel ===", "Director", "2001", "Drama", "90 min"));
        dataset.append(Film::new("=== SESSIONS ===", "Director", "2002", "Drama", "95 min"));
        dataset.append(Session::new("=== Sequel ===", "01.01.2026", "10:00", "Hall 1", "350"));

        let decoded = decode(&encode(&dataset));
        assert_eq!(decoded.skipped_lines, 0);
        assert_eq!(decoded.dataset, dataset);
    }

    #[rstest]
    #[case("=== FILMS ===", true)]
    #[case("=== Sequel ===|Director|2001|Drama|90 min|", false)]
    #[case("Heat|Michael Mann|1995|Crime|170 min|", false)]
    fn test_header_detection(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(is_header(line), expected);
    }

    #[rstest]
    #[case("=== FILMS ===", Some(RecordKind::Film))]
    #[case("=== ФИЛЬМЫ ===", Some(RecordKind::Film))]
    #[case("=== СЕАНСЫ ===", Some(RecordKind::Session))]
    #[case("=== TICKETS ===", Some(RecordKind::Ticket))]
    #[case("=== БИЛЕТЫ ===", Some(RecordKind::Ticket))]
    #[case("=== HALLS ===", None)]
    fn test_section_headers(#[case] header: &str, #[case] expected: Option<RecordKind>) {
        assert_eq!(section_kind(header), expected);
    }
}
