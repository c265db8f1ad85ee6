//! Self-contained HTML report with one table per record kind

use chrono::{DateTime, Utc};
use quick_xml::escape::escape;

use super::format_timestamp;
use crate::dataset::Dataset;
use crate::models::Record;

const STYLE: &str = "body{font-family:Arial, sans-serif;padding:20px;}\
table{border-collapse:collapse;width:100%}\
th,td{border:1px solid #ddd;padding:8px}";

pub fn render_html(dataset: &Dataset, generated_at: DateTime<Utc>) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n");
    out.push_str("<html lang=\"en\"><head><meta charset=\"utf-8\"><title>Cinema Films Report</title>\n");
    out.push_str(&format!("<style>{STYLE}</style>\n"));
    out.push_str("</head><body>\n");
    out.push_str("<h1>Cinema Films Report</h1>\n");
    out.push_str(&format!("<p>Generated: {}</p>\n", format_timestamp(&generated_at)));

    write_table(
        &mut out,
        "Films",
        &["Title", "Director", "Year", "Genre", "Duration"],
        dataset.films(),
    );
    write_table(
        &mut out,
        "Sessions",
        &["Film", "Date", "Time", "Hall", "Price"],
        dataset.sessions(),
    );
    write_table(
        &mut out,
        "Tickets",
        &["Session", "Seat", "Status", "Sale time"],
        dataset.tickets(),
    );

    out.push_str("</body></html>\n");
    out
}

fn write_table<R: Record>(out: &mut String, heading: &str, columns: &[&str], records: &[R]) {
    out.push_str(&format!("<h2>{heading}</h2>\n<table><tr>"));
    for column in columns {
        out.push_str(&format!("<th>{column}</th>"));
    }
    out.push_str("</tr>\n");

    for record in records {
        out.push_str("<tr>");
        for value in record.field_values() {
            out.push_str(&format!("<td>{}</td>", escape(value.as_str())));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Film, Session, Ticket, TicketStatus};
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 12, 15, 18, 0, 0).unwrap()
    }

    #[test]
    fn test_tables_in_fixed_order() {
        let mut dataset = Dataset::new();
        dataset.append(Ticket::new("Heat 18:00", "A1", TicketStatus::Free, None));
        dataset.append(Session::new("Heat", "15.12.2025", "18:00", "Hall 1", "350"));
        dataset.append(Film::new("Heat", "Michael Mann", "1995", "Crime", "170 min"));

        let html = render_html(&dataset, at());
        let films = html.find("<h2>Films</h2>").unwrap();
        let sessions = html.find("<h2>Sessions</h2>").unwrap();
        let tickets = html.find("<h2>Tickets</h2>").unwrap();
        assert!(films < sessions && sessions < tickets);

        assert!(html.contains("<p>Generated: 2025-12-15 18:00:00 UTC</p>"));
        assert!(html.contains("<td>Michael Mann</td>"));
        assert!(html.contains("<td>-</td>"));
    }

    #[test]
    fn test_values_are_escaped() {
        let mut dataset = Dataset::new();
        dataset.append(Film::new("<script>alert('x')</script>", "A & B", "", "", ""));

        let html = render_html(&dataset, at());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("<td>A &amp; B</td>"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let mut dataset = Dataset::new();
        dataset.append(Film::new("Heat", "Michael Mann", "1995", "Crime", "170 min"));
        assert_eq!(render_html(&dataset, at()), render_html(&dataset, at()));
    }

    #[test]
    fn test_empty_dataset_has_header_rows_only() {
        let html = render_html(&Dataset::new(), at());
        assert_eq!(html.matches("<table>").count(), 3);
        assert!(!html.contains("<td>"));
    }
}
