//! Single-page printable report as a minimal PDF 1.4 document
//!
//! Text is drawn with the built-in Helvetica fonts, so only Latin-1 is
//! representable. Other characters are replaced with `?`.

use chrono::{DateTime, Utc};

use super::{Pricing, ReportStats, format_timestamp};
use crate::dataset::Dataset;

/// Maximum films and sessions listed
const LISTED_ITEMS: usize = 5;

const REGULAR: &str = "F1";
const BOLD: &str = "F2";

/// Accumulates content stream text operators
struct ContentStream {
    ops: String,
}

impl ContentStream {
    fn new() -> Self {
        Self {
            ops: String::from("BT\n"),
        }
    }

    fn font(&mut self, font: &str, size: u32) {
        self.ops.push_str(&format!("/{font} {size} Tf\n"));
    }

    fn move_to(&mut self, x: i32, y: i32) {
        self.ops.push_str(&format!("{x} {y} Td\n"));
    }

    fn text(&mut self, text: &str) {
        self.ops.push_str(&format!("({}) Tj\n", escape_text(text)));
    }

    /// Draw a line, then move down by `advance`
    fn line(&mut self, text: &str, advance: i32) {
        self.text(text);
        self.move_to(0, -advance);
    }

    fn finish(mut self) -> String {
        self.ops.push_str("ET");
        self.ops
    }
}

pub fn render_printable(dataset: &Dataset, generated_at: DateTime<Utc>, pricing: &Pricing) -> Vec<u8> {
    let stats = ReportStats::of(dataset);
    let mut content = ContentStream::new();

    content.font(BOLD, 28);
    content.move_to(50, 750);
    content.line("CINEMA MANAGEMENT REPORT", 40);
    content.font(REGULAR, 12);
    content.line("Cinema Administration System", 40);

    content.font(BOLD, 16);
    content.line("CINEMA STATISTICS", 30);
    content.font(REGULAR, 11);
    content.line(&format!("Total Films in Database: {}", stats.films), 15);
    content.line(&format!("Total Sessions Scheduled: {}", stats.sessions), 15);
    content.line(&format!("Total Tickets Available: {}", stats.tickets), 15);
    content.line(&format!("Tickets Sold: {}", stats.sold), 30);
    content.line(&format!("Estimated Income: {}", pricing.amount(stats.sold)), 40);

    content.font(BOLD, 16);
    content.line("FEATURED FILMS", 25);
    content.font(REGULAR, 10);
    for film in dataset.films().iter().take(LISTED_ITEMS) {
        content.line(&film.title, 12);
    }

    content.font(BOLD, 16);
    content.line("UPCOMING SESSIONS", 25);
    content.font(REGULAR, 10);
    for session in dataset.sessions().iter().take(LISTED_ITEMS) {
        content.line(&session.summary(), 12);
    }

    content.font(BOLD, 14);
    content.line("FINANCIAL SUMMARY", 25);
    content.font(REGULAR, 11);
    content.line(&format!("Current Revenue: {}", pricing.amount(stats.sold)), 15);
    content.line(
        &format!("Potential Revenue: {}", pricing.amount(stats.committed())),
        30,
    );
    content.font(REGULAR, 9);
    content.text(&format!(
        "Report generated automatically {}",
        format_timestamp(&generated_at)
    ));

    assemble(&latin1(&content.finish()))
}

/// Lay out the fixed object graph around `stream` and append a
/// cross-reference table with real byte offsets.
fn assemble(stream: &[u8]) -> Vec<u8> {
    let mut content_object = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
    content_object.extend_from_slice(stream);
    content_object.extend_from_slice(b"\nendstream");

    let objects: Vec<Vec<u8>> = vec![
        b"<< /Type /Catalog /Pages 2 0 R >>".to_vec(),
        b"<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_vec(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R \
             /Resources << /Font << /{REGULAR} 5 0 R /{BOLD} 6 0 R >> >> >>"
        )
        .into_bytes(),
        content_object,
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_vec(),
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold >>".to_vec(),
    ];

    let mut out = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", i + 1).as_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_offset = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );
    out
}

/// Escape a string literal for a `Tj` operator. Line breaks become spaces.
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '(' | ')' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\n' | '\r' => escaped.push(' '),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}
