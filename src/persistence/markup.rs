//! Quick-XML based markup snapshot codec
//!
//! One document per record kind:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8" standalone="no"?>
//! <cinema>
//!     <films>
//!         <film title="Heat" director="Michael Mann" year="1995" genre="Crime" duration="170 min"/>
//!     </films>
//! </cinema>
//! ```
//!
//! Record elements are collected wherever they appear in the document, and
//! missing attributes read as empty strings.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::path::Path;

use crate::errors::{CodecError, CodecResult};
use crate::models::Record;

pub const ROOT_ELEMENT: &str = "cinema";

/// Render `records` as a complete markup document
pub fn encode<R: Record>(records: &[R]) -> std::io::Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
    let list = R::KIND.list_name();

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))))
        .map_err(std::io::Error::other)?;
    writer
        .write_event(Event::Start(BytesStart::new(ROOT_ELEMENT)))
        .map_err(std::io::Error::other)?;
    writer
        .write_event(Event::Start(BytesStart::new(list)))
        .map_err(std::io::Error::other)?;

    for record in records {
        let mut element = BytesStart::new(R::KIND.element_name());
        for (name, value) in R::FIELDS.iter().zip(record.field_values()) {
            element.push_attribute((*name, value.as_str()));
        }
        writer
            .write_event(Event::Empty(element))
            .map_err(std::io::Error::other)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(list)))
        .map_err(std::io::Error::other)?;
    writer
        .write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))
        .map_err(std::io::Error::other)?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).map_err(std::io::Error::other)
}

/// Parse a markup document into records of kind `R`. `path` is only used
/// for error context.
pub fn decode<R: Record>(content: &str, path: &Path) -> CodecResult<Vec<R>> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let element_name = R::KIND.element_name().as_bytes();
    let mut records = Vec::new();
    let mut depth = 0usize;
    let mut saw_root = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                if e.name().as_ref() == element_name {
                    records.push(parse_record::<R>(e, path)?);
                }
                saw_root = true;
                depth += 1;
            }
            Ok(Event::Empty(ref e)) => {
                if e.name().as_ref() == element_name {
                    records.push(parse_record::<R>(e, path)?);
                }
                saw_root = true;
            }
            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(CodecError::parse(
                    path,
                    format!("XML parsing error at byte {}: {e}", reader.error_position()),
                ));
            }
            _ => {} // Declarations, comments, text between elements
        }
    }

    if !saw_root {
        return Err(CodecError::parse(path, "document has no root element"));
    }
    if depth != 0 {
        return Err(CodecError::parse(
            path,
            format!("unexpected end of document with {depth} unclosed element(s)"),
        ));
    }

    Ok(records)
}

fn parse_record<R: Record>(element: &BytesStart<'_>, path: &Path) -> CodecResult<R> {
    let mut values = vec![String::new(); R::FIELDS.len()];

    for attr in element.attributes() {
        let attr = attr.map_err(|e| CodecError::parse(path, format!("invalid attribute: {e}")))?;
        let Some(index) = R::FIELDS
            .iter()
            .position(|field| field.as_bytes() == attr.key.as_ref())
        else {
            continue;
        };
        values[index] = attr
            .unescape_value()
            .map_err(|e| CodecError::parse(path, format!("invalid attribute value: {e}")))?
            .into_owned();
    }

    let values: Vec<&str> = values.iter().map(String::as_str).collect();
    R::from_field_values(&values).ok_or_else(|| {
        CodecError::parse(
            path,
            format!("{} element is missing fields", R::KIND.element_name()),
        )
    })
}
