//! Streaming reader that turns repeated XML elements into flat record structs.
//!
//! All three configuration documents (licenses, providers, notices) share one shape: a root
//! element holding repeated records, each with attributes, simple child elements, and maybe
//! direct text. One event loop collects them; the typed loaders map records to entries.

use crate::error::LoadError;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::io::BufRead;

#[derive(Clone, Debug, Default)]
pub(crate) struct XmlRecord {
    /// Byte offset of the record's start tag, for log messages.
    pub position: u64,
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order; repeated tags are kept.
    pub fields: Vec<(String, String)>,
    /// Text directly inside the record element.
    pub text: String,
}

impl XmlRecord {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// First non-empty child element named `name`.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields_named(name).find(|v| !v.is_empty())
    }

    pub fn fields_named<'a, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a str> + use<'a, 'n> {
        self.fields
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v.trim())
    }
}

pub(crate) fn read_records<R: BufRead>(
    reader: R,
    record_tag: &str,
) -> Result<Vec<XmlRecord>, LoadError> {
    let mut xml = Reader::from_reader(reader);
    xml.config_mut().trim_text(true);

    let mut out = Vec::new();
    let mut buf = Vec::new();
    let mut current: Option<XmlRecord> = None;
    let mut depth = 0usize;
    let mut child: Option<(String, String)> = None;

    loop {
        let position = xml.buffer_position() as u64;
        let event = xml
            .read_event_into(&mut buf)
            .map_err(|source| LoadError::Xml { position, source })?;

        match event {
            Event::Start(e) => {
                let name = tag_name(&e);
                if current.is_some() {
                    depth += 1;
                    if depth == 1 {
                        child = Some((name, String::new()));
                    }
                } else if name == record_tag {
                    current = Some(XmlRecord {
                        position,
                        attributes: attributes(&e, position)?,
                        ..XmlRecord::default()
                    });
                    depth = 0;
                }
            }
            Event::Empty(e) => {
                let name = tag_name(&e);
                if let Some(record) = current.as_mut() {
                    if depth == 0 {
                        record.fields.push((name, String::new()));
                    }
                } else if name == record_tag {
                    out.push(XmlRecord {
                        position,
                        attributes: attributes(&e, position)?,
                        ..XmlRecord::default()
                    });
                }
            }
            Event::Text(t) => {
                if current.is_some() {
                    let text = t
                        .unescape()
                        .map_err(|source| LoadError::Xml { position, source })?;
                    append_text(current.as_mut(), child.as_mut(), depth, &text);
                }
            }
            Event::CData(c) => {
                if current.is_some() {
                    let text = String::from_utf8_lossy(&c).into_owned();
                    append_text(current.as_mut(), child.as_mut(), depth, &text);
                }
            }
            Event::End(_) => {
                if current.is_some() {
                    if depth == 0 {
                        out.extend(current.take());
                    } else {
                        if depth == 1
                            && let (Some(record), Some(field)) = (current.as_mut(), child.take())
                        {
                            record.fields.push(field);
                        }
                        depth -= 1;
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

fn append_text(
    record: Option<&mut XmlRecord>,
    child: Option<&mut (String, String)>,
    depth: usize,
    text: &str,
) {
    let target = match (depth, record, child) {
        (0, Some(record), _) => &mut record.text,
        (_, _, Some((_, value))) => value,
        _ => return,
    };
    if !target.is_empty() {
        target.push('\n');
    }
    target.push_str(text);
}

fn tag_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn attributes(e: &BytesStart<'_>, position: u64) -> Result<Vec<(String, String)>, LoadError> {
    let mut out = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| LoadError::Xml {
            position,
            source: e.into(),
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|source| LoadError::Xml { position, source })?
            .into_owned();
        out.push((key, value));
    }
    Ok(out)
}
