//! Shared streaming XML walker for the ISO 20022 readers: tracks the
//! element path stack and calls back into a [`XmlElementHandler`], the way
//! each concrete reader (`camt053_reader`, `pain001_reader`, `pain002_reader`)
//! wants to react only to the paths it cares about. Built directly on
//! `quick_xml`'s pull-event reader rather than a DOM tree, since the engine
//! never needs to hold more than the current path and a handful of
//! in-progress scratch values in memory.

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::{ParseError, Result};

/// One element's local name (namespace prefix, if any, is stripped) plus its
/// attribute list, as seen by `handle_start`.
pub struct StartElement<'a> {
    pub name: &'a str,
    pub attributes: Vec<(String, String)>,
}

pub trait XmlElementHandler {
    fn handle_start(&mut self, path: &[String], element: &StartElement<'_>) -> Result<()>;
    fn handle_end(&mut self, path: &[String]) -> Result<()>;
    fn handle_text(&mut self, path: &[String], text: &str) -> Result<()>;
}

/// Drives `handler` over every start/end/text event in `xml`, maintaining
/// the element path stack. Mixed content (text interleaved with child
/// elements) is reported once per contiguous text run; callers that need
/// the local name of the element currently open should look at `path.last()`.
pub fn walk(xml: &str, handler: &mut dyn XmlElementHandler) -> Result<()> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader
            .read_event_into(&mut buf)
            .map_err(|e| ParseError::Lex(format!("xml parse error: {e}")))?
        {
            Event::Start(start) => {
                let name = local_name(start.name().as_ref());
                let mut attributes = Vec::new();
                for attr in start.attributes() {
                    let attr = attr.map_err(|e| {
                        ParseError::Lex(format!("xml attribute error: {e}"))
                    })?;
                    let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
                    let value = attr
                        .decode_and_unescape_value(reader.decoder())
                        .map_err(|e| ParseError::Lex(format!("xml attribute value error: {e}")))?
                        .to_string();
                    attributes.push((key, value));
                }
                path.push(name);
                let element = StartElement {
                    name: path.last().unwrap(),
                    attributes,
                };
                handler.handle_start(&path, &element)?;
            }
            Event::Empty(start) => {
                let name = local_name(start.name().as_ref());
                let mut attributes = Vec::new();
                for attr in start.attributes() {
                    let attr = attr.map_err(|e| {
                        ParseError::Lex(format!("xml attribute error: {e}"))
                    })?;
                    let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
                    let value = attr
                        .decode_and_unescape_value(reader.decoder())
                        .map_err(|e| ParseError::Lex(format!("xml attribute value error: {e}")))?
                        .to_string();
                    attributes.push((key, value));
                }
                path.push(name);
                let element = StartElement {
                    name: path.last().unwrap(),
                    attributes,
                };
                handler.handle_start(&path, &element)?;
                handler.handle_end(&path)?;
                path.pop();
            }
            Event::Text(text) => {
                let decoded = text
                    .decode()
                    .map_err(|e| ParseError::Lex(format!("xml text decode error: {e}")))?;
                if !decoded.trim().is_empty() {
                    handler.handle_text(&path, decoded.trim())?;
                }
            }
            Event::End(_) => {
                handler.handle_end(&path)?;
                path.pop();
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn local_name(qualified: &[u8]) -> String {
    let raw = String::from_utf8_lossy(qualified);
    match raw.find(':') {
        Some(idx) => raw[idx + 1..].to_string(),
        None => raw.to_string(),
    }
}

/// True when `path`'s tail matches `suffix` exactly.
pub fn path_ends_with(path: &[String], suffix: &[&str]) -> bool {
    if path.len() < suffix.len() {
        return false;
    }
    let offset = path.len() - suffix.len();
    path[offset..].iter().zip(suffix).all(|(a, b)| a == b)
}
