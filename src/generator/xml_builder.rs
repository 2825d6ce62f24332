//! Shared streaming element builder behind the `camt053_writer`/
//! `pain001_writer`/`pain002_writer` generators. Wraps `quick_xml::Writer`
//! the way the event-driven readers wrap `quick_xml::Reader`: a thin
//! sequential API (`open`/`attr`/`text`/`close`) over the library's
//! start/end/text event writer, tracking the open-element stack itself so a
//! caller that matches every `open` with a `close` is guaranteed balanced
//! output — `finish` rejects anything left open.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;

use crate::error::{ParseError, Result};

pub struct XmlBuilder {
    writer: Writer<Vec<u8>>,
    stack: Vec<String>,
}

impl XmlBuilder {
    pub fn new() -> Self {
        XmlBuilder {
            writer: Writer::new(Vec::new()),
            stack: Vec::new(),
        }
    }

    pub fn write_declaration(&mut self) -> Result<&mut Self> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_write_error)?;
        Ok(self)
    }

    /// Opens `name`, pushing it onto the balance-tracking stack. Attributes
    /// for this element must be added via [`Self::attr`] before any call to
    /// `open`/`text`/`close` for a different element.
    pub fn open(&mut self, name: &str) -> Result<&mut Self> {
        self.open_with_attrs(name, &[])
    }

    pub fn open_with_attrs(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<&mut Self> {
        let mut start = BytesStart::new(name);
        for (key, value) in attrs {
            start.push_attribute((*key, *value));
        }
        self.writer.write_event(Event::Start(start)).map_err(xml_write_error)?;
        self.stack.push(name.to_string());
        Ok(self)
    }

    pub fn text(&mut self, value: &str) -> Result<&mut Self> {
        self.writer
            .write_event(Event::Text(BytesText::new(value)))
            .map_err(xml_write_error)?;
        Ok(self)
    }

    /// Convenience for a leaf element: `open(name)`, `text(value)`, `close()`.
    pub fn leaf(&mut self, name: &str, value: &str) -> Result<&mut Self> {
        self.open(name)?;
        self.text(value)?;
        self.close()
    }

    pub fn close(&mut self) -> Result<&mut Self> {
        let name = self
            .stack
            .pop()
            .ok_or_else(|| ParseError::Inconsistency("xml builder: close() with no open element".into()))?;
        self.writer
            .write_event(Event::End(BytesEnd::new(&name)))
            .map_err(xml_write_error)?;
        Ok(self)
    }

    /// Finalises the document, erroring if any `open` was never matched by a
    /// `close`, and returns the rendered UTF-8 XML text.
    pub fn finish(self) -> Result<String> {
        if !self.stack.is_empty() {
            return Err(ParseError::Inconsistency(format!(
                "xml builder: unclosed elements remain: {}",
                self.stack.join(" > ")
            )));
        }
        let bytes = self.writer.into_inner();
        String::from_utf8(bytes)
            .map_err(|e| ParseError::Inconsistency(format!("xml builder produced non-UTF-8 output: {e}")))
    }
}

impl Default for XmlBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn xml_write_error(e: impl std::fmt::Display) -> ParseError {
    ParseError::Inconsistency(format!("xml write error: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_nested_elements_with_leaf_text() {
        let mut builder = XmlBuilder::new();
        builder.open("Document").unwrap();
        builder.open("GrpHdr").unwrap();
        builder.leaf("MsgId", "MSG-1").unwrap();
        builder.close().unwrap();
        builder.close().unwrap();
        let xml = builder.finish().unwrap();
        assert_eq!(xml, "<Document><GrpHdr><MsgId>MSG-1</MsgId></GrpHdr></Document>");
    }

    #[test]
    fn open_with_attrs_renders_attribute() {
        let mut builder = XmlBuilder::new();
        builder.open_with_attrs("Amt", &[("Ccy", "EUR")]).unwrap();
        builder.text("500.00").unwrap();
        builder.close().unwrap();
        let xml = builder.finish().unwrap();
        assert_eq!(xml, r#"<Amt Ccy="EUR">500.00</Amt>"#);
    }

    #[test]
    fn finish_rejects_unclosed_elements() {
        let mut builder = XmlBuilder::new();
        builder.open("Document").unwrap();
        assert!(builder.finish().is_err());
    }

    #[test]
    fn close_without_open_is_an_error() {
        let mut builder = XmlBuilder::new();
        assert!(builder.close().is_err());
    }
}
