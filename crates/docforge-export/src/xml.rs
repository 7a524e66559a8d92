//! Small XML writer on top of `quick_xml::Writer`
//!
//! Text content is escaped by quick-xml. Characters that XML 1.0 cannot carry
//! at all (most C0 controls) are dropped first.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::package::PackageError;

fn xml_err<E: std::fmt::Display>(e: E) -> PackageError {
    PackageError::Xml(e.to_string())
}

/// Whether `c` is allowed in an XML 1.0 document
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

/// Drop characters XML cannot represent
#[must_use]
pub fn sanitize_text(text: &str) -> String {
    text.chars().filter(|c| is_xml_char(*c)).collect()
}

/// Streaming builder for one XML part
pub(crate) struct XmlBuilder {
    writer: Writer<Vec<u8>>,
}

impl XmlBuilder {
    /// New part with a standalone UTF-8 declaration
    pub fn new() -> Result<Self, PackageError> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(xml_err)?;
        Ok(Self { writer })
    }

    pub fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<&mut Self, PackageError> {
        let elem = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer.write_event(Event::Start(elem)).map_err(xml_err)?;
        Ok(self)
    }

    pub fn end(&mut self, name: &str) -> Result<&mut Self, PackageError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_err)?;
        Ok(self)
    }

    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<&mut Self, PackageError> {
        let elem = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer.write_event(Event::Empty(elem)).map_err(xml_err)?;
        Ok(self)
    }

    pub fn text(&mut self, text: &str) -> Result<&mut Self, PackageError> {
        let clean = sanitize_text(text);
        self.writer
            .write_event(Event::Text(BytesText::new(&clean)))
            .map_err(xml_err)?;
        Ok(self)
    }

    /// `<name attrs>text</name>`
    pub fn text_element(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
        text: &str,
    ) -> Result<&mut Self, PackageError> {
        self.start(name, attrs)?.text(text)?.end(name)
    }

    pub fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}
