//! OPC package writer (the zip container shared by DOCX and PPTX)
//!
//! Parts are written into an in-memory zip; the bytes are only handed out by
//! [`PackageWriter::finish`], so a failure never leaves a half-written artifact.

use std::io::{Cursor, Write};

use thiserror::Error;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Relationship type URIs
pub(crate) mod rel {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const CORE_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    pub const EXTENDED_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
    pub const STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    pub const SLIDE_MASTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
    pub const SLIDE_LAYOUT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
    pub const SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
    pub const THEME: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
}

/// Failures inside the package writer. Never surfaced to callers directly;
/// assemblers log them and return `ExportError::AssemblyFailure`.
#[derive(Error, Debug)]
pub enum PackageError {
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("xml error: {0}")]
    Xml(String),
}

/// One `<Relationship>` in a `.rels` part
pub(crate) struct Relationship<'a> {
    pub id: String,
    pub rel_type: &'static str,
    pub target: &'a str,
}

/// Builds a zip of package parts in memory
pub(crate) struct PackageWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
}

fn part_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated)
}

impl PackageWriter {
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Add a part at `name` (no leading slash)
    pub fn add_part(&mut self, name: &str, bytes: &[u8]) -> Result<(), PackageError> {
        self.zip.start_file(name, part_options())?;
        self.zip.write_all(bytes)?;
        Ok(())
    }

    pub fn finish(self) -> Result<Vec<u8>, PackageError> {
        Ok(self.zip.finish()?.into_inner())
    }
}

/// `[Content_Types].xml` with the two defaults plus `overrides` as (part name, content type)
pub(crate) fn content_types_xml(overrides: &[(String, &str)]) -> Result<Vec<u8>, PackageError> {
    let mut xml = crate::xml::XmlBuilder::new()?;
    xml.start(
        "Types",
        &[(
            "xmlns",
            "http://schemas.openxmlformats.org/package/2006/content-types",
        )],
    )?;
    xml.empty(
        "Default",
        &[
            ("Extension", "rels"),
            (
                "ContentType",
                "application/vnd.openxmlformats-package.relationships+xml",
            ),
        ],
    )?;
    xml.empty(
        "Default",
        &[("Extension", "xml"), ("ContentType", "application/xml")],
    )?;
    for (part, content_type) in overrides {
        xml.empty(
            "Override",
            &[("PartName", part.as_str()), ("ContentType", *content_type)],
        )?;
    }
    xml.end("Types")?;
    Ok(xml.finish())
}

/// A `.rels` part
pub(crate) fn relationships_xml(rels: &[Relationship<'_>]) -> Result<Vec<u8>, PackageError> {
    let mut xml = crate::xml::XmlBuilder::new()?;
    xml.start(
        "Relationships",
        &[(
            "xmlns",
            "http://schemas.openxmlformats.org/package/2006/relationships",
        )],
    )?;
    for r in rels {
        xml.empty(
            "Relationship",
            &[
                ("Id", r.id.as_str()),
                ("Type", r.rel_type),
                ("Target", r.target),
            ],
        )?;
    }
    xml.end("Relationships")?;
    Ok(xml.finish())
}

/// `docProps/core.xml`
pub(crate) fn core_properties_xml(title: &str, created: &str) -> Result<Vec<u8>, PackageError> {
    let mut xml = crate::xml::XmlBuilder::new()?;
    xml.start(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    xml.text_element("dc:title", &[], title)?;
    xml.text_element("dc:creator", &[], "docforge")?;
    xml.text_element("dcterms:created", &[("xsi:type", "dcterms:W3CDTF")], created)?;
    xml.text_element("dcterms:modified", &[("xsi:type", "dcterms:W3CDTF")], created)?;
    xml.end("cp:coreProperties")?;
    Ok(xml.finish())
}

/// `docProps/app.xml`
pub(crate) fn app_properties_xml() -> Result<Vec<u8>, PackageError> {
    let mut xml = crate::xml::XmlBuilder::new()?;
    xml.start(
        "Properties",
        &[(
            "xmlns",
            "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties",
        )],
    )?;
    xml.text_element("Application", &[], "docforge")?;
    xml.end("Properties")?;
    Ok(xml.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_package_round_trips_parts() {
        let mut pkg = PackageWriter::new();
        pkg.add_part("a.xml", b"<a/>").unwrap();
        pkg.add_part("dir/b.xml", b"<b/>").unwrap();
        let bytes = pkg.finish().unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
        let mut content = String::new();
        archive
            .by_name("dir/b.xml")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "<b/>");
    }

    #[test]
    fn test_duplicate_part_is_an_error() {
        let mut pkg = PackageWriter::new();
        pkg.add_part("a.xml", b"<a/>").unwrap();
        assert!(pkg.add_part("a.xml", b"<a/>").is_err());
    }

    #[test]
    fn test_relationships_xml() {
        let xml = relationships_xml(&[Relationship {
            id: "rId1".to_string(),
            rel_type: rel::STYLES,
            target: "styles.xml",
        }])
        .unwrap();
        let xml = String::from_utf8(xml).unwrap();
        assert!(xml.contains(r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#));
    }
}
