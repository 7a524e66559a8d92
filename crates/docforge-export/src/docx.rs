//! Word document (DOCX) assembly
//!
//! Layout, top to bottom: centered title, centered "Generated on" line, a
//! table of contents with one numbered line per section, a page break, then
//! per section a heading, one justified paragraph per non-blank content line
//! and a trailing spacer paragraph.
//!
//! [`DocumentAssembler::layout`] produces that sequence as [`DocBlock`]s; the
//! package writer renders it to WordprocessingML.

use chrono::NaiveDate;
use docforge_utils::error::ExportError;
use docforge_utils::types::{DocumentType, Section};
use tracing::{debug, error};

use crate::assembler::{Assembler, generated_on_line, today};
use crate::package::{
    PackageError, PackageWriter, Relationship, app_properties_xml, content_types_xml,
    core_properties_xml, rel, relationships_xml,
};
use crate::xml::XmlBuilder;

const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Page margins in twentieths of a point
const PAGE_MARGIN: &str = "1000";

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:eastAsia="Calibri" w:cs="Calibri"/><w:sz w:val="22"/><w:szCs w:val="22"/><w:lang w:val="en-US"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="0" w:line="276" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:bCs/><w:color w:val="1F2937"/><w:sz w:val="48"/><w:szCs w:val="48"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:outlineLvl w:val="1"/></w:pPr><w:rPr><w:b/><w:bCs/><w:color w:val="2563EB"/><w:sz w:val="32"/><w:szCs w:val="32"/></w:rPr></w:style></w:styles>"#;

/// One paragraph of the generated document, in output order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocBlock {
    /// Centered `Heading1` with the topic
    Title(String),
    /// Centered grey "Generated on ..." line
    GeneratedOn(String),
    /// "Table of Contents" heading
    TocHeading,
    /// `"{n}. {title}"`
    TocEntry(String),
    /// Empty paragraph that starts a new page
    PageBreak,
    /// `Heading2` with a section title
    SectionHeading(String),
    /// One non-blank content line
    Body(String),
    /// Empty paragraph closing a section
    Spacer,
}

/// Paragraph properties for a block
#[derive(Debug, Default)]
struct ParagraphFormat {
    style: Option<&'static str>,
    page_break_before: bool,
    before: Option<u32>,
    after: Option<u32>,
    indent_left: Option<u32>,
    justification: Option<&'static str>,
    color: Option<&'static str>,
}

impl DocBlock {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Title(t)
            | Self::GeneratedOn(t)
            | Self::TocEntry(t)
            | Self::SectionHeading(t)
            | Self::Body(t) => t,
            Self::TocHeading => "Table of Contents",
            Self::PageBreak | Self::Spacer => "",
        }
    }

    fn format(&self) -> ParagraphFormat {
        match self {
            Self::Title(_) => ParagraphFormat {
                style: Some("Heading1"),
                before: Some(200),
                after: Some(200),
                justification: Some("center"),
                ..ParagraphFormat::default()
            },
            Self::GeneratedOn(_) => ParagraphFormat {
                after: Some(400),
                justification: Some("center"),
                color: Some("666666"),
                ..ParagraphFormat::default()
            },
            Self::TocHeading => ParagraphFormat {
                style: Some("Heading2"),
                before: Some(200),
                after: Some(200),
                ..ParagraphFormat::default()
            },
            Self::TocEntry(_) => ParagraphFormat {
                after: Some(100),
                indent_left: Some(200),
                ..ParagraphFormat::default()
            },
            Self::PageBreak => ParagraphFormat {
                page_break_before: true,
                ..ParagraphFormat::default()
            },
            Self::SectionHeading(_) => ParagraphFormat {
                style: Some("Heading2"),
                before: Some(300),
                after: Some(150),
                ..ParagraphFormat::default()
            },
            Self::Body(_) => ParagraphFormat {
                after: Some(100),
                justification: Some("both"),
                ..ParagraphFormat::default()
            },
            Self::Spacer => ParagraphFormat {
                after: Some(200),
                ..ParagraphFormat::default()
            },
        }
    }
}

/// Builds `.docx` packages
#[derive(Debug, Clone, Default)]
pub struct DocumentAssembler {
    generated_on: Option<NaiveDate>,
}

impl DocumentAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the "Generated on" date instead of using today's
    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.generated_on = Some(date);
        self
    }

    fn date(&self) -> NaiveDate {
        self.generated_on.unwrap_or_else(today)
    }

    /// The paragraph sequence for `topic` and `sections`
    #[must_use]
    pub fn layout(&self, topic: &str, sections: &[Section]) -> Vec<DocBlock> {
        let mut blocks = vec![
            DocBlock::Title(topic.to_string()),
            DocBlock::GeneratedOn(generated_on_line(self.date())),
            DocBlock::TocHeading,
        ];

        blocks.extend(
            sections
                .iter()
                .enumerate()
                .map(|(i, s)| DocBlock::TocEntry(format!("{}. {}", i + 1, s.title))),
        );
        blocks.push(DocBlock::PageBreak);

        for section in sections {
            blocks.push(DocBlock::SectionHeading(section.title.clone()));
            if let Some(content) = section.content.as_deref() {
                blocks.extend(
                    content
                        .split('\n')
                        .map(|line| line.strip_suffix('\r').unwrap_or(line))
                        .filter(|line| !line.trim().is_empty())
                        .map(|line| DocBlock::Body(line.to_string())),
                );
            }
            blocks.push(DocBlock::Spacer);
        }

        blocks
    }

    fn render(&self, topic: &str, blocks: &[DocBlock]) -> Result<Vec<u8>, PackageError> {
        let created = self.date().format("%Y-%m-%dT00:00:00Z").to_string();

        let mut pkg = PackageWriter::new();
        pkg.add_part(
            "[Content_Types].xml",
            &content_types_xml(&[
                (
                    "/word/document.xml".to_string(),
                    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
                ),
                (
                    "/word/styles.xml".to_string(),
                    "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml",
                ),
                (
                    "/docProps/core.xml".to_string(),
                    "application/vnd.openxmlformats-package.core-properties+xml",
                ),
                (
                    "/docProps/app.xml".to_string(),
                    "application/vnd.openxmlformats-officedocument.extended-properties+xml",
                ),
            ])?,
        )?;
        pkg.add_part(
            "_rels/.rels",
            &relationships_xml(&[
                Relationship {
                    id: "rId1".to_string(),
                    rel_type: rel::OFFICE_DOCUMENT,
                    target: "word/document.xml",
                },
                Relationship {
                    id: "rId2".to_string(),
                    rel_type: rel::CORE_PROPERTIES,
                    target: "docProps/core.xml",
                },
                Relationship {
                    id: "rId3".to_string(),
                    rel_type: rel::EXTENDED_PROPERTIES,
                    target: "docProps/app.xml",
                },
            ])?,
        )?;
        pkg.add_part("word/document.xml", &document_xml(blocks)?)?;
        pkg.add_part("word/styles.xml", STYLES_XML.as_bytes())?;
        pkg.add_part(
            "word/_rels/document.xml.rels",
            &relationships_xml(&[Relationship {
                id: "rId1".to_string(),
                rel_type: rel::STYLES,
                target: "styles.xml",
            }])?,
        )?;
        pkg.add_part("docProps/core.xml", &core_properties_xml(topic, &created)?)?;
        pkg.add_part("docProps/app.xml", &app_properties_xml()?)?;
        pkg.finish()
    }
}

fn write_paragraph(xml: &mut XmlBuilder, block: &DocBlock) -> Result<(), PackageError> {
    let fmt = block.format();

    xml.start("w:p", &[])?;
    xml.start("w:pPr", &[])?;
    if let Some(style) = fmt.style {
        xml.empty("w:pStyle", &[("w:val", style)])?;
    }
    if fmt.page_break_before {
        xml.empty("w:pageBreakBefore", &[])?;
    }

    let before = fmt.before.map(|v| v.to_string());
    let after = fmt.after.map(|v| v.to_string());
    let mut spacing = Vec::new();
    if let Some(before) = &before {
        spacing.push(("w:before", before.as_str()));
    }
    if let Some(after) = &after {
        spacing.push(("w:after", after.as_str()));
    }
    if !spacing.is_empty() {
        xml.empty("w:spacing", &spacing)?;
    }

    if let Some(indent) = fmt.indent_left {
        let indent = indent.to_string();
        xml.empty("w:ind", &[("w:left", indent.as_str())])?;
    }
    if let Some(jc) = fmt.justification {
        xml.empty("w:jc", &[("w:val", jc)])?;
    }
    xml.end("w:pPr")?;

    let text = block.text();
    if !text.is_empty() {
        xml.start("w:r", &[])?;
        if let Some(color) = fmt.color {
            xml.start("w:rPr", &[])?;
            xml.empty("w:color", &[("w:val", color)])?;
            xml.end("w:rPr")?;
        }
        xml.text_element("w:t", &[("xml:space", "preserve")], text)?;
        xml.end("w:r")?;
    }

    xml.end("w:p")?;
    Ok(())
}

fn document_xml(blocks: &[DocBlock]) -> Result<Vec<u8>, PackageError> {
    let mut xml = XmlBuilder::new()?;
    xml.start("w:document", &[("xmlns:w", WORD_NS), ("xmlns:r", REL_NS)])?;
    xml.start("w:body", &[])?;

    for block in blocks {
        write_paragraph(&mut xml, block)?;
    }

    xml.start("w:sectPr", &[])?;
    xml.empty("w:pgSz", &[("w:w", "12240"), ("w:h", "15840")])?;
    xml.empty(
        "w:pgMar",
        &[
            ("w:top", PAGE_MARGIN),
            ("w:right", PAGE_MARGIN),
            ("w:bottom", PAGE_MARGIN),
            ("w:left", PAGE_MARGIN),
            ("w:header", "720"),
            ("w:footer", "720"),
            ("w:gutter", "0"),
        ],
    )?;
    xml.end("w:sectPr")?;

    xml.end("w:body")?;
    xml.end("w:document")?;
    Ok(xml.finish())
}

impl Assembler for DocumentAssembler {
    fn document_type(&self) -> DocumentType {
        DocumentType::Document
    }

    fn assemble(&self, topic: &str, sections: &[Section]) -> Result<Vec<u8>, ExportError> {
        let blocks = self.layout(topic, sections);
        debug!(
            sections = sections.len(),
            paragraphs = blocks.len(),
            "Assembling Word document"
        );

        self.render(topic, &blocks).map_err(|e| {
            error!(error = %e, "Word document assembly failed");
            ExportError::AssemblyFailure {
                format: DocumentType::Document.format_name().to_string(),
            }
        })
    }
}
