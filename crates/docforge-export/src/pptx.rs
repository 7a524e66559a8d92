//! PowerPoint presentation (PPTX) assembly
//!
//! One title slide followed by one slide per section, in input order, on a
//! 10 x 7.5 inch canvas. [`PresentationAssembler::layout`] describes every
//! slide as positioned shapes; rendering turns that into PresentationML with a
//! single blank layout, master and theme.

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

const DRAWING_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PRESENTATION_NS: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

/// EMU per hundredth of an inch (914400 per inch)
const EMU_PER_CENTI_INCH: i64 = 9_144;

const SLIDE_WIDTH: i64 = 1_000 * EMU_PER_CENTI_INCH;
const SLIDE_HEIGHT: i64 = 750 * EMU_PER_CENTI_INCH;

/// Label printed at the bottom of every section slide
pub const FOOTER_LABEL: &str = "Generated with docforge";

/// Palette
mod color {
    pub const PRIMARY: &str = "2563EB";
    pub const LIGHT: &str = "F3F4F6";
    pub const TEXT: &str = "111827";
    pub const TEXT_LIGHT: &str = "6B7280";
    pub const WHITE: &str = "FFFFFF";
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    fn as_attr(self) -> &'static str {
        match self {
            Self::Left => "l",
            Self::Center => "ctr",
            Self::Right => "r",
        }
    }
}

/// Vertical anchoring of text inside its box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Top,
    Middle,
}

impl Anchor {
    fn as_attr(self) -> &'static str {
        match self {
            Self::Top => "t",
            Self::Middle => "ctr",
        }
    }
}

/// Position and size in EMU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Frame {
    /// Build from hundredths of an inch
    const fn inches(x: i64, y: i64, cx: i64, cy: i64) -> Self {
        Self {
            x: x * EMU_PER_CENTI_INCH,
            y: y * EMU_PER_CENTI_INCH,
            cx: cx * EMU_PER_CENTI_INCH,
            cy: cy * EMU_PER_CENTI_INCH,
        }
    }
}

/// Styled text inside a shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpec {
    pub text: String,
    pub size_pt: u32,
    pub bold: bool,
    pub color: &'static str,
    pub align: Align,
    pub anchor: Anchor,
    pub wrap: bool,
}

/// A rectangle, optionally filled, optionally holding text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeSpec {
    pub name: &'static str,
    pub frame: Frame,
    pub fill: Option<&'static str>,
    pub text: Option<TextSpec>,
}

/// One slide: a solid background plus shapes in z-order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideSpec {
    pub background: &'static str,
    pub shapes: Vec<ShapeSpec>,
}

impl SlideSpec {
    /// Text of the shape called `name`, if present
    #[must_use]
    pub fn text_of(&self, name: &str) -> Option<&str> {
        self.shapes
            .iter()
            .find(|s| s.name == name)
            .and_then(|s| s.text.as_ref())
            .map(|t| t.text.as_str())
    }
}

fn text_box(name: &'static str, frame: Frame, text: TextSpec) -> ShapeSpec {
    ShapeSpec {
        name,
        frame,
        fill: None,
        text: Some(text),
    }
}

/// Builds `.pptx` packages
#[derive(Debug, Clone, Default)]
pub struct PresentationAssembler {
    generated_on: Option<NaiveDate>,
}

impl PresentationAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the title-slide date instead of using today's
    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.generated_on = Some(date);
        self
    }

    fn date(&self) -> NaiveDate {
        self.generated_on.unwrap_or_else(today)
    }

    /// Slide descriptions for `topic` and `sections`; always `sections.len() + 1` long
    #[must_use]
    pub fn layout(&self, topic: &str, sections: &[Section]) -> Vec<SlideSpec> {
        let mut slides = Vec::with_capacity(sections.len() + 1);
        slides.push(self.title_slide(topic));
        slides.extend(
            sections
                .iter()
                .enumerate()
                .map(|(index, section)| section_slide(index, section)),
        );
        slides
    }

    fn title_slide(&self, topic: &str) -> SlideSpec {
        SlideSpec {
            background: color::PRIMARY,
            shapes: vec![
                text_box(
                    "Title",
                    Frame::inches(50, 250, 900, 150),
                    TextSpec {
                        text: topic.to_string(),
                        size_pt: 54,
                        bold: true,
                        color: color::WHITE,
                        align: Align::Center,
                        anchor: Anchor::Middle,
                        wrap: true,
                    },
                ),
                text_box(
                    "Subtitle",
                    Frame::inches(50, 420, 900, 50),
                    TextSpec {
                        text: generated_on_line(self.date()),
                        size_pt: 16,
                        bold: false,
                        color: color::LIGHT,
                        align: Align::Center,
                        anchor: Anchor::Middle,
                        wrap: true,
                    },
                ),
            ],
        }
    }

    fn render(&self, topic: &str, slides: &[SlideSpec]) -> Result<Vec<u8>, PackageError> {
        let created = self.date().format("%Y-%m-%dT00:00:00Z").to_string();
        let slide_count = slides.len();

        let mut overrides = vec![
            (
                "/ppt/presentation.xml".to_string(),
                "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml",
            ),
            (
                "/ppt/slideMasters/slideMaster1.xml".to_string(),
                "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml",
            ),
            (
                "/ppt/slideLayouts/slideLayout1.xml".to_string(),
                "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml",
            ),
            (
                "/ppt/theme/theme1.xml".to_string(),
                "application/vnd.openxmlformats-officedocument.theme+xml",
            ),
        ];
        overrides.extend((1..=slide_count).map(|n| {
            (
                format!("/ppt/slides/slide{n}.xml"),
                "application/vnd.openxmlformats-officedocument.presentationml.slide+xml",
            )
        }));
        overrides.push((
            "/docProps/core.xml".to_string(),
            "application/vnd.openxmlformats-package.core-properties+xml",
        ));
        overrides.push((
            "/docProps/app.xml".to_string(),
            "application/vnd.openxmlformats-officedocument.extended-properties+xml",
        ));

        let mut pkg = PackageWriter::new();
        pkg.add_part("[Content_Types].xml", &content_types_xml(&overrides)?)?;
        pkg.add_part(
            "_rels/.rels",
            &relationships_xml(&[
                Relationship {
                    id: "rId1".to_string(),
                    rel_type: rel::OFFICE_DOCUMENT,
                    target: "ppt/presentation.xml",
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

        pkg.add_part("ppt/presentation.xml", &presentation_xml(slide_count)?)?;
        let slide_targets: Vec<String> = (1..=slide_count)
            .map(|n| format!("slides/slide{n}.xml"))
            .collect();
        let mut presentation_rels = vec![Relationship {
            id: "rId1".to_string(),
            rel_type: rel::SLIDE_MASTER,
            target: "slideMasters/slideMaster1.xml",
        }];
        presentation_rels.extend(slide_targets.iter().enumerate().map(|(i, target)| {
            Relationship {
                id: format!("rId{}", i + 2),
                rel_type: rel::SLIDE,
                target: target.as_str(),
            }
        }));
        presentation_rels.push(Relationship {
            id: format!("rId{}", slide_count + 2),
            rel_type: rel::THEME,
            target: "theme/theme1.xml",
        });
        pkg.add_part(
            "ppt/_rels/presentation.xml.rels",
            &relationships_xml(&presentation_rels)?,
        )?;

        pkg.add_part("ppt/slideMasters/slideMaster1.xml", &slide_master_xml()?)?;
        pkg.add_part(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &relationships_xml(&[
                Relationship {
                    id: "rId1".to_string(),
                    rel_type: rel::SLIDE_LAYOUT,
                    target: "../slideLayouts/slideLayout1.xml",
                },
                Relationship {
                    id: "rId2".to_string(),
                    rel_type: rel::THEME,
                    target: "../theme/theme1.xml",
                },
            ])?,
        )?;
        pkg.add_part("ppt/slideLayouts/slideLayout1.xml", &slide_layout_xml()?)?;
        pkg.add_part(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            &relationships_xml(&[Relationship {
                id: "rId1".to_string(),
                rel_type: rel::SLIDE_MASTER,
                target: "../slideMasters/slideMaster1.xml",
            }])?,
        )?;
        pkg.add_part("ppt/theme/theme1.xml", THEME_XML.as_bytes())?;

        let slide_rels = relationships_xml(&[Relationship {
            id: "rId1".to_string(),
            rel_type: rel::SLIDE_LAYOUT,
            target: "../slideLayouts/slideLayout1.xml",
        }])?;
        for (i, slide) in slides.iter().enumerate() {
            let n = i + 1;
            pkg.add_part(&format!("ppt/slides/slide{n}.xml"), &slide_xml(slide)?)?;
            pkg.add_part(&format!("ppt/slides/_rels/slide{n}.xml.rels"), &slide_rels)?;
        }

        pkg.add_part("docProps/core.xml", &core_properties_xml(topic, &created)?)?;
        pkg.add_part("docProps/app.xml", &app_properties_xml()?)?;
        pkg.finish()
    }
}

fn section_slide(index: usize, section: &Section) -> SlideSpec {
    let mut shapes = vec![
        ShapeSpec {
            name: "Header",
            frame: Frame::inches(0, 0, 1_000, 120),
            fill: Some(color::PRIMARY),
            text: None,
        },
        text_box(
            "Title",
            Frame::inches(50, 30, 900, 80),
            TextSpec {
                text: section.title.clone(),
                size_pt: 40,
                bold: true,
                color: color::WHITE,
                align: Align::Left,
                anchor: Anchor::Middle,
                wrap: true,
            },
        ),
        text_box(
            "Number",
            Frame::inches(920, 30, 50, 80),
            TextSpec {
                text: (index + 1).to_string(),
                size_pt: 14,
                bold: false,
                color: color::LIGHT,
                align: Align::Right,
                anchor: Anchor::Middle,
                wrap: false,
            },
        ),
    ];

    if let Some(content) = section.content_text() {
        shapes.push(text_box(
            "Body",
            Frame::inches(50, 150, 900, 550),
            TextSpec {
                text: content.to_string(),
                size_pt: 18,
                bold: false,
                color: color::TEXT,
                align: Align::Left,
                anchor: Anchor::Top,
                wrap: true,
            },
        ));
    }

    shapes.push(text_box(
        "Footer",
        Frame::inches(50, 700, 900, 40),
        TextSpec {
            text: FOOTER_LABEL.to_string(),
            size_pt: 10,
            bold: false,
            color: color::TEXT_LIGHT,
            align: Align::Center,
            anchor: Anchor::Middle,
            wrap: true,
        },
    ));

    SlideSpec {
        background: color::WHITE,
        shapes,
    }
}

fn open_root(xml: &mut XmlBuilder, name: &str) -> Result<(), PackageError> {
    xml.start(
        name,
        &[
            ("xmlns:a", DRAWING_NS),
            ("xmlns:r", REL_NS),
            ("xmlns:p", PRESENTATION_NS),
        ],
    )?;
    Ok(())
}

/// `<p:nvGrpSpPr>` and `<p:grpSpPr>` that open every shape tree
fn write_group_header(xml: &mut XmlBuilder) -> Result<(), PackageError> {
    xml.start("p:nvGrpSpPr", &[])?
        .empty("p:cNvPr", &[("id", "1"), ("name", "")])?
        .empty("p:cNvGrpSpPr", &[])?
        .empty("p:nvPr", &[])?
        .end("p:nvGrpSpPr")?;
    xml.start("p:grpSpPr", &[])?
        .start("a:xfrm", &[])?
        .empty("a:off", &[("x", "0"), ("y", "0")])?
        .empty("a:ext", &[("cx", "0"), ("cy", "0")])?
        .empty("a:chOff", &[("x", "0"), ("y", "0")])?
        .empty("a:chExt", &[("cx", "0"), ("cy", "0")])?
        .end("a:xfrm")?
        .end("p:grpSpPr")?;
    Ok(())
}

fn write_solid_fill(xml: &mut XmlBuilder, rgb: &str) -> Result<(), PackageError> {
    xml.start("a:solidFill", &[])?
        .empty("a:srgbClr", &[("val", rgb)])?
        .end("a:solidFill")?;
    Ok(())
}

fn write_text_body(xml: &mut XmlBuilder, text: &TextSpec) -> Result<(), PackageError> {
    let size = (text.size_pt * 100).to_string();

    xml.start("p:txBody", &[])?;
    xml.empty(
        "a:bodyPr",
        &[
            ("wrap", if text.wrap { "square" } else { "none" }),
            ("lIns", "91440"),
            ("tIns", "45720"),
            ("rIns", "91440"),
            ("bIns", "45720"),
            ("rtlCol", "0"),
            ("anchor", text.anchor.as_attr()),
        ],
    )?;
    xml.empty("a:lstStyle", &[])?;

    for line in text.text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        xml.start("a:p", &[])?;
        xml.empty("a:pPr", &[("algn", text.align.as_attr())])?;

        let mut run_props = vec![("lang", "en-US"), ("sz", size.as_str())];
        if text.bold {
            run_props.push(("b", "1"));
        }
        run_props.push(("dirty", "0"));

        if line.is_empty() {
            xml.start("a:endParaRPr", &run_props)?;
            write_solid_fill(xml, text.color)?;
            xml.end("a:endParaRPr")?;
        } else {
            xml.start("a:r", &[])?;
            xml.start("a:rPr", &run_props)?;
            write_solid_fill(xml, text.color)?;
            xml.end("a:rPr")?;
            xml.text_element("a:t", &[], line)?;
            xml.end("a:r")?;
        }
        xml.end("a:p")?;
    }

    xml.end("p:txBody")?;
    Ok(())
}

fn write_shape(xml: &mut XmlBuilder, id: usize, shape: &ShapeSpec) -> Result<(), PackageError> {
    let id = id.to_string();
    let x = shape.frame.x.to_string();
    let y = shape.frame.y.to_string();
    let cx = shape.frame.cx.to_string();
    let cy = shape.frame.cy.to_string();

    xml.start("p:sp", &[])?;
    xml.start("p:nvSpPr", &[])?
        .empty("p:cNvPr", &[("id", id.as_str()), ("name", shape.name)])?;
    if shape.text.is_some() {
        xml.empty("p:cNvSpPr", &[("txBox", "1")])?;
    } else {
        xml.empty("p:cNvSpPr", &[])?;
    }
    xml.empty("p:nvPr", &[])?.end("p:nvSpPr")?;

    xml.start("p:spPr", &[])?
        .start("a:xfrm", &[])?
        .empty("a:off", &[("x", x.as_str()), ("y", y.as_str())])?
        .empty("a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])?
        .end("a:xfrm")?
        .start("a:prstGeom", &[("prst", "rect")])?
        .empty("a:avLst", &[])?
        .end("a:prstGeom")?;
    match shape.fill {
        Some(rgb) => {
            write_solid_fill(xml, rgb)?;
            xml.start("a:ln", &[])?.empty("a:noFill", &[])?.end("a:ln")?;
        }
        None => {
            xml.empty("a:noFill", &[])?;
        }
    }
    xml.end("p:spPr")?;

    if let Some(text) = &shape.text {
        write_text_body(xml, text)?;
    }

    xml.end("p:sp")?;
    Ok(())
}

fn slide_xml(slide: &SlideSpec) -> Result<Vec<u8>, PackageError> {
    let mut xml = XmlBuilder::new()?;
    open_root(&mut xml, "p:sld")?;
    xml.start("p:cSld", &[])?;

    xml.start("p:bg", &[])?.start("p:bgPr", &[])?;
    write_solid_fill(&mut xml, slide.background)?;
    xml.empty("a:effectLst", &[])?.end("p:bgPr")?.end("p:bg")?;

    xml.start("p:spTree", &[])?;
    write_group_header(&mut xml)?;
    for (i, shape) in slide.shapes.iter().enumerate() {
        // id 1 belongs to the group
        write_shape(&mut xml, i + 2, shape)?;
    }
    xml.end("p:spTree")?;

    xml.end("p:cSld")?;
    xml.start("p:clrMapOvr", &[])?
        .empty("a:masterClrMapping", &[])?
        .end("p:clrMapOvr")?;
    xml.end("p:sld")?;
    Ok(xml.finish())
}

fn presentation_xml(slide_count: usize) -> Result<Vec<u8>, PackageError> {
    let width = SLIDE_WIDTH.to_string();
    let height = SLIDE_HEIGHT.to_string();

    let mut xml = XmlBuilder::new()?;
    open_root(&mut xml, "p:presentation")?;
    xml.start("p:sldMasterIdLst", &[])?
        .empty("p:sldMasterId", &[("id", "2147483648"), ("r:id", "rId1")])?
        .end("p:sldMasterIdLst")?;

    xml.start("p:sldIdLst", &[])?;
    for i in 0..slide_count {
        let id = (256 + i).to_string();
        let rid = format!("rId{}", i + 2);
        xml.empty("p:sldId", &[("id", id.as_str()), ("r:id", rid.as_str())])?;
    }
    xml.end("p:sldIdLst")?;

    xml.empty("p:sldSz", &[("cx", width.as_str()), ("cy", height.as_str())])?;
    xml.empty("p:notesSz", &[("cx", height.as_str()), ("cy", width.as_str())])?;
    xml.end("p:presentation")?;
    Ok(xml.finish())
}

fn slide_master_xml() -> Result<Vec<u8>, PackageError> {
    let mut xml = XmlBuilder::new()?;
    open_root(&mut xml, "p:sldMaster")?;
    xml.start("p:cSld", &[])?.start("p:spTree", &[])?;
    write_group_header(&mut xml)?;
    xml.end("p:spTree")?.end("p:cSld")?;
    xml.empty(
        "p:clrMap",
        &[
            ("bg1", "lt1"),
            ("tx1", "dk1"),
            ("bg2", "lt2"),
            ("tx2", "dk2"),
            ("accent1", "accent1"),
            ("accent2", "accent2"),
            ("accent3", "accent3"),
            ("accent4", "accent4"),
            ("accent5", "accent5"),
            ("accent6", "accent6"),
            ("hlink", "hlink"),
            ("folHlink", "folHlink"),
        ],
    )?;
    xml.start("p:sldLayoutIdLst", &[])?
        .empty("p:sldLayoutId", &[("id", "2147483649"), ("r:id", "rId1")])?
        .end("p:sldLayoutIdLst")?;
    xml.end("p:sldMaster")?;
    Ok(xml.finish())
}

fn slide_layout_xml() -> Result<Vec<u8>, PackageError> {
    let mut xml = XmlBuilder::new()?;
    xml.start(
        "p:sldLayout",
        &[
            ("xmlns:a", DRAWING_NS),
            ("xmlns:r", REL_NS),
            ("xmlns:p", PRESENTATION_NS),
            ("type", "blank"),
            ("preserve", "1"),
        ],
    )?;
    xml.start("p:cSld", &[("name", "Blank")])?
        .start("p:spTree", &[])?;
    write_group_header(&mut xml)?;
    xml.end("p:spTree")?.end("p:cSld")?;
    xml.start("p:clrMapOvr", &[])?
        .empty("a:masterClrMapping", &[])?
        .end("p:clrMapOvr")?;
    xml.end("p:sldLayout")?;
    Ok(xml.finish())
}

const THEME_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="docforge"><a:themeElements><a:clrScheme name="docforge"><a:dk1><a:srgbClr val="111827"/></a:dk1><a:lt1><a:srgbClr val="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="1F2937"/></a:dk2><a:lt2><a:srgbClr val="F3F4F6"/></a:lt2><a:accent1><a:srgbClr val="2563EB"/></a:accent1><a:accent2><a:srgbClr val="7C3AED"/></a:accent2><a:accent3><a:srgbClr val="059669"/></a:accent3><a:accent4><a:srgbClr val="D97706"/></a:accent4><a:accent5><a:srgbClr val="DC2626"/></a:accent5><a:accent6><a:srgbClr val="0891B2"/></a:accent6><a:hlink><a:srgbClr val="2563EB"/></a:hlink><a:folHlink><a:srgbClr val="7C3AED"/></a:folHlink></a:clrScheme><a:fontScheme name="docforge"><a:majorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="docforge"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>"#;

impl Assembler for PresentationAssembler {
    fn document_type(&self) -> DocumentType {
        DocumentType::Presentation
    }

    fn assemble(&self, topic: &str, sections: &[Section]) -> Result<Vec<u8>, ExportError> {
        let slides = self.layout(topic, sections);
        debug!(slides = slides.len(), "Assembling presentation");

        self.render(topic, &slides).map_err(|e| {
            error!(error = %e, "Presentation assembly failed");
            ExportError::AssemblyFailure {
                format: DocumentType::Presentation.format_name().to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{part_names, read_part};

    fn assembler() -> PresentationAssembler {
        PresentationAssembler::new().with_date(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap())
    }

    fn sections() -> Vec<Section> {
        vec![
            Section::new("Overview").with_content("First line\nSecond line"),
            Section::new("Pending"),
            Section::new("Wrap-up").with_content("Done"),
        ]
    }

    #[test]
    fn test_layout_slide_count_and_order() {
        let slides = assembler().layout("Deck", &sections());
        assert_eq!(slides.len(), 4);

        assert_eq!(slides[0].background, color::PRIMARY);
        assert_eq!(slides[0].text_of("Title"), Some("Deck"));
        assert_eq!(
            slides[0].text_of("Subtitle"),
            Some("Generated on March 5, 2024")
        );

        let titles: Vec<_> = slides[1..].iter().filter_map(|s| s.text_of("Title")).collect();
        assert_eq!(titles, vec!["Overview", "Pending", "Wrap-up"]);
        let numbers: Vec<_> = slides[1..].iter().filter_map(|s| s.text_of("Number")).collect();
        assert_eq!(numbers, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_body_omitted_without_content() {
        let slides = assembler().layout("Deck", &sections());
        assert_eq!(
            slides[1].text_of("Body"),
            Some("First line\nSecond line")
        );
        assert_eq!(slides[2].text_of("Body"), None);

        let blank = assembler().layout("Deck", &[Section::new("Gap").with_content(" \n\t")]);
        assert_eq!(blank[1].text_of("Body"), None);
        assert!(slides[1..].iter().all(|s| s.text_of("Footer") == Some(FOOTER_LABEL)));
    }

    #[test]
    fn test_header_bar_spans_width() {
        let slides = assembler().layout("Deck", &sections());
        let header = slides[1]
            .shapes
            .iter()
            .find(|s| s.name == "Header")
            .unwrap();
        assert_eq!(header.fill, Some(color::PRIMARY));
        assert_eq!(header.frame.x, 0);
        assert_eq!(header.frame.cx, SLIDE_WIDTH);
        assert_eq!(header.frame.cy, 1_097_280);
    }

    #[test]
    fn test_package_contains_one_part_per_slide() {
        let bytes = assembler().assemble("Deck", &sections()).unwrap();
        let names = part_names(&bytes);

        let slide_parts = names
            .iter()
            .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
            .count();
        assert_eq!(slide_parts, 4);

        let presentation = read_part(&bytes, "ppt/presentation.xml");
        assert_eq!(presentation.matches("<p:sldId ").count(), 4);
        assert!(presentation.contains(r#"<p:sldSz cx="9144000" cy="6858000"/>"#));

        let rels = read_part(&bytes, "ppt/_rels/presentation.xml.rels");
        assert!(rels.contains("slides/slide4.xml"));
        assert!(rels.contains(r#"Id="rId6""#));

        let types = read_part(&bytes, "[Content_Types].xml");
        assert!(types.contains("/ppt/slides/slide4.xml"));
        assert!(names.contains(&"ppt/theme/theme1.xml".to_string()));
    }

    #[test]
    fn test_slide_xml_carries_text_and_colors() {
        let bytes = assembler().assemble("R&D", &sections()).unwrap();

        let title = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(title.contains("<a:t>R&amp;D</a:t>"));
        assert!(title.contains(r#"sz="5400""#));
        assert!(title.contains(r#"<a:srgbClr val="2563EB"/>"#));

        let first = read_part(&bytes, "ppt/slides/slide2.xml");
        let order: Vec<usize> = ["<a:t>Overview</a:t>", "<a:t>First line</a:t>", "<a:t>Second line</a:t>"]
            .iter()
            .map(|n| first.find(n).unwrap())
            .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]));
        assert!(first.contains(r#"anchor="t""#));
        assert!(first.contains(FOOTER_LABEL));
    }

    #[test]
    fn test_same_input_same_presentation() {
        let a = assembler().assemble("Deck", &sections()).unwrap();
        let b = assembler().assemble("Deck", &sections()).unwrap();

        let (mut names_a, mut names_b) = (part_names(&a), part_names(&b));
        names_a.sort();
        names_b.sort();
        assert_eq!(names_a, names_b);
        assert_eq!(
            read_part(&a, "ppt/presentation.xml"),
            read_part(&b, "ppt/presentation.xml")
        );
        for n in 1..=4 {
            let name = format!("ppt/slides/slide{n}.xml");
            assert_eq!(read_part(&a, &name), read_part(&b, &name), "{name} differs");
        }
    }

    #[test]
    fn test_empty_sections_gives_title_slide_only() {
        let bytes = assembler().assemble("Solo", &[]).unwrap();
        let presentation = read_part(&bytes, "ppt/presentation.xml");
        assert_eq!(presentation.matches("<p:sldId ").count(), 1);
    }
}
