//! DOCX and PPTX assembly
//!
//! Both formats are Office Open XML packages: a zip of XML parts tied together
//! by `[Content_Types].xml` and `.rels` files. `package` and `xml` hold the
//! shared plumbing; `docx` and `pptx` hold the layouts.
//!
//! ```no_run
//! use docforge_export::ExportDispatcher;
//! use docforge_utils::{DocumentType, Section};
//!
//! let sections = vec![Section::new("Intro").with_content("Hello")];
//! let artifact = ExportDispatcher::new()
//!     .export("Quarterly Review", DocumentType::Document, &sections)
//!     .unwrap();
//! assert_eq!(artifact.filename, "quarterly_review.docx");
//! ```

mod assembler;
mod dispatcher;
mod docx;
mod package;
mod pptx;
mod xml;

pub use assembler::Assembler;
pub use dispatcher::{ExportArtifact, ExportDispatcher, UNTITLED_SLUG, slugify};
pub use docforge_utils::error::ExportError;
pub use docx::{DocBlock, DocumentAssembler};
pub use pptx::{
    Align, Anchor, FOOTER_LABEL, Frame, PresentationAssembler, ShapeSpec, SlideSpec, TextSpec,
};
pub use xml::sanitize_text;

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::{Cursor, Read};

    pub fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut content = String::new();
        archive
            .by_name(name)
            .unwrap_or_else(|e| panic!("missing part {name}: {e}"))
            .read_to_string(&mut content)
            .unwrap();
        content
    }

    pub fn part_names(bytes: &[u8]) -> Vec<String> {
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        archive.file_names().map(str::to_string).collect()
    }
}
