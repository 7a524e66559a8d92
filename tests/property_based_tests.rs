//! Property-based tests for the pure parts of docforge
//!
//! Covers outline extraction, both assemblers, slug generation and the rate
//! limiter's per-window ceiling.
//!
//! ## Configuration
//!
//! - `PROPTEST_CASES`: number of cases per property (default: 64)
//!
//! ```bash
//! PROPTEST_CASES=256 cargo test --test property_based_tests
//! ```

use proptest::prelude::*;
use std::env;
use std::io::{Cursor, Read};
use std::time::Duration;

use docforge_export::{DocBlock, DocumentAssembler, PresentationAssembler, slugify};
use docforge_extraction::extract_outline;
use docforge_llm::RateLimiter;
use docforge_utils::Section;

const DEFAULT_PROPTEST_CASES: u32 = 64;

fn proptest_config(max_cases: Option<u32>) -> ProptestConfig {
    let env_cases = env::var("PROPTEST_CASES")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(DEFAULT_PROPTEST_CASES);

    let cases = match max_cases {
        Some(max) => env_cases.min(max),
        None => env_cases,
    };

    ProptestConfig {
        cases,
        ..ProptestConfig::default()
    }
}

/// A title that starts and ends with a letter or digit
fn arb_title() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 &,'-]{0,30}[A-Za-z0-9]"
}

fn arb_section() -> impl Strategy<Value = Section> {
    (
        arb_title(),
        prop::option::of(prop::collection::vec("[a-zA-Z0-9 .,]{0,40}", 0..6)),
    )
        .prop_map(|(title, lines)| {
            let section = Section::new(title);
            match lines {
                Some(lines) => section.with_content(lines.join("\n")),
                None => section,
            }
        })
}

fn slide_count(bytes: &[u8]) -> usize {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut xml = String::new();
    archive
        .by_name("ppt/presentation.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();
    xml.matches("<p:sldId ").count()
}

proptest! {
    #![proptest_config(proptest_config(None))]

    #[test]
    fn prop_numbered_list_round_trips(titles in prop::collection::vec(arb_title(), 1..12)) {
        let raw: String = titles
            .iter()
            .enumerate()
            .map(|(i, t)| format!("{}. {t}\n", i + 1))
            .collect();
        prop_assert_eq!(extract_outline(&raw).unwrap(), titles);
    }

    #[test]
    fn prop_dash_bullets_round_trip(titles in prop::collection::vec(arb_title(), 1..12)) {
        let raw = titles
            .iter()
            .map(|t| format!("- {t}"))
            .collect::<Vec<_>>()
            .join("\r\n");
        prop_assert_eq!(extract_outline(&raw).unwrap(), titles);
    }

    #[test]
    fn prop_extracted_titles_are_trimmed_and_non_empty(raw in "(?s).{0,400}") {
        if let Ok(titles) = extract_outline(&raw) {
            prop_assert!(!titles.is_empty());
            for title in titles {
                prop_assert!(!title.is_empty());
                prop_assert_eq!(title.trim(), title.as_str());
            }
        }
    }

    #[test]
    fn prop_slugify_is_filesystem_safe(topic in ".{0,60}") {
        let slug = slugify(&topic);
        prop_assert!(!slug.is_empty());
        prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
    }

    #[test]
    fn prop_rate_limiter_allows_exactly_max(max in 1u32..25, identity in "[a-z]{1,8}") {
        let limiter = RateLimiter::new(Duration::from_secs(3600), max);
        for _ in 0..max {
            prop_assert!(limiter.allow(&identity));
        }
        prop_assert!(!limiter.allow(&identity));
        prop_assert_eq!(limiter.status(&identity).remaining, 0);
    }
}

proptest! {
    #![proptest_config(proptest_config(Some(32)))]

    #[test]
    fn prop_presentation_has_one_slide_per_section_plus_title(
        topic in arb_title(),
        sections in prop::collection::vec(arb_section(), 1..10),
    ) {
        let assembler = PresentationAssembler::new();
        prop_assert_eq!(assembler.layout(&topic, &sections).len(), sections.len() + 1);

        let bytes = docforge_export::Assembler::assemble(&assembler, &topic, &sections).unwrap();
        prop_assert_eq!(slide_count(&bytes), sections.len() + 1);
    }

    #[test]
    fn prop_document_layout_keeps_section_order(
        topic in arb_title(),
        sections in prop::collection::vec(arb_section(), 0..10),
    ) {
        let blocks = DocumentAssembler::new().layout(&topic, &sections);

        let toc: Vec<&str> = blocks
            .iter()
            .filter(|b| matches!(b, DocBlock::TocEntry(_)))
            .map(DocBlock::text)
            .collect();
        let expected_toc: Vec<String> = sections
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{}. {}", i + 1, s.title))
            .collect();
        prop_assert_eq!(toc, expected_toc.iter().map(String::as_str).collect::<Vec<_>>());

        let headings: Vec<&str> = blocks
            .iter()
            .filter(|b| matches!(b, DocBlock::SectionHeading(_)))
            .map(DocBlock::text)
            .collect();
        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        prop_assert_eq!(headings, titles);

        let bodies = blocks.iter().filter(|b| matches!(b, DocBlock::Body(_))).count();
        let expected_bodies: usize = sections
            .iter()
            .filter_map(|s| s.content.as_deref())
            .map(|c| c.split('\n').filter(|l| !l.trim().is_empty()).count())
            .sum();
        prop_assert_eq!(bodies, expected_bodies);
        prop_assert_eq!(
            blocks.iter().filter(|b| **b == DocBlock::PageBreak).count(),
            1
        );
    }
}
