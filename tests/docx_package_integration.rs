//! Integration tests for the DOCX package structure.
//!
//! Exports a case, re-opens the archive and scans the parts with a streaming
//! XML reader, the way a word processor would.

mod common;

use std::collections::BTreeSet;
use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use case_export::adapters::export::DocxExporter;
use case_export::adapters::templates::create_template_from_preset;
use case_export::domain::document::ExportFormat;
use case_export::domain::template::TemplatePreset;
use case_export::ports::{ExportOptions, Exporter, RenderInput, Template};

use common::{png_data_url, sample_case};

// =============================================================================
// Test Infrastructure
// =============================================================================

async fn package(diagram: Option<String>) -> Vec<u8> {
    let case = sample_case();
    let mut input = RenderInput::new(&case).with_format(ExportFormat::Docx);
    if let Some(diagram) = diagram {
        input = input.with_diagram(diagram);
    }
    let document = create_template_from_preset(TemplatePreset::FullReport, None).render(&input);
    let result = DocxExporter::new()
        .export(&document, &ExportOptions::for_document(&document))
        .await;
    result.bytes().expect("docx export succeeds").to_vec()
}

fn read_part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut text = String::new();
    file.read_to_string(&mut text).unwrap();
    text
}

/// Element names with their attributes, in document order.
fn elements(xml: &str) -> Vec<(String, Vec<(String, String)>)> {
    let mut reader = Reader::from_str(xml);
    let mut found = Vec::new();
    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) | Event::Empty(e) => {
                let name = String::from_utf8(e.name().as_ref().to_vec()).unwrap();
                let attrs = e
                    .attributes()
                    .map(|a| {
                        let a = a.unwrap();
                        (
                            String::from_utf8(a.key.as_ref().to_vec()).unwrap(),
                            a.unescape_value().unwrap().into_owned(),
                        )
                    })
                    .collect();
                found.push((name, attrs));
            }
            Event::Eof => break,
            _ => {}
        }
    }
    found
}

fn attr<'a>(attrs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn package_holds_the_required_parts() {
    let bytes = package(None).await;
    let archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
    let names: BTreeSet<&str> = archive.file_names().collect();

    for part in [
        "[Content_Types].xml",
        "_rels/.rels",
        "docProps/core.xml",
        "docProps/app.xml",
        "word/document.xml",
        "word/_rels/document.xml.rels",
        "word/styles.xml",
        "word/numbering.xml",
        "word/footer1.xml",
        "word/footer2.xml",
    ] {
        assert!(names.contains(part), "missing {}", part);
    }
}

#[tokio::test]
async fn every_xml_part_is_well_formed() {
    let bytes = package(Some(png_data_url(10, 5))).await;
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();

    for index in 0..archive.len() {
        let mut file = archive.by_index(index).unwrap();
        let name = file.name().to_string();
        if !(name.ends_with(".xml") || name.ends_with(".rels")) {
            continue;
        }
        let mut xml = String::new();
        file.read_to_string(&mut xml).unwrap();

        let mut reader = Reader::from_str(&xml);
        loop {
            match reader.read_event() {
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => panic!("{} is malformed: {}", name, e),
            }
        }
    }
}

#[tokio::test]
async fn diagram_gets_its_own_landscape_section() {
    let bytes = package(Some(png_data_url(10, 5))).await;
    let document = elements(&read_part(&bytes, "word/document.xml"));

    let sections = document.iter().filter(|(name, _)| name == "w:sectPr").count();
    let landscape = document
        .iter()
        .filter(|(name, attrs)| name == "w:pgSz" && attr(attrs, "w:orient") == Some("landscape"))
        .count();

    assert_eq!(sections, 3);
    assert_eq!(landscape, 1);
    assert!(document.iter().any(|(name, _)| name == "a:blip"));
}

#[tokio::test]
async fn without_diagram_every_section_is_portrait() {
    let bytes = package(None).await;
    let document = elements(&read_part(&bytes, "word/document.xml"));

    assert!(document.iter().any(|(name, _)| name == "w:sectPr"));
    assert!(!document
        .iter()
        .any(|(name, attrs)| name == "w:pgSz" && attr(attrs, "w:orient") == Some("landscape")));
    assert!(!document.iter().any(|(name, _)| name == "w:drawing"));
}

#[tokio::test]
async fn hyperlinks_resolve_to_external_relationships() {
    let bytes = package(None).await;
    let document = elements(&read_part(&bytes, "word/document.xml"));
    let rels = elements(&read_part(&bytes, "word/_rels/document.xml.rels"));

    let link_ids: Vec<&str> = document
        .iter()
        .filter(|(name, _)| name == "w:hyperlink")
        .filter_map(|(_, attrs)| attr(attrs, "r:id"))
        .collect();
    assert!(!link_ids.is_empty());

    for id in link_ids {
        let rel = rels
            .iter()
            .find(|(name, attrs)| name == "Relationship" && attr(attrs, "Id") == Some(id))
            .unwrap_or_else(|| panic!("no relationship {}", id));
        assert_eq!(attr(&rel.1, "TargetMode"), Some("External"));
    }
}

#[tokio::test]
async fn page_footer_numbers_pages() {
    let bytes = package(None).await;
    let footer = read_part(&bytes, "word/footer2.xml");

    assert!(footer.contains(" PAGE "));
    assert!(footer.contains(" NUMPAGES "));
}
