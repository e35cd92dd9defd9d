//! Section Extraction Tests
//!
//! End-to-end runs of `SectionExtractor` over DOCX packages assembled with
//! the public archive API.

use std::io::Cursor;

use secdok_ooxml::{Alignment, Block, OoxmlArchive, SectionExtractor, SectionRange, WordDocument};

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading3"><w:name w:val="heading 3"/></w:style>
</w:styles>"#;

/// Minimal DOCX package with `body` as the document body
fn package(body: &[String], with_styles: bool) -> Vec<u8> {
    let mut archive = OoxmlArchive::default();
    archive.set_string(
        "[Content_Types].xml",
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#,
    );
    archive.set_string(
        "_rels/.rels",
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#,
    );
    if with_styles {
        archive.set_string("word/styles.xml", STYLES);
    }
    archive.set_string("word/document.xml", document_xml(body));

    let mut buffer = Cursor::new(Vec::new());
    archive.write_to(&mut buffer).unwrap();
    buffer.into_inner()
}

fn document_xml(body: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}<w:sectPr><w:pgSz w:w="12240" w:h="15840"/></w:sectPr></w:body></w:document>"#,
        body.concat()
    )
}

fn heading(level: u32, text: &str) -> String {
    format!(r#"<w:p><w:pPr><w:pStyle w:val="Heading{level}"/></w:pPr><w:r><w:t>{text}</w:t></w:r></w:p>"#)
}

fn para(text: &str) -> String {
    format!(r#"<w:p><w:r><w:t xml:space="preserve">{text}</w:t></w:r></w:p>"#)
}

fn table(cells: &[&str]) -> String {
    let row: String = cells
        .iter()
        .map(|cell| format!("<w:tc>{}</w:tc>", para(cell)))
        .collect();
    format!(r#"<w:tbl><w:tblPr><w:tblStyle w:val="TableGrid"/></w:tblPr><w:tr>{row}</w:tr></w:tbl>"#)
}

fn saved_document_xml(doc: &mut WordDocument) -> String {
    let bytes = doc.to_bytes().unwrap();
    let archive = OoxmlArchive::from_reader(Cursor::new(bytes)).unwrap();
    archive.get_string("word/document.xml").unwrap()
}

fn summary(doc: &WordDocument) -> Vec<String> {
    doc.document()
        .blocks()
        .map(|b| match b {
            Block::Paragraph(p) if p.to_xml().contains("w:fldSimple") => "[TOC]".to_string(),
            Block::Paragraph(p) => p.text(),
            Block::Table(_) => "[table]".to_string(),
        })
        .collect()
}

fn extract(bytes: &[u8], header: &str) -> (Option<SectionRange>, WordDocument) {
    let mut doc = WordDocument::from_bytes(bytes).unwrap();
    let range = SectionExtractor::new(header)
        .extract(doc.document_mut())
        .unwrap();
    // Reopen what would be written to disk
    let saved = doc.to_bytes().unwrap();
    (range, WordDocument::from_bytes(&saved).unwrap())
}

// =============================================================================
// Section boundaries
// =============================================================================

#[test]
fn test_section_between_sibling_headings() {
    let bytes = package(
        &[
            heading(1, "Intro"),
            para("x"),
            heading(1, "Cost Sharing Features"),
            para("details"),
            heading(1, "Next"),
        ],
        true,
    );

    let (range, doc) = extract(&bytes, "Cost Sharing Features");
    assert_eq!(range, Some(SectionRange { start: 2, end: 3 }));
    assert_eq!(summary(&doc), vec!["[TOC]", "Cost Sharing Features", "details"]);
    assert!(doc.document().has_section_properties());
}

#[test]
fn test_subheadings_stay_inside_section() {
    let bytes = package(
        &[
            heading(1, "Cost Sharing Features"),
            heading(2, "Deductible"),
            para("$500"),
            heading(2, "Copays"),
            para("$20"),
            heading(1, "Exclusions"),
            para("cosmetic"),
        ],
        true,
    );

    let (_, doc) = extract(&bytes, "cost sharing features:");
    assert_eq!(
        summary(&doc),
        vec!["[TOC]", "Cost Sharing Features", "Deductible", "$500", "Copays", "$20"]
    );
}

#[test]
fn test_section_runs_to_end_of_document() {
    let bytes = package(
        &[
            heading(1, "Overview"),
            heading(2, "Cost Sharing Features"),
            para("a"),
            heading(3, "Detail"),
            para("b"),
        ],
        true,
    );

    let (range, doc) = extract(&bytes, "  Cost Sharing Features  ");
    assert_eq!(range, Some(SectionRange { start: 1, end: 4 }));
    assert_eq!(summary(&doc).len(), 5);
}

#[test]
fn test_table_kept_verbatim() {
    let grid = table(&["Service", "Copay"]);
    let bytes = package(
        &[heading(1, "Cost Sharing Features"), grid.clone(), heading(1, "Next")],
        true,
    );

    let (_, doc) = extract(&bytes, "Cost Sharing Features");
    assert_eq!(summary(&doc), vec!["[TOC]", "Cost Sharing Features", "[table]"]);
    let kept = doc.document().blocks().nth(2);
    match kept {
        Some(Block::Table(t)) => assert_eq!(t.xml(), grid),
        other => panic!("Expected table, got {other:?}"),
    }
}

#[test]
fn test_header_absent_leaves_package_unchanged() {
    let body = [heading(1, "Benefits"), para("text")];
    let mut doc = WordDocument::from_bytes(&package(&body, true)).unwrap();

    let range = SectionExtractor::default()
        .extract(doc.document_mut())
        .unwrap();
    assert!(range.is_none());
    assert_eq!(doc.document().to_xml(), document_xml(&body));
}

// =============================================================================
// Restyling
// =============================================================================

#[test]
fn test_saved_paragraphs_carry_profile() {
    let bytes = package(&[heading(1, "Cost Sharing Features"), para("details")], true);
    let (_, doc) = extract(&bytes, "Cost Sharing Features");

    let paras: Vec<_> = doc
        .document()
        .blocks()
        .filter_map(|b| b.as_paragraph())
        .collect();
    let heading = paras[1];
    assert_eq!(heading.style_name.as_deref(), Some("Heading 1"));
    assert_eq!(heading.format.alignment, Some(Alignment::Center));
    assert_eq!(heading.format.indent_left, Some(363));
    assert_eq!(heading.format.indent_right, Some(465));
    assert_eq!(heading.format.space_before, Some(98));
    assert_eq!(heading.runs[0].bold, Some(true));
    assert_eq!(heading.runs[0].size, Some(48));
    assert_eq!(heading.runs[0].font.as_deref(), Some("Arial"));

    let body = paras[2];
    assert_eq!(body.format.alignment, Some(Alignment::Left));
    assert_eq!(body.runs[0].size, Some(24));
    assert_eq!(body.runs[0].color.as_deref(), Some("000000"));
}

#[test]
fn test_toc_instruction_written() {
    let bytes = package(&[heading(1, "Cost Sharing Features")], true);
    let mut doc = WordDocument::from_bytes(&bytes).unwrap();
    SectionExtractor::new("Cost Sharing Features")
        .extract(doc.document_mut())
        .unwrap();

    let xml = saved_document_xml(&mut doc);
    assert!(xml.contains(r#"w:instr="TOC \o &quot;1-3&quot; \h \z \u""#));
    let toc = xml.find("w:fldSimple").unwrap();
    let heading = xml.find("Cost Sharing Features").unwrap();
    assert!(toc < heading);
}

// =============================================================================
// Files on disk
// =============================================================================

#[test]
fn test_save_and_reopen_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("plan.docx");
    let output = dir.path().join("plan-out.docx");
    std::fs::write(
        &input,
        package(
            &[
                para("cover"),
                heading(2, "Cost Sharing Features"),
                para("details"),
                heading(2, "Limits"),
            ],
            true,
        ),
    )
    .unwrap();

    let mut doc = WordDocument::open(&input).unwrap();
    let range = SectionExtractor::new("Cost Sharing Features")
        .extract(doc.document_mut())
        .unwrap();
    assert_eq!(range, Some(SectionRange { start: 1, end: 2 }));
    doc.save(&output).unwrap();

    let reopened = WordDocument::open(&output).unwrap();
    assert_eq!(summary(&reopened), vec!["[TOC]", "Cost Sharing Features", "details"]);
}

#[test]
fn test_document_without_styles_part() {
    let bytes = package(
        &[
            heading(1, "Cost Sharing Features"),
            para("a"),
            heading(1, "Other"),
        ],
        false,
    );

    // Style IDs stand in for names; `Heading1` still reads as level 1
    let (range, _) = extract(&bytes, "Cost Sharing Features");
    assert_eq!(range, Some(SectionRange { start: 0, end: 1 }));
}
