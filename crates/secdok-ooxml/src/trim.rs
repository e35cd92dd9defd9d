//! Trimming a document down to one section

use tracing::{debug, warn};

use crate::document::{BodyChild, Document};
use crate::section::{locate, SectionRange};

/// Trim `document` to the section headed by `target_header`.
///
/// Returns the located range, or `None` (document untouched) when the
/// header is not present.
pub fn trim_to_section(document: &mut Document, target_header: &str) -> Option<SectionRange> {
    let Some(range) = locate(document.blocks(), target_header) else {
        debug!(header = target_header, "section header not found");
        return None;
    };
    debug!(
        start = range.start,
        end = range.end,
        blocks = document.block_count(),
        "located section"
    );
    retain_range(document, range);
    Some(range)
}

/// Trim `document` to the section headed by `target_header`; true iff the
/// section was found and the document changed.
pub fn trim(document: &mut Document, target_header: &str) -> bool {
    trim_to_section(document, target_header).is_some()
}

/// Keep only the blocks inside `range`.
///
/// A trailing section properties record is always kept as the last child.
/// Non-block children survive only between the first and last retained
/// block. A leading empty paragraph left over after trimming is dropped.
pub fn retain_range(document: &mut Document, range: SectionRange) {
    let block_positions: Vec<usize> = document
        .children
        .iter()
        .enumerate()
        .filter(|(_, child)| child.as_block().is_some())
        .map(|(i, _)| i)
        .collect();

    let (Some(&first), Some(&last)) = (
        block_positions.get(range.start),
        block_positions.get(range.end),
    ) else {
        warn!(
            start = range.start,
            end = range.end,
            blocks = block_positions.len(),
            "section range outside document, leaving it untouched"
        );
        return;
    };

    let mut children = std::mem::take(&mut document.children);
    let section_properties = match children.last() {
        Some(BodyChild::SectionProperties(_)) => children.pop(),
        _ => None,
    };

    let mut retained: Vec<BodyChild> = children
        .into_iter()
        .enumerate()
        .filter(|(i, _)| (first..=last).contains(i))
        .map(|(_, child)| child)
        .collect();
    retained.extend(section_properties);

    if let Some(BodyChild::Paragraph(p)) = retained.first() {
        if p.text().is_empty() {
            retained.remove(0);
        }
    }

    document.children = retained;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Block;

    fn heading(level: u32, text: &str) -> String {
        format!(r#"<w:p><w:pPr><w:pStyle w:val="Heading {level}"/></w:pPr><w:r><w:t>{text}</w:t></w:r></w:p>"#)
    }

    fn body(text: &str) -> String {
        format!("<w:p><w:r><w:t>{text}</w:t></w:r></w:p>")
    }

    fn document(children: &[String]) -> Document {
        let xml = format!(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}<w:sectPr><w:pgSz w:w="12240" w:h="15840"/></w:sectPr></w:body></w:document>"#,
            children.concat()
        );
        Document::parse(xml.as_bytes()).unwrap()
    }

    fn texts(doc: &Document) -> Vec<String> {
        doc.blocks()
            .map(|b| match b {
                Block::Paragraph(p) => p.text(),
                Block::Table(_) => "<table>".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_trim_to_sibling_heading() {
        let mut doc = document(&[
            heading(1, "Intro"),
            body("x"),
            heading(1, "Cost Sharing Features"),
            body("details"),
            heading(1, "Next"),
        ]);

        let range = trim_to_section(&mut doc, "Cost Sharing Features:");
        assert_eq!(range, Some(SectionRange { start: 2, end: 3 }));
        assert_eq!(texts(&doc), vec!["Cost Sharing Features", "details"]);
        assert!(doc.has_section_properties());
        assert_eq!(doc.children().len(), 3);
    }

    #[test]
    fn test_trim_not_found_leaves_document_untouched() {
        let mut doc = document(&[heading(1, "Intro"), body("x")]);
        let before = doc.to_xml();

        assert!(!trim(&mut doc, "Cost Sharing Features"));
        assert_eq!(doc.to_xml(), before);
    }

    #[test]
    fn test_trim_keeps_deeper_headings() {
        let mut doc = document(&[
            heading(1, "Cost Sharing Features"),
            heading(2, "Deductible"),
            body("500"),
            heading(1, "Limitations"),
        ]);
        assert!(trim(&mut doc, "cost sharing features"));
        assert_eq!(
            texts(&doc),
            vec!["Cost Sharing Features", "Deductible", "500"]
        );
    }

    #[test]
    fn test_trim_preserves_tables_verbatim() {
        let table = r#"<w:tbl><w:tblPr><w:tblStyle w:val="TableGrid"/></w:tblPr><w:tr><w:tc><w:p><w:r><w:t>Copay</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#;
        let mut doc = document(&[
            heading(1, "Cost Sharing Features"),
            table.to_string(),
            heading(1, "Next"),
        ]);
        assert!(trim(&mut doc, "Cost Sharing Features"));
        let kept = doc.blocks().nth(1);
        match kept {
            Some(Block::Table(t)) => assert_eq!(t.xml(), table),
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn test_retrim_spans_whole_document() {
        let mut doc = document(&[
            body("cover"),
            heading(2, "Cost Sharing Features"),
            heading(3, "Copays"),
            body("20"),
            heading(2, "Exclusions"),
        ]);
        assert!(trim(&mut doc, "Cost Sharing Features"));
        let count = doc.block_count();
        assert_eq!(
            locate(doc.blocks(), "Cost Sharing Features"),
            Some(SectionRange {
                start: 0,
                end: count - 1
            })
        );
    }

    #[test]
    fn test_leading_empty_paragraph_removed() {
        // An empty target matches the first empty paragraph
        let mut doc = document(&[body("x"), "<w:p/>".to_string(), body("y")]);
        assert!(trim(&mut doc, ""));
        assert_eq!(texts(&doc), vec!["y"]);
        assert!(doc.has_section_properties());
    }

    #[test]
    fn test_interleaved_elements_kept_inside_range_only() {
        let mut doc = document(&[
            r#"<w:bookmarkStart w:id="1" w:name="before"/>"#.to_string(),
            heading(1, "Cost Sharing Features"),
            r#"<w:bookmarkStart w:id="2" w:name="inside"/>"#.to_string(),
            body("details"),
            r#"<w:bookmarkEnd w:id="2"/>"#.to_string(),
            heading(1, "Next"),
        ]);
        assert!(trim(&mut doc, "Cost Sharing Features"));
        let xml = doc.to_xml();
        assert!(!xml.contains("before"));
        assert!(xml.contains("inside"));
        // bookmarkEnd sits after the last retained block
        assert!(!xml.contains("bookmarkEnd"));
    }

    #[test]
    fn test_document_without_section_properties() {
        let xml = format!(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}{}</w:body></w:document>"#,
            heading(1, "Cost Sharing Features"),
            body("a")
        );
        let mut doc = Document::parse(xml.as_bytes()).unwrap();
        assert!(trim(&mut doc, "Cost Sharing Features"));
        assert!(!doc.has_section_properties());
        assert_eq!(doc.block_count(), 2);
    }

    #[test]
    fn test_out_of_range_is_ignored() {
        let mut doc = document(&[body("a")]);
        let before = doc.to_xml();
        retain_range(&mut doc, SectionRange { start: 0, end: 4 });
        assert_eq!(doc.to_xml(), before);
    }
}
