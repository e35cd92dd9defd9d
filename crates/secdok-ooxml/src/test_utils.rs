//! Shared test utilities for secdok-ooxml
//!
//! Builds small but valid DOCX packages in memory.

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;
use zip::ZipWriter;

use crate::archive::OoxmlArchive;
use crate::xml::escape_xml;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
</Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal">
    <w:name w:val="Normal"/>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Heading1">
    <w:name w:val="heading 1"/>
    <w:basedOn w:val="Normal"/>
    <w:pPr><w:outlineLvl w:val="0"/></w:pPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Heading2">
    <w:name w:val="heading 2"/>
    <w:basedOn w:val="Normal"/>
    <w:pPr><w:outlineLvl w:val="1"/></w:pPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Heading3">
    <w:name w:val="heading 3"/>
    <w:basedOn w:val="Normal"/>
    <w:pPr><w:outlineLvl w:val="2"/></w:pPr>
  </w:style>
</w:styles>"#;

const SECTION_PROPERTIES: &str =
    r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440"/></w:sectPr>"#;

/// Builder for in-memory DOCX fixtures
///
/// ```ignore
/// use secdok_ooxml::test_utils::DocxBuilder;
/// let bytes = DocxBuilder::new()
///     .heading(1, "Cost Sharing Features")
///     .paragraph("Deductible")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct DocxBuilder {
    body: String,
    styles: bool,
    section_properties: bool,
}

impl Default for DocxBuilder {
    fn default() -> Self {
        Self {
            body: String::new(),
            styles: true,
            section_properties: true,
        }
    }
}

impl DocxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a paragraph styled `Heading{level}`
    pub fn heading(mut self, level: u32, text: &str) -> Self {
        self.body.push_str(&heading_xml(level, text));
        self
    }

    /// Append an unstyled paragraph
    pub fn paragraph(mut self, text: &str) -> Self {
        self.body.push_str(&paragraph_xml(text));
        self
    }

    /// Append a one-row table with one cell per entry
    pub fn table(mut self, cells: &[&str]) -> Self {
        self.body.push_str(&table_xml(cells));
        self
    }

    /// Append raw body XML
    pub fn raw(mut self, xml: &str) -> Self {
        self.body.push_str(xml);
        self
    }

    /// Leave out word/styles.xml
    pub fn without_styles(mut self) -> Self {
        self.styles = false;
        self
    }

    /// Leave out the trailing `w:sectPr`
    pub fn without_section_properties(mut self) -> Self {
        self.section_properties = false;
        self
    }

    /// The word/document.xml this builder produces
    pub fn document_xml(&self) -> String {
        let sect_pr = if self.section_properties {
            SECTION_PROPERTIES
        } else {
            ""
        };
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}{}</w:body></w:document>"#,
            self.body, sect_pr
        )
    }

    /// Zip the package
    pub fn build(&self) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(&mut buffer);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        let mut parts = vec![
            ("[Content_Types].xml", CONTENT_TYPES.to_string()),
            ("_rels/.rels", PACKAGE_RELS.to_string()),
            ("word/_rels/document.xml.rels", DOCUMENT_RELS.to_string()),
            ("word/document.xml", self.document_xml()),
        ];
        if self.styles {
            parts.push(("word/styles.xml", STYLES.to_string()));
        }

        for (name, contents) in parts {
            zip.start_file(name, options).unwrap();
            zip.write_all(contents.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
        buffer.into_inner()
    }
}

/// A heading paragraph referencing style `Heading{level}`
pub fn heading_xml(level: u32, text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:pStyle w:val="Heading{level}"/></w:pPr><w:r><w:t>{}</w:t></w:r></w:p>"#,
        escape_xml(text)
    )
}

/// A plain paragraph with one run
pub fn paragraph_xml(text: &str) -> String {
    format!(
        r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        escape_xml(text)
    )
}

/// A one-row table
pub fn table_xml(cells: &[&str]) -> String {
    let row: String = cells
        .iter()
        .map(|cell| format!("<w:tc>{}</w:tc>", paragraph_xml(cell)))
        .collect();
    format!(
        r#"<w:tbl><w:tblPr><w:tblStyle w:val="TableGrid"/></w:tblPr><w:tr>{row}</w:tr></w:tbl>"#
    )
}

/// Extract document.xml content from a DOCX byte array
pub fn extract_document_xml(docx: &[u8]) -> String {
    let archive = OoxmlArchive::from_reader(Cursor::new(docx)).unwrap();
    archive.get_string("word/document.xml").unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_package_parts() {
        let docx = DocxBuilder::new().paragraph("a").build();
        let archive = OoxmlArchive::from_reader(Cursor::new(&docx)).unwrap();

        assert!(archive.contains("[Content_Types].xml"));
        assert!(archive.contains("_rels/.rels"));
        assert!(archive.contains("word/styles.xml"));
        assert!(archive.contains("word/document.xml"));
    }

    #[test]
    fn test_builder_body_order() {
        let xml = DocxBuilder::new()
            .heading(1, "A & B")
            .table(&["x"])
            .without_section_properties()
            .document_xml();

        assert!(xml.contains("A &amp; B"));
        let heading = xml.find("Heading1").unwrap();
        let table = xml.find("<w:tbl>").unwrap();
        assert!(heading < table);
        assert!(!xml.contains("sectPr"));
    }

    #[test]
    fn test_without_styles() {
        let docx = DocxBuilder::new().without_styles().build();
        let archive = OoxmlArchive::from_reader(Cursor::new(&docx)).unwrap();
        assert!(archive.styles_xml().is_none());
        assert!(extract_document_xml(&docx).contains("<w:body>"));
    }
}
