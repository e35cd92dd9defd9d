//! A DOCX package opened for editing

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use crate::archive::{OoxmlArchive, DOCUMENT_PART};
use crate::document::Document;
use crate::error::Result;
use crate::styles::StyleSheet;

/// An opened DOCX file: the package plus its parsed body.
///
/// The body is parsed once on open; saving writes the (possibly modified)
/// body back and leaves every other part as it was.
#[derive(Debug)]
pub struct WordDocument {
    archive: OoxmlArchive,
    document: Document,
}

impl WordDocument {
    /// Open a DOCX file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_archive(OoxmlArchive::open(path)?)
    }

    /// Open from any reader that implements Read + Seek
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::from_archive(OoxmlArchive::from_reader(reader)?)
    }

    /// Open from in-memory DOCX bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    /// Parse the body of an unpacked archive
    pub fn from_archive(archive: OoxmlArchive) -> Result<Self> {
        let styles = match archive.styles_xml() {
            Some(xml) => StyleSheet::parse(xml)?,
            None => StyleSheet::default(),
        };
        let document = Document::parse_with_styles(archive.document_xml()?, &styles)?;
        Ok(Self { archive, document })
    }

    /// The parsed body
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access to the parsed body
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// The underlying package
    pub fn archive(&self) -> &OoxmlArchive {
        &self.archive
    }

    /// Write the document to a file
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.sync_body();
        self.archive.write_to_file(path)
    }

    /// Write the document to an in-memory DOCX
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.sync_body();
        let mut buffer = Cursor::new(Vec::new());
        self.archive.write_to(&mut buffer)?;
        Ok(buffer.into_inner())
    }

    fn sync_body(&mut self) {
        self.archive.set_string(DOCUMENT_PART, self.document.to_xml());
    }
}
