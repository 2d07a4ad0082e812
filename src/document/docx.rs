/*!
 * DOCX text loading.
 *
 * A DOCX file is a zip container; the body lives in `word/document.xml`.
 * Each `w:p` element becomes one paragraph of plain text. Run text comes
 * from `w:t`, run-level `w:tab` becomes a tab and `w:br`/`w:cr` a newline.
 */

use quick_xml::Reader;
use quick_xml::events::Event;
use std::io::{Cursor, Read};
use std::path::Path;

use crate::errors::DocumentError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Plain-text view of a DOCX body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocxDocument {
    pub paragraphs: Vec<String>,
}

impl DocxDocument {
    /// Parse a DOCX held in memory
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocumentError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
        let mut part = archive
            .by_name(DOCUMENT_PART)
            .map_err(|_| DocumentError::MissingPart(DOCUMENT_PART.to_string()))?;

        let mut xml = String::new();
        part.read_to_string(&mut xml)
            .map_err(|e| DocumentError::InvalidContainer(e.to_string()))?;

        Ok(Self {
            paragraphs: parse_document_xml(&xml)?,
        })
    }

    /// Read and parse a DOCX file from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        let bytes = std::fs::read(path.as_ref()).map_err(|e| {
            DocumentError::InvalidContainer(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::from_bytes(&bytes)
    }

    /// Paragraphs joined by newlines
    pub fn full_text(&self) -> String {
        self.paragraphs.join("\n")
    }
}

/// Collect paragraph texts from `word/document.xml`
pub fn parse_document_xml(xml: &str) -> Result<Vec<String>, DocumentError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    // Text boxes nest paragraphs inside paragraphs
    let mut open: Vec<String> = Vec::new();
    let mut run_depth = 0usize;
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => open.push(String::new()),
                b"r" => run_depth += 1,
                b"t" if run_depth > 0 => in_text = true,
                _ => {}
            },
            Event::Empty(e) => {
                if run_depth > 0 {
                    if let Some(current) = open.last_mut() {
                        match e.local_name().as_ref() {
                            b"tab" => current.push('\t'),
                            b"br" | b"cr" => current.push('\n'),
                            _ => {}
                        }
                    }
                } else if e.local_name().as_ref() == b"p" {
                    paragraphs.push(String::new());
                }
            }
            Event::Text(e) if in_text => {
                if let Some(current) = open.last_mut() {
                    let text = e.unescape().map_err(|err| DocumentError::Xml(err.to_string()))?;
                    current.push_str(&text);
                }
            }
            Event::CData(e) if in_text => {
                if let Some(current) = open.last_mut() {
                    current.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"p" => {
                    if let Some(done) = open.pop() {
                        paragraphs.push(done);
                    }
                }
                b"r" => run_depth = run_depth.saturating_sub(1),
                b"t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}
