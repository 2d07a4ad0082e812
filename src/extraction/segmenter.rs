/*!
 * Unit segmentation of resource documents.
 *
 * The primary path finds every unit header with the configured regex and
 * cuts the text between consecutive headers. When the regex finds nothing,
 * a looser line scan accumulates lines after any line carrying the marker
 * substring. The two paths can disagree on malformed documents, so the
 * result always records which one produced it.
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ExtractionError;

/// Default unit header: `VISUAL <book> - UNIT <n> - <title>`
pub const DEFAULT_HEADER_PATTERN: &str =
    r"VISUAL\s+(?P<book>\d+[A-Za-z]*)\s*-\s*UNIT\s+(?P<unit>\d+)\s*-\s*(?P<title>[^\n]+)";

/// Default marker substring for the fallback line scan
pub const DEFAULT_FALLBACK_MARKER: &str = "- UNIT";

static DEFAULT_HEADER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(DEFAULT_HEADER_PATTERN).expect("Invalid default header regex")
});

static FALLBACK_ID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"UNIT\s+(\d+)").expect("Invalid fallback unit id regex")
});

static FALLBACK_TITLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"UNIT\s+\d+\s*-\s*([^\n]+)").expect("Invalid fallback title regex")
});

static FALLBACK_BOOK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"VISUAL\s+(\d+[A-Za-z]*)").expect("Invalid fallback book regex")
});

/// Book id named in a document's file name, e.g. `VISUAL 0A - VIDEO FILMS GAMES.docx`
pub fn book_from_document_name(name: &str) -> Option<String> {
    FALLBACK_BOOK_REGEX
        .captures(name)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Which segmentation path produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentationStrategy {
    /// Header regex matched at least once
    Primary,
    /// Header regex matched nothing, the line scan was used
    Fallback,
}

/// One unit's slice of the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitSegment {
    pub book_id: Option<String>,
    pub unit_id: String,
    pub title: String,
    pub content: String,
}

/// Ordered segments plus the strategy that found them
#[derive(Debug, Clone)]
pub struct Segmentation {
    pub strategy: SegmentationStrategy,
    pub segments: Vec<UnitSegment>,
}

/// Splits document text into unit segments
#[derive(Debug, Clone)]
pub struct Segmenter {
    header: Regex,
    fallback_marker: String,
}

impl Segmenter {
    /// Build a segmenter from a header regex with `unit` and `title` groups
    pub fn new(header_pattern: &str, fallback_marker: &str) -> Result<Self, ExtractionError> {
        let header = Regex::new(header_pattern)
            .map_err(|e| ExtractionError::InvalidHeaderPattern(e.to_string()))?;

        let names: Vec<&str> = header.capture_names().flatten().collect();
        for required in ["unit", "title"] {
            if !names.contains(&required) {
                return Err(ExtractionError::InvalidHeaderPattern(format!(
                    "pattern must define a named group '{}'",
                    required
                )));
            }
        }

        if fallback_marker.trim().is_empty() {
            return Err(ExtractionError::InvalidHeaderPattern(
                "fallback marker must not be empty".to_string(),
            ));
        }

        Ok(Self {
            header,
            fallback_marker: fallback_marker.to_string(),
        })
    }

    /// Segment the full document text
    pub fn segment(&self, text: &str) -> Segmentation {
        let segments = self.segment_primary(text);
        if !segments.is_empty() {
            debug!("Header pattern found {} unit(s)", segments.len());
            return Segmentation {
                strategy: SegmentationStrategy::Primary,
                segments,
            };
        }

        let segments = self.segment_fallback(text);
        warn!(
            "No unit headers matched the primary pattern; line scan on '{}' found {} unit(s)",
            self.fallback_marker,
            segments.len()
        );
        Segmentation {
            strategy: SegmentationStrategy::Fallback,
            segments,
        }
    }

    /// Cut the text between consecutive header matches
    pub fn segment_primary(&self, text: &str) -> Vec<UnitSegment> {
        let headers: Vec<(usize, usize, Option<String>, Option<String>, String)> = self
            .header
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                Some((
                    whole.start(),
                    whole.end(),
                    caps.name("book").map(|m| m.as_str().to_string()),
                    caps.name("unit").map(|m| m.as_str().trim().to_string()),
                    caps.name("title").map(|m| m.as_str().trim().to_string()).unwrap_or_default(),
                ))
            })
            .collect();

        let mut segments = Vec::with_capacity(headers.len());
        for (i, (_, end, book_id, unit_id, title)) in headers.iter().enumerate() {
            let content_end = headers.get(i + 1).map_or(text.len(), |next| next.0);
            let unit_id = match unit_id {
                Some(id) if !id.is_empty() => id.clone(),
                _ => {
                    warn!("Unit header without a unit id, skipping: {}", title);
                    continue;
                }
            };

            segments.push(UnitSegment {
                book_id: book_id.clone(),
                unit_id,
                title: title.clone(),
                content: text[*end..content_end].to_string(),
            });
        }

        segments
    }

    /// Accumulate lines after each marker line
    pub fn segment_fallback(&self, text: &str) -> Vec<UnitSegment> {
        let mut segments = Vec::new();
        let mut current: Option<UnitSegment> = None;

        for line in text.lines() {
            let trimmed = line.trim();

            if trimmed.contains(&self.fallback_marker) {
                if let Some(done) = current.take() {
                    segments.push(done);
                }

                match FALLBACK_ID_REGEX.captures(trimmed).and_then(|c| c.get(1)) {
                    Some(id) => {
                        let title = FALLBACK_TITLE_REGEX
                            .captures(trimmed)
                            .and_then(|c| c.get(1))
                            .map(|m| m.as_str().trim().to_string())
                            .unwrap_or_else(|| "Unknown".to_string());
                        let book_id = FALLBACK_BOOK_REGEX
                            .captures(trimmed)
                            .and_then(|c| c.get(1))
                            .map(|m| m.as_str().to_string());

                        current = Some(UnitSegment {
                            book_id,
                            unit_id: id.as_str().to_string(),
                            title,
                            content: String::new(),
                        });
                    }
                    None => {
                        warn!("Marker line without a numeric unit id, dropping: {}", trimmed);
                    }
                }
            } else if let Some(segment) = current.as_mut() {
                segment.content.push_str(trimmed);
                segment.content.push('\n');
            }
        }

        if let Some(done) = current {
            segments.push(done);
        }

        segments
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self {
            header: DEFAULT_HEADER_REGEX.clone(),
            fallback_marker: DEFAULT_FALLBACK_MARKER.to_string(),
        }
    }
}
