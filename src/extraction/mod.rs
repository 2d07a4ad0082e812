/*!
 * Document resource extraction.
 *
 * - `segmenter`: splits document text into unit segments
 * - `matcher`: finds video and game embeds inside one segment
 * - `providers`: the ordered provider table driving classification
 */

use indexmap::IndexMap;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::errors::ExtractionError;

pub mod matcher;
pub mod providers;
pub mod segmenter;

pub use matcher::{MatchedResources, match_resources, match_resources_into};
pub use providers::{ProviderSpec, ProviderTable, ResourceKind};
pub use segmenter::{Segmentation, SegmentationStrategy, Segmenter, UnitSegment, book_from_document_name};

/// One embedded video or game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedResource {
    pub title: String,
    pub id: String,
    pub url: String,
    pub embed: String,
}

pub type VideoResource = EmbedResource;
pub type GameResource = EmbedResource;

/// Everything found for one unit; the unit id is the key it is stored under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub videos: Vec<VideoResource>,
    #[serde(default)]
    pub games: Vec<GameResource>,
}

impl UnitRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            book_id: None,
            title: title.into(),
            videos: Vec::new(),
            games: Vec::new(),
        }
    }
}

/// Unit id → record, in document order
pub type UnitMap = IndexMap<String, UnitRecord>;

/// Result of extracting one document
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    pub strategy: SegmentationStrategy,
    pub units: UnitMap,
}

impl ExtractionResult {
    pub fn total_videos(&self) -> usize {
        self.units.values().map(|u| u.videos.len()).sum()
    }

    pub fn total_games(&self) -> usize {
        self.units.values().map(|u| u.games.len()).sum()
    }

    /// Give `book_id` to every unit whose header did not name one
    pub fn assign_default_book(&mut self, book_id: &str) {
        for record in self.units.values_mut().filter(|r| r.book_id.is_none()) {
            record.book_id = Some(book_id.to_string());
        }
    }

    pub fn units_without_book(&self) -> usize {
        self.units.values().filter(|r| r.book_id.is_none()).count()
    }
}

/// Key used when units of several books share one map
pub fn namespaced_key(book_id: &str, unit_id: &str) -> String {
    format!("book{}_unit{}", book_id, unit_id)
}

/// Segmenter and provider table applied together
#[derive(Debug, Clone, Default)]
pub struct ResourceExtractor {
    segmenter: Segmenter,
    providers: ProviderTable,
}

impl ResourceExtractor {
    pub fn new(segmenter: Segmenter, providers: ProviderTable) -> Self {
        Self { segmenter, providers }
    }

    /// Build from a header regex, fallback marker and provider rows
    pub fn from_parts(
        header_pattern: &str,
        fallback_marker: &str,
        providers: &[ProviderSpec],
    ) -> Result<Self, ExtractionError> {
        Ok(Self {
            segmenter: Segmenter::new(header_pattern, fallback_marker)?,
            providers: ProviderTable::new(providers)?,
        })
    }

    /// Extract all units of one document's text
    pub fn extract(&self, text: &str) -> ExtractionResult {
        let segmentation = self.segmenter.segment(text);
        let mut units = UnitMap::new();

        for segment in segmentation.segments {
            if let Some(existing) = units.get_mut(&segment.unit_id) {
                warn!(
                    "Unit {} appears more than once, appending its resources to the first occurrence",
                    segment.unit_id
                );
                let mut matched = MatchedResources {
                    videos: std::mem::take(&mut existing.videos),
                    games: std::mem::take(&mut existing.games),
                };
                match_resources_into(&segment.content, &self.providers, &mut matched);
                existing.videos = matched.videos;
                existing.games = matched.games;
                continue;
            }

            let matched = match_resources(&segment.content, &self.providers);
            debug!(
                "Unit {}: {} video(s), {} game(s)",
                segment.unit_id,
                matched.videos.len(),
                matched.games.len()
            );
            units.insert(
                segment.unit_id,
                UnitRecord {
                    book_id: segment.book_id,
                    title: segment.title,
                    videos: matched.videos,
                    games: matched.games,
                },
            );
        }

        let result = ExtractionResult {
            strategy: segmentation.strategy,
            units,
        };
        info!(
            "Extracted {} unit(s), {} video(s), {} game(s)",
            result.units.len(),
            result.total_videos(),
            result.total_games()
        );
        result
    }
}

/// Book id → units of that book, both in first-seen order
pub type BookMap = IndexMap<String, UnitMap>;

/// Group several documents' units by book
///
/// Units without a book id in their header take `default_book`; when neither
/// is known the unit is skipped with a warning. A unit id seen twice for the
/// same book keeps the later record.
pub fn group_by_book<'a, I>(documents: I, default_book: Option<&str>) -> BookMap
where
    I: IntoIterator<Item = &'a ExtractionResult>,
{
    let mut books = BookMap::new();

    for document in documents {
        for (unit_id, record) in &document.units {
            let mut record = record.clone();
            if record.book_id.is_none() {
                record.book_id = default_book.map(|b| b.to_string());
            }

            let Some(book_id) = record.book_id.clone() else {
                warn!("Unit {} has no book id, skipping it", unit_id);
                continue;
            };

            let units = books.entry(book_id.clone()).or_default();
            if units.contains_key(unit_id) {
                warn!(
                    "Duplicate unit {} across documents, later one wins",
                    namespaced_key(&book_id, unit_id)
                );
            }
            units.insert(unit_id.clone(), record);
        }
    }

    books
}
