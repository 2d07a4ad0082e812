/*!
 * Tests for unit segmentation and resource matching
 */

use teachres::extraction::{
    ProviderSpec, ProviderTable, ResourceExtractor, ResourceKind, SegmentationStrategy, Segmenter, match_resources,
};
use teachres::extraction::segmenter::{DEFAULT_FALLBACK_MARKER, DEFAULT_HEADER_PATTERN};
use crate::common;

fn scenario_text() -> String {
    common::scenario_paragraphs().join("\n")
}

/// Two headers, one video and one game inside the first unit
#[test]
fn test_extract_withScenario_shouldMatchExpectedJson() {
    let result = ResourceExtractor::default().extract(&scenario_text());
    assert_eq!(result.strategy, SegmentationStrategy::Primary);

    let json = serde_json::to_value(&result.units).unwrap();
    assert_eq!(json["3"]["title"], "Animals");
    assert_eq!(json["3"]["videos"][0]["id"], "abc123");
    assert_eq!(json["3"]["videos"][0]["title"], "1 VIDEO Farm animals");
    assert_eq!(json["3"]["videos"][0]["url"], "https://www.youtube.com/watch?v=abc123");
    assert_eq!(json["3"]["games"][0]["id"], "xyz789");
    assert_eq!(json["3"]["games"][0]["title"], "ONLINE GAME Animals");
    assert_eq!(json["4"]["title"], "Food");
    assert_eq!(json["4"]["videos"].as_array().unwrap().len(), 0);
    assert_eq!(json["4"]["games"].as_array().unwrap().len(), 0);
    assert_eq!(json["3"]["book_id"], "1");

    let keys: Vec<&String> = result.units.keys().collect();
    assert_eq!(keys, vec!["3", "4"]);
}

#[test]
fn test_segment_withNHeaders_shouldCoverTextWithoutOverlap() {
    let segmenter = Segmenter::default();
    let mut text = String::from("Intro before any unit\n");
    for unit in 1..=6 {
        text.push_str(&format!("VISUAL 2 - UNIT {} - Topic {}\nline a\nline b\n", unit, unit));
    }

    let segmentation = segmenter.segment(&text);
    assert_eq!(segmentation.strategy, SegmentationStrategy::Primary);
    assert_eq!(segmentation.segments.len(), 6);

    for (index, segment) in segmentation.segments.iter().enumerate() {
        assert_eq!(segment.unit_id, (index + 1).to_string());
        assert_eq!(segment.title, format!("Topic {}", index + 1));
        assert_eq!(segment.content, "\nline a\nline b\n");
        assert!(!segment.content.contains("UNIT"));
    }
}

#[test]
fn test_segment_withoutHeaders_shouldReportFallback() {
    let segmenter = Segmenter::new(DEFAULT_HEADER_PATTERN, DEFAULT_FALLBACK_MARKER).unwrap();
    let text = format!("BOOK ONE - UNIT 2 - Toys\n{}\n", common::youtube_embed("toy1"));

    let result = ResourceExtractor::new(segmenter, ProviderTable::default()).extract(&text);

    assert_eq!(result.strategy, SegmentationStrategy::Fallback);
    assert_eq!(result.units["2"].title, "Toys");
    assert_eq!(result.units["2"].videos[0].id, "toy1");
}

/// A snippet with a provider marker always lands in that provider's list
#[test]
fn test_match_resources_withMarkers_shouldNeverCrossKinds() {
    let table = ProviderTable::default();
    let ids = ["a1", "B_2", "c-3", "d4d4d4"];

    for id in ids {
        let video = match_resources(&common::youtube_embed(id), &table);
        assert_eq!(video.videos.len(), 1);
        assert!(video.games.is_empty());
        assert_eq!(video.videos[0].id, id);

        let game = match_resources(&common::wordwall_embed(id), &table);
        assert_eq!(game.games.len(), 1);
        assert!(game.videos.is_empty());
        assert!(!game.games[0].id.is_empty());
    }
}

#[test]
fn test_match_resources_withCustomProvider_shouldUseTableRow() {
    let mut specs = ProviderSpec::defaults();
    specs.push(ProviderSpec {
        kind: ResourceKind::Video,
        name: "Vimeo".to_string(),
        url_marker: "player.vimeo.com/video".to_string(),
        cue_words: vec!["VIMEO".to_string()],
        canonical_url: "https://vimeo.com/{id}".to_string(),
        placeholder: "Clip".to_string(),
    });
    let table = ProviderTable::new(&specs).unwrap();

    let content = r#"<iframe src="https://player.vimeo.com/video/76979871?h=8272103f6e"></iframe>"#;
    let matched = match_resources(content, &table);

    assert_eq!(matched.videos.len(), 1);
    assert_eq!(matched.videos[0].id, "76979871");
    assert_eq!(matched.videos[0].url, "https://vimeo.com/76979871");
    assert_eq!(matched.videos[0].title, "Clip 1");
}

#[test]
fn test_extract_withEmptyDocument_shouldReturnNoUnits() {
    let result = ResourceExtractor::default().extract("");
    assert!(result.units.is_empty());
    assert_eq!(result.total_videos(), 0);
    assert_eq!(result.total_games(), 0);
}
