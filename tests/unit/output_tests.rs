/*!
 * Tests for TSX template planning over extracted books
 */

use teachres::extraction::{ResourceExtractor, group_by_book};
use teachres::output::{plan_files, resources_summary};
use crate::common;

#[test]
fn test_plan_files_withTwoBooks_shouldOrderByBookThenUnit() {
    let extractor = ResourceExtractor::default();
    let book0a = extractor.extract("VISUAL 0A - UNIT 1 - Hello\nVISUAL 0A - UNIT 2 - Colours\n");
    let book1 = extractor.extract(&common::scenario_paragraphs().join("\n"));

    let books = group_by_book([&book0a, &book1], None);
    let lesson_books = vec!["0a".to_string(), "0b".to_string(), "0c".to_string()];
    let files = plan_files(&books, &lesson_books);

    let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec![
        "book0A-resources-common.tsx",
        "book0A-unit1-resources.tsx",
        "book0A-unit1-implementation.tsx",
        "book0A-unit2-resources.tsx",
        "book0A-unit2-implementation.tsx",
        "book1-resources-common.tsx",
        "book1-unit3-resources.tsx",
        "book1-unit4-resources.tsx",
    ]);

    let only_if_absent: Vec<&str> = files
        .iter()
        .filter(|f| f.only_if_absent)
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(only_if_absent, vec!["book0A-resources-common.tsx", "book1-resources-common.tsx"]);
}

#[test]
fn test_plan_files_withScenario_shouldRenderEmbedIds() {
    let result = ResourceExtractor::default().extract(&common::scenario_paragraphs().join("\n"));
    let books = group_by_book([&result], None);
    let files = plan_files(&books, &[]);

    let unit3 = files
        .iter()
        .find(|f| f.name == "book1-unit3-resources.tsx")
        .expect("unit 3 file");
    assert!(unit3.contents.contains("'abc123'"));
    assert!(unit3.contents.contains("'https://wordwall.net/embed/xyz789'"));
    assert!(unit3.contents.contains("export const book1Unit3Resources"));

    let unit4 = files
        .iter()
        .find(|f| f.name == "book1-unit4-resources.tsx")
        .expect("unit 4 file");
    assert!(!unit4.contents.contains("createBook1VideoResource("));
}

#[test]
fn test_resources_summary_withScenario_shouldKeepEmbedCode() {
    let result = ResourceExtractor::default().extract(&common::scenario_paragraphs().join("\n"));
    let books = group_by_book([&result], None);
    let summary = resources_summary(&books);

    let keys: Vec<&str> = summary.keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, vec!["book1_unit3", "book1_unit4"]);

    let unit3 = &summary["book1_unit3"];
    assert_eq!(unit3.title, "Animals");
    assert_eq!(unit3.resources[0].embed_code, common::youtube_embed("abc123"));
    assert_eq!(unit3.resources[1].url, "https://wordwall.net/resource/xyz789");
    assert!(summary["book1_unit4"].resources.is_empty());
}
