/*!
 * Integration tests for controller runs over local and in-memory sources
 */

use anyhow::Result;
use teachres::app_config::Config;
use teachres::app_controller::Controller;
use teachres::audit::AuditStatus;
use teachres::file_utils::FileManager;
use teachres::storage::LocalSource;
use crate::common;
use crate::common::mock_source::MemorySource;

/// Test the controller initialization with default config
#[test]
fn test_controller_initialization_withDefaultConfig_shouldSucceed() -> Result<()> {
    let controller = Controller::new_for_test()?;
    assert_eq!(controller.config().storage.bucket, "visualenglishmaterial");
    Ok(())
}

#[test]
fn test_controller_withBrokenHeaderPattern_shouldFail() {
    let mut config = Config::default();
    config.extraction.header_pattern = "(".to_string();
    assert!(Controller::with_config(config).is_err());
}

#[tokio::test]
async fn test_run_resources_withLocalDocuments_shouldWriteTemplatesAndSummary() -> Result<()> {
    common::init_test_logging();
    let input = common::create_temp_dir()?;
    let output = common::create_temp_dir()?;
    common::create_test_docx(input.path(), "VISUAL 1.docx", &common::scenario_paragraphs())?;
    common::create_test_docx(input.path(), "VISUAL 0A.docx", &[
        "VISUAL 0A - UNIT 1 - Hello".to_string(),
        "SONG Hello song".to_string(),
        common::youtube_embed("hello1"),
    ])?;

    let controller = Controller::new_for_test()?;
    let source = LocalSource::new(input.path());
    let keys = vec!["VISUAL 0A.docx".to_string(), "VISUAL 1.docx".to_string()];
    let outcome = controller.run_resources(&source, &keys, output.path()).await?;

    assert_eq!(outcome.documents_processed, 2);
    assert_eq!(outcome.documents_failed, 0);
    assert_eq!(outcome.units, 3);
    // 2 common files, 3 unit files, 1 lesson plan for book 0A
    assert_eq!(outcome.files_written, 6);

    for name in [
        "book0A-resources-common.tsx",
        "book0A-unit1-resources.tsx",
        "book0A-unit1-implementation.tsx",
        "book1-resources-common.tsx",
        "book1-unit3-resources.tsx",
        "book1-unit4-resources.tsx",
        "resources-summary.json",
    ] {
        assert!(FileManager::file_exists(output.path().join(name)), "missing {}", name);
    }
    assert!(!FileManager::file_exists(output.path().join("book1-unit3-implementation.tsx")));

    let summary: serde_json::Value =
        serde_json::from_str(&FileManager::read_to_string(output.path().join("resources-summary.json"))?)?;
    assert_eq!(summary["book0A_unit1"]["resources"][0]["id"], "hello1");
    assert_eq!(summary["book1_unit3"]["resources"][1]["type"], "game");
    Ok(())
}

/// Common files are only created once; everything else is regenerated
#[tokio::test]
async fn test_run_resources_withExistingCommonFile_shouldKeepIt() -> Result<()> {
    let input = common::create_temp_dir()?;
    let output = common::create_temp_dir()?;
    common::create_test_docx(input.path(), "VISUAL 1.docx", &common::scenario_paragraphs())?;
    common::create_test_file(output.path(), "book1-resources-common.tsx", "// edited by hand")?;

    let controller = Controller::new_for_test()?;
    let source = LocalSource::new(input.path());
    let outcome = controller
        .run_resources(&source, &["VISUAL 1.docx".to_string()], output.path())
        .await?;

    assert_eq!(outcome.files_skipped, 1);
    assert_eq!(
        FileManager::read_to_string(output.path().join("book1-resources-common.tsx"))?,
        "// edited by hand"
    );
    Ok(())
}

#[tokio::test]
async fn test_run_resources_withOneBrokenDocument_shouldSkipIt() -> Result<()> {
    let input = common::create_temp_dir()?;
    let output = common::create_temp_dir()?;
    common::create_test_docx(input.path(), "good.docx", &common::scenario_paragraphs())?;
    common::create_test_file(input.path(), "broken.docx", "not a zip")?;

    let controller = Controller::new_for_test()?;
    let source = LocalSource::new(input.path());

    let keys = vec!["broken.docx".to_string(), "missing.docx".to_string(), "good.docx".to_string()];
    let outcome = controller.run_resources(&source, &keys, output.path()).await?;
    assert_eq!(outcome.documents_processed, 1);
    assert_eq!(outcome.documents_failed, 2);

    let only_broken = vec!["broken.docx".to_string()];
    assert!(controller.run_resources(&source, &only_broken, output.path()).await.is_err());
    assert!(controller.run_resources(&source, &[], output.path()).await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_run_resources_withLooseHeaders_shouldTakeBookFromDocumentName() -> Result<()> {
    let input = common::create_temp_dir()?;
    let output = common::create_temp_dir()?;
    let paragraphs = vec![
        "BOOK 2 - UNIT 5 - Colours".to_string(),
        common::youtube_embed("red1"),
    ];
    common::create_test_docx(input.path(), "VISUAL 2 - VIDEO FILMS GAMES.docx", &paragraphs)?;
    common::create_test_docx(input.path(), "colours.docx", &paragraphs)?;

    let controller = Controller::new_for_test()?;
    let source = LocalSource::new(input.path());
    let keys = vec!["VISUAL 2 - VIDEO FILMS GAMES.docx".to_string(), "colours.docx".to_string()];
    let outcome = controller.run_resources(&source, &keys, output.path()).await?;

    assert_eq!(outcome.documents_processed, 1);
    assert_eq!(outcome.documents_failed, 1);
    assert_eq!(outcome.units, 1);
    assert!(FileManager::file_exists(output.path().join("book2-unit5-resources.tsx")));

    let summary: serde_json::Value =
        serde_json::from_str(&FileManager::read_to_string(output.path().join("resources-summary.json"))?)?;
    assert_eq!(summary["book2_unit5"]["resources"][0]["id"], "red1");

    let only_loose = vec!["colours.docx".to_string()];
    assert!(controller.run_resources(&source, &only_loose, output.path()).await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_run_inventory_withExpectations_shouldWriteAudit() -> Result<()> {
    common::init_test_logging();
    let input = common::create_temp_dir()?;
    let output = common::create_temp_dir()?;
    common::create_test_docx(input.path(), "VISUAL 1.docx", &common::scenario_paragraphs())?;
    let expectations = common::create_test_file(
        input.path(),
        "expected.json",
        r#"{"3": {"videos": 1, "games": 1}, "4": {"videos": 2, "games": 0}}"#,
    )?;

    let controller = Controller::new_for_test()?;
    let source = LocalSource::new(input.path());
    let rows = controller
        .run_inventory(&source, "VISUAL 1.docx", output.path(), Some(expectations.as_path()))
        .await?;

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].status, AuditStatus::Complete);
    assert_eq!(rows[1].status, AuditStatus::Partial);

    let unit3: serde_json::Value =
        serde_json::from_str(&FileManager::read_to_string(output.path().join("unit3_resources.json"))?)?;
    assert_eq!(unit3["title"], "Animals");
    assert_eq!(unit3["videos"][0]["id"], "abc123");

    let summary: serde_json::Value =
        serde_json::from_str(&FileManager::read_to_string(output.path().join("resource_summary.json"))?)?;
    assert_eq!(summary["4"]["video_count"], 0);

    assert!(FileManager::file_exists(output.path().join("resource_audit.json")));
    Ok(())
}

#[tokio::test]
async fn test_run_inventory_withInvalidExpectations_shouldFailBeforeWriting() -> Result<()> {
    let input = common::create_temp_dir()?;
    let output = common::create_temp_dir()?;
    common::create_test_docx(input.path(), "VISUAL 1.docx", &common::scenario_paragraphs())?;
    let expectations = common::create_test_file(input.path(), "expected.json", "[1, 2")?;

    let controller = Controller::new_for_test()?;
    let source = LocalSource::new(input.path());
    let result = controller
        .run_inventory(&source, "VISUAL 1.docx", output.path(), Some(expectations.as_path()))
        .await;

    assert!(result.is_err());
    assert!(!FileManager::file_exists(output.path().join("resource_summary.json")));
    Ok(())
}

#[tokio::test]
async fn test_run_questions_withLocalDirectory_shouldUseLocalPaths() -> Result<()> {
    let input = common::create_temp_dir()?;
    common::create_test_file(input.path(), "01 I A Do you like apples.png", "")?;
    common::create_test_file(input.path(), "02_B_what-is_this.jpg", "")?;
    common::create_test_file(input.path(), "readme.txt", "")?;

    let controller = Controller::new_for_test()?;
    let source = LocalSource::new(input.path());
    let report = controller.run_questions(&source, "").await?;

    assert_eq!(report.total_processed, 2);
    assert_eq!(report.total_unprocessed, 0);
    assert_eq!(report.questions[0].question, "Do you like apples?");
    assert_eq!(report.questions[1].question, "What is this?");
    assert!(report.questions[0].s3_url.is_none());
    assert!(
        report.questions[0]
            .local_path
            .as_deref()
            .is_some_and(|p| p.ends_with("01 I A Do you like apples.png"))
    );
    Ok(())
}

#[tokio::test]
async fn test_run_questions_withRemoteFolder_shouldPresignAndSkipFolderKey() -> Result<()> {
    let source = MemorySource::new()
        .with_object("book3/unit2/", b"")
        .with_object("book3/unit2/05 C Can you swim.png", b"")
        .with_object("book3/unit2/notes.docx", b"")
        .with_object("book3/unit3/06 A Is it red.png", b"");

    let mut config = Config::default();
    config.storage.presign_expiry_secs = 900;
    let controller = Controller::with_config(config)?;
    let report = controller.run_questions(&source, "/book3/unit2").await?;

    assert_eq!(report.total_processed, 1);
    let entry = &report.questions[0];
    assert_eq!(entry.filename, "05 C Can you swim.png");
    assert_eq!(entry.question, "Can you swim?");
    assert_eq!(entry.answer_prompts[0], "Yes, I can.");
    assert_eq!(
        entry.s3_url.as_deref(),
        Some("https://files.test/book3/unit2/05 C Can you swim.png?expires=900")
    );
    assert!(entry.local_path.is_none());
    Ok(())
}

#[tokio::test]
async fn test_run_qa_mapping_withWorkbook_shouldWriteJson() -> Result<()> {
    let workbook = common::xlsx_bytes(&[("UNIT 4", vec![
        vec![Some("File"), Some("Question"), Some("Answer")],
        vec![Some("01-A-B ball.png"), Some("Is it a ball?"), Some("Yes, it is.")],
    ])])?;
    let source = MemorySource::new().with_object("qa/book2.xlsx", &workbook);
    let output = common::create_temp_dir()?;
    let output_file = output.path().join("qa-mapping-2.json");

    let controller = Controller::new_for_test()?;
    let mapping = controller
        .run_qa_mapping(&source, "qa/book2.xlsx", "2", &output_file)
        .await?;

    assert_eq!(mapping["01-A-B ball.png"].unit_id, "unit4");
    assert_eq!(mapping["01-A-B ball.png"].code_pattern.as_deref(), Some("01 A B"));

    let written: serde_json::Value = serde_json::from_str(&FileManager::read_to_string(&output_file)?)?;
    assert_eq!(written["01-A-B ball.png"]["bookId"], "2");
    assert_eq!(written["01AB"]["codePattern"], "01AB");
    Ok(())
}
