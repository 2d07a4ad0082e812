/*!
 * Tests for error types and conversions
 */

use teachres::errors::{AppError, DocumentError, ExtractionError, SourceError};

#[test]
fn test_source_error_display_shouldIncludeStatus() {
    let error = SourceError::ApiError {
        status_code: 403,
        message: "AccessDenied".to_string(),
    };
    assert_eq!(error.to_string(), "Storage responded with error: 403 - AccessDenied");
}

#[test]
fn test_app_error_from_layers_shouldWrapEachKind() {
    let document: AppError = DocumentError::MissingPart("word/document.xml".to_string()).into();
    assert!(matches!(document, AppError::Document(_)));
    assert_eq!(document.to_string(), "Document error: Missing document part: word/document.xml");

    let source: AppError = SourceError::NotFound("s3://bucket/key".to_string()).into();
    assert!(matches!(source, AppError::Source(_)));

    let extraction: AppError = ExtractionError::InvalidHeaderPattern("bad".to_string()).into();
    assert!(matches!(extraction, AppError::Extraction(_)));
}

#[test]
fn test_app_error_from_io_and_anyhow_shouldKeepMessage() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let error: AppError = io.into();
    assert!(matches!(error, AppError::File(ref m) if m == "gone"));

    let error: AppError = anyhow::anyhow!("something else").into();
    assert!(matches!(error, AppError::Unknown(ref m) if m == "something else"));
}
