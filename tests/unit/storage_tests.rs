/*!
 * Tests for document sources and credential lookup
 */

use anyhow::Result;
use std::collections::HashMap;
use teachres::errors::SourceError;
use teachres::storage::{Credentials, DocumentSource, LocalSource, S3Source};
use crate::common;

#[tokio::test]
async fn test_local_source_list_withNestedFiles_shouldReturnSortedRelativeKeys() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "b.png", "")?;
    common::create_test_file(temp_dir.path(), "a.png", "")?;
    common::create_test_file(temp_dir.path(), "unit2/c.png", "")?;

    let source = LocalSource::new(temp_dir.path());
    let keys = source.list("").await?;
    assert_eq!(keys, vec!["a.png", "b.png", "unit2/c.png"]);

    let nested = source.list("unit2/").await?;
    assert_eq!(nested, vec!["unit2/c.png"]);
    Ok(())
}

#[tokio::test]
async fn test_local_source_fetch_withMissingKey_shouldReturnNotFound() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "present.txt", "hello")?;
    let source = LocalSource::new(temp_dir.path());

    assert_eq!(source.fetch("present.txt").await?.as_ref(), b"hello");
    assert!(matches!(source.fetch("absent.txt").await, Err(SourceError::NotFound(_))));
    assert!(matches!(source.list("no-such-dir").await, Err(SourceError::NotFound(_))));
    assert_eq!(source.presign("present.txt", 3600), None);
    Ok(())
}

#[test]
fn test_credentials_resolve_with_withEnvironmentOnly_shouldReadAllThree() {
    let env: HashMap<&str, &str> = [
        ("AWS_ACCESS_KEY_ID", "AKIDEXAMPLE"),
        ("AWS_SECRET_ACCESS_KEY", "wJalrXUtnFEMI"),
        ("AWS_SESSION_TOKEN", "token"),
    ]
    .into_iter()
    .collect();

    let creds = Credentials::resolve_with(None, None, |name| env.get(name).map(|v| v.to_string()))
        .unwrap()
        .expect("credentials from the environment");

    assert_eq!(creds.access_key, "AKIDEXAMPLE");
    assert_eq!(creds.secret_key, "wJalrXUtnFEMI");
    assert_eq!(creds.session_token.as_deref(), Some("token"));
}

#[test]
fn test_credentials_resolve_with_withBlankValues_shouldBeAnonymous() {
    let creds = Credentials::resolve_with(Some(" ".to_string()), None, |_| Some(String::new())).unwrap();
    assert!(creds.is_none());
}

#[test]
fn test_s3_source_withEndpoint_shouldUsePathStyle() {
    let source = S3Source::new("materials", "us-east-1", Some("http://127.0.0.1:9000/"), 5, None).unwrap();

    assert_eq!(source.bucket(), "materials");
    assert_eq!(source.describe("/book1/unit2/a b.png"), "s3://materials/book1/unit2/a b.png");
    assert_eq!(
        source.presign("book1/unit2/a b.png", 60).as_deref(),
        Some("http://127.0.0.1:9000/materials/book1/unit2/a%20b.png")
    );
}
