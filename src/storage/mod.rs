/*!
 * Document sources.
 *
 * Source documents and images are read through the `DocumentSource` trait so
 * the same pipeline runs against a local directory or an S3 bucket:
 * - `local`: a directory on disk
 * - `s3`: an S3 bucket over the REST API, signed with `sigv4`
 */

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt::Debug;

use crate::errors::SourceError;

pub mod local;
pub mod s3;
pub mod sigv4;

pub use local::LocalSource;
pub use s3::S3Source;
pub use sigv4::Credentials;

/// Common trait for every place documents can be read from
#[async_trait]
pub trait DocumentSource: Send + Sync + Debug {
    /// Read the whole object stored under `key`
    async fn fetch(&self, key: &str) -> Result<Bytes, SourceError>;

    /// Keys under `prefix`, in a stable sorted order
    async fn list(&self, prefix: &str) -> Result<Vec<String>, SourceError>;

    /// Human-readable location of `key` (a path or an `s3://` URI)
    fn describe(&self, key: &str) -> String;

    /// Time-limited URL other clients can fetch `key` from
    ///
    /// Sources that cannot hand out URLs return `None`.
    fn presign(&self, key: &str, expires_secs: u64) -> Option<String>;
}

/// Last path segment of a key
pub fn file_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}
