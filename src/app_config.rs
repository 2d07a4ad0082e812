use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;

use crate::extraction::ProviderSpec;
use crate::extraction::ResourceExtractor;
use crate::extraction::segmenter::{DEFAULT_FALLBACK_MARKER, DEFAULT_HEADER_PATTERN};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Where source documents live
    #[serde(default)]
    pub storage: StorageConfig,

    /// Unit header and provider tables
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Where and how artifacts are written
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Object storage settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    /// Bucket holding the source documents
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// AWS region of the bucket
    #[serde(default = "default_region")]
    pub region: String,

    /// S3-compatible endpoint replacing the AWS address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Resource documents processed by `resources`, in order
    #[serde(default = "default_resource_keys")]
    pub resource_keys: Vec<String>,

    /// HTTP timeout per request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Lifetime of presigned image URLs
    #[serde(default = "default_presign_expiry_secs")]
    pub presign_expiry_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            region: default_region(),
            endpoint: None,
            resource_keys: default_resource_keys(),
            request_timeout_secs: default_request_timeout_secs(),
            presign_expiry_secs: default_presign_expiry_secs(),
        }
    }
}

/// Document extraction settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ExtractionConfig {
    /// Unit header regex with `unit` and `title` (and optionally `book`) groups
    #[serde(default = "default_header_pattern")]
    pub header_pattern: String,

    /// Substring marking a unit line when no header matches
    #[serde(default = "default_fallback_marker")]
    pub fallback_marker: String,

    /// Ordered provider table
    #[serde(default = "ProviderSpec::defaults")]
    pub providers: Vec<ProviderSpec>,

    /// Books that also get lesson-plan files
    #[serde(default = "default_lesson_plan_books")]
    pub lesson_plan_books: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            header_pattern: default_header_pattern(),
            fallback_marker: default_fallback_marker(),
            providers: ProviderSpec::defaults(),
            lesson_plan_books: default_lesson_plan_books(),
        }
    }
}

/// Output settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    /// Directory for generated files
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Indent JSON output
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            pretty: true,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_bucket() -> String {
    "visualenglishmaterial".to_string()
}

fn default_region() -> String {
    "eu-north-1".to_string()
}

fn default_resource_keys() -> Vec<String> {
    ["0A", "0B", "0C", "1", "2", "3", "4", "5", "6", "7"]
        .iter()
        .map(|book| format!("teacher resources/VISUAL {} - VIDEO FILMS GAMES.docx", book))
        .collect()
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_presign_expiry_secs() -> u64 {
    3600
}

fn default_header_pattern() -> String {
    DEFAULT_HEADER_PATTERN.to_string()
}

fn default_fallback_marker() -> String {
    DEFAULT_FALLBACK_MARKER.to_string()
}

fn default_lesson_plan_books() -> Vec<String> {
    vec!["0a".to_string(), "0b".to_string(), "0c".to_string()]
}

fn default_output_dir() -> String {
    "./client/src/data/generated".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.storage.bucket.trim().is_empty() {
            return Err(anyhow!("Storage bucket must not be empty"));
        }
        if self.storage.region.trim().is_empty() {
            return Err(anyhow!("Storage region must not be empty"));
        }
        if self.storage.request_timeout_secs == 0 {
            return Err(anyhow!("Request timeout must be at least one second"));
        }
        if self.output.output_dir.trim().is_empty() {
            return Err(anyhow!("Output directory must not be empty"));
        }

        // Compiles the header regex and provider table
        self.build_extractor()?;

        Ok(())
    }

    /// Extractor built from the extraction section
    pub fn build_extractor(&self) -> Result<ResourceExtractor> {
        Ok(ResourceExtractor::from_parts(
            &self.extraction.header_pattern,
            &self.extraction.fallback_marker,
            &self.extraction.providers,
        )?)
    }
}
