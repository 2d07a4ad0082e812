/*!
 * Image filename to ESL question conversion.
 *
 * - `normalizer`: filename cleanup and question formatting
 * - `classifier`: question type and answer prompts
 *
 * `QuestionGenerator` runs both over every image a `DocumentSource` lists.
 */

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::errors::SourceError;
use crate::storage::{DocumentSource, file_name};

pub mod classifier;
pub mod normalizer;

pub use classifier::{QuestionType, classify};
pub use normalizer::{clean_filename, format_question, is_image_file, normalize};

/// Default lifetime of presigned image URLs
pub const DEFAULT_PRESIGN_EXPIRY_SECS: u64 = 3600;

/// One generated question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionEntry {
    pub filename: String,
    pub question: String,
    pub question_type: QuestionType,
    pub answer_prompts: [String; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_path: Option<String>,
}

impl QuestionEntry {
    /// Normalize and classify a bare file name
    pub fn from_filename(filename: &str) -> Self {
        let question = normalize(filename);
        let (question_type, answer_prompts) = classify(&question);
        Self {
            filename: filename.to_string(),
            question,
            question_type,
            answer_prompts,
            s3_url: None,
            local_path: None,
        }
    }
}

/// Output document of the `questions` command
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionReport {
    pub questions: Vec<QuestionEntry>,
    pub total_processed: usize,
    pub total_unprocessed: usize,
    pub unprocessed_files: Vec<String>,
}

impl QuestionReport {
    fn push(&mut self, entry: QuestionEntry) {
        self.questions.push(entry);
        self.total_processed = self.questions.len();
    }

    fn push_unprocessed(&mut self, key: String) {
        self.unprocessed_files.push(key);
        self.total_unprocessed = self.unprocessed_files.len();
    }
}

/// Builds a question report from the images of one source
#[derive(Debug)]
pub struct QuestionGenerator<'a> {
    source: &'a dyn DocumentSource,
    presign_expiry_secs: u64,
}

impl<'a> QuestionGenerator<'a> {
    pub fn new(source: &'a dyn DocumentSource) -> Self {
        Self {
            source,
            presign_expiry_secs: DEFAULT_PRESIGN_EXPIRY_SECS,
        }
    }

    pub fn with_presign_expiry(mut self, secs: u64) -> Self {
        self.presign_expiry_secs = secs;
        self
    }

    /// Process every image under `folder`
    ///
    /// Non-image keys and the folder key itself are skipped. Entries from
    /// sources that hand out URLs carry `s3_url`, the others `local_path`.
    pub async fn generate(&self, folder: &str) -> Result<QuestionReport, SourceError> {
        let prefix = match folder.trim_start_matches('/') {
            "" => String::new(),
            f if f.ends_with('/') => f.to_string(),
            f => format!("{}/", f),
        };

        let keys = self.source.list(&prefix).await?;
        if keys.is_empty() {
            warn!("No files found in {}", self.source.describe(&prefix));
        }

        let mut report = QuestionReport::default();
        for key in keys {
            if key == prefix {
                continue;
            }
            if !is_image_file(&key) {
                debug!("Skipping non-image file: {}", key);
                continue;
            }

            let name = file_name(&key);
            if name.is_empty() {
                report.push_unprocessed(key);
                continue;
            }

            let mut entry = QuestionEntry::from_filename(name);
            match self.source.presign(&key, self.presign_expiry_secs) {
                Some(url) => entry.s3_url = Some(url),
                None => entry.local_path = Some(self.source.describe(&key)),
            }
            report.push(entry);
        }

        info!("Processed {} image file(s) successfully", report.total_processed);
        if report.total_unprocessed > 0 {
            warn!("Failed to process {} file(s):", report.total_unprocessed);
            for file in report.unprocessed_files.iter().take(10) {
                warn!("  - {}", file);
            }
            if report.total_unprocessed > 10 {
                warn!("  ... and {} more", report.total_unprocessed - 10);
            }
        }

        Ok(report)
    }
}
