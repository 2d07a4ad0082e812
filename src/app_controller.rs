use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::Path;

use crate::app_config::Config;
use crate::audit::{self, AuditRow};
use crate::document::{DocxDocument, read_workbook};
use crate::extraction::{
    ExtractionResult, ResourceExtractor, SegmentationStrategy, book_from_document_name, group_by_book,
};
use crate::file_utils::FileManager;
use crate::output::{plan_files, resources_summary};
use crate::qa_mapping::{self, QaMapping};
use crate::questions::{QuestionGenerator, QuestionReport};
use crate::storage::DocumentSource;

// @module: Application controller for resource extraction

/// Counts reported after a `resources` run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourcesOutcome {
    pub documents_processed: usize,
    pub documents_failed: usize,
    pub units: usize,
    pub files_written: usize,
    pub files_skipped: usize,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    extractor: ResourceExtractor,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let extractor = config
            .build_extractor()
            .context("Invalid extraction configuration")?;
        Ok(Self { config, extractor })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch one DOCX and extract its units
    pub async fn extract_document(&self, source: &dyn DocumentSource, key: &str) -> Result<ExtractionResult> {
        let location = source.describe(key);
        info!("Processing {}", location);

        let bytes = source
            .fetch(key)
            .await
            .with_context(|| format!("Failed to download {}", location))?;
        let document =
            DocxDocument::from_bytes(&bytes).with_context(|| format!("Failed to read {}", location))?;

        let result = self.extractor.extract(&document.full_text());
        if result.strategy == SegmentationStrategy::Fallback {
            warn!("{}: no unit headers matched, units were found line by line", location);
        }
        if result.units.is_empty() {
            warn!("{}: no units found", location);
        }
        Ok(result)
    }

    /// Parse every resource document and write the TSX files plus `resources-summary.json`
    ///
    /// Units whose header names no book take the book from the document name.
    /// A document that fails, or still has units without a book, is logged
    /// and skipped; the run fails only when none of them could be used.
    pub async fn run_resources(
        &self,
        source: &dyn DocumentSource,
        keys: &[String],
        output_dir: &Path,
    ) -> Result<ResourcesOutcome> {
        let start_time = std::time::Instant::now();

        if keys.is_empty() {
            return Err(anyhow!("No resource documents to process"));
        }

        let progress = ProgressBar::new(keys.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress.set_style(style.progress_chars("█▓▒░"));

        let mut outcome = ResourcesOutcome::default();
        let mut results = Vec::new();

        for key in keys {
            progress.set_message(crate::storage::file_name(key).to_string());
            match self.extract_document(source, key).await {
                Ok(mut result) => {
                    if let Some(book_id) = book_from_document_name(crate::storage::file_name(key)) {
                        result.assign_default_book(&book_id);
                    }
                    let unassigned = result.units_without_book();
                    if unassigned > 0 {
                        error!(
                            "{}: {} unit(s) have no book id in their header or in the document name",
                            key, unassigned
                        );
                        outcome.documents_failed += 1;
                    } else {
                        outcome.documents_processed += 1;
                        results.push(result);
                    }
                }
                Err(e) => {
                    error!("Error processing {}: {:#}", key, e);
                    outcome.documents_failed += 1;
                }
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        if outcome.documents_processed == 0 {
            return Err(anyhow!("None of the {} resource document(s) could be processed", keys.len()));
        }

        let books = group_by_book(&results, None);
        outcome.units = books.values().map(|units| units.len()).sum();
        if outcome.units == 0 {
            warn!("No data extracted.");
            return Ok(outcome);
        }
        info!("Found data for {} units.", outcome.units);

        FileManager::ensure_dir(output_dir)?;
        for file in plan_files(&books, &self.config.extraction.lesson_plan_books) {
            let path = output_dir.join(&file.name);
            if file.only_if_absent {
                if FileManager::write_if_absent(&path, &file.contents)? {
                    info!("Generated {}", path.display());
                    outcome.files_written += 1;
                } else {
                    debug!("Keeping existing {}", path.display());
                    outcome.files_skipped += 1;
                }
            } else {
                FileManager::write_to_file(&path, &file.contents)?;
                debug!("Generated {}", path.display());
                outcome.files_written += 1;
            }
        }

        let summary_path = output_dir.join("resources-summary.json");
        FileManager::write_json(&summary_path, &resources_summary(&books), self.config.output.pretty)?;
        info!("Generated summary file at {}", summary_path.display());

        info!(
            "Resource generation completed: {} document(s), {} failed, {} template(s) written, {} kept in {:.1}s",
            outcome.documents_processed,
            outcome.documents_failed,
            outcome.files_written,
            outcome.files_skipped,
            start_time.elapsed().as_secs_f64()
        );
        Ok(outcome)
    }

    /// Per-unit inventory of one document, optionally audited against expected counts
    pub async fn run_inventory(
        &self,
        source: &dyn DocumentSource,
        key: &str,
        output_dir: &Path,
        expectations: Option<&Path>,
    ) -> Result<Vec<AuditRow>> {
        let expected = match expectations {
            Some(path) => {
                let text = FileManager::read_to_string(path)?;
                let parsed = audit::parse_expectations(&text)
                    .with_context(|| format!("Invalid expectations file: {}", path.display()))?;
                Some(parsed)
            }
            None => None,
        };

        let result = self.extract_document(source, key).await?;
        let pretty = self.config.output.pretty;

        FileManager::ensure_dir(output_dir)?;
        for (unit_id, unit) in &result.units {
            let path = output_dir.join(audit::unit_file_name(unit_id));
            FileManager::write_json(&path, unit, pretty)?;
            info!("Wrote resources for Unit {} to {}", unit_id, path.display());
        }

        let summary_path = output_dir.join("resource_summary.json");
        FileManager::write_json(&summary_path, &audit::resource_summary(&result.units), pretty)?;
        info!("Wrote summary to {}", summary_path.display());

        for line in audit::inventory_table(&result.units) {
            info!("{}", line);
        }

        let Some(expected) = expected else {
            return Ok(Vec::new());
        };
        let rows = audit::audit(&result.units, &expected);

        for line in audit::audit_table(&rows) {
            info!("{}", line);
        }

        let audit_path = output_dir.join("resource_audit.json");
        FileManager::write_json(&audit_path, &rows, pretty)?;
        info!("Wrote audit to {}", audit_path.display());

        Ok(rows)
    }

    /// Question report for the images under `folder`
    pub async fn run_questions(&self, source: &dyn DocumentSource, folder: &str) -> Result<QuestionReport> {
        info!("Processing images in {}", source.describe(folder));
        let report = QuestionGenerator::new(source)
            .with_presign_expiry(self.config.storage.presign_expiry_secs)
            .generate(folder)
            .await?;
        Ok(report)
    }

    /// Convert a Q&A workbook and write the mapping to `output`
    pub async fn run_qa_mapping(
        &self,
        source: &dyn DocumentSource,
        key: &str,
        book_id: &str,
        output: &Path,
    ) -> Result<QaMapping> {
        let location = source.describe(key);
        info!("Processing Excel file: {}", location);

        let bytes = source
            .fetch(key)
            .await
            .with_context(|| format!("Failed to read {}", location))?;
        let sheets = read_workbook(&bytes).with_context(|| format!("Failed to open workbook {}", location))?;

        let mapping = qa_mapping::build_mapping(&sheets, book_id);
        FileManager::write_json(output, &mapping, self.config.output.pretty)?;

        info!("Successfully processed {} Q&A entries", mapping.len());
        info!("Output saved to {}", output.display());
        Ok(mapping)
    }
}
