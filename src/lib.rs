/*!
 * # teachres - Teaching resource extractor
 *
 * A Rust library that turns course documents into the data files of a
 * lesson web client.
 *
 * ## Features
 *
 * - Split a resource document into units from its `VISUAL {book} - UNIT {n} - {title}` headers
 * - Find the video and game embeds of every unit through an ordered provider table
 * - Generate per-unit TSX resource files and a JSON summary
 * - Inventory and audit per-unit counts against an expectations file
 * - Turn image file names into questions with answer prompts
 * - Convert Q&A workbooks into a filename-keyed mapping
 * - Read everything from a local directory or an S3 bucket
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `document`: DOCX text and XLSX sheet loading
 * - `extraction`: Unit segmentation and resource matching:
 *   - `extraction::segmenter`: Unit headers and the line-based fallback
 *   - `extraction::matcher`: Embed classification and id extraction
 *   - `extraction::providers`: The provider table
 * - `questions`: Filename normalization and question classification
 * - `qa_mapping`: Q&A workbook conversion
 * - `audit`: Inventory and audit tables
 * - `output`: TSX template rendering
 * - `storage`: Local and S3 document sources
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod audit;
pub mod document;
pub mod errors;
pub mod extraction;
pub mod file_utils;
pub mod output;
pub mod qa_mapping;
pub mod questions;
pub mod storage;

// Re-export main types for easier usage
pub use app_config::Config;
pub use extraction::{ExtractionResult, ResourceExtractor, UnitMap, UnitRecord};
pub use questions::{QuestionEntry, QuestionReport, QuestionType, classify, normalize};
pub use storage::{DocumentSource, LocalSource, S3Source};
pub use errors::{AppError, DocumentError, ExtractionError, SourceError};
