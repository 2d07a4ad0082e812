/*!
 * Error types for the teachres application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when reading a source document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The bytes are not a readable zip container
    #[error("Invalid document container: {0}")]
    InvalidContainer(String),

    /// A required part is missing from the container
    #[error("Missing document part: {0}")]
    MissingPart(String),

    /// The document XML could not be parsed
    #[error("Malformed document XML: {0}")]
    Xml(String),

    /// The workbook could not be opened or a sheet could not be read
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),
}

/// Errors that can occur when talking to a document source
#[derive(Error, Debug)]
pub enum SourceError {
    /// The requested object or file does not exist
    #[error("Object not found: {0}")]
    NotFound(String),

    /// Credentials are required but were not supplied
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// The request could not be sent or the body could not be read
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Error returned by the storage service itself
    #[error("Storage responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the service
        message: String,
    },

    /// The listing response could not be parsed
    #[error("Failed to parse storage response: {0}")]
    ParseError(String),
}

/// Errors raised while preparing the extraction tables
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The configured unit header regex is unusable
    #[error("Invalid header pattern: {0}")]
    InvalidHeaderPattern(String),

    /// The provider table is empty or inconsistent
    #[error("Invalid provider table: {0}")]
    InvalidProviderTable(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from document parsing
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Error from a document source
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Error from extraction setup
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<zip::result::ZipError> for DocumentError {
    fn from(error: zip::result::ZipError) -> Self {
        Self::InvalidContainer(error.to_string())
    }
}

impl From<quick_xml::Error> for DocumentError {
    fn from(error: quick_xml::Error) -> Self {
        Self::Xml(error.to_string())
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(error: reqwest::Error) -> Self {
        Self::RequestFailed(error.to_string())
    }
}
