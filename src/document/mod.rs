/*!
 * Source document readers.
 *
 * - `docx`: paragraph text of Word documents
 * - `spreadsheet`: rows of Excel workbooks
 */

pub mod docx;
pub mod spreadsheet;

pub use docx::DocxDocument;
pub use spreadsheet::{Sheet, read_workbook};
