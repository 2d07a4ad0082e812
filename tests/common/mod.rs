/*!
 * Common test utilities for the teachres test suite
 */

use anyhow::Result;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Routes library logs to the test output
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

pub fn youtube_embed(id: &str) -> String {
    format!(
        r#"<iframe width="560" height="315" src="https://www.youtube.com/embed/{}?si=x1" title="YouTube video player" allowfullscreen></iframe>"#,
        id
    )
}

pub fn wordwall_embed(id: &str) -> String {
    format!(
        r#"<iframe style="max-width:100%" src="https://wordwall.net/embed/{}?themeId=1&templateId=3" width="500" height="380" frameborder="0" allowfullscreen></iframe>"#,
        id
    )
}

/// Paragraphs of a two-unit resource document for book 1
pub fn scenario_paragraphs() -> Vec<String> {
    vec![
        "VISUAL 1 - UNIT 3 - Animals".to_string(),
        "1 VIDEO Farm animals".to_string(),
        youtube_embed("abc123"),
        "ONLINE GAME Animals".to_string(),
        wordwall_embed("xyz789"),
        "VISUAL 1 - UNIT 4 - Food".to_string(),
        "Nothing for this unit yet".to_string(),
    ]
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Builds a minimal DOCX with one run per paragraph
pub fn docx_bytes<S: AsRef<str>>(paragraphs: &[S]) -> Result<Vec<u8>> {
    let mut body = String::new();
    for paragraph in paragraphs {
        body.push_str(&format!(
            r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
            escape_xml(paragraph.as_ref())
        ));
    }
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
        body
    );

    let content_types = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

    zip_parts(&[("[Content_Types].xml", content_types), ("word/document.xml", document.as_str())])
}

/// Writes a DOCX fixture into `dir`
pub fn create_test_docx<S: AsRef<str>>(dir: &Path, filename: &str, paragraphs: &[S]) -> Result<PathBuf> {
    let path = dir.join(filename);
    fs::write(&path, docx_bytes(paragraphs)?)?;
    Ok(path)
}

/// Builds a minimal XLSX with inline strings; `None` cells are left out
pub fn xlsx_bytes(sheets: &[(&str, Vec<Vec<Option<&str>>>)]) -> Result<Vec<u8>> {
    let mut workbook_sheets = String::new();
    let mut relationships = String::new();
    let mut worksheets = Vec::new();

    for (index, (name, rows)) in sheets.iter().enumerate() {
        let n = index + 1;
        workbook_sheets.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape_xml(name),
            n,
            n
        ));
        relationships.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            n, n
        ));

        let mut data = String::new();
        for (r, row) in rows.iter().enumerate() {
            data.push_str(&format!(r#"<row r="{}">"#, r + 1));
            for (c, value) in row.iter().enumerate() {
                if let Some(value) = value {
                    let column = (b'A' + c as u8) as char;
                    data.push_str(&format!(
                        r#"<c r="{}{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                        column,
                        r + 1,
                        escape_xml(value)
                    ));
                }
            }
            data.push_str("</row>");
        }
        worksheets.push((
            format!("xl/worksheets/sheet{}.xml", n),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
                data
            ),
        ));
    }

    let workbook = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{}</sheets></workbook>"#,
        workbook_sheets
    );
    let workbook_rels = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
        relationships
    );
    let content_types = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/></Types>"#;

    let mut parts: Vec<(&str, &str)> = vec![
        ("[Content_Types].xml", content_types),
        ("xl/workbook.xml", workbook.as_str()),
        ("xl/_rels/workbook.xml.rels", workbook_rels.as_str()),
    ];
    for (name, xml) in &worksheets {
        parts.push((name.as_str(), xml.as_str()));
    }
    zip_parts(&parts)
}

fn zip_parts(parts: &[(&str, &str)]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, contents) in parts {
        writer.start_file(*name, options)?;
        writer.write_all(contents.as_bytes())?;
    }
    Ok(writer.finish()?.into_inner())
}
