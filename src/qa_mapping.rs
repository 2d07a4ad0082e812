/*!
 * Excel workbook to Q&A mapping conversion.
 *
 * Every sheet is one unit. Rows hold `filename | question | answer` in the
 * first three columns, below a header row. Each valid row is stored under its
 * filename, under the filename without its media extension, and under every
 * spelling of its code pattern ("01 I A", "01IA", "01-I-A", lower-case forms)
 * that no earlier row has claimed.
 */

use indexmap::IndexMap;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::document::Sheet;

static UNIT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)UNIT\s+(\d+)").expect("Invalid unit regex"));
static NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)").expect("Invalid number regex"));
static MEDIA_EXTENSION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.(png|jpg|jpeg|gif|webp|mp4)$").expect("Invalid media extension regex")
});

static CODE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(\d{2})\s*([A-Za-z])\s*([A-Za-z])",
        r"(\d{2})-([A-Za-z])-([A-Za-z])",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid code pattern regex"))
    .collect()
});
static SECTION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{2})\s*([A-Za-z])").expect("Invalid section pattern regex"));

/// One question/answer pair, serialized with camelCase keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaEntry {
    pub filename: String,
    pub code_pattern: Option<String>,
    pub question: String,
    pub answer: String,
    pub unit_id: String,
    pub book_id: String,
}

/// Lookup key → entry, in insertion order
pub type QaMapping = IndexMap<String, QaEntry>;

/// `unit{n}` from a sheet name, falling back to its first number
pub fn unit_id_for_sheet(sheet_name: &str) -> Option<String> {
    if let Some(caps) = UNIT_REGEX.captures(sheet_name) {
        return Some(format!("unit{}", &caps[1]));
    }

    warn!("Could not extract unit ID from sheet {}", sheet_name);
    let caps = NUMBER_REGEX.captures(sheet_name)?;
    let unit_id = format!("unit{}", &caps[1]);
    info!("Extracted fallback unit ID: {}", unit_id);
    Some(unit_id)
}

/// Code such as "01 I A" or "02 B" found anywhere in a filename
pub fn extract_code_pattern(filename: &str) -> Option<String> {
    for pattern in CODE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(filename) {
            return Some(format!(
                "{} {} {}",
                &caps[1],
                caps[2].to_uppercase(),
                caps[3].to_uppercase()
            ));
        }
    }

    SECTION_PATTERN
        .captures(filename)
        .map(|caps| format!("{} {}", &caps[1], caps[2].to_uppercase()))
}

/// Alternative spellings of a code pattern, the pattern itself first
pub fn pattern_variations(pattern: &str) -> Vec<String> {
    let parts: Vec<&str> = pattern.split_whitespace().collect();
    if parts.len() < 2 || parts.len() > 3 {
        return vec![pattern.to_string()];
    }

    let number = parts[0];
    let letters = &parts[1..];
    let lower: Vec<String> = letters.iter().map(|l| l.to_lowercase()).collect();

    let mut variations = vec![
        pattern.to_string(),
        format!("{}{}", number, letters.concat()),
        format!("{}-{}", number, letters.join("-")),
        format!("{} {}", number, lower.join(" ")),
        format!("{}{}", number, lower.concat()),
        format!("{}-{}", number, lower.join("-")),
    ];
    let mut seen = std::collections::HashSet::new();
    variations.retain(|v| seen.insert(v.clone()));
    variations
}

fn cell(row: &[Option<String>], index: usize) -> Option<String> {
    row.get(index)
        .and_then(|c| c.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Add one sheet's rows to `mapping`; returns the number of valid rows
pub fn process_sheet(sheet: &Sheet, book_id: &str, mapping: &mut QaMapping) -> usize {
    let Some(unit_id) = unit_id_for_sheet(&sheet.name) else {
        warn!("Skipping sheet {}: no unit number in its name", sheet.name);
        return 0;
    };
    info!("Processing sheet: {} (Unit ID: {})", sheet.name, unit_id);

    if sheet.is_empty() {
        warn!("Empty sheet {}", sheet.name);
        return 0;
    }
    if sheet.width() < 3 {
        warn!("Sheet {} has fewer than 3 columns", sheet.name);
        return 0;
    }

    let mut valid = 0;
    for row in sheet.data_rows() {
        let (Some(filename), Some(question), Some(answer)) = (cell(row, 0), cell(row, 1), cell(row, 2))
        else {
            debug!("Skipping incomplete row in sheet {}", sheet.name);
            continue;
        };

        let entry = QaEntry {
            code_pattern: extract_code_pattern(&filename),
            filename: filename.clone(),
            question,
            answer,
            unit_id: unit_id.clone(),
            book_id: book_id.to_string(),
        };

        mapping.insert(filename.clone(), entry.clone());

        let bare = MEDIA_EXTENSION_REGEX.replace(&filename, "").into_owned();
        if bare != filename {
            mapping.insert(bare, entry.clone());
        }

        if let Some(pattern) = &entry.code_pattern {
            for variation in pattern_variations(pattern) {
                if !mapping.contains_key(&variation) {
                    let mut alias = entry.clone();
                    alias.code_pattern = Some(variation.clone());
                    mapping.insert(variation, alias);
                }
            }
        }

        valid += 1;
    }

    info!("Processed {} valid entries from sheet {}", valid, sheet.name);
    valid
}

/// Build the mapping for every sheet of a workbook
pub fn build_mapping(sheets: &[Sheet], book_id: &str) -> QaMapping {
    let mut mapping = QaMapping::new();
    let total: usize = sheets
        .iter()
        .map(|sheet| process_sheet(sheet, book_id, &mut mapping))
        .sum();

    info!("Total entries processed: {} ({} keys)", total, mapping.len());
    mapping
}

/// Default output name for a book's mapping
pub fn default_output_name(book_id: &str) -> String {
    format!("qa-mapping-{}.json", book_id)
}
