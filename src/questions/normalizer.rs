/*!
 * Image filename to question text.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// Image extensions that are turned into questions
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Leading "01 A ", "05 C B " style codes, matched after separators became spaces
static CODE_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{1,2} +[A-Z]{1,2}(?: +[A-Z]{1,2})? +").expect("Invalid code prefix regex")
});

/// Whether a file name has an image extension
pub fn is_image_file(filename: &str) -> bool {
    image_extension(filename).is_some()
}

fn image_extension(filename: &str) -> Option<&str> {
    let ext = Path::new(filename).extension()?.to_str()?;
    IMAGE_EXTENSIONS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(ext))
        .then_some(ext)
}

/// Strip extension and code prefix, turn separators into single spaces
pub fn clean_filename(filename: &str) -> String {
    let name = match image_extension(filename) {
        Some(ext) => &filename[..filename.len() - ext.len() - 1],
        None => filename,
    };

    let spaced = name.replace(['_', '-'], " ");
    let mut text = spaced.split_whitespace().collect::<Vec<_>>().join(" ");

    // Codes can be stacked ("02 B 03 C ...")
    while let Some(prefix) = CODE_PREFIX_REGEX.find(&text) {
        text = text[prefix.end()..].to_string();
    }

    text
}

/// Capitalise and make sure the text ends with a question mark
pub fn format_question(text: &str) -> String {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut question: String = first.to_uppercase().chain(chars).collect();
    if !question.ends_with('?') {
        question.push('?');
    }
    question
}

/// Full filename → question normalization
pub fn normalize(filename: &str) -> String {
    format_question(&clean_filename(filename))
}
