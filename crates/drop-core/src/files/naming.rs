//! File name validation and collision suffixing.

use crate::error::{Error, Result};

/// Longest name most filesystems accept for a single component.
pub const MAX_NAME_BYTES: usize = 255;

/// Validate a caller-supplied file name before it is joined onto the store root.
///
/// Surrounding whitespace is trimmed. Anything that could address a path
/// other than a plain entry of the store root is rejected, never rewritten:
/// separators, `.`/`..`, NUL and control characters. Names starting with `.`
/// are refused too since listings hide them.
pub fn validate_file_name(name: &str) -> Result<&str> {
    let name = name.trim();

    if name.is_empty() {
        return Err(Error::validation("No file selected"));
    }
    if name == "." || name == ".." {
        return Err(Error::validation(format!("Invalid file name: {}", name)));
    }
    if name.contains(['/', '\\']) {
        return Err(Error::validation(format!(
            "Invalid file name '{}': path separators are not allowed",
            name
        )));
    }
    if name.chars().any(char::is_control) {
        return Err(Error::validation(
            "Invalid file name: control characters are not allowed",
        ));
    }
    if name.starts_with('.') {
        return Err(Error::validation(format!(
            "Invalid file name '{}': hidden files are not allowed",
            name
        )));
    }
    if name.len() > MAX_NAME_BYTES {
        return Err(Error::validation(format!(
            "File name is too long ({} bytes, at most {})",
            name.len(),
            MAX_NAME_BYTES
        )));
    }

    Ok(name)
}

/// Split `name` into stem and extension (extension keeps its dot).
///
/// The extension is whatever follows the last dot, unless that dot is the
/// first character.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

/// The `attempt`-th candidate for `name`: the name itself for 0, then
/// `stem_1.ext`, `stem_2.ext`, ...
///
/// Candidates never exceed [`MAX_NAME_BYTES`]: the stem is shortened on a
/// char boundary to make room for the suffix. An extension too long to keep
/// is folded back into the stem.
pub fn candidate_name(name: &str, attempt: u64) -> String {
    if attempt == 0 {
        return name.to_string();
    }
    let suffix = format!("_{}", attempt);
    let (stem, ext) = match split_extension(name) {
        (stem, ext) if suffix.len() + ext.len() < MAX_NAME_BYTES => (stem, ext),
        _ => (name, ""),
    };
    let budget = MAX_NAME_BYTES - suffix.len() - ext.len();
    format!("{}{}{}", truncate_on_char_boundary(stem, budget), suffix, ext)
}

fn truncate_on_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
