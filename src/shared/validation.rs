use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Characters not allowed in stored upload names
    /// - Kept: ASCII letters, digits, '.', '-', '_'
    /// - Everything else (spaces, slashes, unicode, '%') becomes '_'
    pub static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r"[^A-Za-z0-9._-]").unwrap();
}

/// Reduce a client-supplied file name to something safe to store and to put in a URL.
///
/// Directory components are dropped, unsafe characters replaced and leading dots
/// trimmed so the result can never escape the upload directory or be hidden.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned = UNSAFE_FILENAME_CHARS.replace_all(base, "_");
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}
