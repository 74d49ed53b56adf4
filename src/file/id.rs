//! Identifier generation for stored files.
//!
//! An identifier is `<epoch millis>-<random suffix><extension>`, e.g.
//! `1718000000000-k3j9x0a2b.pdf`. The identifier doubles as the on-disk
//! filename, so it is built only from digits, lowercase ASCII letters,
//! `-` and a sanitised extension.

use std::path::Path;

use chrono::Utc;
use rand::Rng;

/// Characters used for the random suffix (base 36).
const SUFFIX_CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random suffix.
pub const SUFFIX_LENGTH: usize = 9;

/// Longest extension carried over from the original name.
const MAX_EXTENSION_LENGTH: usize = 16;

/// Generate a fresh identifier for an upload named `original_name`.
pub fn generate_id(original_name: &str) -> String {
    generate_id_at(Utc::now().timestamp_millis(), original_name)
}

/// Generate an identifier using the given creation time in milliseconds.
pub fn generate_id_at(millis: i64, original_name: &str) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LENGTH)
        .map(|_| SUFFIX_CHARS[rng.random_range(0..SUFFIX_CHARS.len())] as char)
        .collect();

    format!("{millis}-{suffix}{}", extension_of(original_name))
}

/// Extract the extension of `original_name`, including the leading dot.
///
/// Returns an empty string when the name has no extension or when the
/// extension contains anything but ASCII alphanumerics, `_` and `-`.
pub fn extension_of(original_name: &str) -> String {
    let ext = match Path::new(original_name).extension().and_then(|s| s.to_str()) {
        Some(ext) => ext,
        None => return String::new(),
    };

    let acceptable = ext.len() <= MAX_EXTENSION_LENGTH
        && ext
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if acceptable {
        format!(".{ext}")
    } else {
        String::new()
    }
}

/// Check that `id` is a single plain path component.
///
/// Identifiers arrive from request paths, so anything that could name a
/// different directory entry than `<uploads_dir>/<id>` is refused.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && !id.contains(['/', '\\', '\0'])
        && !id.contains("..")
}
