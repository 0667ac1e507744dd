//! Record id derivation.
//!
//! Maps a route path to the file name that stores its record. The mapping is
//! pure and total: every input, including the empty string, yields an id.
//! Distinct paths can collide (`/a/b` and `/a_b` both map to `a_b.json`).

/// Id used for the bare `/` path.
pub const ROOT_RECORD: &str = "root";

/// Suffix shared by every record file in the store.
pub const RECORD_SUFFIX: &str = ".json";

/// Derive the record id (file name) for a route path.
pub fn derive_record_id(path: &str) -> String {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let base = if trimmed.is_empty() { ROOT_RECORD } else { trimmed };

    let mut id: String = base
        .chars()
        .map(|c| if c == '/' { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    id.push_str(RECORD_SUFFIX);
    id
}

/// Returns true if a file name looks like a record written by the store.
pub fn is_record_file(name: &str) -> bool {
    name.ends_with(RECORD_SUFFIX)
}
