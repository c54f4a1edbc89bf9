use rand::Rng;
use rand::distr::Alphanumeric;

use super::error::StorageError;

/// Length of the random suffix appended to a taken name.
const SUFFIX_LEN: usize = 7;

/// Maximum length of a storage name, in characters.
pub const MAX_NAME_LEN: usize = 255;

/// Extra length `alternative_name` adds to a taken name.
pub const ALTERNATIVE_SUFFIX_LEN: usize = SUFFIX_LEN + 1;

/// Turn an uploaded filename into a safe flat filename.
///
/// Directory components are dropped, spaces become underscores, and anything
/// other than letters, digits, `-`, `_` and `.` is removed. Leading dots are
/// stripped so uploads never become hidden files. Names longer than
/// `max_len` bytes lose the end of their stem; the extension is kept.
pub fn sanitize_filename(raw: &str, max_len: usize) -> Option<String> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw).trim();

    let cleaned: String = base
        .chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        return None;
    }

    Some(truncate_stem(cleaned, max_len))
}

fn truncate_stem(name: &str, max_len: usize) -> String {
    if name.len() <= max_len {
        return name.to_string();
    }
    let (stem, ext) = split_extension(name);
    let (stem, ext) = if ext.len() < max_len { (stem, ext) } else { (name, "") };

    let mut end = max_len - ext.len();
    while !stem.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{ext}", &stem[..end])
}

/// Validate a relative storage name such as `posts/small.gif`.
pub fn validate_storage_name(name: &str) -> Result<(), StorageError> {
    if name.is_empty() {
        return Err(StorageError::InvalidName("name cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(StorageError::InvalidName("name is too long"));
    }
    if name.chars().any(|c| c.is_control()) {
        return Err(StorageError::InvalidName(
            "control characters are not allowed",
        ));
    }
    if name.contains('\\') {
        return Err(StorageError::InvalidName("backslashes are not allowed"));
    }
    if name.starts_with('/') {
        return Err(StorageError::InvalidName("name must be relative"));
    }
    for segment in name.split('/') {
        if segment.is_empty() {
            return Err(StorageError::InvalidName("empty path segment"));
        }
        if segment == ".." {
            return Err(StorageError::InvalidName("'..' is not allowed"));
        }
        if segment.starts_with('.') {
            return Err(StorageError::InvalidName(
                "segments must not start with '.'",
            ));
        }
    }
    Ok(())
}

/// Split `dir/stem.ext` into (`dir/stem`, `.ext`). The extension is empty
/// when the file name has none.
pub fn split_extension(name: &str) -> (&str, &str) {
    let file_start = name.rfind('/').map_or(0, |pos| pos + 1);
    match name[file_start..].rfind('.') {
        Some(dot) if dot > 0 => name.split_at(file_start + dot),
        _ => (name, ""),
    }
}

/// Build an alternative for a taken name: `posts/small.gif` becomes
/// `posts/small_<7 random alphanumerics>.gif`.
pub fn alternative_name(name: &str) -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(char::from)
        .collect();
    let (stem, ext) = split_extension(name);
    format!("{stem}_{suffix}{ext}")
}
