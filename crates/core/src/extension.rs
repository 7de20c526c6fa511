//! Extension extraction for changed paths

/// Extract the lowercase extension of the last path segment, without the dot
///
/// Returns an empty string when the file name has no dot. A leading dot
/// counts (`.bashrc` -> `bashrc`), unlike `Path::extension`.
pub fn extract_extension(filename: &str) -> String {
    let name = filename
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename);

    match name.rfind('.') {
        Some(idx) => name[idx + 1..].to_lowercase(),
        None => String::new(),
    }
}
