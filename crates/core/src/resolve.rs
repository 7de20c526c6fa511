//! Input resolution
//!
//! Validates raw user inputs and normalizes them into a `FilterConfig`.
//! Runs once at startup; nothing is watched until this succeeds.

use crate::config::{FilterConfig, RawInputs, Resolved, SelectionMode, DEFAULT_THROTTLE_MS};
use crate::error::ResolveError;
use std::collections::BTreeSet;
use tracing::debug;

/// Resolve raw inputs into a filter configuration and command
pub fn resolve(raw: RawInputs) -> Result<Resolved, ResolveError> {
    let path = provided(raw.path);
    let extension = provided(raw.extension);
    let file = provided(raw.file);

    check_exclusive(&[("path", path.is_some()), ("file", file.is_some())])?;
    check_exclusive(&[("extension", extension.is_some()), ("file", file.is_some())])?;

    let files = file.as_deref().map(split_list).unwrap_or_default();
    validate_file_entries(&files)?;

    let recursive = raw.recursive || infer_recursive(&files);

    // A file list disables extension matching even if both reached this point
    let mode = if file.is_some() {
        SelectionMode::FileList(files)
    } else if let Some(extension) = extension {
        SelectionMode::ExtensionList(normalize_extensions(&extension))
    } else {
        SelectionMode::Any
    };

    let throttle_ms = match raw.delay {
        None | Some(0) => DEFAULT_THROTTLE_MS,
        Some(delay) => delay,
    };

    let filter = FilterConfig {
        root: path.unwrap_or_else(|| ".".to_string()),
        recursive,
        mode,
        throttle_ms,
    };

    debug!(?filter, "Resolved filter configuration");

    Ok(Resolved {
        filter,
        command: provided(raw.command),
        silence: raw.silence,
    })
}

/// Recursion is implied when any file entry lives in a subdirectory
pub fn infer_recursive(files: &[String]) -> bool {
    files.iter().any(|f| f.contains('/'))
}

fn provided(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn check_exclusive(set: &[(&'static str, bool)]) -> Result<(), ResolveError> {
    let given = set.iter().filter(|(_, present)| *present).count();
    if given > 1 {
        return Err(ResolveError::ConflictingInputs {
            keys: set.iter().map(|(key, _)| *key).collect(),
        });
    }
    Ok(())
}

fn validate_file_entries(files: &[String]) -> Result<(), ResolveError> {
    if let Some(entry) = files.iter().find(|f| f.starts_with("./")) {
        return Err(ResolveError::RelativePath {
            suggestion: entry[2..].to_string(),
        });
    }

    if let Some(entry) = files.iter().find(|f| f.contains("../")) {
        return Err(ResolveError::PathTraversal {
            entry: entry.clone(),
        });
    }

    Ok(())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn normalize_extensions(value: &str) -> BTreeSet<String> {
    split_list(value)
        .into_iter()
        .map(|ext| ext.strip_prefix('.').unwrap_or(&ext).to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}
