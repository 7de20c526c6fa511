//! Startup validation errors

use thiserror::Error;

/// Errors raised while resolving user inputs into a `FilterConfig`
///
/// All variants are fatal: they are returned before any watcher starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Two or more mutually exclusive inputs were provided together
    #[error("The following inputs cannot be used together: {}", .keys.join(", "))]
    ConflictingInputs { keys: Vec<&'static str> },

    /// A `--file` entry starts with `./`
    #[error("Cannot start with relative path: use --file='{suggestion}' instead")]
    RelativePath { suggestion: String },

    /// A `--file` entry contains `../`
    #[error("Cannot look to directory tree higher up: '{entry}'")]
    PathTraversal { entry: String },
}
