//! Selection configuration types

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Throttle window used when `delay` is absent or zero
pub const DEFAULT_THROTTLE_MS: u64 = 200;

/// Unvalidated inputs as supplied by the user
///
/// Filled from command-line flags and, optionally, a TOML config file.
/// Empty strings count as "not provided", same as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawInputs {
    /// Directory to watch
    #[serde(default)]
    pub path: Option<String>,

    /// Comma-separated extension allowlist
    #[serde(default)]
    pub extension: Option<String>,

    /// Comma-separated filename substrings
    #[serde(default)]
    pub file: Option<String>,

    /// Force recursive watching
    #[serde(default)]
    pub recursive: bool,

    /// Throttle window in milliseconds
    #[serde(default)]
    pub delay: Option<u64>,

    /// Shell command to run on a match
    #[serde(default)]
    pub command: Option<String>,

    /// Suppress non-error output
    #[serde(default)]
    pub silence: bool,
}

impl RawInputs {
    /// Layer `self` over `base`: values set here win, booleans are OR-ed
    pub fn or(self, base: RawInputs) -> RawInputs {
        RawInputs {
            path: non_empty(self.path).or(base.path),
            extension: non_empty(self.extension).or(base.extension),
            file: non_empty(self.file).or(base.file),
            recursive: self.recursive || base.recursive,
            delay: self.delay.filter(|d| *d != 0).or(base.delay),
            command: non_empty(self.command).or(base.command),
            silence: self.silence || base.silence,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Which paths count as a match
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionMode {
    /// Match when the changed file's extension is in the set
    ExtensionList(BTreeSet<String>),
    /// Match when any entry is a substring of the changed path
    FileList(Vec<String>),
    /// Match every change
    Any,
}

impl SelectionMode {
    /// Check a changed path (and its extracted extension) against this mode
    pub fn matches(&self, filename: &str, extension: &str) -> bool {
        match self {
            SelectionMode::ExtensionList(extensions) => extensions.contains(extension),
            SelectionMode::FileList(files) => files.iter().any(|f| filename.contains(f.as_str())),
            SelectionMode::Any => true,
        }
    }
}

/// Canonical filter configuration, immutable once resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// Directory to watch
    pub root: String,
    /// Watch subdirectories too
    pub recursive: bool,
    /// Active selection strategy
    pub mode: SelectionMode,
    /// Minimum spacing between accepted events
    pub throttle_ms: u64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            root: ".".to_string(),
            recursive: false,
            mode: SelectionMode::Any,
            throttle_ms: DEFAULT_THROTTLE_MS,
        }
    }
}

/// Output of input resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub filter: FilterConfig,
    pub command: Option<String>,
    pub silence: bool,
}
