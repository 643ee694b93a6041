//! Error types with fix suggestions
//!
//! Only library-level failures live here. Field-level binding problems are
//! never errors in this sense: they are collected as dotted paths by the
//! binder and handed to the failure callback.

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum BindError {
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Document errors (YB-010 to YB-012)
    // ─────────────────────────────────────────────────────────────

    #[error("YB-010: Document root of '{source_name}' is not a mapping")]
    NotAMapping { source_name: String },

    #[error("YB-011: Invalid route '{route}': {reason}")]
    InvalidRoute { route: String, reason: String },

    #[error("YB-012: No value at '{route}'")]
    MissingValue { route: String },

    // ─────────────────────────────────────────────────────────────
    // Version errors (YB-020 to YB-021)
    // ─────────────────────────────────────────────────────────────

    #[error("YB-020: Invalid version format: '{version}'")]
    InvalidVersion { version: String },

    #[error("YB-021: Invalid version number: '{part}'")]
    InvalidVersionPart { part: String },
}

impl FixSuggestion for BindError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            BindError::YamlParse(_) => Some("Check YAML syntax: indentation and quoting"),
            BindError::Io(_) => Some("Check file path and permissions"),
            BindError::Json(_) => Some("Only values with string keys can be printed as JSON"),
            BindError::NotAMapping { .. } => {
                Some("The top level of the document must be a key: value mapping")
            }
            BindError::InvalidRoute { .. } => {
                Some("Use dot separated keys without empty segments, e.g. database.host")
            }
            BindError::MissingValue { .. } => Some("Check the route exists in the document"),
            BindError::InvalidVersion { .. } => {
                Some("Use dot separated numbers only, e.g. 1, 1.2 or 1.2.3")
            }
            BindError::InvalidVersionPart { .. } => {
                Some("Each version segment must fit in a 32-bit integer")
            }
        }
    }
}
