//! Error types.
//!
//! Control operations never fail: clicks that resolve to nothing are ignored
//! and late completions are clamped. Errors only come from the edges, when
//! parsing configuration, method names or selectors.

use thiserror::Error;

/// Configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid controls config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("active class must not be empty")]
    EmptyActiveClass,

    #[error("{0} attribute name must not be empty")]
    EmptyAttribute(&'static str),
}

/// A method name that is not one of `filter`, `sort`, `toggle`, `multiMix`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown control method `{0}`")]
pub struct ParseMethodError(pub String);

/// A selector the in-memory document cannot evaluate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unsupported selector `{selector}`: {reason}")]
    Unsupported {
        selector: String,
        reason: &'static str,
    },

    #[error("malformed selector `{selector}` at byte {position}")]
    Malformed { selector: String, position: usize },
}
