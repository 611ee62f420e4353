//! Plugin error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building a rule set from user configuration
///
/// Validation stops at the first problem found, so each variant names exactly
/// one violation (and the index of the offending rule where there is one).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Options value absent, null, or not an object
    #[error("options object is required.")]
    MissingOptions,

    /// `rules` is not an array
    #[error("rules option must be an array.")]
    RulesNotArray,

    /// A rule entry is not an object
    #[error("Rule at index {0} must be an object.")]
    RuleNotObject(usize),

    /// A rule has no `permissions` value
    #[error("permissions option is required for rule at index {0}.")]
    MissingPermissions(usize),

    /// `permissions` is neither an integer nor an octal string
    #[error(
        "permissions option for rule at index {0} must be a non-negative integer or octal string."
    )]
    InvalidPermissions(usize),

    /// A rule has no `patterns` value
    #[error("patterns option is required for rule at index {0}.")]
    MissingPatterns(usize),

    /// `patterns` has the wrong shape
    #[error(
        "patterns option for rule at index {0} must be a string, RegExp, or an array of strings/RegExps."
    )]
    InvalidPatterns(usize),

    /// A regex pattern failed to compile
    #[error("Invalid regular expression in patterns for rule at index {index}: {message}")]
    InvalidRegex { index: usize, message: String },

    /// Options file could not be read
    #[error("Failed to read options file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Options text is not valid JSON
    #[error("Failed to parse options: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors surfaced to the host through the completion signal
#[derive(Error, Debug)]
pub enum PluginError {
    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Anything outside the per-file callback contract
    #[error("An unexpected error occurred. {0}")]
    Unexpected(String),
}

impl PluginError {
    /// Create an unexpected-failure error from any displayable cause
    pub fn unexpected(cause: impl std::fmt::Display) -> Self {
        PluginError::Unexpected(cause.to_string())
    }
}

/// Result type alias for plugin operations
pub type PluginResult<T> = Result<T, PluginError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::RuleNotObject(2);
        assert_eq!(err.to_string(), "Rule at index 2 must be an object.");

        let err = ConfigError::MissingPermissions(0);
        assert_eq!(
            err.to_string(),
            "permissions option is required for rule at index 0."
        );

        let err = ConfigError::InvalidPatterns(1);
        assert_eq!(
            err.to_string(),
            "patterns option for rule at index 1 must be a string, RegExp, or an array of strings/RegExps."
        );
    }

    #[test]
    fn test_unexpected_display() {
        let err = PluginError::unexpected("boom");
        assert_eq!(err.to_string(), "An unexpected error occurred. boom");
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err: PluginError = ConfigError::RulesNotArray.into();
        assert!(matches!(err, PluginError::Config(ConfigError::RulesNotArray)));
        assert_eq!(err.to_string(), "rules option must be an array.");
    }
}
