//! Plugin options
//!
//! Options arrive as untyped JSON and are validated in a fixed order, failing
//! on the first problem found:
//!
//! ```json
//! {
//!   "rules": [
//!     { "permissions": 493, "patterns": [{ "regex": "\\.js$" }] },
//!     { "permissions": "0644", "patterns": "styles.css" }
//!   ]
//! }
//! ```

use std::path::Path;

use serde_json::{Map, Value};

use super::pattern::{pattern_from_value, PatternError};
use super::rule::{Rule, RuleSet};
use crate::core::ConfigError;

/// Validated plugin options
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PluginOptions {
    /// Rules in precedence order
    pub rules: RuleSet,
}

impl PluginOptions {
    /// Create options from an already-built rule set
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Validate an options value of unknown shape
    ///
    /// `None` stands for an absent options value.
    pub fn from_value(value: Option<&Value>) -> Result<Self, ConfigError> {
        let options = match value {
            Some(Value::Object(map)) => map,
            _ => return Err(ConfigError::MissingOptions),
        };

        let entries = match options.get("rules") {
            Some(Value::Array(entries)) => entries,
            _ => return Err(ConfigError::RulesNotArray),
        };

        let rules = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| rule_from_value(index, entry))
            .collect::<Result<RuleSet, _>>()?;

        Ok(Self { rules })
    }

    /// Parse and validate options from JSON text
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(Some(&value))
    }

    /// Load and validate options from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!("Loaded options from {}", path.display());
        Self::from_json_str(&text)
    }
}

/// Validate one rule entry
fn rule_from_value(index: usize, entry: &Value) -> Result<Rule, ConfigError> {
    let rule = match entry {
        Value::Object(map) => map,
        _ => return Err(ConfigError::RuleNotObject(index)),
    };

    let permissions = present(rule, "permissions").ok_or(ConfigError::MissingPermissions(index))?;

    let patterns = match present(rule, "patterns") {
        Some(value) => value,
        None => return Err(ConfigError::MissingPatterns(index)),
    };

    let decoded = match patterns {
        Value::Array(items) => items
            .iter()
            .map(pattern_from_value)
            .collect::<Result<Vec<_>, _>>(),
        single => pattern_from_value(single).map(|p| vec![p]),
    };

    let patterns = match decoded {
        Ok(patterns) => patterns,
        Err(PatternError::Shape) => return Err(ConfigError::InvalidPatterns(index)),
        Err(PatternError::Regex(message)) => {
            return Err(ConfigError::InvalidRegex { index, message })
        }
    };

    // The mode value is only inspected once both keys have passed their checks
    let mode = mode_from_value(permissions).ok_or(ConfigError::InvalidPermissions(index))?;
    Ok(Rule::new(mode, patterns))
}

/// Read mode bits; zero is a valid mode, not a missing one
fn mode_from_value(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64))
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => parse_octal(s),
        _ => None,
    }
}

/// A key counts as present unless it is missing or `null`
fn present<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|v| !v.is_null())
}

/// Parse `"755"`, `"0755"` or `"0o755"` as octal mode bits
fn parse_octal(text: &str) -> Option<u32> {
    let digits = text.trim();
    let digits = digits
        .strip_prefix("0o")
        .or_else(|| digits.strip_prefix("0O"))
        .unwrap_or(digits);

    if digits.is_empty() {
        return None;
    }
    u32::from_str_radix(digits, 8).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Pattern;
    use serde_json::json;

    fn err(value: Value) -> String {
        PluginOptions::from_value(Some(&value))
            .unwrap_err()
            .to_string()
    }

    #[test]
    fn test_missing_options() {
        let e = PluginOptions::from_value(None).unwrap_err();
        assert_eq!(e.to_string(), "options object is required.");

        assert_eq!(err(json!(null)), "options object is required.");
        assert_eq!(err(json!("rules")), "options object is required.");
        assert_eq!(err(json!([])), "options object is required.");
    }

    #[test]
    fn test_rules_must_be_array() {
        assert_eq!(err(json!({})), "rules option must be an array.");
        assert_eq!(err(json!({"rules": {}})), "rules option must be an array.");
        assert_eq!(err(json!({"rules": "x"})), "rules option must be an array.");
    }

    #[test]
    fn test_rule_must_be_object() {
        assert_eq!(
            err(json!({"rules": [null]})),
            "Rule at index 0 must be an object."
        );
        assert_eq!(
            err(json!({"rules": [{"permissions": 1, "patterns": "a"}, 7]})),
            "Rule at index 1 must be an object."
        );
    }

    #[test]
    fn test_missing_permissions() {
        assert_eq!(
            err(json!({"rules": [{"patterns": "a"}]})),
            "permissions option is required for rule at index 0."
        );
        assert_eq!(
            err(json!({"rules": [{"permissions": null, "patterns": "a"}]})),
            "permissions option is required for rule at index 0."
        );
    }

    #[test]
    fn test_missing_patterns() {
        assert_eq!(
            err(json!({"rules": [
                {"permissions": 493, "patterns": "a"},
                {"permissions": 420}
            ]})),
            "patterns option is required for rule at index 1."
        );
    }

    #[test]
    fn test_invalid_patterns() {
        let expected =
            "patterns option for rule at index 0 must be a string, RegExp, or an array of strings/RegExps.";
        assert_eq!(err(json!({"rules": [{"permissions": 1, "patterns": 5}]})), expected);
        assert_eq!(
            err(json!({"rules": [{"permissions": 1, "patterns": ["a", 5]}]})),
            expected
        );
        assert_eq!(
            err(json!({"rules": [{"permissions": 1, "patterns": {"glob": "*.js"}}]})),
            expected
        );
    }

    #[test]
    fn test_invalid_regex() {
        let e = PluginOptions::from_value(Some(&json!({"rules": [
            {"permissions": 1, "patterns": {"regex": "(unclosed"}}
        ]})))
        .unwrap_err();
        assert!(matches!(e, ConfigError::InvalidRegex { index: 0, .. }));
    }

    #[test]
    fn test_invalid_permissions() {
        let expected =
            "permissions option for rule at index 0 must be a non-negative integer or octal string.";
        assert_eq!(err(json!({"rules": [{"permissions": -1, "patterns": "a"}]})), expected);
        assert_eq!(err(json!({"rules": [{"permissions": 1.5, "patterns": "a"}]})), expected);
        assert_eq!(
            err(json!({"rules": [{"permissions": 4_294_967_296u64, "patterns": "a"}]})),
            expected
        );
        assert_eq!(err(json!({"rules": [{"permissions": "rwx", "patterns": "a"}]})), expected);
        assert_eq!(err(json!({"rules": [{"permissions": true, "patterns": "a"}]})), expected);
    }

    #[test]
    fn test_patterns_checks_come_before_mode_value() {
        assert_eq!(
            err(json!({"rules": [{"permissions": "rwx"}]})),
            "patterns option is required for rule at index 0."
        );
        assert_eq!(
            err(json!({"rules": [{"permissions": true, "patterns": 5}]})),
            "patterns option for rule at index 0 must be a string, RegExp, or an array of strings/RegExps."
        );
        assert!(matches!(
            PluginOptions::from_value(Some(&json!({"rules": [
                {"permissions": -3, "patterns": {"regex": "("}}
            ]}))),
            Err(ConfigError::InvalidRegex { index: 0, .. })
        ));
    }

    #[test]
    fn test_integral_float_mode_accepted() {
        let options = PluginOptions::from_value(Some(&json!({"rules": [
            {"permissions": 493.0, "patterns": "a"}
        ]})))
        .unwrap();
        assert_eq!(options.rules.rules()[0].permissions(), 0o755);
    }

    #[test]
    fn test_validation_stops_at_first_bad_rule() {
        // Rule 0 lacks permissions, rule 1 is not even an object
        assert_eq!(
            err(json!({"rules": [{"patterns": "a"}, null]})),
            "permissions option is required for rule at index 0."
        );
    }

    #[test]
    fn test_zero_permissions_accepted() {
        let options = PluginOptions::from_value(Some(&json!({"rules": [
            {"permissions": 0, "patterns": "secret.key"}
        ]})))
        .unwrap();
        assert_eq!(options.rules.rules()[0].permissions(), 0);
    }

    #[test]
    fn test_octal_strings() {
        let options = PluginOptions::from_value(Some(&json!({"rules": [
            {"permissions": "755", "patterns": "a"},
            {"permissions": "0644", "patterns": "b"},
            {"permissions": "0o600", "patterns": "c"}
        ]})))
        .unwrap();

        let modes: Vec<u32> = options.rules.rules().iter().map(|r| r.permissions()).collect();
        assert_eq!(modes, vec![0o755, 0o644, 0o600]);
    }

    #[test]
    fn test_patterns_normalized_to_list() {
        let options = PluginOptions::from_value(Some(&json!({"rules": [
            {"permissions": 493, "patterns": "cli.js"},
            {"permissions": 493, "patterns": ["cli.js"]},
            {"permissions": 420, "patterns": {"regex": "\\.css$"}},
            {"permissions": 420, "patterns": [{"regex": "\\.css$"}]},
            {"permissions": 420, "patterns": []}
        ]})))
        .unwrap();

        let rules = options.rules.rules();
        assert_eq!(rules.len(), 5);
        assert_eq!(rules[0], rules[1]);
        assert_eq!(rules[0].patterns(), &[Pattern::exact("cli.js")]);
        assert_eq!(rules[2], rules[3]);
        assert_eq!(rules[2].patterns().len(), 1);
        assert!(rules[4].patterns().is_empty());
    }

    #[test]
    fn test_empty_rules() {
        let options = PluginOptions::from_value(Some(&json!({"rules": []}))).unwrap();
        assert!(options.rules.is_empty());
    }

    #[test]
    fn test_from_json_str() {
        let options =
            PluginOptions::from_json_str(r#"{"rules": [{"permissions": 493, "patterns": "a"}]}"#)
                .unwrap();
        assert_eq!(options.rules.len(), 1);

        let e = PluginOptions::from_json_str("{not json").unwrap_err();
        assert!(matches!(e, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chmod.json");
        std::fs::write(
            &path,
            r#"{"rules": [{"permissions": "0755", "patterns": [{"regex": "^bin/"}]}]}"#,
        )
        .unwrap();

        let options = PluginOptions::from_file(&path).unwrap();
        assert_eq!(options.rules.resolve("bin/tool").unwrap().permissions(), 0o755);

        let e = PluginOptions::from_file(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(e, ConfigError::Io { .. }));
    }
}
