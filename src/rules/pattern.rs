//! Asset name patterns
//!
//! A pattern is either an exact asset name or a regular expression. In JSON
//! configuration a plain string is an exact name and an object of the form
//! `{"regex": "\\.js$", "flags": "i"}` is a regular expression.

use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// Matches asset names either exactly or by regular expression
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Matches only an identical asset name (no globbing, no path normalization)
    Exact(String),
    /// Matches when the expression finds a match anywhere in the asset name
    Regex(Regex),
}

impl Pattern {
    /// Create an exact-match pattern
    pub fn exact(name: impl Into<String>) -> Self {
        Pattern::Exact(name.into())
    }

    /// Create a regex pattern
    ///
    /// Pattern examples:
    /// - `r"\.js$"` - all JavaScript assets
    /// - `"^bin/"` - everything under `bin/`
    pub fn regex(source: &str) -> Result<Self, regex::Error> {
        Ok(Pattern::Regex(Regex::new(source)?))
    }

    /// Check if this pattern matches an asset name (case-sensitive unless the
    /// expression says otherwise)
    pub fn matches(&self, asset: &str) -> bool {
        match self {
            Pattern::Exact(name) => name == asset,
            Pattern::Regex(regex) => regex.is_match(asset),
        }
    }

    /// The exact name or the expression source
    pub fn as_str(&self) -> &str {
        match self {
            Pattern::Exact(name) => name,
            Pattern::Regex(regex) => regex.as_str(),
        }
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Pattern::Exact(a), Pattern::Exact(b)) => a == b,
            (Pattern::Regex(a), Pattern::Regex(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl From<&str> for Pattern {
    fn from(name: &str) -> Self {
        Pattern::Exact(name.to_string())
    }
}

impl From<String> for Pattern {
    fn from(name: String) -> Self {
        Pattern::Exact(name)
    }
}

impl From<Regex> for Pattern {
    fn from(regex: Regex) -> Self {
        Pattern::Regex(regex)
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Pattern::Exact(name) => serializer.serialize_str(name),
            Pattern::Regex(regex) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("regex", regex.as_str())?;
                map.end()
            }
        }
    }
}

/// Why a JSON value could not be turned into a pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PatternError {
    /// Not a string and not a well-formed regex object
    Shape,
    /// Regex object whose expression does not compile
    Regex(String),
}

/// Decode one pattern from configuration JSON
pub(crate) fn pattern_from_value(value: &Value) -> Result<Pattern, PatternError> {
    match value {
        Value::String(name) => Ok(Pattern::Exact(name.clone())),
        Value::Object(map) => {
            let source = map
                .get("regex")
                .and_then(|v| v.as_str())
                .ok_or(PatternError::Shape)?;

            let flags = match map.get("flags") {
                None | Some(Value::Null) => "",
                Some(Value::String(flags)) => flags.as_str(),
                Some(_) => return Err(PatternError::Shape),
            };

            let source = with_inline_flags(source, flags)?;
            Regex::new(&source)
                .map(Pattern::Regex)
                .map_err(|e| PatternError::Regex(e.to_string()))
        }
        _ => Err(PatternError::Shape),
    }
}

/// Fold expression flags into an inline group so they survive `as_str()`
///
/// `g`, `y` and `u` have no effect on a single test and are dropped.
fn with_inline_flags(source: &str, flags: &str) -> Result<String, PatternError> {
    let mut inline = String::new();
    for flag in flags.chars() {
        match flag {
            'i' | 'm' | 's' | 'x' => {
                if !inline.contains(flag) {
                    inline.push(flag);
                }
            }
            'g' | 'y' | 'u' => {}
            _ => return Err(PatternError::Shape),
        }
    }

    if inline.is_empty() {
        Ok(source.to_string())
    } else {
        Ok(format!("(?{}){}", inline, source))
    }
}
