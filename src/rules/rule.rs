//! Rules and rule sets
//!
//! A rule pairs a file mode with an ordered list of patterns. Rules are
//! consulted in configuration order and the first rule with any matching
//! pattern wins.

use serde::Serialize;

use super::pattern::Pattern;

/// A permission rule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    /// Mode bits passed unchanged to the permission-change primitive
    permissions: u32,
    /// Patterns tested against asset names (empty list matches nothing)
    patterns: Vec<Pattern>,
}

impl Rule {
    /// Create a rule from a mode and any number of patterns
    pub fn new<I, P>(permissions: u32, patterns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Pattern>,
    {
        Self {
            permissions,
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a rule with a single pattern
    pub fn single(permissions: u32, pattern: impl Into<Pattern>) -> Self {
        Self {
            permissions,
            patterns: vec![pattern.into()],
        }
    }

    /// Mode bits for matched assets
    pub fn permissions(&self) -> u32 {
        self.permissions
    }

    /// Normalized pattern list
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Check if any pattern matches the asset name
    pub fn matches(&self, asset: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(asset))
    }
}

/// Ordered, immutable collection of rules
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Create a rule set; order determines precedence
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Resolve an asset name to the first matching rule
    pub fn resolve(&self, asset: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.matches(asset))
    }

    /// Get all rules in precedence order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Get the number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if there are no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<T: IntoIterator<Item = Rule>>(iter: T) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}
