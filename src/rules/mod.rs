//! Rule model
//!
//! Rules map asset names to file modes:
//! - `Pattern`: exact name or regular expression
//! - `Rule`: a mode plus an ordered pattern list
//! - `RuleSet`: ordered rules, first match wins
//! - `PluginOptions`: validation of user configuration into a `RuleSet`
//!
//! ## Example
//!
//! ```rust,ignore
//! use chmod_plugin::rules::{Pattern, Rule, RuleSet};
//!
//! let rules = RuleSet::new(vec![
//!     Rule::single(0o755, Pattern::regex(r"\.js$")?),
//!     Rule::single(0o644, Pattern::regex(r"\.css$")?),
//! ]);
//!
//! assert_eq!(rules.resolve("script.js").map(|r| r.permissions()), Some(0o755));
//! assert!(rules.resolve("readme.txt").is_none());
//! ```

mod config;
mod pattern;
mod rule;

pub use config::PluginOptions;
pub use pattern::Pattern;
pub use rule::{Rule, RuleSet};
