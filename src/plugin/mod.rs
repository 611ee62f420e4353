//! Permission applier
//!
//! `ChmodPlugin` turns a rule set into file mode changes after each build.
//!
//! ## Example
//!
//! ```rust,ignore
//! use chmod_plugin::core::Diagnostics;
//! use chmod_plugin::hooks::EmitContext;
//! use chmod_plugin::plugin::ChmodPlugin;
//! use chmod_plugin::target::LocalFileSystem;
//! use serde_json::json;
//!
//! let plugin = ChmodPlugin::from_options(Some(&json!({
//!     "rules": [{ "permissions": 493, "patterns": [{ "regex": "^bin/" }] }]
//! })))?;
//!
//! let sink = Diagnostics::new();
//! let fs = LocalFileSystem::new();
//! let ctx = EmitContext::new(["bin/cli.js", "index.js"], "/abs/dist", &sink)
//!     .with_output_fs(&fs);
//!
//! let report = plugin.apply(&ctx).await?;
//! ```

mod chmod_plugin;
mod outcome;

pub use chmod_plugin::{ChmodPlugin, NO_CHMOD_MESSAGE};
pub use outcome::{ApplyPhase, ApplyReport, ChangeOutcome, PlannedChange};
