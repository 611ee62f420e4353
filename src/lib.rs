pub mod core;
pub mod rules;
pub mod target;

// Host integration
pub mod hooks;

// The permission applier
pub mod plugin;

// Optional components
pub mod logging;

pub use crate::core::{ConfigError, DiagnosticSink, Diagnostics, PluginError, PluginResult};
pub use crate::plugin::ChmodPlugin;
