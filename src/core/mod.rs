//! Core types for the plugin
//!
//! - `ConfigError` / `PluginError` - Error types
//! - `DiagnosticSink` - Host warning/error channels

pub mod diagnostics;
pub mod error;

pub use diagnostics::{DiagnosticSink, Diagnostics, PluginDiagnostic, PLUGIN_NAME};
pub use error::{ConfigError, PluginError, PluginResult};
