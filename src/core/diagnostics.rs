//! Warning and error sinks
//!
//! The host owns two append-only collections: one for warnings, one for
//! errors. The plugin only ever appends to them and never reads them back.

use std::sync::Mutex;

use serde::Serialize;

/// Name prefixed to every message the plugin reports to the host
pub const PLUGIN_NAME: &str = "ChmodPlugin";

/// A single warning or error entry handed to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginDiagnostic {
    message: String,
}

impl PluginDiagnostic {
    /// Create a diagnostic, prefixing the message with the plugin name
    pub fn new(message: impl AsRef<str>) -> Self {
        Self {
            message: format!("{}: {}", PLUGIN_NAME, message.as_ref()),
        }
    }

    /// Full message, including the plugin name prefix
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for PluginDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for PluginDiagnostic {}

/// Append-only warning/error channels provided by the host
///
/// Appends may arrive from sibling permission changes in any order.
pub trait DiagnosticSink: Send + Sync {
    /// Record a non-fatal warning
    fn append_warning(&self, warning: PluginDiagnostic);

    /// Record a fatal error
    fn append_error(&self, error: PluginDiagnostic);
}

/// In-memory sink, for hosts without their own collections (and for tests)
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Mutex<Vec<PluginDiagnostic>>,
    errors: Mutex<Vec<PluginDiagnostic>>,
}

impl Diagnostics {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded warnings
    pub fn warnings(&self) -> Vec<PluginDiagnostic> {
        self.warnings
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Snapshot of recorded errors
    pub fn errors(&self) -> Vec<PluginDiagnostic> {
        self.errors.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.warnings().is_empty() && self.errors().is_empty()
    }
}

impl DiagnosticSink for Diagnostics {
    fn append_warning(&self, warning: PluginDiagnostic) {
        self.warnings
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(warning);
    }

    fn append_error(&self, error: PluginDiagnostic) {
        self.errors
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_prefix() {
        let diag = PluginDiagnostic::new("something happened");
        assert_eq!(diag.message(), "ChmodPlugin: something happened");
        assert_eq!(diag.to_string(), "ChmodPlugin: something happened");
    }

    #[test]
    fn test_diagnostics_append_only() {
        let sink = Diagnostics::new();
        assert!(sink.is_empty());

        sink.append_warning(PluginDiagnostic::new("first"));
        sink.append_warning(PluginDiagnostic::new("second"));
        sink.append_error(PluginDiagnostic::new("fatal"));

        let warnings = sink.warnings();
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].message(), "ChmodPlugin: first");
        assert_eq!(warnings[1].message(), "ChmodPlugin: second");
        assert_eq!(sink.errors().len(), 1);
        assert!(!sink.is_empty());
    }
}
