//! Hook Types
//!
//! `EmitContext` is what the host hands to after-emit hooks once every output
//! asset has been written.

use std::path::{Path, PathBuf};

use crate::core::DiagnosticSink;
use crate::target::OutputFileSystem;

/// Context passed to after-emit hooks
pub struct EmitContext<'a> {
    /// Names of the emitted assets, relative to `output_path`
    pub assets: Vec<String>,

    /// Absolute output directory
    pub output_path: PathBuf,

    /// Host output file system (None when the host has none to offer)
    pub output_fs: Option<&'a dyn OutputFileSystem>,

    /// Host warning/error channels
    pub sink: &'a dyn DiagnosticSink,
}

impl<'a> EmitContext<'a> {
    /// Create a context without an output file system
    ///
    /// `assets` can be the keys of a manifest map; only the names are kept.
    pub fn new<I, S>(assets: I, output_path: impl Into<PathBuf>, sink: &'a dyn DiagnosticSink) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            assets: assets.into_iter().map(Into::into).collect(),
            output_path: output_path.into(),
            output_fs: None,
            sink,
        }
    }

    /// Set the output file system
    pub fn with_output_fs(mut self, output_fs: &'a dyn OutputFileSystem) -> Self {
        self.output_fs = Some(output_fs);
        self
    }

    /// Iterate over asset names
    pub fn asset_names(&self) -> impl Iterator<Item = &str> {
        self.assets.iter().map(String::as_str)
    }

    /// Output directory
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

impl std::fmt::Debug for EmitContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmitContext")
            .field("assets", &self.assets.len())
            .field("output_path", &self.output_path)
            .field("has_output_fs", &self.output_fs.is_some())
            .finish()
    }
}
