//! Built-in output targets
//!
//! - `LocalFileSystem` - changes modes on the real filesystem via `tokio::fs`
//! - `DryRunFileSystem` - logs what would change and touches nothing

use std::io;
use std::path::Path;

use anyhow::Context;
use tokio::runtime::Handle;

use super::primitive::{ChmodCallback, ChmodPrimitive, OutputFileSystem};

/// Output target backed by the local filesystem
///
/// Each permission change runs as its own tokio task, so `chmod` must be
/// called from within a tokio runtime.
#[derive(Debug, Clone, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    /// Create a new local filesystem target
    pub fn new() -> Self {
        Self
    }
}

impl ChmodPrimitive for LocalFileSystem {
    fn chmod(&self, path: &Path, mode: u32, callback: ChmodCallback) -> anyhow::Result<()> {
        let handle = Handle::try_current().context("No tokio runtime to run permission changes")?;
        let path = path.to_path_buf();

        handle.spawn(async move {
            let result = set_mode(&path, mode).await;
            if let Err(e) = &result {
                tracing::debug!("chmod {:o} {} failed: {}", mode, path.display(), e);
            }
            callback(result);
        });

        Ok(())
    }
}

impl OutputFileSystem for LocalFileSystem {
    fn chmod_primitive(&self) -> Option<&dyn ChmodPrimitive> {
        Some(self)
    }
}

#[cfg(unix)]
async fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).await
}

/// Without unix mode bits, only the read-only flag can be expressed
#[cfg(not(unix))]
async fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    let mut permissions = tokio::fs::metadata(path).await?.permissions();
    permissions.set_readonly(mode & 0o222 == 0);
    tokio::fs::set_permissions(path, permissions).await
}

/// Output target that only logs the changes it is asked to make
#[derive(Debug, Clone, Default)]
pub struct DryRunFileSystem;

impl DryRunFileSystem {
    /// Create a new dry-run target
    pub fn new() -> Self {
        Self
    }
}

impl ChmodPrimitive for DryRunFileSystem {
    fn chmod(&self, path: &Path, mode: u32, callback: ChmodCallback) -> anyhow::Result<()> {
        tracing::info!("[dry-run] chmod {:o} {}", mode, path.display());
        callback(Ok(()));
        Ok(())
    }
}

impl OutputFileSystem for DryRunFileSystem {
    fn chmod_primitive(&self) -> Option<&dyn ChmodPrimitive> {
        Some(self)
    }
}
