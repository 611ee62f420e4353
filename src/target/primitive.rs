//! Permission-change primitive and output targets
//!
//! Contains:
//! - `ChmodPrimitive` trait - the host's `(path, mode, callback)` operation
//! - `OutputFileSystem` trait - the host's output target, which may or may not
//!   expose the primitive
//! - `PermissionTarget` - the target resolved once per build

use std::io;
use std::path::Path;

/// Completion callback for one permission change
///
/// Must be invoked exactly once: `Ok(())` on success, `Err` with a readable
/// description on failure.
pub type ChmodCallback = Box<dyn FnOnce(io::Result<()>) + Send + 'static>;

/// Host operation that sets a file's mode asynchronously
///
/// There are two failure channels and they mean different things:
/// - the callback receiving `Err` is an ordinary per-file failure
/// - `chmod` itself returning `Err`, or dropping the callback without calling
///   it, breaks the contract and fails the whole build step
pub trait ChmodPrimitive: Send + Sync {
    /// Start changing the mode of `path` to `mode`
    fn chmod(&self, path: &Path, mode: u32, callback: ChmodCallback) -> anyhow::Result<()>;
}

/// Implement ChmodPrimitive for closures
impl<F> ChmodPrimitive for F
where
    F: Fn(&Path, u32, ChmodCallback) -> anyhow::Result<()> + Send + Sync,
{
    fn chmod(&self, path: &Path, mode: u32, callback: ChmodCallback) -> anyhow::Result<()> {
        (self)(path, mode, callback)
    }
}

/// The host's output file system
///
/// Only the permission-change capability is of interest here; everything else
/// about the file system is opaque.
pub trait OutputFileSystem: Send + Sync {
    /// The permission-change primitive, if this file system has one
    fn chmod_primitive(&self) -> Option<&dyn ChmodPrimitive> {
        None
    }
}

/// Output target resolved at the start of a build
pub enum PermissionTarget<'a> {
    /// Target exposes a permission-change primitive
    Capable(&'a dyn ChmodPrimitive),
    /// Target absent or without the primitive
    Incapable,
}

impl<'a> PermissionTarget<'a> {
    /// Resolve the host's (possibly absent) output file system
    pub fn resolve(output_fs: Option<&'a dyn OutputFileSystem>) -> Self {
        match output_fs.and_then(|fs| fs.chmod_primitive()) {
            Some(primitive) => PermissionTarget::Capable(primitive),
            None => PermissionTarget::Incapable,
        }
    }

    /// Whether permission changes can be made
    pub fn is_capable(&self) -> bool {
        matches!(self, PermissionTarget::Capable(_))
    }
}

impl std::fmt::Debug for PermissionTarget<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionTarget::Capable(_) => f.write_str("Capable"),
            PermissionTarget::Incapable => f.write_str("Incapable"),
        }
    }
}

/// Capability probe: does this output target support permission changes?
pub fn supports_chmod(output_fs: Option<&dyn OutputFileSystem>) -> bool {
    PermissionTarget::resolve(output_fs).is_capable()
}
