//! Output targets
//!
//! The host's output file system may or may not be able to change file
//! modes. The target is resolved once per build into a `PermissionTarget`:
//! `Capable` (with its primitive) or `Incapable`.

mod local;
mod primitive;

pub use local::{DryRunFileSystem, LocalFileSystem};
pub use primitive::{
    supports_chmod, ChmodCallback, ChmodPrimitive, OutputFileSystem, PermissionTarget,
};
