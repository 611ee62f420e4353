//! Hooks Module
//!
//! The host runs after-emit hooks once all output assets are on disk and
//! before it reports the build step complete.
//!
//! # Example
//!
//! ```ignore
//! use chmod_plugin::hooks::{EmitContext, HookRegistry};
//!
//! let mut hooks = HookRegistry::new();
//! hooks.add(plugin);
//!
//! let ctx = EmitContext::new(manifest.keys(), output_dir, &sink).with_output_fs(&fs);
//! hooks.run_after_emit(&ctx).await?;
//! ```
//!
//! # Completion
//!
//! | Hook returns | Host behavior |
//! |--------------|---------------|
//! | `Ok(())` | Continue; warnings (if any) are reported after the build |
//! | `Err(e)` | Build step fails; remaining hooks are skipped |

mod registry;
mod types;

pub use registry::{AfterEmitHook, ArcHook, HookRegistry};
pub use types::EmitContext;
