//! Hook Registry
//!
//! Contains:
//! - `AfterEmitHook` trait - for implementing after-emit hooks
//! - `HookRegistry` - stores hooks and runs them in registration order

use std::sync::Arc;

use async_trait::async_trait;

use super::types::EmitContext;
use crate::core::PluginResult;

/// Trait for hooks that run after the host has written every output asset
#[async_trait]
pub trait AfterEmitHook: Send + Sync {
    /// Hook name for logging
    fn name(&self) -> &str;

    /// Run the hook; an `Err` fails the build step
    async fn after_emit(&self, ctx: &EmitContext<'_>) -> PluginResult<()>;
}

/// Type alias for stored hooks
pub type ArcHook = Arc<dyn AfterEmitHook>;

/// Central registry for after-emit hooks
///
/// # Example
///
/// ```ignore
/// let mut hooks = HookRegistry::new();
/// hooks.add(ChmodPlugin::from_options(Some(&options))?);
///
/// let sink = Diagnostics::new();
/// let fs = LocalFileSystem::new();
/// let ctx = EmitContext::new(assets, "/abs/dist", &sink).with_output_fs(&fs);
/// hooks.run_after_emit(&ctx).await?;
/// ```
#[derive(Default)]
pub struct HookRegistry {
    hooks: Vec<ArcHook>,
}

impl HookRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a hook
    pub fn add<H: AfterEmitHook + 'static>(&mut self, hook: H) -> &mut Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    /// Get the number of hooks
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run every hook in registration order
    ///
    /// Stops at the first hook that fails; later hooks do not run.
    pub async fn run_after_emit(&self, ctx: &EmitContext<'_>) -> PluginResult<()> {
        for hook in &self.hooks {
            tracing::debug!("[HookRegistry] Running after-emit hook '{}'", hook.name());

            if let Err(e) = hook.after_emit(ctx).await {
                tracing::debug!(
                    "[HookRegistry] Hook '{}' failed, skipping remaining hooks",
                    hook.name()
                );
                return Err(e);
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.hooks.iter().map(|h| h.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Diagnostics, PluginError};
    use std::sync::Mutex;

    struct Recording {
        name: String,
        log: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    #[async_trait]
    impl AfterEmitHook for Recording {
        fn name(&self) -> &str {
            &self.name
        }

        async fn after_emit(&self, ctx: &EmitContext<'_>) -> PluginResult<()> {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.name, ctx.assets.len()));
            if self.fail {
                Err(PluginError::unexpected("hook failed"))
            } else {
                Ok(())
            }
        }
    }

    fn recording(name: &str, log: &Arc<Mutex<Vec<String>>>, fail: bool) -> Recording {
        Recording {
            name: name.to_string(),
            log: log.clone(),
            fail,
        }
    }

    #[tokio::test]
    async fn test_runs_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = HookRegistry::new();
        registry
            .add(recording("first", &log, false))
            .add(recording("second", &log, false));

        assert_eq!(registry.len(), 2);

        let sink = Diagnostics::new();
        let ctx = EmitContext::new(["a.js"], "/out", &sink);
        registry.run_after_emit(&ctx).await.unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["first:1", "second:1"]);
    }

    #[tokio::test]
    async fn test_stops_at_first_failure() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = HookRegistry::new();
        registry
            .add(recording("failing", &log, true))
            .add(recording("never", &log, false));

        let sink = Diagnostics::new();
        let ctx = EmitContext::new(Vec::<String>::new(), "/out", &sink);
        let result = registry.run_after_emit(&ctx).await;

        assert!(matches!(result, Err(PluginError::Unexpected(_))));
        assert_eq!(*log.lock().unwrap(), vec!["failing:0"]);
    }

    #[tokio::test]
    async fn test_empty_registry() {
        let registry = HookRegistry::new();
        assert!(registry.is_empty());

        let sink = Diagnostics::new();
        let ctx = EmitContext::new(["a.js"], "/out", &sink);
        assert!(registry.run_after_emit(&ctx).await.is_ok());
    }
}
