//! Permission applier
//!
//! After the host writes its output assets, every asset matching a rule gets
//! its mode changed through the host's permission-change primitive.
//!
//! The flow for one build:
//! 1. Resolve the output target (skip with a warning if it cannot chmod)
//! 2. Match asset names against the rule set
//! 3. Issue one change per matched asset, without waiting in between
//! 4. Wait for every change; per-file errors become warnings
//! 5. Report completion, or fail the build step on a broken contract

use std::io;
use std::path::Path;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use futures::channel::oneshot;
use futures::future::try_join_all;
use serde_json::Value;

use super::outcome::{ApplyPhase, ApplyReport, ChangeOutcome, PlannedChange};
use crate::core::{ConfigError, DiagnosticSink, PluginDiagnostic, PluginError, PluginResult, PLUGIN_NAME};
use crate::hooks::{AfterEmitHook, EmitContext};
use crate::rules::{PluginOptions, RuleSet};
use crate::target::{ChmodPrimitive, PermissionTarget};

/// Warning recorded when the output target cannot change permissions
pub const NO_CHMOD_MESSAGE: &str =
    "The output file system does not support 'chmod'. Skipping permission changes.";

/// A change that has been issued and not yet observed
struct Pending {
    change: PlannedChange,
    receiver: oneshot::Receiver<io::Result<()>>,
}

/// Applies rule-based file modes to emitted assets
#[derive(Debug, Clone)]
pub struct ChmodPlugin {
    rules: RuleSet,
}

impl ChmodPlugin {
    /// Create a plugin from validated options
    pub fn new(options: PluginOptions) -> Self {
        tracing::info!("{} configured with {} rule(s)", PLUGIN_NAME, options.rules.len());
        Self {
            rules: options.rules,
        }
    }

    /// Validate raw options and create a plugin
    ///
    /// Fails on the first configuration problem; no plugin is produced.
    pub fn from_options(value: Option<&Value>) -> Result<Self, ConfigError> {
        Ok(Self::new(PluginOptions::from_value(value)?))
    }

    /// Get the rule set
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Match asset names against the rules
    ///
    /// Unmatched assets are left out silently.
    pub fn plan<'a, I>(&self, assets: I, output_path: &Path) -> Vec<PlannedChange>
    where
        I: IntoIterator<Item = &'a str>,
    {
        assets
            .into_iter()
            .filter_map(|asset| {
                self.rules.resolve(asset).map(|rule| PlannedChange {
                    asset: asset.to_string(),
                    path: output_path.join(asset),
                    mode: rule.permissions(),
                })
            })
            .collect()
    }

    /// Apply permissions for a completed build
    ///
    /// Per-file failures are recorded as warnings and do not fail the call.
    /// Only a primitive that errors outside its callback (or never calls it)
    /// produces an `Err`, after recording one error on the sink.
    pub async fn apply(&self, ctx: &EmitContext<'_>) -> PluginResult<ApplyReport> {
        let mut phase = ApplyPhase::Idle;

        enter(&mut phase, ApplyPhase::CheckingCapability);
        let primitive = match PermissionTarget::resolve(ctx.output_fs) {
            PermissionTarget::Capable(primitive) => primitive,
            PermissionTarget::Incapable => {
                enter(&mut phase, ApplyPhase::SkippedNoCapability);
                let warning = PluginDiagnostic::new(NO_CHMOD_MESSAGE);
                tracing::warn!("{}", warning);
                ctx.sink.append_warning(warning);
                return Ok(ApplyReport::skipped());
            }
        };

        enter(&mut phase, ApplyPhase::Matching);
        let planned = self.plan(ctx.asset_names(), ctx.output_path());
        tracing::debug!(
            "{} of {} asset(s) matched a rule",
            planned.len(),
            ctx.assets.len()
        );

        enter(&mut phase, ApplyPhase::FanningOut);
        let pending = match issue_all(primitive, planned) {
            Ok(pending) => pending,
            Err(e) => {
                enter(&mut phase, ApplyPhase::Failed);
                return Err(fail(ctx.sink, e));
            }
        };

        enter(&mut phase, ApplyPhase::AwaitingAll);
        let sink = ctx.sink;
        match try_join_all(pending.into_iter().map(|p| observe(p, sink))).await {
            Ok(outcomes) => {
                enter(&mut phase, ApplyPhase::Completed);
                let report = ApplyReport {
                    skipped: false,
                    outcomes,
                };
                tracing::info!(
                    "{}: {} permission change(s) applied, {} failed",
                    PLUGIN_NAME,
                    report.applied(),
                    report.failed()
                );
                Ok(report)
            }
            Err(e) => {
                enter(&mut phase, ApplyPhase::Failed);
                Err(fail(ctx.sink, e))
            }
        }
    }

    /// Apply permissions and signal the host's continuation exactly once
    ///
    /// The continuation receives `None` to proceed or the error that fails
    /// the build step.
    pub async fn apply_with_callback<F>(&self, ctx: &EmitContext<'_>, done: F)
    where
        F: FnOnce(Option<PluginError>),
    {
        done(self.apply(ctx).await.err());
    }
}

#[async_trait]
impl AfterEmitHook for ChmodPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    async fn after_emit(&self, ctx: &EmitContext<'_>) -> PluginResult<()> {
        self.apply(ctx).await.map(|_| ())
    }
}

fn enter(phase: &mut ApplyPhase, next: ApplyPhase) {
    tracing::debug!("[{}] {} -> {}", PLUGIN_NAME, phase, next);
    *phase = next;
}

/// Start every change before observing any of them
fn issue_all(primitive: &dyn ChmodPrimitive, planned: Vec<PlannedChange>) -> anyhow::Result<Vec<Pending>> {
    let mut pending = Vec::with_capacity(planned.len());

    for change in planned {
        let (tx, receiver) = oneshot::channel();
        tracing::debug!("chmod {:o} {}", change.mode, change.path.display());

        primitive
            .chmod(
                &change.path,
                change.mode,
                Box::new(move |result| {
                    // Receiver is gone only if the build already failed
                    let _ = tx.send(result);
                }),
            )
            .with_context(|| format!("chmod threw for {}", change.path.display()))?;

        pending.push(Pending { change, receiver });
    }

    Ok(pending)
}

/// Wait for one change, turning a per-file error into a warning
async fn observe(pending: Pending, sink: &dyn DiagnosticSink) -> anyhow::Result<ChangeOutcome> {
    let Pending { change, receiver } = pending;
    let PlannedChange { path, mode, .. } = change;

    match receiver.await {
        Ok(Ok(())) => Ok(ChangeOutcome::Applied { path, mode }),
        Ok(Err(e)) => {
            let warning = PluginDiagnostic::new(format!(
                "Could not set permissions for {}. Error: {}",
                path.display(),
                e
            ));
            tracing::warn!("{}", warning);
            sink.append_warning(warning);
            Ok(ChangeOutcome::Failed {
                path,
                mode,
                error: e.to_string(),
            })
        }
        Err(oneshot::Canceled) => Err(anyhow!(
            "chmod for {} finished without invoking its callback",
            path.display()
        )),
    }
}

/// Record the single fatal error and build the value that fails the build
fn fail(sink: &dyn DiagnosticSink, cause: anyhow::Error) -> PluginError {
    let err = PluginError::unexpected(format!("{:#}", cause));
    let diagnostic = PluginDiagnostic::new(err.to_string());
    tracing::error!("{}", diagnostic);
    sink.append_error(diagnostic);
    err
}
