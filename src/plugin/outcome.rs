//! Per-build results
//!
//! - `PlannedChange` - a matched asset with its resolved path and mode
//! - `ChangeOutcome` - what happened to one planned change
//! - `ApplyReport` - everything that happened in one build
//! - `ApplyPhase` - where an invocation currently is

use std::path::PathBuf;

use serde::Serialize;

/// A matched asset awaiting its permission change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedChange {
    /// Asset name as supplied by the host
    pub asset: String,
    /// Output directory joined with the asset name
    pub path: PathBuf,
    /// Mode from the first matching rule
    pub mode: u32,
}

/// Result of one permission change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChangeOutcome {
    /// Mode was set
    Applied { path: PathBuf, mode: u32 },
    /// The primitive reported an error for this file
    Failed {
        path: PathBuf,
        mode: u32,
        error: String,
    },
}

impl ChangeOutcome {
    /// Whether the change failed
    pub fn is_failed(&self) -> bool {
        matches!(self, ChangeOutcome::Failed { .. })
    }
}

/// Summary of a successful invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    /// True when the output target could not change permissions
    pub skipped: bool,
    /// One entry per issued change, in completion-independent order
    pub outcomes: Vec<ChangeOutcome>,
}

impl ApplyReport {
    /// Report for a build whose target lacks the primitive
    pub fn skipped() -> Self {
        Self {
            skipped: true,
            outcomes: Vec::new(),
        }
    }

    /// Number of changes issued
    pub fn issued(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of changes that succeeded
    pub fn applied(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_failed()).count()
    }

    /// Number of changes that reported an error
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }
}

/// Stages of one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyPhase {
    Idle,
    CheckingCapability,
    SkippedNoCapability,
    Matching,
    FanningOut,
    AwaitingAll,
    Completed,
    Failed,
}

impl std::fmt::Display for ApplyPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplyPhase::Idle => write!(f, "Idle"),
            ApplyPhase::CheckingCapability => write!(f, "CheckingCapability"),
            ApplyPhase::SkippedNoCapability => write!(f, "SkippedNoCapability"),
            ApplyPhase::Matching => write!(f, "Matching"),
            ApplyPhase::FanningOut => write!(f, "FanningOut"),
            ApplyPhase::AwaitingAll => write!(f, "AwaitingAll"),
            ApplyPhase::Completed => write!(f, "Completed"),
            ApplyPhase::Failed => write!(f, "Failed"),
        }
    }
}
