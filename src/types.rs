use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier for a supported Chromium-based browser.
///
/// This is a closed set: every operation in the crate is total over it, and
/// unknown browsers are a compile-time impossibility rather than a runtime
/// condition.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum BrowserId {
    Chrome,
    Edge,
    Brave,
}

impl BrowserId {
    /// All supported browsers, in catalog order.
    pub const ALL: [BrowserId; 3] = [BrowserId::Chrome, BrowserId::Edge, BrowserId::Brave];
}

impl fmt::Display for BrowserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BrowserId::Chrome => "chrome",
            BrowserId::Edge => "edge",
            BrowserId::Brave => "brave",
        };
        write!(f, "{}", name)
    }
}

/// Per-browser configuration as persisted under the application registry key.
///
/// A record is always written as a whole: all four fields go to the registry
/// together on save, and a stored record missing any field is dropped
/// wholesale on load rather than surfaced partially.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Per-process memory cap, in megabytes. Positive.
    pub memory_limit_mb: u32,
    /// Whether page preloading/prefetch is disabled.
    pub disable_preload: bool,
    /// Whether hardware acceleration is disabled.
    pub disable_hardware: bool,
    /// Unix timestamp (seconds) of the last apply. Stamped by the
    /// reconciler on every save; caller-supplied values are ignored.
    pub last_update: u64,
}

/// The option template a user selects before an apply.
///
/// Each registry policy write is gated by its flag; the persisted
/// [`BrowserConfig`] record always carries all values, mirroring how the
/// form state is saved even for unchecked options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizationOptions {
    /// Write the per-process memory cap policy.
    pub limit_memory: bool,
    /// Memory cap value, in megabytes.
    pub memory_limit_mb: u32,
    /// Write the disable-preload policy.
    pub disable_preload: bool,
    /// Write the disable-hardware-acceleration policy.
    pub disable_hardware: bool,
}

impl Default for OptimizationOptions {
    fn default() -> Self {
        Self {
            limit_memory: true,
            memory_limit_mb: 4096,
            disable_preload: true,
            disable_hardware: true,
        }
    }
}

/// Per-browser outcome of an apply.
///
/// `None` for a write field means that option was not requested (or the
/// browser's policy root could not be resolved, in which case no write was
/// attempted at all).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyResult {
    /// Whether a registry policy root was resolved for this browser.
    pub path_resolved: bool,
    /// Outcome of the memory-limit policy write, if requested.
    pub memory_write: Option<bool>,
    /// Outcome of the disable-preload policy write, if requested.
    pub preload_write: Option<bool>,
    /// Outcome of the disable-hardware-acceleration policy write, if requested.
    pub hardware_write: Option<bool>,
    /// Whether the resulting configuration record was durably saved.
    pub saved: bool,
}

impl ApplyResult {
    /// Result for a browser whose policy root could not be resolved.
    /// No writes were attempted.
    pub fn path_not_found() -> Self {
        Self {
            path_resolved: false,
            memory_write: None,
            preload_write: None,
            hardware_write: None,
            saved: false,
        }
    }

    /// True if at least one requested policy write succeeded.
    pub fn any_write_succeeded(&self) -> bool {
        [self.memory_write, self.preload_write, self.hardware_write]
            .iter()
            .any(|w| *w == Some(true))
    }
}

/// Outcome of a whole apply operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The user declined to overwrite an existing configuration. Nothing
    /// was written.
    Aborted,
    /// Per-browser results, in selection order.
    Applied(BTreeMap<BrowserId, ApplyResult>),
}

impl ApplyOutcome {
    /// The per-browser results, or `None` if the operation was aborted.
    pub fn results(&self) -> Option<&BTreeMap<BrowserId, ApplyResult>> {
        match self {
            ApplyOutcome::Aborted => None,
            ApplyOutcome::Applied(results) => Some(results),
        }
    }
}

/// One row of a detection report, as rendered by the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionEntry {
    pub id: BrowserId,
    pub display_name: String,
    pub installed: bool,
}
