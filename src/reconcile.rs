//! Configuration reconciliation
//!
//! Ties detection, the persisted store, policy writes, and process
//! termination together. Everything here is best-effort and per-browser:
//! one browser failing never aborts the batch, there are no transactions
//! and no rollback. The single exception is the up-front overwrite
//! confirmation, which is an intentional all-or-nothing gate (a user
//! decision, not a failure).

use crate::catalog::BrowserCatalog;
use crate::detect::{detect_installed, resolve_policy_root};
use crate::process::ProcessTerminator;
use crate::registry::RegistryStore;
use crate::store::{load_previous, save_config};
use crate::types::{
    ApplyOutcome, ApplyResult, BrowserConfig, BrowserId, OptimizationOptions,
};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Policy sub-key and value written for the memory cap.
const MEMORY_POLICY: (&str, &str) = ("Process", "MaxMemPerProcess");
/// Policy sub-key and value written to disable preloading.
const PRELOAD_POLICY: (&str, &str) = ("Prefetch", "EnablePrefetch");
/// Policy sub-key and value written to disable hardware acceleration.
const HARDWARE_POLICY: (&str, &str) = ("HardwareAcceleration", "EnableHardwareAcceleration");

/// Orchestrates detection, policy writes, persistence, and termination.
///
/// Holds the immutable browser catalog and the registry and process
/// backends injected at construction.
///
/// # Example
///
/// ```rust
/// use chromtune::{
///     BrowserCatalog, BrowserId, MemoryRegistry, OptimizationOptions, Reconciler,
/// };
///
/// let registry = MemoryRegistry::new();
/// registry.add_key(r"SOFTWARE\Google\Chrome");
///
/// let reconciler = Reconciler::new(BrowserCatalog::standard(), &registry);
/// let installed = reconciler.detect();
/// assert!(installed[&BrowserId::Chrome]);
///
/// let outcome = reconciler.apply(
///     &[BrowserId::Chrome],
///     &OptimizationOptions::default(),
///     |_overwritten| true,
/// );
/// let results = outcome.results().unwrap();
/// assert!(results[&BrowserId::Chrome].path_resolved);
/// ```
pub struct Reconciler<'a, R: RegistryStore> {
    catalog: BrowserCatalog,
    registry: &'a R,
}

impl<'a, R: RegistryStore> Reconciler<'a, R> {
    pub fn new(catalog: BrowserCatalog, registry: &'a R) -> Self {
        Self { catalog, registry }
    }

    /// The catalog this reconciler was built with.
    pub fn catalog(&self) -> &BrowserCatalog {
        &self.catalog
    }

    /// Detect installed browsers. See [`detect_installed`].
    pub fn detect(&self) -> BTreeMap<BrowserId, bool> {
        detect_installed(&self.catalog, self.registry)
    }

    /// Load the previously applied configuration. See
    /// [`crate::store::load_previous`] for the exact semantics.
    pub fn load_previous(&self) -> (bool, BTreeMap<BrowserId, BrowserConfig>) {
        load_previous(self.registry)
    }

    /// Apply the selected options to the selected browsers, in the given
    /// order.
    ///
    /// When any selected browser already has a saved configuration,
    /// `confirm_overwrite` is evaluated exactly once, before anything is
    /// written, over the sub-selection that would be overwritten. A `false`
    /// answer aborts the whole operation with zero registry writes and
    /// returns [`ApplyOutcome::Aborted`].
    ///
    /// Otherwise each browser is processed independently:
    ///
    /// 1. Its policy root is resolved; a miss records
    ///    [`ApplyResult::path_not_found`] and moves on.
    /// 2. Up to three policy writes are issued, each gated by its option
    ///    flag; each outcome is recorded on its own, a failure does not
    ///    skip the remaining writes.
    /// 3. The resulting record is persisted with a fresh timestamp.
    pub fn apply<F>(
        &self,
        selected: &[BrowserId],
        options: &OptimizationOptions,
        confirm_overwrite: F,
    ) -> ApplyOutcome
    where
        F: FnOnce(&[BrowserId]) -> bool,
    {
        let (_, previous) = self.load_previous();
        let overwritten: Vec<BrowserId> = selected
            .iter()
            .copied()
            .filter(|id| previous.contains_key(id))
            .collect();

        if !overwritten.is_empty() && !confirm_overwrite(&overwritten) {
            info!("apply aborted: existing configuration kept");
            return ApplyOutcome::Aborted;
        }

        let mut results = BTreeMap::new();
        for &id in selected {
            results.insert(id, self.apply_one(id, options));
        }
        ApplyOutcome::Applied(results)
    }

    fn apply_one(&self, id: BrowserId, options: &OptimizationOptions) -> ApplyResult {
        let Some(root) = resolve_policy_root(&self.catalog, self.registry, id) else {
            warn!(browser = %id, "no registry root found; skipping");
            return ApplyResult::path_not_found();
        };
        info!(browser = %id, root = %root, "configuring");

        let memory_write = options
            .limit_memory
            .then(|| self.write_policy(&root, MEMORY_POLICY, options.memory_limit_mb));
        let preload_write = options
            .disable_preload
            .then(|| self.write_policy(&root, PRELOAD_POLICY, 0));
        let hardware_write = options
            .disable_hardware
            .then(|| self.write_policy(&root, HARDWARE_POLICY, 0));

        let record = BrowserConfig {
            memory_limit_mb: options.memory_limit_mb,
            disable_preload: options.disable_preload,
            disable_hardware: options.disable_hardware,
            last_update: 0, // stamped by save_config
        };
        let saved = save_config(self.registry, id, &record);

        ApplyResult {
            path_resolved: true,
            memory_write,
            preload_write,
            hardware_write,
            saved,
        }
    }

    fn write_policy(&self, root: &str, (subkey, value): (&str, &str), data: u32) -> bool {
        let path = format!(r"SOFTWARE\{}\{}", root, subkey);
        match self.registry.write_dword(&path, value, data) {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %path, value, error = %e, "policy write failed");
                false
            }
        }
    }

    /// Terminate the running processes of the given browsers.
    /// See [`terminate_browsers`].
    pub fn terminate(
        &self,
        browsers: &[BrowserId],
        terminator: &dyn ProcessTerminator,
    ) -> BTreeMap<BrowserId, bool> {
        terminate_browsers(&self.catalog, browsers, terminator)
    }
}

/// Terminate the running processes of the given browsers.
///
/// A browser maps to `true` when at least one of its processes was killed;
/// `false` covers both "nothing was running" and "every kill was
/// rejected", neither of which is an error.
pub fn terminate_browsers(
    catalog: &BrowserCatalog,
    browsers: &[BrowserId],
    terminator: &dyn ProcessTerminator,
) -> BTreeMap<BrowserId, bool> {
    let mut results = BTreeMap::new();
    for &id in browsers {
        let process_name = &catalog.describe(id).process_name;
        let killed = terminator.kill_all_named(process_name);
        info!(browser = %id, process = %process_name, killed, "terminate");
        results.insert(id, killed > 0);
    }
    results
}
