//! Browser detection
//!
//! Infers which supported browsers are installed by probing each catalog
//! entry's registry paths, and resolves the policy root a configuration
//! should be written under.

use crate::catalog::{BrowserCatalog, SOFTWARE_PREFIX};
use crate::registry::{ProbeOutcome, RegistryStore};
use crate::types::BrowserId;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Detect which supported browsers are installed.
///
/// A browser counts as installed if any of its probe paths exists; the
/// first hit short-circuits the remaining probes, so the catalog's path
/// order only matters for performance. A probe that fails with an access
/// error is treated the same as an absent key (fail-closed to "not
/// installed"), so a locked-down key can never flag a browser as present.
///
/// Read-only; the result is computed fresh on every call and never cached.
///
/// # Example
///
/// ```rust
/// use chromtune::{detect_installed, BrowserCatalog, BrowserId, MemoryRegistry};
///
/// let registry = MemoryRegistry::new();
/// registry.add_key(r"SOFTWARE\Google\Chrome");
///
/// let installed = detect_installed(&BrowserCatalog::standard(), &registry);
/// assert_eq!(installed[&BrowserId::Chrome], true);
/// assert_eq!(installed[&BrowserId::Brave], false);
/// ```
pub fn detect_installed(
    catalog: &BrowserCatalog,
    registry: &dyn RegistryStore,
) -> BTreeMap<BrowserId, bool> {
    let mut installed = BTreeMap::new();
    for (id, descriptor) in catalog.iter() {
        let found = descriptor
            .probe_paths
            .iter()
            .any(|path| probe_fail_closed(registry, path));
        debug!(browser = %id, installed = found, "detection probe");
        installed.insert(id, found);
    }
    installed
}

/// Resolve the registry root that policy values for `id` should be written
/// under.
///
/// Returns the first probe path whose existence check succeeds, with the
/// leading `SOFTWARE\` segment stripped (policy subkeys are addressed
/// relative to it). Returns `None` when the browser is not detected as
/// installed, or when the per-path re-check no longer finds any path.
/// Callers treat `None` as "cannot configure this browser" and skip it.
pub fn resolve_policy_root(
    catalog: &BrowserCatalog,
    registry: &dyn RegistryStore,
    id: BrowserId,
) -> Option<String> {
    let descriptor = catalog.describe(id);

    // Re-validate the installed state before committing to a path.
    let installed = descriptor
        .probe_paths
        .iter()
        .any(|path| probe_fail_closed(registry, path));
    if !installed {
        return None;
    }

    descriptor
        .probe_paths
        .iter()
        .find(|path| probe_fail_closed(registry, path))
        .map(|path| path.strip_prefix(SOFTWARE_PREFIX).unwrap_or(path).to_string())
}

/// Probe a path, collapsing access errors into "absent".
fn probe_fail_closed(registry: &dyn RegistryStore, path: &str) -> bool {
    match registry.probe(path) {
        ProbeOutcome::Found => true,
        ProbeOutcome::NotFound => false,
        ProbeOutcome::AccessError => {
            warn!(path, "registry probe denied; treating as not installed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MemoryRegistry;

    #[test]
    fn test_detect_with_no_keys_reports_nothing_installed() {
        let registry = MemoryRegistry::new();
        let installed = detect_installed(&BrowserCatalog::standard(), &registry);

        for id in BrowserId::ALL {
            assert_eq!(installed[&id], false, "{} should not be installed", id);
        }
    }

    #[test]
    fn test_detect_mixed_installations() {
        let registry = MemoryRegistry::new();
        registry.add_key(r"SOFTWARE\Google\Chrome");
        registry.add_key(r"SOFTWARE\Microsoft\Edge");

        let installed = detect_installed(&BrowserCatalog::standard(), &registry);
        assert_eq!(installed[&BrowserId::Chrome], true);
        assert_eq!(installed[&BrowserId::Edge], true);
        assert_eq!(installed[&BrowserId::Brave], false);
    }

    #[test]
    fn test_detect_finds_wow6432node_chrome() {
        let registry = MemoryRegistry::new();
        registry.add_key(r"SOFTWARE\Wow6432Node\Google\Chrome");

        let installed = detect_installed(&BrowserCatalog::standard(), &registry);
        assert_eq!(installed[&BrowserId::Chrome], true);
    }

    #[test]
    fn test_access_error_collapses_to_not_installed() {
        let registry = MemoryRegistry::new();
        registry.add_key(r"SOFTWARE\BraveSoftware\Brave-Browser");
        registry.deny(r"SOFTWARE\BraveSoftware\Brave-Browser");

        let installed = detect_installed(&BrowserCatalog::standard(), &registry);
        assert_eq!(installed[&BrowserId::Brave], false);
    }

    #[test]
    fn test_resolve_root_strips_software_prefix() {
        let registry = MemoryRegistry::new();
        registry.add_key(r"SOFTWARE\Google\Chrome");

        let root = resolve_policy_root(&BrowserCatalog::standard(), &registry, BrowserId::Chrome);
        assert_eq!(root.as_deref(), Some(r"Google\Chrome"));
    }

    #[test]
    fn test_resolve_root_prefers_first_existing_path() {
        let registry = MemoryRegistry::new();
        registry.add_key(r"SOFTWARE\Wow6432Node\Google\Chrome");

        let root = resolve_policy_root(&BrowserCatalog::standard(), &registry, BrowserId::Chrome);
        assert_eq!(root.as_deref(), Some(r"Wow6432Node\Google\Chrome"));
    }

    #[test]
    fn test_resolve_root_for_missing_browser() {
        let registry = MemoryRegistry::new();
        let root = resolve_policy_root(&BrowserCatalog::standard(), &registry, BrowserId::Brave);
        assert_eq!(root, None);
    }
}
