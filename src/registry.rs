//! Registry access
//!
//! This module abstracts the machine-wide registry behind the
//! [`RegistryStore`] trait so the detection and reconciliation logic can be
//! exercised without touching a live registry. Two backends are provided:
//!
//! - [`WinRegistry`] (Windows only): thin wrapper over `winreg` against
//!   `HKEY_LOCAL_MACHINE`, always opening keys with `KEY_WOW64_64KEY` so a
//!   32-bit build sees the same 64-bit view as the browsers do.
//! - [`MemoryRegistry`]: an in-memory key/value store with failure
//!   injection, used by the test suite and for development on non-Windows
//!   hosts.
//!
//! Probe results keep "the key is absent" and "the key could not be read"
//! distinct; callers decide at which boundary to collapse the two.

use crate::error::{Error, Result};

/// Outcome of probing a registry path for existence.
///
/// Detection collapses [`ProbeOutcome::AccessError`] into "not installed"
/// (fail-closed), but the distinction is preserved here for logging and
/// tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The key exists and is readable.
    Found,
    /// The key does not exist.
    NotFound,
    /// The key could not be opened for a reason other than absence,
    /// e.g. permission denied.
    AccessError,
}

impl ProbeOutcome {
    /// True only for [`ProbeOutcome::Found`].
    pub fn is_found(self) -> bool {
        matches!(self, ProbeOutcome::Found)
    }
}

/// Primitive DWORD-level access to a registry hive.
///
/// All paths are relative to the hive root (`HKEY_LOCAL_MACHINE` for the
/// live backend). Handles are never exposed: every method opens, uses, and
/// releases its key before returning, on error paths included.
pub trait RegistryStore {
    /// Probe a key path for existence.
    fn probe(&self, path: &str) -> ProbeOutcome;

    /// Read a named DWORD value. `None` covers both an absent value and a
    /// read failure; callers that need the distinction should `probe` first.
    fn read_dword(&self, path: &str, name: &str) -> Option<u32>;

    /// Write a named DWORD value, creating the key path (and any missing
    /// parents) first.
    fn write_dword(&self, path: &str, name: &str, data: u32) -> Result<()>;
}

/// Live registry backend over `HKEY_LOCAL_MACHINE`.
#[cfg(windows)]
#[derive(Debug, Default)]
pub struct WinRegistry;

#[cfg(windows)]
impl WinRegistry {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(windows)]
impl RegistryStore for WinRegistry {
    fn probe(&self, path: &str) -> ProbeOutcome {
        use winreg::enums::{HKEY_LOCAL_MACHINE, KEY_READ, KEY_WOW64_64KEY};
        use winreg::RegKey;

        let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
        match hklm.open_subkey_with_flags(path, KEY_READ | KEY_WOW64_64KEY) {
            Ok(_) => ProbeOutcome::Found,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => ProbeOutcome::NotFound,
            Err(e) => {
                tracing::debug!(path, error = %e, "registry probe failed");
                ProbeOutcome::AccessError
            }
        }
    }

    fn read_dword(&self, path: &str, name: &str) -> Option<u32> {
        use winreg::enums::{HKEY_LOCAL_MACHINE, KEY_READ, KEY_WOW64_64KEY};
        use winreg::RegKey;

        let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
        let key = hklm.open_subkey_with_flags(path, KEY_READ | KEY_WOW64_64KEY).ok()?;
        key.get_value::<u32, _>(name).ok()
    }

    fn write_dword(&self, path: &str, name: &str, data: u32) -> Result<()> {
        use winreg::enums::{HKEY_LOCAL_MACHINE, KEY_WOW64_64KEY, KEY_WRITE};
        use winreg::RegKey;

        let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
        let (key, _disposition) = hklm
            .create_subkey_with_flags(path, KEY_WRITE | KEY_WOW64_64KEY)
            .map_err(|e| Error::Registry {
                path: path.to_string(),
                message: e.to_string(),
            })?;
        key.set_value(name, &data).map_err(|e| Error::Registry {
            path: format!(r"{}\{}", path, name),
            message: e.to_string(),
        })
    }
}

/// In-memory registry backend.
///
/// Besides plain key/value storage it supports injecting access-denied
/// probes and write failures, and counts writes, which the reconciliation
/// tests use to assert that aborted operations touch nothing.
///
/// # Example
///
/// ```rust
/// use chromtune::{MemoryRegistry, ProbeOutcome, RegistryStore};
///
/// let registry = MemoryRegistry::new();
/// assert_eq!(registry.probe(r"SOFTWARE\Google\Chrome"), ProbeOutcome::NotFound);
///
/// registry.add_key(r"SOFTWARE\Google\Chrome");
/// assert_eq!(registry.probe(r"SOFTWARE\Google\Chrome"), ProbeOutcome::Found);
///
/// registry.write_dword(r"SOFTWARE\Google\Chrome\Process", "MaxMemPerProcess", 4096).unwrap();
/// assert_eq!(registry.read_dword(r"SOFTWARE\Google\Chrome\Process", "MaxMemPerProcess"), Some(4096));
/// assert_eq!(registry.write_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    inner: std::sync::Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    keys: std::collections::BTreeSet<String>,
    values: std::collections::BTreeMap<String, std::collections::BTreeMap<String, u32>>,
    denied: std::collections::BTreeSet<String>,
    write_failures: std::collections::BTreeSet<String>,
    writes: u64,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a key (and all of its parents), with no values.
    pub fn add_key(&self, path: &str) {
        let mut state = self.inner.lock().unwrap();
        insert_key_chain(&mut state.keys, path);
    }

    /// Make probes of `path` report [`ProbeOutcome::AccessError`].
    pub fn deny(&self, path: &str) {
        let mut state = self.inner.lock().unwrap();
        state.denied.insert(path.to_string());
    }

    /// Make every write under `path` (the key itself or any descendant)
    /// fail.
    pub fn fail_writes_under(&self, path: &str) {
        let mut state = self.inner.lock().unwrap();
        state.write_failures.insert(path.to_string());
    }

    /// Number of successful writes performed so far.
    pub fn write_count(&self) -> u64 {
        self.inner.lock().unwrap().writes
    }

    /// Read back a stored value without going through the trait, for
    /// assertions.
    pub fn dword(&self, path: &str, name: &str) -> Option<u32> {
        let state = self.inner.lock().unwrap();
        state.values.get(path).and_then(|values| values.get(name)).copied()
    }
}

fn insert_key_chain(keys: &mut std::collections::BTreeSet<String>, path: &str) {
    let mut prefix = String::new();
    for segment in path.split('\\') {
        if !prefix.is_empty() {
            prefix.push('\\');
        }
        prefix.push_str(segment);
        keys.insert(prefix.clone());
    }
}

impl RegistryStore for MemoryRegistry {
    fn probe(&self, path: &str) -> ProbeOutcome {
        let state = self.inner.lock().unwrap();
        if state.denied.contains(path) {
            return ProbeOutcome::AccessError;
        }
        if state.keys.contains(path) || state.values.contains_key(path) {
            ProbeOutcome::Found
        } else {
            ProbeOutcome::NotFound
        }
    }

    fn read_dword(&self, path: &str, name: &str) -> Option<u32> {
        let state = self.inner.lock().unwrap();
        if state.denied.contains(path) {
            return None;
        }
        state.values.get(path).and_then(|values| values.get(name)).copied()
    }

    fn write_dword(&self, path: &str, name: &str, data: u32) -> Result<()> {
        let mut state = self.inner.lock().unwrap();
        let blocked = state
            .write_failures
            .iter()
            .any(|prefix| path == prefix.as_str() || path.starts_with(&format!(r"{}\", prefix)));
        if blocked {
            return Err(Error::Registry {
                path: path.to_string(),
                message: "access denied".to_string(),
            });
        }
        insert_key_chain(&mut state.keys, path);
        state
            .values
            .entry(path.to_string())
            .or_default()
            .insert(name.to_string(), data);
        state.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_absent_key_is_not_found() {
        let registry = MemoryRegistry::new();
        assert_eq!(registry.probe(r"SOFTWARE\Nope"), ProbeOutcome::NotFound);
    }

    #[test]
    fn test_write_creates_parent_keys() {
        let registry = MemoryRegistry::new();
        registry
            .write_dword(r"SOFTWARE\ChromTune\Chrome", "memory_limit", 2048)
            .unwrap();

        assert_eq!(registry.probe(r"SOFTWARE\ChromTune"), ProbeOutcome::Found);
        assert_eq!(registry.probe(r"SOFTWARE\ChromTune\Chrome"), ProbeOutcome::Found);
        assert_eq!(registry.probe("SOFTWARE"), ProbeOutcome::Found);
    }

    #[test]
    fn test_denied_probe_reports_access_error() {
        let registry = MemoryRegistry::new();
        registry.add_key(r"SOFTWARE\Locked");
        registry.deny(r"SOFTWARE\Locked");

        assert_eq!(registry.probe(r"SOFTWARE\Locked"), ProbeOutcome::AccessError);
        assert!(!registry.probe(r"SOFTWARE\Locked").is_found());
    }

    #[test]
    fn test_injected_write_failure_covers_descendants() {
        let registry = MemoryRegistry::new();
        registry.fail_writes_under(r"SOFTWARE\ReadOnly");

        assert!(registry.write_dword(r"SOFTWARE\ReadOnly", "x", 1).is_err());
        assert!(registry.write_dword(r"SOFTWARE\ReadOnly\Sub", "x", 1).is_err());
        assert!(registry.write_dword(r"SOFTWARE\ReadOnlyOther", "x", 1).is_ok());
        assert_eq!(registry.write_count(), 1);
    }

    #[test]
    fn test_read_dword_missing_value() {
        let registry = MemoryRegistry::new();
        registry.write_dword(r"SOFTWARE\App", "present", 7).unwrap();

        assert_eq!(registry.read_dword(r"SOFTWARE\App", "present"), Some(7));
        assert_eq!(registry.read_dword(r"SOFTWARE\App", "absent"), None);
        assert_eq!(registry.read_dword(r"SOFTWARE\Other", "present"), None);
    }
}
