//! Persisted configuration store
//!
//! Applied configurations live under a dedicated application key,
//! one sub-key per browser with four DWORD values:
//! `memory_limit` (MB), `disable_preload` (0/1), `disable_hardware` (0/1),
//! and `last_update` (Unix seconds).

use crate::registry::RegistryStore;
use crate::types::{BrowserConfig, BrowserId};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, error};

/// Application key for persisted configurations, relative to HKLM.
pub const APP_KEY: &str = r"SOFTWARE\ChromTune";

const VALUE_MEMORY_LIMIT: &str = "memory_limit";
const VALUE_DISABLE_PRELOAD: &str = "disable_preload";
const VALUE_DISABLE_HARDWARE: &str = "disable_hardware";
const VALUE_LAST_UPDATE: &str = "last_update";

/// Load any previously applied configuration.
///
/// The first returned flag says whether the application key existed at all;
/// a missing key is the normal first-run condition, not an error, and
/// yields `(false, empty)`. When the key exists, every supported browser's
/// sub-key is read; a browser whose record is missing or has any unreadable
/// field is silently omitted. The flag is `true` even when the resulting
/// store is empty.
pub fn load_previous(registry: &dyn RegistryStore) -> (bool, BTreeMap<BrowserId, BrowserConfig>) {
    if !registry.probe(APP_KEY).is_found() {
        debug!("no previous configuration key");
        return (false, BTreeMap::new());
    }

    let mut store = BTreeMap::new();
    for id in BrowserId::ALL {
        if let Some(config) = read_record(registry, id) {
            store.insert(id, config);
        }
    }
    (true, store)
}

/// Read one browser's record; all four fields must be present.
fn read_record(registry: &dyn RegistryStore, id: BrowserId) -> Option<BrowserConfig> {
    let path = browser_key(id);
    let memory_limit_mb = registry.read_dword(&path, VALUE_MEMORY_LIMIT)?;
    let disable_preload = registry.read_dword(&path, VALUE_DISABLE_PRELOAD)?;
    let disable_hardware = registry.read_dword(&path, VALUE_DISABLE_HARDWARE)?;
    let last_update = registry.read_dword(&path, VALUE_LAST_UPDATE)?;

    Some(BrowserConfig {
        memory_limit_mb,
        disable_preload: disable_preload != 0,
        disable_hardware: disable_hardware != 0,
        last_update: u64::from(last_update),
    })
}

/// Save a browser's configuration record.
///
/// Creates the application key and the per-browser sub-key when absent.
/// `last_update` is stamped with the current time; whatever timestamp the
/// caller put in `config` is ignored. Returns `false` (after logging the
/// reason) if any of the four writes fails; the record must then be treated
/// as not durably saved. A failed save never aborts processing of other
/// browsers.
pub fn save_config(registry: &dyn RegistryStore, id: BrowserId, config: &BrowserConfig) -> bool {
    let path = browser_key(id);
    let stamped = now_unix();

    let writes = [
        (VALUE_MEMORY_LIMIT, config.memory_limit_mb),
        (VALUE_DISABLE_PRELOAD, u32::from(config.disable_preload)),
        (VALUE_DISABLE_HARDWARE, u32::from(config.disable_hardware)),
        (VALUE_LAST_UPDATE, stamped as u32),
    ];

    for (name, data) in writes {
        if let Err(e) = registry.write_dword(&path, name, data) {
            error!(browser = %id, value = name, error = %e, "failed to save configuration");
            return false;
        }
    }
    true
}

fn browser_key(id: BrowserId) -> String {
    // Sub-key names match the catalog identifiers, capitalized as the
    // original key layout had them.
    let name = match id {
        BrowserId::Chrome => "Chrome",
        BrowserId::Edge => "Edge",
        BrowserId::Brave => "Brave",
    };
    format!(r"{}\{}", APP_KEY, name)
}

/// Current Unix time in seconds.
pub(crate) fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
