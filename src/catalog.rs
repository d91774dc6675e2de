//! Browser catalog
//!
//! Static descriptions of the supported Chromium-based browsers: which
//! registry paths indicate an installation, which executable their
//! processes run under, and how to label them for users.

use crate::types::BrowserId;

/// The fixed leading segment shared by every probe path. Policy roots are
/// stored relative to it.
pub const SOFTWARE_PREFIX: &str = "SOFTWARE\\";

/// Static description of one supported browser.
#[derive(Debug, Clone)]
pub struct BrowserDescriptor {
    /// Registry paths (relative to HKLM) probed to detect an installation,
    /// in priority order. The first existing path wins.
    pub probe_paths: Vec<String>,
    /// Executable name of the browser's processes.
    pub process_name: String,
    /// Human-readable name for display.
    pub display_name: String,
}

/// Immutable table mapping each [`BrowserId`] to its descriptor.
///
/// The catalog is injected wherever browser metadata is needed, rather than
/// read from process-global state, so tests can substitute their own probe
/// paths.
#[derive(Debug, Clone)]
pub struct BrowserCatalog {
    chrome: BrowserDescriptor,
    edge: BrowserDescriptor,
    brave: BrowserDescriptor,
}

impl BrowserCatalog {
    /// The built-in catalog covering Chrome, Edge, and Brave.
    ///
    /// Chrome carries a second probe path under `Wow6432Node` for 32-bit
    /// installations on 64-bit Windows.
    pub fn standard() -> Self {
        Self {
            chrome: BrowserDescriptor {
                probe_paths: vec![
                    r"SOFTWARE\Google\Chrome".to_string(),
                    r"SOFTWARE\Wow6432Node\Google\Chrome".to_string(),
                ],
                process_name: "chrome.exe".to_string(),
                display_name: "Google Chrome".to_string(),
            },
            edge: BrowserDescriptor {
                probe_paths: vec![r"SOFTWARE\Microsoft\Edge".to_string()],
                process_name: "msedge.exe".to_string(),
                display_name: "Microsoft Edge (Chromium)".to_string(),
            },
            brave: BrowserDescriptor {
                probe_paths: vec![r"SOFTWARE\BraveSoftware\Brave-Browser".to_string()],
                process_name: "brave.exe".to_string(),
                display_name: "Brave Browser".to_string(),
            },
        }
    }

    /// Build a catalog from explicit descriptors, in [`BrowserId::ALL`] order.
    pub fn new(
        chrome: BrowserDescriptor,
        edge: BrowserDescriptor,
        brave: BrowserDescriptor,
    ) -> Self {
        Self {
            chrome,
            edge,
            brave,
        }
    }

    /// Look up the descriptor for a browser.
    ///
    /// Total over the closed [`BrowserId`] set; there is no error path.
    pub fn describe(&self, id: BrowserId) -> &BrowserDescriptor {
        match id {
            BrowserId::Chrome => &self.chrome,
            BrowserId::Edge => &self.edge,
            BrowserId::Brave => &self.brave,
        }
    }

    /// Iterate over all catalog entries in [`BrowserId::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (BrowserId, &BrowserDescriptor)> {
        BrowserId::ALL.into_iter().map(move |id| (id, self.describe(id)))
    }
}

impl Default for BrowserCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_is_total() {
        let catalog = BrowserCatalog::standard();
        for id in BrowserId::ALL {
            let descriptor = catalog.describe(id);
            assert!(!descriptor.probe_paths.is_empty());
            assert!(descriptor.process_name.ends_with(".exe"));
            assert!(!descriptor.display_name.is_empty());
        }
    }

    #[test]
    fn test_probe_paths_share_software_prefix() {
        let catalog = BrowserCatalog::standard();
        for (_, descriptor) in catalog.iter() {
            for path in &descriptor.probe_paths {
                assert!(path.starts_with(SOFTWARE_PREFIX));
            }
        }
    }

    #[test]
    fn test_chrome_probes_wow6432node_second() {
        let catalog = BrowserCatalog::standard();
        let chrome = catalog.describe(BrowserId::Chrome);
        assert_eq!(chrome.probe_paths.len(), 2);
        assert!(chrome.probe_paths[1].contains("Wow6432Node"));
    }

    #[test]
    fn test_iter_covers_all_browsers_in_order() {
        let catalog = BrowserCatalog::standard();
        let ids: Vec<BrowserId> = catalog.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, BrowserId::ALL.to_vec());
    }
}
