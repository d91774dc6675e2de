// Integration tests for the detect -> apply -> terminate flow
use chromtune::{
    detect_installed, BrowserCatalog, BrowserId, MemoryRegistry, OptimizationOptions,
    ProcessTerminator, Reconciler,
};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Terminator fake that records which executables were asked for.
struct RecordingTerminator {
    running: BTreeMap<String, usize>,
    requests: Mutex<Vec<String>>,
}

impl RecordingTerminator {
    fn new(running: &[(&str, usize)]) -> Self {
        Self {
            running: running
                .iter()
                .map(|(name, count)| (name.to_string(), *count))
                .collect(),
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl ProcessTerminator for RecordingTerminator {
    fn kill_all_named(&self, name: &str) -> usize {
        self.requests.lock().unwrap().push(name.to_string());
        self.running.get(name).copied().unwrap_or(0)
    }
}

#[test]
fn test_full_flow_for_mixed_installation() {
    // Chrome installed, Brave not installed.
    let registry = MemoryRegistry::new();
    registry.add_key(r"SOFTWARE\Google\Chrome");

    let reconciler = Reconciler::new(BrowserCatalog::standard(), &registry);

    let installed = reconciler.detect();
    assert_eq!(installed[&BrowserId::Chrome], true);
    assert_eq!(installed[&BrowserId::Brave], false);

    let outcome = reconciler.apply(
        &[BrowserId::Chrome, BrowserId::Brave],
        &OptimizationOptions::default(),
        |_| true,
    );
    let results = outcome.results().expect("not aborted");

    // Chrome got all three policies plus a persisted record.
    let chrome = &results[&BrowserId::Chrome];
    assert!(chrome.path_resolved);
    assert_eq!(chrome.memory_write, Some(true));
    assert_eq!(chrome.preload_write, Some(true));
    assert_eq!(chrome.hardware_write, Some(true));
    assert!(chrome.saved);

    // Brave was skipped without any write attempt.
    let brave = &results[&BrowserId::Brave];
    assert!(!brave.path_resolved);
    assert_eq!(brave.memory_write, None);
    assert!(!brave.saved);

    assert_eq!(
        registry.dword(r"SOFTWARE\Google\Chrome\Process", "MaxMemPerProcess"),
        Some(4096)
    );
    assert_eq!(
        registry.dword(r"SOFTWARE\ChromTune\Chrome", "memory_limit"),
        Some(4096)
    );
}

#[test]
fn test_apply_to_uninstalled_browser_writes_nothing() {
    let registry = MemoryRegistry::new();
    let reconciler = Reconciler::new(BrowserCatalog::standard(), &registry);

    let outcome = reconciler.apply(
        &[BrowserId::Brave],
        &OptimizationOptions::default(),
        |_| true,
    );

    let results = outcome.results().unwrap();
    assert!(!results[&BrowserId::Brave].path_resolved);
    assert_eq!(registry.write_count(), 0);
}

#[test]
fn test_declined_overwrite_leaves_registry_untouched() {
    let registry = MemoryRegistry::new();
    registry.add_key(r"SOFTWARE\Google\Chrome");
    registry.add_key(r"SOFTWARE\Microsoft\Edge");
    let reconciler = Reconciler::new(BrowserCatalog::standard(), &registry);

    // First apply seeds Chrome's saved configuration.
    reconciler.apply(
        &[BrowserId::Chrome],
        &OptimizationOptions::default(),
        |_| true,
    );
    let baseline = registry.write_count();
    let chrome_limit_before =
        registry.dword(r"SOFTWARE\Google\Chrome\Process", "MaxMemPerProcess");

    // Second apply over {Chrome, Edge} with a declined confirmation must
    // not touch either browser, Edge included.
    let options = OptimizationOptions {
        memory_limit_mb: 8192,
        ..OptimizationOptions::default()
    };
    let outcome = reconciler.apply(&[BrowserId::Chrome, BrowserId::Edge], &options, |_| false);

    assert!(outcome.results().is_none());
    assert_eq!(registry.write_count(), baseline);
    assert_eq!(
        registry.dword(r"SOFTWARE\Google\Chrome\Process", "MaxMemPerProcess"),
        chrome_limit_before
    );
    assert_eq!(
        registry.dword(r"SOFTWARE\Microsoft\Edge\Process", "MaxMemPerProcess"),
        None
    );
}

#[test]
fn test_custom_catalog_is_honored() {
    use chromtune::BrowserDescriptor;

    let catalog = BrowserCatalog::new(
        BrowserDescriptor {
            probe_paths: vec![r"SOFTWARE\Vendor\CustomChrome".to_string()],
            process_name: "customchrome.exe".to_string(),
            display_name: "Custom Chrome".to_string(),
        },
        BrowserCatalog::standard().describe(BrowserId::Edge).clone(),
        BrowserCatalog::standard().describe(BrowserId::Brave).clone(),
    );

    let registry = MemoryRegistry::new();
    registry.add_key(r"SOFTWARE\Vendor\CustomChrome");

    let installed = detect_installed(&catalog, &registry);
    assert!(installed[&BrowserId::Chrome]);

    let reconciler = Reconciler::new(catalog, &registry);
    let outcome = reconciler.apply(
        &[BrowserId::Chrome],
        &OptimizationOptions::default(),
        |_| true,
    );
    assert!(outcome.results().unwrap()[&BrowserId::Chrome].path_resolved);
    assert_eq!(
        registry.dword(r"SOFTWARE\Vendor\CustomChrome\Process", "MaxMemPerProcess"),
        Some(4096)
    );
}

#[test]
fn test_terminate_with_no_running_processes() {
    let registry = MemoryRegistry::new();
    let reconciler = Reconciler::new(BrowserCatalog::standard(), &registry);

    let terminator = RecordingTerminator::new(&[]);
    let results = reconciler.terminate(&[BrowserId::Chrome], &terminator);

    assert_eq!(results[&BrowserId::Chrome], false);
    assert_eq!(
        terminator.requests.into_inner().unwrap(),
        vec!["chrome.exe".to_string()]
    );
}

#[test]
fn test_terminate_uses_catalog_process_names() {
    let registry = MemoryRegistry::new();
    let reconciler = Reconciler::new(BrowserCatalog::standard(), &registry);

    let terminator = RecordingTerminator::new(&[("msedge.exe", 2), ("brave.exe", 1)]);
    let results = reconciler.terminate(
        &[BrowserId::Chrome, BrowserId::Edge, BrowserId::Brave],
        &terminator,
    );

    assert_eq!(results[&BrowserId::Chrome], false);
    assert_eq!(results[&BrowserId::Edge], true);
    assert_eq!(results[&BrowserId::Brave], true);

    let requests = terminator.requests.into_inner().unwrap();
    assert_eq!(requests, vec!["chrome.exe", "msedge.exe", "brave.exe"]);
}
