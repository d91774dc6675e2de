//! # chromtune - Chromium browser tuning library
//!
//! This library detects installed Chromium-based browsers (Chrome, Edge,
//! Brave) on a Windows host, writes per-browser optimization policies as
//! registry DWORD values, persists the applied configuration under a
//! dedicated application key, and can terminate running browser processes
//! so a new policy takes effect on the next launch.
//!
//! ## Features
//!
//! - Detect installations by probing each browser's registry paths
//! - Write memory-cap, disable-preload, and disable-hardware-acceleration
//!   policies, each independently selectable
//! - Persist and reload applied configurations (whole records only;
//!   partial records are never surfaced)
//! - All-or-nothing overwrite confirmation before replacing a saved
//!   configuration, best-effort per-browser behavior everywhere else
//! - Registry access behind the [`RegistryStore`] trait, with a live
//!   Windows backend and an in-memory backend for tests and development
//!
//! ## Quick Start
//!
//! ### Detecting browsers
//!
//! ```rust
//! use chromtune::{detect_installed, BrowserCatalog, BrowserId, MemoryRegistry};
//!
//! let registry = MemoryRegistry::new();
//! registry.add_key(r"SOFTWARE\Google\Chrome");
//!
//! let installed = detect_installed(&BrowserCatalog::standard(), &registry);
//! assert!(installed[&BrowserId::Chrome]);
//! assert!(!installed[&BrowserId::Edge]);
//! ```
//!
//! ### Applying an optimization
//!
//! ```rust
//! use chromtune::{
//!     BrowserCatalog, BrowserId, MemoryRegistry, OptimizationOptions, Reconciler,
//! };
//!
//! let registry = MemoryRegistry::new();
//! registry.add_key(r"SOFTWARE\Google\Chrome");
//!
//! let reconciler = Reconciler::new(BrowserCatalog::standard(), &registry);
//! let outcome = reconciler.apply(
//!     &[BrowserId::Chrome],
//!     &OptimizationOptions::default(),
//!     |_overwritten| true,
//! );
//!
//! let results = outcome.results().expect("first apply is never aborted");
//! assert!(results[&BrowserId::Chrome].saved);
//! ```
//!
//! ### On a live Windows host
//!
//! ```rust,no_run
//! # #[cfg(windows)] {
//! use chromtune::{BrowserCatalog, Reconciler, WinRegistry};
//!
//! let registry = WinRegistry::new();
//! let reconciler = Reconciler::new(BrowserCatalog::standard(), &registry);
//! for (id, installed) in reconciler.detect() {
//!     println!("{}: {}", id, if installed { "installed" } else { "-" });
//! }
//! # }
//! ```
//!
//! ## Error handling
//!
//! Per-browser and per-field failures are surfaced as boolean or optional
//! results at the boundary of the operation that produced them (see
//! [`ApplyResult`]); nothing short of the explicit overwrite gate aborts a
//! detect/load/apply flow. The [`Error`] enum covers the remaining hard
//! failures, such as requesting the live registry backend off-Windows.
//!
//! ## Platform support
//!
//! The live registry backend, the policy writes, and the elevation check
//! are Windows-only. The library itself compiles everywhere; non-Windows
//! hosts can use [`MemoryRegistry`] for development and testing.

// Re-export all public types at crate root
pub use types::{
    ApplyOutcome, ApplyResult, BrowserConfig, BrowserId, DetectionEntry, OptimizationOptions,
};

// Re-export error types
pub use error::{Error, Result};

// Re-export catalog types
pub use catalog::{BrowserCatalog, BrowserDescriptor, SOFTWARE_PREFIX};

// Re-export registry access
pub use registry::{MemoryRegistry, ProbeOutcome, RegistryStore};
#[cfg(windows)]
pub use registry::WinRegistry;

// Re-export detection
pub use detect::{detect_installed, resolve_policy_root};

// Re-export the persisted store
pub use store::{load_previous, save_config, APP_KEY};

// Re-export reconciliation
pub use reconcile::{terminate_browsers, Reconciler};

// Re-export process termination
pub use process::{ProcessTerminator, SystemTerminator};

pub use privileges::is_elevated;

// The CLI surface lives in the library so the binary stays a thin shim.
pub mod cli;
pub mod commands;

mod catalog;
mod detect;
mod error;
mod privileges;
mod process;
mod reconcile;
mod registry;
mod store;
mod types;
