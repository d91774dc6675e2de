//! Process termination
//!
//! Kills running browser processes by executable name so freshly written
//! policies take effect on the next launch. Fire-and-forget: nothing here
//! waits for a process to actually exit.

use sysinfo::{ProcessesToUpdate, System};
use tracing::debug;

/// Terminates processes by executable name.
///
/// The reconciler consumes this trait; the test suite substitutes a fake.
pub trait ProcessTerminator {
    /// Kill every running process whose executable name matches `name`
    /// (case-insensitive). Returns the number of processes killed.
    ///
    /// Individual kill failures (e.g. permission denied on a process owned
    /// by another user) are skipped, not raised.
    fn kill_all_named(&self, name: &str) -> usize;
}

/// Live terminator backed by a system process snapshot.
#[derive(Debug, Default)]
pub struct SystemTerminator;

impl SystemTerminator {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessTerminator for SystemTerminator {
    fn kill_all_named(&self, name: &str) -> usize {
        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::All, true);

        let mut killed = 0;
        for process in system.processes().values() {
            if process.name().eq_ignore_ascii_case(name) {
                if process.kill() {
                    killed += 1;
                } else {
                    debug!(pid = process.pid().as_u32(), name, "kill signal rejected");
                }
            }
        }
        killed
    }
}
