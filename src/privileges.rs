//! Elevation check
//!
//! Writing under `HKEY_LOCAL_MACHINE` needs administrator rights; the CLI
//! checks once up front instead of letting every write fail with access
//! denied.

/// Whether the current process runs with administrator rights.
#[cfg(windows)]
pub fn is_elevated() -> bool {
    // SAFETY: IsUserAnAdmin takes no arguments and only inspects the
    // current process token.
    unsafe { windows_sys::Win32::UI::Shell::IsUserAnAdmin() != 0 }
}

/// Non-Windows hosts have no HKLM to protect; report elevated so the
/// in-memory backend stays usable in development.
#[cfg(not(windows))]
pub fn is_elevated() -> bool {
    true
}
