use crate::catalog::BrowserCatalog;
use crate::process::SystemTerminator;
use crate::reconcile::{terminate_browsers, Reconciler};
use crate::types::{ApplyOutcome, BrowserId, DetectionEntry, OptimizationOptions};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use tracing::info;

#[cfg(windows)]
fn live_registry() -> crate::Result<crate::registry::WinRegistry> {
    Ok(crate::registry::WinRegistry::new())
}

#[cfg(not(windows))]
fn live_registry() -> crate::Result<crate::registry::MemoryRegistry> {
    Err(crate::Error::UnsupportedPlatform)
}

/// List supported browsers and whether they are installed
pub fn detect() -> Result<(), Box<dyn std::error::Error>> {
    let registry = live_registry()?;
    let reconciler = Reconciler::new(BrowserCatalog::standard(), &registry);

    let installed = reconciler.detect();
    let entries: Vec<DetectionEntry> = BrowserId::ALL
        .into_iter()
        .map(|id| DetectionEntry {
            id,
            display_name: reconciler.catalog().describe(id).display_name.clone(),
            installed: installed[&id],
        })
        .collect();

    let json = serde_json::to_string_pretty(&entries)?;
    println!("{}", json);
    Ok(())
}

/// One row of the `show` report: a stored record plus a readable timestamp.
#[derive(Debug, Serialize)]
struct ConfigRow {
    browser: BrowserId,
    memory_limit_mb: u32,
    disable_preload: bool,
    disable_hardware: bool,
    applied_at: String,
}

/// Show the previously applied configuration
pub fn show() -> Result<(), Box<dyn std::error::Error>> {
    let registry = live_registry()?;
    let reconciler = Reconciler::new(BrowserCatalog::standard(), &registry);

    let (found, store) = reconciler.load_previous();
    if !found {
        println!("No previous configuration found.");
        return Ok(());
    }

    let rows: Vec<ConfigRow> = store
        .iter()
        .map(|(id, config)| ConfigRow {
            browser: *id,
            memory_limit_mb: config.memory_limit_mb,
            disable_preload: config.disable_preload,
            disable_hardware: config.disable_hardware,
            applied_at: format_timestamp(config.last_update),
        })
        .collect();

    let json = serde_json::to_string_pretty(&rows)?;
    println!("{}", json);
    Ok(())
}

/// Options collected from the `apply` subcommand flags.
pub struct ApplyArgs {
    pub browsers: Vec<BrowserId>,
    pub memory_limit_gb: u32,
    pub no_memory_limit: bool,
    pub keep_preload: bool,
    pub keep_hardware_acceleration: bool,
    pub yes: bool,
    pub restart: bool,
}

/// Refuse to proceed unless the process is elevated. Both `apply` and
/// `kill` touch machine-wide state, so both sit behind this gate.
fn elevation_gate(
    elevated: bool,
    action: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if elevated {
        Ok(())
    } else {
        Err(anyhow::anyhow!(
            "{} requires administrator rights. \
             Re-run chromtune from an elevated prompt.",
            action
        )
        .into())
    }
}

/// Write the selected optimization policies and persist them
pub fn apply(args: ApplyArgs) -> Result<(), Box<dyn std::error::Error>> {
    elevation_gate(
        crate::privileges::is_elevated(),
        "Writing policies under HKEY_LOCAL_MACHINE",
    )?;

    let registry = live_registry()?;
    let reconciler = Reconciler::new(BrowserCatalog::standard(), &registry);

    // An explicit selection is honored as given (a not-installed browser
    // simply reports path-not-found); the default selection is every
    // installed browser.
    let selected = if args.browsers.is_empty() {
        let installed = reconciler.detect();
        let detected: Vec<BrowserId> = BrowserId::ALL
            .into_iter()
            .filter(|id| installed[id])
            .collect();
        if detected.is_empty() {
            return Err(anyhow::anyhow!(
                "No supported browser detected. Use 'chromtune detect' to check."
            )
            .into());
        }
        detected
    } else {
        args.browsers.clone()
    };

    let options = OptimizationOptions {
        limit_memory: !args.no_memory_limit,
        // The registry policy is in MB; the flag is in GB like the
        // original form's spinbox.
        memory_limit_mb: args.memory_limit_gb.saturating_mul(1024),
        disable_preload: !args.keep_preload,
        disable_hardware: !args.keep_hardware_acceleration,
    };

    let assume_yes = args.yes;
    let outcome = reconciler.apply(&selected, &options, |overwritten| {
        assume_yes || confirm_on_stdin(overwritten)
    });

    let results = match &outcome {
        ApplyOutcome::Aborted => {
            println!("Aborted: existing configuration kept.");
            return Ok(());
        }
        ApplyOutcome::Applied(results) => results,
    };

    let json = serde_json::to_string_pretty(&results)?;
    println!("{}", json);

    if args.restart {
        let configured: Vec<BrowserId> = results
            .iter()
            .filter(|(_, r)| r.path_resolved && (r.any_write_succeeded() || r.saved))
            .map(|(id, _)| *id)
            .collect();
        if configured.is_empty() {
            info!("nothing was configured; skipping restart");
        } else {
            let killed = reconciler.terminate(&configured, &SystemTerminator::new());
            print_kill_report(&killed);
        }
    }
    Ok(())
}

/// Kill the running processes of the given browsers
pub fn kill(browsers: &[BrowserId]) -> Result<(), Box<dyn std::error::Error>> {
    elevation_gate(crate::privileges::is_elevated(), "Killing browser processes")?;

    let killed = terminate_browsers(
        &BrowserCatalog::standard(),
        browsers,
        &SystemTerminator::new(),
    );
    print_kill_report(&killed);
    Ok(())
}

fn print_kill_report(killed: &BTreeMap<BrowserId, bool>) {
    for (id, was_killed) in killed {
        if *was_killed {
            println!("{}: killed", id);
        } else {
            println!("{}: no running process", id);
        }
    }
}

/// Ask on stdin whether the existing configuration of `overwritten` may be
/// replaced. Anything other than an explicit yes declines.
fn confirm_on_stdin(overwritten: &[BrowserId]) -> bool {
    let names: Vec<String> = overwritten.iter().map(|id| id.to_string()).collect();
    print!(
        "A previous configuration exists for {}. Overwrite? [y/N] ",
        names.join(", ")
    );
    if std::io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes" | "Yes")
}

fn format_timestamp(unix_seconds: u64) -> String {
    chrono::DateTime::from_timestamp(unix_seconds as i64, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| format!("@{}", unix_seconds))
}
