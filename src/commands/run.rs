// src/commands/run.rs

//! Build and repair modes: both end with a freshly written index

use super::print_run_summary;
use anyhow::{Context, Result};
use ccpm::orchestrator::{self, Mode};
use ccpm::Layout;
use tracing::info;

/// Build all packages, or rebuild the index from the pool with `Mode::Repair`
pub fn cmd_run(layout: &Layout, mode: Mode) -> Result<()> {
    let (verb, failure) = match mode {
        Mode::Build => {
            info!("Building packages from {}", layout.packages_dir().display());
            ("Built", "Build failed")
        }
        Mode::Repair => {
            info!("Repairing package index in {}", layout.pool_dir().display());
            ("Indexed", "Repair failed")
        }
    };

    let report = orchestrator::run(layout, mode).context(failure)?;

    print_run_summary(&report, verb);
    Ok(())
}
