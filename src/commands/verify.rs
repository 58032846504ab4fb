// src/commands/verify.rs

//! Verify mode: check the pool against the index

use anyhow::{Context, Result};
use ccpm::orchestrator;
use ccpm::Layout;

/// Verify every indexed archive; fails if any problem is found
pub fn cmd_verify(layout: &Layout) -> Result<()> {
    let report = orchestrator::verify(layout).context("Verification failed")?;

    println!();
    println!("Checked {} version(s)", report.checked);

    if report.is_clean() {
        println!("All archives match the index");
        return Ok(());
    }

    for problem in &report.problems {
        println!("  {}", problem);
    }
    anyhow::bail!("{} problem(s) found in the pool", report.problems.len());
}
