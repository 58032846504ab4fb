// src/commands/mod.rs
//! Command handlers for the ccpm build tool

mod run;
mod verify;

pub use run::cmd_run;
pub use verify::cmd_verify;

use ccpm::orchestrator::RunReport;

/// Print the end-of-run summary
fn print_run_summary(report: &RunReport, verb: &str) {
    println!();
    println!("{} {} version(s)", verb, report.processed.len());

    if !report.skipped.is_empty() {
        println!("Skipped {}:", report.skipped.len());
        for skip in &report.skipped {
            match &skip.version {
                Some(version) => println!("  {} {}: {}", skip.name, version, skip.reason),
                None => println!("  {}: {}", skip.name, skip.reason),
            }
        }
    }

    println!(
        "Index: {} package(s), {} version(s) -> {}",
        report.index_packages,
        report.index_versions,
        report.index_path.display()
    );
}
