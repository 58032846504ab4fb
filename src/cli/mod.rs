// src/cli/mod.rs
//! CLI definitions for the ccpm build tool
//!
//! The default mode builds every package under `packages/` into the pool and
//! updates the index. `--repair` rebuilds the index from the pool alone;
//! `--verify` checks the pool against the index. The actual work happens in
//! the `commands` module.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ccpm-build")]
#[command(author = "CCPM Contributors")]
#[command(version)]
#[command(about = "Build package archives and maintain the pool index", long_about = None)]
pub struct Cli {
    /// Repair the package index from the archives in the pool
    #[arg(short, long)]
    pub repair: bool,

    /// Verify every indexed archive against its recorded digests
    #[arg(long, conflicts_with = "repair")]
    pub verify: bool,

    /// Directory containing packages/ and pool/
    #[arg(short = 'C', long, default_value = ".")]
    pub root: PathBuf,

    /// Show debug diagnostics (RUST_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,
}
