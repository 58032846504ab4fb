// src/main.rs

use ccpm::{Layout, Mode};
use clap::Parser;

mod cli;
mod commands;

use cli::Cli;

const REPAIR_HINT: &str = "You can try to repair the package index using the --repair option.";

/// Diagnostics go to stdout, one line each, led by their severity
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stdout)
        .with_target(false)
        .without_time()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let layout = Layout::new(&cli.root);

    let result = if cli.verify {
        commands::cmd_verify(&layout)
    } else if cli.repair {
        commands::cmd_run(&layout, Mode::Repair)
    } else {
        commands::cmd_run(&layout, Mode::Build)
    };

    if let Err(e) = result {
        println!("Error: {:#}", e);
        if !cli.repair {
            println!("{}", REPAIR_HINT);
        }
        std::process::exit(1);
    }
}
