//! QUIC Interop Crawler - Main CLI Application
//!
//! `qic crawl` stores new interop runs, `qic report` renders summary tables
//! for stored ones.

use clap::Parser;
use quic_interop_crawler::{app::App, cli::Cli, error::AppError};
use std::process;

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(99);
    }));

    let cli = Cli::parse();

    if let Err(message) = cli.validate() {
        eprintln!("Error: {}", message);
        process::exit(1);
    }

    let use_color = cli.use_colors();
    if let Err(e) = App::new(cli).run().await {
        eprintln!("{}", e.format_for_console(use_color));
        print_error_suggestions(&e);
        process::exit(e.exit_code());
    }
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - The config file is JSON with base_url, data_dir, clients and servers");
            eprintln!("  - At least one name must appear in both clients and servers");
            eprintln!("  - base_url is an http(s) URL or an existing mirror directory");
            eprintln!("  - Check QIC_* variables in the environment and in .env");
        }
        AppError::Fetch(_) => {
            eprintln!();
            eprintln!("Fetch troubleshooting:");
            eprintln!("  - Check that the interop runner is reachable from this host");
            eprintln!("  - Set \"proxy\" or QIC_PROXY when behind a proxy");
            eprintln!("  - Increase the timeout with --timeout");
            eprintln!("  - Runs that failed are retried on the next crawl");
        }
        AppError::Aggregation(_) => {
            eprintln!();
            eprintln!("The run was not stored; without --strict malformed outputs only shorten a pair");
        }
        AppError::Persistence(_) | AppError::Io(_) => {
            eprintln!();
            eprintln!("Check that data_dir exists or can be created and is writable");
        }
        _ => {}
    }
}
