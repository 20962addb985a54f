//! # zimpack CLI
//!
//! Command-line interface for the zimpack library.
//!
//! Exit status: 0 on success, 2 for invalid arguments or configuration,
//! 1 for any failure while reading the archive or writing batch files.

use std::process::ExitCode;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use zimpack::cli::Args;
use zimpack::core::{DisambiguationTable, ExtractionStats, extract};
use zimpack::events::tracing_events;

fn main() -> ExitCode {
    let args = <Args as ClapParser>::parse();
    init_tracing(args.log_filter());

    let config = args.to_config();
    match extract(&config, &DisambiguationTable::default(), tracing_events()) {
        Ok(stats) => {
            if !args.quiet {
                print_summary(&stats);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            if e.is_config() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

/// Logs to stderr. `RUST_LOG` takes precedence over `default_filter`.
fn init_tracing(default_filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_summary(stats: &ExtractionStats) {
    println!("📊 Summary:");
    println!("   Records:   {}", stats.records_seen);
    println!(
        "   Admitted:  {} ({:.1}%)",
        stats.admitted,
        stats.admission_ratio()
    );
    for (decision, count) in &stats.dropped {
        println!("   Dropped:   {} {}", count, decision.reason());
    }
    println!("   Files:     {}", stats.files.len());
    println!(
        "   Time:      {:.2}s ({:.0} records/sec)",
        stats.elapsed.as_secs_f64(),
        stats.throughput()
    );
}
