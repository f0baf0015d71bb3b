use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;

use crate::config::{load_app_config, AppConfig, JournalConfig, SessionConfig};
use crate::journal::EventJournal;
use crate::producer::ProducerPool;

const DEFAULT_SINK_PATH: &str = "events.csv";

#[derive(Debug, Parser)]
#[command(name = "paceline", about = "Paced, time-ordered event journaling")]
struct CliArgs {
    /// Path to a JSON config file; without one the built-in load session
    /// runs with defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Print the diagnostic log after the session.
    #[arg(long)]
    diagnostics: bool,
}

/// Application entrypoint: load configuration, run the configured producer
/// session against a journal, and report the drain results.
pub fn run() -> Result<()> {
    let args = CliArgs::parse();
    let config = match &args.config {
        Some(path) => load_app_config(path).context("failed to load configuration")?,
        None => AppConfig {
            journal: JournalConfig::for_sink(DEFAULT_SINK_PATH),
            run: SessionConfig::default(),
        },
    };
    run_session(config, args.diagnostics)
}

fn run_session(config: AppConfig, print_diagnostics: bool) -> Result<()> {
    let started = Instant::now();
    let journal = EventJournal::open(config.journal).context("failed to open journal")?;
    let diagnostics = journal.diagnostics().clone();
    let handle = journal.handle();

    let producers = ProducerPool::spawn(&handle, config.run);
    producers.join();

    let report = journal.shutdown().context("journal shutdown failed")?;
    let elapsed = started.elapsed();

    println!(
        "drained {} records ({} dropped, {} empty cycles) in {:.6} s",
        report.records_written,
        report.dropped,
        report.empty_cycles,
        elapsed.as_secs_f64()
    );
    print!("{}", handle.metrics().render());
    if print_diagnostics {
        for line in diagnostics.lines() {
            println!("{line}");
        }
    }
    Ok(())
}
