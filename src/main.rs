mod config;
mod launcher;
mod platform;
mod progress;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use crossterm::style::Stylize;

use launcher::Launcher;
use platform::{SystemOpener, SystemRunner};
use progress::ConsoleSink;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Reconstructs a project workspace: opens urls and apps, then runs shell commands"
)]
struct Args {
    /// Config file (default: first config.{yaml,yml,toml} under
    /// /etc/workspace-launcher, ~/.workspace-launcher or the current dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print extra progress detail
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = config::load(args.config.as_deref())?;
    if let Some(name) = &config.name {
        tracing::debug!(workspace = %name, "loaded workspace config");
    }

    let opener = SystemOpener;
    let runner = SystemRunner;
    let sink = ConsoleSink::new(args.verbose);
    let report = Launcher::new(&opener, &runner, &sink).launch(&config)?;

    if report.all_succeeded() {
        println!(
            "{}",
            format!("Workspace ready ({} entries).", report.attempted).green()
        );
    } else {
        eprintln!(
            "{}",
            format!(
                "{} of {} entries failed:",
                report.failures.len(),
                report.attempted
            )
            .red()
        );
        for failure in &report.failures {
            eprintln!("  {}: {}", failure.target, failure.detail);
        }
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
