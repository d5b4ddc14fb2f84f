//! fleetsync: bring every registered git working copy up to date.
//!
//! # Usage
//!
//! ```text
//! fleetsync [--status | --dry-run | --apply] [--only <NAME>]... [--registry <FILE>]
//!           [--timeout <SECS>] [--preview <N>] [--json]
//! ```
//!
//! Exit status is 0 when every repository ends in a passing state and 1
//! otherwise. Invalid arguments and unreadable configuration abort before any
//! repository is touched.

mod console;
mod report;
mod sync;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use sync::SyncArgs;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "fleetsync",
    version,
    about = "Fast-forward a fleet of git working copies to their upstreams",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    sync: SyncArgs,
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing();
    fleetsync_sync::route_panics_to_tracing();
    let code = cli.sync.run()?;
    Ok(ExitCode::from(code))
}
