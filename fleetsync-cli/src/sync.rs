//! The single `fleetsync` command: resolve config and registry, then run.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgGroup, Args};

use fleetsync_core::{config, registry, Mode, Registry, RepoName, SyncConfig};
use fleetsync_git::GitCli;
use fleetsync_sync::pipeline::{self, SyncScope};

use crate::console::ConsoleReporter;
use crate::report;

/// Arguments for a fleet run.
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("mode").args(["status", "dry_run", "apply"])))]
pub struct SyncArgs {
    /// Report repository states; never modify anything.
    #[arg(long)]
    pub status: bool,

    /// Show what apply would do without doing it.
    #[arg(long)]
    pub dry_run: bool,

    /// Fast-forward repositories that are behind (the default).
    #[arg(long)]
    pub apply: bool,

    /// Read the fleet from a YAML file instead of the built-in list.
    #[arg(long, value_name = "FILE")]
    pub registry: Option<PathBuf>,

    /// Restrict the run to the named repository (repeatable).
    #[arg(long, value_name = "NAME")]
    pub only: Vec<String>,

    /// Per-git-command timeout in seconds; 0 disables it.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Number of pending upstream commits to list per repository.
    #[arg(long, value_name = "N")]
    pub preview: Option<usize>,

    /// Print the run report as JSON on stdout.
    #[arg(long)]
    pub json: bool,
}

impl SyncArgs {
    pub fn mode(&self) -> Mode {
        if self.status {
            Mode::Status
        } else if self.dry_run {
            Mode::DryRun
        } else {
            Mode::Apply
        }
    }

    /// Execute the run and return the process exit code.
    pub fn run(self) -> Result<u8> {
        let home: PathBuf = dirs::home_dir().context("could not determine home directory")?;
        let config = self.resolve_config(&home)?;
        let registry = self.resolve_registry(&home)?;
        let scope = self.scope();
        let mode = self.mode();

        let vcs = GitCli::from_config(&config);
        let mut reporter = ConsoleReporter::stderr();
        let run = pipeline::run(&registry, scope, &vcs, mode, &config, &mut reporter)
            .context("cannot resolve the repositories to process")?;

        if self.json {
            report::print_json(&run)?;
        }
        Ok(run.exit_code())
    }

    fn resolve_config(&self, home: &Path) -> Result<SyncConfig> {
        let mut config = config::load_at(home).with_context(|| {
            format!(
                "failed to load {}",
                config::config_path_at(home).display()
            )
        })?;
        if let Some(secs) = self.timeout {
            config.timeout_secs = secs;
        }
        if let Some(limit) = self.preview {
            config.preview_limit = limit;
        }
        config.validate().context("invalid configuration")?;
        Ok(config)
    }

    fn resolve_registry(&self, home: &Path) -> Result<Registry> {
        match &self.registry {
            Some(path) => registry::load_at(path, home)
                .with_context(|| format!("failed to load registry {}", path.display())),
            None => Ok(Registry::builtin_at(home)),
        }
    }

    fn scope(&self) -> SyncScope {
        if self.only.is_empty() {
            SyncScope::All
        } else {
            SyncScope::Only(self.only.iter().map(|n| RepoName::from(n.as_str())).collect())
        }
    }
}
