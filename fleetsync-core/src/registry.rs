//! The repository registry: the fixed set of working copies a run processes.
//!
//! # Sources
//!
//! - [`Registry::builtin_at`] — the compiled-in fleet ([`BUILTIN_REPOS`]).
//! - [`load_at`] — an optional YAML override file:
//!
//! ```text
//! repos:
//!   - name: dotfiles
//!     path: ~/dotfiles
//!   - name: infra
//!     path: /srv/git/infra
//! ```
//!
//! A leading `~/` expands against the supplied home directory. Relative paths
//! in a file resolve against the file's parent directory.
//!
//! Both take the home directory explicitly; the CLI resolves it once.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::RegistryError;
use crate::types::{RepoEntry, RepoName};

/// The compiled-in fleet: `(name, path)`.
pub const BUILTIN_REPOS: &[(&str, &str)] = &[
    ("dotfiles", "~/dotfiles"),
    ("scripts", "~/scripts"),
    ("infra", "~/src/infra"),
    ("notes", "~/notes"),
];

// ---------------------------------------------------------------------------
// 1. Registry
// ---------------------------------------------------------------------------

/// Immutable, ordered list of repositories. Constructed once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    entries: Vec<RepoEntry>,
}

impl Registry {
    /// Build a registry, rejecting empty and duplicate names. Order is preserved.
    pub fn from_entries(entries: Vec<RepoEntry>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.name.0.trim().is_empty() {
                return Err(RegistryError::EmptyName {
                    path: entry.path.clone(),
                });
            }
            if !seen.insert(entry.name.clone()) {
                return Err(RegistryError::DuplicateName {
                    name: entry.name.0.clone(),
                });
            }
        }
        Ok(Self { entries })
    }

    /// The compiled-in fleet, `~/` expanded against `home`.
    pub fn builtin_at(home: &Path) -> Self {
        let entries = BUILTIN_REPOS
            .iter()
            .map(|(name, path)| RepoEntry::new(*name, expand_home(path, home)))
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[RepoEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &RepoName) -> Option<&RepoEntry> {
        self.entries.iter().find(|e| &e.name == name)
    }

    /// Narrow the registry to `names`, keeping registry order.
    ///
    /// An empty filter returns the registry unchanged.
    pub fn select(&self, names: &[RepoName]) -> Result<Self, RegistryError> {
        if names.is_empty() {
            return Ok(self.clone());
        }
        for name in names {
            if self.get(name).is_none() {
                return Err(RegistryError::UnknownRepo {
                    name: name.0.clone(),
                    known: self
                        .entries
                        .iter()
                        .map(|e| e.name.0.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                });
            }
        }
        let entries = self
            .entries
            .iter()
            .filter(|e| names.contains(&e.name))
            .cloned()
            .collect();
        Ok(Self { entries })
    }
}

// ---------------------------------------------------------------------------
// 2. File override
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    repos: Vec<RegistryFileEntry>,
}

#[derive(Debug, Deserialize)]
struct RegistryFileEntry {
    name: String,
    path: PathBuf,
}

/// Load a registry from a YAML file.
///
/// Returns `RegistryError::NotFound` if absent,
/// `RegistryError::Parse` (with path + line context) if malformed YAML.
pub fn load_at(path: &Path, home: &Path) -> Result<Registry, RegistryError> {
    if !path.exists() {
        return Err(RegistryError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: RegistryFile =
        serde_yaml::from_str(&contents).map_err(|source| RegistryError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let entries = file
        .repos
        .into_iter()
        .map(|e| {
            let expanded = expand_home(&e.path.to_string_lossy(), home);
            let resolved = if expanded.is_absolute() {
                expanded
            } else {
                base.join(expanded)
            };
            RepoEntry::new(e.name, resolved)
        })
        .collect();
    Registry::from_entries(entries)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn expand_home(raw: &str, home: &Path) -> PathBuf {
    if raw == "~" {
        return home.to_path_buf();
    }
    match raw.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => PathBuf::from(raw),
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
