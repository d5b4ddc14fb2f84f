//! # fleetsync-git
//!
//! The version-control boundary: a [`Vcs`] trait, its `git` command-line
//! implementation [`GitCli`], and the bounded process runner underneath.

pub mod error;
pub mod git_cli;
pub mod noise;
pub mod runner;
pub mod vcs;

pub use error::GitError;
pub use git_cli::GitCli;
pub use vcs::Vcs;
