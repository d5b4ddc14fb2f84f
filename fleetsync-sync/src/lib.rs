//! # fleetsync-sync
//!
//! State detection, mode handling, failure isolation and aggregation.
//!
//! Call [`pipeline::run`] (or [`run_all`] with a prepared registry) to process
//! every repository once and get a [`RunReport`] back. Per-repository
//! problems never surface as `Err`; they are part of the report.

pub mod aggregator;
pub mod controller;
pub mod error;
pub mod evaluator;
pub mod isolation;
pub mod pipeline;
pub mod report;

#[cfg(test)]
mod testing;

pub use aggregator::{run_all, RunReport};
pub use error::SyncError;
pub use evaluator::{evaluate, Evaluation, Failure};
pub use isolation::{process_repo, route_panics_to_tracing};
pub use report::{NullReporter, Reporter};
