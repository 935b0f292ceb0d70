//! A11yscan Worker – queue draining and per-job processing.
//!
//! This crate provides the [`ScanPipeline`] trait and the [`WorkerRunner`].
//! The API implements the trait for its scan service (scan → summarize →
//! email); the runner owns the lease/process/acknowledge cycle and its two
//! operating modes.

mod pipeline;
mod runner;

pub use pipeline::ScanPipeline;
pub use runner::{JobOutcome, WorkerRunner, WorkerSummary};
