//! The batch layer: mapping the record parser over many files.
//!
//! - [`batch`] runs one isolated parse task per file on a worker pool.
//! - [`config`] holds the settings of a conversion run.
//! - [`progress`] carries progress events to an optional observer.
//! - [`error`] separates run-level failures from per-file failures.

pub mod batch;
pub mod config;
pub mod error;
pub mod progress;
