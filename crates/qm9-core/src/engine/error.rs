use crate::core::io::qm9::Qm9Error;
use crate::core::io::summary::SummaryError;
use crate::core::io::xyz::XyzError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a whole conversion run.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid input pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Failed to prepare output directory '{path}': {source}", path = path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to build worker pool: {0}")]
    WorkerPool(String),

    #[error("Failed to write property summary: {0}")]
    Summary(#[from] SummaryError),
}

/// Errors confined to a single input file. They are collected, never raised.
#[derive(Debug, Error)]
pub enum FileError {
    #[error(transparent)]
    Read(#[from] Qm9Error),

    #[error("Property 'id' is not an unsigned integer (value: '{value}')")]
    InvalidId { value: String },

    #[error("Molecule id {id} was already produced by '{first}'", first = first.display())]
    DuplicateId { id: u64, first: PathBuf },

    #[error("Failed to write output: {0}")]
    Write(#[from] XyzError),
}
