use crate::core::io::qm9::{Qm9Error, Qm9File};
use crate::core::io::traits::MolecularReader;
use crate::core::models::molecule::Molecule;
use crate::engine::error::EngineError;
use crate::engine::progress::{Phase, ProgressReporter};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The outcome of reading and parsing one input file.
#[derive(Debug)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub result: Result<Molecule, Qm9Error>,
}

/// Reads and parses a single record file.
pub fn parse_file(path: &Path) -> Result<Molecule, Qm9Error> {
    Qm9File::read_from_path(path)
}

/// Parses every file in `paths`, one independent task per file.
///
/// Tasks share no state and may run in any order; the returned outcomes are in
/// the order of `paths`. A failing file yields an `Err` outcome and never
/// affects its siblings.
#[instrument(skip_all, name = "batch_parse_task", fields(files = paths.len()))]
pub fn parse_files(paths: &[PathBuf], reporter: &ProgressReporter) -> Vec<ParsedFile> {
    info!("Parsing {} record file(s).", paths.len());
    reporter.start(Phase::Parse, paths.len());

    #[cfg(not(feature = "parallel"))]
    let iterator = paths.iter();

    #[cfg(feature = "parallel")]
    let iterator = paths.par_iter();

    let outcomes: Vec<ParsedFile> = iterator
        .map(|path| {
            let result = parse_file(path);
            if let Err(e) = &result {
                debug!(path = %path.display(), "Record rejected: {}", e);
            }
            reporter.advance(Phase::Parse);
            ParsedFile {
                path: path.clone(),
                result,
            }
        })
        .collect();

    reporter.finish(Phase::Parse);
    outcomes
}

/// Runs `task` on a dedicated pool of `threads` workers, or on the global pool
/// (one worker per logical core) when `threads` is `None`.
#[cfg(feature = "parallel")]
pub fn run_in_pool<T, F>(threads: Option<usize>, task: F) -> Result<T, EngineError>
where
    T: Send,
    F: FnOnce() -> T + Send,
{
    match threads {
        Some(num_threads) => {
            debug!("Building worker pool with {} threads.", num_threads);
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .thread_name(|i| format!("qm9-worker-{}", i))
                .build()
                .map_err(|e| EngineError::WorkerPool(e.to_string()))?;
            Ok(pool.install(task))
        }
        None => Ok(task()),
    }
}

#[cfg(not(feature = "parallel"))]
pub fn run_in_pool<T, F>(_threads: Option<usize>, task: F) -> Result<T, EngineError>
where
    T: Send,
    F: FnOnce() -> T + Send,
{
    Ok(task())
}
