use crate::core::io::summary::{self, SummaryRow};
use crate::core::io::traits::MolecularWriter;
use crate::core::io::xyz::ExtXyzFile;
use crate::core::models::molecule::Molecule;
use crate::core::models::properties::PropertyKey;
use crate::engine::batch;
use crate::engine::config::ConversionConfig;
use crate::engine::error::{EngineError, FileError};
use crate::engine::progress::{Phase, Progress, ProgressReporter};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// A molecule that was written to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub id: u64,
    pub source: PathBuf,
    pub output: PathBuf,
}

/// An input file that produced no output, with the reason.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    /// The molecule id, when the record got far enough to have one.
    pub id: Option<u64>,
    pub error: FileError,
}

/// The result of a conversion run.
#[derive(Debug, Default)]
pub struct ConversionReport {
    pub discovered: usize,
    /// Written files, ordered by molecule id.
    pub written: Vec<WrittenFile>,
    pub failures: Vec<FileFailure>,
    pub summary_path: Option<PathBuf>,
}

impl ConversionReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// The output file name for a molecule id: `mol_{id:06}.xyz`.
pub fn output_file_name(id: u64) -> String {
    format!("mol_{:06}.xyz", id)
}

/// Expands `pattern` into the sorted list of regular files it matches.
///
/// Entries that cannot be read while walking the pattern are skipped with a
/// warning. No match at all is an empty list, not an error.
pub fn discover_inputs(pattern: &str) -> Result<Vec<PathBuf>, EngineError> {
    let entries = glob::glob(pattern).map_err(|source| EngineError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Skipping unreadable path {:?}: {}", e.path(), e.error());
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();
    paths.sort();
    Ok(paths)
}

/// Creates `dir` and any missing parents. Existing directories and their
/// contents are left untouched, so repeated or concurrent calls succeed.
pub fn ensure_output_dir(dir: &Path) -> Result<(), EngineError> {
    fs::create_dir_all(dir).map_err(|source| EngineError::OutputDirectory {
        path: dir.to_path_buf(),
        source,
    })
}

/// Runs the full conversion described by `config`.
///
/// Input files are discovered, parsed in parallel, then written sequentially
/// in ascending id order. Per-file problems end up in
/// [`ConversionReport::failures`]; only setup problems are returned as errors.
///
/// # Errors
///
/// Returns an [`EngineError`] if the pattern is invalid, the output directory
/// cannot be created, the worker pool cannot be built, or the summary cannot be
/// written.
#[instrument(skip_all, name = "convert_workflow")]
pub fn run(
    config: &ConversionConfig,
    reporter: &ProgressReporter,
) -> Result<ConversionReport, EngineError> {
    info!("Discovering input files matching '{}'.", config.input_pattern);
    let inputs = discover_inputs(&config.input_pattern)?;
    if inputs.is_empty() {
        warn!(
            "No input files match '{}'. Nothing to convert.",
            config.input_pattern
        );
    }
    convert_files(&inputs, config, reporter)
}

/// Converts an explicit list of input files, ignoring `config.input_pattern`.
pub fn convert_files(
    inputs: &[PathBuf],
    config: &ConversionConfig,
    reporter: &ProgressReporter,
) -> Result<ConversionReport, EngineError> {
    ensure_output_dir(&config.output_dir)?;

    let parsed = batch::run_in_pool(config.threads, || batch::parse_files(inputs, reporter))?;

    let mut report = ConversionReport {
        discovered: inputs.len(),
        ..Default::default()
    };
    let ready = gather(parsed, &mut report.failures);

    reporter.start(Phase::Write, ready.len());
    let mut written_molecules = Vec::with_capacity(ready.len());
    for (id, path, molecule) in ready {
        let output = config.output_dir.join(output_file_name(id));
        match write_output::<ExtXyzFile>(&molecule, &output) {
            Ok(()) => {
                info!("Parsed file {:06}", id);
                report.written.push(WrittenFile {
                    id,
                    source: path,
                    output,
                });
                written_molecules.push(molecule);
            }
            Err(e) => record_failure(&mut report.failures, path, Some(id), e.into()),
        }
        reporter.advance(Phase::Write);
    }
    reporter.finish(Phase::Write);

    if let Some(summary_path) = &config.summary_path {
        let rows = report
            .written
            .iter()
            .zip(&written_molecules)
            .map(|(file, molecule)| SummaryRow {
                file_name: file
                    .output
                    .file_name()
                    .and_then(|name| name.to_str())
                    .unwrap_or_default(),
                molecule,
            });
        summary::write_summary_to_path(summary_path, rows)?;
        info!("Property summary written to {:?}", summary_path);
        report.summary_path = Some(summary_path.clone());
    }

    if !report.failures.is_empty() {
        reporter.report(Progress::Message(format!(
            "{} of {} file(s) could not be converted.",
            report.failures.len(),
            report.discovered
        )));
    }
    info!(
        written = report.written.len(),
        failed = report.failures.len(),
        "Conversion finished."
    );
    Ok(report)
}

/// Writes `molecule` to a `.partial` sibling of `output` and renames it into
/// place, so `output` either holds a complete file or does not exist.
fn write_output<W: MolecularWriter>(molecule: &Molecule, output: &Path) -> Result<(), W::Error> {
    let staging = staging_path(output);
    let result = W::write_to_path(molecule, &staging)
        .and_then(|()| fs::rename(&staging, output).map_err(W::Error::from));
    if result.is_err() && staging.exists() {
        if let Err(e) = fs::remove_file(&staging) {
            warn!("Failed to remove partial output {:?}: {}", staging, e);
        }
    }
    result
}

fn staging_path(output: &Path) -> PathBuf {
    let mut name = output.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    output.with_file_name(name)
}

/// Turns parse outcomes into `(id, path, molecule)` triples sorted by id,
/// moving every unusable outcome into `failures`.
fn gather(
    parsed: Vec<batch::ParsedFile>,
    failures: &mut Vec<FileFailure>,
) -> Vec<(u64, PathBuf, Molecule)> {
    let mut ready = Vec::with_capacity(parsed.len());
    for batch::ParsedFile { path, result } in parsed {
        let molecule = match result {
            Ok(molecule) => molecule,
            Err(e) => {
                record_failure(failures, path, None, FileError::Read(e));
                continue;
            }
        };
        match molecule.id() {
            Some(id) => ready.push((id, path, molecule)),
            None => {
                let value = molecule
                    .properties()
                    .get(PropertyKey::Id)
                    .to_string();
                record_failure(failures, path, None, FileError::InvalidId { value });
            }
        }
    }

    ready.sort_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)));

    let mut first_seen: HashMap<u64, PathBuf> = HashMap::new();
    let mut unique = Vec::with_capacity(ready.len());
    for (id, path, molecule) in ready {
        if let Some(first) = first_seen.get(&id) {
            let error = FileError::DuplicateId {
                id,
                first: first.clone(),
            };
            record_failure(failures, path, Some(id), error);
            continue;
        }
        first_seen.insert(id, path.clone());
        unique.push((id, path, molecule));
    }
    debug!("{} molecule(s) ready to write.", unique.len());
    unique
}

fn record_failure(
    failures: &mut Vec<FileFailure>,
    path: PathBuf,
    id: Option<u64>,
    error: FileError,
) {
    match id {
        Some(id) => warn!(path = %path.display(), id, "Skipping file: {}", error),
        None => warn!(path = %path.display(), "Skipping file: {}", error),
    }
    failures.push(FileFailure { path, id, error });
}
