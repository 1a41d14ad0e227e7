use crate::core::models::molecule::Molecule;
use crate::core::models::properties::PropertyKey;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("CSV error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
}

/// One row of the property summary: the written file and its molecule.
pub struct SummaryRow<'a> {
    pub file_name: &'a str,
    pub molecule: &'a Molecule,
}

/// Writes a CSV table with one row per molecule and one column per property.
///
/// Columns are `file`, `n_atoms`, then the 17 properties in canonical order.
/// Energies are written in eV.
pub fn write_summary<'a, W: Write>(
    writer: W,
    rows: impl IntoIterator<Item = SummaryRow<'a>>,
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec!["file", "n_atoms"];
    header.extend(PropertyKey::ALL.iter().map(|k| k.name()));
    csv_writer.write_record(&header)?;

    for row in rows {
        let mut record = Vec::with_capacity(header.len());
        record.push(row.file_name.to_string());
        record.push(row.molecule.atom_count().to_string());
        record.extend(row.molecule.properties().iter().map(|(_, v)| v.to_string()));
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Writes the summary table to `path`, creating or truncating the file.
pub fn write_summary_to_path<'a>(
    path: &Path,
    rows: impl IntoIterator<Item = SummaryRow<'a>>,
) -> Result<(), SummaryError> {
    let to_error = |source: csv::Error| SummaryError::Csv {
        path: path.to_string_lossy().to_string(),
        source,
    };
    let file = std::fs::File::create(path).map_err(|e| to_error(e.into()))?;
    write_summary(file, rows).map_err(to_error)
}
