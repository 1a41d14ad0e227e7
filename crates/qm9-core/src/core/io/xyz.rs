use crate::core::io::traits::MolecularWriter;
use crate::core::models::molecule::Molecule;
use crate::core::models::properties::PropertyValue;
use std::io::{self, Write};
use thiserror::Error;

/// Column descriptor for the per-atom arrays written on each atom line.
const PROPERTIES_DESCRIPTOR: &str = "Properties=species:S:1:pos:R:3:charges:R:1";
/// QM9 molecules are isolated: no periodic boundaries in any direction.
const PBC_FIELD: &str = "pbc=\"F F F\"";

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Writer for extended XYZ files.
///
/// The comment line carries the column descriptor followed by every molecule
/// property as `key=value` in canonical order, so the file stays readable by
/// plain XYZ tools while keeping the full metadata.
pub struct ExtXyzFile;

impl ExtXyzFile {
    /// Builds the comment line for `molecule`.
    pub fn comment_line(molecule: &Molecule) -> String {
        let mut fields = Vec::with_capacity(molecule.properties().len() + 2);
        fields.push(PROPERTIES_DESCRIPTOR.to_string());
        for (key, value) in molecule.properties().iter() {
            let rendered = match value {
                PropertyValue::Text(text) => quote_if_needed(text),
                PropertyValue::Energy(energy) => energy.to_string(),
            };
            fields.push(format!("{}={}", key.name(), rendered));
        }
        fields.push(PBC_FIELD.to_string());
        fields.join(" ")
    }
}

fn quote_if_needed(text: &str) -> String {
    let needs_quotes =
        text.is_empty() || text.chars().any(|c| c.is_whitespace() || c == '=' || c == '"');
    if needs_quotes {
        format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        text.to_string()
    }
}

impl MolecularWriter for ExtXyzFile {
    type Error = XyzError;

    fn write_to(molecule: &Molecule, writer: &mut impl Write) -> Result<(), Self::Error> {
        writeln!(writer, "{}", molecule.atom_count())?;
        writeln!(writer, "{}", Self::comment_line(molecule))?;
        for (symbol, position, charge) in molecule.atoms() {
            writeln!(
                writer,
                "{:<2} {:>16.8} {:>16.8} {:>16.8} {:>16.8}",
                symbol, position.x, position.y, position.z, charge
            )?;
        }
        Ok(())
    }
}
