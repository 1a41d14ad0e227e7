use crate::cli::InspectArgs;
use crate::error::{CliError, Result};
use qm9parse::core::io::{
    qm9::Qm9File,
    traits::{MolecularReader, MolecularWriter},
    xyz::ExtXyzFile,
};
use qm9parse::core::models::molecule::Molecule;
use std::io::{self, Write};
use tracing::info;

pub fn run(args: InspectArgs) -> Result<()> {
    info!("Loading record from {:?}", &args.path);
    let molecule = Qm9File::read_from_path(&args.path).map_err(|e| CliError::FileParsing {
        path: args.path.clone(),
        source: e.into(),
    })?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.xyz {
        ExtXyzFile::write_to(&molecule, &mut out).map_err(|e| CliError::Other(e.into()))?;
    } else {
        write_table(&molecule, &mut out)?;
    }
    out.flush()?;
    Ok(())
}

/// Prints the atoms, then every property with energies already in eV.
fn write_table(molecule: &Molecule, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Atoms: {}", molecule.atom_count())?;
    writeln!(
        out,
        "  {:<4} {:>12} {:>12} {:>12} {:>12}",
        "El", "x", "y", "z", "charge"
    )?;
    for (symbol, position, charge) in molecule.atoms() {
        writeln!(
            out,
            "  {:<4} {:>12.6} {:>12.6} {:>12.6} {:>12.6}",
            symbol, position.x, position.y, position.z, charge
        )?;
    }

    writeln!(out, "Properties:")?;
    for (key, value) in molecule.properties().iter() {
        let unit = if key.is_energy() { " eV" } else { "" };
        writeln!(out, "  {:<6} {}{}", key.name(), value, unit)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qm9parse::core::io::qm9;
    use std::path::PathBuf;

    const RECORD: &str = "2\ngdb9 7 157.7 157.7 157.7 0.0 13.21 -0.3877 0.1171 0.5048 35.36 0.044749 -40.47 -40.47 -40.47 -40.49 6.469\nC 0.0 0.0 0.0 -0.5\nH 1.0 0.0 0.0 0.5\n";

    #[test]
    fn table_lists_atoms_and_all_properties() {
        let molecule = qm9::parse(RECORD).unwrap();
        let mut buffer = Vec::new();

        write_table(&molecule, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.starts_with("Atoms: 2\n"));
        assert!(text.contains("  C        0.000000     0.000000     0.000000    -0.500000"));
        assert!(text.contains("  id     7\n"));
        assert!(text.contains("  db     gdb9\n"));
        let homo = text.lines().find(|l| l.starts_with("  homo ")).unwrap();
        assert!(homo.starts_with("  homo   -10.549"));
        assert!(homo.ends_with(" eV"));
        assert_eq!(text.lines().filter(|l| l.starts_with("  ")).count(), 1 + 2 + 17);
    }

    #[test]
    fn unreadable_record_is_a_file_parsing_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.xyz");
        std::fs::write(&path, "x\n").unwrap();

        let result = run(InspectArgs {
            path: PathBuf::from(&path),
            xyz: false,
        });

        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }
}
