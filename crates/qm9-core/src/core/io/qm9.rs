use crate::core::io::traits::MolecularReader;
use crate::core::models::molecule::Molecule;
use crate::core::models::properties::{
    HARTREE_TO_EV, MoleculeProperties, PROPERTY_COUNT, PropertyKey, PropertyValue,
};
use nalgebra::{DVector, Point3};
use std::io::{self, BufRead, Read};
use thiserror::Error;

/// Line number (1-based) of the atom count.
const COUNT_LINE: usize = 1;
/// Line number (1-based) of the property line.
const PROPERTY_LINE: usize = 2;
/// Minimum tokens on an atom line: symbol, x, y, z, charge.
const ATOM_ROW_TOKENS: usize = 5;

#[derive(Debug, Error)]
pub enum Qm9Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// A QM9 record that does not follow the fixed layout.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("Format error on line {line}: {kind}")]
pub struct FormatError {
    /// 1-based line number the problem was found on.
    pub line: usize,
    pub kind: FormatErrorKind,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FormatErrorKind {
    #[error("Invalid atom count (value: '{value}')")]
    AtomCount { value: String },
    #[error("Expected 17 property tokens, found {found}")]
    PropertyArity { found: usize },
    #[error("Property '{key}' is not numeric (value: '{value}')")]
    PropertyType { key: PropertyKey, value: String },
    #[error("Invalid atom row: {0}")]
    AtomRow(AtomRowError),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AtomRowError {
    #[error("record ends after {found} of {expected} atom lines")]
    Missing { expected: usize, found: usize },
    #[error("expected at least 5 tokens, found {found}")]
    TooFewTokens { found: usize },
    #[error("invalid float in {column} column (value: '{value}')")]
    InvalidFloat { column: &'static str, value: String },
}

impl FormatError {
    fn new(line: usize, kind: FormatErrorKind) -> Self {
        Self { line, kind }
    }

    fn atom_row(line: usize, error: AtomRowError) -> Self {
        Self::new(line, FormatErrorKind::AtomRow(error))
    }
}

/// Parses a numeric token, accepting the `*^` exponent marker QM9 inherits
/// from Mathematica (`1.5*^-6` is `1.5e-6`).
fn parse_float(token: &str) -> Option<f64> {
    if token.contains("*^") {
        token.replacen("*^", "e", 1).parse().ok()
    } else {
        token.parse().ok()
    }
}

/// Parses one QM9 record into a [`Molecule`].
///
/// The record layout is fixed: the atom count, a line of 17 property tokens,
/// then one `symbol x y z charge` line per atom. Energy-valued properties are
/// converted from Hartree to eV; the remaining properties keep their tokens
/// verbatim. Lines after the last atom line are ignored.
///
/// # Errors
///
/// Returns a [`FormatError`] describing the first deviation from the layout.
/// No partially parsed molecule is ever produced.
pub fn parse(raw_text: &str) -> Result<Molecule, FormatError> {
    let mut lines = raw_text.lines();

    let count_token = lines.next().unwrap_or("").trim();
    let atom_count = match count_token.parse::<usize>() {
        Ok(n) if n > 0 => n,
        _ => {
            return Err(FormatError::new(
                COUNT_LINE,
                FormatErrorKind::AtomCount {
                    value: count_token.to_string(),
                },
            ));
        }
    };

    let properties = parse_properties(lines.next().unwrap_or(""))?;

    // The count is untrusted until the atom lines are actually there.
    let capacity = atom_count.min(lines.clone().count());
    let mut element_symbols = Vec::with_capacity(capacity);
    let mut positions = Vec::with_capacity(capacity);
    let mut charge_tokens = Vec::with_capacity(capacity);

    for atom_idx in 0..atom_count {
        let line_num = PROPERTY_LINE + 1 + atom_idx;
        let line = lines.next().ok_or_else(|| {
            FormatError::atom_row(
                line_num,
                AtomRowError::Missing {
                    expected: atom_count,
                    found: atom_idx,
                },
            )
        })?;

        // Tabs and spaces are interchangeable separators.
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < ATOM_ROW_TOKENS {
            return Err(FormatError::atom_row(
                line_num,
                AtomRowError::TooFewTokens {
                    found: tokens.len(),
                },
            ));
        }

        let coordinate = |column: &'static str, token: &str| {
            parse_float(token).ok_or_else(|| {
                FormatError::atom_row(
                    line_num,
                    AtomRowError::InvalidFloat {
                        column,
                        value: token.to_string(),
                    },
                )
            })
        };
        let x = coordinate("x", tokens[1])?;
        let y = coordinate("y", tokens[2])?;
        let z = coordinate("z", tokens[3])?;

        element_symbols.push(tokens[0].to_string());
        positions.push(Point3::new(x, y, z));
        charge_tokens.push((line_num, tokens[4]));
    }

    let charges = charge_tokens
        .into_iter()
        .map(|(line_num, token)| {
            parse_float(token).ok_or_else(|| {
                FormatError::atom_row(
                    line_num,
                    AtomRowError::InvalidFloat {
                        column: "charge",
                        value: token.to_string(),
                    },
                )
            })
        })
        .collect::<Result<Vec<f64>, _>>()?;

    Ok(Molecule::from_aligned(
        element_symbols,
        positions,
        DVector::from_vec(charges),
        properties,
    ))
}

fn parse_properties(line: &str) -> Result<MoleculeProperties, FormatError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let tokens: [&str; PROPERTY_COUNT] = tokens.try_into().map_err(|t: Vec<&str>| {
        FormatError::new(
            PROPERTY_LINE,
            FormatErrorKind::PropertyArity { found: t.len() },
        )
    })?;

    let mut values = tokens.map(|token| PropertyValue::Text(token.to_string()));
    for key in PropertyKey::ENERGIES {
        let token = tokens[key as usize];
        let hartree = parse_float(token).ok_or_else(|| {
            FormatError::new(
                PROPERTY_LINE,
                FormatErrorKind::PropertyType {
                    key,
                    value: token.to_string(),
                },
            )
        })?;
        values[key as usize] = PropertyValue::Energy(hartree * HARTREE_TO_EV);
    }

    Ok(MoleculeProperties::from_parsed(values))
}

/// Reader for raw QM9 `.xyz` records.
pub struct Qm9File;

impl MolecularReader for Qm9File {
    type Error = Qm9Error;

    fn read_from(reader: &mut impl BufRead) -> Result<Molecule, Self::Error> {
        let mut raw_text = String::new();
        reader.read_to_string(&mut raw_text)?;
        Ok(parse(&raw_text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const METHANE_FRAGMENT: &str = "3
gdb9 1 0.0 0.0 0.0 1.5 10.0 -0.25 0.05 0.3 100.0 0.002 -40.5 -40.4 -40.4 -40.45 20.0
C 0.0 0.0 0.0 -0.1
H 1.0 0.0 0.0 0.05
H 0.0 1.0 0.0 0.05
";

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-12 * expected.abs().max(1.0),
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn parses_reference_record() {
        let molecule = parse(METHANE_FRAGMENT).unwrap();

        assert_eq!(molecule.atom_count(), 3);
        assert_eq!(molecule.element_symbols(), ["C", "H", "H"]);
        assert_eq!(molecule.charges().as_slice(), [-0.1, 0.05, 0.05]);
        assert_eq!(molecule.positions()[1], Point3::new(1.0, 0.0, 0.0));
        assert_eq!(molecule.positions()[2], Point3::new(0.0, 1.0, 0.0));

        let props = molecule.properties();
        assert_eq!(props.len(), 17);
        assert_eq!(props.energy(PropertyKey::Homo), Some(-0.25 * 27.2114));
        assert_eq!(props.get(PropertyKey::Id).as_text(), Some("1"));
        assert_eq!(molecule.id(), Some(1));
    }

    #[test]
    fn converts_exactly_the_energy_subset() {
        let molecule = parse(METHANE_FRAGMENT).unwrap();
        let props = molecule.properties();

        let hartree = [
            (PropertyKey::Homo, -0.25),
            (PropertyKey::Lumo, 0.05),
            (PropertyKey::Gap, 0.3),
            (PropertyKey::Zpve, 0.002),
            (PropertyKey::U0, -40.5),
            (PropertyKey::U, -40.4),
            (PropertyKey::H, -40.4),
            (PropertyKey::G, -40.45),
        ];
        for (key, h) in hartree {
            assert_close(props.energy(key).unwrap(), h * HARTREE_TO_EV);
        }

        let passthrough = [
            (PropertyKey::Db, "gdb9"),
            (PropertyKey::A, "0.0"),
            (PropertyKey::B, "0.0"),
            (PropertyKey::C, "0.0"),
            (PropertyKey::Mu, "1.5"),
            (PropertyKey::Alpha, "10.0"),
            (PropertyKey::R2, "100.0"),
            (PropertyKey::Cv, "20.0"),
        ];
        for (key, token) in passthrough {
            assert_eq!(props.get(key), &PropertyValue::Text(token.to_string()));
        }
    }

    #[test]
    fn accepts_tabs_trailing_tokens_and_footer_lines() {
        let raw = "2\n\
            gdb9 2 1 2 3 0 0 -0.3 0.1 0.4 10 0.01 -1 -1 -1 -1 6.4\n\
            N\t-0.004\t1.1\t0.008\t-0.42\textra\n\
            H 0.1 \t 0.2 0.3\t0.14  more tokens\n\
            1341.3 1341.3 1341.3\n\
            N N\n\
            InChI=1S/H3N/h1H3\tInChI=1S/H3N/h1H3\n";
        let molecule = parse(raw).unwrap();

        assert_eq!(molecule.element_symbols(), ["N", "H"]);
        assert_eq!(molecule.positions()[0], Point3::new(-0.004, 1.1, 0.008));
        assert_eq!(molecule.charges().as_slice(), [-0.42, 0.14]);
    }

    #[test]
    fn accepts_mathematica_exponents() {
        let raw = "1\n\
            gdb9 3 157.7 157.7 157.7 0 13.21 -0.3877 0.1171 0.5048 35.36 0.044749 -40.47 -40.47 -40.47 -40.49 6.469\n\
            C -1.2700e-02 1.0858*^-1 8.0*^-3 -5.35*^-1\n";
        let molecule = parse(raw).unwrap();

        assert_close(molecule.positions()[0].y, 0.10858);
        assert_close(molecule.positions()[0].z, 0.008);
        assert_close(molecule.charges()[0], -0.535);
    }

    #[test]
    fn accepts_crlf_line_endings() {
        let raw = METHANE_FRAGMENT.replace('\n', "\r\n");
        let molecule = parse(&raw).unwrap();
        assert_eq!(molecule.atom_count(), 3);
        assert_eq!(molecule.properties().get(PropertyKey::Cv).as_text(), Some("20.0"));
    }

    #[test]
    fn rejects_non_integer_atom_count() {
        for count in ["three", "3.0", "-1", "0", ""] {
            let raw = METHANE_FRAGMENT.replacen("3\n", &format!("{count}\n"), 1);
            let err = parse(&raw).unwrap_err();
            assert_eq!(err.line, 1);
            assert_eq!(
                err.kind,
                FormatErrorKind::AtomCount {
                    value: count.to_string()
                }
            );
        }
    }

    #[test]
    fn rejects_property_line_with_sixteen_tokens() {
        let raw = METHANE_FRAGMENT.replace(" 20.0\n", "\n");
        let err = parse(&raw).unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.kind, FormatErrorKind::PropertyArity { found: 16 });
    }

    #[test]
    fn rejects_property_line_with_extra_tokens() {
        let raw = METHANE_FRAGMENT.replace(" 20.0\n", " 20.0 99\n");
        let err = parse(&raw).unwrap_err();
        assert_eq!(err.kind, FormatErrorKind::PropertyArity { found: 18 });
    }

    #[test]
    fn rejects_missing_property_line() {
        let err = parse("3\n").unwrap_err();
        assert_eq!(err.kind, FormatErrorKind::PropertyArity { found: 0 });
    }

    #[test]
    fn rejects_non_numeric_energy() {
        let raw = METHANE_FRAGMENT.replace(" -0.25 ", " n/a ");
        let err = parse(&raw).unwrap_err();
        assert_eq!(
            err.kind,
            FormatErrorKind::PropertyType {
                key: PropertyKey::Homo,
                value: "n/a".to_string()
            }
        );
    }

    #[test]
    fn non_energy_properties_are_not_validated() {
        let raw = METHANE_FRAGMENT.replace(" 1.5 ", " not-a-number ");
        let molecule = parse(&raw).unwrap();
        assert_eq!(
            molecule.properties().get(PropertyKey::Mu).as_text(),
            Some("not-a-number")
        );
    }

    #[test]
    fn rejects_truncated_atom_block() {
        let raw = METHANE_FRAGMENT.replace("H 0.0 1.0 0.0 0.05\n", "");
        let err = parse(&raw).unwrap_err();
        assert_eq!(err.line, 5);
        assert_eq!(
            err.kind,
            FormatErrorKind::AtomRow(AtomRowError::Missing {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn huge_atom_count_is_a_missing_row_error() {
        let raw = METHANE_FRAGMENT.replacen("3\n", &format!("{}\n", usize::MAX), 1);
        let raw = raw.replace("H 1.0 0.0 0.0 0.05\nH 0.0 1.0 0.0 0.05\n", "");
        let err = parse(&raw).unwrap_err();
        assert_eq!(err.line, 4);
        assert_eq!(
            err.kind,
            FormatErrorKind::AtomRow(AtomRowError::Missing {
                expected: usize::MAX,
                found: 1
            })
        );
    }

    #[test]
    fn rejects_atom_line_without_charge() {
        let raw = METHANE_FRAGMENT.replace("H 1.0 0.0 0.0 0.05", "H 1.0 0.0 0.0");
        let err = parse(&raw).unwrap_err();
        assert_eq!(err.line, 4);
        assert_eq!(
            err.kind,
            FormatErrorKind::AtomRow(AtomRowError::TooFewTokens { found: 4 })
        );
    }

    #[test]
    fn rejects_non_numeric_coordinate_and_charge() {
        let raw = METHANE_FRAGMENT.replace("H 1.0 0.0 0.0 0.05", "H 1.0 zero 0.0 0.05");
        let err = parse(&raw).unwrap_err();
        assert_eq!(
            err.kind,
            FormatErrorKind::AtomRow(AtomRowError::InvalidFloat {
                column: "y",
                value: "zero".to_string()
            })
        );

        let raw = METHANE_FRAGMENT.replace("H 0.0 1.0 0.0 0.05", "H 0.0 1.0 0.0 q");
        let err = parse(&raw).unwrap_err();
        assert_eq!(err.line, 5);
        assert_eq!(
            err.kind,
            FormatErrorKind::AtomRow(AtomRowError::InvalidFloat {
                column: "charge",
                value: "q".to_string()
            })
        );
    }

    #[test]
    fn format_error_message_names_line_and_reason() {
        let raw = METHANE_FRAGMENT.replace(" 20.0\n", "\n");
        let message = parse(&raw).unwrap_err().to_string();
        assert_eq!(
            message,
            "Format error on line 2: Expected 17 property tokens, found 16"
        );
    }

    #[test]
    fn reads_record_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dsgdb9nsd_000001.xyz");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(METHANE_FRAGMENT.as_bytes()).unwrap();
        drop(file);

        let molecule = Qm9File::read_from_path(&path).unwrap();
        assert_eq!(molecule.id(), Some(1));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Qm9File::read_from_path(dir.path().join("absent.xyz"));
        assert!(matches!(result, Err(Qm9Error::Io(_))));
    }
}
