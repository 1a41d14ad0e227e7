use super::properties::MoleculeProperties;
use nalgebra::{DVector, Point3};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoleculeError {
    #[error(
        "Per-atom arrays are misaligned: {symbols} symbols, {positions} positions, {charges} charges"
    )]
    Misaligned {
        symbols: usize,
        positions: usize,
        charges: usize,
    },
}

/// A single parsed QM9 molecule.
///
/// The per-atom arrays (`element_symbols`, `positions`, `charges`) are
/// index-aligned and keep the order of the atom lines in the source record.
/// Scalar metadata lives in [`MoleculeProperties`]. A `Molecule` is immutable
/// once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    element_symbols: Vec<String>,
    positions: Vec<Point3<f64>>,
    charges: DVector<f64>,
    properties: MoleculeProperties,
}

impl Molecule {
    /// Creates a molecule from its per-atom arrays and metadata.
    ///
    /// # Errors
    ///
    /// Returns [`MoleculeError::Misaligned`] if the three per-atom arrays do not
    /// have the same length.
    pub fn new(
        element_symbols: Vec<String>,
        positions: Vec<Point3<f64>>,
        charges: DVector<f64>,
        properties: MoleculeProperties,
    ) -> Result<Self, MoleculeError> {
        if element_symbols.len() != positions.len() || element_symbols.len() != charges.len() {
            return Err(MoleculeError::Misaligned {
                symbols: element_symbols.len(),
                positions: positions.len(),
                charges: charges.len(),
            });
        }
        Ok(Self {
            element_symbols,
            positions,
            charges,
            properties,
        })
    }

    /// Creates a molecule from arrays the caller has already aligned.
    pub(crate) fn from_aligned(
        element_symbols: Vec<String>,
        positions: Vec<Point3<f64>>,
        charges: DVector<f64>,
        properties: MoleculeProperties,
    ) -> Self {
        debug_assert_eq!(element_symbols.len(), positions.len());
        debug_assert_eq!(element_symbols.len(), charges.len());
        Self {
            element_symbols,
            positions,
            charges,
            properties,
        }
    }

    pub fn atom_count(&self) -> usize {
        self.element_symbols.len()
    }

    pub fn element_symbols(&self) -> &[String] {
        &self.element_symbols
    }

    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Partial charges in elementary charge units.
    pub fn charges(&self) -> &DVector<f64> {
        &self.charges
    }

    pub fn properties(&self) -> &MoleculeProperties {
        &self.properties
    }

    /// The integer value of the `id` property, used for output naming.
    pub fn id(&self) -> Option<u64> {
        self.properties.id()
    }

    /// Iterates over `(symbol, position, charge)` for each atom in order.
    pub fn atoms(&self) -> impl Iterator<Item = (&str, &Point3<f64>, f64)> {
        self.element_symbols
            .iter()
            .zip(self.positions.iter())
            .zip(self.charges.iter())
            .map(|((symbol, position), charge)| (symbol.as_str(), position, *charge))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::properties::{PropertyKey, PropertyValue};

    fn properties() -> MoleculeProperties {
        MoleculeProperties::from_canonical(PropertyKey::ALL.map(|key| match key {
            PropertyKey::Id => PropertyValue::Text("7".to_string()),
            k if k.is_energy() => PropertyValue::Energy(0.0),
            k => PropertyValue::Text(k.name().to_string()),
        }))
        .unwrap()
    }

    #[test]
    fn new_molecule_keeps_atom_order() {
        let molecule = Molecule::new(
            vec!["O".into(), "H".into(), "H".into()],
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.96, 0.0, 0.0),
                Point3::new(-0.24, 0.93, 0.0),
            ],
            DVector::from_vec(vec![-0.8, 0.4, 0.4]),
            properties(),
        )
        .unwrap();

        assert_eq!(molecule.atom_count(), 3);
        let atoms: Vec<_> = molecule.atoms().collect();
        assert_eq!(atoms[0].0, "O");
        assert_eq!(atoms[1].1, &Point3::new(0.96, 0.0, 0.0));
        assert_eq!(atoms[2].2, 0.4);
        assert_eq!(molecule.id(), Some(7));
    }

    #[test]
    fn new_molecule_rejects_misaligned_arrays() {
        let result = Molecule::new(
            vec!["C".into(), "H".into()],
            vec![Point3::origin()],
            DVector::from_vec(vec![0.0, 0.0]),
            properties(),
        );
        assert_eq!(
            result.unwrap_err(),
            MoleculeError::Misaligned {
                symbols: 2,
                positions: 1,
                charges: 2
            }
        );
    }
}
