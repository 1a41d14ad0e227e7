//! Data structures for parsed QM9 molecules.
//!
//! A [`molecule::Molecule`] carries the per-atom arrays of one record together
//! with its [`properties::MoleculeProperties`], the 17 scalar values read from
//! the property line.

pub mod molecule;
pub mod properties;
