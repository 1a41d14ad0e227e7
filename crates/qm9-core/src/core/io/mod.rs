//! Provides input/output functionality for molecular file formats.
//!
//! Raw QM9 records are read with [`qm9::Qm9File`] (or the pure [`qm9::parse`]),
//! normalized molecules are written as extended XYZ with [`xyz::ExtXyzFile`],
//! and [`summary`] produces a CSV table of the properties of a batch.

pub mod qm9;
pub mod summary;
pub mod traits;
pub mod xyz;
