//! # Core Module
//!
//! Stateless building blocks: the molecule data model and the readers and
//! writers for the file formats the converter handles.
//!
//! - **Molecular Representation** ([`models`]) - `Molecule` and its property mapping
//! - **File I/O** ([`io`]) - QM9 record parsing, extended XYZ output and CSV summaries

pub mod io;
pub mod models;
