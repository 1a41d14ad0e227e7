//! # qm9parse
//!
//! Parsing and normalization for the QM9 small-molecule dataset.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Molecule`,
//!   `MoleculeProperties`) and the format readers and writers. The record
//!   parser, [`core::io::qm9::parse`], is a pure function of its input text.
//!
//! - **[`engine`]: The Batch Layer.** Maps the parser over many files on a
//!   fixed-size worker pool, keeps per-file failures isolated and reports
//!   progress.
//!
//! - **[`workflows`]: The Public API.** [`workflows::convert::run`] discovers
//!   input files, converts them and writes `mol_{id:06}.xyz` outputs.

pub mod core;
pub mod engine;
pub mod workflows;
