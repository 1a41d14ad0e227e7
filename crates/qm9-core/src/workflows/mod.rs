//! High-level procedures built from the `core` and `engine` layers.

pub mod convert;
