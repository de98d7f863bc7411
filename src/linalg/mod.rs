//! Linear algebra support on top of nalgebra.

pub mod symmetric;

pub use symmetric::SymMatrix;
