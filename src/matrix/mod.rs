//! Assignment matrix: every (user, file) pair with any direct or potential
//! knowledge, keyed by dense ids.
//!
//! Ids are indices into the sorted author keys and sorted paths, so they
//! are stable for identical input and can be published as `idToUser` /
//! `idToFile` maps alongside the matrix.

pub mod analyzer;
pub mod report;

pub use analyzer::{AssignmentMatrix, Cell, build};
