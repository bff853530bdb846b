//! Potential authorship: for every file, the authors who never touched it
//! but know its neighborhood (files it co-changes with, files in the same
//! directory) well enough to pick it up.

pub mod analyzer;
pub mod report;

pub use analyzer::{CoChange, EstimateOptions, PotentialAuthorship, estimate};
