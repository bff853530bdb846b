//! Contributor statistics read off the assignment matrix: how many files
//! each person modified, how often, in which languages, and a suggested
//! functional role.

pub mod analyzer;
pub mod report;

pub use analyzer::{ContributorStats, Role, analyze, login_from_email};
