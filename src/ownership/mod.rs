//! Files ownership: per-file, per-author accumulated line contributions.
//!
//! Every contribution adds the author's line delta to a running total for
//! that file. Owners are ranked by weight, ties going to whoever
//! contributed first. Each file also gets a bus-factor risk level:
//! Critical (one person >=80%), High (60-80%), Medium (2-3 people >=80%
//! combined), Low (well-distributed).

pub mod analyzer;
pub mod report;

pub use analyzer::{Ownership, accumulate};
