//! Developer knowledge: time-decayed contribution scores.
//!
//! Each contribution of weight `w` at time `t` is worth
//! `w * 2^(-(T - t) / half_life)` at the evaluation instant `T`, summed
//! over all events for the same (author, file). Scores only grow when a
//! new contribution arrives and otherwise decay toward zero.

pub mod analyzer;
pub mod report;

pub use analyzer::{DecayModel, DeveloperKnowledge, compute, module_of};
