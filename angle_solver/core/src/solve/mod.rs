//! Solve entry points
//!
//! Combines the rule engine and the equation solvers into one result.

pub mod orchestrator;

pub use orchestrator::{solve, solve_model, Disagreement, SolveOptions, SolverResults};
