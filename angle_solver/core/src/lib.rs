//! Angle Solver Core
//!
//! Finds unknown angle values in 2-D geometry diagrams by combining a
//! fixed-point theorem rule engine with linear equation solving.

pub mod config;   // Solver configuration
pub mod equations; // Equation extraction, simplification and linear solvers
pub mod geometry; // Geometric relations (rays, triangles, partitions)
pub mod ir;       // Intermediate representation (symbols, diagram, model, trace)
pub mod loader;   // Diagram loaders (runtime and compact JSON)
pub mod rules;    // Validator, theorem rules and rule engine
pub mod solve;    // Orchestrator

pub use config::{ConfigError, LinearConfig, SolverConfig, Tolerances};
pub use equations::{EquationError, SimplifiedSystem, SolverReport};
pub use ir::*;
pub use loader::{LoadError, LoadResult};
pub use rules::{all_rules, Rule, RuleEngine, TheoremResult, Violation};
pub use solve::{solve, solve_model, Disagreement, SolveOptions, SolverResults};
