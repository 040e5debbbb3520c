//! Linear equation strategy
//!
//! The diagram's relationships are extracted as equations over angle names,
//! simplified to a system over class symbols and handed to two independent
//! solvers: a hybrid substitution/elimination solver and a pure RREF solver.

pub mod extract;
pub mod hybrid;
pub mod numeric;
pub mod parser;
pub mod rref;
pub mod simplify;

pub use extract::{extract, Category, Equation, Term};
pub use hybrid::HybridSolver;
pub use parser::{parse_equation, EquationError, LinearEquation};
pub use rref::{RrefOutcome, RrefSolver, SystemClass, VariableStatus};
pub use simplify::{simplify, symbol_name, SimplifiedSystem};

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;
use tracing::debug;

/// Common report of both equation solvers
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SolverReport {
    /// Every target symbol has a value
    pub solved: bool,

    /// Every symbol in the system has a value
    pub all_solved: bool,

    /// Number of solved symbols
    pub score: u32,

    pub execution_time_ms: f64,

    pub solution: BTreeMap<String, f64>,
}

impl SolverReport {
    pub(crate) fn from_solution(
        solution: BTreeMap<String, f64>,
        targets: &[String],
        variables: &BTreeSet<String>,
        start: Instant,
    ) -> Self {
        Self {
            solved: !targets.is_empty() && targets.iter().all(|t| solution.contains_key(t)),
            all_solved: !variables.is_empty() && variables.iter().all(|v| solution.contains_key(v)),
            score: solution.len() as u32,
            execution_time_ms: start.elapsed().as_secs_f64() * 1000.0,
            solution,
        }
    }
}

/// Parse every equation, skipping malformed ones
pub(crate) fn parse_all(equations: &[String]) -> Vec<LinearEquation> {
    equations
        .iter()
        .filter_map(|text| match parse_equation(text) {
            Ok(equation) => Some(equation),
            Err(err) => {
                debug!(%err, "skipping equation");
                None
            }
        })
        .filter(|equation| !equation.is_trivial())
        .collect()
}
