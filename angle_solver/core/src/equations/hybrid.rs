//! Hybrid substitution and elimination solver
//!
//! Phase 1 substitutes every equation of the form `x + c = k` until none is
//! left. Phase 2 reduces what remains to RREF and reads off rows with a
//! single nonzero coefficient. Phase 3 sweeps the remaining equations for
//! any with exactly one unknown, again until nothing changes.

use super::numeric::clean;
use super::rref::reduce;
use super::{parse_all, LinearEquation, SolverReport};
use crate::config::LinearConfig;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;
use tracing::debug;

pub struct HybridSolver {
    config: LinearConfig,
}

impl HybridSolver {
    pub fn new(config: LinearConfig) -> Self {
        Self { config }
    }

    pub fn solve(&self, equations: &[String], targets: &[String]) -> SolverReport {
        let start = Instant::now();
        let parsed = parse_all(equations);
        let mut all_variables: BTreeSet<String> = parsed
            .iter()
            .flat_map(|e| e.coefficients.keys().cloned())
            .collect();
        all_variables.extend(targets.iter().cloned());

        let mut known: BTreeMap<String, f64> = BTreeMap::new();
        let mut remaining = self.substitute_units(parsed, &mut known);
        self.eliminate(&remaining, &mut known);
        self.sweep(&mut remaining, &mut known);

        let solution = known
            .into_iter()
            .map(|(variable, value)| (variable, clean(value, &self.config)))
            .collect();
        SolverReport::from_solution(solution, targets, &all_variables, start)
    }

    /// Phase 1: single variable with unit coefficient
    fn substitute_units(&self, mut equations: Vec<LinearEquation>, known: &mut BTreeMap<String, f64>) -> Vec<LinearEquation> {
        loop {
            let unit = equations.iter().position(|e| {
                e.coefficients.len() == 1 && e.coefficients.values().all(|c| (c.abs() - 1.0).abs() <= self.config.pivot_epsilon)
            });
            let Some(index) = unit else {
                break;
            };
            let equation = equations.swap_remove(index);
            let Some((variable, coefficient)) = equation.coefficients.into_iter().next() else {
                continue;
            };
            let value = equation.constant / coefficient;
            debug!(%variable, value, "substituted");
            for other in equations.iter_mut() {
                other.substitute(&variable, value);
            }
            known.insert(variable, value);
            equations.retain(|e| !e.is_trivial());
        }
        equations
    }

    /// Phase 2: Gauss-Jordan over the rest
    fn eliminate(&self, equations: &[LinearEquation], known: &mut BTreeMap<String, f64>) {
        if equations.is_empty() {
            return;
        }
        let epsilon = self.config.pivot_epsilon;
        let reduced = reduce(equations, epsilon);
        let cols = reduced.variables.len();

        for r in 0..reduced.matrix.nrows() {
            let nonzero: Vec<usize> = (0..cols).filter(|&c| reduced.matrix[(r, c)].abs() > epsilon).collect();
            if let [c] = nonzero.as_slice() {
                let value = reduced.matrix[(r, cols)] / reduced.matrix[(r, *c)];
                known.entry(reduced.variables[*c].clone()).or_insert(value);
            }
        }
    }

    /// Phase 3: equations left with exactly one unknown
    fn sweep(&self, equations: &mut [LinearEquation], known: &mut BTreeMap<String, f64>) {
        loop {
            let mut progress = false;
            for equation in equations.iter_mut() {
                for (variable, value) in known.iter() {
                    equation.substitute(variable, *value);
                }
                if equation.coefficients.len() != 1 {
                    continue;
                }
                let Some((variable, coefficient)) = equation.coefficients.iter().next() else {
                    continue;
                };
                if coefficient.abs() <= self.config.pivot_epsilon {
                    continue;
                }
                let value = equation.constant / coefficient;
                known.insert(variable.clone(), value);
                progress = true;
            }
            if !progress {
                break;
            }
        }
    }
}
