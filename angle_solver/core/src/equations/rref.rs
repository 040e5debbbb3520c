//! Gauss-Jordan elimination and the pure RREF solver

use super::numeric::clean;
use super::{parse_all, SolverReport};
use crate::config::LinearConfig;
use nalgebra::DMatrix;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

/// What the reduced system says about one variable
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum VariableStatus {
    /// Pivot column with no free variable in its row
    Unique(f64),
    /// Pivot column tied to free variables
    Dependent,
    /// No pivot in the column
    Free,
}

/// Overall solution set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SystemClass {
    /// Inconsistent system
    #[default]
    None,
    Unique,
    Infinite,
}

/// Augmented matrix in reduced row-echelon form
#[derive(Debug, Clone)]
pub struct Reduced {
    pub matrix: DMatrix<f64>,
    pub variables: Vec<String>,
    /// `(row, column)` of every pivot
    pub pivots: Vec<(usize, usize)>,
}

impl Reduced {
    /// Zero coefficients with a nonzero constant
    pub fn is_inconsistent(&self, epsilon: f64) -> bool {
        let cols = self.variables.len();
        (0..self.matrix.nrows()).any(|r| {
            (0..cols).all(|c| self.matrix[(r, c)].abs() <= epsilon) && self.matrix[(r, cols)].abs() > epsilon
        })
    }

    pub fn statuses(&self, epsilon: f64) -> BTreeMap<String, VariableStatus> {
        let cols = self.variables.len();
        let pivot_columns: BTreeSet<usize> = self.pivots.iter().map(|&(_, c)| c).collect();
        let mut statuses = BTreeMap::new();

        for (c, variable) in self.variables.iter().enumerate() {
            statuses.insert(variable.clone(), VariableStatus::Free);
            if !pivot_columns.contains(&c) {
                continue;
            }
            if let Some(&(r, _)) = self.pivots.iter().find(|&&(_, pc)| pc == c) {
                let tied = (0..cols).any(|o| o != c && self.matrix[(r, o)].abs() > epsilon);
                let status = if tied {
                    VariableStatus::Dependent
                } else {
                    VariableStatus::Unique(self.matrix[(r, cols)] / self.matrix[(r, c)])
                };
                statuses.insert(variable.clone(), status);
            }
        }

        statuses
    }
}

/// Build the augmented matrix `[A | b]` and reduce it
pub fn reduce(equations: &[super::LinearEquation], pivot_epsilon: f64) -> Reduced {
    let variables: Vec<String> = equations
        .iter()
        .flat_map(|e| e.coefficients.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let rows = equations.len();
    let cols = variables.len();

    let mut flat = Vec::with_capacity(rows * (cols + 1));
    for equation in equations {
        for variable in &variables {
            flat.push(equation.coefficients.get(variable).copied().unwrap_or(0.0));
        }
        flat.push(equation.constant);
    }
    let mut matrix = DMatrix::from_row_slice(rows, cols + 1, &flat);
    let pivots = gauss_jordan(&mut matrix, cols, pivot_epsilon);

    Reduced { matrix, variables, pivots }
}

/// In-place Gauss-Jordan with partial pivoting over the first `cols` columns
pub fn gauss_jordan(matrix: &mut DMatrix<f64>, cols: usize, epsilon: f64) -> Vec<(usize, usize)> {
    let rows = matrix.nrows();
    let mut pivots = Vec::new();
    let mut row = 0;

    for col in 0..cols {
        if row >= rows {
            break;
        }
        let best = (row..rows).max_by(|&a, &b| matrix[(a, col)].abs().total_cmp(&matrix[(b, col)].abs()));
        let Some(best) = best else {
            break;
        };
        if matrix[(best, col)].abs() <= epsilon {
            continue;
        }
        matrix.swap_rows(row, best);

        let pivot = matrix[(row, col)];
        for c in 0..matrix.ncols() {
            matrix[(row, c)] /= pivot;
        }
        for r in 0..rows {
            if r == row {
                continue;
            }
            let factor = matrix[(r, col)];
            if factor.abs() <= epsilon {
                continue;
            }
            for c in 0..matrix.ncols() {
                let delta = factor * matrix[(row, c)];
                matrix[(r, c)] -= delta;
            }
        }

        pivots.push((row, col));
        row += 1;
    }

    pivots
}

/// Result of the pure RREF strategy
#[derive(Debug, Clone, Default, Serialize)]
pub struct RrefOutcome {
    #[serde(flatten)]
    pub report: SolverReport,
    pub classification: SystemClass,
    pub variables: BTreeMap<String, VariableStatus>,
}

pub struct RrefSolver {
    config: LinearConfig,
}

impl RrefSolver {
    pub fn new(config: LinearConfig) -> Self {
        Self { config }
    }

    pub fn solve(&self, equations: &[String], targets: &[String]) -> RrefOutcome {
        let start = Instant::now();
        let parsed = parse_all(equations);
        let reduced = reduce(&parsed, self.config.pivot_epsilon);
        let epsilon = self.config.pivot_epsilon;

        let mut all_variables: BTreeSet<String> = reduced.variables.iter().cloned().collect();
        all_variables.extend(targets.iter().cloned());

        if reduced.is_inconsistent(epsilon) {
            return RrefOutcome {
                report: SolverReport::from_solution(BTreeMap::new(), targets, &all_variables, start),
                classification: SystemClass::None,
                variables: reduced.statuses(epsilon),
            };
        }

        let statuses = reduced.statuses(epsilon);
        let solution: BTreeMap<String, f64> = statuses
            .iter()
            .filter_map(|(v, s)| match s {
                VariableStatus::Unique(value) => Some((v.clone(), clean(*value, &self.config))),
                _ => None,
            })
            .collect();
        let classification = if statuses.values().all(|s| matches!(s, VariableStatus::Unique(_))) {
            SystemClass::Unique
        } else {
            SystemClass::Infinite
        };

        RrefOutcome {
            report: SolverReport::from_solution(solution, targets, &all_variables, start),
            classification,
            variables: statuses,
        }
    }
}
