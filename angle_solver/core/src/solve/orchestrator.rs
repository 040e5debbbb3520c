//! Solve orchestrator
//!
//! Runs the rule engine on a private copy of the model and both equation
//! solvers on the system extracted from the untouched model, then merges
//! the three outcomes. Never fails: a diagram that cannot be modelled comes
//! back unsolved.

use crate::config::SolverConfig;
use crate::equations::{
    extract, simplify, HybridSolver, RrefOutcome, RrefSolver, SimplifiedSystem, SolverReport,
};
use crate::geometry::Relations;
use crate::ir::{DiagramData, GeoAngle, GeometryModel};
use crate::rules::{AssignHook, RuleEngine, TheoremResult};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Caller options for one solve
#[derive(Default)]
pub struct SolveOptions<'a> {
    pub config: SolverConfig,

    /// Called after each rule engine assignment: angle, reason, rule id
    pub set_angle: Option<Box<AssignHook<'a>>>,
}

impl<'a> SolveOptions<'a> {
    pub fn new(config: SolverConfig) -> Self {
        Self { config, set_angle: None }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    pub fn with_set_angle(mut self, hook: impl FnMut(&GeoAngle, &str, &str) + 'a) -> Self {
        self.set_angle = Some(Box::new(hook));
        self
    }
}

/// A value on which the rule engine and an equation solver differ
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Disagreement {
    /// Caller's angle id
    pub angle: String,
    pub name: String,
    pub theorem: f64,
    pub equation: f64,
    /// `hybrid` or `rref`
    pub strategy: String,
}

/// Merged outcome of all strategies
#[derive(Debug, Clone, Default, Serialize)]
pub struct SolverResults {
    pub solved: bool,
    pub score: u32,
    pub execution_time_ms: f64,
    pub theorems: TheoremResult,
    pub hybrid: SolverReport,
    pub rref: RrefOutcome,
    pub system: SimplifiedSystem,
    /// Best known value per caller angle id
    pub values: BTreeMap<String, f64>,
    pub disagreements: Vec<Disagreement>,
}

impl SolverResults {
    /// Value for a caller angle id
    pub fn value(&self, angle_id: &str) -> Option<f64> {
        self.values.get(angle_id).copied()
    }
}

/// Solve a diagram without touching it
pub fn solve(data: &DiagramData, options: SolveOptions<'_>) -> SolverResults {
    if !data.has_targets() {
        return SolverResults::default();
    }
    match GeometryModel::from_diagram(data) {
        Ok(model) => solve_model(&model, options),
        Err(err) => {
            warn!(%err, "cannot build geometry model");
            SolverResults::default()
        }
    }
}

/// Solve an already-built model; the model itself is left unchanged
pub fn solve_model(model: &GeometryModel, mut options: SolveOptions<'_>) -> SolverResults {
    if !model.has_targets() {
        return SolverResults::default();
    }
    let config = &options.config;
    let relations = Relations::discover(model, &config.tolerances, config.max_partitions);

    let mut working = model.clone();
    let engine = RuleEngine::new(config.clone());
    let theorems = engine.run_with_hook(&mut working, &relations, options.set_angle.as_deref_mut());

    let equations = extract(model, &relations);
    let system = simplify(model, &relations, &equations);
    let targets: Vec<String> = model
        .targets()
        .filter_map(|a| system.symbol(&a.name).map(str::to_string))
        .collect();
    let config = &options.config;
    let hybrid = HybridSolver::new(config.linear).solve(&system.equations, &targets);
    let rref = RrefSolver::new(config.linear).solve(&system.equations, &targets);

    let solved = theorems.solved || hybrid.solved || rref.report.solved;
    let score = [theorems.score, hybrid.score, rref.report.score]
        .into_iter()
        .find(|&s| s > 0)
        .unwrap_or(0);
    let execution_time_ms = theorems.execution_time_ms + hybrid.execution_time_ms + rref.report.execution_time_ms;

    let tolerance = config.tolerances.value;
    let mut values = BTreeMap::new();
    let mut disagreements = Vec::new();
    for (angle, solved_angle) in model.angles.iter().zip(&working.angles) {
        let id = model.symbols.angle_label(angle.id).unwrap_or(&angle.name).to_string();
        let symbol = system.symbol(&angle.name);
        let from_hybrid = symbol.and_then(|s| hybrid.solution.get(s).copied());
        let from_rref = symbol.and_then(|s| rref.report.solution.get(s).copied());

        if let Some(theorem) = solved_angle.value {
            for (strategy, equation) in [("hybrid", from_hybrid), ("rref", from_rref)] {
                if let Some(equation) = equation {
                    if (theorem - equation).abs() > tolerance {
                        warn!(angle = %angle.name, theorem, equation, strategy, "strategies disagree");
                        disagreements.push(Disagreement {
                            angle: id.clone(),
                            name: angle.name.clone(),
                            theorem,
                            equation,
                            strategy: strategy.to_string(),
                        });
                    }
                }
            }
        }

        if let Some(value) = solved_angle.value.or(from_hybrid).or(from_rref) {
            values.insert(id, value);
        }
    }

    info!(
        solved,
        score,
        theorems = theorems.solved,
        hybrid = hybrid.solved,
        rref = rref.report.solved,
        equations = system.equations.len(),
        "solve finished"
    );

    SolverResults {
        solved,
        score,
        execution_time_ms,
        theorems,
        hybrid,
        rref,
        system,
        values,
        disagreements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Angle;

    fn triangle() -> DiagramData {
        DiagramData::new()
            .point("A", 0.0, 0.0)
            .point("B", 4.0, 0.0)
            .point("C", 1.0, 3.0)
            .edge("A", "B")
            .edge("B", "C")
            .edge("C", "A")
            .angle(Angle::new("a", "A", "B", "C").with_value(50.0))
            .angle(Angle::new("b", "B", "A", "C").with_value(60.0))
            .angle(Angle::new("c", "C", "A", "B").as_target())
    }

    #[test]
    fn test_no_targets_short_circuits() {
        let data = DiagramData::new()
            .point("A", 0.0, 0.0)
            .point("B", 1.0, 0.0)
            .point("C", 0.0, 1.0)
            .angle(Angle::new("a", "A", "B", "C"));
        let result = solve(&data, SolveOptions::default());

        assert!(!result.solved);
        assert_eq!(result.score, 0);
        assert!(result.values.is_empty());
    }

    #[test]
    fn test_all_strategies_agree_on_triangle() {
        let result = solve(&triangle(), SolveOptions::default());

        assert!(result.solved);
        assert!(result.theorems.solved && result.hybrid.solved && result.rref.report.solved);
        assert_eq!(result.value("c"), Some(70.0));
        assert_eq!(result.score, 1);
        assert!(result.disagreements.is_empty());
    }

    #[test]
    fn test_caller_data_is_untouched() {
        let data = triangle();
        let before = data.clone();
        solve(&data, SolveOptions::default());

        assert_eq!(data, before);
    }

    #[test]
    fn test_hook_receives_assignments() {
        let mut calls = Vec::new();
        let options = SolveOptions::default().with_set_angle(|angle: &GeoAngle, _: &str, rule: &str| {
            calls.push((angle.name.clone(), rule.to_string()));
        });
        solve(&triangle(), options);

        assert_eq!(calls, vec![("∠ACB".to_string(), "triangleSum".to_string())]);
    }

    #[test]
    fn test_broken_model_is_unsolved() {
        let data = triangle().angle(Angle::new("d", "A", "Q", "B").as_target());
        let result = solve(&data, SolveOptions::default());

        assert!(!result.solved);
    }
}
