//! Fixed-point rule engine
//!
//! Runs every rule in order, pass after pass, until a pass commits nothing,
//! all targets are solved with consistent triangles, or the iteration cap is
//! reached. A commit is final: there is no rollback.

use super::{all_rules, Rule, Validator};
use crate::config::SolverConfig;
use crate::equations::numeric::{clean, format_number};
use crate::geometry::Relations;
use crate::ir::{GeoAngle, GeometryModel, SolveStep, SolveTrace};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, warn};

/// Callback invoked after every committed assignment: angle, reason, rule id
pub type AssignHook<'a> = dyn FnMut(&GeoAngle, &str, &str) + 'a;

/// Outcome of one engine run
#[derive(Debug, Clone, Default, Serialize)]
pub struct TheoremResult {
    /// Every target angle has a value
    pub solved: bool,

    /// At least one value was committed
    pub changes_made: bool,

    /// Passes executed
    pub iterations: usize,

    /// Sum of rule weights over committed assignments
    pub score: u32,

    pub execution_time_ms: f64,

    pub trace: SolveTrace,
}

pub struct RuleEngine {
    config: SolverConfig,
    rules: Vec<Rule>,
}

impl RuleEngine {
    pub fn new(config: SolverConfig) -> Self {
        Self { config, rules: all_rules() }
    }

    /// Restrict the engine to a subset of rules, kept in the given order
    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = rules;
        self
    }

    pub fn run(&self, model: &mut GeometryModel, relations: &Relations) -> TheoremResult {
        self.run_with_hook(model, relations, None)
    }

    pub fn run_with_hook(
        &self,
        model: &mut GeometryModel,
        relations: &Relations,
        mut on_assign: Option<&mut AssignHook<'_>>,
    ) -> TheoremResult {
        let start = Instant::now();
        let tolerance = self.config.tolerances.value;
        let mut trace = SolveTrace::new();
        let mut changes_made = false;
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.config.max_iterations {
            let iteration = iterations;
            iterations += 1;
            let mut changed = false;

            for rule in &self.rules {
                for proposal in rule.apply(model, relations) {
                    if model.value(proposal.angle).is_some() {
                        continue;
                    }
                    let value = clean(proposal.value, &self.config.linear);
                    let verdict = Validator::new(model, relations, tolerance).validate(proposal.angle, value);
                    if let Err(violation) = verdict {
                        debug!(
                            rule = rule.id(),
                            angle = %model.angle(proposal.angle).name,
                            value,
                            %violation,
                            "proposal rejected"
                        );
                        continue;
                    }

                    let angle = model.angle_mut(proposal.angle);
                    angle.value = Some(value);
                    debug!(
                        rule = rule.id(),
                        angle = %angle.name,
                        value = %format_number(value),
                        reason = %proposal.reason,
                        "assigned"
                    );
                    trace.add_step(SolveStep {
                        id: trace.next_id(),
                        iteration,
                        angle: proposal.angle,
                        angle_name: angle.name.clone(),
                        value,
                        rule_id: rule.id().to_string(),
                        reason: proposal.reason.clone(),
                        weight: rule.weight(),
                    });
                    if let Some(hook) = on_assign.as_deref_mut() {
                        hook(angle, &proposal.reason, rule.id());
                    }
                    changed = true;
                }
            }

            changes_made |= changed;
            if !changed || (model.all_targets_solved() && triangles_consistent(model, relations, tolerance)) {
                converged = true;
                break;
            }
        }

        if !converged {
            warn!(
                max_iterations = self.config.max_iterations,
                assigned = trace.len(),
                "rule engine stopped at iteration cap"
            );
        }

        trace.solved = model.all_targets_solved();
        trace.add_metadata("iterations".to_string(), iterations.to_string());

        TheoremResult {
            solved: trace.solved,
            changes_made,
            iterations,
            score: trace.total_score(),
            execution_time_ms: start.elapsed().as_secs_f64() * 1000.0,
            trace,
        }
    }
}

/// Every triangle with all three values known sums to 180
pub fn triangles_consistent(model: &GeometryModel, relations: &Relations, tolerance: f64) -> bool {
    relations.triangles.iter().all(|triangle| {
        let Some(angles) = triangle.all_angles() else {
            return true;
        };
        let values: Option<Vec<f64>> = angles.iter().map(|&a| model.value(a)).collect();
        values.map_or(true, |v| (v.iter().sum::<f64>() - 180.0).abs() <= tolerance)
    })
}
