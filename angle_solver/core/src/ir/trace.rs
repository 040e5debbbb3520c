//! Solve steps and traces
//!
//! Every value the rule engine commits is recorded as a [`SolveStep`]: which
//! rule produced it, the human-readable reason and the score weight it earned.
//! Traces serialize to JSON for export and diagnostics.

use super::symbols::AngleId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Unique identifier for a solve step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StepId(pub u32);

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step{}", self.0)
    }
}

/// Errors that can occur during trace operations
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid solve step: {0}")]
    InvalidStep(String),
}

/// Result type for trace operations
pub type TraceResult<T> = Result<T, TraceError>;

/// One committed assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveStep {
    pub id: StepId,

    /// Engine iteration (0-based) in which the value was committed
    pub iteration: usize,

    pub angle: AngleId,

    /// Angle display name, `∠<side><vertex><side>`
    pub angle_name: String,

    pub value: f64,

    /// Name of the rule that proposed the value
    pub rule_id: String,

    pub reason: String,

    /// Score contribution of this step
    pub weight: u32,
}

/// Ordered record of a rule engine run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolveTrace {
    pub steps: Vec<SolveStep>,

    /// Whether every target angle ended up with a value
    pub solved: bool,

    pub metadata: HashMap<String, String>,
}

impl SolveTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next free step id
    pub fn next_id(&self) -> StepId {
        StepId(self.steps.len() as u32)
    }

    pub fn add_step(&mut self, step: SolveStep) {
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn add_metadata(&mut self, key: String, value: String) {
        self.metadata.insert(key, value);
    }

    pub fn get_metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(|s| s.as_str())
    }

    /// Sum of step weights
    pub fn total_score(&self) -> u32 {
        self.steps.iter().map(|s| s.weight).sum()
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> TraceResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> TraceResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn statistics(&self) -> TraceStatistics {
        let mut rules_used = HashMap::new();
        for step in &self.steps {
            *rules_used.entry(step.rule_id.clone()).or_insert(0) += 1;
        }

        TraceStatistics {
            num_steps: self.steps.len(),
            total_score: self.total_score(),
            iterations: self.steps.iter().map(|s| s.iteration + 1).max().unwrap_or(0),
            solved: self.solved,
            rules_used,
        }
    }

    /// Each angle may be assigned at most once per run
    pub fn validate(&self) -> TraceResult<()> {
        let mut seen = std::collections::HashSet::new();

        for step in &self.steps {
            if !seen.insert(step.angle) {
                return Err(TraceError::InvalidStep(format!(
                    "{} assigned twice ({})",
                    step.angle_name, step.id
                )));
            }
        }

        Ok(())
    }
}

/// Statistics about a solve trace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceStatistics {
    pub num_steps: usize,
    pub total_score: u32,
    /// Highest iteration that committed something, counted from 1
    pub iterations: usize,
    pub solved: bool,
    /// Count of how many times each rule was used
    pub rules_used: HashMap<String, usize>,
}

impl TraceStatistics {
    /// Get the most frequently used rule
    pub fn most_used_rule(&self) -> Option<(&str, usize)> {
        self.rules_used
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(rule, count)| (rule.as_str(), *count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(id: u32, angle: u32, rule: &str, weight: u32) -> SolveStep {
        SolveStep {
            id: StepId(id),
            iteration: 0,
            angle: AngleId(angle),
            angle_name: format!("∠X{}Y", angle),
            value: 45.0,
            rule_id: rule.to_string(),
            reason: "test".to_string(),
            weight,
        }
    }

    #[test]
    fn test_score_skips_zero_weight() {
        let mut trace = SolveTrace::new();
        trace.add_step(step(0, 0, "triangle_sum", 1));
        trace.add_step(step(1, 1, "same_angles", 0));

        assert_eq!(trace.total_score(), 1);
        assert_eq!(trace.len(), 2);
    }

    #[test]
    fn test_statistics() {
        let mut trace = SolveTrace::new();
        trace.add_step(step(0, 0, "triangle_sum", 1));
        trace.add_step(step(1, 1, "triangle_sum", 1));
        trace.add_step(step(2, 2, "mirror", 1));

        let stats = trace.statistics();
        assert_eq!(stats.num_steps, 3);
        assert_eq!(stats.iterations, 1);
        assert_eq!(stats.most_used_rule(), Some(("triangle_sum", 2)));
    }

    #[test]
    fn test_json_roundtrip_keeps_steps() {
        let mut trace = SolveTrace::new();
        trace.add_step(step(0, 3, "composed", 1));
        trace.add_metadata("iterations".to_string(), "2".to_string());

        let restored = SolveTrace::from_json(&trace.to_json().unwrap()).unwrap();
        assert_eq!(restored.steps, trace.steps);
        assert_eq!(restored.get_metadata("iterations"), Some("2"));
    }

    #[test]
    fn test_double_assignment_is_invalid() {
        let mut trace = SolveTrace::new();
        trace.add_step(step(0, 1, "mirror", 1));
        trace.add_step(step(1, 1, "mirror", 1));

        assert!(matches!(trace.validate(), Err(TraceError::InvalidStep(_))));
    }
}
