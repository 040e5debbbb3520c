//! Theorem rules for angle deduction
//!
//! Each rule reads the model and the relation index and proposes values for
//! unsolved angles. Rules never write: the [`RuleEngine`] commits proposals
//! one by one through the [`Validator`], in the fixed order of [`all_rules`],
//! so a later rule in the same pass sees every earlier write.

pub mod engine;
pub mod validator;

mod composed;
mod full_circle;
mod mirror;
mod same_angles;
mod same_label;
mod supplementary;
mod triangle;

pub use engine::{AssignHook, RuleEngine, TheoremResult};
pub use validator::{Validator, Violation};

use crate::equations::numeric::format_number;
use crate::geometry::{PathSplit, Relations};
use crate::ir::{AngleId, GeometryModel};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A value a rule wants to assign
#[derive(Debug, Clone, PartialEq)]
pub struct Proposal {
    pub angle: AngleId,
    pub value: f64,
    pub reason: String,
}

impl Proposal {
    pub fn new(angle: AngleId, value: f64, reason: impl Into<String>) -> Self {
        Self { angle, value, reason: reason.into() }
    }
}

/// Deduction rules, in application order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rule {
    SameLabel,
    SameAngles,
    Supplementary,
    FullCircle,
    TriangleSum,
    Composed,
    Mirror,
}

impl Rule {
    /// Unique identifier for this rule
    pub fn id(&self) -> &'static str {
        match self {
            Rule::SameLabel => "sameLabel",
            Rule::SameAngles => "sameAngles",
            Rule::Supplementary => "supplementary",
            Rule::FullCircle => "fullCircle",
            Rule::TriangleSum => "triangleSum",
            Rule::Composed => "composed",
            Rule::Mirror => "mirror",
        }
    }

    /// Score earned by each committed assignment
    pub fn weight(&self) -> u32 {
        match self {
            Rule::SameAngles => 0,
            _ => 1,
        }
    }

    /// Proposals for currently unsolved angles
    pub fn apply(&self, model: &GeometryModel, relations: &Relations) -> Vec<Proposal> {
        match self {
            Rule::SameLabel => same_label::apply(model, relations),
            Rule::SameAngles => same_angles::apply(model, relations),
            Rule::Supplementary => supplementary::apply(model, relations),
            Rule::FullCircle => full_circle::apply(model, relations),
            Rule::TriangleSum => triangle::apply(model, relations),
            Rule::Composed => composed::apply(model, relations),
            Rule::Mirror => mirror::apply(model, relations),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Get all deduction rules in application order
pub fn all_rules() -> Vec<Rule> {
    vec![
        Rule::SameLabel,
        Rule::SameAngles,
        Rule::Supplementary,
        Rule::FullCircle,
        Rule::TriangleSum,
        Rule::Composed,
        Rule::Mirror,
    ]
}

/// Solve consecutive pieces that add up to `total`
///
/// One unknown takes the residual; several unknowns sharing one label split
/// it equally.
pub(crate) fn solve_sum(model: &GeometryModel, pieces: &[AngleId], total: f64, what: &str) -> Vec<Proposal> {
    let mut known = 0.0;
    let mut unknown = Vec::new();
    for &piece in pieces {
        match model.value(piece) {
            Some(v) => known += v,
            None => unknown.push(piece),
        }
    }
    let residual = total - known;

    match unknown.as_slice() {
        [] => Vec::new(),
        [single] => vec![Proposal::new(
            *single,
            residual,
            format!("{} sums to {}: {} - {}", what, format_number(total), format_number(total), format_number(known)),
        )],
        [first, rest @ ..] => {
            let label = &model.angle(*first).label;
            if label.is_none() || rest.iter().any(|&a| model.angle(a).label != *label) {
                return Vec::new();
            }
            let share = residual / unknown.len() as f64;
            unknown
                .iter()
                .map(|&a| {
                    Proposal::new(
                        a,
                        share,
                        format!(
                            "{} sums to {}, {} equal parts labelled {}",
                            what,
                            format_number(total),
                            unknown.len(),
                            label.as_deref().unwrap_or_default()
                        ),
                    )
                })
                .collect()
        }
    }
}

/// Spanning angle or a single complement piece from a solved split
pub(crate) fn solve_split(model: &GeometryModel, split: &PathSplit, what: &str) -> Vec<Proposal> {
    let mut known = 0.0;
    let mut unknown = Vec::new();
    for &piece in &split.complement {
        match model.value(piece) {
            Some(v) => known += v,
            None => unknown.push(piece),
        }
    }

    match (model.value(split.spanning), unknown.as_slice()) {
        (None, []) => vec![Proposal::new(
            split.spanning,
            split.total - known,
            format!(
                "{} sums to {} with the rest known",
                what,
                format_number(split.total)
            ),
        )],
        (Some(spanning), [single]) => vec![Proposal::new(
            *single,
            split.total - spanning - known,
            format!(
                "{} sums to {} with {} spanning {} angles",
                what,
                format_number(split.total),
                model.angle(split.spanning).name,
                split.inner.len()
            ),
        )],
        _ => Vec::new(),
    }
}
