//! Equation simplification
//!
//! Angles known to be equal (same angle, shared label, vertical angles) are
//! merged into one class and every class gets a short symbol: `a`..`z`,
//! then `a0`..`z0`, `a1`..`z1` and so on. Equations are rewritten term by
//! term through the class table, like terms are combined, trivial equations
//! dropped and the rest brought to a canonical sign.

use super::extract::{Equation, Term};
use super::parser::LinearEquation;
use crate::geometry::{DisjointSet, MirrorCross, Relations};
use crate::ir::GeometryModel;
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimplifiedSystem {
    pub equations: Vec<String>,
    /// Angle names and labels to class symbols
    pub name_to_symbol: BTreeMap<String, String>,
    pub symbol_to_names: BTreeMap<String, Vec<String>>,
}

impl SimplifiedSystem {
    pub fn symbol(&self, name: &str) -> Option<&str> {
        self.name_to_symbol.get(name).map(String::as_str)
    }
}

/// Symbol for the `index`-th class
pub fn symbol_name(index: usize) -> String {
    let letter = (b'a' + (index % 26) as u8) as char;
    match index / 26 {
        0 => letter.to_string(),
        round => format!("{}{}", letter, round - 1),
    }
}

struct Classes {
    /// Symbol per angle id
    angle_symbols: Vec<String>,
    label_symbols: BTreeMap<String, String>,
}

fn classes(model: &GeometryModel, relations: &Relations) -> Classes {
    let angle_count = model.angles.len();
    let labels: Vec<&String> = relations.label_groups.keys().collect();
    let mut set = DisjointSet::new(angle_count + labels.len());

    for group in &relations.same_angle_groups {
        for pair in group.windows(2) {
            set.union(pair[0].index(), pair[1].index());
        }
    }
    for (offset, label) in labels.iter().enumerate() {
        for angle in &relations.label_groups[label.as_str()] {
            set.union(angle.index(), angle_count + offset);
        }
    }
    for cross in &relations.mirrors {
        for (i, j) in MirrorCross::VERTICAL_PAIRS {
            if let (Some(a), Some(b)) = (cross.regions[i], cross.regions[j]) {
                set.union(a.index(), b.index());
            }
        }
    }

    let mut by_root: BTreeMap<usize, String> = BTreeMap::new();
    let mut symbol_of = |set: &mut DisjointSet, element: usize| {
        let root = set.find(element);
        let next = by_root.len();
        by_root.entry(root).or_insert_with(|| symbol_name(next)).clone()
    };

    let angle_symbols = (0..angle_count).map(|i| symbol_of(&mut set, i)).collect();
    let label_symbols = labels
        .iter()
        .enumerate()
        .map(|(offset, label)| ((*label).clone(), symbol_of(&mut set, angle_count + offset)))
        .collect();

    Classes { angle_symbols, label_symbols }
}

pub fn simplify(model: &GeometryModel, relations: &Relations, equations: &[Equation]) -> SimplifiedSystem {
    let classes = classes(model, relations);

    let mut name_to_symbol = BTreeMap::new();
    let mut symbol_to_names: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut record = |name: &str, symbol: &str| {
        name_to_symbol.insert(name.to_string(), symbol.to_string());
        let names = symbol_to_names.entry(symbol.to_string()).or_default();
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    };
    for (angle, symbol) in model.angles.iter().zip(&classes.angle_symbols) {
        record(&angle.name, symbol);
    }
    for (label, symbol) in &classes.label_symbols {
        record(label, symbol);
    }

    let mut seen = FxHashSet::default();
    let mut rewritten = Vec::new();
    for equation in equations {
        let Some(linear) = rewrite(equation, &classes) else {
            continue;
        };
        let text = linear.to_string();
        if seen.insert(text.clone()) {
            rewritten.push(text);
        }
    }

    SimplifiedSystem { equations: rewritten, name_to_symbol, symbol_to_names }
}

/// Symbolic form with canonical sign, or `None` if nothing is left
fn rewrite(equation: &Equation, classes: &Classes) -> Option<LinearEquation> {
    let mut linear = LinearEquation::default();
    for (terms, sign) in [(&equation.lhs, 1.0), (&equation.rhs, -1.0)] {
        for term in terms {
            match term {
                Term::Angle(id) => linear.add_term(classes.angle_symbols[id.index()].clone(), sign),
                Term::Label(label) => linear.add_term(classes.label_symbols.get(label)?.clone(), sign),
                Term::Constant(value) => linear.constant -= sign * value,
            }
        }
    }
    if linear.is_trivial() {
        return None;
    }
    if linear.coefficients.values().next().is_some_and(|c| *c < 0.0) {
        for coefficient in linear.coefficients.values_mut() {
            *coefficient = -*coefficient;
        }
        linear.constant = -linear.constant;
    }
    Some(linear)
}

#[cfg(test)]
mod tests {
    use super::super::extract::extract;
    use super::*;
    use crate::config::Tolerances;
    use crate::ir::{Angle, DiagramData};

    #[test]
    fn test_symbol_names() {
        assert_eq!(symbol_name(0), "a");
        assert_eq!(symbol_name(25), "z");
        assert_eq!(symbol_name(26), "a0");
        assert_eq!(symbol_name(53), "b1");
    }

    fn mirror_system() -> SimplifiedSystem {
        let t = 35f64.to_radians();
        let data = DiagramData::new()
            .point("O", 0.0, 0.0)
            .point("A", 2.0, 0.0)
            .point("B", -2.0, 0.0)
            .point("C", 2.0 * t.cos(), 2.0 * t.sin())
            .point("D", -2.0 * t.cos(), -2.0 * t.sin())
            .line("ab", &["A", "O", "B"])
            .line("cd", &["C", "O", "D"])
            .angle(Angle::new("aoc", "O", "A", "C").with_value(35.0))
            .angle(Angle::new("cob", "O", "C", "B"))
            .angle(Angle::new("bod", "O", "B", "D"))
            .angle(Angle::new("doa", "O", "D", "A"));
        let model = GeometryModel::from_diagram(&data).unwrap();
        let relations = Relations::discover(&model, &Tolerances::default(), 4096);
        let equations = extract(&model, &relations);
        simplify(&model, &relations, &equations)
    }

    #[test]
    fn test_vertical_angles_share_a_symbol() {
        let system = mirror_system();

        assert_eq!(system.symbol("∠AOC"), Some("a"));
        assert_eq!(system.symbol("∠BOD"), Some("a"));
        assert_eq!(system.symbol("∠COB"), Some("b"));
        assert_eq!(system.symbol_to_names["b"], vec!["∠COB", "∠DOA"]);
    }

    #[test]
    fn test_rewritten_equations_combine_and_dedupe() {
        let system = mirror_system();

        assert_eq!(system.equations, vec!["a+b=180", "2a+2b=360", "a=35"]);
    }
}
