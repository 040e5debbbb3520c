//! Equation extraction
//!
//! Walks the relation index and the given values and writes every
//! relationship as a linear equation over angle names. Relationships come
//! already gated, so extraction only decides how to phrase them.

use super::numeric::format_number;
use crate::geometry::{MirrorCross, PathSplit, Relations};
use crate::ir::{AngleId, GeometryModel};
use rustc_hash::FxHashSet;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Angle(AngleId),
    Label(String),
    Constant(f64),
}

/// Relationship an equation was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    TriangleSum,
    StraightLine,
    Composition,
    SameAngle,
    SameLabel,
    Isosceles,
    Mirror,
    FullCircle,
    KnownValue,
    LabelValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
    pub lhs: Vec<Term>,
    pub rhs: Vec<Term>,
    pub category: Category,
}

impl Equation {
    pub fn new(lhs: Vec<Term>, rhs: Vec<Term>, category: Category) -> Self {
        Self { lhs, rhs, category }
    }

    /// `lhs=rhs` with angle tokens `∠<side><vertex><side>`
    pub fn render(&self, model: &GeometryModel) -> String {
        format!("{}={}", render_side(model, &self.lhs), render_side(model, &self.rhs))
    }
}

fn render_side(model: &GeometryModel, terms: &[Term]) -> String {
    let mut out = String::new();
    for (i, term) in terms.iter().enumerate() {
        let token = match term {
            Term::Angle(id) => model.angle(*id).name.clone(),
            Term::Label(label) => label.clone(),
            Term::Constant(value) => format_number(*value),
        };
        if i > 0 && !token.starts_with('-') {
            out.push('+');
        }
        out.push_str(&token);
    }
    if terms.is_empty() {
        out.push('0');
    }
    out
}

fn angles(ids: &[AngleId]) -> Vec<Term> {
    ids.iter().map(|&a| Term::Angle(a)).collect()
}

fn constant(value: f64) -> Vec<Term> {
    vec![Term::Constant(value)]
}

/// Every equation the diagram supports, deduplicated by rendered form
pub fn extract(model: &GeometryModel, relations: &Relations) -> Vec<Equation> {
    let mut out = Vec::new();

    triangle_sums(relations, &mut out);
    for path in &relations.straight_paths {
        out.push(Equation::new(angles(&path.pieces), constant(180.0), Category::StraightLine));
    }
    split_sums(&relations.straight_splits, Category::StraightLine, &mut out);
    for pair in relations.extra_linear_pairs() {
        out.push(Equation::new(angles(&pair), constant(180.0), Category::StraightLine));
    }
    compositions(model, relations, &mut out);
    for group in &relations.same_angle_groups {
        equalities(group, Category::SameAngle, &mut out);
    }
    for group in relations.label_groups.values() {
        equalities(group, Category::SameLabel, &mut out);
    }
    isosceles(model, relations, &mut out);
    mirrors(relations, &mut out);
    for path in &relations.full_circles {
        out.push(Equation::new(angles(&path.pieces), constant(360.0), Category::FullCircle));
    }
    split_sums(&relations.circle_splits, Category::FullCircle, &mut out);
    for angle in &model.angles {
        if let Some(value) = angle.value {
            out.push(Equation::new(vec![Term::Angle(angle.id)], constant(value), Category::KnownValue));
        }
    }
    label_values(model, relations, &mut out);

    let mut seen = FxHashSet::default();
    out.retain(|e| seen.insert(e.render(model)));
    out
}

fn triangle_sums(relations: &Relations, out: &mut Vec<Equation>) {
    for triangle in &relations.triangles {
        if let Some(corners) = triangle.all_angles() {
            out.push(Equation::new(angles(&corners), constant(180.0), Category::TriangleSum));
        }
    }
}

fn split_sums(splits: &[PathSplit], category: Category, out: &mut Vec<Equation>) {
    for split in splits {
        let mut lhs = vec![Term::Angle(split.spanning)];
        lhs.extend(angles(&split.complement));
        out.push(Equation::new(lhs, constant(split.total), category));
    }
}

fn compositions(model: &GeometryModel, relations: &Relations, out: &mut Vec<Equation>) {
    for composition in &relations.compositions {
        out.push(Equation::new(
            vec![Term::Angle(composition.parent)],
            angles(&composition.children),
            Category::Composition,
        ));

        let Some(total) = model.value(composition.parent) else {
            continue;
        };
        let unknown: Vec<AngleId> = composition
            .children
            .iter()
            .copied()
            .filter(|&c| model.value(c).is_none())
            .collect();
        if let [single] = unknown.as_slice() {
            let known: f64 = composition.children.iter().filter_map(|&c| model.value(c)).sum();
            out.push(Equation::new(vec![Term::Angle(*single)], constant(total - known), Category::Composition));
        }
    }
}

fn equalities(group: &[AngleId], category: Category, out: &mut Vec<Equation>) {
    if let Some((&first, rest)) = group.split_first() {
        for &other in rest {
            out.push(Equation::new(vec![Term::Angle(first)], vec![Term::Angle(other)], category));
        }
    }
}

fn isosceles(model: &GeometryModel, relations: &Relations, out: &mut Vec<Equation>) {
    for triangle in &relations.triangles {
        let Some(corners) = triangle.all_angles() else {
            continue;
        };
        let label = &model.angle(corners[0]).label;
        let labelled = label.is_some() && corners.iter().all(|&a| model.angle(a).label == *label);
        if triangle.circle_equilateral || labelled {
            for corner in corners {
                out.push(Equation::new(vec![Term::Angle(corner)], constant(60.0), Category::Isosceles));
            }
        } else if let Some(apex) = triangle.circle_apex {
            out.push(Equation::new(
                vec![Term::Angle(corners[(apex + 1) % 3])],
                vec![Term::Angle(corners[(apex + 2) % 3])],
                Category::Isosceles,
            ));
        }
    }
}

fn mirrors(relations: &Relations, out: &mut Vec<Equation>) {
    for cross in &relations.mirrors {
        for (i, j) in MirrorCross::VERTICAL_PAIRS {
            if let (Some(a), Some(b)) = (cross.regions[i], cross.regions[j]) {
                out.push(Equation::new(vec![Term::Angle(a)], vec![Term::Angle(b)], Category::Mirror));
            }
        }
        let Some(regions) = cross.all_regions() else {
            continue;
        };
        out.push(Equation::new(angles(&regions), constant(360.0), Category::Mirror));
        for (i, j) in MirrorCross::ADJACENT_PAIRS {
            out.push(Equation::new(angles(&[regions[i], regions[j]]), constant(180.0), Category::Mirror));
        }
    }
}

fn label_values(model: &GeometryModel, relations: &Relations, out: &mut Vec<Equation>) {
    for (label, group) in &relations.label_groups {
        for &angle in group {
            out.push(Equation::new(
                vec![Term::Angle(angle)],
                vec![Term::Label(label.clone())],
                Category::LabelValue,
            ));
        }
        if let Some(value) = group.iter().find_map(|&a| model.value(a)) {
            out.push(Equation::new(vec![Term::Label(label.clone())], constant(value), Category::LabelValue));
        }
    }
}
