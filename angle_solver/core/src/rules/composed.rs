//! A composed angle equals the sum of its consecutive parts

use super::Proposal;
use crate::equations::numeric::format_number;
use crate::geometry::Relations;
use crate::ir::GeometryModel;

pub(super) fn apply(model: &GeometryModel, relations: &Relations) -> Vec<Proposal> {
    let mut proposals = Vec::new();

    for composition in &relations.compositions {
        let parent = model.angle(composition.parent);
        let mut known = 0.0;
        let mut unknown = Vec::new();
        for &child in &composition.children {
            match model.value(child) {
                Some(v) => known += v,
                None => unknown.push(child),
            }
        }

        match (parent.value, unknown.as_slice()) {
            (None, []) => proposals.push(Proposal::new(
                parent.id,
                known,
                format!("sum of {} parts", composition.children.len()),
            )),
            (Some(total), [single]) => proposals.push(Proposal::new(
                *single,
                total - known,
                format!("part of {}: {} - {}", parent.name, format_number(total), format_number(known)),
            )),
            (Some(total), [first, rest @ ..]) => {
                let label = &model.angle(*first).label;
                if label.is_none() || rest.iter().any(|&a| model.angle(a).label != *label) {
                    continue;
                }
                let share = (total - known) / unknown.len() as f64;
                for &child in &unknown {
                    proposals.push(Proposal::new(
                        child,
                        share,
                        format!("equal parts of {} labelled {}", parent.name, label.as_deref().unwrap_or_default()),
                    ));
                }
            }
            _ => {}
        }
    }

    proposals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tolerances;
    use crate::ir::{Angle, AngleId, DiagramData};

    fn fan(aoc: Angle, aob: Angle, boc: Angle) -> Vec<Proposal> {
        let t = 40f64.to_radians();
        let data = DiagramData::new()
            .point("O", 0.0, 0.0)
            .point("A", 1.0, 0.0)
            .point("B", t.cos(), t.sin())
            .point("C", 0.0, 1.0)
            .angle(aoc)
            .angle(aob)
            .angle(boc);
        let model = GeometryModel::from_diagram(&data).unwrap();
        let relations = Relations::discover(&model, &Tolerances::default(), 4096);
        apply(&model, &relations)
    }

    #[test]
    fn test_child_by_subtraction() {
        let out = fan(
            Angle::new("aoc", "O", "A", "C").with_value(90.0),
            Angle::new("aob", "O", "A", "B").with_value(40.0),
            Angle::new("boc", "O", "B", "C"),
        );

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].angle, AngleId(2));
        assert_eq!(out[0].value, 50.0);
    }

    #[test]
    fn test_parent_by_sum() {
        let out = fan(
            Angle::new("aoc", "O", "A", "C"),
            Angle::new("aob", "O", "A", "B").with_value(40.0),
            Angle::new("boc", "O", "B", "C").with_value(50.0),
        );

        assert_eq!(out, vec![Proposal::new(AngleId(0), 90.0, "sum of 2 parts")]);
    }

    #[test]
    fn test_labelled_children_split() {
        let out = fan(
            Angle::new("aoc", "O", "A", "C").with_value(90.0),
            Angle::new("aob", "O", "A", "B").with_label("φ"),
            Angle::new("boc", "O", "B", "C").with_label("φ"),
        );

        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|p| p.value == 45.0));
    }
}
