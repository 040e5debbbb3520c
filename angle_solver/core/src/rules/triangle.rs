//! Triangle angle sum, equilateral and isosceles triangles

use super::Proposal;
use crate::equations::numeric::format_number;
use crate::geometry::{Relations, TriangleAngles};
use crate::ir::{AngleId, GeometryModel};

pub(super) fn apply(model: &GeometryModel, relations: &Relations) -> Vec<Proposal> {
    let mut proposals = Vec::new();

    for triangle in &relations.triangles {
        let Some(angles) = triangle.all_angles() else {
            continue;
        };
        let name: String = triangle.points.iter().map(|&p| model.point_name(p)).collect();
        let values = angles.map(|a| model.value(a));
        let unknown = values.iter().filter(|v| v.is_none()).count();
        if unknown == 0 {
            continue;
        }

        if unknown == 1 {
            let known: f64 = values.iter().flatten().sum();
            if let Some(k) = values.iter().position(Option::is_none) {
                proposals.push(Proposal::new(
                    angles[k],
                    180.0 - known,
                    format!("triangle {} sums to 180: 180 - {}", name, format_number(known)),
                ));
            }
            continue;
        }

        if is_equilateral(model, triangle, &angles) {
            for (k, value) in values.iter().enumerate() {
                if value.is_none() {
                    proposals.push(Proposal::new(angles[k], 60.0, format!("triangle {} is equilateral", name)));
                }
            }
            continue;
        }

        if let Some(proposal) = labelled_isosceles(model, &angles, &values, &name) {
            proposals.extend(proposal);
            continue;
        }

        if let Some(apex) = triangle.circle_apex {
            proposals.extend(circle_isosceles(&angles, &values, apex, &name));
        }
    }

    proposals
}

fn is_equilateral(model: &GeometryModel, triangle: &TriangleAngles, angles: &[AngleId; 3]) -> bool {
    if triangle.circle_equilateral {
        return true;
    }
    let label = &model.angle(angles[0]).label;
    label.is_some() && angles[1..].iter().all(|&a| model.angle(a).label == *label)
}

/// Two angles sharing a label with the third known
fn labelled_isosceles(
    model: &GeometryModel,
    angles: &[AngleId; 3],
    values: &[Option<f64>; 3],
    name: &str,
) -> Option<Vec<Proposal>> {
    for k in 0..3 {
        let (i, j) = ((k + 1) % 3, (k + 2) % 3);
        let label = &model.angle(angles[i]).label;
        if label.is_none() || model.angle(angles[j]).label != *label {
            continue;
        }
        let (Some(third), None, None) = (values[k], values[i], values[j]) else {
            continue;
        };
        let base = (180.0 - third) / 2.0;
        let reason = format!(
            "isosceles triangle {} (label {}): (180 - {}) / 2",
            name,
            label.as_deref().unwrap_or_default(),
            format_number(third)
        );
        return Some(vec![
            Proposal::new(angles[i], base, reason.clone()),
            Proposal::new(angles[j], base, reason),
        ]);
    }
    None
}

/// Circle centred on the apex through both base vertices
fn circle_isosceles(angles: &[AngleId; 3], values: &[Option<f64>; 3], apex: usize, name: &str) -> Vec<Proposal> {
    let (b1, b2) = ((apex + 1) % 3, (apex + 2) % 3);
    let reason = format!("isosceles triangle {} (circle radius)", name);

    match (values[apex], values[b1], values[b2]) {
        (Some(top), None, None) => {
            let base = (180.0 - top) / 2.0;
            vec![
                Proposal::new(angles[b1], base, reason.clone()),
                Proposal::new(angles[b2], base, reason),
            ]
        }
        (None, Some(base), None) | (None, None, Some(base)) => {
            let other = if values[b1].is_none() { b1 } else { b2 };
            vec![
                Proposal::new(angles[other], base, reason.clone()),
                Proposal::new(angles[apex], 180.0 - 2.0 * base, reason),
            ]
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tolerances;
    use crate::ir::{Angle, DiagramData};

    fn triangle(a: Angle, b: Angle, c: Angle) -> DiagramData {
        DiagramData::new()
            .point("A", 0.0, 3.0)
            .point("B", -2.0, 0.0)
            .point("C", 2.0, 0.0)
            .edge("A", "B")
            .edge("B", "C")
            .edge("C", "A")
            .angle(a)
            .angle(b)
            .angle(c)
    }

    fn proposals(data: &DiagramData) -> Vec<Proposal> {
        let model = GeometryModel::from_diagram(data).unwrap();
        let relations = Relations::discover(&model, &Tolerances::default(), 4096);
        apply(&model, &relations)
    }

    #[test]
    fn test_third_angle() {
        let data = triangle(
            Angle::new("a", "A", "B", "C").with_value(50.0),
            Angle::new("b", "B", "A", "C").with_value(60.0),
            Angle::new("c", "C", "A", "B"),
        );

        let out = proposals(&data);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].angle, AngleId(2));
        assert_eq!(out[0].value, 70.0);
    }

    #[test]
    fn test_equilateral_by_labels() {
        let data = triangle(
            Angle::new("a", "A", "B", "C").with_label("x"),
            Angle::new("b", "B", "A", "C").with_label("x"),
            Angle::new("c", "C", "A", "B").with_label("x"),
        );

        let out = proposals(&data);
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|p| p.value == 60.0));
    }

    #[test]
    fn test_isosceles_by_labels() {
        let data = triangle(
            Angle::new("a", "A", "B", "C").with_value(40.0),
            Angle::new("b", "B", "A", "C").with_label("β"),
            Angle::new("c", "C", "A", "B").with_label("β"),
        );

        let out = proposals(&data);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|p| p.value == 70.0));
    }

    #[test]
    fn test_isosceles_by_circle() {
        let data = triangle(
            Angle::new("a", "A", "B", "C"),
            Angle::new("b", "B", "A", "C").with_value(56.0),
            Angle::new("c", "C", "A", "B"),
        )
        .circle("A", 13f64.sqrt(), &["B", "C"]);

        let out = proposals(&data);
        assert_eq!(out.len(), 2);
        assert!(out.contains(&Proposal::new(AngleId(2), 56.0, "isosceles triangle ABC (circle radius)")));
        assert!(out.contains(&Proposal::new(AngleId(0), 68.0, "isosceles triangle ABC (circle radius)")));
    }
}
