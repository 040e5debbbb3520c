//! Geometrically identical angles share a value

use super::Proposal;
use crate::geometry::Relations;
use crate::ir::GeometryModel;

pub(super) fn apply(model: &GeometryModel, relations: &Relations) -> Vec<Proposal> {
    let mut proposals = Vec::new();

    for group in &relations.same_angle_groups {
        let Some((source, value)) = group
            .iter()
            .find_map(|&a| model.value(a).map(|v| (a, v)))
        else {
            continue;
        };
        for &angle in group {
            if model.value(angle).is_none() {
                proposals.push(Proposal::new(
                    angle,
                    value,
                    format!("same angle as {}", model.angle(source).name),
                ));
            }
        }
    }

    proposals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tolerances;
    use crate::ir::{Angle, AngleId, DiagramData};

    #[test]
    fn test_collinear_side_gives_same_angle() {
        let data = DiagramData::new()
            .point("Y", 0.0, 0.0)
            .point("W", 2.0, 0.0)
            .point("V", 4.0, 0.0)
            .point("Z", 1.0, 2.0)
            .line("l", &["Y", "W", "V"])
            .angle(Angle::new("zyw", "Y", "Z", "W").with_value(63.4))
            .angle(Angle::new("zyv", "Y", "Z", "V"));
        let model = GeometryModel::from_diagram(&data).unwrap();
        let relations = Relations::discover(&model, &Tolerances::default(), 4096);

        let proposals = apply(&model, &relations);
        assert_eq!(proposals, vec![Proposal::new(AngleId(1), 63.4, "same angle as ∠ZYW")]);
    }
}
