//! Angles along a straight line sum to 180

use super::{solve_split, solve_sum, Proposal};
use crate::geometry::Relations;
use crate::ir::GeometryModel;

pub(super) fn apply(model: &GeometryModel, relations: &Relations) -> Vec<Proposal> {
    let mut proposals = Vec::new();

    for path in &relations.straight_paths {
        proposals.extend(solve_sum(model, &path.pieces, 180.0, "straight line"));
    }
    for split in &relations.straight_splits {
        proposals.extend(solve_split(model, split, "straight line"));
    }
    for pair in relations.extra_linear_pairs() {
        proposals.extend(solve_sum(model, &pair, 180.0, "linear pair"));
    }

    proposals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tolerances;
    use crate::ir::{Angle, AngleId, DiagramData};

    fn setup(data: &DiagramData) -> Vec<Proposal> {
        setup_capped(data, 4096)
    }

    fn setup_capped(data: &DiagramData, max_partitions: usize) -> Vec<Proposal> {
        let model = GeometryModel::from_diagram(data).unwrap();
        let relations = Relations::discover(&model, &Tolerances::default(), max_partitions);
        apply(&model, &relations)
    }

    fn line_with_ray() -> DiagramData {
        let t = 70f64.to_radians();
        DiagramData::new()
            .point("X", -2.0, 0.0)
            .point("Y", 0.0, 0.0)
            .point("W", 2.0, 0.0)
            .point("Z", -t.cos(), t.sin())
            .line("l", &["X", "Y", "W"])
            .angle(Angle::new("xyz", "Y", "X", "Z").with_value(70.0))
            .angle(Angle::new("zyw", "Y", "Z", "W"))
    }

    #[test]
    fn test_linear_pair() {
        let proposals = setup(&line_with_ray());
        assert_eq!(proposals.len(), 1);
        assert_eq!(proposals[0].angle, AngleId(1));
        assert!((proposals[0].value - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_pair_without_enumerated_paths() {
        let proposals = setup_capped(&line_with_ray(), 0);
        assert_eq!(proposals.len(), 1);
        assert_eq!(proposals[0].angle, AngleId(1));
        assert!(proposals[0].reason.starts_with("linear pair"));
        assert!((proposals[0].value - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_spanning_angle_from_split() {
        let data = DiagramData::new()
            .point("X", -2.0, 0.0)
            .point("Y", 0.0, 0.0)
            .point("W", 2.0, 0.0)
            .point("Z", -1.0, 1.0)
            .point("U", 1.0, 1.0)
            .line("l", &["X", "Y", "W"])
            .angle(Angle::new("xyz", "Y", "X", "Z"))
            .angle(Angle::new("zyu", "Y", "Z", "U"))
            .angle(Angle::new("uyw", "Y", "U", "W").with_value(45.0))
            .angle(Angle::new("xyu", "Y", "X", "U"));

        let proposals = setup(&data);
        assert!(proposals
            .iter()
            .any(|p| p.angle == AngleId(3) && (p.value - 135.0).abs() < 1e-9));
    }
}
