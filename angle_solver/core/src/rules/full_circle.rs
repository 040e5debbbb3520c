//! Angles around a point sum to 360

use super::{solve_split, solve_sum, Proposal};
use crate::geometry::Relations;
use crate::ir::GeometryModel;

pub(super) fn apply(model: &GeometryModel, relations: &Relations) -> Vec<Proposal> {
    let mut proposals = Vec::new();

    for path in &relations.full_circles {
        proposals.extend(solve_sum(model, &path.pieces, 360.0, "full circle"));
    }
    for split in &relations.circle_splits {
        proposals.extend(solve_split(model, split, "full circle"));
    }

    proposals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tolerances;
    use crate::ir::{Angle, AngleId, DiagramData};

    #[test]
    fn test_three_rays_around_point() {
        // Rays at 0, 100 and 220 degrees
        let ray = |deg: f64| (deg.to_radians().cos(), deg.to_radians().sin());
        let (bx, by) = ray(100.0);
        let (cx, cy) = ray(220.0);
        let data = DiagramData::new()
            .point("O", 0.0, 0.0)
            .point("A", 1.0, 0.0)
            .point("B", bx, by)
            .point("C", cx, cy)
            .angle(Angle::new("aob", "O", "A", "B").with_value(100.0))
            .angle(Angle::new("boc", "O", "B", "C").with_value(120.0))
            .angle(Angle::new("coa", "O", "C", "A"));
        let model = GeometryModel::from_diagram(&data).unwrap();
        let relations = Relations::discover(&model, &Tolerances::default(), 4096);

        let proposals = apply(&model, &relations);
        assert_eq!(proposals.len(), 1);
        assert_eq!(proposals[0].angle, AngleId(2));
        assert!((proposals[0].value - 140.0).abs() < 1e-9);
    }
}
