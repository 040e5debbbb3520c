//! Ray and angle identity
//!
//! Two side points describe the same ray when they coincide or when a
//! declared line holds both on the same side of the vertex. Everything that
//! asks "is this the same angle?" reduces to that test.

use crate::ir::{AngleId, GeoAngle, GeoLine, GeometryModel, PointId};

/// Relationship between two angles sharing a vertex and one side point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnglePairing {
    /// Non-shared sides on the same side of the vertex: one angle duplicates the other
    Overlapping,
    /// Non-shared sides on opposite sides of the vertex: supplementary candidates
    LinearPair,
}

/// True if `a` and `b` lie on the same ray from `vertex`
pub fn is_same_ray(a: PointId, b: PointId, vertex: PointId, lines: &[GeoLine]) -> bool {
    if a == b {
        return true;
    }
    lines.iter().any(|line| {
        match (line.position(vertex), line.position(a), line.position(b)) {
            (Some(v), Some(i), Some(j)) => (i < v && j < v) || (i > v && j > v),
            _ => false,
        }
    })
}

/// True if `a` and `b` lie on opposite rays from `vertex` along a line
pub fn is_opposite_ray(a: PointId, b: PointId, vertex: PointId, lines: &[GeoLine]) -> bool {
    lines.iter().any(|line| {
        match (line.position(vertex), line.position(a), line.position(b)) {
            (Some(v), Some(i), Some(j)) => (i < v && j > v) || (i > v && j < v),
            _ => false,
        }
    })
}

/// Same vertex, and both rays match in the same or swapped order
pub fn are_same_angle(a1: &GeoAngle, a2: &GeoAngle, lines: &[GeoLine]) -> bool {
    if a1.vertex != a2.vertex {
        return false;
    }
    let v = a1.vertex;
    let [p, q] = a1.sides;
    let [r, s] = a2.sides;

    (is_same_ray(p, r, v, lines) && is_same_ray(q, s, v, lines))
        || (is_same_ray(p, s, v, lines) && is_same_ray(q, r, v, lines))
}

/// Classify two angles that share exactly one side point
pub fn classify_pair(a1: &GeoAngle, a2: &GeoAngle, lines: &[GeoLine]) -> Option<AnglePairing> {
    if a1.vertex != a2.vertex || a1.id == a2.id {
        return None;
    }
    let shared: Vec<PointId> = a1
        .sides
        .iter()
        .copied()
        .filter(|p| a2.sides.contains(p))
        .collect();
    if shared.len() != 1 {
        return None;
    }
    let other1 = a1.sides.iter().copied().find(|&p| p != shared[0])?;
    let other2 = a2.sides.iter().copied().find(|&p| p != shared[0])?;

    if is_same_ray(other1, other2, a1.vertex, lines) {
        Some(AnglePairing::Overlapping)
    } else if is_opposite_ray(other1, other2, a1.vertex, lines) {
        Some(AnglePairing::LinearPair)
    } else {
        None
    }
}

pub fn are_angles_overlapping(a1: &GeoAngle, a2: &GeoAngle, lines: &[GeoLine]) -> bool {
    classify_pair(a1, a2, lines) == Some(AnglePairing::Overlapping)
}

pub fn are_angles_linear_pair(a1: &GeoAngle, a2: &GeoAngle, lines: &[GeoLine]) -> bool {
    classify_pair(a1, a2, lines) == Some(AnglePairing::LinearPair)
}

/// Other angles at the same vertex that overlap `angle`
pub fn find_overlapping_angles(model: &GeometryModel, angle: AngleId) -> Vec<AngleId> {
    let target = model.angle(angle);
    model
        .angles_at(target.vertex)
        .iter()
        .copied()
        .filter(|&other| are_angles_overlapping(target, model.angle(other), &model.lines))
        .collect()
}
