//! Triangle discovery
//!
//! A triangle is found either from explicit edges between all three points,
//! or implicitly: an apex joined to two points that share a declared line.

use crate::ir::{GeometryModel, PointId};
use std::collections::BTreeSet;

/// Triangles formed by explicit edges on every side
pub fn explicit_triangles(model: &GeometryModel) -> BTreeSet<[PointId; 3]> {
    let mut found = BTreeSet::new();
    let n = model.points.len() as u32;

    for a in 0..n {
        let a = PointId(a);
        let neighbours: Vec<PointId> = model.neighbours(a).into_iter().filter(|&p| p > a).collect();
        for (i, &b) in neighbours.iter().enumerate() {
            for &c in &neighbours[i + 1..] {
                if model.has_edge(b, c) {
                    insert(model, &mut found, [a, b, c]);
                }
            }
        }
    }

    found
}

/// Triangles whose base lies on a declared line
///
/// The apex reaches each base point through an edge or a line of its own.
pub fn implicit_triangles(model: &GeometryModel) -> BTreeSet<[PointId; 3]> {
    let mut found = BTreeSet::new();

    for line in &model.lines {
        for (i, &q) in line.points.iter().enumerate() {
            for &r in &line.points[i + 1..] {
                for apex in 0..model.points.len() as u32 {
                    let apex = PointId(apex);
                    if line.contains(apex) {
                        continue;
                    }
                    if is_connected(model, apex, q) && is_connected(model, apex, r) {
                        insert(model, &mut found, [apex, q, r]);
                    }
                }
            }
        }
    }

    found
}

/// Union of explicit and implicit triangles, sorted and deduplicated
pub fn discover_triangles(model: &GeometryModel) -> Vec<[PointId; 3]> {
    let mut all = explicit_triangles(model);
    all.extend(implicit_triangles(model));
    all.into_iter().collect()
}

fn is_connected(model: &GeometryModel, a: PointId, b: PointId) -> bool {
    model.has_edge(a, b) || model.share_line(a, b)
}

fn insert(model: &GeometryModel, found: &mut BTreeSet<[PointId; 3]>, mut triple: [PointId; 3]) {
    triple.sort();
    if !model.is_degenerate(triple) {
        found.insert(triple);
    }
}
