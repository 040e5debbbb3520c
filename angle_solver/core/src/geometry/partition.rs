//! Vertex fans and interval-partition enumeration
//!
//! At each vertex the side points of all its angles are grouped into ray
//! classes and sorted by polar direction. A chain is a counter-clockwise walk
//! over those rays where every consecutive pair is spanned by an existing
//! angle. Chains between two rays decompose a composed angle or a straight
//! line; closed chains partition the full circle. Both the rule engine and
//! the equation extractor enumerate through this one type.

use crate::ir::{ops, AngleId, GeometryModel, PointId};
use super::rays::is_same_ray;
use rustc_hash::FxHashMap;

/// Points on one ray from the vertex
#[derive(Debug, Clone, PartialEq)]
pub struct RayClass {
    pub representative: PointId,
    pub members: Vec<PointId>,
    /// Polar direction in degrees, `[0, 360)`
    pub direction: f64,
}

/// Chain of rays and the angles spanning each consecutive pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chain {
    /// Ray indices into the fan, first to last (last equals first when closed)
    pub rays: Vec<usize>,
    /// One angle per consecutive ray pair
    pub pieces: Vec<AngleId>,
}

/// Rays around one vertex with the angles between them
#[derive(Debug, Clone)]
pub struct VertexFan {
    pub vertex: PointId,
    pub rays: Vec<RayClass>,
    /// Normalized ray pair -> angles spanning it, in input order
    spans: FxHashMap<(usize, usize), Vec<AngleId>>,
}

impl VertexFan {
    pub fn build(model: &GeometryModel, vertex: PointId) -> Self {
        let mut rays: Vec<RayClass> = Vec::new();

        for &angle in model.angles_at(vertex) {
            for &side in &model.angle(angle).sides {
                if let Some(ray) = rays
                    .iter_mut()
                    .find(|r| is_same_ray(r.representative, side, vertex, &model.lines))
                {
                    if !ray.members.contains(&side) {
                        ray.members.push(side);
                    }
                } else {
                    rays.push(RayClass {
                        representative: side,
                        members: vec![side],
                        direction: ops::direction(model.point(vertex), model.point(side)),
                    });
                }
            }
        }

        rays.sort_by(|a, b| a.direction.total_cmp(&b.direction));

        let mut fan = Self { vertex, rays, spans: FxHashMap::default() };
        for &angle in model.angles_at(vertex) {
            let [s1, s2] = model.angle(angle).sides;
            if let (Some(i), Some(j)) = (fan.ray_of(s1), fan.ray_of(s2)) {
                if i != j {
                    fan.spans.entry(pair(i, j)).or_default().push(angle);
                }
            }
        }
        fan
    }

    pub fn len(&self) -> usize {
        self.rays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rays.is_empty()
    }

    /// Ray class holding a side point
    pub fn ray_of(&self, point: PointId) -> Option<usize> {
        self.rays.iter().position(|r| r.members.contains(&point))
    }

    /// Ray class a point falls on, including points that are not side points
    /// but share a line ray with one
    pub fn ray_towards(&self, model: &GeometryModel, point: PointId) -> Option<usize> {
        self.ray_of(point).or_else(|| {
            self.rays
                .iter()
                .position(|r| is_same_ray(r.representative, point, self.vertex, &model.lines))
        })
    }

    /// All angles spanning rays `i` and `j`
    pub fn spanning(&self, i: usize, j: usize) -> &[AngleId] {
        self.spans.get(&pair(i, j)).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// First angle spanning rays `i` and `j`
    pub fn between(&self, i: usize, j: usize) -> Option<AngleId> {
        self.spanning(i, j).first().copied()
    }

    /// Ray pairs that have at least one spanning angle
    pub fn spanned_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs: Vec<_> = self.spans.keys().copied().collect();
        pairs.sort();
        pairs
    }

    /// Counter-clockwise chains from `start` to `end`
    ///
    /// With `start == end` the chain must go all the way round. Chains with
    /// fewer than `min_pieces` pieces are skipped; at most `limit` chains are
    /// returned.
    pub fn chains(&self, start: usize, end: usize, min_pieces: usize, limit: usize) -> Vec<Chain> {
        let n = self.rays.len();
        let mut out = Vec::new();
        if n == 0 || start >= n || end >= n {
            return out;
        }
        let end_offset = if start == end { n } else { (end + n - start) % n };
        let mut rays = vec![start];
        self.extend(start, end_offset, 0, min_pieces, limit, &mut rays, &mut out);
        out
    }

    #[allow(clippy::too_many_arguments)]
    fn extend(
        &self,
        start: usize,
        end_offset: usize,
        offset: usize,
        min_pieces: usize,
        limit: usize,
        rays: &mut Vec<usize>,
        out: &mut Vec<Chain>,
    ) {
        if out.len() >= limit {
            return;
        }
        let n = self.rays.len();
        if offset == end_offset {
            if rays.len() > min_pieces {
                let pieces = rays
                    .windows(2)
                    .filter_map(|w| self.between(w[0], w[1]))
                    .collect();
                out.push(Chain { rays: rays.clone(), pieces });
            }
            return;
        }
        let current = (start + offset) % n;
        for next_offset in offset + 1..=end_offset {
            let next = (start + next_offset) % n;
            if next == current || self.between(current, next).is_none() {
                continue;
            }
            rays.push(next);
            self.extend(start, end_offset, next_offset, min_pieces, limit, rays, out);
            rays.pop();
        }
    }
}

fn pair(i: usize, j: usize) -> (usize, usize) {
    if i <= j {
        (i, j)
    } else {
        (j, i)
    }
}

/// Sum of coordinate-derived values
pub fn calculated_sum(model: &GeometryModel, angles: &[AngleId]) -> f64 {
    angles.iter().map(|&a| model.angle(a).calculated_value).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Angle, DiagramData};

    /// Rays from O at 0, 40, 90 and 180 degrees
    fn fan_model() -> GeometryModel {
        let t = 40f64.to_radians();
        let data = DiagramData::new()
            .point("O", 0.0, 0.0)
            .point("A", 1.0, 0.0)
            .point("B", t.cos(), t.sin())
            .point("C", 0.0, 1.0)
            .point("D", -1.0, 0.0)
            .line("ad", &["A", "O", "D"])
            .angle(Angle::new("aob", "O", "A", "B"))
            .angle(Angle::new("boc", "O", "B", "C"))
            .angle(Angle::new("aoc", "O", "A", "C"))
            .angle(Angle::new("cod", "O", "C", "D"));
        GeometryModel::from_diagram(&data).unwrap()
    }

    #[test]
    fn test_rays_sorted_by_direction() {
        let model = fan_model();
        let o = model.symbols.point("O").unwrap();
        let fan = VertexFan::build(&model, o);

        let names: Vec<&str> = fan.rays.iter().map(|r| model.point_name(r.representative)).collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_composed_chain() {
        let model = fan_model();
        let o = model.symbols.point("O").unwrap();
        let fan = VertexFan::build(&model, o);

        let chains = fan.chains(0, 2, 2, 100);
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].rays, vec![0, 1, 2]);
        assert_eq!(chains[0].pieces, vec![AngleId(0), AngleId(1)]);
        assert!((calculated_sum(&model, &chains[0].pieces) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_straight_chains_include_single_piece_paths() {
        let model = fan_model();
        let o = model.symbols.point("O").unwrap();
        let fan = VertexFan::build(&model, o);

        let chains = fan.chains(0, 3, 1, 100);
        let pieces: Vec<usize> = chains.iter().map(|c| c.pieces.len()).collect();
        assert_eq!(chains.len(), 2, "A-B-C-D and A-C-D");
        assert!(pieces.contains(&3) && pieces.contains(&2));
    }

    #[test]
    fn test_limit_caps_enumeration() {
        let model = fan_model();
        let o = model.symbols.point("O").unwrap();
        let fan = VertexFan::build(&model, o);

        assert_eq!(fan.chains(0, 3, 1, 1).len(), 1);
    }

    #[test]
    fn test_ray_towards_follows_line() {
        let data = DiagramData::new()
            .point("O", 0.0, 0.0)
            .point("A", 1.0, 0.0)
            .point("A2", 2.0, 0.0)
            .point("B", 0.0, 1.0)
            .line("l", &["O", "A", "A2"])
            .angle(Angle::new("x", "O", "A", "B"));
        let model = GeometryModel::from_diagram(&data).unwrap();
        let fan = VertexFan::build(&model, model.symbols.point("O").unwrap());
        let a2 = model.symbols.point("A2").unwrap();

        assert_eq!(fan.ray_of(a2), None);
        assert_eq!(fan.ray_towards(&model, a2), Some(0));
    }
}
