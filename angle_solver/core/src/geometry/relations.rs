//! Relation index
//!
//! Relationship discovery is purely geometric: it looks at coordinates and
//! declared structure, never at solved values. Every sum relationship passes
//! a trust gate first: the participants' calculated values must add up to the
//! expected total within the configured tolerance. The index is built once
//! per solve and shared by the rule engine, the validator and the equation
//! extractor.

use super::disjoint::DisjointSet;
use super::partition::{calculated_sum, Chain, VertexFan};
use super::rays::{are_same_angle, classify_pair, AnglePairing};
use crate::config::Tolerances;
use crate::ir::{AngleId, GeometryModel, LineId, PointId};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeMap;
use tracing::debug;

/// Consecutive angles adding up to a straight line (180) or a full turn (360)
#[derive(Debug, Clone, PartialEq)]
pub struct AnglePath {
    pub vertex: PointId,
    /// Ray indices into the vertex fan
    pub rays: Vec<usize>,
    pub pieces: Vec<AngleId>,
    pub total: f64,
}

/// A contiguous run inside a path that one existing angle spans
///
/// `spanning + complement = total`, where the complement is the rest of the path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSplit {
    pub spanning: AngleId,
    pub inner: Vec<AngleId>,
    pub complement: Vec<AngleId>,
    pub total: f64,
}

/// Parent angle equal to the sum of consecutive children
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub vertex: PointId,
    pub parent: AngleId,
    pub children: Vec<AngleId>,
}

/// The three angles of a triangle and what circles say about it
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleAngles {
    pub points: [PointId; 3],
    /// Angle at `points[k]`, if the diagram has one
    pub angles: [Option<AngleId>; 3],
    /// Vertex index that centres a circle through the other two
    pub circle_apex: Option<usize>,
    /// Two vertices each centre a circle through the other two vertices
    pub circle_equilateral: bool,
}

impl TriangleAngles {
    pub fn all_angles(&self) -> Option<[AngleId; 3]> {
        match self.angles {
            [Some(a), Some(b), Some(c)] => Some([a, b, c]),
            _ => None,
        }
    }

    pub fn contains(&self, angle: AngleId) -> bool {
        self.angles.contains(&Some(angle))
    }
}

/// Two lines crossing at a vertex interior to both
///
/// With lines A-O-B and C-O-D the regions are AOC, COB, BOD, DOA;
/// regions 0/2 and 1/3 are vertical pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct MirrorCross {
    pub vertex: PointId,
    pub lines: (LineId, LineId),
    pub regions: [Option<AngleId>; 4],
}

impl MirrorCross {
    pub const VERTICAL_PAIRS: [(usize, usize); 2] = [(0, 2), (1, 3)];
    pub const ADJACENT_PAIRS: [(usize, usize); 4] = [(0, 1), (1, 2), (2, 3), (3, 0)];

    pub fn all_regions(&self) -> Option<[AngleId; 4]> {
        match self.regions {
            [Some(a), Some(b), Some(c), Some(d)] => Some([a, b, c, d]),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Relations {
    pub fans: FxHashMap<PointId, VertexFan>,
    pub same_angle_groups: Vec<Vec<AngleId>>,
    pub label_groups: BTreeMap<String, Vec<AngleId>>,
    pub linear_pairs: Vec<(AngleId, AngleId)>,
    pub triangles: Vec<TriangleAngles>,
    pub straight_paths: Vec<AnglePath>,
    pub full_circles: Vec<AnglePath>,
    pub straight_splits: Vec<PathSplit>,
    pub circle_splits: Vec<PathSplit>,
    pub compositions: Vec<Composition>,
    pub mirrors: Vec<MirrorCross>,
    triangles_of: FxHashMap<AngleId, Vec<usize>>,
    compositions_of: FxHashMap<AngleId, Vec<usize>>,
}

impl Relations {
    pub fn discover(model: &GeometryModel, tolerances: &Tolerances, max_partitions: usize) -> Self {
        let mut relations = Relations::default();

        for vertex in model.vertices() {
            relations.fans.insert(vertex, VertexFan::build(model, vertex));
        }

        relations.collect_same_angles(model);
        relations.collect_labels(model);
        relations.collect_linear_pairs(model, tolerances);
        relations.collect_triangles(model);
        relations.collect_straight_paths(model, tolerances, max_partitions);
        relations.collect_full_circles(model, tolerances, max_partitions);
        relations.straight_splits = path_splits(model, &relations.fans, &relations.straight_paths, tolerances);
        relations.circle_splits = path_splits(model, &relations.fans, &relations.full_circles, tolerances);
        relations.collect_compositions(model, tolerances, max_partitions);
        relations.collect_mirrors(model);
        relations.build_indexes();

        debug!(
            same_angle_groups = relations.same_angle_groups.len(),
            triangles = relations.triangles.len(),
            straight_paths = relations.straight_paths.len(),
            full_circles = relations.full_circles.len(),
            compositions = relations.compositions.len(),
            mirrors = relations.mirrors.len(),
            "relations discovered"
        );

        relations
    }

    pub fn fan(&self, vertex: PointId) -> Option<&VertexFan> {
        self.fans.get(&vertex)
    }

    /// Triangles that have `angle` as one of their corners
    pub fn triangles_with(&self, angle: AngleId) -> impl Iterator<Item = &TriangleAngles> {
        self.triangles_of
            .get(&angle)
            .into_iter()
            .flatten()
            .map(move |&i| &self.triangles[i])
    }

    /// Compositions in which `angle` is the parent or a child
    pub fn compositions_with(&self, angle: AngleId) -> impl Iterator<Item = &Composition> {
        self.compositions_of
            .get(&angle)
            .into_iter()
            .flatten()
            .map(move |&i| &self.compositions[i])
    }

    /// Linear pairs not already present as a two-piece straight path
    pub fn extra_linear_pairs(&self) -> impl Iterator<Item = [AngleId; 2]> + '_ {
        self.linear_pairs
            .iter()
            .filter(move |&&(a, b)| {
                !self
                    .straight_paths
                    .iter()
                    .any(|p| p.pieces.len() == 2 && p.pieces.contains(&a) && p.pieces.contains(&b))
            })
            .map(|&(a, b)| [a, b])
    }

    fn collect_same_angles(&mut self, model: &GeometryModel) {
        let mut set = DisjointSet::new(model.angles.len());
        for vertex in model.vertices() {
            let at = model.angles_at(vertex);
            for (i, &a) in at.iter().enumerate() {
                for &b in &at[i + 1..] {
                    if are_same_angle(model.angle(a), model.angle(b), &model.lines) {
                        set.union(a.index(), b.index());
                    }
                }
            }
        }
        self.same_angle_groups = set
            .groups()
            .into_iter()
            .map(|g| g.into_iter().map(|i| AngleId(i as u32)).collect())
            .collect();
    }

    fn collect_labels(&mut self, model: &GeometryModel) {
        for angle in &model.angles {
            if let Some(label) = &angle.label {
                self.label_groups.entry(label.clone()).or_default().push(angle.id);
            }
        }
    }

    fn collect_linear_pairs(&mut self, model: &GeometryModel, tolerances: &Tolerances) {
        for vertex in model.vertices() {
            let at = model.angles_at(vertex);
            for (i, &a) in at.iter().enumerate() {
                for &b in &at[i + 1..] {
                    let (first, second) = (model.angle(a), model.angle(b));
                    if classify_pair(first, second, &model.lines) == Some(AnglePairing::LinearPair)
                        && gate(first.calculated_value + second.calculated_value, 180.0, tolerances.simple_sum)
                    {
                        self.linear_pairs.push((a, b));
                    }
                }
            }
        }
    }

    fn collect_triangles(&mut self, model: &GeometryModel) {
        for &points in &model.triangles {
            let mut angles = [None; 3];
            for (k, slot) in angles.iter_mut().enumerate() {
                let vertex = points[k];
                let (o1, o2) = (points[(k + 1) % 3], points[(k + 2) % 3]);
                *slot = self.fan(vertex).and_then(|fan| {
                    let i = fan.ray_towards(model, o1)?;
                    let j = fan.ray_towards(model, o2)?;
                    fan.between(i, j)
                });
            }

            let centres = |k: usize| {
                let (o1, o2) = (points[(k + 1) % 3], points[(k + 2) % 3]);
                model
                    .circles
                    .iter()
                    .any(|c| c.center == points[k] && c.passes_through(o1) && c.passes_through(o2))
            };
            let centred: Vec<usize> = (0..3).filter(|&k| centres(k)).collect();

            self.triangles.push(TriangleAngles {
                points,
                angles,
                circle_apex: centred.first().copied(),
                circle_equilateral: centred.len() >= 2,
            });
        }
    }

    fn collect_straight_paths(&mut self, model: &GeometryModel, tolerances: &Tolerances, limit: usize) {
        let mut seen = FxHashSet::default();
        for line in &model.lines {
            for vi in 1..line.points.len().saturating_sub(1) {
                let vertex = line.points[vi];
                let Some(fan) = self.fans.get(&vertex) else {
                    continue;
                };
                let before = line.points[..vi].iter().rev().find_map(|&p| fan.ray_towards(model, p));
                let after = line.points[vi + 1..].iter().find_map(|&p| fan.ray_towards(model, p));
                let (Some(b), Some(a)) = (before, after) else {
                    continue;
                };
                if a == b {
                    continue;
                }
                let chains = fan
                    .chains(b, a, 1, limit)
                    .into_iter()
                    .chain(fan.chains(a, b, 1, limit));
                for chain in chains {
                    if let Some(path) = gated_path(model, vertex, chain, 180.0, tolerances.simple_sum) {
                        if seen.insert(sorted(&path.pieces)) {
                            self.straight_paths.push(path);
                        }
                    }
                }
            }
        }
    }

    fn collect_full_circles(&mut self, model: &GeometryModel, tolerances: &Tolerances, limit: usize) {
        let mut seen = FxHashSet::default();
        for vertex in model.vertices() {
            let Some(fan) = self.fans.get(&vertex) else {
                continue;
            };
            for start in 0..fan.len() {
                for chain in fan.chains(start, start, 2, limit) {
                    if let Some(path) = gated_path(model, vertex, chain, 360.0, tolerances.full_circle) {
                        if seen.insert(sorted(&path.pieces)) {
                            self.full_circles.push(path);
                        }
                    }
                }
            }
        }
    }

    fn collect_compositions(&mut self, model: &GeometryModel, tolerances: &Tolerances, limit: usize) {
        let mut seen = FxHashSet::default();
        for vertex in model.vertices() {
            let Some(fan) = self.fans.get(&vertex) else {
                continue;
            };
            for (i, j) in fan.spanned_pairs() {
                let chains: Vec<Chain> = fan
                    .chains(i, j, 2, limit)
                    .into_iter()
                    .chain(fan.chains(j, i, 2, limit))
                    .collect();
                for &parent in fan.spanning(i, j) {
                    let parent_value = model.angle(parent).calculated_value;
                    for chain in &chains {
                        if chain.pieces.contains(&parent) || has_repeats(&chain.pieces) {
                            continue;
                        }
                        if !gate(calculated_sum(model, &chain.pieces), parent_value, tolerances.composed) {
                            continue;
                        }
                        let mut key = sorted(&chain.pieces);
                        key.insert(0, parent);
                        if seen.insert(key) {
                            self.compositions.push(Composition {
                                vertex,
                                parent,
                                children: chain.pieces.clone(),
                            });
                        }
                    }
                }
            }
        }
    }

    fn collect_mirrors(&mut self, model: &GeometryModel) {
        for vertex in model.vertices() {
            let Some(fan) = self.fans.get(&vertex) else {
                continue;
            };
            let mut crossing = Vec::new();
            for line in model.lines.iter() {
                let Some(vi) = line.position(vertex) else {
                    continue;
                };
                if vi == 0 || vi + 1 >= line.points.len() {
                    continue;
                }
                let before = line.points[..vi].iter().rev().find_map(|&p| fan.ray_towards(model, p));
                let after = line.points[vi + 1..].iter().find_map(|&p| fan.ray_towards(model, p));
                if let (Some(b), Some(a)) = (before, after) {
                    crossing.push((line.id, b, a));
                }
            }

            for (x, &(l1, a, b)) in crossing.iter().enumerate() {
                for &(l2, c, d) in &crossing[x + 1..] {
                    let rays = [a, b, c, d];
                    if (0..4).any(|i| rays[i + 1..].contains(&rays[i])) {
                        continue;
                    }
                    self.mirrors.push(MirrorCross {
                        vertex,
                        lines: (l1, l2),
                        regions: [
                            fan.between(a, c),
                            fan.between(c, b),
                            fan.between(b, d),
                            fan.between(d, a),
                        ],
                    });
                }
            }
        }
    }

    fn build_indexes(&mut self) {
        for (i, triangle) in self.triangles.iter().enumerate() {
            for angle in triangle.angles.iter().flatten() {
                self.triangles_of.entry(*angle).or_default().push(i);
            }
        }
        for (i, composition) in self.compositions.iter().enumerate() {
            self.compositions_of.entry(composition.parent).or_default().push(i);
            for child in &composition.children {
                self.compositions_of.entry(*child).or_default().push(i);
            }
        }
    }
}

/// Contiguous runs of each path that a single angle spans, with the rest of
/// the path as complement
fn path_splits(
    model: &GeometryModel,
    fans: &FxHashMap<PointId, VertexFan>,
    paths: &[AnglePath],
    tolerances: &Tolerances,
) -> Vec<PathSplit> {
    let mut seen = FxHashSet::default();
    let mut splits = Vec::new();
    for path in paths {
        let Some(fan) = fans.get(&path.vertex) else {
            continue;
        };
        let count = path.pieces.len();
        for s in 0..count {
            for e in s + 2..=count {
                if e - s == count {
                    continue;
                }
                let Some(spanning) = fan.between(path.rays[s], path.rays[e]) else {
                    continue;
                };
                if path.pieces.contains(&spanning) {
                    continue;
                }
                let inner = path.pieces[s..e].to_vec();
                let complement: Vec<AngleId> = path.pieces[..s]
                    .iter()
                    .chain(path.pieces[e..].iter())
                    .copied()
                    .collect();
                let sum = model.angle(spanning).calculated_value + calculated_sum(model, &complement);
                if !gate(sum, path.total, tolerances.simple_sum) {
                    continue;
                }
                let mut key = sorted(&complement);
                key.push(spanning);
                if seen.insert(key) {
                    splits.push(PathSplit { spanning, inner, complement, total: path.total });
                }
            }
        }
    }
    splits
}

/// Trust gate: coordinate-derived sum close enough to the expected total
pub fn gate(sum: f64, expected: f64, tolerance: f64) -> bool {
    (sum - expected).abs() <= tolerance
}

fn gated_path(model: &GeometryModel, vertex: PointId, chain: Chain, total: f64, tolerance: f64) -> Option<AnglePath> {
    if chain.pieces.len() + 1 != chain.rays.len() || has_repeats(&chain.pieces) {
        return None;
    }
    if !gate(calculated_sum(model, &chain.pieces), total, tolerance) {
        return None;
    }
    Some(AnglePath { vertex, rays: chain.rays, pieces: chain.pieces, total })
}

fn has_repeats(angles: &[AngleId]) -> bool {
    angles.iter().enumerate().any(|(i, a)| angles[i + 1..].contains(a))
}

fn sorted(angles: &[AngleId]) -> Vec<AngleId> {
    let mut key = angles.to_vec();
    key.sort();
    key
}
