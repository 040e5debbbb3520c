//! Geometry model
//!
//! The interned, enriched form of a [`DiagramData`] that every solving
//! strategy works on. It is built once per solve call; afterwards only
//! [`GeoAngle::value`] ever changes.

use super::coords::{ops, Point2D};
use super::diagram::DiagramData;
use super::symbols::{AngleId, CircleId, LineId, PointId, SymbolTable};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Relative tolerance for coordinate collinearity checks
pub const COLLINEAR_EPSILON: f64 = 1e-6;

/// Errors raised while building a model from caller data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("unknown point '{point}' referenced by {owner}")]
    UnknownPoint { point: String, owner: String },

    #[error("duplicate point id '{0}'")]
    DuplicatePoint(String),

    #[error("duplicate angle id '{0}'")]
    DuplicateAngle(String),

    #[error("angle '{0}' needs two distinct side points different from its vertex")]
    DegenerateAngle(String),
}

/// Result type for model construction
pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLine {
    pub id: LineId,
    pub points: Vec<PointId>,
}

impl GeoLine {
    /// Position of a point in the line's ordering
    pub fn position(&self, point: PointId) -> Option<usize> {
        self.points.iter().position(|&p| p == point)
    }

    pub fn contains(&self, point: PointId) -> bool {
        self.points.contains(&point)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoCircle {
    pub id: CircleId,
    pub center: PointId,
    pub radius: f64,
    pub on_circle: Vec<PointId>,
}

impl GeoCircle {
    pub fn passes_through(&self, point: PointId) -> bool {
        self.on_circle.contains(&point)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoAngle {
    pub id: AngleId,
    pub vertex: PointId,
    pub sides: [PointId; 2],
    /// Display and equation token, `∠<side1><vertex><side2>`
    pub name: String,
    pub value: Option<f64>,
    pub calculated_value: f64,
    pub label: Option<String>,
    pub target: bool,
    pub hide: bool,
}

impl GeoAngle {
    pub fn is_known(&self) -> bool {
        self.value.is_some()
    }
}

/// Complete solver-side view of one diagram
#[derive(Debug, Clone)]
pub struct GeometryModel {
    pub symbols: SymbolTable,
    pub points: Vec<Point2D>,
    pub lines: Vec<GeoLine>,
    pub circles: Vec<GeoCircle>,
    pub angles: Vec<GeoAngle>,
    /// Point triples, each sorted by id
    pub triangles: Vec<[PointId; 3]>,
    adjacency: FxHashSet<(PointId, PointId)>,
    angles_by_vertex: FxHashMap<PointId, Vec<AngleId>>,
}

impl GeometryModel {
    /// Intern and enrich caller data
    pub fn from_diagram(data: &DiagramData) -> ModelResult<Self> {
        let mut symbols = SymbolTable::new();
        let mut points = Vec::with_capacity(data.points.len());

        for point in &data.points {
            if symbols.point(&point.id).is_some() {
                return Err(ModelError::DuplicatePoint(point.id.clone()));
            }
            symbols.get_or_intern_point(&point.id);
            points.push(Point2D::new(point.x, point.y));
        }

        let resolve = |symbols: &SymbolTable, id: &str, owner: &str| -> ModelResult<PointId> {
            symbols.point(id).ok_or_else(|| ModelError::UnknownPoint {
                point: id.to_string(),
                owner: owner.to_string(),
            })
        };

        let mut lines = Vec::with_capacity(data.lines.len());
        for line in &data.lines {
            let owner = format!("line '{}'", line.id);
            let members = line
                .points
                .iter()
                .map(|p| resolve(&symbols, p, &owner))
                .collect::<ModelResult<Vec<_>>>()?;
            let id = symbols.get_or_intern_line(&line.id);
            lines.push(GeoLine { id, points: members });
        }

        let mut circles = Vec::with_capacity(data.circles.len());
        for (index, circle) in data.circles.iter().enumerate() {
            let label = circle
                .id
                .clone()
                .unwrap_or_else(|| format!("circle{}", index));
            let owner = format!("circle '{}'", label);
            let center = resolve(&symbols, &circle.center_point, &owner)?;
            let on_circle = circle
                .points_on_line
                .iter()
                .map(|p| resolve(&symbols, p, &owner))
                .collect::<ModelResult<Vec<_>>>()?;
            let id = symbols.get_or_intern_circle(&label);
            circles.push(GeoCircle { id, center, radius: circle.radius, on_circle });
        }

        let mut adjacency = FxHashSet::default();
        for edge in &data.edges {
            let a = resolve(&symbols, &edge.points[0], "edge")?;
            let b = resolve(&symbols, &edge.points[1], "edge")?;
            insert_pair(&mut adjacency, a, b);
        }
        for (from, neighbours) in &data.adjacent_points {
            let a = resolve(&symbols, from, "adjacentPoints")?;
            for to in neighbours {
                let b = resolve(&symbols, to, "adjacentPoints")?;
                insert_pair(&mut adjacency, a, b);
            }
        }

        let mut angles = Vec::with_capacity(data.angles.len());
        let mut angles_by_vertex: FxHashMap<PointId, Vec<AngleId>> = FxHashMap::default();
        for angle in &data.angles {
            let owner = format!("angle '{}'", angle.id);
            let vertex = resolve(&symbols, &angle.point_id, &owner)?;
            let s1 = resolve(&symbols, &angle.sidepoints[0], &owner)?;
            let s2 = resolve(&symbols, &angle.sidepoints[1], &owner)?;
            if s1 == s2 || s1 == vertex || s2 == vertex {
                return Err(ModelError::DegenerateAngle(angle.id.clone()));
            }

            if symbols.angle(&angle.id).is_some() {
                return Err(ModelError::DuplicateAngle(angle.id.clone()));
            }
            let id = symbols.get_or_intern_angle(&angle.id);
            let name = format!(
                "∠{}{}{}",
                angle.sidepoints[0], angle.point_id, angle.sidepoints[1]
            );
            let calculated_value =
                ops::calculated_value(points[vertex.index()], points[s1.index()], points[s2.index()]);
            let label = angle.label.clone().filter(|l| !l.trim().is_empty());

            angles_by_vertex.entry(vertex).or_default().push(id);
            angles.push(GeoAngle {
                id,
                vertex,
                sides: [s1, s2],
                name,
                value: angle.value,
                calculated_value,
                label,
                target: angle.target,
                hide: angle.hide,
            });
        }

        let mut model = Self {
            symbols,
            points,
            lines,
            circles,
            angles,
            triangles: Vec::new(),
            adjacency,
            angles_by_vertex,
        };

        let mut triangles = Vec::new();
        for triple in &data.triangles {
            let mut ids = [PointId(0); 3];
            for (slot, p) in ids.iter_mut().zip(triple.iter()) {
                *slot = resolve(&model.symbols, p, "triangle")?;
            }
            ids.sort();
            if ids[0] != ids[1] && ids[1] != ids[2] && !model.is_degenerate(ids) {
                triangles.push(ids);
            }
        }
        for found in crate::geometry::discover_triangles(&model) {
            if !triangles.contains(&found) {
                triangles.push(found);
            }
        }
        model.triangles = triangles;

        Ok(model)
    }

    pub fn point(&self, id: PointId) -> Point2D {
        self.points[id.index()]
    }

    pub fn point_name(&self, id: PointId) -> &str {
        self.symbols.point_label(id).unwrap_or("?")
    }

    pub fn angle(&self, id: AngleId) -> &GeoAngle {
        &self.angles[id.index()]
    }

    pub fn angle_mut(&mut self, id: AngleId) -> &mut GeoAngle {
        &mut self.angles[id.index()]
    }

    pub fn value(&self, id: AngleId) -> Option<f64> {
        self.angles[id.index()].value
    }

    /// Angles whose vertex is `vertex`, in input order
    pub fn angles_at(&self, vertex: PointId) -> &[AngleId] {
        self.angles_by_vertex
            .get(&vertex)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Vertices carrying at least one angle, sorted
    pub fn vertices(&self) -> Vec<PointId> {
        let mut vertices: Vec<_> = self.angles_by_vertex.keys().copied().collect();
        vertices.sort();
        vertices
    }

    /// Explicit adjacency (edges and `adjacentPoints`)
    pub fn has_edge(&self, a: PointId, b: PointId) -> bool {
        self.adjacency.contains(&ordered(a, b))
    }

    /// Points with an explicit edge to `point`
    pub fn neighbours(&self, point: PointId) -> Vec<PointId> {
        let mut out: Vec<_> = self
            .adjacency
            .iter()
            .filter_map(|&(a, b)| {
                if a == point {
                    Some(b)
                } else if b == point {
                    Some(a)
                } else {
                    None
                }
            })
            .collect();
        out.sort();
        out
    }

    /// Lines containing every given point
    pub fn lines_through<'a>(&'a self, points: &'a [PointId]) -> impl Iterator<Item = &'a GeoLine> + 'a {
        self.lines
            .iter()
            .filter(move |line| points.iter().all(|&p| line.contains(p)))
    }

    pub fn share_line(&self, a: PointId, b: PointId) -> bool {
        self.lines_through(&[a, b]).next().is_some()
    }

    /// Three points on one declared line, or numerically collinear
    pub fn is_degenerate(&self, triple: [PointId; 3]) -> bool {
        self.lines_through(&triple).next().is_some()
            || ops::are_collinear(
                self.point(triple[0]),
                self.point(triple[1]),
                self.point(triple[2]),
                COLLINEAR_EPSILON,
            )
    }

    pub fn has_targets(&self) -> bool {
        self.angles.iter().any(|a| a.target)
    }

    pub fn targets(&self) -> impl Iterator<Item = &GeoAngle> {
        self.angles.iter().filter(|a| a.target)
    }

    pub fn all_targets_solved(&self) -> bool {
        self.targets().all(GeoAngle::is_known)
    }
}

fn ordered(a: PointId, b: PointId) -> (PointId, PointId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn insert_pair(set: &mut FxHashSet<(PointId, PointId)>, a: PointId, b: PointId) {
    if a != b {
        set.insert(ordered(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::diagram::Angle;

    fn triangle_data() -> DiagramData {
        DiagramData::new()
            .point("A", 0.0, 0.0)
            .point("B", 4.0, 0.0)
            .point("C", 0.0, 3.0)
            .edge("A", "B")
            .edge("B", "C")
            .edge("C", "A")
            .angle(Angle::new("a", "A", "B", "C").with_value(90.0))
            .angle(Angle::new("b", "B", "A", "C"))
    }

    #[test]
    fn test_build_interns_and_computes() {
        let model = GeometryModel::from_diagram(&triangle_data()).unwrap();

        assert_eq!(model.points.len(), 3);
        assert_eq!(model.angles.len(), 2);
        assert_eq!(model.angles[0].name, "∠BAC");
        assert!((model.angles[0].calculated_value - 90.0).abs() < 1e-9);
        assert_eq!(model.angles[0].value, Some(90.0));
        assert!(model.angles[1].value.is_none());
    }

    #[test]
    fn test_triangle_is_discovered() {
        let model = GeometryModel::from_diagram(&triangle_data()).unwrap();

        assert_eq!(model.triangles, vec![[PointId(0), PointId(1), PointId(2)]]);
    }

    #[test]
    fn test_unknown_point_is_reported() {
        let data = DiagramData::new()
            .point("A", 0.0, 0.0)
            .angle(Angle::new("a", "A", "B", "C"));

        let err = GeometryModel::from_diagram(&data).unwrap_err();
        assert!(matches!(err, ModelError::UnknownPoint { ref point, .. } if point == "B"));
    }

    #[test]
    fn test_degenerate_angle_is_rejected() {
        let data = DiagramData::new()
            .point("A", 0.0, 0.0)
            .point("B", 1.0, 0.0)
            .angle(Angle::new("a", "A", "B", "B"));

        assert_eq!(
            GeometryModel::from_diagram(&data).unwrap_err(),
            ModelError::DegenerateAngle("a".to_string())
        );
    }

    #[test]
    fn test_duplicate_angle_id_is_rejected() {
        let data = triangle_data().angle(Angle::new("a", "C", "A", "B"));

        assert_eq!(
            GeometryModel::from_diagram(&data).unwrap_err(),
            ModelError::DuplicateAngle("a".to_string())
        );
    }

    #[test]
    fn test_adjacency_is_undirected() {
        let model = GeometryModel::from_diagram(&triangle_data()).unwrap();
        let a = model.symbols.point("A").unwrap();
        let b = model.symbols.point("B").unwrap();

        assert!(model.has_edge(a, b));
        assert!(model.has_edge(b, a));
        assert_eq!(model.neighbours(a).len(), 2);
    }

    #[test]
    fn test_blank_label_is_dropped() {
        let data = triangle_data().angle(Angle::new("c", "C", "A", "B").with_label("  "));
        let model = GeometryModel::from_diagram(&data).unwrap();

        assert!(model.angles[2].label.is_none());
    }
}
