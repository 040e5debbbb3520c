//! Caller-facing diagram description
//!
//! This is the runtime form handed over by the editing front end. Keys are
//! camelCase on the wire (`pointId`, `calculatedValue`, `pointsOnLine`, ...).

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

/// Undirected adjacency between two points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub points: [String; 2],
}

/// Ordered run of collinear points
///
/// The order is meaningful: points before a vertex and points after it lie
/// on opposite rays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub id: String,
    pub points: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circle {
    #[serde(default)]
    pub id: Option<String>,
    pub center_point: String,
    #[serde(default)]
    pub radius: f64,
    #[serde(default)]
    pub points_on_line: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Angle {
    pub id: String,
    /// Vertex point
    pub point_id: String,
    pub sidepoints: [String; 2],
    #[serde(default)]
    pub value: Option<f64>,
    /// Ignored on input; the model recomputes it from coordinates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculated_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub target: bool,
    #[serde(default)]
    pub hide: bool,
}

impl Angle {
    pub fn new(id: &str, vertex: &str, side1: &str, side2: &str) -> Self {
        Self {
            id: id.to_string(),
            point_id: vertex.to_string(),
            sidepoints: [side1.to_string(), side2.to_string()],
            value: None,
            calculated_value: None,
            label: None,
            target: false,
            hide: false,
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn as_target(mut self) -> Self {
        self.target = true;
        self
    }
}

/// Everything one solve call consumes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramData {
    #[serde(default)]
    pub points: Vec<Point>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub lines: Vec<Line>,
    #[serde(default)]
    pub circles: Vec<Circle>,
    #[serde(default)]
    pub angles: Vec<Angle>,
    /// Caller-known triangles, merged with the discovered ones
    #[serde(default)]
    pub triangles: Vec<[String; 3]>,
    /// Extra adjacency, treated like edges
    #[serde(default)]
    pub adjacent_points: FxHashMap<String, Vec<String>>,
}

impl DiagramData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn point(mut self, id: &str, x: f64, y: f64) -> Self {
        self.points.push(Point { id: id.to_string(), x, y });
        self
    }

    pub fn edge(mut self, a: &str, b: &str) -> Self {
        self.edges.push(Edge { points: [a.to_string(), b.to_string()] });
        self
    }

    pub fn line(mut self, id: &str, points: &[&str]) -> Self {
        self.lines.push(Line {
            id: id.to_string(),
            points: points.iter().map(|p| p.to_string()).collect(),
        });
        self
    }

    pub fn circle(mut self, center: &str, radius: f64, on_circle: &[&str]) -> Self {
        self.circles.push(Circle {
            id: None,
            center_point: center.to_string(),
            radius,
            points_on_line: on_circle.iter().map(|p| p.to_string()).collect(),
        });
        self
    }

    pub fn angle(mut self, angle: Angle) -> Self {
        self.angles.push(angle);
        self
    }

    /// True when at least one angle asks to be solved
    pub fn has_targets(&self) -> bool {
        self.angles.iter().any(|a| a.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_json_keys() {
        let json = r#"{
            "points": [{"id": "A", "x": 0, "y": 0}],
            "angles": [{"id": "a1", "pointId": "A", "sidepoints": ["B", "C"],
                        "value": null, "calculatedValue": 45.0, "label": "α", "target": true}],
            "circles": [{"centerPoint": "A", "radius": 2.0, "pointsOnLine": ["B"]}],
            "adjacentPoints": {"A": ["B"]}
        }"#;

        let data: DiagramData = serde_json::from_str(json).unwrap();

        assert_eq!(data.angles[0].point_id, "A");
        assert_eq!(data.angles[0].label.as_deref(), Some("α"));
        assert!(data.angles[0].value.is_none());
        assert!(data.has_targets());
        assert_eq!(data.circles[0].points_on_line, vec!["B".to_string()]);
        assert_eq!(data.adjacent_points["A"], vec!["B".to_string()]);
    }

    #[test]
    fn test_builder() {
        let data = DiagramData::new()
            .point("A", 0.0, 0.0)
            .point("B", 1.0, 0.0)
            .edge("A", "B")
            .angle(Angle::new("x", "A", "B", "C").with_value(30.0));

        assert_eq!(data.points.len(), 2);
        assert_eq!(data.edges.len(), 1);
        assert!(!data.has_targets());
    }
}
