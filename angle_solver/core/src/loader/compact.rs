//! Compact persisted diagram schema
//!
//! Short keys as written by the editor's save format:
//!
//! ```json
//! {
//!   "points": [{"id": "A", "x": 0, "y": 0, "h": false}],
//!   "edges": [["A", "B"]],
//!   "lines": [{"id": "l1", "p": ["X", "Y", "W"]}],
//!   "circles": [{"c": "O", "r": 2.0, "p": ["A", "B"]}],
//!   "angles": [{"id": "Y", "p": ["X", "Z"], "v": 70, "l": "α", "h": false, "t": true}]
//! }
//! ```
//!
//! An angle's `id` names its vertex point. Hidden flags on points are
//! presentation only and dropped on conversion.

use super::{read, LoadError, LoadResult};
use crate::ir::{Angle, Circle, DiagramData, Edge, Line, Point};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactPoint {
    pub id: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub h: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactLine {
    pub id: String,
    pub p: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactCircle {
    pub c: String,
    #[serde(default)]
    pub r: f64,
    #[serde(default)]
    pub p: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactAngle {
    /// Vertex point
    pub id: String,
    pub p: Vec<String>,
    #[serde(default)]
    pub v: Option<f64>,
    #[serde(default)]
    pub l: Option<String>,
    #[serde(default)]
    pub h: bool,
    #[serde(default)]
    pub t: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompactDiagram {
    #[serde(default)]
    pub points: Vec<CompactPoint>,
    #[serde(default)]
    pub edges: Vec<[String; 2]>,
    #[serde(default)]
    pub lines: Vec<CompactLine>,
    #[serde(default)]
    pub circles: Vec<CompactCircle>,
    #[serde(default)]
    pub angles: Vec<CompactAngle>,
}

impl CompactDiagram {
    pub fn from_json(json: &str) -> LoadResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Convert to the runtime form
    ///
    /// Angle ids become `<side><vertex><side>`, suffixed with `#n` when the
    /// same angle is listed more than once.
    pub fn into_diagram(self) -> LoadResult<DiagramData> {
        let mut data = DiagramData::new();

        data.points = self
            .points
            .into_iter()
            .map(|p| Point { id: p.id, x: p.x, y: p.y })
            .collect();
        data.edges = self.edges.into_iter().map(|points| Edge { points }).collect();
        data.lines = self
            .lines
            .into_iter()
            .map(|l| Line { id: l.id, points: l.p })
            .collect();
        data.circles = self
            .circles
            .into_iter()
            .enumerate()
            .map(|(i, c)| Circle {
                id: Some(format!("c{}", i)),
                center_point: c.c,
                radius: c.r,
                points_on_line: c.p,
            })
            .collect();

        let mut seen: FxHashMap<String, usize> = FxHashMap::default();
        for angle in self.angles {
            let [s1, s2]: [String; 2] = angle.p.try_into().map_err(|p: Vec<String>| {
                LoadError::InvalidFormat(format!(
                    "angle at {} needs two side points, got {}",
                    angle.id,
                    p.len()
                ))
            })?;
            let base = format!("{}{}{}", s1, angle.id, s2);
            let count = seen.entry(base.clone()).or_insert(0);
            *count += 1;
            let id = if *count == 1 { base } else { format!("{}#{}", base, count) };

            data.angles.push(Angle {
                id,
                point_id: angle.id,
                sidepoints: [s1, s2],
                value: angle.v,
                calculated_value: None,
                label: angle.l,
                target: angle.t,
                hide: angle.h,
            });
        }

        Ok(data)
    }
}

/// Load a compact diagram file and convert it
pub fn load_compact<P: AsRef<Path>>(path: P) -> LoadResult<DiagramData> {
    let contents = read(path.as_ref())?;
    CompactDiagram::from_json(&contents)?.into_diagram()
}
