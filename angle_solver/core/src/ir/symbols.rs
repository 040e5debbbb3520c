//! Symbol interning for diagram objects
//!
//! Diagram input refers to points, lines, circles and angles by caller-chosen
//! string ids. The model interns every id once into a typed numeric handle so
//! that the solver never compares strings on its hot paths.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Newtype wrapper for point identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointId(pub u32);

/// Newtype wrapper for line identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineId(pub u32);

/// Newtype wrapper for circle identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CircleId(pub u32);

/// Newtype wrapper for angle identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AngleId(pub u32);

impl PointId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl LineId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl CircleId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl AngleId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One interning namespace: label -> dense id, id -> label
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Namespace {
    ids: FxHashMap<String, u32>,
    labels: Vec<String>,
}

impl Namespace {
    fn intern(&mut self, label: &str) -> u32 {
        if let Some(&id) = self.ids.get(label) {
            return id;
        }
        let id = self.labels.len() as u32;
        self.ids.insert(label.to_string(), id);
        self.labels.push(label.to_string());
        id
    }

    fn get(&self, label: &str) -> Option<u32> {
        self.ids.get(label).copied()
    }

    fn label(&self, id: u32) -> Option<&str> {
        self.labels.get(id as usize).map(String::as_str)
    }
}

/// Symbol table mapping caller ids to typed handles
///
/// Ids are dense and assigned in interning order, so a handle doubles as an
/// index into the model's entity vectors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymbolTable {
    points: Namespace,
    lines: Namespace,
    circles: Namespace,
    angles: Namespace,
}

impl SymbolTable {
    /// Create a new empty symbol table
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a point label, returning its ID (creates new ID if label not seen before)
    pub fn get_or_intern_point(&mut self, label: &str) -> PointId {
        PointId(self.points.intern(label))
    }

    /// Intern a line label, returning its ID
    pub fn get_or_intern_line(&mut self, label: &str) -> LineId {
        LineId(self.lines.intern(label))
    }

    /// Intern a circle label, returning its ID
    pub fn get_or_intern_circle(&mut self, label: &str) -> CircleId {
        CircleId(self.circles.intern(label))
    }

    /// Intern an angle label, returning its ID
    pub fn get_or_intern_angle(&mut self, label: &str) -> AngleId {
        AngleId(self.angles.intern(label))
    }

    /// Look up a point without interning it
    pub fn point(&self, label: &str) -> Option<PointId> {
        self.points.get(label).map(PointId)
    }

    /// Look up an angle without interning it
    pub fn angle(&self, label: &str) -> Option<AngleId> {
        self.angles.get(label).map(AngleId)
    }

    /// Get the label for a point ID
    pub fn point_label(&self, id: PointId) -> Option<&str> {
        self.points.label(id.0)
    }

    /// Get the label for a line ID
    pub fn line_label(&self, id: LineId) -> Option<&str> {
        self.lines.label(id.0)
    }

    /// Get the label for an angle ID
    pub fn angle_label(&self, id: AngleId) -> Option<&str> {
        self.angles.label(id.0)
    }

    pub fn num_points(&self) -> usize {
        self.points.labels.len()
    }

    pub fn num_lines(&self) -> usize {
        self.lines.labels.len()
    }

    pub fn num_circles(&self) -> usize {
        self.circles.labels.len()
    }

    pub fn num_angles(&self) -> usize {
        self.angles.labels.len()
    }
}
