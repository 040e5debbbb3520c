//! Intermediate Representation (IR) module
//!
//! This module provides the core data structures the solver works on:
//! - **symbols**: Type-safe identifiers for diagram objects with string interning
//! - **diagram**: The caller-facing diagram description (serde)
//! - **model**: The interned, enriched geometry model built once per solve
//! - **coords**: Coordinates and angle-from-coordinates computations
//! - **trace**: Solve steps and traces with serialization
//!
//! # Example
//!
//! ```rust
//! use angle_solver_core::ir::*;
//!
//! let data = DiagramData::new()
//!     .point("A", 0.0, 0.0)
//!     .point("B", 1.0, 0.0)
//!     .point("C", 0.0, 1.0)
//!     .angle(Angle::new("a", "A", "B", "C").as_target());
//!
//! let model = GeometryModel::from_diagram(&data).unwrap();
//! assert_eq!(model.angles[0].name, "∠BAC");
//! assert!((model.angles[0].calculated_value - 90.0).abs() < 1e-9);
//! ```

mod coords;
mod diagram;
mod model;
mod symbols;
mod trace;

// Re-export all public items for convenient access
pub use coords::{ops, Point2D};
pub use diagram::{Angle, Circle, DiagramData, Edge, Line, Point};
pub use model::{GeoAngle, GeoCircle, GeoLine, GeometryModel, ModelError, ModelResult, COLLINEAR_EPSILON};
pub use symbols::{AngleId, CircleId, LineId, PointId, SymbolTable};
pub use trace::{SolveStep, SolveTrace, StepId, TraceError, TraceResult, TraceStatistics};
