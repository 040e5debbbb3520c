//! Geometry module - Pure geometric relations
//!
//! Everything here is derived from coordinates and declared structure only.
//! NO solved values are read, so relations can be discovered once per solve
//! and shared between strategies.

pub mod disjoint;
pub mod partition;
pub mod rays;
pub mod relations;
pub mod triangles;

pub use disjoint::DisjointSet;
pub use partition::{calculated_sum, Chain, RayClass, VertexFan};
pub use rays::{
    are_angles_linear_pair, are_angles_overlapping, are_same_angle, classify_pair,
    find_overlapping_angles, is_opposite_ray, is_same_ray, AnglePairing,
};
pub use relations::{
    gate, AnglePath, Composition, MirrorCross, PathSplit, Relations, TriangleAngles,
};
pub use triangles::{discover_triangles, explicit_triangles, implicit_triangles};
