//! Constraint validator
//!
//! The single chokepoint between a rule proposing a value and the engine
//! committing it. Checks are pure reads over the model and the relation
//! index; a rejected proposal is simply dropped.

use crate::equations::numeric::format_number;
use crate::geometry::Relations;
use crate::ir::{AngleId, GeometryModel};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Violation {
    #[error("value {value} is outside (0, 180]")]
    OutOfRange { value: f64 },

    #[error("label '{label}' already holds {existing} on {other}")]
    LabelConflict { label: String, other: String, existing: f64 },

    #[error("triangle {triangle} would sum to {sum}")]
    TriangleSum { triangle: String, sum: f64 },

    #[error("composition at {parent} expects {expected}")]
    Composition { parent: String, expected: String },
}

pub struct Validator<'a> {
    model: &'a GeometryModel,
    relations: &'a Relations,
    tolerance: f64,
}

impl<'a> Validator<'a> {
    pub fn new(model: &'a GeometryModel, relations: &'a Relations, tolerance: f64) -> Self {
        Self { model, relations, tolerance }
    }

    /// Check a proposed value for `angle` against everything already solved
    pub fn validate(&self, angle: AngleId, proposed: f64) -> Result<(), Violation> {
        if !proposed.is_finite() || proposed <= 0.0 || proposed > 180.0 {
            return Err(Violation::OutOfRange { value: proposed });
        }
        self.check_label(angle, proposed)?;
        self.check_triangles(angle, proposed)?;
        self.check_compositions(angle, proposed)
    }

    fn check_label(&self, angle: AngleId, proposed: f64) -> Result<(), Violation> {
        let Some(label) = &self.model.angle(angle).label else {
            return Ok(());
        };
        let Some(group) = self.relations.label_groups.get(label) else {
            return Ok(());
        };
        for &other in group {
            if other == angle {
                continue;
            }
            if let Some(existing) = self.model.value(other) {
                if (existing - proposed).abs() > self.tolerance {
                    return Err(Violation::LabelConflict {
                        label: label.clone(),
                        other: self.model.angle(other).name.clone(),
                        existing,
                    });
                }
            }
        }
        Ok(())
    }

    fn check_triangles(&self, angle: AngleId, proposed: f64) -> Result<(), Violation> {
        for triangle in self.relations.triangles_with(angle) {
            let Some(corners) = triangle.all_angles() else {
                continue;
            };
            let mut sum = 0.0;
            let mut complete = true;
            for corner in corners {
                match self.value_with(corner, angle, proposed) {
                    Some(v) => sum += v,
                    None => complete = false,
                }
            }
            if complete && (sum - 180.0).abs() > self.tolerance {
                let names: Vec<&str> = triangle.points.iter().map(|&p| self.model.point_name(p)).collect();
                return Err(Violation::TriangleSum { triangle: names.concat(), sum });
            }
        }
        Ok(())
    }

    fn check_compositions(&self, angle: AngleId, proposed: f64) -> Result<(), Violation> {
        for composition in self.relations.compositions_with(angle) {
            let parent = self.value_with(composition.parent, angle, proposed);
            let mut known_sum = 0.0;
            let mut unknown = 0;
            for &child in &composition.children {
                match self.value_with(child, angle, proposed) {
                    Some(v) => known_sum += v,
                    None => unknown += 1,
                }
            }
            let Some(parent) = parent else {
                continue;
            };
            let consistent = if unknown == 0 {
                (parent - known_sum).abs() <= self.tolerance
            } else {
                known_sum < parent + self.tolerance
            };
            if !consistent {
                let expected = if unknown == 0 {
                    format_number(known_sum)
                } else {
                    format!("children below {}", format_number(parent))
                };
                return Err(Violation::Composition {
                    parent: self.model.angle(composition.parent).name.clone(),
                    expected,
                });
            }
        }
        Ok(())
    }

    /// Current value of `id`, with `angle` taking the proposed value
    fn value_with(&self, id: AngleId, angle: AngleId, proposed: f64) -> Option<f64> {
        if id == angle {
            Some(proposed)
        } else {
            self.model.value(id)
        }
    }
}
