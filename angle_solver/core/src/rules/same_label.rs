//! Shared labels carry one value

use super::Proposal;
use crate::equations::numeric::format_number;
use crate::geometry::Relations;
use crate::ir::GeometryModel;

pub(super) fn apply(model: &GeometryModel, relations: &Relations) -> Vec<Proposal> {
    let mut proposals = Vec::new();

    for (label, group) in &relations.label_groups {
        let Some(source) = group.iter().copied().find(|&a| model.value(a).is_some()) else {
            continue;
        };
        let Some(value) = model.value(source) else {
            continue;
        };
        for &angle in group {
            if model.value(angle).is_none() {
                proposals.push(Proposal::new(
                    angle,
                    value,
                    format!(
                        "label {} is {} on {}",
                        label,
                        format_number(value),
                        model.angle(source).name
                    ),
                ));
            }
        }
    }

    proposals
}
