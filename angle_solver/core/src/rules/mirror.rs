//! Vertical angles at crossing lines

use super::Proposal;
use crate::equations::numeric::format_number;
use crate::geometry::{MirrorCross, Relations};
use crate::ir::GeometryModel;

pub(super) fn apply(model: &GeometryModel, relations: &Relations) -> Vec<Proposal> {
    let mut proposals = Vec::new();

    for cross in &relations.mirrors {
        let mut values = cross.regions.map(|r| r.and_then(|a| model.value(a)));

        for (i, j) in MirrorCross::VERTICAL_PAIRS {
            for (from, to) in [(i, j), (j, i)] {
                let (Some(source), Some(target)) = (cross.regions[from], cross.regions[to]) else {
                    continue;
                };
                if let (Some(value), None) = (values[from], values[to]) {
                    values[to] = Some(value);
                    proposals.push(Proposal::new(
                        target,
                        value,
                        format!("vertical angle of {}", model.angle(source).name),
                    ));
                }
            }
        }

        let Some(regions) = cross.all_regions() else {
            continue;
        };
        let unknown: Vec<usize> = (0..4).filter(|&k| values[k].is_none()).collect();
        if unknown.len() == 2 {
            let known: f64 = values.iter().flatten().sum();
            let share = (360.0 - known) / 2.0;
            for k in unknown {
                proposals.push(Proposal::new(
                    regions[k],
                    share,
                    format!(
                        "lines {} and {} cross at {}: (360 - {}) / 2",
                        model.symbols.line_label(cross.lines.0).unwrap_or_default(),
                        model.symbols.line_label(cross.lines.1).unwrap_or_default(),
                        model.point_name(cross.vertex),
                        format_number(known)
                    ),
                ));
            }
        }
    }

    proposals
}
