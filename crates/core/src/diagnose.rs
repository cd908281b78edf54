use types::Teacher;

use crate::domain::PlacementProblem;

/// Scans the block domains before any solver runs and turns the first empty
/// one into an actionable reason. CP backends only report an
/// undifferentiated conflict; an empty single-block domain is the common
/// case worth naming.
pub fn first_empty_domain(problem: &PlacementProblem, teachers: &[Teacher]) -> Option<String> {
    for (i, domain) in problem.domains.iter().enumerate() {
        if !domain.is_empty() {
            continue;
        }
        let block = &problem.blocks[i];
        let reason = match &problem.pins[i] {
            Some(fixed) => format!(
                "'{}' ({} hrs) has 0 valid slots. It is FORCED to {}, but the teacher or room \
                 is blocked there or the pin is outside the grid.",
                block.subject_name, block.duration, fixed
            ),
            None => {
                let teacher = teachers
                    .iter()
                    .find(|t| t.id == block.teacher_id)
                    .map(|t| t.name.as_str())
                    .unwrap_or("unknown");
                format!(
                    "'{}' ({} hrs) has 0 valid slots. Teacher {} may be over-blocked, or no \
                     contiguous window of length {} is free.",
                    block.subject_name, block.duration, teacher, block.duration
                )
            }
        };
        return Some(reason);
    }
    None
}
