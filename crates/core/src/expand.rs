use std::collections::HashMap;
use types::{Assignment, Block, BlockId, Cohort, Subject};

/// Splits every assignment's weekly workload into schedulable blocks of at
/// most `max_block` lesson-units, greedily: `min(max_block, remaining)`
/// until nothing remains. Assignments with a non-positive workload are
/// dropped silently.
pub fn expand_assignments(
    assignments: &[Assignment],
    subjects: &[Subject],
    cohorts: &[Cohort],
    max_block: u32,
) -> Vec<Block> {
    let max_block = max_block.max(1);
    let subject_names: HashMap<&str, &str> = subjects
        .iter()
        .map(|s| (s.id.0.as_str(), s.name.as_str()))
        .collect();
    let cohort_names: HashMap<&str, &str> = cohorts
        .iter()
        .map(|c| (c.id.0.as_str(), c.name.as_str()))
        .collect();

    let mut blocks = Vec::new();
    for assignment in assignments {
        if assignment.sks <= 0 {
            continue;
        }
        let subject_name = subject_names
            .get(assignment.subject_id.0.as_str())
            .copied()
            .unwrap_or("Unknown Subject");
        let cohort_name = cohort_names
            .get(assignment.cohort_id.0.as_str())
            .copied()
            .unwrap_or("Unknown Cohort");

        let mut remaining = assignment.sks as u32;
        let mut part = 1u32;
        while remaining > 0 {
            let duration = remaining.min(max_block);
            blocks.push(Block {
                block_id: BlockId(format!("{}_p{part}", assignment.id)),
                teacher_id: assignment.teacher_id.clone(),
                subject_id: assignment.subject_id.clone(),
                cohort_id: assignment.cohort_id.clone(),
                subject_name: subject_name.to_string(),
                cohort_name: cohort_name.to_string(),
                duration,
            });
            remaining -= duration;
            part += 1;
        }
    }
    blocks
}
