use std::collections::HashSet;
use thiserror::Error;
use tracing::warn;
use types::{SlotId, Snapshot};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid snapshot: {0}")]
    Msg(String),
}

/// Rejects snapshots the core cannot schedule: grid misconfiguration,
/// missing rooms or assignments, duplicate ids, and assignments whose
/// foreign keys do not resolve. Unavailability entries outside the grid are
/// tolerated with a warning; they can never intersect an occupied span.
pub fn validate(snapshot: &Snapshot) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();
    let cfg = &snapshot.config;

    if cfg.days.is_empty() {
        errors.push("no days configured".into());
    }
    if cfg.periods_per_day == 0 {
        errors.push("periods_per_day must be at least 1".into());
    }
    if cfg.max_block_duration == 0 {
        errors.push("max_block_duration must be at least 1".into());
    }
    if snapshot.rooms.is_empty() {
        errors.push("no rooms defined".into());
    }
    if snapshot.assignments.is_empty() {
        errors.push("no assignments found".into());
    }

    {
        let mut seen = HashSet::new();
        for day in &cfg.days {
            if !seen.insert(day.as_str()) {
                errors.push(format!("duplicate day label: {day}"));
            }
        }
    }

    fn chk_unique<'a>(
        name: &str,
        ids: impl Iterator<Item = &'a str>,
        errors: &mut Vec<String>,
    ) {
        let mut seen = HashSet::new();
        for id in ids {
            if !seen.insert(id) {
                errors.push(format!("duplicate {name} id: {id}"));
            }
        }
    }
    chk_unique(
        "teacher",
        snapshot.teachers.iter().map(|x| x.id.0.as_str()),
        &mut errors,
    );
    chk_unique(
        "room",
        snapshot.rooms.iter().map(|x| x.id.0.as_str()),
        &mut errors,
    );
    chk_unique(
        "subject",
        snapshot.subjects.iter().map(|x| x.id.0.as_str()),
        &mut errors,
    );
    chk_unique(
        "cohort",
        snapshot.cohorts.iter().map(|x| x.id.0.as_str()),
        &mut errors,
    );
    chk_unique(
        "assignment",
        snapshot.assignments.iter().map(|x| x.id.0.as_str()),
        &mut errors,
    );

    let teachers: HashSet<&str> = snapshot.teachers.iter().map(|t| t.id.0.as_str()).collect();
    let subjects: HashSet<&str> = snapshot.subjects.iter().map(|s| s.id.0.as_str()).collect();
    let cohorts: HashSet<&str> = snapshot.cohorts.iter().map(|c| c.id.0.as_str()).collect();
    for a in &snapshot.assignments {
        if !teachers.contains(a.teacher_id.0.as_str()) {
            errors.push(format!(
                "assignment {} references missing teacher {}",
                a.id, a.teacher_id
            ));
        }
        if !subjects.contains(a.subject_id.0.as_str()) {
            errors.push(format!(
                "assignment {} references missing subject {}",
                a.id, a.subject_id
            ));
        }
        if !cohorts.contains(a.cohort_id.0.as_str()) {
            errors.push(format!(
                "assignment {} references missing cohort {}",
                a.id, a.cohort_id
            ));
        }
    }

    if !cfg.days.is_empty() && cfg.periods_per_day > 0 {
        let mut grid_slots: HashSet<String> = HashSet::new();
        for day in &cfg.days {
            for period in 1..=cfg.periods_per_day {
                grid_slots.insert(SlotId::new(day, period).0);
            }
        }
        let warn_outside = |owner: &str, id: &str, slots: &[SlotId]| {
            for slot in slots {
                if !grid_slots.contains(&slot.0) {
                    warn!(%owner, %id, slot = %slot, "unavailable slot is outside the grid");
                }
            }
        };
        for t in &snapshot.teachers {
            warn_outside("teacher", &t.id.0, &t.unavailable_slots);
        }
        for r in &snapshot.rooms {
            warn_outside("room", &r.id.0, &r.unavailable_slots);
        }
        for s in &snapshot.subjects {
            warn_outside("subject", &s.id.0, &s.unavailable_slots);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Msg(errors.join("; ")))
    }
}
