pub mod seed;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::info;
use types::{ConstraintCommand, Placement, ScheduleConfig, SlotId, Snapshot};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I couldn't find {kind} {id} in the store.")]
    NotFound { kind: &'static str, id: String },
}

/// In-memory document store for the entity snapshot and the generated
/// schedule. Snapshots are handed out by value, so a running solve never
/// observes edits; the schedule is only ever replaced wholesale, and only
/// by callers holding a successful solve.
pub struct ScheduleStore {
    inner: RwLock<StoreInner>,
}

struct StoreInner {
    snapshot: Snapshot,
    schedule: Vec<Placement>,
}

impl ScheduleStore {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                snapshot,
                schedule: Vec::new(),
            }),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.inner.read().snapshot.clone()
    }

    pub fn schedule(&self) -> Vec<Placement> {
        self.inner.read().schedule.clone()
    }

    pub fn replace_snapshot(&self, snapshot: Snapshot) {
        self.inner.write().snapshot = snapshot;
    }

    pub fn replace_schedule(&self, placements: Vec<Placement>) {
        let mut inner = self.inner.write();
        info!(placements = placements.len(), "replacing stored schedule");
        inner.schedule = placements;
    }

    /// Applies one constraint edit and returns a confirmation for the user.
    /// Shorthand day labels in slot lists are expanded here, so the core
    /// only ever sees fully-qualified slot ids.
    pub fn apply(&self, command: &ConstraintCommand) -> Result<String, StoreError> {
        let mut inner = self.inner.write();
        let config = inner.snapshot.config.clone();
        match command {
            ConstraintCommand::BlockTeacher {
                teacher_id,
                slot_ids,
            } => {
                let slots = expand_slot_specs(&config, slot_ids);
                let teacher = inner
                    .snapshot
                    .teachers
                    .iter_mut()
                    .find(|t| &t.id == teacher_id)
                    .ok_or_else(|| not_found("teacher", &teacher_id.0))?;
                block_slots(&mut teacher.unavailable_slots, &slots);
                Ok(format!("Blocked {} for {} slots.", teacher.name, slots.len()))
            }
            ConstraintCommand::UnblockTeacher {
                teacher_id,
                slot_ids,
            } => {
                let slots = expand_slot_specs(&config, slot_ids);
                let teacher = inner
                    .snapshot
                    .teachers
                    .iter_mut()
                    .find(|t| &t.id == teacher_id)
                    .ok_or_else(|| not_found("teacher", &teacher_id.0))?;
                unblock_slots(&mut teacher.unavailable_slots, &slots);
                Ok(format!("Freed up {} on {} slots.", teacher.name, slots.len()))
            }
            ConstraintCommand::BlockRoom { room_id, slot_ids } => {
                let slots = expand_slot_specs(&config, slot_ids);
                let room = inner
                    .snapshot
                    .rooms
                    .iter_mut()
                    .find(|r| &r.id == room_id)
                    .ok_or_else(|| not_found("room", &room_id.0))?;
                block_slots(&mut room.unavailable_slots, &slots);
                Ok(format!("Closed {} for {} slots.", room.name, slots.len()))
            }
            ConstraintCommand::UnblockRoom { room_id, slot_ids } => {
                let slots = expand_slot_specs(&config, slot_ids);
                let room = inner
                    .snapshot
                    .rooms
                    .iter_mut()
                    .find(|r| &r.id == room_id)
                    .ok_or_else(|| not_found("room", &room_id.0))?;
                unblock_slots(&mut room.unavailable_slots, &slots);
                Ok(format!("Opened {} again.", room.name))
            }
            ConstraintCommand::BlockSubject {
                subject_id,
                slot_ids,
            } => {
                let slots = expand_slot_specs(&config, slot_ids);
                let subject = inner
                    .snapshot
                    .subjects
                    .iter_mut()
                    .find(|s| &s.id == subject_id)
                    .ok_or_else(|| not_found("subject", &subject_id.0))?;
                block_slots(&mut subject.unavailable_slots, &slots);
                Ok(format!(
                    "Restricted {} on {} slots.",
                    subject.name,
                    slots.len()
                ))
            }
            ConstraintCommand::UnblockSubject {
                subject_id,
                slot_ids,
            } => {
                let slots = expand_slot_specs(&config, slot_ids);
                let subject = inner
                    .snapshot
                    .subjects
                    .iter_mut()
                    .find(|s| &s.id == subject_id)
                    .ok_or_else(|| not_found("subject", &subject_id.0))?;
                unblock_slots(&mut subject.unavailable_slots, &slots);
                Ok(format!("Restrictions removed for {}.", subject.name))
            }
            ConstraintCommand::ForceSubject {
                subject_id,
                target_slot_id,
            } => {
                let subject = inner
                    .snapshot
                    .subjects
                    .iter_mut()
                    .find(|s| &s.id == subject_id)
                    .ok_or_else(|| not_found("subject", &subject_id.0))?;
                // Forcing wins over the subject's own blocks.
                subject.fixed_slot = Some(target_slot_id.clone());
                subject.unavailable_slots.clear();
                Ok(format!(
                    "Pinned {} to start at {}.",
                    subject.name, target_slot_id
                ))
            }
            ConstraintCommand::ClearAllConstraints => {
                for teacher in &mut inner.snapshot.teachers {
                    teacher.unavailable_slots.clear();
                }
                for room in &mut inner.snapshot.rooms {
                    room.unavailable_slots.clear();
                }
                for subject in &mut inner.snapshot.subjects {
                    subject.unavailable_slots.clear();
                    // Removed, not emptied: the field's presence is the pin.
                    subject.fixed_slot = None;
                }
                info!("cleared all constraints");
                Ok("Cleared every restriction for teachers, rooms, and subjects.".into())
            }
            ConstraintCommand::GeneralConstraint { description } => {
                info!(%description, "general constraint noted, nothing to apply");
                Ok("I've noted that constraint down.".into())
            }
        }
    }
}

fn not_found(kind: &'static str, id: &str) -> StoreError {
    StoreError::NotFound {
        kind,
        id: id.to_string(),
    }
}

/// Expands shorthand slot specs: a spec equal to a configured day label
/// stands for every period of that day; anything else is taken as a full
/// slot id. Day matching is label equality, never length.
pub fn expand_slot_specs(config: &ScheduleConfig, specs: &[String]) -> Vec<SlotId> {
    let mut out: Vec<SlotId> = Vec::new();
    for spec in specs {
        if config.days.iter().any(|d| d == spec) {
            for period in 1..=config.periods_per_day {
                push_unique(&mut out, SlotId::new(spec, period));
            }
        } else {
            push_unique(&mut out, SlotId(spec.clone()));
        }
    }
    out
}

fn push_unique(list: &mut Vec<SlotId>, slot: SlotId) {
    if !list.contains(&slot) {
        list.push(slot);
    }
}

fn block_slots(current: &mut Vec<SlotId>, add: &[SlotId]) {
    for slot in add {
        if !current.contains(slot) {
            current.push(slot.clone());
        }
    }
}

fn unblock_slots(current: &mut Vec<SlotId>, remove: &[SlotId]) {
    current.retain(|slot| !remove.contains(slot));
}
