use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}
id_newtype!(TeacherId);
id_newtype!(RoomId);
id_newtype!(SubjectId);
id_newtype!(CohortId);
id_newtype!(AssignmentId);
id_newtype!(BlockId);

/// A `(day, period)` pair encoded as `"{day}_{period}"`, periods 1-based.
/// Slot ids are compared by equality only, never by substring.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash)]
#[serde(transparent)]
pub struct SlotId(pub String);

impl SlotId {
    pub fn new(day: &str, period: u32) -> Self {
        Self(format!("{day}_{period}"))
    }

    /// Splits on the last `_` so day labels themselves may contain one.
    pub fn parts(&self) -> Option<(&str, u32)> {
        let (day, period) = self.0.rsplit_once('_')?;
        Some((day, period.parse().ok()?))
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct ScheduleConfig {
    pub days: Vec<String>,
    pub periods_per_day: u32,
    #[serde(default = "default_max_block")]
    pub max_block_duration: u32,
}

fn default_max_block() -> u32 {
    3
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            days: ["Mon", "Tue", "Wed", "Thu", "Fri"]
                .iter()
                .map(|d| d.to_string())
                .collect(),
            periods_per_day: 8,
            max_block_duration: default_max_block(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
    #[serde(default)]
    pub unavailable_slots: Vec<SlotId>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    /// Carried for the callers; the scheduling core does not match it
    /// against cohort sizes.
    pub capacity: u32,
    #[serde(default)]
    pub unavailable_slots: Vec<SlotId>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    pub sks: u32,
    #[serde(default)]
    pub unavailable_slots: Vec<SlotId>,
    /// When present, every block of every assignment of this subject must
    /// start exactly here. Field presence is the predicate: clearing
    /// constraints removes the field rather than emptying it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_slot: Option<SlotId>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct Cohort {
    pub id: CohortId,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct Assignment {
    pub id: AssignmentId,
    pub teacher_id: TeacherId,
    pub subject_id: SubjectId,
    pub cohort_id: CohortId,
    /// Weekly workload in lesson-units. Non-positive workloads are dropped
    /// during block expansion, never rejected.
    #[serde(default = "default_sks")]
    pub sks: i32,
}

fn default_sks() -> i32 {
    2
}

/// One contiguous teaching unit derived from an assignment. Blocks live for
/// a single solve and are discarded with its result.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq)]
pub struct Block {
    pub block_id: BlockId,
    pub teacher_id: TeacherId,
    pub subject_id: SubjectId,
    pub cohort_id: CohortId,
    pub subject_name: String,
    pub cohort_name: String,
    pub duration: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq)]
pub struct Placement {
    pub slot_id: SlotId,
    pub duration: u32,
    pub subject_name: String,
    pub teacher_id: TeacherId,
    pub room_id: RoomId,
    pub cohort_name: String,
    pub block_id: BlockId,
}

/// The immutable per-solve view of the document store.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct Snapshot {
    #[serde(default)]
    pub config: ScheduleConfig,
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub cohorts: Vec<Cohort>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SolverKind {
    #[default]
    Cp,
    Search,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct SolveOptions {
    #[serde(default)]
    pub randomize: bool,
    /// Explicit seed for randomized solves; when absent a fresh one is drawn
    /// per solve.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub time_limit_secs: Option<f64>,
    #[serde(default)]
    pub solver: SolverKind,
}

/// Terminal result of one solve. Either a complete placement for every
/// block, or a failure with a human-readable reason; never partial.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SolveOutcome {
    Success { data: Vec<Placement> },
    Failure { error: String },
}

impl SolveOutcome {
    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn placements(&self) -> Option<&[Placement]> {
        match self {
            Self::Success { data } => Some(data),
            Self::Failure { .. } => None,
        }
    }
}

/// Constraint edit emitted by the command interpreter. Slot lists may carry
/// a bare day label as shorthand for every slot of that day; the store
/// expands shorthand before any snapshot reaches the core.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ConstraintCommand {
    BlockTeacher {
        teacher_id: TeacherId,
        #[serde(default)]
        slot_ids: Vec<String>,
    },
    UnblockTeacher {
        teacher_id: TeacherId,
        #[serde(default)]
        slot_ids: Vec<String>,
    },
    BlockRoom {
        room_id: RoomId,
        #[serde(default)]
        slot_ids: Vec<String>,
    },
    UnblockRoom {
        room_id: RoomId,
        #[serde(default)]
        slot_ids: Vec<String>,
    },
    BlockSubject {
        subject_id: SubjectId,
        #[serde(default)]
        slot_ids: Vec<String>,
    },
    UnblockSubject {
        subject_id: SubjectId,
        #[serde(default)]
        slot_ids: Vec<String>,
    },
    ForceSubject {
        subject_id: SubjectId,
        target_slot_id: SlotId,
    },
    ClearAllConstraints,
    GeneralConstraint {
        #[serde(default)]
        description: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_id_round_trips() {
        let slot = SlotId::new("Mon", 3);
        assert_eq!(slot.0, "Mon_3");
        assert_eq!(slot.parts(), Some(("Mon", 3)));
    }

    #[test]
    fn slot_id_splits_on_last_underscore() {
        let slot = SlotId("extra_day_12".into());
        assert_eq!(slot.parts(), Some(("extra_day", 12)));
        assert_eq!(SlotId("Mon".into()).parts(), None);
        assert_eq!(SlotId("Mon_x".into()).parts(), None);
    }

    #[test]
    fn config_defaults_match_fallback() {
        let cfg: ScheduleConfig = serde_json::from_str(
            r#"{"days":["Mon"],"periods_per_day":4}"#,
        )
        .unwrap();
        assert_eq!(cfg.max_block_duration, 3);

        let snapshot: Snapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(snapshot.config.days.len(), 5);
        assert_eq!(snapshot.config.periods_per_day, 8);
    }

    #[test]
    fn fixed_slot_presence_is_the_predicate() {
        let pinned: Subject = serde_json::from_str(
            r#"{"id":"s1","name":"Math","sks":2,"fixed_slot":"Mon_1"}"#,
        )
        .unwrap();
        assert_eq!(pinned.fixed_slot, Some(SlotId("Mon_1".into())));

        let cleared = Subject {
            fixed_slot: None,
            ..pinned
        };
        let json = serde_json::to_value(&cleared).unwrap();
        assert!(json.get("fixed_slot").is_none());
    }

    #[test]
    fn constraint_commands_deserialize_by_discriminant() {
        let cmd: ConstraintCommand = serde_json::from_str(
            r#"{"action":"block_teacher","teacher_id":"TCH-001","slot_ids":["Mon_1","Tue"]}"#,
        )
        .unwrap();
        assert_eq!(
            cmd,
            ConstraintCommand::BlockTeacher {
                teacher_id: TeacherId("TCH-001".into()),
                slot_ids: vec!["Mon_1".into(), "Tue".into()],
            }
        );

        let cmd: ConstraintCommand =
            serde_json::from_str(r#"{"action":"clear_all_constraints"}"#).unwrap();
        assert_eq!(cmd, ConstraintCommand::ClearAllConstraints);

        let cmd: ConstraintCommand = serde_json::from_str(
            r#"{"action":"force_subject","subject_id":"s9","target_slot_id":"Fri_2"}"#,
        )
        .unwrap();
        assert_eq!(
            cmd,
            ConstraintCommand::ForceSubject {
                subject_id: SubjectId("s9".into()),
                target_slot_id: SlotId("Fri_2".into()),
            }
        );
    }

    #[test]
    fn solve_outcome_is_status_tagged() {
        let failure = SolveOutcome::failure("no rooms defined");
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["error"], "no rooms defined");

        let success = SolveOutcome::Success { data: vec![] };
        let json = serde_json::to_value(&success).unwrap();
        assert_eq!(json["status"], "success");
    }
}
