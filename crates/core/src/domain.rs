use std::collections::{HashMap, HashSet};
use std::ops::Range;
use tracing::warn;
use types::{Block, Room, SlotId, Snapshot};

use crate::grid::SlotGrid;

/// One admissible decision point for a block: a room index and a start
/// slot index.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Candidate {
    pub room: usize,
    pub start: usize,
}

/// The solver-facing model: the grid, the block list, and per block the set
/// of admissible `(room, start)` pairs. A block with an empty domain never
/// reaches a solver; pre-diagnosis reports it first.
#[derive(Clone, Debug)]
pub struct PlacementProblem {
    pub grid: SlotGrid,
    pub rooms: Vec<Room>,
    pub blocks: Vec<Block>,
    pub domains: Vec<Vec<Candidate>>,
    /// Per block, the fixed slot of its subject, if pinned.
    pub pins: Vec<Option<SlotId>>,
}

impl PlacementProblem {
    /// Slot indices covered by an admitted candidate. Admission already
    /// checked the span against the day boundary.
    pub fn occupied(&self, block: usize, start: usize) -> Range<usize> {
        start..start + self.blocks[block].duration as usize
    }

    pub fn candidate_count(&self) -> usize {
        self.domains.iter().map(Vec::len).sum()
    }
}

/// Enumerates every admissible `(room, start)` pair per block.
///
/// A pinned subject contributes exactly its fixed slot as start candidate;
/// the pin overrides the subject's own unavailability but never the
/// teacher's or the room's. A pin that is not in the grid, or whose span
/// would cross the day boundary, is discarded with a warning and leaves the
/// domain empty for diagnosis.
pub fn build_problem(snapshot: &Snapshot, grid: SlotGrid, blocks: Vec<Block>) -> PlacementProblem {
    let teacher_blocked: HashMap<&str, HashSet<&str>> = snapshot
        .teachers
        .iter()
        .map(|t| {
            (
                t.id.0.as_str(),
                t.unavailable_slots.iter().map(|s| s.0.as_str()).collect(),
            )
        })
        .collect();
    let subject_blocked: HashMap<&str, HashSet<&str>> = snapshot
        .subjects
        .iter()
        .map(|s| {
            (
                s.id.0.as_str(),
                s.unavailable_slots.iter().map(|s| s.0.as_str()).collect(),
            )
        })
        .collect();
    let subject_pin: HashMap<&str, &SlotId> = snapshot
        .subjects
        .iter()
        .filter_map(|s| s.fixed_slot.as_ref().map(|f| (s.id.0.as_str(), f)))
        .collect();
    let room_blocked: Vec<HashSet<&str>> = snapshot
        .rooms
        .iter()
        .map(|r| r.unavailable_slots.iter().map(|s| s.0.as_str()).collect())
        .collect();

    let no_blocks: HashSet<&str> = HashSet::new();
    let mut domains = Vec::with_capacity(blocks.len());
    let mut pins = Vec::with_capacity(blocks.len());

    for block in &blocks {
        let pin = subject_pin.get(block.subject_id.0.as_str()).copied();
        let starts: Vec<usize> = match pin {
            Some(fixed) => {
                let admitted = grid
                    .index_of(fixed)
                    .filter(|&i| grid.span(i, block.duration).is_some());
                match admitted {
                    Some(i) => vec![i],
                    None => {
                        warn!(
                            block = %block.block_id,
                            slot = %fixed,
                            "fixed slot is outside the timetable grid"
                        );
                        Vec::new()
                    }
                }
            }
            None => (0..grid.len())
                .filter(|&i| grid.span(i, block.duration).is_some())
                .collect(),
        };

        let teacher_busy = teacher_blocked
            .get(block.teacher_id.0.as_str())
            .unwrap_or(&no_blocks);
        let subject_busy = if pin.is_some() {
            &no_blocks
        } else {
            subject_blocked
                .get(block.subject_id.0.as_str())
                .unwrap_or(&no_blocks)
        };

        let mut domain = Vec::new();
        for &start in &starts {
            let Some(span) = grid.span(start, block.duration) else {
                continue;
            };
            let occupied: Vec<&str> = span.map(|i| grid.slot(i).0.as_str()).collect();
            if occupied.iter().any(|s| teacher_busy.contains(s)) {
                continue;
            }
            if occupied.iter().any(|s| subject_busy.contains(s)) {
                continue;
            }
            for (room, blocked) in room_blocked.iter().enumerate() {
                if occupied.iter().any(|s| blocked.contains(s)) {
                    continue;
                }
                domain.push(Candidate { room, start });
            }
        }
        domains.push(domain);
        pins.push(pin.cloned());
    }

    PlacementProblem {
        grid,
        rooms: snapshot.rooms.clone(),
        blocks,
        domains,
        pins,
    }
}
