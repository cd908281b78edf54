use std::collections::HashMap;
use std::ops::Range;
use types::{ScheduleConfig, SlotId};

/// The slot grid in day-major order: every period of the first configured
/// day, then the next. A block's occupied span is therefore a contiguous
/// index range that never crosses a day boundary.
#[derive(Clone, Debug)]
pub struct SlotGrid {
    days: Vec<String>,
    periods_per_day: u32,
    slots: Vec<SlotId>,
    index: HashMap<SlotId, usize>,
}

impl SlotGrid {
    pub fn new(config: &ScheduleConfig) -> Self {
        let mut slots =
            Vec::with_capacity(config.days.len() * config.periods_per_day as usize);
        for day in &config.days {
            for period in 1..=config.periods_per_day {
                slots.push(SlotId::new(day, period));
            }
        }
        let index = slots
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i))
            .collect();
        Self {
            days: config.days.clone(),
            periods_per_day: config.periods_per_day,
            slots,
            index,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn periods_per_day(&self) -> u32 {
        self.periods_per_day
    }

    pub fn days(&self) -> &[String] {
        &self.days
    }

    pub fn slot(&self, idx: usize) -> &SlotId {
        &self.slots[idx]
    }

    pub fn slots(&self) -> &[SlotId] {
        &self.slots
    }

    pub fn index_of(&self, slot: &SlotId) -> Option<usize> {
        self.index.get(slot).copied()
    }

    /// 1-based period of a slot index.
    pub fn period_of(&self, idx: usize) -> u32 {
        (idx as u32 % self.periods_per_day) + 1
    }

    pub fn day_of(&self, idx: usize) -> &str {
        &self.days[idx / self.periods_per_day as usize]
    }

    /// The slot indices a block starting at `start` occupies, or `None`
    /// when the span would run past the end of the day.
    pub fn span(&self, start: usize, duration: u32) -> Option<Range<usize>> {
        if duration == 0 || start >= self.slots.len() {
            return None;
        }
        if self.period_of(start) + duration - 1 > self.periods_per_day {
            return None;
        }
        Some(start..start + duration as usize)
    }
}
