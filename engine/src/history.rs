use std::collections::VecDeque;

use crate::dice::RollRecord;

pub const DEFAULT_HISTORY: usize = 10;

/// Most recent rolls, newest first. Oldest entries fall off past capacity.
#[derive(Debug, Clone)]
pub struct RollHistory {
    capacity: usize,
    rolls: VecDeque<RollRecord>,
}

impl RollHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            rolls: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, record: RollRecord) {
        if self.capacity == 0 {
            return;
        }
        self.rolls.push_front(record);
        self.rolls.truncate(self.capacity);
    }

    pub fn latest(&self) -> Option<&RollRecord> {
        self.rolls.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RollRecord> {
        self.rolls.iter()
    }

    pub fn len(&self) -> usize {
        self.rolls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rolls.is_empty()
    }

    pub fn clear(&mut self) {
        self.rolls.clear();
    }
}

impl Default for RollHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY)
    }
}
