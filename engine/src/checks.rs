use serde::{Deserialize, Serialize};

use crate::dice::{Dice, RollRecord};

/// What the kept d20 face was, independent of the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Natural {
    NaturalMax,
    NaturalMin,
    Normal,
}

impl Natural {
    /// Classify a single-die record. Multi-die records are always `Normal`.
    pub fn of(record: &RollRecord) -> Natural {
        match record.results.as_slice() {
            [face] if *face == record.faces => Natural::NaturalMax,
            [1] => Natural::NaturalMin,
            _ => Natural::Normal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub roll: RollRecord,
    pub dc: i32,
    pub passed: bool,
    pub natural: Natural,
}

impl CheckResult {
    pub fn total(&self) -> i32 {
        self.roll.total
    }
}

/// Roll a d20, add modifier, compare vs DC. The total saturates at the
/// `i32` bounds.
pub fn check(dice: &mut Dice, modifier: i32, dc: i32) -> CheckResult {
    let face = dice.d20();
    let roll = RollRecord {
        faces: 20,
        count: 1,
        modifier,
        results: vec![face],
        total: modifier.saturating_add(face as i32),
    };
    CheckResult {
        passed: roll.total >= dc,
        natural: Natural::of(&roll),
        dc,
        roll,
    }
}
