//! Roll evaluator: uniform dice, per-die results kept in draw order.

use std::fmt;
use std::str::FromStr;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

enum Source {
    Rng(ChaCha8Rng),
    /// Replays fixed faces in order, wrapping around; for tests.
    Scripted { faces: Vec<u32>, next: usize },
}

pub struct Dice {
    source: Source,
}

impl Dice {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            source: Source::Rng(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    /// Seeded from OS entropy; what interactive rolling uses.
    pub fn from_entropy() -> Self {
        Self {
            source: Source::Rng(ChaCha8Rng::from_entropy()),
        }
    }

    /// Replays `faces` in order (cycling). Values are clamped into the
    /// die's range so a record never holds an impossible face.
    pub fn from_scripted(faces: Vec<u32>) -> Self {
        Self {
            source: Source::Scripted { faces, next: 0 },
        }
    }

    fn draw(&mut self, faces: u32) -> u32 {
        match &mut self.source {
            Source::Rng(rng) => rng.gen_range(1..=faces),
            Source::Scripted { faces: script, next } => {
                if script.is_empty() {
                    return 1;
                }
                let value = script[*next % script.len()];
                *next += 1;
                value.clamp(1, faces)
            }
        }
    }

    pub fn d20(&mut self) -> u32 {
        self.draw(20)
    }

    /// Roll `count` dice of `faces` sides and add `modifier`. A total that
    /// does not fit in `i32` is `RollOutOfRange`, never a wrapped value.
    pub fn roll(&mut self, count: u32, faces: u32, modifier: i32) -> EngineResult<RollRecord> {
        if count < 1 || faces < 2 {
            return Err(EngineError::InvalidDiceSpec { count, faces });
        }
        let results: Vec<u32> = (0..count).map(|_| self.draw(faces)).collect();
        let sum: i128 = results.iter().map(|&r| i128::from(r)).sum();
        let total = i32::try_from(sum + i128::from(modifier)).map_err(|_| {
            EngineError::RollOutOfRange {
                count,
                faces,
                modifier,
            }
        })?;
        Ok(RollRecord {
            faces,
            count,
            modifier,
            total,
            results,
        })
    }
}

impl Default for Dice {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// Roll with a fresh entropy-seeded generator.
pub fn roll(count: u32, faces: u32, modifier: i32) -> EngineResult<RollRecord> {
    Dice::from_entropy().roll(count, faces, modifier)
}

/// Outcome of one roll. Crit detection is left to callers, who can read
/// the raw faces in `results`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollRecord {
    pub faces: u32,
    pub count: u32,
    pub modifier: i32,
    pub results: Vec<u32>,
    pub total: i32,
}

impl RollRecord {
    pub fn spec(&self) -> DiceSpec {
        DiceSpec {
            count: self.count,
            faces: self.faces,
            modifier: self.modifier,
        }
    }
}

impl fmt::Display for RollRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let faces = self
            .results
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}: [{}] = {}", self.spec(), faces, self.total)
    }
}

/// Dice notation such as `d20`, `3d6+2`, `2d8-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceSpec {
    pub count: u32,
    pub faces: u32,
    pub modifier: i32,
}

impl DiceSpec {
    pub fn roll(&self, dice: &mut Dice) -> EngineResult<RollRecord> {
        dice.roll(self.count, self.faces, self.modifier)
    }
}

impl FromStr for DiceSpec {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || EngineError::InvalidDiceNotation(s.to_string());
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let compact = compact.to_lowercase();

        let (count, rest) = compact.split_once('d').ok_or_else(bad)?;
        let count = if count.is_empty() {
            1
        } else {
            count.parse::<u32>().map_err(|_| bad())?
        };

        let (faces, modifier) = match rest.find(['+', '-']) {
            Some(idx) => {
                let (faces, m) = rest.split_at(idx);
                (faces, m.parse::<i32>().map_err(|_| bad())?)
            }
            None => (rest, 0),
        };
        let faces = faces.parse::<u32>().map_err(|_| bad())?;

        if count < 1 || faces < 2 {
            return Err(EngineError::InvalidDiceSpec { count, faces });
        }
        Ok(DiceSpec {
            count,
            faces,
            modifier,
        })
    }
}

impl fmt::Display for DiceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.faces)?;
        if self.modifier != 0 {
            write!(f, "{:+}", self.modifier)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notation_parses() {
        assert_eq!(
            "3d6+2".parse::<DiceSpec>().unwrap(),
            DiceSpec { count: 3, faces: 6, modifier: 2 }
        );
        assert_eq!(
            "d20".parse::<DiceSpec>().unwrap(),
            DiceSpec { count: 1, faces: 20, modifier: 0 }
        );
        assert_eq!(
            " 2D8 - 1 ".parse::<DiceSpec>().unwrap(),
            DiceSpec { count: 2, faces: 8, modifier: -1 }
        );
    }

    #[test]
    fn notation_rejects_garbage() {
        assert!(matches!(
            "fireball".parse::<DiceSpec>(),
            Err(EngineError::InvalidDiceNotation(_))
        ));
        assert!(matches!(
            "2d".parse::<DiceSpec>(),
            Err(EngineError::InvalidDiceNotation(_))
        ));
        assert_eq!(
            "0d6".parse::<DiceSpec>(),
            Err(EngineError::InvalidDiceSpec { count: 0, faces: 6 })
        );
    }

    #[test]
    fn notation_display() {
        assert_eq!(DiceSpec { count: 1, faces: 20, modifier: 0 }.to_string(), "1d20");
        assert_eq!(DiceSpec { count: 2, faces: 8, modifier: -1 }.to_string(), "2d8-1");
    }

    #[test]
    fn scripted_faces_are_clamped() {
        let mut dice = Dice::from_scripted(vec![9, 0]);
        let rec = dice.roll(2, 6, 0).unwrap();
        assert_eq!(rec.results, vec![6, 1]);
    }
}
