use pathkeeper::{Dice, DiceSpec, EngineError, RollHistory, roll};
use proptest::prelude::*;

#[test]
fn three_d6_plus_two_stays_in_range() {
    for _ in 0..500 {
        let rec = roll(3, 6, 2).unwrap();
        assert!((5..=20).contains(&rec.total), "total {}", rec.total);
        assert_eq!(rec.results.len(), 3);
        assert!(rec.results.iter().all(|r| (1..=6).contains(r)));
        assert_eq!(rec.total, rec.results.iter().sum::<u32>() as i32 + 2);
    }
}

#[test]
fn every_face_shows_up() {
    let mut dice = Dice::from_seed(7);
    let rec = dice.roll(600, 6, 0).unwrap();
    for face in 1..=6 {
        assert!(rec.results.contains(&face), "face {face} never rolled");
    }
}

#[test]
fn invalid_specs_are_rejected() {
    assert_eq!(
        roll(0, 6, 0),
        Err(EngineError::InvalidDiceSpec { count: 0, faces: 6 })
    );
    assert_eq!(
        roll(1, 1, 0),
        Err(EngineError::InvalidDiceSpec { count: 1, faces: 1 })
    );
}

#[test]
fn seeded_dice_repeat() {
    let a = Dice::from_seed(99).roll(4, 8, 1).unwrap();
    let b = Dice::from_seed(99).roll(4, 8, 1).unwrap();
    assert_eq!(a, b);
}

#[test]
fn scripted_rolls_keep_draw_order() {
    let mut dice = Dice::from_scripted(vec![4, 1, 6]);
    let rec = "3d6+2".parse::<DiceSpec>().unwrap().roll(&mut dice).unwrap();
    assert_eq!(rec.results, vec![4, 1, 6]);
    assert_eq!(rec.total, 13);
    assert_eq!(rec.to_string(), "3d6+2: [4, 1, 6] = 13");
}

#[test]
fn history_keeps_newest_first_and_caps() {
    let mut dice = Dice::from_scripted(vec![1, 2, 3, 4, 5, 6]);
    let mut history = RollHistory::with_capacity(5);
    for _ in 0..6 {
        history.push(dice.roll(1, 6, 0).unwrap());
    }
    assert_eq!(history.len(), 5);
    assert_eq!(history.latest().unwrap().results, vec![6]);
    let oldest = history.iter().last().unwrap();
    assert_eq!(oldest.results, vec![2]);
}

proptest! {
    #[test]
    fn totals_stay_within_bounds(
        seed in any::<u64>(),
        count in 1u32..=10,
        faces in 2u32..=100,
        modifier in -20i32..=20,
    ) {
        let rec = Dice::from_seed(seed).roll(count, faces, modifier).unwrap();
        let lo = count as i32 + modifier;
        let hi = (count * faces) as i32 + modifier;
        prop_assert!(rec.total >= lo && rec.total <= hi);
        prop_assert_eq!(rec.results.len(), count as usize);
    }
}

#[test]
fn totals_past_i32_are_an_error() {
    let mut dice = Dice::from_scripted(vec![u32::MAX]);
    assert_eq!(
        dice.roll(1, u32::MAX, 0),
        Err(EngineError::RollOutOfRange { count: 1, faces: u32::MAX, modifier: 0 })
    );

    let mut dice = Dice::from_scripted(vec![6]);
    assert_eq!(
        dice.roll(1, 6, i32::MAX),
        Err(EngineError::RollOutOfRange { count: 1, faces: 6, modifier: i32::MAX })
    );

    let mut dice = Dice::from_scripted(vec![6]);
    let rec = dice.roll(1, 6, i32::MAX - 6).unwrap();
    assert_eq!(rec.total, i32::MAX);
    assert_eq!(i64::from(rec.total), i64::from(rec.results[0]) + i64::from(rec.modifier));
}
