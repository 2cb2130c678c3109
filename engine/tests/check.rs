use pathkeeper::{Dice, Natural, ability_mod, check, proficiency_bonus, EngineError};
use proptest::prelude::*;

#[test]
fn ability_mod_rounds_down() {
    assert_eq!(ability_mod(1), -5);
    assert_eq!(ability_mod(8), -1);
    assert_eq!(ability_mod(9), -1);
    assert_eq!(ability_mod(10), 0);
    assert_eq!(ability_mod(11), 0);
    assert_eq!(ability_mod(12), 1);
    assert_eq!(ability_mod(18), 4);
}

#[test]
fn ability_mod_is_total_at_the_extremes() {
    assert_eq!(ability_mod(i32::MIN), -1_073_741_829);
    assert_eq!(ability_mod(i32::MIN + 1), -1_073_741_829);
    assert_eq!(ability_mod(i32::MAX), 1_073_741_818);
}

#[test]
fn proficiency_examples() {
    assert_eq!(proficiency_bonus(2, 5), Ok(7));
    assert_eq!(proficiency_bonus(8, 20), Ok(28));
    assert_eq!(proficiency_bonus(0, 20), Ok(0));
    assert_eq!(proficiency_bonus(5, 1), Err(EngineError::InvalidProficiencyRank(5)));
    assert_eq!(proficiency_bonus(-2, 1), Err(EngineError::InvalidProficiencyRank(-2)));
}

proptest! {
    #[test]
    fn ability_mod_is_floor_division(score in any::<i32>()) {
        let expected = ((f64::from(score) - 10.0) / 2.0).floor() as i64;
        prop_assert_eq!(i64::from(ability_mod(score)), expected);
    }

    #[test]
    fn untrained_never_adds_level(level in 1u32..=20) {
        prop_assert_eq!(proficiency_bonus(0, level), Ok(0));
    }

    #[test]
    fn trained_adds_rank_and_level(rank in prop::sample::select(vec![2, 4, 6, 8]), level in 1u32..=20) {
        prop_assert_eq!(proficiency_bonus(rank, level), Ok(rank + level as i32));
    }
}

#[test]
fn deterministic_check_total_consistent() {
    let mut dice = Dice::from_seed(123);
    let res = check(&mut dice, 2, 13);
    assert_eq!(res.passed, res.total() >= res.dc);
    assert_eq!(res.total(), res.roll.results[0] as i32 + 2);
}

#[test]
fn natural_twenty_and_one_are_flagged() {
    let mut dice = Dice::from_scripted(vec![20, 1, 11]);
    assert_eq!(check(&mut dice, 0, 30).natural, Natural::NaturalMax);
    let low = check(&mut dice, 40, 10);
    assert_eq!(low.natural, Natural::NaturalMin);
    assert!(low.passed, "natural 1 only classifies, it does not force a fail");
    assert_eq!(check(&mut dice, 0, 10).natural, Natural::Normal);
}

#[test]
fn extreme_modifiers_saturate_instead_of_wrapping() {
    let mut dice = Dice::from_scripted(vec![20, 1]);
    let high = check(&mut dice, i32::MAX - 5, i32::MAX);
    assert_eq!(high.total(), i32::MAX);
    assert!(high.passed);
    let low = check(&mut dice, i32::MIN, i32::MIN + 2);
    assert_eq!(low.total(), i32::MIN + 1);
    assert!(!low.passed);
}
