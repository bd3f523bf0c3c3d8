//! Integration tests for the dice roller

use delver_foundation::Dice;
use proptest::prelude::*;

// =============================================================================
// Scripted Rolls
// =============================================================================

#[test]
fn scripted_rolls_come_first_in_order() {
    let mut dice = Dice::seeded(1);
    dice.script([49, 69, 3]);
    assert_eq!(dice.percent(), 49);
    assert_eq!(dice.roll(2, 6), 69);
    assert_eq!(dice.roll(1, 4), 3);
    assert_eq!(dice.scripted_remaining(), 0);
}

#[test]
fn scripted_rolls_ignore_the_dice_asked_for() {
    let mut dice = Dice::seeded(1);
    dice.script([500]);
    assert_eq!(dice.roll(1, 6), 500);
}

#[test]
fn clearing_the_script() {
    let mut dice = Dice::seeded(1);
    dice.script([1, 2, 3]);
    dice.clear_script();
    assert_eq!(dice.scripted_remaining(), 0);
}

#[test]
fn flavor_does_not_eat_scripted_rolls() {
    let mut dice = Dice::seeded(1);
    dice.script([7]);
    let _ = dice.flavor_index(5);
    assert_eq!(dice.scripted_remaining(), 1);
    assert_eq!(dice.roll(1, 10), 7);
}

// =============================================================================
// Edge Cases
// =============================================================================

#[test]
fn degenerate_dice() {
    let mut dice = Dice::seeded(9);
    assert_eq!(dice.roll(1, 1), 1);
    assert_eq!(dice.roll(4, 0), 0);
    assert_eq!(dice.roll(3, -1), -3);
    assert_eq!(dice.roll(0, 6), 0);
}

#[test]
fn random_index_uses_one_based_scripts() {
    let mut dice = Dice::seeded(2);
    dice.script([1, 3, 99]);
    assert_eq!(dice.random_index(3), Some(0));
    assert_eq!(dice.random_index(3), Some(2));
    assert_eq!(dice.random_index(3), Some(2));
    assert_eq!(dice.random_index(0), None);
}

#[test]
fn same_seed_same_rolls() {
    let mut a = Dice::seeded(42);
    let mut b = Dice::seeded(42);
    let left: Vec<i32> = (0..20).map(|_| a.roll(2, 8)).collect();
    let right: Vec<i32> = (0..20).map(|_| b.roll(2, 8)).collect();
    assert_eq!(left, right);
}

proptest! {
    #[test]
    fn negative_sides_stay_negative(seed in any::<u64>(), sides in 1..20i32) {
        let mut dice = Dice::seeded(seed);
        let rolled = dice.roll(1, -sides);
        prop_assert!((-sides..=-1).contains(&rolled));
    }

    #[test]
    fn totals_stay_in_range(seed in any::<u64>(), count in 1..6i32, sides in 1..20i32) {
        let mut dice = Dice::seeded(seed);
        let rolled = dice.roll(count, sides);
        prop_assert!((count..=count * sides).contains(&rolled));
    }
}
