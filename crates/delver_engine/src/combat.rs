//! Combat math.
//!
//! Everything here is a pure function of its inputs: the dice are rolled by
//! the caller and passed in. The game applies the outcomes.

use crate::config::CombatRules;

/// What the attacker brings to a to-hit calculation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Attacker {
    /// Raw agility.
    pub agility: i32,

    /// Speed spell multiplier.
    pub speed_multiplier: i32,

    /// Base to-hit percentage.
    pub attack_odds: i32,

    /// To-hit penalty of worn armor.
    pub armor_factor: i32,

    /// Weapon proficiency. The player only.
    pub proficiency: Option<i32>,

    /// Intrinsic odds of the ready weapon.
    pub weapon_odds: Option<i32>,
}

/// What the defender brings to a to-hit calculation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Defender {
    /// Raw agility.
    pub agility: i32,

    /// Speed spell multiplier.
    pub speed_multiplier: i32,

    /// Subtracted from the attacker's odds.
    pub defense_bonus: i32,
}

/// Chance, in percent, that a blow lands.
#[must_use]
pub fn to_hit(rules: &CombatRules, attacker: &Attacker, defender: &Defender) -> i32 {
    let agility = (attacker.agility * attacker.speed_multiplier).min(rules.agility_cap);
    let dodge = (defender.agility * defender.speed_multiplier).min(rules.agility_cap);
    let mut odds = 2 * (agility - dodge) + attacker.attack_odds
        - attacker.armor_factor
        - defender.defense_bonus;
    if let Some(ability) = attacker.proficiency {
        odds += ability.min(rules.proficiency_cap);
    }
    if let Some(weapon) = attacker.weapon_odds {
        odds += weapon.min(rules.weapon_odds_cap);
    }
    odds.clamp(rules.min_to_hit, rules.max_to_hit)
}

/// How a hit roll turned out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitRoll {
    /// Lands with a critical follow-up.
    Critical,
    /// Lands.
    Hit,
    /// Misses.
    Miss,
    /// Misses and something goes wrong with the weapon.
    Fumble,
}

impl HitRoll {
    /// Critical or plain hit.
    #[must_use]
    pub const fn lands(self) -> bool {
        matches!(self, Self::Critical | Self::Hit)
    }
}

/// Classifies a 1d100 hit roll.
///
/// Fumbles win over everything for armed attackers; natural weapons just
/// miss on those rolls. Odds of zero or less turn off critical hits.
#[must_use]
pub const fn classify(rules: &CombatRules, roll: i32, odds: i32, armed: bool) -> HitRoll {
    if roll >= rules.fumble_threshold {
        if armed {
            return HitRoll::Fumble;
        }
        return HitRoll::Miss;
    }
    if roll <= rules.critical_threshold && odds > 0 {
        return HitRoll::Critical;
    }
    if roll <= odds {
        HitRoll::Hit
    } else {
        HitRoll::Miss
    }
}

/// What a critical hit does to the damage roll.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CriticalEffect {
    /// The blow goes straight through armor.
    pub ignores_armor: bool,

    /// Applied to the rolled damage.
    pub multiplier: f64,
}

impl CriticalEffect {
    /// Reads the follow-up 1d100 roll of a critical hit.
    #[must_use]
    pub const fn from_roll(roll: i32) -> Self {
        let (ignores_armor, multiplier) = match roll {
            i32::MIN..=50 => (true, 1.0),
            51..=85 => (false, 1.5),
            86..=95 => (false, 2.0),
            96..=99 => (false, 3.0),
            _ => (false, 1000.0),
        };
        Self {
            ignores_armor,
            multiplier,
        }
    }

    /// Scales rolled damage, rounding down.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn apply(self, damage: i32) -> i32 {
        let scaled = (f64::from(damage) * self.multiplier).floor();
        if scaled >= f64::from(i32::MAX) {
            i32::MAX
        } else {
            scaled as i32
        }
    }
}

/// Damage left after armor. Zero or less means the blow bounced off.
#[must_use]
pub const fn absorb(damage: i32, armor_class: i32) -> i32 {
    damage - armor_class
}

/// What happens to a fumbled weapon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fumble {
    /// No harm done.
    Recovered,
    /// The weapon falls to the floor.
    Dropped,
    /// The weapon strikes its wielder.
    HitsUser,
    /// Magic weapons only spark.
    Sparks,
    /// The weapon loses two damage sides.
    Damaged,
    /// The weapon is destroyed.
    Broken,
}

impl Fumble {
    /// Reads the follow-up 1d100 roll of a fumble.
    #[must_use]
    pub const fn from_roll(roll: i32, magic: bool, sides: i32) -> Self {
        if roll <= 40 {
            Self::Recovered
        } else if roll <= 80 {
            Self::Dropped
        } else if roll <= 85 {
            Self::HitsUser
        } else if magic {
            Self::Sparks
        } else if roll <= 95 && sides > 2 {
            Self::Damaged
        } else {
            Self::Broken
        }
    }
}

/// Resolves a saving throw: a 1d20 roll plus the stat bonus against a difficulty.
#[must_use]
pub const fn saving_throw(roll: i32, stat: i32, difficulty: i32) -> bool {
    roll + (stat - 10).div_euclid(2) >= difficulty
}

/// Weapon ability gained when a hit beats the odds, from the 1d100 growth roll.
#[must_use]
pub const fn proficiency_gain(roll: i32, odds: i32, ability: i32) -> i32 {
    if roll <= odds {
        0
    } else if ability < 50 {
        2
    } else {
        1
    }
}


#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::*;

    fn attacker() -> impl Strategy<Value = Attacker> {
        (
            -50i32..80,
            1i32..3,
            -200i32..200,
            0i32..50,
            proptest::option::of(0i32..300),
            proptest::option::of(-20i32..80),
        )
            .prop_map(|(agility, speed_multiplier, attack_odds, armor_factor, proficiency, weapon_odds)| Attacker {
                agility,
                speed_multiplier,
                attack_odds,
                armor_factor,
                proficiency,
                weapon_odds,
            })
    }

    fn defender() -> impl Strategy<Value = Defender> {
        (-50i32..80, 1i32..3, -50i32..50).prop_map(|(agility, speed_multiplier, defense_bonus)| Defender {
            agility,
            speed_multiplier,
            defense_bonus,
        })
    }

    proptest! {
        #[test]
        fn to_hit_is_a_percentage(a in attacker(), d in defender()) {
            let odds = to_hit(&CombatRules::default(), &a, &d);
            prop_assert!((0..=100).contains(&odds));
        }

        #[test]
        fn to_hit_grows_with_agility(a in attacker(), d in defender(), extra in 0i32..40) {
            let rules = CombatRules::default();
            let faster = Attacker { agility: a.agility + extra, ..a };
            prop_assert!(to_hit(&rules, &faster, &d) >= to_hit(&rules, &a, &d));
        }

        #[test]
        fn every_roll_classifies(roll in 1i32..=100, odds in 0i32..=100, armed in any::<bool>()) {
            let outcome = classify(&CombatRules::default(), roll, odds, armed);
            if roll >= 97 {
                prop_assert!(!outcome.lands());
            }
            if roll <= odds && roll < 97 {
                prop_assert!(outcome.lands());
            }
        }
    }
}
