//! Integration tests for combat

use delver_engine::combat::{self, Attacker, Defender, HitRoll};
use delver_engine::CombatRules;
use delver_foundation::{ActorId, MonsterId, RoomId};
use delver_storage::Status;

use crate::demo_game;

const GUARD: MonsterId = MonsterId(1);
const RATS: MonsterId = MonsterId(2);

// =============================================================================
// Pure Math
// =============================================================================

#[test]
fn weapon_odds_raise_the_chance_to_hit() {
    let rules = CombatRules::default();
    let mut attacker = Attacker {
        agility: 15,
        speed_multiplier: 1,
        attack_odds: 39,
        weapon_odds: Some(10),
        ..Attacker::default()
    };
    let defender = Defender {
        agility: 15,
        speed_multiplier: 1,
        defense_bonus: 0,
    };
    assert_eq!(combat::to_hit(&rules, &attacker, &defender), 49);
    attacker.weapon_odds = Some(30);
    assert_eq!(combat::to_hit(&rules, &attacker, &defender), 69);
}

#[test]
fn high_rolls_fumble_only_when_armed() {
    let rules = CombatRules::default();
    assert_eq!(combat::classify(&rules, 98, 100, true), HitRoll::Fumble);
    assert_eq!(combat::classify(&rules, 98, 100, false), HitRoll::Miss);
    assert_eq!(combat::classify(&rules, 3, 40, true), HitRoll::Critical);
    assert_eq!(combat::classify(&rules, 3, 0, true), HitRoll::Miss);
}

#[test]
fn hopeless_odds_never_crit() {
    let rules = CombatRules::default();
    assert_eq!(combat::classify(&rules, 1, -5, true), HitRoll::Miss);
    assert_eq!(combat::classify(&rules, 3, -5, false), HitRoll::Miss);
    assert_eq!(combat::classify(&rules, 1, 1, true), HitRoll::Critical);
}

// =============================================================================
// In the Game
// =============================================================================

#[test]
fn player_odds_stay_in_range() {
    let mut game = demo_game();
    game.move_player(RoomId(3), false).unwrap();
    let odds = game.to_hit_odds(ActorId::PLAYER, ActorId::Monster(GUARD)).unwrap();
    let rules = &game.config.combat;
    assert!((rules.min_to_hit..=rules.max_to_hit).contains(&odds));
    assert!(odds > 10);
}

#[test]
fn a_blow_on_a_group_lands_on_one_member() {
    let mut game = demo_game();
    game.move_player(RoomId(4), false).unwrap();
    game.dice.script([1]);

    let dealt = game.injure(ActorId::Monster(RATS), 1, true, None).unwrap();
    assert_eq!(dealt, 1);

    let damage: Vec<i32> = game.world.monsters.members_of(RATS).map(|m| m.damage).collect();
    assert_eq!(damage, [1, 0, 0]);
}

#[test]
fn a_killing_blow_takes_one_member_out() {
    let mut game = demo_game();
    game.move_player(RoomId(4), false).unwrap();
    game.dice.script([2]);

    let dealt = game.injure(ActorId::Monster(RATS), 10, true, None).unwrap();
    assert_eq!(dealt, 3);

    let dead: Vec<_> = game
        .world
        .monsters
        .members_of(RATS)
        .filter(|m| m.status == Status::Dead)
        .collect();
    assert_eq!(dead.len(), 1);
    assert_eq!(
        game.world.monsters.members_of(RATS).filter(|m| m.is_alive()).count(),
        2
    );
}

#[test]
fn armor_soaks_up_damage() {
    let mut game = demo_game();
    game.move_player(RoomId(3), false).unwrap();
    let dealt = game.injure(ActorId::Monster(GUARD), 4, false, None).unwrap();
    assert_eq!(dealt, 3);
    assert_eq!(game.world.monsters.get(GUARD).unwrap().damage, 3);

    let dealt = game.injure(ActorId::Monster(GUARD), 4, true, None).unwrap();
    assert_eq!(dealt, 4);
    assert!(game.world.monsters.get(GUARD).unwrap().is_alive());
}
