//! Shopping. Only adventures with merchants register this command.
//!
//! A merchant's wares are the artifacts they carry with `for_sale` set in the
//! artifact's data. An optional `price` overrides the artifact's value.
//! Merchants remember what they sold in their own `sold_items` data.

use delver_foundation::{ActorId, ArtifactId, MonsterId, Result, Style};
use delver_parser::{Command, CommandError, CommandResult};
use serde_json::Value;
use tracing::{error, info};

use super::{artifact, monster_name};
use crate::game::Game;
use crate::hooks::Event;

/// Buys an item from a merchant in the room.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuyCommand;

impl Command<Game> for BuyCommand {
    fn name(&self) -> &str {
        "buy"
    }

    fn verbs(&self) -> &[&'static str] {
        &["buy"]
    }

    fn description(&self) -> &str {
        "Buys an item from a merchant. Items that are for sale are listed in the room."
    }

    fn run(&self, _verb: &str, arg: &str, game: &mut Game) -> CommandResult {
        let merchants: Vec<MonsterId> = game.world.monsters.visible().to_vec();
        let wares: Vec<(ArtifactId, MonsterId)> = game
            .world
            .artifacts
            .iter()
            .filter(|a| a.matches(arg))
            .filter_map(|a| match a.location.carrier() {
                Some(ActorId::Monster(seller)) if merchants.contains(&seller) => Some((a.id, seller)),
                _ => None,
            })
            .collect();

        let (id, seller) = match wares.as_slice() {
            [] => {
                if let Some(seller) = merchants.iter().copied().find(|m| sold_before(game, *m, arg)) {
                    return Err(CommandError::refused(format!(
                        "The {} says, \"Looks like I'm fresh outta stock. Sorry!\"",
                        monster_name(game, seller)
                    )));
                }
                return Err(CommandError::refused("No one here has that for sale."));
            }
            [only] => *only,
            several => {
                let names: Vec<String> = several
                    .iter()
                    .filter_map(|(id, _)| game.world.artifacts.get(*id).map(|a| a.name.clone()))
                    .collect();
                return Err(CommandError::refused(format!("Did you mean '{}'?", names.join("' or '"))));
            }
        };

        let item = artifact(game, id)?;
        if !item.data.get("for_sale").is_some_and(truthy) {
            return Err(CommandError::refused("That's not for sale."));
        }
        let price = item
            .data
            .get("price")
            .and_then(Value::as_i64)
            .and_then(|p| i32::try_from(p).ok())
            .filter(|p| *p > 0)
            .unwrap_or(item.value);
        let purse = game.world.player()?.gold;
        if price > purse {
            return Err(CommandError::refused(format!(
                "That costs {} and you only have {purse}.",
                game.money(price)
            )));
        }

        let arg = arg.to_string();
        let prompt = format!("That costs {}. Do you want to buy it?", game.money(price));
        game.confirm(prompt, move |game, yes| {
            if !yes {
                game.history.write("\"Maybe next time.\"", Style::Normal);
                return;
            }
            if let Err(err) = complete_sale(game, &arg, id, seller, price) {
                error!(artifact = %id, error = %err, "sale failed");
                game.history.write(format!("Error: {err}"), Style::Danger);
            }
        });
        Ok(())
    }
}

/// Adventure data flags may be booleans or 0/1.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
        _ => false,
    }
}

/// True if the merchant has already sold something by this name.
fn sold_before(game: &Game, merchant: MonsterId, name: &str) -> bool {
    let Some(Value::Array(sold)) = game.world.monsters.get(merchant).and_then(|m| m.data.get("sold_items")) else {
        return false;
    };
    sold.iter()
        .filter_map(Value::as_u64)
        .filter_map(|raw| u32::try_from(raw).ok())
        .any(|raw| game.world.artifacts.get(ArtifactId(raw)).is_some_and(|a| a.matches(name)))
}

fn complete_sale(game: &mut Game, arg: &str, id: ArtifactId, seller: MonsterId, price: i32) -> Result<()> {
    let merchant = ActorId::Monster(seller);
    if !game.allows(Event::BeforeBuy {
        arg: arg.to_string(),
        artifact: id,
        seller: merchant,
    }) {
        return Ok(());
    }
    let item = game.world.artifacts.require(id)?.clone();
    game.history
        .write(format!("You buy the {}.", item.name), Style::Normal);
    if !item.seen {
        game.show_artifact_description(id);
    }

    game.world.move_artifact_to_inventory(id, ActorId::PLAYER)?;
    let bought = game.world.artifacts.require_mut(id)?;
    bought.seen = true;
    bought.data.insert("for_sale".to_string(), Value::Bool(false));
    game.world.player_mut()?.gold -= price;
    game.update_inventory(ActorId::PLAYER)?;

    let ledger = game
        .world
        .monsters
        .require_mut(merchant)?
        .data
        .entry("sold_items".to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    if let Value::Array(sold) = ledger {
        sold.push(Value::from(id.get()));
    }
    game.update_inventory(merchant)?;
    info!(artifact = %id, merchant = %seller, price, "artifact bought");

    game.trigger(Event::AfterBuy {
        arg: arg.to_string(),
        artifact: id,
        seller: merchant,
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use delver_foundation::{ActorId, ArtifactId};
    use delver_storage::{Artifact, ArtifactKind, Location};
    use serde_json::{Value, json};

    use super::super::testkit::*;
    use super::BuyCommand;
    use crate::game::Game;
    use crate::hooks::HookResult;

    const ALE: ArtifactId = ArtifactId(50);

    /// The hermit runs a stall in the garden.
    fn market() -> Game {
        let mut game = game_in(GARDEN);
        game.register_command(BuyCommand).unwrap();
        let mut ale = Artifact::new(ALE, "ale", ArtifactKind::Drinkable)
            .at(Location::Carried(ActorId::Monster(HERMIT)))
            .with_description("A mug of ale.")
            .with_weight(1);
        ale.value = 20;
        ale.data.insert("for_sale".into(), Value::Bool(true));
        ale.data.insert("price".into(), json!(4));
        game.world.artifacts.add(ale).unwrap();
        game
    }

    #[test]
    fn buying_something() {
        let mut game = market();
        game.input("buy ale");
        assert_eq!(
            game.pending_question().map(|q| q.prompt.as_str()),
            Some("That costs 4 gold pieces. Do you want to buy it?")
        );
        game.input("yes");
        assert!(game.history.contains("You buy the ale."));
        assert!(game.history.contains("A mug of ale."));
        assert_eq!(game.world.player().unwrap().gold, 6);
        let ale = game.world.artifacts.get(ALE).unwrap();
        assert_eq!(ale.location, Location::Carried(ActorId::PLAYER));
        assert_eq!(ale.data.get("for_sale"), Some(&Value::Bool(false)));
        assert_eq!(
            game.world.monsters.get(HERMIT).unwrap().data.get("sold_items"),
            Some(&json!([50]))
        );
    }

    #[test]
    fn out_of_stock_after_a_sale() {
        let mut game = market();
        game.input("buy ale");
        game.input("y");
        game.input("buy ale");
        assert!(game.history.contains("The hermit says, \"Looks like I'm fresh outta stock. Sorry!\""));
    }

    #[test]
    fn saying_no() {
        let mut game = market();
        game.input("buy ale");
        game.input("no");
        assert!(game.history.contains("\"Maybe next time.\""));
        assert_eq!(game.world.player().unwrap().gold, 10);
    }

    #[test]
    fn refusals() {
        let mut game = market();
        game.input("buy staff");
        assert!(game.history.contains("That's not for sale."));
        game.input("buy sword");
        assert!(game.history.contains("No one here has that for sale."));
        game.world.artifacts.get_mut(ALE).unwrap().data.remove("price");
        game.input("buy ale");
        assert!(game.history.contains("That costs 20 gold pieces and you only have 10."));
    }

    #[test]
    fn before_buy_can_stop_the_sale() {
        let mut game = market();
        game.hooks.register("beforeBuy", |game, _| {
            game.history.write("The hermit shakes their head.", delver_foundation::Style::Normal);
            HookResult::Veto
        });
        game.input("buy ale");
        game.input("yes");
        assert!(game.history.contains("The hermit shakes their head."));
        assert_eq!(game.world.player().unwrap().gold, 10);
    }

    #[test]
    fn buy_is_optional() {
        let mut game = game_in(GARDEN);
        assert!(matches!(game.input("buy ale"), delver_parser::Dispatch::Unknown(_)));
    }
}
