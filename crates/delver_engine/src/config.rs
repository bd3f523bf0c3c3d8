//! Game configuration.

use std::time::Duration;

/// Default message shown when the player leaves the adventure.
pub const DEFAULT_EXIT_MESSAGE: &str = "You successfully ride off into the sunset.";

/// Tunable constants of the combat math.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CombatRules {
    /// Hit rolls at or above this are fumbles for armed attackers.
    pub fumble_threshold: i32,

    /// Hit rolls at or below this are critical hits.
    pub critical_threshold: i32,

    /// Ceiling on a weapon's intrinsic odds.
    pub weapon_odds_cap: i32,

    /// Ceiling on effective agility (agility times speed multiplier).
    pub agility_cap: i32,

    /// Ceiling on weapon proficiency.
    pub proficiency_cap: i32,

    /// Lowest to-hit percentage.
    pub min_to_hit: i32,

    /// Highest to-hit percentage.
    pub max_to_hit: i32,
}

impl Default for CombatRules {
    fn default() -> Self {
        Self {
            fumble_threshold: 97,
            critical_threshold: 5,
            weapon_odds_cap: 30,
            agility_cap: 30,
            proficiency_cap: 100,
            min_to_hit: 0,
            max_to_hit: 100,
        }
    }
}

/// Configuration for a running game.
#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    /// Pause between queued operations.
    pub delay_time: Duration,

    /// Output lines shown before the queue pauses for a key press. Zero disables paging.
    pub page_size: usize,

    /// Ask before leaving through an exit.
    pub exit_prompt: bool,

    /// Shown when the player leaves the adventure.
    pub exit_message: String,

    /// Currency name, singular.
    pub money_name: String,

    /// Dice seed; `None` seeds from the operating system.
    pub seed: Option<u64>,

    /// Demo characters cannot save or restore.
    pub demo: bool,

    /// Combat math constants.
    pub combat: CombatRules,

    /// Spell ability points restored per turn.
    pub spell_recharge: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            delay_time: Duration::from_millis(100),
            page_size: 20,
            exit_prompt: true,
            exit_message: DEFAULT_EXIT_MESSAGE.to_string(),
            money_name: "gold piece".to_string(),
            seed: None,
            demo: false,
            combat: CombatRules::default(),
            spell_recharge: 1,
        }
    }
}

impl GameConfig {
    /// Configuration for tests: no pacing, no paging, no exit prompt, fixed seed.
    #[must_use]
    pub fn testing() -> Self {
        Self {
            delay_time: Duration::ZERO,
            page_size: 0,
            exit_prompt: false,
            seed: Some(0),
            ..Self::default()
        }
    }

    /// Configuration for terminal play with pacing and paging on.
    #[must_use]
    pub fn interactive() -> Self {
        Self {
            delay_time: Duration::from_millis(250),
            page_size: 20,
            ..Self::default()
        }
    }

    /// Builder method to set queue pacing.
    #[must_use]
    pub fn with_delay_time(mut self, delay: Duration) -> Self {
        self.delay_time = delay;
        self
    }

    /// Builder method to set the page size.
    #[must_use]
    pub fn with_page_size(mut self, lines: usize) -> Self {
        self.page_size = lines;
        self
    }

    /// Builder method to enable/disable the exit confirmation.
    #[must_use]
    pub fn with_exit_prompt(mut self, prompt: bool) -> Self {
        self.exit_prompt = prompt;
        self
    }

    /// Builder method to set the exit message.
    #[must_use]
    pub fn with_exit_message(mut self, message: impl Into<String>) -> Self {
        self.exit_message = message.into();
        self
    }

    /// Builder method to set the currency name.
    #[must_use]
    pub fn with_money_name(mut self, name: impl Into<String>) -> Self {
        self.money_name = name.into();
        self
    }

    /// Builder method to set the dice seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder method to mark the character as a demo character.
    #[must_use]
    pub fn with_demo(mut self, demo: bool) -> Self {
        self.demo = demo;
        self
    }

    /// Builder method to set the combat constants.
    #[must_use]
    pub fn with_combat(mut self, combat: CombatRules) -> Self {
        self.combat = combat;
        self
    }

    /// Builder method to set the spell recharge rate.
    #[must_use]
    pub fn with_spell_recharge(mut self, amount: i32) -> Self {
        self.spell_recharge = amount;
        self
    }
}
