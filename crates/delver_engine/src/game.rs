//! The game orchestrator.
//!
//! A [`Game`] owns the world, the dice, the history and every collaborator.
//! Player input comes in through [`Game::input`], which routes each line to a
//! pending question, a paused queue, or the command parser. A successful
//! command costs one tick:
//!
//! ```text
//! input ──▶ parser ──▶ command ──▶ tick
//!                                   │
//!                   ┌───────────────┘
//!                   ▼
//!   recharge, timed spells, light fuel, visibility
//!                   │
//!                   ▼
//!   queue: one battle action per monster in the room
//!                   │  (drained)
//!                   ▼
//!   endTurn hook ──▶ end_turn: room, monsters, artifacts ──▶ ready
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use delver_foundation::text::pluralize;
use delver_foundation::{ActorId, Dice, EffectId, Error, MonsterId, Result, RoomId, Style};
use delver_parser::{Command, CommandHost, CommandParser, Dispatch};
use delver_storage::{AdventureData, AdventureInfo, DataBag, Reaction, SaveSummary, Status, World};
use tracing::{debug, error, info, warn};

use crate::commands;
use crate::config::GameConfig;
use crate::history::{Display, History, Line, NullDisplay};
use crate::hooks::{Event, HookRegistry};
use crate::modal::{Modal, Question};
use crate::queue::{NoPacer, OperationsQueue, Pacer, QueueHost, SleepPacer};
use crate::saves::{MemorySaveStore, SaveStore};

/// Where the game is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GameState {
    /// Built but not started.
    #[default]
    Loading,
    /// Showing the intro pages.
    Intro,
    /// Accepting commands.
    Active,
    /// Waiting on a question or a page break.
    Suspended,
    /// The player left the adventure.
    Won,
    /// The player died.
    Died,
}

impl GameState {
    /// Won or died.
    #[must_use]
    pub const fn is_over(self) -> bool {
        matches!(self, Self::Won | Self::Died)
    }
}

/// Counters reported when the adventure ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Statistics {
    /// Damage the player did to monsters.
    pub damage_dealt: i32,

    /// Damage monsters did to the player.
    pub damage_taken: i32,

    /// Hidden artifacts the player uncovered.
    pub secret_doors_found: u32,
}

/// A running adventure.
pub struct Game {
    /// Adventure metadata.
    pub info: AdventureInfo,

    /// Settings.
    pub config: GameConfig,

    /// Every entity.
    pub world: World,

    /// The dice. Script rolls here to make a test deterministic.
    pub dice: Dice,

    /// Narration.
    pub history: History,

    /// Adventure event handlers.
    pub hooks: HookRegistry,

    /// Open questions.
    pub modal: Modal,

    /// A hostile monster is in the player's room.
    pub in_battle: bool,

    /// Monsters skip their battle actions this turn.
    pub skip_battle_actions: bool,

    /// Turns taken.
    pub timer: u32,

    /// Adventure-defined values, saved with the game.
    pub data: DataBag,

    /// End-of-game counters.
    pub statistics: Statistics,

    parser: Rc<CommandParser<Game>>,
    queue: OperationsQueue<Game>,
    saves: Box<dyn SaveStore>,
    display: Box<dyn Display>,
    state: GameState,
    ready: bool,
    awaiting_page: bool,
    intro_pages: VecDeque<String>,

    /// Depth of commands run from inside other commands.
    nesting: u32,
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("adventure", &self.info.name)
            .field("state", &self.state)
            .field("timer", &self.timer)
            .field("in_battle", &self.in_battle)
            .field("ready", &self.ready)
            .field("queue", &self.queue)
            .finish_non_exhaustive()
    }
}

impl Game {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Creates a game over a built world, with the core command set.
    ///
    /// # Errors
    ///
    /// Returns an error if the core commands fail to register.
    pub fn new(info: AdventureInfo, world: World, mut config: GameConfig) -> Result<Self> {
        if let Some(message) = &info.exit_message {
            config.exit_message.clone_from(message);
        }
        let dice = config.seed.map_or_else(Dice::from_entropy, Dice::seeded);
        let pacer: Box<dyn Pacer> = if config.delay_time.is_zero() {
            Box::new(NoPacer)
        } else {
            Box::new(SleepPacer)
        };
        Ok(Self {
            info,
            world,
            dice,
            history: History::new(config.page_size),
            hooks: HookRegistry::new(),
            modal: Modal::new(),
            in_battle: false,
            skip_battle_actions: false,
            timer: 0,
            data: DataBag::new(),
            statistics: Statistics::default(),
            parser: Rc::new(commands::core_parser()?),
            queue: OperationsQueue::new(config.delay_time, pacer),
            saves: Box::new(MemorySaveStore::new()),
            display: Box::new(NullDisplay),
            state: GameState::Loading,
            ready: false,
            awaiting_page: false,
            intro_pages: VecDeque::new(),
            nesting: 0,
            config,
        })
    }

    /// Loads an adventure file and creates a game for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the adventure data is malformed or inconsistent.
    pub fn from_json(json: &str, config: GameConfig) -> Result<Self> {
        let (info, world) = AdventureData::from_json(json)?.build()?;
        Self::new(info, world, config)
    }

    /// Builder method to send flushed narration to a display.
    #[must_use]
    pub fn with_display(mut self, display: impl Display + 'static) -> Self {
        self.display = Box::new(display);
        self
    }

    /// Builder method to keep saved games somewhere else.
    #[must_use]
    pub fn with_save_store(mut self, store: impl SaveStore + 'static) -> Self {
        self.saves = Box::new(store);
        self
    }

    /// Builder method to replace how the queue waits.
    #[must_use]
    pub fn with_pacer(mut self, pacer: impl Pacer + 'static) -> Self {
        self.queue.set_pacer(Box::new(pacer));
        self
    }

    /// Adds an adventure command. Its verbs take over any core verbs they repeat.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed verbs, or when called while a command runs.
    pub fn register_command(&mut self, command: impl Command<Game> + 'static) -> Result<()> {
        Rc::get_mut(&mut self.parser)
            .ok_or_else(|| Error::internal("commands cannot be registered while a command runs"))?
            .register(command)
    }

    /// Every verb the parser knows, for completion.
    #[must_use]
    pub fn verbs(&self) -> Vec<String> {
        self.parser.verbs().map(str::to_string).collect()
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> GameState {
        self.state
    }

    /// The player won or died.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.state.is_over()
    }

    /// The last turn has finished and a new command can be typed.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.ready
    }

    /// Output stopped at a page break, or the queue is paused.
    #[must_use]
    pub const fn is_waiting_for_key(&self) -> bool {
        self.awaiting_page || self.queue.is_paused()
    }

    /// The question waiting for an answer.
    #[must_use]
    pub fn pending_question(&self) -> Option<&Question> {
        self.modal.current()
    }

    /// Suspends turn processing.
    pub fn pause(&mut self) {
        if self.state == GameState::Active {
            self.state = GameState::Suspended;
        }
    }

    /// Resumes turn processing, unless a question is still open.
    pub fn resume(&mut self) {
        if self.state == GameState::Suspended && !self.modal.is_open() {
            self.state = GameState::Active;
        }
    }

    /// Returns true after the player says the magic word.
    #[must_use]
    pub fn debug_unlocked(&self) -> bool {
        self.data
            .get("bort")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Starts the adventure: intro pages first, if there are any.
    pub fn start(&mut self) {
        info!(adventure = %self.info.name, "game starting");
        self.intro_pages = self
            .info
            .intro_text
            .as_deref()
            .map(|text| {
                text.split("---")
                    .map(str::trim)
                    .filter(|page| !page.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        if self.intro_pages.is_empty() {
            self.begin();
        } else {
            self.state = GameState::Intro;
            self.next_intro_page();
        }
    }

    /// Shows the next intro page, or begins play after the last one.
    fn next_intro_page(&mut self) {
        match self.intro_pages.pop_front() {
            Some(page) => {
                self.history.write(page, Style::Normal);
                self.flush_display();
            }
            None => self.begin(),
        }
    }

    /// Begins play in the starting room.
    pub fn begin(&mut self) {
        self.intro_pages.clear();
        self.state = GameState::Active;
        self.refresh_visible();
        self.trigger(Event::Start);
        self.tick();
        self.flush_display();
    }

    /// Handles one line typed by the player.
    ///
    /// Lines that answer a question, turn an intro page, or acknowledge a
    /// page break report [`Dispatch::Empty`].
    pub fn input(&mut self, line: &str) -> Dispatch {
        match self.state {
            GameState::Loading | GameState::Won | GameState::Died => return Dispatch::Empty,
            GameState::Intro => {
                self.next_intro_page();
                return Dispatch::Empty;
            }
            GameState::Active | GameState::Suspended => {}
        }
        if self.is_waiting_for_key() {
            self.history.reset_page();
            self.awaiting_page = false;
            if self.queue.is_paused() {
                self.resume_queue();
            } else {
                self.flush_display();
            }
            return Dispatch::Empty;
        }
        if self.modal.is_open() {
            self.answer(line);
            return Dispatch::Empty;
        }

        self.ready = false;
        let parser = Rc::clone(&self.parser);
        let dispatch = parser.run(line, self, true);
        if matches!(dispatch, Dispatch::Empty | Dispatch::Ambiguous(_) | Dispatch::Unknown(_)) {
            self.ready = true;
        }
        self.sync_pause();
        self.flush_display();
        dispatch
    }

    /// Runs a command from inside another one, without costing a turn.
    pub fn run_command(&mut self, line: &str) -> Dispatch {
        let parser = Rc::clone(&self.parser);
        self.nesting += 1;
        let dispatch = parser.run(line, self, false);
        self.nesting -= 1;
        dispatch
    }

    /// Advances the clock one turn and queues the monsters' actions.
    pub fn tick(&mut self) {
        if self.state != GameState::Active {
            return;
        }
        self.timer += 1;
        debug!(timer = self.timer, "tick");

        self.recharge_spell_abilities(self.config.spell_recharge);
        self.decay_spell_counters();
        self.burn_light_sources();
        self.refresh_visible();

        if self.in_battle && !self.skip_battle_actions {
            let actors: Vec<MonsterId> = self.world.monsters.visible().to_vec();
            for id in actors {
                self.queue.push_call(move |game: &mut Game| game.monster_turn(id));
            }
        }
        self.queue.on_drained(Game::finish_turn);
        OperationsQueue::run(self);
        self.sync_pause();
    }

    /// One monster's queued battle actions.
    fn monster_turn(&mut self, id: MonsterId) {
        if self.is_over() || !self.world.is_actor_here(ActorId::Monster(id)) {
            return;
        }
        if let Err(err) = self.battle_actions(id) {
            error!(monster = %id, error = %err, "battle action failed");
        }
        self.refresh_visible();
    }

    /// Runs once the queued monster actions are done.
    fn finish_turn(&mut self) {
        self.skip_battle_actions = false;
        if self.is_over() {
            self.ready = true;
            return;
        }
        self.trigger(Event::EndTurn);
        self.refresh_visible();
        self.end_turn();
    }

    /// Describes where the player is and what is here, then accepts input again.
    pub fn end_turn(&mut self) {
        if self.state == GameState::Died {
            return;
        }
        let Some(room) = self.world.player_room() else {
            self.ready = true;
            return;
        };
        let light = self.world.has_light();

        if light {
            let (name, seen) = self
                .world
                .rooms
                .get(room)
                .map_or_else(|| (String::new(), true), |r| (r.name.clone(), r.seen));
            self.history.write(name, Style::Normal);
            if self.debug_unlocked() {
                self.history.append(&format!(" ({room})"));
            }
            if !seen {
                self.show_room_description(room);
                if let Some(r) = self.world.rooms.get_mut(room) {
                    r.seen = true;
                    r.visited = true;
                }
                self.trigger(Event::SeeRoom { room });
            }
        } else {
            self.history.write("It's too dark to see anything.", Style::Normal);
        }

        self.trigger(Event::EndTurn1);

        if light {
            let monsters: Vec<MonsterId> = self.world.monsters.visible().to_vec();
            for id in monsters {
                self.reveal_monster(id);
            }
            let artifacts = self.world.artifacts.visible().to_vec();
            for id in artifacts {
                let Some(artifact) = self.world.artifacts.get(id) else {
                    continue;
                };
                if artifact.seen {
                    let line = if artifact.player_brought {
                        format!("Your {} is here.", artifact.name)
                    } else {
                        format!("You see {}.", artifact.names().display_name())
                    };
                    self.history.write_compact(line, Style::Normal);
                } else {
                    self.show_artifact_description(id);
                    if let Some(a) = self.world.artifacts.get_mut(id) {
                        a.seen = true;
                    }
                    self.trigger(Event::SeeArtifact { artifact: id });
                }
            }
        }

        self.trigger(Event::EndTurn2);
        self.ready = true;
    }

    /// Describes a monster on first sight, or mentions it briefly after that.
    fn reveal_monster(&mut self, id: MonsterId) {
        let Some(monster) = self.world.monsters.get(id) else {
            return;
        };
        if !monster.seen {
            let description = monster.description.clone();
            self.history.write(description, Style::Normal);
            if let Some(m) = self.world.monsters.get_mut(id) {
                m.seen = true;
            }
            self.trigger(Event::SeeMonster { monster: id });
            return;
        }
        let here = self
            .world
            .monsters
            .members_in_room(id, self.world.player_room())
            .len();
        let line = if monster.is_group() && here > 1 {
            format!("{here} {} are here.", monster.plural_name())
        } else {
            format!("{} is here.", monster.name)
        };
        self.history.write_compact(line, Style::Normal);
    }

    /// Writes a room's description and its effects.
    pub fn show_room_description(&mut self, id: RoomId) {
        let Some(room) = self.world.rooms.get(id) else {
            return;
        };
        let line = Line::new(room.description.clone()).with_markdown(room.is_markdown);
        let (effect, inline) = (room.effect, room.effect_inline);
        self.history.write_line(line);
        if let Some(effect) = effect {
            self.print_effect(effect);
        }
        if let Some(effect) = inline {
            self.print_effect_with(effect, None, true);
        }
    }

    /// Writes an artifact's description.
    pub fn show_artifact_description(&mut self, id: delver_foundation::ArtifactId) {
        if let Some(artifact) = self.world.artifacts.get(id) {
            let line = Line::new(artifact.description.clone()).with_markdown(artifact.is_markdown);
            self.history.write_line(line);
        }
    }

    /// Ends the game with the player's death.
    pub fn die(&mut self, show_health: bool) {
        if self.is_over() {
            return;
        }
        if let Ok(player) = self.world.player_mut() {
            player.damage = player.hardiness;
            player.status = Status::Dead;
        }
        if show_health {
            self.show_health(ActorId::PLAYER);
        }
        self.trigger(Event::Death {
            actor: ActorId::PLAYER,
            attacker: None,
        });
        self.player_died();
    }

    /// Marks the game lost after the player's death has been handled.
    pub(crate) fn player_died(&mut self) {
        self.state = GameState::Died;
        self.skip_battle_actions = true;
        info!(
            timer = self.timer,
            room = ?self.world.player_room(),
            damage_dealt = self.statistics.damage_dealt,
            damage_taken = self.statistics.damage_taken,
            "player died"
        );
    }

    /// Leaves the adventure, unless the `exit` hook objects.
    pub fn exit(&mut self) {
        if !self.allows(Event::Exit) {
            return;
        }
        self.state = GameState::Won;
        self.queue.clear();
        info!(
            timer = self.timer,
            damage_dealt = self.statistics.damage_dealt,
            damage_taken = self.statistics.damage_taken,
            secret_doors_found = self.statistics.secret_doors_found,
            "adventure completed"
        );
    }

    // =========================================================================
    // Questions
    // =========================================================================

    /// Opens a modal and suspends the game until every question is answered.
    pub fn ask(&mut self, questions: Vec<Question>) {
        if questions.is_empty() {
            return;
        }
        self.modal.open(questions);
        self.pause();
        debug!(prompt = ?self.modal.current().map(|q| q.prompt.as_str()), "question asked");
    }

    /// Asks a yes/no question.
    pub fn confirm(&mut self, prompt: impl Into<String>, then: impl FnOnce(&mut Game, bool) + 'static) {
        self.ask(vec![Question::choice(
            prompt,
            vec!["Yes".to_string(), "No".to_string()],
            move |game, answer| {
                then(game, answer == "Yes");
                true
            },
        )]);
    }

    /// Feeds the player's line to the open question.
    pub fn answer(&mut self, line: &str) {
        let Some(question) = self.modal.current() else {
            return;
        };
        let Some(mut answer) = question.interpret(line) else {
            let choices = question.choices().join(", ");
            self.history
                .write(format!("Please choose one of: {choices}."), Style::Warning);
            self.flush_display();
            return;
        };
        // An empty line accepts the suggested default.
        if answer.is_empty() {
            answer.clone_from(&question.answer);
        }
        let generation = self.modal.generation();
        let callback = self.modal.current_mut().and_then(|q| {
            q.answer.clone_from(&answer);
            q.take_callback()
        });
        let carry_on = callback.is_none_or(|callback| callback(self, &answer));
        if self.modal.generation() != generation {
            self.flush_display();
            return;
        }
        if carry_on {
            self.modal.advance();
            if self.modal.is_open() {
                self.flush_display();
                return;
            }
        }
        self.close_modal();
    }

    fn close_modal(&mut self) {
        self.modal.close();
        if !self.is_over() {
            self.resume();
            if !self.ready {
                self.tick();
            }
        }
        self.flush_display();
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// Shows buffered narration. Returns true when output stopped at a page break.
    pub fn flush_display(&mut self) -> bool {
        let paused = self.history.flush(self.display.as_mut());
        if paused {
            self.awaiting_page = true;
        }
        paused
    }

    fn sync_pause(&mut self) {
        if self.queue.is_paused() {
            self.pause();
        }
    }

    fn resume_queue(&mut self) {
        self.resume();
        OperationsQueue::resume(self);
        self.sync_pause();
        self.flush_display();
    }

    /// Prints an effect and whatever it chains to.
    pub fn print_effect(&mut self, id: EffectId) {
        self.print_effect_with(id, None, false);
    }

    /// Prints an effect in a given style, or inline after the last line.
    pub fn print_effect_with(&mut self, id: EffectId, style: Option<Style>, inline: bool) {
        let limit = self.world.effects.iter().count();
        let mut pending = VecDeque::from([(id, inline)]);
        let mut printed = 0;
        while let Some((id, inline)) = pending.pop_front() {
            printed += 1;
            if printed > limit + 1 {
                warn!(effect = %id, "effect chain loops");
                return;
            }
            let Some(effect) = self.world.effects.get_mut(id) else {
                warn!(effect = %id, "effect not found");
                self.history
                    .write(format!("Effect #{id} not found!"), Style::Normal);
                continue;
            };
            effect.seen = true;
            let text = effect.rendered_text();
            let line_style = style.or(effect.style).unwrap_or_default();
            let markdown = effect.is_markdown;
            let (next, next_inline) = (effect.next, effect.next_inline);
            if inline {
                self.history.append(&format!(" {text}"));
            } else {
                self.history.write_line(
                    Line::new(text)
                        .with_style(line_style)
                        .with_markdown(markdown),
                );
            }
            if let Some(next) = next {
                pending.push_back((next, false));
            }
            if let Some(next) = next_inline {
                pending.push_back((next, true));
            }
        }
    }

    /// Prints several effects in order.
    pub fn print_sequence(&mut self, ids: &[EffectId]) {
        for id in ids {
            self.print_effect(*id);
        }
    }

    /// An amount of money in the adventure's currency.
    #[must_use]
    pub fn money(&self, amount: i32) -> String {
        let name = &self.config.money_name;
        if amount == 1 {
            format!("{amount} {name}")
        } else {
            format!("{amount} {}", pluralize(name))
        }
    }

    /// Picks one item with a die roll.
    pub fn random_element<T: Clone>(&mut self, items: &[T]) -> Option<T> {
        self.dice.random_index(items.len()).map(|i| items[i].clone())
    }

    /// Recomputes what is in the player's room, meets any new monsters there,
    /// and updates the battle flag.
    pub fn refresh_visible(&mut self) {
        self.world.update_visible();
        let strangers: Vec<MonsterId> = self
            .world
            .monsters
            .visible()
            .iter()
            .copied()
            .filter(|id| {
                self.world
                    .monsters
                    .get(*id)
                    .is_some_and(|m| m.reaction == Reaction::Unknown)
            })
            .collect();
        for id in strangers {
            self.check_reaction(id);
        }
        self.in_battle = self.world.hostile_present();
    }

    // =========================================================================
    // Saved games
    // =========================================================================

    /// Saves the game to a slot.
    ///
    /// # Errors
    ///
    /// Returns an error for demo characters, bad slots, or a failed write.
    pub fn save(&mut self, slot: u8, description: &str) -> Result<()> {
        if self.config.demo {
            return Err(Error::invalid_data("demo characters cannot save"));
        }
        let snapshot = self.world.snapshot(self.timer, self.data.clone());
        self.saves.save(slot, description, &snapshot)?;
        info!(slot, description, timer = self.timer, "game saved");
        Ok(())
    }

    /// Restores a saved game and describes the player's surroundings.
    ///
    /// Also brings a dead player back, since restoring is how a lost game continues.
    ///
    /// # Errors
    ///
    /// Returns an error for demo characters, bad or empty slots, or unreadable data.
    pub fn restore(&mut self, slot: u8) -> Result<()> {
        if self.config.demo {
            return Err(Error::invalid_data("demo characters cannot restore"));
        }
        let snapshot = self.saves.load(slot)?;
        let timer = snapshot.timer;
        let data = snapshot.data.clone();
        let mut world = World::from_snapshot(snapshot)?;
        world.refresh_inventory(ActorId::PLAYER)?;

        self.world = world;
        self.timer = timer;
        self.data = data;
        self.queue.clear();
        self.awaiting_page = false;
        self.skip_battle_actions = false;
        self.state = if self.modal.is_open() {
            GameState::Suspended
        } else {
            GameState::Active
        };
        self.refresh_visible();

        self.flush_display();
        self.history.clear();
        self.history.push("restore");
        self.history
            .write(format!("Game restored from slot {slot}."), Style::Normal);
        info!(slot, timer, "game restored");
        self.end_turn();
        Ok(())
    }

    /// Used save slots.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list_saves(&self) -> Result<Vec<SaveSummary>> {
        self.saves.list()
    }
}

impl CommandHost for Game {
    fn begin_entry(&mut self, label: &str) {
        if self.nesting == 0 {
            self.history.push(label);
        }
    }

    fn narrate(&mut self, text: &str) {
        self.history.write(text, Style::Normal);
    }

    fn tick(&mut self) {
        Game::tick(self);
    }

    fn end_turn(&mut self) {
        if self.nesting == 0 {
            Game::end_turn(self);
        }
    }

    fn flush(&mut self) {
        self.flush_display();
    }
}

impl QueueHost for Game {
    fn operations(&mut self) -> &mut OperationsQueue<Self> {
        &mut self.queue
    }

    fn flush_output(&mut self) -> bool {
        self.history.flush(self.display.as_mut())
    }
}
