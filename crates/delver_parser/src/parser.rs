//! Verb resolution and dispatch.

use std::collections::HashMap;
use std::fmt;

use delver_foundation::{Error, ErrorKind, Result};
use tracing::{debug, error};

use crate::command::{Command, CommandError};

/// What the parser needs from the context it runs commands against.
pub trait CommandHost {
    /// Opens a new history entry labelled with the command as typed.
    fn begin_entry(&mut self, label: &str);

    /// Writes a plain narrative line.
    fn narrate(&mut self, text: &str);

    /// Advances the game clock after a successful command.
    fn tick(&mut self);

    /// Closes out a turn that ended early.
    fn end_turn(&mut self);

    /// Shows buffered output.
    fn flush(&mut self);
}

/// How a verb resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Exactly one registered verb fits.
    Verb(String),
    /// Several registered verbs start with the typed word.
    Ambiguous(Vec<String>),
    /// Nothing fits.
    Unknown,
}

/// What happened to a line of input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// Blank input; nothing happened.
    Empty,
    /// The command ran to completion.
    Ran {
        /// Machine name of the command.
        command: String,
        /// Resolved verb.
        verb: String,
    },
    /// The command refused with a player-facing message.
    Refused {
        /// Machine name of the command.
        command: String,
        /// The message shown.
        message: String,
    },
    /// The command failed unexpectedly.
    Faulted {
        /// Machine name of the command.
        command: String,
        /// The error text.
        message: String,
    },
    /// The verb was an ambiguous prefix.
    Ambiguous(Vec<String>),
    /// The verb matched nothing.
    Unknown(String),
}

/// Maps verbs to commands and runs player input.
pub struct CommandParser<C> {
    commands: Vec<Box<dyn Command<C>>>,

    /// Registered verbs in registration order, each pointing at a command.
    verbs: Vec<(String, usize)>,

    /// Position of each verb in `verbs`.
    index: HashMap<String, usize>,
}

impl<C> Default for CommandParser<C> {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            verbs: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<C> fmt::Debug for CommandParser<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandParser")
            .field("commands", &self.commands.len())
            .field("verbs", &self.verbs.len())
            .finish()
    }
}

impl<C: CommandHost> CommandParser<C> {
    /// Creates a parser with no commands.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command under each of its verbs.
    ///
    /// A verb that is already registered is taken over by the new command,
    /// so adventures can replace core behavior.
    ///
    /// # Errors
    ///
    /// Returns an error if the command has no verbs, or a verb is empty or
    /// contains whitespace.
    pub fn register(&mut self, command: impl Command<C> + 'static) -> Result<()> {
        self.register_boxed(Box::new(command))
    }

    /// Registers an already boxed command.
    ///
    /// # Errors
    ///
    /// See [`CommandParser::register`].
    pub fn register_boxed(&mut self, command: Box<dyn Command<C>>) -> Result<()> {
        if command.verbs().is_empty() {
            return Err(registration(format!("command '{}' has no verbs", command.name())));
        }
        if let Some(bad) = command
            .verbs()
            .iter()
            .find(|v| v.is_empty() || v.chars().any(char::is_whitespace))
        {
            return Err(registration(format!(
                "command '{}' has an invalid verb '{bad}'",
                command.name()
            )));
        }

        let slot = self.commands.len();
        for verb in command.verbs() {
            let verb = verb.to_lowercase();
            match self.index.get(&verb) {
                Some(&position) => {
                    debug!(verb = %verb, command = command.name(), "verb taken over");
                    self.verbs[position].1 = slot;
                }
                None => {
                    self.index.insert(verb.clone(), self.verbs.len());
                    self.verbs.push((verb, slot));
                }
            }
        }
        self.commands.push(command);
        Ok(())
    }

    /// All registered verbs in registration order.
    pub fn verbs(&self) -> impl Iterator<Item = &str> {
        self.verbs.iter().map(|(verb, _)| verb.as_str())
    }

    /// Returns true if a command with this name is registered.
    #[must_use]
    pub fn has_command(&self, name: &str) -> bool {
        self.commands.iter().any(|c| c.name() == name)
    }

    /// Resolves a typed verb: an exact match wins, otherwise a unique prefix.
    #[must_use]
    pub fn resolve(&self, typed: &str, ctx: &C) -> Resolution {
        let enabled = |slot: usize| self.commands[slot].enabled(ctx);
        if let Some(&position) = self.index.get(typed) {
            let (verb, slot) = &self.verbs[position];
            if enabled(*slot) {
                return Resolution::Verb(verb.clone());
            }
        }
        let candidates: Vec<String> = self
            .verbs
            .iter()
            .filter(|(verb, slot)| verb.starts_with(typed) && enabled(*slot))
            .map(|(verb, _)| verb.clone())
            .collect();
        match candidates.len() {
            0 => Resolution::Unknown,
            1 => Resolution::Verb(candidates.into_iter().next().unwrap_or_default()),
            _ => Resolution::Ambiguous(candidates),
        }
    }

    /// Parses and runs one line of input.
    ///
    /// With `tick` set, a history entry is opened and the clock advances
    /// after the command succeeds. Commands that run other commands pass
    /// `tick = false` so one line never costs two turns.
    pub fn run(&self, input: &str, ctx: &mut C, tick: bool) -> Dispatch {
        let input = input.trim().to_lowercase();
        if input.is_empty() {
            return Dispatch::Empty;
        }
        let (typed, arg) = match input.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (input.as_str(), ""),
        };

        let verb = match self.resolve(typed, ctx) {
            Resolution::Verb(verb) => verb,
            Resolution::Ambiguous(candidates) => {
                ctx.begin_entry(&input);
                ctx.narrate(&format!("Did you mean '{}'?", candidates.join("' or '")));
                ctx.flush();
                return Dispatch::Ambiguous(candidates);
            }
            Resolution::Unknown => {
                ctx.begin_entry(&input);
                ctx.narrate(&format!("I don't know the command '{typed}'!"));
                ctx.flush();
                return Dispatch::Unknown(typed.to_string());
            }
        };

        let Some(command) = self.index.get(&verb).map(|&p| &self.commands[self.verbs[p].1]) else {
            return Dispatch::Unknown(typed.to_string());
        };
        let name = command.name().to_string();
        if tick {
            let shown = command.history_display(&verb);
            if arg.is_empty() {
                ctx.begin_entry(&shown);
            } else {
                ctx.begin_entry(&format!("{shown} {arg}"));
            }
        }
        debug!(verb = %verb, command = %name, "dispatching command");

        match command.run(&verb, arg, ctx) {
            Ok(()) => {
                if tick {
                    ctx.tick();
                }
                Dispatch::Ran {
                    command: name,
                    verb,
                }
            }
            Err(CommandError::Refused(message)) => {
                ctx.narrate(&message);
                ctx.end_turn();
                Dispatch::Refused {
                    command: name,
                    message,
                }
            }
            Err(CommandError::Fault(fault)) => {
                error!(command = %name, error = %fault, "command failed");
                let message = fault.to_string();
                ctx.narrate(&format!("Error: {message}"));
                ctx.end_turn();
                Dispatch::Faulted {
                    command: name,
                    message,
                }
            }
        }
    }
}

fn registration(message: String) -> Error {
    Error::new(ErrorKind::CommandRegistration(message))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::command::FnCommand;
    use proptest::prelude::*;

    struct Counter {
        runs: Vec<String>,
    }

    impl CommandHost for Counter {
        fn begin_entry(&mut self, _label: &str) {}
        fn narrate(&mut self, _text: &str) {}
        fn tick(&mut self) {}
        fn end_turn(&mut self) {}
        fn flush(&mut self) {}
    }

    const VERBS: [&str; 8] = ["get", "give", "go", "look", "light", "list", "north", "n"];

    fn parser() -> CommandParser<Counter> {
        let mut parser = CommandParser::new();
        for verb in VERBS {
            parser
                .register(FnCommand::new(verb, &[verb], move |_, _, ctx: &mut Counter| {
                    ctx.runs.push(verb.to_string());
                    Ok(())
                }))
                .unwrap_or_default();
        }
        parser
    }

    proptest! {
        #[test]
        fn exact_dispatch_is_idempotent(index in 0usize..VERBS.len()) {
            let parser = parser();
            let mut ctx = Counter { runs: Vec::new() };
            let first = parser.run(VERBS[index], &mut ctx, true);
            let second = parser.run(VERBS[index], &mut ctx, true);
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(&ctx.runs[0], &ctx.runs[1]);
        }

        #[test]
        fn prefixes_run_at_most_one_command(typed in "[a-z]{1,4}") {
            let parser = parser();
            let mut ctx = Counter { runs: Vec::new() };
            match parser.run(&typed, &mut ctx, true) {
                Dispatch::Ran { verb, .. } => {
                    prop_assert!(verb.starts_with(&typed));
                    prop_assert_eq!(ctx.runs.len(), 1);
                }
                Dispatch::Ambiguous(candidates) => {
                    prop_assert!(candidates.len() > 1);
                    prop_assert!(candidates.iter().all(|c| c.starts_with(&typed)));
                    prop_assert!(ctx.runs.is_empty());
                }
                Dispatch::Unknown(_) => prop_assert!(ctx.runs.is_empty()),
                other => prop_assert!(false, "unexpected outcome {:?}", other),
            }
        }
    }
}
