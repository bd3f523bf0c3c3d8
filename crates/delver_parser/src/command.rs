//! The command contract.

use delver_foundation::Error;
use thiserror::Error;

/// Why a command did not complete.
#[derive(Debug, Error)]
pub enum CommandError {
    /// An expected "you can't do that" outcome. The message is shown to the
    /// player as ordinary narration.
    #[error("{0}")]
    Refused(String),

    /// Something went wrong that the player could not have caused.
    #[error(transparent)]
    Fault(#[from] Error),
}

impl CommandError {
    /// Creates a player-facing refusal.
    #[must_use]
    pub fn refused(message: impl Into<String>) -> Self {
        Self::Refused(message.into())
    }

    /// Returns true for player-facing refusals.
    #[must_use]
    pub const fn is_refusal(&self) -> bool {
        matches!(self, Self::Refused(_))
    }
}

/// Result type for command bodies.
pub type CommandResult = std::result::Result<(), CommandError>;

/// Something the player can type.
///
/// `C` is the context a command runs against, usually the game itself.
pub trait Command<C> {
    /// Unique machine name.
    fn name(&self) -> &str;

    /// Every verb that runs this command, in preferred order.
    fn verbs(&self) -> &[&'static str];

    /// Text recorded in the history for the resolved verb.
    fn history_display(&self, verb: &str) -> String {
        verb.to_string()
    }

    /// One-line help text.
    fn description(&self) -> &str {
        ""
    }

    /// Whether the verbs resolve at all right now. Disabled commands read as
    /// unknown verbs.
    fn enabled(&self, _ctx: &C) -> bool {
        true
    }

    /// Runs the command with the fully resolved verb and the trimmed argument.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Refused`] for player mistakes and
    /// [`CommandError::Fault`] for engine faults.
    fn run(&self, verb: &str, arg: &str, ctx: &mut C) -> CommandResult;
}

/// A command assembled from a closure, for adventure-specific verbs.
pub struct FnCommand<C> {
    name: String,
    verbs: Vec<&'static str>,
    description: String,
    body: Box<dyn Fn(&str, &str, &mut C) -> CommandResult>,
}

impl<C> FnCommand<C> {
    /// Creates a command from a name, its verbs, and a body.
    pub fn new(
        name: impl Into<String>,
        verbs: &[&'static str],
        body: impl Fn(&str, &str, &mut C) -> CommandResult + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            verbs: verbs.to_vec(),
            description: String::new(),
            body: Box::new(body),
        }
    }

    /// Sets the help text.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl<C> Command<C> for FnCommand<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn verbs(&self) -> &[&'static str] {
        &self.verbs
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn run(&self, verb: &str, arg: &str, ctx: &mut C) -> CommandResult {
        (self.body)(verb, arg, ctx)
    }
}

impl<C> std::fmt::Debug for FnCommand<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnCommand")
            .field("name", &self.name)
            .field("verbs", &self.verbs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refusal_displays_its_message() {
        let err = CommandError::refused("You can't go that way!");
        assert!(err.is_refusal());
        assert_eq!(err.to_string(), "You can't go that way!");
    }

    #[test]
    fn faults_wrap_engine_errors() {
        let err: CommandError = Error::internal("boom").into();
        assert!(!err.is_refusal());
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn closure_commands_run() {
        let cmd = FnCommand::new("count", &["count"], |_, arg, total: &mut usize| {
            *total += arg.len();
            Ok(())
        });
        let mut total = 0;
        cmd.run("count", "abc", &mut total).unwrap();
        assert_eq!(total, 3);
        assert_eq!(cmd.verbs(), &["count"]);
    }
}
