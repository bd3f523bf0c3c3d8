//! The interactive game loop.

use delver_engine::{Game, GameState, Question};
use delver_foundation::Result;
use tracing::debug;

use crate::editor::{LineEditor, ReadResult, RustylineEditor};

/// Prompt shown while output waits for a key press.
const MORE_PROMPT: &str = "[Press Enter to continue] ";

/// Interrupts in a row that end the session.
const INTERRUPTS_TO_QUIT: u8 = 2;

/// Renders an open question with its choices and suggested answer.
#[must_use]
pub fn question_text(question: &Question) -> String {
    let mut text = question.prompt.clone();
    let choices = question.choices();
    if !choices.is_empty() {
        text.push_str("\n  ");
        text.push_str(&choices.join(" | "));
    }
    if !question.answer.is_empty() {
        text.push_str(" [");
        text.push_str(&question.answer);
        text.push(']');
    }
    text
}

/// The interactive REPL.
pub struct Repl<E: LineEditor = RustylineEditor> {
    /// The line editor for input.
    editor: E,

    /// The game being played.
    game: Game,

    /// Whether to show the title banner.
    show_banner: bool,

    /// Prompt for commands.
    prompt: String,

    /// Ctrl+C presses since the last line.
    interrupts: u8,
}

impl Repl<RustylineEditor> {
    /// Creates a new REPL with the default rustyline editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialize.
    pub fn new(game: Game) -> Result<Self> {
        let editor = RustylineEditor::new()?;
        Ok(Self::with_editor(editor, game))
    }
}

impl<E: LineEditor> Repl<E> {
    /// Creates a new REPL with the given editor.
    pub fn with_editor(editor: E, game: Game) -> Self {
        Self {
            editor,
            game,
            show_banner: true,
            prompt: "> ".to_string(),
            interrupts: 0,
        }
    }

    /// Disables the title banner.
    #[must_use]
    pub const fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Sets the command prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Returns a reference to the game.
    #[must_use]
    pub const fn game(&self) -> &Game {
        &self.game
    }

    /// Returns a mutable reference to the game.
    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    /// Ends the session and hands back the game.
    #[must_use]
    pub fn into_game(self) -> Game {
        self.game
    }

    /// Plays until the game ends, input runs out, or the player interrupts twice.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            self.print_banner();
        }
        if self.game.state() == GameState::Loading {
            self.game.start();
        }
        self.editor.set_verbs(self.game.verbs());

        while !self.game.is_over() {
            if !self.read_eval_print()? {
                println!("\n{}", self.game.config.exit_message);
                break;
            }
        }
        debug!(state = ?self.game.state(), turns = self.game.timer, "session over");
        Ok(())
    }

    /// Executes one read-eval-print iteration.
    ///
    /// Returns `Ok(true)` to continue, `Ok(false)` to quit.
    fn read_eval_print(&mut self) -> Result<bool> {
        let waiting = self.game.state() == GameState::Intro || self.game.is_waiting_for_key();
        let question = self.game.pending_question().map(question_text);
        let prompt = if waiting {
            MORE_PROMPT
        } else {
            if let Some(question) = &question {
                println!("\n\x1b[1m{question}\x1b[0m");
            }
            self.prompt.as_str()
        };

        match self.editor.read_line(prompt)? {
            ReadResult::Line(line) => {
                self.interrupts = 0;
                if !waiting && question.is_none() && !line.trim().is_empty() {
                    self.editor.add_history(&line);
                }
                let dispatch = self.game.input(&line);
                debug!(?dispatch, "line handled");
                Ok(true)
            }
            ReadResult::Interrupted => {
                self.interrupts += 1;
                if self.interrupts >= INTERRUPTS_TO_QUIT {
                    return Ok(false);
                }
                println!("\n(Press Ctrl+C again to quit.)");
                Ok(true)
            }
            ReadResult::Eof => Ok(false),
        }
    }

    fn print_banner(&self) {
        println!("\x1b[1;36m{}\x1b[0m", self.game.info.name);
        if !self.game.info.description.is_empty() {
            println!("{}", self.game.info.description);
        }
        println!();
    }
}
