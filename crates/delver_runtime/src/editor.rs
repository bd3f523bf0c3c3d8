//! Line editor abstraction for the REPL.
//!
//! The REPL only talks to [`LineEditor`], so tests can feed it scripted
//! lines while play uses rustyline.

use std::borrow::Cow;

use delver_foundation::{Error, ErrorKind, Result};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::hint::HistoryHinter;
use rustyline::history::DefaultHistory;
use rustyline::{Completer, Config, Context, Editor, Helper, Hinter, Validator};

/// Result of reading a line from the editor.
#[derive(Debug)]
pub enum ReadResult {
    /// A line was successfully read.
    Line(String),
    /// User pressed Ctrl+C.
    Interrupted,
    /// User pressed Ctrl+D (EOF).
    Eof,
}

/// Abstraction over line editing functionality.
pub trait LineEditor {
    /// Read a line with the given prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the terminal fails.
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult>;

    /// Add a line to history.
    fn add_history(&mut self, line: &str);

    /// Replace the words offered for completion.
    fn set_verbs(&mut self, verbs: Vec<String>);
}

/// Rustyline helper: verb completion, history hints, and prompt colors.
#[derive(Helper, Completer, Hinter, Validator)]
struct DelverHelper {
    #[rustyline(Completer)]
    completer: VerbCompleter,
    #[rustyline(Hinter)]
    hinter: HistoryHinter,
}

impl Highlighter for DelverHelper {
    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        default: bool,
    ) -> Cow<'b, str> {
        if default {
            Cow::Owned(format!("\x1b[1;32m{prompt}\x1b[0m"))
        } else {
            Cow::Borrowed(prompt)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        false
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(format!("\x1b[2m{hint}\x1b[0m"))
    }
}

/// Completes the first word of a line against the parser's verbs.
#[derive(Debug, Default)]
struct VerbCompleter {
    verbs: Vec<String>,
}

impl VerbCompleter {
    /// Completion start and candidates for the text before the cursor.
    fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<Pair>) {
        let before = &line[..pos];
        let start = before.len() - before.trim_start().len();
        let word = &before[start..];
        // Only the verb is completed; arguments are free text.
        if word.contains(char::is_whitespace) {
            return (pos, Vec::new());
        }
        let word = word.to_lowercase();
        let candidates = self
            .verbs
            .iter()
            .filter(|verb| verb.starts_with(&word))
            .map(|verb| Pair {
                display: verb.clone(),
                replacement: format!("{verb} "),
            })
            .collect();
        (start, candidates)
    }
}

impl Completer for VerbCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(self.candidates(line, pos))
    }
}

/// Line editor implementation using rustyline.
pub struct RustylineEditor {
    editor: Editor<DelverHelper, DefaultHistory>,
}

impl RustylineEditor {
    /// Creates a new rustyline-based editor.
    ///
    /// # Errors
    ///
    /// Returns an error if rustyline initialization fails.
    pub fn new() -> Result<Self> {
        let config = Config::builder()
            .auto_add_history(false)
            .max_history_size(1000)
            .map_err(|e| Error::new(ErrorKind::Internal(e.to_string())))?
            .build();

        let helper = DelverHelper {
            completer: VerbCompleter::default(),
            hinter: HistoryHinter::new(),
        };

        let mut editor = Editor::with_config(config)
            .map_err(|e| Error::new(ErrorKind::Internal(e.to_string())))?;
        editor.set_helper(Some(helper));

        Ok(Self { editor })
    }
}

impl LineEditor for RustylineEditor {
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadResult::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadResult::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadResult::Eof),
            Err(e) => Err(Error::new(ErrorKind::Internal(e.to_string()))),
        }
    }

    fn add_history(&mut self, line: &str) {
        let _ = self.editor.add_history_entry(line);
    }

    fn set_verbs(&mut self, verbs: Vec<String>) {
        if let Some(helper) = self.editor.helper_mut() {
            helper.completer.verbs = verbs;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completer() -> VerbCompleter {
        VerbCompleter {
            verbs: ["attack", "ask", "get", "go", "look"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }

    fn replacements(line: &str) -> (usize, Vec<String>) {
        let (start, pairs) = completer().candidates(line, line.len());
        (start, pairs.into_iter().map(|p| p.replacement).collect())
    }

    #[test]
    fn completes_verbs_by_prefix() {
        assert_eq!(replacements("a"), (0, vec!["attack ".to_string(), "ask ".to_string()]));
        assert_eq!(replacements("  LO"), (2, vec!["look ".to_string()]));
    }

    #[test]
    fn leaves_arguments_alone() {
        assert_eq!(replacements("get to").1, Vec::<String>::new());
    }

    #[test]
    fn empty_line_offers_everything() {
        assert_eq!(replacements("").1.len(), 5);
    }
}
