//! Narrative history.
//!
//! Every line of narration goes into the history. Lines written during a turn
//! are buffered and handed to the [`Display`] when the game flushes, so
//! monster actions queued by the turn appear in order and can be paged.

use std::collections::VecDeque;

use delver_foundation::Style;
use delver_foundation::text::capitalize;

/// One line of narration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    /// The text.
    pub text: String,

    /// Presentation hint.
    pub style: Style,

    /// Text contains markup.
    pub markdown: bool,

    /// Short follow-up line that belongs with the previous one.
    pub no_space: bool,
}

impl Line {
    /// Creates a normal line.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Style::Normal,
            markdown: false,
            no_space: false,
        }
    }

    /// Sets the style.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Marks the line as markup.
    #[must_use]
    pub fn with_markdown(mut self, markdown: bool) -> Self {
        self.markdown = markdown;
        self
    }

    /// Marks the line as a compact follow-up.
    #[must_use]
    pub fn compact(mut self) -> Self {
        self.no_space = true;
        self
    }

    /// Rows the line takes up when counting toward a page.
    fn page_cost(&self) -> usize {
        let mut cost = if self.no_space { 1 } else { 2 };
        if self.text.len() > 150 {
            cost += 1;
        }
        if self.text.len() > 225 {
            cost += 1;
        }
        cost
    }
}

/// A command and the lines it produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Entry {
    /// The command as shown, or empty for narration outside any command.
    pub command: String,

    /// Lines already shown.
    pub lines: Vec<Line>,
}

/// Where flushed lines go. The engine never renders anything itself.
pub trait Display {
    /// Shows one line.
    fn show(&mut self, line: &Line);

    /// Called when output stops for a full page.
    fn page_break(&mut self) {}
}

/// A display that drops everything; the history still records each line.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullDisplay;

impl Display for NullDisplay {
    fn show(&mut self, _line: &Line) {}
}

/// The narrative record of a game.
#[derive(Clone, Debug)]
pub struct History {
    entries: Vec<Entry>,

    /// Lines written but not yet flushed.
    pending: VecDeque<Line>,

    /// Rows shown since the last page break.
    counter: usize,

    page_size: usize,

    suppress_next: bool,
}

impl Default for History {
    fn default() -> Self {
        Self::new(0)
    }
}

impl History {
    /// Creates an empty history that pages every `page_size` rows (zero disables paging).
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            entries: vec![Entry::default()],
            pending: VecDeque::new(),
            counter: 0,
            page_size,
            suppress_next: false,
        }
    }

    /// Opens a new entry for a command.
    pub fn push(&mut self, command: impl Into<String>) {
        self.entries.push(Entry {
            command: command.into(),
            lines: Vec::new(),
        });
        self.counter = 0;
    }

    /// Writes narration in the given style.
    pub fn write(&mut self, text: impl AsRef<str>, style: Style) {
        self.write_line(Line::new(text.as_ref()).with_style(style));
    }

    /// Writes a compact follow-up line.
    pub fn write_compact(&mut self, text: impl AsRef<str>, style: Style) {
        self.write_line(Line::new(text.as_ref()).with_style(style).compact());
    }

    /// Writes a line, capitalizing it and splitting it on newlines.
    ///
    /// Swallowed instead when [`History::suppress_next_message`] was called.
    pub fn write_line(&mut self, line: Line) {
        if std::mem::take(&mut self.suppress_next) {
            return;
        }
        let text = capitalize(&line.text);
        for part in text.split('\n') {
            self.pending.push_back(Line {
                text: part.to_string(),
                ..line.clone()
            });
        }
    }

    /// Appends text to the most recent line.
    pub fn append(&mut self, text: &str) {
        if let Some(line) = self.pending.back_mut() {
            line.text.push_str(text);
        } else if let Some(line) = self.entries.last_mut().and_then(|e| e.lines.last_mut()) {
            line.text.push_str(text);
        } else {
            self.pending.push_back(Line::new(text));
        }
    }

    /// Swallows the next write. Hooks use this to replace a default message.
    pub fn suppress_next_message(&mut self) {
        self.suppress_next = true;
    }

    /// Hands buffered lines to the display.
    ///
    /// Returns true if output stopped because a full page was shown; the
    /// remaining lines stay buffered for the next flush.
    pub fn flush(&mut self, display: &mut dyn Display) -> bool {
        let pages = self.page_size > 0
            && self.entries.last().is_some_and(|e| !e.command.is_empty());
        while let Some(line) = self.pending.pop_front() {
            display.show(&line);
            self.counter += line.page_cost();
            if let Some(entry) = self.entries.last_mut() {
                entry.lines.push(line);
            }
            if pages && self.counter > self.page_size && self.pending.len() > 2 {
                self.counter = 0;
                display.page_break();
                return true;
            }
        }
        false
    }

    /// Restarts the page count, after the player acknowledged a page break.
    pub fn reset_page(&mut self) {
        self.counter = 0;
    }

    /// Returns true if lines are waiting for a flush.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Every entry, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Lines of the current entry, shown or not.
    pub fn output(&self) -> impl Iterator<Item = &Line> {
        self.entries
            .last()
            .into_iter()
            .flat_map(|e| e.lines.iter())
            .chain(self.pending.iter())
    }

    /// The `n`th line of the current entry.
    #[must_use]
    pub fn output_line(&self, n: usize) -> Option<&Line> {
        self.output().nth(n)
    }

    /// The `n`th line from the end of the current entry; one is the last line.
    #[must_use]
    pub fn last_output(&self, n: usize) -> Option<&Line> {
        let lines: Vec<&Line> = self.output().collect();
        lines.len().checked_sub(n).map(|i| lines[i])
    }

    /// Returns true if any line of the current entry equals `text`.
    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        self.output().any(|l| l.text == text)
    }

    /// The most recent command.
    #[must_use]
    pub fn last_command(&self) -> &str {
        self.entries.last().map_or("", |e| e.command.as_str())
    }

    /// Earlier commands for recall, without consecutive repeats or the latest one.
    #[must_use]
    pub fn past_commands(&self) -> Vec<String> {
        let mut commands: Vec<String> = Vec::new();
        for entry in &self.entries {
            if !entry.command.is_empty() && commands.last() != Some(&entry.command) {
                commands.push(entry.command.clone());
            }
        }
        commands.pop();
        commands
    }

    /// Plain-text transcript: each command framed, then its lines.
    #[must_use]
    pub fn summary(&self) -> Vec<String> {
        let mut out = Vec::new();
        for entry in &self.entries {
            out.push(format!("-- {} --", entry.command));
            out.extend(entry.lines.iter().map(|l| l.text.clone()));
        }
        out.extend(self.pending.iter().map(|l| l.text.clone()));
        out
    }

    /// Forgets everything.
    pub fn clear(&mut self) {
        self.entries = vec![Entry::default()];
        self.pending.clear();
        self.counter = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Collect {
        shown: Vec<String>,
        breaks: usize,
    }

    impl Display for Collect {
        fn show(&mut self, line: &Line) {
            self.shown.push(line.text.clone());
        }

        fn page_break(&mut self) {
            self.breaks += 1;
        }
    }

    #[test]
    fn writes_are_capitalized_and_split() {
        let mut history = History::default();
        history.push("look");
        history.write("first line\nsecond line", Style::Normal);
        let texts: Vec<&str> = history.output().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["First line", "second line"]);
    }

    #[test]
    fn append_extends_the_last_line() {
        let mut history = History::default();
        history.push("look");
        history.write("A dusty room.", Style::Normal);
        history.append(" A draft blows.");
        assert_eq!(history.last_output(1).unwrap().text, "A dusty room. A draft blows.");
    }

    #[test]
    fn suppressed_write_is_swallowed_once() {
        let mut history = History::default();
        history.push("get");
        history.suppress_next_message();
        history.write("hidden", Style::Normal);
        history.write("shown", Style::Normal);
        assert!(!history.contains("Hidden"));
        assert!(history.contains("Shown"));
    }

    #[test]
    fn past_commands_skip_repeats_and_the_latest() {
        let mut history = History::default();
        for command in ["n", "n", "look", "s", "get torch"] {
            history.push(command);
        }
        assert_eq!(history.past_commands(), ["n", "look", "s"]);
    }

    #[test]
    fn summary_frames_commands() {
        let mut history = History::default();
        history.push("look");
        history.write("dark", Style::Normal);
        let mut display = Collect::default();
        history.flush(&mut display);
        assert_eq!(history.summary(), ["--  --", "-- look --", "Dark"]);
    }

    #[test]
    fn flush_pages_long_output() {
        let mut history = History::new(4);
        history.push("attack");
        for i in 0..8 {
            history.write(format!("line {i}"), Style::Normal);
        }
        let mut display = Collect::default();
        assert!(history.flush(&mut display));
        assert_eq!(display.shown.len(), 3);
        assert_eq!(display.breaks, 1);
        assert!(history.has_pending());
        history.reset_page();
        while history.flush(&mut display) {}
        assert_eq!(display.shown.len(), 8);
        assert!(!history.has_pending());
    }

    #[test]
    fn zero_page_size_never_pauses() {
        let mut history = History::new(0);
        history.push("attack");
        for i in 0..50 {
            history.write(format!("line {i}"), Style::Normal);
        }
        assert!(!history.flush(&mut NullDisplay));
        assert_eq!(history.output().count(), 50);
    }
}
