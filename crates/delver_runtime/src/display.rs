//! Terminal output for narration.

use std::io::{self, Stdout, Write};

use delver_engine::{Display, Line};
use delver_foundation::Style;

/// ANSI escape that starts a style, or nothing for plain narration.
#[must_use]
pub const fn style_code(style: Style) -> &'static str {
    match style {
        Style::Normal => "",
        Style::Special => "\x1b[36m",
        Style::Success => "\x1b[32m",
        Style::Warning => "\x1b[33m",
        Style::Danger => "\x1b[1;31m",
    }
}

/// Turns `**bold**` markup into ANSI bold, resuming `resume` afterwards.
fn render_markup(text: &str, resume: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, part) in text.split("**").enumerate() {
        if i > 0 {
            if i % 2 == 1 {
                out.push_str("\x1b[1m");
            } else {
                out.push_str("\x1b[0m");
                out.push_str(resume);
            }
        }
        out.push_str(part);
    }
    out
}

/// Prints narration with terminal colors.
///
/// Each line is separated from the one before by a blank line, unless it is
/// a compact follow-up.
#[derive(Debug)]
pub struct AnsiDisplay<W: Write = Stdout> {
    out: W,
    started: bool,
}

impl AnsiDisplay<Stdout> {
    /// A display on standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> AnsiDisplay<W> {
    /// A display writing to any sink.
    pub const fn new(out: W) -> Self {
        Self { out, started: false }
    }

    /// Returns the sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &Line) -> io::Result<()> {
        if self.started && !line.no_space {
            writeln!(self.out)?;
        }
        self.started = true;
        let code = style_code(line.style);
        let text = if line.markdown {
            render_markup(&line.text, code)
        } else {
            line.text.clone()
        };
        if code.is_empty() && !line.markdown {
            writeln!(self.out, "{text}")?;
        } else {
            writeln!(self.out, "{code}{text}\x1b[0m")?;
        }
        self.out.flush()
    }
}

impl<W: Write> Display for AnsiDisplay<W> {
    fn show(&mut self, line: &Line) {
        // A closed terminal leaves nothing to report to.
        let _ = self.write_line(line);
    }

    fn page_break(&mut self) {
        let _ = writeln!(self.out, "\x1b[2m-- more --\x1b[0m").and_then(|()| self.out.flush());
    }
}
