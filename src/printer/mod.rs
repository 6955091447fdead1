//! Console printer with optional ANSI colors.

use std::io::{self, Write};

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Green,
    Yellow,
    Red,
}

/// Writes report lines, coloring them only when asked to.
pub struct TextPrinter<W> {
    out: W,
    pub colored: bool,
}

impl TextPrinter<io::Stdout> {
    /// Stdout, colored when it is a terminal.
    pub fn stdout() -> Self {
        let out = io::stdout();
        let colored = out.is_terminal();
        Self { out, colored }
    }
}

impl<W: Write> TextPrinter<W> {
    pub fn new(out: W, colored: bool) -> Self {
        Self { out, colored }
    }

    pub fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", text)
    }

    pub fn colored_line(&mut self, color: Color, text: &str) -> io::Result<()> {
        if !self.colored {
            return self.line(text);
        }
        match color {
            Color::Green => writeln!(self.out, "{}", text.bold().green()),
            Color::Yellow => writeln!(self.out, "{}", text.bold().yellow()),
            Color::Red => writeln!(self.out, "{}", text.bold().red()),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
