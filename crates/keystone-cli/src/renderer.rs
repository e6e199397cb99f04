//! Markdown output for the terminal.
//!
//! Rich mode styles each line with termimad; plain mode prints the markdown
//! untouched, which is what `--no-color` and the integration tests rely on.

use std::io::{self, Write};

use anyhow::Result;
use termimad::{crossterm::style::Color, MadSkin};

const HEADING: &str = "\x1b[1;36m";
const RESET: &str = "\x1b[0m";

pub struct TerminalRenderer {
    rich: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Cyan);
        skin.bold.set_fg(Color::Green);
        skin.italic.set_fg(Color::DarkGrey);
        skin.inline_code.set_fg(Color::DarkGrey);
        skin.inline_code.set_bg(Color::Reset);

        Self { rich, skin }
    }

    pub fn is_rich(&self) -> bool {
        self.rich
    }

    /// Writes markdown to stdout and flushes, so progress lines appear while
    /// a run is still going.
    pub fn render(&self, markdown: &str) -> Result<()> {
        let mut out = io::stdout().lock();
        if !self.rich {
            out.write_all(markdown.as_bytes())?;
            out.flush()?;
            return Ok(());
        }

        for line in markdown.lines() {
            // Headings keep their hashes so report sections stay recognizable.
            if line.starts_with('#') {
                writeln!(out, "{HEADING}{line}{RESET}")?;
            } else {
                writeln!(out, "{}", self.skin.inline(line))?;
            }
        }
        out.flush()?;
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}
