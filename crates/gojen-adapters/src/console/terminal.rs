//! Interactive terminal console.

use std::io::{self, BufRead};

use console::Term;
use gojen_core::application::ports::{Console, Level};
use owo_colors::OwoColorize;

/// Writes leveled messages to stderr and reads answers from stdin.
///
/// Stdout stays free for command output.
pub struct TerminalConsole {
    term: Term,
    no_color: bool,
    quiet: bool,
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
            no_color: !console::colors_enabled_stderr(),
            quiet: false,
        }
    }

    pub fn no_color(mut self, no_color: bool) -> Self {
        self.no_color = self.no_color || no_color;
        self
    }

    /// Suppress `Info` and `Success` messages. Everything else, prompts
    /// included, is still written.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    fn suppresses(&self, level: Level) -> bool {
        self.quiet && matches!(level, Level::Info | Level::Success)
    }

    fn line(&self, level: Level, message: &str) -> String {
        let symbol = match level {
            Level::Info => "\u{2139}",    // ℹ
            Level::Success => "\u{2713}", // ✓
            Level::Warning => "\u{26a0}", // ⚠
            Level::Danger => "\u{2717}",  // ✗
            Level::Prompt => "?",
        };
        if self.no_color {
            return format!("{symbol} {message}");
        }
        match level {
            Level::Info => format!("{} {}", symbol.blue().bold(), message.blue()),
            Level::Success => format!("{} {}", symbol.green().bold(), message.green()),
            Level::Warning => format!("{} {}", symbol.yellow().bold(), message.yellow()),
            Level::Danger => format!("{} {}", symbol.red().bold(), message.red()),
            Level::Prompt => format!("{} {}", symbol.cyan().bold(), message.bold()),
        }
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for TerminalConsole {
    fn say(&self, level: Level, message: &str) {
        if self.suppresses(level) {
            return;
        }
        // Nothing sensible to do when stderr is gone.
        let _ = self.term.write_line(&self.line(level, message));
    }

    fn read_line(&self) -> io::Result<String> {
        let mut buf = String::new();
        io::stdin().lock().read_line(&mut buf)?;
        Ok(buf.trim_end_matches(['\r', '\n']).to_string())
    }
}
