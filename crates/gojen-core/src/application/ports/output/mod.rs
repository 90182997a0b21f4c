//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the build and apply engines need from the
//! outside world. The `gojen-adapters` crate provides implementations.

use std::io;
use std::path::{Path, PathBuf};

use crate::domain::{Args, Declaration, State};
use crate::error::GojenResult;

/// Port for template rendering.
///
/// Implemented by:
/// - `gojen_adapters::renderer::MiniJinjaRenderer`
///
/// Undefined arguments must render as empty text: paths are rendered before
/// every argument is necessarily known.
pub trait TemplateRenderer: Send + Sync {
    /// Render `template` against `args`. `name` identifies the template in
    /// error messages.
    fn render(&self, name: &str, template: &str, args: &Args) -> GojenResult<String>;
}

/// Severity of a console message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Danger,
    /// A question or the choices it offers. Shown even in quiet mode.
    Prompt,
}

/// Operator console: leveled output and blocking line input.
///
/// Implemented by:
/// - `gojen_adapters::console::TerminalConsole` (interactive)
/// - `gojen_adapters::console::ScriptedConsole` (canned answers, tests)
#[cfg_attr(test, mockall::automock)]
pub trait Console: Send + Sync {
    fn say(&self, level: Level, message: &str);

    /// Read one line of operator input, without the trailing newline.
    fn read_line(&self) -> io::Result<String>;

    /// Ask a yes/no question. Anything but an affirmative token, including a
    /// read error, is a no.
    fn confirm(&self, message: &str) -> bool {
        self.say(Level::Prompt, &format!("{message} [y/N]"));
        self.read_line()
            .map(|answer| is_affirmative(&answer))
            .unwrap_or(false)
    }
}

/// `y/Y/yes/YES/true/TRUE/1`.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim(),
        "y" | "Y" | "yes" | "YES" | "true" | "TRUE" | "1"
    )
}

/// Port for filesystem operations used by the Apply Engine.
///
/// Implemented by:
/// - `gojen_adapters::filesystem::LocalFilesystem` (production)
/// - `gojen_adapters::filesystem::MemoryFilesystem` (testing)
pub trait Filesystem: Send + Sync {
    /// Whether `path` exists and is a regular file.
    fn is_file(&self, path: &Path) -> bool;

    fn read_to_string(&self, path: &Path) -> GojenResult<String>;

    /// Replace the content of `path`, creating parent directories.
    fn write_file(&self, path: &Path, content: &str) -> GojenResult<()>;

    /// Append to the end of an existing file.
    fn append_file(&self, path: &Path, content: &str) -> GojenResult<()>;
}

/// Port persisting the audit record of each build step.
///
/// Implemented by:
/// - `gojen_adapters::audit::AuditDirectory`
/// - `gojen_adapters::audit::NullRecorder`
pub trait StateRecorder: Send + Sync {
    fn record(&self, index: usize, state: &State) -> GojenResult<()>;
}

/// A declaration together with the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDeclaration {
    pub source: PathBuf,
    pub declaration: Declaration,
}

/// Port producing declarations for the store.
///
/// Implemented by:
/// - `gojen_adapters::declaration_loader::DeclarationLoader`
pub trait DeclarationSource: Send + Sync {
    fn load(&self) -> GojenResult<Vec<LoadedDeclaration>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affirmative_tokens() {
        for yes in ["y", "Y", "yes", "YES", "true", "TRUE", "1", " y\n"] {
            assert!(is_affirmative(yes), "{yes:?}");
        }
        for no in ["", "n", "no", "Yes", "0", "yep"] {
            assert!(!is_affirmative(no), "{no:?}");
        }
    }
}
