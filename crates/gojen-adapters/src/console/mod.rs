//! Console adapters.

mod scripted;
mod terminal;

pub use scripted::ScriptedConsole;
pub use terminal::TerminalConsole;
