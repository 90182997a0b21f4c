//! Infrastructure adapters for Gojen.
//!
//! This crate implements the ports defined in `gojen-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod audit;
pub mod console;
pub mod declaration_loader;
pub mod filesystem;
pub mod renderer;

// Re-export commonly used adapters
pub use audit::{AuditDirectory, NullRecorder};
pub use console::{ScriptedConsole, TerminalConsole};
pub use declaration_loader::{DeclarationFormat, DeclarationLoader};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use renderer::{Inflections, MiniJinjaRenderer};
