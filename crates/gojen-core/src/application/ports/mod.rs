//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `gojen-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `TemplateRenderer`: Template rendering
//!   - `Console`: Operator output and prompts
//!   - `Filesystem`: File reads and writes
//!   - `StateRecorder`: Audit records of build steps
//!   - `DeclarationSource`: Declaration files
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    Console, DeclarationSource, Filesystem, Level, LoadedDeclaration, StateRecorder,
    TemplateRenderer, is_affirmative,
};

#[cfg(test)]
pub use output::MockConsole;
