//! Application layer for Gojen.
//!
//! This layer contains:
//! - **Services**: the Declaration Store, Build Engine and Apply Engine
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Prompts**: operator decisions expressed as data
//! - **Errors**: Application-specific error types
//!
//! Rules about declarations and sequences live in `crate::domain`; this
//! layer sequences them and talks to the ports.

pub mod error;
pub mod ports;
pub mod prompt;
pub mod services;

pub use services::{
    ApplyReport, ApplyService, BuildReport, BuildService, Commit, DEFAULT_COMMENT_PREFIX,
    DeclarationStore, StepOutcome,
};

pub use ports::{
    Console, DeclarationSource, Filesystem, Level, LoadedDeclaration, StateRecorder,
    TemplateRenderer,
};

pub use error::ApplicationError;
pub use prompt::{Answer, Prompt};
