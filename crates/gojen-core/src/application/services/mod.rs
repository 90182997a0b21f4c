//! Application services - orchestrate use cases.
//!
//! The store holds what a run knows, the build service renders states from a
//! sequence, and the apply service commits those states to files.

pub mod apply_service;
pub mod build_service;
pub mod declaration_store;

pub use apply_service::{ApplyReport, ApplyService, Commit, DEFAULT_COMMENT_PREFIX};
pub use build_service::{BuildReport, BuildService, StepOutcome};
pub use declaration_store::DeclarationStore;
