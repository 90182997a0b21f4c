//! Core domain layer for Gojen.
//!
//! Pure data and algorithms: no filesystem, no console, no template engine.
//! Those concerns are reached through the ports in `crate::application`.
//!
//! - **Args**: argument context with ordered merge and key extraction
//! - **Declaration / Element / Strategy**: what can be generated
//! - **Sequence / SequencePlan**: in which order, with which branches
//! - **State / ModifiedFiles**: what a run produced
//! - **similarity**: duplicate-content heuristic
//! - **DependencyGraph**: declaration inter-dependencies

pub mod args;
pub mod declaration;
pub mod dependency;
pub mod error;
pub mod plan;
pub mod sequence;
pub mod similarity;
pub mod state;

mod validation;

pub use args::Args;
pub use declaration::{Declaration, Element, Strategy};
pub use dependency::DependencyGraph;
pub use error::{DomainError, ErrorCategory};
pub use plan::{PlanSelect, PlanStep, SequencePlan};
pub use sequence::{Branch, NodeId, SeqNode, Sequence, Switcher};
pub use similarity::Similarity;
pub use state::{ModifiedFiles, State};
pub use validation::DomainValidator;
