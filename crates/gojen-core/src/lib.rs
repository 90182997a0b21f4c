//! Gojen Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for Gojen, a
//! declarative code-scaffolding engine, following hexagonal (ports and
//! adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            gojen-cli (CLI)              │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (DeclarationStore, Build, Apply)        │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Renderer, Console, Filesystem, ...)    │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     gojen-adapters (Infrastructure)     │
//! │ (MiniJinjaRenderer, LocalFilesystem)    │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Declaration, Sequence, State, Args)    │
//! │         No I/O                          │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gojen_core::prelude::*;
//! # fn run(
//! #     console: std::sync::Arc<dyn Console>,
//! #     renderer: Box<dyn TemplateRenderer>,
//! #     recorder: Box<dyn StateRecorder>,
//! #     filesystem: Box<dyn Filesystem>,
//! # ) -> GojenResult<()> {
//!
//! // 1. Register declarations
//! let mut store = DeclarationStore::new(console.clone());
//! store.set_decl(
//!     Declaration::new("service", "internal/{{ Domain | snake }}.go")
//!         .require(["Domain"])
//!         .element(Element::new("init", Strategy::Init).template("package service")),
//! );
//!
//! // 2. Describe the sequence
//! let seq = Sequence::new("service", "init");
//!
//! // 3. Build states, then commit them
//! let built = BuildService::new(renderer, recorder).build(&mut store, &seq)?;
//! let applied = ApplyService::new(filesystem, console).apply(&built.states)?;
//! # let _ = applied;
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        Answer, ApplyReport, ApplyService, BuildReport, BuildService, DeclarationStore, Prompt,
        ports::{
            Console, DeclarationSource, Filesystem, Level, LoadedDeclaration, StateRecorder,
            TemplateRenderer,
        },
    };
    pub use crate::domain::{
        Args, Declaration, Element, ModifiedFiles, Sequence, SequencePlan, State, Strategy,
    };
    pub use crate::error::{GojenError, GojenResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
