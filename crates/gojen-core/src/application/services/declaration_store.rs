//! Declaration Store - the run-scoped registry.
//!
//! Owns the declaration map, the run-global argument context and the
//! append-only list of built states.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ports::{Console, DeclarationSource, Level},
        prompt::{Answer, Prompt},
    },
    domain::{Args, Declaration, DependencyGraph, DomainValidator as validator, State},
    error::GojenResult,
};

pub struct DeclarationStore {
    decls: BTreeMap<String, Declaration>,
    args: Args,
    states: Vec<State>,
    graph: DependencyGraph,
    console: Arc<dyn Console>,
}

impl DeclarationStore {
    pub fn new(console: Arc<dyn Console>) -> Self {
        Self {
            decls: BTreeMap::new(),
            args: Args::new(),
            states: Vec::new(),
            graph: DependencyGraph::new(),
            console,
        }
    }

    /// Register a declaration.
    ///
    /// Returns `false`, leaving the store untouched, when the name is empty,
    /// the declaration is invalid, or the operator declines to overwrite an
    /// existing declaration of the same name.
    ///
    /// # Panics
    ///
    /// If `decl.dependencies` close a cycle with already registered
    /// declarations.
    #[instrument(skip_all, fields(declaration = %decl.name))]
    pub fn set_decl(&mut self, decl: Declaration) -> bool {
        if decl.name.trim().is_empty() {
            self.console
                .say(Level::Warning, "Declaration name is required. Skipping...");
            return false;
        }

        if let Err(e) = validator::validate_declaration(&decl) {
            warn!(error = %e, "rejecting declaration");
            self.console.say(Level::Danger, &e.to_string());
            return false;
        }

        if self.decls.contains_key(&decl.name) {
            let prompt = Prompt::confirm(format!(
                "Declaration with name '{}' already exists. Do you want to override it?",
                decl.name
            ));
            if !matches!(prompt.ask(self.console.as_ref()), Ok(Answer::Yes)) {
                debug!("overwrite declined");
                return false;
            }
        }

        self.graph.insert(&decl.name, &decl.dependencies);
        self.decls.insert(decl.name.clone(), decl);
        true
    }

    pub fn get_decl(&self, name: &str) -> Option<&Declaration> {
        self.decls.get(name)
    }

    /// Declarations sorted by name.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.decls.values()
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub fn dependencies(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Merge `partial` into the run-global context; later keys win.
    pub fn update_args(&mut self, partial: &Args) {
        self.args.merge(partial);
    }

    /// Pure extraction from the run-global context.
    pub fn get_args<S: AsRef<str>>(&self, keys: &[S]) -> (Args, Vec<String>) {
        self.args.extract(keys)
    }

    pub fn args(&self) -> &Args {
        &self.args
    }

    pub(crate) fn replace_args(&mut self, args: Args) {
        self.args = args;
    }

    pub fn add_state(&mut self, state: State) {
        self.states.push(state);
    }

    /// Built states in FIFO order.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn last_state(&self) -> Option<&State> {
        self.states.last()
    }

    pub fn console(&self) -> &Arc<dyn Console> {
        &self.console
    }

    /// Register everything `source` yields. Returns how many were accepted.
    #[instrument(skip_all)]
    pub fn load(&mut self, source: &dyn DeclarationSource) -> GojenResult<usize> {
        let mut accepted = 0;
        for loaded in source.load()? {
            if self.set_decl(loaded.declaration) {
                info!(source = %loaded.source.display(), "loaded declaration");
                self.console.say(
                    Level::Info,
                    &format!(
                        "Loaded declaration from: '{}'",
                        loaded.source.display()
                    ),
                );
                accepted += 1;
            }
        }
        Ok(accepted)
    }
}
