//! Sequence graph: the operator's plan of build steps.
//!
//! Nodes live in an arena owned by [`Sequence`]; a [`NodeId`] is an index into
//! it and the root is always id 0. Growth is append-only, so the graph is
//! acyclic by construction.
//!
//! ```text
//! service.init ── service.method ─┬─ handler.get  ──┐
//!                                 └─ handler.post ──┴── routes.register
//! ```
//!
//! A node owning `cases` has no direct `next`. Appending after a select
//! attaches the new node as `next` of every open tail under those cases, so
//! the continuation is one shared node reached from each branch.

use std::collections::BTreeMap;
use std::fmt;

use tracing::warn;

use crate::domain::args::Args;

/// Index of a node in its [`Sequence`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One build step: `decl.element`.
#[derive(Debug, Clone, PartialEq)]
pub struct SeqNode {
    pub decl: String,
    pub element: String,
    /// Argument names copied into the run context after this step.
    pub forward: Vec<String>,
    /// Step-local arguments; override every other source.
    pub args: Args,
    pub next: Option<NodeId>,
    /// Mutually exclusive branches keyed by element name.
    pub cases: BTreeMap<String, NodeId>,
}

impl SeqNode {
    fn new(decl: &str, element: &str, args: Args) -> Self {
        Self {
            decl: decl.to_string(),
            element: element.to_string(),
            forward: Vec::new(),
            args,
            next: None,
            cases: BTreeMap::new(),
        }
    }

    pub fn has_cases(&self) -> bool {
        !self.cases.is_empty()
    }

    /// Sorted case keys, as offered to the operator.
    pub fn case_keys(&self) -> Vec<&str> {
        self.cases.keys().map(String::as_str).collect()
    }
}

/// Arena-backed sequence with a builder cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    nodes: Vec<SeqNode>,
    cursor: NodeId,
}

impl Sequence {
    /// Start a sequence with `decl.element` as root.
    pub fn new(decl: impl AsRef<str>, element: impl AsRef<str>) -> Self {
        Self {
            nodes: vec![SeqNode::new(decl.as_ref(), element.as_ref(), Args::new())],
            cursor: NodeId(0),
        }
    }

    /// Like [`Sequence::new`], with node-local args on the root.
    pub fn with_args(decl: impl AsRef<str>, element: impl AsRef<str>, args: Args) -> Self {
        Self {
            nodes: vec![SeqNode::new(decl.as_ref(), element.as_ref(), args)],
            cursor: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Node the builder methods currently extend.
    pub fn cursor(&self) -> NodeId {
        self.cursor
    }

    pub fn node(&self, id: NodeId) -> &SeqNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&SeqNode> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append one step per element after the current frontier.
    pub fn append<S: AsRef<str>>(&mut self, decl: &str, elements: &[S]) -> &mut Self {
        for element in elements {
            self.cursor = self.attach(self.cursor, decl, element.as_ref(), Args::new());
        }
        self
    }

    /// Append `decl.element` once per argument set, each step carrying its own
    /// node-local args.
    pub fn append_with(&mut self, decl: &str, element: &str, with: Vec<Args>) -> &mut Self {
        for args in with {
            self.cursor = self.attach(self.cursor, decl, element, args);
        }
        self
    }

    /// Mark argument names of the current step for propagation.
    pub fn forward<S: AsRef<str>>(&mut self, names: &[S]) -> &mut Self {
        let cursor = self.cursor;
        self.set_forward(cursor, names);
        self
    }

    /// Branch the current step into one case per element.
    ///
    /// The cursor stays on the owning node, so a later [`Sequence::append`]
    /// continues every branch.
    pub fn select<S, F>(&mut self, decl: &str, elements: &[S], handler: F) -> &mut Self
    where
        S: AsRef<str>,
        F: FnOnce(&mut Switcher<'_>),
    {
        let cursor = self.cursor;
        self.branch_at(cursor, decl, elements, handler);
        self
    }

    /// Open tails reachable from `id`.
    ///
    /// A node without cases is its own frontier when it has no `next`, else
    /// the frontier of `next`. A node with cases yields the union over its
    /// cases, de-duplicated in discovery order.
    pub fn frontier(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_frontier(id, &mut out);
        out
    }

    fn collect_frontier(&self, id: NodeId, out: &mut Vec<NodeId>) {
        let node = self.node(id);
        if node.has_cases() {
            for &case in node.cases.values() {
                self.collect_frontier(case, out);
            }
        } else if let Some(next) = node.next {
            self.collect_frontier(next, out);
        } else if !out.contains(&id) {
            out.push(id);
        }
    }

    fn attach(&mut self, at: NodeId, decl: &str, element: &str, args: Args) -> NodeId {
        let tails = self.frontier(at);
        let id = NodeId(self.nodes.len());
        self.nodes.push(SeqNode::new(decl, element, args));
        for tail in tails {
            self.nodes[tail.0].next = Some(id);
        }
        id
    }

    fn set_forward<S: AsRef<str>>(&mut self, at: NodeId, names: &[S]) {
        let forward = &mut self.nodes[at.0].forward;
        for name in names {
            let name = name.as_ref();
            if !forward.iter().any(|f| f == name) {
                forward.push(name.to_string());
            }
        }
    }

    fn branch_at<S, F>(&mut self, at: NodeId, decl: &str, elements: &[S], handler: F)
    where
        S: AsRef<str>,
        F: FnOnce(&mut Switcher<'_>),
    {
        for element in elements {
            let element = element.as_ref();
            let id = NodeId(self.nodes.len());
            self.nodes.push(SeqNode::new(decl, element, Args::new()));
            self.nodes[at.0].cases.insert(element.to_string(), id);
        }

        let mut switcher = Switcher { seq: self, owner: at };
        handler(&mut switcher);
    }

    fn fmt_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        id: NodeId,
        depth: usize,
        seen: &mut Vec<NodeId>,
    ) -> fmt::Result {
        let pad = "  ".repeat(depth);
        let mut current = Some(id);
        while let Some(id) = current {
            let node = self.node(id);
            if seen.contains(&id) {
                writeln!(f, "{pad}└─> {}.{}", node.decl, node.element)?;
                return Ok(());
            }
            seen.push(id);

            write!(f, "{pad}{}.{}", node.decl, node.element)?;
            if !node.forward.is_empty() {
                write!(f, " [forward: {}]", node.forward.join(", "))?;
            }
            if !node.args.is_empty() {
                write!(f, " {}", node.args)?;
            }
            writeln!(f)?;

            for (key, &case) in &node.cases {
                writeln!(f, "{pad}  when {key}:")?;
                self.fmt_node(f, case, depth + 2, seen)?;
            }
            if node.has_cases() {
                // Continuations hang off the case tails.
                return Ok(());
            }
            current = node.next;
        }
        Ok(())
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut seen = Vec::new();
        self.fmt_node(f, self.root(), 0, &mut seen)
    }
}

/// Handed to a [`Sequence::select`] handler to extend individual cases.
pub struct Switcher<'a> {
    seq: &'a mut Sequence,
    owner: NodeId,
}

impl Switcher<'_> {
    /// Extend the case named `element`. Unknown names are ignored.
    pub fn when<F>(&mut self, element: &str, build: F) -> &mut Self
    where
        F: FnOnce(&mut Branch<'_>),
    {
        match self.seq.node(self.owner).cases.get(element).copied() {
            Some(case) => {
                let mut branch = Branch {
                    seq: self.seq,
                    cursor: case,
                };
                build(&mut branch);
            }
            None => warn!(element, "select has no case with this name, ignoring"),
        }
        self
    }
}

/// Builder cursor inside one case of a select.
pub struct Branch<'a> {
    seq: &'a mut Sequence,
    cursor: NodeId,
}

impl Branch<'_> {
    pub fn cursor(&self) -> NodeId {
        self.cursor
    }

    pub fn append<S: AsRef<str>>(&mut self, decl: &str, elements: &[S]) -> &mut Self {
        for element in elements {
            self.cursor = self
                .seq
                .attach(self.cursor, decl, element.as_ref(), Args::new());
        }
        self
    }

    pub fn append_with(&mut self, decl: &str, element: &str, with: Vec<Args>) -> &mut Self {
        for args in with {
            self.cursor = self.seq.attach(self.cursor, decl, element, args);
        }
        self
    }

    pub fn forward<S: AsRef<str>>(&mut self, names: &[S]) -> &mut Self {
        self.seq.set_forward(self.cursor, names);
        self
    }

    pub fn select<S, F>(&mut self, decl: &str, elements: &[S], handler: F) -> &mut Self
    where
        S: AsRef<str>,
        F: FnOnce(&mut Switcher<'_>),
    {
        self.seq.branch_at(self.cursor, decl, elements, handler);
        self
    }
}
