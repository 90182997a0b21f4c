//! Apply Engine - commits built states to files.
//!
//! States are processed strictly in order: `append` and `append_at_last`
//! read what earlier states of the same run may have written.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ports::{Console, Filesystem, Level},
        prompt::{Answer, Prompt},
    },
    domain::{ModifiedFiles, State, Strategy, similarity},
    error::GojenResult,
};

pub const DEFAULT_COMMENT_PREFIX: &str = "//";

/// Outcome of an apply run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyReport {
    pub modified: ModifiedFiles,
    /// Destinations of states that were not committed, in order.
    pub skipped: Vec<PathBuf>,
}

/// What happened to one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    Written,
    Skipped,
}

pub struct ApplyService {
    filesystem: Box<dyn Filesystem>,
    console: Arc<dyn Console>,
    comment_prefix: String,
}

impl ApplyService {
    pub fn new(filesystem: Box<dyn Filesystem>, console: Arc<dyn Console>) -> Self {
        Self {
            filesystem,
            console,
            comment_prefix: DEFAULT_COMMENT_PREFIX.to_string(),
        }
    }

    /// Comment prefix of anchor-marker lines.
    pub fn with_comment_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.comment_prefix = prefix.into();
        self
    }

    /// The marker line `append` inserts after.
    pub fn marker(&self, alias: &str) -> String {
        format!("{} +gojen:append={}", self.comment_prefix, alias)
    }

    /// Commit `states` in order.
    ///
    /// A filesystem error aborts the remaining states; earlier writes are
    /// not rolled back.
    #[instrument(skip_all, fields(states = states.len()))]
    pub fn apply(&self, states: &[State]) -> GojenResult<ApplyReport> {
        let mut report = ApplyReport::default();

        for state in states {
            match self.commit(state)? {
                Commit::Written => {
                    report.modified.insert(&state.path);
                }
                Commit::Skipped => report.skipped.push(state.path.clone()),
            }
        }

        info!(
            modified = report.modified.len(),
            skipped = report.skipped.len(),
            "apply finished"
        );
        Ok(report)
    }

    /// Commit one state according to its strategy.
    #[instrument(skip_all, fields(step = %state.step_name(), path = %state.path.display()))]
    pub fn commit(&self, state: &State) -> GojenResult<Commit> {
        let path = state.path.as_path();

        match state.strategy {
            Strategy::Init => {
                if self.filesystem.is_file(path) {
                    info!("file exists, skipping init");
                    self.say(Level::Info, format!("Skipped '{}': file exists", path.display()));
                    return Ok(Commit::Skipped);
                }
                self.write(path, &state.content)
            }
            Strategy::Trunc => {
                let question = format!("File '{}' will be overwritten. Continue?", path.display());
                if !self.confirmed(question)? {
                    return Ok(Commit::Skipped);
                }
                self.write(path, &state.content)
            }
            Strategy::AppendAtLast => {
                if !self.filesystem.is_file(path) {
                    let question =
                        format!("File '{}' does not exist. Create it?", path.display());
                    if !self.confirmed(question)? {
                        return Ok(Commit::Skipped);
                    }
                    return self.write(path, &state.content);
                }

                let existing = self.filesystem.read_to_string(path)?;
                if !self.passes_similarity_gate(state, &existing)? {
                    return Ok(Commit::Skipped);
                }
                self.filesystem.append_file(path, &state.content)?;
                self.say(Level::Success, format!("Appended to '{}'", path.display()));
                Ok(Commit::Written)
            }
            Strategy::Append => {
                if !self.filesystem.is_file(path) {
                    debug!("destination absent, nothing to append to");
                    return Ok(Commit::Skipped);
                }

                let existing = self.filesystem.read_to_string(path)?;
                if !self.passes_similarity_gate(state, &existing)? {
                    return Ok(Commit::Skipped);
                }

                let marker = self.marker(&state.alias);
                match insert_after_marker(&existing, &marker, &state.content) {
                    Some(updated) => {
                        self.filesystem.write_file(path, &updated)?;
                        self.say(
                            Level::Success,
                            format!("Inserted into '{}' after '{}'", path.display(), marker),
                        );
                        Ok(Commit::Written)
                    }
                    None => {
                        warn!(%marker, "anchor marker not found");
                        self.say(
                            Level::Warning,
                            format!("Marker '{}' not found in '{}'", marker, path.display()),
                        );
                        Ok(Commit::Skipped)
                    }
                }
            }
        }
    }

    fn write(&self, path: &Path, content: &str) -> GojenResult<Commit> {
        self.filesystem.write_file(path, content)?;
        self.say(Level::Success, format!("Wrote '{}'", path.display()));
        Ok(Commit::Written)
    }

    fn confirmed(&self, question: String) -> GojenResult<bool> {
        Ok(Prompt::confirm(question).ask(self.console.as_ref())? == Answer::Yes)
    }

    fn passes_similarity_gate(&self, state: &State, existing: &str) -> GojenResult<bool> {
        let sim = similarity::compare(&state.content, existing, &state.ignore_comparing_lines);
        if !sim.overlaps() {
            return Ok(true);
        }

        self.say(
            Level::Warning,
            format!(
                "{:.2}% of the content for '{}' already exists:\n{}",
                sim.percent,
                state.path.display(),
                sim.segment()
            ),
        );
        let proceed = self.confirmed("Append anyway?".to_string())?;
        if !proceed {
            warn!(percent = sim.percent, "similar content, state skipped");
        }
        Ok(proceed)
    }

    fn say(&self, level: Level, message: String) {
        self.console.say(level, &message);
    }
}

/// Insert `content` on the line after the first line equal (trimmed) to
/// `marker`. Text around the insertion is kept verbatim.
///
/// Returns `None` when no line matches.
pub fn insert_after_marker(existing: &str, marker: &str, content: &str) -> Option<String> {
    let mut lines: Vec<&str> = existing.split('\n').collect();
    let at = lines.iter().position(|l| l.trim() == marker)? + 1;
    if at == lines.len() {
        lines.push("");
    }

    let (before, after) = lines.split_at(at);
    let mut out = before.join("\n");
    out.push('\n');
    out.push_str(content);
    if !content.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&after.join("\n"));
    Some(out)
}
