//! State recorders.
//!
//! [`AuditDirectory`] writes one YAML file per build step under a directory
//! named after the run's start time:
//!
//! ```text
//! <state_dir>/<YYYYmmddHHMMSSmmm>[-n]/state/<index>_<decl>_<element>.yaml
//! ```
//!
//! The `-n` suffix appears only when a run directory with the same stamp
//! already exists. Files are write-once and never read back by the engine.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use gojen_core::{
    application::{ApplicationError, ports::StateRecorder},
    domain::State,
    error::GojenResult,
};
use tracing::{debug, instrument};

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S%3f";

/// Persists audit states for a single run.
#[derive(Debug, Clone)]
pub struct AuditDirectory {
    run_dir: PathBuf,
}

impl AuditDirectory {
    /// Scope a new run under `state_dir`, stamped with the current local
    /// time to the millisecond. Never reuses an existing run directory.
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        let state_dir = state_dir.as_ref();
        let stamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let mut run = stamp.clone();
        let mut n = 1;
        while state_dir.join(&run).exists() {
            run = format!("{stamp}-{n}");
            n += 1;
        }
        Self::with_run_name(state_dir, run)
    }

    pub fn with_run_name(state_dir: impl AsRef<Path>, run: impl AsRef<str>) -> Self {
        Self {
            run_dir: state_dir.as_ref().join(run.as_ref()).join("state"),
        }
    }

    /// Directory the state files land in.
    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    pub fn file_for(&self, index: usize, state: &State) -> PathBuf {
        self.run_dir
            .join(format!("{}_{}_{}.yaml", index, state.decl, state.element))
    }
}

impl StateRecorder for AuditDirectory {
    #[instrument(skip(self, state), fields(step = %state.step_name()))]
    fn record(&self, index: usize, state: &State) -> GojenResult<()> {
        let failed = |reason: String| ApplicationError::Recording {
            index,
            step: state.step_name(),
            reason,
        };

        let body = serde_yaml::to_string(state).map_err(|e| failed(e.to_string()))?;
        fs::create_dir_all(&self.run_dir).map_err(|e| failed(e.to_string()))?;

        let file = self.file_for(index, state);
        write_once(&file, &body).map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => failed(format!("{} already exists", file.display())),
            _ => failed(e.to_string()),
        })?;
        debug!(file = %file.display(), "state recorded");
        Ok(())
    }
}

fn write_once(path: &Path, body: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    file.write_all(body.as_bytes())
}

/// Recorder that keeps nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRecorder;

impl StateRecorder for NullRecorder {
    fn record(&self, _index: usize, _state: &State) -> GojenResult<()> {
        Ok(())
    }
}
