//! Filesystem-based declaration loader.
//!
//! Walks a directory tree and decodes every `.json`, `.yaml` and `.yml` file
//! into declarations. Other files are ignored.
//!
//! # File shapes
//!
//! A single declaration:
//!
//! ```yaml
//! name: service
//! path: internal/service/{{ Domain | snake }}.go
//! require: [Domain]
//! elements:
//!   - name: init
//!     strategy: init
//!     template: |
//!       package service
//!       // +gojen:append=methods
//! ```
//!
//! or a name-keyed map of declarations, where an empty `name` is taken from
//! the key:
//!
//! ```yaml
//! service:
//!   path: internal/service/{{ Domain | snake }}.go
//!   elements: [...]
//! ```

use std::path::{Path, PathBuf};

use gojen_core::{
    application::{
        ApplicationError,
        ports::{DeclarationSource, LoadedDeclaration},
    },
    domain::Declaration,
    error::GojenResult,
};
use serde_json::Value;
use tracing::{debug, instrument};
use walkdir::WalkDir;

/// Decoder selected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationFormat {
    Json,
    Yaml,
}

impl DeclarationFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Decode one file's content into its declarations.
    pub fn decode(self, raw: &str) -> Result<Vec<Declaration>, String> {
        let value: Value = match self {
            Self::Json => serde_json::from_str(raw).map_err(|e| e.to_string())?,
            Self::Yaml => serde_yaml::from_str(raw).map_err(|e| e.to_string())?,
        };
        declarations_from_value(value)
    }
}

fn declarations_from_value(value: Value) -> Result<Vec<Declaration>, String> {
    let Value::Object(map) = value else {
        return Err("expected a declaration or a map of declarations".into());
    };

    if map.contains_key("elements") {
        let decl = serde_json::from_value(Value::Object(map)).map_err(|e| e.to_string())?;
        return Ok(vec![decl]);
    }

    map.into_iter()
        .map(|(key, value)| {
            let mut decl: Declaration =
                serde_json::from_value(value).map_err(|e| format!("'{key}': {e}"))?;
            if decl.name.is_empty() {
                decl.name = key;
            }
            Ok(decl)
        })
        .collect()
}

/// Loads declarations from every supported file under `dir`, recursively,
/// in file-name order.
#[derive(Debug, Clone)]
pub struct DeclarationLoader {
    dir: PathBuf,
}

impl DeclarationLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DeclarationSource for DeclarationLoader {
    /// # Errors
    ///
    /// `Load` when `dir` is missing, a file cannot be read, or a supported
    /// file does not decode.
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    fn load(&self) -> GojenResult<Vec<LoadedDeclaration>> {
        if !self.dir.is_dir() {
            return Err(ApplicationError::Load {
                path: self.dir.clone(),
                reason: "declarations directory not found".into(),
            }
            .into());
        }

        let mut loaded = Vec::new();
        for entry in WalkDir::new(&self.dir).sort_by_file_name() {
            let entry = entry.map_err(|e| ApplicationError::Load {
                path: self.dir.clone(),
                reason: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Some(format) = DeclarationFormat::from_path(path) else {
                debug!(path = %path.display(), "not a declaration file");
                continue;
            };

            let raw = std::fs::read_to_string(path).map_err(|e| ApplicationError::Load {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
            let decls = format.decode(&raw).map_err(|reason| ApplicationError::Load {
                path: path.to_path_buf(),
                reason,
            })?;

            debug!(path = %path.display(), count = decls.len(), "decoded");
            loaded.extend(decls.into_iter().map(|declaration| LoadedDeclaration {
                source: path.to_path_buf(),
                declaration,
            }));
        }
        Ok(loaded)
    }
}
