//! Integration tests for gojen-core, driven through the public API with
//! in-process fakes for every port.

use std::collections::{BTreeMap, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use gojen_core::application::ApplicationError;
use gojen_core::prelude::*;

/// Leaves templates untouched.
struct Verbatim;

impl TemplateRenderer for Verbatim {
    fn render(&self, _name: &str, template: &str, _args: &Args) -> GojenResult<String> {
        Ok(template.to_string())
    }
}

struct Discard;

impl StateRecorder for Discard {
    fn record(&self, _index: usize, _state: &State) -> GojenResult<()> {
        Ok(())
    }
}

#[derive(Default)]
struct Canned {
    answers: Mutex<VecDeque<String>>,
}

impl Canned {
    fn answering(answers: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            answers: Mutex::new(answers.iter().map(|s| s.to_string()).collect()),
        })
    }
}

impl Console for Canned {
    fn say(&self, _level: Level, _message: &str) {}

    fn read_line(&self) -> io::Result<String> {
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no answer"))
    }
}

#[derive(Default, Clone)]
struct Files(Arc<Mutex<BTreeMap<PathBuf, String>>>);

impl Files {
    fn get(&self, path: &str) -> Option<String> {
        self.0.lock().unwrap().get(Path::new(path)).cloned()
    }
}

impl Filesystem for Files {
    fn is_file(&self, path: &Path) -> bool {
        self.0.lock().unwrap().contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> GojenResult<String> {
        self.0
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| ApplicationError::filesystem(path, "not found").into())
    }

    fn write_file(&self, path: &Path, content: &str) -> GojenResult<()> {
        self.0
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn append_file(&self, path: &Path, content: &str) -> GojenResult<()> {
        self.0
            .lock()
            .unwrap()
            .entry(path.to_path_buf())
            .or_default()
            .push_str(content);
        Ok(())
    }
}

fn service() -> Declaration {
    Declaration::new("service", "service.go")
        .element(Element::new("init", Strategy::Init).template("package service"))
        .element(
            Element::new("method", Strategy::Append)
                .template("func X(){}")
                .alias("users"),
        )
}

fn run(console: Arc<Canned>, files: Files, seq: &Sequence) -> ApplyReport {
    let mut store = DeclarationStore::new(console.clone());
    assert!(store.set_decl(service()));

    let built = BuildService::new(Box::new(Verbatim), Box::new(Discard))
        .build(&mut store, seq)
        .unwrap();
    ApplyService::new(Box::new(files), console)
        .apply(&built.states)
        .unwrap()
}

#[test]
fn append_without_marker_leaves_init_content() {
    let files = Files::default();
    let mut seq = Sequence::new("service", "init");
    seq.append("service", &["method"]);

    let report = run(Canned::answering(&[]), files.clone(), &seq);

    assert_eq!(files.get("service.go").as_deref(), Some("package service"));
    assert_eq!(report.modified.len(), 1);
    assert_eq!(report.skipped, vec![PathBuf::from("service.go")]);
}

#[test]
fn append_after_marker_in_existing_file() {
    let files = Files::default();
    files
        .write_file(
            Path::new("service.go"),
            "package service\n// +gojen:append=users\n",
        )
        .unwrap();

    let seq = Sequence::new("service", "method");
    let report = run(Canned::answering(&[]), files.clone(), &seq);

    assert_eq!(
        files.get("service.go").as_deref(),
        Some("package service\n// +gojen:append=users\nfunc X(){}\n")
    );
    assert!(report.modified.contains("service.go"));
}

#[test]
fn declined_similarity_gate_skips_state() {
    let files = Files::default();
    files
        .write_file(
            Path::new("service.go"),
            "package service\n// +gojen:append=users\nfunc X(){}\n",
        )
        .unwrap();

    let seq = Sequence::new("service", "method");
    let report = run(Canned::answering(&["n"]), files.clone(), &seq);

    assert!(report.modified.is_empty());
    assert_eq!(
        files.get("service.go").as_deref(),
        Some("package service\n// +gojen:append=users\nfunc X(){}\n")
    );
}
