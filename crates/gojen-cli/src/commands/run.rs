//! Implementation of the `gojen run` command.
//!
//! Responsibility: wire the adapters into the store and engines, feed them
//! the sequence file and the `--arg` seeds, and display results.  No
//! business logic lives here.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use gojen_adapters::{
    AuditDirectory, DeclarationLoader, LocalFilesystem, MiniJinjaRenderer, NullRecorder,
};
use gojen_core::{
    application::{ApplyService, BuildService, Console, DeclarationStore, StateRecorder},
    domain::{Args, Sequence, SequencePlan},
};

use crate::{
    cli::RunArgs,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Execute the `gojen run` command.
///
/// 1. Read and compile the sequence file
/// 2. Load declarations and seed `--arg` values
/// 3. Build the states (recording audit files unless disabled)
/// 4. Print them for `--dry-run`, otherwise apply them
/// 5. List the files that were modified
#[instrument(skip_all, fields(sequence = %args.sequence.display()))]
pub fn execute(args: RunArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let seq = read_sequence(&args.sequence)?;
    debug!("sequence:\n{seq}");

    let console: Arc<dyn Console> = Arc::new(output.console());
    let mut store = DeclarationStore::new(console.clone());

    let decls_dir = args
        .decls
        .as_deref()
        .unwrap_or(config.declarations.dir.as_path());
    let loaded = store
        .load(&DeclarationLoader::new(decls_dir))
        .with_cli_context(|| format!("loading {}", decls_dir.display()))?;
    info!(loaded, dir = %decls_dir.display(), "declarations loaded");

    store.update_args(&seed_args(&args.args));

    let recorder: Box<dyn StateRecorder> =
        if args.dry_run || args.no_record || !config.store.record_states {
            Box::new(NullRecorder)
        } else {
            let audit = AuditDirectory::new(&config.store.state_dir);
            debug!(dir = %audit.run_dir().display(), "recording states");
            Box::new(audit)
        };

    let renderer = MiniJinjaRenderer::with_inflections(config.render.inflections()?);
    let built = BuildService::new(Box::new(renderer), recorder)
        .build(&mut store, &seq)
        .with_cli_context(|| "building sequence")?;

    if args.dry_run {
        output.header(&format!("Dry run: {} state(s)", built.states.len()))?;
        for (index, state) in built.states.iter().enumerate() {
            output.state(index, state)?;
        }
        return Ok(());
    }

    let report = ApplyService::new(Box::new(LocalFilesystem::new()), console)
        .with_comment_prefix(config.apply.comment_prefix.as_str())
        .apply(&built.states)
        .with_cli_context(|| "applying states")?;

    if report.modified.is_empty() {
        output.warning("No files were modified")?;
    } else {
        output.header("Modified files:")?;
        for path in &report.modified {
            output.print(&format!("  {}", path.display()))?;
        }
    }
    output.success(&format!(
        "{} state(s) built, {} applied, {} skipped",
        built.states.len(),
        built.states.len() - report.skipped.len(),
        report.skipped.len()
    ))?;

    Ok(())
}

/// Read a YAML or JSON sequence file and compile it.
fn read_sequence(path: &Path) -> CliResult<Sequence> {
    if !path.is_file() {
        return Err(CliError::SequenceNotFound {
            path: path.to_path_buf(),
        });
    }

    let raw = std::fs::read_to_string(path)
        .with_cli_context(|| format!("reading {}", path.display()))?;

    // YAML is a superset of JSON, one parser covers both.
    let plan: SequencePlan =
        serde_yaml::from_str(&raw).map_err(|e| CliError::InvalidSequence {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    plan.compile().map_err(|e| CliError::InvalidSequence {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// `--arg` pairs as an argument context.  Values that parse as JSON keep
/// their type; anything else is taken as a string.
fn seed_args(pairs: &[(String, String)]) -> Args {
    let mut args = Args::new();
    for (key, raw) in pairs {
        let value = serde_json::from_str::<serde_json::Value>(raw)
            .unwrap_or_else(|_| serde_json::Value::String(raw.clone()));
        args.insert(key.clone(), value);
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn seed_values_keep_json_types() {
        let args = seed_args(&[
            ("Domain".into(), "user".into()),
            ("Port".into(), "8080".into()),
            ("Debug".into(), "true".into()),
            ("Quoted".into(), "\"42\"".into()),
        ]);
        assert_eq!(args.get("Domain"), Some(&json!("user")));
        assert_eq!(args.get("Port"), Some(&json!(8080)));
        assert_eq!(args.get("Debug"), Some(&json!(true)));
        assert_eq!(args.get("Quoted"), Some(&json!("42")));
    }

    #[test]
    fn later_seed_wins() {
        let args = seed_args(&[("A".into(), "1".into()), ("A".into(), "2".into())]);
        assert_eq!(args.get("A"), Some(&json!(2)));
    }

    #[test]
    fn missing_sequence_file() {
        let err = read_sequence(Path::new("does/not/exist.yaml")).unwrap_err();
        assert!(matches!(err, CliError::SequenceNotFound { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn sequence_from_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seq.json");
        std::fs::write(
            &path,
            r#"[{ "decl": "service", "elements": ["init", "method"] }]"#,
        )
        .unwrap();

        let seq = read_sequence(&path).unwrap();
        assert_eq!(seq.len(), 2);
    }

    #[test]
    fn empty_sequence_is_invalid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seq.yaml");
        std::fs::write(&path, "[]").unwrap();

        let err = read_sequence(&path).unwrap_err();
        assert!(matches!(err, CliError::InvalidSequence { .. }));
        assert_eq!(err.exit_code(), 2);
    }
}
