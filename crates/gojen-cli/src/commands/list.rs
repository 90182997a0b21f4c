//! Implementation of the `gojen list` command.

use std::sync::Arc;

use gojen_adapters::DeclarationLoader;
use gojen_core::{
    application::{Console, DeclarationStore},
    domain::Declaration,
};

use crate::{
    cli::{ListArgs, ListFormat},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    // Load messages would clutter the listing; warnings still show.
    let console: Arc<dyn Console> = Arc::new(output.console().quiet(true));
    let mut store = DeclarationStore::new(console);

    let dir = args
        .decls
        .as_deref()
        .unwrap_or(config.declarations.dir.as_path());
    store
        .load(&DeclarationLoader::new(dir))
        .with_cli_context(|| format!("loading {}", dir.display()))?;

    let decls: Vec<&Declaration> = store.declarations().collect();

    match args.format {
        ListFormat::Table => {
            if decls.is_empty() {
                output.warning(&format!("No declarations found in {}", dir.display()))?;
                return Ok(());
            }
            output.header("Available Declarations:")?;
            for decl in decls {
                for line in describe(decl) {
                    output.print(&line)?;
                }
            }
        }
        ListFormat::Json => {
            // Bypasses quiet mode: JSON must stay parseable in pipes.
            let json = serde_json::to_string_pretty(&decls).map_err(|e| CliError::InvalidInput {
                message: format!("cannot serialise declarations: {e}"),
                source: Some(Box::new(e)),
            })?;
            output.data(&json)?;
        }
    }

    Ok(())
}

fn describe(decl: &Declaration) -> Vec<String> {
    let mut lines = vec![format!("  {}  {}", decl.name, decl.path)];
    if !decl.description.is_empty() {
        lines.push(format!("      {}", decl.description));
    }
    if !decl.require.is_empty() {
        lines.push(format!("      requires: {}", decl.require.join(", ")));
    }
    for element in &decl.elements {
        let mut line = format!("    - {} ({})", element.name, element.strategy);
        if element.raw_alias() != element.name {
            line.push_str(&format!(" alias={}", element.raw_alias()));
        }
        if let Some(path) = &element.path {
            line.push_str(&format!(" -> {path}"));
        }
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use gojen_core::domain::{Element, Strategy};

    #[test]
    fn describes_elements_with_aliases() {
        let decl = Declaration::new("service", "svc.go")
            .description("Service layer")
            .require(["Domain"])
            .element(Element::new("init", Strategy::Init))
            .element(Element::new("method", Strategy::Append).alias("methods"));

        let lines = describe(&decl);
        assert_eq!(lines[0], "  service  svc.go");
        assert_eq!(lines[1], "      Service layer");
        assert_eq!(lines[2], "      requires: Domain");
        assert_eq!(lines[3], "    - init (init)");
        assert_eq!(lines[4], "    - method (append) alias=methods");
    }
}
