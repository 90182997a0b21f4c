//! Build Engine - turns a sequence into rendered states.
//!
//! Each step runs Resolve, Satisfy-Arguments, Render, Record, then
//! Branch-or-Continue. The argument context is an explicit value threaded
//! through the steps; it is read from the store once at the start and
//! written back once at the end, also when the build fails.

use std::path::PathBuf;

use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{Console, StateRecorder, TemplateRenderer},
        prompt::{Answer, Prompt},
        services::DeclarationStore,
    },
    domain::{Args, NodeId, SeqNode, Sequence, State},
    error::{GojenError, GojenResult},
};

/// States produced by one [`BuildService::build`] call, in traversal order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    pub states: Vec<State>,
}

/// Result of a single step: its state and the context for the next step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub state: State,
    pub context: Args,
}

pub struct BuildService {
    renderer: Box<dyn TemplateRenderer>,
    recorder: Box<dyn StateRecorder>,
}

impl BuildService {
    pub fn new(renderer: Box<dyn TemplateRenderer>, recorder: Box<dyn StateRecorder>) -> Self {
        Self { renderer, recorder }
    }

    /// Walk `sequence` from its root.
    ///
    /// Fails fast: the first lookup, argument, render or recording error
    /// aborts the walk. States recorded before the failure stay in the store.
    #[instrument(skip_all, fields(nodes = sequence.len()))]
    pub fn build(
        &self,
        store: &mut DeclarationStore,
        sequence: &Sequence,
    ) -> GojenResult<BuildReport> {
        let first = store.states().len();
        let mut context = store.args().clone();

        let walked = self.walk(store, sequence, &mut context);
        store.replace_args(context);
        walked?;

        let states = store.states()[first..].to_vec();
        info!(states = states.len(), "build finished");
        Ok(BuildReport { states })
    }

    fn walk(
        &self,
        store: &mut DeclarationStore,
        sequence: &Sequence,
        context: &mut Args,
    ) -> GojenResult<()> {
        let mut current = Some(sequence.root());

        while let Some(id) = current {
            let node = sequence.node(id);
            let outcome = self.step(store, node, context.clone())?;
            *context = outcome.context;

            let index = store.states().len();
            self.recorder
                .record(index, &outcome.state)
                .map_err(|e| recording_error(index, &outcome.state, e))?;
            store.add_state(outcome.state);

            current = if node.has_cases() {
                Some(self.choose_case(store.console().as_ref(), node)?)
            } else {
                node.next
            };
        }
        Ok(())
    }

    /// Execute one step against `context`.
    ///
    /// Arguments the operator supplies interactively are local to this step;
    /// only the names in `node.forward` reach the returned context.
    #[instrument(skip_all, fields(step = %format!("{}.{}", node.decl, node.element)))]
    pub fn step(
        &self,
        store: &DeclarationStore,
        node: &SeqNode,
        mut context: Args,
    ) -> GojenResult<StepOutcome> {
        let step = format!("{}.{}", node.decl, node.element);

        // Resolve
        let decl = store
            .get_decl(&node.decl)
            .ok_or_else(|| ApplicationError::DeclarationNotFound {
                name: node.decl.clone(),
            })?;
        let element =
            decl.get_element(&node.element)
                .ok_or_else(|| ApplicationError::ElementNotFound {
                    declaration: node.decl.clone(),
                    element: node.element.clone(),
                })?;

        // Satisfy-Arguments
        let mut args = Args::merged([&context, &decl.args, &element.args, &node.args]);
        let required: Vec<&str> = decl
            .require
            .iter()
            .chain(&element.require)
            .chain(&node.forward)
            .map(String::as_str)
            .collect();
        let (_, missing) = args.extract(&required);
        if !missing.is_empty() {
            debug!(?missing, "asking for arguments");
            let prompt = Prompt::SupplyArguments {
                step: step.clone(),
                missing,
            };
            if let Answer::Arguments(supplied) = prompt.ask(store.console().as_ref())? {
                args.merge(&supplied);
            }
        }

        // Render
        let raw_path = element.raw_path(decl);
        let path = self.renderer.render(&format!("{step}:path"), raw_path, &args)?;
        let path = path.trim();
        if path.is_empty() {
            return Err(ApplicationError::Render {
                template: format!("{step}:path"),
                reason: format!("'{raw_path}' rendered to an empty path"),
            }
            .into());
        }
        let content = self
            .renderer
            .render(&format!("{step}:template"), &element.template, &args)?;
        let raw_alias = element.raw_alias();
        let alias = self
            .renderer
            .render(&format!("{step}:alias"), raw_alias, &args)?;

        // Forward
        let forwarded_args = args.subset(&node.forward);
        context.merge(&forwarded_args);

        let state = State {
            strategy: element.strategy,
            decl: decl.name.clone(),
            element: element.name.clone(),
            raw_alias: raw_alias.to_string(),
            alias: alias.trim().to_string(),
            args,
            forwarded_args,
            raw_path: raw_path.to_string(),
            raw_template: element.template.clone(),
            path: PathBuf::from(path),
            content,
            ignore_comparing_lines: element.ignore_comparing_lines.clone(),
        };
        info!(path = %state.path.display(), strategy = %state.strategy, "built state");

        Ok(StepOutcome { state, context })
    }

    fn choose_case(&self, console: &dyn Console, node: &SeqNode) -> GojenResult<NodeId> {
        let options: Vec<String> = node.case_keys().into_iter().map(String::from).collect();
        let prompt = Prompt::ChooseCase {
            step: format!("{}.{}", node.decl, node.element),
            options: options.clone(),
        };

        match prompt.ask(console)? {
            Answer::Choice(i) => {
                debug!(case = %options[i], "branch selected");
                Ok(node.cases[&options[i]])
            }
            other => Err(GojenError::Internal {
                message: format!("unexpected answer to case selection: {other:?}"),
            }),
        }
    }
}

fn recording_error(index: usize, state: &State, err: GojenError) -> GojenError {
    match err {
        GojenError::Application(ApplicationError::Recording { .. }) => err,
        other => ApplicationError::Recording {
            index,
            step: state.step_name(),
            reason: other.to_string(),
        }
        .into(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::application::ports::MockConsole;
    use crate::domain::{Declaration, Element, Strategy};

    /// Replaces `{{Name}}` with the argument's string value.
    struct Substitute;

    impl TemplateRenderer for Substitute {
        fn render(&self, _name: &str, template: &str, args: &Args) -> GojenResult<String> {
            let mut out = template.to_string();
            for (k, v) in args.iter() {
                let value = v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string());
                out = out.replace(&format!("{{{{{k}}}}}"), &value);
            }
            Ok(out)
        }
    }

    #[derive(Default, Clone)]
    struct Recorded(Arc<Mutex<Vec<(usize, String)>>>);

    impl StateRecorder for Recorded {
        fn record(&self, index: usize, state: &State) -> GojenResult<()> {
            self.0
                .lock()
                .map_err(|e| GojenError::Internal {
                    message: e.to_string(),
                })?
                .push((index, state.step_name()));
            Ok(())
        }
    }

    fn service_decl() -> Declaration {
        Declaration::new("service", "internal/{{Domain}}.go")
            .require(["Domain"])
            .element(Element::new("init", Strategy::Init).template("package {{Domain}}"))
            .element(
                Element::new("method", Strategy::Append)
                    .template("func {{Method}}() {}")
                    .alias("{{Domain}}")
                    .require(["Method"]),
            )
    }

    fn store_with(console: MockConsole, decls: Vec<Declaration>) -> DeclarationStore {
        let mut store = DeclarationStore::new(Arc::new(console));
        for d in decls {
            assert!(store.set_decl(d));
        }
        store
    }

    fn engine(recorder: Recorded) -> BuildService {
        BuildService::new(Box::new(Substitute), Box::new(recorder))
    }

    #[test]
    fn linear_build_renders_each_step() {
        let mut store = store_with(MockConsole::new(), vec![service_decl()]);
        store.update_args(&Args::new().with("Domain", "user"));

        let mut seq = Sequence::new("service", "init");
        seq.append_with(
            "service",
            "method",
            vec![Args::new().with("Method", "Get")],
        );

        let recorded = Recorded::default();
        let report = engine(recorded.clone()).build(&mut store, &seq).unwrap();

        assert_eq!(report.states.len(), 2);
        assert_eq!(report.states[0].content, "package user");
        assert_eq!(report.states[0].path, PathBuf::from("internal/user.go"));
        assert_eq!(report.states[1].content, "func Get() {}");
        assert_eq!(report.states[1].alias, "user");
        assert_eq!(report.states[1].raw_alias, "{{Domain}}");

        let recorded = recorded.0.lock().unwrap().clone();
        assert_eq!(
            recorded,
            vec![(0, "service.init".to_string()), (1, "service.method".to_string())]
        );
    }

    #[test]
    fn unknown_declaration_fails_fast() {
        let mut store = store_with(MockConsole::new(), vec![service_decl()]);
        store.update_args(&Args::new().with("Domain", "user"));

        let mut seq = Sequence::new("service", "init");
        seq.append("missing", &["x"]);

        let err = engine(Recorded::default())
            .build(&mut store, &seq)
            .unwrap_err();
        assert!(matches!(
            err,
            GojenError::Application(ApplicationError::DeclarationNotFound { .. })
        ));
        // the first step stays for diagnostics
        assert_eq!(store.states().len(), 1);
    }

    #[test]
    fn unknown_element_is_a_lookup_error() {
        let mut store = store_with(MockConsole::new(), vec![service_decl()]);
        let seq = Sequence::new("service", "nope");
        assert!(matches!(
            engine(Recorded::default()).build(&mut store, &seq),
            Err(GojenError::Application(ApplicationError::ElementNotFound { .. }))
        ));
    }

    #[test]
    fn prompted_arguments_are_step_local() {
        let mut console = MockConsole::new();
        console.expect_say().returning(|_, _| ());
        console
            .expect_read_line()
            .times(2)
            .returning(|| Ok(r#"{"Domain": "user"}"#.to_string()));
        let mut store = store_with(console, vec![service_decl()]);

        let mut seq = Sequence::new("service", "init");
        seq.append("service", &["init"]);

        let report = engine(Recorded::default()).build(&mut store, &seq).unwrap();
        assert_eq!(report.states.len(), 2);
        assert!(store.args().get("Domain").is_none());
    }

    #[test]
    fn forwarded_arguments_reach_later_steps() {
        let mut console = MockConsole::new();
        console.expect_say().returning(|_, _| ());
        console
            .expect_read_line()
            .times(1)
            .returning(|| Ok(r#"{"Domain": "user"}"#.to_string()));
        let mut store = store_with(console, vec![service_decl()]);

        let mut seq = Sequence::new("service", "init");
        seq.forward(&["Domain"]).append_with(
            "service",
            "method",
            vec![Args::new().with("Method", "Get")],
        );

        let report = engine(Recorded::default()).build(&mut store, &seq).unwrap();
        assert_eq!(report.states[0].forwarded_args.get("Domain"), Some(&"user".into()));
        assert_eq!(report.states[1].path, PathBuf::from("internal/user.go"));
        assert_eq!(store.args().get("Domain"), Some(&"user".into()));
    }

    #[test]
    fn selected_case_then_shared_continuation() {
        let mut console = MockConsole::new();
        console.expect_say().returning(|_, _| ());
        console.expect_read_line().times(1).returning(|| Ok("2".into()));

        let handler = Declaration::new("handler", "handler/{{Domain}}.go")
            .element(Element::new("grpc", Strategy::Init).template("grpc"))
            .element(Element::new("rest", Strategy::Init).template("rest"));
        let mut store = store_with(console, vec![service_decl(), handler]);
        store.update_args(&Args::new().with("Domain", "user").with("Method", "Get"));

        let mut seq = Sequence::new("service", "init");
        seq.select("handler", &["rest", "grpc"], |_| {})
            .append("service", &["method"]);

        let report = engine(Recorded::default()).build(&mut store, &seq).unwrap();
        let steps: Vec<String> = report.states.iter().map(State::step_name).collect();
        assert_eq!(steps, vec!["service.init", "handler.rest", "service.method"]);
    }

    #[test]
    fn bad_selection_aborts() {
        let mut console = MockConsole::new();
        console.expect_say().returning(|_, _| ());
        console.expect_read_line().returning(|| Ok("9".into()));

        let handler = Declaration::new("handler", "h.go")
            .element(Element::new("rest", Strategy::Init));
        let mut store = store_with(console, vec![service_decl(), handler]);
        store.update_args(&Args::new().with("Domain", "user"));

        let mut seq = Sequence::new("service", "init");
        seq.select("handler", &["rest"], |_| {});

        assert!(matches!(
            engine(Recorded::default()).build(&mut store, &seq),
            Err(GojenError::Application(ApplicationError::InvalidSelection { .. }))
        ));
    }
}
