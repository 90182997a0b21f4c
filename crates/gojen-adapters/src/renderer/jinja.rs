//! MiniJinja-backed template renderer.

use std::sync::Arc;

use gojen_core::{
    application::{ApplicationError, ports::TemplateRenderer},
    domain::Args,
    error::GojenResult,
};
use minijinja::{Environment, UndefinedBehavior, Value};
use tracing::{instrument, trace};

use super::{Inflections, case};

/// Renders `{{ }}` templates with lenient undefined handling: an argument
/// that is not in the context renders as empty text.
///
/// Filters: `snake`, `kebab`, `camel`, `lower_camel`, `screaming_snake`,
/// `screaming_kebab`, `title`, `plural`, `singular`, plus MiniJinja's
/// builtins (`lower`, `upper`, ...).
pub struct MiniJinjaRenderer {
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    pub fn new() -> Self {
        Self::with_inflections(Inflections::default())
    }

    /// Renderer whose `plural`, `singular`, `camel` and `lower_camel`
    /// filters follow `inflections`.
    pub fn with_inflections(inflections: Inflections) -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Lenient);
        env.set_keep_trailing_newline(true);

        let mut renderer = Self { env };
        renderer.add_text_filter("snake", case::snake);
        renderer.add_text_filter("kebab", case::kebab);
        renderer.add_text_filter("screaming_snake", case::screaming_snake);
        renderer.add_text_filter("screaming_kebab", case::screaming_kebab);
        renderer.add_text_filter("title", case::title);

        let inflections = Arc::new(inflections);
        let i = Arc::clone(&inflections);
        renderer.add_text_filter("camel", move |s| case::camel_with(s, i.acronyms()));
        let i = Arc::clone(&inflections);
        renderer.add_text_filter("lower_camel", move |s| {
            case::lower_camel_with(s, i.acronyms())
        });
        let i = Arc::clone(&inflections);
        renderer.add_text_filter("plural", move |s| i.plural(s));
        renderer.add_text_filter("singular", move |s| inflections.singular(s));
        renderer
    }

    /// Register a string-to-string filter. Undefined input arrives as `""`.
    pub fn add_text_filter<F>(&mut self, name: &'static str, filter: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.env
            .add_filter(name, move |value: Value| filter(&text_of(&value)));
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn text_of(value: &Value) -> String {
    if value.is_undefined() || value.is_none() {
        String::new()
    } else if let Some(s) = value.as_str() {
        s.to_string()
    } else {
        value.to_string()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    #[instrument(skip(self, template, args))]
    fn render(&self, name: &str, template: &str, args: &Args) -> GojenResult<String> {
        trace!(len = template.len(), "rendering");
        self.env
            .render_str(template, args.as_map())
            .map_err(|e| {
                ApplicationError::Render {
                    template: name.to_string(),
                    reason: e.to_string(),
                }
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gojen_core::error::GojenError;

    fn render(template: &str, args: &Args) -> GojenResult<String> {
        MiniJinjaRenderer::new().render("test", template, args)
    }

    #[test]
    fn renders_with_casing_filters() {
        let args = Args::new().with("Domain", "UserProfile");
        assert_eq!(
            render("internal/{{ Domain | snake }}/{{ Domain | kebab }}.go", &args).unwrap(),
            "internal/user_profile/user-profile.go"
        );
        assert_eq!(
            render("type {{ Domain | camel }} struct{}", &args).unwrap(),
            "type UserProfile struct{}"
        );
    }

    #[test]
    fn missing_keys_render_empty() {
        let out = render("a{{ Missing }}b{{ Missing | snake }}c", &Args::new()).unwrap();
        assert_eq!(out, "abc");
    }

    #[test]
    fn trailing_newline_is_kept() {
        assert_eq!(render("line\n", &Args::new()).unwrap(), "line\n");
    }

    #[test]
    fn syntax_errors_are_render_errors() {
        let err = render("{{ unclosed", &Args::new()).unwrap_err();
        assert!(matches!(
            err,
            GojenError::Application(ApplicationError::Render { ref template, .. }) if template == "test"
        ));
    }

    #[test]
    fn custom_filters_can_be_added() {
        let mut renderer = MiniJinjaRenderer::new();
        renderer.add_text_filter("shout", |s| format!("{s}!"));
        let out = renderer
            .render("t", "{{ Domain | shout }}", &Args::new().with("Domain", "user"))
            .unwrap();
        assert_eq!(out, "user!");
    }

    #[test]
    fn plural_and_singular_filters() {
        let args = Args::new().with("Domain", "categories");
        assert_eq!(
            render(
                "{{ Domain | singular | camel }} lists {{ Domain | singular | plural }}",
                &args
            )
            .unwrap(),
            "Category lists categories"
        );
        assert_eq!(
            render("{{ Domain | screaming_kebab }}", &Args::new().with("Domain", "userId")).unwrap(),
            "USER-ID"
        );
    }

    #[test]
    fn configured_inflections_reach_filters() {
        let mut inflections = Inflections::new();
        inflections.add_irregular("person", "people");
        inflections.add_acronym("id", "ID");
        let renderer = MiniJinjaRenderer::with_inflections(inflections);

        let args = Args::new().with("Domain", "person").with("Key", "user_id");
        let out = renderer
            .render(
                "t",
                "{{ Domain | plural | camel }}.{{ Key | camel }}.{{ Key | lower_camel }}",
                &args,
            )
            .unwrap();
        assert_eq!(out, "People.UserID.userID");
    }
}
