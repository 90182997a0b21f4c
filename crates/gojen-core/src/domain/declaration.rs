//! Declaration aggregate: a named generator for one target file.
//!
//! ## Model
//!
//! ```text
//! Declaration (Aggregate Root)
//! ├── path        template for the destination file
//! ├── require     argument names every element needs
//! ├── args        defaults, overridden by element defaults
//! └── elements    ordered, non-empty
//!      └── Element
//!           ├── path      optional override of the declaration path
//!           ├── alias     anchor-marker identifier (defaults to name)
//!           ├── template  raw template text
//!           └── strategy  init | trunc | append | append_at_last
//! ```
//!
//! Declarations are plain data. They are decoded from JSON/YAML by the
//! adapters crate or built in code with the fluent constructors below.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{args::Args, error::DomainError};

/// File-mutation policy applied when committing an element's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Create the file only when it does not exist yet.
    Init,
    /// Replace the whole file after operator confirmation.
    Trunc,
    /// Insert after the element's anchor-marker line.
    Append,
    /// Append at end-of-file, creating the file on request.
    AppendAtLast,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Trunc,
        Strategy::Append,
        Strategy::AppendAtLast,
        Strategy::Init,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Trunc => "trunc",
            Self::Append => "append",
            Self::AppendAtLast => "append_at_last",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(Strategy::as_str).collect()
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| DomainError::InvalidStrategy {
                value: s.to_string(),
                valid: Self::names(),
            })
    }
}

/// One selectable rendering variant of a [`Declaration`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Overrides [`Declaration::path`] when set and non-empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    pub name: String,

    /// Anchor identifier; falls back to `name`. Rendered like a template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    #[serde(default)]
    pub require: Vec<String>,

    #[serde(default)]
    pub args: Args,

    /// Accepts either a string or a list of lines.
    #[serde(default, deserialize_with = "template_text")]
    pub template: String,

    pub strategy: Strategy,

    /// Lines excluded from the content-similarity check.
    #[serde(default)]
    pub ignore_comparing_lines: Vec<String>,
}

impl Element {
    pub fn new(name: impl Into<String>, strategy: Strategy) -> Self {
        Self {
            path: None,
            name: name.into(),
            alias: None,
            require: Vec::new(),
            args: Args::new(),
            template: String::new(),
            strategy,
            ignore_comparing_lines: Vec::new(),
        }
    }

    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn require<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.require.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.args.insert(key, value);
        self
    }

    pub fn ignore_line(mut self, line: impl Into<String>) -> Self {
        self.ignore_comparing_lines.push(line.into());
        self
    }

    /// The raw (unrendered) alias.
    pub fn raw_alias(&self) -> &str {
        match self.alias.as_deref() {
            Some(a) if !a.is_empty() => a,
            _ => &self.name,
        }
    }

    /// The raw path template, falling back to the declaration's.
    pub fn raw_path<'a>(&'a self, decl: &'a Declaration) -> &'a str {
        match self.path.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => &decl.path,
        }
    }
}

/// Named, reusable generator composed of one or more [`Element`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    #[serde(default)]
    pub path: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub require: Vec<String>,

    #[serde(default)]
    pub args: Args,

    #[serde(default)]
    pub elements: Vec<Element>,

    #[serde(default)]
    pub description: String,

    /// Other declarations this one builds on.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

impl Declaration {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            require: Vec::new(),
            args: Args::new(),
            elements: Vec::new(),
            description: String::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn require<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.require.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.args.insert(key, value);
        self
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn depends_on<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies.extend(names.into_iter().map(Into::into));
        self
    }

    /// Find an element by name.
    pub fn get_element(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.name == name)
    }

    /// Check the declaration invariants.
    ///
    /// # Errors
    ///
    /// - `InvalidDeclaration` for an empty name or no elements.
    /// - `InvalidElement` for an element without a name or without a path.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidDeclaration {
                declaration: self.name.clone(),
                reason: "name is required".into(),
            });
        }

        if self.elements.is_empty() {
            return Err(DomainError::InvalidDeclaration {
                declaration: self.name.clone(),
                reason: "elements are required".into(),
            });
        }

        for element in &self.elements {
            if element.name.trim().is_empty() {
                return Err(DomainError::InvalidElement {
                    declaration: self.name.clone(),
                    element: element.name.clone(),
                    reason: "name is required".into(),
                });
            }
            if element.raw_path(self).trim().is_empty() {
                return Err(DomainError::InvalidElement {
                    declaration: self.name.clone(),
                    element: element.name.clone(),
                    reason: "path is required".into(),
                });
            }
        }

        Ok(())
    }
}

fn template_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        Single(String),
        Lines(Vec<String>),
    }

    Ok(match Text::deserialize(deserializer)? {
        Text::Single(s) => s,
        Text::Lines(lines) => lines.join("\n"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> Declaration {
        Declaration::new("service", "internal/service/{{ Domain | snake }}.go")
            .require(["Domain"])
            .element(Element::new("init", Strategy::Init).template("package service"))
    }

    #[test]
    fn strategy_parses_snake_case_names() {
        assert_eq!("append_at_last".parse::<Strategy>(), Ok(Strategy::AppendAtLast));
        assert_eq!("init".parse::<Strategy>(), Ok(Strategy::Init));
    }

    #[test]
    fn unknown_strategy_lists_valid_names() {
        let err = "ignore".parse::<Strategy>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("ignore"));
        assert!(msg.contains("append_at_last"));
    }

    #[test]
    fn valid_declaration_passes() {
        assert!(service().validate().is_ok());
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut d = service();
        d.name.clear();
        assert!(matches!(
            d.validate(),
            Err(DomainError::InvalidDeclaration { .. })
        ));
    }

    #[test]
    fn no_elements_is_rejected() {
        let d = Declaration::new("empty", "a.go");
        assert!(d.validate().is_err());
    }

    #[test]
    fn element_needs_some_path() {
        let d = Declaration::new("nopath", "")
            .element(Element::new("init", Strategy::Init));
        assert!(matches!(
            d.validate(),
            Err(DomainError::InvalidElement { reason, .. }) if reason.contains("path")
        ));

        let d = Declaration::new("override", "")
            .element(Element::new("init", Strategy::Init).path("x.go"));
        assert!(d.validate().is_ok());
    }

    #[test]
    fn alias_defaults_to_name() {
        let e = Element::new("method", Strategy::Append);
        assert_eq!(e.raw_alias(), "method");
        assert_eq!(e.clone().alias("users").raw_alias(), "users");
        assert_eq!(e.alias("").raw_alias(), "method");
    }

    #[test]
    fn template_decodes_from_lines() {
        let json = r#"{
            "name": "init",
            "strategy": "init",
            "template": ["package service", "", "type X struct{}"]
        }"#;
        let e: Element = serde_json::from_str(json).unwrap();
        assert_eq!(e.template, "package service\n\ntype X struct{}");
        assert_eq!(e.strategy, Strategy::Init);
    }

    #[test]
    fn unknown_strategy_fails_to_decode() {
        let json = r#"{ "name": "x", "strategy": "ignore" }"#;
        assert!(serde_json::from_str::<Element>(json).is_err());
    }
}
