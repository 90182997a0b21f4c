//! Plural/singular forms and acronyms for the template filters.
//!
//! English rules come from the `Inflector` crate. Caller rules are tried
//! first: irregular pairs, then regex rules, most recently added first.

use std::collections::BTreeMap;

use gojen_core::error::{GojenError, GojenResult};
use inflector::string::{pluralize::to_plural, singularize::to_singular};
use regex::Regex;

#[derive(Debug, Clone, Default)]
pub struct Inflections {
    plural: Vec<(Regex, String)>,
    singular: Vec<(Regex, String)>,
    /// Lowercase singular -> lowercase plural.
    irregular: BTreeMap<String, String>,
    /// Lowercase word -> form used by `camel`/`lower_camel`.
    acronyms: BTreeMap<String, String>,
}

impl Inflections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pluralize words matching `pattern` with `replacement` (`$1` style
    /// capture references).
    pub fn add_plural_rule(&mut self, pattern: &str, replacement: &str) -> GojenResult<()> {
        self.plural.push((compile("plural", pattern)?, replacement.to_string()));
        Ok(())
    }

    pub fn add_singular_rule(&mut self, pattern: &str, replacement: &str) -> GojenResult<()> {
        self.singular
            .push((compile("singular", pattern)?, replacement.to_string()));
        Ok(())
    }

    pub fn add_irregular(&mut self, singular: &str, plural: &str) {
        self.irregular
            .insert(singular.to_lowercase(), plural.to_lowercase());
    }

    /// `add_acronym("api", "API")` makes `camel("user_api")` render `UserAPI`.
    pub fn add_acronym(&mut self, word: &str, form: &str) {
        self.acronyms.insert(word.to_lowercase(), form.to_string());
    }

    pub fn acronyms(&self) -> &BTreeMap<String, String> {
        &self.acronyms
    }

    pub fn plural(&self, word: &str) -> String {
        if word.is_empty() {
            return String::new();
        }
        let lower = word.to_lowercase();
        if let Some(plural) = self.irregular.get(&lower) {
            return match_case(word, plural);
        }
        if self.irregular.values().any(|p| *p == lower) {
            return word.to_string();
        }
        apply(&self.plural, word).unwrap_or_else(|| to_plural(word))
    }

    pub fn singular(&self, word: &str) -> String {
        if word.is_empty() {
            return String::new();
        }
        let lower = word.to_lowercase();
        if let Some((singular, _)) = self.irregular.iter().find(|(_, p)| **p == lower) {
            return match_case(word, singular);
        }
        if self.irregular.contains_key(&lower) {
            return word.to_string();
        }
        apply(&self.singular, word).unwrap_or_else(|| to_singular(word))
    }
}

fn compile(kind: &str, pattern: &str) -> GojenResult<Regex> {
    Regex::new(pattern)
        .map_err(|e| GojenError::configuration(format!("invalid {kind} rule '{pattern}': {e}")))
}

fn apply(rules: &[(Regex, String)], word: &str) -> Option<String> {
    rules
        .iter()
        .rev()
        .find(|(re, _)| re.is_match(word))
        .map(|(re, replacement)| re.replace(word, replacement.as_str()).into_owned())
}

/// Give `form` the capitalisation of the first letter of `like`.
fn match_case(like: &str, form: &str) -> String {
    if like.chars().next().is_some_and(char::is_uppercase) {
        let mut chars = form.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    } else {
        form.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_defaults() {
        let inflections = Inflections::new();
        assert_eq!(inflections.plural("user"), "users");
        assert_eq!(inflections.plural("category"), "categories");
        assert_eq!(inflections.singular("users"), "user");
        assert_eq!(inflections.singular("categories"), "category");
        assert_eq!(inflections.plural(""), "");
    }

    #[test]
    fn irregular_pairs_win_both_ways() {
        let mut inflections = Inflections::new();
        inflections.add_irregular("Cactus", "Cacti");
        assert_eq!(inflections.plural("cactus"), "cacti");
        assert_eq!(inflections.plural("Cactus"), "Cacti");
        assert_eq!(inflections.plural("cacti"), "cacti");
        assert_eq!(inflections.singular("Cacti"), "Cactus");
        assert_eq!(inflections.singular("cactus"), "cactus");
    }

    #[test]
    fn newest_rule_is_tried_first() {
        let mut inflections = Inflections::new();
        inflections.add_plural_rule("(?i)(\\w*)x$", "${1}xen").unwrap();
        inflections.add_plural_rule("(?i)^box$", "boxes").unwrap();
        assert_eq!(inflections.plural("box"), "boxes");
        assert_eq!(inflections.plural("ox"), "oxen");

        inflections.add_singular_rule("(\\w*)zies$", "${1}zy").unwrap();
        assert_eq!(inflections.singular("quizies"), "quizy");
    }

    #[test]
    fn bad_pattern_is_a_configuration_error() {
        let err = Inflections::new().add_plural_rule("(", "x").unwrap_err();
        assert!(matches!(err, GojenError::Configuration { .. }));
        assert!(err.to_string().contains("invalid plural rule"));
    }
}
