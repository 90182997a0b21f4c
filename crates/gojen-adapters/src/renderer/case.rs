//! Identifier casing used by the template filters.
//!
//! | Input            | snake              | camel           | lower_camel     |
//! |------------------|--------------------|-----------------|-----------------|
//! | `user profile`   | `user_profile`     | `UserProfile`   | `userProfile`   |
//! | `HTTPRequest`    | `http_request`     | `HttpRequest`   | `httpRequest`   |
//! | `order-item`     | `order_item`       | `OrderItem`     | `orderItem`     |

use std::collections::BTreeMap;

/// Split on `_`, `-`, whitespace, lower-to-upper transitions and the end of
/// an acronym (`HTTPRequest` -> `http`, `request`). Words are lowercased.
pub fn words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c.is_whitespace() {
            flush(&mut current, &mut words);
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                flush(&mut current, &mut words);
            }
        }
        current.push(c);
    }
    flush(&mut current, &mut words);
    words
}

fn flush(current: &mut String, words: &mut Vec<String>) {
    if !current.is_empty() {
        words.push(current.to_lowercase());
        current.clear();
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn snake(s: &str) -> String {
    words(s).join("_")
}

pub fn kebab(s: &str) -> String {
    words(s).join("-")
}

pub fn screaming_snake(s: &str) -> String {
    snake(s).to_uppercase()
}

pub fn screaming_kebab(s: &str) -> String {
    kebab(s).to_uppercase()
}

/// PascalCase.
pub fn camel(s: &str) -> String {
    camel_with(s, &BTreeMap::new())
}

/// PascalCase, writing any word found in `acronyms` in its given form.
pub fn camel_with(s: &str, acronyms: &BTreeMap<String, String>) -> String {
    words(s).iter().map(|w| upper_word(w, acronyms)).collect()
}

pub fn lower_camel(s: &str) -> String {
    lower_camel_with(s, &BTreeMap::new())
}

/// The first word stays lowercase even when it is an acronym.
pub fn lower_camel_with(s: &str, acronyms: &BTreeMap<String, String>) -> String {
    let words = words(s);
    let mut out = String::new();
    for (i, w) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(w);
        } else {
            out.push_str(&upper_word(w, acronyms));
        }
    }
    out
}

fn upper_word(word: &str, acronyms: &BTreeMap<String, String>) -> String {
    acronyms
        .get(word)
        .cloned()
        .unwrap_or_else(|| capitalize(word))
}

pub fn title(s: &str) -> String {
    words(s)
        .iter()
        .map(|w| capitalize(w))
        .collect::<Vec<_>>()
        .join(" ")
}
