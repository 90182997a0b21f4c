//! Line-overlap heuristic used before appending content to a file.
//!
//! Both sides are reduced to their trimmed, non-empty lines. Each content
//! line is searched for in the file from just after the previous match, so
//! matches must appear in the same relative order. Lines listed as ignored
//! count neither as matches nor towards the total.

use std::collections::HashSet;

/// Result of [`compare`].
#[derive(Debug, Clone, PartialEq)]
pub struct Similarity {
    /// Matched lines over compared lines, in `0.0..=100.0`.
    pub percent: f64,
    /// Matched lines, in file order.
    pub matched: Vec<String>,
    pub compared: usize,
    pub ignored: usize,
}

impl Similarity {
    /// Any overlap at all.
    pub fn overlaps(&self) -> bool {
        self.percent > 0.0
    }

    /// The matched lines as one highlighted block.
    pub fn segment(&self) -> String {
        self.matched.join("\n")
    }
}

fn significant_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty())
}

/// Compare rendered `content` with the `existing` text of a file.
pub fn compare<S: AsRef<str>>(content: &str, existing: &str, ignore: &[S]) -> Similarity {
    let ignore: HashSet<&str> = ignore.iter().map(|l| l.as_ref().trim()).collect();
    let file: Vec<&str> = significant_lines(existing).collect();

    let mut matched = Vec::new();
    let mut compared = 0usize;
    let mut ignored = 0usize;
    let mut from = 0usize;

    for line in significant_lines(content) {
        if ignore.contains(line) {
            ignored += 1;
            continue;
        }
        compared += 1;

        if let Some(offset) = file[from..].iter().position(|f| *f == line) {
            matched.push(line.to_string());
            from += offset + 1;
        }
    }

    let percent = if compared == 0 {
        0.0
    } else {
        matched.len() as f64 / compared as f64 * 100.0
    };

    Similarity {
        percent,
        matched,
        compared,
        ignored,
    }
}
