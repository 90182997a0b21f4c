//! Console with canned answers, for tests and non-interactive runs.

use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

use gojen_core::application::ports::{Console, Level};

/// Answers prompts from a queue and records everything said.
///
/// Once the queue is empty `read_line` fails with `UnexpectedEof`, which
/// `confirm` treats as a no.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    answers: Mutex<VecDeque<String>>,
    transcript: Mutex<Vec<(Level, String)>>,
}

impl ScriptedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answering<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            transcript: Mutex::new(Vec::new()),
        }
    }

    /// Messages said so far, in order.
    pub fn transcript(&self) -> Vec<(Level, String)> {
        self.transcript
            .lock()
            .map(|t| t.clone())
            .unwrap_or_default()
    }

    /// Whether any message contains `needle`.
    pub fn said(&self, needle: &str) -> bool {
        self.transcript().iter().any(|(_, m)| m.contains(needle))
    }

    pub fn remaining_answers(&self) -> usize {
        self.answers.lock().map(|a| a.len()).unwrap_or(0)
    }
}

impl Console for ScriptedConsole {
    fn say(&self, level: Level, message: &str) {
        if let Ok(mut transcript) = self.transcript.lock() {
            transcript.push((level, message.to_string()));
        }
    }

    fn read_line(&self) -> io::Result<String> {
        self.answers
            .lock()
            .map_err(|_| io::Error::other("answer queue poisoned"))?
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted answer left"))
    }
}
