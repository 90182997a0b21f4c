//! Operator decisions as data.
//!
//! The engines describe what they need to know as a [`Prompt`]; the injected
//! [`Console`] answers it. Parsing and validating the raw answer happens
//! here, so the engines only ever see a typed [`Answer`].

use crate::{
    application::{
        ApplicationError,
        ports::{Console, Level},
    },
    domain::Args,
    error::GojenResult,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Prompt {
    /// Yes/no question.
    Confirm { message: String },
    /// Pick one of the (sorted) case keys of a step.
    ChooseCase { step: String, options: Vec<String> },
    /// Supply the named arguments as a JSON object.
    SupplyArguments { step: String, missing: Vec<String> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Yes,
    No,
    /// Zero-based index into the offered options.
    Choice(usize),
    Arguments(Args),
}

impl Prompt {
    pub fn confirm(message: impl Into<String>) -> Self {
        Self::Confirm {
            message: message.into(),
        }
    }

    /// Ask `console` and validate the answer.
    ///
    /// # Errors
    ///
    /// - `InvalidSelection` for a non-numeric or out-of-range choice.
    /// - `InvalidArgumentInput` when arguments are not a JSON object.
    /// - `MissingArgument` when the object lacks a requested name.
    pub fn ask(&self, console: &dyn Console) -> GojenResult<Answer> {
        match self {
            Self::Confirm { message } => Ok(if console.confirm(message) {
                Answer::Yes
            } else {
                Answer::No
            }),
            Self::ChooseCase { step, options } => {
                console.say(Level::Prompt, &format!("Select a branch for {step}:"));
                for (i, option) in options.iter().enumerate() {
                    console.say(Level::Prompt, &format!("  {}. {}", i + 1, option));
                }
                let input = console.read_line().unwrap_or_default();
                parse_choice(&input, options.len())
                    .map(Answer::Choice)
                    .ok_or_else(|| {
                        ApplicationError::InvalidSelection {
                            input: input.trim().to_string(),
                            options: options.len(),
                        }
                        .into()
                    })
            }
            Self::SupplyArguments { step, missing } => {
                console.say(
                    Level::Prompt,
                    &format!(
                        "{step} needs [{}]. Enter them as a JSON object:",
                        missing.join(", ")
                    ),
                );
                let input = console
                    .read_line()
                    .map_err(|e| ApplicationError::InvalidArgumentInput {
                        reason: e.to_string(),
                    })?;
                let args = parse_arguments(&input)?;

                let (_, still_missing) = args.extract(missing);
                if !still_missing.is_empty() {
                    return Err(ApplicationError::MissingArgument {
                        step: step.clone(),
                        names: still_missing,
                    }
                    .into());
                }
                Ok(Answer::Arguments(args))
            }
        }
    }
}

fn parse_choice(input: &str, options: usize) -> Option<usize> {
    let n: usize = input.trim().parse().ok()?;
    (1..=options).contains(&n).then(|| n - 1)
}

fn parse_arguments(input: &str) -> Result<Args, ApplicationError> {
    let value: serde_json::Value =
        serde_json::from_str(input.trim()).map_err(|e| ApplicationError::InvalidArgumentInput {
            reason: e.to_string(),
        })?;

    match value {
        serde_json::Value::Object(map) => Ok(map.into_iter().collect()),
        other => Err(ApplicationError::InvalidArgumentInput {
            reason: format!("expected a JSON object, got {other}"),
        }),
    }
}
