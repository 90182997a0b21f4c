//! Flags accepted by every subcommand.
//!
//! Flattened into [`super::Cli`] with `global = true`, so they may appear
//! before or after the subcommand name.

use std::path::PathBuf;

use clap::{ArgAction, Args, builder::FalseyValueParser};

/// Verbosity, colour and config-file flags shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Log more. `-v` info, `-vv` debug, `-vvv` trace.
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true,
        help = "Log more (-v info, -vv debug, -vvv trace)",
        long_help = "Raise the log level written to stderr:
    (none)  warnings and errors
    -v      info
    -vv     debug
    -vvv    trace
RUST_LOG, when set, takes precedence."
    )]
    pub verbose: u8,

    /// Only errors, warnings and prompts reach the terminal.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Hide progress messages; prompts are still shown"
    )]
    pub quiet: bool,

    /// Plain output without ANSI escapes.
    ///
    /// `NO_COLOR` with any value other than a falsey one (`0`, `false`,
    /// `no`, `off`) has the same effect.
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new(),
        help = "Disable colored output"
    )]
    pub no_color: bool,

    /// Extra config file, layered over the user and `.gojen.toml` files.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "Layer an extra configuration file"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "How command output is rendered"
    )]
    pub output_format: OutputFormat,
}

/// Rendering of command output on stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Colour when stdout is a terminal.
    #[default]
    Auto,
    /// Always colour.
    Human,
    /// Never colour.
    Plain,
}
