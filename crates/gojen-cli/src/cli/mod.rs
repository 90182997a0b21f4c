//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "gojen",
    bin_name = "gojen",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} Declarative code scaffolding",
    long_about = "Gojen renders declarations (named templates with selectable \
                  elements) along a sequence and writes or merges the results \
                  into files.",
    after_help = "EXAMPLES:\n\
        \x20 gojen run sequences/service.yaml --arg Domain=user\n\
        \x20 gojen run seq.yaml --decls ./declarations --dry-run\n\
        \x20 gojen list --format json\n\
        \x20 gojen completions bash > /usr/share/bash-completion/completions/gojen",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build a sequence and apply it to the filesystem.
    #[command(
        visible_alias = "r",
        about = "Build and apply a sequence",
        after_help = "EXAMPLES:\n\
            \x20 gojen run seq.yaml\n\
            \x20 gojen run seq.yaml --arg Domain=user --arg Port=8080\n\
            \x20 gojen run seq.yaml --dry-run"
    )]
    Run(RunArgs),

    /// List the declarations that can be used in a sequence.
    #[command(
        visible_alias = "ls",
        about = "List declarations",
        after_help = "EXAMPLES:\n\
            \x20 gojen list\n\
            \x20 gojen list --decls ./declarations --format json"
    )]
    List(ListArgs),

    /// Initialise a Gojen configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 gojen init           # default location\n\
            \x20 gojen init --local   # .gojen.toml in CWD\n\
            \x20 gojen init --force   # overwrite"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 gojen completions bash > ~/.local/share/bash-completion/completions/gojen\n\
            \x20 gojen completions zsh  > ~/.zfunc/_gojen\n\
            \x20 gojen completions fish > ~/.config/fish/completions/gojen.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the effective configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 gojen config get apply.comment_prefix\n\
            \x20 gojen config list\n\
            \x20 gojen config path"
    )]
    Config(ConfigCommands),
}

// ── run ───────────────────────────────────────────────────────────────────────

/// Arguments for `gojen run`.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Sequence file (YAML or JSON list of steps).
    #[arg(value_name = "SEQUENCE", help = "Sequence file to run")]
    pub sequence: PathBuf,

    /// Declarations directory; overrides `declarations.dir`.
    #[arg(
        short = 'd',
        long = "decls",
        value_name = "DIR",
        help = "Declarations directory"
    )]
    pub decls: Option<PathBuf>,

    /// Seed argument, repeatable.  Values that parse as JSON (numbers,
    /// booleans, arrays, objects) keep their type; anything else is a string.
    #[arg(
        short = 'a',
        long = "arg",
        value_name = "KEY=VALUE",
        value_parser = parse_key_value,
        help = "Set an argument (repeatable)"
    )]
    pub args: Vec<(String, String)>,

    /// Build and print the states without touching any file.
    #[arg(long = "dry-run", help = "Show rendered states without writing")]
    pub dry_run: bool,

    /// Skip writing audit state files.
    #[arg(long = "no-record", help = "Do not write audit state files")]
    pub no_record: bool,
}

/// Parse `KEY=VALUE`. The value may contain further `=`.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `gojen list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Declarations directory; overrides `declarations.dir`.
    #[arg(
        short = 'd',
        long = "decls",
        value_name = "DIR",
        help = "Declarations directory"
    )]
    pub decls: Option<PathBuf>,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// JSON array.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `gojen init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.gojen.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `gojen completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `gojen config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `store.state_dir`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the default configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
