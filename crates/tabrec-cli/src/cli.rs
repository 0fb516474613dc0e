//! CLI argument definitions for `tabrec`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "tabrec",
    version,
    about = "Decode warehouse result sets into collection messages",
    long_about = "Decode warehouse result sets into collection messages.\n\n\
                  Columns are matched by ranked candidate names, nested and repeated\n\
                  fields are decoded from the result schema, and the ordering column\n\
                  is resolved adaptively when the table lacks the preferred one."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow row values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Decode a stored result set (warehouse REST JSON) into messages.
    Decode(DecodeArgs),

    /// Fetch messages through the ordering-column cascade.
    Fetch(FetchArgs),

    /// Show the ordering columns the resolver would probe, in order.
    Candidates(CandidatesArgs),
}

#[derive(Args)]
pub struct DecodeArgs {
    /// Result set JSON file (`schema.fields` + `rows[].f[].v`).
    #[arg(value_name = "RESULT_JSON")]
    pub result: PathBuf,

    /// TOML configuration; its order columns become the timestamp candidates.
    #[arg(long = "config", value_name = "TOML")]
    pub config: Option<PathBuf>,

    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Args)]
pub struct FetchArgs {
    /// Result set JSON file served as the warehouse table.
    #[arg(long = "snapshot", value_name = "RESULT_JSON")]
    pub snapshot: PathBuf,

    #[arg(long = "config", value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Keep only this severity (ignored when unknown).
    #[arg(long = "severity")]
    pub severity: Option<String>,

    /// Keep only this collector (case-insensitive).
    #[arg(long = "collector")]
    pub collector: Option<String>,

    /// Maximum number of messages (0 for no limit).
    #[arg(long = "limit")]
    pub limit: Option<usize>,

    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Args)]
pub struct CandidatesArgs {
    #[arg(long = "config", value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Column a primed resolver would prefer.
    #[arg(long = "prefer", value_name = "COLUMN")]
    pub prefer: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
