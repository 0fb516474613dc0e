//! `tabrec` command-line entry point.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{ColorChoice, Parser};
use tabrec_cli::commands::{FetchOptions, run_candidates, run_decode, run_fetch};
use tabrec_cli::logging::{LogConfig, LogFormat, init_logging};
use tabrec_cli::render::{candidates_table, records_json, records_table};
use tabrec_fetch::MessageFilter;
use tabrec_model::DomainRecord;
use tracing::level_filters::LevelFilter;

mod cli;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg, OutputFormatArg};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let outcome = match cli.command {
        Command::Decode(args) => run_decode(&args.result, args.config.as_deref())
            .and_then(|records| print_records(&records, args.format)),
        Command::Fetch(args) => {
            let options = FetchOptions {
                snapshot: args.snapshot,
                config: args.config,
                filter: MessageFilter {
                    severity: args.severity,
                    collector: args.collector,
                    limit: args.limit,
                },
            };
            run_fetch(&options).and_then(|records| print_records(&records, args.format))
        }
        Command::Candidates(args) => {
            run_candidates(args.config.as_deref(), args.prefer.as_deref()).map(|list| {
                println!("Table: {}", list.table);
                println!(
                    "{}",
                    candidates_table(&list.candidates, list.preferred.as_deref(), &list.queries)
                );
            })
        }
    };
    let exit_code = match outcome {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn print_records(records: &[DomainRecord], format: OutputFormatArg) -> Result<()> {
    match format {
        OutputFormatArg::Json => println!("{}", records_json(records)?),
        OutputFormatArg::Table => {
            println!("{}", records_table(records));
            println!("{} message(s)", records.len());
        }
    }
    Ok(())
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
