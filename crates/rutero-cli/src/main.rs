mod cli;
mod dispatch;
mod output;
mod stdout_io;

use std::process::ExitCode;

use clap::error::ErrorKind;
use output::{OutputMode, Report};
use rutero_client::ClientError;
use stdout_io::write_stdout_text;
use tracing_subscriber::EnvFilter;

const USER_ERROR: u8 = 1;
const INTERNAL_FAILURE: u8 = 2;
const OUTPUT_FAILED: u8 = 2;

const ROOT_HELP: &str = "rutero - invoice destination enrichment for travel agencies

Usage:
  rutero <command>

Start here:
  rutero classify \"CARTAGENA DE INDIAS\"
  rutero build --help
  rutero reference stats
";

const TOP_LEVEL_HELP: &str = "rutero - invoice destination enrichment for travel agencies

USAGE: rutero <command>

Try the classifier:
  rutero classify <label>...                              Normalize and classify free-text destinations
  rutero reference stats                                  Show the loaded gazetteer and override tables

Build a master table:
  1. rutero build --help                                  Read input layouts and reference settings
  2. rutero build <input-dir> --dry-run                   Classify and summarize without writing a file
  3. rutero build <input-dir> --out master.csv            Write the master table (add --raw for accounting exports)

Logging goes to stderr; set RUST_LOG=info (or debug) for stage-level detail.
Run `rutero <command> --help` for command usage.
";

fn main() -> ExitCode {
    init_logging();
    let args = std::env::args().collect::<Vec<String>>();
    run(&args)
}

/// Logs go to stderr so JSON on stdout stays parseable.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(args: &[String]) -> ExitCode {
    if args.len() == 1 {
        return show(ROOT_HELP);
    }

    let cli = match cli::parse_from(args) {
        Ok(cli) => cli,
        Err(err) if is_help_display(err.kind()) => {
            let bare_help = matches!(args, [_, flag] if flag == "--help" || flag == "-h");
            return if bare_help {
                show(TOP_LEVEL_HELP)
            } else {
                show(&err.to_string())
            };
        }
        Err(err) => {
            let error = usage_error(&err, args);
            return report(Report::Failure(&error), requested_mode(args));
        }
    };

    let mode = output::mode_for_command(&cli.command);
    match dispatch::dispatch(&cli) {
        Ok(success) => report(Report::Success(&success), mode),
        Err(error) => {
            tracing::debug!(code = %error.code, "command failed");
            report(Report::Failure(&error), mode)
        }
    }
}

fn show(text: &str) -> ExitCode {
    match write_stdout_text(text) {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::from(OUTPUT_FAILED),
    }
}

fn report(report: Report<'_>, mode: OutputMode) -> ExitCode {
    let code = match report {
        Report::Success(_) => ExitCode::SUCCESS,
        Report::Failure(error) if error.is_internal() => ExitCode::from(INTERNAL_FAILURE),
        Report::Failure(_) => ExitCode::from(USER_ERROR),
    };
    if output::emit(report, mode).is_err() {
        return ExitCode::from(OUTPUT_FAILED);
    }
    code
}

fn is_help_display(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    )
}

fn usage_error(err: &clap::Error, args: &[String]) -> ClientError {
    let names_a_command = matches!(
        err.kind(),
        ErrorKind::MissingRequiredArgument
            | ErrorKind::ArgumentConflict
            | ErrorKind::InvalidValue
            | ErrorKind::ValueValidation
            | ErrorKind::WrongNumberOfValues
            | ErrorKind::UnknownArgument
            | ErrorKind::InvalidSubcommand
    );
    let command = if names_a_command {
        command_path(args)
    } else {
        None
    };
    usage_error_for(&without_clap_footer(&err.to_string()), command)
}

/// Drops clap's usage line and `--help` pointer; recovery steps replace them.
fn without_clap_footer(message: &str) -> String {
    let end = ["\n\nUsage:", "\nFor more information"]
        .iter()
        .filter_map(|marker| message.find(*marker))
        .min()
        .unwrap_or(message.len());
    message[..end].trim_end().to_string()
}

/// Leading positional words only, so labels and paths never change the hint.
fn command_path(args: &[String]) -> Option<&'static str> {
    let mut words = args
        .iter()
        .skip(1)
        .filter(|value| !value.starts_with('-'))
        .map(String::as_str);
    match (words.next()?, words.next()) {
        ("build", _) => Some("build"),
        ("classify", _) => Some("classify"),
        ("reference", Some("stats")) => Some("reference stats"),
        ("reference", _) => Some("reference"),
        _ => None,
    }
}

fn usage_error_for(message: &str, command: Option<&str>) -> ClientError {
    if command == Some("build") && message.contains("required") && message.contains("--out") {
        return ClientError::invalid_argument_with_recovery(
            message,
            vec![
                "Name the CSV to write: `rutero build <input-dir> --out master.csv`.".to_string(),
                "Or pass `--dry-run` to see the summary without writing a file.".to_string(),
            ],
        );
    }
    ClientError::invalid_argument_for_command(message, command)
}

fn requested_mode(args: &[String]) -> OutputMode {
    if args.iter().skip(1).any(|value| value == "--json") {
        OutputMode::Json
    } else {
        OutputMode::Text
    }
}
