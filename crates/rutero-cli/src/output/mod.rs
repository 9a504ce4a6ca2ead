mod build_text;
mod classify_text;
mod error_text;
mod format;
mod json;
mod mode;
mod reference_text;

use std::io;

use rutero_client::{ClientError, SuccessEnvelope};

use crate::stdout_io::write_stdout_line;

pub use mode::{OutputMode, mode_for_command};

#[derive(Debug, Clone, Copy)]
pub enum Report<'a> {
    Success(&'a SuccessEnvelope),
    Failure(&'a ClientError),
}

pub fn emit(report: Report<'_>, mode: OutputMode) -> io::Result<()> {
    let body = match (report, mode) {
        (Report::Success(success), OutputMode::Json) => json::success_document(success)?,
        (Report::Success(success), OutputMode::Text) => text_body(success)?,
        (Report::Failure(error), OutputMode::Json) => json::failure_document(error)?,
        (Report::Failure(error), OutputMode::Text) => error_text::explain(error),
    };
    write_stdout_line(&body)
}

fn text_body(success: &SuccessEnvelope) -> io::Result<String> {
    let data = &success.data;
    match success.command.as_str() {
        "build" => build_text::render_build(data),
        "classify" => classify_text::render_classify(data),
        "reference stats" => reference_text::render_reference_stats(data),
        other => Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("no text layout for `{other}`"),
        )),
    }
}
