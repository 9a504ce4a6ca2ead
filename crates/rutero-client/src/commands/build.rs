use std::path::{Path, PathBuf};

use crate::ClientResult;
use crate::config::{EngineOverrides, resolve_settings};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{BuildData, NextStep, OutputFile};
use crate::export::write_master_csv;
use crate::geo::ReferenceTables;
use crate::ingest::{InputKind, read_inputs};
use crate::master::MASTER_COLUMNS;
use crate::pipeline::{EnrichedBuild, enrich};

#[derive(Debug, Default)]
pub struct BuildOptions<'a> {
    pub input_dir: PathBuf,
    pub raw: bool,
    pub out: Option<PathBuf>,
    pub engine: EngineOverrides<'a>,
}

pub fn run(input_dir: PathBuf, raw: bool, out: Option<PathBuf>) -> ClientResult<SuccessEnvelope> {
    run_with_options(BuildOptions {
        input_dir,
        raw,
        out,
        ..BuildOptions::default()
    })
}

#[doc(hidden)]
pub fn run_with_options(options: BuildOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let settings = resolve_settings(&options.engine)?;
    let tables = ReferenceTables::load(&settings)?;
    let reference_source = settings.reference.describe();

    let kind = if options.raw {
        InputKind::RawExport
    } else {
        InputKind::Tables
    };
    let input = read_inputs(&options.input_dir, kind)?;
    let build = enrich(input, &tables, &settings.domestic_country);
    let input_dir = options.input_dir.display().to_string();

    let output = match options.out.as_deref() {
        Some(path) => Some(write_output(path, &build)?),
        None => None,
    };
    let message = match &output {
        Some(file) => format!("Wrote {} master rows to {}.", file.rows_written, file.path),
        None => format!(
            "Built {} master rows. Nothing was written.",
            build.summary.master_rows
        ),
    };

    let data = BuildData {
        dry_run: output.is_none(),
        next_step: next_step(&build, &input_dir, options.raw, output.is_none()),
        input_dir,
        source_kind: kind.as_str().to_string(),
        reference_source,
        output,
        message,
        summary: build.summary.clone(),
        by_type: build.by_type.clone(),
        unclassified_keys: build.unclassified.len() as i64,
        top_unclassified: build.top_unclassified(),
        ingest: build.input.stats,
        join: build.master.stats,
    };
    success("build", data)
}

fn write_output(path: &Path, build: &EnrichedBuild) -> ClientResult<OutputFile> {
    let rows_written = write_master_csv(path, &build.master.records)?;
    Ok(OutputFile {
        path: path.display().to_string(),
        rows_written: rows_written as i64,
        columns: MASTER_COLUMNS.iter().map(|column| column.to_string()).collect(),
    })
}

fn next_step(build: &EnrichedBuild, input_dir: &str, raw: bool, dry_run: bool) -> NextStep {
    if dry_run {
        let raw_flag = if raw { " --raw" } else { "" };
        return NextStep {
            label: "Write the master table".to_string(),
            command: format!("rutero build {input_dir}{raw_flag} --out master.csv"),
        };
    }
    match build.unclassified.first() {
        Some(row) => NextStep {
            label: "Check the most frequent unclassified destination".to_string(),
            command: format!("rutero classify \"{}\"", row.key),
        },
        None => NextStep {
            label: "Review the loaded reference data".to_string(),
            command: "rutero reference stats".to_string(),
        },
    }
}
