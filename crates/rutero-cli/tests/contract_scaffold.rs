use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde_json::Value;
use tempfile::TempDir;

const ENGINE_ENV_VARS: [&str; 6] = [
    "RUTERO_GAZETTEER",
    "RUTERO_GEONAMES_CITIES",
    "RUTERO_GEONAMES_COUNTRIES",
    "RUTERO_OVERRIDES",
    "RUTERO_DOMESTIC_COUNTRY",
    "RUTERO_FUZZY_MIN_SIMILARITY",
];

const CLIENTS_CSV: &str = "\
id_cliente,estado_civil,pais_residencia,cant_polizas,rango_edades,genero,zonas_ciudades_cli
C1,Casado,Colombia,2,30-40,F,Bogota
C2,Soltero,Colombia,1,20-30,M,Medellin
";

const INVOICES_CSV: &str = "\
no_factura,id_cliente,fecha_factura,ciudad_destino,vlr_total_neto_factura,vlr_total_item_factura,vlr_total_neto_item_factura
F1,C1,2024-03-05,CARTAGENA,1500000,1500000,1400000
F2,C2,15/07/2024,MIAMI,3200000,3000000,2900000
F3,C9,2024-11-20,XANADU,800000,800000,750000
";

const SUPPLIERS_CSV: &str = "\
no_factura,nombre_proveedor,vlr_presupuesto_ppto
F1,AVIANCA,900000
F1,HOTEL CARIBE,400000
F2,AMERICAN AIRLINES,2500000
";

struct CliOutput {
    code: Option<i32>,
    stdout: String,
}

impl CliOutput {
    fn json(&self) -> Value {
        let parsed = serde_json::from_str::<Value>(&self.stdout);
        assert!(parsed.is_ok(), "stdout is not JSON: {}", self.stdout);
        parsed.unwrap_or(Value::Null)
    }
}

fn rutero_command(workdir: &Path, args: &[&str]) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_rutero"));
    command.args(args);
    command.current_dir(workdir);
    for variable in ENGINE_ENV_VARS {
        command.env_remove(variable);
    }
    command.env_remove("RUST_LOG");
    command
}

fn run_cli_in(workdir: &Path, args: &[&str]) -> CliOutput {
    let output = rutero_command(workdir, args).output();
    assert!(output.is_ok());
    if let Ok(result) = output {
        let stdout = String::from_utf8(result.stdout);
        assert!(stdout.is_ok());
        if let Ok(stdout) = stdout {
            return CliOutput {
                code: result.status.code(),
                stdout,
            };
        }
    }
    CliOutput {
        code: None,
        stdout: String::new(),
    }
}

fn temp_workdir() -> TempDir {
    let workdir = tempfile::tempdir();
    assert!(workdir.is_ok());
    match workdir {
        Ok(dir) => dir,
        Err(error) => panic!("temp dir: {error}"),
    }
}

fn write_tables(root: &Path) -> PathBuf {
    let input = root.join("input");
    assert!(fs::create_dir_all(&input).is_ok());
    assert!(fs::write(input.join("clientes.csv"), CLIENTS_CSV).is_ok());
    assert!(fs::write(input.join("facturas.csv"), INVOICES_CSV).is_ok());
    assert!(fs::write(input.join("proveedores_por_factura.csv"), SUPPLIERS_CSV).is_ok());
    input
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

fn assert_text_error_contract(body: &str, code: &str) {
    assert!(body.contains(&format!("  Error:    {code}")));
    assert!(body.contains("  Details:"));
    assert!(body.contains("What to do next:"));
}

fn assert_pipe_close_does_not_panic(args: &[&str], expect_success: bool) {
    let workdir = temp_workdir();
    let mut producer = rutero_command(workdir.path(), args);
    producer.stdout(Stdio::piped());
    producer.stderr(Stdio::piped());

    let producer_spawn = producer.spawn();
    assert!(producer_spawn.is_ok());
    if let Ok(mut producer_child) = producer_spawn {
        let producer_stdout = producer_child.stdout.take();
        let producer_stderr = producer_child.stderr.take();
        assert!(producer_stdout.is_some());
        assert!(producer_stderr.is_some());

        if let Some(stdout_pipe) = producer_stdout {
            let mut reader = BufReader::new(stdout_pipe);
            let mut first_line = String::new();
            let read_result = reader.read_line(&mut first_line);
            assert!(read_result.is_ok());
            assert!(!first_line.is_empty());
            drop(reader);
        }

        let status = producer_child.wait();
        assert!(status.is_ok());
        if let Ok(exit_status) = status {
            assert_eq!(exit_status.success(), expect_success);
        }

        if let Some(mut stderr_pipe) = producer_stderr {
            let mut stderr_bytes = Vec::new();
            assert!(stderr_pipe.read_to_end(&mut stderr_bytes).is_ok());
            let stderr_text = String::from_utf8_lossy(&stderr_bytes);
            assert!(!stderr_text.contains("Broken pipe"));
            assert!(!stderr_text.contains("panicked"));
        }
    }
}

#[test]
fn root_command_uses_short_plaintext_help() {
    let workdir = temp_workdir();
    let output = run_cli_in(workdir.path(), &[]);
    assert_eq!(output.code, Some(0));
    assert!(output.stdout.starts_with("rutero - invoice destination enrichment"));
    assert!(output.stdout.contains("Start here:"));
}

#[test]
fn help_and_version_return_success_output() {
    let workdir = temp_workdir();
    let help = run_cli_in(workdir.path(), &["--help"]);
    assert_eq!(help.code, Some(0));
    assert!(help.stdout.contains("USAGE: rutero <command>"));
    assert!(help.stdout.contains("rutero build <input-dir> --dry-run"));
    assert!(help.stdout.contains("rutero build <input-dir> --out master.csv"));
    assert!(help.stdout.contains("RUST_LOG"));

    let version = run_cli_in(workdir.path(), &["--version"]);
    assert_eq!(version.code, Some(0));
    assert_eq!(version.stdout.trim(), "rutero 0.1.0");
}

#[test]
fn build_help_shows_input_layouts() {
    let workdir = temp_workdir();
    let output = run_cli_in(workdir.path(), &["build", "--help"]);
    assert_eq!(output.code, Some(0));
    assert!(output.stdout.contains("Input layouts:"));
    assert!(output.stdout.contains("proveedores_por_factura.csv"));
    assert!(output.stdout.contains("--raw"));
    assert!(output.stdout.contains("RUTERO_OVERRIDES"));
}

#[test]
fn help_output_pipe_close_does_not_panic() {
    assert_pipe_close_does_not_panic(&["build", "--help"], true);
}

#[test]
fn error_output_pipe_close_does_not_panic() {
    assert_pipe_close_does_not_panic(&["build", "--nope"], false);
}

#[test]
fn classify_json_reports_resolver_and_tuple() {
    let workdir = temp_workdir();
    let output = run_cli_in(
        workdir.path(),
        &["classify", "Cusco", "  miami ", "12345", "--json"],
    );
    assert_eq!(output.code, Some(0));

    let payload = output.json();
    assert_eq!(payload["ok"], Value::Bool(true));
    assert_eq!(payload["command"], Value::String("classify".to_string()));
    let rows = &payload["data"]["rows"];
    assert_eq!(rows.as_array().map(Vec::len), Some(3));

    assert_eq!(rows[0]["normalized_key"], Value::String("CUSCO".to_string()));
    assert_eq!(rows[0]["resolver"], Value::String("city".to_string()));
    assert_eq!(rows[0]["result"]["type"], Value::String("CIUDAD".to_string()));
    assert_eq!(rows[0]["result"]["country"], Value::String("Peru".to_string()));

    assert_eq!(rows[1]["resolver"], Value::String("override".to_string()));
    assert_eq!(rows[1]["result"]["name"], Value::String("Miami".to_string()));

    assert_eq!(rows[2]["resolver"], Value::String("reference_code".to_string()));
    assert!(rows[2]["result"]["type"].is_null());
}

#[test]
fn build_writes_the_master_table_to_out() {
    let workdir = temp_workdir();
    let input = write_tables(workdir.path());
    let input_arg = path_arg(&input);
    let out = workdir.path().join("exports").join("master.csv");
    let out_arg = path_arg(&out);

    let build = run_cli_in(
        workdir.path(),
        &["build", &input_arg, "--out", &out_arg, "--json"],
    );
    assert_eq!(build.code, Some(0), "build failed: {}", build.stdout);
    let build_payload = build.json();
    let data = &build_payload["data"];
    assert_eq!(data["dry_run"], Value::Bool(false));
    assert_eq!(data["summary"]["invoices"], Value::from(3));
    assert_eq!(data["summary"]["master_rows"], Value::from(3));
    assert_eq!(data["summary"]["unclassified"], Value::from(1));
    assert_eq!(data["top_unclassified"][0]["key"], Value::String("XANADU".to_string()));
    assert_eq!(data["output"]["path"], Value::String(out_arg.clone()));
    assert_eq!(data["output"]["rows_written"], Value::from(3));

    let written = fs::read_to_string(&out);
    assert!(written.is_ok());
    if let Ok(csv_text) = written {
        let lines = csv_text.lines().collect::<Vec<&str>>();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("invoice_id,client_id,invoice_date,invoice_year,"));
        assert!(lines[0].ends_with(",principal_supplier,is_international"));
        assert!(lines[1].starts_with("F1,C1,2024-03-05,2024,CARTAGENA,CIUDAD,"));
        assert!(lines[1].ends_with(",AVIANCA,false"));
        assert!(lines[2].ends_with(",true"));
        assert!(lines[3].starts_with("F3,C9,"));
    }

    let text = run_cli_in(workdir.path(), &["build", &input_arg, "--out", &out_arg]);
    assert_eq!(text.code, Some(0));
    assert!(text.stdout.starts_with("Build complete. The master table was written."));
    assert!(text.stdout.contains("Rows written:"));
    assert!(text.stdout.contains("XANADU"));
}

#[test]
fn dry_run_writes_nothing() {
    let workdir = temp_workdir();
    let input = write_tables(workdir.path());
    let input_arg = path_arg(&input);

    let build = run_cli_in(workdir.path(), &["build", &input_arg, "--dry-run"]);
    assert_eq!(build.code, Some(0), "dry run failed: {}", build.stdout);
    assert!(build.stdout.starts_with("Dry run complete. Nothing was written."));
    assert!(build.stdout.contains("Master rows:"));
    assert!(build.stdout.contains("--out master.csv"));

    let entries = fs::read_dir(workdir.path()).map(|entries| entries.count());
    assert!(matches!(entries, Ok(1)));
}

#[test]
fn unwritable_out_path_is_a_user_error() {
    let workdir = temp_workdir();
    let input = write_tables(workdir.path());
    let blocker = workdir.path().join("not-a-dir");
    assert!(fs::write(&blocker, "file").is_ok());
    let out = blocker.join("master.csv");

    let output = run_cli_in(
        workdir.path(),
        &["build", &path_arg(&input), "--out", &path_arg(&out), "--json"],
    );
    assert_eq!(output.code, Some(1));
    let payload = output.json();
    assert_eq!(
        payload["error"]["code"],
        Value::String("output_write_failed".to_string())
    );
    assert_eq!(payload["error"]["class"], Value::String("user".to_string()));
}

#[test]
fn reference_stats_describes_bundled_tables() {
    let workdir = temp_workdir();
    let output = run_cli_in(workdir.path(), &["reference", "stats", "--json"]);
    assert_eq!(output.code, Some(0));
    let payload = output.json();
    assert!(payload["data"]["gazetteer"]["countries"].as_i64().unwrap_or(0) > 0);
    assert!(payload["data"]["overrides"]["keys"].as_i64().unwrap_or(0) > 0);
    assert_eq!(
        payload["data"]["domestic_country"],
        Value::String("Colombia".to_string())
    );
}

#[test]
fn missing_input_table_is_a_user_error() {
    let workdir = temp_workdir();
    let empty = workdir.path().join("empty");
    assert!(fs::create_dir_all(&empty).is_ok());
    let output = run_cli_in(
        workdir.path(),
        &["build", &path_arg(&empty), "--dry-run", "--json"],
    );
    assert_eq!(output.code, Some(1));
    let payload = output.json();
    assert_eq!(
        payload["error"]["code"],
        Value::String("input_table_missing".to_string())
    );
}

#[test]
fn missing_reference_data_is_an_internal_error() {
    let workdir = temp_workdir();
    let missing = workdir.path().join("no-such-gazetteer.json");
    let output = run_cli_in(
        workdir.path(),
        &["classify", "Cusco", "--gazetteer", &path_arg(&missing), "--json"],
    );
    assert_eq!(output.code, Some(2));
    let payload = output.json();
    assert_eq!(
        payload["error"]["code"],
        Value::String("reference_data_unavailable".to_string())
    );
    assert_eq!(payload["error"]["class"], Value::String("internal".to_string()));
}

#[test]
fn unreadable_override_table_is_a_user_error() {
    let workdir = temp_workdir();
    let missing = workdir.path().join("no-such-overrides.csv");
    let output = run_cli_in(
        workdir.path(),
        &["classify", "Cusco", "--overrides", &path_arg(&missing), "--json"],
    );
    assert_eq!(output.code, Some(1));
    let payload = output.json();
    assert_eq!(
        payload["error"]["code"],
        Value::String("override_table_invalid".to_string())
    );
}

#[test]
fn parse_errors_use_the_error_contract() {
    let workdir = temp_workdir();
    let output = run_cli_in(workdir.path(), &["build", "./input"]);
    assert_eq!(output.code, Some(1));
    assert_text_error_contract(&output.stdout, "invalid_argument");
    assert!(output.stdout.contains("--out master.csv"));
    assert!(output.stdout.contains("--dry-run"));

    let unknown = run_cli_in(workdir.path(), &["plot", "master.csv"]);
    assert_eq!(unknown.code, Some(1));
    assert_text_error_contract(&unknown.stdout, "invalid_argument");

    let json = run_cli_in(workdir.path(), &["classify", "--fuzzy-min-similarity", "3", "x", "--json"]);
    assert_eq!(json.code, Some(1));
    let payload = json.json();
    assert_eq!(
        payload["error"]["code"],
        Value::String("invalid_argument".to_string())
    );
}
