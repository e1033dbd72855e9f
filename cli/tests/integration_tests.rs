use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const SCHEMA_YAML: &str = r#"
program: CmdLine
description: Application to test command line parser
mandatory_params: 1
enums:
  colours:
    - { code: 0, name: black }
    - { code: 1, name: red }
    - { code: 4, name: white }
parameters:
  - { type: string, capacity: 20, help: "[str]string parameter" }
  - { type: hex, help: hexadecimal parameter }
switches:
  - { short: -f, help: boolean flag }
  - { long: -flag2, flag_value: 12345678, help: flag with default value assigned }
  - { short: -c, long: -colour, type: enum, values: colours, help: "[val]named option" }
  - { short: -d, long: -dec, type: decimal, mandatory: true, help: "[num]decimal value" }
  - { short: -s, long: -string, type: string, capacity: 20, default: not initialised }
"#;

fn write_schema(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("failed to write schema");
    path
}

fn shell_args(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_shell-args"))
        .args(args)
        .output()
        .expect("failed to run shell-args")
}

fn parse(schema: &Path, extra: &[&str]) -> Output {
    let mut args = vec!["parse", "--schema", schema.to_str().unwrap(), "--"];
    args.extend_from_slice(extra);
    shell_args(&args)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// parse
// ---------------------------------------------------------------------------

#[test]
fn parse_reports_bound_values_as_json() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "cmdline.yml", SCHEMA_YAML);

    let output = parse(&schema, &["hello", "1f", "-dec", "7", "-c", "WHITE", "-flag2"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["program"], "CmdLine");
    assert_eq!(report["positional_count"], 2);
    assert_eq!(report["page_break"], false);
    assert_eq!(report["parameters"]["str"], "hello");
    assert_eq!(report["parameters"]["param2"], 31);
    assert_eq!(report["switches"]["-d"], 7);
    assert_eq!(report["switches"]["-c"], "white");
    assert_eq!(report["switches"]["-flag2"], 12345678);
    assert_eq!(report["switches"]["-f"], false);
    assert_eq!(report["switches"]["-s"], "not initialised");
}

#[test]
fn parse_reports_yaml() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "cmdline.yaml", SCHEMA_YAML);

    let output = shell_args(&[
        "parse",
        "--schema",
        schema.to_str().unwrap(),
        "--format",
        "yaml",
        "--",
        "x",
        "-d",
        "1",
        "-b",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("positional_count: 1"), "{text}");
    assert!(text.contains("page_break: true"), "{text}");
}

#[test]
fn parse_accepts_json_schema() {
    let dir = TempDir::new().unwrap();
    let doc: serde_json::Value = serde_yaml::from_str(SCHEMA_YAML).unwrap();
    let schema = write_schema(&dir, "cmdline.json", &doc.to_string());

    let output = parse(&schema, &["x", "-d", "0"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
}

#[test]
fn parse_missing_switch_exits_invalid_parameter() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "cmdline.yml", SCHEMA_YAML);

    let output = parse(&schema, &["x"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("CmdLine: Missing switch - '-d'"));
    assert!(stdout(&output).is_empty());
}

#[test]
fn parse_bad_value_names_switch() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "cmdline.yml", SCHEMA_YAML);

    let output = parse(&schema, &["x", "-d", "1", "-colour", "purple"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Switch '-colour' has invalid option - 'purple'"));
}

#[test]
fn parse_help_aborts() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "cmdline.yml", SCHEMA_YAML);

    let output = parse(&schema, &["-help"]);
    assert_eq!(output.status.code(), Some(21));
    let text = stdout(&output);
    assert!(text.contains("Usage: CmdLine str [arg] [options]"), "{text}");
    assert!(text.contains("(black|red|white)"), "{text}");
}

#[test]
fn parse_too_many_switches_exits_out_of_resources() {
    let dir = TempDir::new().unwrap();
    let switches: Vec<String> = (0..31).map(|i| format!("  - {{ short: -s{i} }}")).collect();
    let yaml = format!("program: big\nswitches:\n{}\n", switches.join("\n"));
    let schema = write_schema(&dir, "big.yml", &yaml);

    let output = parse(&schema, &[]);
    assert_eq!(output.status.code(), Some(9));
}

// ---------------------------------------------------------------------------
// help / check
// ---------------------------------------------------------------------------

#[test]
fn help_renders_builtins_last() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "cmdline.yml", SCHEMA_YAML);

    let output = shell_args(&["help", "--schema", schema.to_str().unwrap()]);
    assert!(output.status.success());
    let text = stdout(&output);
    let string_at = text.find("-string").unwrap();
    let break_at = text.find("-b, -break").unwrap();
    let help_at = text.find("-h, -help").unwrap();
    assert!(string_at < break_at && break_at < help_at, "{text}");
}

#[test]
fn check_accepts_valid_schema_and_writes_output() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "cmdline.yml", SCHEMA_YAML);
    let normalized = dir.path().join("normalized.json");

    let output = shell_args(&[
        "check",
        "--schema",
        schema.to_str().unwrap(),
        "--output",
        normalized.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("2 parameter(s), 5 switch(es)"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&normalized).unwrap()).unwrap();
    assert_eq!(json["program"], "CmdLine");
    assert_eq!(json["switches"][2]["type"], "enum");
}

#[test]
fn check_rejects_duplicate_spelling() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(
        &dir,
        "dup.yml",
        "program: dup\nswitches:\n  - { short: -v }\n  - { long: -V }\n",
    );

    let output = shell_args(&["check", "--schema", schema.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("duplicate switch spelling: -V"));
}

#[test]
fn check_rejects_unknown_enum_table() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(
        &dir,
        "enum.yml",
        "program: e\nswitches:\n  - { short: -c, type: enum, values: shades }\n",
    );

    let output = shell_args(&["check", "--schema", schema.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("unknown enum table 'shades'"));
}

// ---------------------------------------------------------------------------
// convert
// ---------------------------------------------------------------------------

#[test]
fn convert_prints_values() {
    let hex = shell_args(&["convert", "--type", "hex", "0x1F"]);
    assert!(hex.status.success());
    assert_eq!(stdout(&hex).trim(), "31");

    let colour = shell_args(&["convert", "--type", "enum", "--enum", "black=0,white=4", "White"]);
    assert_eq!(stdout(&colour).trim(), "4");

    let text = shell_args(&["convert", "--type", "string", "--capacity", "4", "abcdef"]);
    assert_eq!(stdout(&text).trim(), "\"abc\"");
}

#[test]
fn convert_rejects_malformed_token() {
    let output = shell_args(&["convert", "--type", "decimal", "12x"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("error: "));
}
