mod config;
mod error;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use shell_args_core::{
    DEFAULT_STRING_CAPACITY, EnumMapping, ParseError, ParseOptions, ShellStatus, ShellTokenizer,
    StdoutSink, ValueType, convert, validate_schema,
};

use crate::config::{load_schema, save_document};

/// Output format for parse reports.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

/// Value types accepted by `convert`.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliValueType {
    String,
    Decimal,
    Hex,
    Integer,
    Enum,
}

#[derive(Debug, Parser)]
#[command(name = "shell-args")]
#[command(about = "Load, check and exercise shell argument schemas")]
#[command(disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a command line against a schema and print the bound values.
    Parse(ParseArgs),
    /// Render the help screen for a schema.
    Help(SchemaArgs),
    /// Validate a schema document.
    Check(CheckArgs),
    /// Convert a single token the way the parser would.
    Convert(ConvertArgs),
}

#[derive(Debug, Args)]
struct SchemaArgs {
    /// Schema document (.json, otherwise YAML).
    #[arg(long)]
    schema: PathBuf,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Schema document (.json, otherwise YAML).
    #[arg(long)]
    schema: PathBuf,
    /// Write the normalized document here once it validates.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Schema document (.json, otherwise YAML).
    #[arg(long)]
    schema: PathBuf,
    /// Report format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Arguments after the program name.
    #[arg(last = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct ConvertArgs {
    /// Target value type.
    #[arg(long = "type")]
    value_type: CliValueType,
    /// Comma-separated NAME=CODE pairs for enum conversion.
    #[arg(long = "enum")]
    names: Option<String>,
    /// String capacity, terminator slot included.
    #[arg(long, default_value_t = DEFAULT_STRING_CAPACITY)]
    capacity: usize,
    /// Token to convert.
    #[arg(allow_hyphen_values = true)]
    token: String,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Help(args) => run_help(args).map(|()| ShellStatus::Success),
        Command::Check(args) => run_check(args).map(|()| ShellStatus::Success),
        Command::Convert(args) => run_convert(args).map(|()| ShellStatus::Success),
    };

    match result {
        Ok(ShellStatus::Success) => {}
        Ok(status) => std::process::exit(status.exit_code()),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn run_parse(args: ParseArgs) -> Result<ShellStatus, String> {
    let (doc, mut store) = load_schema(&args.schema).map_err(|e| e.to_string())?;
    let mut bound = doc.bind(&mut store).map_err(|e| e.to_string())?;

    let argv = std::iter::once(doc.program.clone()).chain(args.args);
    let tokenizer = ShellTokenizer::new(argv);
    let mut sink = StdoutSink::new();

    let result = doc
        .parser()
        .parse(&tokenizer, &mut bound.parameters, &mut bound.switches, &mut sink);
    drop(bound);

    let summary = match result {
        Ok(summary) => summary,
        Err(ParseError::HelpShown) => return Ok(ShellStatus::Aborted),
        Err(err) => {
            eprintln!("{err}");
            return Ok(err.status());
        }
    };

    let mut report = store.report(&doc);
    if let Some(fields) = report.as_object_mut() {
        fields.insert("positional_count".into(), summary.positional_count.into());
        fields.insert("page_break".into(), summary.page_break.into());
    }

    let rendered = match args.format {
        CliOutputFormat::Json => serde_json::to_string_pretty(&report)
            .map_err(|err| format!("Failed to serialize report: {err}"))?,
        CliOutputFormat::Yaml => serde_yaml::to_string(&report)
            .map_err(|err| format!("Failed to serialize report: {err}"))?,
    };
    println!("{}", rendered.trim_end());

    Ok(ShellStatus::Success)
}

fn run_help(args: SchemaArgs) -> Result<(), String> {
    let (doc, mut store) = load_schema(&args.schema).map_err(|e| e.to_string())?;
    let bound = doc.bind(&mut store).map_err(|e| e.to_string())?;

    print!(
        "{}",
        doc.parser().render_help(&bound.parameters, &bound.switches)
    );
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let (doc, mut store) = load_schema(&args.schema).map_err(|e| e.to_string())?;
    let bound = doc.bind(&mut store).map_err(|e| e.to_string())?;

    let errors = validate_schema(
        &bound.parameters,
        &bound.switches,
        doc.mandatory_params,
        &ParseOptions::from(&doc.options),
    );
    if let Some(err) = errors.first() {
        return Err(format!("'{}': {err}", args.schema.display()));
    }

    if let Some(output) = &args.output {
        save_document(&doc, output)
            .map_err(|err| format!("Failed to write '{}': {err}", output.display()))?;
    }

    println!(
        "Schema '{}' is valid: {} parameter(s), {} switch(es).",
        args.schema.display(),
        doc.parameters.len(),
        doc.switches.len()
    );
    Ok(())
}

fn run_convert(args: ConvertArgs) -> Result<(), String> {
    let value_type = match args.value_type {
        CliValueType::String => ValueType::String {
            capacity: args.capacity,
        },
        CliValueType::Decimal => ValueType::Decimal,
        CliValueType::Hex => ValueType::Hexadecimal,
        CliValueType::Integer => ValueType::Integer,
        CliValueType::Enum => {
            let names = args
                .names
                .as_deref()
                .ok_or_else(|| "--enum is required for enum conversion".to_string())?;
            ValueType::Enum(parse_enum_list(names)?)
        }
    };

    let value = convert(&args.token, &value_type).map_err(|err| err.to_string())?;
    let rendered = serde_json::to_string(&value)
        .map_err(|err| format!("Failed to serialize value: {err}"))?;
    println!("{rendered}");
    Ok(())
}

fn parse_enum_list(raw: &str) -> Result<EnumMapping, String> {
    let mut mapping = EnumMapping::new();
    for pair in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (name, code) = pair
            .split_once('=')
            .ok_or_else(|| format!("Invalid enum entry '{pair}', expected NAME=CODE"))?;
        let code = code
            .trim()
            .parse::<u32>()
            .map_err(|err| format!("Invalid enum code in '{pair}': {err}"))?;
        mapping = mapping.with(code, name.trim());
    }
    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_enum_list() {
        let mapping = parse_enum_list("black=0, red=1,white=4").unwrap();
        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping.lookup("White"), Some(4));
    }

    #[test]
    fn test_parse_enum_list_rejects_bad_pairs() {
        assert!(parse_enum_list("black").is_err());
        assert!(parse_enum_list("black=x").is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
