//! Schema document example.
//!
//! Builds tables from a JSON document instead of declaring them in code,
//! binds them to a value store, parses a fixed command line and prints the
//! resulting report.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p shell-args-demos --example schema_document
//! ```

use shell_args_core::{CapturedOutput, SchemaDocument, ShellTokenizer, validate_schema};

const SCHEMA: &str = r#"{
    "program": "copy",
    "description": "Copy a file, optionally limiting the byte count",
    "mandatory_params": 2,
    "enums": {
        "modes": [
            { "code": 0, "name": "binary" },
            { "code": 1, "name": "text" }
        ]
    },
    "parameters": [
        { "type": "string", "help": "[src]source path" },
        { "type": "string", "help": "[dst]destination path" }
    ],
    "switches": [
        { "short": "-n", "long": "-count", "type": "integer", "help": "[bytes]bytes to copy" },
        { "short": "-m", "long": "-mode", "type": "enum", "values": "modes", "default": "binary" },
        { "short": "-q", "long": "-quiet", "help": "suppress progress output" }
    ]
}"#;

fn main() {
    let doc = match SchemaDocument::from_json(SCHEMA) {
        Ok(doc) => doc,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    let mut store = match doc.new_store() {
        Ok(store) => store,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    let parser = doc.parser();
    let mut output = CapturedOutput::default();
    let result = match doc.bind(&mut store) {
        Ok(mut bound) => {
            let findings = validate_schema(
                &bound.parameters,
                &bound.switches,
                doc.mandatory_params,
                parser.parse_options(),
            );
            for finding in &findings {
                eprintln!("schema: {finding}");
            }

            println!("{}", parser.render_help(&bound.parameters, &bound.switches));

            let argv = ["copy", "in.txt", "out.txt", "-count", "0x400", "-mode", "TEXT"];
            let tokenizer = ShellTokenizer::new(argv);
            parser.parse(&tokenizer, &mut bound.parameters, &mut bound.switches, &mut output)
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    match result {
        Ok(summary) => {
            println!("parsed {} positional argument(s)", summary.positional_count);
            match serde_json::to_string_pretty(&store.report(&doc)) {
                Ok(report) => println!("{report}"),
                Err(err) => eprintln!("error: {err}"),
            }
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(err.status().exit_code());
        }
    }
}
