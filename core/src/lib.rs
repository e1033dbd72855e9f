//! Schema-driven command line parsing for shell applications.
//!
//! A program declares its positional parameters and switches as tables,
//! each entry bound to a typed destination. One call to [`Parser::parse`]
//! tokenizes the command line, converts every supplied value, writes it to
//! its destination and enforces arity, duplicates and mandatory switches.
//!
//! - [`ParameterSpec`] / [`SwitchSpec`]: table entries.
//! - [`convert`]: type-directed conversion of a single token.
//! - [`Parser`]: the parse engine, plus help rendering.
//! - [`Tokenizer`] / [`TokenSet`]: the tokenizer seam, with
//!   [`ShellTokenizer`] as the stock implementation.
//! - [`SchemaDocument`]: owned, serde-ready tables bound to a
//!   [`ValueStore`].
//!
//! Every parse carries two built-in switches: `-b` / `-break` turns on
//! page-break mode and `-h` / `-help` prints help and aborts.
//!
//! # Example
//!
//! ```
//! use shell_args_core::*;
//!
//! let mut name = String::new();
//! let mut colour = 0u32;
//! let mut verbose = false;
//! let colours = EnumMapping::new().with(0, "red").with(1, "blue");
//!
//! let mut params = [ParameterSpec::string(&mut name, 20).with_help("[name]who")];
//! let mut switches = [
//!     SwitchSpec::enumeration(Some("-c"), Some("-colour"), &mut colour, colours),
//!     SwitchSpec::flag(Some("-v"), None, &mut verbose),
//! ];
//!
//! let parser = Parser::new("paint").mandatory_params(1);
//! assert!(validate_schema(&params, &switches, 1, parser.parse_options()).is_empty());
//!
//! let tokenizer = ShellTokenizer::new(["paint", "door", "-colour", "BLUE"]);
//! let mut out = CapturedOutput::default();
//! let result = parser.parse(&tokenizer, &mut params, &mut switches, &mut out);
//! assert_eq!(ShellStatus::from(&result), ShellStatus::Success);
//!
//! drop((params, switches));
//! assert_eq!(name, "door");
//! assert_eq!(colour, 1);
//! assert!(!verbose);
//! ```

pub mod convert;
mod document;
mod error;
mod help;
mod host;
mod parse;
mod schema;
mod tokenizer;
mod types;
mod validate;

pub use convert::{ConversionError, bounded_copy, convert};
pub use document::{
    BoundSchema, DEFAULT_STRING_CAPACITY, DocumentError, DocumentOptions, ParameterDoc,
    SchemaDocument, SwitchDoc, ValueKind, ValueStore,
};
pub use error::{InputError, ParseError, SchemaError, ShellStatus};
pub use help::{DEFAULT_ARG_NAME, HelpText, render_help};
pub use host::{CapturedOutput, OutputSink, StdoutSink};
pub use parse::{ParseSummary, Parser};
pub use schema::{BuiltinSwitch, HELP_SWITCH, PAGE_BREAK_SWITCH, ParseOptions, build_registration};
pub use tokenizer::{
    ShellTokenizer, ShellTokens, TokenEntry, TokenKind, TokenSet, TokenizeError, Tokenizer,
};
pub use types::*;
pub use validate::validate_schema;
