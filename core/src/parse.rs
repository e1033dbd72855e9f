//! The parse engine.
//!
//! [`Parser::parse`] runs a linear state machine over one command line:
//!
//! 1. build the registration table (capacity overflow aborts here),
//! 2. tokenize,
//! 3. apply page-break mode,
//! 4. show help and stop if `-h` / `-help` was given,
//! 5. bind positional parameters,
//! 6. reject duplicate switches,
//! 7. resolve switches in declaration order,
//! 8. check mandatory switches.
//!
//! The first error ends the call. Errors raised from step 5 on carry the
//! positional count, as does the summary on success. The token set is
//! dropped on every path.
//!
//! # Example
//!
//! ```
//! use shell_args_core::*;
//!
//! let mut count = 0u64;
//! let mut verbose = false;
//! let mut params = [ParameterSpec::decimal(&mut count).with_help("[count]how many")];
//! let mut switches = [SwitchSpec::flag(Some("-v"), Some("-verbose"), &mut verbose)];
//!
//! let parser = Parser::new("repeat").mandatory_params(1);
//! let tokenizer = ShellTokenizer::new(["repeat", "3", "-verbose"]);
//! let mut out = CapturedOutput::default();
//!
//! let summary = parser
//!     .parse(&tokenizer, &mut params, &mut switches, &mut out)
//!     .unwrap();
//! assert_eq!(summary.positional_count, 1);
//! drop((params, switches));
//! assert_eq!(count, 3);
//! assert!(verbose);
//! ```

use tracing::{debug, error};

use crate::convert::convert;
use crate::error::{InputError, ParseError, SchemaError};
use crate::help::render_help;
use crate::host::OutputSink;
use crate::schema::{
    BuiltinSwitch, HELP_SWITCH, PAGE_BREAK_SWITCH, ParseOptions, build_registration,
};
use crate::tokenizer::{TokenSet, TokenizeError, Tokenizer};
use crate::{
    Destination, DestinationKind, Necessity, ParameterSpec, SwitchSpec, Value, ValueNecessity,
    ValueType,
};

/// Result of a successful parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseSummary {
    /// Positional arguments supplied, program name excluded.
    pub positional_count: usize,
    /// Whether page-break mode was switched on.
    pub page_break: bool,
}

/// Parse configuration for one program.
#[derive(Debug, Clone)]
pub struct Parser {
    program: String,
    description: Option<String>,
    mandatory_params: usize,
    options: ParseOptions,
}

impl Parser {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            description: None,
            mandatory_params: 0,
            options: ParseOptions::default(),
        }
    }

    /// Sets the program description shown at the top of help.
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Sets how many leading parameters must be supplied.
    pub fn mandatory_params(mut self, count: usize) -> Self {
        self.mandatory_params = count;
        self
    }

    pub fn options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn parse_options(&self) -> &ParseOptions {
        &self.options
    }

    /// Renders help for the given tables.
    pub fn render_help(&self, params: &[ParameterSpec<'_>], switches: &[SwitchSpec<'_>]) -> String {
        render_help(
            &self.program,
            self.description.as_deref(),
            self.mandatory_params,
            params,
            switches,
            &self.options,
        )
    }

    /// Parses one command line against `params` and `switches`.
    ///
    /// Destinations are written in place, each at most once. On error some
    /// destinations may already hold values from earlier entries, and
    /// [`ParseError::positional_count`] still reports how many positional
    /// arguments were supplied.
    ///
    /// # Errors
    ///
    /// - [`ParseError::Input`] when the command line is rejected.
    /// - [`ParseError::Schema`] when the tables are defective.
    /// - [`ParseError::Resources`] when working storage cannot be allocated.
    /// - [`ParseError::HelpShown`] after help was written to `sink`.
    pub fn parse<T: Tokenizer>(
        &self,
        tokenizer: &T,
        params: &mut [ParameterSpec<'_>],
        switches: &mut [SwitchSpec<'_>],
        sink: &mut dyn OutputSink,
    ) -> Result<ParseSummary, ParseError> {
        let entries = build_registration(switches, &self.options)?;

        let tokens = tokenizer.tokenize(&entries).map_err(|err| match err {
            TokenizeError::UnknownOption(token) => self.input(InputError::UnknownOption(token)),
        })?;
        drop(entries);

        let page_break =
            self.options.force_page_break || builtin_present(&tokens, &PAGE_BREAK_SWITCH);
        sink.set_page_break(page_break);

        if self.options.help && builtin_present(&tokens, &HELP_SWITCH) {
            debug!(program = %self.program, "help requested");
            sink.emit(&self.render_help(params, switches));
            return Err(ParseError::HelpShown);
        }

        let positional_count = tokens.positional_count();
        self.bind_parameters(&tokens, params)
            .and_then(|()| self.resolve_switches(&tokens, switches))
            .map_err(|err| err.with_positional_count(positional_count))?;

        Ok(ParseSummary {
            positional_count,
            page_break,
        })
    }

    fn bind_parameters(
        &self,
        tokens: &impl TokenSet,
        params: &mut [ParameterSpec<'_>],
    ) -> Result<(), ParseError> {
        let supplied = tokens.positional_count();
        if supplied > params.len() {
            return Err(self.input(InputError::TooManyParameters));
        }
        if supplied < self.mandatory_params {
            return Err(self.input(InputError::TooFewParameters));
        }

        for (index, param) in params.iter_mut().take(supplied).enumerate() {
            let Some(expected) = param.expected_destination() else {
                return Err(table_error(SchemaError::FlagParameter { index }));
            };
            let destination = param
                .destination
                .as_mut()
                .ok_or_else(|| table_error(SchemaError::UnboundParameter { index }))?;
            check_destination("parameter", index, expected, destination)?;

            let raw = tokens.positional(index).unwrap_or_default();
            let value = convert(raw, &param.value_type).map_err(|_| {
                self.input(InputError::InvalidParameter {
                    position: index + 1,
                    kind: parameter_label(&param.value_type),
                    raw: raw.to_string(),
                })
            })?;
            store(destination, value, "parameter", index)?;
        }

        Ok(())
    }

    fn resolve_switches(
        &self,
        tokens: &impl TokenSet,
        switches: &mut [SwitchSpec<'_>],
    ) -> Result<(), ParseError> {
        if let Some(spelling) = tokens.find_duplicate() {
            return Err(self.input(InputError::DuplicateSwitch(spelling.to_string())));
        }
        // Short and long spellings of one switch are also duplicates.
        for switch in switches.iter() {
            if let (Some(short), Some(long)) = (&switch.short, &switch.long) {
                if tokens.flag_present(short) && tokens.flag_present(long) {
                    return Err(self.input(InputError::DuplicateSwitch(short.clone())));
                }
            }
        }

        let mut present = vec![false; switches.len()];

        for (index, switch) in switches.iter_mut().enumerate() {
            let found = switch.spellings().find(|spelling| tokens.flag_present(spelling));
            let Some(spelling) = found.map(str::to_string) else {
                continue;
            };
            present[index] = true;

            let raw = tokens.value_for(&spelling);
            if raw.is_none() && switch.value_necessity == ValueNecessity::Mandatory {
                return Err(self.input(InputError::MissingValue(spelling)));
            }

            let Some(expected) = switch.expected_destination() else {
                return Err(table_error(SchemaError::UnboundSwitch { index }));
            };
            let destination = switch
                .destination
                .as_mut()
                .ok_or_else(|| table_error(SchemaError::UnboundSwitch { index }))?;
            check_destination("switch", index, expected, destination)?;

            let value = match (&switch.value_type, raw) {
                (ValueType::None, _) => match switch.flag_value {
                    Some(preset) => Value::UInt(preset),
                    None => Value::Bool(true),
                },
                (value_type, Some(raw)) => convert(raw, value_type).map_err(|_| {
                    self.input(InputError::InvalidSwitchValue {
                        switch: spelling.clone(),
                        kind: value_type.label(),
                        raw: raw.to_string(),
                    })
                })?,
                // Optional value omitted: presence only.
                (_, None) => continue,
            };
            debug!(switch = %spelling, ?value, "resolved switch");
            store(destination, value, "switch", index)?;
        }

        let missing = switches
            .iter()
            .zip(&present)
            .find(|(switch, present)| switch.necessity == Necessity::Mandatory && !**present);
        if let Some((switch, _)) = missing {
            return Err(self.input(InputError::MissingSwitch(
                switch.primary_spelling().to_string(),
            )));
        }

        Ok(())
    }

    fn input(&self, source: InputError) -> ParseError {
        debug!(program = %self.program, error = %source, "command line rejected");
        ParseError::Input {
            program: self.program.clone(),
            source,
            positional_count: None,
        }
    }
}

fn builtin_present(tokens: &impl TokenSet, builtin: &BuiltinSwitch) -> bool {
    tokens.flag_present(builtin.short) || tokens.flag_present(builtin.long)
}

/// Parameter messages say "not a valid string" rather than "string value".
fn parameter_label(value_type: &ValueType) -> &'static str {
    match value_type {
        ValueType::String { .. } => "string",
        other => other.label(),
    }
}

fn table_error(err: SchemaError) -> ParseError {
    error!(%err, "schema table error");
    ParseError::from(err)
}

fn check_destination(
    entry: &'static str,
    index: usize,
    expected: DestinationKind,
    destination: &Destination<'_>,
) -> Result<(), ParseError> {
    let found = destination.kind();
    if found != expected {
        return Err(table_error(SchemaError::DestinationMismatch {
            entry,
            index,
            expected,
            found,
        }));
    }
    Ok(())
}

fn store(
    destination: &mut Destination<'_>,
    value: Value,
    entry: &'static str,
    index: usize,
) -> Result<(), ParseError> {
    let found = destination.kind();
    let expected = value.kind();
    if destination.store(value) {
        Ok(())
    } else {
        Err(table_error(SchemaError::DestinationMismatch {
            entry,
            index,
            expected,
            found,
        }))
    }
}

#[cfg(test)]
mod tests {
    use crate::host::CapturedOutput;
    use crate::tokenizer::ShellTokenizer;
    use crate::{EnumMapping, ShellStatus};

    use super::*;

    fn colours() -> EnumMapping {
        EnumMapping::new()
            .with(0, "black")
            .with(1, "red")
            .with(2, "green")
    }

    #[test]
    fn test_parameters_bind_in_order() {
        let mut text = String::new();
        let mut hex = 0u64;
        let mut dec = 0u64;
        let mut params = [
            ParameterSpec::string(&mut text, 20),
            ParameterSpec::hexadecimal(&mut hex),
            ParameterSpec::decimal(&mut dec),
        ];

        let tokenizer = ShellTokenizer::new(["prog", "hello", "0x1f", "42"]);
        let summary = Parser::new("prog")
            .mandatory_params(1)
            .parse(&tokenizer, &mut params, &mut [], &mut CapturedOutput::default())
            .unwrap();

        assert_eq!(summary.positional_count, 3);
        drop(params);
        assert_eq!(text, "hello");
        assert_eq!(hex, 0x1f);
        assert_eq!(dec, 42);
    }

    #[test]
    fn test_optional_parameters_left_untouched() {
        let mut first = 0u64;
        let mut second = 99u64;
        let mut params = [
            ParameterSpec::decimal(&mut first),
            ParameterSpec::decimal(&mut second),
        ];

        let tokenizer = ShellTokenizer::new(["prog", "1"]);
        let summary = Parser::new("prog")
            .mandatory_params(1)
            .parse(&tokenizer, &mut params, &mut [], &mut CapturedOutput::default())
            .unwrap();

        assert_eq!(summary.positional_count, 1);
        drop(params);
        assert_eq!(first, 1);
        assert_eq!(second, 99);
    }

    #[test]
    fn test_too_many_parameters() {
        let mut value = 0u64;
        let mut params = [ParameterSpec::decimal(&mut value)];
        let tokenizer = ShellTokenizer::new(["prog", "1", "2"]);

        let err = Parser::new("prog")
            .parse(&tokenizer, &mut params, &mut [], &mut CapturedOutput::default())
            .unwrap_err();
        assert_eq!(err.input_error(), Some(&InputError::TooManyParameters));
        assert_eq!(err.to_string(), "prog: Too many parameters");
        assert_eq!(err.positional_count(), Some(2));
    }

    #[test]
    fn test_invalid_parameter_names_position_and_type() {
        let mut text = String::new();
        let mut hex = 0u64;
        let mut params = [
            ParameterSpec::string(&mut text, 20),
            ParameterSpec::hexadecimal(&mut hex),
        ];
        let tokenizer = ShellTokenizer::new(["prog", "abc", "0xzz"]);

        let err = Parser::new("prog")
            .parse(&tokenizer, &mut params, &mut [], &mut CapturedOutput::default())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "prog: Parameter 2 is not a valid hex value - '0xzz'"
        );
        drop(params);
        assert_eq!(hex, 0);
    }

    #[test]
    fn test_unbound_parameter_is_schema_error() {
        let mut params = [ParameterSpec::new(ValueType::Decimal)];
        let tokenizer = ShellTokenizer::new(["prog", "1"]);

        let err = Parser::new("prog")
            .parse(&tokenizer, &mut params, &mut [], &mut CapturedOutput::default())
            .unwrap_err();
        assert_eq!(
            err.schema_error(),
            Some(&SchemaError::UnboundParameter { index: 0 })
        );
        assert_eq!(err.positional_count(), Some(1));
        assert_eq!(err.status(), ShellStatus::InvalidParameter);
    }

    #[test]
    fn test_mismatched_destination_is_schema_error() {
        let mut flag = false;
        let mut params =
            [ParameterSpec::new(ValueType::Decimal).bind(Destination::Bool(&mut flag))];
        let tokenizer = ShellTokenizer::new(["prog", "1"]);

        let err = Parser::new("prog")
            .parse(&tokenizer, &mut params, &mut [], &mut CapturedOutput::default())
            .unwrap_err();
        assert_eq!(
            err.schema_error(),
            Some(&SchemaError::DestinationMismatch {
                entry: "parameter",
                index: 0,
                expected: DestinationKind::UInt,
                found: DestinationKind::Bool,
            })
        );
    }

    #[test]
    fn test_flag_value_switch_writes_preset() {
        let mut preset = 0u64;
        let mut switches = [SwitchSpec::flag_value(None, Some("-flag2"), &mut preset, 12345678)];
        let tokenizer = ShellTokenizer::new(["prog", "-flag2"]);

        Parser::new("prog")
            .parse(&tokenizer, &mut [], &mut switches, &mut CapturedOutput::default())
            .unwrap();
        drop(switches);
        assert_eq!(preset, 12345678);
    }

    #[test]
    fn test_switch_values_convert_by_type() {
        let mut colour = 0u32;
        let mut int = 0u64;
        let mut text = String::from("not initialised");
        let mut switches = [
            SwitchSpec::enumeration(Some("-c"), Some("-colour"), &mut colour, colours()),
            SwitchSpec::integer(Some("-i"), None, &mut int),
            SwitchSpec::string(Some("-s"), Some("-string"), &mut text, 6),
        ];
        let tokenizer =
            ShellTokenizer::new(["prog", "-colour", "GREEN", "-i", "0x20", "-s", "truncated"]);

        Parser::new("prog")
            .parse(&tokenizer, &mut [], &mut switches, &mut CapturedOutput::default())
            .unwrap();
        drop(switches);
        assert_eq!(colour, 2);
        assert_eq!(int, 32);
        assert_eq!(text, "trunc");
    }

    #[test]
    fn test_invalid_switch_value_message() {
        let mut colour = 0u32;
        let mut switches =
            [SwitchSpec::enumeration(Some("-c"), Some("-colour"), &mut colour, colours())];
        let tokenizer = ShellTokenizer::new(["prog", "-c", "purple"]);

        let err = Parser::new("prog")
            .parse(&tokenizer, &mut [], &mut switches, &mut CapturedOutput::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "prog: Switch '-c' has invalid option - 'purple'");
    }

    #[test]
    fn test_switch_requires_value() {
        let mut dec = 0u64;
        let mut switches = [SwitchSpec::decimal(Some("-d"), Some("-dec"), &mut dec)];
        let tokenizer = ShellTokenizer::new(["prog", "-dec"]);

        let err = Parser::new("prog")
            .parse(&tokenizer, &mut [], &mut switches, &mut CapturedOutput::default())
            .unwrap_err();
        assert_eq!(
            err.input_error(),
            Some(&InputError::MissingValue("-dec".to_string()))
        );
    }

    #[test]
    fn test_optional_value_switch_without_value() {
        let mut level = 7u64;
        let mut switches = [SwitchSpec::decimal(Some("-l"), None, &mut level).value_optional()];
        let tokenizer = ShellTokenizer::new(["prog", "-l"]);

        Parser::new("prog")
            .parse(&tokenizer, &mut [], &mut switches, &mut CapturedOutput::default())
            .unwrap();
        drop(switches);
        assert_eq!(level, 7);
    }

    #[test]
    fn test_same_spelling_twice_is_duplicate() {
        let mut dec = 0u64;
        let mut switches = [SwitchSpec::decimal(Some("-d"), None, &mut dec)];
        let tokenizer = ShellTokenizer::new(["prog", "-d", "1", "-d", "2"]);

        let err = Parser::new("prog")
            .parse(&tokenizer, &mut [], &mut switches, &mut CapturedOutput::default())
            .unwrap_err();
        assert_eq!(
            err.input_error(),
            Some(&InputError::DuplicateSwitch("-d".to_string()))
        );
    }

    #[test]
    fn test_both_spellings_of_one_switch_is_duplicate() {
        let mut flag = false;
        let mut switches = [SwitchSpec::flag(Some("-f"), Some("-flag"), &mut flag)];
        let tokenizer = ShellTokenizer::new(["prog", "-flag", "-f"]);

        let err = Parser::new("prog")
            .parse(&tokenizer, &mut [], &mut switches, &mut CapturedOutput::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "prog: Duplicate switch - '-f'");
        drop(switches);
        assert!(!flag);
    }

    #[test]
    fn test_missing_mandatory_switch_named_by_primary_spelling() {
        let mut dec = 0u64;
        let mut switches = [SwitchSpec::decimal(Some("-d"), Some("-dec"), &mut dec).mandatory()];
        let tokenizer = ShellTokenizer::new(["prog"]);

        let err = Parser::new("prog")
            .parse(&tokenizer, &mut [], &mut switches, &mut CapturedOutput::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "prog: Missing switch - '-d'");
    }

    #[test]
    fn test_switch_errors_still_report_positional_count() {
        let mut value = 0u64;
        let mut dec = 0u64;
        let mut params = [ParameterSpec::decimal(&mut value)];
        let mut switches = [SwitchSpec::decimal(Some("-d"), None, &mut dec).mandatory()];
        let tokenizer = ShellTokenizer::new(["prog", "5"]);

        let err = Parser::new("prog")
            .mandatory_params(1)
            .parse(&tokenizer, &mut params, &mut switches, &mut CapturedOutput::default())
            .unwrap_err();
        assert_eq!(
            err.input_error(),
            Some(&InputError::MissingSwitch("-d".to_string()))
        );
        assert_eq!(err.positional_count(), Some(1));
        drop(params);
        assert_eq!(value, 5);
    }

    #[test]
    fn test_unknown_option_has_no_positional_count() {
        let tokenizer = ShellTokenizer::new(["prog", "5", "-nope"]);
        let err = Parser::new("prog")
            .parse(&tokenizer, &mut [], &mut [], &mut CapturedOutput::default())
            .unwrap_err();
        assert_eq!(err.positional_count(), None);
    }

    #[test]
    fn test_page_break_applied_before_errors() {
        let tokenizer = ShellTokenizer::new(["prog", "-b", "extra"]);
        let mut out = CapturedOutput::default();

        let err = Parser::new("prog")
            .parse(&tokenizer, &mut [], &mut [], &mut out)
            .unwrap_err();
        assert_eq!(err.input_error(), Some(&InputError::TooManyParameters));
        assert_eq!(out.page_break, Some(true));
    }

    #[test]
    fn test_forced_page_break() {
        let tokenizer = ShellTokenizer::new(["prog"]);
        let mut out = CapturedOutput::default();

        let summary = Parser::new("prog")
            .options(ParseOptions::default().force_page_break())
            .parse(&tokenizer, &mut [], &mut [], &mut out)
            .unwrap();
        assert!(summary.page_break);
        assert_eq!(out.page_break, Some(true));
    }

    #[test]
    fn test_help_disabled_makes_help_unknown() {
        let tokenizer = ShellTokenizer::new(["prog", "-h"]);
        let mut out = CapturedOutput::default();

        let err = Parser::new("prog")
            .options(ParseOptions::default().without_help())
            .parse(&tokenizer, &mut [], &mut [], &mut out)
            .unwrap_err();
        assert_eq!(
            err.input_error(),
            Some(&InputError::UnknownOption("-h".to_string()))
        );
        assert!(out.text.is_empty());
    }
}
