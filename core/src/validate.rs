//! Schema table validation.
//!
//! The parse engine only reports table defects it trips over while parsing
//! a particular command line. [`validate_schema`] checks the whole table up
//! front so a defect shows up on the first run rather than the first time a
//! user supplies the offending switch.
//!
//! # Examples
//!
//! ```
//! use shell_args_core::*;
//!
//! let mut count = 0u64;
//! let mut verbose = false;
//! let params = [ParameterSpec::decimal(&mut count)];
//! let switches = [SwitchSpec::flag(Some("-v"), Some("-verbose"), &mut verbose)];
//! assert!(validate_schema(&params, &switches, 1, &ParseOptions::default()).is_empty());
//!
//! // Invalid: spelling without a leading dash
//! let mut quiet = false;
//! let bad = [SwitchSpec::flag(Some("q"), None, &mut quiet)];
//! assert_eq!(
//!     validate_schema(&[], &bad, 0, &ParseOptions::default()),
//!     vec![SchemaError::InvalidSpelling("q".to_string())]
//! );
//! ```

use std::collections::HashSet;

use crate::convert::is_number;
use crate::error::SchemaError;
use crate::schema::ParseOptions;
use crate::{Destination, DestinationKind, ParameterSpec, SwitchSpec, ValueType};

/// Validates parameter and switch tables.
///
/// Stops at the first defect, so the returned vector holds at most one
/// error.
pub fn validate_schema(
    params: &[ParameterSpec<'_>],
    switches: &[SwitchSpec<'_>],
    mandatory_params: usize,
    options: &ParseOptions,
) -> Vec<SchemaError> {
    let mut errors = Vec::new();

    if mandatory_params > params.len() {
        errors.push(SchemaError::MandatoryCountExceedsParameters {
            mandatory: mandatory_params,
            declared: params.len(),
        });
        return errors;
    }

    errors.extend(validate_parameters(params));
    if !errors.is_empty() {
        return errors;
    }

    errors.extend(validate_switches(switches, options));
    errors
}

fn validate_parameters(params: &[ParameterSpec<'_>]) -> Vec<SchemaError> {
    let mut errors = Vec::new();

    for (index, param) in params.iter().enumerate() {
        let Some(expected) = param.expected_destination() else {
            errors.push(SchemaError::FlagParameter { index });
            return errors;
        };
        if let Some(err) = check_entry(
            "parameter",
            index,
            &param.value_type,
            expected,
            param.destination.as_ref(),
        ) {
            errors.push(err);
            return errors;
        }
    }

    errors
}

fn validate_switches(switches: &[SwitchSpec<'_>], options: &ParseOptions) -> Vec<SchemaError> {
    let mut errors = Vec::new();

    if switches.len() > options.switch_capacity {
        errors.push(SchemaError::CapacityExceeded {
            declared: switches.len(),
            capacity: options.switch_capacity,
        });
        return errors;
    }

    let mut seen = HashSet::new();
    for (index, switch) in switches.iter().enumerate() {
        if switch.short.is_none() && switch.long.is_none() {
            errors.push(SchemaError::MissingSpelling { index });
            return errors;
        }

        for spelling in switch.spellings() {
            // A numeric body ("-1", "-0x10") tokenizes as a value, never a switch.
            let body = spelling.strip_prefix('-').unwrap_or_default();
            if body.is_empty() || is_number(body) {
                errors.push(SchemaError::InvalidSpelling(spelling.to_string()));
                return errors;
            }
            if options.builtins().any(|builtin| builtin.matches(spelling)) {
                errors.push(SchemaError::ReservedSpelling(spelling.to_string()));
                return errors;
            }
            if !seen.insert(spelling.to_ascii_lowercase()) {
                errors.push(SchemaError::DuplicateSpelling(spelling.to_string()));
                return errors;
            }
        }

        let Some(expected) = switch.expected_destination() else {
            errors.push(SchemaError::UnboundSwitch { index });
            return errors;
        };
        if let Some(err) = check_entry(
            "switch",
            index,
            &switch.value_type,
            expected,
            switch.destination.as_ref(),
        ) {
            errors.push(err);
            return errors;
        }
    }

    errors
}

fn check_entry(
    entry: &'static str,
    index: usize,
    value_type: &ValueType,
    expected: DestinationKind,
    destination: Option<&Destination<'_>>,
) -> Option<SchemaError> {
    match value_type {
        ValueType::String { capacity: 0 } => {
            return Some(SchemaError::ZeroCapacity { entry, index });
        }
        ValueType::Enum(mapping) if mapping.is_empty() => {
            return Some(SchemaError::EmptyEnumMapping { entry, index });
        }
        _ => {}
    }

    let Some(destination) = destination else {
        return Some(match entry {
            "parameter" => SchemaError::UnboundParameter { index },
            _ => SchemaError::UnboundSwitch { index },
        });
    };

    let found = destination.kind();
    (found != expected).then_some(SchemaError::DestinationMismatch {
        entry,
        index,
        expected,
        found,
    })
}
