//! Error types for schema defects, user input and parse outcomes.
//!
//! Three families are kept apart so a host can tell "fix the schema" from
//! "bad command line" from "system degraded":
//!
//! - [`SchemaError`]: the parameter or switch tables are wrong.
//! - [`InputError`]: the command line does not satisfy the tables.
//! - [`ParseError::Resources`]: internal tables could not be allocated.

use std::collections::TryReserveError;

use thiserror::Error;

use crate::DestinationKind;

/// Defects in the parameter or switch tables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A parameter has no destination.
    #[error("parameter {index}: no destination bound")]
    UnboundParameter { index: usize },
    /// A switch has no destination.
    #[error("switch {index}: no destination bound")]
    UnboundSwitch { index: usize },
    /// A parameter is declared as a flag.
    #[error("parameter {index}: parameters must carry a value type")]
    FlagParameter { index: usize },
    /// Destination variant does not match the declared value type.
    #[error("{entry} {index}: destination holds {found}, value type needs {expected}")]
    DestinationMismatch {
        entry: &'static str,
        index: usize,
        expected: DestinationKind,
        found: DestinationKind,
    },
    /// More switches declared than the table can hold.
    #[error("switch table holds {declared} entries, capacity is {capacity}")]
    CapacityExceeded { declared: usize, capacity: usize },
    /// A switch has neither a short nor a long spelling.
    #[error("switch {index}: must define a short or long spelling")]
    MissingSpelling { index: usize },
    /// Spelling lacks a leading `-`, has nothing after it, or reads as a number.
    #[error("invalid switch spelling: {0}")]
    InvalidSpelling(String),
    /// Two switches share a spelling.
    #[error("duplicate switch spelling: {0}")]
    DuplicateSpelling(String),
    /// A switch reuses a built-in spelling.
    #[error("switch spelling is reserved: {0}")]
    ReservedSpelling(String),
    /// More mandatory parameters than declared parameters.
    #[error("{mandatory} mandatory parameters declared but only {declared} parameters exist")]
    MandatoryCountExceedsParameters { mandatory: usize, declared: usize },
    /// An enum type has no names.
    #[error("{entry} {index}: enum mapping is empty")]
    EmptyEnumMapping { entry: &'static str, index: usize },
    /// A string type cannot hold any character.
    #[error("{entry} {index}: string capacity must be at least 1")]
    ZeroCapacity { entry: &'static str, index: usize },
}

/// Problems with the supplied command line.
///
/// `Display` produces the user-facing message; [`ParseError`] prefixes it
/// with the program name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Unknown option - '{0}'")]
    UnknownOption(String),
    #[error("Too many parameters")]
    TooManyParameters,
    #[error("Too few parameters")]
    TooFewParameters,
    /// `position` is 1-based.
    #[error("Parameter {position} is not a valid {kind} - '{raw}'")]
    InvalidParameter {
        position: usize,
        kind: &'static str,
        raw: String,
    },
    #[error("Duplicate switch - '{0}'")]
    DuplicateSwitch(String),
    #[error("Switch '{0}' requires a value")]
    MissingValue(String),
    #[error("Switch '{switch}' has invalid {kind} - '{raw}'")]
    InvalidSwitchValue {
        switch: String,
        kind: &'static str,
        raw: String,
    },
    #[error("Missing switch - '{0}'")]
    MissingSwitch(String),
}

/// Terminal outcome of a parse call other than success.
///
/// Once the command line has been tokenized, input and schema errors carry
/// the number of positional arguments supplied, whatever went wrong
/// afterwards.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The command line was rejected.
    #[error("{program}: {source}")]
    Input {
        program: String,
        #[source]
        source: InputError,
        positional_count: Option<usize>,
    },
    /// The tables are defective.
    #[error("schema error: {source}")]
    Schema {
        #[source]
        source: SchemaError,
        positional_count: Option<usize>,
    },
    /// Internal working storage could not be allocated.
    #[error("out of resources: {0}")]
    Resources(#[from] TryReserveError),
    /// Help was requested and written to the output sink.
    #[error("help displayed")]
    HelpShown,
}

impl From<SchemaError> for ParseError {
    fn from(source: SchemaError) -> Self {
        Self::Schema {
            source,
            positional_count: None,
        }
    }
}

impl ParseError {
    /// Shell status a host should exit with.
    ///
    /// # Examples
    ///
    /// ```
    /// use shell_args_core::{ParseError, SchemaError, ShellStatus};
    ///
    /// let err = ParseError::from(SchemaError::CapacityExceeded { declared: 31, capacity: 30 });
    /// assert_eq!(err.status(), ShellStatus::OutOfResources);
    /// assert_eq!(ParseError::HelpShown.status(), ShellStatus::Aborted);
    /// ```
    pub fn status(&self) -> ShellStatus {
        match self {
            Self::Input { .. } => ShellStatus::InvalidParameter,
            Self::Schema {
                source: SchemaError::CapacityExceeded { .. },
                ..
            } => ShellStatus::OutOfResources,
            Self::Schema { .. } => ShellStatus::InvalidParameter,
            Self::Resources(_) => ShellStatus::OutOfResources,
            Self::HelpShown => ShellStatus::Aborted,
        }
    }

    /// The input error, if the command line was at fault.
    pub fn input_error(&self) -> Option<&InputError> {
        match self {
            Self::Input { source, .. } => Some(source),
            _ => None,
        }
    }

    /// The schema defect, if the tables were at fault.
    pub fn schema_error(&self) -> Option<&SchemaError> {
        match self {
            Self::Schema { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Positional arguments supplied, program name excluded.
    ///
    /// `None` when the call failed before the command line was tokenized,
    /// or ended in help.
    pub fn positional_count(&self) -> Option<usize> {
        match self {
            Self::Input {
                positional_count, ..
            }
            | Self::Schema {
                positional_count, ..
            } => *positional_count,
            Self::Resources(_) | Self::HelpShown => None,
        }
    }

    /// Records the positional count on input and schema errors.
    pub(crate) fn with_positional_count(mut self, count: usize) -> Self {
        if let Self::Input {
            positional_count, ..
        }
        | Self::Schema {
            positional_count, ..
        } = &mut self
        {
            *positional_count = Some(count);
        }
        self
    }
}

/// Outcome reported to the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellStatus {
    Success,
    InvalidParameter,
    OutOfResources,
    Aborted,
}

impl ShellStatus {
    /// Process exit code, using the UEFI shell status numbering.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::InvalidParameter => 2,
            Self::OutOfResources => 9,
            Self::Aborted => 21,
        }
    }
}

impl<T> From<&Result<T, ParseError>> for ShellStatus {
    fn from(result: &Result<T, ParseError>) -> Self {
        match result {
            Ok(_) => Self::Success,
            Err(err) => err.status(),
        }
    }
}
