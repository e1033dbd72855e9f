//! Schema type definitions for parameters, switches and their destinations.
//!
//! A command line is described by two tables: an ordered slice of
//! [`ParameterSpec`] (positional order) and a set of [`SwitchSpec`]. Every
//! entry owns a [`ValueType`] describing how its raw token is converted and a
//! [`Destination`] borrowing the caller's storage for the duration of one
//! parse call.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default upper bound on declared switches (built-ins not included).
///
/// The engine refuses larger tables with an out-of-resources outcome; see
/// [`ParseOptions::switch_capacity`](crate::ParseOptions::switch_capacity).
pub const MAX_SWITCH_ENTRIES: usize = 30;

/// One `(code, name)` pair of an [`EnumMapping`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumEntry {
    /// Integer code written to the destination.
    pub code: u32,
    /// Name accepted on the command line.
    pub name: String,
}

/// Closed set of names, each bound to an integer code.
///
/// Names are matched ASCII-case-insensitively and the first matching entry
/// wins, so a table with duplicate names silently shadows the later ones.
///
/// # Examples
///
/// ```
/// use shell_args_core::EnumMapping;
///
/// let colours = EnumMapping::new()
///     .with(0, "black")
///     .with(1, "red");
/// assert_eq!(colours.lookup("RED"), Some(1));
/// assert_eq!(colours.lookup("green"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnumMapping {
    entries: Vec<EnumEntry>,
}

impl EnumMapping {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a `(code, name)` pair.
    pub fn with(mut self, code: u32, name: &str) -> Self {
        self.entries.push(EnumEntry {
            code,
            name: name.to_string(),
        });
        self
    }

    /// Returns the code of the first entry whose name matches `name`,
    /// ignoring ASCII case.
    pub fn lookup(&self, name: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
            .map(|entry| entry.code)
    }

    /// Iterates over the names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[EnumEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<EnumEntry> for EnumMapping {
    fn from_iter<I: IntoIterator<Item = EnumEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Declared type of a parameter or switch value, with its type data.
///
/// # Examples
///
/// ```
/// use shell_args_core::{DestinationKind, ValueType};
///
/// assert_eq!(ValueType::Hexadecimal.destination_kind(), Some(DestinationKind::UInt));
/// assert_eq!(ValueType::None.destination_kind(), None);
/// assert!(!ValueType::None.takes_value());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ValueType {
    /// No value: the entry is a flag.
    #[default]
    None,
    /// Text copied into the destination, bounded by `capacity`.
    ///
    /// The capacity counts a terminator slot, so at most `capacity - 1`
    /// characters are kept.
    String { capacity: usize },
    /// Unsigned decimal number.
    Decimal,
    /// Hexadecimal number with an optional `0x` prefix.
    Hexadecimal,
    /// Decimal number, or hexadecimal when `0x`-prefixed.
    Integer,
    /// One of the names in the mapping.
    Enum(EnumMapping),
}

impl ValueType {
    /// Returns `true` if tokens of this type carry a value.
    pub fn takes_value(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Destination variant that can hold a converted value of this type.
    pub fn destination_kind(&self) -> Option<DestinationKind> {
        match self {
            Self::None => None,
            Self::String { .. } => Some(DestinationKind::Text),
            Self::Decimal | Self::Hexadecimal | Self::Integer => Some(DestinationKind::UInt),
            Self::Enum(_) => Some(DestinationKind::EnumCode),
        }
    }

    /// Noun used in user-facing messages ("decimal value", "option").
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "flag",
            Self::String { .. } => "string value",
            Self::Decimal => "decimal value",
            Self::Hexadecimal => "hex value",
            Self::Integer => "integer value",
            Self::Enum(_) => "option",
        }
    }
}

/// Whether omitting a switch is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Necessity {
    #[default]
    Optional,
    Mandatory,
}

/// Whether a switch must, may, or must not carry a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueNecessity {
    #[default]
    None,
    Optional,
    Mandatory,
}

/// Owned typed value.
///
/// Produced by [`convert`](crate::convert) and also usable as a storage slot:
/// `Destination::from(&mut value)` borrows the slot as a write target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    UInt(u64),
    Text(String),
    EnumCode(u32),
}

impl Value {
    /// Variant tag of this value.
    pub fn kind(&self) -> DestinationKind {
        match self {
            Self::Bool(_) => DestinationKind::Bool,
            Self::UInt(_) => DestinationKind::UInt,
            Self::Text(_) => DestinationKind::Text,
            Self::EnumCode(_) => DestinationKind::EnumCode,
        }
    }

    /// Zero value for a destination kind.
    pub fn empty(kind: DestinationKind) -> Self {
        match kind {
            DestinationKind::Bool => Self::Bool(false),
            DestinationKind::UInt => Self::UInt(0),
            DestinationKind::Text => Self::Text(String::new()),
            DestinationKind::EnumCode => Self::EnumCode(0),
        }
    }
}

/// Variant tag shared by [`Value`] and [`Destination`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationKind {
    Bool,
    UInt,
    Text,
    EnumCode,
}

impl fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::UInt => "unsigned integer",
            Self::Text => "text",
            Self::EnumCode => "enum code",
        };
        f.write_str(name)
    }
}

/// Caller-owned write target, borrowed for one parse call.
///
/// # Examples
///
/// ```
/// use shell_args_core::{Destination, DestinationKind, Value};
///
/// let mut count = 0u64;
/// let mut dest = Destination::UInt(&mut count);
/// assert_eq!(dest.kind(), DestinationKind::UInt);
/// assert!(dest.store(Value::UInt(7)));
/// assert!(!dest.store(Value::Bool(true)));
/// drop(dest);
/// assert_eq!(count, 7);
/// ```
#[derive(Debug)]
pub enum Destination<'a> {
    Bool(&'a mut bool),
    UInt(&'a mut u64),
    Text(&'a mut String),
    EnumCode(&'a mut u32),
}

impl Destination<'_> {
    pub fn kind(&self) -> DestinationKind {
        match self {
            Self::Bool(_) => DestinationKind::Bool,
            Self::UInt(_) => DestinationKind::UInt,
            Self::Text(_) => DestinationKind::Text,
            Self::EnumCode(_) => DestinationKind::EnumCode,
        }
    }

    /// Writes `value` if its variant matches; returns `false` and leaves the
    /// target untouched otherwise.
    pub fn store(&mut self, value: Value) -> bool {
        match (self, value) {
            (Self::Bool(target), Value::Bool(v)) => **target = v,
            (Self::UInt(target), Value::UInt(v)) => **target = v,
            (Self::Text(target), Value::Text(v)) => **target = v,
            (Self::EnumCode(target), Value::EnumCode(v)) => **target = v,
            _ => return false,
        }
        true
    }
}

impl<'a> From<&'a mut Value> for Destination<'a> {
    fn from(slot: &'a mut Value) -> Self {
        match slot {
            Value::Bool(v) => Self::Bool(v),
            Value::UInt(v) => Self::UInt(v),
            Value::Text(v) => Self::Text(v),
            Value::EnumCode(v) => Self::EnumCode(v),
        }
    }
}

/// Schema for a positional parameter.
///
/// Typed constructors pair the value type with a matching destination.
/// [`ParameterSpec::new`] leaves the destination unbound so it can be
/// attached later with [`bind`](Self::bind).
///
/// # Examples
///
/// ```
/// use shell_args_core::{ParameterSpec, ValueType};
///
/// let mut address = 0u64;
/// let param = ParameterSpec::hexadecimal(&mut address).with_help("[addr]start address");
/// assert_eq!(param.value_type, ValueType::Hexadecimal);
/// assert!(param.destination.is_some());
/// ```
#[derive(Debug)]
pub struct ParameterSpec<'a> {
    pub value_type: ValueType,
    pub destination: Option<Destination<'a>>,
    /// Help string; a leading `[name]` sets the displayed argument name.
    pub help: String,
}

impl<'a> ParameterSpec<'a> {
    /// Creates an unbound parameter.
    pub fn new(value_type: ValueType) -> Self {
        Self {
            value_type,
            destination: None,
            help: String::new(),
        }
    }

    pub fn string(target: &'a mut String, capacity: usize) -> Self {
        Self::new(ValueType::String { capacity }).bind(Destination::Text(target))
    }

    pub fn decimal(target: &'a mut u64) -> Self {
        Self::new(ValueType::Decimal).bind(Destination::UInt(target))
    }

    pub fn hexadecimal(target: &'a mut u64) -> Self {
        Self::new(ValueType::Hexadecimal).bind(Destination::UInt(target))
    }

    pub fn integer(target: &'a mut u64) -> Self {
        Self::new(ValueType::Integer).bind(Destination::UInt(target))
    }

    pub fn enumeration(target: &'a mut u32, mapping: EnumMapping) -> Self {
        Self::new(ValueType::Enum(mapping)).bind(Destination::EnumCode(target))
    }

    /// Attaches a destination.
    pub fn bind(mut self, destination: Destination<'a>) -> Self {
        self.destination = Some(destination);
        self
    }

    pub fn with_help(mut self, help: &str) -> Self {
        self.help = help.to_string();
        self
    }

    /// Destination variant this parameter writes to.
    pub fn expected_destination(&self) -> Option<DestinationKind> {
        self.value_type.destination_kind()
    }
}

/// Schema for a switch with up to two interchangeable spellings.
///
/// Constructors mirror the common shapes: [`flag`](Self::flag) sets a
/// boolean, [`flag_value`](Self::flag_value) writes a preset number, and the
/// typed constructors take a mandatory value.
///
/// # Examples
///
/// ```
/// use shell_args_core::{Necessity, SwitchSpec};
///
/// let mut level = 0u64;
/// let switch = SwitchSpec::decimal(Some("-l"), Some("-level"), &mut level)
///     .mandatory()
///     .with_help("[n]verbosity level");
/// assert_eq!(switch.necessity, Necessity::Mandatory);
/// assert_eq!(switch.primary_spelling(), "-l");
/// assert!(switch.matches("-LEVEL"));
/// ```
#[derive(Debug)]
pub struct SwitchSpec<'a> {
    /// Short spelling (e.g. "-f")
    pub short: Option<String>,
    /// Long spelling (e.g. "-flag")
    pub long: Option<String>,
    pub necessity: Necessity,
    pub value_type: ValueType,
    pub value_necessity: ValueNecessity,
    /// Number written to a `UInt` destination when a flag is present
    pub flag_value: Option<u64>,
    pub destination: Option<Destination<'a>>,
    pub help: String,
}

impl<'a> SwitchSpec<'a> {
    /// Creates an unbound optional switch.
    ///
    /// The value necessity follows the type: flags take no value, every
    /// other type requires one.
    pub fn new(short: Option<&str>, long: Option<&str>, value_type: ValueType) -> Self {
        let value_necessity = if value_type.takes_value() {
            ValueNecessity::Mandatory
        } else {
            ValueNecessity::None
        };
        Self {
            short: short.map(String::from),
            long: long.map(String::from),
            necessity: Necessity::Optional,
            value_type,
            value_necessity,
            flag_value: None,
            destination: None,
            help: String::new(),
        }
    }

    /// Flag that sets `target` to `true` when present.
    pub fn flag(short: Option<&str>, long: Option<&str>, target: &'a mut bool) -> Self {
        Self::new(short, long, ValueType::None).bind(Destination::Bool(target))
    }

    /// Flag that writes `value` to `target` when present.
    pub fn flag_value(
        short: Option<&str>,
        long: Option<&str>,
        target: &'a mut u64,
        value: u64,
    ) -> Self {
        let mut switch = Self::new(short, long, ValueType::None).bind(Destination::UInt(target));
        switch.flag_value = Some(value);
        switch
    }

    pub fn string(
        short: Option<&str>,
        long: Option<&str>,
        target: &'a mut String,
        capacity: usize,
    ) -> Self {
        Self::new(short, long, ValueType::String { capacity }).bind(Destination::Text(target))
    }

    pub fn decimal(short: Option<&str>, long: Option<&str>, target: &'a mut u64) -> Self {
        Self::new(short, long, ValueType::Decimal).bind(Destination::UInt(target))
    }

    pub fn hexadecimal(short: Option<&str>, long: Option<&str>, target: &'a mut u64) -> Self {
        Self::new(short, long, ValueType::Hexadecimal).bind(Destination::UInt(target))
    }

    pub fn integer(short: Option<&str>, long: Option<&str>, target: &'a mut u64) -> Self {
        Self::new(short, long, ValueType::Integer).bind(Destination::UInt(target))
    }

    pub fn enumeration(
        short: Option<&str>,
        long: Option<&str>,
        target: &'a mut u32,
        mapping: EnumMapping,
    ) -> Self {
        Self::new(short, long, ValueType::Enum(mapping)).bind(Destination::EnumCode(target))
    }

    /// Attaches a destination.
    pub fn bind(mut self, destination: Destination<'a>) -> Self {
        self.destination = Some(destination);
        self
    }

    /// Marks the switch as required on every command line.
    pub fn mandatory(mut self) -> Self {
        self.necessity = Necessity::Mandatory;
        self
    }

    /// Lets a value-bearing switch appear without its value.
    pub fn value_optional(mut self) -> Self {
        if self.value_type.takes_value() {
            self.value_necessity = ValueNecessity::Optional;
        }
        self
    }

    pub fn with_help(mut self, help: &str) -> Self {
        self.help = help.to_string();
        self
    }

    /// Returns the spelling used in messages (short preferred, falls back
    /// to long).
    pub fn primary_spelling(&self) -> &str {
        self.short
            .as_deref()
            .or(self.long.as_deref())
            .unwrap_or("?")
    }

    /// Iterates over the declared spellings, short first.
    pub fn spellings(&self) -> impl Iterator<Item = &str> {
        self.short.as_deref().into_iter().chain(self.long.as_deref())
    }

    /// Checks if either spelling matches `s`, ignoring ASCII case.
    pub fn matches(&self, s: &str) -> bool {
        self.spellings().any(|spelling| spelling.eq_ignore_ascii_case(s))
    }

    pub fn takes_value(&self) -> bool {
        self.value_type.takes_value()
    }

    /// Destination variant this switch writes to.
    pub fn expected_destination(&self) -> Option<DestinationKind> {
        match (&self.value_type, self.flag_value) {
            (ValueType::None, None) => Some(DestinationKind::Bool),
            (ValueType::None, Some(_)) => Some(DestinationKind::UInt),
            (value_type, _) => value_type.destination_kind(),
        }
    }
}
