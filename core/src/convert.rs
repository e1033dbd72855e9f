//! Raw token to typed value conversion.
//!
//! Conversion is pure: it either produces a [`Value`] or a
//! [`ConversionError`], and the caller writes the destination only on
//! success.
//!
//! Numeric tokens may carry leading spaces or tabs and nothing after the
//! digits. A bare numeral is always decimal under [`ValueType::Integer`];
//! hexadecimal needs a `0x` prefix there.
//!
//! # Examples
//!
//! ```
//! use shell_args_core::{convert, Value, ValueType};
//!
//! assert_eq!(convert("10", &ValueType::Integer), Ok(Value::UInt(10)));
//! assert_eq!(convert("0x10", &ValueType::Integer), Ok(Value::UInt(16)));
//! assert!(convert("-1", &ValueType::Decimal).is_err());
//! ```

use thiserror::Error;

use crate::{Value, ValueType};

/// Reasons a raw token was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The token does not have the shape the type requires.
    #[error("'{raw}' is not a valid {expected} value")]
    Malformed { expected: &'static str, raw: String },
    /// The digits are well formed but exceed 64 bits.
    #[error("'{raw}' is out of range for a {expected} value")]
    Overflow { expected: &'static str, raw: String },
    /// No enum name matches the token.
    #[error("'{0}' is not a valid option")]
    UnknownName(String),
    /// Flags carry no value to convert.
    #[error("flags take no value")]
    NoValueType,
}

/// Converts `raw` according to `value_type`.
pub fn convert(raw: &str, value_type: &ValueType) -> Result<Value, ConversionError> {
    match value_type {
        ValueType::None => Err(ConversionError::NoValueType),
        ValueType::String { capacity } => Ok(Value::Text(bounded_copy(raw, *capacity))),
        ValueType::Decimal => parse_decimal(raw).map(Value::UInt),
        ValueType::Hexadecimal => parse_hexadecimal(raw).map(Value::UInt),
        ValueType::Integer => parse_integer(raw).map(Value::UInt),
        ValueType::Enum(mapping) => mapping
            .lookup(raw)
            .map(Value::EnumCode)
            .ok_or_else(|| ConversionError::UnknownName(raw.to_string())),
    }
}

/// Copies at most `capacity - 1` characters of `raw`.
///
/// # Examples
///
/// ```
/// use shell_args_core::convert::bounded_copy;
///
/// assert_eq!(bounded_copy("default string", 8), "default");
/// assert_eq!(bounded_copy("abc", 0), "");
/// ```
pub fn bounded_copy(raw: &str, capacity: usize) -> String {
    raw.chars().take(capacity.saturating_sub(1)).collect()
}

/// Parses leading blanks followed by one or more decimal digits.
pub fn parse_decimal(raw: &str) -> Result<u64, ConversionError> {
    let digits = decimal_digits(raw).ok_or_else(|| malformed("decimal", raw))?;
    digits.parse().map_err(|_| overflow("decimal", raw))
}

/// Parses hex digits with an optional `0x` / `0X` prefix.
///
/// The prefix is only recognised after at least one `0`; a bare `x` is
/// malformed.
pub fn parse_hexadecimal(raw: &str) -> Result<u64, ConversionError> {
    let digits = hex_digits(raw).ok_or_else(|| malformed("hex", raw))?;
    u64::from_str_radix(digits, 16).map_err(|_| overflow("hex", raw))
}

/// Parses a decimal numeral, or a hexadecimal one when it carries a `0x`
/// prefix.
pub fn parse_integer(raw: &str) -> Result<u64, ConversionError> {
    if let Some(digits) = decimal_digits(raw) {
        return digits.parse().map_err(|_| overflow("integer", raw));
    }
    if !has_hex_prefix(raw) {
        return Err(malformed("integer", raw));
    }
    let digits = hex_digits(raw).ok_or_else(|| malformed("integer", raw))?;
    u64::from_str_radix(digits, 16).map_err(|_| overflow("integer", raw))
}

/// Returns `true` if `raw` looks like a decimal or `0x`-prefixed number.
pub(crate) fn is_number(raw: &str) -> bool {
    decimal_digits(raw).is_some() || (has_hex_prefix(raw) && hex_digits(raw).is_some())
}

fn skip_blanks(raw: &str) -> &str {
    raw.trim_start_matches([' ', '\t'])
}

fn decimal_digits(raw: &str) -> Option<&str> {
    let body = skip_blanks(raw);
    (!body.is_empty() && body.bytes().all(|b| b.is_ascii_digit())).then_some(body)
}

fn has_hex_prefix(raw: &str) -> bool {
    strip_hex_prefix(skip_blanks(raw)).is_some()
}

/// Strips `0+x` from the front of `body`.
fn strip_hex_prefix(body: &str) -> Option<&str> {
    let rest = body.trim_start_matches('0');
    if rest.len() == body.len() {
        return None;
    }
    rest.strip_prefix(['x', 'X'])
}

fn hex_digits(raw: &str) -> Option<&str> {
    let body = skip_blanks(raw);
    let digits = strip_hex_prefix(body).unwrap_or(body);
    (!digits.is_empty() && digits.bytes().all(|b| b.is_ascii_hexdigit())).then_some(digits)
}

fn malformed(expected: &'static str, raw: &str) -> ConversionError {
    ConversionError::Malformed {
        expected,
        raw: raw.to_string(),
    }
}

fn overflow(expected: &'static str, raw: &str) -> ConversionError {
    ConversionError::Overflow {
        expected,
        raw: raw.to_string(),
    }
}
