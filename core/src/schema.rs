//! Expansion of a switch table into the tokenizer's registration form.
//!
//! Every declared spelling is registered on its own, so short and long
//! synonyms look like unrelated tokens to the tokenizer. The built-in
//! page-break and help switches are appended after the declared ones.

use tracing::debug;

use crate::error::{ParseError, SchemaError};
use crate::tokenizer::{TokenEntry, TokenKind};
use crate::{MAX_SWITCH_ENTRIES, SwitchSpec};

/// A switch every schema carries implicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinSwitch {
    pub short: &'static str,
    pub long: &'static str,
    pub description: &'static str,
}

impl BuiltinSwitch {
    /// Returns `true` if `spelling` is one of this switch's spellings.
    pub fn matches(&self, spelling: &str) -> bool {
        self.short.eq_ignore_ascii_case(spelling) || self.long.eq_ignore_ascii_case(spelling)
    }
}

pub const PAGE_BREAK_SWITCH: BuiltinSwitch = BuiltinSwitch {
    short: "-b",
    long: "-break",
    description: "enable page break mode",
};

pub const HELP_SWITCH: BuiltinSwitch = BuiltinSwitch {
    short: "-h",
    long: "-help",
    description: "display this help and exit",
};

/// Functional options for a parse call.
///
/// # Examples
///
/// ```
/// use shell_args_core::ParseOptions;
///
/// let options = ParseOptions::default().without_help().force_page_break();
/// assert!(!options.help);
/// assert!(options.force_page_break);
/// assert_eq!(options.switch_capacity, 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Register `-h` / `-help` and render help when supplied.
    pub help: bool,
    /// Turn page-break mode on even without `-b`.
    pub force_page_break: bool,
    /// Maximum number of declared switches.
    pub switch_capacity: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            help: true,
            force_page_break: false,
            switch_capacity: MAX_SWITCH_ENTRIES,
        }
    }
}

impl ParseOptions {
    pub fn without_help(mut self) -> Self {
        self.help = false;
        self
    }

    pub fn force_page_break(mut self) -> Self {
        self.force_page_break = true;
        self
    }

    pub fn with_switch_capacity(mut self, capacity: usize) -> Self {
        self.switch_capacity = capacity;
        self
    }

    /// Built-ins registered under these options, in display order.
    pub fn builtins(&self) -> impl Iterator<Item = &'static BuiltinSwitch> {
        let help = self.help.then_some(&HELP_SWITCH);
        std::iter::once(&PAGE_BREAK_SWITCH).chain(help)
    }
}

/// Builds the registration table for `switches`.
///
/// # Errors
///
/// Returns [`SchemaError::CapacityExceeded`] when more switches are declared
/// than `options.switch_capacity` allows, [`SchemaError::MissingSpelling`]
/// for a switch with no spelling, and [`ParseError::Resources`] if the table
/// cannot be allocated.
///
/// # Examples
///
/// ```
/// use shell_args_core::{ParseOptions, SwitchSpec, TokenKind, build_registration};
///
/// let mut verbose = false;
/// let switches = [SwitchSpec::flag(Some("-v"), Some("-verbose"), &mut verbose)];
/// let entries = build_registration(&switches, &ParseOptions::default()).unwrap();
///
/// let spellings: Vec<&str> = entries.iter().map(|e| e.spelling.as_str()).collect();
/// assert_eq!(spellings, ["-v", "-verbose", "-b", "-break", "-h", "-help"]);
/// assert!(entries.iter().all(|e| e.kind == TokenKind::Flag));
/// ```
pub fn build_registration(
    switches: &[SwitchSpec<'_>],
    options: &ParseOptions,
) -> Result<Vec<TokenEntry>, ParseError> {
    if switches.len() > options.switch_capacity {
        return Err(SchemaError::CapacityExceeded {
            declared: switches.len(),
            capacity: options.switch_capacity,
        }
        .into());
    }

    let declared: usize = switches.iter().map(|switch| switch.spellings().count()).sum();
    let mut entries: Vec<TokenEntry> = Vec::new();
    entries.try_reserve_exact(declared + 2 * options.builtins().count())?;

    for (index, switch) in switches.iter().enumerate() {
        if switch.short.is_none() && switch.long.is_none() {
            return Err(SchemaError::MissingSpelling { index }.into());
        }
        let kind = if switch.takes_value() {
            TokenKind::Value
        } else {
            TokenKind::Flag
        };
        entries.extend(
            switch
                .spellings()
                .map(|spelling| TokenEntry::new(spelling, kind)),
        );
    }

    for builtin in options.builtins() {
        entries.push(TokenEntry::new(builtin.short, TokenKind::Flag));
        entries.push(TokenEntry::new(builtin.long, TokenKind::Flag));
    }

    for entry in &entries {
        debug!(spelling = %entry.spelling, kind = ?entry.kind, "registered switch");
    }
    Ok(entries)
}
