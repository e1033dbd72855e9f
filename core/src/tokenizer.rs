//! Command line tokenization behind the [`Tokenizer`] and [`TokenSet`] traits.
//!
//! The parse engine only needs a handful of lookups keyed by switch
//! spelling, so the tokenizer is a seam: [`ShellTokenizer`] splits an argv
//! list the way the UEFI shell does, and tests or hosts can substitute their
//! own implementation. Releasing a token set is dropping it.
//!
//! # Examples
//!
//! ```
//! use shell_args_core::{ShellTokenizer, TokenEntry, TokenKind, TokenSet, Tokenizer};
//!
//! let entries = [
//!     TokenEntry::new("-s", TokenKind::Value),
//!     TokenEntry::new("-v", TokenKind::Flag),
//! ];
//! let tokens = ShellTokenizer::new(["prog", "file.txt", "-s", "abc", "-v"])
//!     .tokenize(&entries)
//!     .unwrap();
//! assert_eq!(tokens.positional_count(), 1);
//! assert_eq!(tokens.value_for("-s"), Some("abc"));
//! assert!(tokens.flag_present("-v"));
//! ```

use std::collections::HashSet;

use thiserror::Error;
use tracing::debug;

use crate::convert::is_number;

/// Whether a registered spelling consumes the following token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Flag,
    Value,
}

/// One registered switch spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenEntry {
    pub spelling: String,
    pub kind: TokenKind,
}

impl TokenEntry {
    pub fn new(spelling: &str, kind: TokenKind) -> Self {
        Self {
            spelling: spelling.to_string(),
            kind,
        }
    }
}

/// Tokenization failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    /// A switch-looking token matches no registered spelling.
    #[error("unknown option '{0}'")]
    UnknownOption(String),
}

/// Lookups over a tokenized command line.
///
/// Spellings passed in are the registered ones; implementations decide how
/// supplied tokens are matched against them.
pub trait TokenSet {
    /// Returns `true` if `spelling` was supplied.
    fn flag_present(&self, spelling: &str) -> bool;

    /// Value supplied after the first occurrence of `spelling`.
    fn value_for(&self, spelling: &str) -> Option<&str>;

    /// Number of positional tokens, program name excluded.
    fn positional_count(&self) -> usize;

    /// Positional token at `index` (0-based, program name excluded).
    fn positional(&self, index: usize) -> Option<&str>;

    /// First spelling supplied more than once.
    fn find_duplicate(&self) -> Option<&str>;
}

/// Produces a [`TokenSet`] for a registration table.
pub trait Tokenizer {
    type Set: TokenSet;

    fn tokenize(&self, entries: &[TokenEntry]) -> Result<Self::Set, TokenizeError>;
}

/// Tokenizer over an argv list whose first element is the program name.
///
/// A token is a switch when it starts with `-`, has more characters after
/// it, and is not a number (`-5` and `-0x10` stay positional or values).
/// Spellings match ASCII-case-insensitively. A value-typed switch takes the
/// next token as its value unless that token is itself a switch.
#[derive(Debug, Clone)]
pub struct ShellTokenizer {
    args: Vec<String>,
}

impl ShellTokenizer {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Tokenizes the current process arguments.
    pub fn from_env() -> Self {
        Self::new(std::env::args())
    }
}

impl Tokenizer for ShellTokenizer {
    type Set = ShellTokens;

    fn tokenize(&self, entries: &[TokenEntry]) -> Result<ShellTokens, TokenizeError> {
        let mut tokens = ShellTokens::default();
        let mut awaiting_value: Option<usize> = None;

        for arg in self.args.iter().skip(1) {
            if is_switch(arg) {
                let entry = entries
                    .iter()
                    .find(|entry| entry.spelling.eq_ignore_ascii_case(arg))
                    .ok_or_else(|| TokenizeError::UnknownOption(arg.clone()))?;
                tokens.switches.push(SwitchOccurrence {
                    spelling: entry.spelling.clone(),
                    value: None,
                });
                awaiting_value =
                    (entry.kind == TokenKind::Value).then(|| tokens.switches.len() - 1);
                continue;
            }

            match awaiting_value.take() {
                Some(index) => tokens.switches[index].value = Some(arg.clone()),
                None => tokens.positionals.push(arg.clone()),
            }
        }

        debug!(
            switches = tokens.switches.len(),
            positionals = tokens.positionals.len(),
            "tokenized command line"
        );
        Ok(tokens)
    }
}

fn is_switch(arg: &str) -> bool {
    match arg.strip_prefix('-') {
        Some(rest) => !rest.is_empty() && !is_number(rest),
        None => false,
    }
}

#[derive(Debug, Clone)]
struct SwitchOccurrence {
    spelling: String,
    value: Option<String>,
}

/// Token set produced by [`ShellTokenizer`].
#[derive(Debug, Clone, Default)]
pub struct ShellTokens {
    switches: Vec<SwitchOccurrence>,
    positionals: Vec<String>,
}

impl ShellTokens {
    fn occurrence(&self, spelling: &str) -> Option<&SwitchOccurrence> {
        self.switches
            .iter()
            .find(|occurrence| occurrence.spelling.eq_ignore_ascii_case(spelling))
    }
}

impl TokenSet for ShellTokens {
    fn flag_present(&self, spelling: &str) -> bool {
        self.occurrence(spelling).is_some()
    }

    fn value_for(&self, spelling: &str) -> Option<&str> {
        self.occurrence(spelling)?.value.as_deref()
    }

    fn positional_count(&self) -> usize {
        self.positionals.len()
    }

    fn positional(&self, index: usize) -> Option<&str> {
        self.positionals.get(index).map(String::as_str)
    }

    fn find_duplicate(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.switches
            .iter()
            .map(|occurrence| occurrence.spelling.as_str())
            .find(|spelling| !seen.insert(*spelling))
    }
}
