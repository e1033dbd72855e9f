//! Help text rendering.
//!
//! Argument names come from a micro-format in the help strings: a string
//! starting with `[name]` displays `name` and describes the entry with the
//! rest. Without the bracket the default name `arg` is used for values and
//! flags show no name at all.
//!
//! ```text
//!
//! Application to test command line parser
//!
//! Usage: CmdLine str [num1] [options]
//!
//!  Parameters:
//!   str                     string parameter
//!   [num1]                  hexadecimal parameter
//!
//!  Options:
//!   -f                      boolean flag
//!   -c, -colour val         named option (black|red)
//!   -b, -break              enable page break mode
//!   -h, -help               display this help and exit
//!
//! ```

use crate::schema::ParseOptions;
use crate::{ParameterSpec, SwitchSpec, ValueType};

/// Name shown for value-bearing entries without a `[name]` prefix.
pub const DEFAULT_ARG_NAME: &str = "arg";

/// Longest displayed argument name, brackets included.
const ARG_NAME_LIMIT: usize = 23;

/// Column width names and long spellings are padded to.
const PAD_WIDTH: usize = 19;

/// Gap between a parameter name column and its description.
const PARAMETER_GAP: &str = "     ";

/// A help string split into its optional name and its description.
///
/// # Examples
///
/// ```
/// use shell_args_core::HelpText;
///
/// let help = HelpText::parse("[num]decimal value");
/// assert_eq!(help.name, Some("num"));
/// assert_eq!(help.description, "decimal value");
///
/// let help = HelpText::parse("boolean flag");
/// assert_eq!(help.name, None);
/// assert_eq!(help.description, "boolean flag");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpText<'h> {
    pub name: Option<&'h str>,
    pub description: &'h str,
}

impl<'h> HelpText<'h> {
    /// Splits a leading `[name]` off `help`.
    ///
    /// An opening bracket without a closing one is not a name; the whole
    /// string is then the description.
    pub fn parse(help: &'h str) -> Self {
        let named = help
            .strip_prefix('[')
            .and_then(|rest| rest.split_once(']'));
        match named {
            Some((name, description)) => Self {
                name: Some(name),
                description,
            },
            None => Self {
                name: None,
                description: help,
            },
        }
    }

    /// Display name, bracketed when the entry is optional.
    ///
    /// Returns an empty string when there is neither an explicit name nor a
    /// default.
    pub fn display_name(&self, mandatory: bool, default: Option<&str>) -> String {
        let Some(name) = self.name.or(default) else {
            return String::new();
        };
        if mandatory {
            truncate(name, ARG_NAME_LIMIT)
        } else {
            format!("[{}]", truncate(name, ARG_NAME_LIMIT - 2))
        }
    }
}

fn truncate(name: &str, limit: usize) -> String {
    name.chars().take(limit).collect()
}

fn padding(used: usize) -> String {
    " ".repeat(PAD_WIDTH.saturating_sub(used))
}

/// Renders the full help screen.
///
/// Parameters at positions below `mandatory_params` are shown bare, the
/// rest in brackets. Built-in switches are always listed last.
pub fn render_help(
    program: &str,
    description: Option<&str>,
    mandatory_params: usize,
    params: &[ParameterSpec<'_>],
    switches: &[SwitchSpec<'_>],
    options: &ParseOptions,
) -> String {
    let mut out = String::from("\n");

    if let Some(description) = description {
        out.push_str(&format!("{description}\n\n"));
    }

    let names: Vec<(String, &str)> = params
        .iter()
        .enumerate()
        .map(|(index, param)| {
            let help = HelpText::parse(&param.help);
            let name = help.display_name(index < mandatory_params, Some(DEFAULT_ARG_NAME));
            (name, help.description)
        })
        .collect();

    out.push_str(&format!("Usage: {program}"));
    for (name, _) in &names {
        out.push_str(&format!(" {name}"));
    }
    out.push_str(" [options]\n");

    out.push_str("\n Parameters:\n");
    for (name, description) in &names {
        let pad = padding(name.chars().count());
        out.push_str(&format!("  {name}{pad}{PARAMETER_GAP}{description}\n"));
    }

    out.push_str("\n Options:\n");
    for switch in switches {
        out.push_str(&switch_line(switch));
    }

    for builtin in options.builtins() {
        let pad = padding(builtin.long.len());
        out.push_str(&format!(
            "  {}, {} {pad}{}\n",
            builtin.short, builtin.long, builtin.description
        ));
    }
    out.push('\n');

    out
}

fn switch_line(switch: &SwitchSpec<'_>) -> String {
    let help = HelpText::parse(&switch.help);
    let default = switch.takes_value().then_some(DEFAULT_ARG_NAME);
    let name = help.display_name(true, default);

    let separator = match (&switch.short, &switch.long) {
        (Some(_), Some(_)) => ',',
        _ => ' ',
    };
    let short = switch.short.as_deref().unwrap_or("  ");
    let long = switch.long.as_deref().unwrap_or("");

    let used = long.chars().count() + name.chars().count();
    let pad = if used > PAD_WIDTH {
        " ".to_string()
    } else {
        padding(used)
    };

    let mut line = format!(
        "  {short}{separator} {long} {name}{pad}{}",
        help.description
    );
    if let ValueType::Enum(mapping) = &switch.value_type {
        let names: Vec<&str> = mapping.names().collect();
        line.push_str(&format!(" ({})", names.join("|")));
    }
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    use crate::{EnumMapping, ParameterSpec, SwitchSpec, ValueType};

    use super::*;

    #[test]
    fn test_help_text_unterminated_bracket_is_plain_description() {
        let help = HelpText::parse("[oops no close");
        assert_eq!(help.name, None);
        assert_eq!(help.description, "[oops no close");
    }

    #[test]
    fn test_help_text_empty_string() {
        let help = HelpText::parse("");
        assert_eq!(help.name, None);
        assert_eq!(help.description, "");
    }

    #[test]
    fn test_display_name_optional_and_default() {
        let help = HelpText::parse("no name here");
        assert_eq!(help.display_name(true, Some("arg")), "arg");
        assert_eq!(help.display_name(false, Some("arg")), "[arg]");
        assert_eq!(help.display_name(true, None), "");
    }

    #[test]
    fn test_display_name_truncates_long_names() {
        let help = HelpText::parse("[abcdefghijklmnopqrstuvwxyz]text");
        assert_eq!(help.display_name(true, None), "abcdefghijklmnopqrstuvw");
        assert_eq!(help.display_name(false, None), "[abcdefghijklmnopqrstu]");
    }

    #[test]
    fn test_render_parameter_lines() {
        let params = [
            ParameterSpec::new(ValueType::String { capacity: 20 })
                .with_help("[str]string parameter"),
            ParameterSpec::new(ValueType::Hexadecimal).with_help("hexadecimal parameter"),
        ];

        let help = render_help("CmdLine", None, 1, &params, &[], &ParseOptions::default());
        assert!(help.contains("Usage: CmdLine str [arg] [options]\n"));
        assert!(help.contains(&format!("  str{}     string parameter\n", " ".repeat(16))));
        assert!(help.contains(&format!("  [arg]{}     hexadecimal parameter\n", " ".repeat(14))));
    }

    #[test]
    fn test_render_switch_layouts() {
        let switches = [
            SwitchSpec::new(Some("-f"), None, ValueType::None).with_help("boolean flag"),
            SwitchSpec::new(None, Some("-flag2"), ValueType::None)
                .with_help("flag with default value assigned"),
            SwitchSpec::new(Some("-d"), Some("-dec"), ValueType::Decimal)
                .with_help("[num]decimal value"),
        ];

        let help = render_help("prog", None, 0, &[], &switches, &ParseOptions::default());
        let lines: Vec<&str> = help.lines().collect();

        let f = format!("  -f   {}boolean flag", " ".repeat(19));
        let flag2 = format!("      -flag2 {}flag with default value assigned", " ".repeat(13));
        let dec = format!("  -d, -dec num{}decimal value", " ".repeat(12));
        assert!(lines.contains(&f.as_str()), "{help}");
        assert!(lines.contains(&flag2.as_str()), "{help}");
        assert!(lines.contains(&dec.as_str()), "{help}");
    }

    #[test]
    fn test_render_enum_choices() {
        let colours = EnumMapping::new().with(0, "black").with(1, "red").with(2, "green");
        let switches = [SwitchSpec::new(Some("-c"), Some("-colour"), ValueType::Enum(colours))
            .with_help("[val]named option")];

        let help = render_help("prog", None, 0, &[], &switches, &ParseOptions::default());
        assert!(help.contains("named option (black|red|green)\n"));
    }

    #[test]
    fn test_builtins_rendered_last() {
        let switches =
            [SwitchSpec::new(Some("-z"), None, ValueType::None).with_help("last declared")];
        let help = render_help("prog", Some("About"), 0, &[], &switches, &ParseOptions::default());

        assert!(help.starts_with("\nAbout\n\nUsage: prog [options]\n"));
        let break_at = help.find("-b, -break").unwrap();
        let help_at = help.find("-h, -help").unwrap();
        assert!(help.find("last declared").unwrap() < break_at);
        assert!(break_at < help_at);
        assert!(help.ends_with(&format!(
            "  -h, -help {}display this help and exit\n\n",
            " ".repeat(14)
        )));
    }

    #[test]
    fn test_long_names_keep_single_space() {
        let switches = [SwitchSpec::new(None, Some("-a-very-long-switch"), ValueType::Decimal)
            .with_help("[count]how many")];
        let help = render_help("prog", None, 0, &[], &switches, &ParseOptions::default());
        assert!(help.contains("      -a-very-long-switch count how many\n"), "{help}");
    }
}
