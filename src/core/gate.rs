//! Positional argument counting and per-command flag parsing.
//!
//! A command line looks like `<tool> <verb> <noun> [positional...] [flags...]`.
//! [`Usage::should_have_args`] checks that the expected positionals are
//! present, answers `-h` with the command's help, and hands whatever follows
//! the positionals to the command's clap flag definition.

use clap::ArgMatches;

use crate::error::Result;
use crate::output::{exit_code_to_u8, handle_command_error, Exit, Flow, Stream};
use crate::utils::args;

/// Tokens before the first positional: program, verb, noun.
const COMMAND_TOKENS: usize = 3;

#[derive(Debug, Clone)]
pub struct Usage {
    pub usage: String,
    pub description: String,
    pub flags: Option<clap::Command>,
}

impl Usage {
    pub fn new(usage: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            usage: usage.into(),
            description: description.into(),
            flags: None,
        }
    }

    /// Flags accepted after the positionals.
    pub fn with_flags(mut self, flags: clap::Command) -> Self {
        self.flags = Some(flags);
        self
    }

    /// Usage, description and (when configured) flag defaults.
    pub fn render(&self) -> String {
        let mut text = format!(
            "Usage:\n  {}\n\nDescription:\n  {}\n\n",
            self.usage, self.description
        );
        if let Some(flags) = self.render_flags() {
            text.push_str("Available flags:\n");
            text.push_str(&flags);
            text.push('\n');
        }
        text
    }

    fn render_flags(&self) -> Option<String> {
        let flags = self.flags.as_ref()?;
        let rendered = flag_parser(flags)
            .help_template("{options}")
            .render_help()
            .to_string();
        let rendered = rendered.trim_end();
        if rendered.is_empty() {
            None
        } else {
            Some(format!("{}\n", rendered))
        }
    }

    fn not_enough_arguments(&self) -> Exit {
        Exit::new(
            1,
            Stream::Stderr,
            format!(
                "Error running command:\n\nInvalid input, not enough arguments.\n\n{}",
                self.render()
            ),
        )
    }

    /// Check that `count` positionals follow the verb and noun.
    ///
    /// `args` is the full argument vector, program name included. A help
    /// flag anywhere wins over every other check.
    pub fn should_have_args(&self, args: &[String], count: usize) -> Flow<ParsedArgs> {
        if args.iter().any(|arg| args::is_help_flag(arg)) {
            return Err(Exit::new(0, Stream::Stderr, self.render()));
        }

        let required = COMMAND_TOKENS + count;

        // A flag sitting in a positional slot means a positional is missing.
        let flag_in_slot = args
            .iter()
            .skip(COMMAND_TOKENS)
            .take(count)
            .any(|arg| args::is_flag(arg));

        if flag_in_slot || args.len() < required {
            return Err(self.not_enough_arguments());
        }

        let positionals = args[COMMAND_TOKENS..required].to_vec();
        let extra = args[required..].to_vec();

        let flags = match &self.flags {
            Some(flags) => Some(parse_flags(flags, &extra)?),
            None => None,
        };

        Ok(ParsedArgs {
            positionals,
            extra,
            flags,
        })
    }

    /// See [`handle_command_error`].
    pub fn handle<T>(&self, result: Result<T>) -> Flow {
        handle_command_error(result, self)
    }
}

fn flag_parser(flags: &clap::Command) -> clap::Command {
    flags
        .clone()
        .no_binary_name(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
}

fn parse_flags(flags: &clap::Command, tokens: &[String]) -> Flow<ArgMatches> {
    flag_parser(flags)
        .try_get_matches_from(args::normalize_long_flags(tokens))
        .map_err(|e| {
            Exit::new(
                exit_code_to_u8(e.exit_code()),
                Stream::Stderr,
                e.render().to_string(),
            )
        })
}

#[derive(Debug, Clone)]
pub struct ParsedArgs {
    positionals: Vec<String>,
    extra: Vec<String>,
    flags: Option<ArgMatches>,
}

impl ParsedArgs {
    /// The positional at `index`, None past the count passed to
    /// [`Usage::should_have_args`].
    pub fn positional(&self, index: usize) -> Option<&str> {
        self.positionals.get(index).map(String::as_str)
    }

    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }

    /// Tokens after the positionals, whether or not flags were configured.
    pub fn extra(&self) -> &[String] {
        &self.extra
    }

    pub fn flags(&self) -> Option<&ArgMatches> {
        self.flags.as_ref()
    }

    /// String value of a flag, None when unset or not defined.
    pub fn flag(&self, name: &str) -> Option<&str> {
        self.flags
            .as_ref()?
            .try_get_one::<String>(name)
            .ok()
            .flatten()
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Arg;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn example_usage() -> Usage {
        Usage::new("tool run example [INPUT] [FLAGS]", "Example command").with_flags(
            clap::Command::new("example_flag_set").arg(
                Arg::new("example")
                    .long("example")
                    .default_value("")
                    .help("Example flag"),
            ),
        )
    }

    #[test]
    fn passes_with_expected_positional() {
        let parsed = example_usage()
            .should_have_args(&argv(&["tool", "run", "example", "hello"]), 1)
            .unwrap();
        assert_eq!(parsed.positional(0), Some("hello"));
        assert_eq!(parsed.flag("example"), Some(""));
    }

    #[test]
    fn missing_positional_is_usage_error() {
        let exit = example_usage()
            .should_have_args(&argv(&["tool", "run", "example"]), 1)
            .unwrap_err();
        assert_eq!(exit.code, 1);
        assert_eq!(exit.stream, Stream::Stderr);
        assert!(exit.text.contains("not enough arguments"));
        assert!(exit.text.contains("Usage:\n  tool run example [INPUT] [FLAGS]"));
    }

    #[test]
    fn flag_in_positional_slot_is_usage_error() {
        let exit = example_usage()
            .should_have_args(&argv(&["tool", "run", "example", "-example=x"]), 1)
            .unwrap_err();
        assert_eq!(exit.code, 1);
        assert!(exit.text.contains("not enough arguments"));
    }

    #[test]
    fn help_flag_short_circuits_with_success() {
        let exit = example_usage()
            .should_have_args(&argv(&["tool", "run", "example", "-h"]), 1)
            .unwrap_err();
        assert_eq!(exit.code, 0);
        assert!(exit.text.starts_with("Usage:\n"));
        assert!(exit.text.contains("Available flags:"));
        assert!(exit.text.contains("--example"));

        // Help wins even when positionals are missing.
        let exit = example_usage()
            .should_have_args(&argv(&["tool", "run", "-h"]), 2)
            .unwrap_err();
        assert_eq!(exit.code, 0);
    }

    #[test]
    fn residual_tokens_are_parsed_as_flags() {
        let parsed = example_usage()
            .should_have_args(&argv(&["tool", "run", "example", "hello", "-example=world"]), 1)
            .unwrap();
        assert_eq!(parsed.positional(0), Some("hello"));
        assert_eq!(parsed.flag("example"), Some("world"));
        assert_eq!(parsed.extra(), &["-example=world".to_string()]);
    }

    #[test]
    fn flag_parse_error_terminates_with_clap_code() {
        let exit = example_usage()
            .should_have_args(&argv(&["tool", "run", "example", "hello", "--bogus"]), 1)
            .unwrap_err();
        assert_eq!(exit.code, 2);
        assert_eq!(exit.stream, Stream::Stderr);
    }

    #[test]
    fn extra_tokens_are_kept_without_flag_definition() {
        let usage = Usage::new("tool update version [FILE] [VERSION]", "Update");
        let parsed = usage
            .should_have_args(&argv(&["tool", "update", "version", "v.go", "v1.0.0"]), 1)
            .unwrap();
        assert_eq!(parsed.positional(0), Some("v.go"));
        assert_eq!(parsed.positional(1), None);
        assert_eq!(parsed.extra(), &["v1.0.0".to_string()]);
        assert!(parsed.flags().is_none());
        assert_eq!(parsed.flag("anything"), None);
    }

    #[test]
    fn render_without_flags_has_no_flag_section() {
        let usage = Usage::new("tool a b", "Does a b");
        assert_eq!(
            usage.render(),
            "Usage:\n  tool a b\n\nDescription:\n  Does a b\n\n"
        );
    }
}
