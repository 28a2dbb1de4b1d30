//! Verb-noun command table and dispatch.
//!
//! Commands are matched on the first two arguments (`<tool> <verb> <noun>`)
//! and on the platform the tool runs on. Every table also carries the
//! built-in `update version` command.

use std::collections::HashSet;
use std::fmt;
use std::process::ExitCode;

use crate::error::{Error, Result};
use crate::gate::{ParsedArgs, Usage};
use crate::output::{Exit, Flow, Stream};
use crate::version;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
    FreeBsd,
    OpenBsd,
    NetBsd,
    Android,
    Ios,
}

impl Platform {
    /// Linux, macOS and Windows.
    pub const DESKTOP: &'static [Platform] = &[Platform::Linux, Platform::MacOs, Platform::Windows];

    /// Name as reported by `std::env::consts::OS`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::MacOs => "macos",
            Platform::Windows => "windows",
            Platform::FreeBsd => "freebsd",
            Platform::OpenBsd => "openbsd",
            Platform::NetBsd => "netbsd",
            Platform::Android => "android",
            Platform::Ios => "ios",
        }
    }

    pub fn from_os(os: &str) -> Option<Self> {
        match os {
            "linux" => Some(Platform::Linux),
            "macos" => Some(Platform::MacOs),
            "windows" => Some(Platform::Windows),
            "freebsd" => Some(Platform::FreeBsd),
            "openbsd" => Some(Platform::OpenBsd),
            "netbsd" => Some(Platform::NetBsd),
            "android" => Some(Platform::Android),
            "ios" => Some(Platform::Ios),
            _ => None,
        }
    }

    /// The platform this binary was built for, if it is one we name.
    pub fn current() -> Option<Self> {
        Self::from_os(std::env::consts::OS)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a handler sees of the command line.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    tool_name: &'a str,
    args: &'a [String],
}

impl<'a> Invocation<'a> {
    pub fn new(tool_name: &'a str, args: &'a [String]) -> Self {
        Self { tool_name, args }
    }

    pub fn tool_name(&self) -> &'a str {
        self.tool_name
    }

    /// Full argument vector, program name included.
    pub fn args(&self) -> &'a [String] {
        self.args
    }

    pub fn should_have_args(&self, count: usize, usage: &Usage) -> Flow<ParsedArgs> {
        usage.should_have_args(self.args, count)
    }
}

pub type Handler = Box<dyn Fn(&Invocation<'_>) -> Flow>;

pub struct Command {
    pub verb: String,
    pub noun: String,
    pub supports: Vec<Platform>,
    handler: Handler,
}

impl Command {
    pub fn new<F>(
        verb: impl Into<String>,
        noun: impl Into<String>,
        supports: &[Platform],
        handler: F,
    ) -> Self
    where
        F: Fn(&Invocation<'_>) -> Flow + 'static,
    {
        Self {
            verb: verb.into(),
            noun: noun.into(),
            supports: supports.to_vec(),
            handler: Box::new(handler),
        }
    }

    pub fn is_named(&self, verb: &str, noun: &str) -> bool {
        self.verb == verb && self.noun == noun
    }

    pub fn runs_on(&self, platform: Option<Platform>) -> bool {
        platform.is_some_and(|p| self.supports.contains(&p))
    }

    pub fn execute(&self, invocation: &Invocation<'_>) -> Flow {
        (self.handler)(invocation)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("verb", &self.verb)
            .field("noun", &self.noun)
            .field("supports", &self.supports)
            .finish_non_exhaustive()
    }
}

/// Ordered commands with unique `(verb, noun)` pairs.
#[derive(Debug)]
pub struct CommandTable {
    commands: Vec<Command>,
}

impl CommandTable {
    /// Build the table from user commands followed by the built-ins.
    ///
    /// A repeated `(verb, noun)` pair is rejected, including a user command
    /// named like a built-in.
    pub fn new(tool_name: &str, commands: Vec<Command>) -> Result<Self> {
        let mut all = commands;
        all.extend(builtin_commands(tool_name));

        let mut seen = HashSet::new();
        for command in &all {
            if !seen.insert((command.verb.as_str(), command.noun.as_str())) {
                return Err(Error::command_duplicate(&command.verb, &command.noun));
            }
        }

        Ok(Self { commands: all })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn find(&self, verb: &str, noun: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.is_named(verb, noun))
    }
}

fn builtin_commands(tool_name: &str) -> Vec<Command> {
    let tool = tool_name.to_string();

    vec![Command::new("update", "version", Platform::DESKTOP, move |inv| {
        let usage = Usage::new(
            format!("{} update version [VERSION FILE] [NEW VERSION]", tool),
            format!(
                "Update {}'s version, defaults to the next patch release if no [NEW VERSION] is given. \
                 [NEW VERSION] may also be one of patch, minor or major",
                tool
            ),
        );
        let parsed = inv.should_have_args(1, &usage)?;
        let requested = parsed.extra().first().map(String::as_str);

        usage.handle(
            version::bump_version(parsed.positional(0).unwrap_or_default(), requested)
                .map(|written| println!("{}", written)),
        )
    })]
}

pub struct Dispatcher {
    tool_name: String,
    tool_version: String,
    table: CommandTable,
    platform: Option<Platform>,
}

impl Dispatcher {
    pub fn new(
        tool_name: impl Into<String>,
        tool_version: impl Into<String>,
        commands: Vec<Command>,
    ) -> Result<Self> {
        let tool_name = tool_name.into();
        let table = CommandTable::new(&tool_name, commands)?;
        Ok(Self {
            tool_name,
            tool_version: tool_version.into(),
            table,
            platform: Platform::current(),
        })
    }

    /// Dispatch as if running on `platform`.
    pub fn with_platform(mut self, platform: Option<Platform>) -> Self {
        self.platform = platform;
        self
    }

    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    /// Listing of the commands available on this platform.
    pub fn top_usage(&self) -> String {
        let mut text = format!(
            "Usage:\n  {} [VERB] [NOUN] [ARGUMENTS] [FLAGS]\n\nAvailable commands:\n",
            self.tool_name
        );
        for command in self.table.iter().filter(|c| c.runs_on(self.platform)) {
            text.push_str(&format!("    {} {}\n", command.verb, command.noun));
        }
        text
    }

    /// Select and run a command for `args` (program name first).
    pub fn dispatch(&self, args: &[String]) -> Exit {
        if let (Some(verb), Some(noun)) = (args.get(1), args.get(2)) {
            if let Some(command) = self.table.find(verb, noun) {
                if command.runs_on(self.platform) {
                    let invocation = Invocation::new(&self.tool_name, args);
                    return match command.execute(&invocation) {
                        Ok(()) => Exit::success(),
                        Err(exit) => exit,
                    };
                }
                log_status!(
                    "dispatch",
                    "'{} {}' is not available on {}",
                    verb,
                    noun,
                    self.platform.map(|p| p.as_str()).unwrap_or(std::env::consts::OS)
                );
            }
        }

        match args.get(1).map(String::as_str) {
            Some("--version") => {
                return Exit::new(0, Stream::Stdout, format!("{}\n", self.tool_version));
            }
            Some("-h") | Some("--help") => {
                return Exit::new(0, Stream::Stdout, self.top_usage());
            }
            _ => {}
        }

        let given = args.get(1..).unwrap_or_default().join(" ");
        Exit::new(
            1,
            Stream::Stdout,
            format!(
                "Unknown {} command \"{}\"\n\n{}",
                self.tool_name,
                given,
                self.top_usage()
            ),
        )
    }

    pub fn run(&self, args: &[String]) -> ExitCode {
        self.dispatch(args).finish()
    }
}

/// Entry point for a tool's `main`: dispatch the process arguments.
pub fn run(tool_name: &str, tool_version: &str, commands: Vec<Command>) -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    match Dispatcher::new(tool_name, tool_version, commands) {
        Ok(dispatcher) => dispatcher.run(&args),
        Err(err) => Exit::new(
            1,
            Stream::Stderr,
            format!("Error running command:\n\n{}\n", err),
        )
        .finish(),
    }
}
