//! Shell commands and the table they are dispatched from.
//!
//! Every command is a clap [`Parser`] that also implements [`ShellCommand`].
//! Commands are registered explicitly into a [`CommandTable`]; the table
//! tokenizes input, hands the arguments to the command's own parser and runs
//! it against the session [`Context`].

mod account;
mod basic;
mod debug;
mod files;
mod net;
mod web;

use std::{collections::BTreeMap, fmt, iter};

use clap::{CommandFactory, Parser};
use tracing::{debug, warn};

use crate::{context::Context, error::ShellError, parser};

pub use account::{Login, Logout, Register, Users};
pub use basic::{Clear, Echo, Help, Ofetch};
pub use debug::{Chat, Hack, InteractiveEcho, Quit};
pub use files::{Cd, Ls, Pwd};
pub use net::{Connect, Exit, Scan};
pub use web::{Browse, Search, Spin};

pub type CommandResult = Result<Reply, ShellError>;

/// Called with every collected answer once the last prompt is answered.
pub type Completion =
    Box<dyn FnOnce(&mut Context, Vec<String>) -> Result<Option<String>, ShellError>>;

/// A command that can be typed into the simulated shell.
pub trait ShellCommand: Parser {
    fn run(self, ctx: &mut Context, table: &CommandTable) -> CommandResult;
}

/// What a command hands back to the session.
pub enum Reply {
    /// Finished, with optional output.
    Done(Option<String>),
    /// Needs more input before it can finish.
    Ask(Interaction),
}

impl Reply {
    pub fn output(text: impl Into<String>) -> Self {
        Reply::Done(Some(text.into()))
    }

    pub fn empty() -> Self {
        Reply::Done(None)
    }
}

impl fmt::Debug for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Done(output) => f.debug_tuple("Done").field(output).finish(),
            Reply::Ask(interaction) => f.debug_tuple("Ask").field(interaction).finish(),
        }
    }
}

/// Prompts to show one after another, and what to do with the answers.
pub struct Interaction {
    pub prompts: Vec<String>,
    pub on_complete: Completion,
}

impl Interaction {
    pub fn new<F>(prompts: impl IntoIterator<Item = impl Into<String>>, on_complete: F) -> Self
    where
        F: FnOnce(&mut Context, Vec<String>) -> Result<Option<String>, ShellError> + 'static,
    {
        Self {
            prompts: prompts.into_iter().map(Into::into).collect(),
            on_complete: Box::new(on_complete),
        }
    }
}

impl fmt::Debug for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interaction")
            .field("prompts", &self.prompts)
            .finish_non_exhaustive()
    }
}

type Invoke = fn(&[String], &mut Context, &CommandTable) -> CommandResult;

/// A registered command.
#[derive(Clone)]
pub struct CommandEntry {
    name: String,
    about: String,
    usage: fn() -> String,
    invoke: Invoke,
}

impl CommandEntry {
    fn of<C: ShellCommand>() -> Self {
        let command = C::command();
        Self {
            name: command.get_name().to_string(),
            about: command
                .get_about()
                .map(|about| about.to_string())
                .unwrap_or_default(),
            usage: usage_of::<C>,
            invoke: invoke::<C>,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn about(&self) -> &str {
        &self.about
    }

    /// Detailed usage text rendered by clap.
    pub fn usage(&self) -> String {
        (self.usage)()
    }
}

impl fmt::Debug for CommandEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandEntry")
            .field("name", &self.name)
            .field("about", &self.about)
            .finish_non_exhaustive()
    }
}

fn usage_of<C: ShellCommand>() -> String {
    C::command().render_help().to_string()
}

fn invoke<C: ShellCommand>(args: &[String], ctx: &mut Context, table: &CommandTable) -> CommandResult {
    let name = C::command().get_name().to_string();
    let command = C::try_parse_from(iter::once(name).chain(args.iter().cloned()))?;
    command.run(ctx, table)
}

/// Name-keyed table of every command the shell knows.
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    commands: BTreeMap<String, CommandEntry>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The commands every session has, plus the debug set when `debug` is set.
    pub fn standard(debug: bool) -> Self {
        let mut table = Self::new();
        table
            .register::<Help>()
            .register::<Pwd>()
            .register::<Ls>()
            .register::<Cd>()
            .register::<Scan>()
            .register::<Connect>()
            .register::<Exit>()
            .register::<Login>()
            .register::<Logout>()
            .register::<Register>()
            .register::<Users>()
            .register::<Clear>()
            .register::<Ofetch>()
            .register::<Echo>()
            .register::<Search>()
            .register::<Browse>()
            .register::<Spin>();

        if debug {
            table
                .register::<Chat>()
                .register::<Quit>()
                .register::<Hack>()
                .register::<InteractiveEcho>();
        }

        table
    }

    /// Register `C` under its clap name. A later registration with the same
    /// name replaces the earlier one.
    pub fn register<C: ShellCommand>(&mut self) -> &mut Self {
        self.insert(CommandEntry::of::<C>())
    }

    pub fn insert(&mut self, entry: CommandEntry) -> &mut Self {
        if let Some(previous) = self.commands.insert(entry.name.clone(), entry) {
            warn!("command '{}' registered twice, keeping the last one", previous.name);
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.commands.get(name)
    }

    /// Registered entries in name order.
    pub fn entries(&self) -> impl Iterator<Item = &CommandEntry> {
        self.commands.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Command names starting with `prefix`, sorted.
    pub fn complete(&self, prefix: &str) -> Vec<&str> {
        self.names().filter(|name| name.starts_with(prefix)).collect()
    }

    /// One `name  about` line per command, sorted by name.
    pub fn help(&self) -> String {
        self.entries()
            .map(|entry| format!("{:10} {}", entry.name, entry.about))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Detailed usage of a single command.
    pub fn help_for(&self, name: &str) -> String {
        match self.get(name) {
            Some(entry) => entry.usage().trim_end().to_string(),
            None => format!("No help exists for '{name}'."),
        }
    }

    /// Tokenize `line` and run the command it names.
    pub fn parse(&self, line: &str, ctx: &mut Context) -> CommandResult {
        let Some((name, args)) = parser::tokenize(line) else {
            return Ok(Reply::empty());
        };
        let entry = self
            .get(name)
            .ok_or_else(|| ShellError::UnknownCommand(name.to_string()))?;

        debug!("dispatch: {} {:?}", name, args);
        (entry.invoke)(&args, ctx, self)
    }
}
