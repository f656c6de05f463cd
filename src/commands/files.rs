use clap::Parser;

use super::{CommandResult, CommandTable, Reply, ShellCommand};
use crate::context::Context;

static LONG_HEADER: &str = "[bold italic]type       size    name[/]";

/// Print working directory.
#[derive(Debug, Parser)]
#[command(name = "pwd", disable_help_flag = true)]
pub struct Pwd {}

impl ShellCommand for Pwd {
    fn run(self, ctx: &mut Context, _table: &CommandTable) -> CommandResult {
        Ok(Reply::output(ctx.file_system().pwd()))
    }
}

/// List files and directories.
#[derive(Debug, Parser)]
#[command(name = "ls", disable_help_flag = true)]
pub struct Ls {
    /// Format as list
    #[arg(short = 'l')]
    long: bool,

    /// Show dot-prefixed files and directories
    #[arg(short, long)]
    all: bool,
}

impl ShellCommand for Ls {
    fn run(self, ctx: &mut Context, _table: &CommandTable) -> CommandResult {
        let listing = ctx.file_system().ls(self.long, self.all);
        let entries: Vec<String> = listing
            .directories
            .into_iter()
            .chain(listing.files)
            .flatten()
            .collect();

        if entries.is_empty() {
            return Ok(Reply::empty());
        }

        Ok(Reply::output(if self.long {
            format!("{LONG_HEADER}\n{}", entries.join("\n"))
        } else {
            entries.join(" ")
        }))
    }
}

/// Change directory to PATH.
#[derive(Debug, Parser)]
#[command(name = "cd", disable_help_flag = true)]
pub struct Cd {
    #[arg(default_value = "")]
    path: String,
}

impl ShellCommand for Cd {
    fn run(self, ctx: &mut Context, _table: &CommandTable) -> CommandResult {
        ctx.file_system_mut().cd(&self.path)?;
        Ok(Reply::empty())
    }
}
