use clap::Parser;

use super::{CommandResult, CommandTable, Reply, ShellCommand};
use crate::context::{Context, Effect};

/// Show help for COMMAND or list all commands without COMMAND.
#[derive(Debug, Parser)]
#[command(name = "help", disable_help_flag = true)]
pub struct Help {
    command: Option<String>,
}

impl ShellCommand for Help {
    fn run(self, _ctx: &mut Context, table: &CommandTable) -> CommandResult {
        Ok(Reply::output(match self.command {
            Some(name) => table.help_for(&name),
            None => table.help(),
        }))
    }
}

/// Clear the terminal.
#[derive(Debug, Parser)]
#[command(name = "clear", disable_help_flag = true)]
pub struct Clear {}

impl ShellCommand for Clear {
    fn run(self, ctx: &mut Context, _table: &CommandTable) -> CommandResult {
        ctx.request(Effect::ClearScreen);
        Ok(Reply::empty())
    }
}

const LOGO: [&str; 8] = [
    r" [$primary]$$$$$$$$$[/]\    ",
    r" [$primary]$$[/]  ___[$primary]$$[/] |   ",
    r" [$primary]$$[/] |   [$primary]$$[/] |   ",
    r" [$primary]$$[/] |   [$primary]$$[/] |   ",
    r" [$primary]$$[/] |   [$primary]$$[/] |   ",
    r" [$primary]$$[/] |   [$primary]$$[/] |   ",
    r" [$primary]$$$$$$$$$[/] |   ",
    r" \_________|   ",
];

/// Display system information.
#[derive(Debug, Parser)]
#[command(name = "ofetch", disable_help_flag = true)]
pub struct Ofetch {}

impl ShellCommand for Ofetch {
    fn run(self, ctx: &mut Context, _table: &CommandTable) -> CommandResult {
        let device = ctx.network.current_device();
        let title = format!("{}@{}", device.username, device.name);

        let mut info = vec![
            format!("[$primary]{title}[/]"),
            "-".repeat(title.chars().count()),
        ];
        info.extend(
            device
                .sysinfo()
                .into_iter()
                .map(|(key, value)| format!("[$primary]{key}[/]: {value}")),
        );

        let lines: Vec<String> = LOGO
            .iter()
            .zip(info.iter().map(String::as_str).chain(std::iter::repeat("")))
            .map(|(logo, info)| format!("{logo}{info}").trim_end().to_string())
            .collect();
        Ok(Reply::output(lines.join("\n")))
    }
}

/// Just echoes input.
#[derive(Debug, Parser)]
#[command(name = "echo", disable_help_flag = true)]
pub struct Echo {
    text: String,

    /// Upper-case the text
    #[arg(short, long)]
    upper: bool,
}

impl ShellCommand for Echo {
    fn run(self, _ctx: &mut Context, _table: &CommandTable) -> CommandResult {
        Ok(Reply::output(if self.upper {
            self.text.to_uppercase()
        } else {
            self.text
        }))
    }
}
