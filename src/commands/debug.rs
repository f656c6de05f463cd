//! Commands only registered when the game runs with `--debug`.

use clap::Parser;

use super::{CommandResult, CommandTable, Interaction, Reply, ShellCommand};
use crate::context::{ChatMessage, Context, Effect};

/// Do a chat test with AMOUNT messages.
#[derive(Debug, Parser)]
#[command(name = "chat", disable_help_flag = true)]
pub struct Chat {
    amount: u32,
}

impl ShellCommand for Chat {
    fn run(self, ctx: &mut Context, _table: &CommandTable) -> CommandResult {
        for i in 0..self.amount {
            ctx.post_message(ChatMessage::new(
                "zer0",
                format!("{i} Lorem ipsum, dolor sit amet."),
            ));
        }
        Ok(Reply::output(format!("sent {} test messages", self.amount)))
    }
}

/// Quit the game.
#[derive(Debug, Parser)]
#[command(name = "quit", disable_help_flag = true)]
pub struct Quit {}

impl ShellCommand for Quit {
    fn run(self, ctx: &mut Context, _table: &CommandTable) -> CommandResult {
        ctx.request(Effect::Quit);
        Ok(Reply::empty())
    }
}

/// Hacking minigame test.
#[derive(Debug, Parser)]
#[command(name = "hack", disable_help_flag = true)]
pub struct Hack {}

impl ShellCommand for Hack {
    fn run(self, _ctx: &mut Context, _table: &CommandTable) -> CommandResult {
        let row = "0 1 2 [@click=app.link('slot_machine')]3[/] 4 5 6 7 8 9";
        Ok(Reply::output(vec![row; 7].join("\n")))
    }
}

/// Echo input.
#[derive(Debug, Parser)]
#[command(name = "echo", disable_help_flag = true)]
pub struct InteractiveEcho {}

impl ShellCommand for InteractiveEcho {
    fn run(self, _ctx: &mut Context, _table: &CommandTable) -> CommandResult {
        Ok(Reply::Ask(Interaction::new(
            ["echo> "],
            |_ctx: &mut Context, answers: Vec<String>| Ok(answers.into_iter().next()),
        )))
    }
}
