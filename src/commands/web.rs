use clap::Parser;
use tracing::debug;

use super::{CommandResult, CommandTable, Reply, ShellCommand};
use crate::{context::Context, error::ShellError, websites};

/// Search the web.
#[derive(Debug, Parser)]
#[command(name = "search", disable_help_flag = true)]
pub struct Search {
    /// Keywords to look for
    #[arg(required = true)]
    terms: Vec<String>,
}

impl ShellCommand for Search {
    fn run(self, _ctx: &mut Context, _table: &CommandTable) -> CommandResult {
        let results = websites::search(&self.terms.join(" "));
        debug!("search {:?}: {} results", self.terms, results.len());
        if results.is_empty() {
            return Ok(Reply::output("No results found :("));
        }

        let links: Vec<String> = results.iter().map(|site| site.link()).collect();
        Ok(Reply::output(links.join("\n").trim_end()))
    }
}

/// Open a website.
#[derive(Debug, Parser)]
#[command(name = "browse", disable_help_flag = true)]
pub struct Browse {
    /// Website id or domain, e.g. slot_machine.net
    address: String,
}

impl ShellCommand for Browse {
    fn run(self, _ctx: &mut Context, _table: &CommandTable) -> CommandResult {
        let site =
            websites::find(&self.address).ok_or(ShellError::NoSuchWebsite(self.address))?;
        Ok(Reply::output(site.page()))
    }
}

/// Spin the Mega Jackpot slot machine.
#[derive(Debug, Parser)]
#[command(name = "spin", disable_help_flag = true)]
pub struct Spin {}

impl ShellCommand for Spin {
    fn run(self, ctx: &mut Context, _table: &CommandTable) -> CommandResult {
        let reels = websites::spin(&mut ctx.rng);
        Ok(Reply::output(format!("[bold]{}[/]", reels.join(" "))))
    }
}
