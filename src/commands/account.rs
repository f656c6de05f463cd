use clap::Parser;
use tracing::{info, warn};

use super::{CommandResult, CommandTable, Interaction, Reply, ShellCommand};
use crate::{
    context::{Context, Effect},
    error::ShellError,
};

static LOGOUT_PROMPT: &str = "Do you want to log out? (y/N) ";

/// Log out and save data.
#[derive(Debug, Parser)]
#[command(name = "logout", disable_help_flag = true)]
pub struct Logout {
    /// Skip confirmation
    #[arg(short, long)]
    yes: bool,
}

impl ShellCommand for Logout {
    fn run(self, ctx: &mut Context, _table: &CommandTable) -> CommandResult {
        logout(ctx, self.yes)
    }
}

/// Log out right away with `yes`, otherwise ask first.
pub(super) fn logout(ctx: &mut Context, yes: bool) -> CommandResult {
    if yes {
        finish_logout(ctx)?;
        return Ok(Reply::empty());
    }

    Ok(Reply::Ask(Interaction::new(
        [LOGOUT_PROMPT],
        |ctx: &mut Context, answers: Vec<String>| {
            let confirmed = answers
                .first()
                .is_some_and(|answer| matches!(answer.to_lowercase().as_str(), "y" | "yes"));
            if confirmed {
                finish_logout(ctx)?;
            }
            Ok(None)
        },
    )))
}

fn finish_logout(ctx: &mut Context) -> Result<(), ShellError> {
    if let Some(save) = &ctx.player {
        ctx.saves.write(save)?;
    }
    info!("logging out {}", ctx.player_name());
    ctx.request(Effect::Logout);
    Ok(())
}

/// Login to the computer.
#[derive(Debug, Parser)]
#[command(name = "login", disable_help_flag = true)]
pub struct Login {}

impl ShellCommand for Login {
    fn run(self, _ctx: &mut Context, _table: &CommandTable) -> CommandResult {
        Ok(Reply::Ask(Interaction::new(
            ["user: ", "password: "],
            |ctx: &mut Context, answers: Vec<String>| {
                let [user, password] = answers.as_slice() else {
                    return Ok(None);
                };

                match ctx.saves.find(user) {
                    Ok(Some(save)) if &save.password == password => {
                        info!("player {} logged in", save.username);
                        ctx.player = Some(save);
                        return Ok(Some("Successfully logged in!".into()));
                    }
                    Ok(_) => {}
                    // the device account still works without a readable store
                    Err(e) => warn!("could not look up profile '{}': {}", user, e),
                }

                let device = ctx.network.current_device();
                if &device.username == user && &device.password == password {
                    info!("logged in to {} as {}", device.name, user);
                    return Ok(Some("Successfully logged in!".into()));
                }

                Ok(Some("Wrong username or password.".into()))
            },
        )))
    }
}

/// Create a new user.
#[derive(Debug, Parser)]
#[command(name = "register", disable_help_flag = true)]
pub struct Register {}

impl ShellCommand for Register {
    fn run(self, _ctx: &mut Context, _table: &CommandTable) -> CommandResult {
        Ok(Reply::Ask(Interaction::new(
            ["username: ", "password: "],
            |ctx: &mut Context, answers: Vec<String>| {
                let [username, password] = answers.as_slice() else {
                    return Ok(None);
                };
                let save = ctx.saves.create_account(username, password)?;
                Ok(Some(format!("Created user '{}'.", save.username)))
            },
        )))
    }
}

/// List existing users.
#[derive(Debug, Parser)]
#[command(name = "users", disable_help_flag = true)]
pub struct Users {}

impl ShellCommand for Users {
    fn run(self, ctx: &mut Context, _table: &CommandTable) -> CommandResult {
        let saves = ctx.saves.newest_saves()?;
        if saves.is_empty() {
            return Ok(Reply::output("No users found."));
        }

        let names: Vec<&str> = saves.keys().map(String::as_str).collect();
        Ok(Reply::output(names.join("\n")))
    }
}
