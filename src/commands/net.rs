use clap::Parser;

use super::{account, CommandResult, CommandTable, Reply, ShellCommand};
use crate::{context::Context, device::NetAddress, error::ShellError};

/// Scan for connected computers.
#[derive(Debug, Parser)]
#[command(name = "scan", disable_help_flag = true)]
pub struct Scan {}

impl ShellCommand for Scan {
    fn run(self, ctx: &mut Context, _table: &CommandTable) -> CommandResult {
        let neighbours = ctx.network.scan();
        if neighbours.is_empty() {
            return Ok(Reply::output("No connected devices found."));
        }

        let lines: Vec<String> = neighbours.iter().map(NetAddress::to_string).collect();
        Ok(Reply::output(lines.join("\n")))
    }
}

/// Connect to the computer at ADDRESS.
#[derive(Debug, Parser)]
#[command(name = "connect", disable_help_flag = true)]
pub struct Connect {
    address: String,
}

impl ShellCommand for Connect {
    fn run(self, ctx: &mut Context, _table: &CommandTable) -> CommandResult {
        let address: NetAddress = self.address.parse()?;
        if !ctx.network.connect(address) {
            return Err(ShellError::Failed(format!("No device found at {address}.")));
        }

        let name = &ctx.network.current_device().name;
        Ok(Reply::output(format!("Connected to {name} ({address}).")))
    }
}

/// Exit the current computer.
#[derive(Debug, Parser)]
#[command(name = "exit", disable_help_flag = true)]
pub struct Exit {
    /// Skip confirmation when logging out
    #[arg(short, long)]
    yes: bool,
}

impl ShellCommand for Exit {
    fn run(self, ctx: &mut Context, _table: &CommandTable) -> CommandResult {
        if ctx.network.is_home() {
            return account::logout(ctx, self.yes);
        }

        let name = ctx.network.current_device().name.clone();
        ctx.network.disconnect();
        Ok(Reply::output(format!("Disconnected from {name}.")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{context::Effect, network::Network, save::SaveStore};

    fn context() -> Context {
        Context::new(Network::world(), SaveStore::new("unused"))
    }

    fn output(reply: CommandResult) -> Option<String> {
        match reply {
            Ok(Reply::Done(output)) => output,
            other => panic!("expected finished command, got {other:?}"),
        }
    }

    #[test]
    fn test_scan_lists_neighbour_addresses() {
        let table = CommandTable::standard(false);
        let mut ctx = context();

        assert_eq!(
            output(table.parse("scan", &mut ctx)).as_deref(),
            Some("00.00.00.00.00.00.30.39")
        );
    }

    #[test]
    fn test_scan_without_neighbours() {
        let table = CommandTable::standard(false);
        let mut ctx = Context::new(
            Network::new(crate::device::Device::oracle()),
            SaveStore::new("unused"),
        );

        assert_eq!(
            output(table.parse("scan", &mut ctx)).as_deref(),
            Some("No connected devices found.")
        );
    }

    #[test]
    fn test_connect_then_exit_returns_home() {
        // Arrange
        let table = CommandTable::standard(false);
        let mut ctx = context();

        // Act
        let connected = output(table.parse("connect 0.0.0.0.0.0.30.39", &mut ctx));

        // Assert
        assert_eq!(
            connected.as_deref(),
            Some("Connected to zer0's server (00.00.00.00.00.00.30.39).")
        );
        assert_eq!(ctx.network.current(), NetAddress::new(12345));

        let exited = output(table.parse("exit", &mut ctx));
        assert_eq!(exited.as_deref(), Some("Disconnected from zer0's server."));
        assert!(ctx.network.is_home());
        assert!(ctx.take_effects().is_empty());
    }

    #[test]
    fn test_connect_to_unknown_address_stays() {
        let table = CommandTable::standard(false);
        let mut ctx = context();

        let err = table
            .parse("connect 00.00.00.00.00.00.00.01", &mut ctx)
            .unwrap_err();

        assert_eq!(err.to_string(), "No device found at 00.00.00.00.00.00.00.01.");
        assert!(ctx.network.is_home());
    }

    #[test]
    fn test_connect_rejects_malformed_address() {
        let table = CommandTable::standard(false);
        let mut ctx = context();

        let err = table.parse("connect 00.zz", &mut ctx).unwrap_err();

        assert!(matches!(err, ShellError::Address(_)));
        assert!(err.to_string().starts_with("invalid network address '00.zz'"));
    }

    #[test]
    fn test_exit_at_home_logs_out() {
        let table = CommandTable::standard(false);
        let mut ctx = context();

        assert!(matches!(table.parse("exit", &mut ctx), Ok(Reply::Ask(_))));
        assert_eq!(output(table.parse("exit -y", &mut ctx)), None);
        assert_eq!(ctx.take_effects(), vec![Effect::Logout]);
    }
}
