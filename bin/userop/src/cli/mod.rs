use crate::utils::run_until_ctrl_c;
use clap::{value_parser, Parser, Subcommand};

pub mod args;
pub mod commands;

/// The main userop CLI interface
#[derive(Debug, Parser)]
#[command(author, version, about = "userop", long_about = None)]
pub struct Cli {
    /// The command to execute
    #[clap(subcommand)]
    command: Commands,

    /// The verbosity level
    #[clap(long, short, global = true, default_value_t = 2, value_parser = value_parser!(u8).range(..=4))]
    verbosity: u8,
}

impl Cli {
    /// Get the log level based on the verbosity level
    pub fn get_log_level(&self) -> String {
        match self.verbosity {
            0 => "error",
            1 => "warn",
            2 => "info",
            3 => "debug",
            _ => "trace",
        }
        .into()
    }
}

/// Commands to be executed
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build a user operation and print it without sending it
    #[command(name = "build")]
    Build(Box<commands::BuildCommand>),

    /// Build a user operation and send it to the bundler
    #[command(name = "send")]
    Send(Box<commands::SendCommand>),

    /// Look up the receipt of a user operation
    #[command(name = "receipt")]
    Receipt(commands::ReceiptCommand),

    /// List the entry points supported by the bundler
    #[command(name = "entry-points")]
    EntryPoints(commands::EntryPointsCommand),
}

impl Commands {
    async fn execute(self) -> eyre::Result<()> {
        match self {
            Commands::Build(command) => command.execute().await,
            Commands::Send(command) => command.execute().await,
            Commands::Receipt(command) => command.execute().await,
            Commands::EntryPoints(command) => command.execute().await,
        }
    }
}

pub fn run() -> eyre::Result<()> {
    let cli = Cli::parse();

    // covers the userop-* crates as well, filter targets are matched by prefix
    let rust_log = match std::env::var("RUST_LOG") {
        Ok(val) => format!("{val},userop={}", cli.get_log_level()),
        Err(_) => format!("userop={}", cli.get_log_level()),
    };
    std::env::set_var("RUST_LOG", rust_log);
    tracing_subscriber::fmt::init();

    let rt = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    rt.block_on(run_until_ctrl_c(cli.command.execute()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_commands() {
        let cli = Cli::try_parse_from([
            "userop",
            "send",
            "--sender",
            "0x690B9A9E9aa1C9dB991C7721a92d351Db4FaC990",
            "--dry-run",
            "-v",
            "3",
        ])
        .unwrap();
        assert_eq!(cli.get_log_level(), "debug");
        match cli.command {
            Commands::Send(command) => {
                assert!(command.dry_run);
                assert!(command.middleware.private_key.is_none());
                assert_eq!(command.client.bundler_rpc, None);
            }
            _ => panic!("expected send command"),
        }

        let cli = Cli::try_parse_from(["userop", "entry-points"]).unwrap();
        assert_eq!(cli.get_log_level(), "info");
        assert!(matches!(cli.command, Commands::EntryPoints(_)));
    }

    #[test]
    fn reject_invalid_args() {
        // verbosity out of range
        assert!(Cli::try_parse_from(["userop", "entry-points", "-v", "5"]).is_err());
        // waiting on a dry run
        assert!(Cli::try_parse_from([
            "userop",
            "send",
            "--sender",
            "0x690B9A9E9aa1C9dB991C7721a92d351Db4FaC990",
            "--dry-run",
            "--wait-receipt",
        ])
        .is_err());
        assert!(Cli::try_parse_from(["userop", "receipt", "0x1234"]).is_err());
    }
}
