//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags};
use crate::commands;

/// Credit-gated provisioning for tenant bot instances
#[derive(Parser)]
#[command(
    name = "apiary",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Skip interactive prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Provision and launch a new bot instance
    Create(commands::create::CreateArgs),

    /// Inspect and top up tenant credit balances
    #[command(subcommand)]
    Credits(commands::credits::CreditsCommand),

    /// List provisioned instances
    List,

    /// Remove a provisioned instance directory
    Destroy(commands::destroy::DestroyArgs),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            json,
            quiet,
            no_color,
            yes,
            command,
        } = self;
        let flags = AppFlags {
            json,
            quiet,
            no_color,
            yes,
        };
        match command {
            Command::Version => {
                commands::version::run(json);
                Ok(())
            }
            Command::Create(args) => commands::create::run(&args, &AppContext::new(&flags)?).await,
            Command::Credits(cmd) => commands::credits::run(cmd, &AppContext::new(&flags)?).await,
            Command::List => commands::list::run(&AppContext::new(&flags)?).await,
            Command::Destroy(args) => commands::destroy::run(&args, &AppContext::new(&flags)?).await,
        }
    }
}
