//! `apiary credits` — inspect and top up tenant credit balances.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::app::AppContext;
use crate::application::ports::CreditLedger;

#[derive(Subcommand)]
pub enum CreditsCommand {
    /// Show a tenant's balance
    Get(TenantArgs),
    /// Add credits to a tenant's balance
    Grant(GrantArgs),
}

/// Arguments selecting a tenant.
#[derive(Args)]
pub struct TenantArgs {
    /// Tenant identifier
    #[arg(long)]
    pub tenant: String,
}

/// Arguments for granting credits.
#[derive(Args)]
pub struct GrantArgs {
    /// Tenant identifier
    #[arg(long)]
    pub tenant: String,

    /// Number of credits to add
    #[arg(long)]
    pub amount: u64,
}

/// Run `apiary credits`.
///
/// # Errors
///
/// Returns an error if the ledger cannot be read or written.
pub async fn run(cmd: CreditsCommand, app: &AppContext) -> Result<()> {
    match cmd {
        CreditsCommand::Get(args) => {
            let balance = app.ledger.balance(&args.tenant).await?;
            if app.is_json() {
                println!(
                    "{}",
                    serde_json::json!({ "tenant": args.tenant, "balance": balance })
                );
            } else {
                println!("{balance}");
            }
        }
        CreditsCommand::Grant(args) => {
            let balance = app.ledger.deposit(&args.tenant, args.amount).await?;
            if app.is_json() {
                println!(
                    "{}",
                    serde_json::json!({ "tenant": args.tenant, "balance": balance })
                );
            } else {
                app.output.success(&format!(
                    "Granted {} credit(s) to '{}'. Balance: {balance}",
                    args.amount, args.tenant
                ));
            }
        }
    }
    Ok(())
}
