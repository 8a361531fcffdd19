//! `apiary create` — provision and launch a new tenant bot instance.
//!
//! This is the front end of the provisioning transaction: it assembles a
//! validated [`InstanceRequest`] from the CLI arguments and hands it to the
//! orchestrator. The orchestrator never sees a loosely-typed bag of fields.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ProgressReporter;
use crate::application::services::provision::{self, ProvisionOutcome};
use crate::domain::instance::{InstanceRequest, PlacementParams};
use crate::output::{SpinnerReporter, json};

/// Arguments for the create command.
#[derive(Args)]
pub struct CreateArgs {
    /// Tenant whose credit balance pays for the instance
    #[arg(long)]
    pub tenant: String,

    /// Unique instance name (lowercase alphanumeric, '-' and '_')
    #[arg(long)]
    pub name: String,

    /// Named runtime under $APIARY_HOME/runtimes that runs the instance
    #[arg(long)]
    pub runtime: String,

    /// Gateway credential for the instance (validated before launch)
    #[arg(long, env = "APIARY_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Role granted access to the instance
    #[arg(long)]
    pub access_role: String,

    /// Role denied access to the instance
    #[arg(long)]
    pub non_role: String,

    #[arg(long)]
    pub sell_accounts_category: String,

    #[arg(long)]
    pub buy_accounts_category: String,

    #[arg(long)]
    pub middleman_category: String,

    #[arg(long)]
    pub profile_sell_category: String,

    #[arg(long)]
    pub profile_buy_category: String,

    #[arg(long)]
    pub mfa_category: String,

    #[arg(long)]
    pub coin_category: String,

    #[arg(long)]
    pub accounts_category: String,

    #[arg(long)]
    pub profiles_category: String,

    #[arg(long)]
    pub bedwars_category: String,

    /// Channel receiving ticket logs
    #[arg(long)]
    pub ticket_logs_channel: String,

    /// Buy-side coin price
    #[arg(long)]
    pub coin_price_buy: String,

    /// Sell-side coin price
    #[arg(long)]
    pub coin_price_sell: String,

    /// Enable the membership feature
    #[arg(long)]
    pub allow_membership: bool,

    /// Membership price
    #[arg(long, default_value = "")]
    pub membership_price: String,

    /// Membership fee
    #[arg(long, default_value = "")]
    pub membership_fee: String,
}

impl CreateArgs {
    fn to_request(&self) -> InstanceRequest {
        InstanceRequest {
            tenant_id: self.tenant.clone(),
            name: self.name.clone(),
            runtime: self.runtime.clone(),
            credential: self.token.clone(),
            placement: PlacementParams {
                access_role: self.access_role.clone(),
                non_role: self.non_role.clone(),
                sell_accounts_category: self.sell_accounts_category.clone(),
                buy_accounts_category: self.buy_accounts_category.clone(),
                middleman_category: self.middleman_category.clone(),
                profile_sell_category: self.profile_sell_category.clone(),
                profile_buy_category: self.profile_buy_category.clone(),
                mfa_category: self.mfa_category.clone(),
                coin_category: self.coin_category.clone(),
                accounts_category: self.accounts_category.clone(),
                profiles_category: self.profiles_category.clone(),
                bedwars_category: self.bedwars_category.clone(),
                ticket_logs_channel: self.ticket_logs_channel.clone(),
                coin_price_buy: self.coin_price_buy.clone(),
                coin_price_sell: self.coin_price_sell.clone(),
                allow_membership: self.allow_membership,
                membership_price: self.membership_price.clone(),
                membership_fee: self.membership_fee.clone(),
            },
        }
    }
}

/// Run `apiary create`.
///
/// # Errors
///
/// Returns an error when the provisioning transaction fails, after the
/// reason-tagged outcome has been rendered.
pub async fn run(args: &CreateArgs, app: &AppContext) -> Result<()> {
    let request = args.to_request();

    let outcome = if app.output.show_progress() {
        let reporter = SpinnerReporter::new();
        provision_with(app, &request, &reporter).await
    } else {
        let reporter = app.terminal_reporter();
        provision_with(app, &request, &reporter).await
    };

    match outcome {
        ProvisionOutcome::Committed {
            instance_dir,
            pid,
            remaining_balance,
        } => {
            if app.is_json() {
                println!(
                    "{}",
                    serde_json::json!({
                        "status": "committed",
                        "instance": request.name,
                        "instance_dir": instance_dir,
                        "pid": pid,
                        "remaining_balance": remaining_balance,
                    })
                );
            } else {
                app.output
                    .success(&format!("Instance '{}' is running (pid {pid}).", request.name));
                app.output.kv("Directory", &instance_dir.display().to_string());
                app.output.kv("Credits left", &remaining_balance.to_string());
            }
            Ok(())
        }
        ProvisionOutcome::Failed { reason, message } => {
            if app.is_json() {
                println!("{}", json::format_error(&message, reason.code())?);
            } else {
                app.output.error(&message);
            }
            anyhow::bail!("provisioning failed ({})", reason.code())
        }
    }
}

async fn provision_with(
    app: &AppContext,
    request: &InstanceRequest,
    reporter: &impl ProgressReporter,
) -> ProvisionOutcome {
    provision::provision_instance(
        &app.ledger,
        &app.materializer,
        &app.emitter,
        &app.validator,
        &app.launcher,
        reporter,
        request,
    )
    .await
}
