//! `apiary destroy` — remove a provisioned instance directory.
//!
//! Only the filesystem is touched: a process launched from the directory is
//! not stopped, and no credit is refunded.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::TemplateMaterializer;
use crate::domain::instance::validate_instance_name;
use crate::infra::paths;

/// Arguments for the destroy command.
#[derive(Args)]
pub struct DestroyArgs {
    /// Instance name to remove
    pub name: String,
}

/// Run `apiary destroy`.
///
/// # Errors
///
/// Returns an error if the name is invalid or removal fails.
pub async fn run(args: &DestroyArgs, app: &AppContext) -> Result<()> {
    validate_instance_name(&args.name)?;
    let dir = paths::instances_dir()?.join(&args.name);

    if !dir.exists() {
        app.output
            .info(&format!("Instance '{}' does not exist. Nothing to remove.", args.name));
        return Ok(());
    }

    if !app.confirm(&format!("Remove instance '{}'?", args.name), true)? {
        app.output.info("Aborted.");
        return Ok(());
    }

    app.materializer.destroy(&dir).await?;
    app.output
        .success(&format!("Instance '{}' removed.", args.name));
    Ok(())
}
