use crate::cli::SetTenantArgs;
use crate::client::{AppContext, CliError, CliResult};

/// Make an already authenticated tenant current.
pub(crate) fn handle_set_tenant(ctx: &AppContext, args: &SetTenantArgs) -> CliResult<()> {
    let tenant = args.tenant.trim();
    let mut config = ctx.store.load()?;
    if config.auth_for(tenant).is_none() {
        return Err(CliError::validation(format!(
            "tenant '{tenant}' is not configured; run `verifyctl auth {tenant}` first"
        )));
    }
    config.set_current(tenant);
    ctx.store.save(&config)?;
    tracing::info!(tenant, "current tenant changed");
    println!("Current tenant is now {tenant}.");
    Ok(())
}
