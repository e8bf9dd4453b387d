use verify_api_models::Operation;
use verify_client::ResourceClient;

use super::{print_entitlements, require_locator, with_client};
use crate::cli::DeleteArgs;
use crate::client::{AppContext, CliResult};

pub(crate) async fn handle_delete(ctx: &AppContext, args: DeleteArgs) -> CliResult<()> {
    if args.entitlements {
        return print_entitlements(args.resource.kind(), Operation::Delete);
    }
    with_client!(args.resource, delete_resource(ctx, args))
}

async fn delete_resource<C: ResourceClient>(
    client: &C,
    ctx: &AppContext,
    args: DeleteArgs,
) -> CliResult<()> {
    let locator = require_locator(args.name, args.id, "delete")?;
    let api = ctx.api_context()?;
    client.delete(&api, &locator).await?;
    tracing::info!(resource = C::label(), ?locator, "deleted");
    println!("Deleted {}.", C::label());
    Ok(())
}
