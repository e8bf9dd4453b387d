use verify_api_models::Operation;
use verify_client::ResourceClient;

use super::{print_entitlements, with_client};
use crate::cli::ReplaceArgs;
use crate::client::{AppContext, CliResult};
use crate::resources::{load_resource, require_file};

pub(crate) async fn handle_replace(ctx: &AppContext, args: ReplaceArgs) -> CliResult<()> {
    if args.entitlements {
        return print_entitlements(args.resource.kind(), Operation::Replace);
    }
    with_client!(args.resource, replace_resource(ctx, args))
}

async fn replace_resource<C: ResourceClient>(
    client: &C,
    ctx: &AppContext,
    args: ReplaceArgs,
) -> CliResult<()> {
    let path = require_file(args.file.as_deref(), "replace")?;
    let item: C::Item = load_resource(path)?;
    let api = ctx.api_context()?;
    client.replace(&api, &item).await?;
    tracing::info!(resource = C::label(), "replaced");
    println!("Replaced {}.", C::label());
    Ok(())
}
