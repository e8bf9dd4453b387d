use verify_api_models::{FileFormat, Operation, ResourceData, ResourceObject};
use verify_client::ResourceClient;

use super::{print_entitlements, with_client};
use crate::cli::CreateArgs;
use crate::client::{AppContext, CliResult};
use crate::output::emit;
use crate::resources::{load_resource, require_file};

pub(crate) async fn handle_create(ctx: &AppContext, args: CreateArgs) -> CliResult<()> {
    if args.entitlements {
        return print_entitlements(args.resource.kind(), Operation::Create);
    }
    with_client!(args.resource, create_resource(ctx, args))
}

async fn create_resource<C: ResourceClient>(
    client: &C,
    ctx: &AppContext,
    args: CreateArgs,
) -> CliResult<()> {
    if args.boilerplate {
        let sample = ResourceObject::wrap(&C::Item::boilerplate())?.render(FileFormat::Yaml)?;
        return emit(&sample, None);
    }
    let path = require_file(args.file.as_deref(), "create")?;
    let item: C::Item = load_resource(path)?;
    let api = ctx.api_context()?;
    let id = client.create(&api, &item).await?;
    tracing::info!(resource = C::label(), %id, "created");
    println!("Created {} '{id}'.", C::label());
    Ok(())
}
