use verify_api_models::Operation;
use verify_client::{ListParams, ResourceClient};

use super::{locator, print_entitlements, with_client};
use crate::cli::GetArgs;
use crate::client::{AppContext, CliResult};
use crate::output::{emit, render_item, render_list};

pub(crate) async fn handle_get(ctx: &AppContext, args: GetArgs) -> CliResult<()> {
    if args.entitlements {
        return print_entitlements(args.resource.kind(), Operation::Get);
    }
    with_client!(args.resource, get_resource(ctx, args))
}

async fn get_resource<C: ResourceClient>(
    client: &C,
    ctx: &AppContext,
    args: GetArgs,
) -> CliResult<()> {
    let api = ctx.api_context()?;
    let text = match locator(args.name, args.id) {
        Some(locator) => {
            let item = client.get(&api, &locator).await?;
            render_item(&item, args.output)?
        }
        None => {
            let params = ListParams {
                search: args.search,
                sort: args.sort,
                page: args.page,
                limit: args.limit,
            };
            let page = client.list(&api, &params).await?;
            tracing::debug!(count = page.items.len(), total = ?page.total, "listed");
            render_list(&page.items, page.total, args.output)?
        }
    };
    emit(&text, args.outfile.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ResourceArg;
    use crate::client::test_support::{TOKEN, context_with, empty_context};
    use crate::output::OutputFormat;
    use anyhow::Result;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::fs;

    fn args(resource: ResourceArg) -> GetArgs {
        GetArgs {
            resource,
            name: None,
            id: None,
            search: None,
            sort: None,
            page: None,
            limit: None,
            output: OutputFormat::Yaml,
            outfile: None,
            entitlements: false,
        }
    }

    #[tokio::test]
    async fn get_user_by_name_writes_envelope_to_outfile() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v2.0/Users")
                .query_param("filter", "userName eq \"jdoe\"")
                .header("authorization", format!("Bearer {TOKEN}"));
            then.status(200).json_body(json!({
                "totalResults": 1,
                "Resources": [{
                    "id": "u-1",
                    "userName": "jdoe",
                    "emails": [{"value": "jdoe@example.com"}]
                }]
            }));
        });

        let (dir, ctx) = context_with(&server)?;
        let outfile = dir.path().join("user.yaml");
        let mut args = args(ResourceArg::User);
        args.name = Some("jdoe".into());
        args.outfile = Some(outfile.clone());

        handle_get(&ctx, args).await.map_err(|err| anyhow::anyhow!(err.display_message()))?;

        mock.assert();
        let text = fs::read_to_string(&outfile)?;
        assert!(text.contains("kind: IBMVerifyUser"));
        assert!(text.contains("userName: jdoe"));
        Ok(())
    }

    #[tokio::test]
    async fn get_without_identifier_lists_api_clients() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1.0/apiclients")
                .query_param("search", "clientName = \"ci\"")
                .query_param("limit", "5");
            then.status(200).json_body(json!({
                "total": 1,
                "apiClients": [{"id": "c-1", "clientName": "ci", "entitlements": ["manageUsers"]}]
            }));
        });

        let (dir, ctx) = context_with(&server)?;
        let outfile = dir.path().join("clients.json");
        let mut args = args(ResourceArg::ApiClient);
        args.search = Some("clientName = \"ci\"".into());
        args.limit = Some(5);
        args.output = OutputFormat::Json;
        args.outfile = Some(outfile.clone());

        handle_get(&ctx, args).await.map_err(|err| anyhow::anyhow!(err.display_message()))?;

        mock.assert();
        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&outfile)?)?;
        assert_eq!(value["kind"], "List");
        assert_eq!(value["items"][0]["kind"], "IBMVerifyAPIClient");
        Ok(())
    }

    #[tokio::test]
    async fn rejected_token_asks_for_login() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/v1.0/applications");
            then.status(401).body("{}");
        });

        let (_dir, ctx) = context_with(&server)?;
        let message = handle_get(&ctx, args(ResourceArg::Application))
            .await
            .err()
            .map(|err| err.display_message())
            .unwrap_or_default();
        assert!(message.starts_with("Login again."), "{message}");
        Ok(())
    }

    #[tokio::test]
    async fn entitlements_need_no_login() -> Result<()> {
        let (_dir, ctx) = empty_context()?;
        let mut args = args(ResourceArg::Theme);
        args.entitlements = true;
        handle_get(&ctx, args).await.map_err(|err| anyhow::anyhow!(err.display_message()))?;
        Ok(())
    }
}
