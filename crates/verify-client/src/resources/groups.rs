use async_trait::async_trait;
use serde_json::json;
use verify_api_models::resources::scim::IBM_GROUP_SCHEMA;
use verify_api_models::{Group, ResourceKind, ScimList};

use super::{ResourceClient, fetch_list, single_match};
use crate::context::ApiContext;
use crate::error::ApiResult;
use crate::http::{CONTENT_TYPE_SCIM, HttpRequest};
use crate::params::{ListParams, Page};

const PATCH_OP_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:PatchOp";

/// SCIM groups at `/v2.0/Groups`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Groups;

#[async_trait]
impl ResourceClient for Groups {
    type Item = Group;
    const RESOURCE: ResourceKind = ResourceKind::Group;
    const PATH: &'static [&'static str] = &["v2.0", "Groups"];
    const CONTENT_TYPE: &'static str = CONTENT_TYPE_SCIM;

    fn id_of(item: &Group) -> Option<String> {
        item.id.clone()
    }

    async fn list(&self, ctx: &ApiContext, params: &ListParams) -> ApiResult<Page<Group>> {
        let list: ScimList<Group> =
            fetch_list(ctx, Self::PATH, &params.scim_query(), Self::label()).await?;
        Ok(Page {
            items: list.resources,
            total: Some(list.total_results),
        })
    }

    async fn find_by_name(&self, ctx: &ApiContext, name: &str) -> ApiResult<Group> {
        let params = ListParams::search(format!("displayName eq \"{name}\""));
        let page = self.list(ctx, &params).await?;
        single_match(page.items, Self::label(), |group| {
            group.display_name.eq_ignore_ascii_case(name)
        })
    }

    /// Groups are replaced through a SCIM `PatchOp` that overwrites the
    /// display name, members and IBM extension in one operation.
    async fn replace(&self, ctx: &ApiContext, item: &Group) -> ApiResult<()> {
        let id = self.target_id(ctx, item).await?;
        let mut value = json!({
            "displayName": item.display_name,
            "members": item.members,
        });
        if let Some(extension) = &item.ibm_extension {
            value[IBM_GROUP_SCHEMA] = super::encode(extension, Self::label())?;
        }
        let body = json!({
            "schemas": [PATCH_OP_SCHEMA],
            "Operations": [{ "op": "replace", "value": value }],
        });
        let request = HttpRequest::patch(ctx.item_endpoint(Self::PATH, &id)?)
            .json(Self::CONTENT_TYPE, body);
        ctx.execute(request, Self::label()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::test_support::context_with;
    use anyhow::Result;
    use httpmock::prelude::*;
    use verify_api_models::ResourceData;

    #[tokio::test]
    async fn replace_resolves_name_then_patches() -> Result<()> {
        let server = MockServer::start_async().await;
        let lookup = server.mock(|when, then| {
            when.method(GET)
                .path("/v2.0/Groups")
                .query_param("filter", "displayName eq \"developers\"");
            then.status(200).json_body(json!({
                "totalResults": 1,
                "Resources": [{"id": "g-7", "displayName": "developers"}]
            }));
        });
        let patch = server.mock(|when, then| {
            when.method(PATCH).path("/v2.0/Groups/g-7");
            then.status(204);
        });

        let ctx = context_with(&server)?;
        Groups.replace(&ctx, &Group::boilerplate()).await?;
        lookup.assert();
        patch.assert();
        Ok(())
    }
}
