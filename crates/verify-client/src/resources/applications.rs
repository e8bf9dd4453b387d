use async_trait::async_trait;
use verify_api_models::{Application, ApplicationList, ResourceKind};

use super::{ResourceClient, fetch_list, single_match};
use crate::context::ApiContext;
use crate::error::ApiResult;
use crate::params::{ListParams, Page};

/// Applications at `/v1.0/applications`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Applications;

#[async_trait]
impl ResourceClient for Applications {
    type Item = Application;
    const RESOURCE: ResourceKind = ResourceKind::Application;
    const PATH: &'static [&'static str] = &["v1.0", "applications"];

    fn id_of(item: &Application) -> Option<String> {
        item.id().map(str::to_string)
    }

    async fn list(&self, ctx: &ApiContext, params: &ListParams) -> ApiResult<Page<Application>> {
        let list: ApplicationList =
            fetch_list(ctx, Self::PATH, &params.query(), Self::label()).await?;
        Ok(Page {
            items: list.embedded.applications,
            total: list.total_count,
        })
    }

    async fn find_by_name(&self, ctx: &ApiContext, name: &str) -> ApiResult<Application> {
        let params = ListParams::search(format!("name = \"{name}\""));
        let page = self.list(ctx, &params).await?;
        single_match(page.items, Self::label(), |app| app.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Locator;
    use crate::resources::test_support::context_with;
    use anyhow::Result;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn embedded_list_is_unwrapped_and_id_comes_from_links() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET)
                .path("/v1.0/applications")
                .query_param("search", "name = \"Expense portal\"");
            then.status(200).json_body(json!({
                "totalCount": 1,
                "_embedded": {"applications": [{
                    "name": "Expense portal",
                    "templateId": "1",
                    "_links": {"self": {"href": "/v1.0/applications/9001"}}
                }]}
            }));
        });
        let delete = server.mock(|when, then| {
            when.method(DELETE).path("/v1.0/applications/9001");
            then.status(204);
        });

        let ctx = context_with(&server)?;
        Applications
            .delete(&ctx, &Locator::Name("Expense portal".into()))
            .await?;
        delete.assert();
        Ok(())
    }
}
