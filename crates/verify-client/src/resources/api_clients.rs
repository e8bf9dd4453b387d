use async_trait::async_trait;
use verify_api_models::{ApiClient, ApiClientList, ResourceKind};

use super::{ResourceClient, fetch_list, single_match};
use crate::context::ApiContext;
use crate::error::ApiResult;
use crate::params::{ListParams, Page};

/// API clients at `/v1.0/apiclients`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiClients;

#[async_trait]
impl ResourceClient for ApiClients {
    type Item = ApiClient;
    const RESOURCE: ResourceKind = ResourceKind::ApiClient;
    const PATH: &'static [&'static str] = &["v1.0", "apiclients"];

    fn id_of(item: &ApiClient) -> Option<String> {
        item.id.clone()
    }

    async fn list(&self, ctx: &ApiContext, params: &ListParams) -> ApiResult<Page<ApiClient>> {
        let list: ApiClientList =
            fetch_list(ctx, Self::PATH, &params.query(), Self::label()).await?;
        Ok(Page {
            items: list.api_clients,
            total: list.total,
        })
    }

    async fn find_by_name(&self, ctx: &ApiContext, name: &str) -> ApiResult<ApiClient> {
        let params = ListParams::search(format!("clientName = \"{name}\""));
        let page = self.list(ctx, &params).await?;
        single_match(page.items, Self::label(), |client| client.client_name == name)
    }
}
