use async_trait::async_trait;
use verify_api_models::{IdentitySource, IdentitySourceList, ResourceKind};

use super::{ResourceClient, fetch_list, single_match};
use crate::context::ApiContext;
use crate::error::ApiResult;
use crate::params::{ListParams, Page};

/// Identity sources at `/v2.0/identitysources`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentitySources;

#[async_trait]
impl ResourceClient for IdentitySources {
    type Item = IdentitySource;
    const RESOURCE: ResourceKind = ResourceKind::IdentitySource;
    const PATH: &'static [&'static str] = &["v2.0", "identitysources"];

    fn id_of(item: &IdentitySource) -> Option<String> {
        item.id.clone()
    }

    async fn list(
        &self,
        ctx: &ApiContext,
        params: &ListParams,
    ) -> ApiResult<Page<IdentitySource>> {
        let list: IdentitySourceList =
            fetch_list(ctx, Self::PATH, &params.query(), Self::label()).await?;
        Ok(Page {
            items: list.identity_sources,
            total: list.total,
        })
    }

    async fn find_by_name(&self, ctx: &ApiContext, name: &str) -> ApiResult<IdentitySource> {
        let params = ListParams::search(format!("instanceName = \"{name}\""));
        let page = self.list(ctx, &params).await?;
        single_match(page.items, Self::label(), |source| source.instance_name == name)
    }
}
