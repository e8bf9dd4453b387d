use async_trait::async_trait;
use verify_api_models::{Policy, PolicyList, ResourceKind};

use super::{ResourceClient, fetch_list, single_match};
use crate::context::ApiContext;
use crate::error::ApiResult;
use crate::params::{ListParams, Page};

/// Access policies at `/v5.0/policyvault/accesspolicy`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessPolicies;

#[async_trait]
impl ResourceClient for AccessPolicies {
    type Item = Policy;
    const RESOURCE: ResourceKind = ResourceKind::AccessPolicy;
    const PATH: &'static [&'static str] = &["v5.0", "policyvault", "accesspolicy"];

    fn id_of(item: &Policy) -> Option<String> {
        item.id.map(|id| id.to_string())
    }

    async fn list(&self, ctx: &ApiContext, params: &ListParams) -> ApiResult<Page<Policy>> {
        let list: PolicyList = fetch_list(ctx, Self::PATH, &params.query(), Self::label()).await?;
        Ok(Page {
            items: list.policies,
            total: list.total,
        })
    }

    async fn find_by_name(&self, ctx: &ApiContext, name: &str) -> ApiResult<Policy> {
        let params = ListParams::search(format!("name = \"{name}\""));
        let page = self.list(ctx, &params).await?;
        single_match(page.items, Self::label(), |policy| policy.name == name)
    }
}
