use async_trait::async_trait;
use verify_api_models::{PasswordPolicy, PasswordPolicyList, ResourceKind};

use super::{ResourceClient, fetch_list, single_match};
use crate::context::ApiContext;
use crate::error::ApiResult;
use crate::params::{ListParams, Page};

/// Password policies at `/v3.0/passwordpolicies`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordPolicies;

#[async_trait]
impl ResourceClient for PasswordPolicies {
    type Item = PasswordPolicy;
    const RESOURCE: ResourceKind = ResourceKind::PasswordPolicy;
    const PATH: &'static [&'static str] = &["v3.0", "passwordpolicies"];

    fn id_of(item: &PasswordPolicy) -> Option<String> {
        item.id.clone()
    }

    async fn list(
        &self,
        ctx: &ApiContext,
        params: &ListParams,
    ) -> ApiResult<Page<PasswordPolicy>> {
        let list: PasswordPolicyList =
            fetch_list(ctx, Self::PATH, &params.query(), Self::label()).await?;
        Ok(Page {
            items: list.password_policies,
            total: list.total,
        })
    }

    async fn find_by_name(&self, ctx: &ApiContext, name: &str) -> ApiResult<PasswordPolicy> {
        let params = ListParams::search(format!("policyName = \"{name}\""));
        let page = self.list(ctx, &params).await?;
        single_match(page.items, Self::label(), |policy| policy.policy_name == name)
    }
}
