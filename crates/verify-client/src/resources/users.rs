use async_trait::async_trait;
use verify_api_models::{ResourceKind, ScimList, User};

use super::{ResourceClient, fetch_list, single_match};
use crate::context::ApiContext;
use crate::error::ApiResult;
use crate::http::CONTENT_TYPE_SCIM;
use crate::params::{ListParams, Page};

/// SCIM users at `/v2.0/Users`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Users;

#[async_trait]
impl ResourceClient for Users {
    type Item = User;
    const RESOURCE: ResourceKind = ResourceKind::User;
    const PATH: &'static [&'static str] = &["v2.0", "Users"];
    const CONTENT_TYPE: &'static str = CONTENT_TYPE_SCIM;

    fn id_of(item: &User) -> Option<String> {
        item.id.clone()
    }

    async fn list(&self, ctx: &ApiContext, params: &ListParams) -> ApiResult<Page<User>> {
        let list: ScimList<User> =
            fetch_list(ctx, Self::PATH, &params.scim_query(), Self::label()).await?;
        Ok(Page {
            items: list.resources,
            total: Some(list.total_results),
        })
    }

    async fn find_by_name(&self, ctx: &ApiContext, name: &str) -> ApiResult<User> {
        let params = ListParams::search(format!("userName eq \"{name}\""));
        let page = self.list(ctx, &params).await?;
        single_match(page.items, Self::label(), |user| {
            user.user_name.eq_ignore_ascii_case(name)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::params::Locator;
    use crate::resources::test_support::context_with;
    use anyhow::Result;
    use httpmock::prelude::*;
    use serde_json::json;
    use verify_api_models::ResourceData;

    #[tokio::test]
    async fn lookup_by_name_uses_scim_filter() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v2.0/Users")
                .query_param("filter", "userName eq \"jdoe\"")
                .header("authorization", "Bearer token");
            then.status(200).json_body(json!({
                "totalResults": 1,
                "Resources": [{"id": "u-1", "userName": "jdoe", "emails": [{"value": "j@example.com"}]}]
            }));
        });

        let ctx = context_with(&server)?;
        let user = Users.get(&ctx, &Locator::Name("jdoe".into())).await?;
        mock.assert();
        assert_eq!(user.id.as_deref(), Some("u-1"));
        Ok(())
    }

    #[tokio::test]
    async fn unknown_name_is_not_found() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/v2.0/Users");
            then.status(200)
                .json_body(json!({"totalResults": 0, "Resources": []}));
        });

        let ctx = context_with(&server)?;
        let err = Users
            .get(&ctx, &Locator::Name("ghost".into()))
            .await
            .expect_err("no match");
        assert!(matches!(err, ApiError::NotFound { resource: "user" }));
        Ok(())
    }

    #[tokio::test]
    async fn create_posts_scim_json_and_returns_body_id() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v2.0/Users")
                .header("content-type", "application/scim+json");
            then.status(201).json_body(json!({"id": "u-9", "userName": "jdoe"}));
        });

        let ctx = context_with(&server)?;
        let id = Users.create(&ctx, &User::boilerplate()).await?;
        mock.assert();
        assert_eq!(id, "u-9");
        Ok(())
    }

    #[tokio::test]
    async fn expired_token_asks_for_login() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(DELETE).path("/v2.0/Users/u-1");
            then.status(401);
        });

        let ctx = context_with(&server)?;
        let err = Users
            .delete(&ctx, &Locator::Id("u-1".into()))
            .await
            .expect_err("401");
        assert!(err.to_string().starts_with("Login again"));
        Ok(())
    }
}
