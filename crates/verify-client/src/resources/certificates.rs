//! Certificates are keyed by label: the label is both the lookup name and
//! the identifier, and the collection endpoints return bare arrays.

use async_trait::async_trait;
use verify_api_models::{PersonalCert, ResourceKind, SignerCert};

use super::{ResourceClient, encode, fetch_list};
use crate::context::ApiContext;
use crate::error::{ApiError, ApiResult};
use crate::http::HttpRequest;
use crate::params::{ListParams, Locator, Page};

/// Personal certificates at `/v1.0/personalcert`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PersonalCerts;

/// Signer certificates at `/v1.0/signercert`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignerCerts;

#[async_trait]
impl ResourceClient for PersonalCerts {
    type Item = PersonalCert;
    const RESOURCE: ResourceKind = ResourceKind::PersonalCert;
    const PATH: &'static [&'static str] = &["v1.0", "personalcert"];

    fn id_of(item: &PersonalCert) -> Option<String> {
        Some(item.label.clone()).filter(|label| !label.is_empty())
    }

    async fn list(&self, ctx: &ApiContext, params: &ListParams) -> ApiResult<Page<PersonalCert>> {
        let items: Vec<PersonalCert> =
            fetch_list(ctx, Self::PATH, &params.query(), Self::label()).await?;
        Ok(array_page(items))
    }

    async fn find_by_name(&self, ctx: &ApiContext, name: &str) -> ApiResult<PersonalCert> {
        self.get(ctx, &Locator::Id(name.to_string())).await
    }

    async fn create(&self, ctx: &ApiContext, item: &PersonalCert) -> ApiResult<String> {
        let body = encode(item, Self::label())?;
        let request = HttpRequest::post(ctx.endpoint(Self::PATH)?).json(Self::CONTENT_TYPE, body);
        ctx.execute(request, Self::label()).await?;
        Ok(item.label.clone())
    }
}

#[async_trait]
impl ResourceClient for SignerCerts {
    type Item = SignerCert;
    const RESOURCE: ResourceKind = ResourceKind::SignerCert;
    const PATH: &'static [&'static str] = &["v1.0", "signercert"];

    fn id_of(item: &SignerCert) -> Option<String> {
        Some(item.label.clone()).filter(|label| !label.is_empty())
    }

    async fn list(&self, ctx: &ApiContext, params: &ListParams) -> ApiResult<Page<SignerCert>> {
        let items: Vec<SignerCert> =
            fetch_list(ctx, Self::PATH, &params.query(), Self::label()).await?;
        Ok(array_page(items))
    }

    async fn find_by_name(&self, ctx: &ApiContext, name: &str) -> ApiResult<SignerCert> {
        self.get(ctx, &Locator::Id(name.to_string())).await
    }

    async fn create(&self, ctx: &ApiContext, item: &SignerCert) -> ApiResult<String> {
        let body = encode(item, Self::label())?;
        let request = HttpRequest::post(ctx.endpoint(Self::PATH)?).json(Self::CONTENT_TYPE, body);
        ctx.execute(request, Self::label()).await?;
        Ok(item.label.clone())
    }

    async fn replace(&self, _ctx: &ApiContext, _item: &SignerCert) -> ApiResult<()> {
        Err(ApiError::Unsupported {
            operation: "replace",
            resource: Self::label(),
        })
    }
}

fn array_page<T>(items: Vec<T>) -> Page<T> {
    let total = u64::try_from(items.len()).ok();
    Page { items, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::test_support::context_with;
    use anyhow::Result;
    use httpmock::prelude::*;
    use serde_json::json;
    use verify_api_models::ResourceData;

    #[tokio::test]
    async fn get_by_name_addresses_label_directly() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/v1.0/signercert/partner-idp");
            then.status(200)
                .json_body(json!({"label": "partner-idp", "cert": "pem"}));
        });

        let ctx = context_with(&server)?;
        let cert = SignerCerts
            .get(&ctx, &Locator::Name("partner-idp".into()))
            .await?;
        mock.assert();
        assert_eq!(cert.label, "partner-idp");
        Ok(())
    }

    #[tokio::test]
    async fn signer_certs_cannot_be_replaced() -> Result<()> {
        let server = MockServer::start_async().await;
        let ctx = context_with(&server)?;
        let err = SignerCerts
            .replace(&ctx, &SignerCert::boilerplate())
            .await
            .expect_err("unsupported");
        assert_eq!(
            err.to_string(),
            "replace is not supported for signer certificate"
        );
        Ok(())
    }

    #[tokio::test]
    async fn list_counts_array_items() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/v1.0/personalcert");
            then.status(200).json_body(json!([
                {"label": "a", "cert": "pem"},
                {"label": "b", "cert": "pem"}
            ]));
        });

        let ctx = context_with(&server)?;
        let page = PersonalCerts.list(&ctx, &ListParams::default()).await?;
        assert_eq!(page.total, Some(2));
        Ok(())
    }

    #[tokio::test]
    async fn create_returns_label() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/v1.0/personalcert");
            then.status(201);
        });

        let ctx = context_with(&server)?;
        let id = PersonalCerts
            .create(&ctx, &PersonalCert::boilerplate())
            .await?;
        assert_eq!(id, "saml-signing");
        Ok(())
    }
}
