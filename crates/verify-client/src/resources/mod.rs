//! Per-resource API clients.
//!
//! Every client follows the same shape: a fixed path below the tenant, one
//! HTTP call per operation and the shared status classifier. Most behaviour
//! lives in the [`ResourceClient`] default methods; each resource supplies
//! its list decoding and name lookup.

mod access_policies;
mod api_clients;
mod applications;
mod certificates;
mod groups;
mod identity_sources;
mod password_policies;
mod themes;
mod users;

pub use access_policies::AccessPolicies;
pub use api_clients::ApiClients;
pub use applications::Applications;
pub use certificates::{PersonalCerts, SignerCerts};
pub use groups::Groups;
pub use identity_sources::IdentitySources;
pub use password_policies::PasswordPolicies;
pub use themes::Themes;
pub use users::Users;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use verify_api_models::{ResourceData, ResourceKind};

use crate::context::ApiContext;
use crate::error::{ApiError, ApiResult};
use crate::http::{CONTENT_TYPE_JSON, HttpRequest, Response};
use crate::params::{ListParams, Locator, Page};

/// Typed CRUD client for one resource family.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// Payload type.
    type Item: ResourceData + Send + Sync;
    /// Resource family.
    const RESOURCE: ResourceKind;
    /// Path segments of the collection endpoint.
    const PATH: &'static [&'static str];
    /// Content type for request bodies.
    const CONTENT_TYPE: &'static str = CONTENT_TYPE_JSON;

    /// Label used in error messages.
    #[must_use]
    fn label() -> &'static str {
        Self::RESOURCE.label()
    }

    /// Identifier carried by a payload, if any.
    fn id_of(item: &Self::Item) -> Option<String>;

    /// List resources.
    async fn list(&self, ctx: &ApiContext, params: &ListParams) -> ApiResult<Page<Self::Item>>;

    /// Find a single resource by its unique name.
    async fn find_by_name(&self, ctx: &ApiContext, name: &str) -> ApiResult<Self::Item>;

    /// Fetch a single resource.
    async fn get(&self, ctx: &ApiContext, locator: &Locator) -> ApiResult<Self::Item> {
        match locator {
            Locator::Name(name) => self.find_by_name(ctx, name).await,
            Locator::Id(id) => {
                let url = ctx.item_endpoint(Self::PATH, id)?;
                ctx.get_json(url, Self::label()).await
            }
        }
    }

    /// Resolve a locator to an identifier, looking the name up when needed.
    async fn resolve_id(&self, ctx: &ApiContext, locator: &Locator) -> ApiResult<String> {
        match locator {
            Locator::Id(id) => Ok(id.clone()),
            Locator::Name(name) => {
                let item = self.find_by_name(ctx, name).await?;
                Self::id_of(&item).ok_or(ApiError::NotFound {
                    resource: Self::label(),
                })
            }
        }
    }

    /// Create a resource and return its identifier.
    async fn create(&self, ctx: &ApiContext, item: &Self::Item) -> ApiResult<String> {
        let body = encode(item, Self::label())?;
        let request = HttpRequest::post(ctx.endpoint(Self::PATH)?).json(Self::CONTENT_TYPE, body);
        let response = ctx.execute(request, Self::label()).await?;
        created_id(&response).ok_or(ApiError::MissingIdentifier {
            resource: Self::label(),
        })
    }

    /// Replace a resource. The target is the payload's identifier, or the
    /// resource found by its name.
    async fn replace(&self, ctx: &ApiContext, item: &Self::Item) -> ApiResult<()> {
        let id = self.target_id(ctx, item).await?;
        let body = encode(item, Self::label())?;
        let request = HttpRequest::put(ctx.item_endpoint(Self::PATH, &id)?)
            .json(Self::CONTENT_TYPE, body);
        ctx.execute(request, Self::label()).await?;
        Ok(())
    }

    /// Delete a resource.
    async fn delete(&self, ctx: &ApiContext, locator: &Locator) -> ApiResult<()> {
        let id = self.resolve_id(ctx, locator).await?;
        let request = HttpRequest::delete(ctx.item_endpoint(Self::PATH, &id)?);
        ctx.execute(request, Self::label()).await?;
        Ok(())
    }

    /// Identifier a replace should address.
    async fn target_id(&self, ctx: &ApiContext, item: &Self::Item) -> ApiResult<String> {
        if let Some(id) = Self::id_of(item) {
            return Ok(id);
        }
        let name = item.display_name().ok_or(ApiError::NotFound {
            resource: Self::label(),
        })?;
        self.resolve_id(ctx, &Locator::Name(name)).await
    }
}

pub(crate) fn encode<T: Serialize>(item: &T, resource: &'static str) -> ApiResult<Value> {
    serde_json::to_value(item).map_err(|source| ApiError::Encode { resource, source })
}

/// `GET` the collection endpoint with query pairs and decode the body.
pub(crate) async fn fetch_list<W: DeserializeOwned>(
    ctx: &ApiContext,
    path: &[&str],
    query: &[(&'static str, String)],
    resource: &'static str,
) -> ApiResult<W> {
    let mut url = ctx.endpoint(path)?;
    if !query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(key, value)| (*key, value.as_str())));
    }
    ctx.get_json(url, resource).await
}

/// Identifier of a freshly created resource: the last segment of the
/// `Location` header, else `id` or `_links.self.href` from the body.
#[must_use]
pub fn created_id(response: &Response) -> Option<String> {
    if let Some(id) = response
        .header("location")
        .map(|location| location.split('?').next().unwrap_or(location))
        .and_then(|path| path.trim_end_matches('/').rsplit('/').next())
        .filter(|segment| !segment.is_empty())
    {
        return Some(id.to_string());
    }
    let body: Value = serde_json::from_slice(&response.body).ok()?;
    match body.get("id") {
        Some(Value::String(id)) if !id.is_empty() => return Some(id.clone()),
        Some(Value::Number(id)) => return Some(id.to_string()),
        _ => {}
    }
    body.pointer("/_links/self/href")
        .and_then(Value::as_str)
        .and_then(|href| href.rsplit('/').next())
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// Pick the single match for `name` out of a search page.
pub(crate) fn single_match<T>(
    items: Vec<T>,
    resource: &'static str,
    matches: impl Fn(&T) -> bool,
) -> ApiResult<T> {
    items
        .into_iter()
        .find(|item| matches(item))
        .ok_or(ApiError::NotFound { resource })
}
