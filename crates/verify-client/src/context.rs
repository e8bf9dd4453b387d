//! Per-invocation API context: transport, tenant base URL and bearer token.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{ApiError, ApiResult, classify};
use crate::http::{HttpClient, HttpRequest, Response};

/// Dependencies shared by every API call of one command.
#[derive(Clone)]
pub struct ApiContext {
    http: Arc<dyn HttpClient>,
    base_url: Url,
    token: String,
}

impl fmt::Debug for ApiContext {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ApiContext")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiContext {
    /// Bundle a transport, tenant base URL and bearer token.
    #[must_use]
    pub fn new(http: Arc<dyn HttpClient>, base_url: Url, token: impl Into<String>) -> Self {
        Self {
            http,
            base_url,
            token: token.into(),
        }
    }

    /// Tenant base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Transport shared with other flows (e.g. token acquisition).
    #[must_use]
    pub fn http(&self) -> Arc<dyn HttpClient> {
        Arc::clone(&self.http)
    }

    /// URL for `path` segments below the tenant base. Segments are
    /// percent-encoded individually.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBase`] when the base URL cannot hold a path.
    pub fn endpoint(&self, path: &[&str]) -> ApiResult<Url> {
        endpoint(&self.base_url, path)
    }

    /// URL for a single item below `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBase`] when the base URL cannot hold a path.
    pub fn item_endpoint(&self, path: &[&str], id: &str) -> ApiResult<Url> {
        let mut url = self.endpoint(path)?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBase {
                url: self.base_url.to_string(),
            })?
            .push(id);
        Ok(url)
    }

    /// Attach the bearer token and JSON accept header to a request.
    #[must_use]
    pub fn authorize(&self, request: HttpRequest) -> HttpRequest {
        request
            .bearer(&self.token)
            .header("accept", "application/json")
    }

    /// Send an authorized request and classify any non-success status.
    ///
    /// # Errors
    ///
    /// Returns the transport error, or the classified status error.
    pub async fn execute(
        &self,
        request: HttpRequest,
        resource: &'static str,
    ) -> ApiResult<Response> {
        let method = request.method;
        let path = request.url.path().to_string();
        let response = self.http.send(self.authorize(request)).await?;
        tracing::debug!(%method, %path, status = response.status, "api call");
        if response.is_success() {
            Ok(response)
        } else {
            Err(classify(&response, resource))
        }
    }

    /// `GET` a URL and decode the JSON body.
    ///
    /// # Errors
    ///
    /// Returns the transport, status or decode error.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        resource: &'static str,
    ) -> ApiResult<T> {
        self.execute(HttpRequest::get(url), resource)
            .await?
            .json(resource)
    }
}

/// Resolve a tenant name to its API base URL.
///
/// A bare host (`acme.verify.ibm.com`) gets `https://`; a value with an
/// explicit scheme is used as-is.
///
/// # Errors
///
/// Returns [`ApiError::InvalidBase`] when no host is given and
/// [`ApiError::InvalidUrl`] when the result does not parse.
pub fn tenant_base_url(tenant: &str) -> ApiResult<Url> {
    let trimmed = tenant.trim();
    let (candidate, authority) = match trimmed.split_once("://") {
        Some((_, rest)) => (trimmed.to_string(), rest),
        None => {
            let host = trimmed.trim_end_matches('/');
            (format!("https://{host}"), host)
        }
    };
    if authority
        .split(['/', '?', '#'])
        .next()
        .is_none_or(str::is_empty)
    {
        return Err(ApiError::InvalidBase {
            url: tenant.to_string(),
        });
    }
    let url = Url::parse(&candidate).map_err(|source| ApiError::InvalidUrl {
        input: tenant.to_string(),
        source,
    })?;
    if url.cannot_be_a_base() || url.host_str().is_none_or(str::is_empty) {
        return Err(ApiError::InvalidBase {
            url: tenant.to_string(),
        });
    }
    Ok(url)
}

pub(crate) fn endpoint(base: &Url, path: &[&str]) -> ApiResult<Url> {
    let mut url = base.clone();
    url.set_query(None);
    url.path_segments_mut()
        .map_err(|()| ApiError::InvalidBase {
            url: base.to_string(),
        })?
        .pop_if_empty()
        .extend(path);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_tenant_gets_https() -> anyhow::Result<()> {
        let url = tenant_base_url("acme.verify.ibm.com")?;
        assert_eq!(url.as_str(), "https://acme.verify.ibm.com/");
        Ok(())
    }

    #[test]
    fn explicit_scheme_is_kept() -> anyhow::Result<()> {
        let url = tenant_base_url("http://127.0.0.1:8080/")?;
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/");
        Ok(())
    }

    #[test]
    fn garbage_tenant_is_rejected() {
        for input in ["https://", "http:///v1.0", "", "  ", "/"] {
            assert!(
                matches!(tenant_base_url(input), Err(ApiError::InvalidBase { .. })),
                "{input:?} accepted"
            );
        }
    }

    #[test]
    fn surrounding_whitespace_and_slash_are_ignored() -> anyhow::Result<()> {
        let url = tenant_base_url("  acme.verify.ibm.com/ ")?;
        assert_eq!(url.as_str(), "https://acme.verify.ibm.com/");
        Ok(())
    }

    #[test]
    fn endpoint_appends_and_escapes_segments() -> anyhow::Result<()> {
        let base = tenant_base_url("acme.verify.ibm.com")?;
        let url = endpoint(&base, &["v1.0", "personalcert", "my cert"])?;
        assert_eq!(
            url.as_str(),
            "https://acme.verify.ibm.com/v1.0/personalcert/my%20cert"
        );
        Ok(())
    }
}
