//! Transport abstraction: a request/response pair independent of the HTTP
//! stack, and the `reqwest` implementation used at runtime.

use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::error::{ApiError, ApiResult};

/// Header carrying the per-invocation trace identifier.
pub const HEADER_REQUEST_ID: &str = "x-request-id";
/// Content type for plain JSON endpoints.
pub const CONTENT_TYPE_JSON: &str = "application/json";
/// Content type for SCIM endpoints.
pub const CONTENT_TYPE_SCIM: &str = "application/scim+json";

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl Method {
    /// Upper-case method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl Display for Method {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// One part of a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Form field name.
    pub name: String,
    /// File name, for file parts.
    pub file_name: Option<String>,
    /// MIME type of the part.
    pub content_type: String,
    /// Raw contents.
    pub bytes: Vec<u8>,
}

/// Request body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// No body.
    Empty,
    /// JSON document sent with the given content type.
    Json {
        /// `application/json` or `application/scim+json`.
        content_type: &'static str,
        /// Document.
        value: Value,
    },
    /// `application/x-www-form-urlencoded` pairs.
    Form(Vec<(String, String)>),
    /// `multipart/form-data` parts.
    Multipart(Vec<Part>),
}

/// Outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// Method.
    pub method: Method,
    /// Absolute URL including the query.
    pub url: Url,
    /// Extra headers.
    pub headers: Vec<(String, String)>,
    /// Body.
    pub body: Body,
}

impl HttpRequest {
    /// Start a request without headers or body.
    #[must_use]
    pub const fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: Body::Empty,
        }
    }

    /// `GET url`
    #[must_use]
    pub const fn get(url: Url) -> Self {
        Self::new(Method::Get, url)
    }

    /// `POST url`
    #[must_use]
    pub const fn post(url: Url) -> Self {
        Self::new(Method::Post, url)
    }

    /// `PUT url`
    #[must_use]
    pub const fn put(url: Url) -> Self {
        Self::new(Method::Put, url)
    }

    /// `PATCH url`
    #[must_use]
    pub const fn patch(url: Url) -> Self {
        Self::new(Method::Patch, url)
    }

    /// `DELETE url`
    #[must_use]
    pub const fn delete(url: Url) -> Self {
        Self::new(Method::Delete, url)
    }

    /// Add a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add `Authorization: Bearer <token>`.
    #[must_use]
    pub fn bearer(self, token: &str) -> Self {
        self.header("authorization", format!("Bearer {token}"))
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn json(mut self, content_type: &'static str, value: Value) -> Self {
        self.body = Body::Json {
            content_type,
            value,
        };
        self
    }

    /// Attach a URL-encoded form body.
    #[must_use]
    pub fn form(mut self, pairs: Vec<(String, String)>) -> Self {
        self.body = Body::Form(pairs);
        self
    }

    /// Attach a multipart body.
    #[must_use]
    pub fn multipart(mut self, parts: Vec<Part>) -> Self {
        self.body = Body::Multipart(parts);
        self
    }
}

/// Uniform response handed back by every [`HttpClient`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    /// Status code.
    pub status: u16,
    /// Headers with lower-case names.
    pub headers: Vec<(String, String)>,
    /// Raw body.
    pub body: Vec<u8>,
}

impl Response {
    /// Whether the status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// First value of a header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Body decoded as UTF-8, lossily.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] when the body does not fit `T`.
    pub fn json<T: DeserializeOwned>(&self, resource: &'static str) -> ApiResult<T> {
        serde_json::from_slice(&self.body).map_err(|source| ApiError::Decode { resource, source })
    }
}

/// Minimal HTTP transport.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Send one request and collect the full response.
    ///
    /// Non-success statuses are returned as responses, not errors.
    async fn send(&self, request: HttpRequest) -> ApiResult<Response>;
}

/// [`HttpClient`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Build a client with a request timeout and a fixed `x-request-id`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] when the request id is not a valid
    /// header value or the TLS backend fails to initialise.
    pub fn new(timeout: Duration, request_id: &str) -> ApiResult<Self> {
        let mut default_headers = HeaderMap::new();
        let value = HeaderValue::from_str(request_id).map_err(|err| ApiError::Transport {
            method: "INIT",
            url: String::new(),
            source: Box::new(err),
        })?;
        default_headers.insert(HEADER_REQUEST_ID, value);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|err| ApiError::Transport {
                method: "INIT",
                url: String::new(),
                source: Box::new(err),
            })?;
        Ok(Self { client })
    }

    /// Wrap an existing `reqwest` client.
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn send(&self, request: HttpRequest) -> ApiResult<Response> {
        let method = request.method;
        let url = request.url.to_string();
        let transport = |err: reqwest::Error| ApiError::Transport {
            method: method.as_str(),
            url: url.clone(),
            source: Box::new(err),
        };

        let reqwest_method = match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self.client.request(reqwest_method, request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match request.body {
            Body::Empty => builder,
            Body::Json {
                content_type,
                value,
            } => {
                let bytes = serde_json::to_vec(&value).map_err(|source| ApiError::Encode {
                    resource: "request",
                    source,
                })?;
                builder
                    .header(reqwest::header::CONTENT_TYPE, content_type)
                    .body(bytes)
            }
            Body::Form(pairs) => builder.form(&pairs),
            Body::Multipart(parts) => {
                let mut form = reqwest::multipart::Form::new();
                for part in parts {
                    let mut piece = reqwest::multipart::Part::bytes(part.bytes)
                        .mime_str(&part.content_type)
                        .map_err(transport)?;
                    if let Some(file_name) = part.file_name {
                        piece = piece.file_name(file_name);
                    }
                    form = form.part(part.name, piece);
                }
                builder.multipart(form)
            }
        };

        let response = builder.send().await.map_err(transport)?;
        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let body = response.bytes().await.map_err(transport)?.to_vec();
        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

fn collect_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .filter_map(|(name, value): (&HeaderName, &HeaderValue)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect()
}
