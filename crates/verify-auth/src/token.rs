//! Token endpoint calls: client credentials and the device authorization
//! grant (RFC 8628), with any of the three client authentication methods.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use url::Url;
use verify_client::{ApiError, HttpClient, HttpRequest, Response, classify};

use crate::assertion::{CLIENT_ASSERTION_TYPE, client_assertion};
use crate::error::{AuthError, AuthResult};
use crate::jwk::Jwk;
use crate::resource::{AuthResource, ClientAuthType};

/// Grant type used when polling for a device token.
pub const DEVICE_CODE_GRANT: &str = "urn:ietf:params:oauth:grant-type:device_code";
/// Seconds added to the polling interval on `slow_down`.
pub const SLOW_DOWN_STEP: Duration = Duration::from_secs(5);

const TOKEN_PATH: &str = "oauth2/token";
const DEVICE_AUTHORIZATION_PATH: &str = "oauth2/device_authorization";
const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Successful token response.
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
    /// Bearer token for API calls.
    pub access_token: String,
    /// Usually `Bearer`.
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Granted scopes.
    #[serde(default)]
    pub scope: Option<String>,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("TokenResponse")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// Response of the device authorization endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceAuthorization {
    /// Code exchanged for the token while polling.
    pub device_code: String,
    /// Code the operator types on the verification page.
    pub user_code: String,
    /// Verification page.
    pub verification_uri: String,
    /// Verification page with the user code embedded.
    #[serde(default)]
    pub verification_uri_complete: Option<String>,
    /// Seconds until the device code expires.
    pub expires_in: u64,
    /// Minimum seconds between polls.
    #[serde(default)]
    pub interval: Option<u64>,
}

impl DeviceAuthorization {
    /// Polling interval announced by the server.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval.unwrap_or(DEFAULT_INTERVAL_SECS).max(1))
    }

    /// Polls that fit in the code lifetime (`expires_in / interval`, at least one).
    #[must_use]
    pub fn default_max_polls(&self) -> u32 {
        let polls = self.expires_in / self.interval().as_secs();
        u32::try_from(polls).unwrap_or(u32::MAX).max(1)
    }
}

/// Polling limits for the device flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollOptions {
    /// Upper bound on token requests; defaults to `expires_in / interval`.
    pub max_polls: Option<u32>,
    /// Interval override; defaults to the server's interval.
    pub interval: Option<Duration>,
}

#[derive(Debug, Deserialize)]
struct OAuthErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Result of one device token poll.
#[derive(Debug)]
enum PollStep {
    Done(TokenResponse),
    Pending,
    SlowDown,
}

/// Client for the tenant's OAuth endpoints.
#[derive(Clone)]
pub struct TokenClient {
    http: Arc<dyn HttpClient>,
    base_url: Url,
}

impl TokenClient {
    /// Client for the tenant at `base_url`.
    #[must_use]
    pub fn new(http: Arc<dyn HttpClient>, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Token endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] when the base URL cannot be joined.
    pub fn token_endpoint(&self) -> AuthResult<Url> {
        self.join(TOKEN_PATH)
    }

    fn join(&self, path: &str) -> AuthResult<Url> {
        self.base_url.join(path).map_err(|source| {
            AuthError::Api(ApiError::InvalidUrl {
                input: format!("{}{path}", self.base_url),
                source,
            })
        })
    }

    /// Obtain a token with the strategy `auth` selects. For the device flow
    /// `prompt` receives the verification details before polling starts.
    ///
    /// # Errors
    ///
    /// Returns the first failure of the selected flow.
    pub async fn acquire<F>(
        &self,
        auth: &AuthResource,
        poll: PollOptions,
        prompt: F,
    ) -> AuthResult<TokenResponse>
    where
        F: FnOnce(&DeviceAuthorization) + Send,
    {
        if auth.user {
            tracing::info!(
                client_auth = auth.client_auth_type.as_str(),
                "starting device authorization"
            );
            let device = self.start_device_authorization(auth).await?;
            prompt(&device);
            self.poll_device_token(auth, &device, poll).await
        } else {
            tracing::info!(
                client_auth = auth.client_auth_type.as_str(),
                "requesting client credentials token"
            );
            self.client_credentials(auth).await
        }
    }

    /// `grant_type=client_credentials`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::OAuth`] when the endpoint rejects the request.
    pub async fn client_credentials(&self, auth: &AuthResource) -> AuthResult<TokenResponse> {
        let mut form = vec![("grant_type".to_string(), "client_credentials".to_string())];
        if let Some(scope) = auth.scope() {
            form.push(("scope".to_string(), scope));
        }
        let response = self.post_form(TOKEN_PATH, auth, form).await?;
        decode_token(&response)
    }

    /// Start the device flow.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::OAuth`] when the endpoint rejects the client.
    pub async fn start_device_authorization(
        &self,
        auth: &AuthResource,
    ) -> AuthResult<DeviceAuthorization> {
        let mut form = Vec::new();
        if let Some(scope) = auth.scope() {
            form.push(("scope".to_string(), scope));
        }
        let response = self
            .post_form(DEVICE_AUTHORIZATION_PATH, auth, form)
            .await?;
        if !response.is_success() {
            return Err(oauth_error(&response));
        }
        serde_json::from_slice(&response.body).map_err(|source| AuthError::Decode {
            endpoint: "device authorization",
            source,
        })
    }

    /// Poll the token endpoint until the operator approves, denies or the
    /// code expires. Never sends more than the configured number of polls.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AccessDenied`], [`AuthError::ExpiredToken`],
    /// [`AuthError::PollLimit`] or any other OAuth failure.
    pub async fn poll_device_token(
        &self,
        auth: &AuthResource,
        device: &DeviceAuthorization,
        options: PollOptions,
    ) -> AuthResult<TokenResponse> {
        let max_polls = options
            .max_polls
            .unwrap_or_else(|| device.default_max_polls());
        let mut interval = options.interval.unwrap_or_else(|| device.interval());

        for attempt in 1..=max_polls {
            tokio::time::sleep(interval).await;
            let form = vec![
                ("grant_type".to_string(), DEVICE_CODE_GRANT.to_string()),
                ("device_code".to_string(), device.device_code.clone()),
            ];
            let response = self.post_form(TOKEN_PATH, auth, form).await?;
            match poll_step(&response)? {
                PollStep::Done(token) => {
                    tracing::info!(attempt, "device authorization complete");
                    return Ok(token);
                }
                PollStep::Pending => {
                    tracing::debug!(attempt, "authorization pending");
                }
                PollStep::SlowDown => {
                    interval += SLOW_DOWN_STEP;
                    tracing::debug!(attempt, interval_secs = interval.as_secs(), "slowing down");
                }
            }
        }
        Err(AuthError::PollLimit { polls: max_polls })
    }

    async fn post_form(
        &self,
        path: &str,
        auth: &AuthResource,
        mut form: Vec<(String, String)>,
    ) -> AuthResult<Response> {
        let url = self.join(path)?;
        let mut request = HttpRequest::post(url).header("accept", "application/json");
        match auth.client_auth_type {
            ClientAuthType::ClientSecretBasic => {
                form.push(("client_id".to_string(), auth.client_id.clone()));
                if let Some(secret) = auth.client_secret.as_deref() {
                    let credentials = STANDARD.encode(format!("{}:{secret}", auth.client_id));
                    request = request.header("authorization", format!("Basic {credentials}"));
                }
            }
            ClientAuthType::ClientSecretPost => {
                form.push(("client_id".to_string(), auth.client_id.clone()));
                if let Some(secret) = auth.client_secret.as_deref() {
                    form.push(("client_secret".to_string(), secret.to_string()));
                }
            }
            ClientAuthType::PrivateKeyJwt => {
                let raw = auth
                    .private_key_raw
                    .as_deref()
                    .ok_or_else(|| AuthError::InvalidKey {
                        reason: "privateKeyRaw is required for private_key_jwt".to_string(),
                    })?;
                let jwk = Jwk::parse(raw)?;
                let audience = self.token_endpoint()?;
                let assertion = client_assertion(&auth.client_id, audience.as_str(), &jwk)?;
                form.push(("client_id".to_string(), auth.client_id.clone()));
                form.push((
                    "client_assertion_type".to_string(),
                    CLIENT_ASSERTION_TYPE.to_string(),
                ));
                form.push(("client_assertion".to_string(), assertion));
            }
        }
        form.extend(
            auth.parameters
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );

        let response = self.http.send(request.form(form)).await?;
        tracing::debug!(path, status = response.status, "oauth call");
        Ok(response)
    }
}

fn decode_token(response: &Response) -> AuthResult<TokenResponse> {
    if !response.is_success() {
        return Err(oauth_error(response));
    }
    serde_json::from_slice(&response.body).map_err(|source| AuthError::Decode {
        endpoint: "token",
        source,
    })
}

fn poll_step(response: &Response) -> AuthResult<PollStep> {
    if response.is_success() {
        return decode_token(response).map(PollStep::Done);
    }
    match serde_json::from_slice::<OAuthErrorBody>(&response.body) {
        Ok(body) => match body.error.as_str() {
            "authorization_pending" => Ok(PollStep::Pending),
            "slow_down" => Ok(PollStep::SlowDown),
            "access_denied" => Err(AuthError::AccessDenied),
            "expired_token" => Err(AuthError::ExpiredToken),
            _ => Err(AuthError::OAuth {
                error: body.error,
                description: body.error_description,
            }),
        },
        Err(_) => Err(AuthError::Api(classify(response, "token"))),
    }
}

fn oauth_error(response: &Response) -> AuthError {
    match serde_json::from_slice::<OAuthErrorBody>(&response.body) {
        Ok(body) => AuthError::OAuth {
            error: body.error,
            description: body.error_description,
        },
        Err(_) => AuthError::Api(classify(response, "token")),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use crate::testdata::RSA_JWK;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use httpmock::prelude::*;
    use serde_json::json;
    use verify_client::{ApiResult, Body, ReqwestClient};

    /// Replays canned responses in order and records every request.
    struct ScriptedHttp {
        responses: Mutex<VecDeque<Response>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedHttp {
        fn new(responses: Vec<(u16, serde_json::Value)>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(
                    responses
                        .into_iter()
                        .map(|(status, body)| Response {
                            status,
                            headers: Vec::new(),
                            body: body.to_string().into_bytes(),
                        })
                        .collect(),
                ),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn sent(&self) -> Vec<HttpRequest> {
            self.requests.lock().map(|r| r.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl HttpClient for ScriptedHttp {
        async fn send(&self, request: HttpRequest) -> ApiResult<Response> {
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(request);
            }
            Ok(self
                .responses
                .lock()
                .ok()
                .and_then(|mut queue| queue.pop_front())
                .unwrap_or(Response {
                    status: 500,
                    headers: Vec::new(),
                    body: b"script exhausted".to_vec(),
                }))
        }
    }

    fn form_value(request: &HttpRequest, key: &str) -> Option<String> {
        match &request.body {
            Body::Form(pairs) => pairs
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value.clone()),
            _ => None,
        }
    }

    fn device() -> DeviceAuthorization {
        DeviceAuthorization {
            device_code: "dev-code".into(),
            user_code: "ABCD-EFGH".into(),
            verification_uri: "https://acme/device".into(),
            verification_uri_complete: None,
            expires_in: 600,
            interval: Some(5),
        }
    }

    fn auth(kind: ClientAuthType) -> AuthResource {
        AuthResource {
            tenant: "acme".into(),
            client_id: "cli".into(),
            client_auth_type: kind,
            client_secret: Some("s3cret".into()),
            user: true,
            ..AuthResource::default()
        }
    }

    fn base() -> Result<Url> {
        "https://acme.verify.ibm.com/"
            .parse()
            .map_err(|_| anyhow!("valid URL"))
    }

    const FAST: PollOptions = PollOptions {
        max_polls: Some(3),
        interval: Some(Duration::ZERO),
    };

    #[tokio::test]
    async fn pending_then_success_returns_token_within_poll_budget() -> Result<()> {
        let http = ScriptedHttp::new(vec![
            (400, json!({"error": "authorization_pending"})),
            (200, json!({"access_token": "tok-1", "token_type": "Bearer"})),
        ]);
        let client = TokenClient::new(http.clone(), base()?);

        let token = client
            .poll_device_token(&auth(ClientAuthType::ClientSecretPost), &device(), FAST)
            .await?;

        assert_eq!(token.access_token, "tok-1");
        let sent = http.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(
            form_value(&sent[0], "grant_type").as_deref(),
            Some(DEVICE_CODE_GRANT)
        );
        assert_eq!(form_value(&sent[0], "device_code").as_deref(), Some("dev-code"));
        assert_eq!(form_value(&sent[1], "client_secret").as_deref(), Some("s3cret"));
        Ok(())
    }

    #[tokio::test]
    async fn polling_stops_at_the_configured_limit() -> Result<()> {
        let http = ScriptedHttp::new(vec![
            (400, json!({"error": "authorization_pending"})),
            (400, json!({"error": "authorization_pending"})),
            (400, json!({"error": "authorization_pending"})),
            (200, json!({"access_token": "too-late"})),
        ]);
        let client = TokenClient::new(http.clone(), base()?);

        let err = client
            .poll_device_token(&auth(ClientAuthType::ClientSecretBasic), &device(), FAST)
            .await
            .expect_err("limit reached");

        assert!(matches!(err, AuthError::PollLimit { polls: 3 }));
        assert_eq!(http.sent().len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn denial_and_expiry_abort_polling() -> Result<()> {
        for (code, check) in [
            ("access_denied", AuthError::AccessDenied.to_string()),
            ("expired_token", AuthError::ExpiredToken.to_string()),
        ] {
            let http = ScriptedHttp::new(vec![(400, json!({"error": code}))]);
            let client = TokenClient::new(http.clone(), base()?);
            let err = client
                .poll_device_token(&auth(ClientAuthType::ClientSecretBasic), &device(), FAST)
                .await
                .expect_err("aborts");
            assert_eq!(err.to_string(), check);
            assert_eq!(http.sent().len(), 1);
        }
        Ok(())
    }

    #[test]
    fn slow_down_is_a_step_not_an_error() -> Result<()> {
        let response = Response {
            status: 400,
            headers: Vec::new(),
            body: br#"{"error":"slow_down"}"#.to_vec(),
        };
        assert!(matches!(poll_step(&response)?, PollStep::SlowDown));
        Ok(())
    }

    #[test]
    fn default_poll_budget_divides_lifetime_by_interval() {
        assert_eq!(device().default_max_polls(), 120);
        let short = DeviceAuthorization {
            expires_in: 1,
            interval: Some(5),
            ..device()
        };
        assert_eq!(short.default_max_polls(), 1);
    }

    #[tokio::test]
    async fn client_credentials_use_basic_auth_by_default() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/oauth2/token")
                .header("authorization", "Basic Y2xpOnMzY3JldA==");
            then.status(200)
                .json_body(json!({"access_token": "cc-token", "expires_in": 7200}));
        });

        let http = Arc::new(ReqwestClient::new(Duration::from_secs(5), "test-request")?);
        let base = server.base_url().parse().map_err(|_| anyhow!("valid URL"))?;
        let client = TokenClient::new(http, base);
        let auth = AuthResource {
            user: false,
            ..auth(ClientAuthType::ClientSecretBasic)
        };

        let token = client.acquire(&auth, PollOptions::default(), |_| {}).await?;
        mock.assert();
        assert_eq!(token.access_token, "cc-token");
        assert_eq!(token.expires_in, Some(7200));
        Ok(())
    }

    #[tokio::test]
    async fn token_endpoint_errors_carry_oauth_description() -> Result<()> {
        let http = ScriptedHttp::new(vec![(
            401,
            json!({"error": "invalid_client", "error_description": "bad secret"}),
        )]);
        let client = TokenClient::new(http, base()?);
        let err = client
            .client_credentials(&auth(ClientAuthType::ClientSecretPost))
            .await
            .expect_err("rejected");
        assert_eq!(
            err.to_string(),
            "token request rejected: invalid_client: bad secret"
        );
        Ok(())
    }

    #[tokio::test]
    async fn private_key_jwt_sends_signed_assertion_and_parameters() -> Result<()> {
        let http = ScriptedHttp::new(vec![(200, json!({"access_token": "jwt-token"}))]);
        let client = TokenClient::new(http.clone(), base()?);
        let mut auth = auth(ClientAuthType::PrivateKeyJwt);
        auth.user = false;
        auth.client_secret = None;
        auth.private_key_raw = Some(RSA_JWK.to_string());
        auth.scopes = vec!["openid".into(), "profile".into()];
        auth.parameters.insert("resource".into(), "api".into());

        client.client_credentials(&auth).await?;

        let sent = http.sent();
        let request = &sent[0];
        assert!(request.headers.iter().all(|(name, _)| name != "authorization"));
        assert_eq!(
            form_value(request, "client_assertion_type").as_deref(),
            Some(CLIENT_ASSERTION_TYPE)
        );
        assert_eq!(
            form_value(request, "client_assertion").map(|jwt| jwt.split('.').count()),
            Some(3)
        );
        assert_eq!(form_value(request, "scope").as_deref(), Some("openid profile"));
        assert_eq!(form_value(request, "resource").as_deref(), Some("api"));
        Ok(())
    }

    #[tokio::test]
    async fn device_flow_prompts_before_polling() -> Result<()> {
        let http = ScriptedHttp::new(vec![
            (
                200,
                json!({
                    "device_code": "dc",
                    "user_code": "UC",
                    "verification_uri": "https://acme/device",
                    "expires_in": 30,
                    "interval": 1
                }),
            ),
            (200, json!({"access_token": "user-token"})),
        ]);
        let client = TokenClient::new(http.clone(), base()?);
        let mut shown = None;

        let token = client
            .acquire(&auth(ClientAuthType::ClientSecretBasic), FAST, |device| {
                shown = Some(device.user_code.clone());
            })
            .await?;

        assert_eq!(token.access_token, "user-token");
        assert_eq!(shown.as_deref(), Some("UC"));
        assert!(http.sent()[0].url.path().ends_with("/oauth2/device_authorization"));
        Ok(())
    }
}
