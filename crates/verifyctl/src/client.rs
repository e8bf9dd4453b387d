//! Shared dependencies, application context, and error types for the CLI.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use verify_api_models::ModelError;
use verify_auth::AuthError;
use verify_client::{ApiContext, ApiError, HttpClient, ReqwestClient, tenant_base_url};
use verify_config::{ConfigError, ConfigStore};

use crate::cli::Cli;

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) | Self::Failure(_) => 1,
        }
    }

    pub(crate) const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ModelError> for CliError {
    fn from(err: ModelError) -> Self {
        if err.is_validation() {
            Self::Validation(err.to_string())
        } else {
            Self::Failure(err.into())
        }
    }
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        Self::Failure(err.into())
    }
}

impl From<AuthError> for CliError {
    fn from(err: AuthError) -> Self {
        Self::Failure(err.into())
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Failure(err.into())
    }
}

/// Dependencies constructed from environment flags and CLI options.
#[derive(Clone)]
pub(crate) struct CliDependencies {
    pub(crate) http: Arc<dyn HttpClient>,
    pub(crate) store: ConfigStore,
}

impl CliDependencies {
    /// Construct the HTTP transport and locate the config file.
    pub(crate) fn from_env(cli: &Cli, request_id: &str) -> CliResult<Self> {
        let http = ReqwestClient::new(Duration::from_secs(cli.timeout), request_id)
            .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            http: Arc::new(http),
            store: ConfigStore::from_env()?,
        })
    }
}

/// Application context passed to command handlers.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) http: Arc<dyn HttpClient>,
    pub(crate) store: ConfigStore,
    /// `--tenant` when given.
    pub(crate) tenant: Option<String>,
}

impl AppContext {
    /// API context for the selected tenant and its stored token.
    pub(crate) fn api_context(&self) -> CliResult<ApiContext> {
        let config = self.store.load()?;
        let tenant = config
            .effective_tenant(self.tenant.as_deref())
            .ok_or_else(|| {
                CliError::validation(
                    "no tenant selected; run `verifyctl auth <tenant>` or pass --tenant",
                )
            })?;
        let auth = config.auth_for(tenant).ok_or_else(|| {
            CliError::failure(anyhow!(
                "Login again. No token is stored for tenant '{tenant}'; run `verifyctl auth {tenant}`"
            ))
        })?;
        tracing::debug!(tenant, "using stored token");
        Ok(ApiContext::new(
            Arc::clone(&self.http),
            tenant_base_url(tenant)?,
            auth.token.clone(),
        ))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use std::time::Duration;

    use anyhow::Result;
    use httpmock::MockServer;
    use tempfile::TempDir;
    use verify_client::ReqwestClient;
    use verify_config::{AuthConfig, CliConfig, ConfigStore};

    use super::AppContext;

    pub(crate) const TOKEN: &str = "stored-token";

    /// Context with an empty config file in a fresh directory.
    pub(crate) fn empty_context() -> Result<(TempDir, AppContext)> {
        let dir = tempfile::tempdir()?;
        let ctx = AppContext {
            http: Arc::new(ReqwestClient::new(Duration::from_secs(5), "test-request")?),
            store: ConfigStore::new(dir.path().join("config")),
            tenant: None,
        };
        Ok((dir, ctx))
    }

    /// Context logged in to the mock server's tenant.
    pub(crate) fn context_with(server: &MockServer) -> Result<(TempDir, AppContext)> {
        let (dir, ctx) = empty_context()?;
        let tenant = server.base_url();
        let mut config = CliConfig::default();
        config.set_current(&tenant);
        config.upsert_auth(AuthConfig {
            tenant,
            token: TOKEN.to_string(),
            is_user: false,
        });
        ctx.store.save(&config)?;
        Ok((dir, ctx))
    }
}
