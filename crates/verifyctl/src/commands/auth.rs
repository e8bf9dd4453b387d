use std::sync::Arc;

use verify_api_models::{FileFormat, ResourceData, ResourceObject};
use verify_auth::{AuthResource, DeviceAuthorization, PollOptions, TokenClient};
use verify_client::tenant_base_url;
use verify_config::AuthConfig;

use crate::cli::AuthArgs;
use crate::client::{AppContext, CliError, CliResult};
use crate::output::emit;
use crate::resources::read_resource;

/// Obtain a token, store it for the tenant, and make the tenant current.
pub(crate) async fn handle_auth(ctx: &AppContext, args: AuthArgs) -> CliResult<()> {
    handle_auth_with(ctx, args, PollOptions::default()).await
}

async fn handle_auth_with(ctx: &AppContext, args: AuthArgs, poll: PollOptions) -> CliResult<()> {
    if args.boilerplate {
        let sample =
            ResourceObject::wrap(&AuthResource::boilerplate())?.render(FileFormat::Yaml)?;
        return emit(&sample, None);
    }

    let auth = auth_resource(ctx, &args)?;
    let tokens = TokenClient::new(Arc::clone(&ctx.http), tenant_base_url(&auth.tenant)?);
    let token = tokens.acquire(&auth, poll, show_device_prompt).await?;

    let mut config = ctx.store.load()?;
    config.upsert_auth(AuthConfig {
        tenant: auth.tenant.clone(),
        token: token.access_token.clone(),
        is_user: auth.user,
    });
    config.set_current(&auth.tenant);
    ctx.store.save(&config)?;
    tracing::info!(tenant = %auth.tenant, user = auth.user, "token stored");

    if args.print {
        println!("{}", token.access_token);
    } else {
        println!("Logged in to {}.", auth.tenant);
    }
    Ok(())
}

/// Build the auth resource from `-f` and flags. Flags override the file;
/// the positional tenant wins over the file, which wins over `--tenant`.
fn auth_resource(ctx: &AppContext, args: &AuthArgs) -> CliResult<AuthResource> {
    let mut auth = match args.file.as_deref() {
        Some(path) => read_resource::<AuthResource>(path)?,
        None => {
            if args.client_id.is_none() {
                return Err(CliError::validation(
                    "auth requires -f FILE or --client-id",
                ));
            }
            AuthResource::default()
        }
    };

    if let Some(tenant) = args.tenant_host.as_deref() {
        auth.tenant = tenant.to_string();
    } else if auth.tenant.trim().is_empty() {
        if let Some(tenant) = ctx.tenant.as_deref() {
            auth.tenant = tenant.to_string();
        }
    }
    if let Some(client_id) = &args.client_id {
        auth.client_id.clone_from(client_id);
    }
    if let Some(secret) = &args.client_secret {
        auth.client_secret = Some(secret.clone());
    }
    if args.user {
        auth.user = true;
    }
    auth.tenant = auth.tenant.trim().to_string();

    auth.validate()?;
    Ok(auth)
}

fn show_device_prompt(device: &DeviceAuthorization) {
    let url = device
        .verification_uri_complete
        .as_deref()
        .unwrap_or(&device.verification_uri);
    eprintln!("Open {url} in a browser and enter the code {}", device.user_code);
    eprintln!("Waiting for approval...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::empty_context;
    use anyhow::{Result, anyhow};
    use httpmock::prelude::*;
    use serde_json::json;
    use std::fs;
    use std::time::Duration;

    fn flags(tenant: &str) -> AuthArgs {
        AuthArgs {
            tenant_host: Some(tenant.to_string()),
            client_id: Some("cli".into()),
            client_secret: Some("s3cret".into()),
            ..AuthArgs::default()
        }
    }

    #[tokio::test]
    async fn client_credentials_token_is_stored_and_tenant_made_current() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/oauth2/token")
                .header("authorization", "Basic Y2xpOnMzY3JldA==");
            then.status(200)
                .json_body(json!({"access_token": "fresh-token", "token_type": "Bearer"}));
        });

        let (_dir, ctx) = empty_context()?;
        let tenant = server.base_url();
        handle_auth(&ctx, flags(&tenant))
            .await
            .map_err(|err| anyhow!(err.display_message()))?;

        mock.assert();
        let config = ctx.store.load()?;
        assert_eq!(config.tenant.as_deref(), Some(tenant.as_str()));
        let stored = config
            .auth_for(&tenant)
            .ok_or_else(|| anyhow!("token stored"))?;
        assert_eq!(stored.token, "fresh-token");
        assert!(!stored.is_user);
        Ok(())
    }

    #[tokio::test]
    async fn reauthenticating_overwrites_the_entry() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/oauth2/token");
            then.status(200).json_body(json!({"access_token": "second"}));
        });

        let (_dir, ctx) = empty_context()?;
        let tenant = server.base_url();
        let mut config = verify_config::CliConfig::default();
        config.upsert_auth(AuthConfig {
            tenant: tenant.clone(),
            token: "first".into(),
            is_user: false,
        });
        ctx.store.save(&config)?;

        handle_auth(&ctx, flags(&tenant))
            .await
            .map_err(|err| anyhow!(err.display_message()))?;

        let config = ctx.store.load()?;
        assert_eq!(config.auth.len(), 1);
        assert_eq!(config.auth[0].token, "second");
        Ok(())
    }

    #[tokio::test]
    async fn device_flow_polls_until_approved() -> Result<()> {
        let server = MockServer::start_async().await;
        let device = server.mock(|when, then| {
            when.method(POST).path("/oauth2/device_authorization");
            then.status(200).json_body(json!({
                "device_code": "dc-1",
                "user_code": "WXYZ",
                "verification_uri": "https://example.test/device",
                "expires_in": 60,
                "interval": 1
            }));
        });
        let token = server.mock(|when, then| {
            when.method(POST).path("/oauth2/token");
            then.status(200).json_body(json!({"access_token": "user-token"}));
        });

        let (dir, ctx) = empty_context()?;
        let path = dir.path().join("auth.yaml");
        fs::write(
            &path,
            format!(
                "kind: IBMVerifyAuth\ndata:\n  tenant: {}\n  clientId: cli\n  user: true\n",
                server.base_url()
            ),
        )?;
        let args = AuthArgs {
            file: Some(path),
            ..AuthArgs::default()
        };
        let poll = PollOptions {
            max_polls: Some(2),
            interval: Some(Duration::ZERO),
        };

        handle_auth_with(&ctx, args, poll)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;

        device.assert();
        token.assert();
        let config = ctx.store.load()?;
        assert_eq!(config.auth.first().map(|entry| entry.is_user), Some(true));
        Ok(())
    }

    #[tokio::test]
    async fn rejected_credentials_surface_oauth_error() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/oauth2/token");
            then.status(401).json_body(json!({
                "error": "invalid_client",
                "error_description": "client authentication failed"
            }));
        });

        let (_dir, ctx) = empty_context()?;
        let message = handle_auth(&ctx, flags(&server.base_url()))
            .await
            .err()
            .map(|err| err.display_message())
            .unwrap_or_default();

        assert!(message.contains("invalid_client"), "{message}");
        assert!(message.contains("client authentication failed"), "{message}");
        assert!(ctx.store.load()?.auth.is_empty());
        Ok(())
    }

    #[test]
    fn flags_without_client_id_are_a_usage_error() -> Result<()> {
        let (_dir, ctx) = empty_context()?;
        let args = AuthArgs {
            tenant_host: Some("acme.verify.ibm.com".into()),
            ..AuthArgs::default()
        };
        let err = auth_resource(&ctx, &args).err();
        assert!(err.is_some_and(|err| err.is_validation()));
        Ok(())
    }

    #[test]
    fn global_tenant_fills_a_file_without_tenant() -> Result<()> {
        let (dir, mut ctx) = empty_context()?;
        ctx.tenant = Some("fallback.example".into());
        let path = dir.path().join("auth.json");
        fs::write(
            &path,
            r#"{"kind":"IBMVerifyAuth","data":{"clientId":"cli","clientSecret":"s"}}"#,
        )?;
        let args = AuthArgs {
            file: Some(path),
            ..AuthArgs::default()
        };
        let auth = auth_resource(&ctx, &args).map_err(|err| anyhow!(err.display_message()))?;
        assert_eq!(auth.tenant, "fallback.example");
        Ok(())
    }
}
