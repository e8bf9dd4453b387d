//! Command handlers grouped by verb.
//!
//! Resource commands are generic over `ResourceClient`; `with_client!`
//! picks the client for the resource named on the command line.

mod auth;
mod create;
mod delete;
mod get;
mod replace;
mod set;

pub(crate) use auth::handle_auth;
pub(crate) use create::handle_create;
pub(crate) use delete::handle_delete;
pub(crate) use get::handle_get;
pub(crate) use replace::handle_replace;
pub(crate) use set::handle_set_tenant;

use std::fmt::Write as _;

use verify_api_models::{Operation, ResourceKind, required_entitlements};
use verify_client::Locator;

use crate::client::{CliError, CliResult};

/// Run `$handler(&client, $args...)` with the client for `$resource`.
macro_rules! with_client {
    ($resource:expr, $handler:ident($($arg:expr),* $(,)?)) => {{
        use crate::cli::ResourceArg;
        use verify_client::{
            AccessPolicies, ApiClients, Applications, Groups, IdentitySources,
            PasswordPolicies, PersonalCerts, SignerCerts, Themes, Users,
        };
        let resource: ResourceArg = $resource;
        match resource {
            ResourceArg::User => $handler(&Users, $($arg),*).await,
            ResourceArg::Group => $handler(&Groups, $($arg),*).await,
            ResourceArg::Application => $handler(&Applications, $($arg),*).await,
            ResourceArg::ApiClient => $handler(&ApiClients, $($arg),*).await,
            ResourceArg::AccessPolicy => $handler(&AccessPolicies, $($arg),*).await,
            ResourceArg::IdentitySource => $handler(&IdentitySources, $($arg),*).await,
            ResourceArg::PersonalCert => $handler(&PersonalCerts, $($arg),*).await,
            ResourceArg::SignerCert => $handler(&SignerCerts, $($arg),*).await,
            ResourceArg::PasswordPolicy => $handler(&PasswordPolicies, $($arg),*).await,
            ResourceArg::Theme => $handler(&Themes, $($arg),*).await,
        }
    }};
}
pub(crate) use with_client;

/// Entitlements listing printed by `--entitlements`.
pub(crate) fn entitlements_text(kind: ResourceKind, operation: Operation) -> String {
    let verb = match operation {
        Operation::Create => "create",
        Operation::Get => "read",
        Operation::Replace => "replace",
        Operation::Delete => "delete",
    };
    let mut text = format!(
        "Entitlements to {verb} {} resources (any one suffices):\n",
        kind.label()
    );
    for entitlement in required_entitlements(kind, operation) {
        let _ = writeln!(text, "  - {} ({})", entitlement.description, entitlement.id);
    }
    text
}

/// Print the entitlements for `operation` on `kind`. No login needed.
pub(crate) fn print_entitlements(kind: ResourceKind, operation: Operation) -> CliResult<()> {
    print!("{}", entitlements_text(kind, operation));
    Ok(())
}

/// `--name` or `--id` as a locator.
pub(crate) fn locator(name: Option<String>, id: Option<String>) -> Option<Locator> {
    id.map(Locator::Id).or_else(|| name.map(Locator::Name))
}

pub(crate) fn require_locator(
    name: Option<String>,
    id: Option<String>,
    command: &str,
) -> CliResult<Locator> {
    locator(name, id)
        .ok_or_else(|| CliError::validation(format!("{command} requires --name or --id")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entitlements_text_lists_ids() {
        let text = entitlements_text(ResourceKind::ApiClient, Operation::Create);
        assert!(text.starts_with("Entitlements to create API client resources"));
        assert!(text.contains("(manageAPIClients)"));
        assert!(!text.contains("readAPIClients"));
    }

    #[test]
    fn id_wins_over_name() {
        assert_eq!(
            locator(Some("n".into()), Some("i".into())),
            Some(Locator::Id("i".into()))
        );
        assert_eq!(locator(Some("n".into()), None), Some(Locator::Name("n".into())));
        assert!(require_locator(None, None, "delete").is_err());
    }
}
