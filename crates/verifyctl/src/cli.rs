//! Command-line surface and dispatch.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use uuid::Uuid;
use verify_api_models::ResourceKind;
use verify_telemetry::{LogFormat, LoggingConfig, init_logging, level_for_verbosity};

use crate::client::{AppContext, CliDependencies, CliResult};
use crate::commands::{
    handle_auth, handle_create, handle_delete, handle_get, handle_replace, handle_set_tenant,
};
use crate::output::OutputFormat;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const BUILD_SHA: &str = match option_env!("VERIFYCTL_BUILD_SHA") {
    Some(sha) => sha,
    None => "dev",
};

/// Parses CLI arguments and executes the requested command. Returns the
/// process exit code.
pub async fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return report_parse_error(&err),
    };
    let command_name = command_label(&cli.command);

    if let Err(err) = init_logging(&LoggingConfig {
        level: level_for_verbosity(cli.verbose),
        format: LogFormat::infer(),
        build_sha: BUILD_SHA,
    }) {
        eprintln!("warning: {err}");
    }

    let request_id = Uuid::new_v4().to_string();
    tracing::debug!(command = command_name, %request_id, "starting");

    let result = match CliDependencies::from_env(&cli, &request_id) {
        Ok(deps) => dispatch(cli, deps).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            if err.is_validation() {
                eprintln!("hint: run `verifyctl {command_name} --help` for usage");
            }
            err.exit_code()
        }
    }
}

/// Print a clap error and map it to an exit code. `--help` and `--version`
/// succeed; every other parse failure exits 1.
fn report_parse_error(err: &clap::Error) -> i32 {
    let _ = err.print();
    parse_exit_code(err)
}

fn parse_exit_code(err: &clap::Error) -> i32 {
    i32::from(err.use_stderr())
}

async fn dispatch(cli: Cli, deps: CliDependencies) -> CliResult<()> {
    let ctx = AppContext {
        http: deps.http,
        store: deps.store,
        tenant: cli.tenant,
    };

    match cli.command {
        Command::Auth(args) => handle_auth(&ctx, args).await,
        Command::Set(SetCommand::Tenant(args)) => handle_set_tenant(&ctx, &args),
        Command::Create(args) => handle_create(&ctx, args).await,
        Command::Get(args) => handle_get(&ctx, args).await,
        Command::Replace(args) => handle_replace(&ctx, args).await,
        Command::Delete(args) => handle_delete(&ctx, args).await,
    }
}

#[derive(Parser)]
#[command(
    name = "verifyctl",
    version,
    about = "Administrative CLI for IBM Security Verify tenants"
)]
pub(crate) struct Cli {
    /// Tenant to use instead of the current one.
    #[arg(long, global = true, env = "VERIFY_TENANT")]
    pub(crate) tenant: Option<String>,
    /// HTTP timeout in seconds.
    #[arg(
        long,
        global = true,
        env = "VERIFY_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub(crate) timeout: u64,
    /// Raise the log level (-v info, -vv debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub(crate) verbose: u8,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Log in to a tenant and store the access token.
    Auth(AuthArgs),
    /// Change CLI settings.
    #[command(subcommand)]
    Set(SetCommand),
    /// Create a resource from a file.
    Create(CreateArgs),
    /// Get one resource or list resources.
    Get(GetArgs),
    /// Replace a resource from a file.
    Replace(ReplaceArgs),
    /// Delete a resource.
    Delete(DeleteArgs),
}

#[derive(Subcommand)]
pub(crate) enum SetCommand {
    /// Make a logged-in tenant current.
    Tenant(SetTenantArgs),
}

#[derive(Args)]
pub(crate) struct SetTenantArgs {
    /// Tenant host, e.g. `acme.verify.ibm.com`.
    pub(crate) tenant: String,
}

#[derive(Args, Default)]
pub(crate) struct AuthArgs {
    /// Tenant host; overrides the tenant in the file.
    #[arg(value_name = "TENANT")]
    pub(crate) tenant_host: Option<String>,
    /// `IBMVerifyAuth` resource file.
    #[arg(short = 'f', long = "file")]
    pub(crate) file: Option<PathBuf>,
    /// Log in as a user through the device flow.
    #[arg(long)]
    pub(crate) user: bool,
    /// OAuth client identifier.
    #[arg(long)]
    pub(crate) client_id: Option<String>,
    /// OAuth client secret.
    #[arg(long)]
    pub(crate) client_secret: Option<String>,
    /// Print the access token after storing it.
    #[arg(long)]
    pub(crate) print: bool,
    /// Print a sample `IBMVerifyAuth` file.
    #[arg(long)]
    pub(crate) boilerplate: bool,
}

#[derive(Args)]
pub(crate) struct CreateArgs {
    #[arg(value_enum)]
    pub(crate) resource: ResourceArg,
    /// Resource file (YAML or JSON).
    #[arg(short = 'f', long = "file")]
    pub(crate) file: Option<PathBuf>,
    /// Print a sample resource file.
    #[arg(long)]
    pub(crate) boilerplate: bool,
    /// Print the entitlements this operation needs.
    #[arg(long)]
    pub(crate) entitlements: bool,
}

#[derive(Args)]
pub(crate) struct GetArgs {
    #[arg(value_enum)]
    pub(crate) resource: ResourceArg,
    /// Unique name of the resource.
    #[arg(long, conflicts_with = "id")]
    pub(crate) name: Option<String>,
    /// Identifier of the resource.
    #[arg(long)]
    pub(crate) id: Option<String>,
    /// Search expression passed to the list endpoint.
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) search: Option<String>,
    /// Sort key; prefix with `-` for descending.
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) sort: Option<String>,
    /// 1-based page number.
    #[arg(long)]
    pub(crate) page: Option<u32>,
    /// Page size.
    #[arg(long)]
    pub(crate) limit: Option<u32>,
    /// Output format.
    #[arg(short = 'o', long = "output", value_enum, default_value_t = OutputFormat::Yaml)]
    pub(crate) output: OutputFormat,
    /// Write output to a file instead of stdout.
    #[arg(long)]
    pub(crate) outfile: Option<PathBuf>,
    /// Print the entitlements this operation needs.
    #[arg(long)]
    pub(crate) entitlements: bool,
}

#[derive(Args)]
pub(crate) struct ReplaceArgs {
    #[arg(value_enum)]
    pub(crate) resource: ResourceArg,
    /// Resource file (YAML or JSON).
    #[arg(short = 'f', long = "file")]
    pub(crate) file: Option<PathBuf>,
    /// Print the entitlements this operation needs.
    #[arg(long)]
    pub(crate) entitlements: bool,
}

#[derive(Args)]
pub(crate) struct DeleteArgs {
    #[arg(value_enum)]
    pub(crate) resource: ResourceArg,
    /// Unique name of the resource.
    #[arg(long, conflicts_with = "id")]
    pub(crate) name: Option<String>,
    /// Identifier of the resource.
    #[arg(long)]
    pub(crate) id: Option<String>,
    /// Print the entitlements this operation needs.
    #[arg(long)]
    pub(crate) entitlements: bool,
}

/// Resource names accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum ResourceArg {
    #[value(name = "user", alias = "users")]
    User,
    #[value(name = "group", alias = "groups")]
    Group,
    #[value(name = "application", aliases = ["applications", "app", "apps"])]
    Application,
    #[value(name = "apiclient", alias = "apiclients")]
    ApiClient,
    #[value(name = "accesspolicy", aliases = ["accesspolicies", "policy", "policies"])]
    AccessPolicy,
    #[value(name = "identitysource", alias = "identitysources")]
    IdentitySource,
    #[value(name = "personalcert", alias = "personalcerts")]
    PersonalCert,
    #[value(name = "signercert", alias = "signercerts")]
    SignerCert,
    #[value(name = "passwordpolicy", alias = "passwordpolicies")]
    PasswordPolicy,
    #[value(name = "theme", alias = "themes")]
    Theme,
}

impl ResourceArg {
    pub(crate) const fn kind(self) -> ResourceKind {
        match self {
            Self::User => ResourceKind::User,
            Self::Group => ResourceKind::Group,
            Self::Application => ResourceKind::Application,
            Self::ApiClient => ResourceKind::ApiClient,
            Self::AccessPolicy => ResourceKind::AccessPolicy,
            Self::IdentitySource => ResourceKind::IdentitySource,
            Self::PersonalCert => ResourceKind::PersonalCert,
            Self::SignerCert => ResourceKind::SignerCert,
            Self::PasswordPolicy => ResourceKind::PasswordPolicy,
            Self::Theme => ResourceKind::Theme,
        }
    }
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Auth(_) => "auth",
        Command::Set(_) => "set",
        Command::Create(_) => "create",
        Command::Get(_) => "get",
        Command::Replace(_) => "replace",
        Command::Delete(_) => "delete",
    }
}
