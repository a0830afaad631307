//! casebridge - interpretation case to registry sender
//!
//! **Usage:**
//! ```bash
//! casebridge [--config <file>] [--log-level <level>] send --case-id <id> --case-version <n>
//! casebridge send-all
//! casebridge migrate --case-id <id> --case-version <n> [--kind request|genome|report|all]
//! ```
//!
//! Exit status is 0 on success, 2 when a case is rejected as unacceptable and
//! 1 for any other failure.

use anyhow::{Context, Result};
use casebridge_common::config::{require_setting, resolve_setting, TomlConfig};
use casebridge_common::model::Assembly;
use casebridge_common::{migrate, PayloadKind};
use casebridge_sender::models::CaseRef;
use casebridge_sender::services::{
    ArchiveClient, CaseSender, RegistryClient, SelectionCriteria, SourceClient, SubmissionOptions,
};
use casebridge_sender::transport::BackoffPolicy;
use casebridge_sender::types::CaseSource;
use casebridge_sender::CaseError;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};

const EXIT_UNACCEPTABLE: u8 = 2;

#[derive(Parser, Debug)]
#[clap(name = "casebridge", version)]
#[clap(about = "Submit interpreted genomics cases to a patient registry")]
struct Cli {
    /// Configuration file (default: $CASEBRIDGE_CONFIG, then the user and system config dirs)
    #[clap(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is not set (trace, debug, info, warn, error)
    #[clap(long, global = true)]
    log_level: Option<String>,

    #[clap(flatten)]
    connection: ConnectionArgs,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct ConnectionArgs {
    /// Interpretation request service base URL
    #[clap(long, env = "CASEBRIDGE_SOURCE_URL", global = true)]
    source_url: Option<String>,

    /// Variant archive base URL
    #[clap(long, env = "CASEBRIDGE_ARCHIVE_URL", global = true)]
    archive_url: Option<String>,

    /// Registry base URL
    #[clap(long, env = "CASEBRIDGE_REGISTRY_URL", global = true)]
    registry_url: Option<String>,

    /// User for the interpretation request service and variant archive
    #[clap(long, env = "CASEBRIDGE_GEL_USER", global = true)]
    gel_user: Option<String>,

    #[clap(long, env = "CASEBRIDGE_GEL_PASSWORD", hide_env_values = true, global = true)]
    gel_password: Option<String>,

    #[clap(long, env = "CASEBRIDGE_REGISTRY_SYSTEM_KEY", hide_env_values = true, global = true)]
    registry_system_key: Option<String>,

    #[clap(long, env = "CASEBRIDGE_REGISTRY_USER_KEY", hide_env_values = true, global = true)]
    registry_user_key: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit one case version
    Send {
        #[clap(long)]
        case_id: String,

        #[clap(long)]
        case_version: u32,

        /// Also submit phenotypes observed as absent
        #[clap(long)]
        send_absent_phenotypes: bool,

        /// Delete the created patient if a later step fails
        #[clap(long)]
        rollback_on_failure: bool,
    },

    /// Submit every ready case in the source listing
    SendAll,

    /// Print a case's payloads migrated to the canonical model
    Migrate {
        #[clap(long)]
        case_id: String,

        #[clap(long)]
        case_version: u32,

        #[clap(long, value_enum, default_value = "all")]
        kind: KindArg,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    Request,
    Genome,
    Report,
    All,
}

/// Connection settings resolved from CLI, environment and config file
struct Settings {
    config: TomlConfig,
    connection: ConnectionArgs,
}

impl Settings {
    fn backoff(&self) -> BackoffPolicy {
        BackoffPolicy::from_config(&self.config.transport)
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.transport.timeout_secs)
    }

    fn gel_credentials(&self) -> Result<(String, String)> {
        let user = require_setting(
            "gel-user",
            self.connection.gel_user.as_deref(),
            "CASEBRIDGE_GEL_USER",
            self.config.source.user.as_deref(),
            "source.user",
        )?;
        let password = require_setting(
            "gel-password",
            self.connection.gel_password.as_deref(),
            "CASEBRIDGE_GEL_PASSWORD",
            self.config.source.password.as_deref(),
            "source.password",
        )?;
        Ok((user, password))
    }

    fn source_client(&self) -> Result<SourceClient> {
        let url = require_setting(
            "source-url",
            self.connection.source_url.as_deref(),
            "CASEBRIDGE_SOURCE_URL",
            self.config.source.url.as_deref(),
            "source.url",
        )?;
        let (user, password) = self.gel_credentials()?;
        Ok(SourceClient::new(
            &url,
            &user,
            &password,
            self.backoff(),
            self.timeout(),
            self.config.transport.page_size,
        )?)
    }

    fn archive_client(&self) -> Result<ArchiveClient> {
        let url = require_setting(
            "archive-url",
            self.connection.archive_url.as_deref(),
            "CASEBRIDGE_ARCHIVE_URL",
            self.config.archive.url.as_deref(),
            "archive.url",
        )?;
        // The archive shares the source credentials unless configured apart
        let (gel_user, gel_password) = self.gel_credentials()?;
        let user = resolve_setting(
            None,
            "CASEBRIDGE_ARCHIVE_USER",
            self.config.archive.user.as_deref(),
        )
        .unwrap_or(gel_user);
        let password = resolve_setting(
            None,
            "CASEBRIDGE_ARCHIVE_PASSWORD",
            self.config.archive.password.as_deref(),
        )
        .unwrap_or(gel_password);

        Ok(ArchiveClient::new(
            &url,
            &user,
            &password,
            self.backoff(),
            self.timeout(),
            self.config.transport.page_size,
        )?)
    }

    async fn registry_client(&self) -> Result<RegistryClient> {
        let url = require_setting(
            "registry-url",
            self.connection.registry_url.as_deref(),
            "CASEBRIDGE_REGISTRY_URL",
            self.config.registry.url.as_deref(),
            "registry.url",
        )?;
        let system_key = require_setting(
            "registry-system-key",
            self.connection.registry_system_key.as_deref(),
            "CASEBRIDGE_REGISTRY_SYSTEM_KEY",
            self.config.registry.system_key.as_deref(),
            "registry.system_key",
        )?;
        let user_key = require_setting(
            "registry-user-key",
            self.connection.registry_user_key.as_deref(),
            "CASEBRIDGE_REGISTRY_USER_KEY",
            self.config.registry.user_key.as_deref(),
            "registry.user_key",
        )?;

        RegistryClient::connect(&url, &system_key, &user_key, self.backoff(), self.timeout())
            .await
            .context("Failed to connect to the registry")
    }

    async fn case_sender(
        &self,
        options: SubmissionOptions,
    ) -> Result<CaseSender<SourceClient, ArchiveClient, RegistryClient>> {
        Ok(CaseSender::new(
            self.source_client()?,
            self.archive_client()?,
            self.registry_client().await?,
            SelectionCriteria::from_config(&self.config.selection),
            options,
        ))
    }
}

fn init_tracing(cli_level: Option<&str>, config_level: &str) {
    let level = cli_level.unwrap_or(config_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();
}

async fn run(command: Command, settings: Settings) -> Result<()> {
    match command {
        Command::Send {
            case_id,
            case_version,
            send_absent_phenotypes,
            rollback_on_failure,
        } => {
            let mut options = SubmissionOptions::from_config(&settings.config.submission);
            options.send_absent_phenotypes |= send_absent_phenotypes;
            options.rollback_on_failure |= rollback_on_failure;

            let sender = settings.case_sender(options).await?;
            let outcome = sender.send_case(&CaseRef::new(case_id, case_version)).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Command::SendAll => {
            let options = SubmissionOptions::from_config(&settings.config.submission);
            let sender = settings.case_sender(options).await?;
            let summary = sender.send_all().await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Migrate {
            case_id,
            case_version,
            kind,
        } => {
            let source = settings.source_client()?;
            let case = CaseRef::new(case_id, case_version);
            let envelope = source.fetch_case(&case).await?;
            let assembly = envelope.assembly();

            let canonical = |payload: Option<&Value>, kind: PayloadKind| -> Result<Value> {
                match payload {
                    Some(payload) => Ok(serde_json::to_value(migrate(payload, kind, assembly)?)?),
                    None => Ok(Value::Null),
                }
            };
            let request = || {
                canonical(
                    Some(envelope.request_payload()),
                    PayloadKind::InterpretationRequest,
                )
            };
            let genome = || {
                canonical(
                    envelope.latest_interpreted_genome(),
                    PayloadKind::InterpretedGenome,
                )
            };
            let report = || {
                canonical(
                    envelope.latest_clinical_report(),
                    PayloadKind::ClinicalReport,
                )
            };

            let output = match kind {
                KindArg::Request => request()?,
                KindArg::Genome => genome()?,
                KindArg::Report => report()?,
                KindArg::All => json!({
                    "interpretationRequest": request()?,
                    "interpretedGenome": genome()?,
                    "clinicalReport": report()?,
                }),
            };
            info!(case = %case, assembly = ?assembly.map(|a: Assembly| a.label()), "Migrated case");
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match TomlConfig::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("casebridge: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(cli.log_level.as_deref(), &config.logging.level);
    info!(version = env!("CARGO_PKG_VERSION"), "Starting casebridge");

    let settings = Settings {
        config,
        connection: cli.connection,
    };

    match run(cli.command, settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{:#}", e), "casebridge failed");
            let unacceptable = e
                .downcast_ref::<CaseError>()
                .is_some_and(CaseError::is_unacceptable);
            if unacceptable {
                ExitCode::from(EXIT_UNACCEPTABLE)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
