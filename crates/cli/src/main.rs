use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use archer_api::{
    ACCEPT_INVALID_CERTS_ENV, API_BASE_ENV, ArcherClient, ArcherConfig, CONTENT_API_BASE_ENV, SESSION_TOKEN_ENV,
};
use archer_engine::{BulkAmbiguity, RecordSearcher, StaticMetadata};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Parser, Debug)]
#[command(
    name = "archer-lookup",
    version,
    about = "Resolve Archer field values to record ids",
    long_about = "Looks up Archer records by field value through the REST record search, falling back to the content API on platforms without it.",
    after_help = "Examples:\n  archer-lookup --metadata apps.yaml one --app Incidents --field \"Ticket Number\" INC-1\n  archer-lookup --metadata apps.yaml bulk --app Incidents --field Status Open Closed\n"
)]
struct Cli {
    /// REST API base URL, ending in '/'
    #[arg(long, global = true, env = API_BASE_ENV)]
    api_base: Option<String>,

    /// Content API base URL, ending in '/'
    #[arg(long, global = true, env = CONTENT_API_BASE_ENV)]
    content_api_base: Option<String>,

    /// Session token sent in the Authorization header
    #[arg(long, global = true, env = SESSION_TOKEN_ENV, hide_env_values = true)]
    session_token: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(long, global = true, env = ACCEPT_INVALID_CERTS_ENV, default_value_t = true, action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    accept_invalid_certs: bool,

    /// Application metadata file (YAML, or JSON with a .json extension)
    #[arg(long, global = true, default_value = "archer-metadata.yaml")]
    metadata: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Look up a single value
    One {
        #[arg(long)]
        app: String,
        /// Field display name
        #[arg(long)]
        field: String,
        value: String,
    },
    /// Look up several values in one field
    Bulk {
        #[arg(long)]
        app: String,
        /// Field display name
        #[arg(long)]
        field: String,
        #[arg(required = true)]
        values: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = connection_config(&cli)?;
    let client = ArcherClient::new(&config)?;
    let metadata = StaticMetadata::from_path(&cli.metadata)?;
    let searcher = RecordSearcher::new(Arc::new(metadata), Arc::new(client), config.endpoints.clone());

    match cli.command {
        Commands::One { app, field, value } => {
            let record_id = searcher.lookup_one(&app, &field, &value).await?;
            let out = json!({ "value": value, "record_id": record_id });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Commands::Bulk { app, field, values } => {
            let lookup = searcher.collect_bulk(&app, &field, &values).await;
            let out = json!({ "ids": lookup.ids, "ambiguities": lookup.ambiguities });
            println!("{}", serde_json::to_string_pretty(&out)?);
            if lookup.has_ambiguities() {
                return Err(BulkAmbiguity::new(lookup).into());
            }
        }
    }
    Ok(())
}

fn connection_config(cli: &Cli) -> Result<ArcherConfig> {
    let api_base = cli.api_base.clone().context("missing --api-base (or ARCHER_API_BASE)")?;
    let content_api_base = cli
        .content_api_base
        .clone()
        .context("missing --content-api-base (or ARCHER_CONTENT_API_BASE)")?;
    let session_token = cli
        .session_token
        .clone()
        .context("missing --session-token (or ARCHER_SESSION_TOKEN)")?;
    let config = ArcherConfig::new(api_base, content_api_base, session_token, cli.accept_invalid_certs)?;
    Ok(config)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok()))
        .with_writer(std::io::stderr)
        .try_init();
}

/// `RUST_LOG` directives when present and valid, else `info`.
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}
