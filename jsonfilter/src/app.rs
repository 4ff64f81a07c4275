//! Core application

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::cli::{self, Commands, RequestArgs};
use crate::core::config::{AppConfig, Resource};
use crate::core::constants::{APP_NAME_LOWER, ENV_DATABASE_URL, ENV_LOG};
use crate::data::PostgresService;
use crate::data::sql::Backend;
use crate::filters::{
    BoundParam, CollectingDiagnostics, FilterError, FilterOutcome, Notice, PgQueryBuilder,
    SequentialNameGenerator, parse_pairs,
};

/// Result of compiling one filter request
#[derive(Debug, Serialize)]
pub struct CompileReport {
    pub resource: String,
    pub sql: String,
    pub params: Vec<BoundParam>,
    pub outcomes: BTreeMap<String, FilterOutcome>,
    pub notices: Vec<Notice>,
    pub missing_required: Vec<String>,
}

pub struct App;

impl App {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let config = AppConfig::load(&cli_config)?;

        match command {
            Commands::Describe { resource } => {
                let resource = config.resource(&resource)?;
                print_json(&resource.filter.describe())
            }
            Commands::Compile { request } => {
                let resource = config.resource(&request.resource)?;
                let (_, report) = Self::compile(resource, &request)?;
                print_json(&report)
            }
            Commands::Count { request } => Self::count(&config, &request).await,
        }
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .with_writer(std::io::stderr)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    /// Apply request filters to a fresh query on the resource's table
    pub fn compile(
        resource: &Resource,
        request: &RequestArgs,
    ) -> Result<(PgQueryBuilder, CompileReport)> {
        let values = parse_pairs(request.filters.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        let schema = &resource.schema;

        let mut qb = PgQueryBuilder::new(&schema.table, &schema.alias);
        let mut names = SequentialNameGenerator::new();
        let sink = CollectingDiagnostics::new();

        let outcomes = resource
            .filter
            .apply(&values, &mut qb, &mut names, schema, &sink)
            .with_context(|| format!("Failed to compile filters for '{}'", resource.name))?;

        let missing_required: Vec<String> = resource
            .filter
            .missing_required(&values)
            .into_iter()
            .map(String::from)
            .collect();
        if !missing_required.is_empty() {
            tracing::warn!(
                resource = %resource.name,
                properties = ?missing_required,
                "Required filters missing from request"
            );
        }

        let notices = sink.notices();
        for notice in &notices {
            tracing::warn!(kind = %notice.kind, "{}", notice.message);
        }

        let report = CompileReport {
            resource: resource.name.clone(),
            sql: qb.to_sql("*"),
            params: qb.params().to_vec(),
            outcomes: outcomes.into_iter().collect(),
            notices,
            missing_required,
        };
        Ok((qb, report))
    }

    async fn count(config: &AppConfig, request: &RequestArgs) -> Result<()> {
        let resource = config.resource(&request.resource)?;
        let url = config.database_url.as_deref().with_context(|| {
            format!(
                "No database URL: pass --database-url, set {} or database_url in the config file",
                ENV_DATABASE_URL
            )
        })?;
        ensure_json_capable(url)?;

        let (qb, report) = Self::compile(resource, request)?;

        let db = PostgresService::init(url)
            .await
            .context("Failed to connect to PostgreSQL")?;
        let count = db.count(&qb).await;
        db.close().await;
        let count = count.context("Failed to count filtered rows")?;

        print_json(&serde_json::json!({
            "resource": report.resource,
            "sql": report.sql,
            "count": count,
            "notices": report.notices,
        }))
    }
}

/// Filters compile for PostgreSQL only; refuse other engines before connecting
fn ensure_json_capable(url: &str) -> Result<()> {
    match Backend::from_url(url) {
        Some(backend) if backend.is_json_capable() => Ok(()),
        Some(backend) => Err(FilterError::InvalidPlatform { found: backend }.into()),
        None => anyhow::bail!("Unrecognized database URL scheme"),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
