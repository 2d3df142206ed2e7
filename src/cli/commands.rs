use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use aws_config::BehaviorVersion;
use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};
use tracing::info;

use crate::config::AppConfig;
use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::handlers::{ItemHandlers, Operation};
use crate::ids::UlidGenerator;
use crate::lambda;
use crate::logging::{init_logging_with_config, LogConfig};
use crate::middleware::{CorsMiddleware, TracingMiddleware};
use crate::model::{Item, KEY_ATTRIBUTE};
use crate::store::{DynamoItemStore, ItemStore, MemoryStore};

/// Command-line interface for the item handlers
#[derive(Parser)]
#[command(name = "item-handlers")]
#[command(about = "Item CRUD handlers for AWS Lambda", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one operation on the Lambda runtime
    Serve {
        /// Operation this function handles
        #[arg(short, long, env = "ITEMS_OPERATION")]
        operation: Operation,

        /// YAML settings file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Run one operation once and print the response as JSON
    Invoke {
        #[arg(short, long)]
        operation: Operation,

        /// Value of the `{id}` path parameter
        #[arg(long)]
        id: Option<String>,

        /// Raw request body
        #[arg(long)]
        body: Option<String>,

        /// Use an in-process store instead of DynamoDB
        #[arg(long, default_value_t = false)]
        memory: bool,

        /// JSON array of items preloaded into the in-process store
        #[arg(long, requires = "memory")]
        seed: Option<PathBuf>,

        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Parse the process arguments and run the selected command.
pub async fn run_cli() -> Result<()> {
    run(Cli::parse()).await
}

pub async fn run(cli: Cli) -> Result<()> {
    init_logging_with_config(&LogConfig::from_env())?;

    match cli.command {
        Commands::Serve { operation, config } => {
            let config = AppConfig::load(config.as_deref())?;
            // preflight never touches the store and needs no table
            let store = if operation == Operation::Preflight {
                Arc::new(MemoryStore::new()) as Arc<dyn ItemStore>
            } else {
                dynamo_store(&config).await?
            };
            let handlers = Arc::new(build_handlers(&config, store)?);
            lambda::run(handlers, operation)
                .await
                .map_err(|e| anyhow!("lambda runtime failed: {e}"))
        }
        Commands::Invoke {
            operation,
            id,
            body,
            memory,
            seed,
            config,
        } => {
            let config = AppConfig::load(config.as_deref())?;
            let store = if memory {
                Arc::new(memory_store(seed.as_deref())?) as Arc<dyn ItemStore>
            } else {
                dynamo_store(&config).await?
            };
            let handlers = build_handlers(&config, store)?;
            let req = invocation_request(operation, id.as_deref(), body);
            let resp = handlers.call(operation, req).await;
            println!("{}", serde_json::to_string_pretty(&invocation_output(&resp))?);
            Ok(())
        }
    }
}

/// Handler set with the configured CORS policy and access logging.
pub fn build_handlers(config: &AppConfig, store: Arc<dyn ItemStore>) -> Result<ItemHandlers> {
    let cors = CorsMiddleware::from_settings(&config.cors).context("invalid cors settings")?;
    let mut handlers = ItemHandlers::new(store, Arc::new(UlidGenerator));
    handlers.add_middleware(Arc::new(cors));
    handlers.add_middleware(Arc::new(TracingMiddleware));
    Ok(handlers)
}

/// The request API Gateway would hand `operation` for the given id and body.
#[must_use]
pub fn invocation_request(
    operation: Operation,
    id: Option<&str>,
    body: Option<String>,
) -> HandlerRequest {
    let path = match id {
        Some(id) if operation.takes_id() => format!("/items/{id}"),
        _ => "/items".to_string(),
    };
    let mut req = HandlerRequest::new(operation.method(), path);
    if let Some(id) = id {
        req = req.with_path_param(KEY_ATTRIBUTE, id);
    }
    req.body = body.map(String::into_bytes);
    req
}

pub(super) fn invocation_output(resp: &HandlerResponse) -> Value {
    let headers: Map<String, Value> = resp
        .headers
        .iter()
        .map(|(name, value)| (name.to_string(), Value::String(value.clone())))
        .collect();
    json!({
        "status": resp.status,
        "headers": headers,
        "body": resp.body_text(),
    })
}

async fn dynamo_store(config: &AppConfig) -> Result<Arc<dyn ItemStore>> {
    config.validate()?;
    let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let store = DynamoItemStore::new(&sdk_config, config.dynamo_config());
    info!(table = store.table_name(), "using dynamodb store");
    Ok(Arc::new(store))
}

pub(super) fn memory_store(seed: Option<&Path>) -> Result<MemoryStore> {
    let Some(path) = seed else {
        return Ok(MemoryStore::new());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file {}", path.display()))?;
    let items: Vec<Item> = serde_json::from_str(&text)
        .with_context(|| format!("seed file {} is not a JSON array of items", path.display()))?;
    Ok(MemoryStore::with_items(items)?)
}
